use crate::domain::model::{
    Entity, MapConfig, RelationshipResult, RelationshipStats, Role, SearchHit, SearchScope,
};
use crate::domain::ports::CompanyDirectory;
use crate::utils::error::{ConnectionsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Path scheme the backend uses for relationship lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipLayout {
    /// `/api/vendor/{name}/clients`, `/api/client/{name}/vendors`
    #[default]
    Legacy,
    /// `/api/relationships/vendor/{name}`, `/api/relationships/client/{name}`
    Relationships,
}

impl RelationshipLayout {
    fn segments(self, name: &str, role: Role) -> Vec<&str> {
        match (self, role) {
            (RelationshipLayout::Legacy, Role::ServiceProvider) => {
                vec!["api", "vendor", name, "clients"]
            }
            (RelationshipLayout::Legacy, Role::Client) => vec!["api", "client", name, "vendors"],
            (RelationshipLayout::Relationships, Role::ServiceProvider) => {
                vec!["api", "relationships", "vendor", name]
            }
            (RelationshipLayout::Relationships, Role::Client) => {
                vec!["api", "relationships", "client", name]
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    Bare(Vec<SearchItem>),
    Wrapped { results: Vec<SearchItem> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchItem {
    Name(String),
    Summary(Entity),
}

#[derive(Deserialize, Default)]
struct WireStats {
    total: Option<usize>,
    with_location: Option<usize>,
    with_logo: Option<usize>,
}

// Bare must come first: an untagged struct variant with all-default fields
// would also accept a JSON array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RelationshipPayload {
    Bare(Vec<Entity>),
    Full {
        #[serde(default)]
        center: Option<Entity>,
        #[serde(default, alias = "clients", alias = "vendors")]
        related: Vec<Entity>,
        #[serde(default)]
        total_count: Option<usize>,
        #[serde(default)]
        stats: Option<WireStats>,
    },
}

impl RelationshipPayload {
    fn into_result(self, name: &str, role: Role) -> RelationshipResult {
        let fallback_center = || Entity {
            role: Some(role),
            ..Entity::named(name)
        };

        match self {
            RelationshipPayload::Bare(related) => {
                RelationshipResult::new(fallback_center(), related)
            }
            RelationshipPayload::Full {
                center,
                related,
                total_count,
                stats,
            } => {
                let mut center = center.unwrap_or_else(fallback_center);
                if center.name.trim().is_empty() {
                    center.name = name.to_string();
                }
                center.role.get_or_insert(role);

                let stats = stats.map(|wire| {
                    let counted = RelationshipStats::from_related(&related);
                    RelationshipStats {
                        total: wire.total.or(total_count).unwrap_or(counted.total),
                        with_location: wire.with_location.unwrap_or(counted.with_location),
                        with_logo: wire.with_logo.unwrap_or(counted.with_logo),
                    }
                });

                RelationshipResult {
                    center,
                    related,
                    stats,
                }
            }
        }
    }
}

/// `CompanyDirectory` backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base_url: Url,
    layout: RelationshipLayout,
    include_stats: bool,
}

impl HttpDirectory {
    pub fn new(base_url: &str, layout: RelationshipLayout) -> Result<Self> {
        Self::with_timeout(base_url, layout, Duration::from_secs(10))
    }

    pub fn with_timeout(base_url: &str, layout: RelationshipLayout, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ConnectionsError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConnectionsError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("connections-map/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            layout,
            include_stats: false,
        })
    }

    /// Ask relationship endpoints for their `stats` block.
    pub fn with_stats(mut self, include_stats: bool) -> Self {
        self.include_stats = include_stats;
        self
    }

    fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
        // `url` drops dot segments instead of encoding them
        if let Some(dot) = segments
            .iter()
            .map(AsRef::as_ref)
            .find(|s| matches!(*s, "." | ".."))
        {
            return Err(ConnectionsError::ValidationError {
                message: format!("'{}' cannot be used as a company name in a URL path", dot),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConnectionsError::ConfigError {
                message: format!("base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments.iter().map(|s| s.as_ref()));
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(ConnectionsError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CompanyDirectory for HttpDirectory {
    async fn search(&self, scope: SearchScope, term: &str) -> Result<Vec<SearchHit>> {
        let url = self.endpoint(&["api", "search", scope.path_segment()])?;
        let payload: SearchPayload = self.get_json(url, &[("q", term)]).await?;

        let items = match payload {
            SearchPayload::Bare(items) | SearchPayload::Wrapped { results: items } => items,
        };

        let hits: Vec<SearchHit> = items
            .into_iter()
            .filter_map(|item| match item {
                SearchItem::Name(name) => {
                    let name = name.trim();
                    if name.is_empty() {
                        return None;
                    }
                    Some(SearchHit {
                        role: scope.implied_role(),
                        ..SearchHit::named(name)
                    })
                }
                SearchItem::Summary(entity) => {
                    let name = entity.name.trim();
                    if name.is_empty() {
                        return None;
                    }
                    Some(SearchHit {
                        name: name.to_string(),
                        role: entity.role.or(scope.implied_role()),
                        domain: entity.domain().map(str::to_string),
                        logo: entity.logo().map(str::to_string),
                    })
                }
            })
            .collect();

        tracing::debug!("Search {:?} '{}' returned {} hits", scope, term, hits.len());
        Ok(hits)
    }

    async fn relationships(&self, name: &str, role: Role) -> Result<RelationshipResult> {
        let url = self.endpoint(&self.layout.segments(name, role))?;
        let query: &[(&str, &str)] = if self.include_stats {
            &[("include_stats", "true")]
        } else {
            &[]
        };

        let payload: RelationshipPayload = self.get_json(url, query).await?;
        Ok(payload.into_result(name, role))
    }

    async fn map_config(&self) -> Result<MapConfig> {
        let url = self.endpoint(&["api", "config", "map"])?;
        self.get_json(url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> RelationshipResult {
        let payload: RelationshipPayload = serde_json::from_value(value).unwrap();
        payload.into_result("Acme", Role::ServiceProvider)
    }

    #[test]
    fn test_endpoint_encodes_name_as_one_segment() {
        let directory = HttpDirectory::new("http://localhost:8000/", RelationshipLayout::Legacy).unwrap();
        let url = directory
            .endpoint(&directory.layout.segments("AT&T / Mobility", Role::ServiceProvider))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/vendor/AT&T%20%2F%20Mobility/clients"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let directory =
            HttpDirectory::new("https://example.com/proxy", RelationshipLayout::Relationships).unwrap();
        let url = directory
            .endpoint(&directory.layout.segments("Globex", Role::Client))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/proxy/api/relationships/client/Globex"
        );
    }

    #[test]
    fn test_endpoint_rejects_dot_segments() {
        let directory = HttpDirectory::new("http://localhost:8000", RelationshipLayout::Legacy).unwrap();
        for name in [".", ".."] {
            let err = directory
                .endpoint(&directory.layout.segments(name, Role::ServiceProvider))
                .unwrap_err();
            assert!(matches!(err, ConnectionsError::ValidationError { .. }));
        }
        assert!(directory
            .endpoint(&directory.layout.segments("...", Role::ServiceProvider))
            .is_ok());
    }

    #[test]
    fn test_bare_list_payload_uses_selected_name() {
        let result = parse(serde_json::json!([{"name": "Client One"}]));
        assert_eq!(result.center.name, "Acme");
        assert_eq!(result.center.role, Some(Role::ServiceProvider));
        assert_eq!(result.related.len(), 1);
    }

    #[test]
    fn test_null_center_payload() {
        let result = parse(serde_json::json!({"center": null, "related": []}));
        assert_eq!(result.center.name, "Acme");
        assert!(result.related.is_empty());
        assert!(result.stats.is_none());
    }

    #[test]
    fn test_clients_alias_and_stats() {
        let result = parse(serde_json::json!({
            "clients": [{"name": "A", "latitude": 1.0, "longitude": 2.0}, {"name": "B"}],
            "total_count": 2,
            "stats": {"with_location": 1, "with_logo": 0}
        }));
        assert_eq!(result.related.len(), 2);
        assert_eq!(
            result.stats,
            Some(RelationshipStats {
                total: 2,
                with_location: 1,
                with_logo: 0
            })
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(HttpDirectory::new("mailto:someone@example.com", RelationshipLayout::Legacy).is_err());
        assert!(HttpDirectory::new("not a url", RelationshipLayout::Legacy).is_err());
    }
}
