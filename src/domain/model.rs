use serde::{Deserialize, Serialize};

/// Which side of a relationship a company sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "vendor")]
    ServiceProvider,
    Client,
}

impl Role {
    /// Role of the companies returned for a center with this role.
    pub fn counterpart(self) -> Role {
        match self {
            Role::ServiceProvider => Role::Client,
            Role::Client => Role::ServiceProvider,
        }
    }

    pub fn noun(self, count: usize) -> &'static str {
        match (self, count == 1) {
            (Role::ServiceProvider, true) => "service provider",
            (Role::ServiceProvider, false) => "service providers",
            (Role::Client, true) => "client",
            (Role::Client, false) => "clients",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun(1))
    }
}

/// Which search endpoint a selector queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Vendors,
    Clients,
    Companies,
}

impl SearchScope {
    pub fn path_segment(self) -> &'static str {
        match self {
            SearchScope::Vendors => "vendors",
            SearchScope::Clients => "clients",
            SearchScope::Companies => "companies",
        }
    }

    /// Role every hit of this scope has, if the scope is single-sided.
    pub fn implied_role(self) -> Option<Role> {
        match self {
            SearchScope::Vendors => Some(Role::ServiceProvider),
            SearchScope::Clients => Some(Role::Client),
            SearchScope::Companies => None,
        }
    }
}

impl std::str::FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vendors" | "vendor" => Ok(SearchScope::Vendors),
            "clients" | "client" => Ok(SearchScope::Clients),
            "companies" | "company" | "all" => Ok(SearchScope::Companies),
            other => Err(format!("unknown search scope: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A vendor or client company as the backend describes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Entity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, lon: f64, lat: f64) -> Self {
        self.longitude = Some(lon);
        self.latitude = Some(lat);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "Unknown Company"
        } else {
            name
        }
    }

    /// Position when both coordinates are present and in range.
    pub fn position(&self) -> Option<LngLat> {
        let point = LngLat::new(self.longitude?, self.latitude?);
        point.is_valid().then_some(point)
    }

    pub fn domain(&self) -> Option<&str> {
        non_blank(self.domain.as_deref())
    }

    pub fn logo(&self) -> Option<&str> {
        non_blank(self.logo.as_deref())
    }

    pub fn domain_link(&self) -> Option<DomainLink> {
        let domain = self.domain()?;
        let href = if domain.starts_with("http") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        };
        Some(DomainLink {
            label: domain.to_string(),
            href,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainLink {
    pub label: String,
    pub href: String,
}

/// One entry of a search dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub role: Option<Role>,
    pub domain: Option<String>,
    pub logo: Option<String>,
}

impl SearchHit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            domain: None,
            logo: None,
        }
    }
}

/// A company picked from the dropdown, ready for a relationship lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub role: Role,
}

impl Selection {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipStats {
    pub total: usize,
    pub with_location: usize,
    pub with_logo: usize,
}

impl RelationshipStats {
    pub fn from_related(related: &[Entity]) -> Self {
        Self {
            total: related.len(),
            with_location: related.iter().filter(|e| e.position().is_some()).count(),
            with_logo: related.iter().filter(|e| e.logo().is_some()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipResult {
    pub center: Entity,
    pub related: Vec<Entity>,
    pub stats: Option<RelationshipStats>,
}

impl RelationshipResult {
    pub fn new(center: Entity, related: Vec<Entity>) -> Self {
        Self {
            center,
            related,
            stats: None,
        }
    }

    /// Backend-provided stats if any, otherwise counted from `related`.
    pub fn stats(&self) -> RelationshipStats {
        self.stats
            .unwrap_or_else(|| RelationshipStats::from_related(&self.related))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(default = "default_map_center")]
    pub center: [f64; 2],
    #[serde(default = "default_map_zoom")]
    pub zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

fn default_map_center() -> [f64; 2] {
    [-98.5795, 39.8283]
}

fn default_map_zoom() -> f64 {
    3.0
}

impl MapConfig {
    pub fn center(&self) -> LngLat {
        LngLat::new(self.center[0], self.center[1])
    }

    pub fn access_token(&self) -> Option<&str> {
        non_blank(self.access_token.as_deref())
    }
}

// Map primitives handed to a `MapSurface`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerIcon {
    Logo { url: String },
    Dot { color: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub name: String,
    pub position: LngLat,
    pub domain: Option<String>,
    pub is_center: bool,
    pub size_px: u32,
    pub icon: MarkerIcon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorSpec {
    pub id: String,
    pub path: Vec<LngLat>,
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl Bounds {
    pub fn from_point(point: LngLat) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub fn extend(&mut self, point: LngLat) {
        self.south_west.lon = self.south_west.lon.min(point.lon);
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.north_east.lon = self.north_east.lon.max(point.lon);
        self.north_east.lat = self.north_east.lat.max(point.lat);
    }

    pub fn from_points<I: IntoIterator<Item = LngLat>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitOptions {
    pub padding: f64,
    pub max_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: 50.0,
            max_zoom: 15.0,
        }
    }
}
