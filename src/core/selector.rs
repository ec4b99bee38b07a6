use crate::core::renderer::{RelationshipRenderer, RenderSummary};
use crate::domain::model::{Role, SearchHit, SearchScope, Selection};
use crate::domain::ports::{CompanyDirectory, MapSurface};
use crate::utils::error::{ConnectionsError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorSettings {
    pub debounce: Duration,
    pub min_query_length: usize,
    pub cache_results: bool,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            min_query_length: 1,
            cache_results: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Hits(Vec<SearchHit>),
    /// A later query started before this one finished.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Rendered(RenderSummary),
    /// A later selection or a clear happened while the fetch was in flight.
    Superseded,
}

/// Text shown in place of results when a relationship fetch fails.
pub fn fetch_failure_message(role: Role) -> String {
    format!("Failed to fetch {}", role.counterpart().noun(2))
}

/// Text shown in place of dropdown results when a search fails.
pub fn search_failure_message(scope: SearchScope) -> String {
    format!("Failed to search {}", scope.path_segment())
}

/// Resolves the role of a dropdown hit, falling back to the scope it came from.
pub fn selection_for(hit: &SearchHit, scope: SearchScope) -> Result<Selection> {
    let role = hit
        .role
        .or(scope.implied_role())
        .ok_or_else(|| ConnectionsError::ValidationError {
            message: format!("search hit '{}' has no company type", hit.name),
        })?;
    Ok(Selection::new(hit.name.clone(), role))
}

/// Drives the search dropdowns and hands relationship results to the renderer.
///
/// Queries are debounced per scope and cached per scope and term. Selections
/// share one request token; only the response for the newest token is rendered.
pub struct SelectorController<D: CompanyDirectory, M: MapSurface> {
    directory: D,
    renderer: Mutex<RelationshipRenderer<M>>,
    settings: SelectorSettings,
    cache: Mutex<HashMap<(SearchScope, String), Vec<SearchHit>>>,
    /// One debounce counter per scope; each dropdown supersedes only itself.
    query_generations: [AtomicU64; 3],
    request_token: AtomicU64,
}

impl<D: CompanyDirectory, M: MapSurface> SelectorController<D, M> {
    pub fn new(directory: D, renderer: RelationshipRenderer<M>, settings: SelectorSettings) -> Self {
        Self {
            directory,
            renderer: Mutex::new(renderer),
            settings,
            cache: Mutex::new(HashMap::new()),
            query_generations: Default::default(),
            request_token: AtomicU64::new(0),
        }
    }

    pub async fn renderer(&self) -> MutexGuard<'_, RelationshipRenderer<M>> {
        self.renderer.lock().await
    }

    fn query_generation(&self, scope: SearchScope) -> &AtomicU64 {
        match scope {
            SearchScope::Vendors => &self.query_generations[0],
            SearchScope::Clients => &self.query_generations[1],
            SearchScope::Companies => &self.query_generations[2],
        }
    }

    pub async fn query(&self, scope: SearchScope, term: &str) -> Result<Lookup> {
        let counter = self.query_generation(scope);
        let generation = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let term = term.trim();

        if term.chars().count() < self.settings.min_query_length {
            return Ok(Lookup::Hits(Vec::new()));
        }

        if !self.settings.debounce.is_zero() {
            tokio::time::sleep(self.settings.debounce).await;
        }
        if counter.load(Ordering::SeqCst) != generation {
            tracing::debug!("Query '{}' superseded during debounce", term);
            return Ok(Lookup::Superseded);
        }

        let key = (scope, term.to_string());
        if self.settings.cache_results {
            if let Some(hits) = self.cache.lock().await.get(&key) {
                tracing::debug!("Cache hit for {:?} '{}'", scope, term);
                return Ok(Lookup::Hits(hits.clone()));
            }
        }

        let hits = match self.directory.search(scope, term).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!("{} for '{}': {}", search_failure_message(scope), term, e);
                return Err(e);
            }
        };

        if self.settings.cache_results {
            self.cache.lock().await.insert(key, hits.clone());
        }

        if counter.load(Ordering::SeqCst) != generation {
            tracing::debug!("Query '{}' superseded while in flight", term);
            return Ok(Lookup::Superseded);
        }
        Ok(Lookup::Hits(hits))
    }

    pub async fn on_select(&self, selection: &Selection) -> Result<SelectionOutcome> {
        let token = self.request_token.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            "Fetching {} of {}",
            selection.role.counterpart().noun(2),
            selection.name
        );

        let fetched = self
            .directory
            .relationships(&selection.name, selection.role)
            .await;

        let mut renderer = self.renderer.lock().await;
        if self.request_token.load(Ordering::SeqCst) != token {
            tracing::warn!("Discarding stale response for {}", selection.name);
            return Ok(SelectionOutcome::Superseded);
        }

        match fetched {
            Ok(result) => Ok(SelectionOutcome::Rendered(
                renderer.render(&result, selection.role),
            )),
            Err(e) => {
                tracing::error!("Relationship fetch for {} failed: {}", selection.name, e);
                renderer.render_error(fetch_failure_message(selection.role));
                Err(e)
            }
        }
    }

    /// Drops any pending selection and clears the visualization. Returns the
    /// number of map elements removed.
    pub async fn on_clear(&self) -> usize {
        self.request_token.fetch_add(1, Ordering::SeqCst);
        let removed = self.renderer.lock().await.reset();
        tracing::debug!("Selection cleared, removed {} map elements", removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            fetch_failure_message(Role::ServiceProvider),
            "Failed to fetch clients"
        );
        assert_eq!(
            fetch_failure_message(Role::Client),
            "Failed to fetch service providers"
        );
        assert_eq!(
            search_failure_message(SearchScope::Vendors),
            "Failed to search vendors"
        );
    }

    #[test]
    fn test_selection_for_hit() {
        let hit = SearchHit::named("Acme");
        let selection = selection_for(&hit, SearchScope::Vendors).unwrap();
        assert_eq!(selection.role, Role::ServiceProvider);

        assert!(selection_for(&hit, SearchScope::Companies).is_err());

        let typed = SearchHit {
            role: Some(Role::Client),
            ..SearchHit::named("Globex")
        };
        assert_eq!(
            selection_for(&typed, SearchScope::Companies).unwrap().role,
            Role::Client
        );
    }
}
