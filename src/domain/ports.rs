use crate::domain::model::{
    Bounds, ConnectorSpec, FitOptions, MapConfig, MarkerHandle, MarkerIcon, MarkerSpec,
    RelationshipResult, Role, SearchHit, SearchScope,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Remote source of companies and their relationships.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn search(&self, scope: SearchScope, term: &str) -> Result<Vec<SearchHit>>;

    /// Counterparties of `name`: clients of a service provider, vendors of a client.
    async fn relationships(&self, name: &str, role: Role) -> Result<RelationshipResult>;

    async fn map_config(&self) -> Result<MapConfig>;
}

/// Drawing surface of a map library.
pub trait MapSurface: Send {
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);
    fn set_marker_icon(&mut self, handle: MarkerHandle, icon: MarkerIcon);

    fn add_connector(&mut self, connector: ConnectorSpec);
    fn has_connector(&self, id: &str) -> bool;
    fn remove_connector(&mut self, id: &str);

    fn fit_bounds(&mut self, bounds: Bounds, options: &FitOptions);
}
