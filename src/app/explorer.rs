use crate::adapters::{HttpDirectory, SceneMap};
use crate::config::AppConfig;
use crate::core::renderer::{MapPanel, RelationshipRenderer};
use crate::core::selector::SelectorController;
use crate::domain::ports::CompanyDirectory;
use crate::utils::error::{ConnectionsError, Result};
use crate::utils::validation::Validate;
use std::path::Path;

/// Selector wired to the REST backend and the in-memory scene.
pub type HttpExplorer = SelectorController<HttpDirectory, SceneMap>;

/// Builds the renderer from the backend map config. A failed fetch or a
/// missing access token leaves the map disabled instead of failing.
pub async fn initialize_renderer<D: CompanyDirectory>(
    directory: &D,
    config: &AppConfig,
) -> RelationshipRenderer<SceneMap> {
    let style = config.render_style();
    let (width, height) = (config.render.viewport_width, config.render.viewport_height);

    let scene = match directory.map_config().await {
        Ok(map_config) => SceneMap::initialize(&map_config, width, height),
        Err(e) => Err(e),
    };

    match scene {
        Ok(scene) => {
            tracing::debug!("Map initialized at zoom {}", scene.viewport().zoom);
            RelationshipRenderer::new(scene, style)
        }
        Err(e) => {
            tracing::warn!("Map initialization failed, visualization disabled: {}", e);
            RelationshipRenderer::without_map(e.user_friendly_message(), style)
        }
    }
}

pub async fn connect(config: &AppConfig) -> Result<HttpExplorer> {
    config.validate()?;

    let directory = HttpDirectory::with_timeout(&config.api.base_url, config.api.layout, config.timeout())?
        .with_stats(config.api.include_stats);
    let renderer = initialize_renderer(&directory, config).await;

    Ok(SelectorController::new(
        directory,
        renderer,
        config.selector_settings(),
    ))
}

/// Writes the current scene to `path`. Returns the number of features written.
pub async fn export_geojson<D: CompanyDirectory, P: AsRef<Path>>(
    controller: &SelectorController<D, SceneMap>,
    path: P,
) -> Result<usize> {
    let renderer = controller.renderer().await;
    let scene = match (renderer.map(), renderer.map_panel()) {
        (Some(scene), _) => scene,
        (None, MapPanel::Unavailable { message }) => {
            return Err(ConnectionsError::MapUnavailable { reason: message })
        }
        (None, MapPanel::Ready) => {
            return Err(ConnectionsError::MapUnavailable {
                reason: "no map surface".to_string(),
            })
        }
    };

    let mut geojson = scene.to_geojson();
    let features = geojson["features"].as_array().map_or(0, Vec::len);
    geojson["properties"]["generated_at"] =
        serde_json::Value::String(chrono::Utc::now().to_rfc3339());

    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, serde_json::to_string_pretty(&geojson)?)?;

    tracing::info!(
        "Wrote {} features to {}",
        features,
        path.as_ref().display()
    );
    Ok(features)
}
