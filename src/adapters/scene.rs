use crate::core::geometry::{fit_viewport, Viewport};
use crate::domain::model::{
    Bounds, ConnectorSpec, FitOptions, MapConfig, MarkerHandle, MarkerIcon, MarkerSpec,
};
use crate::domain::ports::MapSurface;
use crate::utils::error::{ConnectionsError, Result};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// In-memory map: keeps markers, connector layers and the camera, and can
/// dump them as a GeoJSON `FeatureCollection`.
#[derive(Debug, Clone)]
pub struct SceneMap {
    style: Option<String>,
    viewport: Viewport,
    next_handle: u64,
    markers: BTreeMap<MarkerHandle, MarkerSpec>,
    connectors: Vec<ConnectorSpec>,
}

impl SceneMap {
    pub fn new(width: f64, height: f64) -> Self {
        let config = MapConfig {
            access_token: None,
            center: [-98.5795, 39.8283],
            zoom: 3.0,
            style: None,
        };
        Self::from_config(&config, width, height)
    }

    pub fn from_config(config: &MapConfig, width: f64, height: f64) -> Self {
        Self {
            style: config.style.clone(),
            viewport: Viewport {
                center: config.center(),
                zoom: config.zoom,
                width,
                height,
            },
            next_handle: 0,
            markers: BTreeMap::new(),
            connectors: Vec::new(),
        }
    }

    /// Builds the scene for a backend map config, refusing configs without
    /// an access token.
    pub fn initialize(config: &MapConfig, width: f64, height: f64) -> Result<Self> {
        if config.access_token().is_none() {
            return Err(ConnectionsError::MapUnavailable {
                reason: "missing map access token".to_string(),
            });
        }
        Ok(Self::from_config(config, width, height))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerHandle, &MarkerSpec)> {
        self.markers.iter()
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerSpec> {
        self.markers.get(&handle)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn connectors(&self) -> &[ConnectorSpec] {
        &self.connectors
    }

    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .markers
            .iter()
            .map(|(handle, marker)| {
                let (icon, logo, color) = match &marker.icon {
                    MarkerIcon::Logo { url } => ("logo", Some(url.as_str()), None),
                    MarkerIcon::Dot { color } => ("dot", None, Some(color.as_str())),
                };
                json!({
                    "type": "Feature",
                    "id": handle.0,
                    "geometry": {
                        "type": "Point",
                        "coordinates": [marker.position.lon, marker.position.lat],
                    },
                    "properties": {
                        "name": marker.name,
                        "domain": marker.domain,
                        "center": marker.is_center,
                        "size": marker.size_px,
                        "icon": icon,
                        "logo": logo,
                        "color": color,
                    },
                })
            })
            .collect();

        features.extend(self.connectors.iter().map(|connector| {
            let coordinates: Vec<[f64; 2]> =
                connector.path.iter().map(|p| [p.lon, p.lat]).collect();
            json!({
                "type": "Feature",
                "id": connector.id,
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates,
                },
                "properties": {
                    "line-color": connector.color,
                    "line-width": connector.width,
                    "line-opacity": connector.opacity,
                },
            })
        }));

        json!({
            "type": "FeatureCollection",
            "features": features,
            "properties": {
                "style": self.style,
                "center": [self.viewport.center.lon, self.viewport.center.lat],
                "zoom": self.viewport.zoom,
            },
        })
    }
}

impl MapSurface for SceneMap {
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.insert(handle, marker);
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }

    fn set_marker_icon(&mut self, handle: MarkerHandle, icon: MarkerIcon) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.icon = icon;
        }
    }

    fn add_connector(&mut self, connector: ConnectorSpec) {
        // same id replaces the layer, as a map library would refuse duplicates
        self.connectors.retain(|c| c.id != connector.id);
        self.connectors.push(connector);
    }

    fn has_connector(&self, id: &str) -> bool {
        self.connectors.iter().any(|c| c.id == id)
    }

    fn remove_connector(&mut self, id: &str) {
        self.connectors.retain(|c| c.id != id);
    }

    fn fit_bounds(&mut self, bounds: Bounds, options: &FitOptions) {
        self.viewport = fit_viewport(&bounds, self.viewport.width, self.viewport.height, options);
        tracing::debug!(
            "Viewport fitted to zoom {:.2} at ({:.4}, {:.4})",
            self.viewport.zoom,
            self.viewport.center.lat,
            self.viewport.center.lon
        );
    }
}
