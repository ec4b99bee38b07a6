use crate::domain::model::MarkerHandle;
use crate::domain::ports::MapSurface;

/// Markers and connector layers currently drawn for one result set.
#[derive(Debug, Default)]
pub struct MapVisualizationState {
    markers: Vec<MarkerHandle>,
    center: Option<MarkerHandle>,
    connectors: Vec<String>,
}

impl MapVisualizationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_marker(&mut self, handle: MarkerHandle, is_center: bool) {
        if is_center {
            self.center = Some(handle);
        }
        self.markers.push(handle);
    }

    pub fn track_connector(&mut self, id: String) {
        self.connectors.push(id);
    }

    pub fn markers(&self) -> &[MarkerHandle] {
        &self.markers
    }

    pub fn connectors(&self) -> &[String] {
        &self.connectors
    }

    /// Removes everything tracked from `map`. Returns how many elements went away.
    pub fn teardown<M: MapSurface + ?Sized>(&mut self, map: &mut M) -> usize {
        let mut removed = 0;
        self.center = None;

        for handle in self.markers.drain(..) {
            map.remove_marker(handle);
            removed += 1;
        }

        for id in self.connectors.drain(..) {
            // the layer may already be gone if the surface was reset underneath us
            if map.has_connector(&id) {
                map.remove_connector(&id);
            }
            removed += 1;
        }

        removed
    }

    pub fn center_marker(&self) -> Option<MarkerHandle> {
        self.center
    }

    pub fn contains_marker(&self, handle: MarkerHandle) -> bool {
        self.markers.contains(&handle)
    }
}
