pub mod explorer;

pub use explorer::{connect, export_geojson, initialize_renderer, HttpExplorer};
