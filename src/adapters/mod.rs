// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod scene;

pub use http::{HttpDirectory, RelationshipLayout};
pub use scene::SceneMap;
