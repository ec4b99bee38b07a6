pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HttpDirectory, RelationshipLayout, SceneMap};
pub use crate::app::{connect, HttpExplorer};
pub use crate::config::AppConfig;
pub use crate::core::renderer::{Panel, RelationshipRenderer, RenderStyle, RenderSummary};
pub use crate::core::selector::{Lookup, SelectionOutcome, SelectorController, SelectorSettings};
pub use crate::domain::model::{Entity, RelationshipResult, Role, SearchHit, SearchScope, Selection};
pub use crate::utils::error::{ConnectionsError, Result};
