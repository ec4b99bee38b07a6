pub mod geometry;
pub mod renderer;
pub mod selector;
pub mod visualization;

pub use crate::domain::model::{Entity, RelationshipResult, Role, SearchHit, SearchScope, Selection};
pub use crate::domain::ports::{CompanyDirectory, MapSurface};
pub use crate::utils::error::Result;
