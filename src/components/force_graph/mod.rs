mod cluster;
mod component;
mod model;
mod render;
mod state;
mod types;
mod viewport;

pub use component::ForceGraphCanvas;
pub use model::RenderModelCache;
pub use types::{Edge, RenderConfig, RenderModel, VertexId};
