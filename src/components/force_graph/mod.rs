mod component;
mod render;
pub mod scale;
mod schedule;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use types::RenderGraph;
