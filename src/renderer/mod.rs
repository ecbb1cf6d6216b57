//! WebGPU rendering module
//!
//! The scene is rebuilt as one triangle list every frame and drawn with a
//! single flat-color pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::Scene;
pub use vertex::Vertex;
