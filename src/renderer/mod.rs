//! WebGPU rendering module
//!
//! The scene is rebuilt from a simulation snapshot every frame and drawn as
//! one triangle list.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
