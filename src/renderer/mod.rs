//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into one flat-coloured triangle list
//! per frame and drawn with a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
