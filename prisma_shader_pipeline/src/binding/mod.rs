/// Binding module - per-stage resource tables and the cross-stage facade

// Module declarations
pub mod constant_buffer;
pub mod shader_resource;
pub mod sampler;
pub mod uniforms;

// Re-export everything
pub use constant_buffer::*;
pub use shader_resource::*;
pub use sampler::*;
pub use uniforms::*;
