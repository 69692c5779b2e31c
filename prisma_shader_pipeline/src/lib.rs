/*!
# Prisma Shader Pipeline

Stage composition and resource binding for shader pipelines, sitting
directly on top of a native graphics device API.

A pipeline is a compile-time-fixed set of shader stages: the stage list is
a tuple of marker types validated in const context, so a duplicated stage
kind, or a set missing the vertex or pixel stage, is rejected by the
compiler rather than at runtime. Each initialized stage carries its own
name-addressed tables of constant buffers, read-only shader resources, and
samplers, each entry pinned to the numeric slot the compiled shader code
expects.

The native API is consumed through narrow traits (`GraphicsDevice`,
`DeviceContext`, and the native object traits); backend crates implement
them. Shader compilation, texture/sampler creation, and command submission
live behind those seams and are not implemented here.

## Architecture

- **ShaderPipeline**: compile-time-validated aggregate of stage objects
- **ShaderStage**: one compiled shader and its three resource tables
- **ConstantBufferManager / ShaderResourceManager / SamplerManager**:
  per-stage named slot tables
- **UniformManager**: cross-stage constant buffer facade
- **GraphicsDevice / DeviceContext**: the native API boundary
*/

// Internal modules
mod error;
pub mod log;
pub mod gpu;
pub mod pipeline;
pub mod binding;

// Main prisma namespace module
pub mod prisma {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module
    pub mod log {
        pub use crate::log::{
            dispatch, dispatch_detailed, reset_logger, set_logger, DefaultLogger, LogEntry,
            LogSeverity, Logger,
        };
    }

    // GPU abstraction sub-module
    pub mod gpu {
        pub use crate::gpu::*;
    }

    // Pipeline sub-module
    pub mod pipeline {
        pub use crate::pipeline::*;
    }

    // Binding sub-module
    pub mod binding {
        pub use crate::binding::*;
    }
}

// Re-export math library at crate root
pub use glam;
