/// Shader stage kinds, compile descriptors, and the compiled-shader handle

use std::any::Any;
use std::sync::Arc;

/// Shader pipeline stage kind
///
/// The closed set of programmable graphics stages a pipeline may contain.
/// Used both as a compile-time discriminator (see the stage marker types in
/// [`crate::pipeline`]) and as the key for per-stage bind calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Vertex shader
    Vertex,
    /// Pixel/fragment shader
    Pixel,
    /// Geometry shader
    Geometry,
    /// Hull (tessellation control) shader
    Hull,
    /// Domain (tessellation evaluation) shader
    Domain,
}

impl StageKind {
    /// Default compile target profile for this stage kind (shader model 5)
    pub fn default_profile(self) -> &'static str {
        match self {
            StageKind::Vertex => "vs_5_0",
            StageKind::Pixel => "ps_5_0",
            StageKind::Geometry => "gs_5_0",
            StageKind::Hull => "hs_5_0",
            StageKind::Domain => "ds_5_0",
        }
    }
}

/// Descriptor for compiling a shader from source text
#[derive(Debug, Clone)]
pub struct ShaderSourceDesc<'a> {
    /// Stage kind the shader is compiled for
    pub kind: StageKind,
    /// Shader source text
    pub source: &'a str,
    /// Compile target profile (e.g. "vs_5_0")
    pub profile: &'a str,
    /// Entry point function name
    pub entry_point: &'a str,
}

/// Native shader object trait
///
/// Implemented by backend-specific shader types. The module is released
/// when the last reference is dropped.
pub trait ShaderModule: Send + Sync {
    /// Stage kind this module was compiled for
    fn stage_kind(&self) -> StageKind;

    /// Backend-recovery accessor
    fn as_any(&self) -> &dyn Any;
}

/// A compiled shader unit: the native module plus its raw byte code
///
/// The byte code is retained so the vertex stage's copy can feed external
/// input-layout derivation.
pub struct CompiledShader {
    /// Native shader module
    pub module: Arc<dyn ShaderModule>,
    /// Raw compiled byte code
    pub bytecode: Vec<u8>,
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
