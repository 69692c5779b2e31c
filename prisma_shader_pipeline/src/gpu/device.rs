/// GraphicsDevice and DeviceContext traits - the native API boundary

use std::sync::Arc;

use crate::error::Result;
use crate::gpu::{
    BufferDesc, CompiledShader, NativeBuffer, ResourceView, SamplerState, ShaderModule,
    ShaderSourceDesc, StageKind,
};

/// Creation authority for native GPU objects
///
/// This is the subsystem's only inbound creation dependency: it compiles or
/// loads shaders and creates constant buffers. It is borrowed per call and
/// never stored.
pub trait GraphicsDevice {
    /// Compile a shader from source text
    ///
    /// # Arguments
    ///
    /// * `desc` - Stage kind, source text, target profile, and entry point
    ///
    /// # Returns
    ///
    /// The native module together with its raw byte code
    fn compile_shader(&self, desc: &ShaderSourceDesc<'_>) -> Result<CompiledShader>;

    /// Load a shader from precompiled byte code
    fn load_shader(&self, kind: StageKind, bytecode: &[u8]) -> Result<CompiledShader>;

    /// Create a constant buffer
    ///
    /// # Arguments
    ///
    /// * `desc` - Size, mutability, and CPU access rights
    /// * `init_data` - Initial contents; mandatory for immutable buffers
    fn create_constant_buffer(
        &self,
        desc: &BufferDesc,
        init_data: Option<&[u8]>,
    ) -> Result<Arc<dyn NativeBuffer>>;
}

/// Execution-context handle used to issue bind, unbind, and update commands
///
/// Borrowed for the duration of each call only. Passing `None` as the
/// object for any bind call clears the binding at that slot (the null-bind
/// idiom of the underlying APIs).
pub trait DeviceContext {
    /// Bind (or with `None`, unbind) a shader program for a stage kind
    fn bind_shader(
        &mut self,
        kind: StageKind,
        module: Option<&Arc<dyn ShaderModule>>,
    ) -> Result<()>;

    /// Bind (or clear) a constant buffer at a stage's numbered slot
    fn bind_constant_buffer(
        &mut self,
        kind: StageKind,
        slot: u32,
        buffer: Option<&Arc<dyn NativeBuffer>>,
    ) -> Result<()>;

    /// Bind (or clear) a read-only shader resource at a stage's numbered slot
    fn bind_shader_resource(
        &mut self,
        kind: StageKind,
        slot: u32,
        view: Option<&Arc<dyn ResourceView>>,
    ) -> Result<()>;

    /// Bind (or clear) a sampler state at a stage's numbered slot
    fn bind_sampler(
        &mut self,
        kind: StageKind,
        slot: u32,
        sampler: Option<&Arc<dyn SamplerState>>,
    ) -> Result<()>;

    /// Replace the full contents of a dynamic buffer
    fn update_buffer(&mut self, buffer: &Arc<dyn NativeBuffer>, data: &[u8]) -> Result<()>;
}
