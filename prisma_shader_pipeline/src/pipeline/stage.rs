/// ShaderStage - one compiled shader unit of one stage kind
///
/// Owns the native shader module, the raw compiled byte code, and the three
/// resource managers, each created lazily at most once and owned for the
/// stage's whole lifetime. The managers' native objects are released when
/// the stage is dropped.

use std::sync::Arc;

use crate::binding::{ConstantBufferManager, SamplerManager, ShaderResourceManager};
use crate::error::Result;
use crate::gpu::{CompiledShader, DeviceContext, ShaderModule, StageKind};

/// One compiled shader unit for one stage kind
pub struct ShaderStage {
    kind: StageKind,
    module: Arc<dyn ShaderModule>,
    bytecode: Vec<u8>,
    constant_buffers: Option<ConstantBufferManager>,
    shader_resources: Option<ShaderResourceManager>,
    samplers: Option<SamplerManager>,
}

impl ShaderStage {
    pub(crate) fn new(kind: StageKind, compiled: CompiledShader) -> Self {
        Self {
            kind,
            module: compiled.module,
            bytecode: compiled.bytecode,
            constant_buffers: None,
            shader_resources: None,
            samplers: None,
        }
    }

    /// Stage kind of this shader
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// The native shader module
    pub fn module(&self) -> &Arc<dyn ShaderModule> {
        &self.module
    }

    /// Raw compiled byte code
    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    /// Bind this stage's shader program on the context
    pub fn bind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_shader(self.kind, Some(&self.module))
    }

    /// Clear this stage kind's shader program binding on the context
    pub fn unbind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_shader(self.kind, None)
    }

    /// The constant buffer table, if one has been created
    pub fn constant_buffers(&self) -> Option<&ConstantBufferManager> {
        self.constant_buffers.as_ref()
    }

    /// The constant buffer table, created on first access
    pub fn constant_buffers_mut(&mut self) -> &mut ConstantBufferManager {
        let kind = self.kind;
        self.constant_buffers
            .get_or_insert_with(|| ConstantBufferManager::new(kind))
    }

    /// The shader resource table, if one has been created
    pub fn shader_resources(&self) -> Option<&ShaderResourceManager> {
        self.shader_resources.as_ref()
    }

    /// The shader resource table, created on first access
    pub fn shader_resources_mut(&mut self) -> &mut ShaderResourceManager {
        let kind = self.kind;
        self.shader_resources
            .get_or_insert_with(|| ShaderResourceManager::new(kind))
    }

    /// The sampler table, if one has been created
    pub fn samplers(&self) -> Option<&SamplerManager> {
        self.samplers.as_ref()
    }

    /// The sampler table, created on first access
    pub fn samplers_mut(&mut self) -> &mut SamplerManager {
        let kind = self.kind;
        self.samplers.get_or_insert_with(|| SamplerManager::new(kind))
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
