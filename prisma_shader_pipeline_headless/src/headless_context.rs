/// HeadlessContext - CPU-side implementation of the DeviceContext trait
///
/// Tracks the bound object id per stage and per (stage, slot) for each of
/// the three bind spaces, plus an ordered command log. Objects must come
/// from a HeadlessDevice; anything else is rejected.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use prisma_shader_pipeline::gpu::{
    BufferUsage, DeviceContext, NativeBuffer, ResourceView, SamplerState, ShaderModule, StageKind,
};
use prisma_shader_pipeline::prisma::Result;
use prisma_shader_pipeline::prisma_bail;

use crate::headless_objects::{
    HeadlessBuffer, HeadlessResourceView, HeadlessSampler, HeadlessShaderModule,
};

/// Headless execution context with full bound-state inspection
pub struct HeadlessContext {
    bound_shaders: FxHashMap<StageKind, u64>,
    bound_constant_buffers: FxHashMap<(StageKind, u32), u64>,
    bound_resources: FxHashMap<(StageKind, u32), u64>,
    bound_samplers: FxHashMap<(StageKind, u32), u64>,
    commands: Vec<String>,
}

impl HeadlessContext {
    /// Create a context with no bindings
    pub fn new() -> Self {
        Self {
            bound_shaders: FxHashMap::default(),
            bound_constant_buffers: FxHashMap::default(),
            bound_resources: FxHashMap::default(),
            bound_samplers: FxHashMap::default(),
            commands: Vec::new(),
        }
    }

    /// Id of the shader bound for a stage kind, if any
    pub fn bound_shader(&self, kind: StageKind) -> Option<u64> {
        self.bound_shaders.get(&kind).copied()
    }

    /// Id of the constant buffer bound at a stage's slot, if any
    pub fn bound_constant_buffer(&self, kind: StageKind, slot: u32) -> Option<u64> {
        self.bound_constant_buffers.get(&(kind, slot)).copied()
    }

    /// Id of the resource view bound at a stage's slot, if any
    pub fn bound_shader_resource(&self, kind: StageKind, slot: u32) -> Option<u64> {
        self.bound_resources.get(&(kind, slot)).copied()
    }

    /// Id of the sampler bound at a stage's slot, if any
    pub fn bound_sampler(&self, kind: StageKind, slot: u32) -> Option<u64> {
        self.bound_samplers.get(&(kind, slot)).copied()
    }

    /// True when no binding of any kind is active
    pub fn is_pristine(&self) -> bool {
        self.bound_shaders.is_empty()
            && self.bound_constant_buffers.is_empty()
            && self.bound_resources.is_empty()
            && self.bound_samplers.is_empty()
    }

    /// Every call issued on this context, in order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceContext for HeadlessContext {
    fn bind_shader(
        &mut self,
        kind: StageKind,
        module: Option<&Arc<dyn ShaderModule>>,
    ) -> Result<()> {
        match module {
            Some(module) => {
                let headless = match module.as_any().downcast_ref::<HeadlessShaderModule>() {
                    Some(headless) => headless,
                    None => prisma_bail!(Backend, "prisma::headless",
                        "bind_shader: module was not created by a headless device"),
                };
                self.bound_shaders.insert(kind, headless.id());
                self.commands
                    .push(format!("bind_shader({:?}, #{})", kind, headless.id()));
            }
            None => {
                self.bound_shaders.remove(&kind);
                self.commands.push(format!("unbind_shader({:?})", kind));
            }
        }
        Ok(())
    }

    fn bind_constant_buffer(
        &mut self,
        kind: StageKind,
        slot: u32,
        buffer: Option<&Arc<dyn NativeBuffer>>,
    ) -> Result<()> {
        match buffer {
            Some(buffer) => {
                let headless = match buffer.as_any().downcast_ref::<HeadlessBuffer>() {
                    Some(headless) => headless,
                    None => prisma_bail!(Backend, "prisma::headless",
                        "bind_constant_buffer: buffer was not created by a headless device"),
                };
                self.bound_constant_buffers.insert((kind, slot), headless.id());
                self.commands.push(format!(
                    "bind_constant_buffer({:?}, {}, #{})",
                    kind, slot, headless.id()
                ));
            }
            None => {
                self.bound_constant_buffers.remove(&(kind, slot));
                self.commands
                    .push(format!("unbind_constant_buffer({:?}, {})", kind, slot));
            }
        }
        Ok(())
    }

    fn bind_shader_resource(
        &mut self,
        kind: StageKind,
        slot: u32,
        view: Option<&Arc<dyn ResourceView>>,
    ) -> Result<()> {
        match view {
            Some(view) => {
                let headless = match view.as_any().downcast_ref::<HeadlessResourceView>() {
                    Some(headless) => headless,
                    None => prisma_bail!(Backend, "prisma::headless",
                        "bind_shader_resource: view was not created by a headless device"),
                };
                self.bound_resources.insert((kind, slot), headless.id());
                self.commands.push(format!(
                    "bind_shader_resource({:?}, {}, #{})",
                    kind, slot, headless.id()
                ));
            }
            None => {
                self.bound_resources.remove(&(kind, slot));
                self.commands
                    .push(format!("unbind_shader_resource({:?}, {})", kind, slot));
            }
        }
        Ok(())
    }

    fn bind_sampler(
        &mut self,
        kind: StageKind,
        slot: u32,
        sampler: Option<&Arc<dyn SamplerState>>,
    ) -> Result<()> {
        match sampler {
            Some(sampler) => {
                let headless = match sampler.as_any().downcast_ref::<HeadlessSampler>() {
                    Some(headless) => headless,
                    None => prisma_bail!(Backend, "prisma::headless",
                        "bind_sampler: sampler was not created by a headless device"),
                };
                self.bound_samplers.insert((kind, slot), headless.id());
                self.commands.push(format!(
                    "bind_sampler({:?}, {}, #{})",
                    kind, slot, headless.id()
                ));
            }
            None => {
                self.bound_samplers.remove(&(kind, slot));
                self.commands
                    .push(format!("unbind_sampler({:?}, {})", kind, slot));
            }
        }
        Ok(())
    }

    fn update_buffer(&mut self, buffer: &Arc<dyn NativeBuffer>, data: &[u8]) -> Result<()> {
        let headless = match buffer.as_any().downcast_ref::<HeadlessBuffer>() {
            Some(headless) => headless,
            None => prisma_bail!(Backend, "prisma::headless",
                "update_buffer: buffer was not created by a headless device"),
        };
        if headless.usage() != BufferUsage::Dynamic {
            prisma_bail!(Backend, "prisma::headless",
                "update_buffer: buffer #{} is not dynamic", headless.id());
        }
        if data.len() != headless.byte_size() as usize {
            prisma_bail!(Backend, "prisma::headless",
                "update_buffer: data is {} bytes, buffer #{} holds {}",
                data.len(), headless.id(), headless.byte_size());
        }
        *headless.contents.lock().unwrap() = data.to_vec();
        self.commands
            .push(format!("update_buffer(#{}, {} bytes)", headless.id(), data.len()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "headless_context_tests.rs"]
mod tests;
