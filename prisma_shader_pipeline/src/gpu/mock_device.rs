/// Mock device and context for unit tests (no GPU required)
///
/// The mock device hands out id-tagged native objects and records what it
/// created; the mock context tracks the bound object per stage and slot so
/// tests can assert binding effects and bind/unbind round trips.

#[cfg(test)]
use std::any::Any;
#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
use rustc_hash::FxHashMap;

#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::gpu::{
    BufferDesc, BufferUsage, CompiledShader, DeviceContext, GraphicsDevice, NativeBuffer,
    ResourceView, SamplerState, ShaderModule, ShaderSourceDesc, StageKind,
};
#[cfg(test)]
use crate::prisma_bail;

// ============================================================================
// Mock native objects
// ============================================================================

#[cfg(test)]
pub struct MockShaderModule {
    pub id: u64,
    pub kind: StageKind,
    pub label: String,
}

#[cfg(test)]
impl ShaderModule for MockShaderModule {
    fn stage_kind(&self) -> StageKind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
pub struct MockBuffer {
    pub id: u64,
    pub byte_size: u32,
    pub buffer_usage: BufferUsage,
    pub contents: Mutex<Vec<u8>>,
}

#[cfg(test)]
impl NativeBuffer for MockBuffer {
    fn byte_size(&self) -> u32 {
        self.byte_size
    }

    fn usage(&self) -> BufferUsage {
        self.buffer_usage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
pub struct MockResourceView {
    pub id: u64,
    pub label: String,
}

#[cfg(test)]
impl ResourceView for MockResourceView {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
pub struct MockSampler {
    pub id: u64,
    pub label: String,
}

#[cfg(test)]
impl SamplerState for MockSampler {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock device
// ============================================================================

/// Mock device that tracks created objects without a GPU
#[cfg(test)]
pub struct MockDevice {
    next_id: AtomicU64,
    /// Labels of compiled/loaded shaders, in creation order
    pub compiled_shaders: Mutex<Vec<String>>,
    /// Byte sizes of created constant buffers, in creation order
    pub created_buffers: Mutex<Vec<u32>>,
}

#[cfg(test)]
impl MockDevice {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            compiled_shaders: Mutex::new(Vec::new()),
            created_buffers: Mutex::new(Vec::new()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of shaders compiled or loaded so far
    pub fn shader_count(&self) -> usize {
        self.compiled_shaders.lock().unwrap().len()
    }

    /// Number of constant buffers created so far
    pub fn buffer_count(&self) -> usize {
        self.created_buffers.lock().unwrap().len()
    }

    /// Make a caller-side resource view, as an external component would
    pub fn make_view(&self, label: &str) -> Arc<dyn ResourceView> {
        Arc::new(MockResourceView {
            id: self.next_id(),
            label: label.to_string(),
        })
    }

    /// Make a caller-side sampler state, as an external component would
    pub fn make_sampler(&self, label: &str) -> Arc<dyn SamplerState> {
        Arc::new(MockSampler {
            id: self.next_id(),
            label: label.to_string(),
        })
    }
}

#[cfg(test)]
impl GraphicsDevice for MockDevice {
    fn compile_shader(&self, desc: &ShaderSourceDesc<'_>) -> Result<CompiledShader> {
        if desc.source.is_empty() {
            prisma_bail!(Backend, "prisma::mock",
                "compile_shader: empty source for {:?} stage", desc.kind);
        }
        let label = format!("{:?}:{}:{}", desc.kind, desc.profile, desc.entry_point);
        self.compiled_shaders.lock().unwrap().push(label.clone());
        Ok(CompiledShader {
            module: Arc::new(MockShaderModule {
                id: self.next_id(),
                kind: desc.kind,
                label,
            }),
            bytecode: desc.source.as_bytes().to_vec(),
        })
    }

    fn load_shader(&self, kind: StageKind, bytecode: &[u8]) -> Result<CompiledShader> {
        if bytecode.is_empty() {
            prisma_bail!(Backend, "prisma::mock",
                "load_shader: empty byte code for {:?} stage", kind);
        }
        let label = format!("{:?}:precompiled", kind);
        self.compiled_shaders.lock().unwrap().push(label.clone());
        Ok(CompiledShader {
            module: Arc::new(MockShaderModule {
                id: self.next_id(),
                kind,
                label,
            }),
            bytecode: bytecode.to_vec(),
        })
    }

    fn create_constant_buffer(
        &self,
        desc: &BufferDesc,
        init_data: Option<&[u8]>,
    ) -> Result<Arc<dyn NativeBuffer>> {
        if desc.byte_size == 0 {
            prisma_bail!(Backend, "prisma::mock", "create_constant_buffer: zero byte size");
        }
        if desc.usage == BufferUsage::Immutable && init_data.is_none() {
            prisma_bail!(Backend, "prisma::mock",
                "create_constant_buffer: immutable buffer without initial data");
        }
        if let Some(data) = init_data {
            if data.len() != desc.byte_size as usize {
                prisma_bail!(Backend, "prisma::mock",
                    "create_constant_buffer: initial data is {} bytes, descriptor says {}",
                    data.len(), desc.byte_size);
            }
        }
        self.created_buffers.lock().unwrap().push(desc.byte_size);
        let contents = init_data
            .map(|d| d.to_vec())
            .unwrap_or_else(|| vec![0; desc.byte_size as usize]);
        Ok(Arc::new(MockBuffer {
            id: self.next_id(),
            byte_size: desc.byte_size,
            buffer_usage: desc.usage,
            contents: Mutex::new(contents),
        }))
    }
}

// ============================================================================
// Mock context
// ============================================================================

/// Mock context tracking the bound object id per stage and slot
#[cfg(test)]
pub struct MockContext {
    pub bound_shaders: FxHashMap<StageKind, u64>,
    pub bound_constant_buffers: FxHashMap<(StageKind, u32), u64>,
    pub bound_resources: FxHashMap<(StageKind, u32), u64>,
    pub bound_samplers: FxHashMap<(StageKind, u32), u64>,
    /// Every call, in issue order
    pub commands: Vec<String>,
}

#[cfg(test)]
impl MockContext {
    pub fn new() -> Self {
        Self {
            bound_shaders: FxHashMap::default(),
            bound_constant_buffers: FxHashMap::default(),
            bound_resources: FxHashMap::default(),
            bound_samplers: FxHashMap::default(),
            commands: Vec::new(),
        }
    }

    /// True when no binding of any kind is active
    pub fn is_pristine(&self) -> bool {
        self.bound_shaders.is_empty()
            && self.bound_constant_buffers.is_empty()
            && self.bound_resources.is_empty()
            && self.bound_samplers.is_empty()
    }
}

#[cfg(test)]
impl DeviceContext for MockContext {
    fn bind_shader(
        &mut self,
        kind: StageKind,
        module: Option<&Arc<dyn ShaderModule>>,
    ) -> Result<()> {
        match module {
            Some(module) => {
                let mock = match module.as_any().downcast_ref::<MockShaderModule>() {
                    Some(mock) => mock,
                    None => prisma_bail!(Backend, "prisma::mock",
                        "bind_shader: module was not created by this mock device"),
                };
                self.bound_shaders.insert(kind, mock.id);
                self.commands.push(format!("bind_shader({:?}, #{})", kind, mock.id));
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
                let mock = match buffer.as_any().downcast_ref::<MockBuffer>() {
                    Some(mock) => mock,
                    None => prisma_bail!(Backend, "prisma::mock",
                        "bind_constant_buffer: buffer was not created by this mock device"),
                };
                self.bound_constant_buffers.insert((kind, slot), mock.id);
                self.commands
                    .push(format!("bind_constant_buffer({:?}, {}, #{})", kind, slot, mock.id));
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
                let mock = match view.as_any().downcast_ref::<MockResourceView>() {
                    Some(mock) => mock,
                    None => prisma_bail!(Backend, "prisma::mock",
                        "bind_shader_resource: view was not created by this mock device"),
                };
                self.bound_resources.insert((kind, slot), mock.id);
                self.commands
                    .push(format!("bind_shader_resource({:?}, {}, #{})", kind, slot, mock.id));
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
                let mock = match sampler.as_any().downcast_ref::<MockSampler>() {
                    Some(mock) => mock,
                    None => prisma_bail!(Backend, "prisma::mock",
                        "bind_sampler: sampler was not created by this mock device"),
                };
                self.bound_samplers.insert((kind, slot), mock.id);
                self.commands
                    .push(format!("bind_sampler({:?}, {}, #{})", kind, slot, mock.id));
            }
            None => {
                self.bound_samplers.remove(&(kind, slot));
                self.commands.push(format!("unbind_sampler({:?}, {})", kind, slot));
            }
        }
        Ok(())
    }

    fn update_buffer(&mut self, buffer: &Arc<dyn NativeBuffer>, data: &[u8]) -> Result<()> {
        let mock = match buffer.as_any().downcast_ref::<MockBuffer>() {
            Some(mock) => mock,
            None => prisma_bail!(Backend, "prisma::mock",
                "update_buffer: buffer was not created by this mock device"),
        };
        if mock.buffer_usage != BufferUsage::Dynamic {
            prisma_bail!(Backend, "prisma::mock",
                "update_buffer: buffer #{} is not dynamic", mock.id);
        }
        if data.len() != mock.byte_size as usize {
            prisma_bail!(Backend, "prisma::mock",
                "update_buffer: data is {} bytes, buffer #{} holds {}",
                data.len(), mock.id, mock.byte_size);
        }
        *mock.contents.lock().unwrap() = data.to_vec();
        self.commands
            .push(format!("update_buffer(#{}, {} bytes)", mock.id, data.len()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
