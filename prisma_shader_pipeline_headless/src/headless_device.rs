/// HeadlessDevice - CPU-side implementation of the GraphicsDevice trait

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use prisma_shader_pipeline::gpu::{
    BufferDesc, BufferUsage, CompiledShader, GraphicsDevice, NativeBuffer, ResourceView,
    SamplerState, ShaderSourceDesc, StageKind,
};
use prisma_shader_pipeline::prisma::Result;
use prisma_shader_pipeline::{prisma_bail, prisma_trace};

use crate::headless_objects::{
    HeadlessBuffer, HeadlessResourceView, HeadlessSampler, HeadlessShaderModule,
};

/// Byte-code image header emitted by the headless "compiler"
const BYTECODE_MAGIC: &[u8; 4] = b"PSB0";

fn stage_tag(kind: StageKind) -> u8 {
    match kind {
        StageKind::Vertex => b'v',
        StageKind::Pixel => b'p',
        StageKind::Geometry => b'g',
        StageKind::Hull => b'h',
        StageKind::Domain => b'd',
    }
}

/// Deterministic byte-code image: header, stage tag, profile, entry point,
/// then the raw source. Good enough for input-layout plumbing tests and
/// reload round trips.
fn synthesize_bytecode(desc: &ShaderSourceDesc<'_>) -> Vec<u8> {
    let mut bytecode = Vec::with_capacity(
        BYTECODE_MAGIC.len() + desc.profile.len() + desc.entry_point.len() + desc.source.len() + 3,
    );
    bytecode.extend_from_slice(BYTECODE_MAGIC);
    bytecode.push(stage_tag(desc.kind));
    bytecode.extend_from_slice(desc.profile.as_bytes());
    bytecode.push(0);
    bytecode.extend_from_slice(desc.entry_point.as_bytes());
    bytecode.push(0);
    bytecode.extend_from_slice(desc.source.as_bytes());
    bytecode
}

/// Headless device: creates id-tagged CPU-side objects and records what it
/// created
pub struct HeadlessDevice {
    next_id: AtomicU64,
    created_shaders: Mutex<Vec<String>>,
    created_buffers: Mutex<Vec<u64>>,
}

impl HeadlessDevice {
    /// Create a new headless device
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            created_shaders: Mutex::new(Vec::new()),
            created_buffers: Mutex::new(Vec::new()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of shaders compiled or loaded so far
    pub fn created_shader_count(&self) -> usize {
        self.created_shaders.lock().unwrap().len()
    }

    /// Number of constant buffers created so far
    pub fn created_buffer_count(&self) -> usize {
        self.created_buffers.lock().unwrap().len()
    }

    /// Labels of compiled/loaded shaders, in creation order
    pub fn created_shaders(&self) -> Vec<String> {
        self.created_shaders.lock().unwrap().clone()
    }

    /// Create a resource view, standing in for the external component that
    /// would create texture views on a real device
    pub fn create_resource_view(&self, label: &str) -> Arc<dyn ResourceView> {
        Arc::new(HeadlessResourceView {
            id: self.next_id(),
            label: label.to_string(),
        })
    }

    /// Create a sampler state, standing in for the external component that
    /// would create samplers on a real device
    pub fn create_sampler(&self, label: &str) -> Arc<dyn SamplerState> {
        Arc::new(HeadlessSampler {
            id: self.next_id(),
            label: label.to_string(),
        })
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn compile_shader(&self, desc: &ShaderSourceDesc<'_>) -> Result<CompiledShader> {
        if desc.source.trim().is_empty() {
            prisma_bail!(Backend, "prisma::headless",
                "compile_shader: empty source for {:?} stage", desc.kind);
        }
        if desc.entry_point.is_empty() {
            prisma_bail!(Backend, "prisma::headless",
                "compile_shader: empty entry point for {:?} stage", desc.kind);
        }

        let id = self.next_id();
        let label = format!("{:?}:{}:{}", desc.kind, desc.profile, desc.entry_point);
        self.created_shaders.lock().unwrap().push(label);
        prisma_trace!("prisma::headless",
            "compiled {:?} shader #{} ({}, entry {})",
            desc.kind, id, desc.profile, desc.entry_point);

        Ok(CompiledShader {
            module: Arc::new(HeadlessShaderModule {
                id,
                kind: desc.kind,
                profile: desc.profile.to_string(),
                entry_point: desc.entry_point.to_string(),
            }),
            bytecode: synthesize_bytecode(desc),
        })
    }

    fn load_shader(&self, kind: StageKind, bytecode: &[u8]) -> Result<CompiledShader> {
        if bytecode.is_empty() {
            prisma_bail!(Backend, "prisma::headless",
                "load_shader: empty byte code for {:?} stage", kind);
        }

        let id = self.next_id();
        self.created_shaders
            .lock()
            .unwrap()
            .push(format!("{:?}:precompiled", kind));
        prisma_trace!("prisma::headless",
            "loaded {:?} shader #{} from {} bytes", kind, id, bytecode.len());

        Ok(CompiledShader {
            module: Arc::new(HeadlessShaderModule {
                id,
                kind,
                profile: kind.default_profile().to_string(),
                entry_point: String::from("main"),
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
            prisma_bail!(Backend, "prisma::headless",
                "create_constant_buffer: zero byte size");
        }
        if desc.usage == BufferUsage::Immutable && init_data.is_none() {
            prisma_bail!(Backend, "prisma::headless",
                "create_constant_buffer: immutable buffer without initial data");
        }
        if let Some(data) = init_data {
            if data.len() != desc.byte_size as usize {
                prisma_bail!(Backend, "prisma::headless",
                    "create_constant_buffer: initial data is {} bytes, descriptor says {}",
                    data.len(), desc.byte_size);
            }
        }

        let id = self.next_id();
        self.created_buffers.lock().unwrap().push(id);
        prisma_trace!("prisma::headless",
            "created {:?} constant buffer #{} ({} bytes)", desc.usage, id, desc.byte_size);

        let contents = init_data
            .map(|data| data.to_vec())
            .unwrap_or_else(|| vec![0; desc.byte_size as usize]);
        Ok(Arc::new(HeadlessBuffer {
            id,
            byte_size: desc.byte_size,
            buffer_usage: desc.usage,
            contents: Mutex::new(contents),
        }))
    }
}

#[cfg(test)]
#[path = "headless_device_tests.rs"]
mod tests;
