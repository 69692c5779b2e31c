/// Id-tagged native objects handed out by the headless device

use std::any::Any;
use std::sync::Mutex;

use prisma_shader_pipeline::gpu::{
    BufferUsage, NativeBuffer, ResourceView, SamplerState, ShaderModule, StageKind,
};

/// Headless shader module: stage kind plus the compile parameters
pub struct HeadlessShaderModule {
    pub(crate) id: u64,
    pub(crate) kind: StageKind,
    pub(crate) profile: String,
    pub(crate) entry_point: String,
}

impl HeadlessShaderModule {
    /// Unique id of this module
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Compile target profile the module was built with
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Entry point name the module was built with
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

impl ShaderModule for HeadlessShaderModule {
    fn stage_kind(&self) -> StageKind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Headless buffer: plain memory behind a lock
pub struct HeadlessBuffer {
    pub(crate) id: u64,
    pub(crate) byte_size: u32,
    pub(crate) buffer_usage: BufferUsage,
    pub(crate) contents: Mutex<Vec<u8>>,
}

impl HeadlessBuffer {
    /// Unique id of this buffer
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Snapshot of the current contents
    pub fn contents(&self) -> Vec<u8> {
        self.contents.lock().unwrap().clone()
    }
}

impl NativeBuffer for HeadlessBuffer {
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

/// Headless stand-in for an externally created resource view
pub struct HeadlessResourceView {
    pub(crate) id: u64,
    pub(crate) label: String,
}

impl HeadlessResourceView {
    /// Unique id of this view
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Caller-supplied label
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl ResourceView for HeadlessResourceView {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Headless stand-in for an externally created sampler state
pub struct HeadlessSampler {
    pub(crate) id: u64,
    pub(crate) label: String,
}

impl HeadlessSampler {
    /// Unique id of this sampler
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Caller-supplied label
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl SamplerState for HeadlessSampler {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
