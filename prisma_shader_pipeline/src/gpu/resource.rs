/// Native resource traits and buffer descriptors

use std::any::Any;
use bitflags::bitflags;

/// Buffer mutability at creation time
///
/// Immutable buffers are fully initialized at creation and never written
/// again; dynamic buffers accept full-contents replacement through
/// [`crate::gpu::DeviceContext::update_buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// CPU-writable, updatable after creation
    Dynamic,
    /// Contents fixed at creation
    Immutable,
}

bitflags! {
    /// CPU access rights requested for a buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpuAccessFlags: u32 {
        /// CPU may write (required for dynamic buffers)
        const WRITE = 0x1;
        /// CPU may read back
        const READ = 0x2;
    }
}

/// Descriptor for creating a constant buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub byte_size: u32,
    /// Buffer mutability
    pub usage: BufferUsage,
    /// CPU access rights
    pub cpu_access: CpuAccessFlags,
}

impl BufferDesc {
    /// Descriptor for a constant buffer of the given size and mutability,
    /// with the CPU access rights that mutability implies.
    pub fn constant(byte_size: u32, usage: BufferUsage) -> Self {
        let cpu_access = match usage {
            BufferUsage::Dynamic => CpuAccessFlags::WRITE,
            BufferUsage::Immutable => CpuAccessFlags::empty(),
        };
        Self { byte_size, usage, cpu_access }
    }
}

/// Native buffer trait
///
/// Implemented by backend-specific buffer types. The buffer is released
/// when the last reference is dropped.
pub trait NativeBuffer: Send + Sync {
    /// Size in bytes
    fn byte_size(&self) -> u32;

    /// Mutability the buffer was created with
    fn usage(&self) -> BufferUsage;

    /// Backend-recovery accessor
    fn as_any(&self) -> &dyn Any;
}

/// Shader-visible read-only resource view trait (texture or structured
/// buffer view), created by the caller and handed to a resource table by
/// reference.
pub trait ResourceView: Send + Sync {
    /// Backend-recovery accessor
    fn as_any(&self) -> &dyn Any;
}

/// Sampler state trait, created by the caller and retained by a sampler
/// table until replaced or dropped.
pub trait SamplerState: Send + Sync {
    /// Backend-recovery accessor
    fn as_any(&self) -> &dyn Any;
}
