/// Constant buffer tables - named uniform-buffer slots per stage
///
/// A table entry is declared with a name, a numeric slot, and a byte size;
/// the backing native buffer is created lazily on the first typed fetch.
/// Declared metadata (slot, size, mutability) never changes once the
/// backing object exists; a fetch whose requested element type, size, or
/// mutability disagrees with the declaration is an error, not a
/// reconciliation.

use std::any::TypeId;
use std::marker::PhantomData;
use std::mem::size_of;
use std::sync::Arc;

use bytemuck::Pod;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::gpu::{BufferDesc, BufferUsage, DeviceContext, GraphicsDevice, NativeBuffer, StageKind};
use crate::{prisma_bail, prisma_debug, prisma_trace};

fn usage_name(dynamic: bool) -> &'static str {
    if dynamic {
        "dynamic"
    } else {
        "immutable"
    }
}

// ===== CREATED BUFFER OBJECT =====

/// A created constant buffer bound to one declared slot
///
/// Owns the native buffer and remembers the element type it was created
/// with; later fetches must agree with that type and mutability.
pub struct ConstantBufferObject {
    stage: StageKind,
    slot: u32,
    dynamic: bool,
    element_type: TypeId,
    element_type_name: &'static str,
    buffer: Arc<dyn NativeBuffer>,
}

impl ConstantBufferObject {
    /// Stage kind the buffer belongs to
    pub fn stage(&self) -> StageKind {
        self.stage
    }

    /// Declared binding slot
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// True when the buffer accepts updates
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// The owned native buffer
    pub fn native(&self) -> &Arc<dyn NativeBuffer> {
        &self.buffer
    }

    /// Bind the buffer to its declared slot
    pub fn bind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_constant_buffer(self.stage, self.slot, Some(&self.buffer))
    }

    /// Clear the buffer's declared slot
    pub fn unbind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_constant_buffer(self.stage, self.slot, None)
    }
}

// ===== TYPED VIEW =====

/// Typed view of a created constant buffer
///
/// `DYNAMIC` mirrors the declared mutability; the data-update operation
/// exists only on the `DYNAMIC = true` impl, so an immutable buffer has no
/// update path at the type level.
pub struct ConstantBuffer<'a, T, const DYNAMIC: bool> {
    object: &'a ConstantBufferObject,
    _element: PhantomData<fn() -> T>,
}

impl<'a, T: Pod, const DYNAMIC: bool> ConstantBuffer<'a, T, DYNAMIC> {
    /// Declared binding slot
    pub fn slot(&self) -> u32 {
        self.object.slot()
    }

    /// The untyped buffer object
    pub fn object(&self) -> &ConstantBufferObject {
        self.object
    }

    /// Bind the buffer to its declared slot
    pub fn bind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        self.object.bind(ctx)
    }

    /// Clear the buffer's declared slot
    pub fn unbind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        self.object.unbind(ctx)
    }
}

impl<'a, T: Pod> ConstantBuffer<'a, T, true> {
    /// Replace the full buffer contents
    pub fn set_data(&self, ctx: &mut dyn DeviceContext, data: &T) -> Result<()> {
        ctx.update_buffer(&self.object.buffer, bytemuck::bytes_of(data))
    }
}

// ===== MANAGER =====

struct ConstantBufferRecord {
    slot: u32,
    byte_size: u32,
    dynamic: bool,
    object: Option<ConstantBufferObject>,
}

/// Named table of constant buffer slots for one stage
pub struct ConstantBufferManager {
    stage: StageKind,
    buffers: FxHashMap<String, ConstantBufferRecord>,
}

impl ConstantBufferManager {
    pub(crate) fn new(stage: StageKind) -> Self {
        Self {
            stage,
            buffers: FxHashMap::default(),
        }
    }

    /// Stage kind this table belongs to
    pub fn stage(&self) -> StageKind {
        self.stage
    }

    /// Number of declared buffers
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// True when nothing has been declared
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Declare a named buffer at a slot with a fixed byte size
    ///
    /// Buffers are dynamic (updatable) by default.
    ///
    /// # Errors
    ///
    /// `NameConflict` if the name is already declared; `Inconsistent` for a
    /// zero byte size.
    pub fn add_buffer(&mut self, name: &str, slot: u32, byte_size: u32) -> Result<()> {
        if byte_size == 0 {
            prisma_bail!(Inconsistent, "prisma::ConstantBufferManager",
                "constant buffer '{}' declared with zero byte size", name);
        }
        if self.buffers.contains_key(name) {
            prisma_bail!(NameConflict, "prisma::ConstantBufferManager",
                "constant buffer name repeated: {}", name);
        }
        self.buffers.insert(
            name.to_string(),
            ConstantBufferRecord {
                slot,
                byte_size,
                dynamic: true,
                object: None,
            },
        );
        prisma_trace!("prisma::ConstantBufferManager",
            "{:?} stage: declared constant buffer '{}' (slot {}, {} bytes)",
            self.stage, name, slot, byte_size);
        Ok(())
    }

    fn record_mut(&mut self, name: &str) -> Result<&mut ConstantBufferRecord> {
        match self.buffers.get_mut(name) {
            Some(record) => Ok(record),
            None => prisma_bail!(NameNotFound, "prisma::ConstantBufferManager",
                "constant buffer not found: {}", name),
        }
    }

    /// Mark a declared buffer immutable
    ///
    /// Only meaningful before the backing object is created.
    pub fn set_buffer_immutable(&mut self, name: &str) -> Result<()> {
        self.record_mut(name)?.dynamic = false;
        Ok(())
    }

    /// Mark a declared buffer dynamic (the declaration default)
    pub fn set_buffer_mutable(&mut self, name: &str) -> Result<()> {
        self.record_mut(name)?.dynamic = true;
        Ok(())
    }

    /// Mark several declared buffers immutable
    pub fn set_buffers_immutable(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            self.set_buffer_immutable(name)?;
        }
        Ok(())
    }

    /// Mark several declared buffers dynamic
    pub fn set_buffers_mutable(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            self.set_buffer_mutable(name)?;
        }
        Ok(())
    }

    /// Mark every declared buffer immutable
    pub fn set_all_buffers_immutable(&mut self) {
        for record in self.buffers.values_mut() {
            record.dynamic = false;
        }
    }

    /// Mark every declared buffer dynamic
    pub fn set_all_buffers_mutable(&mut self) {
        for record in self.buffers.values_mut() {
            record.dynamic = true;
        }
    }

    /// Fetch a declared buffer as a typed view, creating the backing native
    /// buffer on first use
    ///
    /// # Arguments
    ///
    /// * `device` - Creation authority, used only if the buffer does not exist yet
    /// * `name` - Declared buffer name
    /// * `init_data` - Initial contents; mandatory when `DYNAMIC` is false
    ///
    /// # Errors
    ///
    /// `NameNotFound` for an undeclared name. `Inconsistent` when the
    /// element type's size disagrees with the declared byte size, the
    /// requested mutability disagrees with the declared flag, an immutable
    /// buffer is fetched without initial data, or a previously created
    /// object has a different element type or mutability. A failed fetch
    /// leaves the declaration untouched.
    pub fn constant_buffer<T: Pod, const DYNAMIC: bool>(
        &mut self,
        device: &dyn GraphicsDevice,
        name: &str,
        init_data: Option<&T>,
    ) -> Result<ConstantBuffer<'_, T, DYNAMIC>> {
        let stage = self.stage;
        // Fast path: backing object already exists. Split the lookup into a
        // shared-borrow check and a re-fetch so the returned borrow lives only
        // on the early-return path (works around NLL limitation; behavior is
        // unchanged from a single get_mut).
        let exists = match self.buffers.get(name) {
            Some(record) => record.object.is_some(),
            None => prisma_bail!(NameNotFound, "prisma::ConstantBufferManager",
                "constant buffer not found: {}", name),
        };

        if exists {
            let record = self.buffers.get(name).unwrap();
            let object = record.object.as_ref().unwrap();
            if object.element_type != TypeId::of::<T>() {
                prisma_bail!(Inconsistent, "prisma::ConstantBufferManager",
                    "constant buffer '{}' was created with element type {}, requested {}",
                    name, object.element_type_name, std::any::type_name::<T>());
            }
            if object.dynamic != DYNAMIC {
                prisma_bail!(Inconsistent, "prisma::ConstantBufferManager",
                    "constant buffer '{}' was created {}, requested {}",
                    name, usage_name(object.dynamic), usage_name(DYNAMIC));
            }
            return Ok(ConstantBuffer {
                object,
                _element: PhantomData,
            });
        }

        let record = self.buffers.get_mut(name).unwrap();

        if DYNAMIC != record.dynamic {
            prisma_bail!(Inconsistent, "prisma::ConstantBufferManager",
                "constant buffer '{}' is declared {}, requested {}",
                name, usage_name(record.dynamic), usage_name(DYNAMIC));
        }
        if size_of::<T>() as u32 != record.byte_size {
            prisma_bail!(Inconsistent, "prisma::ConstantBufferManager",
                "constant buffer '{}' declares {} bytes, element type {} has {}",
                name, record.byte_size, std::any::type_name::<T>(), size_of::<T>());
        }
        if !DYNAMIC && init_data.is_none() {
            prisma_bail!(Inconsistent, "prisma::ConstantBufferManager",
                "immutable constant buffer '{}' requires initial data at creation", name);
        }

        let usage = if DYNAMIC {
            BufferUsage::Dynamic
        } else {
            BufferUsage::Immutable
        };
        let desc = BufferDesc::constant(record.byte_size, usage);
        let buffer = device.create_constant_buffer(&desc, init_data.map(bytemuck::bytes_of))?;

        prisma_debug!("prisma::ConstantBufferManager",
            "{:?} stage: created {} constant buffer '{}' (slot {}, {} bytes)",
            stage, usage_name(DYNAMIC), name, record.slot, record.byte_size);

        let object = &*record.object.insert(ConstantBufferObject {
            stage,
            slot: record.slot,
            dynamic: DYNAMIC,
            element_type: TypeId::of::<T>(),
            element_type_name: std::any::type_name::<T>(),
            buffer,
        });
        Ok(ConstantBuffer {
            object,
            _element: PhantomData,
        })
    }

    /// Bind every created buffer in the table to its declared slot
    ///
    /// Entries whose backing object has not been created yet are skipped.
    /// Iteration order is unordered; each buffer ends up at its own slot.
    pub fn apply(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for record in self.buffers.values() {
            if let Some(object) = &record.object {
                object.bind(ctx)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "constant_buffer_tests.rs"]
mod tests;
