/// Shader resource tables - named read-only resource slots per stage
///
/// Structurally the sampler table's twin: a name maps to a slot object
/// holding an optional caller-supplied resource view. Views are created
/// elsewhere and retained here by reference until replaced or dropped.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::gpu::{DeviceContext, ResourceView, StageKind};
use crate::{prisma_bail, prisma_trace};

/// One declared resource slot and its retained view
pub struct ShaderResourceSlot {
    stage: StageKind,
    slot: u32,
    view: Option<Arc<dyn ResourceView>>,
}

impl ShaderResourceSlot {
    /// Stage kind the slot belongs to
    pub fn stage(&self) -> StageKind {
        self.stage
    }

    /// Declared binding slot
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// The currently retained view
    pub fn view(&self) -> Option<&Arc<dyn ResourceView>> {
        self.view.as_ref()
    }

    /// Replace the retained view; the previous one is released
    pub fn set_view(&mut self, view: Option<Arc<dyn ResourceView>>) {
        self.view = view;
    }

    /// Bind the retained view (or clear the slot when none is set)
    pub fn bind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_shader_resource(self.stage, self.slot, self.view.as_ref())
    }

    /// Clear the slot's binding
    pub fn unbind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_shader_resource(self.stage, self.slot, None)
    }
}

/// Named table of read-only shader resource slots for one stage
pub struct ShaderResourceManager {
    stage: StageKind,
    resources: FxHashMap<String, ShaderResourceSlot>,
}

impl ShaderResourceManager {
    pub(crate) fn new(stage: StageKind) -> Self {
        Self {
            stage,
            resources: FxHashMap::default(),
        }
    }

    /// Stage kind this table belongs to
    pub fn stage(&self) -> StageKind {
        self.stage
    }

    /// Number of declared slots
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True when nothing has been declared
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Declare a named resource slot, optionally with an initial view
    ///
    /// # Errors
    ///
    /// `NameConflict` if the name is already declared.
    pub fn add_resource(
        &mut self,
        name: &str,
        slot: u32,
        initial: Option<Arc<dyn ResourceView>>,
    ) -> Result<()> {
        if self.resources.contains_key(name) {
            prisma_bail!(NameConflict, "prisma::ShaderResourceManager",
                "shader resource name repeated: {}", name);
        }
        self.resources.insert(
            name.to_string(),
            ShaderResourceSlot {
                stage: self.stage,
                slot,
                view: initial,
            },
        );
        prisma_trace!("prisma::ShaderResourceManager",
            "{:?} stage: declared shader resource '{}' (slot {})",
            self.stage, name, slot);
        Ok(())
    }

    /// The slot object for a declared name
    pub fn resource(&self, name: &str) -> Result<&ShaderResourceSlot> {
        match self.resources.get(name) {
            Some(slot) => Ok(slot),
            None => prisma_bail!(NameNotFound, "prisma::ShaderResourceManager",
                "shader resource not found: {}", name),
        }
    }

    /// Mutable slot object for a declared name (to swap the view)
    pub fn resource_mut(&mut self, name: &str) -> Result<&mut ShaderResourceSlot> {
        match self.resources.get_mut(name) {
            Some(slot) => Ok(slot),
            None => prisma_bail!(NameNotFound, "prisma::ShaderResourceManager",
                "shader resource not found: {}", name),
        }
    }

    /// Bind every declared slot's view
    pub fn bind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for slot in self.resources.values() {
            slot.bind(ctx)?;
        }
        Ok(())
    }

    /// Clear every declared slot's binding
    pub fn unbind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for slot in self.resources.values() {
            slot.unbind(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "shader_resource_tests.rs"]
mod tests;
