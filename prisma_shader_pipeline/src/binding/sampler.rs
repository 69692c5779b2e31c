/// Sampler tables - named sampler-state slots per stage

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::gpu::{DeviceContext, SamplerState, StageKind};
use crate::{prisma_bail, prisma_trace};

/// One declared sampler slot and its retained sampler state
pub struct SamplerSlot {
    stage: StageKind,
    slot: u32,
    sampler: Option<Arc<dyn SamplerState>>,
}

impl SamplerSlot {
    /// Stage kind the slot belongs to
    pub fn stage(&self) -> StageKind {
        self.stage
    }

    /// Declared binding slot
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// The currently retained sampler
    pub fn sampler(&self) -> Option<&Arc<dyn SamplerState>> {
        self.sampler.as_ref()
    }

    /// Replace the retained sampler; the previous one is released
    pub fn set_sampler(&mut self, sampler: Option<Arc<dyn SamplerState>>) {
        self.sampler = sampler;
    }

    /// Bind the retained sampler (or clear the slot when none is set)
    pub fn bind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_sampler(self.stage, self.slot, self.sampler.as_ref())
    }

    /// Clear the slot's binding
    pub fn unbind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        ctx.bind_sampler(self.stage, self.slot, None)
    }
}

/// Named table of sampler-state slots for one stage
pub struct SamplerManager {
    stage: StageKind,
    samplers: FxHashMap<String, SamplerSlot>,
}

impl SamplerManager {
    pub(crate) fn new(stage: StageKind) -> Self {
        Self {
            stage,
            samplers: FxHashMap::default(),
        }
    }

    /// Stage kind this table belongs to
    pub fn stage(&self) -> StageKind {
        self.stage
    }

    /// Number of declared slots
    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    /// True when nothing has been declared
    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }

    /// Declare a named sampler slot, optionally with an initial sampler
    ///
    /// # Errors
    ///
    /// `NameConflict` if the name is already declared.
    pub fn add_sampler(
        &mut self,
        name: &str,
        slot: u32,
        initial: Option<Arc<dyn SamplerState>>,
    ) -> Result<()> {
        if self.samplers.contains_key(name) {
            prisma_bail!(NameConflict, "prisma::SamplerManager",
                "shader sampler name repeated: {}", name);
        }
        self.samplers.insert(
            name.to_string(),
            SamplerSlot {
                stage: self.stage,
                slot,
                sampler: initial,
            },
        );
        prisma_trace!("prisma::SamplerManager",
            "{:?} stage: declared sampler '{}' (slot {})", self.stage, name, slot);
        Ok(())
    }

    /// The slot object for a declared name
    pub fn sampler(&self, name: &str) -> Result<&SamplerSlot> {
        match self.samplers.get(name) {
            Some(slot) => Ok(slot),
            None => prisma_bail!(NameNotFound, "prisma::SamplerManager",
                "shader sampler not found: {}", name),
        }
    }

    /// Mutable slot object for a declared name (to swap the sampler)
    pub fn sampler_mut(&mut self, name: &str) -> Result<&mut SamplerSlot> {
        match self.samplers.get_mut(name) {
            Some(slot) => Ok(slot),
            None => prisma_bail!(NameNotFound, "prisma::SamplerManager",
                "shader sampler not found: {}", name),
        }
    }

    /// Bind every declared slot's sampler
    pub fn bind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for slot in self.samplers.values() {
            slot.bind(ctx)?;
        }
        Ok(())
    }

    /// Clear every declared slot's binding
    pub fn unbind(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for slot in self.samplers.values() {
            slot.unbind(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
