/// UniformManager - cross-stage constant buffer facade
///
/// Lets a caller apply every created constant buffer of every stage in one
/// call, without holding the per-stage tables individually. The facade
/// borrows the pipeline's tables and owns nothing; because it borrows,
/// declaring new buffers afterwards requires building a fresh facade.

use crate::binding::ConstantBufferManager;
use crate::error::Result;
use crate::gpu::DeviceContext;

/// Read-only facade over the constant buffer tables of a pipeline's stages
pub struct UniformManager<'a> {
    tables: Vec<&'a ConstantBufferManager>,
}

impl<'a> UniformManager<'a> {
    pub(crate) fn new(tables: Vec<&'a ConstantBufferManager>) -> Self {
        Self { tables }
    }

    /// Number of per-stage tables in the facade
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Bind every created constant buffer of every table
    pub fn apply(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for table in &self.tables {
            table.apply(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "uniforms_tests.rs"]
mod tests;
