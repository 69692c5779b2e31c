/// ShaderPipeline - the compile-time-validated aggregate of shader stages
///
/// A pipeline is parameterized by a tuple of stage markers (its stage
/// list). The list is validated entirely in const context: a duplicated
/// stage kind, or a list missing the vertex or pixel kind, fails to
/// compile. Each kind maps to one owned stage slot, empty until that stage
/// is initialized from source or precompiled byte code.

use std::marker::PhantomData;

use crate::binding::{ConstantBufferManager, SamplerManager, ShaderResourceManager, UniformManager};
use crate::error::Result;
use crate::gpu::{DeviceContext, GraphicsDevice, ShaderSourceDesc, StageKind};
use crate::pipeline::stage_set::{contains_kind, has_duplicate_kind, position_of_kind};
use crate::pipeline::{ShaderStage, StageList, StageSlot};
use crate::{prisma_bail, prisma_debug};

/// Resolves a marker's slot index within a stage list at compile time.
/// Instantiating it for a kind outside the list is a compile error.
struct StagePosition<L, S>(PhantomData<(L, S)>);

impl<L: StageList, S: StageSlot> StagePosition<L, S> {
    const INDEX: usize = position_of_kind(L::KINDS, S::KIND);
}

/// Compile-time-fixed, deduplicated collection of shader stages
///
/// # Example
///
/// ```no_run
/// use prisma_shader_pipeline::pipeline::{ShaderPipeline, VertexStage, PixelStage};
/// # fn demo(device: &dyn prisma_shader_pipeline::gpu::GraphicsDevice) -> prisma_shader_pipeline::prisma::Result<()> {
/// let mut pipeline = ShaderPipeline::<(VertexStage, PixelStage)>::new();
/// pipeline.init_stage_from_source::<VertexStage>(device, "...", None, None)?;
/// pipeline.init_stage_from_source::<PixelStage>(device, "...", None, None)?;
/// assert!(pipeline.is_available());
/// # Ok(())
/// # }
/// ```
pub struct ShaderPipeline<L: StageList> {
    /// One slot per entry of `L::KINDS`, in list order
    stages: Vec<Option<ShaderStage>>,
    _stage_list: PhantomData<L>,
}

impl<L: StageList> ShaderPipeline<L> {
    /// Stage-set validation, evaluated when the pipeline type is
    /// instantiated. A duplicate kind or a missing mandatory kind is a
    /// compile error here, never a runtime condition.
    const STAGE_SET_VALIDATED: () = {
        assert!(
            !has_duplicate_kind(L::KINDS),
            "shader stage kind repeated in the pipeline's stage list"
        );
        assert!(
            contains_kind(L::KINDS, StageKind::Vertex),
            "pipeline stage list must include the vertex stage"
        );
        assert!(
            contains_kind(L::KINDS, StageKind::Pixel),
            "pipeline stage list must include the pixel stage"
        );
    };

    const VERTEX_INDEX: usize = position_of_kind(L::KINDS, StageKind::Vertex);

    /// Create a pipeline with every stage slot empty
    pub fn new() -> Self {
        let () = Self::STAGE_SET_VALIDATED;
        Self {
            stages: (0..L::KINDS.len()).map(|_| None).collect(),
            _stage_list: PhantomData,
        }
    }

    /// The stage kinds of this pipeline, in bind order
    pub fn stage_kinds() -> &'static [StageKind] {
        L::KINDS
    }

    fn stage_index<S: StageSlot>() -> usize {
        StagePosition::<L, S>::INDEX
    }

    /// Initialize (or replace) a stage by compiling source text
    ///
    /// The previous stage object at this kind's slot, along with its
    /// resource managers and their native objects, is released before the
    /// replacement is installed.
    ///
    /// # Arguments
    ///
    /// * `device` - Creation authority, borrowed for this call
    /// * `source` - Shader source text
    /// * `profile` - Compile target; `None` uses the kind's shader-model-5 default
    /// * `entry_point` - Entry function; `None` uses `"main"`
    pub fn init_stage_from_source<S: StageSlot>(
        &mut self,
        device: &dyn GraphicsDevice,
        source: &str,
        profile: Option<&str>,
        entry_point: Option<&str>,
    ) -> Result<()> {
        let index = Self::stage_index::<S>();
        let desc = ShaderSourceDesc {
            kind: S::KIND,
            source,
            profile: profile.unwrap_or_else(|| S::KIND.default_profile()),
            entry_point: entry_point.unwrap_or("main"),
        };

        // Release the previous stage first, then install the replacement.
        self.stages[index] = None;
        let compiled = device.compile_shader(&desc)?;
        self.stages[index] = Some(ShaderStage::new(S::KIND, compiled));

        prisma_debug!("prisma::Pipeline",
            "{:?} stage initialized from source (profile {}, entry {})",
            S::KIND, desc.profile, desc.entry_point);
        Ok(())
    }

    /// Initialize (or replace) a stage from precompiled byte code
    pub fn init_stage_from_bytecode<S: StageSlot>(
        &mut self,
        device: &dyn GraphicsDevice,
        bytecode: &[u8],
    ) -> Result<()> {
        let index = Self::stage_index::<S>();

        self.stages[index] = None;
        let compiled = device.load_shader(S::KIND, bytecode)?;
        self.stages[index] = Some(ShaderStage::new(S::KIND, compiled));

        prisma_debug!("prisma::Pipeline",
            "{:?} stage initialized from {} bytes of byte code",
            S::KIND, bytecode.len());
        Ok(())
    }

    /// Release every stage slot, leaving the pipeline unavailable
    pub fn destroy_all_stages(&mut self) {
        for slot in &mut self.stages {
            *slot = None;
        }
        prisma_debug!("prisma::Pipeline", "all stages destroyed");
    }

    /// True iff every stage slot holds an initialized stage
    ///
    /// This is the one non-throwing way to probe readiness before a bind.
    pub fn is_available(&self) -> bool {
        self.stages.iter().all(|slot| slot.is_some())
    }

    /// The stage object for a kind, if initialized
    pub fn stage<S: StageSlot>(&self) -> Option<&ShaderStage> {
        self.stages[Self::stage_index::<S>()].as_ref()
    }

    /// Mutable access to the stage object for a kind, if initialized
    pub fn stage_mut<S: StageSlot>(&mut self) -> Option<&mut ShaderStage> {
        self.stages[Self::stage_index::<S>()].as_mut()
    }

    fn initialized_stage_mut<S: StageSlot>(&mut self, what: &str) -> Result<&mut ShaderStage> {
        match self.stages[Self::stage_index::<S>()].as_mut() {
            Some(stage) => Ok(stage),
            None => prisma_bail!(StageUnavailable, "prisma::Pipeline",
                "cannot access the {} of the {:?} stage: stage is not initialized",
                what, S::KIND),
        }
    }

    /// The named stage's constant buffer table (created on first call)
    pub fn constant_buffers<S: StageSlot>(&mut self) -> Result<&mut ConstantBufferManager> {
        Ok(self
            .initialized_stage_mut::<S>("constant buffer table")?
            .constant_buffers_mut())
    }

    /// The named stage's shader resource table (created on first call)
    pub fn shader_resources<S: StageSlot>(&mut self) -> Result<&mut ShaderResourceManager> {
        Ok(self
            .initialized_stage_mut::<S>("shader resource table")?
            .shader_resources_mut())
    }

    /// The named stage's sampler table (created on first call)
    pub fn samplers<S: StageSlot>(&mut self) -> Result<&mut SamplerManager> {
        Ok(self
            .initialized_stage_mut::<S>("sampler table")?
            .samplers_mut())
    }

    /// Build the cross-stage constant buffer facade over the current stages
    ///
    /// The facade borrows this pipeline, so declaring further buffers (or
    /// reinitializing stages) first requires dropping it and building a new
    /// one. Stages with no declared constant buffers contribute no table.
    pub fn uniform_manager(&self) -> Result<UniformManager<'_>> {
        if !self.is_available() {
            prisma_bail!(StageUnavailable, "prisma::Pipeline",
                "cannot build a uniform manager: pipeline has uninitialized stages");
        }
        let tables = self
            .stages
            .iter()
            .filter_map(|slot| slot.as_ref().and_then(ShaderStage::constant_buffers))
            .collect();
        Ok(UniformManager::new(tables))
    }

    /// The vertex stage's raw byte code, for input-layout derivation
    ///
    /// The returned slice carries its length, so there is no separate size
    /// accessor.
    pub fn input_signature_bytecode(&self) -> Result<&[u8]> {
        match &self.stages[Self::VERTEX_INDEX] {
            Some(stage) => Ok(stage.bytecode()),
            None => prisma_bail!(StageUnavailable, "prisma::Pipeline",
                "cannot read the input signature byte code: vertex stage is not initialized"),
        }
    }

    /// Bind every stage's shader program, in stage-list order
    ///
    /// Only stage programs are bound here; resource tables are applied
    /// separately. Fails naming the kind if any slot is empty.
    pub fn bind_stages(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for (index, kind) in L::KINDS.iter().enumerate() {
            match &self.stages[index] {
                Some(stage) => stage.bind(ctx)?,
                None => prisma_bail!(StageUnavailable, "prisma::Pipeline",
                    "cannot bind stages: {:?} stage is not initialized", kind),
            }
        }
        Ok(())
    }

    /// Clear every stage kind's shader program binding, in stage-list order
    pub fn unbind_stages(&self, ctx: &mut dyn DeviceContext) -> Result<()> {
        for (index, kind) in L::KINDS.iter().enumerate() {
            match &self.stages[index] {
                Some(stage) => stage.unbind(ctx)?,
                None => prisma_bail!(StageUnavailable, "prisma::Pipeline",
                    "cannot unbind stages: {:?} stage is not initialized", kind),
            }
        }
        Ok(())
    }
}

impl<L: StageList> Default for ShaderPipeline<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "shader_pipeline_tests.rs"]
mod tests;
