//! Unit tests for the ShaderPipeline aggregate

use glam::Mat4;

use crate::error::Error;
use crate::gpu::mock_device::{MockContext, MockDevice};
use crate::gpu::StageKind;
use crate::pipeline::{GeometryStage, PixelStage, ShaderPipeline, VertexStage};

type VsPs = (VertexStage, PixelStage);
type VsGsPs = (VertexStage, GeometryStage, PixelStage);

fn init_both(pipeline: &mut ShaderPipeline<VsPs>, device: &MockDevice) {
    pipeline
        .init_stage_from_source::<VertexStage>(device, "vs source", None, None)
        .unwrap();
    pipeline
        .init_stage_from_source::<PixelStage>(device, "ps source", None, None)
        .unwrap();
}

// ============================================================================
// Availability lifecycle
// ============================================================================

#[test]
fn test_new_pipeline_is_unavailable() {
    let pipeline = ShaderPipeline::<VsPs>::new();
    assert!(!pipeline.is_available());
    assert!(pipeline.stage::<VertexStage>().is_none());
    assert!(pipeline.stage::<PixelStage>().is_none());
}

#[test]
fn test_pipeline_becomes_available_once_every_stage_is_initialized() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();

    pipeline
        .init_stage_from_source::<VertexStage>(&device, "vs source", None, None)
        .unwrap();
    assert!(!pipeline.is_available());

    pipeline
        .init_stage_from_source::<PixelStage>(&device, "ps source", None, None)
        .unwrap();
    assert!(pipeline.is_available());
}

#[test]
fn test_destroy_all_stages_leaves_the_pipeline_unavailable() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    pipeline.destroy_all_stages();
    assert!(!pipeline.is_available());
    assert!(pipeline.stage::<VertexStage>().is_none());
}

#[test]
fn test_stage_kinds_follow_the_list_order() {
    assert_eq!(
        ShaderPipeline::<VsGsPs>::stage_kinds(),
        &[StageKind::Vertex, StageKind::Geometry, StageKind::Pixel]
    );
}

// ============================================================================
// Stage initialization
// ============================================================================

#[test]
fn test_init_stage_uses_default_profile_and_entry_point() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    pipeline
        .init_stage_from_source::<VertexStage>(&device, "vs source", None, None)
        .unwrap();

    let compiled = device.compiled_shaders.lock().unwrap();
    assert_eq!(compiled[0], "Vertex:vs_5_0:main");
}

#[test]
fn test_init_stage_honors_explicit_profile_and_entry_point() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    pipeline
        .init_stage_from_source::<VertexStage>(&device, "vs source", Some("vs_4_0"), Some("VSMain"))
        .unwrap();

    let compiled = device.compiled_shaders.lock().unwrap();
    assert_eq!(compiled[0], "Vertex:vs_4_0:VSMain");
}

#[test]
fn test_init_stage_from_bytecode() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    pipeline
        .init_stage_from_bytecode::<PixelStage>(&device, &[0xDE, 0xAD])
        .unwrap();

    let stage = pipeline.stage::<PixelStage>().unwrap();
    assert_eq!(stage.bytecode(), &[0xDE, 0xAD]);
}

#[test]
fn test_reinitializing_a_stage_replaces_the_old_one() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    pipeline
        .init_stage_from_source::<VertexStage>(&device, "vs source v2", None, None)
        .unwrap();

    // Two vertex compiles plus one pixel compile; the replacement holds the
    // new byte code and the pipeline stays available.
    assert_eq!(device.shader_count(), 3);
    assert!(pipeline.is_available());
    assert_eq!(
        pipeline.stage::<VertexStage>().unwrap().bytecode(),
        b"vs source v2"
    );
}

#[test]
fn test_failed_reinit_releases_the_old_stage() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    // Empty source fails to compile; the previous stage was already
    // released, so the pipeline reports unavailable.
    assert!(pipeline
        .init_stage_from_source::<VertexStage>(&device, "", None, None)
        .is_err());
    assert!(!pipeline.is_available());
}

// ============================================================================
// Manager accessors
// ============================================================================

#[test]
fn test_manager_accessors_require_an_initialized_stage() {
    let mut pipeline = ShaderPipeline::<VsPs>::new();

    match pipeline.constant_buffers::<VertexStage>() {
        Err(Error::StageUnavailable(msg)) => assert!(msg.contains("Vertex")),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert!(pipeline.shader_resources::<PixelStage>().is_err());
    assert!(pipeline.samplers::<PixelStage>().is_err());
}

#[test]
fn test_manager_accessors_are_idempotent() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    pipeline
        .constant_buffers::<VertexStage>()
        .unwrap()
        .add_buffer("Transform", 0, 64)
        .unwrap();

    // Retrieval after first creation: the declaration is still there.
    assert_eq!(pipeline.constant_buffers::<VertexStage>().unwrap().len(), 1);
}

// ============================================================================
// Byte code exposure
// ============================================================================

#[test]
fn test_input_signature_bytecode_comes_from_the_vertex_stage() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    assert_eq!(pipeline.input_signature_bytecode().unwrap(), b"vs source");
}

#[test]
fn test_input_signature_bytecode_fails_without_a_vertex_stage() {
    let device = MockDevice::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    pipeline
        .init_stage_from_source::<PixelStage>(&device, "ps source", None, None)
        .unwrap();

    assert!(matches!(
        pipeline.input_signature_bytecode(),
        Err(Error::StageUnavailable(_))
    ));
}

// ============================================================================
// Stage binding
// ============================================================================

#[test]
fn test_bind_then_unbind_restores_the_context() {
    let device = MockDevice::new();
    let mut ctx = MockContext::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    pipeline.bind_stages(&mut ctx).unwrap();
    assert!(ctx.bound_shaders.contains_key(&StageKind::Vertex));
    assert!(ctx.bound_shaders.contains_key(&StageKind::Pixel));

    pipeline.unbind_stages(&mut ctx).unwrap();
    assert!(ctx.is_pristine());
}

#[test]
fn test_bind_stages_follows_list_order() {
    let device = MockDevice::new();
    let mut ctx = MockContext::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    pipeline.bind_stages(&mut ctx).unwrap();
    assert!(ctx.commands[0].starts_with("bind_shader(Vertex"));
    assert!(ctx.commands[1].starts_with("bind_shader(Pixel"));
}

#[test]
fn test_binding_an_unavailable_pipeline_fails_without_side_effects() {
    let device = MockDevice::new();
    let mut ctx = MockContext::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    pipeline
        .init_stage_from_source::<PixelStage>(&device, "ps source", None, None)
        .unwrap();

    // The vertex slot is empty and comes first in list order, so nothing
    // gets bound before the error.
    match pipeline.bind_stages(&mut ctx) {
        Err(Error::StageUnavailable(msg)) => assert!(msg.contains("Vertex")),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(ctx.is_pristine());
}

// ============================================================================
// Uniform manager
// ============================================================================

#[test]
fn test_uniform_manager_requires_availability() {
    let pipeline = ShaderPipeline::<VsPs>::new();
    assert!(matches!(
        pipeline.uniform_manager(),
        Err(Error::StageUnavailable(_))
    ));
}

#[test]
fn test_uniform_manager_covers_stages_with_declared_buffers() {
    let device = MockDevice::new();
    let mut ctx = MockContext::new();
    let mut pipeline = ShaderPipeline::<VsPs>::new();
    init_both(&mut pipeline, &device);

    let vertex_buffers = pipeline.constant_buffers::<VertexStage>().unwrap();
    vertex_buffers.add_buffer("Transform", 0, 64).unwrap();
    vertex_buffers
        .constant_buffer::<Mat4, true>(&device, "Transform", None)
        .unwrap();

    let uniforms = pipeline.uniform_manager().unwrap();
    // The pixel stage declared nothing, so only one table participates.
    assert_eq!(uniforms.table_count(), 1);

    uniforms.apply(&mut ctx).unwrap();
    assert!(ctx
        .bound_constant_buffers
        .contains_key(&(StageKind::Vertex, 0)));
}
