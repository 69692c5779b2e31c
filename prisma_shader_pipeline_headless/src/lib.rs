/*!
# Prisma Shader Pipeline - Headless Backend

CPU-side implementation of the `prisma_shader_pipeline` device traits.

This backend never touches a GPU: compiling a shader synthesizes a
deterministic byte-code image, creating a buffer allocates plain memory,
and binding records which object sits at which stage and slot. That makes
it suitable for integration-testing binding logic in CI, and for
validating pipeline setup on machines without a graphics device.

Every object the backend hands out is id-tagged; the context exposes the
currently bound id per stage and slot so callers can assert exact binding
effects.
*/

// Headless implementation modules
mod headless_objects;
mod headless_device;
mod headless_context;

pub use headless_context::HeadlessContext;
pub use headless_device::HeadlessDevice;
pub use headless_objects::{
    HeadlessBuffer, HeadlessResourceView, HeadlessSampler, HeadlessShaderModule,
};
