/// GPU abstraction module - device, context, and native object traits

// Module declarations
pub mod shader;
pub mod resource;
pub mod device;

#[cfg(test)]
pub mod mock_device;

// Re-export everything
pub use shader::*;
pub use resource::*;
pub use device::*;
