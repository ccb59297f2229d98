// GPU boundary: device capability, wgpu backend, per-model resources

mod device;
mod resources;
mod wgpu_device;

pub use device::{BufferRole, RenderDevice};
pub use resources::{MeshResources, ModelResources, with_resources};
pub use wgpu_device::WgpuDevice;
