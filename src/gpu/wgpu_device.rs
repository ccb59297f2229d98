use super::device::{BufferRole, RenderDevice};
use crate::error::{ModelError, Result};
use wgpu::util::DeviceExt;

/// wgpu device and queue behind the `RenderDevice` capability
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuDevice {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Open the default adapter without a surface
    pub fn headless() -> Result<Self> {
        pollster::block_on(Self::request())
    }

    async fn request() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("skinview device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                ..Default::default()
            })
            .await?;

        Ok(Self::new(device, queue))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

impl RenderDevice for WgpuDevice {
    type Buffer = wgpu::Buffer;

    fn create_buffer(&mut self, label: &str, role: BufferRole, contents: &[u8]) -> Result<wgpu::Buffer> {
        let usage = match role {
            BufferRole::Vertex => wgpu::BufferUsages::VERTEX,
            BufferRole::Index => wgpu::BufferUsages::INDEX,
            BufferRole::Uniform => {
                let limit = self.device.limits().max_uniform_buffer_binding_size as usize;
                if contents.len() > limit {
                    return Err(ModelError::Gpu(format!(
                        "{label}: {} bytes exceeds the uniform limit of {limit}",
                        contents.len()
                    )));
                }
                wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST
            }
        };

        Ok(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        }))
    }

    fn write_buffer(&mut self, buffer: &wgpu::Buffer, contents: &[u8]) {
        self.queue.write_buffer(buffer, 0, contents);
    }

    fn release_buffer(&mut self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }
}
