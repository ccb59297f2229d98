use super::device::{BufferRole, RenderDevice};
use crate::animation::PoseBuffer;
use crate::error::{ModelError, Result};
use crate::import::MeshData;

/// Buffers for one mesh
#[derive(Debug)]
pub struct MeshResources<B> {
    pub vertex_buffer: B,
    pub index_buffer: B,
    pub index_format: wgpu::IndexFormat,
    pub index_count: u32,
}

/// GPU side of a model: static geometry plus the per-frame bone uniform
#[derive(Debug)]
pub struct ModelResources<B> {
    meshes: Vec<MeshResources<B>>,
    bone_buffer: Option<B>,
}

impl<B> ModelResources<B> {
    /// Upload geometry and allocate the bone uniform.
    ///
    /// On failure everything created so far is released before returning.
    pub fn acquire<D>(device: &mut D, meshes: &[MeshData], pose: &PoseBuffer) -> Result<Self>
    where
        D: RenderDevice<Buffer = B>,
    {
        let mut resources = Self {
            meshes: Vec::with_capacity(meshes.len()),
            bone_buffer: None,
        };

        if let Err(err) = resources.fill(device, meshes, pose) {
            log::warn!("resource acquisition failed, releasing partial upload: {err}");
            resources.release(device);
            return Err(err);
        }
        Ok(resources)
    }

    fn fill<D>(&mut self, device: &mut D, meshes: &[MeshData], pose: &PoseBuffer) -> Result<()>
    where
        D: RenderDevice<Buffer = B>,
    {
        self.bone_buffer = Some(device.create_buffer("bone transforms", BufferRole::Uniform, pose.as_bytes())?);

        for mesh in meshes {
            if mesh.vertices.is_empty() || mesh.indices.is_empty() {
                return Err(ModelError::Gpu(format!("mesh '{}' has no geometry", mesh.name)));
            }

            let vertex_buffer = device.create_buffer(&mesh.name, BufferRole::Vertex, mesh.vertex_bytes())?;
            let index_buffer = match device.create_buffer(&mesh.name, BufferRole::Index, &mesh.index_bytes()) {
                Ok(buffer) => buffer,
                Err(err) => {
                    device.release_buffer(vertex_buffer);
                    return Err(err);
                }
            };

            self.meshes.push(MeshResources {
                vertex_buffer,
                index_buffer,
                index_format: mesh.index_format,
                index_count: mesh.indices.len() as u32,
            });
        }
        Ok(())
    }

    pub fn meshes(&self) -> &[MeshResources<B>] {
        &self.meshes
    }

    pub fn bone_buffer(&self) -> Option<&B> {
        self.bone_buffer.as_ref()
    }

    /// Stream this frame's pose into the bone uniform
    pub fn upload_pose<D>(&self, device: &mut D, pose: &PoseBuffer)
    where
        D: RenderDevice<Buffer = B>,
    {
        if let Some(buffer) = &self.bone_buffer {
            device.write_buffer(buffer, pose.as_bytes());
        }
    }

    pub fn release<D>(mut self, device: &mut D)
    where
        D: RenderDevice<Buffer = B>,
    {
        for mesh in self.meshes.drain(..) {
            device.release_buffer(mesh.index_buffer);
            device.release_buffer(mesh.vertex_buffer);
        }
        if let Some(buffer) = self.bone_buffer.take() {
            device.release_buffer(buffer);
        }
    }
}

/// Acquire resources, run `f`, and release them whatever `f` returns
pub fn with_resources<D, R>(
    device: &mut D,
    meshes: &[MeshData],
    pose: &PoseBuffer,
    f: impl FnOnce(&mut D, &ModelResources<D::Buffer>) -> R,
) -> Result<R>
where
    D: RenderDevice,
{
    let resources = ModelResources::acquire(device, meshes, pose)?;
    let result = f(device, &resources);
    resources.release(device);
    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::import::SkinnedVertex;
    use pretty_assertions::assert_eq;

    /// Device that hands out numbered buffers and tracks which are alive
    #[derive(Default)]
    pub(crate) struct CountingDevice {
        pub next: u32,
        pub live: Vec<u32>,
        pub writes: Vec<(u32, usize)>,
        pub fail_after: Option<u32>,
    }

    impl RenderDevice for CountingDevice {
        type Buffer = u32;

        fn create_buffer(&mut self, label: &str, _role: BufferRole, _contents: &[u8]) -> Result<u32> {
            if self.fail_after.is_some_and(|limit| self.next >= limit) {
                return Err(ModelError::Gpu(format!("out of memory creating {label}")));
            }
            self.next += 1;
            self.live.push(self.next);
            Ok(self.next)
        }

        fn write_buffer(&mut self, buffer: &u32, contents: &[u8]) {
            self.writes.push((*buffer, contents.len()));
        }

        fn release_buffer(&mut self, buffer: u32) {
            self.live.retain(|&b| b != buffer);
        }
    }

    pub(crate) fn quad(name: &str) -> MeshData {
        MeshData {
            name: name.to_string(),
            vertices: vec![SkinnedVertex::default(); 4],
            indices: vec![0, 1, 2, 2, 3, 0],
            index_format: wgpu::IndexFormat::Uint16,
        }
    }

    #[test]
    fn test_acquire_and_release() {
        let mut device = CountingDevice::default();
        let pose = PoseBuffer::new(8);
        let resources = ModelResources::acquire(&mut device, &[quad("a"), quad("b")], &pose).unwrap();

        assert_eq!(device.live.len(), 5);
        assert_eq!(resources.meshes().len(), 2);
        assert_eq!(resources.meshes()[0].index_count, 6);

        resources.upload_pose(&mut device, &pose);
        assert_eq!(device.writes, vec![(1, pose.as_bytes().len())]);

        resources.release(&mut device);
        assert!(device.live.is_empty());
    }

    #[test]
    fn test_failed_acquire_releases_partial_upload() {
        let mut device = CountingDevice {
            fail_after: Some(4),
            ..Default::default()
        };
        let pose = PoseBuffer::new(8);
        let err = ModelResources::acquire(&mut device, &[quad("a"), quad("b")], &pose).unwrap_err();

        assert!(matches!(err, ModelError::Gpu(_)));
        assert!(device.live.is_empty());
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let mut device = CountingDevice::default();
        let mut empty = quad("empty");
        empty.indices.clear();
        let result = ModelResources::acquire(&mut device, &[empty], &PoseBuffer::new(4));
        assert!(result.is_err());
        assert!(device.live.is_empty());
    }

    #[test]
    fn test_with_resources_releases_after_use() {
        let mut device = CountingDevice::default();
        let pose = PoseBuffer::new(4);
        let count = with_resources(&mut device, &[quad("a")], &pose, |device, resources| {
            resources.upload_pose(device, &pose);
            device.live.len()
        })
        .unwrap();

        assert_eq!(count, 3);
        assert!(device.live.is_empty());
        assert_eq!(device.writes.len(), 1);
    }
}
