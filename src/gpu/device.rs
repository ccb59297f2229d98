use crate::error::Result;

/// What a buffer is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    Vertex,
    Index,
    /// Rewritten every frame
    Uniform,
}

/// Capability to create, fill and free GPU buffers.
///
/// Every buffer handed out must go back through `release_buffer`.
pub trait RenderDevice {
    type Buffer;

    fn create_buffer(&mut self, label: &str, role: BufferRole, contents: &[u8]) -> Result<Self::Buffer>;

    fn write_buffer(&mut self, buffer: &Self::Buffer, contents: &[u8]);

    fn release_buffer(&mut self, buffer: Self::Buffer);
}
