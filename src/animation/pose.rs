// Pose buffer handed to the renderer

use super::skeleton::{MAX_BONES_PER_MESH, Skeleton};
use nalgebra_glm as glm;

/// Floats uploaded per bone: three rows of four
pub const FLOATS_PER_BONE: usize = 12;

/// Upper 3x4 block of a bone matrix, row-major with translation in the last column
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoneMatrix {
    pub rows: [[f32; 4]; 3],
}

impl BoneMatrix {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    pub fn from_mat4(m: &glm::Mat4) -> Self {
        let mut rows = [[0.0; 4]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = m[(r, c)];
            }
        }
        Self { rows }
    }

    pub fn translation(&self) -> glm::Vec3 {
        glm::vec3(self.rows[0][3], self.rows[1][3], self.rows[2][3])
    }
}

impl Default for BoneMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-frame bone matrices, sized to the bone maximum
#[derive(Debug, Clone)]
pub struct PoseBuffer {
    matrices: Vec<BoneMatrix>,
    bone_count: usize,
}

impl PoseBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            matrices: vec![BoneMatrix::IDENTITY; capacity],
            bone_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.matrices.len()
    }

    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    /// Overwrite the buffer from the skeleton's current world transforms.
    ///
    /// Slots past the bone count are reset to identity. The buffer must be at
    /// least as large as the skeleton; `AnimationController::new` checks this.
    pub fn fill(&mut self, skeleton: &Skeleton) {
        let count = skeleton.bone_count().min(self.matrices.len());
        if count < skeleton.bone_count() {
            log::error!(
                "pose buffer holds {} bones, skeleton has {}",
                self.matrices.len(),
                skeleton.bone_count()
            );
        }
        for (index, slot) in self.matrices.iter_mut().enumerate() {
            *slot = match skeleton.skinning_transform(index) {
                Some(m) if index < count => BoneMatrix::from_mat4(&m),
                _ => BoneMatrix::IDENTITY,
            };
        }
        self.bone_count = count;
    }

    pub fn get(&self, index: usize) -> Option<&BoneMatrix> {
        self.matrices[..self.bone_count].get(index)
    }

    /// Matrices for the live bones
    pub fn matrices(&self) -> &[BoneMatrix] {
        &self.matrices[..self.bone_count]
    }

    /// Flat float view, `FLOATS_PER_BONE` per live bone
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(self.matrices())
    }

    /// Whole buffer including unused slots, matching a fixed-size uniform array
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }
}

impl Default for PoseBuffer {
    fn default() -> Self {
        Self::new(MAX_BONES_PER_MESH)
    }
}
