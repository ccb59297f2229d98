// Skeleton bone storage and hierarchy propagation

use super::types::Transform;
use crate::error::{ModelError, Result};
use nalgebra_glm as glm;

/// Maximum number of bones a single skinned mesh may reference
pub const MAX_BONES_PER_MESH: usize = 64;

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Transform relative to the parent, rewritten by pose evaluation
    pub local: Transform,
    /// Local transform at import time
    pub bind_local: Transform,
    /// Mesh space to bone space
    pub offset: glm::Mat4,
    world: glm::Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<usize>, local: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            local,
            bind_local: local,
            offset: glm::Mat4::identity(),
            world: glm::Mat4::identity(),
        }
    }

    pub fn world(&self) -> &glm::Mat4 {
        &self.world
    }
}

/// Bone arena stored in topological order: every parent precedes its children.
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    root: glm::Mat4,
    propagated: bool,
}

impl Skeleton {
    /// Build a skeleton, rejecting oversized or out-of-order bone lists
    pub fn new(bones: Vec<Bone>, max_bones: usize) -> Result<Self> {
        if bones.len() > max_bones {
            return Err(ModelError::TooManyBones {
                count: bones.len(),
                max: max_bones,
            });
        }

        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= index {
                    return Err(ModelError::NonTopologicalOrder {
                        bone: index,
                        parent,
                    });
                }
            }
        }

        let mut skeleton = Self {
            bones,
            root: glm::Mat4::identity(),
            propagated: false,
        };
        skeleton.propagate();
        Ok(skeleton)
    }

    pub fn empty() -> Self {
        Self {
            bones: Vec::new(),
            root: glm::Mat4::identity(),
            propagated: true,
        }
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn local_transform(&self, index: usize) -> Option<&Transform> {
        self.bones.get(index).map(|b| &b.local)
    }

    /// Mutable local transform; marks the skeleton for propagation
    pub fn local_transform_mut(&mut self, index: usize) -> Option<&mut Transform> {
        let bone = self.bones.get_mut(index)?;
        self.propagated = false;
        Some(&mut bone.local)
    }

    pub fn set_local_transform(&mut self, index: usize, transform: Transform) -> Result<()> {
        let count = self.bones.len();
        let bone = self
            .bones
            .get_mut(index)
            .ok_or(ModelError::BoneIndexOutOfRange { index, count })?;
        bone.local = transform;
        self.propagated = false;
        Ok(())
    }

    pub fn set_offset_matrix(&mut self, index: usize, offset: glm::Mat4) -> Result<()> {
        let count = self.bones.len();
        let bone = self
            .bones
            .get_mut(index)
            .ok_or(ModelError::BoneIndexOutOfRange { index, count })?;
        bone.offset = offset;
        Ok(())
    }

    /// Placement of the whole model; parent-world of every root bone
    pub fn set_root_transform(&mut self, root: glm::Mat4) {
        self.root = root;
        self.propagated = false;
    }

    pub fn root_transform(&self) -> &glm::Mat4 {
        &self.root
    }

    /// Cached world transform, current as of the last `propagate`
    pub fn world_transform(&self, index: usize) -> Option<glm::Mat4> {
        self.bones.get(index).map(|b| b.world)
    }

    /// World transform premultiplied into mesh space, as used for skinning
    pub fn skinning_transform(&self, index: usize) -> Option<glm::Mat4> {
        self.bones.get(index).map(|b| b.world * b.offset)
    }

    /// False when a local transform changed since the last propagation
    pub fn is_propagated(&self) -> bool {
        self.propagated
    }

    /// Recompute world transforms in a single pass over the index order.
    pub fn propagate(&mut self) {
        for index in 0..self.bones.len() {
            let parent_world = match self.bones[index].parent {
                Some(parent) => self.bones[parent].world,
                None => self.root,
            };
            let bone = &mut self.bones[index];
            bone.world = parent_world * bone.local.to_matrix();
        }
        self.propagated = true;
    }

    /// Restore every bone's import-time local transform
    pub fn reset_to_bind_pose(&mut self) {
        for bone in &mut self.bones {
            bone.local = bone.bind_local;
        }
        self.propagate();
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::empty()
    }
}
