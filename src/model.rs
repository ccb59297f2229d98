use crate::animation::{AnimationController, PoseBuffer, Skeleton};
use crate::error::Result;
use crate::gpu::{ModelResources, RenderDevice};
use crate::import::{self, JsonSceneFile, MeshData, SceneSource};
use crate::settings::AnimationSettings;
use nalgebra_glm as glm;
use std::path::{Path, PathBuf};

/// Skinned model: static meshes plus the animated skeleton driving them
#[derive(Debug, Clone)]
pub struct Model {
    file_name: PathBuf,
    meshes: Vec<MeshData>,
    controller: AnimationController,
}

impl Model {
    pub fn load(path: impl AsRef<Path>, settings: &AnimationSettings) -> Result<Self> {
        Self::from_source(&JsonSceneFile::new(path), settings)
    }

    pub fn from_source(source: &dyn SceneSource, settings: &AnimationSettings) -> Result<Self> {
        let imported = import::import(source, settings.max_bones)?;

        let mut controller =
            AnimationController::new(imported.skeleton, imported.clips, settings.max_bones)?;
        controller.set_loop_mode(settings.loop_mode);
        if let Some(name) = &settings.default_clip {
            controller.play(name);
        }

        Ok(Self {
            file_name: source.origin(),
            meshes: imported.meshes,
            controller,
        })
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn skeleton(&self) -> &Skeleton {
        self.controller.skeleton()
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    /// Place the model in the world; applied above the root bones.
    ///
    /// Root bones keep their own local transforms, so root motion in a clip
    /// still plays on top of this placement.
    pub fn set_root(&mut self, root: glm::Mat4) {
        self.controller.skeleton_mut().set_root_transform(root);
    }

    /// Step animation by `dt` seconds and rebuild the pose buffer
    pub fn update(&mut self, dt: f32) {
        self.controller.update(dt);
    }

    pub fn pose_buffer(&self) -> &PoseBuffer {
        self.controller.pose_buffer()
    }

    /// Upload meshes and allocate the bone uniform on `device`
    pub fn acquire_resources<D: RenderDevice>(&self, device: &mut D) -> Result<ModelResources<D::Buffer>> {
        ModelResources::acquire(device, &self.meshes, self.pose_buffer())
    }

    pub fn release_resources<D: RenderDevice>(&self, device: &mut D, resources: ModelResources<D::Buffer>) {
        resources.release(device);
    }

    /// Push the current pose; call after `update` in the same frame
    pub fn upload_pose<D: RenderDevice>(&self, device: &mut D, resources: &ModelResources<D::Buffer>) {
        resources.upload_pose(device, self.pose_buffer());
    }
}
