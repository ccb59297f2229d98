// Scene import: skeleton, animation and mesh builders

pub mod animation;
pub mod mesh;
pub mod scene;
pub mod skeleton;

pub use animation::{build_animations, build_clip, DEFAULT_TICKS_PER_SECOND};
pub use mesh::{build_meshes, MeshData, SkinnedVertex, MAX_INFLUENCES};
pub use scene::{JsonSceneFile, Scene, SceneSource};
pub use skeleton::build_skeleton;

use crate::animation::{AnimationClip, Skeleton};
use crate::error::{ModelError, Result};

/// Everything a model needs from one scene
#[derive(Debug, Clone)]
pub struct ImportedModel {
    pub skeleton: Skeleton,
    pub clips: Vec<AnimationClip>,
    pub meshes: Vec<MeshData>,
}

/// Read a scene and build skeleton, clips and meshes from it.
///
/// Build failures are reported as import errors against the source's origin.
pub fn import(source: &dyn SceneSource, max_bones: usize) -> Result<ImportedModel> {
    let scene = source.read_scene()?;
    let origin = source.origin();

    let mut skeleton = build_skeleton(&scene, max_bones).map_err(|err| match err {
        ModelError::TooManyBones { .. } => err,
        other => ModelError::import(&origin, other),
    })?;
    let clips = build_animations(&scene, &skeleton);
    let meshes = build_meshes(&scene, &mut skeleton).map_err(|err| ModelError::import(&origin, err))?;

    log::info!(
        "imported {}: {} bones, {} animations, {} meshes",
        origin.display(),
        skeleton.bone_count(),
        clips.len(),
        meshes.len()
    );

    Ok(ImportedModel {
        skeleton,
        clips,
        meshes,
    })
}
