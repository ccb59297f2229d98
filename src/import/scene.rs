// Scene description handed over by the asset importer

use crate::animation::Transform;
use crate::error::{ModelError, Result};
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that can produce a scene: a file on disk, an in-memory fixture, a converter.
pub trait SceneSource {
    /// Human readable origin, used in error messages
    fn origin(&self) -> PathBuf;

    fn read_scene(&self) -> Result<Scene>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub meshes: Vec<SceneMesh>,
    #[serde(default)]
    pub animations: Vec<SceneAnimation>,
}

impl Scene {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    /// Index into `Scene::nodes`, in any order
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub transform: NodeTransform,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeTransform {
    #[serde(default)]
    pub translation: [f32; 3],
    /// x, y, z, w
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

impl NodeTransform {
    pub fn to_transform(&self) -> Transform {
        Transform {
            translation: vec3(self.translation),
            rotation: quat(self.rotation),
            scale: vec3(self.scale),
        }
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: identity_rotation(),
            scale: unit_scale(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VectorKey {
    pub time: f64,
    pub value: [f32; 3],
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuatKey {
    pub time: f64,
    /// x, y, z, w
    pub value: [f32; 4],
}

/// Keys for one node, timed in ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneChannel {
    pub node: String,
    #[serde(default)]
    pub position_keys: Vec<VectorKey>,
    #[serde(default)]
    pub rotation_keys: Vec<QuatKey>,
    #[serde(default)]
    pub scaling_keys: Vec<VectorKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAnimation {
    pub name: String,
    /// Length in ticks
    pub duration: f64,
    /// Zero when the exporter did not specify a rate
    #[serde(default)]
    pub ticks_per_second: f64,
    #[serde(default)]
    pub channels: Vec<SceneChannel>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneBone {
    /// Name of the node this bone binds to
    pub name: String,
    /// Mesh space to bone space, row-major
    #[serde(default = "identity_rows")]
    pub offset: [[f32; 4]; 4],
    #[serde(default)]
    pub weights: Vec<VertexWeight>,
}

impl SceneBone {
    pub fn offset_matrix(&self) -> glm::Mat4 {
        glm::Mat4::from_fn(|r, c| self.offset[r][c])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle list
    pub indices: Vec<u32>,
    #[serde(default)]
    pub bones: Vec<SceneBone>,
}

/// Scene stored as JSON on disk
#[derive(Debug, Clone)]
pub struct JsonSceneFile {
    path: PathBuf,
}

impl JsonSceneFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SceneSource for JsonSceneFile {
    fn origin(&self) -> PathBuf {
        self.path.clone()
    }

    fn read_scene(&self) -> Result<Scene> {
        let text = fs::read_to_string(&self.path).map_err(|e| ModelError::import(&self.path, e))?;
        serde_json::from_str(&text).map_err(|e| ModelError::import(&self.path, e))
    }
}

/// Scene already in memory
impl SceneSource for Scene {
    fn origin(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }

    fn read_scene(&self) -> Result<Scene> {
        Ok(self.clone())
    }
}

pub(crate) fn vec3(v: [f32; 3]) -> glm::Vec3 {
    glm::vec3(v[0], v[1], v[2])
}

pub(crate) fn quat(v: [f32; 4]) -> glm::Quat {
    glm::quat_normalize(&glm::Quat::new(v[3], v[0], v[1], v[2]))
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

fn identity_rows() -> [[f32; 4]; 4] {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}
