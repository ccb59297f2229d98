// Animation data types

use nalgebra_glm as glm;

/// Local bone transform split into translation, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: glm::vec3(0.0, 0.0, 0.0),
            rotation: glm::quat_identity(),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(translation: glm::Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn from_rotation(rotation: glm::Quat) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// Compose as translate * rotate * scale
    pub fn to_matrix(&self) -> glm::Mat4 {
        let rotation = glm::quat_normalize(&self.rotation);
        glm::translation(&self.translation) * glm::quat_to_mat4(&rotation) * glm::scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Single keyframe: value at a time in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Keyframes for one transform component, sorted by time
pub type Channel<T> = Vec<Keyframe<T>>;

/// Animation curves for a single bone
///
/// An empty channel leaves that component of the bone's local transform as it is.
#[derive(Debug, Clone, Default)]
pub struct BoneTrack {
    pub bone: usize,
    pub translations: Channel<glm::Vec3>,
    pub rotations: Channel<glm::Quat>,
    pub scales: Channel<glm::Vec3>,
}

impl BoneTrack {
    pub fn new(bone: usize) -> Self {
        Self {
            bone,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }

    /// Time of the last keyframe across all channels
    pub fn end_time(&self) -> f32 {
        let translation = self.translations.last().map_or(0.0, |k| k.time);
        let rotation = self.rotations.last().map_or(0.0, |k| k.time);
        let scale = self.scales.last().map_or(0.0, |k| k.time);
        translation.max(rotation).max(scale)
    }
}

/// What happens when playback reaches the end of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum LoopMode {
    #[default]
    Loop,
    Clamp,
}
