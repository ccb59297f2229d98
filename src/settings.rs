use crate::CONFY_APP_NAME;
use crate::animation::{LoopMode, MAX_BONES_PER_MESH};

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub movement_speed: f32,
    pub rotation_speed: f32,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            movement_speed: 1.0,
            rotation_speed: 1.5,
            fov_degrees: 45.0,
            aspect: 1024.0 / 768.0,
            near_plane: 1.0,
            far_plane: 1000.0,
        }
    }
}

impl CameraSettings {
    pub fn load() -> Self {
        load_or_default("camera")
    }

    pub fn save(&self) {
        store_or_warn("camera", self);
    }

    /// Left-handed perspective with a zero-to-one depth range
    pub fn projection(&self) -> glm::Mat4 {
        glm::perspective_lh_zo(
            self.aspect,
            self.fov_degrees.to_radians(),
            self.near_plane,
            self.far_plane,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    pub max_bones: usize,
    pub loop_mode: LoopMode,
    /// Clip to start with; the first clip when unset
    pub default_clip: Option<String>,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            max_bones: MAX_BONES_PER_MESH,
            loop_mode: LoopMode::Loop,
            default_clip: None,
        }
    }
}

impl AnimationSettings {
    pub fn load() -> Self {
        load_or_default("animation")
    }

    pub fn save(&self) {
        store_or_warn("animation", self);
    }
}

// Aggregate struct for convenience
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub camera: CameraSettings,
    pub animation: AnimationSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            camera: CameraSettings::load(),
            animation: AnimationSettings::load(),
        }
    }

    pub fn save(&self) {
        self.camera.save();
        self.animation.save();
    }

    /// Load from an explicit file, writing defaults there if it does not exist
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    pub fn store_path(&self, path: impl AsRef<Path>) -> Result<(), confy::ConfyError> {
        confy::store_path(path, self)
    }
}

fn load_or_default<T>(name: &str) -> T
where
    T: Serialize + for<'de> Deserialize<'de> + Default,
{
    confy::load(CONFY_APP_NAME, name).unwrap_or_else(|err| {
        log::warn!("using default {name} settings: {err}");
        T::default()
    })
}

fn store_or_warn<T: Serialize>(name: &str, value: &T) {
    if let Err(err) = confy::store(CONFY_APP_NAME, name, value) {
        log::warn!("failed to save {name} settings: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.animation.max_bones, MAX_BONES_PER_MESH);
        assert_eq!(settings.animation.loop_mode, LoopMode::Loop);
        assert_eq!(settings.camera.movement_speed, 1.0);
        assert_eq!(settings.camera.rotation_speed, 1.5);
    }

    #[test]
    fn test_store_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skinview.toml");

        let mut settings = Settings::default();
        settings.animation.loop_mode = LoopMode::Clamp;
        settings.animation.default_clip = Some("walk".to_string());
        settings.store_path(&path).unwrap();

        let loaded = Settings::load_path(&path).unwrap();
        assert_eq!(loaded.animation.loop_mode, LoopMode::Clamp);
        assert_eq!(loaded.animation.default_clip.as_deref(), Some("walk"));
    }

    #[test]
    fn test_load_path_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.toml");

        let loaded = Settings::load_path(&path).unwrap();
        assert_eq!(loaded.animation.max_bones, MAX_BONES_PER_MESH);
        assert!(path.exists());
    }
}
