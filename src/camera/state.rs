use nalgebra_glm as glm;
use std::f32::consts::FRAC_PI_2;

/// Camera angles and position
#[derive(Debug, Clone)]
pub struct CameraState {
    /// Rotation around the vertical axis, radians
    pub azimuth: f32,
    /// Angle from the vertical axis, radians
    pub zenith: f32,
    pub position: glm::Vec3,
    pub default_azimuth: f32,
    pub default_zenith: f32,
    pub default_position: glm::Vec3,
}

impl CameraState {
    pub fn new(azimuth: f32, zenith: f32, position: glm::Vec3) -> Self {
        Self {
            azimuth,
            zenith,
            position,
            default_azimuth: azimuth,
            default_zenith: zenith,
            default_position: position,
        }
    }

    pub fn reset(&mut self) {
        self.azimuth = self.default_azimuth;
        self.zenith = self.default_zenith;
        self.position = self.default_position;
    }

    pub fn get_orientation(&self) -> (f32, f32) {
        (self.azimuth, self.zenith)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        // Looking along +z, tilted 25 degrees below the horizon
        Self::new(
            FRAC_PI_2,
            FRAC_PI_2 + 25.0_f32.to_radians(),
            glm::vec3(0.0, 1.5, -2.0),
        )
    }
}
