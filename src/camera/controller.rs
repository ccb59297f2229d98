use super::CameraState;
use crate::input::InputState;
use crate::settings::CameraSettings;
use nalgebra_glm as glm;

/// Orthogonal axes derived from the camera angles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: glm::Vec3,
    pub up: glm::Vec3,
    pub left: glm::Vec3,
}

impl CameraBasis {
    pub fn from_angles(azimuth: f32, zenith: f32) -> Self {
        let (s_a, c_a) = azimuth.sin_cos();
        let (s_z, c_z) = zenith.sin_cos();

        let forward = glm::vec3(c_a * s_z, c_z, s_a * s_z);
        let up = glm::vec3(-c_a * c_z, s_z, -s_a * c_z);
        let left = glm::cross(&forward, &up);

        Self { forward, up, left }
    }
}

/// Free-look camera moved by directional keys and rotated by mouse deltas
pub struct FreeLookCamera {
    state: CameraState,
    settings: CameraSettings,
    view: glm::Mat4,
    projection: glm::Mat4,
}

impl FreeLookCamera {
    pub fn new(settings: CameraSettings) -> Self {
        let mut camera = Self {
            state: CameraState::default(),
            projection: settings.projection(),
            settings,
            view: glm::Mat4::identity(),
        };
        camera.rebuild_view();
        camera
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn position(&self) -> glm::Vec3 {
        self.state.position
    }

    pub fn basis(&self) -> CameraBasis {
        CameraBasis::from_angles(self.state.azimuth, self.state.zenith)
    }

    pub fn view(&self) -> &glm::Mat4 {
        &self.view
    }

    pub fn projection(&self) -> &glm::Mat4 {
        &self.projection
    }

    pub fn view_projection(&self) -> glm::Mat4 {
        self.projection * self.view
    }

    /// Apply one frame of input: rotate, then move along the new basis
    pub fn update(&mut self, dt: f32, input: &InputState) {
        let turn = dt * self.settings.rotation_speed;
        self.state.azimuth -= input.rotation.x * turn;
        self.state.zenith += input.rotation.y * turn;

        let basis = self.basis();
        let step = dt * self.settings.movement_speed;
        let strafe = basis.left * (input.strafe_axis() * step);
        let advance = basis.forward * (input.move_axis() * step);
        self.state.position += strafe + advance;

        self.rebuild_view();
    }

    /// Reset camera to defaults
    pub fn reset(&mut self) {
        self.state.reset();
        self.rebuild_view();
    }

    fn rebuild_view(&mut self) {
        let basis = self.basis();
        let eye = self.state.position;
        self.view = glm::look_at_lh(&eye, &(eye + basis.forward), &basis.up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_vec_eq(a: glm::Vec3, b: glm::Vec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-5);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-5);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let basis = CameraBasis::from_angles(0.4, 1.9);
        assert_abs_diff_eq!(glm::length(&basis.forward), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(glm::length(&basis.up), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(glm::length(&basis.left), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(glm::dot(&basis.forward, &basis.up), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(glm::dot(&basis.forward, &basis.left), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_horizontal_basis() {
        // Azimuth 0, zenith 90 degrees: looking along +x with +y up
        let basis = CameraBasis::from_angles(0.0, std::f32::consts::FRAC_PI_2);
        assert_vec_eq(basis.forward, glm::vec3(1.0, 0.0, 0.0));
        assert_vec_eq(basis.up, glm::vec3(0.0, 1.0, 0.0));
        assert_vec_eq(basis.left, glm::vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_idle_input_keeps_position() {
        let mut camera = FreeLookCamera::new(CameraSettings::default());
        let start = camera.position();
        camera.update(0.016, &InputState::default());
        assert_eq!(camera.position(), start);
    }

    #[test]
    fn test_forward_movement() {
        let mut camera = FreeLookCamera::new(CameraSettings::default());
        let start = camera.position();
        let forward = camera.basis().forward;
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        camera.update(0.5, &input);
        assert_vec_eq(camera.position(), start + forward * 0.5);
    }

    #[test]
    fn test_strafe_right_moves_against_left() {
        let settings = CameraSettings {
            movement_speed: 2.0,
            ..Default::default()
        };
        let mut camera = FreeLookCamera::new(settings);
        let start = camera.position();
        let left = camera.basis().left;
        let input = InputState {
            right: true,
            ..Default::default()
        };
        camera.update(0.25, &input);
        assert_vec_eq(camera.position(), start - left * 0.5);
    }

    #[test]
    fn test_mouse_rotates_angles() {
        let mut camera = FreeLookCamera::new(CameraSettings::default());
        let (azimuth, zenith) = camera.state().get_orientation();
        let input = InputState {
            rotation: glm::vec2(2.0, -1.0),
            ..Default::default()
        };
        camera.update(0.1, &input);
        let (new_azimuth, new_zenith) = camera.state().get_orientation();
        assert_abs_diff_eq!(new_azimuth, azimuth - 2.0 * 0.1 * 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(new_zenith, zenith - 0.1 * 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_view_maps_forward_onto_positive_z() {
        let camera = FreeLookCamera::new(CameraSettings::default());
        let target = camera.position() + camera.basis().forward * 3.0;
        let p = camera.view() * glm::vec4(target.x, target.y, target.z, 1.0);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.z, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_view_projection_centers_forward_point() {
        let camera = FreeLookCamera::new(CameraSettings::default());
        let target = camera.position() + camera.basis().forward * 10.0;
        let clip = camera.view_projection() * glm::vec4(target.x, target.y, target.z, 1.0);

        assert_abs_diff_eq!(clip.x / clip.w, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(clip.y / clip.w, 0.0, epsilon = 1e-4);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut camera = FreeLookCamera::new(CameraSettings::default());
        let start = camera.position();
        let input = InputState {
            backward: true,
            rotation: glm::vec2(1.0, 1.0),
            ..Default::default()
        };
        camera.update(1.0, &input);
        camera.reset();
        assert_eq!(camera.position(), start);
        assert_eq!(camera.state().get_orientation(), CameraState::default().get_orientation());
    }
}
