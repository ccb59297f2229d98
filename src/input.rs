use nalgebra_glm as glm;
use winit::keyboard::KeyCode;

/// Input for one frame, polled by the caller and handed to the camera
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Mouse movement since the previous frame
    pub rotation: glm::Vec2,
}

impl InputState {
    /// -1, 0 or 1 along the forward axis; forward wins when both are held
    pub fn move_axis(&self) -> f32 {
        if self.forward {
            1.0
        } else if self.backward {
            -1.0
        } else {
            0.0
        }
    }

    /// -1, 0 or 1 along the left axis; left wins when both are held
    pub fn strafe_axis(&self) -> f32 {
        if self.left {
            1.0
        } else if self.right {
            -1.0
        } else {
            0.0
        }
    }
}

/// Collects window key and mouse events into per-frame snapshots
#[derive(Debug, Default)]
pub struct InputTracker {
    held: InputState,
    mouse_delta: (f64, f64),
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the key drives the camera
    pub fn on_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let slot = match key {
            KeyCode::ArrowUp | KeyCode::KeyW => &mut self.held.forward,
            KeyCode::ArrowDown | KeyCode::KeyS => &mut self.held.backward,
            KeyCode::ArrowLeft | KeyCode::KeyA => &mut self.held.left,
            KeyCode::ArrowRight | KeyCode::KeyD => &mut self.held.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Raw device motion, accumulated until the next snapshot
    pub fn on_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta.0 += delta.0;
        self.mouse_delta.1 += delta.1;
    }

    /// Drop all held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held = InputState::default();
        self.mouse_delta = (0.0, 0.0);
    }

    /// Current key state plus the mouse delta gathered since the last call
    pub fn snapshot(&mut self) -> InputState {
        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        InputState {
            rotation: glm::vec2(dx as f32, dy as f32),
            ..self.held
        }
    }
}
