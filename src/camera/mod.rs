mod controller;
mod state;

pub use controller::{CameraBasis, FreeLookCamera};
pub use state::CameraState;
