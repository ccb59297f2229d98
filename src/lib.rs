//! Skinned model loading, skeletal animation and a free-look camera.
//!
//! Each frame the caller polls input into an [`input::InputState`], moves the
//! [`camera::FreeLookCamera`], steps [`model::Model::update`], and uploads the
//! model's pose buffer through a [`gpu::RenderDevice`].

pub mod animation;
pub mod camera;
pub mod error;
pub mod gpu;
pub mod import;
pub mod input;
pub mod model;
pub mod settings;

pub const CONFY_APP_NAME: &str = "skinview";

pub use error::{ModelError, Result};
pub use model::Model;
