// Skeletal animation: skeleton, clips, playback and the pose buffer

pub mod clip;
pub mod controller;
pub mod interpolation;
pub mod playback;
pub mod pose;
pub mod skeleton;
pub mod types;

pub use clip::AnimationClip;
pub use controller::AnimationController;
pub use playback::Playback;
pub use pose::{BoneMatrix, PoseBuffer, FLOATS_PER_BONE};
pub use skeleton::{Bone, Skeleton, MAX_BONES_PER_MESH};
pub use types::*;
