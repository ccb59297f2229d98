// Animation clips and pose evaluation

use super::interpolation::{sample_quat, sample_vec3};
use super::skeleton::Skeleton;
use super::types::BoneTrack;

/// Named set of bone tracks, immutable once imported
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds
    pub duration: f32,
    pub tracks: Vec<BoneTrack>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32, tracks: Vec<BoneTrack>) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    pub fn track_for_bone(&self, bone: usize) -> Option<&BoneTrack> {
        self.tracks.iter().find(|t| t.bone == bone)
    }

    /// Write sampled local transforms into the skeleton.
    ///
    /// Bones without a track and channels without keys keep their current
    /// local values. Tracks pointing past the skeleton are skipped.
    pub fn evaluate_pose(&self, skeleton: &mut Skeleton, time: f32) {
        for track in &self.tracks {
            let Some(local) = skeleton.local_transform_mut(track.bone) else {
                log::trace!(
                    "clip '{}': skipping track for missing bone {}",
                    self.name,
                    track.bone
                );
                continue;
            };

            if let Some(translation) = sample_vec3(&track.translations, time) {
                local.translation = translation;
            }
            if let Some(rotation) = sample_quat(&track.rotations, time) {
                local.rotation = rotation;
            }
            if let Some(scale) = sample_vec3(&track.scales, time) {
                local.scale = scale;
            }
        }
    }
}
