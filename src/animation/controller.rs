// Per-frame animation driver

use super::clip::AnimationClip;
use super::playback::Playback;
use super::pose::PoseBuffer;
use super::skeleton::Skeleton;
use super::types::LoopMode;
use crate::error::{ModelError, Result};

/// Owns the skeleton, clips and pose buffer of one model and steps them each frame.
///
/// `update` must run before the render stage reads `pose_buffer` in the same frame.
#[derive(Debug, Clone)]
pub struct AnimationController {
    skeleton: Skeleton,
    clips: Vec<AnimationClip>,
    active: Option<usize>,
    playback: Playback,
    pose: PoseBuffer,
}

impl AnimationController {
    /// Fails when the skeleton has more bones than the pose buffer holds.
    pub fn new(skeleton: Skeleton, clips: Vec<AnimationClip>, pose_capacity: usize) -> Result<Self> {
        if skeleton.bone_count() > pose_capacity {
            return Err(ModelError::TooManyBones {
                count: skeleton.bone_count(),
                max: pose_capacity,
            });
        }

        let active = if clips.is_empty() { None } else { Some(0) };
        let mut pose = PoseBuffer::new(pose_capacity);
        pose.fill(&skeleton);
        Ok(Self {
            skeleton,
            clips,
            active,
            playback: Playback::default(),
            pose,
        })
    }

    /// Advance time, evaluate the active clip, propagate and repack the pose.
    pub fn update(&mut self, dt: f32) {
        if let Some(clip) = self.active.and_then(|i| self.clips.get(i)) {
            let time = self.playback.update(dt, clip.duration);
            clip.evaluate_pose(&mut self.skeleton, time);
        }
        self.skeleton.propagate();
        self.pose.fill(&self.skeleton);
    }

    pub fn pose_buffer(&self) -> &PoseBuffer {
        &self.pose
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.name.as_str())
    }

    pub fn active_clip(&self) -> Option<&AnimationClip> {
        self.active.and_then(|i| self.clips.get(i))
    }

    /// Switch to the clip at `index` and restart playback
    pub fn play_index(&mut self, index: usize) -> bool {
        if index >= self.clips.len() {
            return false;
        }
        self.active = Some(index);
        self.playback.reset();
        true
    }

    /// Switch to the clip named `name` and restart playback
    pub fn play(&mut self, name: &str) -> bool {
        match self.clips.iter().position(|c| c.name == name) {
            Some(index) => self.play_index(index),
            None => {
                log::warn!("no animation named '{name}'");
                false
            }
        }
    }

    pub fn stop(&mut self) {
        self.active = None;
        self.playback.reset();
    }

    pub fn time(&self) -> f32 {
        self.playback.time()
    }

    /// True once a clamped clip has played to its end
    pub fn is_finished(&self) -> bool {
        self.active_clip()
            .is_some_and(|clip| self.playback.is_finished(clip.duration))
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.playback.mode()
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.playback.set_mode(mode);
    }

    pub fn reset_to_bind_pose(&mut self) {
        self.playback.reset();
        self.skeleton.reset_to_bind_pose();
        self.pose.fill(&self.skeleton);
    }
}
