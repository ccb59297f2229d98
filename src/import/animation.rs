// Scene animations to clips

use super::scene::{QuatKey, Scene, SceneAnimation, VectorKey, quat, vec3};
use crate::animation::{AnimationClip, BoneTrack, Channel, Keyframe, Skeleton};
use nalgebra_glm as glm;

/// Rate assumed when an exporter leaves ticks-per-second at zero
pub const DEFAULT_TICKS_PER_SECOND: f64 = 25.0;

pub fn build_animations(scene: &Scene, skeleton: &Skeleton) -> Vec<AnimationClip> {
    scene
        .animations
        .iter()
        .map(|animation| build_clip(animation, skeleton))
        .collect()
}

/// Convert one animation, binding channels to bones by node name.
///
/// Channels for nodes the skeleton does not know are dropped.
pub fn build_clip(animation: &SceneAnimation, skeleton: &Skeleton) -> AnimationClip {
    let ticks_per_second = if animation.ticks_per_second > 0.0 {
        animation.ticks_per_second
    } else {
        DEFAULT_TICKS_PER_SECOND
    };
    let seconds = |ticks: f64| (ticks / ticks_per_second) as f32;

    let mut tracks = Vec::with_capacity(animation.channels.len());
    for channel in &animation.channels {
        let Some(bone) = skeleton.find_bone(&channel.node) else {
            log::warn!(
                "animation '{}': no bone named '{}', channel skipped",
                animation.name,
                channel.node
            );
            continue;
        };

        let track = BoneTrack {
            bone,
            translations: vector_channel(&channel.position_keys, seconds),
            rotations: rotation_channel(&channel.rotation_keys, seconds),
            scales: vector_channel(&channel.scaling_keys, seconds),
        };
        if !track.is_empty() {
            tracks.push(track);
        }
    }

    let mut duration = seconds(animation.duration);
    if duration <= 0.0 {
        duration = tracks.iter().map(BoneTrack::end_time).fold(0.0, f32::max);
    }

    log::debug!(
        "animation '{}': {} tracks, {:.3}s",
        animation.name,
        tracks.len(),
        duration
    );
    AnimationClip::new(animation.name.clone(), duration, tracks)
}

fn vector_channel(keys: &[VectorKey], seconds: impl Fn(f64) -> f32) -> Channel<glm::Vec3> {
    sorted(keys.iter().map(|k| Keyframe::new(seconds(k.time), vec3(k.value))))
}

fn rotation_channel(keys: &[QuatKey], seconds: impl Fn(f64) -> f32) -> Channel<glm::Quat> {
    sorted(keys.iter().map(|k| Keyframe::new(seconds(k.time), quat(k.value))))
}

fn sorted<T>(keys: impl Iterator<Item = Keyframe<T>>) -> Channel<T> {
    let mut keys: Vec<_> = keys.collect();
    keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Bone, Transform};
    use crate::import::scene::SceneChannel;
    use approx::assert_abs_diff_eq;

    fn skeleton() -> Skeleton {
        Skeleton::new(
            vec![
                Bone::new("hips", None, Transform::identity()),
                Bone::new("spine", Some(0), Transform::identity()),
            ],
            8,
        )
        .unwrap()
    }

    fn channel(node: &str, times: &[f64]) -> SceneChannel {
        SceneChannel {
            node: node.to_string(),
            position_keys: times
                .iter()
                .map(|&time| VectorKey {
                    time,
                    value: [time as f32, 0.0, 0.0],
                })
                .collect(),
            rotation_keys: Vec::new(),
            scaling_keys: Vec::new(),
        }
    }

    #[test]
    fn test_ticks_convert_to_seconds() {
        let animation = SceneAnimation {
            name: "walk".to_string(),
            duration: 50.0,
            ticks_per_second: 100.0,
            channels: vec![channel("spine", &[0.0, 50.0])],
        };
        let clip = build_clip(&animation, &skeleton());

        assert_abs_diff_eq!(clip.duration, 0.5, epsilon = 1e-6);
        let track = clip.track_for_bone(1).unwrap();
        assert_abs_diff_eq!(track.translations[1].time, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_default_tick_rate() {
        let animation = SceneAnimation {
            name: "idle".to_string(),
            duration: 50.0,
            ticks_per_second: 0.0,
            channels: Vec::new(),
        };
        let clip = build_clip(&animation, &skeleton());
        assert_abs_diff_eq!(clip.duration, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unknown_channel_skipped() {
        let animation = SceneAnimation {
            name: "wave".to_string(),
            duration: 10.0,
            ticks_per_second: 10.0,
            channels: vec![channel("tail", &[0.0]), channel("hips", &[0.0, 10.0])],
        };
        let clip = build_clip(&animation, &skeleton());
        assert_eq!(clip.tracks.len(), 1);
        assert_eq!(clip.tracks[0].bone, 0);
    }

    #[test]
    fn test_keys_sorted_and_duration_inferred() {
        let animation = SceneAnimation {
            name: "jump".to_string(),
            duration: 0.0,
            ticks_per_second: 1.0,
            channels: vec![channel("hips", &[3.0, 1.0, 2.0])],
        };
        let clip = build_clip(&animation, &skeleton());
        let times: Vec<f32> = clip.tracks[0].translations.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
        assert_eq!(clip.duration, 3.0);
    }
}
