// Interpolation utilities

use super::types::Keyframe;
use nalgebra_glm as glm;

/// Below this angle slerp falls back to normalized lerp
const SLERP_EPSILON: f32 = 1.0e-5;

/// Linear interpolation for vectors
pub fn lerp_vec3(v1: &glm::Vec3, v2: &glm::Vec3, t: f32) -> glm::Vec3 {
    v1 + (v2 - v1) * t
}

/// Spherical linear interpolation along the shortest arc
pub fn quat_slerp(q1: &glm::Quat, q2: &glm::Quat, t: f32) -> glm::Quat {
    let mut cos_theta = glm::quat_dot(q1, q2);
    let mut target = *q2;

    // q and -q describe the same rotation; pick the one on q1's hemisphere
    if cos_theta < 0.0 {
        target = -target;
        cos_theta = -cos_theta;
    }

    if cos_theta > 1.0 - SLERP_EPSILON {
        let blended = q1 * (1.0 - t) + target * t;
        return glm::quat_normalize(&blended);
    }

    let theta = cos_theta.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let w1 = ((1.0 - t) * theta).sin() / sin_theta;
    let w2 = (t * theta).sin() / sin_theta;
    q1 * w1 + target * w2
}

/// Index of the last keyframe at or before `time`
///
/// Returns None for an empty channel. Times before the first keyframe map to 0.
pub fn find_keyframe_index<T>(keys: &[Keyframe<T>], time: f32) -> Option<usize> {
    if keys.is_empty() {
        return None;
    }
    let after = keys.partition_point(|k| k.time <= time);
    Some(after.saturating_sub(1))
}

/// Sample a channel, clamping outside the keyed range
pub fn sample_channel<T: Copy>(
    keys: &[Keyframe<T>],
    time: f32,
    interpolate: impl Fn(&T, &T, f32) -> T,
) -> Option<T> {
    let index = find_keyframe_index(keys, time)?;
    let first = &keys[index];

    if keys.len() == 1 || time <= first.time {
        return Some(first.value);
    }
    let Some(second) = keys.get(index + 1) else {
        return Some(first.value);
    };

    let span = second.time - first.time;
    if span <= 0.0 {
        return Some(first.value);
    }

    let factor = (time - first.time) / span;
    if factor >= 1.0 {
        return Some(second.value);
    }
    Some(interpolate(&first.value, &second.value, factor))
}

pub fn sample_vec3(keys: &[Keyframe<glm::Vec3>], time: f32) -> Option<glm::Vec3> {
    sample_channel(keys, time, lerp_vec3)
}

pub fn sample_quat(keys: &[Keyframe<glm::Quat>], time: f32) -> Option<glm::Quat> {
    sample_channel(keys, time, quat_slerp)
}
