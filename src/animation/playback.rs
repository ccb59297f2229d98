// Playback cursor

use super::types::LoopMode;

/// Current time within the active clip
#[derive(Debug, Clone, Default)]
pub struct Playback {
    time: f32,
    mode: LoopMode,
}

impl Playback {
    pub fn new(mode: LoopMode) -> Self {
        Self { time: 0.0, mode }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LoopMode) {
        self.mode = mode;
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// True once a clamped clip has reached its end
    pub fn is_finished(&self, duration: f32) -> bool {
        self.mode == LoopMode::Clamp && self.time >= duration
    }

    /// Advance by `dt` seconds.
    ///
    /// Looping keeps the time in `[0, duration)`, clamping stops at `duration`.
    pub fn update(&mut self, dt: f32, duration: f32) -> f32 {
        if duration <= 0.0 {
            self.time = 0.0;
            return self.time;
        }

        let advanced = self.time + dt;
        self.time = match self.mode {
            LoopMode::Loop => advanced.rem_euclid(duration),
            LoopMode::Clamp => advanced.clamp(0.0, duration),
        };
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_loop_wraps() {
        let mut playback = Playback::new(LoopMode::Loop);
        for _ in 0..7 {
            playback.update(0.25, 1.0);
        }
        assert_abs_diff_eq!(playback.time(), 0.75, epsilon = 1e-6);

        playback.update(0.25, 1.0);
        assert!(playback.time() < 1.0);
        assert_abs_diff_eq!(playback.time(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_loop_large_step() {
        let mut playback = Playback::new(LoopMode::Loop);
        let time = playback.update(5.5, 2.0);
        assert_abs_diff_eq!(time, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_clamp_stops_at_end() {
        let mut playback = Playback::new(LoopMode::Clamp);
        playback.update(0.75, 1.0);
        assert!(!playback.is_finished(1.0));
        playback.update(0.75, 1.0);
        assert_eq!(playback.time(), 1.0);
        assert!(playback.is_finished(1.0));
    }

    #[test]
    fn test_zero_duration_pins_time() {
        let mut playback = Playback::default();
        assert_eq!(playback.update(0.3, 0.0), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut playback = Playback::default();
        playback.update(0.3, 1.0);
        playback.reset();
        assert_eq!(playback.time(), 0.0);
        assert_eq!(playback.mode(), LoopMode::Loop);
    }
}
