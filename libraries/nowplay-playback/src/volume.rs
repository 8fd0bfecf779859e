//! Volume control with logarithmic scaling
//!
//! Human-perceptual volume: 0-100% mapped to -60 dB to 0 dB. The controller
//! never touches sample buffers; it pushes the resulting linear gain into
//! the media handle.

/// Volume controller with logarithmic scaling
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Cached linear gain multiplier
    linear_gain: f32,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (0-100, default: 70)
    pub fn new(level: u8) -> Self {
        let level = level.min(100);
        let linear_gain = Self::calculate_linear_gain(level);

        Self {
            level,
            muted: false,
            linear_gain,
        }
    }

    /// Set volume level (0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
        self.linear_gain = Self::calculate_linear_gain(self.level);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get linear gain multiplier for the media handle
    ///
    /// Returns 0.0 if muted, otherwise logarithmic gain based on level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.linear_gain
        }
    }

    /// Convert volume percentage to linear gain
    ///
    /// Formula: gain = 10^((level% - 100) * 0.6 / 20)
    /// - 0%   → -60 dB → 0.001 gain (near silence)
    /// - 50%  → -30 dB → 0.0316 gain
    /// - 70%  → -18 dB → 0.126 gain (default)
    /// - 100% →   0 dB → 1.0 gain (unity)
    fn calculate_linear_gain(level: u8) -> f32 {
        if level == 0 {
            return 0.0;
        }

        // Map 0-100% to -60 dB to 0 dB
        let db = (level as f32 - 100.0) * 0.6; // 0.6 = 60/100

        // Convert dB to linear gain: gain = 10^(dB/20)
        10.0_f32.powf(db / 20.0)
    }
}

impl Default for Volume {
    /// Default volume: 70%
    fn default() -> Self {
        Self::new(70)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_creation() {
        let volume = Volume::new(70);
        assert_eq!(volume.level(), 70);
        assert!(!volume.is_muted());
    }

    #[test]
    fn volume_clamping() {
        let volume = Volume::new(150);
        assert_eq!(volume.level(), 100);
    }

    #[test]
    fn zero_volume_is_silent() {
        let volume = Volume::new(0);
        assert_eq!(volume.gain(), 0.0);
    }

    #[test]
    fn full_volume_is_unity() {
        let volume = Volume::new(100);
        assert!((volume.gain() - 1.0).abs() < 0.001);
    }

    #[test]
    fn mute_preserves_level() {
        let mut volume = Volume::new(70);
        volume.mute();
        assert_eq!(volume.gain(), 0.0);
        assert_eq!(volume.level(), 70);

        volume.unmute();
        assert_eq!(volume.level(), 70);
        assert!(volume.gain() > 0.0);
    }

    #[test]
    fn toggle_mute() {
        let mut volume = Volume::new(50);
        volume.toggle_mute();
        assert!(volume.is_muted());
        volume.toggle_mute();
        assert!(!volume.is_muted());
    }

    #[test]
    fn gain_is_monotonic_in_level() {
        let mut previous = Volume::new(0).gain();
        for level in 1..=100 {
            let gain = Volume::new(level).gain();
            assert!(gain > previous, "gain not monotonic at level {level}");
            previous = gain;
        }
    }
}
