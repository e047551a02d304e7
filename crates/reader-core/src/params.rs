use aloud_narrator_interface::VoiceId;

pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;
pub const DEFAULT_RATE: f32 = 1.0;

/// Rate and voice for a narration request.
///
/// The controller keeps two of these: the *requested* parameters (what the
/// user last selected) and the *active* parameters (what the in-flight
/// request was actually issued with). They are equal whenever narration is
/// audibly playing; they diverge only while paused, until the next resume
/// reconciles them with a restart.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct PlaybackParams {
    pub rate: f32,
    pub voice: Option<VoiceId>,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            voice: None,
        }
    }
}

impl PlaybackParams {
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = clamp_rate(rate);
        self
    }

    pub fn with_voice(mut self, voice: impl Into<VoiceId>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

/// Clamp a requested rate into the speakable range; non-finite input falls
/// back to the default rate.
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(MIN_RATE, MAX_RATE)
    } else {
        DEFAULT_RATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_speakable_range() {
        assert_eq!(clamp_rate(0.1), MIN_RATE);
        assert_eq!(clamp_rate(5.0), MAX_RATE);
        assert_eq!(clamp_rate(1.3), 1.3);
    }

    #[test]
    fn non_finite_rates_fall_back_to_default() {
        assert_eq!(clamp_rate(f32::NAN), DEFAULT_RATE);
        assert_eq!(clamp_rate(f32::INFINITY), DEFAULT_RATE);
    }

    #[test]
    fn builder_clamps() {
        let params = PlaybackParams::default().with_rate(9.0).with_voice("aria");
        assert_eq!(params.rate, MAX_RATE);
        assert_eq!(params.voice, Some(VoiceId::new("aria")));
    }
}
