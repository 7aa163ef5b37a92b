/// Speech settings shared by voice input and output
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceConfig {
    /// Locale for recognition and for voice selection
    pub locale: String,

    /// Speaking rate (1.0 = normal)
    pub rate: f32,

    /// Speaking pitch (1.0 = normal)
    pub pitch: f32,

    /// Speak every non-empty assistant reply
    pub auto_speak: bool,

    /// Stop the previous reply before speaking a new one
    pub cancel_previous_utterance: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.1,
            auto_speak: true,
            cancel_previous_utterance: true,
        }
    }
}

impl VoiceConfig {
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Let utterances overlap instead of interrupting the previous one
    pub fn allow_overlap(mut self) -> Self {
        self.cancel_previous_utterance = false;
        self
    }

    pub fn without_auto_speak(mut self) -> Self {
        self.auto_speak = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_voice_config() {
        let config = VoiceConfig::default();
        assert_eq!(config.locale, "en-US");
        assert_eq!(config.rate, 1.0);
        assert!((config.pitch - 1.1).abs() < f32::EPSILON);
        assert!(config.auto_speak);
        assert!(config.cancel_previous_utterance);
    }

    #[test]
    fn test_voice_config_builder() {
        let config = VoiceConfig::default()
            .with_locale("en-GB")
            .with_rate(1.25)
            .allow_overlap()
            .without_auto_speak();

        assert_eq!(config.locale, "en-GB");
        assert_eq!(config.rate, 1.25);
        assert!(!config.cancel_previous_utterance);
        assert!(!config.auto_speak);
    }
}
