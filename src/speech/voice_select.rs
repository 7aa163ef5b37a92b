//! Deterministic choice of a synthesis voice
//!
//! Preference order, first match wins, over voices in the target locale:
//! 1. the cloud provider's voices that are female or the "US English" variant
//! 2. well-known desktop female voices, "Zira" then "Samantha"
//! 3. names that look female, or the provider's US variant
//! 4. the locale's default voice
//! 5. any voice in the locale
//!
//! and finally the first voice the host lists, whatever its locale.

use super::host::Voice;

const PROVIDER_MARKER: &str = "Google";
const PROVIDER_VARIANT: &str = "US English";
const PROVIDER_VARIANT_LOWER: &str = "google us";
const PLATFORM_FEMALE_VOICES: [&str; 2] = ["Zira", "Samantha"];

pub fn select_voice(voices: &[Voice], locale: &str) -> Option<Voice> {
    let local: Vec<&Voice> = voices.iter().filter(|v| v.matches_locale(locale)).collect();

    let provider = local.iter().find(|v| {
        v.name.contains(PROVIDER_MARKER)
            && (v.name.contains("Female") || v.name.contains(PROVIDER_VARIANT))
    });
    if let Some(voice) = provider {
        return Some((*voice).clone());
    }

    for name in PLATFORM_FEMALE_VOICES {
        if let Some(voice) = local.iter().find(|v| v.name.contains(name)) {
            return Some((*voice).clone());
        }
    }

    let female_like = local.iter().find(|v| {
        let name = v.name.to_lowercase();
        name.contains("female") || name.contains(PROVIDER_VARIANT_LOWER)
    });
    if let Some(voice) = female_like {
        return Some((*voice).clone());
    }

    local
        .iter()
        .find(|v| v.is_default)
        .or_else(|| local.first())
        .map(|v| (*v).clone())
        .or_else(|| voices.first().cloned())
}
