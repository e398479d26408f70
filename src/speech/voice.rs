//! Voice selection.
//!
//! Hosts expose whatever voices they have installed, with free-form names
//! ("Google UK English Female", "Microsoft George - English (United
//! Kingdom)"). Gender is only ever inferred from the name.

use serde::{Deserialize, Serialize};

use crate::types::{SpeechConfig, VoiceGender};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag as reported by the host ("en-GB").
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

const FEMALE_HINTS: &[&str] = &["female", "woman", "susan", "hazel", "karen", "zira", "samantha"];
const MALE_HINTS: &[&str] = &["male", "daniel", "george", "david", "mark"];

fn has_gender_hint(name: &str, gender: VoiceGender) -> bool {
    let lowered = name.to_lowercase();
    match gender {
        VoiceGender::Female => FEMALE_HINTS.iter().any(|h| lowered.contains(h)),
        // "female" contains "male"
        VoiceGender::Male => {
            let stripped = lowered.replace("female", "");
            MALE_HINTS.iter().any(|h| stripped.contains(h))
        }
        VoiceGender::Any => true,
    }
}

fn opposite(gender: VoiceGender) -> Option<VoiceGender> {
    match gender {
        VoiceGender::Female => Some(VoiceGender::Male),
        VoiceGender::Male => Some(VoiceGender::Female),
        VoiceGender::Any => None,
    }
}

fn normalize_lang(lang: &str) -> String {
    lang.replace('_', "-").to_lowercase()
}

fn base_lang(lang: &str) -> &str {
    lang.split('-').next().unwrap_or(lang)
}

/// Pick a voice for `config`, most specific match first:
///
/// 1. exact preferred name, in configured order
/// 2. requested language with a preferred-gender hint
/// 3. requested language without an opposite-gender hint
/// 4. base language with a preferred-gender hint
/// 5. any voice of the base language
/// 6. the first voice
///
/// `None` only when `voices` is empty; the host default voice is used then.
pub fn select_voice(voices: &[Voice], config: &SpeechConfig) -> Option<Voice> {
    if let Some(found) = config
        .preferred_voices
        .iter()
        .find_map(|name| voices.iter().find(|v| &v.name == name))
    {
        return Some(found.clone());
    }

    let gender = config.preferred_gender;
    let wanted = normalize_lang(&config.language);
    let wanted_base = base_lang(&wanted).to_string();
    let same_lang = |v: &&Voice| normalize_lang(&v.lang) == wanted;
    let same_base = |v: &&Voice| base_lang(&normalize_lang(&v.lang)) == wanted_base;

    voices
        .iter()
        .filter(same_lang)
        .find(|v| has_gender_hint(&v.name, gender))
        .or_else(|| {
            voices.iter().filter(same_lang).find(|v| match opposite(gender) {
                Some(other) => !has_gender_hint(&v.name, other),
                None => true,
            })
        })
        .or_else(|| {
            voices
                .iter()
                .filter(same_base)
                .find(|v| has_gender_hint(&v.name, gender))
        })
        .or_else(|| voices.iter().find(same_base))
        .or_else(|| voices.first())
        .cloned()
}
