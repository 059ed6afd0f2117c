use serde::{Deserialize, Serialize};

use crate::directory::SchoolProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Primary,
    Secondary,
    SixthForm,
    Special,
}

struct Vocabulary {
    phase: Phase,
    substrings: &'static [&'static str],
    words: &'static [&'static str],
}

// "sen" only matches as a whole word so it cannot hit inside other words.
const VOCABULARY: [Vocabulary; 4] = [
    Vocabulary {
        phase: Phase::Primary,
        substrings: &[
            "primary",
            "infant",
            "junior",
            "first school",
            "all-through",
            "all through",
        ],
        words: &[],
    },
    Vocabulary {
        phase: Phase::Secondary,
        substrings: &[
            "secondary",
            "high",
            "academy",
            "grammar",
            "middle",
            "upper school",
            "all-through",
            "all through",
        ],
        words: &[],
    },
    Vocabulary {
        phase: Phase::SixthForm,
        substrings: &["sixth", "post-16", "post 16", "16 plus", "16-19"],
        words: &[],
    },
    Vocabulary {
        phase: Phase::Special,
        substrings: &["special"],
        words: &["sen", "send"],
    },
];

impl Phase {
    pub const fn ordered() -> [Self; 4] {
        [Self::Primary, Self::Secondary, Self::SixthForm, Self::Special]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::SixthForm => "Sixth form",
            Self::Special => "Special",
        }
    }

    /// Every phase whose vocabulary matches the school's phase, type or type
    /// group text. All-through schools match more than one phase.
    pub fn classify(profile: &SchoolProfile) -> Vec<Self> {
        let text = [
            profile.phase.as_deref(),
            profile.school_type.as_deref(),
            profile.type_group.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

        let words: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();

        VOCABULARY
            .iter()
            .filter(|entry| {
                entry.substrings.iter().any(|needle| text.contains(needle))
                    || entry.words.iter().any(|needle| words.contains(needle))
            })
            .map(|entry| entry.phase)
            .collect()
    }
}
