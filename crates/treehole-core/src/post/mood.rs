//! Mood tags attached to posts.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The fixed set of emotional labels a post can carry.
///
/// A mood only affects presentation: each one maps to a display label, an icon
/// and a background styling token. The lowercase tag (`"sad"`, `"happy"`, ...)
/// is what gets embedded in the echo prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mood {
    #[default]
    Neutral,
    Sad,
    Happy,
    Anxious,
    Angry,
    Grateful,
}

impl Mood {
    /// Lowercase tag, e.g. `"anxious"`.
    pub fn tag(&self) -> &str {
        self.as_ref()
    }

    /// Human-facing label shown next to the mood picker.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Neutral => "平静",
            Mood::Sad => "难过",
            Mood::Happy => "开心",
            Mood::Anxious => "焦虑",
            Mood::Angry => "生气",
            Mood::Grateful => "感恩",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Mood::Neutral => "🍃",
            Mood::Sad => "🌧️",
            Mood::Happy => "✨",
            Mood::Anxious => "🌀",
            Mood::Angry => "🔥",
            Mood::Grateful => "🙏",
        }
    }

    /// Background styling token for the mood picker.
    pub fn background_token(&self) -> &'static str {
        match self {
            Mood::Neutral => "bg-stone-100",
            Mood::Sad => "bg-blue-50",
            Mood::Happy => "bg-yellow-50",
            Mood::Anxious => "bg-purple-50",
            Mood::Angry => "bg-red-50",
            Mood::Grateful => "bg-orange-50",
        }
    }

    /// Background token for a post card: the mood token at half opacity.
    pub fn card_background_token(&self) -> String {
        format!("{}/50", self.background_token())
    }

    /// All moods in picker order.
    pub fn all() -> Vec<Mood> {
        Mood::iter().collect()
    }
}
