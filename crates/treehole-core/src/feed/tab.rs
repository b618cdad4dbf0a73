use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Bottom navigation tabs.
///
/// Only [`Tab::Saved`] narrows the feed; every other tab shows all posts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tab {
    #[default]
    Home,
    Write,
    Saved,
    Profile,
}

impl Tab {
    pub fn shows_saved_only(&self) -> bool {
        matches!(self, Tab::Saved)
    }
}
