use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to a document by the CMS.
///
/// Kept verbatim; it is never parsed or reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Pointer to an image asset stored in the CMS.
///
/// Resolved into a concrete URL at render time, see
/// [`ImageUrlBuilder`](crate::cms::ImageUrlBuilder). `asset` is absent while
/// an upload is still pending; such images resolve to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", alias = "_id")]
    pub reference: String,
}

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            asset: Some(AssetRef {
                reference: reference.into(),
            }),
            alt: None,
        }
    }
}

/// Store pages where a game can be bought or downloaded.
///
/// Absent links are left out of the serialized object entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itch: Option<String>,
    #[serde(rename = "googlePlay", skip_serializing_if = "Option::is_none")]
    pub google_play: Option<String>,
}

impl PlatformLinks {
    pub fn is_empty(&self) -> bool {
        self.steam.is_none() && self.itch.is_none() && self.google_play.is_none()
    }

    /// Display labels for the platforms that have a link.
    pub fn platforms(&self) -> Vec<Platform> {
        [
            (Platform::Steam, &self.steam),
            (Platform::Itch, &self.itch),
            (Platform::GooglePlay, &self.google_play),
        ]
        .into_iter()
        .filter(|(_, link)| link.is_some())
        .map(|(platform, _)| platform)
        .collect()
    }
}

/// A store a game is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum Platform {
    #[strum(serialize = "Steam")]
    Steam,
    #[strum(serialize = "itch.io")]
    Itch,
    #[strum(serialize = "Android")]
    GooglePlay,
}

/// Social profiles of a team member. Absent links are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artstation: Option<String>,
}

impl SocialLinks {
    /// The link shown on member cards: LinkedIn first, then GitHub.
    pub fn primary(&self) -> Option<&str> {
        self.linkedin.as_deref().or(self.github.as_deref())
    }
}

/// Keep a link only if it carries a non-blank value.
pub(crate) fn present(link: Option<String>) -> Option<String> {
    link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
}
