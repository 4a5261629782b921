use itertools::Itertools;
use serde::Serialize;

use super::common::{DocumentId, ImageRef, SocialLinks};
use super::rich_text::RichText;

/// A team member as shown on the about page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMember {
    pub id: DocumentId,
    pub name: String,
    pub slug: String,
    /// First skill tag, kept for cards that show a single role line.
    pub role: String,
    pub photo: String,
    /// Main social link (LinkedIn, else GitHub, else empty).
    pub social_link: String,
    pub skills: Vec<String>,
    pub socials: SocialLinks,
}

/// Full member document used by the member detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberProfile {
    #[serde(flatten)]
    pub member: TeamMember,
    pub bio: RichText,
    pub favorite_game: Option<String>,
    #[serde(skip)]
    pub avatar_ref: Option<ImageRef>,
}

/// Skill tags prepared for display: trimmed, blanks dropped and exact
/// duplicates removed, keeping first-seen order.
pub fn display_tags(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unique()
        .map(str::to_string)
        .collect()
}

/// Order members by name, ignoring case first and falling back to exact order.
pub(crate) fn sort_by_name(members: &mut [TeamMember]) {
    members.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
