use chrono::NaiveDate;
use serde::Serialize;

use super::common::{DocumentId, ImageRef, PlatformLinks};
use super::rich_text::RichText;

/// A game as shown on cards and listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: DocumentId,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub cover_image: String,
    pub screenshots: Vec<String>,
    /// `None` means the release date has not been announced yet.
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub links: PlatformLinks,
}

/// Full game document used by the game detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub full_description: RichText,
    pub trailer_url: Option<String>,
    pub gallery: Vec<Screenshot>,
    #[serde(skip)]
    pub cover_ref: Option<ImageRef>,
}

/// A gallery image with its accessibility text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screenshot {
    pub url: String,
    pub alt: String,
}

/// Order games newest first; games without a release date go last.
pub(crate) fn sort_by_release_desc(games: &mut [Game]) {
    games.sort_by(|a, b| match (a.release_date, b.release_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(slug: &str, release: Option<&str>) -> Game {
        Game {
            id: DocumentId::from(slug),
            title: slug.to_string(),
            slug: slug.to_string(),
            short_description: String::new(),
            cover_image: String::new(),
            screenshots: vec![],
            release_date: release.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            genre: None,
            links: PlatformLinks::default(),
        }
    }

    #[test]
    fn test_sort_by_release_desc_puts_undated_last() {
        let mut games = vec![
            game("tba", None),
            game("old", Some("2021-03-01")),
            game("new", Some("2024-11-20")),
            game("mid", Some("2023-06-15")),
        ];
        sort_by_release_desc(&mut games);
        let slugs: Vec<&str> = games.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old", "tba"]);
    }
}
