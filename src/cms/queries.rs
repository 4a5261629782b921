//! GROQ queries issued against the content source.
//!
//! Slugs are projected to plain strings so the raw document types stay flat.

/// All games, newest release first. Omits the body and trailer.
pub(crate) const GAMES_QUERY: &str = r#"*[_type == "game"] | order(releaseDate desc) {
  _id,
  title,
  "slug": slug.current,
  shortDescription,
  coverImage,
  screenshots,
  releaseDate,
  genre,
  platformLinks
}"#;

/// A single game by exact slug, including the rich-text body and trailer.
pub(crate) const GAME_BY_SLUG_QUERY: &str = r#"*[_type == "game" && slug.current == $slug][0] {
  _id,
  title,
  "slug": slug.current,
  shortDescription,
  fullDescription,
  coverImage,
  screenshots,
  releaseDate,
  genre,
  platformLinks,
  videoUrl
}"#;

pub(crate) const GAME_SLUGS_QUERY: &str =
    r#"*[_type == "game" && defined(slug.current)].slug.current"#;

/// All team members ordered by name.
pub(crate) const TEAM_QUERY: &str = r#"*[_type == "member"] | order(name asc) {
  _id,
  name,
  "slug": slug.current,
  avatar,
  skills,
  linkedinUrl,
  githubUrl,
  artstationUrl
}"#;

pub(crate) const MEMBER_BY_SLUG_QUERY: &str = r#"*[_type == "member" && slug.current == $slug][0] {
  _id,
  name,
  "slug": slug.current,
  avatar,
  bio,
  skills,
  favoriteGame,
  linkedinUrl,
  githubUrl,
  artstationUrl
}"#;

pub(crate) const MEMBER_SLUGS_QUERY: &str =
    r#"*[_type == "member" && defined(slug.current)].slug.current"#;
