use std::sync::Arc;

use tracing::{instrument, warn};

use crate::cms::{self, CmsSettings, ContentSource, ImageUrlBuilder, SanityHttpSource};
use crate::error::Result;
use crate::fetched::Fetched;
use crate::model::*;

/// The main entry point for reading site content.
///
/// `ContentClient` wraps a [`ContentSource`] and exposes methods that return
/// normalized DTOs. None of them fail: a broken backend produces a
/// [`Fetched::Fallback`] holding an empty value, and the error is logged.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// use studio_site::{CmsSettings, ContentClient};
///
/// let client = ContentClient::new(CmsSettings {
///     project_id: "abc123".to_string(),
///     ..Default::default()
/// });
/// let games = client.list_games().await;
/// if games.is_fallback() {
///     eprintln!("content source unavailable");
/// }
/// println!("Found {} games", games.value().len());
/// # }
/// ```
#[derive(Clone)]
pub struct ContentClient {
    source: Arc<dyn ContentSource>,
    images: ImageUrlBuilder,
}

impl ContentClient {
    /// Create a client querying the HTTP API described by `settings`.
    pub fn new(settings: CmsSettings) -> Self {
        Self::with_http_client(reqwest::Client::new(), settings)
    }

    /// Create a client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_http_client(http: reqwest::Client, settings: CmsSettings) -> Self {
        let images = ImageUrlBuilder::from_settings(&settings);
        Self::with_source(Arc::new(SanityHttpSource::with_client(http, settings)), images)
    }

    /// Create a client over any [`ContentSource`].
    pub fn with_source(source: Arc<dyn ContentSource>, images: ImageUrlBuilder) -> Self {
        Self { source, images }
    }

    /// The image URL builder bound to this client's project and dataset.
    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    /// Resolve an image reference to a CDN URL of the given size.
    pub fn image_url(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        self.images.url(image, width, height)
    }

    /// All games, newest release first.
    #[instrument(skip(self))]
    pub async fn list_games(&self) -> Fetched<Vec<Game>> {
        settle(
            "list_games",
            cms::games::get_games(self.source.as_ref(), &self.images).await,
        )
    }

    /// A single game with its full description and trailer.
    #[instrument(skip(self))]
    pub async fn get_game_by_slug(&self, slug: &str) -> Fetched<Option<GameDetail>> {
        settle(
            "get_game_by_slug",
            cms::games::get_game_by_slug(self.source.as_ref(), &self.images, slug).await,
        )
    }

    /// Slugs of every game, for pre-rendering detail pages.
    #[instrument(skip(self))]
    pub async fn list_game_slugs(&self) -> Fetched<Vec<String>> {
        settle(
            "list_game_slugs",
            cms::games::get_game_slugs(self.source.as_ref()).await,
        )
    }

    /// All team members ordered by name.
    #[instrument(skip(self))]
    pub async fn list_team_members(&self) -> Fetched<Vec<TeamMember>> {
        settle(
            "list_team_members",
            cms::members::get_members(self.source.as_ref(), &self.images).await,
        )
    }

    /// A single team member with bio and favorite game.
    #[instrument(skip(self))]
    pub async fn get_member_by_slug(&self, slug: &str) -> Fetched<Option<MemberProfile>> {
        settle(
            "get_member_by_slug",
            cms::members::get_member_by_slug(self.source.as_ref(), &self.images, slug).await,
        )
    }

    /// Slugs of every team member, for pre-rendering member pages.
    #[instrument(skip(self))]
    pub async fn list_member_slugs(&self) -> Fetched<Vec<String>> {
        settle(
            "list_member_slugs",
            cms::members::get_member_slugs(self.source.as_ref()).await,
        )
    }
}

fn settle<T: Default>(operation: &'static str, result: Result<T>) -> Fetched<T> {
    let fetched = Fetched::settle(result);
    if let Some(error) = fetched.error() {
        warn!(operation, %error, "content fetch failed, serving empty fallback");
    }
    fetched
}
