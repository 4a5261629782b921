//! Page orchestration: fetch content, handle not-found, build page models.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::cache::{Cacheable, RenderPolicy};
use crate::client::ContentClient;
use crate::model::{display_tags, Game, GameDetail, MemberProfile, TeamMember};
use crate::render::{GAME_BODY, MEMBER_BIO};

const FEATURED_GAMES: usize = 3;
const SHARE_IMAGE_SIZE: (u32, u32) = (1200, 630);
const RELEASE_LABEL_FORMAT: &str = "%B %-d, %Y";
const TO_BE_ANNOUNCED: &str = "TBA";

const HOME_REVALIDATE_SECS: u64 = 60;
const ABOUT_REVALIDATE_SECS: u64 = 60;
const DETAIL_REVALIDATE_SECS: u64 = 60;

/// Identity of the site, used for titles and canonical links.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub name: String,
    pub url: String,
}

impl SiteInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into().trim_end_matches('/').to_string(),
        }
    }

    fn canonical(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

/// A page of the site.
#[derive(Debug, Clone, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Route {
    Home,
    About,
    Games,
    Game(String),
    Member(String),
    Contact,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Games => "/games".to_string(),
            Route::Game(slug) => format!("/game/{slug}"),
            Route::Member(slug) => format!("/team/{slug}"),
            Route::Contact => "/contact".to_string(),
        }
    }

    pub fn policy(&self) -> RenderPolicy {
        match self {
            Route::Home => RenderPolicy::revalidate_secs(HOME_REVALIDATE_SECS),
            Route::About => RenderPolicy::revalidate_secs(ABOUT_REVALIDATE_SECS),
            // The listing must reflect CMS edits immediately.
            Route::Games => RenderPolicy::Dynamic,
            Route::Game(_) | Route::Member(_) => {
                RenderPolicy::revalidate_secs(DETAIL_REVALIDATE_SECS)
            }
            Route::Contact => RenderPolicy::Static,
        }
    }
}

/// Head metadata for a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

/// A fully rendered page model.
#[derive(Debug, Clone, Serialize)]
pub struct PageOutput {
    pub route: String,
    pub meta: PageMeta,
    pub body: PageBody,
    /// Set when some content fell back to an empty value.
    #[serde(skip)]
    pub degraded: bool,
}

impl PageOutput {
    /// Whether this page should be served with a 404 status.
    pub fn is_not_found(&self) -> bool {
        matches!(self.body, PageBody::NotFound(_))
    }
}

impl Cacheable for PageOutput {
    /// Degraded pages and 404s are never stored. Any path can produce a 404,
    /// so storing them would let the cache grow with every unknown slug.
    fn cacheable(&self) -> bool {
        !self.degraded && !self.is_not_found()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PageBody {
    Home(HomePage),
    About(AboutPage),
    Games(GamesPage),
    Game(Box<GameDetailPage>),
    Member(Box<MemberPage>),
    Contact(ContactPage),
    NotFound(NotFoundPage),
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub featured_games: Vec<Game>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutPage {
    pub team: Vec<TeamMember>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GamesPage {
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameDetailPage {
    pub game: GameDetail,
    pub description_html: Option<String>,
    pub release_label: String,
    pub platforms: Vec<String>,
    pub studio: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberPage {
    pub member: MemberProfile,
    pub tags: Vec<String>,
    pub bio_html: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactPage {
    pub endpoint: &'static str,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotFoundPage {
    pub message: String,
}

/// Builds page models from CMS content.
#[derive(Clone)]
pub struct SiteRenderer {
    client: ContentClient,
    site: SiteInfo,
}

impl SiteRenderer {
    pub fn new(client: ContentClient, site: SiteInfo) -> Self {
        Self { client, site }
    }

    /// The content client pages are built from.
    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    /// Site identity used in titles and canonical links.
    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    /// Render any route; unknown slugs produce a not-found page.
    #[instrument(skip(self, route), fields(route = %route))]
    pub async fn render(&self, route: &Route) -> PageOutput {
        let page = match route {
            Route::Home => self.home().await,
            Route::About => self.about().await,
            Route::Games => self.games().await,
            Route::Game(slug) => self.game(slug).await,
            Route::Member(slug) => self.member(slug).await,
            Route::Contact => self.contact(),
        };
        debug!(
            degraded = page.degraded,
            not_found = page.is_not_found(),
            "rendered page"
        );
        page
    }

    /// Every route that can be rendered ahead of time.
    pub async fn prerender_routes(&self) -> Vec<Route> {
        let mut routes = vec![Route::Home, Route::About, Route::Contact];
        let game_slugs = self.client.list_game_slugs().await.into_value();
        let member_slugs = self.client.list_member_slugs().await.into_value();
        routes.extend(game_slugs.into_iter().map(Route::Game));
        routes.extend(member_slugs.into_iter().map(Route::Member));
        routes
    }

    /// Landing page featuring the newest games.
    pub async fn home(&self) -> PageOutput {
        let (mut games, degraded) = self.client.list_games().await.into_parts();
        games.truncate(FEATURED_GAMES);

        PageOutput {
            route: Route::Home.path(),
            meta: self.meta(
                &Route::Home,
                format!("{} | Game Studio", self.site.name),
                format!(
                    "{} is a game studio crafting immersive digital worlds and unique experiences.",
                    self.site.name
                ),
            ),
            body: PageBody::Home(HomePage {
                featured_games: games,
            }),
            degraded,
        }
    }

    /// Studio page listing the team.
    pub async fn about(&self) -> PageOutput {
        let (team, degraded) = self.client.list_team_members().await.into_parts();

        PageOutput {
            route: Route::About.path(),
            meta: self.meta(
                &Route::About,
                format!("About Us | {}", self.site.name),
                format!(
                    "Meet {}, a studio dedicated to building memorable games.",
                    self.site.name
                ),
            ),
            body: PageBody::About(AboutPage { team }),
            degraded,
        }
    }

    /// Every game, newest first.
    pub async fn games(&self) -> PageOutput {
        let (games, degraded) = self.client.list_games().await.into_parts();

        PageOutput {
            route: Route::Games.path(),
            meta: self.meta(
                &Route::Games,
                format!("Games | {}", self.site.name),
                format!("Explore every game developed by {}.", self.site.name),
            ),
            body: PageBody::Games(GamesPage { games }),
            degraded,
        }
    }

    /// Game detail page, or not-found for an unknown slug.
    pub async fn game(&self, slug: &str) -> PageOutput {
        let route = Route::Game(slug.to_string());
        let (game, degraded) = self.client.get_game_by_slug(slug).await.into_parts();
        let Some(game) = game else {
            return self.not_found(&route, "Game not found", degraded);
        };

        let images = self.client.images();
        let (share_w, share_h) = SHARE_IMAGE_SIZE;
        let og_image = game
            .cover_ref
            .as_ref()
            .and_then(|cover| images.url(cover, share_w, share_h))
            .unwrap_or_else(|| self.site.canonical("/og-image.jpg"));
        let description_html = (!game.full_description.is_empty())
            .then(|| GAME_BODY.render(&game.full_description, images));
        let release_label = game
            .game
            .release_date
            .map(|d| d.format(RELEASE_LABEL_FORMAT).to_string())
            .unwrap_or_else(|| TO_BE_ANNOUNCED.to_string());
        let platforms = game
            .game
            .links
            .platforms()
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut meta = self.meta(
            &route,
            format!("{} | {}", game.game.title, self.site.name),
            game.game.short_description.clone(),
        );
        meta.og_image = Some(og_image);

        PageOutput {
            route: route.path(),
            meta,
            body: PageBody::Game(Box::new(GameDetailPage {
                game,
                description_html,
                release_label,
                platforms,
                studio: self.site.name.clone(),
            })),
            degraded,
        }
    }

    /// Team member page, or not-found for an unknown slug.
    pub async fn member(&self, slug: &str) -> PageOutput {
        let route = Route::Member(slug.to_string());
        let (member, degraded) = self.client.get_member_by_slug(slug).await.into_parts();
        let Some(member) = member else {
            return self.not_found(&route, "Member not found", degraded);
        };

        let images = self.client.images();
        let (share_w, share_h) = SHARE_IMAGE_SIZE;
        let og_image = member
            .avatar_ref
            .as_ref()
            .and_then(|avatar| images.url(avatar, share_w, share_h))
            .unwrap_or_else(|| self.site.canonical("/og-image.jpg"));
        let role = if member.member.role.is_empty() {
            format!("Member of {}", self.site.name)
        } else {
            member.member.role.clone()
        };
        let bio_html = (!member.bio.is_empty()).then(|| MEMBER_BIO.render(&member.bio, images));
        let tags = display_tags(&member.member.skills);

        let mut meta = self.meta(
            &route,
            format!("{} | {}", member.member.name, self.site.name),
            format!("{role} - {} at {}", member.member.name, self.site.name),
        );
        meta.og_image = Some(og_image);

        PageOutput {
            route: route.path(),
            meta,
            body: PageBody::Member(Box::new(MemberPage {
                member,
                tags,
                bio_html,
            })),
            degraded,
        }
    }

    /// Contact page describing the form fields. Needs no content.
    pub fn contact(&self) -> PageOutput {
        let field = |name, label, input| FormField {
            name,
            label,
            input,
            required: true,
        };

        PageOutput {
            route: Route::Contact.path(),
            meta: self.meta(
                &Route::Contact,
                format!("Contact | {}", self.site.name),
                format!("Get in touch with {}.", self.site.name),
            ),
            body: PageBody::Contact(ContactPage {
                endpoint: "/api/contact",
                fields: vec![
                    field("name", "Name", "text"),
                    field("email", "Email", "email"),
                    field("subject", "Subject", "text"),
                    field("message", "Message", "textarea"),
                ],
            }),
            degraded: false,
        }
    }

    fn not_found(&self, route: &Route, title: &str, degraded: bool) -> PageOutput {
        PageOutput {
            route: route.path(),
            meta: self.meta(
                route,
                format!("{title} | {}", self.site.name),
                "The page you are looking for could not be found.".to_string(),
            ),
            body: PageBody::NotFound(NotFoundPage {
                message: title.to_string(),
            }),
            degraded,
        }
    }

    fn meta(&self, route: &Route, title: String, description: String) -> PageMeta {
        PageMeta {
            title,
            description,
            canonical_url: self.site.canonical(&route.path()),
            og_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::cms::memory::MemorySource;
    use crate::cms::ImageUrlBuilder;

    fn renderer(source: MemorySource) -> SiteRenderer {
        let client = ContentClient::with_source(
            Arc::new(source),
            ImageUrlBuilder::new("proj", "production"),
        );
        SiteRenderer::new(client, SiteInfo::new("Team Staircase", "https://example.com/"))
    }

    fn seeded() -> MemorySource {
        let mut source = MemorySource::new();
        for (i, date) in ["2021-01-01", "2022-01-01", "2023-01-01", "2024-01-01"]
            .iter()
            .enumerate()
        {
            source = source.with_game(json!({
                "_id": format!("game-{i}"),
                "title": format!("Game {i}"),
                "slug": format!("game-{i}"),
                "releaseDate": date
            }));
        }
        source
            .with_game(json!({
                "_id": "tba",
                "title": "Secret Project",
                "slug": "secret",
                "shortDescription": "Shh.",
                "coverImage": { "asset": { "_ref": "image-cov-1200x675-png" } },
                "fullDescription": [{ "_type": "block", "children": [{ "text": "Soon" }] }],
                "platformLinks": { "itch": "https://studio.itch.io/secret" }
            }))
            .with_member(json!({
                "_id": "m1",
                "name": "Ana",
                "slug": "ana",
                "skills": ["Unity", " Unity", "C#", ""],
                "bio": [{ "_type": "block", "style": "h2", "children": [{ "text": "Hello" }] }]
            }))
    }

    #[tokio::test]
    async fn test_home_features_three_newest() {
        let page = renderer(seeded()).home().await;
        let PageBody::Home(home) = &page.body else {
            panic!("expected home page");
        };
        let slugs: Vec<&str> = home.featured_games.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, vec!["game-3", "game-2", "game-1"]);
        assert_eq!(page.meta.canonical_url, "https://example.com/");
        assert!(!page.degraded);
    }

    #[tokio::test]
    async fn test_game_detail_page() {
        let page = renderer(seeded()).render(&Route::Game("secret".to_string())).await;
        let PageBody::Game(detail) = &page.body else {
            panic!("expected game page");
        };
        assert_eq!(detail.game.game.slug, "secret");
        assert_eq!(detail.release_label, "TBA");
        assert_eq!(detail.platforms, vec!["itch.io"]);
        assert_eq!(detail.description_html.as_deref(), Some("<p>Soon</p>"));
        assert_eq!(page.meta.title, "Secret Project | Team Staircase");
        assert_eq!(page.meta.canonical_url, "https://example.com/game/secret");
        assert!(page
            .meta
            .og_image
            .as_deref()
            .unwrap()
            .contains("w=1200&h=630"));
    }

    #[tokio::test]
    async fn test_dated_game_release_label() {
        let page = renderer(seeded()).game("game-1").await;
        let PageBody::Game(detail) = &page.body else {
            panic!("expected game page");
        };
        assert_eq!(detail.release_label, "January 1, 2022");
        assert!(detail.description_html.is_none());
    }

    #[tokio::test]
    async fn test_unknown_slugs_render_not_found() {
        let renderer = renderer(seeded());
        let game = renderer.game("nope").await;
        assert!(game.is_not_found());
        assert!(!game.degraded);

        let member = renderer.member("nope").await;
        assert!(member.is_not_found());
        assert_eq!(member.route, "/team/nope");

        assert!(!game.cacheable());
        assert!(!member.cacheable());
        assert!(renderer.game("secret").await.cacheable());
    }

    #[tokio::test]
    async fn test_member_page_dedupes_tags() {
        let page = renderer(seeded()).member("ana").await;
        let PageBody::Member(member) = &page.body else {
            panic!("expected member page");
        };
        assert_eq!(member.tags, vec!["Unity", "C#"]);
        assert_eq!(member.bio_html.as_deref(), Some("<h2>Hello</h2>"));
        assert_eq!(page.meta.description, "Unity - Ana at Team Staircase");
        assert_eq!(
            page.meta.og_image.as_deref(),
            Some("https://example.com/og-image.jpg")
        );
    }

    #[tokio::test]
    async fn test_outage_marks_pages_degraded() {
        let renderer = renderer(MemorySource::failing());

        let games = renderer.games().await;
        assert!(games.degraded);
        assert!(!games.cacheable());
        let PageBody::Games(list) = &games.body else {
            panic!("expected games page");
        };
        assert!(list.games.is_empty());

        let detail = renderer.game("secret").await;
        assert!(detail.is_not_found());
        assert!(detail.degraded);
    }

    #[tokio::test]
    async fn test_prerender_routes_include_detail_pages() {
        let routes = renderer(seeded()).prerender_routes().await;
        assert!(routes.contains(&Route::Game("secret".to_string())));
        assert!(routes.contains(&Route::Member("ana".to_string())));
        assert!(routes.contains(&Route::Contact));
        assert!(!routes.contains(&Route::Games));
    }

    #[test]
    fn test_route_policies() {
        assert_eq!(Route::Games.policy(), RenderPolicy::Dynamic);
        assert_eq!(Route::Home.policy(), RenderPolicy::revalidate_secs(60));
        assert_eq!(Route::Contact.policy(), RenderPolicy::Static);
        assert_eq!(Route::Member("a".to_string()).path(), "/team/a");
    }

    #[test]
    fn test_page_body_serialization() {
        let page = renderer(MemorySource::new()).contact();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["body"]["kind"], "contact");
        assert_eq!(json["body"]["data"]["fields"].as_array().unwrap().len(), 4);
        assert!(json.get("degraded").is_none());
    }
}
