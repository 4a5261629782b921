use chrono::NaiveDate;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cms::{
    decode, decode_optional, queries, ContentSource, ImageUrlBuilder, PLACEHOLDER_COVER,
};
use crate::error::Result;
use crate::model::{
    present, sort_by_release_desc, DocumentId, Game, GameDetail, ImageRef, PlatformLinks,
    RichText, Screenshot,
};

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const COVER_SIZE: (u32, u32) = (800, 600);
pub(crate) const SCREENSHOT_SIZE: (u32, u32) = (1920, 1080);

/// A `game` document as returned by the queries in [`queries`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawGame {
    #[serde(rename = "_id")]
    id: String,
    title: Option<String>,
    slug: Option<String>,
    short_description: Option<String>,
    #[serde(default)]
    full_description: Option<RichText>,
    cover_image: Option<ImageRef>,
    screenshots: Option<Vec<ImageRef>>,
    release_date: Option<String>,
    genre: Option<String>,
    platform_links: Option<RawPlatformLinks>,
    #[serde(default)]
    video_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlatformLinks {
    steam: Option<String>,
    itch: Option<String>,
    google_play: Option<String>,
}

#[instrument(skip(source, images))]
pub(crate) async fn get_games(
    source: &dyn ContentSource,
    images: &ImageUrlBuilder,
) -> Result<Vec<Game>> {
    let value = source.query(queries::GAMES_QUERY, &[]).await?;
    let documents: Vec<Value> = decode(value, "game list")?;
    let mut games = documents
        .into_iter()
        .filter_map(|doc| match decode::<RawGame>(doc, "game") {
            Ok(raw) => Some(normalize_game(raw, images)),
            Err(e) => {
                debug!(error = %e, "skipping malformed game document");
                None
            }
        })
        .collect_vec();
    sort_by_release_desc(&mut games);

    debug!(count = games.len(), "fetched games");
    Ok(games)
}

#[instrument(skip(source, images))]
pub(crate) async fn get_game_by_slug(
    source: &dyn ContentSource,
    images: &ImageUrlBuilder,
    slug: &str,
) -> Result<Option<GameDetail>> {
    let params = [("slug", Value::String(slug.to_string()))];
    let value = source.query(queries::GAME_BY_SLUG_QUERY, &params).await?;
    let game = decode_optional::<RawGame>(value, "game")?.map(|raw| normalize_detail(raw, images));

    debug!(found = game.is_some(), "fetched game");
    Ok(game)
}

#[instrument(skip(source))]
pub(crate) async fn get_game_slugs(source: &dyn ContentSource) -> Result<Vec<String>> {
    let value = source.query(queries::GAME_SLUGS_QUERY, &[]).await?;
    let slugs: Vec<Option<String>> = decode(value, "game slugs")?;
    Ok(slugs.into_iter().flatten().filter(|s| !s.is_empty()).collect())
}

pub(crate) fn normalize_game(raw: RawGame, images: &ImageUrlBuilder) -> Game {
    let (cover_w, cover_h) = COVER_SIZE;
    let (shot_w, shot_h) = SCREENSHOT_SIZE;
    let links = raw.platform_links.unwrap_or_default();

    Game {
        id: DocumentId(raw.id),
        title: raw.title.unwrap_or_default(),
        slug: raw.slug.unwrap_or_default(),
        short_description: raw.short_description.unwrap_or_default(),
        cover_image: images.url_or(
            raw.cover_image.as_ref(),
            cover_w,
            cover_h,
            PLACEHOLDER_COVER,
        ),
        screenshots: raw
            .screenshots
            .unwrap_or_default()
            .iter()
            .filter_map(|shot| images.url(shot, shot_w, shot_h))
            .collect(),
        release_date: raw.release_date.as_deref().and_then(parse_release_date),
        genre: present(raw.genre),
        links: PlatformLinks {
            steam: present(links.steam),
            itch: present(links.itch),
            google_play: present(links.google_play),
        },
    }
}

fn normalize_detail(mut raw: RawGame, images: &ImageUrlBuilder) -> GameDetail {
    let (shot_w, shot_h) = SCREENSHOT_SIZE;
    let full_description = raw.full_description.take().unwrap_or_default();
    let trailer_url = present(raw.video_url.take());
    let cover_ref = raw.cover_image.clone();
    let title = raw.title.clone().unwrap_or_default();
    let gallery = raw
        .screenshots
        .iter()
        .flatten()
        .filter_map(|shot| {
            images.url(shot, shot_w, shot_h).map(|url| Screenshot {
                url,
                alt: shot.alt.clone().unwrap_or_else(|| title.clone()),
            })
        })
        .collect();

    GameDetail {
        game: normalize_game(raw, images),
        full_description,
        trailer_url,
        gallery,
        cover_ref,
    }
}

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), RELEASE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(raw, error = %e, "ignoring unparseable release date");
            None
        }
    }
}
