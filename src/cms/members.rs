use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cms::{
    decode, decode_optional, queries, ContentSource, ImageUrlBuilder, PLACEHOLDER_AVATAR,
};
use crate::error::Result;
use crate::model::{
    present, sort_by_name, DocumentId, ImageRef, MemberProfile, RichText, SocialLinks, TeamMember,
};

pub(crate) const AVATAR_SIZE: (u32, u32) = (400, 400);

/// A `member` document as returned by the queries in [`queries`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMember {
    #[serde(rename = "_id")]
    id: String,
    name: Option<String>,
    slug: Option<String>,
    avatar: Option<ImageRef>,
    #[serde(default)]
    bio: Option<RichText>,
    skills: Option<Vec<Option<String>>>,
    #[serde(default)]
    favorite_game: Option<String>,
    linkedin_url: Option<String>,
    github_url: Option<String>,
    #[serde(default)]
    artstation_url: Option<String>,
}

#[instrument(skip(source, images))]
pub(crate) async fn get_members(
    source: &dyn ContentSource,
    images: &ImageUrlBuilder,
) -> Result<Vec<TeamMember>> {
    let value = source.query(queries::TEAM_QUERY, &[]).await?;
    let documents: Vec<Value> = decode(value, "member list")?;
    let mut members = documents
        .into_iter()
        .filter_map(|doc| match decode::<RawMember>(doc, "member") {
            Ok(raw) => Some(normalize_member(raw, images)),
            Err(e) => {
                debug!(error = %e, "skipping malformed member document");
                None
            }
        })
        .collect_vec();
    sort_by_name(&mut members);

    debug!(count = members.len(), "fetched team members");
    Ok(members)
}

#[instrument(skip(source, images))]
pub(crate) async fn get_member_by_slug(
    source: &dyn ContentSource,
    images: &ImageUrlBuilder,
    slug: &str,
) -> Result<Option<MemberProfile>> {
    let params = [("slug", Value::String(slug.to_string()))];
    let value = source.query(queries::MEMBER_BY_SLUG_QUERY, &params).await?;
    let member =
        decode_optional::<RawMember>(value, "member")?.map(|raw| normalize_profile(raw, images));

    debug!(found = member.is_some(), "fetched member");
    Ok(member)
}

#[instrument(skip(source))]
pub(crate) async fn get_member_slugs(source: &dyn ContentSource) -> Result<Vec<String>> {
    let value = source.query(queries::MEMBER_SLUGS_QUERY, &[]).await?;
    let slugs: Vec<Option<String>> = decode(value, "member slugs")?;
    Ok(slugs.into_iter().flatten().filter(|s| !s.is_empty()).collect())
}

pub(crate) fn normalize_member(raw: RawMember, images: &ImageUrlBuilder) -> TeamMember {
    let (avatar_w, avatar_h) = AVATAR_SIZE;
    let skills: Vec<String> = raw.skills.unwrap_or_default().into_iter().flatten().collect();
    let socials = SocialLinks {
        linkedin: present(raw.linkedin_url),
        github: present(raw.github_url),
        artstation: present(raw.artstation_url),
    };

    TeamMember {
        id: DocumentId(raw.id),
        name: raw.name.unwrap_or_default(),
        slug: raw.slug.unwrap_or_default(),
        role: skills.first().cloned().unwrap_or_default(),
        photo: images.url_or(raw.avatar.as_ref(), avatar_w, avatar_h, PLACEHOLDER_AVATAR),
        social_link: socials.primary().unwrap_or_default().to_string(),
        skills,
        socials,
    }
}

fn normalize_profile(mut raw: RawMember, images: &ImageUrlBuilder) -> MemberProfile {
    let bio = raw.bio.take().unwrap_or_default();
    let favorite_game = present(raw.favorite_game.take());
    let avatar_ref = raw.avatar.clone();

    MemberProfile {
        member: normalize_member(raw, images),
        bio,
        favorite_game,
        avatar_ref,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cms::memory::MemorySource;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new("proj", "production")
    }

    fn raw(doc: Value) -> RawMember {
        serde_json::from_value(doc).unwrap()
    }

    #[test]
    fn test_role_is_first_skill() {
        let member = normalize_member(
            raw(json!({
                "_id": "m-1",
                "name": "Ana",
                "slug": "ana",
                "skills": ["Lead Artist", "Pixel Art"],
                "githubUrl": "https://github.com/ana"
            })),
            &images(),
        );
        assert_eq!(member.role, "Lead Artist");
        assert_eq!(member.social_link, "https://github.com/ana");
        assert_eq!(member.photo, PLACEHOLDER_AVATAR);
        assert_eq!(
            serde_json::to_value(&member.socials).unwrap(),
            json!({ "github": "https://github.com/ana" })
        );
    }

    #[test]
    fn test_no_skills_gives_empty_role() {
        let member = normalize_member(
            raw(json!({ "_id": "m-2", "name": "Bruno", "skills": null })),
            &images(),
        );
        assert_eq!(member.role, "");
        assert!(member.skills.is_empty());
        assert_eq!(member.social_link, "");
    }

    #[test]
    fn test_profile_keeps_bio_and_favorite_game() {
        let profile = normalize_profile(
            raw(json!({
                "_id": "m-3",
                "name": "Carla",
                "slug": "carla",
                "avatar": { "asset": { "_ref": "image-av-400x400-png" } },
                "bio": [{ "_type": "block", "children": [{ "text": "Hi" }] }],
                "favoriteGame": "Celeste"
            })),
            &images(),
        );
        assert_eq!(profile.bio.len(), 1);
        assert_eq!(profile.favorite_game.as_deref(), Some("Celeste"));
        assert!(profile.avatar_ref.is_some());
        assert!(profile.member.photo.contains("av-400x400.png?w=400&h=400"));
    }

    #[tokio::test]
    async fn test_get_members_sorted_by_name() {
        let source = MemorySource::new()
            .with_member(json!({ "_id": "1", "name": "Carla", "slug": "carla" }))
            .with_member(json!({ "_id": "2", "name": "Ana", "slug": "ana" }))
            .with_member(json!({ "_id": "3", "name": "Bruno", "slug": "bruno" }));

        let members = get_members(&source, &images()).await.unwrap();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
    }

    #[tokio::test]
    async fn test_get_member_by_slug_and_slugs() {
        let source = MemorySource::new()
            .with_member(json!({ "_id": "1", "name": "Ana", "slug": "ana" }))
            .with_member(json!({ "_id": "2", "name": "No Slug" }));

        let ana = get_member_by_slug(&source, &images(), "ana").await.unwrap();
        assert_eq!(ana.unwrap().member.slug, "ana");
        assert!(get_member_by_slug(&source, &images(), "zed")
            .await
            .unwrap()
            .is_none());
        assert_eq!(get_member_slugs(&source).await.unwrap(), vec!["ana"]);
    }
}
