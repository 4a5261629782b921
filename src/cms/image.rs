use crate::cms::CmsSettings;
use crate::model::ImageRef;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

pub const PLACEHOLDER_COVER: &str = "/api/placeholder/800/600";
pub const PLACEHOLDER_AVATAR: &str = "/api/placeholder/400/400";

/// Resolves [`ImageRef`]s into sized CDN URLs.
///
/// Asset references have the form `image-<hash>-<W>x<H>-<format>`.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    pub fn from_settings(settings: &CmsSettings) -> Self {
        Self::new(&settings.project_id, &settings.dataset)
    }

    /// URL for `image` cropped to `width`×`height`, or `None` if the image
    /// has no asset yet or the reference is not an image asset id.
    pub fn url(&self, image: &ImageRef, width: u32, height: u32) -> Option<String> {
        let (hash, dimensions, format) = parse_asset_ref(&image.asset.as_ref()?.reference)?;
        Some(format!(
            "{CDN_BASE}/{}/{}/{hash}-{dimensions}.{format}?w={width}&h={height}&fit=crop",
            self.project_id, self.dataset
        ))
    }

    /// Like [`url`](Self::url) but substitutes `placeholder` for missing or
    /// unusable references.
    pub fn url_or(
        &self,
        image: Option<&ImageRef>,
        width: u32,
        height: u32,
        placeholder: &str,
    ) -> String {
        image
            .and_then(|image| self.url(image, width, height))
            .unwrap_or_else(|| placeholder.to_string())
    }
}

fn parse_asset_ref(reference: &str) -> Option<(&str, &str, &str)> {
    let rest = reference.strip_prefix("image-")?;
    let (rest, format) = rest.rsplit_once('-')?;
    let (hash, dimensions) = rest.rsplit_once('-')?;
    let (w, h) = dimensions.split_once('x')?;
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if hash.is_empty() || format.is_empty() || !numeric(w) || !numeric(h) {
        return None;
    }
    Some((hash, dimensions, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ImageUrlBuilder {
        ImageUrlBuilder::new("abc123", "production")
    }

    #[test]
    fn test_url_is_deterministic() {
        let image = ImageRef::new("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg");
        let url = builder().url(&image, 800, 600).unwrap();
        assert_eq!(
            url,
            "https://cdn.sanity.io/images/abc123/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?w=800&h=600&fit=crop"
        );
        assert_eq!(builder().url(&image, 800, 600).unwrap(), url);
    }

    #[test]
    fn test_invalid_reference() {
        for reference in [
            "file-abc-pdf",
            "image-abc-png",
            "image-abc-12xq-png",
            "image--10x10-png",
            "",
        ] {
            assert!(
                builder().url(&ImageRef::new(reference), 10, 10).is_none(),
                "expected {reference:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_pending_upload_has_no_url() {
        let image: ImageRef =
            serde_json::from_value(serde_json::json!({ "_type": "image" })).unwrap();
        assert!(image.asset.is_none());
        assert!(builder().url(&image, 10, 10).is_none());
        assert_eq!(
            builder().url_or(Some(&image), 800, 600, PLACEHOLDER_COVER),
            PLACEHOLDER_COVER
        );
    }

    #[test]
    fn test_url_or_placeholder() {
        assert_eq!(
            builder().url_or(None, 800, 600, PLACEHOLDER_COVER),
            PLACEHOLDER_COVER
        );
        let image = ImageRef::new("image-abc-400x400-webp");
        assert!(builder()
            .url_or(Some(&image), 400, 400, PLACEHOLDER_AVATAR)
            .ends_with("abc-400x400.webp?w=400&h=400&fit=crop"));
    }
}
