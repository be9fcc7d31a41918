//! Media descriptors supplied by the presentation layer.

use serde::{Deserialize, Serialize};

/// File extensions treated as still images by [`MediaSource::from_url`].
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// One item of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaSource {
    /// Video item (MP4, HLS, DASH, ...). Needs a playback handle.
    Video {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail_url: Option<String>,
    },
    /// Still image. Rendered without a playback handle.
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_description: Option<String>,
    },
}

impl MediaSource {
    /// Create a video item without a thumbnail.
    pub fn video(url: impl Into<String>) -> Self {
        Self::Video {
            url: url.into(),
            thumbnail_url: None,
        }
    }

    /// Create an image item without a description.
    pub fn image(url: impl Into<String>) -> Self {
        Self::Image {
            url: url.into(),
            content_description: None,
        }
    }

    /// Classify a URL by its extension. Anything not recognised as an image is a video.
    pub fn from_url(url: impl Into<String>, thumbnail_url: Option<String>) -> Self {
        let url = url.into();
        let extension = url
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Self::image(url)
        } else {
            Self::Video { url, thumbnail_url }
        }
    }

    /// Media URL.
    pub fn url(&self) -> &str {
        match self {
            Self::Video { url, .. } | Self::Image { url, .. } => url,
        }
    }

    /// Whether showing this item needs a pooled playback handle.
    pub fn requires_handle(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}
