//! Video source classification.
//!
//! Platform links (YouTube, Vimeo) embed through an iframe that needs an
//! HTTP origin, so they diverge between preview and export. Everything else
//! is treated as a direct media file.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube { id: String },
    Vimeo { id: String },
    File { url: String },
}

fn youtube_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:https?:)?//(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/|v/)|youtu\.be/)([A-Za-z0-9_-]{6,})",
        )
        .expect("valid youtube pattern")
    })
}

fn vimeo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:https?:)?//(?:www\.|player\.)?vimeo\.com/(?:video/)?(\d+)")
            .expect("valid vimeo pattern")
    })
}

impl VideoSource {
    pub fn classify(url: &str) -> VideoSource {
        let url = url.trim();
        if let Some(caps) = youtube_pattern().captures(url) {
            return VideoSource::YouTube {
                id: caps[1].to_string(),
            };
        }
        if let Some(caps) = vimeo_pattern().captures(url) {
            return VideoSource::Vimeo {
                id: caps[1].to_string(),
            };
        }
        VideoSource::File {
            url: url.to_string(),
        }
    }

    pub fn is_platform(&self) -> bool {
        !matches!(self, VideoSource::File { .. })
    }

    pub fn platform_name(&self) -> Option<&'static str> {
        match self {
            VideoSource::YouTube { .. } => Some("YouTube"),
            VideoSource::Vimeo { .. } => Some("Vimeo"),
            VideoSource::File { .. } => None,
        }
    }

    /// iframe URL for the hosted preview
    pub fn embed_url(&self) -> Option<String> {
        match self {
            VideoSource::YouTube { id } => Some(format!("https://www.youtube.com/embed/{}", id)),
            VideoSource::Vimeo { id } => Some(format!("https://player.vimeo.com/video/{}", id)),
            VideoSource::File { .. } => None,
        }
    }

    /// Canonical page a standalone export links to
    pub fn watch_url(&self) -> String {
        match self {
            VideoSource::YouTube { id } => format!("https://www.youtube.com/watch?v={}", id),
            VideoSource::Vimeo { id } => format!("https://vimeo.com/{}", id),
            VideoSource::File { url } => url.clone(),
        }
    }

    /// Still frame usable without an embed, where the platform exposes one
    pub fn thumbnail_url(&self) -> Option<String> {
        match self {
            VideoSource::YouTube { id } => {
                Some(format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id))
            }
            _ => None,
        }
    }
}
