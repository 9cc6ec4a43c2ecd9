use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{MediaKind, MediaRecord};

pub const PLACEHOLDER_THUMBNAIL: &str = "data:image/svg+xml;utf8,\
<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 320 180'>\
<rect width='320' height='180' fill='%2311151d'/>\
<polygon points='130,60 130,120 185,90' fill='%239aa3b7'/></svg>";

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:v=|/embed/|youtu\.be/)([A-Za-z0-9_-]{6,})").expect("valid video id regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub is_video: bool,
    pub thumbnail_url: String,
}

pub fn normalize(record: &MediaRecord) -> Normalized {
    if record.kind() != MediaKind::Video {
        return Normalized {
            is_video: false,
            thumbnail_url: record.url_str().to_string(),
        };
    }

    let thumbnail_url = match record.thumbnail_url.as_deref() {
        Some(thumb) if !thumb.trim().is_empty() => thumb.to_string(),
        _ => derived_video_thumbnail(record.url_str()),
    };
    Normalized {
        is_video: true,
        thumbnail_url,
    }
}

pub fn derived_video_thumbnail(url: &str) -> String {
    match extract_video_id(url) {
        Some(id) => youtube_thumbnail(id),
        None => PLACEHOLDER_THUMBNAIL.to_string(),
    }
}

pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn youtube_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id)
}
