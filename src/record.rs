use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize;

pub const UNTITLED: &str = "Untitled";

/// One dataset entry as it arrives over the wire.
///
/// Every field is optional and a field carrying the wrong JSON type is read
/// as absent, so a single odd record never fails the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaRecord {
    pub fn kind(&self) -> MediaKind {
        match self.media_type.as_deref() {
            None | Some("") | Some("image") => MediaKind::Image,
            Some("video") => MediaKind::Video,
            Some(_) => MediaKind::Other,
        }
    }

    pub fn url_str(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => UNTITLED,
        }
    }

    pub fn display_date(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    pub fn display_explanation(&self) -> &str {
        self.explanation.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub title: String,
    pub date: String,
    pub explanation: String,
    pub url: String,
    pub hdurl: Option<String>,
}

impl ImageEntry {
    pub fn best_url(&self) -> &str {
        match self.hdurl.as_deref() {
            Some(hd) if !hd.trim().is_empty() => hd,
            _ => &self.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    pub title: String,
    pub date: String,
    pub explanation: String,
    pub url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Image(ImageEntry),
    Video(VideoEntry),
}

impl Entry {
    pub fn from_record(record: &MediaRecord) -> Option<Self> {
        let title = record.display_title().to_string();
        let date = record.display_date().to_string();
        let explanation = record.display_explanation().to_string();
        match record.kind() {
            MediaKind::Image => Some(Entry::Image(ImageEntry {
                title,
                date,
                explanation,
                url: record.url_str().to_string(),
                hdurl: record.hdurl.clone(),
            })),
            MediaKind::Video => Some(Entry::Video(VideoEntry {
                title,
                date,
                explanation,
                url: record.url_str().to_string(),
                thumbnail_url: normalize::normalize(record).thumbnail_url,
            })),
            MediaKind::Other => None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Entry::Image(image) => &image.title,
            Entry::Video(video) => &video.title,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            Entry::Image(image) => &image.date,
            Entry::Video(video) => &video.date,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Entry::Image(image) => &image.explanation,
            Entry::Video(video) => &video.explanation,
        }
    }

    pub fn thumbnail_url(&self) -> &str {
        match self {
            Entry::Image(image) => &image.url,
            Entry::Video(video) => &video.thumbnail_url,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Entry::Video(_))
    }
}

pub fn supplemental() -> MediaRecord {
    MediaRecord {
        date: Some("2018-12-24".into()),
        title: Some("Earthrise".into()),
        explanation: Some(
            "Fifty years ago the crew of Apollo 8 watched the Earth rise over the \
             lunar horizon and took this photograph, the first colour image of our \
             planet seen from the vicinity of another world."
                .into(),
        ),
        media_type: Some("image".into()),
        url: Some("https://apod.nasa.gov/apod/image/1812/Earthrise_Apollo8_960.jpg".into()),
        hdurl: Some("https://apod.nasa.gov/apod/image/1812/Earthrise_Apollo8_3000.jpg".into()),
        thumbnail_url: None,
        service_version: Some("v1".into()),
    }
}
