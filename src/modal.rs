use maud::{html, Markup};

use crate::embed::{self, EmbedDecision};
use crate::gallery::human_date;
use crate::record::Entry;
use crate::surface::{Bindings, Key, RegionId, Surface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Image { src: String },
    Embed { src: String, provider: &'static str },
    LinkOut { thumbnail_url: String, href: String },
}

pub fn select_presentation(entry: &Entry) -> Presentation {
    match entry {
        Entry::Image(image) => Presentation::Image {
            src: image.best_url().to_string(),
        },
        Entry::Video(video) => match embed::classify(&video.url) {
            EmbedDecision::Embed { src, provider } => Presentation::Embed { src, provider },
            EmbedDecision::LinkOut => Presentation::LinkOut {
                thumbnail_url: video.thumbnail_url.clone(),
                href: video.url.clone(),
            },
        },
    }
}

pub fn content_markup(entry: &Entry) -> Markup {
    let presentation = select_presentation(entry);
    html! {
        article.modal-entry {
            @match &presentation {
                Presentation::Image { src } => {
                    figure.modal-media {
                        img src=(src) alt=(entry.title());
                    }
                },
                Presentation::Embed { src, provider } => {
                    div.modal-media.aspect-video {
                        iframe src=(src) title=(entry.title()) data-provider=(provider)
                            allow="accelerometer; encrypted-media; gyroscope; picture-in-picture"
                            allowfullscreen
                            referrerpolicy="strict-origin-when-cross-origin" {}
                    }
                },
                Presentation::LinkOut { thumbnail_url, .. } => {
                    figure.modal-media {
                        img src=(thumbnail_url) alt=(entry.title());
                    }
                },
            }
            header.modal-header {
                h2 #modal-title { (entry.title()) }
                @if !entry.date().is_empty() {
                    time.modal-date datetime=(entry.date()) { (human_date(entry.date())) }
                }
            }
            @if !entry.explanation().is_empty() {
                p.modal-explanation { (entry.explanation()) }
            }
            @match &presentation {
                Presentation::LinkOut { href, .. } => {
                    a.outbound href=(href) target="_blank" rel="noopener noreferrer" {
                        "Watch on the original site ↗"
                    }
                },
                _ => {},
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Overlay,
    Control,
    Escape,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseReason::Overlay => "overlay",
            CloseReason::Control => "control",
            CloseReason::Escape => "escape",
        }
    }
}

pub struct ModalPresenter {
    container: RegionId,
    body: RegionId,
    close_control: RegionId,
    return_focus: RegionId,
    state: ModalState,
}

impl ModalPresenter {
    pub fn new(bindings: &Bindings) -> Self {
        Self {
            container: bindings.modal,
            body: bindings.modal_body,
            close_control: bindings.modal_close,
            return_focus: bindings.trigger,
            state: ModalState::Closed,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    pub fn reset(&mut self, surface: &mut dyn Surface) {
        surface.clear(self.body);
        surface.set_hidden(self.container, true);
        surface.set_scroll_locked(false);
        self.state = ModalState::Closed;
    }

    pub fn open(&mut self, surface: &mut dyn Surface, entry: &Entry) {
        surface.replace(self.body, content_markup(entry));
        surface.set_hidden(self.container, false);
        surface.set_scroll_locked(true);
        surface.focus(self.close_control);
        self.state = ModalState::Open;
        tracing::debug!(title = entry.title(), "modal opened");
    }

    pub fn close(&mut self, surface: &mut dyn Surface, reason: CloseReason) -> bool {
        if self.state == ModalState::Closed {
            return false;
        }
        surface.set_hidden(self.container, true);
        surface.set_scroll_locked(false);
        surface.clear(self.body);
        surface.focus(self.return_focus);
        self.state = ModalState::Closed;
        tracing::debug!(reason = reason.as_str(), "modal closed");
        true
    }

    pub fn handle_key(&mut self, surface: &mut dyn Surface, key: Key) -> bool {
        match key {
            Key::Escape if self.is_open() => self.close(surface, CloseReason::Escape),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use crate::record::MediaRecord;
    use crate::surface::Document;

    fn entry(media_type: &str, url: &str) -> Entry {
        Entry::from_record(&MediaRecord {
            title: Some("Sample".into()),
            date: Some("2024-03-01".into()),
            explanation: Some("A galaxy far away.".into()),
            media_type: Some(media_type.into()),
            url: Some(url.into()),
            ..MediaRecord::default()
        })
        .expect("image or video entry")
    }

    #[test]
    fn watch_url_selects_embed_mode() {
        let video = entry("video", "https://www.youtube.com/watch?v=XYZ");
        assert_eq!(
            select_presentation(&video),
            Presentation::Embed {
                src: "https://www.youtube.com/embed/XYZ".into(),
                provider: "YouTube",
            }
        );
        let html = content_markup(&video).into_string();
        assert!(html.contains("<iframe"));
        assert!(html.contains("aspect-video"));
    }

    #[test]
    fn untrusted_video_selects_link_out() {
        let video = entry("video", "https://example.com/video.mp4");
        match select_presentation(&video) {
            Presentation::LinkOut { href, thumbnail_url } => {
                assert_eq!(href, "https://example.com/video.mp4");
                assert_eq!(thumbnail_url, normalize::PLACEHOLDER_THUMBNAIL);
            }
            other => panic!("unexpected presentation {other:?}"),
        }
        let html = content_markup(&video).into_string();
        assert!(!html.contains("<iframe"));
        assert!(html.contains("href=\"https://example.com/video.mp4\""));
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("rel=\"noopener noreferrer\""));
    }

    #[test]
    fn link_out_uses_record_thumbnail() {
        let video = Entry::from_record(&MediaRecord {
            title: Some("Aurora".into()),
            media_type: Some("video".into()),
            url: Some("https://example.com/aurora.mp4".into()),
            thumbnail_url: Some("https://apod.test/aurora-thumb.jpg".into()),
            ..MediaRecord::default()
        })
        .unwrap();
        assert_eq!(
            select_presentation(&video),
            Presentation::LinkOut {
                thumbnail_url: "https://apod.test/aurora-thumb.jpg".into(),
                href: "https://example.com/aurora.mp4".into(),
            }
        );
    }

    #[test]
    fn heading_carries_title_id_and_images_have_no_outbound_link() {
        let html = content_markup(&entry("image", "https://apod.test/a.jpg")).into_string();
        assert!(html.contains("<h2 id=\"modal-title\">Sample</h2>"));
        assert!(html.contains("March 1, 2024"));
        assert!(!html.contains("class=\"outbound\""));
    }

    #[test]
    fn image_mode_prefers_hdurl() {
        let image = Entry::from_record(&MediaRecord {
            url: Some("https://apod.test/small.jpg".into()),
            hdurl: Some("https://apod.test/big.jpg".into()),
            ..MediaRecord::default()
        })
        .unwrap();
        assert_eq!(
            select_presentation(&image),
            Presentation::Image {
                src: "https://apod.test/big.jpg".into()
            }
        );
    }

    #[test]
    fn open_locks_scroll_and_focuses_close_control() {
        let bindings = Bindings::default();
        let mut doc = Document::new();
        let mut modal = ModalPresenter::new(&bindings);
        modal.reset(&mut doc);
        assert_eq!(doc.is_hidden(bindings.modal), Some(true));

        modal.open(&mut doc, &entry("image", "https://apod.test/a.jpg"));
        assert!(modal.is_open());
        assert!(doc.scroll_locked());
        assert_eq!(doc.focused(), Some(bindings.modal_close));
        assert_eq!(doc.is_hidden(bindings.modal), Some(false));
        assert!(doc.content(bindings.modal_body).contains("A galaxy far away."));
    }

    #[test]
    fn escape_closes_and_clears_body() {
        let bindings = Bindings::default();
        let mut doc = Document::new();
        let mut modal = ModalPresenter::new(&bindings);
        modal.open(&mut doc, &entry("image", "https://apod.test/a.jpg"));

        assert!(modal.handle_key(&mut doc, Key::Escape));
        assert_eq!(modal.state(), ModalState::Closed);
        assert_eq!(doc.content(bindings.modal_body), "");
        assert!(!doc.scroll_locked());
        assert_eq!(doc.is_hidden(bindings.modal), Some(true));
    }

    #[test]
    fn closing_twice_is_a_no_op() {
        let bindings = Bindings::default();
        let mut doc = Document::new();
        let mut modal = ModalPresenter::new(&bindings);
        assert!(!modal.close(&mut doc, CloseReason::Overlay));
        assert!(!modal.handle_key(&mut doc, Key::Escape));
        modal.open(&mut doc, &entry("image", "https://apod.test/a.jpg"));
        assert!(modal.close(&mut doc, CloseReason::Control));
        assert!(!modal.close(&mut doc, CloseReason::Control));
    }

    #[test]
    fn explanation_is_escaped() {
        let record = MediaRecord {
            explanation: Some("<script>alert(1)</script>".into()),
            url: Some("https://apod.test/a.jpg".into()),
            ..MediaRecord::default()
        };
        let html = content_markup(&Entry::from_record(&record).unwrap()).into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
