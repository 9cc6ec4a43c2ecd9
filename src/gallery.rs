use chrono::NaiveDate;
use maud::{html, Markup};

use crate::record::{Entry, MediaRecord};
use crate::surface::{Bindings, Key, RegionId, Surface};

pub const DEFAULT_MAX_CARDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub index: usize,
    pub title: String,
    pub date: String,
    pub thumbnail_url: String,
    pub is_video: bool,
}

impl GalleryCard {
    fn from_entry(index: usize, entry: &Entry) -> Self {
        Self {
            index,
            title: entry.title().to_string(),
            date: entry.date().to_string(),
            thumbnail_url: entry.thumbnail_url().to_string(),
            is_video: entry.is_video(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Click,
    Key(Key),
}

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    cards: Vec<GalleryCard>,
    entries: Vec<Entry>,
}

impl Gallery {
    pub fn cards(&self) -> &[GalleryCard] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn activate(&self, index: usize, activation: Activation) -> Option<&Entry> {
        let triggered = match activation {
            Activation::Click => true,
            Activation::Key(key) => key.activates(),
        };
        if !triggered {
            return None;
        }
        self.entries.get(index)
    }
}

pub struct GalleryRenderer {
    region: RegionId,
    max_cards: usize,
}

impl GalleryRenderer {
    pub fn new(bindings: &Bindings, max_cards: usize) -> Self {
        Self {
            region: bindings.gallery,
            max_cards: max_cards.max(1),
        }
    }

    pub fn render(&self, surface: &mut dyn Surface, records: &[MediaRecord]) -> Gallery {
        let entries: Vec<Entry> = records
            .iter()
            .filter_map(Entry::from_record)
            .take(self.max_cards)
            .collect();
        let cards: Vec<GalleryCard> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| GalleryCard::from_entry(index, entry))
            .collect();

        if cards.is_empty() {
            surface.replace(self.region, empty_markup());
        } else {
            surface.replace(self.region, grid_markup(&cards));
        }
        tracing::debug!(cards = cards.len(), records = records.len(), "rendered gallery");
        Gallery { cards, entries }
    }

    pub fn render_loading(&self, surface: &mut dyn Surface) {
        surface.replace(
            self.region,
            html! {
                div.gallery-loading role="status" aria-live="polite" {
                    div.spinner aria-hidden="true" {}
                    p { "Fetching pictures from the cosmos…" }
                }
            },
        );
    }

    pub fn render_error(&self, surface: &mut dyn Surface, message: &str) {
        surface.replace(
            self.region,
            html! {
                div.gallery-error role="alert" {
                    p.error-title { "Could not load the gallery." }
                    p.error-detail { (message) }
                    p.hint { "Press Fetch to try again." }
                }
            },
        );
    }
}

fn grid_markup(cards: &[GalleryCard]) -> Markup {
    html! {
        div.gallery-grid {
            @for card in cards {
                (card_markup(card))
            }
        }
    }
}

pub fn card_markup(card: &GalleryCard) -> Markup {
    let action = format!("/cards/{}?via=click", card.index);
    html! {
        form.card-form method="post" action=(action) {
            button.card type="submit" tabindex="0" role="button" data-index=(card.index) aria-label=(card.title) {
                span.card-media {
                    img src=(card.thumbnail_url) alt=(card.title) loading="lazy";
                    @if card.is_video {
                        span.badge { "Video" }
                    }
                }
                span.card-info {
                    span.card-title { (card.title) }
                    @if !card.date.is_empty() {
                        time.card-date datetime=(card.date) { (human_date(&card.date)) }
                    }
                }
            }
        }
    }
}

fn empty_markup() -> Markup {
    html! {
        div.gallery-empty role="status" {
            p { "No pictures to show yet." }
            p.hint { "Press Fetch to load astronomy pictures of the day." }
        }
    }
}

pub fn human_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
