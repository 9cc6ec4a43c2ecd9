use std::collections::HashMap;

use maud::Markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(&'static str);

impl RegionId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub trigger: RegionId,
    pub gallery: RegionId,
    pub modal: RegionId,
    pub modal_body: RegionId,
    pub modal_close: RegionId,
    pub modal_overlay: RegionId,
    pub fact: Option<RegionId>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            trigger: RegionId::new("fetch-trigger"),
            gallery: RegionId::new("gallery"),
            modal: RegionId::new("modal"),
            modal_body: RegionId::new("modal-body"),
            modal_close: RegionId::new("modal-close"),
            modal_overlay: RegionId::new("modal-overlay"),
            fact: Some(RegionId::new("fact")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }

    pub fn activates(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

pub trait Surface {
    fn replace(&mut self, region: RegionId, markup: Markup);
    fn clear(&mut self, region: RegionId);
    fn set_hidden(&mut self, region: RegionId, hidden: bool);
    fn focus(&mut self, region: RegionId);
    fn set_scroll_locked(&mut self, locked: bool);
}

#[derive(Debug, Default)]
pub struct Document {
    regions: HashMap<RegionId, String>,
    hidden: HashMap<RegionId, bool>,
    focused: Option<RegionId>,
    scroll_locked: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, region: RegionId) -> &str {
        self.regions.get(&region).map(String::as_str).unwrap_or("")
    }

    pub fn is_hidden(&self, region: RegionId) -> Option<bool> {
        self.hidden.get(&region).copied()
    }

    pub fn focused(&self) -> Option<RegionId> {
        self.focused
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}

impl Surface for Document {
    fn replace(&mut self, region: RegionId, markup: Markup) {
        self.regions.insert(region, markup.into_string());
    }

    fn clear(&mut self, region: RegionId) {
        self.regions.remove(&region);
        if self.focused.is_some_and(|focused| focused == region) {
            self.focused = None;
        }
    }

    fn set_hidden(&mut self, region: RegionId, hidden: bool) {
        self.hidden.insert(region, hidden);
    }

    fn focus(&mut self, region: RegionId) {
        self.focused = Some(region);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}
