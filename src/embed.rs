use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

struct Rule {
    name: &'static str,
    pattern: Regex,
    canonicalize: fn(&Captures<'_>) -> String,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule {
            name: "youtube-watch",
            pattern: Regex::new(
                r"^(https?)://(?:www\.|m\.)?youtube\.com/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]+)",
            )
            .expect("valid youtube watch regex"),
            canonicalize: |caps| format!("{}://www.youtube.com/embed/{}", &caps[1], &caps[2]),
        },
        Rule {
            name: "youtube-short-link",
            pattern: Regex::new(r"^(https?)://youtu\.be/([A-Za-z0-9_-]+)")
                .expect("valid youtu.be regex"),
            canonicalize: |caps| format!("{}://www.youtube.com/embed/{}", &caps[1], &caps[2]),
        },
        Rule {
            name: "youtube-shorts",
            pattern: Regex::new(r"^(https?)://(?:www\.|m\.)?youtube\.com/shorts/([A-Za-z0-9_-]+)")
                .expect("valid youtube shorts regex"),
            canonicalize: |caps| format!("{}://www.youtube.com/embed/{}", &caps[1], &caps[2]),
        },
        Rule {
            name: "vimeo-page",
            pattern: Regex::new(r"^(https?)://(?:www\.)?vimeo\.com/(\d+)")
                .expect("valid vimeo regex"),
            canonicalize: |caps| format!("{}://player.vimeo.com/video/{}", &caps[1], &caps[2]),
        },
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provider {
    pub name: &'static str,
    pub host: &'static str,
    pub path_prefix: &'static str,
}

pub const EMBED_PROVIDERS: &[Provider] = &[
    Provider {
        name: "YouTube",
        host: "youtube.com",
        path_prefix: "/embed/",
    },
    Provider {
        name: "YouTube (privacy-enhanced)",
        host: "youtube-nocookie.com",
        path_prefix: "/embed/",
    },
    Provider {
        name: "Vimeo",
        host: "player.vimeo.com",
        path_prefix: "/video/",
    },
];

pub fn canonicalize(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    for rule in RULES.iter() {
        if let Some(caps) = rule.pattern.captures(trimmed) {
            let canonical = (rule.canonicalize)(&caps);
            tracing::trace!(rule = rule.name, from = trimmed, to = %canonical, "canonicalised video url");
            return Cow::Owned(canonical);
        }
    }
    Cow::Borrowed(trimmed)
}

pub fn allowed_provider(url: &str) -> Option<&'static Provider> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let path = parsed.path();
    EMBED_PROVIDERS.iter().find(|provider| {
        let host_ok = host == provider.host || host.ends_with(&format!(".{}", provider.host));
        host_ok && path.starts_with(provider.path_prefix)
    })
}

pub fn is_secure(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| parsed.scheme() == "https")
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedDecision {
    Embed {
        src: String,
        provider: &'static str,
    },
    LinkOut,
}

pub fn classify(raw: &str) -> EmbedDecision {
    let canonical = canonicalize(raw);
    match allowed_provider(&canonical) {
        Some(provider) if is_secure(&canonical) => EmbedDecision::Embed {
            src: canonical.into_owned(),
            provider: provider.name,
        },
        _ => EmbedDecision::LinkOut,
    }
}
