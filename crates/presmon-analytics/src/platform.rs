//! Platform categorization from loosely-labelled source metadata.

use presmon_core::Platform;

/// Tokens that identify a platform, checked in order; social networks come
/// first so "Channels TV on Twitter" counts as Twitter.
const PLATFORM_KEYWORDS: &[(Platform, &[&str])] = &[
    (Platform::Twitter, &["twitter", "tweet", "tweets", "x"]),
    (Platform::Facebook, &["facebook", "fb"]),
    (Platform::Instagram, &["instagram", "ig"]),
    (Platform::YouTube, &["youtube", "yt"]),
    (Platform::TikTok, &["tiktok"]),
    (
        Platform::Television,
        &[
            "tv",
            "television",
            "broadcast",
            "channels",
            "arise",
            "nta",
            "ait",
            "cnn",
            "tvc",
        ],
    ),
    (Platform::Radio, &["radio", "fm"]),
    (
        Platform::Newspaper,
        &[
            "newspaper",
            "newspapers",
            "print",
            "punch",
            "vanguard",
            "guardian",
            "thisday",
            "tribune",
            "daily",
            "times",
            "leadership",
            "herald",
        ],
    ),
    (
        Platform::Online,
        &[
            "online", "blog", "web", "website", "news", "rss", "portal", "digital",
        ],
    ),
];

/// URL hosts of social platforms.
const PLATFORM_HOSTS: &[(Platform, &[&str])] = &[
    (Platform::Twitter, &["twitter.com", "x.com", "t.co"]),
    (Platform::Facebook, &["facebook.com", "fb.com", "fb.watch"]),
    (Platform::Instagram, &["instagram.com"]),
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
    (Platform::TikTok, &["tiktok.com"]),
];

/// Categorizes a mention by platform.
///
/// The explicit platform hint is consulted first, then the URL host, then
/// the source name (an `@handle` counts as Twitter). A mention with only a
/// URL is `Online`; one with nothing recognisable is `Other`.
#[must_use]
pub fn categorize_platform(
    platform: Option<&str>,
    source: Option<&str>,
    url: Option<&str>,
) -> Platform {
    if let Some(hint) = platform {
        if let Some(exact) = Platform::parse(hint).filter(|p| *p != Platform::Other) {
            return exact;
        }
        if let Some(found) = match_keywords(hint) {
            return found;
        }
    }

    if let Some(found) = url.and_then(match_host) {
        return found;
    }

    if let Some(source) = source {
        if source.trim_start().starts_with('@') {
            return Platform::Twitter;
        }
        if let Some(found) = match_keywords(source) {
            return found;
        }
    }

    if url.is_some_and(|u| !u.trim().is_empty()) {
        Platform::Online
    } else {
        Platform::Other
    }
}

fn match_keywords(value: &str) -> Option<Platform> {
    let lower = value.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    PLATFORM_KEYWORDS
        .iter()
        .find(|(_, words)| tokens.iter().any(|t| words.contains(t)))
        .map(|(platform, _)| *platform)
}

fn match_host(url: &str) -> Option<Platform> {
    let host = url_host(url)?;
    PLATFORM_HOSTS
        .iter()
        .find(|(_, hosts)| {
            hosts
                .iter()
                .any(|h| host == *h || host.ends_with(&format!(".{h}")))
        })
        .map(|(platform, _)| *platform)
}

/// Lowercase host of `url`. Scheme-less values such as `youtu.be/abc` are
/// parsed as `https://`.
fn url_host(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.contains("://") {
        reqwest::Url::parse(trimmed)
    } else {
        reqwest::Url::parse(&format!("https://{trimmed}"))
    }
    .ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_lowercase)
}
