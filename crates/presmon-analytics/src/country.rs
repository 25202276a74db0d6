//! Country canonicalization and keyword-based inference.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical country names with the keywords that identify them in
/// free text. Earlier entries win ties. Words that commonly name other
/// things ("Latin America", "Rand Paul", "Washington state") are left out.
const COUNTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Nigeria",
        &[
            "nigeria",
            "nigerian",
            "nigerians",
            "abuja",
            "lagos",
            "kano",
            "ibadan",
            "port harcourt",
            "enugu",
            "kaduna",
            "aso rock",
            "naira",
            "inec",
            "apc",
            "pdp",
        ],
    ),
    (
        "Ghana",
        &["ghana", "ghanaian", "accra", "kumasi", "cedi", "ndc", "npp"],
    ),
    (
        "Kenya",
        &["kenya", "kenyan", "nairobi", "mombasa", "shilling", "odm"],
    ),
    (
        "South Africa",
        &[
            "south africa",
            "south african",
            "pretoria",
            "johannesburg",
            "cape town",
        ],
    ),
    (
        "Cameroon",
        &["cameroon", "cameroonian", "yaounde", "douala"],
    ),
    (
        "Benin",
        &["benin republic", "beninese", "cotonou", "porto-novo"],
    ),
    (
        "United States",
        &[
            "united states",
            "usa",
            "u.s.",
            "white house",
            "new york",
        ],
    ),
    (
        "United Kingdom",
        &[
            "united kingdom",
            "uk",
            "britain",
            "british",
            "london",
            "downing street",
        ],
    ),
    ("France", &["france", "french", "paris", "elysee"]),
    ("China", &["china", "chinese", "beijing"]),
];

/// Short codes and spellings that map onto a canonical name.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("ng", "Nigeria"),
    ("nga", "Nigeria"),
    ("gh", "Ghana"),
    ("gha", "Ghana"),
    ("ke", "Kenya"),
    ("ken", "Kenya"),
    ("za", "South Africa"),
    ("rsa", "South Africa"),
    ("cm", "Cameroon"),
    ("bj", "Benin"),
    ("us", "United States"),
    ("usa", "United States"),
    ("u.s.", "United States"),
    ("u.s.a.", "United States"),
    ("united states of america", "United States"),
    ("america", "United States"),
    ("uk", "United Kingdom"),
    ("u.k.", "United Kingdom"),
    ("gb", "United Kingdom"),
    ("gbr", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("england", "United Kingdom"),
    ("fr", "France"),
    ("cn", "China"),
    ("prc", "China"),
];

/// One case-insensitive pattern per keyword, in `COUNTRY_KEYWORDS` order.
static COUNTRY_PATTERNS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    COUNTRY_KEYWORDS
        .iter()
        .map(|(country, keywords)| {
            let patterns = keywords
                .iter()
                .map(|keyword| {
                    // `\b` cannot anchor keywords that end in punctuation ("u.s."),
                    // so the boundary is "not adjacent to a word character".
                    let pattern = format!(r"(?i)(?:^|\W){}(?:$|\W)", regex::escape(keyword));
                    Regex::new(&pattern).expect("valid country keyword regex")
                })
                .collect();
            (*country, patterns)
        })
        .collect()
});

/// Maps an explicit country value onto its canonical name.
///
/// Known names and aliases are matched case-insensitively; unknown values
/// are returned trimmed but otherwise unchanged. Blank input yields `None`.
#[must_use]
pub fn canonical_country(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();

    if let Some((name, _)) = COUNTRY_KEYWORDS
        .iter()
        .find(|(name, _)| name.to_lowercase() == lower)
    {
        return Some((*name).to_string());
    }
    if let Some((_, name)) = COUNTRY_ALIASES.iter().find(|(alias, _)| *alias == lower) {
        return Some((*name).to_string());
    }
    Some(trimmed.to_string())
}

/// Guesses a country from free text by counting keyword hits.
///
/// Returns the country with the most distinct matching keywords, or `None`
/// when nothing matches.
#[must_use]
pub fn guess_country(text: &str) -> Option<&'static str> {
    if text.trim().is_empty() {
        return None;
    }
    let mut best: Option<(&'static str, usize)> = None;
    for (country, patterns) in COUNTRY_PATTERNS.iter() {
        let hits = patterns.iter().filter(|re| re.is_match(text)).count();
        if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
            best = Some((*country, hits));
        }
    }
    best.map(|(country, _)| country)
}

/// Resolves a mention's country.
///
/// An explicit value is canonicalized; otherwise the text and source name
/// are searched for keywords; otherwise `default` is used. The flag is
/// `true` whenever the country was not supplied explicitly.
#[must_use]
pub fn infer_country(
    country: Option<&str>,
    text: &str,
    source: Option<&str>,
    default: &str,
) -> (String, bool) {
    if let Some(explicit) = country.and_then(canonical_country) {
        return (explicit, false);
    }
    let haystack = match source {
        Some(source) => format!("{text} {source}"),
        None => text.to_string(),
    };
    let guessed = guess_country(&haystack).map_or_else(|| default.to_string(), str::to_string);
    (guessed, true)
}
