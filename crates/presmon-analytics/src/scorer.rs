//! Lexicon scorer for political coverage.
//!
//! Used only when a mention arrives with neither a score nor a usable label.

/// Word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("good", 0.3),
    ("great", 0.4),
    ("excellent", 0.5),
    ("praise", 0.4),
    ("praised", 0.4),
    ("commend", 0.4),
    ("commended", 0.4),
    ("commissions", 0.3),
    ("commissioned", 0.3),
    ("approve", 0.4),
    ("approves", 0.4),
    ("approved", 0.4),
    ("support", 0.3),
    ("supports", 0.3),
    ("growth", 0.4),
    ("progress", 0.4),
    ("success", 0.5),
    ("successful", 0.5),
    ("improve", 0.3),
    ("improved", 0.4),
    ("boost", 0.4),
    ("welcome", 0.3),
    ("welcomes", 0.3),
    ("landmark", 0.4),
    ("achievement", 0.5),
    ("reform", 0.2),
    ("stable", 0.3),
    ("peace", 0.4),
    ("win", 0.4),
    ("victory", 0.5),
    // Negative signals
    ("bad", -0.4),
    ("poor", -0.4),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.5),
    ("crisis", -0.6),
    ("corruption", -0.7),
    ("corrupt", -0.7),
    ("scandal", -0.6),
    ("protest", -0.4),
    ("protests", -0.4),
    ("criticise", -0.4),
    ("criticize", -0.4),
    ("criticised", -0.4),
    ("criticized", -0.4),
    ("condemn", -0.5),
    ("condemned", -0.5),
    ("hardship", -0.5),
    ("inflation", -0.3),
    ("insecurity", -0.5),
    ("unemployment", -0.4),
    ("shortage", -0.4),
    ("queues", -0.3),
    ("hike", -0.3),
    ("debt", -0.3),
    ("blame", -0.4),
    ("outrage", -0.6),
    ("violence", -0.6),
    ("killed", -0.6),
    ("collapse", -0.6),
];

/// Score a text string using the lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
            score += weight;
        }
    }
    score.clamp(-1.0, 1.0)
}
