//! Quality scoring: how likely is a candidate to be real resume text?
//!
//! Two functions with different jobs share one character profile:
//!
//! * [`assess_text_quality`] — continuous score in `[0, 1]` used to rank the
//!   scored strategies against each other and against the acceptance
//!   threshold.
//! * [`is_readable`] — a stricter boolean gate used only to decide whether
//!   the direct strategy's result can be returned without scoring the rest.
//!
//! Both treat anything under 100 characters as unusable.

/// Texts shorter than this (in characters) score 0 and are never readable.
pub const MIN_SCORABLE_LEN: usize = 100;

/// Keywords counted by the continuous score.
pub const QUALITY_KEYWORDS: [&str; 12] = [
    "experience",
    "education",
    "skills",
    "work",
    "job",
    "project",
    "university",
    "degree",
    "professional",
    "resume",
    "cv",
    "career",
];

/// Keywords the readability gate requires at least one of.
pub const READABILITY_KEYWORDS: [&str; 6] =
    ["experience", "education", "skills", "job", "work", "project"];

/// Character counts for one text, computed in a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextProfile {
    pub len: usize,
    pub alphabetic: usize,
    pub whitespace: usize,
    /// Characters outside `[A-Za-z0-9_]`, whitespace and `.,;:!?'"()-`.
    pub unusual: usize,
    pub has_line_break: bool,
}

impl TextProfile {
    pub fn of(text: &str) -> Self {
        let mut p = TextProfile::default();
        for c in text.chars() {
            p.len += 1;
            if c.is_ascii_alphabetic() {
                p.alphabetic += 1;
            }
            if c.is_whitespace() {
                p.whitespace += 1;
            }
            if c == '\n' || c == '\r' {
                p.has_line_break = true;
            }
            if !is_ordinary(c) {
                p.unusual += 1;
            }
        }
        p
    }

    pub fn alphabetic_ratio(&self) -> f64 {
        ratio(self.alphabetic, self.len)
    }

    pub fn whitespace_ratio(&self) -> f64 {
        ratio(self.whitespace, self.len)
    }

    pub fn unusual_ratio(&self) -> f64 {
        ratio(self.unusual, self.len)
    }
}

fn ratio(n: usize, of: usize) -> f64 {
    if of == 0 {
        0.0
    } else {
        n as f64 / of as f64
    }
}

fn is_ordinary(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '(' | ')' | '-')
}

fn keyword_matches(text: &str, keywords: &[&str]) -> usize {
    let lower = text.to_lowercase();
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

/// Score a candidate in `[0, 1]`.
///
/// Additive, capped signals:
/// - alphabetic ratio, up to 0.4
/// - word statistics: > 50 tokens (longer than one char) averaging 3–12
///   chars → 0.2; otherwise > 20 such tokens → 0.1
/// - keyword coverage `0.4 × matches / 12`, up to 0.2
/// - any line break → 0.1
/// - unusual-character ratio < 0.05 → +0.1; > 0.2 → −0.2
pub fn assess_text_quality(text: &str) -> f64 {
    let profile = TextProfile::of(text);
    if profile.len < MIN_SCORABLE_LEN {
        return 0.0;
    }

    let mut score = profile.alphabetic_ratio().min(0.4);

    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().count() > 1)
        .collect();
    if !words.is_empty() {
        let avg = words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;
        if words.len() > 50 && (3.0..=12.0).contains(&avg) {
            score += 0.2;
        } else if words.len() > 20 {
            score += 0.1;
        }
    }

    let matches = keyword_matches(text, &QUALITY_KEYWORDS);
    score += (0.4 * matches as f64 / QUALITY_KEYWORDS.len() as f64).min(0.2);

    if profile.has_line_break {
        score += 0.1;
    }

    let unusual = profile.unusual_ratio();
    if unusual < 0.05 {
        score += 0.1;
    } else if unusual > 0.2 {
        score -= 0.2;
    }

    score.clamp(0.0, 1.0)
}

/// Strict pass/fail gate for the direct strategy.
///
/// Requires all of: at least 100 characters, alphabetic ratio above 0.4,
/// whitespace ratio in `[0.05, 0.3)`, unusual-character ratio below 0.15,
/// and at least one of [`READABILITY_KEYWORDS`].
pub fn is_readable(text: &str) -> bool {
    let profile = TextProfile::of(text);
    if profile.len < MIN_SCORABLE_LEN {
        return false;
    }
    let ws = profile.whitespace_ratio();
    profile.alphabetic_ratio() > 0.4
        && (0.05..0.3).contains(&ws)
        && profile.unusual_ratio() < 0.15
        && keyword_matches(text, &READABILITY_KEYWORDS) > 0
}
