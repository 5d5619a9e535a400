//! Advisory SEO checklist for the editor. Never blocks saving.

use crate::domain::blog_post::PostInput;
use crate::domain::slug::is_url_safe;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

pub const MAX_SEO_TITLE_LENGTH: usize = 60;
pub const MIN_META_DESCRIPTION_LENGTH: usize = 120;
pub const MAX_META_DESCRIPTION_LENGTH: usize = 160;
pub const MIN_KEYWORDS: usize = 3;
pub const MIN_IMAGE_ALT_LENGTH: usize = 11;
pub const MIN_CONTENT_WORDS: usize = 300;
const CONTENT_WARNING_WORDS: usize = 100;

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct SeoInput {
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub featured_image_alt: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
}

impl From<&PostInput> for SeoInput {
    fn from(post: &PostInput) -> Self {
        Self {
            seo_title: post.seo_title.clone().unwrap_or_default(),
            meta_description: post.meta_description.clone().unwrap_or_default(),
            seo_keywords: post.seo_keywords.clone(),
            featured_image_alt: post.featured_image_alt.clone().unwrap_or_default(),
            slug: post.slug.clone().unwrap_or_default(),
            content: post.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    Passed,
    Warning,
    Failed,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SeoCheck {
    pub label: &'static str,
    pub outcome: CheckOutcome,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SeoReport {
    pub checks: Vec<SeoCheck>,
    pub passed: usize,
    pub total: usize,
    /// Percentage of passed checks, rounded.
    pub score: u8,
}

fn outcome(passed: bool, warning: bool) -> CheckOutcome {
    if passed {
        CheckOutcome::Passed
    } else if warning {
        CheckOutcome::Warning
    } else {
        CheckOutcome::Failed
    }
}

fn char_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Words of the visible text, markup stripped.
pub fn word_count(html: &str) -> usize {
    let text = ammonia::Builder::empty().clean(html).to_string();
    text.split_whitespace().count()
}

pub fn evaluate(input: &SeoInput) -> SeoReport {
    let title_length = char_count(input.seo_title.trim());
    let description_length = char_count(input.meta_description.trim());
    let keywords = input
        .seo_keywords
        .iter()
        .flat_map(|k| k.split(','))
        .filter(|k| !k.trim().is_empty())
        .count();
    let alt_length = char_count(input.featured_image_alt.trim());
    let slug = input.slug.trim();
    let words = word_count(&input.content);

    let checks = vec![
        SeoCheck {
            label: "SEO-Titel (max. 60 Zeichen)",
            outcome: outcome(
                title_length > 0 && title_length <= MAX_SEO_TITLE_LENGTH,
                title_length > MAX_SEO_TITLE_LENGTH,
            ),
            detail: if title_length > 0 {
                format!("{}/{} Zeichen", title_length, MAX_SEO_TITLE_LENGTH)
            } else {
                "Nicht ausgefüllt".into()
            },
        },
        SeoCheck {
            label: "Meta-Description vorhanden",
            outcome: outcome(
                (MIN_META_DESCRIPTION_LENGTH..=MAX_META_DESCRIPTION_LENGTH)
                    .contains(&description_length),
                description_length > 0 && description_length < MIN_META_DESCRIPTION_LENGTH,
            ),
            detail: if description_length > 0 {
                format!("{}/{} Zeichen", description_length, MAX_META_DESCRIPTION_LENGTH)
            } else {
                "Nicht ausgefüllt".into()
            },
        },
        SeoCheck {
            label: "Keywords angegeben",
            outcome: outcome(keywords >= MIN_KEYWORDS, keywords > 0),
            detail: format!("{} Keywords", keywords),
        },
        SeoCheck {
            label: "Alt-Text für Hauptbild",
            outcome: outcome(alt_length >= MIN_IMAGE_ALT_LENGTH, alt_length > 0),
            detail: if alt_length > 0 { "Vorhanden" } else { "Fehlt" }.into(),
        },
        SeoCheck {
            label: "URL-Slug korrekt formatiert",
            outcome: outcome(is_url_safe(slug), false),
            detail: if slug.is_empty() {
                "Nicht ausgefüllt"
            } else if is_url_safe(slug) {
                "Korrekt"
            } else {
                "Nur Kleinbuchstaben, Ziffern und Bindestriche erlaubt"
            }
            .into(),
        },
        SeoCheck {
            label: "Inhalts-Länge (min. 300 Wörter)",
            outcome: outcome(words >= MIN_CONTENT_WORDS, words > CONTENT_WARNING_WORDS),
            detail: format!("{} Wörter", words),
        },
    ];

    let passed = checks
        .iter()
        .filter(|c| c.outcome == CheckOutcome::Passed)
        .count();
    let total = checks.len();
    let score = ((passed as f64 / total as f64) * 100.0).round() as u8;

    SeoReport {
        checks,
        passed,
        total,
        score,
    }
}
