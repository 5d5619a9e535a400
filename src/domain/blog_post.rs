use crate::domain::slug::Slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ERROR_MISSING_REQUIRED_FIELDS: &str = "Bitte füllen Sie alle Pflichtfelder aus.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BlogPostStatus {
    Draft,
    Published,
}

impl BlogPostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogPostStatus::Draft => "draft",
            BlogPostStatus::Published => "published",
        }
    }

    /// `published_at` is stamped only when a post enters the published state.
    /// Leaving it again keeps the original timestamp.
    pub fn stamps_published_at(previous: Option<BlogPostStatus>, next: BlogPostStatus) -> bool {
        next == BlogPostStatus::Published && previous != Some(BlogPostStatus::Published)
    }
}

impl std::fmt::Display for BlogPostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for BlogPostStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "draft" => Ok(BlogPostStatus::Draft),
            "published" => Ok(BlogPostStatus::Published),
            other => Err(format!("{} is not a valid post status.", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub author_id: Option<Uuid>,
    pub tags: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: BlogPostStatus,
    pub seo_title: Option<String>,
    pub meta_description: Option<String>,
    pub seo_keywords: Vec<String>,
    pub canonical_url: Option<String>,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: Option<String>,
    pub seo_image_tag: Option<String>,
    pub view_count: i64,
    pub read_time_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Card-sized projection used by listings and related-post teasers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct BlogPostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: BlogPostStatus,
    pub view_count: i64,
    pub read_time_minutes: Option<i32>,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: Option<String>,
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Editor payload shared by create, manual save and auto-save.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    pub status: BlogPostStatus,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub featured_image_alt: Option<String>,
    #[serde(default)]
    pub seo_image_tag: Option<String>,
    #[serde(default)]
    pub read_time_minutes: Option<i32>,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PostValidationError {
    #[error("{}", ERROR_MISSING_REQUIRED_FIELDS)]
    MissingRequiredFields,
    #[error("Die Lesezeit darf nicht negativ sein.")]
    NegativeReadTime,
}

/// A `PostInput` whose required fields are present and normalised.
#[derive(Debug, Clone)]
pub struct ValidPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: BlogPostStatus,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub meta_description: Option<String>,
    pub seo_keywords: Vec<String>,
    pub canonical_url: Option<String>,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: Option<String>,
    pub seo_image_tag: Option<String>,
    pub read_time_minutes: Option<i32>,
}

impl PostInput {
    /// Validation for a post that does not exist yet: an empty slug is
    /// derived from the title.
    pub fn validate_new(self) -> Result<ValidPost, PostValidationError> {
        let derived = Slug::from_title(&self.title).map(|s| s.to_string());
        let slug = match non_blank(self.slug.clone()) {
            Some(slug) => Some(slug),
            None => derived,
        };
        self.into_valid(slug)
    }

    /// Validation for an existing post: the slug is edited independently
    /// and never re-derived from the title.
    pub fn validate_existing(self) -> Result<ValidPost, PostValidationError> {
        let slug = non_blank(self.slug.clone());
        self.into_valid(slug)
    }

    fn into_valid(self, slug: Option<String>) -> Result<ValidPost, PostValidationError> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        let slug = match slug {
            Some(slug) if !title.is_empty() && !content.is_empty() => slug,
            _ => return Err(PostValidationError::MissingRequiredFields),
        };
        if matches!(self.read_time_minutes, Some(minutes) if minutes < 0) {
            return Err(PostValidationError::NegativeReadTime);
        }

        Ok(ValidPost {
            title,
            slug,
            content,
            status: self.status,
            excerpt: non_blank(self.excerpt),
            author: non_blank(self.author),
            tags: normalise_labels(self.tags),
            seo_title: non_blank(self.seo_title),
            meta_description: non_blank(self.meta_description),
            seo_keywords: normalise_labels(self.seo_keywords),
            canonical_url: non_blank(self.canonical_url),
            featured_image_url: non_blank(self.featured_image_url),
            featured_image_alt: non_blank(self.featured_image_alt),
            seo_image_tag: non_blank(self.seo_image_tag),
            read_time_minutes: self.read_time_minutes,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims labels, drops blanks and removes duplicates while keeping order.
fn normalise_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim().to_string();
        if !label.is_empty() && !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}
