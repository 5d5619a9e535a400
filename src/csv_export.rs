//! Spreadsheet export of blog posts for the dashboard.

use crate::domain::BlogPostSummary;
use chrono::{DateTime, NaiveDate, Utc};

pub const ERROR_NOTHING_TO_EXPORT: &str = "Es gibt keine Beiträge zum Exportieren.";

/// Lets spreadsheet tools detect UTF-8 so umlauts survive.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const HEADERS: [&str; 9] = [
    "Titel",
    "Slug",
    "Status",
    "Veröffentlicht am",
    "Aufrufe",
    "Erstellt am",
    "Tags",
    "Excerpt",
    "Meta Description",
];

fn german_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d.%m.%Y").to_string()
}

/// Every field is quoted; embedded quotes are doubled.
pub fn posts_to_csv(posts: &[BlogPostSummary]) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(&mut buffer);
        writer.write_record(HEADERS)?;
        for post in posts {
            writer.write_record([
                post.title.clone(),
                post.slug.clone(),
                post.status.to_string(),
                post.published_at
                    .as_ref()
                    .map(german_date)
                    .unwrap_or_default(),
                post.view_count.to_string(),
                german_date(&post.created_at),
                post.tags.join(", "),
                post.excerpt.clone().unwrap_or_default(),
                post.meta_description.clone().unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("blog-posts-{}.csv", today.format("%Y-%m-%d"))
}
