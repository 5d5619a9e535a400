/// URL-safe identifier of a blog post: non-empty, `[a-z0-9-]` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    /// Returns an instance of `Slug` if the input matches the URL-safe pattern.
    pub fn parse(s: String) -> Result<Slug, String> {
        if is_url_safe(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid slug.", s))
        }
    }

    /// Derives a slug from a post title. `None` when nothing URL-safe remains.
    pub fn from_title(title: &str) -> Option<Slug> {
        let slug = generate_slug(title);
        if slug.is_empty() { None } else { Some(Self(slug)) }
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub fn is_url_safe(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Lowercases, transliterates German diacritics and collapses every other
/// run of non-alphanumeric characters into a single hyphen.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.to_lowercase().chars() {
        let mut buffer = [0u8; 4];
        let part: &str = match c {
            'ä' => "ae",
            'ö' => "oe",
            'ü' => "ue",
            'ß' => "ss",
            c if c.is_ascii_lowercase() || c.is_ascii_digit() => c.encode_utf8(&mut buffer),
            _ => {
                pending_separator = true;
                continue;
            }
        };
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push_str(part);
    }

    slug
}
