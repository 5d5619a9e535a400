use ammonia::clean_text;

/// Extra `<head>` content for pages that need more than title and description.
#[derive(Default)]
pub struct HeadExtras {
    pub canonical_url: Option<String>,
    pub og_image: Option<String>,
    pub keywords: Vec<String>,
    pub noindex: bool,
}

impl HeadExtras {
    fn to_html(&self) -> String {
        let mut head = String::new();
        if let Some(url) = &self.canonical_url {
            head.push_str(&format!(
                r#"<link rel="canonical" href="{}">"#,
                clean_text(url)
            ));
        }
        if let Some(image) = &self.og_image {
            head.push_str(&format!(
                r#"<meta property="og:image" content="{}">"#,
                clean_text(image)
            ));
        }
        if !self.keywords.is_empty() {
            head.push_str(&format!(
                r#"<meta name="keywords" content="{}">"#,
                clean_text(&self.keywords.join(", "))
            ));
        }
        if self.noindex {
            head.push_str(r#"<meta name="robots" content="noindex, nofollow">"#);
        }
        head
    }
}

pub fn page(title: &str, description: &str, extras: &HeadExtras, body: &str) -> String {
    let title = clean_text(title);
    let description = clean_text(description);
    let head = extras.to_html();
    format!(
        r#"<!DOCTYPE html>
<html lang="de">
    <head>
        <meta http-equiv="content-type" content="text/html; charset=utf-8">
        <meta name="viewport" content="width=device-width, initial-scale=1">
        <title>{title}</title>
        <meta name="description" content="{description}">
        <meta property="og:title" content="{title}">
        <meta property="og:description" content="{description}">
        {head}
    </head>
    <body>
        <header class="site-header">
            <a class="brand" href="/">Kfz-Teile Hennes Westermann</a>
            <nav>
                <a href="/">Startseite</a>
                <a href="/#leistungen">Leistungen</a>
                <a href="/blog">Blog</a>
                <a href="/#kontakt">Kontakt</a>
            </nav>
        </header>
        <main>
{body}
        </main>
        <footer class="site-footer">
            <p>Kfz-Teile Hennes Westermann · Hohenhorst 61 · 48341 Altenberge</p>
            <p>info@kfz-westermann.de</p>
            <nav>
                <a href="/impressum">Impressum</a>
                <a href="/datenschutz">Datenschutz</a>
            </nav>
        </footer>
    </body>
</html>"#
    )
}
