//! Writes `sitemap.xml` for the static pages and every published post.
//! Runs as a build step, before the site is deployed.

use anyhow::Context;
use westermann_site::configuration::{Settings, get_configuration};
use westermann_site::sitemap::{self, STATIC_PAGES};
use westermann_site::startup::get_connection_pool;
use westermann_site::telemetry::{get_subscriber, init_subscriber};

async fn generate(configuration: &Settings) -> Result<(), anyhow::Error> {
    let pool = get_connection_pool(&configuration.database);
    let posts = sitemap::fetch_published_posts(&pool).await?;
    let xml = sitemap::render(
        &configuration.site.domain,
        &STATIC_PAGES,
        &posts,
        chrono::Utc::now().date_naive(),
    );

    let output_dir = &configuration.site.sitemap_output_dir;
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let output = output_dir.join("sitemap.xml");
    tokio::fs::write(&output, xml)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        path = %output.display(),
        urls = STATIC_PAGES.len() + posts.len(),
        posts = posts.len(),
        "Sitemap generated"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = get_subscriber("generate_sitemap".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let result = match get_configuration() {
        Ok(configuration) => generate(&configuration).await,
        Err(e) => Err(anyhow::Error::new(e).context("Failed to read configuration.")),
    };
    if let Err(e) = result {
        tracing::error!(error.cause_chain = ?e, "Sitemap generation failed");
        std::process::exit(1);
    }
}
