use crate::helpers::{assert_is_json_error, assert_json_response, create_blog_post, post_body};
use crate::macros::function_name_macro::function_name;
use crate::test_app::{TestApp, spawn_admin_app};

async fn publish(app: &TestApp, title: &str, tags: &[&str]) -> serde_json::Value {
    let mut body = post_body(title, "published");
    body["tags"] = serde_json::json!(tags);
    create_blog_post(app, &body).await
}

#[tokio::test]
async fn readers_only_see_published_posts() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    publish(app, "Bremsen prüfen", &["Bremsen"]).await;
    let draft = create_blog_post(app, &post_body("Geheimer Entwurf", "draft")).await;

    // Act
    let listing = assert_json_response(app.get_published_posts(&[]).await).await;
    let draft_response = app.get_post_by_slug(draft["slug"].as_str().unwrap()).await;

    // Assert
    let posts = listing["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "Bremsen prüfen");
    assert_is_json_error(&draft_response, 404);
}

#[tokio::test]
async fn listing_filters_by_search_and_tag() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    publish(app, "Bremsscheiben wechseln", &["Bremsen", "Wartung"]).await;
    publish(app, "Ölfilter finden", &["Motor"]).await;

    // Act
    let by_search = assert_json_response(app.get_published_posts(&[("q", "FILTER")]).await).await;
    let by_tag = assert_json_response(app.get_published_posts(&[("tag", "Bremsen")]).await).await;
    let all = assert_json_response(app.get_published_posts(&[("tag", "all")]).await).await;

    // Assert
    assert_eq!(by_search["posts"].as_array().unwrap().len(), 1);
    assert_eq!(by_search["posts"][0]["title"], "Ölfilter finden");
    assert_eq!(by_tag["posts"].as_array().unwrap().len(), 1);
    assert_eq!(by_tag["posts"][0]["title"], "Bremsscheiben wechseln");
    assert_eq!(all["posts"].as_array().unwrap().len(), 2);
    let categories = all["categories"].as_array().unwrap();
    assert_eq!(categories[0], "all");
    assert_eq!(categories.len(), 4);
}

#[tokio::test]
async fn post_detail_counts_views_and_sanitizes_content() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let mut body = post_body("Reifendruck", "published");
    body["content"] = "<p>Luft prüfen</p><script>alert(1)</script>".into();
    let post = create_blog_post(app, &body).await;
    let slug = post["slug"].as_str().unwrap();

    // Act
    let first = assert_json_response(app.get_post_by_slug(slug).await).await;
    let second = assert_json_response(app.get_post_by_slug(slug).await).await;

    // Assert
    assert_eq!(first["post"]["view_count"], 1);
    assert_eq!(second["post"]["view_count"], 2);
    let content = first["post"]["content"].as_str().unwrap();
    assert!(content.contains("Luft prüfen"));
    assert!(!content.contains("script"));
    assert_eq!(first["author_profile"]["full_name"], "Hennes Westermann");
    assert!(first["author_profile"].get("email").is_none());
    assert!(
        first["share"]["linkedin"]
            .as_str()
            .unwrap()
            .starts_with("https://www.linkedin.com/")
    );
}

#[tokio::test]
async fn concurrent_views_are_all_counted() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let post = publish(app, "Batterie laden", &["Elektrik"]).await;
    let slug = post["slug"].as_str().unwrap().to_string();
    const READERS: usize = 20;

    // Act
    let client = reqwest::Client::new();
    let requests = (0..READERS).map(|_| {
        client
            .get(format!("{}/api/blog/posts/{}", app.address, slug))
            .send()
    });
    let responses = futures::future::join_all(requests).await;

    // Assert
    assert!(responses.iter().all(|r| r.as_ref().unwrap().status().is_success()));
    let (view_count,): (i64,) = sqlx::query_as("SELECT view_count FROM blog_posts WHERE slug = $1")
        .bind(&slug)
        .fetch_one(&app.db_connection_pool)
        .await
        .unwrap();
    assert_eq!(view_count, READERS as i64);
}

#[tokio::test]
async fn related_posts_are_ranked_by_shared_tags() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let current = publish(app, "Bremsflüssigkeit", &["Bremsen", "Wartung"]).await;
    publish(app, "Nur Wartung", &["Wartung"]).await;
    publish(app, "Bremsen und Wartung", &["Bremsen", "Wartung"]).await;
    publish(app, "Ohne Bezug", &["Motor"]).await;

    // Act
    let detail = assert_json_response(
        app.get_post_by_slug(current["slug"].as_str().unwrap())
            .await,
    )
    .await;

    // Assert
    let related: Vec<&str> = detail["related"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(related, vec!["Bremsen und Wartung", "Nur Wartung"]);
}

#[tokio::test]
async fn blog_pages_render_and_unknown_slugs_redirect() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let post = publish(app, "Scheibenwischer", &["Zubehör"]).await;

    // Act
    let index = app.get_page_html("/blog?tag=Zubeh%C3%B6r").await;
    let article = app
        .get_page_html(&format!("/blog/{}", post["slug"].as_str().unwrap()))
        .await;
    let missing = app.get_page("/blog/gibt-es-nicht").await;

    // Assert
    assert!(index.contains("Scheibenwischer"));
    assert!(article.contains("<h1>Scheibenwischer</h1>"));
    assert!(article.contains(r#"rel="canonical""#));
    assert_eq!(missing.status().as_u16(), 303);
    assert_eq!(missing.headers()["Location"], "/blog");
}
