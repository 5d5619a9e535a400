use crate::helpers::{assert_is_json_error, assert_json_response, create_blog_post, post_body};
use crate::macros::function_name_macro::function_name;
use crate::test_app::{spawn_admin_app, spawn_app};
use crate::test_data::{MISSING_FIELDS_ERROR, ONE_PIXEL_PNG};
use uuid::Uuid;

// ==================== Authentication Tests ====================

#[tokio::test]
async fn admin_api_requires_auth() {
    // Arrange
    let app = spawn_app(function_name!()).await;

    // Act
    let list = app.admin_get_all_posts().await;
    let create = app.admin_create_post(&post_body("Bremsen", "draft")).await;
    let delete = app.admin_delete_post(Uuid::new_v4()).await;

    // Assert
    for response in [&list, &create, &delete] {
        assert_is_json_error(response, 401);
    }
    let body = assert_json_response(list).await;
    assert!(!body["success"].as_bool().unwrap());
}

// ==================== CRUD Tests ====================

#[tokio::test]
async fn create_derives_the_slug_from_the_title() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;

    // Act
    let post = create_blog_post(&container.app, &post_body("Bremsbeläge für Öl & Straße", "draft")).await;

    // Assert
    assert_eq!(post["slug"], "bremsbelaege-fuer-oel-strasse");
    assert_eq!(post["status"], "draft");
    assert!(post["published_at"].is_null());
    assert_eq!(post["author_id"], container.test_user.user_id.to_string());
}

#[tokio::test]
async fn create_without_required_fields_returns_400() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;

    // Act
    let response = container
        .app
        .admin_create_post(&serde_json::json!({"title": "Nur ein Titel", "status": "draft"}))
        .await;

    // Assert
    assert_is_json_error(&response, 400);
    let body = assert_json_response(response).await;
    assert_eq!(body["error"], MISSING_FIELDS_ERROR);
}

#[tokio::test]
async fn duplicate_slug_returns_409() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    create_blog_post(&container.app, &post_body("Ölfilter", "draft")).await;

    // Act
    let response = container
        .app
        .admin_create_post(&post_body("Ölfilter", "draft"))
        .await;

    // Assert
    assert_is_json_error(&response, 409);
}

#[tokio::test]
async fn publishing_stamps_published_at_once() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let post = create_blog_post(app, &post_body("Zündkerzen", "draft")).await;
    let post_id: Uuid = post["id"].as_str().unwrap().parse().unwrap();
    let mut body = post_body("Zündkerzen", "published");
    body["slug"] = post["slug"].clone();

    // Act
    let published = assert_json_response(app.admin_update_post(post_id, &body).await).await;
    let republished = assert_json_response(app.admin_update_post(post_id, &body).await).await;
    body["status"] = "draft".into();
    let unpublished = assert_json_response(app.admin_update_post(post_id, &body).await).await;

    // Assert
    assert!(published["published_at"].is_string());
    assert_eq!(republished["published_at"], published["published_at"]);
    assert_eq!(unpublished["status"], "draft");
    assert_eq!(unpublished["published_at"], published["published_at"]);
}

#[tokio::test]
async fn update_keeps_the_slug_when_the_title_changes() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let post = create_blog_post(app, &post_body("Ölwechsel", "draft")).await;
    let post_id: Uuid = post["id"].as_str().unwrap().parse().unwrap();
    let mut body = post_body("Ölwechsel richtig gemacht", "draft");
    body["slug"] = post["slug"].clone();

    // Act
    let updated = assert_json_response(app.admin_update_post(post_id, &body).await).await;

    // Assert
    assert_eq!(updated["title"], "Ölwechsel richtig gemacht");
    assert_eq!(updated["slug"], "oelwechsel");
}

#[tokio::test]
async fn updating_a_missing_post_returns_404() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let mut body = post_body("Egal", "draft");
    body["slug"] = "egal".into();

    // Act
    let response = container.app.admin_update_post(Uuid::new_v4(), &body).await;

    // Assert
    assert_is_json_error(&response, 404);
}

#[tokio::test]
async fn delete_reports_whether_a_post_was_removed() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let post = create_blog_post(app, &post_body("Keilriemen", "published")).await;
    let post_id: Uuid = post["id"].as_str().unwrap().parse().unwrap();

    // Act
    let first = assert_json_response(app.admin_delete_post(post_id).await).await;
    let second = assert_json_response(app.admin_delete_post(post_id).await).await;

    // Assert
    assert!(first["is_deleted"].as_bool().unwrap());
    assert_eq!(first["title"], "Keilriemen");
    assert!(!second["is_deleted"].as_bool().unwrap());
    assert_is_json_error(&app.admin_get_post_by_id(post_id).await, 404);
}

#[tokio::test]
async fn admin_list_includes_drafts_newest_first() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    create_blog_post(app, &post_body("Erster", "published")).await;
    create_blog_post(app, &post_body("Zweiter", "draft")).await;

    // Act
    let posts = assert_json_response(app.admin_get_all_posts().await).await;

    // Assert
    let titles: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Zweiter", "Erster"]);
}

// ==================== Editor Helpers ====================

#[tokio::test]
async fn slug_suggestion_and_seo_check_are_available_to_the_editor() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;

    // Act
    let slug = assert_json_response(
        app.get_page("/api/admin/blog/slug?title=Stoßdämpfer%20prüfen")
            .await,
    )
    .await;
    let report = assert_json_response(
        app.post_json(
            "/api/admin/blog/seo-check",
            &serde_json::json!({"slug": "Nicht Gültig"}),
        )
        .await,
    )
    .await;

    // Assert
    assert_eq!(slug["slug"], "stossdaempfer-pruefen");
    assert_eq!(report["score"], 0);
    assert_eq!(report["checks"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn preview_strips_scripts() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;

    // Act
    let preview = assert_json_response(
        container
            .app
            .post_json(
                "/api/admin/blog/preview",
                &serde_json::json!({"content": "<p onclick=\"x()\">Hallo</p><script>alert(1)</script>"}),
            )
            .await,
    )
    .await;

    // Assert
    let html = preview["html"].as_str().unwrap();
    assert!(html.contains("Hallo"));
    assert!(!html.contains("script"));
    assert!(!html.contains("onclick"));
    assert_eq!(preview["read_time_minutes_hint"], 1);
}

// ==================== Image Uploads ====================

#[tokio::test]
async fn uploaded_images_are_served_back() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;

    // Act
    let response = app
        .admin_upload_image("pixel.png", "image/png", ONE_PIXEL_PNG.to_vec())
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body = assert_json_response(response).await;
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/") && url.ends_with(".png"));
    let served = app.get_page(url).await;
    assert_eq!(served.status().as_u16(), 200);
    assert_eq!(served.bytes().await.unwrap().as_ref(), ONE_PIXEL_PNG);
}

#[tokio::test]
async fn non_image_uploads_are_rejected() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;

    // Act
    let pdf = container
        .app
        .admin_upload_image("rechnung.pdf", "application/pdf", b"%PDF-1.4".to_vec())
        .await;
    let svg = container
        .app
        .admin_upload_image("logo.svg", "image/svg+xml", b"<svg/>".to_vec())
        .await;

    // Assert
    assert_is_json_error(&pdf, 415);
    assert_is_json_error(&svg, 415);
}

#[tokio::test]
async fn oversized_uploads_are_rejected() {
    // Arrange
    let app = crate::test_app::spawn_app_with(function_name!(), |c| {
        c.storage.max_upload_bytes = 1024;
    })
    .await;
    let container = app.make_container_with_user(true).await.login().await;

    // Act
    let response = container
        .app
        .admin_upload_image("gross.png", "image/png", vec![0u8; 4096])
        .await;

    // Assert
    assert_is_json_error(&response, 413);
}
