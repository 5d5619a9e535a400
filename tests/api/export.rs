use crate::helpers::{assert_is_json_error, assert_json_response, create_blog_post, post_body};
use crate::macros::function_name_macro::function_name;
use crate::test_app::spawn_admin_app;
use crate::test_data::NOTHING_TO_EXPORT_ERROR;

#[tokio::test]
async fn export_without_posts_returns_404() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;

    // Act
    let response = container.app.get_page("/api/admin/blog/export.csv").await;

    // Assert
    assert_is_json_error(&response, 404);
    let body = assert_json_response(response).await;
    assert_eq!(body["error"], NOTHING_TO_EXPORT_ERROR);
}

#[tokio::test]
async fn export_is_a_quoted_csv_attachment() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let mut body = post_body("Der \"beste\" Ölfilter", "published");
    body["tags"] = serde_json::json!(["Motor", "Wartung"]);
    create_blog_post(app, &body).await;

    // Act
    let response = app.get_page("/api/admin/blog/export.csv").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let disposition = response.headers()["Content-Disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"blog-posts-"));
    assert!(disposition.ends_with(".csv\""));
    let bytes = response.bytes().await.unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = std::str::from_utf8(&bytes[3..]).unwrap();
    assert!(text.starts_with("\"Titel\",\"Slug\",\"Status\""));
    assert!(text.contains("\"Der \"\"beste\"\" Ölfilter\""));
    assert!(text.contains("\"Motor, Wartung\""));
}

#[tokio::test]
async fn export_requires_an_admin() {
    // Arrange
    let app = crate::test_app::spawn_app(function_name!()).await;

    // Act
    let response = app.get_page("/api/admin/blog/export.csv").await;

    // Assert
    assert_is_json_error(&response, 401);
}
