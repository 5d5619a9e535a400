use crate::helpers::{assert_is_redirect_to, create_blog_post, post_body};
use crate::macros::function_name_macro::function_name;
use crate::test_app::{spawn_admin_app, spawn_app, spawn_app_container_with_user};
use uuid::Uuid;

#[tokio::test]
async fn marketing_pages_render() {
    // Arrange
    let app = spawn_app(function_name!()).await;

    // Act
    let home = app.get_page("/").await;
    let impressum = app.get_page("/impressum").await;
    let datenschutz = app.get_page("/datenschutz").await;

    // Assert
    assert_eq!(home.status().as_u16(), 200);
    assert_eq!(impressum.status().as_u16(), 200);
    assert_eq!(datenschutz.status().as_u16(), 200);
    let html = home.text().await.unwrap();
    let form_action = format!("{}/info@kfz-westermann.de", app.relay_server.uri());
    assert!(html.contains(&format!(
        r#"action="{}""#,
        ammonia::clean_text(&form_action)
    )));
}

#[tokio::test]
async fn unknown_paths_render_the_404_page() {
    // Arrange
    let app = spawn_app(function_name!()).await;

    // Act
    let response = app.get_page("/ersatzteile/unbekannt").await;

    // Assert
    assert_eq!(response.status().as_u16(), 404);
    assert!(response.text().await.unwrap().contains("noindex"));
}

#[tokio::test]
async fn non_admins_get_a_forbidden_page() {
    // Arrange
    let container = spawn_app_container_with_user(function_name!(), false)
        .await
        .login()
        .await;

    // Act
    let response = container.app.get_page("/admin/dashboard").await;

    // Assert
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn dashboard_delete_confirmation_flow() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let post = create_blog_post(app, &post_body("Auspuff", "draft")).await;
    let post_id = post["id"].as_str().unwrap();

    // Act - Part 1 - Confirmation page
    let confirmation = app
        .get_page_html(&format!("/admin/posts/{}/delete", post_id))
        .await;
    assert!(confirmation.contains("„Auspuff“"));

    // Act - Part 2 - Confirm
    let response = app
        .post_form(
            &format!("/admin/posts/{}/delete", post_id),
            &Vec::<(String, String)>::new(),
        )
        .await;

    // Assert
    assert_is_redirect_to(&response, "/admin/dashboard");
    let dashboard = app.get_page_html("/admin/dashboard").await;
    assert!(dashboard.contains(&ammonia::clean_text("Der Beitrag „Auspuff“ wurde gelöscht.")));
    assert!(dashboard.contains("Noch keine Beiträge vorhanden."));
}

#[tokio::test]
async fn editor_pages_render_and_unknown_ids_redirect() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let post = create_blog_post(app, &post_body("Kupplung", "draft")).await;

    // Act
    let new_editor = app.get_page_html("/admin/editor").await;
    let edit_editor = app
        .get_page_html(&format!("/admin/editor/{}", post["id"].as_str().unwrap()))
        .await;
    let missing = app
        .get_page(&format!("/admin/editor/{}", Uuid::new_v4()))
        .await;

    // Assert
    assert!(new_editor.contains("Neuer Beitrag"));
    assert!(edit_editor.contains(r#"value="Kupplung""#));
    assert_is_redirect_to(&missing, "/admin/dashboard");
}

#[tokio::test]
async fn logout_ends_the_admin_session() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;

    // Act
    let response = app
        .post_form("/admin/logout", &Vec::<(String, String)>::new())
        .await;

    // Assert
    assert_is_redirect_to(&response, "/");
    assert_is_redirect_to(&app.get_page("/admin/dashboard").await, "/admin/login");
}
