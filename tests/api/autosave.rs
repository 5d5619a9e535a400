use crate::helpers::{assert_is_json_error, create_blog_post, eventually, post_body};
use crate::macros::function_name_macro::function_name;
use crate::test_app::{TestApp, TestAppContainerWithUser, spawn_app_with};
use uuid::Uuid;

async fn spawn_fast_autosave_app(test_name: String) -> TestAppContainerWithUser {
    spawn_app_with(test_name, |c| c.site.autosave_debounce_milliseconds = 200)
        .await
        .make_container_with_user(true)
        .await
        .login()
        .await
}

async fn stored_title(app: &TestApp, post_id: Uuid) -> String {
    let (title,): (String,) = sqlx::query_as("SELECT title FROM blog_posts WHERE id = $1")
        .bind(post_id)
        .fetch_one(&app.db_connection_pool)
        .await
        .unwrap();
    title
}

#[tokio::test]
async fn autosave_returns_202_and_persists_after_the_debounce() {
    // Arrange
    let container = spawn_fast_autosave_app(function_name!()).await;
    let app = &container.app;
    let post = create_blog_post(app, &post_body("Entwurf", "draft")).await;
    let post_id: Uuid = post["id"].as_str().unwrap().parse().unwrap();
    let mut draft = post_body("Entwurf, überarbeitet", "draft");
    draft["slug"] = post["slug"].clone();

    // Act
    let response = app.admin_autosave_post(post_id, &draft).await;

    // Assert
    assert_eq!(response.status().as_u16(), 202);
    let saved = eventually(
        move || async move { stored_title(app, post_id).await == "Entwurf, überarbeitet" },
        50,
    )
    .await;
    assert!(saved, "the draft was never auto-saved");
}

#[tokio::test]
async fn the_last_draft_of_a_burst_wins() {
    // Arrange
    let container = spawn_fast_autosave_app(function_name!()).await;
    let app = &container.app;
    let post = create_blog_post(app, &post_body("Tippen", "draft")).await;
    let post_id: Uuid = post["id"].as_str().unwrap().parse().unwrap();

    // Act
    for i in 1..=5 {
        let mut draft = post_body(&format!("Tippen {}", i), "draft");
        draft["slug"] = post["slug"].clone();
        let response = app.admin_autosave_post(post_id, &draft).await;
        assert_eq!(response.status().as_u16(), 202);
    }

    // Assert
    let saved = eventually(move || async move { stored_title(app, post_id).await == "Tippen 5" }, 50).await;
    assert!(saved, "the newest draft was not saved");
}

#[tokio::test]
async fn autosave_of_an_unknown_post_returns_404() {
    // Arrange
    let container = spawn_fast_autosave_app(function_name!()).await;
    let mut draft = post_body("Verwaist", "draft");
    draft["slug"] = "verwaist".into();

    // Act
    let response = container
        .app
        .admin_autosave_post(Uuid::new_v4(), &draft)
        .await;

    // Assert
    assert_is_json_error(&response, 404);
}
