use crate::helpers::{assert_is_json_error, assert_json_response};
use crate::macros::function_name_macro::function_name;
use crate::test_app::{TestUser, spawn_admin_app};
use crate::test_data::SELF_DEMOTION_ERROR;
use uuid::Uuid;

#[tokio::test]
async fn admins_cannot_revoke_their_own_role() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let me = container.test_user.user_id;

    // Act
    let response = container.app.admin_revoke_admin(me).await;

    // Assert
    assert_is_json_error(&response, 400);
    let body = assert_json_response(response).await;
    assert_eq!(body["error"], SELF_DEMOTION_ERROR);
    assert!(container.app.is_admin_in_db(me).await);
}

#[tokio::test]
async fn admins_can_grant_and_revoke_other_users() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let colleague = TestUser::generate(false);
    colleague.store(&app.db_connection_pool).await;

    // Act
    let granted = app.admin_grant_admin(colleague.user_id).await;
    let granted_again = app.admin_grant_admin(colleague.user_id).await;
    let is_admin_after_grant = app.is_admin_in_db(colleague.user_id).await;
    let revoked = app.admin_revoke_admin(colleague.user_id).await;

    // Assert
    assert_eq!(granted.status().as_u16(), 200);
    assert_eq!(granted_again.status().as_u16(), 200);
    assert!(is_admin_after_grant);
    assert_eq!(revoked.status().as_u16(), 200);
    assert!(!app.is_admin_in_db(colleague.user_id).await);
}

#[tokio::test]
async fn granting_to_an_unknown_user_returns_404() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;

    // Act
    let response = container.app.admin_grant_admin(Uuid::new_v4()).await;

    // Assert
    assert_is_json_error(&response, 404);
}

#[tokio::test]
async fn user_list_shows_the_admin_flag() {
    // Arrange
    let container = spawn_admin_app(function_name!()).await;
    let app = &container.app;
    let reader = TestUser::generate(false);
    reader.store(&app.db_connection_pool).await;

    // Act
    let users = assert_json_response(app.admin_list_users().await).await;

    // Assert
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    let flag_for = |id: Uuid| {
        users
            .iter()
            .find(|u| u["id"] == id.to_string())
            .map(|u| u["is_admin"].as_bool().unwrap())
    };
    assert_eq!(flag_for(container.test_user.user_id), Some(true));
    assert_eq!(flag_for(reader.user_id), Some(false));
}
