use crate::helpers::{assert_is_json_error, assert_json_response};
use crate::macros::function_name_macro::function_name;
use crate::test_app::spawn_app;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn inquiry() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Anna",
        "lastName": "Schulte",
        "email": "anna.schulte@example.de",
        "phone": "02505 1234",
        "desiredPart": "Bremsscheiben vorne, VW Golf VII"
    })
}

#[tokio::test]
async fn valid_inquiries_are_forwarded_once_to_the_relay() {
    // Arrange
    let app = spawn_app(function_name!()).await;
    Mock::given(path("/info@kfz-westermann.de"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.relay_server)
        .await;

    // Act
    let response = app.post_json("/api/contact", &inquiry()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body = assert_json_response(response).await;
    assert!(body["success"].as_bool().unwrap());
    let received = app.relay_server.received_requests().await.unwrap();
    let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(&received[0].body).unwrap();
    assert!(fields.contains(&("desiredPart".into(), "Bremsscheiben vorne, VW Golf VII".into())));
}

#[tokio::test]
async fn invalid_inquiries_return_422_without_calling_the_relay() {
    // Arrange
    let app = spawn_app(function_name!()).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.relay_server)
        .await;
    let mut body = inquiry();
    body["email"] = "keine-adresse".into();
    body["firstName"] = "  ".into();

    // Act
    let response = app.post_json("/api/contact", &body).await;

    // Assert
    assert_eq!(response.status().as_u16(), 422);
    let body = assert_json_response(response).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn relay_failures_return_502() {
    // Arrange
    let app = spawn_app(function_name!()).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.relay_server)
        .await;

    // Act
    let response = app.post_json("/api/contact", &inquiry()).await;

    // Assert
    assert_is_json_error(&response, 502);
}
