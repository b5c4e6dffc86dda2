//! Health endpoint integration test.

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}
