mod common;

use serde_json::Value;

async fn submit_devis(app: &common::TestApp, email: &str) -> i32 {
    let resp = app
        .client
        .post(app.url("/devis"))
        .json(&serde_json::json!({
            "last_name": "Martin",
            "first_name": "Claire",
            "phone": "+33612345678",
            "email": email,
            "project_type": "showcase website",
            "content": "I need a website for my bakery"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "pending");
    body["data"]["id"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn anonymous_visitor_can_submit_devis() {
    let app = common::spawn_app().await;
    submit_devis(&app, "claire@example.com").await;
}

#[tokio::test]
async fn devis_validation_is_terminal() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;

    let id = submit_devis(&app, "terminal@example.com").await;

    let resp = app
        .client
        .post(app.url(&format!("/admin/devis/{id}/validate")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "validated");

    let resp = app
        .client
        .post(app.url(&format!("/admin/devis/{id}/refuse")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn devis_refusal_flow() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;

    let id = submit_devis(&app, "refused@example.com").await;

    let resp = app
        .client
        .post(app.url(&format!("/admin/devis/{id}/refuse")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "refused");
}

#[tokio::test]
async fn devis_rejects_invalid_email() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/devis"))
        .json(&serde_json::json!({
            "last_name": "Martin",
            "first_name": "Claire",
            "phone": "+33612345678",
            "email": "not-an-email",
            "project_type": "showcase website",
            "content": "hello"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn devis_admin_endpoints_require_admin() {
    let app = common::spawn_app().await;
    let (_admin_id, _admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "devis_user").await;

    let id = submit_devis(&app, "protected@example.com").await;

    let resp = app
        .client
        .get(app.url("/admin/devis"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .post(app.url(&format!("/admin/devis/{id}/validate")))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn missing_devis_returns_not_found() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;

    let resp = app
        .client
        .get(app.url("/admin/devis/999999"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
