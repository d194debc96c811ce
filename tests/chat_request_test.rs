mod common;

use serde_json::Value;

#[tokio::test]
async fn create_request_requires_an_admin_account() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "early_bird").await;

    // No admin exists yet.
    let resp = app
        .client
        .post(app.url("/chat/requests"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "content": "talk about my project",
            "requested_date": "2030-06-01",
            "requested_time": "14:00:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn request_lifecycle_validate() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "requester").await;

    let request_id = common::create_test_chat_request(&app, &user_token).await;

    // Starts pending and owned by the requester
    let resp = app
        .client
        .get(app.url("/chat/requests/mine"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let mine = body["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["status"], "pending");

    // Admin validates
    let resp = app
        .client
        .post(app.url(&format!("/admin/chat/requests/{request_id}/validate")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "validated");

    // Validation is terminal: a second decision conflicts
    let resp = app
        .client
        .post(app.url(&format!("/admin/chat/requests/{request_id}/refuse")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let resp = app
        .client
        .post(app.url(&format!("/admin/chat/requests/{request_id}/validate")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn request_lifecycle_refuse() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "refused").await;

    let request_id = common::create_test_chat_request(&app, &user_token).await;

    let resp = app
        .client
        .post(app.url(&format!("/admin/chat/requests/{request_id}/refuse")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "refused");
}

#[tokio::test]
async fn decision_endpoints_are_admin_only() {
    let app = common::spawn_app().await;
    let (_admin_id, _admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "sneaky").await;

    let request_id = common::create_test_chat_request(&app, &user_token).await;

    let resp = app
        .client
        .post(app.url(&format!("/admin/chat/requests/{request_id}/validate")))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .get(app.url("/admin/chat/requests"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn slot_negotiation_flow() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "negotiator").await;

    let request_id = common::create_test_chat_request(&app, &user_token).await;

    // Admin proposes two alternative slots
    let resp = app
        .client
        .post(app.url(&format!(
            "/admin/chat/requests/{request_id}/propose-slots"
        )))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "slots": ["2030-06-02 10:00", "2030-06-03 16:30"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Requester cannot confirm a slot that was not proposed
    let resp = app
        .client
        .post(app.url(&format!("/chat/requests/{request_id}/confirm-slot")))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({ "slot": "2030-06-04 09:00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Confirming a proposed slot works
    let resp = app
        .client
        .post(app.url(&format!("/chat/requests/{request_id}/confirm-slot")))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({ "slot": "2030-06-03 16:30" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["confirmed_slot"], "2030-06-03T16:30:00");
}

#[tokio::test]
async fn only_requester_can_confirm_slot() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "victim").await;
    let (_other_id, other_token) = common::create_test_user(&app, "impostor").await;

    let request_id = common::create_test_chat_request(&app, &user_token).await;

    let resp = app
        .client
        .post(app.url(&format!(
            "/admin/chat/requests/{request_id}/propose-slots"
        )))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "slots": ["2030-06-02 10:00"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url(&format!("/chat/requests/{request_id}/confirm-slot")))
        .bearer_auth(&other_token)
        .json(&serde_json::json!({ "slot": "2030-06-02 10:00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn propose_slots_rejects_bad_format() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "formats").await;

    let request_id = common::create_test_chat_request(&app, &user_token).await;

    let resp = app
        .client
        .post(app.url(&format!(
            "/admin/chat/requests/{request_id}/propose-slots"
        )))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "slots": ["tomorrow at noon"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .client
        .post(app.url(&format!(
            "/admin/chat/requests/{request_id}/propose-slots"
        )))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "slots": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn admin_list_filters_by_status() {
    let app = common::spawn_app().await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;
    let (_user_id, user_token) = common::create_test_user(&app, "lister").await;

    let first = common::create_test_chat_request(&app, &user_token).await;
    let _second = common::create_test_chat_request(&app, &user_token).await;

    let resp = app
        .client
        .post(app.url(&format!("/admin/chat/requests/{first}/validate")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url("/admin/chat/requests?status=pending"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(items.iter().all(|r| r["status"] == "pending"));

    // Unknown status values are rejected rather than ignored
    let resp = app
        .client
        .get(app.url("/admin/chat/requests?status=archived"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
