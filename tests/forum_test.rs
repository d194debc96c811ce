mod common;

use serde_json::Value;

#[tokio::test]
async fn create_and_list_subjects() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "author").await;

    let subject_id = common::create_test_subject(&app, &token, "First project ideas").await;

    let resp = app
        .client
        .get(app.url("/forum/subjects"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(items.iter().any(|s| s["id"] == subject_id));

    let resp = app
        .client
        .get(app.url(&format!("/forum/subjects/{subject_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["title"], "First project ideas");
}

#[tokio::test]
async fn create_subject_requires_auth() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/forum/subjects"))
        .json(&serde_json::json!({ "title": "anonymous subject" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn subject_title_is_sanitized() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "sanitizer").await;

    let resp = app
        .client
        .post(app.url("/forum/subjects"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "title": "hello <script>alert(1)</script>world" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let title = body["data"]["title"].as_str().unwrap();
    assert!(!title.contains("<script>"));
    assert!(!title.contains("alert"));
    assert!(title.contains("hello"));
}

#[tokio::test]
async fn comment_reply_and_like_flow() {
    let app = common::spawn_app().await;
    let (_author_id, author_token) = common::create_test_user(&app, "poster").await;
    let (_other_id, other_token) = common::create_test_user(&app, "liker").await;

    let subject_id = common::create_test_subject(&app, &author_token, "Comment flow").await;

    // Comment
    let resp = app
        .client
        .post(app.url(&format!("/forum/subjects/{subject_id}/comments")))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "What does everyone think?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let comment_id = body["data"]["id"].as_i64().unwrap();

    // Reply from another user
    let resp = app
        .client
        .post(app.url(&format!("/forum/comments/{comment_id}/replies")))
        .bearer_auth(&other_token)
        .json(&serde_json::json!({ "content": "Sounds good to me" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Like toggles on
    let resp = app
        .client
        .post(app.url(&format!("/forum/comments/{comment_id}/like")))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["liked"], true);
    assert_eq!(body["data"]["like_count"], 1);

    // Like toggles off
    let resp = app
        .client
        .post(app.url(&format!("/forum/comments/{comment_id}/like")))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["liked"], false);
    assert_eq!(body["data"]["like_count"], 0);

    // Thread listing carries replies and like count
    let resp = app
        .client
        .get(app.url(&format!("/forum/subjects/{subject_id}/comments")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let threads = body["data"].as_array().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["replies"].as_array().unwrap().len(), 1);
    assert_eq!(threads[0]["like_count"], 0);
}

#[tokio::test]
async fn only_author_can_edit_comment() {
    let app = common::spawn_app().await;
    let (_author_id, author_token) = common::create_test_user(&app, "owner").await;
    let (_other_id, other_token) = common::create_test_user(&app, "intruder").await;

    let subject_id = common::create_test_subject(&app, &author_token, "Ownership").await;

    let resp = app
        .client
        .post(app.url(&format!("/forum/subjects/{subject_id}/comments")))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "my comment" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let comment_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .put(app.url(&format!("/forum/comments/{comment_id}")))
        .bearer_auth(&other_token)
        .json(&serde_json::json!({ "content": "hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .delete(app.url(&format!("/forum/comments/{comment_id}")))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn admin_can_delete_any_comment_and_subject() {
    let app = common::spawn_app().await;
    let (_author_id, author_token) = common::create_test_user(&app, "mod_target").await;
    let (_admin_id, admin_token) = common::create_test_admin(&app).await;

    let subject_id = common::create_test_subject(&app, &author_token, "To be moderated").await;

    let resp = app
        .client
        .post(app.url(&format!("/forum/subjects/{subject_id}/comments")))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "rule-breaking content" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let comment_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/forum/comments/{comment_id}")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .delete(app.url(&format!("/admin/subjects/{subject_id}")))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/forum/subjects/{subject_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn empty_comment_rejected() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "empty").await;

    let subject_id = common::create_test_subject(&app, &token, "Empty content").await;

    let resp = app
        .client
        .post(app.url(&format!("/forum/subjects/{subject_id}/comments")))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "content": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
