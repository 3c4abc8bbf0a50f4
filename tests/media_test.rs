mod common;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use worktrack::services::creator::CreatorKind;

const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const WEBM: [u8; 8] = [0x1A, 0x45, 0xDF, 0xA3, 0x01, 0x00, 0x00, 0x00];

fn form(bytes: &[u8], mime: &str) -> Form {
    let part = Part::bytes(bytes.to_vec())
        .file_name("evidence")
        .mime_str(mime)
        .unwrap();
    Form::new()
        .part("file", part)
        .text("description", "Before repair")
}

async fn upload(app: &common::TestApp, token: &str, request_id: i32, form: Form) -> (u16, Value) {
    let resp = app
        .client
        .post(app.url(&format!("/requests/{}/media", request_id)))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn request_with_status(app: &common::TestApp, status: &str) -> (i32, String) {
    let lookups = common::seed_lookups(app).await;
    let user_id = common::create_user(app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");
    let id =
        common::create_request(app, &token, common::request_body(&lookups, "user", user_id)).await;
    let status_id = common::status_id(app, status).await;
    app.exec(
        "UPDATE work_requests SET status_id = $1 WHERE id = $2",
        vec![status_id.into(), id.into()],
    )
    .await;
    (id, token)
}

#[tokio::test]
async fn open_requests_accept_uploads_from_anyone() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (id, user_token) = request_with_status(&app, "In Progress").await;
    let agent_id = common::create_agent(&app, "Bilal", "field").await;
    let sm_id = common::create_sm_agent(&app, "Crew A", "reporter").await;

    for token in [
        user_token.clone(),
        common::token_for(CreatorKind::Agent, agent_id, "field"),
        common::token_for(CreatorKind::SocialMedia, sm_id, "reporter"),
    ] {
        let (status, body) = upload(&app, &token, id, form(&PNG, "image/png")).await;
        assert_eq!(status, 201, "{}", body);
        assert_eq!(body["kind"], "image");
        assert!(body["file_url"].as_str().unwrap().starts_with("/uploads/images/"));
    }

    let resp = app
        .client
        .get(app.url(&format!("/requests/{}/media", id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    let listed: Value = resp.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 3);
    assert_eq!(listed[0]["description"], "Before repair");

    let _ = tokio::fs::remove_dir_all(&app.upload_dir).await;
}

#[tokio::test]
async fn completed_requests_only_accept_elevated_roles() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (id, _) = request_with_status(&app, "Completed").await;
    let field_agent = common::create_agent(&app, "Bilal", "field").await;
    let manager = common::create_agent(&app, "Sana", "manager").await;
    let editor = common::create_sm_agent(&app, "Crew Lead", "editor").await;

    let (status, body) = upload(
        &app,
        &common::token_for(CreatorKind::Agent, field_agent, "field"),
        id,
        form(&PNG, "image/png"),
    )
    .await;
    assert_eq!(status, 403);
    assert!(body["error"].is_string());
    assert_eq!(
        app.count("SELECT COUNT(*) FROM work_request_media").await,
        0
    );

    let (status, _) = upload(
        &app,
        &common::token_for(CreatorKind::Agent, manager, "manager"),
        id,
        form(&PNG, "image/png"),
    )
    .await;
    assert_eq!(status, 201);

    let (status, body) = upload(
        &app,
        &common::token_for(CreatorKind::SocialMedia, editor, "editor"),
        id,
        form(&WEBM, "video/webm"),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["kind"], "video");
    assert_eq!(body["uploader_type"], "socialmedia");

    let _ = tokio::fs::remove_dir_all(&app.upload_dir).await;
}

#[tokio::test]
async fn mismatched_content_is_rejected() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (id, token) = request_with_status(&app, "Pending").await;

    let (status, _) = upload(&app, &token, id, form(&PNG, "image/jpeg")).await;
    assert_eq!(status, 400);

    let (status, _) = upload(&app, &token, id, form(b"%PDF-1.7", "application/pdf")).await;
    assert_eq!(status, 400);

    let (status, _) = upload(
        &app,
        &token,
        id,
        Form::new().text("description", "no file"),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = upload(&app, &token, id + 1000, form(&PNG, "image/png")).await;
    assert_eq!(status, 404);

    // Not a multipart body at all
    let resp = app
        .client
        .post(app.url(&format!("/requests/{}/media", id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "file": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    assert_eq!(
        app.count("SELECT COUNT(*) FROM work_request_media").await,
        0
    );
}
