mod common;

use serde_json::{json, Value};
use worktrack::services::creator::CreatorKind;

#[tokio::test]
async fn requests_require_a_token() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let resp = app.client.get(app.url("/requests")).send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .client
        .get(app.url("/requests"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn token_for_deleted_identity_is_rejected() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let agent_id = common::create_agent(&app, "Temp", "field").await;
    let token = common::token_for(CreatorKind::Agent, agent_id, "field");

    app.exec("DELETE FROM agents WHERE id = $1", vec![agent_id.into()])
        .await;

    let resp = app
        .client
        .get(app.url("/statuses"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn create_succeeds_for_each_existing_creator_kind() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let agent_id = common::create_agent(&app, "Bilal", "field").await;
    let sm_id = common::create_sm_agent(&app, "Crew A", "reporter").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    for (kind, id, name) in [
        ("user", user_id, "Ayesha"),
        ("agent", agent_id, "Bilal"),
        ("socialmedia", sm_id, "Crew A"),
    ] {
        let req_id =
            common::create_request(&app, &token, common::request_body(&lookups, kind, id)).await;
        let detail = common::get_detail(&app, &token, req_id).await;
        assert_eq!(detail["creator_type"], kind);
        assert_eq!(detail["creator_name"], name);
        assert_eq!(detail["status_name"], "Pending");
        assert_eq!(detail["town_name"], "Gulshan");
        assert_eq!(detail["subtown_name"], "Block 13");
        assert_eq!(detail["complaint_type_name"], "Water Supply");
        assert_eq!(detail["complaint_subtype_name"], "Pipe Burst");
        assert_eq!(detail["assigned_sm_agents"], json!([]));
    }
}

#[tokio::test]
async fn create_with_unknown_creator_inserts_nothing() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    // Exists as a user, but not as an agent
    let resp = app
        .client
        .post(app.url("/requests"))
        .bearer_auth(&token)
        .json(&common::request_body(&lookups, "agent", user_id + 100))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Creator not found"));

    let resp = app
        .client
        .post(app.url("/requests"))
        .bearer_auth(&token)
        .json(&common::request_body(&lookups, "robot", user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid creator type"));

    assert_eq!(app.count("SELECT COUNT(*) FROM work_requests").await, 0);
}

#[tokio::test]
async fn create_rejects_missing_fields_and_bad_hierarchy() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let mut missing = common::request_body(&lookups, "user", user_id);
    missing.as_object_mut().unwrap().remove("address");
    let resp = app
        .client
        .post(app.url("/requests"))
        .bearer_auth(&token)
        .json(&missing)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let mut wrong_town = common::request_body(&lookups, "user", user_id);
    wrong_town["town_id"] = json!(lookups.other_town_id);
    let resp = app
        .client
        .post(app.url("/requests"))
        .bearer_auth(&token)
        .json(&wrong_town)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("does not belong"));

    let mut empty_contact = common::request_body(&lookups, "user", user_id);
    empty_contact["contact_number"] = json!("");
    let resp = app
        .client
        .post(app.url("/requests"))
        .bearer_auth(&token)
        .json(&empty_contact)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["details"]["contact_number"].is_array());

    assert_eq!(app.count("SELECT COUNT(*) FROM work_requests").await, 0);
}

#[tokio::test]
async fn geo_point_round_trips_through_detail() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let mut body = common::request_body(&lookups, "user", user_id);
    body["latitude"] = json!(24.86);
    body["longitude"] = json!(67.01);
    let id = common::create_request(&app, &token, body).await;

    let detail = common::get_detail(&app, &token, id).await;
    assert!((detail["latitude"].as_f64().unwrap() - 24.86).abs() < 1e-9);
    assert!((detail["longitude"].as_f64().unwrap() - 67.01).abs() < 1e-9);

    // Stored with longitude as X
    let x = app
        .count(&format!(
            "SELECT ROUND(ST_X(geo_tag))::bigint FROM work_requests WHERE id = {}",
            id
        ))
        .await;
    assert_eq!(x, 67);
}

#[tokio::test]
async fn partial_coordinates_store_no_point() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let mut body = common::request_body(&lookups, "user", user_id);
    body["latitude"] = json!("24.86");
    body["longitude"] = json!("");
    let id = common::create_request(&app, &token, body).await;

    let detail = common::get_detail(&app, &token, id).await;
    assert!(detail["latitude"].is_null());
    assert!(detail["longitude"].is_null());
    assert_eq!(
        app.count("SELECT COUNT(*) FROM work_requests WHERE geo_tag IS NULL")
            .await,
        1
    );
}

#[tokio::test]
async fn detail_of_missing_request_is_404() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let resp = app
        .client
        .get(app.url("/requests?id=999999"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_query_and_path_values_return_json_errors() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    for path in [
        "/requests?id=abc",
        "/requests?limit=10&page=x",
        "/towns/abc/subtowns",
        "/complaint-types/abc/subtypes",
        "/requests/abc/media",
    ] {
        let resp = app
            .client
            .get(app.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "{}", path);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].is_string(), "{}", path);
    }

    let resp = app
        .client
        .delete(app.url("/complaints?id=abc"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn full_listing_is_a_plain_array_without_assignments() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    for _ in 0..3 {
        common::create_request(&app, &token, common::request_body(&lookups, "user", user_id))
            .await;
    }

    let resp = app
        .client
        .get(app.url("/requests"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].get("assigned_sm_agents").is_none());
    assert_eq!(rows[0]["creator_name"], "Ayesha");
}

#[tokio::test]
async fn create_is_recorded_in_action_log() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let id = common::create_request(&app, &token, common::request_body(&lookups, "user", user_id))
        .await;

    // The audit insert is detached from the response
    let sql = format!(
        "SELECT COUNT(*) FROM action_logs WHERE action_type = 'CREATE' \
         AND entity_type = 'work_request' AND entity_id = {} AND actor_type = 'user'",
        id
    );
    let mut found = 0;
    for _ in 0..50 {
        found = app.count(&sql).await;
        if found > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(found, 1);
}
