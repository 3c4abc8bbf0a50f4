mod common;

use serde_json::{json, Value};
use worktrack::services::creator::CreatorKind;

async fn list(app: &common::TestApp, token: &str, query: &str) -> (u16, Value) {
    let resp = app
        .client
        .get(app.url(&format!("/requests?{}", query)))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

/// Spreads request dates one minute apart, oldest first, so ordering is stable.
async fn stagger_dates(app: &common::TestApp) {
    app.exec(
        "UPDATE work_requests SET request_date = TIMESTAMP '2025-01-01 00:00:00' + (id * INTERVAL '1 minute')",
        vec![],
    )
    .await;
}

#[tokio::test]
async fn page_sizes_and_total_follow_the_filter() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let other_id = common::create_user(&app, "Zara").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let n = 7;
    for _ in 0..n {
        common::create_request(&app, &token, common::request_body(&lookups, "user", user_id))
            .await;
    }
    // Noise from another creator
    for _ in 0..2 {
        common::create_request(&app, &token, common::request_body(&lookups, "user", other_id))
            .await;
    }
    stagger_dates(&app).await;

    let limit = 3;
    for page in 1..=4 {
        let (status, body) = list(
            &app,
            &token,
            &format!(
                "creator_id={}&creator_type=user&limit={}&page={}",
                user_id, limit, page
            ),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["total"], n);
        let expected = limit.min((n - (page - 1) * limit).max(0));
        assert_eq!(
            body["data"].as_array().unwrap().len() as i64,
            expected,
            "page {}",
            page
        );
    }
}

#[tokio::test]
async fn pages_are_newest_first_and_page_defaults_to_one() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(
            common::create_request(&app, &token, common::request_body(&lookups, "user", user_id))
                .await,
        );
    }
    stagger_dates(&app).await;

    let (_, first) = list(&app, &token, "limit=2&page=0").await;
    let (_, missing) = list(&app, &token, "limit=2").await;
    let (_, second) = list(&app, &token, "limit=2&page=2").await;

    let page_ids = |v: &Value| -> Vec<i64> {
        v["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect()
    };
    assert_eq!(page_ids(&first), vec![ids[3] as i64, ids[2] as i64]);
    assert_eq!(page_ids(&first), page_ids(&missing));
    assert_eq!(page_ids(&second), vec![ids[1] as i64, ids[0] as i64]);
    assert_eq!(first["data"][0]["assigned_sm_agents"], json!([]));
}

#[tokio::test]
async fn text_filter_is_case_insensitive_substring() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha Khan").await;
    let agent_id = common::create_agent(&app, "Bilal Ahmed", "field").await;
    let sm_id = common::create_sm_agent(&app, "Crew Delta", "reporter").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let mut by_address = common::request_body(&lookups, "user", user_id);
    by_address["address"] = json!("Plot 7, Clifton Road");
    common::create_request(&app, &token, by_address).await;
    common::create_request(&app, &token, common::request_body(&lookups, "agent", agent_id)).await;
    common::create_request(&app, &token, common::request_body(&lookups, "socialmedia", sm_id))
        .await;

    for (filter, expected) in [
        ("cLiFtOn", 1),   // address
        ("khan", 1),      // user name
        ("AHMED", 1),     // agent name
        ("delta", 1),     // social media name
        ("water sup", 3), // complaint type
        ("nowhere", 0),
    ] {
        let (status, body) = list(&app, &token, &format!("limit=10&filter={}", filter)).await;
        assert_eq!(status, 200);
        assert_eq!(body["total"], expected, "filter {}", filter);
        assert_eq!(
            body["data"].as_array().unwrap().len(),
            expected as usize,
            "filter {}",
            filter
        );
    }

    let (_, empty) = list(&app, &token, "limit=10&filter=nowhere").await;
    assert_eq!(empty, json!({ "data": [], "total": 0 }));
}

#[tokio::test]
async fn sm_agent_filter_only_returns_assigned_requests() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let sm_id = common::create_sm_agent(&app, "Crew A", "reporter").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");
    let pending = common::status_id(&app, "Pending").await;

    let assigned =
        common::create_request(&app, &token, common::request_body(&lookups, "user", user_id))
            .await;
    common::create_request(&app, &token, common::request_body(&lookups, "user", user_id)).await;

    let resp = app
        .client
        .put(app.url("/requests"))
        .bearer_auth(&token)
        .json(&json!({
            "id": assigned,
            "assigned_to": null,
            "status_id": pending,
            "assigned_sm_agents": [{ "sm_agent_id": sm_id }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, body) = list(
        &app,
        &token,
        &format!("limit=10&assigned_smagent_id={}", sm_id),
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], assigned);
    assert_eq!(body["data"][0]["assigned_sm_agents"][0]["sm_agent_name"], "Crew A");
}

#[tokio::test]
async fn incomplete_creator_pair_is_rejected() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    let (status, _) = list(&app, &token, &format!("limit=5&creator_id={}", user_id)).await;
    assert_eq!(status, 400);

    let (status, body) = list(
        &app,
        &token,
        &format!("limit=5&creator_id={}&creator_type=robot", user_id),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid creator type"));
}

#[tokio::test]
async fn page_far_past_the_end_is_empty_with_total() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let lookups = common::seed_lookups(&app).await;
    let user_id = common::create_user(&app, "Ayesha").await;
    let token = common::token_for(CreatorKind::User, user_id, "user");

    for _ in 0..2 {
        common::create_request(&app, &token, common::request_body(&lookups, "user", user_id))
            .await;
    }

    for query in [
        format!("limit=1000&page={}", i64::MAX),
        "limit=1000&page=9300000000000000".to_string(),
        format!("limit=1&page={}", i64::MAX),
    ] {
        let (status, body) = list(&app, &token, &query).await;
        assert_eq!(status, 200, "{}", query);
        assert_eq!(body["total"], 2);
        assert_eq!(body["data"], json!([]));
    }
}
