mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::json;

const HEADER: &str = "ID,Content,Rating,Admin Rating,Anonymous,Created At";

#[tokio::test]
async fn feedback_scenario_exports_one_row() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let admin_a = common::admin(server, &client).await?;
    let admin_b = common::admin(server, &client).await?;

    let created = common::create_box(server, &client, &admin_a, json!({ "title": "Feedback", "color": "#3B82F6" })).await?;
    let box_id = created["id"].as_str().unwrap().to_string();

    let (status, body) =
        common::submit(server, &client, json!({ "boxId": box_id, "content": "Great app", "rating": 5 })).await?;
    assert_eq!(status, StatusCode::OK);
    let suggestion_id = body["suggestion"]["id"].as_str().unwrap().to_string();

    let res = client
        .get(server.url(&format!("/api/boxes/{box_id}/suggestions")))
        .bearer_auth(&admin_b.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(server.url(&format!("/api/boxes/{box_id}/export")))
        .bearer_auth(&admin_a.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"suggestions-{box_id}.csv\"").as_str()
    );

    let body = res.text().await?;
    let lines: Vec<&str> = body.split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].starts_with(&format!("\"{suggestion_id}\",\"Great app\",\"5\",\"\",\"true\",\"")));
    assert!(lines[1].ends_with("+00:00\""));
    Ok(())
}

#[tokio::test]
async fn export_quotes_and_orders_newest_first() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let owner = common::admin(server, &client).await?;
    let created = common::create_box(server, &client, &owner, json!({ "title": "Quotes" })).await?;
    let box_id = created["id"].as_str().unwrap().to_string();

    common::submit(server, &client, json!({ "boxId": box_id, "content": "first" })).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    common::submit(server, &client, json!({ "boxId": box_id, "content": "He said \"hi\"" })).await?;

    let body = client
        .get(server.url(&format!("/api/boxes/{box_id}/export")))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .text()
        .await?;
    let lines: Vec<&str> = body.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains(",\"He said \"\"hi\"\"\","));
    assert!(lines[2].contains(",\"first\","));
    assert!(!body.ends_with('\n'));
    Ok(())
}

#[tokio::test]
async fn empty_box_exports_header_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let owner = common::admin(server, &client).await?;
    let created = common::create_box(server, &client, &owner, json!({ "title": "Quiet" })).await?;
    let box_id = created["id"].as_str().unwrap();

    let res = client
        .get(server.url(&format!("/api/boxes/{box_id}/export")))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, format!("{HEADER}\n"));

    let res = client.get(server.url(&format!("/api/boxes/{box_id}/export"))).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
