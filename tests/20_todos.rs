mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_todo_defaults_to_incomplete() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-create"),
        "secret123",
    )
    .await?;

    let text = "Test todo text";
    let todo = common::create_todo(&client, &server.base_url, &token, text).await?;

    assert_eq!(todo["text"], text);
    assert_eq!(todo["completed"], false);
    assert!(todo["completedAt"].is_null());
    assert!(todo.get("id").is_some());

    let res = client
        .get(format!("{}/todos", server.base_url))
        .header("x-auth", token.as_str())
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["todos"].as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_or_blank_text() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-blank"),
        "secret123",
    )
    .await?;

    for body in [json!({}), json!({ "text": "   " })] {
        let res = client
            .post(format!("{}/todos", server.base_url))
            .header("x-auth", token.as_str())
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }

    // Nothing was persisted
    let res = client
        .get(format!("{}/todos", server.base_url))
        .header("x-auth", token.as_str())
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["todos"].as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn todos_require_auth() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/todos", server.base_url))
        .json(&json!({ "text": "anonymous todo" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/todos", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn list_preserves_insertion_order() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-order"),
        "secret123",
    )
    .await?;

    for text in ["first", "second", "third"] {
        common::create_todo(&client, &server.base_url, &token, text).await?;
    }

    let res = client
        .get(format!("{}/todos", server.base_url))
        .header("x-auth", token.as_str())
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    let texts: Vec<&str> = body["todos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();

    assert_eq!(texts, vec!["first", "second", "third"]);

    Ok(())
}

#[tokio::test]
async fn get_by_id_returns_the_record() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-get"),
        "secret123",
    )
    .await?;

    let created = common::create_todo(&client, &server.base_url, &token, "fetch me").await?;
    let id = created["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["todo"]["id"], id);
    assert_eq!(body["todo"]["text"], "fetch me");

    Ok(())
}

#[tokio::test]
async fn malformed_id_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-badid"),
        "secret123",
    )
    .await?;

    for (method, path) in [
        ("GET", "/todos/123abc"),
        ("PATCH", "/todos/123abc"),
        ("DELETE", "/todos/123abc"),
    ] {
        let req = match method {
            "GET" => client.get(format!("{}{}", server.base_url, path)),
            "PATCH" => client
                .patch(format!("{}{}", server.base_url, path))
                .json(&json!({ "completed": true })),
            _ => client.delete(format!("{}{}", server.base_url, path)),
        };
        let res = req.header("x-auth", token.as_str()).send().await?;
        assert_eq!(
            res.status(),
            StatusCode::NOT_FOUND,
            "{} {} must hide id validity",
            method,
            path
        );
    }

    Ok(())
}

#[tokio::test]
async fn unknown_id_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-unknown"),
        "secret123",
    )
    .await?;

    let res = client
        .get(format!(
            "{}/todos/00000000-0000-4000-8000-000000000000",
            server.base_url
        ))
        .header("x-auth", token.as_str())
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn patch_completed_drives_the_timestamp() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-complete"),
        "secret123",
    )
    .await?;

    let created = common::create_todo(&client, &server.base_url, &token, "finish me").await?;
    let id = created["id"].as_str().unwrap();

    // Completing stamps the current time
    let res = client
        .patch(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .json(&json!({ "completed": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["todo"]["completed"], true);
    assert!(body["todo"]["completedAt"].is_number());

    // Un-completing clears it, even when the client supplies a value
    let res = client
        .patch(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .json(&json!({ "completed": false, "completedAt": 12345 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["todo"]["completed"], false);
    assert!(body["todo"]["completedAt"].is_null());

    Ok(())
}

#[tokio::test]
async fn patch_without_completed_leaves_timestamp_alone() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-textonly"),
        "secret123",
    )
    .await?;

    let created = common::create_todo(&client, &server.base_url, &token, "old text").await?;
    let id = created["id"].as_str().unwrap();

    let res = client
        .patch(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .json(&json!({ "completed": true }))
        .send()
        .await?;
    let completed_at = res.json::<Value>().await?["todo"]["completedAt"].clone();
    assert!(completed_at.is_number());

    let res = client
        .patch(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .json(&json!({ "text": "new text" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["todo"]["text"], "new text");
    assert_eq!(body["todo"]["completed"], true);
    assert_eq!(body["todo"]["completedAt"], completed_at);

    Ok(())
}

#[tokio::test]
async fn patch_rejects_blank_text() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-blankpatch"),
        "secret123",
    )
    .await?;

    let created = common::create_todo(&client, &server.base_url, &token, "keep me").await?;
    let id = created["id"].as_str().unwrap();

    let res = client
        .patch(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .json(&json!({ "text": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // The record is unchanged
    let res = client
        .get(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["todo"]["text"], "keep me");

    Ok(())
}

#[tokio::test]
async fn delete_returns_the_removed_record() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("todo-delete"),
        "secret123",
    )
    .await?;

    let created = common::create_todo(&client, &server.base_url, &token, "remove me").await?;
    let id = created["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["todo"]["id"], id);
    assert_eq!(body["todo"]["text"], "remove me");

    // Gone for good
    let res = client
        .get(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/todos/{}", server.base_url, id))
        .header("x-auth", token.as_str())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
