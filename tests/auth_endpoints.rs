use anyhow::Result;
use character_favorites::{create_session, SessionKeys};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

mod common;

use common::TestServer;

#[tokio::test]
async fn register_then_me() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({
            "email": "jon@wall.org",
            "password": "ghost123",
            "firstName": "Jon",
            "lastName": "Snow"
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let session: Value = response.json().await?;
    assert_eq!(session["user"]["email"], "jon@wall.org");
    assert_eq!(session["user"]["firstName"], "Jon");
    assert!(session["user"].get("passwordHash").is_none());
    assert!(session["user"].get("password_hash").is_none());
    assert_eq!(session["expiresIn"], 3_600_000);

    let token = session["token"].as_str().unwrap();
    let me: Value = server
        .client
        .get(server.url("/api/auth/me"))
        .bearer_auth(token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["id"], session["user"]["id"]);
    Ok(())
}

#[tokio::test]
async fn register_rejects_bad_input() -> Result<()> {
    // ---
    let server = TestServer::new().await;
    server.register("taken@example.com").await;

    let cases = [
        (
            json!({"email": "a@b.c", "password": "secret123", "firstName": "A"}),
            400,
            "All fields are required",
        ),
        (
            json!({"email": "a@b.c", "password": "12345", "firstName": "A", "lastName": "B"}),
            400,
            "Password must be at least 6 characters",
        ),
        (
            json!({"email": "taken@example.com", "password": "secret123", "firstName": "A", "lastName": "B"}),
            409,
            "User already exists with this email",
        ),
    ];

    for (body, status, message) in cases {
        let response = server
            .client
            .post(server.url("/api/auth/register"))
            .json(&body)
            .send()
            .await?;
        assert_eq!(response.status(), status, "for {body}");

        let error: Value = response.json().await?;
        assert_eq!(error["message"], message);
    }
    Ok(())
}

#[tokio::test]
async fn login_does_not_reveal_which_part_was_wrong() -> Result<()> {
    // ---
    let server = TestServer::new().await;
    server.register("arya@braavos.org").await;

    let mut messages = Vec::new();
    for (email, password) in [
        ("arya@braavos.org", "wrong-password"),
        ("nobody@braavos.org", "secret123"),
    ] {
        let response = server
            .client
            .post(server.url("/api/auth/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await?;
        assert_eq!(response.status(), 401);
        let body: Value = response.json().await?;
        messages.push(body["message"].clone());
    }

    assert_eq!(messages[0], "Invalid email or password");
    assert_eq!(messages[0], messages[1]);

    let response = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({"email": "arya@braavos.org", "password": "secret123"}))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let response = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({"email": "arya@braavos.org"}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    Ok(())
}

#[tokio::test]
async fn token_problems_map_to_401_and_403() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    let missing = server.client.get(server.url("/api/auth/me")).send().await?;
    assert_eq!(missing.status(), 401);
    let body: Value = missing.json().await?;
    assert_eq!(body["message"], "Access token required");

    let forged = server
        .client
        .get(server.url("/api/favorites"))
        .bearer_auth("not.a.token")
        .send()
        .await?;
    assert_eq!(forged.status(), 403);
    let body: Value = forged.json().await?;
    assert_eq!(body["message"], "Invalid or expired token");

    let foreign_keys = SessionKeys::new("some-other-secret", Duration::from_secs(60));
    let foreign = create_session(&foreign_keys, Uuid::new_v4())?;
    let response = server
        .client
        .get(server.url("/api/favorites"))
        .bearer_auth(foreign)
        .send()
        .await?;
    assert_eq!(response.status(), 403);
    Ok(())
}

#[tokio::test]
async fn me_for_unknown_user_is_404() -> Result<()> {
    // ---
    let server = TestServer::new().await;
    let keys = SessionKeys::new("integration-test-secret", Duration::from_secs(60));
    let token = create_session(&keys, Uuid::new_v4())?;

    let response = server
        .client
        .get(server.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "User not found");

    // Favorites trust the signature alone.
    let response = server
        .client
        .get(server.url("/api/favorites"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    Ok(())
}

#[tokio::test]
async fn unreadable_auth_bodies_are_400_with_message() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    let requests = [
        // Wrong field type
        server
            .client
            .post(server.url("/api/auth/register"))
            .json(&json!({
                "email": "typed@example.com",
                "password": 123456,
                "firstName": "A",
                "lastName": "B"
            })),
        // No content type
        server
            .client
            .post(server.url("/api/auth/register"))
            .body(r#"{"email":"plain@example.com","password":"secret123"}"#),
        // Not JSON at all
        server
            .client
            .post(server.url("/api/auth/login"))
            .header("content-type", "application/json")
            .body("{ invalid json }"),
    ];

    for request in requests {
        let response = request.send().await?;
        assert_eq!(response.status(), 400);

        let body: Value = response.json().await?;
        assert_eq!(body["message"], "Invalid request body");
    }
    Ok(())
}
