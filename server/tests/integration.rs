//! Integration Tests for Folio Server
//!
//! These tests drive the full router over HTTP requests, covering the
//! contact backend and the authentication API together.

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;

mod common;
use common::*;

// ============================================================================
// Contact Backend Tests
// ============================================================================

mod contact_routes {
    use super::*;

    #[tokio::test]
    async fn test_index_reports_running() {
        let app = create_test_app();

        let (status, json) = app.get("/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"success": true, "message": "Portfolio backend running successfully"})
        );
    }

    #[tokio::test]
    async fn test_contact_accepts_complete_json_form() {
        let app = create_test_app();

        let (status, json) = app
            .post_json(
                "/contact",
                json!({"name": "Ada", "email": "ada@x.com", "message": "Hello"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"success": true, "message": "Message sent successfully"})
        );
    }

    #[tokio::test]
    async fn test_contact_accepts_urlencoded_form() {
        let app = create_test_app();

        let (status, json) = app
            .post_raw(
                "/contact",
                "name=Ada&email=ada%40x.com&message=Hi+there",
                "application/x-www-form-urlencoded",
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn test_contact_rejects_missing_field() {
        let app = create_test_app();

        let (status, json) = app
            .post_json("/contact", json!({"name": "Ada", "message": "Hello"}))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            json!({"success": false, "error": "Please fill all fields"})
        );
    }

    #[tokio::test]
    async fn test_contact_rejects_empty_field() {
        let app = create_test_app();

        let (status, json) = app
            .post_json(
                "/contact",
                json!({"name": "", "email": "ada@x.com", "message": "Hello"}),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Please fill all fields");
    }

    #[tokio::test]
    async fn test_contact_accepts_whitespace_and_non_string_fields() {
        let app = create_test_app();

        for body in [
            json!({"name": 5, "email": "ada@x.com", "message": "Hello"}),
            json!({"name": " ", "email": "ada@x.com", "message": "Hello"}),
        ] {
            let (status, json) = app.post_json("/contact", body.clone()).await;
            assert_eq!(status, StatusCode::OK, "body {}", body);
            assert_eq!(json["success"], true);
        }
    }

    #[tokio::test]
    async fn test_contact_rejects_falsy_fields() {
        let app = create_test_app();

        for name in [json!(0), json!(false), json!(null)] {
            let (status, json) = app
                .post_json(
                    "/contact",
                    json!({"name": name, "email": "ada@x.com", "message": "Hello"}),
                )
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "name {}", name);
            assert_eq!(json["error"], "Please fill all fields");
        }
    }

    #[tokio::test]
    async fn test_contact_rejects_unparseable_body() {
        let app = create_test_app();

        let (status, json) = app
            .post_raw("/contact", "{not json", "application/json")
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let app = create_test_app();

        for uri in ["/nope", "/api/auth/unknown"] {
            let (status, json) = app.get(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "uri {}", uri);
            assert_eq!(json, json!({"success": false, "error": "Route not found"}));
        }
    }

    #[tokio::test]
    async fn test_wrong_method_on_contact_returns_json_404() {
        let app = create_test_app();

        let (status, json) = app.get("/contact").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Route not found");
    }

    #[tokio::test]
    async fn test_wrong_method_on_auth_returns_json_404() {
        let app = create_test_app();
        let not_found = json!({"success": false, "error": "Route not found"});

        for uri in ["/api/auth/login", "/api/auth/register", "/api/auth/logout"] {
            let (status, json) = app.get(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "GET {}", uri);
            assert_eq!(json, not_found);
        }

        let (status, json) = app.post_json("/api/auth/session", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, not_found);

        let (status, json) = app.delete("/api/auth/logout").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, not_found);
    }

    #[tokio::test]
    async fn test_health_endpoint_returns_ok() {
        let app = create_test_app();
        app.post_json(
            "/api/auth/register",
            json!({"email": "a@x.com", "password": "pass1", "confirm": "pass1"}),
        )
        .await;

        let (status, json) = app.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
        assert_eq!(json["registered_users"], 1);
    }
}

// ============================================================================
// Authentication API Tests
// ============================================================================

mod auth_api {
    use super::*;

    #[tokio::test]
    async fn test_register_logout_login_flow() {
        let app = create_test_app();

        let (status, json) = app
            .post_json(
                "/api/auth/register",
                json!({"email": "a@x.com", "password": "pass1", "confirm": "pass1"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": true, "user": "a@x.com"}));

        let (_, session) = app.get("/api/auth/session").await;
        assert_eq!(session["authenticated"], true);
        assert_eq!(session["expired"], false);
        assert_eq!(session["user"], "a@x.com");
        assert_eq!(session["login_time"], START_MILLIS);
        assert_eq!(session["expires_in_secs"], 24 * 60 * 60);

        let (status, json) = app.post_json("/api/auth/logout", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["was_authenticated"], true);

        let (status, json) = app
            .post_json(
                "/api/auth/login",
                json!({"email": "a@x.com", "password": "wrong"}),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "invalid_credentials");
        assert_eq!(json["error"], "Invalid email or password");

        let (_, session) = app.get("/api/auth/session").await;
        assert_eq!(session["authenticated"], false);

        let (status, json) = app
            .post_json(
                "/api/auth/login",
                json!({"email": "a@x.com", "password": "pass1"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"], "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_registration_returns_conflict() {
        let app = create_test_app();
        let body = json!({"email": "a@x.com", "password": "pass1", "confirm": "pass1"});

        app.post_json("/api/auth/register", body.clone()).await;
        let (status, json) = app.post_json("/api/auth/register", body).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "duplicate_email");
    }

    #[tokio::test]
    async fn test_validation_failure_carries_reason() {
        let app = create_test_app();

        let (status, json) = app
            .post_json(
                "/api/auth/register",
                json!({"email": "a@x.com", "password": "pass1", "confirm": "pass2"}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "validation_failed");
        assert_eq!(json["reason"]["reason"], "password_mismatch");

        let (status, json) = app
            .post_json("/api/auth/login", json!({"email": "a@x.com"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["reason"]["reason"], "empty_fields");

        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_logout_when_anonymous_is_ok() {
        let app = create_test_app();

        let (status, json) = app.post_json("/api/auth/logout", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["was_authenticated"], false);
    }

    #[tokio::test]
    async fn test_session_expires_through_api() {
        let app = create_test_app();
        app.post_json(
            "/api/auth/register",
            json!({"email": "a@x.com", "password": "pass1", "confirm": "pass1"}),
        )
        .await;

        app.clock.advance(Duration::from_secs(25 * 60 * 60));

        let (status, session) = app.get("/api/auth/session").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            session,
            json!({
                "authenticated": false,
                "expired": true,
                "user": "a@x.com",
                "login_time": null,
                "expires_in_secs": null
            })
        );
        assert_eq!(app.state.session_manager.current_user().await, None);

        // Reported once, then plain anonymous
        let (_, session) = app.get("/api/auth/session").await;
        assert_eq!(session["authenticated"], false);
        assert_eq!(session["expired"], false);
        assert!(session["user"].is_null());
    }

    #[tokio::test]
    async fn test_session_for_anonymous_is_not_expired() {
        let app = create_test_app();

        let (status, session) = app.get("/api/auth/session").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["authenticated"], false);
        assert_eq!(session["expired"], false);
    }

    #[tokio::test]
    async fn test_logout_after_expiry_reports_not_authenticated() {
        let app = create_test_app();
        app.post_json(
            "/api/auth/register",
            json!({"email": "a@x.com", "password": "pass1", "confirm": "pass1"}),
        )
        .await;

        app.clock.advance(Duration::from_secs(25 * 60 * 60));

        let (status, json) = app.post_json("/api/auth/logout", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": true, "was_authenticated": false}));
        // Only the users blob is left
        assert_eq!(app.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_malformed_body_returns_json_error() {
        let app = create_test_app();

        for uri in ["/api/auth/login", "/api/auth/register"] {
            let (status, json) = app.post_raw(uri, "{not json", "application/json").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
            assert_eq!(json["success"], false);
            assert_eq!(json["code"], "invalid_request");
            assert!(json["error"].is_string());
        }

        let (status, json) = app.post_json("/api/auth/login", json!([1, 2])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_auth_accepts_json_without_content_type() {
        let app = create_test_app();

        let (status, json) = app
            .post_untyped(
                "/api/auth/register",
                r#"{"email": "a@x.com", "password": "pass1", "confirm": "pass1"}"#,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": true, "user": "a@x.com"}));

        app.post_json("/api/auth/logout", json!({})).await;
        let (status, json) = app
            .post_untyped(
                "/api/auth/login",
                r#"{"email": "a@x.com", "password": "pass1"}"#,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"], "a@x.com");
    }
}
