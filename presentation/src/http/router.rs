//! HTTP router setup

use super::error::ApiError;
use super::handlers::{self, AppState};
use axum::Router;
use axum::extract::OriginalUri;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

/// Every planning poker operation under `/api`, plus `/health`.
pub fn poker_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/deck", get(handlers::deck))
        .route(
            "/api/sessions",
            post(handlers::create_session).get(handlers::list_sessions),
        )
        .route("/api/sessions/:code", get(handlers::session_view))
        .route(
            "/api/sessions/:code/participants",
            post(handlers::join_session),
        )
        .route(
            "/api/sessions/:code/participants/:name",
            delete(handlers::leave_session),
        )
        .route("/api/sessions/:code/votes", post(handlers::submit_vote))
        .route("/api/sessions/:code/close", post(handlers::request_close))
        .route("/api/sessions/:code/reset", post(handlers::reset_votes))
        .route(
            "/api/sessions/:code/finalize",
            post(handlers::request_finalize),
        )
        .route("/api/sessions/:code/results", get(handlers::results))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: OriginalUri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.0.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use poker_application::{PlanningPokerService, RegistryConfig, SessionRegistry};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let service = PlanningPokerService::new(
            Arc::new(SessionRegistry::new()),
            RegistryConfig::default(),
        );
        poker_router(Arc::new(service))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(app: &Router, mode: &str) -> String {
        let (status, body) = call(
            app,
            "POST",
            "/api/sessions",
            Some(json!({
                "title": "Sprint 12",
                "stories": [{"title": "Login"}, "Logout"],
                "mode": mode,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_and_deck() {
        let app = app();

        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = call(&app, "GET", "/api/deck", None).await;
        assert_eq!(status, StatusCode::OK);
        let faces: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(faces.first(), Some(&"0"));
        assert_eq!(faces.last(), Some(&"?"));
        assert!(faces.contains(&"coffee"));
    }

    #[tokio::test]
    async fn test_full_session_over_http() {
        let app = app();
        let code = create(&app, "average").await;
        let base = format!("/api/sessions/{}", code);

        for name in ["ann", "bob"] {
            let (status, body) = call(
                &app,
                "POST",
                &format!("{}/participants", base),
                Some(json!({ "name": name })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!("joined"));
        }

        let (status, receipt) = call(
            &app,
            "POST",
            &format!("{}/votes", base),
            Some(json!({ "participant": "ann", "card": "5" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(receipt["revealed"], false);

        // Naming a viewer does not expose a hidden card
        let (_, view) = call(&app, "GET", &format!("{}?viewer=ann", base), None).await;
        assert_eq!(view["current"]["your_vote"], Value::Null);
        assert_eq!(view["participants"][0]["has_voted"], true);
        assert_eq!(view["participants"][0]["vote"], Value::Null);

        let (_, receipt) = call(
            &app,
            "POST",
            &format!("{}/votes", base),
            Some(json!({ "participant": "bob", "card": 8 })),
        )
        .await;
        assert_eq!(receipt["revealed"], true);

        let (_, view) = call(&app, "GET", &format!("{}?viewer=ann", base), None).await;
        assert_eq!(view["current"]["your_vote"], "5");
        assert_eq!(view["participants"][1]["vote"], "8");

        let cursor = json!({ "cursor": { "story_index": 0, "round": 0 } });
        let (status, close) = call(&app, "POST", &format!("{}/close", base), Some(cursor.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(close["applied"], true);
        assert_eq!(close["outcome"]["status"], "agreed");
        assert_eq!(close["outcome"]["detail"], 8.0);

        // A second client closing the same cursor gets the replay
        let (status, replay) = call(&app, "POST", &format!("{}/close", base), Some(cursor)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replay["applied"], false);
        assert_eq!(replay["outcome"], close["outcome"]);

        let (status, results) = call(&app, "GET", &format!("{}/results", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["complete"], false);
        assert_eq!(results["stories"][0]["final_value"], 8.0);

        // Story 1 is still open
        let (status, body) = call(&app, "POST", &format!("{}/finalize", base), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "illegal_transition");

        for name in ["ann", "bob"] {
            call(
                &app,
                "POST",
                &format!("{}/votes", base),
                Some(json!({ "participant": name, "card": "3" })),
            )
            .await;
        }
        let cursor = json!({ "cursor": { "story_index": 1, "round": 0 } });
        let (_, close) = call(&app, "POST", &format!("{}/close", base), Some(cursor)).await;
        assert_eq!(close["session_closed"], true);

        let (status, finalization) = call(&app, "POST", &format!("{}/finalize", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(finalization["finalization"], "applied");

        let (_, again) = call(&app, "POST", &format!("{}/finalize", base), None).await;
        assert_eq!(again["finalization"], "already_finalized");
        assert_eq!(again["results"], finalization["results"]);

        // Finalized sessions reject changes
        let (status, body) = call(
            &app,
            "POST",
            &format!("{}/participants", base),
            Some(json!({ "name": "cat" })),
        )
        .await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["error"]["code"], "session_already_closed");
    }

    #[tokio::test]
    async fn test_list_sessions() {
        let app = app();
        let code = create(&app, "unanimity").await;

        let (status, body) = call(&app, "GET", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["code"], code.as_str());
        assert_eq!(body[0]["story_count"], 2);
        assert_eq!(body[0]["status"], "open");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = app();

        let (status, body) = call(&app, "GET", "/api/sessions/123456", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "session_not_found");

        let (status, _) = call(&app, "GET", "/api/sessions/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            "POST",
            "/api/sessions",
            Some(json!({ "title": "Empty", "stories": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_input");

        let code = create(&app, "unanimity").await;
        let base = format!("/api/sessions/{}", code);
        call(&app, "POST", &format!("{}/participants", base), Some(json!({ "name": "ann" }))).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("{}/votes", base),
            Some(json!({ "participant": "ann", "card": "7" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_card");

        let (status, body) = call(
            &app,
            "POST",
            &format!("{}/votes", base),
            Some(json!({ "participant": "zed", "card": "3" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "participant_not_found");

        // Nothing is revealed yet
        let (status, body) = call(&app, "POST", &format!("{}/close", base), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "illegal_transition");

        let (status, _) = call(&app, "POST", &format!("{}/votes", base), Some(json!({ "card": "3" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_leave_reveals_and_close_without_cursor() {
        let app = app();
        let code = create(&app, "unanimity").await;
        let base = format!("/api/sessions/{}", code);
        for name in ["ann", "bob"] {
            call(&app, "POST", &format!("{}/participants", base), Some(json!({ "name": name }))).await;
        }
        call(
            &app,
            "POST",
            &format!("{}/votes", base),
            Some(json!({ "participant": "ann", "card": "3" })),
        )
        .await;

        let (status, body) = call(&app, "DELETE", &format!("{}/participants/bob", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["revealed"], true);

        let (status, close) = call(&app, "POST", &format!("{}/close", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(close["applied"], true);
        assert_eq!(close["next"], json!({ "story_index": 1, "round": 0 }));
    }

    #[tokio::test]
    async fn test_reset_before_start_conflicts() {
        let app = app();
        let code = create(&app, "median").await;

        let (status, _) = call(&app, "POST", &format!("/api/sessions/{}/reset", code), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app();
        let (status, body) = call(&app, "GET", "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }
}
