//! Request handlers for the API endpoints.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ApiError, RenewableQuery, StartResponse};
use crate::sim::GridSnapshot;

/// Starts the simulation; a second call while running is a no-op.
///
/// `POST /energia/simular` → 202 + `StartResponse` JSON
pub async fn start_simulation(State(state): State<AppState>) -> (StatusCode, Json<StartResponse>) {
    let started = state.start();
    (StatusCode::ACCEPTED, Json(StartResponse { started }))
}

/// Returns the current grid snapshot.
///
/// `GET /energia/estado` → 200 + `GridSnapshot` JSON
pub async fn get_state(State(state): State<AppState>) -> Json<GridSnapshot> {
    Json(state.snapshot())
}

/// Registers a renewable source.
///
/// `POST /energia/renovable?tipo=solar&capacidad=20` → 204
/// `POST /energia/renovable?tipo=solar&capacidad=0` → 400 + `ErrorResponse`
pub async fn add_renewable(
    State(state): State<AppState>,
    query: Result<Query<RenewableQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.add_renewable(&query.kind, query.capacity)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use tokio::runtime::Handle;
    use tower::util::ServiceExt;

    use crate::api::router;
    use crate::config::GridConfig;
    use crate::sim::SimulationManager;

    use super::*;

    fn make_test_state() -> AppState {
        let mut cfg = GridConfig::baseline();
        cfg.simulation.seed = Some(42);
        Arc::new(SimulationManager::new(cfg, Handle::current()).unwrap())
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn state_returns_contract_fields() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/energia/estado")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(json["energia_total"], 50);
        assert_eq!(json["energia_disponible"], 50);
        assert!(json["hogares"].as_array().is_some());
        assert!(json["renovables"].as_array().is_some());
    }

    #[tokio::test]
    async fn start_is_accepted_once() {
        let state = make_test_state();

        let resp = router(Arc::clone(&state))
            .oneshot(post("/energia/simular"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(resp).await["started"], true);

        let resp = router(Arc::clone(&state))
            .oneshot(post("/energia/simular"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(resp).await["started"], false);

        assert_eq!(state.household_count(), 5);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn renewable_grows_pool() {
        let state = make_test_state();
        let resp = router(Arc::clone(&state))
            .oneshot(post("/energia/renovable?tipo=solar&capacidad=20"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let snap = state.snapshot();
        assert_eq!((snap.total, snap.available), (70, 70));
        assert_eq!(snap.renewables[0].kind, "solar");
    }

    #[tokio::test]
    async fn non_positive_capacity_returns_400() {
        let state = make_test_state();
        for uri in [
            "/energia/renovable?tipo=solar&capacidad=0",
            "/energia/renovable?tipo=solar&capacidad=-4",
        ] {
            let resp = router(Arc::clone(&state)).oneshot(post(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert!(json_body(resp).await.get("error").is_some());
        }
        assert_eq!(state.snapshot().total, 50);
    }

    #[tokio::test]
    async fn malformed_query_returns_400() {
        let state = make_test_state();
        let resp = router(state)
            .oneshot(post("/energia/renovable?tipo=solar&capacidad=lots"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await.get("error").is_some());
    }
}
