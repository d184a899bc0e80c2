use crate::error::ApiError;
use crate::AppState;
use api_shared::{HealthRes, HealthService, Surgery, SurgeryMessageRes, SurgeryReq};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use surgery_core::{NewSurgery, SurgeryChanges, SurgeryQuery};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by monitoring and load balancers; does not touch the store.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/surgeries",
    responses(
        (status = 200, description = "Upcoming scheduled surgeries, soonest first", body = [Surgery]),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// List upcoming surgeries
///
/// Returns surgeries whose `dateTime` is now or later and whose status is `scheduled`, in
/// ascending `dateTime` order.
///
/// # Errors
/// Returns `500 Internal Server Error` if the store cannot be read.
#[axum::debug_handler]
pub async fn list_surgeries(
    State(state): State<AppState>,
) -> Result<Json<Vec<Surgery>>, ApiError> {
    let surgeries = state.store.find(&SurgeryQuery::upcoming(Utc::now()))?;
    Ok(Json(surgeries.into_iter().map(Surgery::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/surgeries/{id}",
    params(("id" = String, Path, description = "Surgery id")),
    responses(
        (status = 200, description = "Surgery found", body = Surgery),
        (status = 404, description = "Surgery not found", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// Fetch one surgery by id
#[axum::debug_handler]
pub async fn get_surgery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Surgery>, ApiError> {
    let surgery = state.store.find_by_id(&id)?;
    Ok(Json(surgery.into()))
}

#[utoipa::path(
    post,
    path = "/api/surgeries",
    request_body = SurgeryReq,
    responses(
        (status = 201, description = "Surgery created", body = SurgeryMessageRes),
        (status = 400, description = "Validation failed", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// Create a new surgery
///
/// `dateTime`, `surgeryType`, `surgeon` and `patient.name` are required; `status` defaults to
/// `scheduled`.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not valid JSON or a required field is missing.
#[axum::debug_handler]
pub async fn create_surgery(
    State(state): State<AppState>,
    payload: Result<Json<SurgeryReq>, JsonRejection>,
) -> Result<(StatusCode, Json<SurgeryMessageRes>), ApiError> {
    let Json(req) = payload?;
    let new = NewSurgery::from_request(req)?;
    let surgery = state.store.insert(new)?;

    tracing::info!(id = %surgery.id, "surgery created");
    Ok((
        StatusCode::CREATED,
        Json(SurgeryMessageRes {
            message: "Surgery created!".into(),
            surgery: surgery.into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/surgeries/{id}",
    params(("id" = String, Path, description = "Surgery id")),
    request_body = SurgeryReq,
    responses(
        (status = 200, description = "Surgery updated", body = SurgeryMessageRes),
        (status = 400, description = "Validation failed", body = api_shared::ErrorRes),
        (status = 404, description = "Surgery not found", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// Update a surgery with a full or partial document
///
/// Fields absent from the body are left unchanged. A supplied `patient` replaces the stored one.
///
/// # Errors
/// Returns `400 Bad Request` if a supplied field is null, blank or of the wrong type, and
/// `404 Not Found` if the id is unknown.
#[axum::debug_handler]
pub async fn update_surgery(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SurgeryReq>, JsonRejection>,
) -> Result<Json<SurgeryMessageRes>, ApiError> {
    let Json(req) = payload?;
    let changes = SurgeryChanges::from_request(req)?;
    if changes.is_empty() {
        tracing::debug!(%id, "update carries no field changes");
    }
    let surgery = state.store.update(&id, changes)?;

    tracing::info!(id = %surgery.id, "surgery updated");
    Ok(Json(SurgeryMessageRes {
        message: "Surgery updated".into(),
        surgery: surgery.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/surgeries/{id}/cancel",
    params(("id" = String, Path, description = "Surgery id")),
    responses(
        (status = 200, description = "Surgery cancelled", body = SurgeryMessageRes),
        (status = 404, description = "Surgery not found", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// Cancel a surgery
///
/// Sets the status to `cancelled` whatever it was before. Repeating the call is harmless.
#[axum::debug_handler]
pub async fn cancel_surgery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SurgeryMessageRes>, ApiError> {
    let surgery = state.store.cancel(&id)?;

    tracing::info!(id = %surgery.id, "surgery cancelled");
    Ok(Json(SurgeryMessageRes {
        message: "Surgery cancelled".into(),
        surgery: surgery.into(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::{router, AppState};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use chrono::{DateTime, Duration, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use surgery_core::{CoreConfig, SurgeryStore};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = Arc::new(CoreConfig::new(temp_dir.path().to_path_buf()).unwrap());
        let store = SurgeryStore::open(cfg).unwrap();
        (router(AppState { store }), temp_dir)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn example_body() -> Value {
        json!({
            "dateTime": "2099-01-01T10:00:00Z",
            "surgeryType": "Appendectomy",
            "surgeon": "Dr. X",
            "patient": {"name": "A. Patient"}
        })
    }

    fn body_at(date_time: DateTime<Utc>) -> Value {
        let mut body = example_body();
        body["dateTime"] = json!(date_time);
        body
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, json) = send(app, Method::POST, "/api/surgeries", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
        json["surgery"].clone()
    }

    #[tokio::test]
    async fn health_returns_ok_with_timestamp() {
        let (app, _dir) = test_app();

        let (status, json) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn create_returns_201_and_defaults_status_to_scheduled() {
        let (app, _dir) = test_app();

        let (status, json) =
            send(&app, Method::POST, "/api/surgeries", Some(example_body())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "Surgery created!");
        assert_eq!(json["surgery"]["status"], "scheduled");
        assert_eq!(json["surgery"]["surgeryType"], "Appendectomy");
        assert!(json["surgery"]["id"].is_string());
        assert_eq!(json["surgery"]["createdAt"], json["surgery"]["updatedAt"]);
    }

    #[tokio::test]
    async fn create_without_surgery_type_returns_400() {
        let (app, _dir) = test_app();
        let mut body = example_body();
        body.as_object_mut().unwrap().remove("surgeryType");

        let (status, json) = send(&app, Method::POST, "/api/surgeries", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("surgeryType is required"));
    }

    #[tokio::test]
    async fn create_with_bad_status_or_bad_json_returns_400() {
        let (app, _dir) = test_app();
        let mut body = example_body();
        body["status"] = json!("postponed");

        let (status, json) = send(&app, Method::POST, "/api/surgeries", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/surgeries")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_id_returns_404_for_get_put_and_cancel() {
        let (app, _dir) = test_app();
        let uri = "/api/surgeries/550e8400e29b41d4a716446655440000";

        let (status, json) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Surgery not found");

        let (status, _) = send(&app, Method::PUT, uri, Some(json!({"surgeon": "Dr. Y"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::PUT, &format!("{uri}/cancel"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/surgeries/not-an-id", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_then_get_round_trips_input() {
        let (app, _dir) = test_app();
        let body = json!({
            "dateTime": "2099-01-01T10:00:00Z",
            "surgeryType": "Knee Replacement",
            "surgeon": "Dr. Emily Rodriguez",
            "patient": {"name": "A. Patient", "birthdate": "1970-06-15T00:00:00Z", "age": 54},
            "status": "scheduled"
        });

        let created = create(&app, body.clone()).await;
        let id = created["id"].as_str().unwrap();
        let (status, fetched) = send(&app, Method::GET, &format!("/api/surgeries/{id}"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        for field in ["dateTime", "surgeryType", "surgeon", "patient", "status"] {
            assert_eq!(fetched[field], body[field], "{field} should round trip");
        }
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let (app, _dir) = test_app();
        let created = create(&app, example_body()).await;
        let uri = format!("/api/surgeries/{}/cancel", created["id"].as_str().unwrap());

        for _ in 0..2 {
            let (status, json) = send(&app, Method::PUT, &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["message"], "Surgery cancelled");
            assert_eq!(json["surgery"]["status"], "cancelled");
        }
    }

    #[tokio::test]
    async fn update_applies_partial_document() {
        let (app, _dir) = test_app();
        let created = create(&app, example_body()).await;
        let uri = format!("/api/surgeries/{}", created["id"].as_str().unwrap());

        let (status, json) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({"surgeon": "Dr. Y", "status": "completed"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Surgery updated");
        assert_eq!(json["surgery"]["surgeon"], "Dr. Y");
        assert_eq!(json["surgery"]["status"], "completed");
        assert_eq!(json["surgery"]["surgeryType"], "Appendectomy");
        assert_eq!(json["surgery"]["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn update_rejects_nulled_required_field() {
        let (app, _dir) = test_app();
        let created = create(&app, example_body()).await;
        let uri = format!("/api/surgeries/{}", created["id"].as_str().unwrap());

        let (status, json) = send(&app, Method::PUT, &uri, Some(json!({"surgeon": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("surgeon is required"));

        let (_, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(fetched["surgeon"], "Dr. X");
    }

    #[tokio::test]
    async fn list_returns_only_upcoming_scheduled_in_order() {
        let (app, _dir) = test_app();
        let now = Utc::now();

        create(&app, body_at(now + Duration::days(10))).await;
        create(&app, body_at(now + Duration::days(1))).await;
        create(&app, body_at(now - Duration::days(1))).await;
        let to_cancel = create(&app, body_at(now + Duration::days(5))).await;
        let mut completed = body_at(now + Duration::days(3));
        completed["status"] = json!("completed");
        create(&app, completed).await;

        let cancel_uri = format!("/api/surgeries/{}/cancel", to_cancel["id"].as_str().unwrap());
        send(&app, Method::PUT, &cancel_uri, None).await;

        let (status, json) = send(&app, Method::GET, "/api/surgeries", None).await;
        assert_eq!(status, StatusCode::OK);

        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);

        let times: Vec<DateTime<Utc>> = list
            .iter()
            .map(|s| serde_json::from_value(s["dateTime"].clone()).unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        for surgery in list {
            assert_eq!(surgery["status"], "scheduled");
        }
        assert!(times.iter().all(|t| *t >= now));
    }

    #[tokio::test]
    async fn store_failure_returns_500_with_generic_message() {
        let (app, dir) = test_app();
        let surgeries = dir.path().join("surgeries");
        std::fs::remove_dir_all(&surgeries).unwrap();
        std::fs::write(&surgeries, b"not a directory").unwrap();

        let (status, json) = send(&app, Method::GET, "/api/surgeries", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"error": "Internal error"}));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (app, _dir) = test_app();

        let (status, json) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["paths"]["/api/surgeries"].is_object());
        assert!(json["paths"]["/api/surgeries/{id}/cancel"].is_object());
    }
}
