use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    routing::{delete, get},
};
use serde_json::{Value, json};

pub const TOKEN: &str = "secret-token";

pub async fn spawn_server(router: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://{addr}"))
}

/// Address nothing listens on.
pub async fn closed_address() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    Ok(format!("http://{addr}"))
}

pub fn calendar_api() -> Router {
    Router::new()
        .route("/api/calendar/recipes", get(get_recipes))
        .route("/api/calendar/recipes/{id}", delete(delete_recipe))
        .route("/broken/calendar/recipes", get(|| async { "not json" }))
        .route(
            "/plain/calendar/recipes",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "code": "UNAUTHORIZED", "message": "login required" })),
    )
}

async fn get_recipes(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let start = params.get("startDate").map(String::as_str);
    let end = params.get("endDate").map(String::as_str);

    if start != Some("2025-01-01") || end != Some("2025-01-31") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": 400, "message": "unexpected range" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "code": 200,
            "message": "ok",
            "data": {
                "personalCalendars": [
                    { "id": 1, "scheduledDate": "2025-01-05", "sortOrder": 0, "recipeId": 10, "recipeTitle": "Bibimbap" },
                    { "id": 2, "scheduledDate": "2025-01-05", "sortOrder": 1, "recipeId": 11, "recipeTitle": "Japchae" }
                ],
                "groupCalendars": [
                    {
                        "groupId": 7,
                        "groupName": "Family",
                        "calendars": [
                            { "id": 3, "scheduledDate": "2025-01-06", "sortOrder": 0, "recipeId": 12, "groupId": 7 }
                        ]
                    }
                ]
            }
        })),
    )
}

async fn delete_recipe(headers: HeaderMap, Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    if id == 1 {
        return (StatusCode::OK, Json(json!({ "code": 200, "message": "deleted" })));
    }

    (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": "MEAL_NOT_FOUND", "message": format!("meal {id} not found") })),
    )
}
