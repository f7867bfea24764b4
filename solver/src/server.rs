//! Axum HTTP server: stateless optimizer endpoints.
//!
//! Every request carries its own stats and budget and is solved with a fresh
//! optimizer context, so the router holds no shared state.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/stats` | Substat names and per-roll values |
//! | POST | `/optimize` | Best allocation for one request |
//! | POST | `/sweep` | Best allocation for every budget up to `roll_budget` |

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::allocator::optimize;
use crate::config::OptimizeRequest;
use crate::constants::*;
use crate::error::OptimizeError;
use crate::sweep::sweep_budgets;
use crate::types::Stat;

type ApiResult = Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)>;

pub fn create_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/stats", get(handle_get_stats))
        .route("/optimize", post(handle_optimize))
        .route("/sweep", post(handle_sweep))
        .layer(cors)
}

fn error_response(status: StatusCode, msg: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": msg })))
}

fn map_error(err: OptimizeError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is_client_error() {
        error_response(StatusCode::BAD_REQUEST, &err.to_string())
    } else {
        warn!(error = %err, "optimizer invariant violated");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult {
    serde_json::to_value(value).map(Json).map_err(|e| {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
    })
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_get_stats() -> Json<serde_json::Value> {
    let per_roll = [
        ELEMENTAL_MASTERY_PER_ROLL,
        ATTACK_PERCENT_PER_ROLL,
        ENERGY_RECHARGE_PER_ROLL,
        CRIT_RATE_PER_ROLL,
        CRIT_DAMAGE_PER_ROLL,
    ];
    let stats: Vec<serde_json::Value> = Stat::ALL
        .iter()
        .zip(per_roll)
        .map(|(stat, value)| {
            serde_json::json!({
                "id": stat,
                "name": stat.name(),
                "per_roll": value,
            })
        })
        .collect();
    Json(serde_json::json!({
        "stats": stats,
        "default_roll_budget": DEFAULT_ROLL_BUDGET,
        "max_roll_budget": MAX_ROLL_BUDGET,
    }))
}

// ── POST handlers ───────────────────────────────────────────────────

async fn handle_optimize(Json(req): Json<OptimizeRequest>) -> ApiResult {
    let budget = req.budget().map_err(map_error)?;
    let model = req.model.build();
    let optimum = optimize(&req.stats, budget, &req.effective_caps(), model.as_ref())
        .map_err(map_error)?;

    let mut result = to_json(&optimum)?;
    result.0["model"] = serde_json::json!(model.name());
    result.0["roll_budget"] = serde_json::json!(budget.get());
    Ok(result)
}

async fn handle_sweep(Json(req): Json<OptimizeRequest>) -> ApiResult {
    let budget = req.budget().map_err(map_error)?;
    let model = req.model.build();
    let rows = sweep_budgets(&req.stats, &req.effective_caps(), model.as_ref(), budget)
        .map_err(map_error)?;
    let rows = to_json(&rows)?;
    Ok(Json(serde_json::json!({
        "model": model.name(),
        "rows": rows.0,
    })))
}
