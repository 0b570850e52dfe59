//! HTTP handlers. Thin collaborators only — no classification logic lives
//! here; each handler either reports static status or queries the derived
//! tables the pipeline already wrote.
//!
//! `max_packets`/`max_points` re-express `wf/server.py`'s `/api/max-packets`
//! and `/api/max-points`, grounded on `wf/storage/dao.py::get_max_packets`/
//! `get_max_mobile_points`.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::STARTUP_MS;

pub struct AppState {
    pub pool: PgPool,
}

pub type SharedState = Arc<AppState>;

pub async fn health_check() -> Json<Value> {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let startup = STARTUP_MS.load(Ordering::Relaxed);
    let uptime_secs = if startup > 0 { (now_ms - startup) / 1000 } else { 0 };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": uptime_secs,
    }))
}

pub async fn status() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn max_packets(State(state): State<SharedState>) -> Json<Value> {
    let row = sqlx::query_scalar::<_, Option<i64>>(
        "WITH packet_counts AS (
            SELECT mac, count(1) AS count FROM observations GROUP BY mac
         )
         SELECT coalesce(max(count), 0) FROM packet_counts",
    )
    .fetch_one(&state.pool)
    .await;

    match row {
        Ok(max_packets) => Json(json!({ "max_packets": max_packets.unwrap_or(0) })),
        Err(e) => {
            tracing::warn!(error = %e, "failed to query max packet count");
            Json(json!({ "max_packets": 0 }))
        }
    }
}

pub async fn max_points(State(state): State<SharedState>) -> Json<Value> {
    let row = sqlx::query_scalar::<_, Option<i64>>(
        "WITH pt_counts AS (
            SELECT mac, COUNT(*) AS n_pts FROM mobile_track GROUP BY mac
         )
         SELECT COALESCE(MAX(n_pts), 0) FROM pt_counts",
    )
    .fetch_one(&state.pool)
    .await;

    match row {
        Ok(max_points) => Json(json!({ "max_points": max_points.unwrap_or(0) })),
        Err(e) => {
            tracing::warn!(error = %e, "failed to query max mobile track point count");
            Json(json!({ "max_points": 0 }))
        }
    }
}
