//! Postgres-backed `ObservationStore`/`ArtifactSink`.
//!
//! The loader query is `wf/analysis/classifier.py::_load_and_normalize`'s
//! `SELECT DISTINCT` verbatim; the writer's drop+recreate+bulk-insert
//! sequence is `wf/storage/dao.py::recreate_classification_tables` /
//! `add_static_ap_bulk` / `add_mobile_track_bulk`, run inside one
//! `sqlx::Transaction` so a failure leaves both derived tables untouched.

use sqlx::{PgPool, Row};
use wf_core::error::StoreError;
use wf_core::{ArtifactSink, ObservationStore};
use wf_types::{Mac, MobileTrackPoint, Observation, StaticAp};

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub struct SqlxStore {
    pool: PgPool,
}

impl SqlxStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ObservationStore for SqlxStore {
    async fn load_observations(&self) -> Result<Vec<Observation>, StoreError> {
        let rows = sqlx::query(
            "SELECT DISTINCT mac, ts, lat, lon, rssi FROM observations \
             WHERE lat IS NOT NULL AND lon IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut dropped = 0usize;
        let total = rows.len();
        let mut obs = Vec::with_capacity(total);
        for row in rows {
            let mac_str: String = row.try_get("mac")?;
            let ts: i64 = row.try_get("ts")?;
            let lat: f64 = row.try_get("lat")?;
            let lon: f64 = row.try_get("lon")?;
            let rssi: f64 = row.try_get("rssi")?;

            let mac: Mac = match mac_str.parse() {
                Ok(mac) => mac,
                Err(e) => {
                    tracing::warn!(mac = %mac_str, error = %e, "dropping observation with unparseable MAC");
                    dropped += 1;
                    continue;
                }
            };
            if lat.is_nan() || lon.is_nan() {
                tracing::warn!(%mac, "dropping observation with NaN coordinates");
                dropped += 1;
                continue;
            }
            obs.push(Observation { mac, ts, lat, lon, rssi });
        }

        if total > 0 && dropped * 10 > total {
            tracing::warn!(
                dropped,
                total,
                "more than 10% of loaded observations were dropped for input-integrity reasons"
            );
        }

        Ok(obs)
    }
}

#[async_trait::async_trait]
impl ArtifactSink for SqlxStore {
    /// Replaces both `static_ap` and `mobile_track` inside a single
    /// transaction, so a failure partway through leaves both tables exactly
    /// as they were at run start rather than one replaced and one stale.
    async fn replace_derived_tables(
        &self,
        static_aps: &[StaticAp],
        mobile_track: &[MobileTrackPoint],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS static_ap").execute(&mut *tx).await?;
        sqlx::query(
            "CREATE TABLE static_ap (
                mac         TEXT    PRIMARY KEY,
                lat_mean    DOUBLE PRECISION NOT NULL,
                lon_mean    DOUBLE PRECISION NOT NULL,
                loc_error_m DOUBLE PRECISION NOT NULL,
                first_seen  BIGINT  NOT NULL,
                last_seen   BIGINT  NOT NULL,
                n_obs       BIGINT  NOT NULL
            )",
        )
        .execute(&mut *tx)
        .await?;

        for row in static_aps {
            sqlx::query(
                "INSERT INTO static_ap
                   (mac, lat_mean, lon_mean, loc_error_m, first_seen, last_seen, n_obs)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (mac) DO UPDATE SET
                   lat_mean    = excluded.lat_mean,
                   lon_mean    = excluded.lon_mean,
                   loc_error_m = excluded.loc_error_m,
                   first_seen  = excluded.first_seen,
                   last_seen   = excluded.last_seen,
                   n_obs       = excluded.n_obs",
            )
            .bind(row.mac.to_string())
            .bind(row.lat_mean)
            .bind(row.lon_mean)
            .bind(row.loc_error_m)
            .bind(row.first_seen)
            .bind(row.last_seen)
            .bind(row.n_obs as i64)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DROP TABLE IF EXISTS mobile_track").execute(&mut *tx).await?;
        sqlx::query(
            "CREATE TABLE mobile_track (
                mac TEXT             NOT NULL,
                ts  BIGINT           NOT NULL,
                lat DOUBLE PRECISION NOT NULL,
                lon DOUBLE PRECISION NOT NULL,
                PRIMARY KEY (mac, ts)
            )",
        )
        .execute(&mut *tx)
        .await?;

        for p in mobile_track {
            sqlx::query("INSERT INTO mobile_track (mac, ts, lat, lon) VALUES ($1, $2, $3, $4)")
                .bind(p.mac.to_string())
                .bind(p.ts)
                .bind(p.lat)
                .bind(p.lon)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
