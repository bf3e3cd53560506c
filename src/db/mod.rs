//! Database module - AppState and database operations
//!
//! This module is split into submodules for better separation of concerns:
//! - `forms` - CAV form record operations
//! - `signatories` - Signatory registry operations
//! - `audit` - Audit trail reads
//! - `staff` - Staff account operations for authentication

mod audit;
mod forms;
mod signatories;
mod staff;

use dotenvy::dotenv;
use moka::future::Cache;
use sqlx::PgPool;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::audit::{AuditSink, PgAuditSink};
use crate::overlay::CavOverlayGenerator;
use crate::signatories::model::Signatory;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub signatory_cache: Cache<Uuid, Signatory>,
    pub audit_sink: Arc<dyn AuditSink>,
    pub overlay: Arc<CavOverlayGenerator>,
}

impl AppState {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv().ok();
        let database_url =
            env::var("SUPABASE_DATABASE_URL").expect("SUPABASE_DATABASE_URL must be set");

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(100)
            .min_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&database_url)
            .await?;

        // Loading the template here validates it against the placement
        // table before the server accepts any request.
        let overlay = CavOverlayGenerator::from_static_dir()?;

        let audit_sink: Arc<dyn AuditSink> = Arc::new(PgAuditSink::new(pool.clone()));

        Ok(Self::with_parts(pool, audit_sink, Arc::new(overlay)))
    }

    /// Assemble state from pre-built parts. Tests swap in a mock audit
    /// sink and a synthetic template here.
    pub fn with_parts(
        pool: PgPool,
        audit_sink: Arc<dyn AuditSink>,
        overlay: Arc<CavOverlayGenerator>,
    ) -> Self {
        let signatory_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(100)
            .build();

        AppState {
            pool,
            signatory_cache,
            audit_sink,
            overlay,
        }
    }
}
