//! Signatory registry operations
//!
//! Signatories change rarely and are read on every document render, so
//! id lookups go through the moka cache; mutations invalidate the entry.

use super::AppState;
use uuid::Uuid;

use crate::overlay::SignatoryBlock;
use crate::signatories::model::{CreateSignatoryRequest, Signatory, UpdateSignatoryRequest};

const SIGNATORY_COLUMNS: &str = "id, full_name, position, is_active, created_at";

impl AppState {
    pub async fn list_signatories(&self, active_only: bool) -> Result<Vec<Signatory>, sqlx::Error> {
        let sql = if active_only {
            format!(
                "SELECT {SIGNATORY_COLUMNS} FROM signatories WHERE is_active = TRUE ORDER BY full_name"
            )
        } else {
            format!("SELECT {SIGNATORY_COLUMNS} FROM signatories ORDER BY full_name")
        };
        sqlx::query_as::<_, Signatory>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_signatory(&self, id: Uuid) -> Result<Option<Signatory>, sqlx::Error> {
        if let Some(cached) = self.signatory_cache.get(&id).await {
            return Ok(Some(cached));
        }

        let sql = format!("SELECT {SIGNATORY_COLUMNS} FROM signatories WHERE id = $1");
        let signatory = sqlx::query_as::<_, Signatory>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(ref found) = signatory {
            self.signatory_cache.insert(id, found.clone()).await;
        }
        Ok(signatory)
    }

    pub async fn insert_signatory(
        &self,
        request: &CreateSignatoryRequest,
    ) -> Result<Signatory, sqlx::Error> {
        let sql = format!(
            "INSERT INTO signatories (full_name, position) VALUES ($1, $2) \
             RETURNING {SIGNATORY_COLUMNS}"
        );
        sqlx::query_as::<_, Signatory>(&sql)
            .bind(&request.full_name)
            .bind(&request.position)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update_signatory(
        &self,
        id: Uuid,
        request: &UpdateSignatoryRequest,
    ) -> Result<Option<Signatory>, sqlx::Error> {
        let sql = format!(
            "UPDATE signatories SET \
             full_name = COALESCE($1, full_name), position = COALESCE($2, position) \
             WHERE id = $3 RETURNING {SIGNATORY_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Signatory>(&sql)
            .bind(request.full_name.as_deref())
            .bind(request.position.as_deref())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.signatory_cache.invalidate(&id).await;
        Ok(updated)
    }

    pub async fn set_signatory_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Option<Signatory>, sqlx::Error> {
        let sql = format!(
            "UPDATE signatories SET is_active = $1 WHERE id = $2 RETURNING {SIGNATORY_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Signatory>(&sql)
            .bind(active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.signatory_cache.invalidate(&id).await;
        Ok(updated)
    }

    /// Resolve a form's signatory reference into the name/position block
    /// the overlay stamps. A missing or unreadable signatory resolves to
    /// `None`; the block is simply omitted from the document.
    pub async fn resolve_signatory_block(&self, id: Option<Uuid>) -> Option<SignatoryBlock> {
        let id = id?;
        match self.get_signatory(id).await {
            Ok(Some(signatory)) => Some(SignatoryBlock {
                name: signatory.full_name,
                position: signatory.position,
            }),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Signatory lookup failed for {}: {}", id, e);
                None
            }
        }
    }
}
