//! CAV form record operations

use super::AppState;
use uuid::Uuid;

use crate::forms::models::{CavForm, CreateCavFormRequest, UpdateCavFormRequest};

const FORM_COLUMNS: &str = "id, full_legal_name, date_issued, school_name, school_address, \
     school_year_completed, school_year_graduated, date_of_application, date_of_transmission, \
     control_no, prepared_by, submitted_by, is_archived, created_by, created_at, updated_at";

impl AppState {
    /// List form records, newest first.
    pub async fn list_forms(&self, archived: bool) -> Result<Vec<CavForm>, sqlx::Error> {
        let sql = format!(
            "SELECT {FORM_COLUMNS} FROM cav_forms WHERE is_archived = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, CavForm>(&sql)
            .bind(archived)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_form(&self, id: Uuid) -> Result<Option<CavForm>, sqlx::Error> {
        let sql = format!("SELECT {FORM_COLUMNS} FROM cav_forms WHERE id = $1");
        sqlx::query_as::<_, CavForm>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn insert_form(
        &self,
        request: &CreateCavFormRequest,
        created_by: Option<Uuid>,
    ) -> Result<CavForm, sqlx::Error> {
        let sql = format!(
            "INSERT INTO cav_forms \
             (full_legal_name, date_issued, school_name, school_address, school_year_completed, \
              school_year_graduated, date_of_application, date_of_transmission, control_no, \
              prepared_by, submitted_by, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {FORM_COLUMNS}"
        );
        sqlx::query_as::<_, CavForm>(&sql)
            .bind(&request.full_legal_name)
            .bind(&request.date_issued)
            .bind(&request.school_name)
            .bind(&request.school_address)
            .bind(&request.school_year_completed)
            .bind(&request.school_year_graduated)
            .bind(&request.date_of_application)
            .bind(&request.date_of_transmission)
            .bind(&request.control_no)
            .bind(request.prepared_by)
            .bind(request.submitted_by)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
    }

    /// Full-record update; the edit form resubmits every field.
    pub async fn update_form(
        &self,
        id: Uuid,
        request: &UpdateCavFormRequest,
    ) -> Result<Option<CavForm>, sqlx::Error> {
        let sql = format!(
            "UPDATE cav_forms SET \
             full_legal_name = $1, date_issued = $2, school_name = $3, school_address = $4, \
             school_year_completed = $5, school_year_graduated = $6, date_of_application = $7, \
             date_of_transmission = $8, control_no = $9, prepared_by = $10, submitted_by = $11, \
             updated_at = NOW() \
             WHERE id = $12 \
             RETURNING {FORM_COLUMNS}"
        );
        sqlx::query_as::<_, CavForm>(&sql)
            .bind(&request.full_legal_name)
            .bind(&request.date_issued)
            .bind(&request.school_name)
            .bind(&request.school_address)
            .bind(&request.school_year_completed)
            .bind(&request.school_year_graduated)
            .bind(&request.date_of_application)
            .bind(&request.date_of_transmission)
            .bind(&request.control_no)
            .bind(request.prepared_by)
            .bind(request.submitted_by)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Flip the archive flag. Leaves `updated_at` alone; archival is a
    /// shelving action, not an edit.
    pub async fn set_form_archived(
        &self,
        id: Uuid,
        archived: bool,
    ) -> Result<Option<CavForm>, sqlx::Error> {
        let sql = format!(
            "UPDATE cav_forms SET is_archived = $1 WHERE id = $2 RETURNING {FORM_COLUMNS}"
        );
        sqlx::query_as::<_, CavForm>(&sql)
            .bind(archived)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Hard delete. Returns false if the id did not exist.
    pub async fn delete_form(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cav_forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
