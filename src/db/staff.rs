//! Staff account database operations for authentication

use super::AppState;
use uuid::Uuid;

use crate::auth::model::StaffAccount;

const STAFF_COLUMNS: &str =
    "id, email, password_hash, display_name, refresh_token, created_at, updated_at";

impl AppState {
    /// Get count of staff accounts in database
    pub async fn get_staff_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM staff_accounts")
            .fetch_one(&self.pool)
            .await
    }

    /// Get staff account by email
    pub async fn get_staff_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StaffAccount>, sqlx::Error> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff_accounts WHERE email = $1");
        sqlx::query_as::<_, StaffAccount>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// Get staff account by refresh token
    pub async fn get_staff_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<StaffAccount>, sqlx::Error> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff_accounts WHERE refresh_token = $1");
        sqlx::query_as::<_, StaffAccount>(&sql)
            .bind(refresh_token)
            .fetch_optional(&self.pool)
            .await
    }

    /// Create new staff account
    pub async fn create_staff(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<StaffAccount, sqlx::Error> {
        let sql = format!(
            "INSERT INTO staff_accounts (email, password_hash, display_name) \
             VALUES ($1, $2, $3) RETURNING {STAFF_COLUMNS}"
        );
        sqlx::query_as::<_, StaffAccount>(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(display_name)
            .fetch_one(&self.pool)
            .await
    }

    /// Update staff refresh token (invalidates previous sessions)
    pub async fn update_staff_refresh_token(
        &self,
        account_id: &Uuid,
        refresh_token: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE staff_accounts SET refresh_token = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(refresh_token)
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get all staff accounts
    pub async fn get_all_staff(&self) -> Result<Vec<StaffAccount>, sqlx::Error> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff_accounts ORDER BY created_at");
        sqlx::query_as::<_, StaffAccount>(&sql)
            .fetch_all(&self.pool)
            .await
    }
}
