use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use crate::errors::{AppError, Result};
use crate::modules::auth::interface::AccountRepository;
use crate::modules::auth::model::{Account, AccountId, NewAccount};
use crate::modules::profile::interface::BiodataRepository;
use crate::modules::profile::model::{Biodata, BiodataFields, BiodataRow};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, biodata_completed, reset_token, \
                               reset_token_expiry, created_at, updated_at";

const BIODATA_COLUMNS: &str = "id, account_id, surname, middle_name, second_name, age, \
                               CAST(marital_status AS CHAR) AS marital_status, \
                               CAST(gender AS CHAR) AS gender, telephone, address, \
                               next_of_kin, email, profile_image, created_at, updated_at";

fn is_duplicate_key(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[derive(Clone)]
pub struct MySqlStore {
    pool: Pool<MySql>,
}

impl MySqlStore {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

// =============================================================================
// ACCOUNTS
// =============================================================================

#[async_trait]
impl AccountRepository for MySqlStore {
    async fn insert(&self, account: &NewAccount) -> Result<Account> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (email, password_hash, biodata_completed)
            VALUES (?, ?, FALSE)
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict
            } else {
                AppError::from(e)
            }
        })?;

        let id = result.last_insert_id() as AccountId;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("account {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS);
        Ok(sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        // utf8mb4_bin collation on the column keeps this match case-sensitive.
        let sql = format!("SELECT {} FROM accounts WHERE email = ?", ACCOUNT_COLUMNS);
        Ok(sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE reset_token = ?", ACCOUNT_COLUMNS);
        Ok(sqlx::query_as::<_, Account>(&sql)
            .bind(token_digest)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_reset_token(
        &self,
        id: AccountId,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE accounts SET reset_token = ?, reset_token_expiry = ? WHERE id = ?")
            .bind(token_digest)
            .bind(expires_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_reset_token(&self, id: AccountId, token_digest: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET reset_token = NULL, reset_token_expiry = NULL
            WHERE id = ? AND reset_token = ?
            "#,
        )
        .bind(id)
        .bind(token_digest)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn commit_password_reset(
        &self,
        id: AccountId,
        token_digest: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = ?, reset_token = NULL, reset_token_expiry = NULL
            WHERE id = ? AND reset_token = ? AND reset_token_expiry >= ?
            "#,
        )
        .bind(password_hash)
        .bind(id)
        .bind(token_digest)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: AccountId) -> Result<bool> {
        // biodata goes with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// BIODATA
// =============================================================================

#[async_trait]
impl BiodataRepository for MySqlStore {
    async fn upsert(&self, account_id: AccountId, fields: &BiodataFields) -> Result<Biodata> {
        let mut tx = self.pool.begin().await?;

        // LAST_INSERT_ID(id) makes the update branch report the existing row id.
        let result = sqlx::query(
            r#"
            INSERT INTO biodata
                (account_id, surname, middle_name, second_name, age, marital_status, gender,
                 telephone, address, next_of_kin, email, profile_image)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                id = LAST_INSERT_ID(id),
                surname = VALUES(surname),
                middle_name = VALUES(middle_name),
                second_name = VALUES(second_name),
                age = VALUES(age),
                marital_status = VALUES(marital_status),
                gender = VALUES(gender),
                telephone = VALUES(telephone),
                address = VALUES(address),
                next_of_kin = VALUES(next_of_kin),
                email = VALUES(email),
                profile_image = VALUES(profile_image),
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(account_id)
        .bind(&fields.surname)
        .bind(&fields.middle_name)
        .bind(&fields.second_name)
        .bind(fields.age)
        .bind(fields.marital_status.as_str())
        .bind(fields.gender.as_str())
        .bind(&fields.telephone)
        .bind(&fields.address)
        .bind(&fields.next_of_kin)
        .bind(&fields.email)
        .bind(&fields.profile_image)
        .execute(&mut *tx)
        .await?;
        let biodata_id = result.last_insert_id() as i64;

        sqlx::query("UPDATE accounts SET biodata_completed = TRUE WHERE id = ?")
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        let sql = format!("SELECT {} FROM biodata WHERE id = ?", BIODATA_COLUMNS);
        let row = sqlx::query_as::<_, BiodataRow>(&sql)
            .bind(biodata_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Biodata::try_from(row).map_err(AppError::Internal)
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Option<Biodata>> {
        let sql = format!("SELECT {} FROM biodata WHERE account_id = ?", BIODATA_COLUMNS);
        let row = sqlx::query_as::<_, BiodataRow>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Biodata::try_from)
            .transpose()
            .map_err(AppError::Internal)
    }
}
