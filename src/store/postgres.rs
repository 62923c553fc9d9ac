//! Postgres adapter for [`Store`].
//!
//! Registration runs inside a single transaction so a failed credential insert
//! never leaves an orphan user behind. Dropping the future before commit rolls
//! the transaction back.

use super::{Credential, NewUser, Store, StoreError, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Postgres, Row, Transaction,
};
use std::time::Duration;
use tracing::{debug, instrument};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `dsn` and bring the schema up to date.
    ///
    /// # Errors
    /// Returns an error if the connection or the schema bootstrap fails.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        let store = Self::new(pool);
        store.migrate().await?;

        Ok(store)
    }

    /// Apply `sql/schema.sql`. Statements are idempotent.
    ///
    /// # Errors
    /// Returns an error if any statement fails.
    pub async fn migrate(&self) -> Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }

        debug!("Schema applied");

        Ok(())
    }
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let without_comments = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escape LIKE metacharacters so the prefix is matched literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        admin: row.try_get("admin")?,
    })
}

async fn insert_user(tx: &mut Transaction<'_, Postgres>, user: &NewUser) -> Result<User, StoreError> {
    let row = sqlx::query(
        "INSERT INTO users (username, admin) VALUES ($1, $2) RETURNING id, username, admin",
    )
    .bind(&user.username)
    .bind(user.admin)
    .fetch_one(&mut **tx)
    .await?;

    Ok(user_from_row(&row)?)
}

async fn insert_credential(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    hash: &str,
    salt: &str,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO credentials (user_id, hash, salt) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(hash)
        .bind(salt)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self, hash, salt))]
    async fn create_user_with_credential(
        &self,
        user: NewUser,
        hash: &str,
        salt: &str,
    ) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        let created = insert_user(&mut tx, &user).await?;
        insert_credential(&mut tx, created.id, hash, salt).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, admin FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn get_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT c.user_id, c.hash, c.salt
            FROM credentials c
            JOIN users u ON u.id = c.user_id
            WHERE u.username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Credential {
            user_id: row.try_get("user_id")?,
            hash: row.try_get("hash")?,
            salt: row.try_get("salt")?,
        }))
    }

    async fn update_credential(
        &self,
        user_id: i32,
        hash: &str,
        salt: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE credentials SET hash = $2, salt = $3 WHERE user_id = $1")
            .bind(user_id)
            .bind(hash)
            .bind(salt)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!(
                "no credential for user {user_id}"
            )));
        }

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query("SELECT id, username, admin FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn find_users_by_username_prefix(&self, prefix: &str) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            r"SELECT id, username, admin FROM users WHERE username LIKE $1 ESCAPE '\' ORDER BY id",
        )
        .bind(like_prefix(prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
