//! Postgres-backed directory.
//!
//! ## Tenant isolation
//!
//! Users carry an `organisation_id` foreign key; membership listings always
//! filter on it.
//!
//! ## Uniqueness
//!
//! `users.email` has a UNIQUE constraint. Violations surface as
//! `DomainError::Conflict`, which closes the race between concurrent
//! onboarding calls with the same email.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use uuid::Uuid;

use orgdesk_core::{
    DomainError, DomainResult, Email, Organisation, OrganisationChanges, OrganisationId,
    OrganisationRepository, User, UserId, UserRepository,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS organisations (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    logo_url    TEXT,
    created_at  TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id               UUID PRIMARY KEY,
    full_name        TEXT NOT NULL,
    email            TEXT NOT NULL UNIQUE,
    password_hash    TEXT NOT NULL,
    organisation_id  UUID NOT NULL REFERENCES organisations (id),
    is_admin         BOOLEAN NOT NULL DEFAULT FALSE,
    created_at       TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS users_organisation_id_idx ON users (organisation_id);
"#;

const USER_COLUMNS: &str = "id, full_name, email, password_hash, organisation_id, is_admin, created_at";

pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> DomainResult<Self> {
        let pool = PgPool::connect(database_url).await.map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist yet.
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::conflict("email already registered");
        }
        if db.is_foreign_key_violation() {
            return DomainError::validation("user must belong to an existing organisation");
        }
    }
    tracing::error!(error = %err, "postgres directory failure");
    DomainError::storage(err.to_string())
}

fn organisation_from_row(row: &PgRow) -> DomainResult<Organisation> {
    Ok(Organisation {
        id: OrganisationId::from_uuid(row.try_get::<Uuid, _>("id").map_err(map_sqlx_error)?),
        name: row.try_get("name").map_err(map_sqlx_error)?,
        logo_url: row.try_get("logo_url").map_err(map_sqlx_error)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(map_sqlx_error)?,
    })
}

fn user_from_row(row: &PgRow) -> DomainResult<User> {
    let email: String = row.try_get("email").map_err(map_sqlx_error)?;
    Ok(User {
        id: UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(map_sqlx_error)?),
        full_name: row.try_get("full_name").map_err(map_sqlx_error)?,
        email: Email::parse(&email).map_err(|e| DomainError::storage(format!("stored email: {e}")))?,
        password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
        organisation_id: OrganisationId::from_uuid(
            row.try_get::<Uuid, _>("organisation_id").map_err(map_sqlx_error)?,
        ),
        is_admin: row.try_get("is_admin").map_err(map_sqlx_error)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(map_sqlx_error)?,
    })
}

async fn insert_user_with<'e, E>(executor: E, user: &User) -> DomainResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, organisation_id, is_admin, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(user.id.as_uuid())
    .bind(&user.full_name)
    .bind(user.email.as_str())
    .bind(&user.password_hash)
    .bind(user.organisation_id.as_uuid())
    .bind(user.is_admin)
    .bind(user.created_at)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

async fn insert_organisation_with<'e, E>(executor: E, organisation: &Organisation) -> DomainResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query("INSERT INTO organisations (id, name, logo_url, created_at) VALUES ($1, $2, $3, $4)")
        .bind(organisation.id.as_uuid())
        .bind(&organisation.name)
        .bind(organisation.logo_url.as_deref())
        .bind(organisation.created_at)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

#[async_trait]
impl OrganisationRepository for PostgresDirectory {
    async fn insert_organisation(&self, organisation: Organisation) -> DomainResult<Organisation> {
        insert_organisation_with(&self.pool, &organisation).await?;
        Ok(organisation)
    }

    async fn get_organisation(&self, id: OrganisationId) -> DomainResult<Option<Organisation>> {
        let row = sqlx::query("SELECT id, name, logo_url, created_at FROM organisations WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(organisation_from_row).transpose()
    }

    async fn insert_organisation_with_admin(
        &self,
        organisation: Organisation,
        admin: User,
    ) -> DomainResult<(Organisation, User)> {
        if admin.organisation_id != organisation.id {
            return Err(DomainError::validation("admin must belong to the new organisation"));
        }

        // Dropping the transaction on any error rolls both inserts back.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        insert_organisation_with(&mut *tx, &organisation).await?;
        insert_user_with(&mut *tx, &admin).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok((organisation, admin))
    }

    async fn update_organisation(
        &self,
        id: OrganisationId,
        changes: OrganisationChanges,
    ) -> DomainResult<Option<Organisation>> {
        let row = sqlx::query(
            r#"
            UPDATE organisations
            SET name = COALESCE($2, name),
                logo_url = COALESCE($3, logo_url)
            WHERE id = $1
            RETURNING id, name, logo_url, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(changes.name.as_deref())
        .bind(changes.logo_url.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.as_ref().map(organisation_from_row).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresDirectory {
    async fn insert_user(&self, user: User) -> DomainResult<User> {
        insert_user_with(&self.pool, &user).await?;
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> DomainResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users_by_organisation(&self, organisation_id: OrganisationId) -> DomainResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE organisation_id = $1 ORDER BY created_at, id"
        ))
        .bind(organisation_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter().map(user_from_row).collect()
    }
}
