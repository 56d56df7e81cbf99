//! Member repository for `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;

use ecommerce_core::{Email, MemberId, Username};

use super::{MemberRepository, RepositoryError, UniqueKey};
use crate::models::{Member, MemberCredentials, NewMember};

const USERNAME_CONSTRAINT: &str = "member_username_key";
const EMAIL_CONSTRAINT: &str = "member_email_key";

/// Raw `storefront.member` row.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
    date_of_birth: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for MemberCredentials {
    type Error = RepositoryError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username for member {}: {e}", row.id))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email for member {}: {e}", row.id))
        })?;

        Ok(Self {
            member: Member {
                id: MemberId::new(row.id),
                username,
                email,
                date_of_birth: row.date_of_birth,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        })
    }
}

/// Map a unique-index violation to the key it protects.
fn unique_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some(USERNAME_CONSTRAINT) => return RepositoryError::Conflict(UniqueKey::Username),
            Some(EMAIL_CONSTRAINT) => return RepositoryError::Conflict(UniqueKey::Email),
            _ => {}
        }
    }
    RepositoryError::Database(err)
}

/// `PostgreSQL`-backed member collection.
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new member repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self), fields(username = %username))]
    async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM storefront.member WHERE username = $1)",
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[instrument(skip(self, email))]
    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM storefront.member WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[instrument(skip(self, member), fields(username = %member.username))]
    async fn create(&self, member: &NewMember) -> Result<Member, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r"
            INSERT INTO storefront.member (username, email, password_hash, date_of_birth)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, date_of_birth, created_at
            ",
        )
        .bind(member.username.as_str())
        .bind(member.email.as_str())
        .bind(member.password_hash.as_str())
        .bind(member.date_of_birth)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_violation)?;

        Ok(MemberCredentials::try_from(row)?.member)
    }

    #[instrument(skip(self, identifier))]
    async fn find_by_login(
        &self,
        identifier: &str,
    ) -> Result<Vec<MemberCredentials>, RepositoryError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r"
            SELECT id, username, email, password_hash, date_of_birth, created_at
            FROM storefront.member
            WHERE username = $1 OR email = $1
            ORDER BY id ASC
            ",
        )
        .bind(identifier)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MemberCredentials::try_from).collect()
    }
}
