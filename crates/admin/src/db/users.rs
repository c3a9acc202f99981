//! User repository: the local mirror of identity-provider accounts.
//!
//! The admin binary only ever touches users at login time (get-or-create
//! plus mirroring the ADMIN role onto the local row); the storefront owns
//! the rest of the user surface.

use sqlx::PgPool;

use essenza_core::{Email, UserId, UserRole};

use super::RepositoryError;

/// The slice of a user row the back-office cares about.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: String,
    role: UserRole,
}

impl TryFrom<UserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            role: row.role,
        })
    }
}

const USER_COLUMNS: &str = "id, email, name, role";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by the identity provider's subject.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM shop.users WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminUser::try_from).transpose()
    }

    /// Get the user for a verified identity, creating the local mirror row
    /// on first login.
    ///
    /// A unique violation means either a concurrent first login (re-read by
    /// external id) or a row the identity webhook already created for this
    /// email (claim it by stamping the external id onto it).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::Conflict` if the email belongs to a different
    /// identity.
    pub async fn get_or_create(
        &self,
        external_id: &str,
        email: &Email,
        name: &str,
    ) -> Result<AdminUser, RepositoryError> {
        if let Some(user) = self.get_by_external_id(external_id).await? {
            return Ok(user);
        }

        let created = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO shop.users (external_id, email, name)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(external_id)
        .bind(email.as_str())
        .bind(name)
        .fetch_one(self.pool)
        .await;

        match created {
            Ok(row) => AdminUser::try_from(row),
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                if let Some(user) = self.get_by_external_id(external_id).await? {
                    return Ok(user);
                }
                self.claim_by_email(external_id, email).await
            }
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    /// Attach an identity-provider subject to a webhook-created row that has
    /// an email but no external id yet.
    async fn claim_by_email(
        &self,
        external_id: &str,
        email: &Email,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE shop.users SET external_id = $1
             WHERE email = $2 AND external_id IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(external_id)
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminUser::try_from).transpose()?.ok_or_else(|| {
            RepositoryError::Conflict("email belongs to another identity".to_owned())
        })
    }

    /// Set a user's role (mirrored from the identity provider's claims).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_role(&self, id: UserId, role: UserRole) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE shop.users SET role = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(role)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
