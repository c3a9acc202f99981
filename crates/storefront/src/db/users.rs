//! User repository for database operations.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use essenza_core::{CartItem, Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::User;

/// Row shape shared by every user query.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    external_id: Option<String>,
    email: String,
    name: String,
    role: UserRole,
    cart: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            external_id: row.external_id,
            email,
            name: row.name,
            role: row.role,
            cart: row.cart,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str = "id, external_id, email, name, role, cart, created_at, updated_at";

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
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM shop.users WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM shop.users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get the user for a verified identity, creating the local mirror row
    /// on first login.
    ///
    /// Two races end in a unique violation here: a concurrent first login
    /// (re-read the winner's row by external id) and a row the identity
    /// webhook already created for this email (claim it by stamping the
    /// external id onto it).
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
    ) -> Result<User, RepositoryError> {
        if let Some(user) = self.get_by_external_id(external_id).await? {
            return Ok(user);
        }

        match self.create(Some(external_id), email, name).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::Conflict(_)) => {
                if let Some(user) = self.get_by_external_id(external_id).await? {
                    return Ok(user);
                }
                self.claim_by_email(external_id, email).await
            }
            Err(e) => Err(e),
        }
    }

    /// Attach an identity-provider subject to a webhook-created row that has
    /// an email but no external id yet.
    async fn claim_by_email(
        &self,
        external_id: &str,
        email: &Email,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE shop.users SET external_id = $1
             WHERE email = $2 AND external_id IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(external_id)
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()?.ok_or_else(|| {
            RepositoryError::Conflict("email belongs to another identity".to_owned())
        })
    }

    /// Create a user with an empty cart and role CLIENT.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or external id
    /// already exists, `RepositoryError::Database` for other failures.
    pub async fn create(
        &self,
        external_id: Option<&str>,
        email: &Email,
        name: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO shop.users (external_id, email, name)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(external_id)
        .bind(email.as_str())
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("user already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        User::try_from(row)
    }

    /// Create a user from an identity webhook, but only when no user with
    /// that email exists yet. Returns `None` when the email was taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_if_email_absent(
        &self,
        email: &Email,
        name: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO shop.users (email, name)
             VALUES ($1, $2)
             ON CONFLICT (email) DO NOTHING
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
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

    /// Fetch the raw cart snapshot for a user.
    ///
    /// The snapshot is untrusted JSON; callers normalize it with
    /// [`essenza_core::normalize_cart_items`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn get_cart(&self, id: UserId) -> Result<Value, RepositoryError> {
        let cart: Option<(Value,)> = sqlx::query_as("SELECT cart FROM shop.users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        cart.map(|(value,)| value).ok_or(RepositoryError::NotFound)
    }

    /// Overwrite the user's cart snapshot. An empty cart is valid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_cart(&self, id: UserId, items: &[CartItem]) -> Result<(), RepositoryError> {
        let snapshot = serde_json::to_value(items)
            .map_err(|e| RepositoryError::DataCorruption(format!("cart serialization: {e}")))?;

        let result = sqlx::query("UPDATE shop.users SET cart = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(snapshot)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
