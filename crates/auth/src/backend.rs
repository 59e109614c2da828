//! Concrete authentication backend
//!
//! Wraps `PgPool` + `AuthConfig` and owns session-specific SQL queries.
//! Uses runtime `sqlx::query_as` (not macros) for the session read model.

use sqlx::PgPool;
use uuid::Uuid;

use crate::claims::SessionClaims;
use crate::config::AuthConfig;
use crate::context::Session;
use crate::error::AuthError;
use crate::types::SessionUser;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find the session view of a user.
    ///
    /// The team is derived per role: the team a coach owns, or the team a
    /// player's profile points at.
    pub(crate) async fn find_user(&self, id: Uuid) -> Result<Option<SessionUser>, AuthError> {
        let user: Option<SessionUser> = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u.name, u.role,
                   CASE WHEN u.role = 'coach' THEN t.id ELSE u.team_id END AS team_id,
                   u.created_at, u.updated_at
            FROM users u
            LEFT JOIN teams t ON t.coach_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::UserLoadError
        })?;

        Ok(user)
    }

    /// Create the profile row for a new identity (JIT provisioning).
    ///
    /// Called on the first authenticated request of an account. Uses
    /// `ON CONFLICT DO NOTHING` so concurrent first requests are safe.
    async fn provision_user_from_jwt(
        &self,
        user_id: Uuid,
        claims: &SessionClaims,
    ) -> Result<SessionUser, AuthError> {
        let email = claims.email.as_deref().ok_or(AuthError::MissingEmail)?;
        let name = claims
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'available', NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to provision user");
            AuthError::UserProvisionFailed
        })?;

        tracing::info!(user_id = %user_id, email = %email, "JIT user provisioned");

        self.find_user(user_id).await?.ok_or_else(|| {
            tracing::error!(user_id = %user_id, "User not found after provisioning");
            AuthError::UserProvisionFailed
        })
    }

    /// Validate a bearer token and load (or provision) its user.
    pub async fn authenticate_jwt(&self, token: &str) -> Result<Session, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        let user = match self.find_user(user_id).await? {
            Some(user) => user,
            None => self.provision_user_from_jwt(user_id, &claims).await?,
        };

        Ok(Session::new(user))
    }
}
