use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use auth::PasswordError;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::ports::AccountServicePort;
use crate::account::ports::PasswordResetNotifier;
use crate::account::ports::UserRepository;
use crate::domain::account::models::ForgotPasswordCommand;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;

/// Session validity window used when configuration does not override it.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
/// Holds only read-only collaborators, so one instance serves every request.
pub struct AccountService<UR, RN>
where
    UR: UserRepository,
    RN: PasswordResetNotifier,
{
    repository: Arc<UR>,
    reset_notifier: Arc<RN>,
    authenticator: Arc<Authenticator>,
    session_ttl: Duration,
}

impl<UR, RN> AccountService<UR, RN>
where
    UR: UserRepository,
    RN: PasswordResetNotifier,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `reset_notifier` - Password reset delivery implementation
    /// * `authenticator` - Password hasher and token issuer
    /// * `session_ttl` - Validity window of issued session tokens
    pub fn new(
        repository: Arc<UR>,
        reset_notifier: Arc<RN>,
        authenticator: Arc<Authenticator>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            reset_notifier,
            authenticator,
            session_ttl,
        }
    }

    /// Run CPU-bound password work on the blocking thread pool.
    async fn run_blocking<T, F>(&self, operation: F) -> Result<T, AccountError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || operation(&authenticator))
            .await
            .map_err(|e| {
                AccountError::Hashing(PasswordError::HashingFailed(format!(
                    "Blocking task failed: {}",
                    e
                )))
            })
    }
}

#[async_trait]
impl<UR, RN> AccountServicePort for AccountService<UR, RN>
where
    UR: UserRepository,
    RN: PasswordResetNotifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError> {
        let RegisterCommand {
            username,
            email,
            password,
        } = command;

        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(password.expose()))
            .await??;

        // Microsecond precision, as stored by Postgres
        let new_user = NewUser {
            username,
            email,
            password_hash,
            created_at: Utc::now().trunc_subsecs(6),
        };

        let user = self.repository.create(new_user).await?;
        tracing::info!(user_id = %user.id, "Account registered");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, AccountError> {
        let LoginCommand { email, password } = command;

        let Some(user) = self.repository.find_by_email(&email).await? else {
            // Same Argon2 cost as a wrong password
            let outcome = self
                .run_blocking(move |authenticator| {
                    authenticator.verify_unknown_account(password.expose())
                })
                .await?;
            if let Err(e) = outcome {
                tracing::error!(error = %e, "Decoy password verification failed");
            }

            tracing::debug!("Login rejected: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let user_id = user.id;
        let stored_hash = user.password_hash;
        let session_ttl = self.session_ttl;

        let result = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(password.expose(), &stored_hash, user_id, session_ttl)
            })
            .await?
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(user_id = %user_id, "Login rejected: password mismatch");
                    AccountError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(user_id = %user_id, error = %err, "Stored password hash is unusable");
                    AccountError::Hashing(err)
                }
                AuthenticationError::TokenError(err) => AccountError::Token(err),
            })?;

        tracing::info!(user_id = %user_id, "Session issued");
        Ok(result)
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<User, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn forgot_password(&self, command: ForgotPasswordCommand) -> Result<(), AccountError> {
        match self.repository.find_by_email(&command.email).await? {
            Some(user) => {
                if let Err(e) = self.reset_notifier.request_reset(&user).await {
                    tracing::error!(
                        user_id = %user.id,
                        error = %e,
                        "Failed to deliver password reset notification"
                    );
                }
            }
            None => tracing::debug!("Password reset requested for unknown email"),
        }

        Ok(())
    }
}
