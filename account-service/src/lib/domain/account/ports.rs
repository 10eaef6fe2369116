use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::NotificationError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::ForgotPasswordCommand;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Hashing` - Password could not be hashed
    /// * `Persistence` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError>;

    /// Exchange credentials for a session token.
    ///
    /// # Returns
    /// Authentication result carrying the signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (never distinguished)
    /// * `Persistence` - Store operation failed
    async fn login(&self, command: LoginCommand)
        -> Result<auth::AuthenticationResult, AccountError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Persistence` - Store operation failed
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, AccountError>;

    /// Request a password reset.
    ///
    /// Succeeds whether or not the email is registered.
    ///
    /// # Errors
    /// * `Persistence` - Store operation failed
    async fn forgot_password(&self, command: ForgotPasswordCommand) -> Result<(), AccountError>;
}

/// Credential store operations.
///
/// Implementations own their concurrency safety; in particular the email
/// uniqueness check and the insert in `create` must be atomic.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user and assign its identifier.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Persistence` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, AccountError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Persistence` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Persistence` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError>;
}

/// Delivery of password reset requests.
#[async_trait]
pub trait PasswordResetNotifier: Send + Sync + 'static {
    /// Announce that `user` asked for a password reset.
    ///
    /// # Errors
    /// * `DeliveryFailed` - Notification could not be delivered
    async fn request_reset(&self, user: &User) -> Result<(), NotificationError>;
}
