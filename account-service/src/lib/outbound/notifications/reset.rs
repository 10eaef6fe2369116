use async_trait::async_trait;

use crate::account::errors::NotificationError;
use crate::domain::account::models::User;
use crate::domain::account::ports::PasswordResetNotifier;

/// Password reset notifier that only records the request.
///
/// No reset token is generated and no email is sent.
#[derive(Debug, Clone, Default)]
pub struct LoggingResetNotifier;

impl LoggingResetNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PasswordResetNotifier for LoggingResetNotifier {
    async fn request_reset(&self, user: &User) -> Result<(), NotificationError> {
        tracing::info!(
            user_id = %user.id,
            "Password reset requested; reset email delivery is not configured"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::account::models::EmailAddress;
    use crate::domain::account::models::UserId;
    use crate::domain::account::models::Username;

    #[tokio::test]
    async fn test_request_reset_succeeds() {
        let user = User {
            id: UserId(1),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        };

        assert!(LoggingResetNotifier::new().request_reset(&user).await.is_ok());
    }
}
