use axum_login::AuthUser;
use email_address::EmailAddress;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

/// The operator account. There is exactly one, sourced from configuration -
/// the identity provider proper lives outside this application.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: EmailAddress,
    pub bcrypt_hashed_password: SecretString,
}

impl AuthUser for User {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.bcrypt_hashed_password.expose_secret().as_bytes()
    }
}
