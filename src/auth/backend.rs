use crate::{
    data::user::User,
    error::{BcryptSnafu, RollbookError},
    state::AppState,
};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

#[derive(Clone)]
pub struct RollbookAuthBackend {
    state: AppState,
}

impl RollbookAuthBackend {
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

#[async_trait]
impl AuthnBackend for RollbookAuthBackend {
    type User = User;
    type Credentials = Credentials;
    type Error = RollbookError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let Credentials { email, password } = creds;

        // nobody signs in until an operator account is configured
        let Some(auth_config) = self.state.config().auth_config() else {
            return Ok(None);
        };

        let admin = auth_config.admin().clone();
        if !admin.email.as_str().eq_ignore_ascii_case(&email) {
            return Ok(None);
        }

        let hash = admin.bcrypt_hashed_password.clone();
        let password_verification_result = tokio::task::spawn_blocking(move || {
            bcrypt::verify(password.expose_secret(), hash.expose_secret())
        })
        .await
        .expect("unable to join tokio task")
        .context(BcryptSnafu)?;

        Ok(password_verification_result.then_some(admin))
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(self
            .state
            .config()
            .auth_config()
            .map(|auth_config| auth_config.admin().clone())
            .filter(|admin| &admin.id == user_id))
    }
}
