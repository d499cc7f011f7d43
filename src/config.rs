use crate::{
    data::user::User,
    error::{BadEnvVarSnafu, EmailSnafu, ParsePortSnafu, RollbookResult},
};
use dotenvy::var;
use email_address::EmailAddress;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::{str::FromStr, sync::Arc};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Option<Arc<DbConfig>>,
    auth_config: Option<Arc<AuthConfig>>,
    server_ip: String,
}

impl RuntimeConfiguration {
    pub fn new() -> RollbookResult<Self> {
        Ok(Self {
            db_config: DbConfig::new()?.map(Arc::new),
            auth_config: AuthConfig::new()?.map(Arc::new),
            server_ip: var("ROLLBOOK_SERVER_IP").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
        })
    }

    pub fn db_config(&self) -> Option<Arc<DbConfig>> {
        self.db_config.clone()
    }

    pub fn auth_config(&self) -> Option<Arc<AuthConfig>> {
        self.auth_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }
}

#[cfg(test)]
impl Default for RuntimeConfiguration {
    fn default() -> Self {
        Self {
            db_config: None,
            auth_config: None,
            server_ip: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Connection details for Postgres. All-or-nothing: if `DB_USER` is absent
/// the server falls back to the in-memory store.
#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
}

impl DbConfig {
    pub fn new() -> RollbookResult<Option<Self>> {
        let Ok(user) = var("DB_USER") else {
            return Ok(None);
        };
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        Ok(Some(Self {
            user,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?.parse().context(ParsePortSnafu)?,
            database: get_env_var("DB_NAME")?,
        }))
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}

/// The single operator account. Identity proper is someone else's problem -
/// this only knows an email and a bcrypt hash.
#[derive(Debug)]
pub struct AuthConfig {
    admin: User,
}

impl AuthConfig {
    pub fn new() -> RollbookResult<Option<Self>> {
        let Ok(email) = var("ADMIN_EMAIL") else {
            return Ok(None);
        };
        let email = EmailAddress::from_str(&email).context(EmailSnafu)?;
        let password_hash = var("ADMIN_PASSWORD_HASH").context(BadEnvVarSnafu {
            name: "ADMIN_PASSWORD_HASH",
        })?;

        Ok(Some(Self {
            admin: User {
                id: Uuid::new_v4(),
                email,
                bcrypt_hashed_password: SecretString::from(password_hash),
            },
        }))
    }

    pub const fn admin(&self) -> &User {
        &self.admin
    }
}
