use crate::{api::envelope::QueryResult, auth::backend::RollbookAuthBackend};
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RollbookResult<T> = Result<T, RollbookError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RollbookError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to find student with id: {}", id))]
    MissingStudent { id: i32 },
    #[snafu(display("{}", messages.join(", ")))]
    Validation { messages: Vec<String> },
    #[snafu(display("Path id {} and payload id {} do not match", path_id, body_id))]
    IdMismatch { path_id: i32, body_id: i32 },
    #[snafu(display("Error with hashing/password verification"))]
    Bcrypt { source: bcrypt::BcryptError },
    #[snafu(display("Error with sessions"))]
    TowerSession {
        source: axum_login::tower_sessions::session::Error,
    },
    #[snafu(display("Error parsing email address"))]
    Email { source: email_address::Error },
    #[snafu(display("Tried to change records without being signed in"))]
    NotSignedIn,
}

impl RollbookError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

        match self {
            Self::OpenDatabase { .. } | Self::MigrateError { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
                _ => ISE,
            },
            Self::BadEnvVar { .. } | Self::ParsePort { .. } => ISE,
            Self::MissingStudent { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } | Self::IdMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::Bcrypt { .. } | Self::TowerSession { .. } => ISE,
            Self::Email { .. } => ISE,
            Self::NotSignedIn => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation { messages } => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<axum_login::Error<RollbookAuthBackend>> for RollbookError {
    fn from(value: axum_login::Error<RollbookAuthBackend>) -> Self {
        match value {
            axum_login::Error::Session(source) => Self::TowerSession { source },
            axum_login::Error::Backend(backend) => backend,
        }
    }
}

impl IntoResponse for RollbookError {
    fn into_response(self) -> Response {
        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Rollbook Error"}
                    span {(desc)}
                }
            }
        };

        error!(?self, "Error!");
        (self.status_code(), Html(basic_error(self.to_string()))).into_response()
    }
}

/// Same taxonomy as [`RollbookError`], rendered as the JSON failure envelope
/// for the REST surface.
#[derive(Debug)]
pub struct ApiError(pub RollbookError);

impl<E: Into<RollbookError>> From<E> for ApiError {
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = ?self.0, "API error!");
        (
            self.0.status_code(),
            Json(QueryResult::<()>::failure(self.0.messages())),
        )
            .into_response()
    }
}
