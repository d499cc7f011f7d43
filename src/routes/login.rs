use crate::{
    auth::{RollbookSession, backend::Credentials},
    error::RollbookResult,
    maud_conveniences::{form_submit_button, simple_form_element, title},
    state::AppState,
};
use axum::{
    Form,
    body::Body,
    extract::{Query, State},
    http::Response,
    response::{IntoResponse, Redirect},
};
use maud::html;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginOptions {
    pub to: Option<String>,
    pub login_failed: Option<bool>,
}

pub async fn get_login(
    State(state): State<AppState>,
    session: RollbookSession,
    Query(LoginOptions { to, login_failed }): Query<LoginOptions>,
) -> RollbookResult<Response<Body>> {
    if session.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let auth_configured = state.config().auth_config().is_some();
    let login_failed = login_failed.unwrap_or(false);

    Ok(state.render(session, html! {
        div class="bg-gray-800 shadow-md rounded px-8 pt-6 pb-8 mb-4 w-full max-w-sm" {
            (title("Login"))
            @if !auth_configured {
                div role="alert" class="bg-yellow-100 border border-yellow-400 text-yellow-700 px-4 py-4 rounded relative" {
                    span class="block sm:inline" {"No operator account is configured, so logging in is disabled."}
                }
                br;
            }
            @if login_failed {
                div role="alert" class="bg-red-100 border border-red-400 text-red-700 px-4 py-4 rounded relative" {
                    strong class="font-bold" {"Alert!"}
                    br;
                    // avoid giving extra details for security reasons :)
                    span class="block sm:inline" {"Email/Password not found or password incorrect"}
                }
                br;
            }

            form method="post" {
                @if let Some(to) = to {
                    input type="hidden" name="next" value=(to) {}
                }
                (simple_form_element("email", "Email", true, Some("email"), None))
                (simple_form_element("password", "Password", true, Some("password"), None))
                (form_submit_button(Some("Login")))
            }
        }
    }).into_response())
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: SecretString,
    next: Option<String>,
}

pub async fn post_login(
    mut session: RollbookSession,
    Form(LoginForm {
        email,
        password,
        next,
    }): Form<LoginForm>,
) -> RollbookResult<Redirect> {
    match session.authenticate(Credentials { email, password }).await {
        Err(e) => Err(e.into()),
        Ok(Some(user)) => match session.login(&user).await {
            Ok(()) => Ok(Redirect::to(next.as_deref().unwrap_or("/"))),
            Err(e) => Err(e.into()),
        },
        Ok(None) => {
            let mut redirect = "/login?login_failed=true".to_string();
            if let Some(next) = next {
                redirect += format!("&to={next}").as_str();
            }
            Ok(Redirect::to(redirect.as_ref()))
        }
    }
}

pub async fn post_logout(mut session: RollbookSession) -> RollbookResult<impl IntoResponse> {
    session.logout().await?;
    Ok(Redirect::to("/"))
}
