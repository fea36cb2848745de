// src/routes/account_routes.rs
//
// Login and signup forms relayed to the pharmacy site. Messages match what the
// site's own modals show.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, header},
    response::AppendHeaders,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::cookies::UpstreamCredentials,
    models::{ApiOk, AppState, Flash},
    upstream::{LoginForm, Relayed, SignupForm},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupBody {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountResult {
    pub ok: bool,
    #[serde(flatten)]
    pub flash: Flash,
}

type Relay = (AppendHeaders<Vec<(HeaderName, String)>>, Json<ApiOk<AccountResult>>);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
}

fn answer(ok: bool, title: &'static str, message: impl Into<String>, cookies: Vec<String>) -> Relay {
    let headers = cookies.into_iter().map(|c| (header::SET_COOKIE, c)).collect();
    (
        AppendHeaders(headers),
        Json(ApiOk {
            data: AccountResult {
                ok,
                flash: Flash {
                    title,
                    message: message.into(),
                },
            },
        }),
    )
}

fn upstream_message(relayed: &Relayed, fallback: &str) -> String {
    relayed
        .message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub async fn login(
    State(state): State<AppState>,
    creds: UpstreamCredentials,
    Json(body): Json<LoginBody>,
) -> Result<Relay, ApiError> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Ok(answer(false, "Missing Info", "Please enter your email and password.", Vec::new()));
    }

    let form = LoginForm {
        username: email.to_string(),
        password: body.password,
    };
    let relayed = state.upstream.login(&form, &creds).await?;
    tracing::info!(ok = relayed.ok, "login relayed");

    if relayed.ok {
        Ok(answer(true, "Welcome Back!", "You have logged in successfully.", relayed.set_cookies))
    } else {
        let message = upstream_message(&relayed, "Invalid username or password.");
        Ok(answer(false, "Login Failed", message, relayed.set_cookies))
    }
}

pub async fn signup(
    State(state): State<AppState>,
    creds: UpstreamCredentials,
    Json(body): Json<SignupBody>,
) -> Result<Relay, ApiError> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() || body.confirm_password.is_empty() {
        return Ok(answer(false, "Missing Fields", "All fields are required.", Vec::new()));
    }
    if body.password != body.confirm_password {
        return Ok(answer(false, "Password Mismatch", "Passwords do not match!", Vec::new()));
    }

    let form = SignupForm {
        username: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        password: body.password,
    };
    let relayed = state.upstream.signup(&form, &creds).await?;
    tracing::info!(ok = relayed.ok, "signup relayed");

    if relayed.ok {
        Ok(answer(true, "Account Created!", "You can now log in.", relayed.set_cookies))
    } else {
        let message = upstream_message(&relayed, "Try again.");
        Ok(answer(false, "Signup Failed", message, relayed.set_cookies))
    }
}
