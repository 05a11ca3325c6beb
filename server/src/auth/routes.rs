//! HTTP route handlers for the authentication API

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::manager::{AuthError, SessionStatus};
use super::validation::ValidationReason;
use crate::contact::not_found;
use crate::server::AppState;

/// Error response for auth API
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ValidationReason>,
}

impl From<AuthError> for AuthErrorResponse {
    fn from(e: AuthError) -> Self {
        let reason = match &e {
            AuthError::ValidationFailed(reason) => Some(*reason),
            _ => None,
        };
        Self {
            success: false,
            error: e.to_string(),
            code: e.code().to_string(),
            reason,
        }
    }
}

impl AuthErrorResponse {
    /// Body that is not a JSON object of the expected shape
    pub fn invalid_request() -> Self {
        Self {
            success: false,
            error: "Request body must be a JSON object".to_string(),
            code: "invalid_request".to_string(),
            reason: None,
        }
    }
}

impl IntoResponse for AuthErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "validation_failed" | "invalid_request" => StatusCode::BAD_REQUEST,
            "invalid_credentials" => StatusCode::UNAUTHORIZED,
            "duplicate_email" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub was_authenticated: bool,
}

/// Response for GET /api/auth/session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    /// The session ran out and was cleared by this request
    pub expired: bool,
    /// Signed-in user, or the user whose session just expired
    pub user: Option<String>,
    /// Epoch millis of the login
    pub login_time: Option<u64>,
    pub expires_in_secs: Option<u64>,
}

/// Decode a JSON request body regardless of its Content-Type, so a bad body
/// still gets the API's error shape
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AuthErrorResponse> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected auth request body: {}", e);
        AuthErrorResponse::invalid_request()
    })
}

/// POST /api/auth/register - Create an account and sign in
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, AuthErrorResponse> {
    let request: RegisterRequest = parse_body(&body)?;
    let user = state
        .session_manager
        .register(&request.email, &request.password, &request.confirm)
        .await
        .map_err(|e| {
            tracing::debug!("Registration rejected: {}", e);
            AuthErrorResponse::from(e)
        })?;

    Ok(Json(AuthResponse {
        success: true,
        user,
    }))
}

/// POST /api/auth/login - Sign in an existing account
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, AuthErrorResponse> {
    let request: LoginRequest = parse_body(&body)?;
    let user = state
        .session_manager
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::debug!("Login rejected: {}", e);
            AuthErrorResponse::from(e)
        })?;

    Ok(Json(AuthResponse {
        success: true,
        user,
    }))
}

/// POST /api/auth/logout - End the current session
///
/// Asking the user to confirm is left to the page.
pub async fn logout(State(state): State<AppState>) -> Json<LogoutResponse> {
    let was_authenticated = state.session_manager.logout().await;
    Json(LogoutResponse {
        success: true,
        was_authenticated,
    })
}

/// GET /api/auth/session - Current session, expiring it lazily
///
/// `expired` is true only on the call that found the session stale and
/// cleared it, so the page can tell an expiry from a plain logged-out state.
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    let manager = &state.session_manager;
    let response = match manager.check_expiry().await {
        SessionStatus::Active(record) => SessionResponse {
            authenticated: true,
            expired: false,
            expires_in_secs: Some(manager.remaining_for(&record).as_secs()),
            user: Some(record.user),
            login_time: Some(record.login_time),
        },
        SessionStatus::Expired { user } => SessionResponse {
            authenticated: false,
            expired: true,
            user: Some(user),
            login_time: None,
            expires_in_secs: None,
        },
        SessionStatus::Anonymous => SessionResponse {
            authenticated: false,
            expired: false,
            user: None,
            login_time: None,
            expires_in_secs: None,
        },
    };

    Json(response)
}

/// Build auth API routes. Wrong methods answer like unknown routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).fallback(not_found))
        .route("/login", post(login).fallback(not_found))
        .route("/logout", post(logout).fallback(not_found))
        .route("/session", get(session).fallback(not_found))
}
