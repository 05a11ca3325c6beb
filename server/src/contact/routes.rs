//! HTTP route handlers for the contact backend

use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use metrics::counter;
use tracing::{debug, info};

use super::types::{ContactForm, ContactResponse};

const MISSING_FIELDS: &str = "Please fill all fields";

/// GET / - Liveness message for the page
pub async fn index() -> Json<ContactResponse> {
    Json(ContactResponse::ok("Portfolio backend running successfully"))
}

/// POST /contact - Accept a contact form as JSON or urlencoded form data
pub async fn submit_contact(
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<ContactResponse>) {
    let Some(message) = parse_form(&headers, &body).and_then(ContactForm::into_message) else {
        debug!("Contact form rejected: missing form data");
        return (
            StatusCode::BAD_REQUEST,
            Json(ContactResponse::error(MISSING_FIELDS)),
        );
    };

    counter!("folio_contact_messages_total").increment(1);
    info!(
        name = %message.name,
        email = %message.email,
        body = %message.message,
        "New contact message received"
    );

    (
        StatusCode::OK,
        Json(ContactResponse::ok("Message sent successfully")),
    )
}

/// Fallback for any unmatched route
pub async fn not_found() -> (StatusCode, Json<ContactResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ContactResponse::error("Route not found")),
    )
}

fn parse_form(headers: &HeaderMap, body: &[u8]) -> Option<ContactForm> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        serde_urlencoded::from_bytes(body).ok()
    } else {
        serde_json::from_slice(body).ok()
    }
}

/// Build contact backend routes. Wrong methods on known paths answer like
/// unknown routes.
pub fn contact_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/contact", post(submit_contact).fallback(not_found))
}
