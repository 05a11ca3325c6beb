//! Contact form backend
//!
//! A stub collaborator for the portfolio page: it validates that a contact
//! message has every field, logs it, and acknowledges it. Nothing is stored
//! or forwarded.

pub mod routes;
mod types;

pub use routes::{contact_routes, not_found};
pub use types::{ContactForm, ContactMessage, ContactResponse};
