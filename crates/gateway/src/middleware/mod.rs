//! Middleware for session resolution.

mod auth;

pub use auth::session_middleware;
