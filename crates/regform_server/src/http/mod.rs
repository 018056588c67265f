//! Request handlers, extractors and error responses.

pub mod extract;
pub mod health;
pub mod problem;
pub mod registrations;
