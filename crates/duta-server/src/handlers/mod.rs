//! Handlers for the public pages and the session endpoints.
//!
//! The resident pages themselves come from `duta_api`.

pub mod landing;
pub mod login;
pub mod session;
