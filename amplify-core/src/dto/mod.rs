//! Data Transfer Objects for the platform API
//!
//! Envelope types wrapping the domain records, plus the OAuth ticket
//! exchange used to authorize requests.

pub mod auth;
pub mod build;
