//! Amplify Core
//!
//! Core types for the headless-app build API of the Kibo platform.
//!
//! This crate contains:
//! - Domain types: Build jobs and their steps
//! - DTOs: Request and response shapes exchanged with the platform

pub mod domain;
pub mod dto;
