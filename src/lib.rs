//! The `taskhub` library crate.
//!
//! Contains the domain models, authentication and authorization mechanisms,
//! persistence port, collaborator interfaces (email, image normalization),
//! routing configuration, and error handling for the taskhub service. The
//! main binary (`main.rs`) uses it to construct and run the application.

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod images;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
