//! Library crate for airsoft-qr-back: the match engine plus the HTTP adapter around it.

pub mod clock;
pub mod config;
mod dto;
mod error;
pub mod resolvers;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{AppError, ServiceError};
