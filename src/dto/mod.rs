pub mod admin;
pub mod game;
pub mod health;
pub mod sse;
pub mod ws;
