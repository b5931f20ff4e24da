// src/handlers/mod.rs
pub mod auth;
pub mod chat;
pub mod ml;
pub mod status;
