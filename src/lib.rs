//! iAssist - FAQ-grounded chat assistant backed by a hosted completion API.

pub mod ai;
pub mod chat;
pub mod config;
pub mod console;
pub mod knowledge;
pub mod server;
pub mod startup;
