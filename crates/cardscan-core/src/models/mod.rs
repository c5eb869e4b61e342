//! Data models.

pub mod card;
pub mod config;
pub mod transcript;
