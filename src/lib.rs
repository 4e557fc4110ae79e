//! SkillSwap authentication backend and client session library.

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod state;
