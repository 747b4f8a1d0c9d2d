//! Automated client for the Steam Saliens territory-control minigame.
//!
//! The crate polls the remote service for active planets, picks the most
//! valuable uncaptured zone, joins it, and submits progress reports on the
//! server's scoring cadence. Boss encounters get a dedicated damage-report
//! loop. The top-level driver never gives up on API errors; it backs off
//! and restarts the round.

pub mod client;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod selector;
pub mod types;

pub use client::{GameApi, SessionClient};
pub use config::BotConfig;
pub use controller::Autopilot;
pub use error::{ApiError, CallFailure};
pub use types::Difficulty;
