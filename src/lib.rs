//! # dinus-reco
//!
//! Terminal front end for the DINUS research recommendation service.
//!
//! The heavy lifting (concurrent requests, projection, citation formatting)
//! lives in [`reco_client`]. This crate adds what a runnable application
//! needs around it:
//!
//! - [`config`]: TOML configuration and environment resolution of the
//!   service base URL
//! - [`platform`]: system clipboard and share-link launcher
//! - [`render`]: plain-text rendering of the session view
//! - [`commands`] and [`console`]: one-shot CLI commands and the interactive
//!   session

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod platform;
pub mod render;

pub use config::AppConfig;
pub use error::{AppError, Result};
