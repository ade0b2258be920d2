//! # Market Shared
//! 
//! Shared configuration, telemetry, and utilities for the marketplace backend.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use error::AppError;
