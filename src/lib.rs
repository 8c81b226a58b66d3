//! Pokin - pohon kinerja (performance tree) engine
//!
//! This crate provides the hierarchy and workflow core for a government
//! performance tree: recursive node storage, the approval state machine,
//! year-over-year and cross-unit cloning with lineage tracking, and the
//! crosscutting linkage between organizational units.
//!
//! Every operation takes a SeaORM [`sea_orm::ConnectionTrait`] so a caller
//! can thread one transaction through all components of a logical operation.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod pokin;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use pokin::{CrosscuttingStatus, PokinStatus};
