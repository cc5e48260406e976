//! Core domain types and logic.

pub mod price;
pub mod input;
pub mod position;
pub mod portfolio;
pub mod indicator;
pub mod dashboard;
pub mod config_validation;
pub mod error;
