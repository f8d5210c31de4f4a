//! Routes
//!
//! Route handlers organized by functionality.

pub mod export;
pub mod health;
pub mod page;
pub mod rows;
pub mod tables;
