//! API Routes
//!
//! Route handlers organized by functionality.

pub mod boroughs;
pub mod export;
pub mod health;
pub mod sales;
pub mod totals;
