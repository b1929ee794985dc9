//! Price feed clients
//!
//! This module provides:
//! - The `PriceFeed` trait the collector polls through
//! - The OKX index-tickers implementation
//!
//! All feed-specific logic (URLs, query format, envelope quirks)
//! must live in the implementation module. The collector only
//! interacts through the trait.

pub mod adapter;
pub mod okx;

pub use adapter::PriceFeed;
pub use okx::OkxIndexFeed;
