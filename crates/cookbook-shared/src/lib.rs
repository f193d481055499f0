//! # Cookbook Shared
//!
//! Wire types for the cookbook API. Kept free of server dependencies so a
//! client can reuse them.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
