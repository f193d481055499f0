//! # Cookbook Core
//!
//! The domain layer of the cookbook backend: entities, ownership rules,
//! list filters, repository ports and the use-case services built on them.
//! This crate has no infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod filter;
pub mod ports;
pub mod services;

pub use error::DomainError;
