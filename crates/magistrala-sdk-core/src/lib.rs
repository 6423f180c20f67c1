//! # Magistrala SDK Core
//!
//! Transport-free building blocks shared by every Magistrala entity client.
//!
//! This crate provides:
//! - A closed error taxonomy and the status-to-kind normalizer
//! - Query string encoding for filter and pagination objects
//! - Decoding of `channel.subtopic` composite addresses
//! - Serde models for request and response payloads

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod defs;
pub mod error;
pub mod query;

pub use address::ResourceAddress;
pub use error::{handle_error, DomainError, ErrorKind};
pub use query::{QueryParameters, QueryValue};
