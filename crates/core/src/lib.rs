//! Domain core for the neighborhood activity API.
//!
//! Holds everything that does not touch I/O: identifiers, the domain error
//! type, role and status enums, input validators, the filter clause builder,
//! and the keyset pagination engine shared by every listing endpoint.

pub mod activity;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validation;
pub mod warning;
