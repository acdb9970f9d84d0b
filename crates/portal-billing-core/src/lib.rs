//! Core types for portal-billing.
//!
//! This crate provides the strongly-typed identifiers threaded through the
//! Stripe client:
//!
//! - **Provider identifiers**: `CustomerId`, `PriceId`, `ProductId`
//! - **Portal identifiers**: `ApplicationId`
//! - **Contact data**: `Email`
//!
//! Provider identifiers are created and owned by Stripe. They are opaque to
//! us; the only thing we check is that they are safe to place in a URL path
//! segment or a metadata value as-is.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;

pub use ids::{ApplicationId, CustomerId, Email, IdError, PriceId, ProductId};
