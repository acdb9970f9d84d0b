//! Stripe client for portal-billing.
//!
//! A thin wrapper over the Stripe REST API covering the customer, product,
//! price, subscription and upcoming-invoice calls the developer portal needs.
//! Every operation maps to exactly one HTTP request; nothing is retried,
//! cached or paginated.
//!
//! # Example
//!
//! ```no_run
//! use portal_billing_core::{ApplicationId, Email};
//! use portal_billing_stripe::{CustomerCreationParams, StripeClient, StripeConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StripeClient::new(StripeConfig::new("sk_test_..."))?;
//!
//! let email: Email = "jane@example.com".parse()?;
//! let existing = client.find_customer_by_email(&email).await?;
//!
//! let customer = match existing.first() {
//!     Some(customer) => customer.clone(),
//!     None => {
//!         client
//!             .create_customer(&CustomerCreationParams {
//!                 email,
//!                 full_name: "Jane Doe".to_string(),
//!                 application_id: ApplicationId::new("42")?,
//!             })
//!             .await?
//!     }
//! };
//!
//! println!("Customer: {}", customer.id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;
mod params;
mod types;

pub use client::{StripeClient, FORM_CONTENT_TYPE};
pub use config::{StripeConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
pub use error::StripeError;
pub use params::{
    CustomerCreationParams, FormParams, SubscriptionCreationParams, APPLICATION_METADATA_KEY,
    SUBSCRIPTION_APPLICATION_PREFIX,
};
pub use types::*;
