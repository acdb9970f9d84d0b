//! Stripe API types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Stripe customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Stripe customer ID.
    pub id: String,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Metadata attached to the customer.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

impl Customer {
    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created)
    }
}

/// Stripe product object.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// Whether the product is available for purchase.
    #[serde(default)]
    pub active: bool,
    /// Product description.
    #[serde(default)]
    pub description: Option<String>,
    /// ID of the product's default price.
    #[serde(default)]
    pub default_price: Option<String>,
    /// Metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

impl Product {
    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created)
    }
}

/// Stripe price object.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Price ID.
    pub id: String,
    /// Whether the price can be used for new purchases.
    #[serde(default)]
    pub active: bool,
    /// Currency (e.g., "usd").
    #[serde(default)]
    pub currency: String,
    /// Unit amount in cents, absent for tiered or custom prices.
    #[serde(default)]
    pub unit_amount: Option<i64>,
    /// Display name of the price.
    #[serde(default)]
    pub nickname: Option<String>,
    /// ID of the product this price belongs to.
    #[serde(default)]
    pub product: Option<String>,
    /// Billing interval for recurring prices.
    #[serde(default)]
    pub recurring: Option<Recurring>,
    /// `one_time` or `recurring`.
    #[serde(default, rename = "type")]
    pub price_type: Option<String>,
    /// Metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

impl Price {
    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created)
    }
}

/// Recurring component of a price.
#[derive(Debug, Clone, Deserialize)]
pub struct Recurring {
    /// `day`, `week`, `month` or `year`.
    pub interval: String,
    /// Number of intervals between billings.
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
}

const fn default_interval_count() -> u32 {
    1
}

/// Stripe subscription object.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    /// Subscription ID.
    pub id: String,
    /// Customer ID.
    #[serde(default)]
    pub customer: Option<String>,
    /// Status (active, `past_due`, canceled, incomplete, ...).
    #[serde(default)]
    pub status: String,
    /// Subscription items.
    #[serde(default = "StripeList::empty")]
    pub items: StripeList<SubscriptionItem>,
    /// Metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Whether the subscription ends at the end of the current period.
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

impl Subscription {
    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created)
    }
}

/// An item of a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    /// Subscription item ID.
    pub id: String,
    /// The price being billed.
    pub price: Price,
    /// Quantity.
    #[serde(default)]
    pub quantity: Option<u64>,
}

/// A line of the customer's upcoming invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceLineItem {
    /// Line item ID.
    pub id: String,
    /// Amount in cents.
    #[serde(default)]
    pub amount: i64,
    /// Currency.
    #[serde(default)]
    pub currency: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Billing period the line covers.
    #[serde(default)]
    pub period: Option<InvoiceLinePeriod>,
    /// Price of the line, if it comes from a price.
    #[serde(default)]
    pub price: Option<Price>,
    /// Quantity.
    #[serde(default)]
    pub quantity: Option<u64>,
    /// Subscription that generated the line.
    #[serde(default)]
    pub subscription: Option<String>,
}

/// Period covered by an invoice line (Unix timestamps).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InvoiceLinePeriod {
    /// Period start.
    pub start: i64,
    /// Period end.
    pub end: i64,
}

/// Stripe list response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Object type (always "list").
    pub object: String,
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    pub has_more: bool,
    /// URL for the list endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

impl<T> StripeList<T> {
    fn empty() -> Self {
        Self {
            object: "list".to_string(),
            data: Vec::new(),
            has_more: false,
            url: None,
        }
    }
}

/// Stripe search response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSearchResult<T> {
    /// Object type (always `"search_result"`).
    pub object: String,
    /// Matching items.
    pub data: Vec<T>,
    /// Whether there are more matches.
    pub has_more: bool,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_page: Option<String>,
    /// Total number of matches, when requested.
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<T> StripeSearchResult<T> {
    /// First match, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parameter that caused the error.
    #[serde(default)]
    pub param: Option<String>,
}
