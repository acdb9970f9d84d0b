//! Form parameters for Stripe write operations.

use portal_billing_core::{ApplicationId, CustomerId, Email, PriceId};

/// Metadata key tagging Stripe resources with the portal application.
pub const APPLICATION_METADATA_KEY: &str = "metadata[kong_application_id]";

/// Prefix applied to the application ID in subscription metadata.
///
/// Customer metadata carries the bare ID.
pub const SUBSCRIPTION_APPLICATION_PREFIX: &str = "app_";

/// Form-encoded parameter set, in the order it is sent.
pub type FormParams = Vec<(&'static str, String)>;

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CustomerCreationParams {
    /// Customer email.
    pub email: Email,
    /// Customer full name.
    pub full_name: String,
    /// Portal application the customer is created for.
    pub application_id: ApplicationId,
}

impl CustomerCreationParams {
    /// Form fields sent to `POST /customers`.
    #[must_use]
    pub fn to_form(&self) -> FormParams {
        vec![
            ("email", self.email.to_string()),
            ("name", self.full_name.clone()),
            (APPLICATION_METADATA_KEY, self.application_id.to_string()),
        ]
    }
}

/// Input for creating a subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionCreationParams {
    /// Customer to subscribe.
    pub customer_id: CustomerId,
    /// Price of the single subscription item.
    pub price_id: PriceId,
    /// Portal application the subscription is created for.
    pub application_id: ApplicationId,
}

impl SubscriptionCreationParams {
    /// Form fields sent to `POST /subscriptions`.
    #[must_use]
    pub fn to_form(&self) -> FormParams {
        vec![
            ("customer", self.customer_id.to_string()),
            ("items[0][price]", self.price_id.to_string()),
            ("enable_incomplete_payments", "false".to_string()),
            (
                APPLICATION_METADATA_KEY,
                format!("{SUBSCRIPTION_APPLICATION_PREFIX}{}", self.application_id),
            ),
        ]
    }
}
