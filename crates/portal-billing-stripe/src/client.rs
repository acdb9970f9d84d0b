//! Stripe API client implementation.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use portal_billing_core::{CustomerId, Email, PriceId, ProductId};

use crate::config::StripeConfig;
use crate::error::StripeError;
use crate::params::{CustomerCreationParams, FormParams, SubscriptionCreationParams};
use crate::types::{
    Customer, InvoiceLineItem, Price, Product, StripeErrorResponse, StripeList,
    StripeSearchResult, Subscription,
};

/// Content type declared on every request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Stripe API client.
///
/// Cloning is cheap; clones share the connection pool and the fixed
/// `Authorization`/`Content-Type` header pair.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    config: StripeConfig,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Configuration`] if the API key cannot be used
    /// as a header value, or [`StripeError::Http`] if the HTTP client cannot
    /// be built.
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        let mut authorization = HeaderValue::from_str(&config.authorization()).map_err(|_| {
            StripeError::Configuration("API key contains invalid header characters".into())
        })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let config = StripeConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { client, config })
    }

    /// Create a client from [`StripeConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the client cannot be built.
    pub fn from_env() -> Result<Self, StripeError> {
        Self::new(StripeConfig::from_env()?)
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Search customers by email.
    ///
    /// Stripe's search index is eventually consistent; a customer created a
    /// moment ago may not be returned yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn find_customer_by_email(
        &self,
        email: &Email,
    ) -> Result<StripeSearchResult<Customer>, StripeError> {
        let query = format!("email:'{email}'");
        self.get("customers/search", &[("query", query.as_str())])
            .await
    }

    /// Create a new Stripe customer tagged with the portal application.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn create_customer(
        &self,
        params: &CustomerCreationParams,
    ) -> Result<Customer, StripeError> {
        self.post("customers", &params.to_form()).await
    }

    /// List products.
    ///
    /// Only the first page (Stripe's default page size) is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn list_products(&self) -> Result<StripeList<Product>, StripeError> {
        self.get("products", &[]).await
    }

    /// List a customer's subscriptions (first page only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn list_subscriptions(
        &self,
        customer_id: &CustomerId,
    ) -> Result<StripeList<Subscription>, StripeError> {
        self.get("subscriptions", &[("customer", customer_id.as_str())])
            .await
    }

    /// List the line items of a customer's upcoming invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    /// Stripe answers 404 when the customer has nothing to invoice.
    pub async fn list_upcoming_invoice_lines(
        &self,
        customer_id: &CustomerId,
    ) -> Result<StripeList<InvoiceLineItem>, StripeError> {
        self.get(
            "invoices/upcoming/lines",
            &[("customer", customer_id.as_str())],
        )
        .await
    }

    /// List active prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn list_active_prices(&self) -> Result<StripeList<Price>, StripeError> {
        self.get("prices", &[("active", "true")]).await
    }

    /// Retrieve a price by ID.
    ///
    /// Sent as GET. `POST /prices/{id}` is Stripe's update endpoint and must
    /// not be used for reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn get_price(&self, price_id: &PriceId) -> Result<Price, StripeError> {
        self.get(&format!("prices/{price_id}"), &[]).await
    }

    /// Retrieve a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, StripeError> {
        self.get(&format!("products/{product_id}"), &[]).await
    }

    /// Subscribe a customer to a single price.
    ///
    /// Incomplete payments are never enabled. There is no idempotency key, so
    /// calling this twice creates two subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Stripe returns an error.
    pub async fn create_subscription(
        &self,
        params: &SubscriptionCreationParams,
    ) -> Result<Subscription, StripeError> {
        self.post("subscriptions", &params.to_form()).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StripeError> {
        tracing::debug!(method = "GET", path = %path, "Sending Stripe request");

        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &FormParams,
    ) -> Result<T, StripeError> {
        tracing::debug!(method = "POST", path = %path, fields = form.len(), "Sending Stripe request");

        let response = self.client.post(self.url(path)).form(form).send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        let (error_type, message, code, param) = match error_body {
            Ok(stripe_error) => (
                stripe_error.error.error_type,
                stripe_error.error.message,
                stripe_error.error.code,
                stripe_error.error.param,
            ),
            Err(_) => ("unknown".to_string(), format!("HTTP {status}"), None, None),
        };

        tracing::warn!(
            status = %status,
            error_type = %error_type,
            code = ?code,
            "Stripe request failed"
        );

        Err(StripeError::Api {
            status: status.as_u16(),
            error_type,
            message,
            code,
            param,
        })
    }
}
