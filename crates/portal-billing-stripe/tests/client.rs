//! Request-shape tests for the Stripe client against a mock server.

use reqwest::Url;
use serde_json::json;
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use portal_billing_core::{ApplicationId, CustomerId, Email, PriceId, ProductId};
use portal_billing_stripe::{
    CustomerCreationParams, StripeClient, StripeConfig, StripeError, SubscriptionCreationParams,
    FORM_CONTENT_TYPE,
};

const API_KEY: &str = "sk_test_123";

async fn setup() -> (MockServer, StripeClient) {
    let server = MockServer::start().await;
    let config = StripeConfig::new(API_KEY).with_base_url(format!("{}/v1", server.uri()));
    let client = StripeClient::new(config).expect("Failed to create Stripe client");
    (server, client)
}

async fn received(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
}

/// Decode a form-urlencoded body into ordered key/value pairs.
fn form_pairs(request: &Request) -> Vec<(String, String)> {
    let body = std::str::from_utf8(&request.body).expect("form body is UTF-8");
    let mut url = Url::parse("http://form.local/").unwrap();
    url.set_query(Some(body));
    url.query_pairs().into_owned().collect()
}

fn header_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

fn customer_json() -> serde_json::Value {
    json!({
        "id": "cus_123",
        "object": "customer",
        "email": "jane@example.com",
        "name": "Jane Doe",
        "metadata": { "kong_application_id": "42" },
        "created": 1_700_000_000
    })
}

fn list_json(data: serde_json::Value) -> serde_json::Value {
    json!({ "object": "list", "data": data, "has_more": false, "url": "/v1/x" })
}

/// A body every response type of the client can be decoded from.
fn universal_json() -> serde_json::Value {
    json!({ "id": "obj_1", "object": "list", "data": [], "has_more": false })
}

fn customer_params() -> CustomerCreationParams {
    CustomerCreationParams {
        email: Email::new("jane@example.com").unwrap(),
        full_name: "Jane Doe".to_string(),
        application_id: ApplicationId::new("42").unwrap(),
    }
}

fn subscription_params() -> SubscriptionCreationParams {
    SubscriptionCreationParams {
        customer_id: CustomerId::new("cus_123").unwrap(),
        price_id: PriceId::new("price_456").unwrap(),
        application_id: ApplicationId::new("42").unwrap(),
    }
}

/// Run every client operation once, collecting the outcome of each.
async fn call_every_operation(client: &StripeClient) -> Vec<(&'static str, Result<(), StripeError>)> {
    let customer = CustomerId::new("cus_123").unwrap();
    vec![
        (
            "find_customer_by_email",
            client
                .find_customer_by_email(&Email::new("jane@example.com").unwrap())
                .await
                .map(drop),
        ),
        (
            "create_customer",
            client.create_customer(&customer_params()).await.map(drop),
        ),
        ("list_products", client.list_products().await.map(drop)),
        (
            "list_subscriptions",
            client.list_subscriptions(&customer).await.map(drop),
        ),
        (
            "list_upcoming_invoice_lines",
            client.list_upcoming_invoice_lines(&customer).await.map(drop),
        ),
        ("list_active_prices", client.list_active_prices().await.map(drop)),
        (
            "get_price",
            client
                .get_price(&PriceId::new("price_456").unwrap())
                .await
                .map(drop),
        ),
        (
            "get_product",
            client
                .get_product(&ProductId::new("prod_789").unwrap())
                .await
                .map(drop),
        ),
        (
            "create_subscription",
            client
                .create_subscription(&subscription_params())
                .await
                .map(drop),
        ),
    ]
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn find_customer_by_email_sends_search_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/search"))
        .and(query_param("query", "email:'jane@example.com'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "search_result",
            "data": [customer_json()],
            "has_more": false,
            "next_page": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .find_customer_by_email(&Email::new("jane@example.com").unwrap())
        .await
        .unwrap();

    let customer = result.first().expect("one match");
    assert_eq!(customer.id, "cus_123");
    assert_eq!(customer.email.as_deref(), Some("jane@example.com"));

    let requests = received(&server).await;
    assert_eq!(requests.len(), 1);
    let pairs: Vec<_> = requests[0].url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![("query".to_string(), "email:'jane@example.com'".to_string())]
    );
}

#[tokio::test]
async fn create_customer_sends_exactly_three_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_json()))
        .expect(1)
        .mount(&server)
        .await;

    let customer = client.create_customer(&customer_params()).await.unwrap();
    assert_eq!(customer.id, "cus_123");
    assert_eq!(customer.metadata["kong_application_id"], "42");

    let requests = received(&server).await;
    assert_eq!(
        form_pairs(&requests[0]),
        vec![
            ("email".to_string(), "jane@example.com".to_string()),
            ("name".to_string(), "Jane Doe".to_string()),
            (
                "metadata[kong_application_id]".to_string(),
                "42".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn create_subscription_sends_prefixed_metadata_and_disables_incomplete_payments() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub_1",
            "object": "subscription",
            "customer": "cus_123",
            "status": "active",
            "metadata": { "kong_application_id": "app_42" },
            "items": list_json(json!([{
                "id": "si_1",
                "price": { "id": "price_456", "currency": "usd", "unit_amount": 900 }
            }]))
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subscription = client
        .create_subscription(&subscription_params())
        .await
        .unwrap();
    assert_eq!(subscription.status, "active");
    assert_eq!(subscription.items.data[0].price.id, "price_456");

    let requests = received(&server).await;
    assert_eq!(
        form_pairs(&requests[0]),
        vec![
            ("customer".to_string(), "cus_123".to_string()),
            ("items[0][price]".to_string(), "price_456".to_string()),
            (
                "enable_incomplete_payments".to_string(),
                "false".to_string()
            ),
            (
                "metadata[kong_application_id]".to_string(),
                "app_42".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn list_products_sends_no_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(json!([
            { "id": "prod_1", "name": "Gold", "active": true },
            { "id": "prod_2", "name": "Silver", "active": false }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();
    assert_eq!(products.data.len(), 2);
    assert_eq!(products.data[0].name, "Gold");

    let requests = received(&server).await;
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn list_subscriptions_filters_by_customer() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions"))
        .and(query_param("customer", "cus_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(json!([
            { "id": "sub_1", "customer": "cus_123", "status": "active" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let subscriptions = client
        .list_subscriptions(&CustomerId::new("cus_123").unwrap())
        .await
        .unwrap();
    assert_eq!(subscriptions.data[0].id, "sub_1");
}

#[tokio::test]
async fn list_upcoming_invoice_lines_filters_by_customer() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/invoices/upcoming/lines"))
        .and(query_param("customer", "cus_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(json!([{
            "id": "il_1",
            "amount": 900,
            "currency": "usd",
            "description": "1 × Gold (at $9.00 / month)",
            "period": { "start": 1_700_000_000, "end": 1_702_592_000 },
            "subscription": "sub_1"
        }]))))
        .expect(1)
        .mount(&server)
        .await;

    let lines = client
        .list_upcoming_invoice_lines(&CustomerId::new("cus_123").unwrap())
        .await
        .unwrap();
    assert_eq!(lines.data[0].amount, 900);
    assert_eq!(lines.data[0].period.unwrap().end, 1_702_592_000);
}

#[tokio::test]
async fn list_active_prices_filters_active() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/prices"))
        .and(query_param("active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(json!([
            { "id": "price_1", "active": true, "currency": "usd", "unit_amount": 900, "product": "prod_1" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let prices = client.list_active_prices().await.unwrap();
    assert!(prices.data[0].active);
    assert_eq!(prices.data[0].product.as_deref(), Some("prod_1"));
}

#[tokio::test]
async fn get_price_uses_get() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/prices/price_456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "price_456",
            "nickname": "Gold monthly",
            "currency": "usd",
            "unit_amount": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    let price = client
        .get_price(&PriceId::new("price_456").unwrap())
        .await
        .unwrap();
    assert_eq!(price.nickname.as_deref(), Some("Gold monthly"));

    let requests = received(&server).await;
    assert_eq!(requests[0].method.as_str(), "GET");
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn get_product_sends_no_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/products/prod_789"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "prod_789",
            "name": "Gold",
            "default_price": "price_456"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = client
        .get_product(&ProductId::new("prod_789").unwrap())
        .await
        .unwrap();
    assert_eq!(product.default_price.as_deref(), Some("price_456"));

    let requests = received(&server).await;
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn every_operation_sends_identical_headers() {
    let (server, client) = setup().await;

    Mock::given(any())
        .and(header("authorization", "Bearer sk_test_123"))
        .and(header("content-type", FORM_CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(universal_json()))
        .expect(9)
        .mount(&server)
        .await;

    for (operation, outcome) in call_every_operation(&client).await {
        assert!(outcome.is_ok(), "{operation} failed: {outcome:?}");
    }

    let requests = received(&server).await;
    assert_eq!(requests.len(), 9);
    for request in &requests {
        assert_eq!(header_value(request, "authorization"), Some("Bearer sk_test_123"));
        assert_eq!(header_value(request, "content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(request.headers.get_all("content-type").iter().count(), 1);
    }
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn provider_error_is_rejected_for_every_operation() {
    let (server, client) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "type": "card_error",
                "message": "Your card was declined.",
                "code": "card_declined",
                "param": "payment_method"
            }
        })))
        .mount(&server)
        .await;

    for (operation, outcome) in call_every_operation(&client).await {
        match outcome {
            Err(StripeError::Api {
                status,
                error_type,
                message,
                code,
                param,
            }) => {
                assert_eq!(status, 402, "{operation}");
                assert_eq!(error_type, "card_error");
                assert_eq!(message, "Your card was declined.");
                assert_eq!(code.as_deref(), Some("card_declined"));
                assert_eq!(param.as_deref(), Some("payment_method"));
            }
            other => panic!("{operation} returned {other:?}"),
        }
    }
}

#[tokio::test]
async fn unparsable_error_body_is_unknown_api_error() {
    let (server, client) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client.list_products().await.unwrap_err();
    match err {
        StripeError::Api {
            status,
            ref error_type,
            ref message,
            ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(error_type, "unknown");
            assert!(message.contains("503"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/products/prod_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "No such product: 'prod_missing'",
                "code": "resource_missing",
                "param": "id"
            }
        })))
        .mount(&server)
        .await;

    let err = client
        .get_product(&ProductId::new("prod_missing").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn malformed_success_body_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let err = client
        .get_price(&PriceId::new("price_456").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StripeError::Http(ref e) if e.is_decode()), "{err:?}");
}

#[tokio::test]
async fn transport_failure_is_http_error() {
    // Reserve a port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
    drop(listener);

    let client = StripeClient::new(StripeConfig::new(API_KEY).with_base_url(base_url)).unwrap();

    let err = client.list_active_prices().await.unwrap_err();
    assert!(matches!(err, StripeError::Http(_)), "{err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (server, client) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(universal_json()))
        .expect(2)
        .mount(&server)
        .await;

    let other = client.clone();
    let (products, prices) = tokio::join!(client.list_products(), other.list_active_prices());
    assert!(products.is_ok());
    assert!(prices.is_ok());
}
