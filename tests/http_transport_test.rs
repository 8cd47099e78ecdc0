use pgeasy::application::facade::PaymentFacade;
use pgeasy::domain::payment::{Credentials, PaymentRequest, PaymentResult};
use pgeasy::domain::ports::Transport;
use pgeasy::domain::provider::{
    AuthScheme, ConfiguredModule, KakaoPayModule, PaymentModule, ResponseContract,
};
use pgeasy::domain::registry::ModuleRegistry;
use pgeasy::domain::request::RequestBuilder;
use pgeasy::error::TransportError;
use pgeasy::infrastructure::http::HttpTransport;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn toss_like(base_url: &str) -> ConfiguredModule {
    ConfiguredModule::new("Toss mock", AuthScheme::Basic)
        .session_url(format!("{base_url}/v1/payments"))
        .approval_url(format!("{base_url}/v1/payments/confirm"))
        .contract(ResponseContract {
            status_field: Some("status".to_string()),
            success_values: vec!["DONE".to_string()],
            payment_id_field: "paymentKey".to_string(),
            ..ResponseContract::default()
        })
}

fn facade(server: &MockServer, credentials: Credentials) -> PaymentFacade {
    let transport = HttpTransport::new(&credentials).unwrap();
    let registry = ModuleRegistry::new();
    registry.register("TOSS", Arc::new(toss_like(&server.uri())));
    PaymentFacade::with_registry(credentials, registry, Arc::new(transport))
}

#[tokio::test]
async fn test_approval_sends_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/confirm"))
        .and(header("Authorization", "Basic dGVzdF9za19hYmM6"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(
            json!({"paymentKey": "pk_123", "orderId": "o-1", "amount": 1000}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "DONE", "paymentKey": "pk_123"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let payload = PaymentRequest::new()
        .with("paymentKey", "pk_123")
        .with("orderId", "o-1")
        .with("amount", 1000);
    let result = facade(&server, Credentials::new("test_sk_abc"))
        .approve_payment_with(&payload, "test_sk_abc", "TOSS")
        .await
        .unwrap();

    assert_eq!(result, PaymentResult::success("pk_123"));
}

#[tokio::test]
async fn test_error_status_body_is_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/confirm"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NOT_FOUND_PAYMENT",
            "message": "존재하지 않는 결제 정보 입니다."
        })))
        .mount(&server)
        .await;

    let result = facade(&server, Credentials::new("sk"))
        .approve_payment("sk", "TOSS")
        .await
        .unwrap();

    assert_eq!(
        result,
        PaymentResult::failure(404, "존재하지 않는 결제 정보 입니다.")
    );
}

#[tokio::test]
async fn test_timeout_resolves_to_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "DONE", "paymentKey": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let credentials = Credentials::new("sk").with_timeout(Duration::from_millis(200));
    let result = facade(&server, credentials)
        .approve_payment("sk", "TOSS")
        .await
        .unwrap();

    assert_eq!(
        result,
        PaymentResult::failure(500, "Error approving payment")
    );
}

#[tokio::test]
async fn test_transport_reports_timeout_variant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let module = ConfiguredModule::new("slow", AuthScheme::Basic)
        .approval_url(format!("{}/slow", server.uri()));
    let request =
        RequestBuilder::build_approval_request(&module, &PaymentRequest::new(), "sk").unwrap();

    let credentials = Credentials::new("sk").with_timeout(Duration::from_millis(200));
    let transport = HttpTransport::new(&credentials).unwrap();
    assert_eq!(
        transport.execute(&request).await,
        Err(TransportError::Timeout)
    );
}

#[tokio::test]
async fn test_connection_refused_resolves_to_failure() {
    // Nothing listens on the discard port.
    let credentials = Credentials::new("sk").with_timeout(Duration::from_secs(2));
    let registry = ModuleRegistry::new();
    registry.register(
        "DOWN",
        Arc::new(
            ConfiguredModule::new("down", AuthScheme::Basic)
                .approval_url("http://127.0.0.1:9/x"),
        ),
    );
    let facade = PaymentFacade::with_registry(
        credentials.clone(),
        registry,
        Arc::new(HttpTransport::new(&credentials).unwrap()),
    );

    let result = facade.approve_payment("sk", "DOWN").await.unwrap();
    assert_eq!(
        result,
        PaymentResult::failure(500, "Error approving payment")
    );
}

#[tokio::test]
async fn test_kakao_secret_key_header_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/online/v1/payment/approve"))
        .and(header("Authorization", "SECRET_KEY DEV123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"tid": "T555"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Same auth scheme and contract as the built-in KakaoPay module, pointed at the mock.
    let kakao = KakaoPayModule::new();
    let module = ConfiguredModule::new("KakaoPay mock", AuthScheme::prefixed("SECRET_KEY"))
        .approval_url(format!("{}/online/v1/payment/approve", server.uri()))
        .contract(kakao.response_contract().clone());

    let credentials = Credentials::new("DEV123");
    let registry = ModuleRegistry::new();
    registry.register("KAKAO", Arc::new(module));
    let facade = PaymentFacade::with_registry(
        credentials.clone(),
        registry,
        Arc::new(HttpTransport::new(&credentials).unwrap()),
    );

    let result = facade.approve_payment("DEV123", "KAKAO").await.unwrap();
    assert_eq!(result, PaymentResult::success("T555"));
}
