//! Integration tests for the HTTP eligibility client.
//!
//! Each test spins up an Axum mock of the eligibility service on a random
//! port and exercises the real request/response contract.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::timeout;

use intake_agent::agent::{AgentDeps, IntakeAgent};
use intake_agent::config::{EligibilityConfig, FlowConfig};
use intake_agent::eligibility::{EligibilityProvider, HttpEligibilityClient, PatientDetails};
use intake_agent::error::{EligibilityError, EligibilityErrorKind};
use intake_agent::flow::{EndReason, NodeId};
use intake_agent::session::NetworkStatus;
use intake_agent::voice::{LocalRooms, ScriptedVoice};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Requests the mock received: (authorization header, body).
type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

fn in_network_body() -> Value {
    json!({
        "subscriber": { "memberId": "W123456789", "firstName": "ANNE" },
        "planStatus": [{
            "statusCode": "1",
            "status": "Active Coverage",
            "serviceTypeCodes": ["30"]
        }],
        "benefitsInformation": [{
            "code": "B",
            "name": "Co-Payment",
            "serviceTypeCodes": ["98"],
            "benefitAmount": "25",
            "inPlanNetworkIndicatorCode": "Y"
        }]
    })
}

async fn record(seen: &Seen, headers: &HeaderMap, body: Value) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    seen.lock().await.push((auth, body));
}

async fn ok(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record(&seen, &headers, body).await;
    Json(in_network_body())
}

async fn server_error(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&seen, &headers, body).await;
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "payer unavailable" })),
    )
}

async fn garbage(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> String {
    record(&seen, &headers, body).await;
    "<html>not json</html>".to_string()
}

async fn slow(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> String {
    record(&seen, &headers, body).await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    "{}".to_string()
}

/// Start the mock service on a random port, return (base url, seen requests).
async fn start_server() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/ok", post(ok))
        .route("/error", post(server_error))
        .route("/garbage", post(garbage))
        .route("/slow", post(slow))
        .with_state(Arc::clone(&seen));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), seen)
}

fn client(url: String) -> HttpEligibilityClient {
    HttpEligibilityClient::new(EligibilityConfig {
        url,
        api_key: Some(secrecy::SecretString::from("test-key")),
        timeout: Duration::from_millis(500),
        ..EligibilityConfig::default()
    })
    .unwrap()
}

fn patient() -> PatientDetails {
    PatientDetails {
        first_name: "Anne".into(),
        last_name: "Smith".into(),
        insurance_id: "W123456789".into(),
        date_of_birth: "19900105".into(),
    }
}

#[tokio::test]
async fn success_decodes_and_sends_contract() {
    timeout(TEST_TIMEOUT, async {
        let (base, seen) = start_server().await;
        let resp = client(format!("{base}/ok"))
            .check(&patient(), 0)
            .await
            .unwrap();

        assert!(resp.has_subscriber());
        assert_eq!(resp.plan_status().len(), 1);
        assert!(resp.benefits()[0].is_office_visit_copay());

        let seen = seen.lock().await;
        assert_eq!(seen.len(), 1);
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Key test-key"));
        assert_eq!(body["controlNumber"], "112233445");
        assert_eq!(body["tradingPartnerServiceId"], "60054");
        assert_eq!(body["subscriber"]["memberId"], "W123456789");
        assert_eq!(body["subscriber"]["dateOfBirth"], "19900105");
        assert_eq!(body["encounter"]["serviceTypeCodes"], json!(["30"]));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    timeout(TEST_TIMEOUT, async {
        let (base, seen) = start_server().await;
        let err = client(format!("{base}/error"))
            .check(&patient(), 0)
            .await
            .unwrap_err();

        match &err {
            EligibilityError::Status { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "payer unavailable");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(err.kind(), EligibilityErrorKind::ApiError);
        // Exactly one request, no client-side retry.
        assert_eq!(seen.lock().await.len(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    timeout(TEST_TIMEOUT, async {
        let (base, _seen) = start_server().await;
        let err = client(format!("{base}/garbage"))
            .check(&patient(), 0)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), EligibilityErrorKind::JsonError);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn slow_service_times_out() {
    timeout(TEST_TIMEOUT, async {
        let (base, _seen) = start_server().await;
        let err = client(format!("{base}/slow"))
            .check(&patient(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, EligibilityError::Timeout { .. }), "{err:?}");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn conversation_against_mock_service() {
    timeout(TEST_TIMEOUT, async {
        let (base, seen) = start_server().await;
        let rooms = Arc::new(LocalRooms::new());
        let agent = IntakeAgent::new(
            FlowConfig::default(),
            AgentDeps {
                eligibility: Arc::new(client(format!("{base}/ok"))),
                rooms: rooms.clone(),
            },
        )
        .unwrap();

        let voice = Arc::new(ScriptedVoice::new([
            "Anne",
            "yes",
            "Smith",
            "yes",
            "January 5th, 1990",
            "yes",
            "W one two three four five six seven eight nine",
            "yes",
        ]));
        let outcome = agent.run_conversation(voice.clone()).await.unwrap();

        assert_eq!(outcome.reason, EndReason::Completed);
        assert_eq!(outcome.last_node, NodeId::Goodbye);
        assert_eq!(outcome.state.flags.network_status, NetworkStatus::InNetwork);
        assert!(outcome.state.flags.insurance_verified);
        assert_eq!(rooms.open_count().await, 0);

        let prompts = voice.prompts().await;
        assert!(
            prompts
                .iter()
                .any(|p| p == "Your copay for in-network office visits is $25 dollars.")
        );

        let seen = seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1["subscriber"]["memberId"], "W123456789");
        assert_eq!(seen[0].1["subscriber"]["firstName"], "Anne");
    })
    .await
    .expect("test timed out");
}
