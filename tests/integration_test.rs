use patient_risk_assessment::clients::AssessmentClient;
use patient_risk_assessment::config::Config;
use patient_risk_assessment::error::{ApiError, AppError};
use patient_risk_assessment::models::AssessmentResults;
use patient_risk_assessment::orchestrator::fetch_all_patients;
use patient_risk_assessment::workflow::AssessmentFlow;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn test_config(server: &MockServer) -> Config {
    Config {
        api_base_url: server.uri(),
        api_key: API_KEY.to_string(),
        backoff_unit_ms: 1,
        request_timeout_secs: 5,
        ..Config::default()
    }
}

fn page_body(page: u32, total_pages: u32, patients: Value) -> Value {
    json!({
        "data": patients,
        "pagination": {
            "page": page,
            "limit": 2,
            "total": total_pages * 2,
            "totalPages": total_pages,
            "hasNext": page < total_pages,
            "hasPrevious": page > 1
        },
        "metadata": {
            "timestamp": "2025-07-15T23:01:05.059Z",
            "version": "v1.0",
            "requestId": "req-1"
        }
    })
}

fn ids(prefix: &str, count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| json!({"patient_id": format!("{}{}", prefix, i), "age": 30, "blood_pressure": "110/70", "temperature": 98.2}))
            .collect(),
    )
}

fn submission_response() -> Value {
    let category = json!({"score": 10, "max": 10, "correct": 1, "submitted": 1, "matches": 1});
    json!({
        "success": true,
        "message": "Assessment submitted successfully",
        "results": {
            "score": 30,
            "percentage": 100,
            "status": "PASS",
            "breakdown": {
                "high_risk": category,
                "fever": category,
                "data_quality": category
            },
            "feedback": {"strengths": ["All categories correct"], "issues": []},
            "attempt_number": 1,
            "remaining_attempts": 2,
            "is_personal_best": true,
            "can_resubmit": true
        }
    })
}

async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("page", page.to_string()))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetches_every_page_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(1, 3, ids("A", 2))).await;
    mount_page(&server, 2, page_body(2, 3, ids("B", 2))).await;
    mount_page(&server, 3, page_body(3, 3, ids("C", 1))).await;

    let client = assert_ok!(AssessmentClient::new(&test_config(&server)));
    let mut progress = Vec::new();
    let mut on_progress = |p: f64| progress.push(p);

    let patients = assert_ok!(fetch_all_patients(&client, 2, Some(&mut on_progress)).await);

    let order: Vec<&str> = patients.iter().map(|p| p.patient_id.as_str()).collect();
    assert_eq!(order, vec!["A0", "A1", "B0", "B1", "C0"]);
    assert_eq!(progress.len(), 3);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last().copied(), Some(100.0));
}

#[tokio::test]
async fn test_total_pages_fixed_by_first_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(1, 2, ids("A", 2))).await;
    // 第 2 页声称共 5 页，应被忽略
    mount_page(&server, 2, page_body(2, 5, ids("B", 2))).await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(3, 5, ids("C", 2))))
        .expect(0)
        .mount(&server)
        .await;

    let client = assert_ok!(AssessmentClient::new(&test_config(&server)));
    let patients = assert_ok!(fetch_all_patients(&client, 2, None).await);
    assert_eq!(patients.len(), 4);
}

#[tokio::test]
async fn test_rate_limit_then_server_error_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, ids("P", 3))))
        .mount(&server)
        .await;

    let client = assert_ok!(AssessmentClient::new(&test_config(&server)));
    let page = assert_ok!(client.fetch_patient_page(1, 10).await);
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.pagination.total_pages, 1);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 3, "两次重试，共三次请求");
}

#[tokio::test]
async fn test_malformed_page_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null, "pagination": {}})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, ids("P", 1))))
        .mount(&server)
        .await;

    let client = assert_ok!(AssessmentClient::new(&test_config(&server)));
    let patients = assert_ok!(fetch_all_patients(&client, 10, None).await);
    assert_eq!(patients.len(), 1);
}

#[tokio::test]
async fn test_server_error_on_last_attempt_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        page_max_attempts: 2,
        ..test_config(&server)
    };
    let client = assert_ok!(AssessmentClient::new(&config));
    let err = assert_err!(client.fetch_patient_page(1, 10).await);
    match err {
        AppError::Api(ApiError::ServerError {
            status,
            status_text,
            ..
        }) => {
            assert_eq!(status, 503);
            assert_eq!(status_text, "Service Unavailable");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_on_every_attempt_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let config = Config {
        page_max_attempts: 3,
        ..test_config(&server)
    };
    let client = assert_ok!(AssessmentClient::new(&config));
    let err = assert_err!(client.fetch_patient_page(1, 10).await);
    assert!(matches!(
        err,
        AppError::Api(ApiError::RetryExhausted { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn test_validation_failure_on_last_attempt_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        page_max_attempts: 2,
        ..test_config(&server)
    };
    let client = assert_ok!(AssessmentClient::new(&config));
    let err = assert_err!(client.fetch_patient_page(1, 10).await);
    assert!(matches!(err, AppError::Api(ApiError::ValidationFailure { .. })));
}

#[tokio::test]
async fn test_page_with_null_envelope_fields_is_accepted() {
    let server = MockServer::start().await;
    let body = json!({
        "data": ids("N", 2),
        "pagination": {
            "page": 1,
            "limit": 10,
            "total": null,
            "totalPages": 1,
            "hasNext": null,
            "hasPrevious": false
        },
        "metadata": {"timestamp": null, "version": "v1.0", "requestId": null}
    });
    mount_page(&server, 1, body).await;

    let client = assert_ok!(AssessmentClient::new(&test_config(&server)));
    let patients = assert_ok!(fetch_all_patients(&client, 10, None).await);
    assert_eq!(patients.len(), 2);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "一次请求即成功，不应重试");
}

#[tokio::test]
async fn test_client_error_once_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, ids("P", 2))))
        .mount(&server)
        .await;

    let client = assert_ok!(AssessmentClient::new(&test_config(&server)));
    let page = assert_ok!(client.fetch_patient_page(1, 10).await);
    assert_eq!(page.data.len(), 2);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2, "404 之后重试一次");
}

#[tokio::test]
async fn test_client_error_on_every_attempt_is_validation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        page_max_attempts: 2,
        ..test_config(&server)
    };
    let client = assert_ok!(AssessmentClient::new(&config));
    let err = assert_err!(client.fetch_patient_page(1, 10).await);
    assert!(matches!(err, AppError::Api(ApiError::ValidationFailure { .. })));
}

#[tokio::test]
async fn test_undecodable_body_on_last_attempt_reraises_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        page_max_attempts: 2,
        ..test_config(&server)
    };
    let client = assert_ok!(AssessmentClient::new(&config));
    let err = assert_err!(client.fetch_patient_page(1, 10).await);
    assert!(matches!(err, AppError::Api(ApiError::Transport { .. })));
}

#[tokio::test]
async fn test_failing_page_aborts_whole_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(1, 2, ids("A", 2))).await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        page_max_attempts: 2,
        ..test_config(&server)
    };
    let client = assert_ok!(AssessmentClient::new(&config));
    let err = assert_err!(fetch_all_patients(&client, 2, None).await);
    assert!(matches!(err, AppError::Api(ApiError::ServerError { .. })));
}

#[tokio::test]
async fn test_submit_returns_server_result_verbatim() {
    let server = MockServer::start().await;
    let payload = AssessmentResults {
        high_risk_patients: vec!["A".to_string()],
        fever_patients: vec![],
        data_quality_issues: vec!["C".to_string()],
    };
    Mock::given(method("POST"))
        .and(path("/submit-assessment"))
        .and(header("x-api-key", API_KEY))
        .and(body_json(json!({
            "high_risk_patients": ["A"],
            "fever_patients": [],
            "data_quality_issues": ["C"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(submission_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = assert_ok!(AssessmentClient::new(&test_config(&server)));
    let response = assert_ok!(client.submit_assessment(&payload).await);
    assert!(response.success);
    assert_eq!(response.results.status, "PASS");
    assert_eq!(response.results.percentage, 100.0);
    assert_eq!(response.results.remaining_attempts, 2);
    assert_eq!(response.results.breakdown.fever.max, 10.0);
    assert_eq!(response.results.feedback.strengths, vec!["All categories correct"]);
}

#[tokio::test]
async fn test_full_flow_classifies_and_submits() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        page_body(
            1,
            1,
            json!([
                {"patient_id": "DEMO001", "blood_pressure": "150/95", "temperature": 101.2, "age": 70},
                {"patient_id": "DEMO002", "blood_pressure": "110/70", "temperature": 98.0, "age": 30},
                {"patient_id": "DEMO003", "blood_pressure": null, "temperature": "", "age": 50}
            ]),
        ),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/submit-assessment"))
        .and(body_json(json!({
            "high_risk_patients": ["DEMO001"],
            "fever_patients": ["DEMO001"],
            "data_quality_issues": ["DEMO003"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(submission_response()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = assert_ok!(AssessmentFlow::new(&test_config(&server)));
    let outcome = assert_ok!(flow.run(None).await);

    assert_eq!(outcome.patients.len(), 3);
    let flags: Vec<bool> = outcome
        .assessments
        .iter()
        .map(|a| a.has_data_quality_issues)
        .collect();
    assert_eq!(flags, vec![false, false, true]);
    assert_eq!(outcome.assessment_for("DEMO002").map(|a| a.total_risk), Some(0));
    assert_eq!(outcome.summary().high_risk, 1);
    assert!(outcome.response.is_some());
}

#[tokio::test]
async fn test_dry_run_skips_submission() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(1, 1, ids("P", 2))).await;
    Mock::given(method("POST"))
        .and(path("/submit-assessment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(submission_response()))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        dry_run: true,
        ..test_config(&server)
    };
    let flow = assert_ok!(AssessmentFlow::new(&config));
    let outcome = assert_ok!(flow.run(None).await);
    assert_eq!(outcome.assessments.len(), 2);
    assert!(outcome.response.is_none());
}
