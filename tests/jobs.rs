//! Serverless job tests: submission, polling to completion, and streaming.

use std::time::Duration;

use runpod_client::{Client, Error, JobStatus};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> Client {
    Client::builder("test_key_1234567890")
        .base_url(&server.uri())
        .serverless_base_url(&server.uri())
        .retry_delay(Duration::from_millis(5))
        .poll_interval(Duration::from_millis(10))
        .build()
        .expect("client should build")
}

fn job_body(id: &str, status: &str) -> serde_json::Value {
    json!({"id": id, "status": status})
}

#[tokio::test]
async fn run_async_posts_wrapped_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/ep1/run"))
        .and(body_partial_json(json!({"input": {"prompt": "hello"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_body("job-1", "IN_QUEUE")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let job = client
        .run_async("ep1", json!({"prompt": "hello"}))
        .await
        .expect("submission should succeed");

    assert_eq!(job.id, "job-1");
    assert_eq!(job.status, JobStatus::InQueue);
    assert!(!job.is_terminal());
}

#[tokio::test]
async fn run_sync_returns_completed_job_with_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/ep1/runsync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "status": "COMPLETED",
            "output": {"text": "done"},
            "executionTimeMs": 1234,
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let job = client
        .run_sync("ep1", json!({"prompt": "hello"}))
        .await
        .expect("sync run should succeed");

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.output, Some(json!({"text": "done"})));
    assert_eq!(job.execution_time_ms, Some(1234));
}

#[tokio::test]
async fn wait_for_completion_polls_until_completed() {
    let server = MockServer::start().await;

    // Status advances IN_QUEUE -> IN_PROGRESS -> COMPLETED over three polls.
    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_body("job-1", "IN_QUEUE")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_body("job-1", "IN_PROGRESS")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "status": "COMPLETED",
            "output": {"text": "done"},
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let job = client
        .wait_for_completion("ep1", "job-1", Some(Duration::from_secs(5)))
        .await
        .expect("job should complete");

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.output, Some(json!({"text": "done"})));
}

#[tokio::test]
async fn wait_for_completion_surfaces_failed_job() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "status": "FAILED",
            "error": "CUDA out of memory",
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .wait_for_completion("ep1", "job-1", Some(Duration::from_secs(5)))
        .await
        .unwrap_err();

    match err {
        Error::JobFailed { job } => {
            assert_eq!(job.status, JobStatus::Failed);
            assert_eq!(job.error_text(), "CUDA out of memory");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn wait_for_completion_times_out_on_stuck_job() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_body("job-1", "IN_QUEUE")),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .wait_for_completion("ep1", "job-1", Some(Duration::from_millis(100)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }), "unexpected: {err}");
}

#[tokio::test]
async fn wait_for_jobs_returns_results_in_submission_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_body("job-a", "COMPLETED")),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_body("job-b", "IN_PROGRESS")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/status/job-b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_body("job-b", "COMPLETED")),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let jobs = client
        .wait_for_jobs(
            "ep1",
            &[String::from("job-a"), String::from("job-b")],
            Some(Duration::from_secs(5)),
        )
        .await
        .expect("all jobs should finish");

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, "job-a");
    assert_eq!(jobs[1].id, "job-b");
}

#[tokio::test]
async fn cancel_and_purge_hit_the_job_queue_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/ep1/cancel/job-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/ep1/purge-queue"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.cancel_job("ep1", "job-1").await.expect("cancel");
    client.purge_queue("ep1").await.expect("purge");
}

#[tokio::test]
async fn stream_emits_one_update_per_distinct_output() {
    let server = MockServer::start().await;

    // Same partial output twice, then a new output with terminal status; the
    // duplicate must not produce a second update.
    Mock::given(method("GET"))
        .and(path("/v2/ep1/stream/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "status": "IN_PROGRESS",
            "output": {"tokens": "hel"},
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/stream/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "status": "COMPLETED",
            "output": {"tokens": "hello"},
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let (mut job_rx, mut err_rx) = client.stream_continuous(
        "ep1",
        "job-1",
        Some(Duration::from_millis(10)),
        CancellationToken::new(),
    );

    let mut updates = Vec::new();
    while let Some(job) = job_rx.recv().await {
        updates.push(job);
    }

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].output, Some(json!({"tokens": "hel"})));
    assert_eq!(updates[1].output, Some(json!({"tokens": "hello"})));
    assert_eq!(updates[1].status, JobStatus::Completed);

    // Both channels close together after the terminal update, with no error.
    assert!(err_rx.recv().await.is_none());
}

#[tokio::test]
async fn stream_cancellation_emits_cancelled_error_and_stops() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/stream/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "status": "IN_PROGRESS",
            "output": {"tokens": "hel"},
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cancel = CancellationToken::new();
    let (mut job_rx, mut err_rx) = client.stream_continuous(
        "ep1",
        "job-1",
        Some(Duration::from_millis(10)),
        cancel.clone(),
    );

    // First update proves the stream is live, then cancel.
    let first = job_rx.recv().await.expect("one update before cancel");
    assert_eq!(first.status, JobStatus::InProgress);
    cancel.cancel();

    let err = err_rx.recv().await.expect("cancellation error");
    assert!(matches!(err, Error::Cancelled { .. }), "unexpected: {err}");
    assert!(job_rx.recv().await.is_none());
}

#[tokio::test]
async fn stream_surfaces_fetch_errors_on_the_error_channel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/ep1/stream/job-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let (mut job_rx, mut err_rx) = client.stream_continuous(
        "ep1",
        "job-1",
        Some(Duration::from_millis(10)),
        CancellationToken::new(),
    );

    let err = err_rx.recv().await.expect("fetch error");
    assert!(err.is_not_found());
    assert!(job_rx.recv().await.is_none());
}
