//! Serverless job operations.
//!
//! Submission, status, cancellation and queue management for jobs on
//! serverless endpoints, plus the wait-until-terminal polling helpers and the
//! continuous streaming engine.
//!
//! All status observation is pull-based: the remote API only exposes status
//! endpoints, so "streaming" polls the stream endpoint and emits change-only
//! updates (deep structural equality on the output payload) over a channel.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::{EndpointHealth, Job, JobStatus, RunJobRequest};
use crate::validate;

/// Default wall-clock bound for [`Client::wait_for_completion`].
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);

/// Default poll interval for [`Client::stream_continuous`].
const DEFAULT_STREAM_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Wall-clock bound for the async fallback in [`Client::quick_run`].
const QUICK_RUN_MAX_WAIT: Duration = Duration::from_secs(300);

impl Client {
    /// Submits an asynchronous job to a serverless endpoint.
    ///
    /// Returns immediately with a job carrying the ID to poll later.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint ID is empty, the input cannot be
    /// serialized, or the API call fails.
    pub async fn run_async<I: Serialize>(&self, endpoint_id: &str, input: I) -> Result<Job> {
        validate::required_str("endpointId", endpoint_id)?;

        let request = RunJobRequest {
            input: encode_input(input)?,
        };
        self.post(&format!("/v2/{endpoint_id}/run"), &request).await
    }

    /// Submits a synchronous job and waits server-side for its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint ID is empty, the input cannot be
    /// serialized, or the API call fails.
    pub async fn run_sync<I: Serialize>(&self, endpoint_id: &str, input: I) -> Result<Job> {
        validate::required_str("endpointId", endpoint_id)?;

        let request = RunJobRequest {
            input: encode_input(input)?,
        };
        self.post(&format!("/v2/{endpoint_id}/runsync"), &request)
            .await
    }

    /// Retrieves the status and results of a job.
    ///
    /// # Errors
    ///
    /// Returns an error if either ID is empty or the API call fails.
    pub async fn get_job_status(&self, endpoint_id: &str, job_id: &str) -> Result<Job> {
        validate::required_str("endpointId", endpoint_id)?;
        validate::required_str("jobId", job_id)?;

        self.get(&format!("/v2/{endpoint_id}/status/{job_id}")).await
    }

    /// Cancels a queued or running job.
    ///
    /// # Errors
    ///
    /// Returns an error if either ID is empty or the API call fails.
    pub async fn cancel_job(&self, endpoint_id: &str, job_id: &str) -> Result<()> {
        validate::required_str("endpointId", endpoint_id)?;
        validate::required_str("jobId", job_id)?;

        self.post_empty(&format!("/v2/{endpoint_id}/cancel/{job_id}"))
            .await
    }

    /// Retries a failed or timed-out job with the same ID and input.
    ///
    /// # Errors
    ///
    /// Returns an error if either ID is empty or the API call fails.
    pub async fn retry_job(&self, endpoint_id: &str, job_id: &str) -> Result<Job> {
        validate::required_str("endpointId", endpoint_id)?;
        validate::required_str("jobId", job_id)?;

        self.post_no_body(&format!("/v2/{endpoint_id}/retry/{job_id}"))
            .await
    }

    /// Clears all pending jobs from the endpoint queue.
    ///
    /// Jobs already running are not affected.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint ID is empty or the API call fails.
    pub async fn purge_queue(&self, endpoint_id: &str) -> Result<()> {
        validate::required_str("endpointId", endpoint_id)?;

        self.post_empty(&format!("/v2/{endpoint_id}/purge-queue"))
            .await
    }

    /// Checks the operational status of an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint ID is empty or the API call fails.
    pub async fn get_health(&self, endpoint_id: &str) -> Result<EndpointHealth> {
        validate::required_str("endpointId", endpoint_id)?;

        self.get(&format!("/v2/{endpoint_id}/health")).await
    }

    /// Retrieves partial/streaming results from a job.
    ///
    /// Useful for jobs that generate output incrementally, such as text
    /// generation.
    ///
    /// # Errors
    ///
    /// Returns an error if either ID is empty or the API call fails.
    pub async fn stream_results(&self, endpoint_id: &str, job_id: &str) -> Result<Job> {
        validate::required_str("endpointId", endpoint_id)?;
        validate::required_str("jobId", job_id)?;

        self.get(&format!("/v2/{endpoint_id}/stream/{job_id}")).await
    }

    /// Waits for a job to reach a terminal state.
    ///
    /// Polls the status endpoint at the configured poll interval until the
    /// job completes or `max_wait` (default 10 minutes) elapses. Dropping the
    /// returned future cancels the wait.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JobFailed`] carrying the final job when it ends as
    /// FAILED, CANCELLED or `TIMED_OUT`; [`Error::Timeout`] when the deadline
    /// elapses first; or any error from the underlying status calls.
    pub async fn wait_for_completion(
        &self,
        endpoint_id: &str,
        job_id: &str,
        max_wait: Option<Duration>,
    ) -> Result<Job> {
        let max_wait = max_wait
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_MAX_WAIT);
        let deadline = Instant::now() + max_wait;

        while Instant::now() < deadline {
            let job = self.get_job_status(endpoint_id, job_id).await?;

            match job.status {
                JobStatus::Completed => return Ok(job),
                status if status.is_terminal() => {
                    return Err(Error::JobFailed { job: Box::new(job) });
                }
                _ => {}
            }

            sleep(self.poll_interval()).await;
        }

        Err(Error::timeout(format!("wait for job {job_id}"), max_wait))
    }

    /// Waits for a set of jobs to reach terminal states.
    ///
    /// Each round re-queries only the jobs not yet terminal; fetches are
    /// strictly sequential. Results are returned in the order of `job_ids`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `job_ids` is empty, a timeout error
    /// reporting how many of the jobs finished when the deadline elapses, or
    /// any error from the underlying status calls.
    pub async fn wait_for_jobs(
        &self,
        endpoint_id: &str,
        job_ids: &[String],
        max_wait: Option<Duration>,
    ) -> Result<Vec<Job>> {
        validate::required_slice("jobIds", job_ids)?;

        let max_wait = max_wait
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_MAX_WAIT);
        let deadline = Instant::now() + max_wait;

        let mut results: Vec<Option<Job>> = vec![None; job_ids.len()];

        while Instant::now() < deadline {
            let mut all_terminal = true;

            for (i, job_id) in job_ids.iter().enumerate() {
                if results[i].is_some() {
                    continue;
                }

                let job = self.get_job_status(endpoint_id, job_id).await?;
                if job.is_terminal() {
                    results[i] = Some(job);
                } else {
                    all_terminal = false;
                }
            }

            if all_terminal {
                return Ok(results.into_iter().flatten().collect());
            }

            sleep(self.poll_interval()).await;
        }

        let completed = results.iter().filter(|r| r.is_some()).count();
        Err(Error::timeout(
            format!(
                "wait for jobs on endpoint {endpoint_id} ({completed} of {} terminal)",
                job_ids.len()
            ),
            max_wait,
        ))
    }

    /// Submits multiple jobs to the same endpoint asynchronously.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `inputs` is empty, or the first
    /// submission error encountered.
    pub async fn submit_jobs(&self, endpoint_id: &str, inputs: Vec<Value>) -> Result<Vec<Job>> {
        validate::required_str("endpointId", endpoint_id)?;
        validate::required_slice("inputs", &inputs)?;

        let mut jobs = Vec::with_capacity(inputs.len());
        for input in inputs {
            jobs.push(self.run_async(endpoint_id, input).await?);
        }
        Ok(jobs)
    }

    /// Submits a job asynchronously and waits for completion.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::run_async`] or
    /// [`Self::wait_for_completion`].
    pub async fn run_and_wait<I: Serialize>(
        &self,
        endpoint_id: &str,
        input: I,
        max_wait: Option<Duration>,
    ) -> Result<Job> {
        let job = self.run_async(endpoint_id, input).await?;
        self.wait_for_completion(endpoint_id, &job.id, max_wait)
            .await
    }

    /// Runs a job with reasonable defaults: synchronous first, falling back
    /// to async submission plus a bounded wait when the sync call fails.
    ///
    /// # Errors
    ///
    /// Returns the validation error from a bad input immediately, or the
    /// fallback path's error when both attempts fail.
    pub async fn quick_run(&self, endpoint_id: &str, input: Value) -> Result<Job> {
        match self.run_sync(endpoint_id, &input).await {
            Ok(job) => Ok(job),
            Err(e) if e.is_validation() => Err(e),
            Err(e) => {
                debug!("sync run failed, falling back to async: {e}");
                self.run_and_wait(endpoint_id, &input, Some(QUICK_RUN_MAX_WAIT))
                    .await
            }
        }
    }

    /// Polls the stream endpoint continuously for change-driven updates.
    ///
    /// Spawns a background task that fetches the job's (possibly partial)
    /// output every `poll_interval` (default 2 seconds) and emits the job on
    /// the update channel whenever the output differs structurally from the
    /// last emitted one. The task stops, closing both channels together,
    /// when a terminal status is observed, when a fetch fails (the error is
    /// emitted on the error channel first), or when `cancel` fires (a
    /// cancellation error is emitted). Cancellation is observed before every
    /// fetch and during every wait.
    #[must_use]
    pub fn stream_continuous(
        &self,
        endpoint_id: &str,
        job_id: &str,
        poll_interval: Option<Duration>,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<Job>, mpsc::Receiver<Error>) {
        let poll_interval = poll_interval
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_STREAM_POLL_INTERVAL);

        let (job_tx, job_rx) = mpsc::channel::<Job>(1);
        let (err_tx, err_rx) = mpsc::channel::<Error>(1);

        let client = self.clone();
        let endpoint_id = endpoint_id.to_string();
        let job_id = job_id.to_string();

        tokio::spawn(async move {
            let mut last_output: Option<Value> = None;

            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        let _ = err_tx.try_send(Error::cancelled(format!("stream job {job_id}")));
                        return;
                    }
                    () = sleep(poll_interval) => {}
                }

                let job = tokio::select! {
                    () = cancel.cancelled() => {
                        let _ = err_tx.try_send(Error::cancelled(format!("stream job {job_id}")));
                        return;
                    }
                    result = client.stream_results(&endpoint_id, &job_id) => match result {
                        Ok(job) => job,
                        Err(e) => {
                            let _ = err_tx.send(e).await;
                            return;
                        }
                    }
                };

                let terminal = job.is_terminal();

                if job.output != last_output {
                    last_output.clone_from(&job.output);
                    tokio::select! {
                        () = cancel.cancelled() => {
                            let _ = err_tx.try_send(
                                Error::cancelled(format!("stream job {job_id}")),
                            );
                            return;
                        }
                        sent = job_tx.send(job) => {
                            if sent.is_err() {
                                // Receiver dropped; nobody is listening.
                                return;
                            }
                        }
                    }
                }

                if terminal {
                    return;
                }
            }
        });

        (job_rx, err_rx)
    }
}

/// Serializes a job input payload.
fn encode_input<I: Serialize>(input: I) -> Result<Value> {
    serde_json::to_value(input)
        .map_err(|e| Error::decode(format!("failed to marshal job input: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_ids_fail_validation_before_any_request() {
        let client = Client::new("test_key").expect("client should build");

        let err = client.run_async("", json!({})).await.unwrap_err();
        assert!(err.is_validation());

        let err = client.get_job_status("ep1", "").await.unwrap_err();
        assert!(err.is_validation());

        let err = client.cancel_job("", "job-1").await.unwrap_err();
        assert!(err.is_validation());

        let err = client.purge_queue("").await.unwrap_err();
        assert!(err.is_validation());

        let err = client
            .wait_for_jobs("ep1", &[], None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
