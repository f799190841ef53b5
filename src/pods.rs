//! Pod operations.
//!
//! Lifecycle management for provisioned compute instances: create, list,
//! inspect, stop/resume, terminate, and log retrieval, plus status-wait and
//! filtering conveniences. Every operation validates its inputs locally
//! before issuing the HTTP call.

use serde::Deserialize;
use tokio::time::sleep;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::{CreatePodRequest, ListOptions, Pod, PodStatus};
use crate::validate;

/// Default number of polls for [`Client::wait_for_pod_status`].
const DEFAULT_STATUS_WAIT_ATTEMPTS: u32 = 30;

impl Client {
    /// Creates a new pod.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing or non-positive required
    /// fields, or an API error if the pod cannot be created.
    pub async fn create_pod(&self, request: &CreatePodRequest) -> Result<Pod> {
        validate_create_pod_request(request)?;
        self.post("/pods", request).await
    }

    /// Creates a spot/interruptible pod with the given per-GPU bid.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive bid or an invalid
    /// request, or an API error if the pod cannot be created.
    pub async fn create_spot_pod(
        &self,
        request: &CreatePodRequest,
        bid_per_gpu: f64,
    ) -> Result<Pod> {
        validate::positive_f64("bidPerGpu", bid_per_gpu)?;

        let mut request = request.clone();
        request.bid_per_gpu = Some(bid_per_gpu);
        request.interruptible = Some(true);

        self.create_pod(&request).await
    }

    /// Lists all pods, optionally paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_pods(&self, opts: Option<ListOptions>) -> Result<Vec<Pod>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            pods: Vec<Pod>,
        }

        let endpoint = self.build_list_url("/pods", opts);
        let response: Response = self.get(&endpoint).await?;
        Ok(response.pods)
    }

    /// Retrieves a pod by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the pod ID is empty or the API call fails.
    pub async fn get_pod(&self, pod_id: &str) -> Result<Pod> {
        validate::required_str("podId", pod_id)?;
        self.get(&format!("/pods/{pod_id}")).await
    }

    /// Stops a running pod.
    ///
    /// # Errors
    ///
    /// Returns an error if the pod ID is empty or the API call fails.
    pub async fn stop_pod(&self, pod_id: &str) -> Result<()> {
        validate::required_str("podId", pod_id)?;
        self.post_empty(&format!("/pods/{pod_id}/stop")).await
    }

    /// Resumes a stopped pod.
    ///
    /// # Errors
    ///
    /// Returns an error if the pod ID is empty or the API call fails.
    pub async fn resume_pod(&self, pod_id: &str) -> Result<Pod> {
        validate::required_str("podId", pod_id)?;
        self.post_no_body(&format!("/pods/{pod_id}/resume")).await
    }

    /// Terminates (deletes) a pod.
    ///
    /// # Errors
    ///
    /// Returns an error if the pod ID is empty or the API call fails.
    pub async fn terminate_pod(&self, pod_id: &str) -> Result<()> {
        validate::required_str("podId", pod_id)?;
        self.delete(&format!("/pods/{pod_id}")).await
    }

    /// Retrieves logs for a pod.
    ///
    /// # Errors
    ///
    /// Returns an error if the pod ID is empty or the API call fails.
    pub async fn get_pod_logs(&self, pod_id: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            logs: String,
        }

        validate::required_str("podId", pod_id)?;
        let response: Response = self.get(&format!("/pods/{pod_id}/logs")).await?;
        Ok(response.logs)
    }

    /// Retrieves just the status of a pod.
    ///
    /// # Errors
    ///
    /// Returns an error if the pod ID is empty or the API call fails.
    pub async fn get_pod_status(&self, pod_id: &str) -> Result<PodStatus> {
        let pod = self.get_pod(pod_id).await?;
        Ok(pod.desired_status)
    }

    /// Waits for a pod to reach a specific status.
    ///
    /// Polls at the configured poll interval for up to `max_attempts`
    /// (default 30) rounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PodFailed`] when the pod reaches an unrecoverable
    /// state other than the target, [`Error::Timeout`] when the attempt
    /// budget is spent, or any error from the underlying status calls.
    pub async fn wait_for_pod_status(
        &self,
        pod_id: &str,
        target: PodStatus,
        max_attempts: Option<u32>,
    ) -> Result<Pod> {
        let max_attempts = max_attempts.filter(|n| *n > 0).unwrap_or(DEFAULT_STATUS_WAIT_ATTEMPTS);

        for _ in 0..max_attempts {
            let pod = self.get_pod(pod_id).await?;

            if pod.desired_status == target {
                return Ok(pod);
            }

            if pod.desired_status.is_error_state() {
                return Err(Error::PodFailed {
                    pod_id: pod_id.to_string(),
                    status: pod.desired_status,
                });
            }

            sleep(self.poll_interval()).await;
        }

        Err(Error::timeout(
            format!("wait for pod {pod_id} to reach {target}"),
            self.poll_interval() * max_attempts,
        ))
    }

    /// Lists pods filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_pods_by_status(
        &self,
        status: PodStatus,
        opts: Option<ListOptions>,
    ) -> Result<Vec<Pod>> {
        let pods = self.list_pods(opts).await?;
        Ok(pods
            .into_iter()
            .filter(|p| p.desired_status == status)
            .collect())
    }

    /// Lists all currently running pods.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_running_pods(&self, opts: Option<ListOptions>) -> Result<Vec<Pod>> {
        self.list_pods_by_status(PodStatus::Running, opts).await
    }

    /// Lists all stopped pods.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_stopped_pods(&self, opts: Option<ListOptions>) -> Result<Vec<Pod>> {
        self.list_pods_by_status(PodStatus::Stopped, opts).await
    }

    /// Finds a pod by name.
    ///
    /// # Errors
    ///
    /// Returns a 404-classified API error when no pod has the name, or any
    /// error from the underlying list call.
    pub async fn find_pod_by_name(&self, name: &str) -> Result<Pod> {
        validate::required_str("name", name)?;

        let pods = self.list_pods(None).await?;
        pods.into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::api(404, format!("pod with name '{name}' not found")))
    }
}

/// Validates a pod creation request before any network call.
fn validate_create_pod_request(request: &CreatePodRequest) -> Result<()> {
    validate::required_str("name", &request.name)?;
    validate::required_str("imageName", &request.image_name)?;
    validate::required_slice("gpuTypeIds", &request.gpu_type_ids)?;

    validate::positive("gpuCount", request.gpu_count)?;
    validate::positive("containerDiskInGb", request.container_disk_in_gb)?;

    if let Some(vcpu) = request.vcpu_count {
        validate::positive("vcpuCount", vcpu)?;
    }
    if let Some(memory) = request.memory_in_gb {
        validate::positive("memoryInGb", memory)?;
    }
    if let Some(volume) = request.volume_in_gb {
        validate::positive("volumeInGb", volume)?;
    }
    if let Some(bid) = request.bid_per_gpu {
        validate::positive_f64("bidPerGpu", bid)?;
    }

    if let Some(cloud_type) = request.cloud_type.as_deref() {
        if cloud_type != "SECURE" && cloud_type != "COMMUNITY" {
            return Err(Error::validation_with_value(
                "cloudType",
                "must be either 'SECURE' or 'COMMUNITY'",
                cloud_type,
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreatePodRequest {
        CreatePodRequest::new("worker", "runpod/base:0.6", vec![String::from("NVIDIA A40")])
    }

    #[test]
    fn test_validate_accepts_minimal_request() {
        assert!(validate_create_pod_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_required_fields() {
        let mut request = valid_request();
        request.name = String::new();
        assert!(validate_create_pod_request(&request).is_err());

        let mut request = valid_request();
        request.image_name = String::new();
        assert!(validate_create_pod_request(&request).is_err());

        let mut request = valid_request();
        request.gpu_type_ids.clear();
        assert!(validate_create_pod_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_sizes() {
        let mut request = valid_request();
        request.gpu_count = 0;
        assert!(validate_create_pod_request(&request).is_err());

        let mut request = valid_request();
        request.vcpu_count = Some(0);
        assert!(validate_create_pod_request(&request).is_err());

        let mut request = valid_request();
        request.bid_per_gpu = Some(-0.1);
        assert!(validate_create_pod_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_cloud_type() {
        let mut request = valid_request();
        request.cloud_type = Some(String::from("HYBRID"));

        let err = validate_create_pod_request(&request).unwrap_err();
        match err {
            Error::Validation { field, value, .. } => {
                assert_eq!(field, "cloudType");
                assert_eq!(value.as_deref(), Some("HYBRID"));
            }
            other => panic!("unexpected variant: {other}"),
        }

        let mut request = valid_request();
        request.cloud_type = Some(String::from("COMMUNITY"));
        assert!(validate_create_pod_request(&request).is_ok());
    }
}
