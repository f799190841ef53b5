//! `RunPod` API types and data structures.
//!
//! Wire types for the REST resource API and the serverless job-queue API.
//! Response types are deliberately lenient (`#[serde(default)]` on fields the
//! API omits depending on lifecycle stage); request types skip unset optional
//! fields so the serialized body only carries what the caller chose.
//!
//! A number of shapes (templates, endpoints, GPU types, datacenters, account
//! info, network volumes) have no façade operations yet and exist purely as
//! data-transfer types for future additions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination options for list operations.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    /// Maximum number of items to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of items to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl ListOptions {
    /// Renders the options as a query string, or `None` when nothing is set.
    #[must_use]
    pub fn to_query(self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            parts.push(format!("limit={limit}"));
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            parts.push(format!("offset={offset}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("&"))
        }
    }
}

// =========================
// SERVERLESS JOBS
// =========================

/// Lifecycle status of a serverless job.
///
/// Transitions are driven entirely server-side; the client only observes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Waiting for a worker.
    InQueue,
    /// Picked up by a worker.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
    /// Exceeded its execution time limit.
    TimedOut,
    /// Status string the client does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Returns true if no further transition can occur from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::TimedOut
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::InQueue => "IN_QUEUE",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::TimedOut => "TIMED_OUT",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{status}")
    }
}

/// A unit of work submitted to a serverless endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Job identifier assigned on submission.
    pub id: String,
    /// Current lifecycle status.
    #[serde(default)]
    pub status: JobStatus,
    /// The submitted input payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Output payload, present once the job completes (possibly partial on
    /// the streaming endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// Error message, present when the job failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When a worker started the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Execution duration in milliseconds.
    #[serde(
        default,
        rename = "executionTimeMs",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_time_ms: Option<i64>,
    /// How many times the job has been retried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    /// The endpoint the job was submitted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
}

impl Job {
    /// Returns true if the job is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the job's error message, or a placeholder when absent.
    #[must_use]
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("no error message")
    }
}

/// Body of a job submission request.
#[derive(Debug, Clone, Serialize)]
pub struct RunJobRequest {
    /// Opaque handler input.
    pub input: Value,
}

/// Operational snapshot of a serverless endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointHealth {
    /// Overall status reported by the endpoint.
    #[serde(default)]
    pub status: String,
    /// Jobs currently queued.
    #[serde(default)]
    pub jobs_in_queue: u32,
    /// Idle workers.
    #[serde(default)]
    pub workers_idle: u32,
    /// Workers processing jobs.
    #[serde(default)]
    pub workers_active: u32,
    /// Total provisioned workers.
    #[serde(default)]
    pub workers_total: u32,
}

// =========================
// PODS
// =========================

/// Lifecycle status of a pod.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PodStatus {
    /// Provisioned but not yet started.
    Created,
    /// Container is running.
    Running,
    /// Stopped by the user.
    Stopped,
    /// Container exited.
    Exited,
    /// Machine-level failure.
    Dead,
    /// Terminated and being reclaimed.
    Terminated,
    /// Failed to start.
    Failed,
    /// Status string the client does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PodStatus {
    /// Returns true for statuses a pod cannot recover from on its own.
    #[must_use]
    pub const fn is_error_state(self) -> bool {
        matches!(
            self,
            Self::Exited | Self::Dead | Self::Terminated | Self::Failed
        )
    }
}

impl std::fmt::Display for PodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::Created => "CREATED",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
            Self::Exited => "EXITED",
            Self::Dead => "DEAD",
            Self::Terminated => "TERMINATED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{status}")
    }
}

/// A provisioned compute instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    /// Unique pod identifier.
    pub id: String,
    /// Pod name.
    #[serde(default)]
    pub name: String,
    /// Status the platform is driving the pod towards.
    #[serde(default)]
    pub desired_status: PodStatus,
    /// Container image.
    #[serde(default, rename = "image")]
    pub image_name: String,
    /// Number of attached GPUs.
    #[serde(default)]
    pub gpu_count: u32,
    /// Number of vCPUs.
    #[serde(default)]
    pub vcpu_count: u32,
    /// Memory in GB.
    #[serde(default)]
    pub memory_in_gb: u32,
    /// Container disk in GB.
    #[serde(default)]
    pub container_disk_in_gb: u32,
    /// Persistent volume in GB.
    #[serde(default)]
    pub volume_in_gb: u32,
    /// Where the volume is mounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mount_path: Option<String>,
    /// Hourly cost as reported by the API.
    #[serde(
        default,
        rename = "costPerHr",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_per_hr: Option<String>,
    /// Hourly cost adjusted for the current billing state.
    #[serde(
        default,
        rename = "adjustedCostPerHr",
        skip_serializing_if = "Option::is_none"
    )]
    pub adjusted_cost_per_hr: Option<f64>,
    /// Machine hosting the pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    /// When the pod was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the pod was last started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_started_at: Option<DateTime<Utc>>,
    /// Environment variables.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Exposed ports (e.g. `"8080/http"`).
    #[serde(default)]
    pub ports: Vec<String>,
    /// Whether the pod is locked against mutation.
    #[serde(default)]
    pub locked: bool,
    /// Whether this is a spot/interruptible pod.
    #[serde(default)]
    pub interruptible: bool,
    /// Public IP, when one is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<String>,
}

impl Pod {
    /// Returns true if the pod is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.desired_status, PodStatus::Running)
    }
}

/// Request to create a new pod.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePodRequest {
    /// Pod name.
    pub name: String,
    /// Container image.
    pub image_name: String,
    /// Acceptable GPU types, in priority order.
    pub gpu_type_ids: Vec<String>,
    /// Number of GPUs.
    pub gpu_count: u32,
    /// Number of vCPUs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpu_count: Option<u32>,
    /// Memory in GB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_in_gb: Option<u32>,
    /// Container disk in GB.
    pub container_disk_in_gb: u32,
    /// Persistent volume in GB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_in_gb: Option<u32>,
    /// Where to mount the volume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_mount_path: Option<String>,
    /// Preferred datacenters, in priority order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_center_ids: Option<Vec<String>>,
    /// Environment variables.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    /// Ports to expose (e.g. `"8080/http"`, `"22/tcp"`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    /// Extra docker arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_args: Option<String>,
    /// Network volume to attach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_volume_id: Option<String>,
    /// `"SECURE"` or `"COMMUNITY"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_type: Option<String>,
    /// Request a spot/interruptible instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interruptible: Option<bool>,
    /// Bid price per GPU for spot instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_per_gpu: Option<f64>,
    /// Attach a public IP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_public_ip: Option<bool>,
    /// Template to instantiate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// `"GPU"` or `"CPU"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_type: Option<String>,
    /// Container entrypoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_entrypoint: Option<Vec<String>>,
    /// Container start command override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_start_cmd: Option<Vec<String>>,
    /// How to weigh the GPU type list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_type_priority: Option<String>,
    /// How to weigh the datacenter list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_center_priority: Option<String>,
}

impl CreatePodRequest {
    /// Creates a pod request with the minimal required fields.
    #[must_use]
    pub fn new(name: &str, image_name: &str, gpu_type_ids: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            image_name: image_name.to_string(),
            gpu_type_ids,
            gpu_count: 1,
            vcpu_count: None,
            memory_in_gb: None,
            container_disk_in_gb: 20,
            volume_in_gb: None,
            volume_mount_path: None,
            data_center_ids: None,
            env: HashMap::new(),
            ports: Vec::new(),
            docker_args: None,
            network_volume_id: None,
            cloud_type: None,
            interruptible: None,
            bid_per_gpu: None,
            support_public_ip: None,
            template_id: None,
            compute_type: None,
            docker_entrypoint: None,
            docker_start_cmd: None,
            gpu_type_priority: None,
            data_center_priority: None,
        }
    }

    /// Sets the GPU count.
    #[must_use]
    pub const fn with_gpu_count(mut self, count: u32) -> Self {
        self.gpu_count = count;
        self
    }

    /// Sets the container disk size.
    #[must_use]
    pub const fn with_container_disk_gb(mut self, size_gb: u32) -> Self {
        self.container_disk_in_gb = size_gb;
        self
    }

    /// Sets the volume size.
    #[must_use]
    pub const fn with_volume_gb(mut self, size_gb: u32) -> Self {
        self.volume_in_gb = Some(size_gb);
        self
    }

    /// Sets the volume mount path.
    #[must_use]
    pub fn with_mount_path(mut self, path: &str) -> Self {
        self.volume_mount_path = Some(path.to_string());
        self
    }

    /// Sets the cloud type (`"SECURE"` or `"COMMUNITY"`).
    #[must_use]
    pub fn with_cloud_type(mut self, cloud_type: &str) -> Self {
        self.cloud_type = Some(cloud_type.to_string());
        self
    }

    /// Sets the ports to expose.
    #[must_use]
    pub fn with_ports(mut self, ports: Vec<String>) -> Self {
        self.ports = ports;
        self
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Sets all environment variables.
    #[must_use]
    pub fn with_env_map(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Sets the preferred datacenters.
    #[must_use]
    pub fn with_data_centers(mut self, ids: Vec<String>) -> Self {
        self.data_center_ids = Some(ids);
        self
    }
}

/// Request to update a pod.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePodRequest {
    /// New pod name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<HashMap<String, String>>,
}

// =========================
// SECRETS
// =========================

/// A stored secret. Values are never returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Secret identifier.
    pub id: String,
    /// Secret name.
    pub name: String,
}

/// Request to create a secret.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretRequest {
    /// Secret name.
    pub name: String,
    /// Secret value.
    pub value: String,
}

/// Request to replace a secret's value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecretRequest {
    /// New secret value.
    pub value: String,
}

// =========================
// DATA-TRANSFER SHAPES (no façade operations yet)
// =========================

/// A serverless endpoint definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Endpoint identifier.
    pub id: String,
    /// Endpoint name.
    #[serde(default)]
    pub name: String,
    /// Backing template.
    #[serde(default)]
    pub template_id: String,
    /// Acceptable GPU types.
    #[serde(default)]
    pub gpu_type_ids: Vec<String>,
    /// Autoscaler type.
    #[serde(default)]
    pub scaler_type: String,
    /// Autoscaler target value.
    #[serde(default)]
    pub scaler_value: u32,
    /// Minimum worker count.
    #[serde(default)]
    pub workers_min: u32,
    /// Maximum worker count.
    #[serde(default)]
    pub workers_max: u32,
    /// Seconds a worker stays warm after its last job.
    #[serde(default)]
    pub idle_timeout: u32,
    /// Per-job execution limit in milliseconds.
    #[serde(default, rename = "executionTimeoutMs")]
    pub execution_timeout_ms: u64,
    /// When the endpoint was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Endpoint status.
    #[serde(default)]
    pub status: String,
    /// Invocation URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A reusable pod/endpoint template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Template identifier.
    pub id: String,
    /// Template name.
    #[serde(default)]
    pub name: String,
    /// Container image.
    #[serde(default)]
    pub image_name: String,
    /// Whether the template targets serverless workers.
    #[serde(default)]
    pub is_serverless: bool,
    /// Container disk in GB.
    #[serde(default)]
    pub container_disk_in_gb: u32,
    /// Persistent volume in GB.
    #[serde(default)]
    pub volume_in_gb: u32,
    /// Where the volume is mounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mount_path: Option<String>,
    /// Environment variables.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Ports specification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    /// Extra docker arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_args: Option<String>,
    /// When the template was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// An available GPU hardware type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuType {
    /// GPU type identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// VRAM in GB.
    #[serde(default)]
    pub memory_in_gb: u32,
    /// Hourly cost.
    #[serde(default, rename = "costPerHr")]
    pub cost_per_hr: f64,
    /// Whether any capacity is currently available.
    #[serde(default)]
    pub available: bool,
    /// Offered in the community cloud.
    #[serde(default)]
    pub community_cloud: bool,
    /// Offered in the secure cloud.
    #[serde(default)]
    pub secure_cloud: bool,
    /// Current lowest prices, when published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_price: Option<Price>,
}

/// Price points for a GPU type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Minimum spot bid.
    #[serde(default)]
    pub minimum_bid_price: f64,
    /// On-demand price.
    #[serde(default)]
    pub uninterruptable_price: f64,
    /// Spot price, when offered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruptable_price: Option<f64>,
}

/// A physical datacenter location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datacenter {
    /// Datacenter identifier.
    pub id: String,
    /// Datacenter name.
    #[serde(default)]
    pub name: String,
    /// Country code.
    #[serde(default)]
    pub country: String,
    /// Region, when published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Account-level information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account identifier.
    pub id: String,
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Remaining balance.
    #[serde(default)]
    pub balance: f64,
    /// Configured spend limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_limit: Option<f64>,
    /// Current hourly spend.
    #[serde(default)]
    pub current_spend_per_hr: f64,
    /// Machine quota, when limited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_quota: Option<u32>,
}

/// A network-attached storage volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkVolume {
    /// Volume identifier.
    pub id: String,
    /// Volume name.
    #[serde(default)]
    pub name: String,
    /// Size in GB.
    #[serde(default)]
    pub size: u32,
    /// Datacenter hosting the volume.
    #[serde(default)]
    pub datacenter_id: String,
    /// When the volume was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Pods currently mounting the volume.
    #[serde(default)]
    pub pod_ids: Vec<String>,
}

/// Request to create a network volume.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkVolumeRequest {
    /// Volume name.
    pub name: String,
    /// Size in GB.
    pub size: u32,
    /// Datacenter to host the volume.
    pub datacenter_id: String,
}

/// Webhook delivery configuration for job results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Delivery URL.
    pub url: String,
    /// Extra headers to send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Shared signing secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_serde_round_trip() {
        for (status, wire) in [
            (JobStatus::InQueue, "\"IN_QUEUE\""),
            (JobStatus::InProgress, "\"IN_PROGRESS\""),
            (JobStatus::Completed, "\"COMPLETED\""),
            (JobStatus::Failed, "\"FAILED\""),
            (JobStatus::Cancelled, "\"CANCELLED\""),
            (JobStatus::TimedOut, "\"TIMED_OUT\""),
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, wire);
            let parsed: JobStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, status);
        }

        let parsed: JobStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(parsed, JobStatus::Unknown);
    }

    #[test]
    fn test_job_terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::TimedOut.is_terminal());
        assert!(!JobStatus::InQueue.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_create_pod_request_skips_unset_fields() {
        let req = CreatePodRequest::new("worker", "runpod/base:0.6", vec![
            String::from("NVIDIA A40"),
        ]);
        let json = serde_json::to_value(&req).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["name"], "worker");
        assert_eq!(obj["imageName"], "runpod/base:0.6");
        assert_eq!(obj["gpuCount"], 1);
        assert!(!obj.contains_key("env"));
        assert!(!obj.contains_key("ports"));
        assert!(!obj.contains_key("cloudType"));
        assert!(!obj.contains_key("bidPerGpu"));
    }

    #[test]
    fn test_create_pod_request_builder_fields() {
        let req = CreatePodRequest::new("worker", "img", vec![String::from("A40")])
            .with_gpu_count(2)
            .with_cloud_type("SECURE")
            .with_env("MODEL", "llama")
            .with_ports(vec![String::from("8080/http")]);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["gpuCount"], 2);
        assert_eq!(json["cloudType"], "SECURE");
        assert_eq!(json["env"]["MODEL"], "llama");
        assert_eq!(json["ports"][0], "8080/http");
    }

    #[test]
    fn test_pod_decodes_with_missing_optional_fields() {
        let pod: Pod = serde_json::from_str(
            r#"{"id": "pod-1", "name": "worker", "desiredStatus": "RUNNING", "image": "img"}"#,
        )
        .unwrap();

        assert_eq!(pod.id, "pod-1");
        assert_eq!(pod.image_name, "img");
        assert!(pod.is_running());
        assert!(pod.env.is_empty());
        assert!(pod.created_at.is_none());
    }

    #[test]
    fn test_list_options_query() {
        assert_eq!(ListOptions::default().to_query(), None);
        assert_eq!(
            ListOptions {
                limit: Some(10),
                offset: None,
            }
            .to_query()
            .as_deref(),
            Some("limit=10")
        );
        assert_eq!(
            ListOptions {
                limit: Some(25),
                offset: Some(50),
            }
            .to_query()
            .as_deref(),
            Some("limit=25&offset=50")
        );
        assert_eq!(
            ListOptions {
                limit: Some(0),
                offset: Some(0),
            }
            .to_query(),
            None
        );
    }
}
