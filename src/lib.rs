// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::redundant_clone)]     // Useless clones warning

// ============================================================================
// Crate Documentation
// ============================================================================

//! # RunPod Client
//!
//! An async client for the `RunPod` REST API and serverless job-queue API.
//!
//! ## Overview
//!
//! The crate is organized around a single [`Client`] handle:
//!
//! - **Pods**: create, list, inspect, stop/resume, terminate GPU pods
//! - **Serverless jobs**: submit, poll, wait on, stream, and cancel jobs
//! - **Secrets**: manage named secrets referenced by pods and endpoints
//!
//! All operations share one request pipeline with authentication, input
//! validation, retry with linear backoff, and error classification.
//!
//! ## Example
//!
//! ```no_run
//! use runpod_client::Client;
//!
//! # async fn example() -> runpod_client::Result<()> {
//! let client = Client::builder("your-api-key").build()?;
//!
//! let pods = client.list_pods(None).await?;
//! for pod in pods {
//!     println!("{} ({})", pod.name, pod.desired_status);
//! }
//!
//! let job = client
//!     .run_async("my-endpoint", &serde_json::json!({"prompt": "hello"}))
//!     .await?;
//! let finished = client
//!     .wait_for_completion("my-endpoint", &job.id, None)
//!     .await?;
//! println!("{:?}", finished.output);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod client;
pub mod error;
pub mod jobs;
pub mod pods;
pub mod secrets;
pub mod types;
pub mod validate;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use types::{
    CreatePodRequest, EndpointHealth, Job, JobStatus, ListOptions, Pod, PodStatus, Secret,
    UpdatePodRequest,
};
