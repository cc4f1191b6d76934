//! Resilient multi-credential generation layer for studyforge.
//!
//! The heart of this crate is the [`dispatch::Dispatcher`]: a retry engine
//! that spreads generation calls across a pool of API credentials and an
//! ordered list of backend model variants, classifying each failure to
//! decide whether to try the next model, rotate to another credential with
//! exponential backoff, or give up.
//!
//! Around it sit the [`pool::CredentialPool`] (extraction, dedup, sentinel
//! degradation), the [`classify`] function, the Gemini-style HTTP backend,
//! the four generation operations on [`service::StudyService`], and the
//! [`postprocess`] helpers.

pub mod backends;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod models;
pub mod pool;
pub mod postprocess;
pub mod prompts;
pub mod service;

pub use backends::{GenerateOptions, GenerateRequest, GenerativeBackend};
pub use classify::{classify, FailureKind};
pub use config::{credential_sources_from_env, GenConfig};
pub use dispatch::{Dispatcher, RetryPolicy};
pub use models::ModelList;
pub use pool::{Credential, CredentialPool, KeyFormat};
pub use service::{StudyService, FALLBACK_BUSY, FALLBACK_CONFIG, FALLBACK_GENERIC};
