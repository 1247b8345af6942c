//! commitdojo-recorder — Attempt recording for commitdojo.
//!
//! Implements the `AttemptRecorder` trait for local JSONL files and HTTP
//! endpoints, and dispatches records without blocking the grading loop.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod jsonl;
pub mod mock;

pub use commitdojo_core::error::RecorderError;
pub use config::{
    create_recorder, load_config, load_config_from, parse_config_str, DojoConfig, RecorderConfig,
};
pub use dispatch::RecordDispatcher;
pub use http::HttpRecorder;
pub use jsonl::JsonlRecorder;
pub use mock::{MockRecorder, NullRecorder};
