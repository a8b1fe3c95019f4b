//! # libzhuyin
//!
//! Character to Zhuyin/Bopomofo lookup through the Moedict dictionary, and
//! four-character idiom suggestions built on zhuyin-core.

pub mod config;
pub mod dictionary;
pub mod payload;
pub mod repl;
pub mod server;

// Re-export the core lookup API
pub use zhuyin_core::*;

pub use config::ZhuyinConfig;
pub use dictionary::{readings_from_response, DictionaryClient};
pub use payload::{LookupFailure, Reply};
pub use repl::{lookup_line, run_lines, LineOutcome};
pub use server::{spawn as spawn_server, ServerHandle, Service};

use std::sync::Arc;

/// Load reference data and build a dictionary-backed pipeline from `config`.
pub fn build_pipeline(config: &ZhuyinConfig) -> anyhow::Result<PhrasePipeline<DictionaryClient>> {
    let data = ReferenceData::from_config(config.base())?;
    let client = DictionaryClient::new(config)?;
    Ok(PhrasePipeline::new(client, PhraseMatcher::new(Arc::new(data))))
}
