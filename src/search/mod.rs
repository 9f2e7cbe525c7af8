//! Intent-aware product search.
//!
//! A raw query flows through an [`intent::IntentSource`] into a [`types::IntentData`], the
//! composer turns that into a tiered filter over the catalog, and the
//! [`SearchOrchestrator`] decides which composer entry point handles it.
pub mod category;
pub mod composer;
pub mod intent;
pub mod orchestrator;
pub mod types;

pub use intent::intent_source_from_config;
pub use orchestrator::SearchOrchestrator;
