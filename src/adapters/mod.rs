//! Collaborators of the export pipeline.
//!
//! This module provides the contracts the core consumes, each with a bundled
//! implementation:
//!
//! - [`provider`] - controller resolution and paginated field-device listing
//! - [`jobs`] - job record persistence (in-memory or JSON files)
//! - [`files`] - output path and file name builder
//!
//! # Design Pattern
//!
//! Adapters isolate persistence behind small traits so the core never depends
//! on a concrete backend. Tests substitute their own implementations to inject
//! failures or record every state change.
//!
//! ```rust,no_run
//! use ga_export::adapters::jobs::{InMemoryJobStore, JobStore};
//! use ga_export::adapters::provider::{AssetSnapshot, InMemoryDataProvider};
//! use std::sync::Arc;
//!
//! # fn example() -> ga_export::domain::Result<()> {
//! let snapshot = AssetSnapshot::from_file("assets.json")?;
//! let provider = Arc::new(InMemoryDataProvider::new(snapshot));
//! let jobs: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
//! # Ok(())
//! # }
//! ```

pub mod files;
pub mod jobs;
pub mod provider;
