//! Data provider abstraction
//!
//! The export pipeline never queries persistence directly. It talks to a
//! [`DataProvider`], which resolves the controllers in scope of a request and
//! lists their field devices page by page.
//!
//! Controller resolution rules are shared by every provider through
//! [`resolve::resolve_controller_ids`], which only needs the primitive
//! queries of an [`AssetCatalog`].

pub mod memory;
pub mod resolve;

pub use memory::{AssetSnapshot, InMemoryDataProvider};
pub use resolve::{resolve_controller_ids, AssetCatalog};

use crate::domain::{Controller, ExportRequest, FieldDevice, Result};
use async_trait::async_trait;
use uuid::Uuid;

/// One page of field devices for a controller
#[derive(Debug, Clone, Default)]
pub struct FieldDevicePage {
    /// Devices on this page
    pub items: Vec<FieldDevice>,

    /// Total number of devices matching the query across all pages
    pub total: usize,
}

/// Source of controllers and field devices for an export
///
/// Implementations must be safe to call from several workers at once.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Resolve the controllers in scope of `request`
    ///
    /// Every controller appears exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ExportError::DataProvider`] if the backing
    /// store cannot be queried.
    async fn resolve_controllers(&self, request: &ExportRequest) -> Result<Vec<Controller>>;

    /// List one page of field devices owned by `controller_id`
    ///
    /// Pages are 1-based. Project filters of `request` apply.
    async fn list_field_devices_by_controller(
        &self,
        controller_id: &Uuid,
        request: &ExportRequest,
        page: usize,
        limit: usize,
    ) -> Result<FieldDevicePage>;
}
