//! Controller resolution
//!
//! The set of controllers in scope of a request is the de-duplicated union of
//! explicit controller ids, controllers in explicit cabinets, and controllers
//! in cabinets of explicit buildings. A request without any of those scopes
//! falls back to every controller, paging through the whole collection.

use crate::domain::{ExportError, ExportRequest, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

/// Primitive hierarchy queries needed to resolve controllers
#[async_trait]
pub trait AssetCatalog: Send + Sync {
    /// Controller ids housed in any of `cabinet_ids`
    async fn controller_ids_by_cabinets(&self, cabinet_ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// Cabinet ids located in any of `building_ids`
    async fn cabinet_ids_by_buildings(&self, building_ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// One page (1-based) of all controller ids, restricted to `project_ids`
    /// when non-empty
    async fn list_controller_ids(
        &self,
        project_ids: &[Uuid],
        page: usize,
        limit: usize,
    ) -> Result<Vec<Uuid>>;
}

/// Ordered set that keeps the first occurrence of every id
#[derive(Debug, Default)]
struct IdSet {
    seen: HashSet<Uuid>,
    ordered: Vec<Uuid>,
}

impl IdSet {
    fn extend(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        for id in ids {
            if self.seen.insert(id) {
                self.ordered.push(id);
            }
        }
    }
}

/// Resolve the controller ids in scope of `request`
///
/// Order is first-seen: explicit controllers, then cabinet members, then
/// building members. The unscoped fallback keeps the catalog's page order.
///
/// # Errors
///
/// Returns a validation error for a zero `page_size` and propagates catalog
/// failures.
pub async fn resolve_controller_ids<C>(
    catalog: &C,
    request: &ExportRequest,
    page_size: usize,
) -> Result<Vec<Uuid>>
where
    C: AssetCatalog + ?Sized,
{
    if page_size == 0 {
        return Err(ExportError::Validation(
            "controller page size must be at least 1".to_string(),
        ));
    }

    let mut ids = IdSet::default();

    if !request.has_scope() {
        let mut page = 1;
        loop {
            let batch = catalog
                .list_controller_ids(&request.project_ids, page, page_size)
                .await?;
            let fetched = batch.len();
            ids.extend(batch);
            if fetched < page_size {
                break;
            }
            page += 1;
        }
        tracing::debug!(
            pages = page,
            controllers = ids.ordered.len(),
            "Resolved unscoped request to all controllers"
        );
        return Ok(ids.ordered);
    }

    ids.extend(request.controller_ids.iter().copied());

    if !request.control_cabinet_ids.is_empty() {
        let members = catalog
            .controller_ids_by_cabinets(&request.control_cabinet_ids)
            .await?;
        ids.extend(members);
    }

    if !request.building_ids.is_empty() {
        let cabinets = catalog
            .cabinet_ids_by_buildings(&request.building_ids)
            .await?;
        if !cabinets.is_empty() {
            let members = catalog.controller_ids_by_cabinets(&cabinets).await?;
            ids.extend(members);
        }
    }

    tracing::debug!(controllers = ids.ordered.len(), "Resolved scoped request");
    Ok(ids.ordered)
}
