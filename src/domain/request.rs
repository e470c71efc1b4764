//! Export request model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scope of an export
///
/// All id lists are optional and combine as a union: a controller is in scope
/// if it is listed directly, sits in a listed cabinet, or sits in a cabinet of
/// a listed building. Project ids narrow field devices (and the unscoped
/// fallback) to those projects.
///
/// A request is immutable once submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Project filter
    #[serde(default)]
    pub project_ids: Vec<Uuid>,

    /// Buildings whose cabinets are exported
    #[serde(default)]
    pub building_ids: Vec<Uuid>,

    /// Cabinets whose controllers are exported
    #[serde(default)]
    pub control_cabinet_ids: Vec<Uuid>,

    /// Controllers exported directly
    #[serde(default)]
    pub controller_ids: Vec<Uuid>,

    /// Always hand the job to the worker pool instead of running inline
    #[serde(default)]
    pub force_async: bool,
}

impl ExportRequest {
    /// Creates an unscoped request (every controller)
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds project filters
    pub fn with_projects(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.project_ids.extend(ids);
        self
    }

    /// Adds building scope
    pub fn with_buildings(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.building_ids.extend(ids);
        self
    }

    /// Adds cabinet scope
    pub fn with_cabinets(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.control_cabinet_ids.extend(ids);
        self
    }

    /// Adds controller scope
    pub fn with_controllers(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.controller_ids.extend(ids);
        self
    }

    /// Sets the `force_async` flag
    pub fn force_async(mut self, force_async: bool) -> Self {
        self.force_async = force_async;
        self
    }

    /// Returns true if any building, cabinet or controller id was given
    pub fn has_scope(&self) -> bool {
        !self.building_ids.is_empty()
            || !self.control_cabinet_ids.is_empty()
            || !self.controller_ids.is_empty()
    }

    /// Returns true if the project filter applies to `project_id`
    pub fn matches_project(&self, project_id: Option<&Uuid>) -> bool {
        if self.project_ids.is_empty() {
            return true;
        }
        project_id.is_some_and(|id| self.project_ids.contains(id))
    }
}
