//! In-memory data provider
//!
//! Serves an [`AssetSnapshot`], a JSON document holding the flattened asset
//! hierarchy. Used by the CLI and by tests; a database-backed provider only
//! needs to implement the same two traits.

use super::resolve::{resolve_controller_ids, AssetCatalog};
use super::{DataProvider, FieldDevicePage};
use crate::domain::{
    Building, ControlCabinet, Controller, ExportError, ExportRequest, FieldDevice, Project,
    Result, SpsController,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Default number of controller ids fetched per page by the unscoped fallback
pub const DEFAULT_CONTROLLER_PAGE_SIZE: usize = 1000;

/// Flattened asset hierarchy
///
/// # Examples
///
/// ```
/// use ga_export::adapters::provider::AssetSnapshot;
///
/// let snapshot = AssetSnapshot::from_json(r#"{"projects": [], "sps_controllers": []}"#).unwrap();
/// assert!(snapshot.sps_controllers.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetSnapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub control_cabinets: Vec<ControlCabinet>,
    #[serde(default)]
    pub sps_controllers: Vec<SpsController>,
    #[serde(default)]
    pub field_devices: Vec<FieldDevice>,
}

impl AssetSnapshot {
    /// Parses a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ExportError::DataProvider(format!("Failed to parse asset snapshot: {e}"))
        })
    }

    /// Loads a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::DataProvider`] if the file is missing or malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExportError::DataProvider(format!(
                "Failed to read asset snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&contents)
    }
}

/// Data provider over an in-memory [`AssetSnapshot`]
pub struct InMemoryDataProvider {
    snapshot: AssetSnapshot,
    projects: HashMap<Uuid, usize>,
    buildings: HashMap<Uuid, usize>,
    cabinets: HashMap<Uuid, usize>,
    controllers: HashMap<Uuid, usize>,
    controller_page_size: usize,
}

impl InMemoryDataProvider {
    /// Create a new provider and index the snapshot
    pub fn new(snapshot: AssetSnapshot) -> Self {
        fn index<T>(items: &[T], id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, usize> {
            items.iter().enumerate().map(|(i, item)| (id(item), i)).collect()
        }

        Self {
            projects: index(&snapshot.projects, |p| p.id),
            buildings: index(&snapshot.buildings, |b| b.id),
            cabinets: index(&snapshot.control_cabinets, |c| c.id),
            controllers: index(&snapshot.sps_controllers, |c| c.id),
            snapshot,
            controller_page_size: DEFAULT_CONTROLLER_PAGE_SIZE,
        }
    }

    /// Override the page size used when paging through all controllers
    pub fn with_controller_page_size(mut self, page_size: usize) -> Self {
        self.controller_page_size = page_size;
        self
    }

    /// Access the underlying snapshot
    pub fn snapshot(&self) -> &AssetSnapshot {
        &self.snapshot
    }

    fn cabinet(&self, id: &Uuid) -> Option<&ControlCabinet> {
        self.cabinets
            .get(id)
            .map(|&i| &self.snapshot.control_cabinets[i])
    }

    fn building(&self, id: &Uuid) -> Option<&Building> {
        self.buildings.get(id).map(|&i| &self.snapshot.buildings[i])
    }

    fn building_of(&self, controller: &SpsController) -> Option<&Building> {
        self.cabinet(&controller.control_cabinet_id)
            .and_then(|cabinet| self.building(&cabinet.building_id))
    }

    fn project_of(&self, controller: &SpsController) -> Option<Uuid> {
        self.building_of(controller).and_then(|b| b.project_id)
    }

    fn project_name(&self, id: &Uuid) -> String {
        self.projects
            .get(id)
            .map(|&i| self.snapshot.projects[i].name.clone())
            .unwrap_or_default()
    }

    fn devices_of<'a>(
        &'a self,
        controller_id: &'a Uuid,
        request: &'a ExportRequest,
    ) -> impl Iterator<Item = &'a FieldDevice> + 'a {
        self.snapshot.field_devices.iter().filter(move |device| {
            device.sps_controller_id == *controller_id
                && request.matches_project(device.project_id.as_ref())
        })
    }

    fn projection(&self, controller: &SpsController) -> Controller {
        let cabinet = self.cabinet(&controller.control_cabinet_id);
        let building = self.building_of(controller);
        let project_name = self
            .project_of(controller)
            .map(|id| self.project_name(&id))
            .unwrap_or_default();
        let min_system_part_nr = self
            .snapshot
            .field_devices
            .iter()
            .filter(|d| d.sps_controller_id == controller.id)
            .filter_map(|d| d.system_part.as_ref().and_then(|p| p.number))
            .min();

        Controller {
            id: controller.id,
            cabinet_id: controller.control_cabinet_id,
            project_name,
            control_cabinet_nr: cabinet
                .map(|c| c.control_cabinet_nr.clone())
                .unwrap_or_default(),
            ga_device: controller.ga_device.clone(),
            iws_code: building.map(|b| b.iws_code.clone()).unwrap_or_default(),
            building_group: building.and_then(|b| b.building_group),
            min_system_part_nr,
            device_name: controller.device_name.clone(),
            device_instance: controller.device_instance,
            device_description: controller.device_description.clone(),
            device_location: controller.device_location.clone(),
            ip_address: controller.ip_address.clone(),
            subnet: controller.subnet.clone(),
            gateway: controller.gateway.clone(),
            vlan: controller.vlan.clone(),
        }
    }
}

#[async_trait]
impl AssetCatalog for InMemoryDataProvider {
    async fn controller_ids_by_cabinets(&self, cabinet_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        Ok(self
            .snapshot
            .sps_controllers
            .iter()
            .filter(|c| cabinet_ids.contains(&c.control_cabinet_id))
            .map(|c| c.id)
            .collect())
    }

    async fn cabinet_ids_by_buildings(&self, building_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        Ok(self
            .snapshot
            .control_cabinets
            .iter()
            .filter(|c| building_ids.contains(&c.building_id))
            .map(|c| c.id)
            .collect())
    }

    async fn list_controller_ids(
        &self,
        project_ids: &[Uuid],
        page: usize,
        limit: usize,
    ) -> Result<Vec<Uuid>> {
        check_page(page, limit)?;
        Ok(self
            .snapshot
            .sps_controllers
            .iter()
            .filter(|c| {
                project_ids.is_empty()
                    || self
                        .project_of(c)
                        .is_some_and(|project| project_ids.contains(&project))
            })
            .skip((page - 1) * limit)
            .take(limit)
            .map(|c| c.id)
            .collect())
    }
}

#[async_trait]
impl DataProvider for InMemoryDataProvider {
    async fn resolve_controllers(&self, request: &ExportRequest) -> Result<Vec<Controller>> {
        let ids = resolve_controller_ids(self, request, self.controller_page_size).await?;

        let mut controllers = Vec::with_capacity(ids.len());
        for id in ids {
            match self.controllers.get(&id) {
                Some(&i) => controllers.push(self.projection(&self.snapshot.sps_controllers[i])),
                None => tracing::debug!(controller_id = %id, "Skipping unknown controller"),
            }
        }
        Ok(controllers)
    }

    async fn list_field_devices_by_controller(
        &self,
        controller_id: &Uuid,
        request: &ExportRequest,
        page: usize,
        limit: usize,
    ) -> Result<FieldDevicePage> {
        check_page(page, limit)?;
        let total = self.devices_of(controller_id, request).count();
        let items = self
            .devices_of(controller_id, request)
            .skip((page - 1) * limit)
            .take(limit)
            .cloned()
            .collect();
        Ok(FieldDevicePage { items, total })
    }
}

fn check_page(page: usize, limit: usize) -> Result<()> {
    if page == 0 || limit == 0 {
        return Err(ExportError::DataProvider(format!(
            "invalid page request (page={page}, limit={limit}); pages are 1-based and limit must be positive"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Classification;

    struct Fixture {
        provider: InMemoryDataProvider,
        project: Uuid,
        building: Uuid,
        cabinets: [Uuid; 2],
        controllers: [Uuid; 3],
    }

    /// One project, one building, two cabinets, three controllers
    fn fixture() -> Fixture {
        let project = Uuid::new_v4();
        let building = Uuid::new_v4();
        let cabinets = [Uuid::new_v4(), Uuid::new_v4()];
        let controllers = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        let snapshot = AssetSnapshot {
            projects: vec![Project {
                id: project,
                name: "Campus".to_string(),
            }],
            buildings: vec![Building {
                id: building,
                project_id: Some(project),
                iws_code: "ABCD".to_string(),
                building_group: Some(2),
            }],
            control_cabinets: vec![
                ControlCabinet {
                    id: cabinets[0],
                    building_id: building,
                    control_cabinet_nr: "SCH-01".to_string(),
                },
                ControlCabinet {
                    id: cabinets[1],
                    building_id: building,
                    control_cabinet_nr: "SCH-02".to_string(),
                },
            ],
            sps_controllers: vec![
                SpsController {
                    id: controllers[0],
                    control_cabinet_id: cabinets[0],
                    ga_device: "AS01".to_string(),
                    ..Default::default()
                },
                SpsController {
                    id: controllers[1],
                    control_cabinet_id: cabinets[0],
                    ga_device: "AS02".to_string(),
                    ..Default::default()
                },
                SpsController {
                    id: controllers[2],
                    control_cabinet_id: cabinets[1],
                    ga_device: "AS03".to_string(),
                    ..Default::default()
                },
            ],
            field_devices: (0..5)
                .map(|i| FieldDevice {
                    id: Uuid::new_v4(),
                    sps_controller_id: controllers[0],
                    project_id: Some(project),
                    bmk: format!("BMK{i}"),
                    system_part: Some(Classification {
                        number: Some(10 - i),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
        };

        Fixture {
            provider: InMemoryDataProvider::new(snapshot),
            project,
            building,
            cabinets,
            controllers,
        }
    }

    #[tokio::test]
    async fn test_resolve_by_cabinet() {
        let f = fixture();
        let request = ExportRequest::new().with_cabinets([f.cabinets[0]]);
        let resolved = f.provider.resolve_controllers(&request).await.unwrap();
        let ids: Vec<Uuid> = resolved.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![f.controllers[0], f.controllers[1]]);
    }

    #[tokio::test]
    async fn test_resolve_union_without_duplicates() {
        let f = fixture();
        let request = ExportRequest::new()
            .with_controllers([f.controllers[2], f.controllers[0]])
            .with_cabinets([f.cabinets[0]])
            .with_buildings([f.building]);

        let resolved = f.provider.resolve_controllers(&request).await.unwrap();
        let ids: Vec<Uuid> = resolved.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![f.controllers[2], f.controllers[0], f.controllers[1]]);
    }

    #[tokio::test]
    async fn test_resolve_unknown_ids_are_skipped() {
        let f = fixture();
        let request = ExportRequest::new().with_controllers([Uuid::new_v4(), f.controllers[1]]);
        let resolved = f.provider.resolve_controllers(&request).await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, f.controllers[1]);
    }

    #[tokio::test]
    async fn test_scoped_request_matching_nothing_is_empty() {
        let f = fixture();
        let request = ExportRequest::new().with_buildings([Uuid::new_v4()]);
        let resolved = f.provider.resolve_controllers(&request).await.unwrap();
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_respects_project_filter() {
        let f = fixture();
        let provider = f.provider.with_controller_page_size(2);

        let all = provider
            .resolve_controllers(&ExportRequest::new().with_projects([f.project]))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let none = provider
            .resolve_controllers(&ExportRequest::new().with_projects([Uuid::new_v4()]))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_projection_is_denormalized() {
        let f = fixture();
        let request = ExportRequest::new().with_controllers([f.controllers[0]]);
        let controller = f
            .provider
            .resolve_controllers(&request)
            .await
            .unwrap()
            .remove(0);

        assert_eq!(controller.cabinet_id, f.cabinets[0]);
        assert_eq!(controller.project_name, "Campus");
        assert_eq!(controller.control_cabinet_nr, "SCH-01");
        assert_eq!(controller.iws_code, "ABCD");
        assert_eq!(controller.building_group, Some(2));
        assert_eq!(controller.min_system_part_nr, Some(6));
    }

    #[tokio::test]
    async fn test_field_device_pagination() {
        let f = fixture();
        let request = ExportRequest::new();

        let first = f
            .provider
            .list_field_devices_by_controller(&f.controllers[0], &request, 1, 2)
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, 5);
        assert_eq!(first.items[0].bmk, "BMK0");

        let last = f
            .provider
            .list_field_devices_by_controller(&f.controllers[0], &request, 3, 2)
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].bmk, "BMK4");
    }

    #[tokio::test]
    async fn test_field_devices_filtered_by_project() {
        let f = fixture();
        let request = ExportRequest::new().with_projects([Uuid::new_v4()]);
        let page = f
            .provider
            .list_field_devices_by_controller(&f.controllers[0], &request, 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_zero_page_is_rejected() {
        let f = fixture();
        let result = f
            .provider
            .list_field_devices_by_controller(&f.controllers[0], &ExportRequest::new(), 0, 10)
            .await;
        assert!(matches!(result, Err(ExportError::DataProvider(_))));
    }

    #[test]
    fn test_snapshot_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sps_controllers": [{{"id": "7d44b88c-4199-4bad-97dc-d78268e01398", "control_cabinet_id": "84d7c3f5-1f6a-4f87-aa95-5d9c6b8f3a29", "ga_device": "AS01"}}]}}"#
        )
        .unwrap();

        let snapshot = AssetSnapshot::from_file(file.path()).unwrap();
        assert_eq!(snapshot.sps_controllers.len(), 1);
        assert_eq!(snapshot.sps_controllers[0].ga_device, "AS01");
        assert!(AssetSnapshot::from_file("does-not-exist.json").is_err());
    }
}
