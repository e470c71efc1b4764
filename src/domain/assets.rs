//! Facility-automation asset hierarchy
//!
//! Read-only records the export pipeline consumes: projects contain buildings,
//! buildings contain control cabinets, cabinets house SPS controllers, and
//! controllers own field devices with their BACnet objects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project id
    pub id: Uuid,

    /// Display name
    #[serde(default)]
    pub name: String,
}

/// A building within a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Building id
    pub id: Uuid,

    /// Owning project
    #[serde(default)]
    pub project_id: Option<Uuid>,

    /// IWS code, first segment of every object name
    #[serde(default)]
    pub iws_code: String,

    /// Building group number
    #[serde(default)]
    pub building_group: Option<i32>,
}

/// A physical enclosure housing controllers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlCabinet {
    /// Cabinet id
    pub id: Uuid,

    /// Building the cabinet is located in
    pub building_id: Uuid,

    /// Cabinet number as labelled on site
    #[serde(default)]
    pub control_cabinet_nr: String,
}

/// A programmable controller inside a cabinet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpsController {
    /// Controller id
    pub id: Uuid,

    /// Cabinet housing the controller
    pub control_cabinet_id: Uuid,

    /// GA-device label, used for sheet and object names
    #[serde(default)]
    pub ga_device: String,

    /// BACnet device name
    #[serde(default)]
    pub device_name: String,

    /// BACnet device instance
    #[serde(default)]
    pub device_instance: Option<u32>,

    /// BACnet device description
    #[serde(default)]
    pub device_description: String,

    /// BACnet device location
    #[serde(default)]
    pub device_location: String,

    /// IP address
    #[serde(default)]
    pub ip_address: String,

    /// Subnet mask
    #[serde(default)]
    pub subnet: String,

    /// Default gateway
    #[serde(default)]
    pub gateway: String,

    /// VLAN
    #[serde(default)]
    pub vlan: String,
}

/// Denormalized, read-only view of a controller used for naming and rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub id: Uuid,
    pub cabinet_id: Uuid,
    pub project_name: String,
    pub control_cabinet_nr: String,
    pub ga_device: String,
    pub iws_code: String,
    pub building_group: Option<i32>,
    /// Lowest system-part number among the controller's field devices
    pub min_system_part_nr: Option<i32>,
    pub device_name: String,
    pub device_instance: Option<u32>,
    pub device_description: String,
    pub device_location: String,
    pub ip_address: String,
    pub subnet: String,
    pub gateway: String,
    pub vlan: String,
}

/// System type a field device is grouped under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemType {
    /// System type number, rendered zero-padded to four digits
    #[serde(default)]
    pub number: Option<i32>,

    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Named classification (system part or apparat)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Optional ordering number
    #[serde(default)]
    pub number: Option<i32>,

    /// Long name
    #[serde(default)]
    pub name: String,

    /// Short name used in object names
    #[serde(default)]
    pub short_name: String,
}

/// Optional electrical/mechanical metadata of a field device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub specification_type: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub install_location: String,
    #[serde(default)]
    pub electrical_connection_ph: Option<i32>,
    #[serde(default)]
    pub electrical_connection_acdc: String,
    #[serde(default)]
    pub electrical_connection_amperage: Option<f64>,
    #[serde(default)]
    pub electrical_connection_power: Option<f64>,
    #[serde(default)]
    pub electrical_connection_rotation: Option<i32>,
}

/// State text table attached to a multi-state or binary point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateText {
    #[serde(default)]
    pub states: Vec<String>,
}

/// Notification class of a point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationClass {
    pub nc: i32,
}

/// Alarm definition of a point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmDefinition {
    #[serde(default)]
    pub name: String,
}

/// A single addressable point on a field device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacnetObject {
    /// Free-text note appended to the description
    #[serde(default)]
    pub text_fix: Option<String>,

    /// Visible in the management station
    #[serde(default)]
    pub gms_visible: bool,

    /// Software type, e.g. `AI`, `BV`
    pub software_type: String,

    /// Software number, the numeric part of the point address
    #[serde(default)]
    pub software_number: u32,

    /// Hardware type, e.g. `DI`
    #[serde(default)]
    pub hardware_type: Option<String>,

    /// Number of hardware points this object occupies
    #[serde(default = "default_hardware_quantity")]
    pub hardware_quantity: u32,

    #[serde(default)]
    pub state_text: Option<StateText>,

    #[serde(default)]
    pub notification_class: Option<NotificationClass>,

    #[serde(default)]
    pub alarm_definition: Option<AlarmDefinition>,
}

impl Default for BacnetObject {
    fn default() -> Self {
        Self {
            text_fix: None,
            gms_visible: false,
            software_type: String::new(),
            software_number: 0,
            hardware_type: None,
            hardware_quantity: default_hardware_quantity(),
            state_text: None,
            notification_class: None,
            alarm_definition: None,
        }
    }
}

fn default_hardware_quantity() -> u32 {
    1
}

/// A physical apparatus instance under a controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDevice {
    /// Field device id
    pub id: Uuid,

    /// Owning controller
    pub sps_controller_id: Uuid,

    /// Project the device was captured for
    #[serde(default)]
    pub project_id: Option<Uuid>,

    /// Equipment identifier (BMK)
    #[serde(default)]
    pub bmk: String,

    /// Free-text description appended to the summary row description
    #[serde(default)]
    pub description: Option<String>,

    /// Apparat number, zero-padded to two digits in object names
    #[serde(default)]
    pub apparat_nr: Option<i32>,

    #[serde(default)]
    pub system_type: Option<SystemType>,

    #[serde(default)]
    pub system_part: Option<Classification>,

    #[serde(default)]
    pub apparat: Option<Classification>,

    #[serde(default)]
    pub specification: Option<Specification>,

    #[serde(default)]
    pub bacnet_objects: Vec<BacnetObject>,
}

impl FieldDevice {
    /// System part name, empty when unclassified
    pub fn system_part_name(&self) -> &str {
        self.system_part.as_ref().map_or("", |c| c.name.as_str())
    }

    /// System part short name, empty when unclassified
    pub fn system_part_short(&self) -> &str {
        self.system_part.as_ref().map_or("", |c| c.short_name.as_str())
    }

    /// Apparat name, empty when unclassified
    pub fn apparat_name(&self) -> &str {
        self.apparat.as_ref().map_or("", |c| c.name.as_str())
    }

    /// Apparat short name, empty when unclassified
    pub fn apparat_short(&self) -> &str {
        self.apparat.as_ref().map_or("", |c| c.short_name.as_str())
    }

    /// System type number, if classified
    pub fn system_type_number(&self) -> Option<i32> {
        self.system_type.as_ref().and_then(|t| t.number)
    }
}
