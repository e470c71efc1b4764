//! Sheet row model
//!
//! Pure functions turning a controller and its field devices into cells. The
//! workbook writer only decides how cells look, never what they contain.

use super::naming::{description, object_name, point_address};
use crate::domain::{BacnetObject, Controller, FieldDevice, Specification};

/// Software point-type categories, in column order
pub const SOFTWARE_TYPES: [&str; 14] = [
    "AI", "AO", "AV", "BI", "BO", "BV", "MI", "MO", "MV", "CSV", "SCH", "CAL", "NC", "TL",
];

/// Hardware point-type categories, in column order
pub const HARDWARE_TYPES: [&str; 4] = ["DI", "DO", "AI", "AO"];

const LEADING_HEADINGS: [&str; 10] = [
    "Name",
    "Description",
    "BMK",
    "Visible",
    "System type",
    "System part",
    "System part short",
    "Apparat",
    "Apparat short",
    "Point address",
];

const POINT_HEADINGS: [&str; 3] = ["State texts", "Notification class", "Alarm definition"];

const SPECIFICATION_HEADINGS: [&str; 10] = [
    "Supplier",
    "Brand",
    "Type",
    "Size",
    "Install location",
    "Phase",
    "AC/DC",
    "Amperage",
    "Power",
    "Rotation",
];

/// Number of rows in the controller header block
pub const HEADER_ROWS: usize = 11;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    fn opt_number<N: Into<f64>>(value: Option<N>) -> Self {
        value.map_or(Cell::Empty, |n| Cell::Number(n.into()))
    }
}

/// Whether a row describes a whole device or one of its points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Summary,
    Detail,
}

/// One data row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

/// Column headings of the data table
pub fn column_headings() -> Vec<String> {
    LEADING_HEADINGS
        .iter()
        .map(|h| h.to_string())
        .chain(SOFTWARE_TYPES.iter().map(|t| t.to_string()))
        .chain(HARDWARE_TYPES.iter().map(|t| format!("HW {t}")))
        .chain(POINT_HEADINGS.iter().map(|h| h.to_string()))
        .chain(SPECIFICATION_HEADINGS.iter().map(|h| h.to_string()))
        .collect()
}

/// Key/value rows describing the controller above the data table
pub fn header_block(controller: &Controller) -> [(&'static str, String); HEADER_ROWS] {
    [
        ("Project", controller.project_name.clone()),
        ("GA device", controller.ga_device.clone()),
        ("Control cabinet", controller.control_cabinet_nr.clone()),
        ("Device name", controller.device_name.clone()),
        (
            "Device instance",
            controller
                .device_instance
                .map(|i| i.to_string())
                .unwrap_or_default(),
        ),
        ("Device description", controller.device_description.clone()),
        ("Device location", controller.device_location.clone()),
        ("IP address", controller.ip_address.clone()),
        ("Subnet", controller.subnet.clone()),
        ("Gateway", controller.gateway.clone()),
        ("VLAN", controller.vlan.clone()),
    ]
}

/// Point-type counters of one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub software: [u32; SOFTWARE_TYPES.len()],
    pub hardware: [u32; HARDWARE_TYPES.len()],
}

impl TypeCounts {
    /// Counts of a single point: 1 in its software and hardware column
    pub fn of_object(object: &BacnetObject) -> Self {
        let mut counts = Self::default();
        if let Some(i) = category_index(&SOFTWARE_TYPES, &object.software_type) {
            counts.software[i] = 1;
        }
        if let Some(i) = object
            .hardware_type
            .as_deref()
            .and_then(|t| category_index(&HARDWARE_TYPES, t))
        {
            counts.hardware[i] = 1;
        }
        counts
    }

    /// Counts across a device's points
    ///
    /// Software columns count points; hardware columns sum hardware quantities.
    pub fn of_device(objects: &[BacnetObject]) -> Self {
        let mut counts = Self::default();
        for object in objects {
            if let Some(i) = category_index(&SOFTWARE_TYPES, &object.software_type) {
                counts.software[i] += 1;
            }
            if let Some(i) = object
                .hardware_type
                .as_deref()
                .and_then(|t| category_index(&HARDWARE_TYPES, t))
            {
                counts.hardware[i] += object.hardware_quantity;
            }
        }
        counts
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.software
            .iter()
            .chain(self.hardware.iter())
            .map(|&n| Cell::Number(f64::from(n)))
    }
}

fn category_index(categories: &[&str], value: &str) -> Option<usize> {
    let value = value.trim();
    categories.iter().position(|c| c.eq_ignore_ascii_case(value))
}

/// Summary row of a device followed by one detail row per BACnet object
pub fn device_rows(controller: &Controller, device: &FieldDevice) -> Vec<Row> {
    let mut rows = Vec::with_capacity(device.bacnet_objects.len() + 1);

    let visible = device
        .bacnet_objects
        .first()
        .is_some_and(|o| o.gms_visible);
    let mut summary = leading_cells(
        device,
        object_name(controller, device, None),
        description(device, None),
        visible,
        None,
    );
    summary.extend(TypeCounts::of_device(&device.bacnet_objects).cells());
    summary.extend([Cell::Empty, Cell::Empty, Cell::Empty]);
    summary.extend(specification_cells(device.specification.as_ref()));
    rows.push(Row {
        kind: RowKind::Summary,
        cells: summary,
    });

    for object in &device.bacnet_objects {
        let address = point_address(object);
        let mut detail = leading_cells(
            device,
            object_name(controller, device, Some(&address)),
            description(device, object.text_fix.as_deref()),
            object.gms_visible,
            Some(address),
        );
        detail.extend(TypeCounts::of_object(object).cells());
        detail.push(Cell::text(
            object
                .state_text
                .as_ref()
                .map(|s| s.states.join(", "))
                .unwrap_or_default(),
        ));
        detail.push(Cell::opt_number(object.notification_class.as_ref().map(|n| n.nc)));
        detail.push(Cell::text(
            object
                .alarm_definition
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
        ));
        detail.extend(std::iter::repeat(Cell::Empty).take(SPECIFICATION_HEADINGS.len()));
        rows.push(Row {
            kind: RowKind::Detail,
            cells: detail,
        });
    }

    rows
}

fn leading_cells(
    device: &FieldDevice,
    name: String,
    description: String,
    visible: bool,
    address: Option<String>,
) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(column_count());
    cells.push(Cell::text(name));
    cells.push(Cell::text(description));
    cells.push(Cell::text(device.bmk.clone()));
    cells.push(Cell::Bool(visible));
    cells.push(Cell::text(
        device
            .system_type
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_default(),
    ));
    cells.push(Cell::text(device.system_part_name()));
    cells.push(Cell::text(device.system_part_short()));
    cells.push(Cell::text(device.apparat_name()));
    cells.push(Cell::text(device.apparat_short()));
    cells.push(address.map_or(Cell::Empty, Cell::text));
    cells
}

fn specification_cells(spec: Option<&Specification>) -> Vec<Cell> {
    let Some(spec) = spec else {
        return vec![Cell::Empty; SPECIFICATION_HEADINGS.len()];
    };
    vec![
        Cell::text(spec.supplier.clone()),
        Cell::text(spec.brand.clone()),
        Cell::text(spec.specification_type.clone()),
        Cell::text(spec.size.clone()),
        Cell::text(spec.install_location.clone()),
        Cell::opt_number(spec.electrical_connection_ph),
        Cell::text(spec.electrical_connection_acdc.clone()),
        Cell::opt_number(spec.electrical_connection_amperage),
        Cell::opt_number(spec.electrical_connection_power),
        Cell::opt_number(spec.electrical_connection_rotation),
    ]
}

/// Total number of columns in the data table
pub fn column_count() -> usize {
    LEADING_HEADINGS.len()
        + SOFTWARE_TYPES.len()
        + HARDWARE_TYPES.len()
        + POINT_HEADINGS.len()
        + SPECIFICATION_HEADINGS.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlarmDefinition, Classification, NotificationClass, StateText};

    const SW_OFFSET: usize = LEADING_HEADINGS.len();
    const HW_OFFSET: usize = SW_OFFSET + SOFTWARE_TYPES.len();
    const POINT_OFFSET: usize = HW_OFFSET + HARDWARE_TYPES.len();
    const SPEC_OFFSET: usize = POINT_OFFSET + POINT_HEADINGS.len();

    fn object(software: &str, number: u32, hardware: Option<&str>, quantity: u32) -> BacnetObject {
        BacnetObject {
            software_type: software.to_string(),
            software_number: number,
            hardware_type: hardware.map(str::to_string),
            hardware_quantity: quantity,
            ..Default::default()
        }
    }

    fn device() -> FieldDevice {
        FieldDevice {
            bmk: "B01".to_string(),
            apparat_nr: Some(1),
            system_part: Some(Classification {
                number: Some(1),
                name: "Heizung".to_string(),
                short_name: "HZ".to_string(),
            }),
            apparat: Some(Classification {
                number: None,
                name: "Pumpe".to_string(),
                short_name: "PU".to_string(),
            }),
            specification: Some(Specification {
                supplier: "ACME".to_string(),
                electrical_connection_ph: Some(3),
                electrical_connection_power: Some(1.5),
                ..Default::default()
            }),
            bacnet_objects: vec![
                BacnetObject {
                    gms_visible: true,
                    text_fix: Some("Betrieb".to_string()),
                    state_text: Some(StateText {
                        states: vec!["Aus".to_string(), "Ein".to_string()],
                    }),
                    notification_class: Some(NotificationClass { nc: 7 }),
                    alarm_definition: Some(AlarmDefinition {
                        name: "Störung".to_string(),
                    }),
                    ..object("bi", 1, Some("DI"), 1)
                },
                object("AI", 2, Some("ai"), 2),
                object("AI", 3, None, 1),
                object("XYZ", 4, Some("??"), 1),
            ],
            ..Default::default()
        }
    }

    fn controller() -> Controller {
        Controller {
            iws_code: "ABCD".to_string(),
            building_group: Some(1),
            ga_device: "AS01".to_string(),
            ..Default::default()
        }
    }

    fn number(cell: &Cell) -> f64 {
        match cell {
            Cell::Number(n) => *n,
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn test_headings_match_row_width() {
        let headings = column_headings();
        assert_eq!(headings.len(), column_count());
        for row in device_rows(&controller(), &device()) {
            assert_eq!(row.cells.len(), headings.len());
        }
        assert_eq!(headings[HW_OFFSET], "HW DI");
    }

    #[test]
    fn test_summary_row_aggregates_objects() {
        let rows = device_rows(&controller(), &device());
        assert_eq!(rows.len(), 5);

        let summary = &rows[0];
        assert_eq!(summary.kind, RowKind::Summary);
        assert_eq!(summary.cells[0], Cell::Text("ABCD_1_AS01_HZPU01".to_string()));
        assert_eq!(summary.cells[3], Cell::Bool(true));

        let ai = SW_OFFSET;
        let bi = SW_OFFSET + 3;
        assert_eq!(number(&summary.cells[ai]), 2.0);
        assert_eq!(number(&summary.cells[bi]), 1.0);

        let hw_di = HW_OFFSET;
        let hw_ai = HW_OFFSET + 2;
        assert_eq!(number(&summary.cells[hw_di]), 1.0);
        assert_eq!(number(&summary.cells[hw_ai]), 2.0);

        assert_eq!(summary.cells[SPEC_OFFSET], Cell::Text("ACME".to_string()));
        assert_eq!(summary.cells[SPEC_OFFSET + 5], Cell::Number(3.0));
        assert_eq!(summary.cells[SPEC_OFFSET + 8], Cell::Number(1.5));
        assert_eq!(summary.cells[SPEC_OFFSET + 9], Cell::Empty);
    }

    #[test]
    fn test_detail_rows_carry_single_counts() {
        let rows = device_rows(&controller(), &device());
        let detail = &rows[1];

        assert_eq!(detail.kind, RowKind::Detail);
        assert_eq!(
            detail.cells[0],
            Cell::Text("ABCD_1_AS01_HZPU01_BI01".to_string())
        );
        assert_eq!(
            detail.cells[1],
            Cell::Text("Heizung Pumpe - HZPU Betrieb".to_string())
        );
        assert_eq!(detail.cells[9], Cell::Text("BI01".to_string()));

        let counts: Vec<f64> = detail.cells[SW_OFFSET..POINT_OFFSET]
            .iter()
            .map(number)
            .collect();
        assert_eq!(counts.iter().sum::<f64>(), 2.0);
        assert_eq!(counts[3], 1.0);
        assert_eq!(counts[SOFTWARE_TYPES.len()], 1.0);

        assert_eq!(detail.cells[POINT_OFFSET], Cell::Text("Aus, Ein".to_string()));
        assert_eq!(detail.cells[POINT_OFFSET + 1], Cell::Number(7.0));
        assert_eq!(detail.cells[POINT_OFFSET + 2], Cell::Text("Störung".to_string()));
    }

    #[test]
    fn test_hardware_quantity_is_one_per_detail_row() {
        let rows = device_rows(&controller(), &device());
        let detail = &rows[2];
        assert_eq!(number(&detail.cells[HW_OFFSET + 2]), 1.0);
    }

    #[test]
    fn test_unknown_types_are_not_counted() {
        let rows = device_rows(&controller(), &device());
        let unknown = &rows[4];
        let total: f64 = unknown.cells[SW_OFFSET..POINT_OFFSET].iter().map(number).sum();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_only_detail_rows_carry_a_note() {
        let device = FieldDevice {
            description: Some("Kesselhaus".to_string()),
            ..device()
        };
        let rows = device_rows(&controller(), &device);

        assert_eq!(rows[0].cells[1], Cell::Text("Heizung Pumpe - HZPU".to_string()));
        assert_eq!(
            rows[1].cells[1],
            Cell::Text("Heizung Pumpe - HZPU Betrieb".to_string())
        );
        assert_eq!(rows[2].cells[1], Cell::Text("Heizung Pumpe - HZPU".to_string()));
    }

    #[test]
    fn test_device_without_objects() {
        let device = FieldDevice {
            bmk: "B02".to_string(),
            ..Default::default()
        };
        let rows = device_rows(&controller(), &device);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[3], Cell::Bool(false));
        assert!(rows[0].cells[SPEC_OFFSET..].iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn test_header_block() {
        let controller = Controller {
            project_name: "Campus".to_string(),
            device_instance: Some(2001),
            vlan: "12".to_string(),
            ..controller()
        };
        let block = header_block(&controller);
        assert_eq!(block[0], ("Project", "Campus".to_string()));
        assert_eq!(block[4], ("Device instance", "2001".to_string()));
        assert_eq!(block[10], ("VLAN", "12".to_string()));
    }
}
