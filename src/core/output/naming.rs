//! Sheet, object and point naming

use crate::domain::{BacnetObject, Controller, FieldDevice};
use std::collections::HashSet;
use uuid::Uuid;

/// Maximum sheet name length accepted by spreadsheet applications
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];

/// Sheet name for a controller's GA-device label
///
/// Forbidden characters become `-` and the result is cut to 31 characters.
/// An empty label falls back to `controller-<first 8 hex digits of id>`.
///
/// ```
/// use ga_export::core::output::naming::sanitize_sheet_name;
/// use uuid::Uuid;
///
/// assert_eq!(sanitize_sheet_name("A/B?", &Uuid::nil()), "A-B-");
/// assert_eq!(sanitize_sheet_name("", &Uuid::nil()), "controller-00000000");
/// ```
pub fn sanitize_sheet_name(label: &str, controller_id: &Uuid) -> String {
    let replaced: String = label
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '-' } else { c })
        .collect();
    // Leading/trailing apostrophes are rejected by spreadsheet applications
    let name: String = replaced
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let name = name.trim_end_matches('\'').to_string();

    if name.trim().is_empty() {
        let hex = controller_id.simple().to_string();
        return format!("controller-{}", &hex[..8]);
    }
    name
}

/// Hands out sheet names unique within one workbook
///
/// Names compare case-insensitively. A repeated name gets a `-2`, `-3`, ...
/// suffix, shortening the base so the result stays within 31 characters.
#[derive(Debug, Default)]
pub struct SheetNames {
    used: HashSet<String>,
}

impl SheetNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `base`, or the first free suffixed variant of it
    pub fn assign(&mut self, base: &str) -> String {
        if self.used.insert(base.to_lowercase()) {
            return base.to_string();
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("-{n}");
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(keep).collect();
            let candidate = format!("{stem}{suffix}");
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Point address of a BACnet object: upper-cased software type and a
/// two-digit number, e.g. `AI03`
pub fn point_address(object: &BacnetObject) -> String {
    format!(
        "{}{:02}",
        object.software_type.trim().to_uppercase(),
        object.software_number
    )
}

/// Object name of a field device, or of one of its points when
/// `point_address` is given
///
/// Non-empty parts are joined with `_`: IWS code, building group, four-digit
/// system type number, GA device, then system part short, apparat short and
/// two-digit apparat number run together.
pub fn object_name(
    controller: &Controller,
    device: &FieldDevice,
    point_address: Option<&str>,
) -> String {
    let apparat_part = format!(
        "{}{}{}",
        device.system_part_short(),
        device.apparat_short(),
        device
            .apparat_nr
            .map(|nr| format!("{nr:02}"))
            .unwrap_or_default()
    );

    let parts = [
        controller.iws_code.clone(),
        controller
            .building_group
            .map(|g| g.to_string())
            .unwrap_or_default(),
        device
            .system_type_number()
            .map(|n| format!("{n:04}"))
            .unwrap_or_default(),
        controller.ga_device.clone(),
        apparat_part,
    ];

    let mut name = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if let Some(address) = point_address.map(str::trim).filter(|a| !a.is_empty()) {
        name.push('_');
        name.push_str(address);
    }
    name
}

/// Human readable description of a device or point
///
/// `"<system part> <apparat> - <system part short><apparat short>"`, followed
/// by `note` when present.
pub fn description(device: &FieldDevice, note: Option<&str>) -> String {
    let long = format!("{} {}", device.system_part_name(), device.apparat_name());
    let short = format!("{}{}", device.system_part_short(), device.apparat_short());
    let mut text = format!("{} - {}", long.trim(), short.trim());

    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
        text.push(' ');
        text.push_str(note);
    }
    text.trim().to_string()
}
