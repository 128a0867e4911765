use std::collections::HashMap;

use log::warn;
use sha2::{Digest, Sha256};

use crate::cdd::models::*;

use super::attributes::*;
use super::models::{Printer, TagMapping};
use super::system_tags::SystemTags;

/// Converts one printer's tags into a `Printer`.
pub fn tags_to_printer(printer_tags: &TagMapping, system_tags: &SystemTags, info_to_display_name: bool) -> Printer {
    let mut tags: HashMap<String, String> = printer_tags.iter().map(|(k, v)| (k.clone(), v.join(","))).collect();
    for (k, v) in system_tags.iter() {
        tags.insert(k.clone(), v.clone());
    }

    let first_value = |key: &str| printer_tags.get(key).and_then(|v| v.first()).cloned();

    let state = match first_value(ATTR_PRINTER_STATE).as_deref() {
        Some("4") => CloudDeviceStateType::Processing,
        Some("5") => CloudDeviceStateType::Stopped,
        _ => CloudDeviceStateType::Idle,
    };

    let vendor_state = printer_tags
        .get(ATTR_PRINTER_STATE_REASONS)
        .filter(|reasons| !reasons.is_empty())
        .map(|reasons| convert_state_reasons(reasons));

    let (markers, marker_state) = convert_markers(
        marker_values(printer_tags, ATTR_MARKER_NAMES),
        marker_values(printer_tags, ATTR_MARKER_TYPES),
        marker_values(printer_tags, ATTR_MARKER_LEVELS),
    );

    let default_display_name = match first_value(ATTR_PRINTER_INFO) {
        Some(info) if info_to_display_name => info,
        _ => String::new(),
    };

    let tags_hash = hash_tags(&tags);

    Printer {
        name: first_value(ATTR_PRINTER_NAME).unwrap_or_default(),
        uuid: first_value(ATTR_PRINTER_UUID).unwrap_or_default(),
        default_display_name,
        state: PrinterStateSection { state, vendor_state, marker_state },
        markers,
        tags,
        tags_hash,
        caps_hash: None,
        connector_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn marker_values<'a>(printer_tags: &'a TagMapping, key: &str) -> &'a [String] {
    printer_tags.get(key).map(Vec::as_slice).unwrap_or_default()
}

fn convert_state_reasons(reasons: &[String]) -> VendorState {
    let mut reasons = reasons.to_vec();
    reasons.sort();

    let item = reasons
        .iter()
        .map(|reason| {
            let state = if reason.ends_with("-error") {
                VendorStateType::Error
            } else if reason.ends_with("-warning") {
                VendorStateType::Warning
            } else {
                // "-report" and anything unrecognized.
                VendorStateType::Info
            };
            VendorStateItem { state, description_localized: new_localized_string(reason) }
        })
        .collect();

    VendorState { item }
}

/// SHA-256 over the tags in key order, so equal tag sets hash equally. Keys
/// and values are NUL terminated.
pub fn hash_tags(tags: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = tags.keys().collect();
    keys.sort();

    let mut hasher = Sha256::new();
    for key in keys {
        hasher.update(key.as_bytes());
        hasher.update([0]);
        hasher.update(tags[key].as_bytes());
        hasher.update([0]);
    }
    hex::encode(hasher.finalize())
}

/// Converts CUPS marker-(names|types|levels) into markers and marker state.
/// Either both are returned, index aligned, or neither.
///
/// Normalizes marker type: toner(Cartridge|-cartridge) => toner,
/// ink(Cartridge|-cartridge|Ribbon|-ribbon) => ink
pub fn convert_markers(names: &[String], types: &[String], levels: &[String]) -> (Option<Vec<Marker>>, Option<MarkerState>) {
    if names.is_empty() || types.is_empty() || levels.is_empty() {
        warn!("Received incomplete markers from CUPS: {}, {}, {}", names.join(";"), types.join(";"), levels.join(";"));
        return (None, None);
    }
    if names.len() != types.len() || types.len() != levels.len() {
        warn!("Received badly-formatted markers from CUPS: {}, {}, {}", names.join(";"), types.join(";"), levels.join(";"));
        return (None, None);
    }

    let mut markers = Vec::with_capacity(names.len());
    let mut items = Vec::with_capacity(names.len());

    for ((name, marker_type), level) in names.iter().zip(types).zip(levels) {
        if name.is_empty() {
            warn!("Received a marker without a name from CUPS");
            return (None, None);
        }

        let marker_type = match marker_type.as_str() {
            "tonerCartridge" | "toner-cartridge" => "toner",
            "inkCartridge" | "ink-cartridge" | "ink-ribbon" | "inkRibbon" => "ink",
            other => other,
        };

        let mut level: i32 = match level.parse() {
            Ok(level) => level,
            Err(e) => {
                warn!("Failed to parse CUPS marker state {name}={level}: {e}");
                return (None, None);
            }
        };

        if level < 0 {
            // The driver doesn't know the level.
            warn!("CUPS marker {name} has unknown level {level}");
            return (None, None);
        }
        if level > 100 {
            // Some drivers set extra bits above the percentage.
            level &= 0x7f;
            if level > 100 {
                warn!("CUPS marker {name} has out of range level {level}");
                return (None, None);
            }
        }

        markers.push(new_marker(name, marker_type));
        items.push(new_marker_state_item(name, level));
    }

    (Some(markers), Some(MarkerState { item: items }))
}

fn new_marker(vendor_id: &str, vendor_type: &str) -> Marker {
    let (marker_type, custom_display_name_localized) = match vendor_type {
        "toner" => (MarkerType::Toner, None),
        "ink" => (MarkerType::Ink, None),
        "staples" => (MarkerType::Staples, None),
        other => (MarkerType::Custom, Some(new_localized_string(other))),
    };

    let color = match marker_type {
        MarkerType::Toner | MarkerType::Ink => Some(match MarkerColorType::from_vendor_id(&vendor_id.to_lowercase()) {
            Some(color_type) => MarkerColor { color_type, custom_display_name_localized: None },
            None => MarkerColor {
                color_type: MarkerColorType::Custom,
                custom_display_name_localized: Some(new_localized_string(vendor_id)),
            },
        }),
        _ => None,
    };

    Marker { vendor_id: vendor_id.to_string(), marker_type, color, custom_display_name_localized }
}

fn new_marker_state_item(vendor_id: &str, level: i32) -> MarkerStateItem {
    let state = if level > 10 { MarkerStateType::Ok } else { MarkerStateType::Exhausted };
    MarkerStateItem { vendor_id: vendor_id.to_string(), state, level_percent: level }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn tag_mapping(entries: &[(&str, &[&str])]) -> TagMapping {
        entries.iter().map(|(k, v)| (k.to_string(), strings(v))).collect()
    }

    fn system_tags() -> SystemTags {
        SystemTags::from_map(HashMap::from([
            ("system-arch".to_string(), "x86_64".to_string()),
            (ATTR_PRINTER_INFO.to_string(), "system wins".to_string()),
        ]))
    }

    #[test]
    fn reasons_are_sorted_and_classified() {
        let tags = tag_mapping(&[
            (ATTR_PRINTER_STATE, &["4"]),
            (ATTR_PRINTER_STATE_REASONS, &["toner-empty-error", "media-low-warning"]),
        ]);

        let printer = tags_to_printer(&tags, &system_tags(), false);

        assert_eq!(printer.state.state, CloudDeviceStateType::Processing);
        let items = printer.state.vendor_state.unwrap().item;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].state, VendorStateType::Warning);
        assert_eq!(items[0].description_localized[0].value, "media-low-warning");
        assert_eq!(items[1].state, VendorStateType::Error);
        assert_eq!(items[1].description_localized[0].value, "toner-empty-error");
    }

    #[test]
    fn report_and_unknown_reasons_are_info() {
        let tags = tag_mapping(&[(ATTR_PRINTER_STATE_REASONS, &["cups-waiting-for-job-completed", "other-report"])]);
        let items = tags_to_printer(&tags, &system_tags(), false).state.vendor_state.unwrap().item;
        assert!(items.iter().all(|i| i.state == VendorStateType::Info));
    }

    #[test]
    fn empty_reasons_produce_no_vendor_state() {
        let tags = tag_mapping(&[(ATTR_PRINTER_STATE_REASONS, &[])]);
        assert!(tags_to_printer(&tags, &system_tags(), false).state.vendor_state.is_none());
    }

    #[test]
    fn printer_state_codes_map_with_idle_default() {
        for (code, expected) in [
            (Some("3"), CloudDeviceStateType::Idle),
            (Some("4"), CloudDeviceStateType::Processing),
            (Some("5"), CloudDeviceStateType::Stopped),
            (Some("17"), CloudDeviceStateType::Idle),
            (None, CloudDeviceStateType::Idle),
        ] {
            let tags = match code {
                Some(code) => tag_mapping(&[(ATTR_PRINTER_STATE, &[code])]),
                None => TagMapping::new(),
            };
            assert_eq!(tags_to_printer(&tags, &system_tags(), false).state.state, expected);
        }
    }

    #[test]
    fn identity_tags_and_display_name() {
        let tags = tag_mapping(&[
            (ATTR_PRINTER_NAME, &["office"]),
            (ATTR_PRINTER_UUID, &["urn:uuid:1234"]),
            (ATTR_PRINTER_INFO, &["Office Laser"]),
            ("document-format-supported", &["application/pdf", "image/jpeg"]),
        ]);

        let printer = tags_to_printer(&tags, &system_tags(), true);

        assert_eq!(printer.name, "office");
        assert_eq!(printer.uuid, "urn:uuid:1234");
        assert_eq!(printer.default_display_name, "Office Laser");
        assert_eq!(printer.tags["document-format-supported"], "application/pdf,image/jpeg");
        assert_eq!(printer.tags["system-arch"], "x86_64");
        assert_eq!(printer.tags[ATTR_PRINTER_INFO], "system wins");
        assert!(printer.caps_hash.is_none());

        let printer = tags_to_printer(&tags, &system_tags(), false);
        assert_eq!(printer.default_display_name, "");
    }

    #[test]
    fn missing_identity_is_empty() {
        let tags = tag_mapping(&[(ATTR_PRINTER_NAME, &[])]);
        let printer = tags_to_printer(&tags, &system_tags(), true);
        assert_eq!(printer.name, "");
        assert_eq!(printer.uuid, "");
    }

    #[test]
    fn tags_hash_is_deterministic_and_content_derived() {
        let a = HashMap::from([("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]);
        let b = HashMap::from([("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]);
        let c = HashMap::from([("a".to_string(), "1".to_string()), ("b".to_string(), "3".to_string())]);

        assert_eq!(hash_tags(&a), hash_tags(&b));
        assert_ne!(hash_tags(&a), hash_tags(&c));
        assert_eq!(hash_tags(&a).len(), 64);
    }

    #[test]
    fn tags_hash_separates_keys_from_values() {
        let a = HashMap::from([("ab".to_string(), "c".to_string())]);
        let b = HashMap::from([("a".to_string(), "bc".to_string())]);
        let c = HashMap::from([("a".to_string(), "b".to_string()), ("c".to_string(), String::new())]);

        assert_ne!(hash_tags(&a), hash_tags(&b));
        assert_ne!(hash_tags(&b), hash_tags(&c));
    }

    #[test]
    fn markers_are_converted_index_aligned() {
        let (markers, state) = convert_markers(
            &strings(&["black", "Cyan", "staples", "waste"]),
            &strings(&["tonerCartridge", "ink-ribbon", "staples", "wasteToner"]),
            &strings(&["80", "10", "11", "0"]),
        );
        let markers = markers.unwrap();
        let state = state.unwrap();
        assert_eq!(markers.len(), 4);
        assert_eq!(state.item.len(), 4);

        assert_eq!(markers[0].marker_type, MarkerType::Toner);
        assert_eq!(markers[0].color.as_ref().unwrap().color_type, MarkerColorType::Black);
        assert_eq!(markers[1].marker_type, MarkerType::Ink);
        assert_eq!(markers[1].color.as_ref().unwrap().color_type, MarkerColorType::Cyan);
        assert_eq!(markers[2].marker_type, MarkerType::Staples);
        assert!(markers[2].color.is_none());
        assert_eq!(markers[3].marker_type, MarkerType::Custom);
        assert_eq!(markers[3].custom_display_name_localized.as_ref().unwrap()[0].value, "wasteToner");

        assert_eq!(state.item[0].state, MarkerStateType::Ok);
        assert_eq!(state.item[1].state, MarkerStateType::Exhausted);
        assert_eq!(state.item[2].state, MarkerStateType::Ok);
        assert_eq!(state.item[3].state, MarkerStateType::Exhausted);
        assert_eq!(state.item[2].vendor_id, "staples");
    }

    #[test]
    fn unknown_marker_colors_are_custom() {
        let (markers, _) = convert_markers(&strings(&["Orange"]), &strings(&["toner"]), &strings(&["50"]));
        let color = markers.unwrap()[0].color.clone().unwrap();
        assert_eq!(color.color_type, MarkerColorType::Custom);
        assert_eq!(color.custom_display_name_localized.unwrap()[0].value, "Orange");
    }

    #[test]
    fn flagged_levels_are_masked() {
        // 0x80 | 55
        let (_, state) = convert_markers(&strings(&["black"]), &strings(&["toner"]), &strings(&["183"]));
        assert_eq!(state.unwrap().item[0].level_percent, 55);
    }

    #[test]
    fn level_status_threshold() {
        for level in 0..=100 {
            let (_, state) = convert_markers(&strings(&["black"]), &strings(&["toner"]), &strings(&[&level.to_string()]));
            let expected = if level > 10 { MarkerStateType::Ok } else { MarkerStateType::Exhausted };
            assert_eq!(state.unwrap().item[0].state, expected, "level {level}");
        }
    }

    #[test]
    fn bad_markers_are_rejected_entirely() {
        let cases: Vec<(&[&str], &[&str], &[&str])> = vec![
            (&[], &["toner"], &["50"]),
            (&["black"], &[], &["50"]),
            (&["black"], &["toner"], &[]),
            (&["black", "cyan"], &["toner"], &["50"]),
            (&["black", ""], &["toner", "toner"], &["50", "50"]),
            (&["black", "cyan"], &["toner", "toner"], &["50", "half"]),
            (&["black", "cyan"], &["toner", "toner"], &["50", "-1"]),
            // 0x7f & 127 = 127, still out of range.
            (&["black", "cyan"], &["toner", "toner"], &["50", "127"]),
        ];

        for (names, types, levels) in cases {
            let result = convert_markers(&strings(names), &strings(types), &strings(levels));
            assert_eq!(result, (None, None), "{names:?} {types:?} {levels:?}");
        }
    }

    #[test]
    fn markers_attach_to_printer_and_state() {
        let tags = tag_mapping(&[
            (ATTR_MARKER_NAMES, &["black"]),
            (ATTR_MARKER_TYPES, &["toner"]),
            (ATTR_MARKER_LEVELS, &["42"]),
        ]);
        let printer = tags_to_printer(&tags, &system_tags(), false);
        assert_eq!(printer.markers.unwrap().len(), 1);
        assert_eq!(printer.state.marker_state.unwrap().item[0].level_percent, 42);

        let printer = tags_to_printer(&TagMapping::new(), &system_tags(), false);
        assert!(printer.markers.is_none());
        assert!(printer.state.marker_state.is_none());
    }
}
