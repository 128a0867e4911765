use std::collections::HashMap;

use crate::cdd::models::*;

/// Converts a cloud job ticket into CUPS job options. Sections that are
/// absent, or carry a value CUPS has no option for, are left out.
pub fn ticket_to_options(ticket: &CloudJobTicket) -> HashMap<String, String> {
    let print = &ticket.print;
    let mut m = HashMap::new();

    for vti in &print.vendor_ticket_item {
        m.insert(vti.id.clone(), vti.value.clone());
    }

    if let Some(color) = &print.color {
        let model = match color.color_type {
            ColorType::CustomColor | ColorType::CustomMonochrome => Some(color.vendor_id.as_str()).filter(|v| !v.is_empty()),
            other => other.as_str(),
        };
        if let Some(model) = model {
            m.insert("ColorModel".to_string(), model.to_string());
        }
    }

    if let Some(duplex) = &print.duplex {
        let value = match duplex.duplex_type {
            DuplexType::LongEdge => Some("DuplexNoTumble"),
            DuplexType::ShortEdge => Some("DuplexTumble"),
            DuplexType::NoDuplex => Some("None"),
            DuplexType::Unknown => None,
        };
        if let Some(value) = value {
            m.insert("Duplex".to_string(), value.to_string());
        }
    }

    if let Some(orientation) = &print.page_orientation {
        // RFC 8011 orientation-requested enum.
        let value = match orientation.orientation_type {
            PageOrientationType::Portrait => Some("3"),
            PageOrientationType::Landscape => Some("4"),
            _ => None,
        };
        if let Some(value) = value {
            m.insert("orientation-requested".to_string(), value.to_string());
        }
    }

    if let Some(copies) = &print.copies {
        m.insert("copies".to_string(), copies.copies.to_string());
    }

    if let Some(margins) = &print.margins {
        m.insert("page-top".to_string(), microns_to_points(margins.top_microns));
        m.insert("page-right".to_string(), microns_to_points(margins.right_microns));
        m.insert("page-bottom".to_string(), microns_to_points(margins.bottom_microns));
        m.insert("page-left".to_string(), microns_to_points(margins.left_microns));
    }

    if let Some(dpi) = &print.dpi {
        let resolution = if dpi.vendor_id.is_empty() {
            format!("{}x{}dpi", dpi.horizontal_dpi, dpi.vertical_dpi)
        } else {
            dpi.vendor_id.clone()
        };
        m.insert("Resolution".to_string(), resolution);
    }

    if let Some(fit) = &print.fit_to_page {
        let value = match fit.fit_type {
            FitToPageType::FitToPage => Some("true"),
            FitToPageType::NoFitting => Some("false"),
            _ => None,
        };
        if let Some(value) = value {
            m.insert("fit-to-page".to_string(), value.to_string());
        }
    }

    if let Some(range) = print.page_range.as_ref().filter(|r| !r.interval.is_empty()) {
        let page_ranges: Vec<String> = range
            .interval
            .iter()
            .map(|interval| match interval.end {
                None | Some(0) => interval.start.to_string(),
                Some(end) => format!("{}-{}", interval.start, end),
            })
            .collect();
        m.insert("page-ranges".to_string(), page_ranges.join(","));
    }

    if let Some(media) = print.media_size.as_ref().filter(|size| !size.vendor_id.is_empty()) {
        m.insert("media".to_string(), media.vendor_id.clone());
    }

    if let Some(collate) = &print.collate {
        m.insert("Collate".to_string(), collate.collate.to_string());
    }

    if let Some(reverse) = &print.reverse_order {
        let order = if reverse.reverse_order { "reverse" } else { "normal" };
        m.insert("outputorder".to_string(), order.to_string());
    }

    m
}

/// Micrometers to 1/72 inch, rounded half up.
fn microns_to_points(microns: i32) -> String {
    ((microns as f32 * 72.0 / 25400.0 + 0.5) as i32).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(print: PrintTicketSection) -> HashMap<String, String> {
        ticket_to_options(&CloudJobTicket { version: "1.0".to_string(), print })
    }

    #[test]
    fn empty_ticket_has_no_options() {
        assert!(options(PrintTicketSection::default()).is_empty());
    }

    #[test]
    fn full_ticket() {
        let ticket: CloudJobTicket = serde_json::from_str(
            r#"{
                "version": "1.0",
                "print": {
                    "vendorTicketItem": [{"id": "InputSlot", "value": "Tray2"}],
                    "color": {"type": "STANDARD_MONOCHROME"},
                    "duplex": {"type": "LONG_EDGE"},
                    "pageOrientation": {"type": "LANDSCAPE"},
                    "copies": {"copies": 3},
                    "margins": {"topMicrons": 25400, "rightMicrons": 12700, "bottomMicrons": 0, "leftMicrons": 1000},
                    "dpi": {"horizontalDpi": 600, "verticalDpi": 1200},
                    "fitToPage": {"type": "FIT_TO_PAGE"},
                    "pageRange": {"interval": [{"start": 1, "end": 3}, {"start": 7}, {"start": 9, "end": 0}]},
                    "mediaSize": {"widthMicrons": 210000, "heightMicrons": 297000, "vendorId": "iso_a4_210x297mm"},
                    "collate": {"collate": false},
                    "reverseOrder": {"reverseOrder": true}
                }
            }"#,
        )
        .unwrap();

        let m = ticket_to_options(&ticket);
        let expected: HashMap<String, String> = [
            ("InputSlot", "Tray2"),
            ("ColorModel", "STANDARD_MONOCHROME"),
            ("Duplex", "DuplexNoTumble"),
            ("orientation-requested", "4"),
            ("copies", "3"),
            ("page-top", "72"),
            ("page-right", "36"),
            ("page-bottom", "0"),
            ("page-left", "3"),
            ("Resolution", "600x1200dpi"),
            ("fit-to-page", "true"),
            ("page-ranges", "1-3,7,9"),
            ("media", "iso_a4_210x297mm"),
            ("Collate", "false"),
            ("outputorder", "reverse"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(m, expected);
    }

    #[test]
    fn margin_conversion() {
        assert_eq!(microns_to_points(25400), "72");
        assert_eq!(microns_to_points(0), "0");
        assert_eq!(microns_to_points(12700), "36");
    }

    #[test]
    fn custom_color_uses_vendor_id() {
        let m = options(PrintTicketSection {
            color: Some(ColorTicketItem { vendor_id: "Gray".to_string(), color_type: ColorType::CustomMonochrome }),
            ..Default::default()
        });
        assert_eq!(m["ColorModel"], "Gray");

        let m = options(PrintTicketSection {
            color: Some(ColorTicketItem { vendor_id: String::new(), color_type: ColorType::CustomColor }),
            ..Default::default()
        });
        assert!(!m.contains_key("ColorModel"));
    }

    #[test]
    fn duplex_values() {
        for (duplex_type, expected) in [
            (DuplexType::LongEdge, Some("DuplexNoTumble")),
            (DuplexType::ShortEdge, Some("DuplexTumble")),
            (DuplexType::NoDuplex, Some("None")),
            (DuplexType::Unknown, None),
        ] {
            let m = options(PrintTicketSection { duplex: Some(DuplexTicketItem { duplex_type }), ..Default::default() });
            assert_eq!(m.get("Duplex").map(String::as_str), expected);
        }
    }

    #[test]
    fn unrecognized_enums_emit_nothing() {
        let m = options(PrintTicketSection {
            page_orientation: Some(PageOrientationTicketItem { orientation_type: PageOrientationType::Auto }),
            fit_to_page: Some(FitToPageTicketItem { fit_type: FitToPageType::ShrinkToPage }),
            color: Some(ColorTicketItem { vendor_id: "x".to_string(), color_type: ColorType::Unknown }),
            page_range: Some(PageRangeTicketItem { interval: Vec::new() }),
            media_size: Some(MediaSizeTicketItem::default()),
            ..Default::default()
        });
        assert!(m.is_empty(), "{m:?}");
    }

    #[test]
    fn dpi_prefers_vendor_id() {
        let m = options(PrintTicketSection {
            dpi: Some(DpiTicketItem { horizontal_dpi: 300, vertical_dpi: 300, vendor_id: "300dpiDraft".to_string() }),
            ..Default::default()
        });
        assert_eq!(m["Resolution"], "300dpiDraft");
    }

    #[test]
    fn booleans() {
        let m = options(PrintTicketSection {
            fit_to_page: Some(FitToPageTicketItem { fit_type: FitToPageType::NoFitting }),
            collate: Some(CollateTicketItem { collate: true }),
            reverse_order: Some(ReverseOrderTicketItem { reverse_order: false }),
            ..Default::default()
        });
        assert_eq!(m["fit-to-page"], "false");
        assert_eq!(m["Collate"], "true");
        assert_eq!(m["outputorder"], "normal");
    }
}
