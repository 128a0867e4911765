use chrono::{FixedOffset, NaiveDate, TimeDelta};

use super::models::{GroupTag, RawAttribute, RawValue, ResolutionUnit, TagMapping, ValueTag};

pub const ATTR_PRINTER_NAME: &str = "printer-name";
pub const ATTR_PRINTER_INFO: &str = "printer-info";
pub const ATTR_PRINTER_MAKE_AND_MODEL: &str = "printer-make-and-model";
pub const ATTR_PRINTER_UUID: &str = "printer-uuid";
pub const ATTR_PRINTER_STATE: &str = "printer-state";
pub const ATTR_PRINTER_STATE_REASONS: &str = "printer-state-reasons";
pub const ATTR_MARKER_NAMES: &str = "marker-names";
pub const ATTR_MARKER_TYPES: &str = "marker-types";
pub const ATTR_MARKER_LEVELS: &str = "marker-levels";

pub const ATTR_JOB_STATE: &str = "job-state";
pub const ATTR_JOB_MEDIA_SHEETS_COMPLETED: &str = "job-media-sheets-completed";

/// Attributes the printer mapper reads.
pub const REQUIRED_PRINTER_ATTRIBUTES: [&str; 9] = [
    ATTR_PRINTER_NAME,
    ATTR_PRINTER_INFO,
    ATTR_PRINTER_MAKE_AND_MODEL,
    ATTR_PRINTER_UUID,
    ATTR_PRINTER_STATE,
    ATTR_PRINTER_STATE_REASONS,
    ATTR_MARKER_NAMES,
    ATTR_MARKER_TYPES,
    ATTR_MARKER_LEVELS,
];

pub const JOB_ATTRIBUTES: [&str; 2] = [ATTR_JOB_STATE, ATTR_JOB_MEDIA_SHEETS_COMPLETED];

const UNSUPPORTED_TYPE: &str = "unknown or unsupported type";

/// Splits a response into one tag mapping per entity of `group`, e.g. one
/// per printer. Every uninterrupted run of `group` records is one entity.
pub fn response_to_tag_mappings(attributes: &[RawAttribute], group: GroupTag) -> Vec<TagMapping> {
    attributes
        .split(|a| a.group != group)
        .filter(|run| !run.is_empty())
        .map(attributes_to_tags)
        .collect()
}

/// Decodes the attributes of a single entity into a tag mapping.
pub fn attributes_to_tags(attributes: &[RawAttribute]) -> TagMapping {
    attributes
        .iter()
        .map(|a| (a.name.clone(), repair_values(decode_values(a))))
        .collect()
}

/// Renders every value of `attribute` as a string, according to its value tag.
pub fn decode_values(attribute: &RawAttribute) -> Vec<String> {
    let values = &attribute.values;
    match attribute.value_tag {
        ValueTag::NoValue | ValueTag::NotSettable => Vec::new(),
        ValueTag::Integer | ValueTag::Enum => values.iter().map(decode_integer).collect(),
        ValueTag::Boolean => values.iter().map(decode_boolean).collect(),
        ValueTag::OctetString
        | ValueTag::Text
        | ValueTag::Name
        | ValueTag::Keyword
        | ValueTag::Uri
        | ValueTag::Charset
        | ValueTag::NaturalLanguage
        | ValueTag::MimeMediaType => values.iter().map(decode_text).collect(),
        ValueTag::DateTime => values.iter().map(decode_date).collect(),
        ValueTag::Resolution => values.iter().map(decode_resolution).collect(),
        ValueTag::RangeOfInteger => values.iter().map(decode_range).collect(),
        _ if values.is_empty() => Vec::new(),
        _ => vec![UNSUPPORTED_TYPE.to_string()],
    }
}

fn decode_integer(value: &RawValue) -> String {
    match value {
        RawValue::Integer(i) => i.to_string(),
        _ => String::new(),
    }
}

fn decode_boolean(value: &RawValue) -> String {
    match value {
        RawValue::Boolean(b) => b.to_string(),
        _ => String::new(),
    }
}

fn decode_text(value: &RawValue) -> String {
    match value {
        RawValue::Text(s) => s.clone(),
        _ => String::new(),
    }
}

fn decode_date(value: &RawValue) -> String {
    match value {
        RawValue::Date(date) => ipp_date_to_unix(date).unwrap_or(0).to_string(),
        _ => String::new(),
    }
}

fn decode_resolution(value: &RawValue) -> String {
    match value {
        RawValue::Resolution { x, y, unit } => {
            let unit = match unit {
                ResolutionUnit::PerCentimeter => "cm",
                ResolutionUnit::PerInch => "i",
            };
            format!("{x}x{y}pp{unit}")
        }
        _ => String::new(),
    }
}

fn decode_range(value: &RawValue) -> String {
    match value {
        RawValue::Range { lower, upper } => format!("{lower}~{upper}"),
        _ => String::new(),
    }
}

/// Converts an RFC 2579 DateAndTime into Unix seconds. Returns `None` when
/// the octets do not describe a real instant.
pub fn ipp_date_to_unix(date: &[u8; 11]) -> Option<i64> {
    let year = u16::from_be_bytes([date[0], date[1]]);
    let [_, _, month, day, hour, min, sec, dsec, utc_direction, utc_hour, utc_min] = *date;

    let offset_seconds = i32::from(utc_hour) * 3600 + i32::from(utc_min) * 60;
    let offset = if utc_direction == b'-' {
        FixedOffset::west_opt(offset_seconds)?
    } else {
        FixedOffset::east_opt(offset_seconds)?
    };

    // Seconds run 0..=60; a leap second lands on the next minute.
    if sec > 60 {
        return None;
    }
    let local = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
        .and_hms_milli_opt(u32::from(hour), u32::from(min), 0, u32::from(dsec) * 100)?
        .checked_add_signed(TimeDelta::seconds(i64::from(sec)))?;

    Some(local.and_local_timezone(offset).single()?.timestamp())
}

fn repair_values(mut values: Vec<String>) -> Vec<String> {
    if values.len() == 1 && values[0] == "none" {
        return Vec::new();
    }

    // Some drivers list a marker type containing a comma, which CUPS splits
    // into an extra value. The extra value starts with a space.
    let needs_merge = values.len() > 1 && values.last().is_some_and(|last| last.len() > 1 && last.starts_with(' '));
    if needs_merge {
        let last = values.pop().unwrap_or_default();
        let second_last = values.pop().unwrap_or_default();
        values.push(format!("{second_last},{last}"));
    }

    values
}
