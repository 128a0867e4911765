use std::collections::HashMap;

use serde_derive::Serialize;

use crate::cdd::models::{Marker, PrinterStateSection};

/// Decoded printer attributes, keyed by attribute name. Outside of the IPP
/// layer these are known as "tags".
pub type TagMapping = HashMap<String, Vec<String>>;

/// The attribute group a record was sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTag {
    Operation,
    Job,
    Printer,
    Unsupported,
    /// Boundary between two entities of the same group.
    Separator,
    Other(u8),
}

/// IPP value tags (RFC 8010, section 3.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTag {
    Unsupported,
    Unknown,
    NoValue,
    NotSettable,
    Integer,
    Boolean,
    Enum,
    OctetString,
    DateTime,
    Resolution,
    RangeOfInteger,
    Collection,
    TextWithLanguage,
    NameWithLanguage,
    Text,
    Name,
    Keyword,
    Uri,
    UriScheme,
    Charset,
    NaturalLanguage,
    MimeMediaType,
    Other(u8),
}

impl From<u8> for ValueTag {
    fn from(tag: u8) -> Self {
        match tag {
            0x10 => ValueTag::Unsupported,
            0x12 => ValueTag::Unknown,
            0x13 => ValueTag::NoValue,
            0x15 => ValueTag::NotSettable,
            0x21 => ValueTag::Integer,
            0x22 => ValueTag::Boolean,
            0x23 => ValueTag::Enum,
            0x30 => ValueTag::OctetString,
            0x31 => ValueTag::DateTime,
            0x32 => ValueTag::Resolution,
            0x33 => ValueTag::RangeOfInteger,
            0x34 => ValueTag::Collection,
            0x35 => ValueTag::TextWithLanguage,
            0x36 => ValueTag::NameWithLanguage,
            0x41 => ValueTag::Text,
            0x42 => ValueTag::Name,
            0x44 => ValueTag::Keyword,
            0x45 => ValueTag::Uri,
            0x46 => ValueTag::UriScheme,
            0x47 => ValueTag::Charset,
            0x48 => ValueTag::NaturalLanguage,
            0x49 => ValueTag::MimeMediaType,
            other => ValueTag::Other(other),
        }
    }
}

/// Unit of a resolution value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionUnit {
    PerInch,
    PerCentimeter,
}

impl From<i32> for ResolutionUnit {
    fn from(unit: i32) -> Self {
        // 3 = dots per inch, 4 = dots per centimeter.
        match unit {
            4 => ResolutionUnit::PerCentimeter,
            _ => ResolutionUnit::PerInch,
        }
    }
}

/// A single typed value of an attribute, as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Integer(i32),
    Boolean(bool),
    Text(String),
    /// RFC 2579 DateAndTime, 11 octets.
    Date([u8; 11]),
    Resolution { x: i32, y: i32, unit: ResolutionUnit },
    Range { lower: i32, upper: i32 },
    /// A value this connector keeps no payload for (collections, unknown tags).
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    pub name: String,
    pub group: GroupTag,
    pub value_tag: ValueTag,
    pub values: Vec<RawValue>,
}

impl RawAttribute {
    pub fn new(name: &str, group: GroupTag, value_tag: ValueTag, values: Vec<RawValue>) -> Self {
        RawAttribute { name: name.to_string(), group, value_tag, values }
    }

    pub fn separator() -> Self {
        RawAttribute::new("", GroupTag::Separator, ValueTag::NoValue, Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    NotFound,
    Other(u16),
}

/// A print server response, flattened into wire-ordered attribute records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IppResponse {
    pub status: ResponseStatus,
    pub attributes: Vec<RawAttribute>,
}

/// A CUPS printer as presented to the cloud print service.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub name: String,
    pub uuid: String,
    pub default_display_name: String,
    pub state: PrinterStateSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<Vec<Marker>>,
    pub tags: HashMap<String, String>,
    pub tags_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caps_hash: Option<String>,
    pub connector_version: String,
}

impl Printer {
    /// Raw queues pass documents straight to the device and have no PPD.
    pub fn is_raw(&self) -> bool {
        self.tags.get(super::attributes::ATTR_PRINTER_MAKE_AND_MODEL).map(String::as_str) == Some("Local Raw Printer")
    }
}
