use serde_derive::{Deserialize, Serialize};

// Cloud Device Description documents, in the JSON shape the cloud print
// service expects (lowerCamelCase fields, SCREAMING_SNAKE_CASE enums).

// //////// //
// Printing //
// //////// //

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedString {
    pub locale: String,
    pub value: String,
}

/// Wraps `value` as the single English entry of a localized string list.
pub fn new_localized_string(value: &str) -> Vec<LocalizedString> {
    vec![LocalizedString { locale: "EN".to_string(), value: value.to_string() }]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudDeviceStateType {
    #[default]
    Idle,
    Processing,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterStateSection {
    pub state: CloudDeviceStateType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_state: Option<VendorState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_state: Option<MarkerState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorState {
    pub item: Vec<VendorStateItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorStateType {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStateItem {
    pub state: VendorStateType,
    pub description_localized: Vec<LocalizedString>,
}

// /////// //
// Markers //
// /////// //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerType {
    Custom,
    Toner,
    Ink,
    Staples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerColorType {
    Custom,
    Black,
    Color,
    Cyan,
    Magenta,
    Yellow,
    LightCyan,
    LightMagenta,
    Gray,
    LightGray,
    PigmentBlack,
    MatteBlack,
    PhotoCyan,
    PhotoMagenta,
    PhotoYellow,
    PhotoGray,
    Red,
    Green,
    Blue,
}

impl MarkerColorType {
    /// Looks up a lower-case vendor color name, e.g. `light_cyan`.
    pub fn from_vendor_id(vendor_id: &str) -> Option<Self> {
        let color = match vendor_id {
            "black" => Self::Black,
            "color" => Self::Color,
            "cyan" => Self::Cyan,
            "magenta" => Self::Magenta,
            "yellow" => Self::Yellow,
            "light_cyan" => Self::LightCyan,
            "light_magenta" => Self::LightMagenta,
            "gray" => Self::Gray,
            "light_gray" => Self::LightGray,
            "pigment_black" => Self::PigmentBlack,
            "matte_black" => Self::MatteBlack,
            "photo_cyan" => Self::PhotoCyan,
            "photo_magenta" => Self::PhotoMagenta,
            "photo_yellow" => Self::PhotoYellow,
            "photo_gray" => Self::PhotoGray,
            "red" => Self::Red,
            "green" => Self::Green,
            "blue" => Self::Blue,
            _ => return None,
        };
        Some(color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerColor {
    #[serde(rename = "type")]
    pub color_type: MarkerColorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_display_name_localized: Option<Vec<LocalizedString>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub vendor_id: String,
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_display_name_localized: Option<Vec<LocalizedString>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerStateType {
    Ok,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerState {
    pub item: Vec<MarkerStateItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStateItem {
    pub vendor_id: String,
    pub state: MarkerStateType,
    pub level_percent: i32,
}

// ///////// //
// Job state //
// ///////// //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStateType {
    Draft,
    Held,
    Queued,
    InProgress,
    Stopped,
    Done,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceActionCauseCode {
    DownloadFailure,
    InvalidTicket,
    PrintFailure,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceActionCause {
    pub error_code: DeviceActionCauseCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserActionCauseCode {
    // Spelled with two L's on the wire.
    Cancelled,
    Paused,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionCause {
    pub action_code: UserActionCauseCode,
}

/// A job state. The zero value (no type, no causes) means the CUPS state had
/// no cloud counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub state_type: Option<JobStateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_action_cause: Option<DeviceActionCause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_action_cause: Option<UserActionCause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJobStateDiff {
    pub state: JobState,
    pub pages_printed: i32,
}

// ////////// //
// Job ticket //
// ////////// //

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudJobTicket {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub print: PrintTicketSection,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintTicketSection {
    pub vendor_ticket_item: Vec<VendorTicketItem>,
    pub color: Option<ColorTicketItem>,
    pub duplex: Option<DuplexTicketItem>,
    pub page_orientation: Option<PageOrientationTicketItem>,
    pub copies: Option<CopiesTicketItem>,
    pub margins: Option<MarginsTicketItem>,
    pub dpi: Option<DpiTicketItem>,
    pub fit_to_page: Option<FitToPageTicketItem>,
    pub page_range: Option<PageRangeTicketItem>,
    pub media_size: Option<MediaSizeTicketItem>,
    pub collate: Option<CollateTicketItem>,
    pub reverse_order: Option<ReverseOrderTicketItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTicketItem {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorType {
    StandardColor,
    StandardMonochrome,
    CustomColor,
    CustomMonochrome,
    Auto,
    #[serde(other)]
    Unknown,
}

impl ColorType {
    /// The wire name of the color type, `None` for types this connector
    /// does not recognize.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            ColorType::StandardColor => Some("STANDARD_COLOR"),
            ColorType::StandardMonochrome => Some("STANDARD_MONOCHROME"),
            ColorType::CustomColor => Some("CUSTOM_COLOR"),
            ColorType::CustomMonochrome => Some("CUSTOM_MONOCHROME"),
            ColorType::Auto => Some("AUTO"),
            ColorType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTicketItem {
    #[serde(default)]
    pub vendor_id: String,
    #[serde(rename = "type")]
    pub color_type: ColorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplexType {
    NoDuplex,
    LongEdge,
    ShortEdge,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplexTicketItem {
    #[serde(rename = "type")]
    pub duplex_type: DuplexType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageOrientationType {
    Portrait,
    Landscape,
    Auto,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOrientationTicketItem {
    #[serde(rename = "type")]
    pub orientation_type: PageOrientationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiesTicketItem {
    pub copies: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarginsTicketItem {
    pub top_microns: i32,
    pub right_microns: i32,
    pub bottom_microns: i32,
    pub left_microns: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DpiTicketItem {
    pub horizontal_dpi: i32,
    pub vertical_dpi: i32,
    pub vendor_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitToPageType {
    NoFitting,
    FitToPage,
    GrowToPage,
    ShrinkToPage,
    FillPage,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitToPageTicketItem {
    #[serde(rename = "type")]
    pub fit_type: FitToPageType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRangeInterval {
    pub start: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRangeTicketItem {
    pub interval: Vec<PageRangeInterval>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaSizeTicketItem {
    pub width_microns: i32,
    pub height_microns: i32,
    pub is_continuous_feed: bool,
    pub vendor_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateTicketItem {
    pub collate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseOrderTicketItem {
    pub reverse_order: bool,
}
