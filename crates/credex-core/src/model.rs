use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel written wherever a field could not be located. Downstream
/// consumers rely on row-count and column-shape staying fixed, so absent
/// data is never an empty cell in final output.
pub const NO_DATA: &str = "No Data";

/// The fixed field vocabulary of text-layout reports, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Type,
    Ownership,
    Sanctioned,
    CurrentBalance,
    Dpd,
}

impl FieldKind {
    pub const ORDERED: [FieldKind; 5] = [
        FieldKind::Type,
        FieldKind::Ownership,
        FieldKind::Sanctioned,
        FieldKind::CurrentBalance,
        FieldKind::Dpd,
    ];

    const UPPER_LABELS: [&'static str; 5] =
        ["TYPE", "OWNERSHIP", "SANCTIONED", "CURRENT BALANCE", "DPD"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Type => "Type",
            FieldKind::Ownership => "Ownership",
            FieldKind::Sanctioned => "Sanctioned",
            FieldKind::CurrentBalance => "Current Balance",
            FieldKind::Dpd => "DPD",
        }
    }

    /// True when an uppercased line starts with any field label. Used to
    /// recognize where a value continuation ends and the DPD lookahead stops.
    pub fn is_field_prefix(upper: &str) -> bool {
        Self::UPPER_LABELS.iter().any(|l| upper.starts_with(l))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cleaned line of page content. Pages are 1-based and non-decreasing
/// across the sequence for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub page: usize,
    pub text: String,
}

/// Normalized per-field record shared by both segmenters: one row per
/// (page, field) with the page's borrower metadata repeated on every row.
///
/// `field` is a `FieldKind` label, a table-mode source key, the empty
/// string (value continuation), or the `"No Data"` placeholder. Facilities
/// on the same page are distinguished by emission order only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateRecord {
    #[serde(rename = "Page")]
    pub page: usize,
    #[serde(rename = "PAN")]
    pub pan: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Score")]
    pub score: String,
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Value")]
    pub value: String,
}

pub const RECORD_COLUMNS: [&str; 6] = ["Page", "PAN", "Name", "Score", "Field", "Value"];

/// Final denormalized output row: one credit facility per row, borrower
/// identity repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "Entity Name/ Director Name")]
    pub name: String,
    #[serde(rename = "PAN Number")]
    pub pan: String,
    #[serde(rename = "CMR Rank/Credit Score")]
    pub score: String,
    #[serde(rename = "Facility type")]
    pub facility_type: String,
    #[serde(rename = "Page")]
    pub page: usize,
    #[serde(rename = "Guarantor/Borrower/Individual/Joint")]
    pub ownership: String,
    #[serde(rename = "Sanction limit")]
    pub sanction_limit: String,
    #[serde(rename = "O/s Amount")]
    pub outstanding: String,
    #[serde(rename = "DPDs")]
    pub dpds: String,
    #[serde(rename = "Overdue")]
    pub overdue: String,
}

pub const FACILITY_COLUMNS: [&str; 10] = [
    "Entity Name/ Director Name",
    "PAN Number",
    "CMR Rank/Credit Score",
    "Facility type",
    "Page",
    "Guarantor/Borrower/Individual/Joint",
    "Sanction limit",
    "O/s Amount",
    "DPDs",
    "Overdue",
];

impl FacilityRecord {
    /// Back-fill row for a page that produced no facility fields.
    pub fn placeholder(page: usize, ctx: &PageContext) -> Self {
        FacilityRecord {
            name: ctx.name.clone(),
            pan: ctx.pan.clone(),
            score: ctx.score.clone(),
            page,
            ..Default::default()
        }
    }

    /// Replace empty fields with the `"No Data"` sentinel.
    pub fn fill_no_data(&mut self) {
        for s in [
            &mut self.name,
            &mut self.pan,
            &mut self.score,
            &mut self.facility_type,
            &mut self.ownership,
            &mut self.sanction_limit,
            &mut self.outstanding,
            &mut self.dpds,
            &mut self.overdue,
        ] {
            if s.is_empty() {
                *s = NO_DATA.to_string();
            }
        }
    }
}

/// Table-mode destination row, produced by the capture-row mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedFacilityRecord {
    #[serde(rename = "Entity Name/ Director Name")]
    pub name: String,
    #[serde(rename = "PAN Number")]
    pub pan: String,
    #[serde(rename = "CMR Rank/Credit Score")]
    pub rank: String,
    #[serde(rename = "Facility type")]
    pub facility_type: String,
    #[serde(rename = "Facility No./ Page No.")]
    pub facility_page: String,
    #[serde(rename = "DPDs")]
    pub dpds: String,
    #[serde(rename = "DPD period")]
    pub dpd_period: String,
    #[serde(rename = "Guarantor/Borrower/Individual/Joint")]
    pub ownership: String,
    #[serde(rename = "Sanction limit")]
    pub sanction_limit: String,
    #[serde(rename = "O/s Amount")]
    pub outstanding: String,
    #[serde(rename = "Overdue")]
    pub overdue: String,
    #[serde(rename = "Settled/Written Off / any other instance")]
    pub settled: String,
}

pub const MAPPED_COLUMNS: [&str; 12] = [
    "Entity Name/ Director Name",
    "PAN Number",
    "CMR Rank/Credit Score",
    "Facility type",
    "Facility No./ Page No.",
    "DPDs",
    "DPD period",
    "Guarantor/Borrower/Individual/Joint",
    "Sanction limit",
    "O/s Amount",
    "Overdue",
    "Settled/Written Off / any other instance",
];

impl MappedFacilityRecord {
    /// Replace empty fields with the `"No Data"` sentinel.
    pub fn fill_no_data(&mut self) {
        for s in [
            &mut self.name,
            &mut self.pan,
            &mut self.rank,
            &mut self.facility_type,
            &mut self.facility_page,
            &mut self.dpds,
            &mut self.dpd_period,
            &mut self.ownership,
            &mut self.sanction_limit,
            &mut self.outstanding,
            &mut self.overdue,
            &mut self.settled,
        ] {
            if s.is_empty() {
                *s = NO_DATA.to_string();
            }
        }
    }
}

/// Per-page cached borrower metadata, used to stamp rows and to back-fill
/// pages that yielded no facility fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub pan: String,
    pub name: String,
    pub score: String,
}

impl PageContext {
    /// Non-empty incoming values overwrite the cache; empty ones never do.
    pub fn absorb(&mut self, pan: &str, name: &str, score: &str) {
        if !pan.is_empty() {
            self.pan = pan.to_string();
        }
        if !name.is_empty() {
            self.name = name.to_string();
        }
        if !score.is_empty() {
            self.score = score.to_string();
        }
    }
}

/// Document-level borrower scalars for text-layout reports. Each is the
/// first non-empty detection in the line stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorrowerInfo {
    pub pan: Option<String>,
    pub name: Option<String>,
    pub score: Option<String>,
}

/// Detected report layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Table,
    Text,
    Unknown,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Table => write!(f, "table"),
            LayoutKind::Text => write!(f, "text"),
            LayoutKind::Unknown => write!(f, "unknown"),
        }
    }
}
