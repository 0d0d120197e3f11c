//! Response shapes exposed to callers of the proxy.
//!
//! Field names serialize in camelCase and optional fields are omitted when
//! absent, so a missing upstream value never turns into `null` on the wire.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeName {
    pub code: String,
    pub name: String,
}

/// Genre attached to a shop. HotPepper occasionally omits either half.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Photo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Budget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<String>,
}

/// Compact shop record used in search listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<GenreRef>,
    #[serde(rename = "catch", skip_serializing_if = "Option::is_none")]
    pub catch_copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pc: Option<String>,
}

/// Everything in [`ShopSummary`] plus the fields shown on a detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDetail {
    #[serde(flatten)]
    pub summary: ShopSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_smoking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
}

/// Paging counters echoed from the upstream `results` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub total: u64,
    pub start: u64,
    pub returned: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopSearchResponse {
    #[serde(flatten)]
    pub page: Page,
    pub shops: Vec<ShopSummary>,
}

/// Body of the shop-detail endpoint: either the shop or a not-found marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ShopDetailResponse {
    Found { shop: Box<ShopDetail> },
    #[serde(rename_all = "camelCase")]
    NotFound { not_found: bool },
}

impl ShopDetailResponse {
    pub fn not_found() -> Self {
        Self::NotFound { not_found: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenresResponse {
    #[serde(flatten)]
    pub page: Page,
    pub genres: Vec<CodeName>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeAreasResponse {
    #[serde(flatten)]
    pub page: Page,
    pub areas: Vec<CodeName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddleArea {
    pub code: String,
    pub name: String,
    pub parent_large: CodeName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiddleAreasResponse {
    #[serde(flatten)]
    pub page: Page,
    pub areas: Vec<MiddleArea>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallArea {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_middle: Option<CodeName>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmallAreasResponse {
    #[serde(flatten)]
    pub page: Page,
    pub areas: Vec<SmallArea>,
}

impl MiddleAreasResponse {
    /// Response for a middle-area request with no parent selected.
    pub fn empty() -> Self {
        Self {
            page: Page::default(),
            areas: Vec::new(),
        }
    }
}
