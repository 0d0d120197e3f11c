//! HotPepper Gourmet API response types.
//!
//! Every endpoint wraps its payload in `{"results": {...}}`; the client strips
//! that wrapper and deserializes the inner object into one of the `*Results`
//! types below. Numeric fields arrive as numbers or numeric strings depending
//! on the endpoint, so they are modelled loosely here and tightened in
//! [`crate::transform`].

use std::fmt;

use serde::{Deserialize, Deserializer};

/// A value HotPepper sends either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl fmt::Display for LooseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Counters common to every `results` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultsMeta {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default, deserialize_with = "loose_count")]
    pub results_available: u64,
    #[serde(default, deserialize_with = "loose_count")]
    pub results_returned: u64,
    #[serde(default, deserialize_with = "loose_count")]
    pub results_start: u64,
}

/// Implemented by every `results` payload so the client can log counters
/// without knowing the concrete list type.
pub trait ResultSet {
    fn meta(&self) -> &ResultsMeta;
}

/// Error entry reported inside a `results` object.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamErrorEntry {
    #[serde(default)]
    pub code: Option<LooseNumber>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// gourmet/v1
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ShopResults {
    #[serde(flatten)]
    pub meta: ResultsMeta,
    #[serde(default)]
    pub shop: Vec<ShopRaw>,
}

/// One shop as returned by the gourmet search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopRaw {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default)]
    pub name_kana: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<LooseNumber>,
    #[serde(default)]
    pub lng: Option<LooseNumber>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub mobile_access: Option<String>,
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
    #[serde(default, rename = "catch")]
    pub catch_copy: Option<String>,
    #[serde(default)]
    pub budget: Option<BudgetRaw>,
    #[serde(default)]
    pub genre: Option<ShopGenreRaw>,
    #[serde(default)]
    pub photo: Option<PhotoRaw>,
    #[serde(default)]
    pub urls: Option<UrlsRaw>,
    #[serde(default)]
    pub non_smoking: Option<String>,
    #[serde(default)]
    pub parking: Option<String>,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub private_room: Option<String>,
    #[serde(default)]
    pub charter: Option<String>,
    #[serde(default)]
    pub capacity: Option<LooseNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetRaw {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub average: Option<String>,
}

/// Genre embedded in a shop record. `catch` is the genre tagline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopGenreRaw {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "catch")]
    pub catch_copy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoRaw {
    #[serde(default)]
    pub pc: Option<PhotoSizesRaw>,
    #[serde(default)]
    pub mobile: Option<PhotoSizesRaw>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoSizesRaw {
    #[serde(default)]
    pub s: Option<String>,
    #[serde(default)]
    pub m: Option<String>,
    #[serde(default)]
    pub l: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlsRaw {
    #[serde(default)]
    pub pc: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
}

// ---------------------------------------------------------------------------
// genre/v1, large_area/v1, middle_area/v1, small_area/v1
// ---------------------------------------------------------------------------

/// `{code, name}` pair used by every master-data endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodeNameRaw {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub code: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreResults {
    #[serde(flatten)]
    pub meta: ResultsMeta,
    #[serde(default)]
    pub genre: Vec<CodeNameRaw>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LargeAreaResults {
    #[serde(flatten)]
    pub meta: ResultsMeta,
    #[serde(default)]
    pub large_area: Vec<CodeNameRaw>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MiddleAreaResults {
    #[serde(flatten)]
    pub meta: ResultsMeta,
    #[serde(default)]
    pub middle_area: Vec<MiddleAreaRaw>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MiddleAreaRaw {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub code: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default)]
    pub large_area: CodeNameRaw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmallAreaResults {
    #[serde(flatten)]
    pub meta: ResultsMeta,
    #[serde(default)]
    pub small_area: Vec<SmallAreaRaw>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmallAreaRaw {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub code: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default)]
    pub middle_area: Option<CodeNameRaw>,
}

macro_rules! impl_result_set {
    ($($ty:ty),+ $(,)?) => {
        $(impl ResultSet for $ty {
            fn meta(&self) -> &ResultsMeta {
                &self.meta
            }
        })+
    };
}

impl_result_set!(
    ShopResults,
    GenreResults,
    LargeAreaResults,
    MiddleAreaResults,
    SmallAreaResults,
);

/// Accepts `12`, `12.0` or `"12"`; anything unparseable becomes `0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn loose_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseNumber::Number(n)) if n.is_finite() && n >= 0.0 => n as u64,
        Some(LooseNumber::Text(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Missing or `null` text becomes an empty string so one incomplete record
/// does not fail the whole listing.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
