//! Shop-search query normalization.
//!
//! Turns a loosely-typed [`RawQuery`] into a [`NormalizedSearchQuery`] whose
//! invariants hold by construction: coordinates come as a pair, a search
//! radius only exists alongside coordinates, and paging is always in range.

use serde_json::Value;

use crate::api::ApiError;
use crate::validation::{
    clamp_integer, collapse_whitespace, parse_leading_float, parse_leading_int, scalar_text,
    RawQuery,
};

pub const MAX_GENRES: usize = 2;
pub const MAX_LARGE_AREAS: usize = 3;
pub const MAX_MIDDLE_AREAS: usize = 5;
pub const MAX_SMALL_AREAS: usize = 5;
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Search radius around a coordinate, as understood by the directory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRange {
    /// 300 m
    M300 = 1,
    /// 500 m
    M500 = 2,
    /// 1 km
    Km1 = 3,
    /// 2 km
    Km2 = 4,
    /// 3 km
    Km3 = 5,
}

impl SearchRange {
    pub const DEFAULT: Self = Self::Km1;

    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::M300),
            2 => Some(Self::M500),
            3 => Some(Self::Km1),
            4 => Some(Self::Km2),
            5 => Some(Self::Km3),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Result ordering accepted by the directory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    NameKana = 1,
    Genre = 2,
    SmallArea = 3,
    /// Recommended order; ranks by distance when coordinates are given.
    Recommended = 4,
}

impl SearchOrder {
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::NameKana),
            2 => Some(Self::Genre),
            3 => Some(Self::SmallArea),
            4 => Some(Self::Recommended),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Coordinates plus radius for a location search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFilter {
    pub lat: f64,
    pub lng: f64,
    pub range: SearchRange,
}

/// Validated shop-search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSearchQuery {
    keyword: Option<String>,
    genres: Vec<String>,
    large_areas: Vec<String>,
    middle_areas: Vec<String>,
    small_areas: Vec<String>,
    location: Option<LocationFilter>,
    order: SearchOrder,
    page: u64,
    per_page: u32,
}

impl NormalizedSearchQuery {
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn large_areas(&self) -> &[String] {
        &self.large_areas
    }

    pub fn middle_areas(&self) -> &[String] {
        &self.middle_areas
    }

    pub fn small_areas(&self) -> &[String] {
        &self.small_areas
    }

    pub fn location(&self) -> Option<&LocationFilter> {
        self.location.as_ref()
    }

    pub fn order(&self) -> SearchOrder {
        self.order
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// 1-based result offset of the first row on this page.
    pub fn start(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(u64::from(self.per_page))
            .saturating_add(1)
    }
}

/// Normalizes raw search parameters.
///
/// Multi-value fields (`genres`, `areas.large`, `areas.middle`,
/// `areas.small`, plus their `genreCode`/`*AreaCode` aliases) are split on
/// commas, deduplicated and silently truncated at their limits.
///
/// # Errors
///
/// Returns a `VALIDATION_ERROR` when only one of `lat`/`lng` is supplied, or
/// when `range` is supplied without coordinates.
pub fn normalize_search_query(raw: &RawQuery) -> Result<NormalizedSearchQuery, ApiError> {
    let keyword = normalize_keyword(raw.get("q"));
    let genres = collect_codes(&[raw.get("genres"), raw.get("genreCode")], MAX_GENRES);
    let large_areas = collect_codes(
        &[raw.get("areas.large"), raw.get("largeAreaCode")],
        MAX_LARGE_AREAS,
    );
    let middle_areas = collect_codes(
        &[raw.get("areas.middle"), raw.get("middleAreaCode")],
        MAX_MIDDLE_AREAS,
    );
    let small_areas = collect_codes(
        &[raw.get("areas.small"), raw.get("smallAreaCode")],
        MAX_SMALL_AREAS,
    );

    let lat = normalize_coordinate(raw.get("lat"));
    let lng = normalize_coordinate(raw.get("lng"));
    let range = normalize_range(raw.get("range"));

    let location = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(LocationFilter {
            lat,
            lng,
            range: range.unwrap_or(SearchRange::DEFAULT),
        }),
        (None, None) => {
            if range.is_some() {
                return Err(ApiError::invalid_field(
                    "range",
                    "range requires both lat and lng",
                ));
            }
            None
        }
        _ => {
            return Err(ApiError::invalid_field(
                "lat",
                "lat and lng must be specified together",
            ))
        }
    };

    let order = if location.is_some() {
        SearchOrder::Recommended
    } else {
        raw.get("order")
            .and_then(scalar_text)
            .and_then(|text| parse_leading_int(&text))
            .and_then(SearchOrder::from_code)
            .unwrap_or(SearchOrder::Recommended)
    };

    let per_page = clamp_integer(
        raw.get("perPage"),
        1,
        i64::from(MAX_PER_PAGE),
        i64::from(DEFAULT_PER_PAGE),
    );
    let page = clamp_integer(raw.get("page"), 1, i64::MAX, 1);

    Ok(NormalizedSearchQuery {
        keyword,
        genres,
        large_areas,
        middle_areas,
        small_areas,
        location,
        order,
        page: u64::try_from(page).unwrap_or(1),
        per_page: u32::try_from(per_page).unwrap_or(DEFAULT_PER_PAGE),
    })
}

fn normalize_keyword(value: Option<&Value>) -> Option<String> {
    let Some(Value::String(text)) = value else {
        return None;
    };
    let collapsed = collapse_whitespace(text);
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Flattens scalar / array / comma-joined inputs into at most `limit` unique
/// codes, keeping first-seen order. Non-string elements are skipped.
fn collect_codes(sources: &[Option<&Value>], limit: usize) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for value in sources.iter().copied().flatten() {
        collect_strings(value, &mut pending);
    }

    for token in pending.iter().flat_map(|item| item.split(',')) {
        if codes.len() >= limit {
            break;
        }
        let token = token.trim();
        if token.is_empty() || codes.iter().any(|c| c == token) {
            continue;
        }
        codes.push(token.to_owned());
    }

    codes
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        _ => {}
    }
}

fn normalize_coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) if !s.trim().is_empty() => parse_leading_float(s),
        _ => None,
    }
}

fn normalize_range(value: Option<&Value>) -> Option<SearchRange> {
    let text = scalar_text(value?)?;
    parse_leading_int(&text).and_then(SearchRange::from_code)
}

#[cfg(test)]
#[path = "search_query_test.rs"]
mod tests;
