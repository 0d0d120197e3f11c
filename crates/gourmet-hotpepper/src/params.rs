//! Query parameters sent to the gourmet search endpoint.

use std::fmt;

use gourmet_core::NormalizedSearchQuery;

/// A single query-string value. Booleans are sent as `1`/`0`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u8> for QueryValue {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Optional query pairs. `None` entries are dropped before the request.
pub type QueryPairs = Vec<(&'static str, Option<QueryValue>)>;

/// Shop search parameters in HotPepper's vocabulary.
///
/// Multi-valued filters are comma-joined strings, as the API expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopSearchParams {
    pub id: Option<String>,
    pub keyword: Option<String>,
    pub genre: Option<String>,
    pub large_area: Option<String>,
    pub middle_area: Option<String>,
    pub small_area: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub range: Option<u8>,
    pub order: Option<u8>,
    pub start: Option<u64>,
    pub count: Option<u32>,
    /// Only shops with private rooms.
    pub private_room: Option<bool>,
    /// Only shops that are entirely non-smoking.
    pub non_smoking: Option<bool>,
}

impl ShopSearchParams {
    /// Lookup of a single shop by id.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            count: Some(1),
            ..Self::default()
        }
    }

    pub(crate) fn to_query(&self) -> QueryPairs {
        vec![
            ("id", self.id.clone().map(QueryValue::from)),
            ("keyword", self.keyword.clone().map(QueryValue::from)),
            ("genre", self.genre.clone().map(QueryValue::from)),
            ("large_area", self.large_area.clone().map(QueryValue::from)),
            ("middle_area", self.middle_area.clone().map(QueryValue::from)),
            ("small_area", self.small_area.clone().map(QueryValue::from)),
            ("lat", self.lat.map(QueryValue::from)),
            ("lng", self.lng.map(QueryValue::from)),
            ("range", self.range.map(QueryValue::from)),
            ("order", self.order.map(QueryValue::from)),
            ("start", self.start.map(QueryValue::from)),
            ("count", self.count.map(QueryValue::from)),
            ("private_room", self.private_room.map(QueryValue::from)),
            ("non_smoking", self.non_smoking.map(QueryValue::from)),
        ]
    }
}

fn join(codes: &[String]) -> Option<String> {
    (!codes.is_empty()).then(|| codes.join(","))
}

impl From<&NormalizedSearchQuery> for ShopSearchParams {
    fn from(query: &NormalizedSearchQuery) -> Self {
        let location = query.location();
        Self {
            keyword: query.keyword().map(ToOwned::to_owned),
            genre: join(query.genres()),
            large_area: join(query.large_areas()),
            middle_area: join(query.middle_areas()),
            small_area: join(query.small_areas()),
            lat: location.map(|l| l.lat),
            lng: location.map(|l| l.lng),
            range: location.map(|l| l.range.code()),
            order: Some(query.order().code()),
            start: Some(query.start()),
            count: Some(query.per_page()),
            ..Self::default()
        }
    }
}
