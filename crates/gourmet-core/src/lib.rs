pub mod api;
pub mod app_config;
pub mod area_query;
pub mod config;
pub mod search_query;
pub mod validation;

use thiserror::Error;

pub use api::{ApiError, ApiResult, ErrorCode};
pub use app_config::{AppConfig, Environment};
pub use area_query::{
    normalize_shop_id, parse_middle_area_query, parse_small_area_query, MiddleAreaQuery,
    SmallAreaQuery,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use search_query::{
    normalize_search_query, LocationFilter, NormalizedSearchQuery, SearchOrder, SearchRange,
};
pub use validation::{normalize_code, raw_query_from_pairs, RawQuery, MAX_CODE_LENGTH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
