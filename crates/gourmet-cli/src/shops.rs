use clap::Args;
use gourmet_core::{
    normalize_search_query, normalize_shop_id, raw_query_from_pairs, ApiResult, ErrorCode,
    RawQuery,
};
use gourmet_hotpepper::{
    model::ShopDetailResponse,
    transform::{to_genres_response, to_search_response, to_shop_detail},
    HotpepperClient, ShopSearchParams,
};

use crate::output::emit;

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Free-text keyword
    #[arg(long)]
    pub q: Option<String>,
    /// Genre code; repeat for more than one (e.g., --genre G001 --genre G002)
    #[arg(long = "genre")]
    pub genres: Vec<String>,
    /// Large-area code; repeatable
    #[arg(long = "large-area")]
    pub large_areas: Vec<String>,
    /// Middle-area code; repeatable
    #[arg(long = "middle-area")]
    pub middle_areas: Vec<String>,
    /// Small-area code; repeatable
    #[arg(long = "small-area")]
    pub small_areas: Vec<String>,
    /// Latitude; requires --lng
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<String>,
    /// Longitude; requires --lat
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<String>,
    /// Search radius code 1-5 (300m, 500m, 1km, 2km, 3km)
    #[arg(long)]
    pub range: Option<String>,
    /// Sort order code 1-4; ignored for location searches
    #[arg(long)]
    pub order: Option<String>,
    /// 1-based page number
    #[arg(long)]
    pub page: Option<String>,
    /// Results per page (1-100)
    #[arg(long)]
    pub per_page: Option<String>,
    /// Only shops with private rooms
    #[arg(long)]
    pub private_room: bool,
    /// Only fully non-smoking shops
    #[arg(long)]
    pub non_smoking: bool,
}

impl SearchArgs {
    /// Re-expresses the flags as the query-string shape the HTTP surface
    /// accepts, so both go through the same normalizer.
    pub(crate) fn to_raw_query(&self) -> RawQuery {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: &str| pairs.push((key.to_owned(), value.to_owned()));

        let singles = [
            ("q", &self.q),
            ("lat", &self.lat),
            ("lng", &self.lng),
            ("range", &self.range),
            ("order", &self.order),
            ("page", &self.page),
            ("perPage", &self.per_page),
        ];
        for (key, value) in singles {
            if let Some(value) = value {
                push(key, value);
            }
        }

        let lists = [
            ("genres", &self.genres),
            ("largeAreaCode", &self.large_areas),
            ("middleAreaCode", &self.middle_areas),
            ("smallAreaCode", &self.small_areas),
        ];
        for (key, values) in lists {
            for value in values {
                push(key, value);
            }
        }

        raw_query_from_pairs(pairs)
    }

    pub(crate) fn to_params(&self) -> anyhow::Result<ShopSearchParams> {
        let query = normalize_search_query(&self.to_raw_query())
            .map_err(|e| anyhow::anyhow!("{}: {}", e.code, e.message))?;
        let mut params = ShopSearchParams::from(&query);
        params.private_room = self.private_room.then_some(true);
        params.non_smoking = self.non_smoking.then_some(true);
        Ok(params)
    }
}

pub(crate) async fn run_search(client: &HotpepperClient, args: &SearchArgs) -> anyhow::Result<()> {
    let params = args.to_params()?;
    let result = client
        .search_shops(&params)
        .await
        .map(|results| to_search_response(&results));
    emit(&result)
}

pub(crate) async fn run_shop(client: &HotpepperClient, id: &str) -> anyhow::Result<()> {
    let id = normalize_shop_id(id).map_err(|e| anyhow::anyhow!("{}", e.message))?;
    let result = match client.get_shop_detail(&id).await.into_result() {
        Ok(results) => ApiResult::success(results.shop.first().map_or_else(
            ShopDetailResponse::not_found,
            |shop| ShopDetailResponse::Found {
                shop: Box::new(to_shop_detail(shop)),
            },
        )),
        Err(error) if error.code == ErrorCode::NotFound => {
            ApiResult::success(ShopDetailResponse::not_found())
        }
        Err(error) => ApiResult::failure(error),
    };
    emit(&result)
}

pub(crate) async fn run_genres(client: &HotpepperClient) -> anyhow::Result<()> {
    let result = client
        .get_genres()
        .await
        .map(|results| to_genres_response(&results));
    emit(&result)
}
