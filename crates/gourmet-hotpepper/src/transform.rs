//! Pure conversions from HotPepper payloads to the proxy's response shapes.

use gourmet_core::validation::parse_leading_float;

use crate::model::{
    Budget, CodeName, GenreRef, GenresResponse, LargeAreasResponse, MiddleArea,
    MiddleAreasResponse, Page, Photo, ShopDetail, ShopSearchResponse, ShopSummary, SmallArea,
    SmallAreasResponse,
};
use crate::types::{
    CodeNameRaw, GenreResults, LargeAreaResults, LooseNumber, MiddleAreaResults, ResultsMeta,
    ShopRaw, ShopResults, SmallAreaResults,
};

/// Coerces a loosely typed number. Strings are parsed by their numeric
/// prefix; anything non-finite is dropped.
pub fn to_number(value: Option<&LooseNumber>) -> Option<f64> {
    match value? {
        LooseNumber::Number(n) => Some(*n).filter(|n| n.is_finite()),
        LooseNumber::Text(text) => parse_leading_float(text),
    }
}

pub fn to_shop_summary(shop: &ShopRaw) -> ShopSummary {
    ShopSummary {
        id: shop.id.clone(),
        name: shop.name.clone(),
        address: shop.address.clone(),
        lat: to_number(shop.lat.as_ref()),
        lng: to_number(shop.lng.as_ref()),
        genre: shop.genre.as_ref().map(|genre| GenreRef {
            code: genre.code.clone(),
            name: genre.name.clone(),
        }),
        catch_copy: shop.catch_copy.clone(),
        photo: shop
            .photo
            .as_ref()
            .and_then(|photo| photo.pc.as_ref())
            .map(|pc| Photo {
                s: pc.s.clone(),
                m: pc.m.clone(),
                l: pc.l.clone(),
            }),
        url_pc: shop.urls.as_ref().and_then(|urls| urls.pc.clone()),
    }
}

/// Detail view of a shop. `access` falls back to the mobile directions when
/// the PC text is missing.
pub fn to_shop_detail(shop: &ShopRaw) -> ShopDetail {
    ShopDetail {
        summary: to_shop_summary(shop),
        name_kana: shop.name_kana.clone(),
        access: shop.access.clone().or_else(|| shop.mobile_access.clone()),
        station_name: shop.station_name.clone(),
        open: shop.open.clone(),
        close: shop.close.clone(),
        capacity: to_number(shop.capacity.as_ref()),
        non_smoking: shop.non_smoking.clone(),
        parking: shop.parking.clone(),
        card: shop.card.clone(),
        charter: shop.charter.clone(),
        private_room: shop.private_room.clone(),
        budget: shop.budget.as_ref().map(|budget| Budget {
            code: budget.code.clone(),
            name: budget.name.clone(),
            average: budget.average.clone(),
        }),
    }
}

fn to_page(meta: &ResultsMeta) -> Page {
    Page {
        total: meta.results_available,
        start: meta.results_start,
        returned: meta.results_returned,
    }
}

fn to_code_name(raw: &CodeNameRaw) -> CodeName {
    CodeName {
        code: raw.code.clone(),
        name: raw.name.clone(),
    }
}

pub fn to_search_response(results: &ShopResults) -> ShopSearchResponse {
    ShopSearchResponse {
        page: to_page(&results.meta),
        shops: results.shop.iter().map(to_shop_summary).collect(),
    }
}

pub fn to_genres_response(results: &GenreResults) -> GenresResponse {
    GenresResponse {
        page: to_page(&results.meta),
        genres: results.genre.iter().map(to_code_name).collect(),
    }
}

pub fn to_large_areas_response(results: &LargeAreaResults) -> LargeAreasResponse {
    LargeAreasResponse {
        page: to_page(&results.meta),
        areas: results.large_area.iter().map(to_code_name).collect(),
    }
}

pub fn to_middle_areas_response(results: &MiddleAreaResults) -> MiddleAreasResponse {
    MiddleAreasResponse {
        page: to_page(&results.meta),
        areas: results
            .middle_area
            .iter()
            .map(|area| MiddleArea {
                code: area.code.clone(),
                name: area.name.clone(),
                parent_large: to_code_name(&area.large_area),
            })
            .collect(),
    }
}

pub fn to_small_areas_response(results: &SmallAreaResults) -> SmallAreasResponse {
    SmallAreasResponse {
        page: to_page(&results.meta),
        areas: results
            .small_area
            .iter()
            .map(|area| SmallArea {
                code: area.code.clone(),
                name: area.name.clone(),
                parent_middle: area.middle_area.as_ref().map(to_code_name),
            })
            .collect(),
    }
}
