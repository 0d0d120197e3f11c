//! Bounded fan-out over the area endpoints with a per-parent cache.
//!
//! Selecting several large areas means one middle-area request per parent.
//! [`AreaCatalog`] issues those requests concurrently, remembers each
//! parent's children, and merges the lists in the order the parents were
//! given. A failed parent is reported alongside whatever did load.

use std::collections::HashMap;
use std::future::Future;

use futures::stream::{self, StreamExt};
use gourmet_core::{ApiError, ApiResult};
use tokio::sync::RwLock;

use crate::client::HotpepperClient;
use crate::model::{MiddleArea, SmallArea};
use crate::transform::{to_middle_areas_response, to_small_areas_response};

/// Merged children of several parent codes.
#[derive(Debug)]
pub struct FanOut<T> {
    pub areas: Vec<T>,
    /// Parent codes that failed to load, with the reason.
    pub failures: Vec<(String, ApiError)>,
}

pub struct AreaCatalog {
    client: HotpepperClient,
    concurrency: usize,
    middle: RwLock<HashMap<String, Vec<MiddleArea>>>,
    small: RwLock<HashMap<String, Vec<SmallArea>>>,
}

impl AreaCatalog {
    pub fn new(client: HotpepperClient, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            middle: RwLock::new(HashMap::new()),
            small: RwLock::new(HashMap::new()),
        }
    }

    /// Middle areas under each of `large_codes`.
    pub async fn middle_areas_for(&self, large_codes: &[String]) -> FanOut<MiddleArea> {
        let client = &self.client;
        fan_out(&self.middle, large_codes, self.concurrency, |code| async move {
            client
                .get_middle_areas(Some(&code))
                .await
                .map(|results| to_middle_areas_response(&results).areas)
        })
        .await
    }

    /// Small areas under each of `middle_codes`.
    pub async fn small_areas_for(&self, middle_codes: &[String]) -> FanOut<SmallArea> {
        let client = &self.client;
        fan_out(&self.small, middle_codes, self.concurrency, |code| async move {
            client
                .get_small_areas(Some(&code))
                .await
                .map(|results| to_small_areas_response(&results).areas)
        })
        .await
    }
}

async fn fan_out<T, F, Fut>(
    cache: &RwLock<HashMap<String, Vec<T>>>,
    codes: &[String],
    concurrency: usize,
    fetch: F,
) -> FanOut<T>
where
    T: Clone,
    F: Fn(String) -> Fut,
    Fut: Future<Output = ApiResult<Vec<T>>>,
{
    let mut unique: Vec<&String> = Vec::with_capacity(codes.len());
    for code in codes {
        if !unique.contains(&code) {
            unique.push(code);
        }
    }

    let missing: Vec<String> = {
        let cached = cache.read().await;
        unique
            .iter()
            .filter(|code| !cached.contains_key(code.as_str()))
            .map(|code| (*code).clone())
            .collect()
    };

    let mut fetched = stream::iter(missing)
        .map(|code| {
            let fut = fetch(code.clone());
            async move { (code, fut.await) }
        })
        .buffer_unordered(concurrency);

    // Each parent is cached as soon as it lands, so a dropped call keeps
    // whatever already loaded.
    let mut failures = Vec::new();
    while let Some((code, result)) = fetched.next().await {
        match result.into_result() {
            Ok(areas) => {
                cache.write().await.insert(code, areas);
            }
            Err(error) => {
                tracing::warn!(
                    category = "API",
                    parent = %code,
                    code = %error.code,
                    "area fan-out request failed"
                );
                failures.push((code, error));
            }
        }
    }

    let cached = cache.read().await;
    let areas = unique
        .iter()
        .filter_map(|code| cached.get(code.as_str()))
        .flat_map(|areas| areas.iter().cloned())
        .collect();

    FanOut { areas, failures }
}
