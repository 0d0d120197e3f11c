use clap::Subcommand;
use gourmet_core::{normalize_code, ApiResult};
use gourmet_hotpepper::{
    model::{MiddleAreasResponse, Page, SmallAreasResponse},
    transform::to_large_areas_response,
    AreaCatalog, FanOut, HotpepperClient,
};
use serde_json::Value;

use crate::output::emit;

#[derive(Debug, Subcommand)]
pub(crate) enum AreaCommands {
    /// List all large areas
    Large,
    /// List middle areas under one or more large areas
    Middle {
        /// Large-area codes (e.g., Z011 Z012)
        codes: Vec<String>,
    },
    /// List small areas under one or more middle areas
    Small {
        /// Middle-area codes (e.g., Y005)
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

pub(crate) async fn run_areas(
    client: HotpepperClient,
    concurrency: usize,
    command: AreaCommands,
) -> anyhow::Result<()> {
    match command {
        AreaCommands::Large => {
            let result = client
                .get_large_areas()
                .await
                .map(|results| to_large_areas_response(&results));
            emit(&result)
        }
        AreaCommands::Middle { codes } => {
            let codes = validate_codes(&codes, "largeAreaCode")?;
            if codes.is_empty() {
                return emit(&ApiResult::success(MiddleAreasResponse::empty()));
            }
            let catalog = AreaCatalog::new(client, concurrency);
            let fan_out = catalog.middle_areas_for(&codes).await;
            emit(&merged(fan_out, |page, areas| MiddleAreasResponse { page, areas }))
        }
        AreaCommands::Small { codes } => {
            let codes = validate_codes(&codes, "middleAreaCode")?;
            let catalog = AreaCatalog::new(client, concurrency);
            let fan_out = catalog.small_areas_for(&codes).await;
            emit(&merged(fan_out, |page, areas| SmallAreasResponse { page, areas }))
        }
    }
}

fn validate_codes(codes: &[String], field: &str) -> anyhow::Result<Vec<String>> {
    codes
        .iter()
        .map(|code| {
            normalize_code(Some(&Value::String(code.clone())), field, true)
                .map_err(|e| anyhow::anyhow!("{}: {}", e.code, e.message))?
                .ok_or_else(|| anyhow::anyhow!("{field} is required"))
        })
        .collect()
}

/// Folds a fan-out into one envelope. Partial failures are logged and the
/// loaded areas returned; the call only fails when every parent failed.
pub(crate) fn merged<T, R>(
    fan_out: FanOut<T>,
    build: impl FnOnce(Page, Vec<T>) -> R,
) -> ApiResult<R> {
    let FanOut { areas, failures } = fan_out;
    for (parent, error) in &failures {
        tracing::warn!(
            %parent,
            code = %error.code,
            message = %error.message,
            "area fetch failed"
        );
    }
    if areas.is_empty() {
        if let Some((_, error)) = failures.into_iter().next() {
            return ApiResult::failure(error);
        }
    }
    let count = u64::try_from(areas.len()).unwrap_or(u64::MAX);
    let page = Page {
        total: count,
        start: 1,
        returned: count,
    };
    ApiResult::success(build(page, areas))
}
