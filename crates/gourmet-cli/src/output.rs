use gourmet_core::ApiResult;
use serde::Serialize;

/// Prints the envelope as pretty JSON on stdout. A failure envelope is
/// printed too and then turned into a non-zero exit.
pub(crate) fn emit<T: Serialize>(result: &ApiResult<T>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    if let Some(error) = result.error() {
        anyhow::bail!("{}: {}", error.code, error.message);
    }
    Ok(())
}
