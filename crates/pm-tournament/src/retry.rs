use pm_core::CoreError;
use pm_core::constants::LEDGER_RETRY_ATTEMPTS;
use pm_core::constants::LEDGER_RETRY_BASE;
use pm_core::constants::LEDGER_RETRY_CAP;
use std::future::Future;

/// Bounded exponential backoff for ledger calls (§4.4 failure semantics):
/// up to [`LEDGER_RETRY_ATTEMPTS`] tries, doubling from [`LEDGER_RETRY_BASE`]
/// and capped at [`LEDGER_RETRY_CAP`], surfacing `ledger_failure` once the
/// budget is exhausted.
pub async fn ledger_call<T, F, Fut>(what: &str, mut op: F) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut delay = LEDGER_RETRY_BASE;
    for attempt in 1..=LEDGER_RETRY_ATTEMPTS {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt == LEDGER_RETRY_ATTEMPTS => {
                log::error!("[pm_tournament::retry] {what} failed after {attempt} attempts: {err}");
                return Err(CoreError::LedgerFailure(err.to_string()));
            }
            Err(err) => {
                log::warn!("[pm_tournament::retry] {what} attempt {attempt} failed: {err}; retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(LEDGER_RETRY_CAP);
            }
        }
    }
    unreachable!("loop always returns by the final attempt")
}
