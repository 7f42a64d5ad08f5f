//! Per-app capture: pull each domain from the remote side and save it locally.

use serde::Serialize;

use tandem_core::{AppEntry, Domain};

use crate::error::CaptureError;

/// Produces the text of one domain document for one app.
pub trait DomainCapturer {
    fn capture(&mut self, app: &AppEntry, domain: Domain) -> Result<String, CaptureError>;
}

/// Persists a captured domain document.
pub trait DomainStore {
    fn save(&mut self, app: &AppEntry, domain: Domain, text: &str) -> Result<(), CaptureError>;
}

/// Outcome of one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureResult {
    pub domain: Domain,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptureResult {
    fn ok(domain: Domain) -> Self {
        Self {
            domain,
            success: true,
            error: None,
        }
    }

    fn failed(domain: Domain, error: String) -> Self {
        Self {
            domain,
            success: false,
            error: Some(error),
        }
    }
}

/// Capture and save every domain of `app`, in order.
///
/// A recoverable error is recorded and the next domain is attempted. A fatal
/// error is recorded, and every remaining domain is recorded as failed
/// without being attempted. The result always has one entry per domain.
pub fn capture_app<C, S>(
    app: &AppEntry,
    domains: &[Domain],
    capturer: &mut C,
    store: &mut S,
) -> Vec<CaptureResult>
where
    C: DomainCapturer + ?Sized,
    S: DomainStore + ?Sized,
{
    let mut results = Vec::with_capacity(domains.len());
    let mut fatal_in: Option<Domain> = None;

    for &domain in domains {
        if let Some(origin) = fatal_in {
            results.push(CaptureResult::failed(
                domain,
                format!("skipped after fatal error in {origin}"),
            ));
            continue;
        }

        tracing::debug!("{}: capturing {domain}", app.name);
        let outcome = capturer
            .capture(app, domain)
            .and_then(|text| store.save(app, domain, &text));
        match outcome {
            Ok(()) => results.push(CaptureResult::ok(domain)),
            Err(err) if err.is_fatal() => {
                tracing::error!("{}: {domain}: {err}", app.name);
                fatal_in = Some(domain);
                results.push(CaptureResult::failed(domain, err.to_string()));
            }
            Err(err) => {
                tracing::warn!("{}: {domain}: {err}", app.name);
                results.push(CaptureResult::failed(domain, err.to_string()));
            }
        }
    }

    results
}

/// Ledger for an app that was never attempted because `failed_app` failed
/// earlier in the run.
pub fn skipped_app(domains: &[Domain], failed_app: &str) -> Vec<CaptureResult> {
    domains
        .iter()
        .map(|&domain| {
            CaptureResult::failed(domain, format!("skipped after failure of {failed_app}"))
        })
        .collect()
}

/// First failed domain and how many failed, or `None` when all succeeded.
pub fn first_failure(results: &[CaptureResult]) -> Option<(&CaptureResult, usize)> {
    let failed = results.iter().filter(|r| !r.success).count();
    results.iter().find(|r| !r.success).map(|first| (first, failed))
}
