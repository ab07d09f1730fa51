//! Response enrichment.
//!
//! # Data Flow
//! ```text
//! base list [e1, e2, e3]
//!     → fetch(e1) ┐
//!     → fetch(e2) ├─ issued together, awaited together
//!     → fetch(e3) ┘
//!     → merge(e_i, supplement_i or S::default())
//!     → enriched list, same order as input
//! ```
//!
//! # Design Decisions
//! - A failed fetch degrades that entity to the default supplement; the
//!   list request itself never fails because of enrichment
//! - Order is preserved by index, not by completion time

pub mod employee;

use std::fmt::Display;
use std::future::Future;

use futures_util::future::join_all;

use crate::observability::metrics;

/// Enrich every item concurrently.
///
/// `fetch` produces the supplement for one item. Failures are logged and
/// replaced by `S::default()` before `merge` combines item and supplement.
pub async fn enrich_all<T, S, E, F, Fut, M>(items: Vec<T>, fetch: F, merge: M) -> Vec<T>
where
    S: Default,
    E: Display,
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<S, E>>,
    M: Fn(T, S) -> T,
{
    let outcomes = join_all(items.iter().map(&fetch)).await;

    items
        .into_iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (item, outcome))| {
            let supplement = outcome.unwrap_or_else(|error| {
                tracing::warn!(index, error = %error, "Enrichment failed, using defaults");
                metrics::record_enrichment_fallback();
                S::default()
            });
            merge(item, supplement)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Default, PartialEq)]
    struct Label(String);

    #[tokio::test]
    async fn keeps_input_order_when_completion_order_differs() {
        let items = vec![(3u64, Label::default()), (1, Label::default()), (2, Label::default())];
        let enriched = enrich_all(
            items,
            |(n, _)| {
                let n = *n;
                async move {
                    tokio::time::sleep(Duration::from_millis(n * 20)).await;
                    Ok::<_, String>(Label(format!("#{n}")))
                }
            },
            |(n, _), label| (n, label),
        )
        .await;

        let labels: Vec<_> = enriched.into_iter().map(|(_, l)| l.0).collect();
        assert_eq!(labels, vec!["#3", "#1", "#2"]);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_default() {
        let items = vec![(1u64, Label::default()), (2, Label::default()), (3, Label::default())];
        let enriched = enrich_all(
            items,
            |(n, _)| {
                let n = *n;
                async move {
                    if n == 2 {
                        Err("profile lookup failed".to_string())
                    } else {
                        Ok(Label(format!("#{n}")))
                    }
                }
            },
            |(n, _), label| (n, label),
        )
        .await;

        assert_eq!(
            enriched,
            vec![
                (1, Label("#1".into())),
                (2, Label::default()),
                (3, Label("#3".into())),
            ]
        );
    }

    #[tokio::test]
    async fn fetches_run_concurrently() {
        let items: Vec<(u64, Label)> = (0..5).map(|n| (n, Label::default())).collect();
        let started = std::time::Instant::now();
        enrich_all(
            items,
            |_| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok::<_, String>(Label::default())
            },
            |item, _| item,
        )
        .await;
        assert!(started.elapsed() < Duration::from_millis(400));
    }
}
