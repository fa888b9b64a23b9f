//! Filter pipeline: run a batch of items through the active triggers.
//!
//! An item is kept when any active trigger fires for it. Triggers are tried
//! in activation order and testing stops at the first one that fires, so an
//! item matched by several triggers still appears once. Output keeps the
//! input order.
//!
//! Items whose evaluation fails (a time trigger meeting an item with no
//! resolvable timestamp) are neither kept nor silently dropped: they are
//! logged and listed in [`FilterReport::failed`].

use newswatch_core::NewsItem;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::trigger::{EvalError, TriggerSet};

/// An item that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    /// Position of the item in the input batch.
    pub index: usize,
    pub guid: Option<String>,
    pub error: EvalError,
}

/// Outcome of filtering one batch.
#[derive(Debug, Default)]
pub struct FilterReport<'a> {
    /// Matching items, in input order.
    pub matched: Vec<&'a NewsItem>,
    /// Items skipped because evaluation failed.
    pub failed: Vec<FailedItem>,
}

/// Items from `items` matched by any active trigger, in input order.
///
/// Failing items are skipped with a warning; use [`filter_with_report`] to
/// inspect them.
pub fn filter<'a>(items: &'a [NewsItem], triggers: &TriggerSet) -> Vec<&'a NewsItem> {
    filter_with_report(items, triggers).matched
}

/// Like [`filter`], also returning the items whose evaluation failed.
pub fn filter_with_report<'a>(items: &'a [NewsItem], triggers: &TriggerSet) -> FilterReport<'a> {
    let outcomes = items
        .iter()
        .enumerate()
        .map(|(index, item)| (index, triggers.matches(item)));
    collect_report(items, outcomes)
}

/// Parallel [`filter`] over a rayon pool. Output order matches `filter`.
pub fn par_filter<'a>(items: &'a [NewsItem], triggers: &TriggerSet) -> Vec<&'a NewsItem> {
    par_filter_with_report(items, triggers).matched
}

/// Parallel [`filter_with_report`]. Matches and failures come back in input
/// order, identical to the sequential report.
pub fn par_filter_with_report<'a>(items: &'a [NewsItem], triggers: &TriggerSet) -> FilterReport<'a> {
    let outcomes: Vec<(usize, Result<bool, EvalError>)> = items
        .par_iter()
        .enumerate()
        .map(|(index, item)| (index, triggers.matches(item)))
        .collect();
    collect_report(items, outcomes)
}

/// Split per-item outcomes, already in input order, into a report.
fn collect_report<'a>(
    items: &'a [NewsItem],
    outcomes: impl IntoIterator<Item = (usize, Result<bool, EvalError>)>,
) -> FilterReport<'a> {
    let mut report = FilterReport::default();

    for (index, outcome) in outcomes {
        let item = &items[index];
        match outcome {
            Ok(true) => report.matched.push(item),
            Ok(false) => {}
            Err(error) => {
                warn!(index, guid = ?item.guid(), error = %error, "skipping item: trigger evaluation failed");
                report.failed.push(FailedItem {
                    index,
                    guid: item.guid().map(str::to_owned),
                    error,
                });
            }
        }
    }

    debug!(
        items = items.len(),
        matched = report.matched.len(),
        failed = report.failed.len(),
        "filtered batch"
    );
    report
}

// ── Tests ───────────────────────────────────────────────────────────
