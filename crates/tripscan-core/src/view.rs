//! Display projection of the canonical package set.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tripscan_schema::{Package, SortKey};

/// Filter by minimum rating, then sort by `sort`.
///
/// Absent ratings count as 0. The sort is stable, so ties keep canonical
/// order. Packages without a duration label sort after labelled ones.
pub fn project(packages: &[Package], sort: SortKey, min_rating: f64) -> Vec<&Package> {
    let mut visible: Vec<&Package> = packages
        .iter()
        .filter(|p| p.rating_or_zero() >= min_rating)
        .collect();
    visible.sort_by(|a, b| compare(a, b, sort));
    visible
}

fn compare(a: &Package, b: &Package, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Price => a.price().total_cmp(&b.price()),
        SortKey::Rating => b.rating_or_zero().total_cmp(&a.rating_or_zero()),
        SortKey::Duration => match (a.duration(), b.duration()) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Headline counts for a projected list ("Found N packages from M sources").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    /// Packages in the view.
    pub visible: usize,
    /// Distinct sources among them.
    pub sources: usize,
}

impl ViewSummary {
    /// Count a projected list.
    pub fn of(view: &[&Package]) -> Self {
        let sources: HashSet<_> = view.iter().map(|p| p.source()).collect();
        Self {
            visible: view.len(),
            sources: sources.len(),
        }
    }
}
