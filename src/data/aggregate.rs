use std::collections::{HashMap, HashSet};

use super::filter::View;
use super::model::Dataset;
use crate::error::Result;

/// One bar of a count chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Row counts per category of `field` over `view`, largest first.
///
/// Equal counts keep the order in which their categories first appear in
/// the view. Missing values are not counted.
pub fn count_by(dataset: &Dataset, view: &View, field: &str) -> Result<Vec<CategoryCount>> {
    let col = dataset.column_index(field)?;

    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    for &row in view.rows() {
        let Some(category) = dataset.value(row, col).as_category() else {
            continue;
        };
        match slot.get(&*category) {
            Some(&i) => counts[i].count += 1,
            None => {
                slot.insert(category.to_string(), counts.len());
                counts.push(CategoryCount {
                    category: category.into_owned(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-encountered order among ties.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

/// The `k` most frequent categories of `field` over the whole dataset, in
/// rank order. Ties are broken by first appearance in the dataset.
pub fn top_k(dataset: &Dataset, field: &str, k: usize) -> Result<Vec<String>> {
    Ok(count_by(dataset, &View::all(dataset), field)?
        .into_iter()
        .take(k)
        .map(|c| c.category)
        .collect())
}

/// `(min, max)` of a numeric field over `view`; `None` if no row has a value.
pub fn numeric_extent(dataset: &Dataset, view: &View, field: &str) -> Result<Option<(f64, f64)>> {
    let col = dataset.numeric_column(field)?;
    Ok(view
        .rows()
        .iter()
        .filter_map(|&row| dataset.value(row, col).as_f64())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        }))
}

/// Distinct values of `field` in order of first appearance, for select
/// boxes. Missing values are skipped.
pub fn distinct_values(dataset: &Dataset, field: &str) -> Result<Vec<String>> {
    let col = dataset.column_index(field)?;
    let mut seen = HashSet::new();
    Ok(dataset
        .rows
        .iter()
        .filter_map(|r| r.get(col).as_category().map(|c| c.into_owned()))
        .filter(|c| seen.insert(c.clone()))
        .collect())
}
