//! Descriptive statistics and frequency tables used by the aggregation
//! passes.

use std::collections::HashMap;

use serde::Serialize;

/// Arithmetic mean. Empty input has no mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile `p` in [0, 100] with linear interpolation between closest
/// ranks (`rank = p/100 * (n - 1)`).
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 50.0)
}

/// 25th, 50th and 75th percentiles.
pub fn quartiles(values: &[f64]) -> Option<[f64; 3]> {
    Some([
        percentile(values, 25.0)?,
        percentile(values, 50.0)?,
        percentile(values, 75.0)?,
    ])
}

/// `part / whole * 100`, or 0 for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// A labelled count, as reported in ranked listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub name: String,
    pub count: usize,
}

/// Counter that remembers first-seen order, so ties in [`most_common`]
/// come out in the order they were first counted.
///
/// [`most_common`]: Frequencies::most_common
#[derive(Debug, Clone, Default)]
pub struct Frequencies {
    order: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Frequencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        self.add_n(key, 1);
    }

    pub fn add_n(&mut self, key: &str, n: usize) {
        match self.index.get(key) {
            Some(&i) => self.order[i].1 += n,
            None => {
                self.index.insert(key.to_string(), self.order.len());
                self.order.push((key.to_string(), n));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.order.iter().map(|(_, n)| n).sum()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Highest counts first; `n` of them.
    pub fn most_common(&self, n: usize) -> Vec<Ranked> {
        let mut ranked: Vec<&(String, usize)> = self.order.iter().collect();
        // stable: equal counts keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(n)
            .map(|(name, count)| Ranked {
                name: name.clone(),
                count: *count,
            })
            .collect()
    }

    /// Every entry in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order.iter().map(|(k, n)| (k.as_str(), *n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[]), None);
        assert!((mean(&[1.0, 2.0, 6.0]).unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_quartiles_interpolate_linearly() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((q[0] - 1.75).abs() < 1e-9);
        assert!((q[1] - 2.5).abs() < 1e-9);
        assert!((q[2] - 3.25).abs() < 1e-9);
        assert_eq!(quartiles(&[0.0]), Some([0.0, 0.0, 0.0]));
        assert_eq!(quartiles(&[]), None);
    }

    #[test]
    fn test_percentage_of_nothing_is_zero() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn test_most_common_breaks_ties_by_first_seen() {
        let mut f = Frequencies::new();
        for k in ["b", "a", "c", "a", "c", "d"] {
            f.add(k);
        }
        let top: Vec<(String, usize)> = f.most_common(3).into_iter().map(|r| (r.name, r.count)).collect();
        assert_eq!(
            top,
            vec![("a".to_string(), 2), ("c".to_string(), 2), ("b".to_string(), 1)]
        );
        assert_eq!(f.total(), 6);
        assert_eq!(f.len(), 4);
        let keys: Vec<&str> = f.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c", "d"]);
    }
}
