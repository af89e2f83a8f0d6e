//! Lookup of single samples in node exporter text exposition.
//!
//! Records look like `name{label="value",...} value [timestamp]`. Lookups are
//! a linear first-match scan; at most one record per (name, label set) is
//! assumed and not verified.

use crate::errors::CollectorError;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Exact-match constraint on label values. Empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelFilter(BTreeMap<String, String>);

impl LabelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a filter that additionally requires `label="value"`.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(label.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.0
            .iter()
            .all(|(k, v)| labels.get(k).is_some_and(|actual| actual == v))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelFilter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One resolved exposition record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub value: f64,
}

/// Value of the first record named exactly `metric` whose labels satisfy `filter`.
pub fn find(text: &str, metric: &str, filter: &LabelFilter) -> Option<f64> {
    find_sample(text, metric, filter).map(|s| s.value)
}

/// Like [`find`] but keeps the record's name and labels.
///
/// Malformed candidate records are logged and skipped; the scan continues
/// with the next line. No match is `None`, never an error.
pub fn find_sample(text: &str, metric: &str, filter: &LabelFilter) -> Option<MetricSample> {
    for line in text.lines() {
        let Some((name, rest)) = split_name(line) else {
            continue;
        };
        if name != metric {
            continue;
        }

        match parse_candidate(metric, rest, filter) {
            Ok(Some((labels, value))) => {
                return Some(MetricSample {
                    name: name.to_string(),
                    labels,
                    value,
                })
            }
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, record = line, "skipping malformed exposition record");
            }
        }
    }
    None
}

/// Splits the metric name off a record. Comments and blank lines yield `None`.
fn split_name(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let end = line
        .find(|c: char| c == '{' || c.is_whitespace())
        .unwrap_or(line.len());
    Some((&line[..end], &line[end..]))
}

/// Labels and value of a name candidate, or `None` when the filter rejects it.
fn parse_candidate(
    metric: &str,
    rest: &str,
    filter: &LabelFilter,
) -> Result<Option<(BTreeMap<String, String>, f64)>, CollectorError> {
    let (labels, tail) = match rest.strip_prefix('{') {
        Some(block) => parse_labels(metric, block)?,
        None => (BTreeMap::new(), rest),
    };
    if !filter.matches(&labels) {
        return Ok(None);
    }

    let raw = tail.split_whitespace().next().unwrap_or_default();
    let value = raw
        .parse::<f64>()
        .map_err(|_| CollectorError::ParseError {
            metric: metric.to_string(),
            field: "value".into(),
            raw: raw.to_string(),
        })?;
    Ok(Some((labels, value)))
}

/// Parses a label block (opening brace already consumed) and returns the
/// labels plus whatever follows the closing brace.
fn parse_labels<'a>(
    metric: &str,
    block: &'a str,
) -> Result<(BTreeMap<String, String>, &'a str), CollectorError> {
    let malformed = || CollectorError::ParseError {
        metric: metric.to_string(),
        field: "labels".into(),
        raw: block.to_string(),
    };

    // Delimiters are all ASCII, so byte offsets are valid slice boundaries.
    let bytes = block.as_bytes();
    let mut labels = BTreeMap::new();
    let mut i = 0;

    loop {
        while i < bytes.len() && (bytes[i] == b',' || bytes[i].is_ascii_whitespace()) {
            i += 1;
        }
        match bytes.get(i) {
            None => return Err(malformed()),
            Some(b'}') => return Ok((labels, &block[i + 1..])),
            Some(_) => {}
        }

        let key_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        let key = &block[key_start..i];
        if key.is_empty() || bytes.get(i) != Some(&b'=') || bytes.get(i + 1) != Some(&b'"') {
            return Err(malformed());
        }
        i += 2;

        let mut value = String::new();
        let mut segment = i;
        loop {
            match bytes.get(i) {
                None => return Err(malformed()),
                Some(b'"') => {
                    value.push_str(&block[segment..i]);
                    i += 1;
                    break;
                }
                Some(b'\\') => {
                    value.push_str(&block[segment..i]);
                    match bytes.get(i + 1) {
                        Some(b'n') => value.push('\n'),
                        Some(b'\\') => value.push('\\'),
                        Some(b'"') => value.push('"'),
                        _ => return Err(malformed()),
                    }
                    i += 2;
                    segment = i;
                }
                Some(_) => i += 1,
            }
        }
        labels.insert(key.to_string(), value);
    }
}
