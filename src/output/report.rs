use std::collections::BTreeMap;
use std::fmt::Write;

use crate::analysis::QueryRecord;
use crate::features::FEATURE_COLUMNS;

/// Number of equal-width bins per histogram.
const HISTOGRAM_BINS: usize = 10;

/// Build a markdown report with feature summaries, distributions and
/// histograms of the complexity score and the query length.
pub fn build_report(records: &[QueryRecord], skipped: usize) -> String {
    let mut report = String::new();

    writeln!(report, "# SQL Complexity Report").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "Analyzed queries: {}", records.len()).unwrap();
    writeln!(report, "Skipped (unparseable): {skipped}").unwrap();

    if records.is_empty() {
        return report;
    }

    // Per-feature summary
    writeln!(report).unwrap();
    writeln!(report, "## Feature Summary").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "| Feature | Min | Max | Mean | Non-zero |").unwrap();
    writeln!(report, "|---------|-----|-----|------|----------|").unwrap();
    for (column, values) in FEATURE_COLUMNS.iter().zip(feature_values(records)) {
        let min = values.iter().copied().min().unwrap_or_default();
        let max = values.iter().copied().max().unwrap_or_default();
        let non_zero = values.iter().filter(|value| **value != 0).count();
        writeln!(
            report,
            "| {column} | {min} | {max} | {:.2} | {non_zero} |",
            mean(values.iter().map(|value| *value as f64))
        )
        .unwrap();
    }

    // Value distributions
    writeln!(report).unwrap();
    writeln!(report, "## Feature Distributions").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "| Feature | Distribution |").unwrap();
    writeln!(report, "|---------|--------------|").unwrap();
    for (column, values) in FEATURE_COLUMNS.iter().zip(feature_values(records)) {
        writeln!(report, "| {column} | {} |", format_distribution(&values)).unwrap();
    }

    // Complexity
    let scores: Vec<f64> = records.iter().map(|record| record.complexity).collect();
    let (low, high) = bounds(&scores);
    writeln!(report).unwrap();
    writeln!(report, "## Complexity").unwrap();
    writeln!(report).unwrap();
    writeln!(
        report,
        "Min {low:.2}, max {high:.2}, mean {:.2}",
        mean(scores.iter().copied())
    )
    .unwrap();
    write_histogram(&mut report, &scores);

    // Query length
    let lines: Vec<f64> = records
        .iter()
        .map(|record| record.length.lines as f64)
        .collect();
    let characters: Vec<f64> = records
        .iter()
        .map(|record| record.length.characters as f64)
        .collect();
    writeln!(report).unwrap();
    writeln!(report, "## Query Length").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "| Measure | Min | Max | Mean |").unwrap();
    writeln!(report, "|---------|-----|-----|------|").unwrap();
    for (measure, values) in [("lines", &lines), ("characters", &characters)] {
        let (low, high) = bounds(values);
        writeln!(
            report,
            "| {measure} | {low} | {high} | {:.2} |",
            mean(values.iter().copied())
        )
        .unwrap();
    }
    for (title, values) in [("Lines", &lines), ("Characters", &characters)] {
        writeln!(report).unwrap();
        writeln!(report, "### {title}").unwrap();
        write_histogram(&mut report, values);
    }

    report
}

fn write_histogram(report: &mut String, values: &[f64]) {
    writeln!(report).unwrap();
    writeln!(report, "| Range | Queries |").unwrap();
    writeln!(report, "|-------|---------|").unwrap();
    for bin in histogram(values) {
        let close = if bin.last { ']' } else { ')' };
        writeln!(
            report,
            "| [{:.2}, {:.2}{close} | {} |",
            bin.start, bin.end, bin.count
        )
        .unwrap();
    }
}

/// Feature values per column, each in record order.
fn feature_values(records: &[QueryRecord]) -> Vec<Vec<i64>> {
    let mut columns = vec![Vec::with_capacity(records.len()); FEATURE_COLUMNS.len()];
    for record in records {
        for (column, value) in columns.iter_mut().zip(record.features.values()) {
            column.push(value);
        }
    }
    columns
}

/// `value: count (share%)` pairs, ascending by value.
fn format_distribution(values: &[i64]) -> String {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_default() += 1;
    }
    counts
        .iter()
        .map(|(value, count)| {
            let share = *count as f64 / values.len() as f64 * 100.0;
            format!("{value}: {count} ({share:.1}%)")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

fn bounds(values: &[f64]) -> (f64, f64) {
    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (low, high)
}

#[derive(Debug, Clone, PartialEq)]
struct HistogramBin {
    start: f64,
    end: f64,
    count: usize,
    last: bool,
}

/// Equal-width bins over `[min, max]`, widened to one unit when all values
/// are equal. The last bin is closed on both ends.
fn histogram(values: &[f64]) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }
    let (mut low, mut high) = bounds(values);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }
    let width = (high - low) / HISTOGRAM_BINS as f64;

    let mut bins: Vec<HistogramBin> = (0..HISTOGRAM_BINS)
        .map(|index| HistogramBin {
            start: low + width * index as f64,
            end: if index + 1 == HISTOGRAM_BINS {
                high
            } else {
                low + width * (index + 1) as f64
            },
            count: 0,
            last: index + 1 == HISTOGRAM_BINS,
        })
        .collect();

    for value in values {
        let index = (((value - low) / width).floor() as usize).min(HISTOGRAM_BINS - 1);
        bins[index].count += 1;
    }
    bins
}
