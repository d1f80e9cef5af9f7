//! Plain-text rendering of the analysis. Every writer takes any
//! [`std::io::Write`] so the binary prints to stdout and tests capture bytes.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::Result;
use crate::records::Dataset;
use crate::stats::{self, DescriptiveStats, SmokerImpact};

const SEPARATOR_WIDTH: usize = 35;

fn separator<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))
}

/// `value` with `decimals` fraction digits and comma-grouped thousands.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_grouped(value, 2))
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Highest mean first; equal means keep key order.
pub fn rank_descending(means: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = means.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Ascending by the numeric value of the key. Keys that are not numbers
/// go last, in key order.
pub fn order_by_count(means: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut ordered: Vec<(&str, f64)> = means.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ordered.sort_by_key(|(key, _)| {
        let count = key.trim().parse::<u64>().ok();
        (count.is_none(), count)
    });
    ordered
}

pub fn write_descriptive<W: Write>(out: &mut W, stats: &DescriptiveStats) -> std::io::Result<()> {
    writeln!(out, "--- 1. Descriptive Statistics ---")?;
    writeln!(
        out,
        "Average Age: {:.1} years (Range: {}-{})",
        stats.age.mean, stats.age.min, stats.age.max
    )?;
    writeln!(
        out,
        "Average BMI: {:.1} (Range: {:.1}-{:.1})",
        stats.bmi.mean, stats.bmi.min, stats.bmi.max
    )?;
    writeln!(
        out,
        "Average Charge: {} (Range: {}-{})",
        format_currency(stats.charges.mean),
        format_currency(stats.charges.min),
        format_currency(stats.charges.max)
    )?;
    separator(out)
}

/// The body is left out unless both smokers and non-smokers are present.
pub fn write_smoker_impact<W: Write>(
    out: &mut W,
    means: &BTreeMap<String, f64>,
) -> std::io::Result<()> {
    writeln!(out, "--- 2. Impact of Smoker Status ---")?;
    if let Some(impact) = SmokerImpact::from_means(means) {
        writeln!(out, "Smokers Average: {}", format_currency(impact.smokers))?;
        writeln!(out, "Non-Smokers Average: {}", format_currency(impact.non_smokers))?;
        if let Some(premium) = impact.premium {
            writeln!(out, "Smokers pay {}% more on average.", format_grouped(premium, 0))?;
        }
    }
    separator(out)
}

pub fn write_region_impact<W: Write>(
    out: &mut W,
    means: &BTreeMap<String, f64>,
) -> std::io::Result<()> {
    writeln!(out, "--- 3. Impact of Region ---")?;
    writeln!(out, "Average Charges by Region:")?;
    for (region, charge) in rank_descending(means) {
        writeln!(out, "- {}: {}", capitalize(region), format_currency(charge))?;
    }
    separator(out)
}

pub fn write_children_impact<W: Write>(
    out: &mut W,
    means: &BTreeMap<String, f64>,
) -> std::io::Result<()> {
    writeln!(out, "--- 4. Impact of Family Size (Children) ---")?;
    writeln!(out, "Average Charges by Number of Children:")?;
    for (count, charge) in order_by_count(means) {
        writeln!(out, "- {} Children: {}", count, format_currency(charge))?;
    }
    separator(out)
}

/// Writes all four sections. An empty dataset fails before anything is
/// written.
pub fn write_report<W: Write>(out: &mut W, dataset: &Dataset) -> Result<()> {
    let descriptive = DescriptiveStats::from_dataset(dataset)?;

    write_descriptive(out, &descriptive)?;
    write_smoker_impact(out, &stats::charges_by_smoker(dataset))?;
    write_region_impact(out, &stats::charges_by_region(dataset))?;
    write_children_impact(out, &stats::charges_by_children(dataset))?;
    Ok(())
}
