//! Walk-output classification.
//!
//! Turns the line-oriented text produced by walking an agent (simulated or
//! real) into normalized metric records. The upstream format is loose by
//! nature, so the pattern matching lives in one parse function returning a
//! structured [`WalkRecord`]; classification then works on the record and
//! never re-parses text.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use regex::Regex;

/// `MODULE::name.index rest` — output produced with MIBs loaded.
static QUALIFIED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)::(.*?)\.(.*?) (.*)$").expect("qualified pattern compiles"));

/// `name.index rest` — numeric or MIB-less output.
static BARE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\.(.*?) (.*)$").expect("bare pattern compiles"));

/// Parenthesized integer, as in `Timeticks: (12345) 0:02:03.45`.
static PAREN_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)\)").expect("paren pattern compiles"));

/// Module tag used when a line has no `Module::` qualifier.
const UNKNOWN_MODULE: &str = "Unknown";

/// Type tags whose values are candidate metrics.
const METRIC_TYPES: &[&str] = &[
    "Counter32",
    "Counter64",
    "Gauge32",
    "Integer",
    "INTEGER",
    "Unsigned32",
    "TimeTicks",
];

/// Concrete type names recognized when unwrapping doubly-tagged values.
const NESTED_TYPES: &[&str] = &[
    "INTEGER",
    "STRING",
    "Gauge32",
    "Counter32",
    "Counter64",
    "OID",
    "IpAddress",
    "TimeTicks",
    "Unsigned32",
];

/// Name fragments that mark a value as identifying rather than measuring.
const IDENTIFIER_KEYWORDS: &[&str] = &[
    "index", "id", "name", "descr", "serial", "mac", "type", "version",
];

/// One parsed walk line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkRecord {
    /// Module name, or `Unknown` for bare lines.
    pub module: String,
    /// Object name.
    pub name: String,
    /// Index string (kept textual; may be multi-part).
    pub index: String,
    /// Declared type tag, or `Unknown` when the value carried none.
    pub type_tag: String,
    /// Value text with tag and quotes stripped.
    pub value: String,
}

/// A numeric metric value, narrowed to an integer when whole.
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(serde::Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Whole number.
    Integer(i64),
    /// Fractional number (rescaled time-ticks, mostly).
    Float(f64),
}

/// One flattened output record.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize)]
pub struct MetricRecord {
    /// Metric name (the object name).
    pub metric_name: String,
    /// Coerced numeric value.
    pub value: MetricValue,
    /// Module the metric came from, or `Unknown`.
    pub mib_module: String,
    /// Category supplied by the caller, derived from the walk root.
    pub metric_category: String,
    /// Host the walk targeted.
    pub agent_host: String,
    /// Capture time, seconds since epoch; shared by all records of one
    /// parse invocation.
    pub timestamp: u64,
    /// Full label snapshot of the row, including `snmp_index`.
    pub labels: BTreeMap<String, String>,
}

/// Per-index aggregation row.
#[derive(Clone, Debug, Default)]
struct WalkRow {
    labels: BTreeMap<String, String>,
    metrics: BTreeMap<String, (MetricValue, String)>,
}

/// Parse one line into a structured record.
///
/// Lines matching neither pattern (banners, blanks, continuation text)
/// return `None` and are expected noise, not errors.
#[must_use]
pub fn parse_line(line: &str) -> Option<WalkRecord> {
    let (module, name, index, rest) = if let Some(caps) = QUALIFIED_LINE.captures(line) {
        (
            caps[1].to_string(),
            caps[2].to_string(),
            caps[3].trim().to_string(),
            caps[4].trim().to_string(),
        )
    } else if let Some(caps) = BARE_LINE.captures(line) {
        (
            UNKNOWN_MODULE.to_string(),
            caps[1].to_string(),
            caps[2].trim().to_string(),
            caps[3].trim().to_string(),
        )
    } else {
        return None;
    };

    let rest = rest.strip_prefix("= ").unwrap_or(&rest).to_string();

    let (type_tag, value) = match rest.split_once(": ") {
        Some((tag, data)) => {
            // Unwrap one doubly-tagged nesting level, e.g.
            // `STRING: INTEGER: up(1)` from enum-rendering agents.
            let data = match data.split_once(": ") {
                Some((inner_tag, inner_val)) if NESTED_TYPES.contains(&inner_tag.trim()) => {
                    inner_val
                }
                _ => data,
            };
            (tag.to_string(), data.to_string())
        }
        None => ("Unknown".to_string(), rest.clone()),
    };

    let value = value.trim_matches('"').to_string();

    Some(WalkRecord {
        module,
        name,
        index,
        type_tag,
        value,
    })
}

/// Whether the type tag belongs to a numeric metric family.
fn is_metric_type(type_tag: &str) -> bool {
    METRIC_TYPES.iter().any(|t| type_tag.contains(t))
}

/// Whether the object name marks an identifier (always a label).
fn is_identifier_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IDENTIFIER_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Coerce metric value text to a number.
///
/// Prefers a parenthesized integer when present; otherwise parses the
/// first whitespace-delimited token as a float, narrowing to integer when
/// whole.
fn coerce_metric(value: &str) -> Option<MetricValue> {
    if let Some(caps) = PAREN_INT.captures(value) {
        return caps[1].parse::<i64>().ok().map(MetricValue::Integer);
    }
    let token = value.split_whitespace().next()?;
    let parsed: f64 = token.parse().ok()?;
    if parsed.fract() == 0.0 {
        Some(MetricValue::Integer(parsed as i64))
    } else {
        Some(MetricValue::Float(parsed))
    }
}

/// Parse walk output into metric records, stamping them with the current
/// time.
#[must_use]
pub fn parse_walk<'a, I>(lines: I, agent_host: &str, root_oid: &str) -> Vec<MetricRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    parse_walk_at(lines, agent_host, root_oid, timestamp)
}

/// Parse walk output with an explicit capture timestamp.
///
/// Rows aggregate by index string; each confirmed metric in a row becomes
/// one record carrying the row's full label snapshot. A value that fails
/// numeric coercion is demoted to a label, never dropped.
#[must_use]
pub fn parse_walk_at<'a, I>(
    lines: I,
    agent_host: &str,
    root_oid: &str,
    timestamp: u64,
) -> Vec<MetricRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let category = root_oid
        .split_once("::")
        .map_or(root_oid, |(_, rest)| rest)
        .to_string();

    let mut rows: BTreeMap<String, WalkRow> = BTreeMap::new();

    for line in lines {
        let Some(record) = parse_line(line) else {
            continue;
        };
        let row = rows.entry(record.index.clone()).or_default();

        // Agents print both `Timeticks` and `TimeTicks`.
        let is_time_ticks = record.type_tag.to_lowercase().contains("timeticks");
        // Time-ticks always measure; otherwise numeric type tags measure
        // unless the name says identifier.
        let is_metric = is_time_ticks
            || (is_metric_type(&record.type_tag) && !is_identifier_name(&record.name));

        if !is_metric {
            row.labels.insert(record.name, record.value);
            continue;
        }

        let coerced = if is_time_ticks {
            // Centiseconds to seconds.
            PAREN_INT
                .captures(&record.value)
                .and_then(|caps| caps[1].parse::<f64>().ok())
                .map(|ticks| {
                    let seconds = ticks / 100.0;
                    if seconds.fract() == 0.0 {
                        MetricValue::Integer(seconds as i64)
                    } else {
                        MetricValue::Float(seconds)
                    }
                })
                .or_else(|| coerce_metric(&record.value))
        } else {
            coerce_metric(&record.value)
        };

        match coerced {
            Some(value) => {
                row.metrics.insert(record.name, (value, record.module));
            }
            None => {
                row.labels.insert(record.name, record.value);
            }
        }
    }

    let mut output = Vec::new();
    for (index, mut row) in rows {
        row.labels.insert("snmp_index".to_string(), index);
        for (metric_name, (value, module)) in row.metrics {
            output.push(MetricRecord {
                metric_name,
                value,
                mib_module: module,
                metric_category: category.clone(),
                agent_host: agent_host.to_string(),
                timestamp,
                labels: row.labels.clone(),
            });
        }
    }
    output
}
