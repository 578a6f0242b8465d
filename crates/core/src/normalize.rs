//! Normalization of loosely-shaped slide content.
//!
//! Slide outlines are usually written by a language model, so graph nodes,
//! edges and timeline events show up as strings, lists or objects depending
//! on the prompt. Everything here reduces those shapes to canonical values
//! and silently drops entries it does not recognize; none of it fails.

use crate::types::TimelineEvent;
use serde_json::Value;
use std::borrow::Cow;

/// Keys checked for an event's date, in priority order.
pub const DATE_KEYS: &[&str] = &["date", "year", "time", "Date"];

/// Keys checked for an event's label, in priority order.
pub const LABEL_KEYS: &[&str] = &["label", "title", "event", "Label"];

/// Date used when an event has none.
pub const MISSING_DATE: &str = "N/A";

/// Label used when an event has none.
pub const MISSING_LABEL: &str = "No Label";

/// Render a JSON value as display text.
///
/// Strings are used verbatim; every other value uses its compact JSON form,
/// so `1990` becomes `"1990"` and `[1, 2]` becomes `"[1,2]"`.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a value counts as present when probing synonym keys.
///
/// Empty strings, zero, `false`, `null` and empty containers are all
/// treated as missing.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Reduce a raw `nodes` value to node identifiers.
///
/// Accepts plain strings, non-empty lists (first element) and non-empty
/// objects (first value in insertion order). Anything else is skipped, as
/// is a `nodes` value that is not a list at all.
pub fn normalize_nodes(raw: &Value) -> Vec<String> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items.first().map(value_to_string),
            Value::Object(map) => map.values().next().map(value_to_string),
            _ => None,
        })
        .collect()
}

/// Reduce a raw `edges` value to `(source, target)` pairs.
///
/// Extraction is positional: the first two list elements or the first two
/// object values, whatever their keys are called. Entries with fewer than
/// two usable values are skipped.
pub fn normalize_edges(raw: &Value) -> Vec<(String, String)> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Array(items) if items.len() >= 2 => {
                Some((value_to_string(&items[0]), value_to_string(&items[1])))
            }
            Value::Object(map) => {
                let mut values = map.values();
                match (values.next(), values.next()) {
                    (Some(source), Some(target)) => {
                        Some((value_to_string(source), value_to_string(target)))
                    }
                    _ => None,
                }
            }
            _ => None,
        })
        .collect()
}

/// Resolve the event list of a timeline slide's content.
///
/// The events live under `events`, or the content may itself be the event
/// list. Only object-shaped events are kept.
pub fn normalize_events(content: &Value) -> Vec<TimelineEvent> {
    let entries: &[Value] = match content {
        Value::Object(map) => match map.get("events") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        Value::Array(items) => items,
        _ => &[],
    };

    entries
        .iter()
        .filter_map(|entry| {
            let map = entry.as_object()?;
            // NOTE: falsy values (0, "", false) fall through to the next key
            // and finally to the sentinel, so a literal year 0 reads as "N/A".
            let pick = |keys: &[&str], fallback: &str| {
                keys.iter()
                    .filter_map(|key| map.get(*key))
                    .find(|value| is_truthy(value))
                    .map(value_to_string)
                    .unwrap_or_else(|| fallback.to_string())
            };

            Some(TimelineEvent {
                date: pick(DATE_KEYS, MISSING_DATE),
                label: pick(LABEL_KEYS, MISSING_LABEL),
            })
        })
        .collect()
}

/// Shorten a label to `max_chars` characters followed by `...`.
///
/// Counts characters, not bytes, and makes no attempt to break on words.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let head: String = label.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

/// Whether `c` may appear in XML 1.0 character data.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Drop characters XML 1.0 cannot carry (C0 controls other than tab and
/// line breaks, U+FFFE, U+FFFF).
///
/// JSON strings may contain them, but any XML part holding one is rejected
/// by office suites and SVG parsers alike.
pub fn strip_xml_invalid(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_nodes_mixed_shapes() {
        let raw = json!(["A", ["B"], {"x": "C"}, {}, [], 5]);
        assert_eq!(normalize_nodes(&raw), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_normalize_nodes_stringifies_values() {
        let raw = json!([[42, "ignored"], {"id": 7, "name": "Seven"}, null, true]);
        assert_eq!(normalize_nodes(&raw), vec!["42", "7"]);
    }

    #[test]
    fn test_normalize_nodes_first_object_value_in_insertion_order() {
        let raw = json!([{"zeta": "Z", "alpha": "A"}]);
        assert_eq!(normalize_nodes(&raw), vec!["Z"]);
    }

    #[test]
    fn test_normalize_nodes_not_a_list() {
        assert!(normalize_nodes(&json!({"a": "b"})).is_empty());
        assert!(normalize_nodes(&Value::Null).is_empty());
    }

    #[test]
    fn test_normalize_edges_mixed_shapes() {
        let raw = json!([["A", "B"], {"s": "A", "t": "C"}, ["X"]]);
        assert_eq!(
            normalize_edges(&raw),
            vec![
                ("A".to_string(), "B".to_string()),
                ("A".to_string(), "C".to_string())
            ]
        );
    }

    #[test]
    fn test_normalize_edges_extra_values_ignored() {
        let raw = json!([
            ["A", "B", "weight"],
            {"from": 1, "to": 2, "label": "x"},
            {"only": "one"},
            "A-B",
            []
        ]);
        assert_eq!(
            normalize_edges(&raw),
            vec![
                ("A".to_string(), "B".to_string()),
                ("1".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_event_synonym_keys() {
        let events = normalize_events(&json!({"events": [{"year": 1990, "event": "Founded"}]}));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, "1990");
        assert_eq!(events[0].label, "Founded");
    }

    #[test]
    fn test_event_defaults() {
        let events = normalize_events(&json!({"events": [{}]}));
        assert_eq!(events[0].date, MISSING_DATE);
        assert_eq!(events[0].label, MISSING_LABEL);
    }

    #[test]
    fn test_event_key_priority() {
        let events = normalize_events(&json!({"events": [
            {"Date": "late", "date": "early", "Label": "second", "title": "first"}
        ]}));
        assert_eq!(events[0].date, "early");
        assert_eq!(events[0].label, "first");
    }

    #[test]
    fn test_event_keys_are_case_sensitive() {
        let events = normalize_events(&json!([{"DATE": "2001", "LABEL": "x"}]));
        assert_eq!(events[0].date, MISSING_DATE);
        assert_eq!(events[0].label, MISSING_LABEL);
    }

    #[test]
    fn test_event_falsy_values_fall_through() {
        let events = normalize_events(&json!({"events": [
            {"date": "", "year": 0, "time": "Q3", "label": "", "event": "Launch"},
            {"date": 0, "label": false}
        ]}));
        assert_eq!(events[0].date, "Q3");
        assert_eq!(events[0].label, "Launch");
        assert_eq!(events[1].date, MISSING_DATE);
        assert_eq!(events[1].label, MISSING_LABEL);
    }

    #[test]
    fn test_events_content_is_list() {
        let events = normalize_events(&json!([
            {"date": "2020", "label": "A"},
            "not an event",
            ["2021", "B"],
            {"date": "2022", "label": "C"}
        ]));
        let labels: Vec<&str> = events.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn test_events_missing_or_wrong_shape() {
        assert!(normalize_events(&json!({})).is_empty());
        assert!(normalize_events(&json!({"events": {"date": "2020"}})).is_empty());
        assert!(normalize_events(&json!("2020")).is_empty());
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Fifteen chars!!", 10), "Fifteen ch...");
        assert_eq!(truncate_label("ten chars!", 10), "ten chars!");
        assert_eq!(truncate_label("short", 10), "short");
    }

    #[test]
    fn test_truncate_label_counts_characters() {
        assert_eq!(truncate_label("日本語のラベルがとても長い", 10), "日本語のラベルがとて...");
        assert_eq!(truncate_label("日本語のラベル", 10), "日本語のラベル");
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("text")), "text");
        assert_eq!(value_to_string(&json!(1990)), "1990");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "null");
        assert_eq!(value_to_string(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([0])));
    }

    #[test]
    fn test_strip_xml_invalid() {
        assert!(matches!(strip_xml_invalid("plain 日本語"), Cow::Borrowed(_)));
        assert_eq!(strip_xml_invalid("bad\u{7}"), "bad");
        assert_eq!(strip_xml_invalid("T\u{1}x\u{2}"), "Tx");
        assert_eq!(strip_xml_invalid("a\tb\nc\rd"), "a\tb\nc\rd");
        assert_eq!(strip_xml_invalid("\u{FFFE}ok\u{FFFF}"), "ok");
        assert_eq!(strip_xml_invalid("emoji \u{1F600}"), "emoji \u{1F600}");
    }
}
