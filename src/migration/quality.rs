use serde_json::{Map, Value};

/// Fraction of fields in a record that carry a usable value.
///
/// Nulls and empty strings count as unfilled; zeroes and `false` count as
/// filled. An empty record scores 0.0.
pub fn score_quality(record: &Map<String, Value>) -> f64 {
    if record.is_empty() {
        return 0.0;
    }

    let filled = record
        .values()
        .filter(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .count();

    filled as f64 / record.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_all_filled() {
        let sample = record(json!({"a": 1, "b": "x"}));
        assert_eq!(score_quality(&sample), 1.0);
    }

    #[test]
    fn test_null_and_empty_string_are_unfilled() {
        let sample = record(json!({"a": 1, "b": null, "c": ""}));
        assert!((score_quality(&sample) - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_and_false_count_as_filled() {
        let sample = record(json!({"a": 0, "b": false}));
        assert_eq!(score_quality(&sample), 1.0);
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let sample = record(json!({}));
        assert_eq!(score_quality(&sample), 0.0);
    }
}
