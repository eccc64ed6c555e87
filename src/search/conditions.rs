use serde_json::Value;

use super::config::{FieldQuery, SearchConfig};
use super::query::QueryBuilder;
use crate::errors::SearchError;

/// One `[fieldIndex, comparison, input]` triple of a client filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub field_index: usize,
    pub comparison: String,
    pub input: String,
}

impl FilterCondition {
    fn from_json(value: &Value, field_count: usize) -> Result<Self, SearchError> {
        let [index, comparison, input] = value
            .as_array()
            .map(Vec::as_slice)
            .and_then(|triple| <&[Value; 3]>::try_from(triple).ok())
            .ok_or_else(|| {
                SearchError::bad_query("each condition must be a [field, comparison, input] triple")
            })?;

        let field_index = parse_field_index(index)?;
        let field_index = usize::try_from(field_index)
            .ok()
            .filter(|i| *i < field_count)
            .ok_or(SearchError::IndexOutOfRange {
                index: field_index,
                len: field_count,
            })?;

        let Value::String(comparison) = comparison else {
            return Err(SearchError::bad_query(format!(
                "comparison must be a string, got {comparison}"
            )));
        };

        let input = match input {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(SearchError::bad_query(format!(
                    "input must be a string, number or boolean, got {other}"
                )));
            }
        };

        Ok(Self {
            field_index,
            comparison: comparison.clone(),
            input,
        })
    }
}

/// Integer or all-digit string. Digit strings too long for `i128` saturate,
/// they are out of range either way.
fn parse_field_index(index: &Value) -> Result<i128, SearchError> {
    let parsed = match index {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Some(s.parse().unwrap_or(i128::MAX))
        }
        _ => None,
    };
    parsed.ok_or_else(|| {
        SearchError::bad_query(format!("field index must be an integer, got {index}"))
    })
}

/// Parse a serialized filter expression against a config with `field_count` fields.
///
/// # Errors
/// `BadQuery` if the payload is not a JSON list of well-formed triples,
/// `IndexOutOfRange` if a triple points past the last field.
pub fn parse_filter_expression(
    raw: &str,
    field_count: usize,
) -> Result<Vec<FilterCondition>, SearchError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| SearchError::bad_query(e.to_string()))?;
    let Value::Array(conditions) = parsed else {
        return Err(SearchError::bad_query("expected a list of conditions"));
    };

    conditions
        .iter()
        .map(|condition| FilterCondition::from_json(condition, field_count))
        .collect()
}

/// Translate a comparison token into an SQL operator and value.
///
/// - `!%*%` becomes `NOT LIKE %input%`
/// - `*%`, `%*`, `%*%` become `LIKE` with `*` replaced by the input
/// - anything else is passed through as the operator, with the input as value
#[must_use]
pub fn default_clause<'a>(comparison: &'a str, input: &str) -> (&'a str, String) {
    match comparison {
        "!%*%" => ("NOT LIKE", comparison[1..].replace('*', input)),
        "*%" | "%*" | "%*%" => ("LIKE", comparison.replace('*', input)),
        operator => (operator, input.to_string()),
    }
}

/// Add the conditions of a client filter expression to `query`.
///
/// A missing or blank payload leaves `query` untouched. Conditions are applied
/// in order and combine with AND. Fields with a custom query callback hand the
/// raw comparison and input to it; every other field goes through
/// [`default_clause`].
///
/// # Errors
/// Any [`parse_filter_expression`] error, or an error from the query builder
/// or a field callback. Nothing is retried.
pub fn apply_search<Q: QueryBuilder>(
    mut query: Q,
    config: &SearchConfig<Q>,
    raw: Option<&str>,
) -> Result<Q, SearchError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(query);
    };

    for condition in parse_filter_expression(raw, config.len())? {
        let Some(field) = config.get_index(condition.field_index) else {
            return Err(SearchError::IndexOutOfRange {
                index: i128::try_from(condition.field_index).unwrap_or(i128::MAX),
                len: config.len(),
            });
        };

        match &field.query {
            FieldQuery::Custom(callback) => {
                tracing::debug!(
                    field = %field.key,
                    comparison = %condition.comparison,
                    "Applying custom search condition"
                );
                callback(&mut query, &condition.comparison, &condition.input)?;
            }
            FieldQuery::Default => {
                let column = field.column_name();
                let (operator, value) = default_clause(&condition.comparison, &condition.input);
                tracing::debug!(field = %column, operator, "Applying search condition");
                query.and_where(column, operator, &value)?;
            }
        }
    }

    Ok(query)
}

impl<Q: QueryBuilder> SearchConfig<Q> {
    /// Shorthand for [`apply_search`] with this config.
    ///
    /// # Errors
    /// See [`apply_search`].
    pub fn apply(&self, query: Q, raw: Option<&str>) -> Result<Q, SearchError> {
        apply_search(query, self, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FieldDescriptor, FieldType, WhereClauses};

    fn config(keys: &[&str]) -> SearchConfig<WhereClauses> {
        let mut config = SearchConfig::new();
        for key in keys {
            config.insert(FieldDescriptor::new(*key, FieldType::Text, *key));
        }
        config
    }

    #[test]
    fn test_default_clause_grammar() {
        assert_eq!(default_clause("!%*%", "bob"), ("NOT LIKE", "%bob%".to_string()));
        assert_eq!(default_clause("%*%", "bob"), ("LIKE", "%bob%".to_string()));
        assert_eq!(default_clause("*%", "bob"), ("LIKE", "bob%".to_string()));
        assert_eq!(default_clause("%*", "bob"), ("LIKE", "%bob".to_string()));
        assert_eq!(default_clause(">=", "5"), (">=", "5".to_string()));
        assert_eq!(default_clause("*", "bob"), ("*", "bob".to_string()));
    }

    #[test]
    fn test_parse_accepts_numeric_strings_and_scalars() {
        let conditions = parse_filter_expression(r#"[["1", "=", 5], [0, "=", true]]"#, 2).unwrap();
        assert_eq!(
            conditions,
            vec![
                FilterCondition {
                    field_index: 1,
                    comparison: "=".into(),
                    input: "5".into(),
                },
                FilterCondition {
                    field_index: 0,
                    comparison: "=".into(),
                    input: "true".into(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_payloads() {
        for raw in [
            "not-json",
            r#"{"0": "=", "1": "x"}"#,
            r#""[[0, \"=\", \"x\"]]""#,
            r#"[[0, "="]]"#,
            r#"[[0, "=", "x", "y"]]"#,
            r#"[[1.5, "=", "x"]]"#,
            r#"[[0, 1, "x"]]"#,
            r#"[[0, "=", null]]"#,
            r#"[[0, "=", ["x"]]]"#,
            r#"["0=x"]"#,
        ] {
            let err = parse_filter_expression(raw, 3).unwrap_err();
            assert!(matches!(err, SearchError::BadQuery { .. }), "{raw}: {err:?}");
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range_indexes() {
        assert_eq!(
            parse_filter_expression(r#"[[3, "=", "x"]]"#, 3).unwrap_err(),
            SearchError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            parse_filter_expression(r#"[[-1, "=", "x"]]"#, 3).unwrap_err(),
            SearchError::IndexOutOfRange { index: -1, len: 3 }
        );
    }

    #[test]
    fn test_oversized_indexes_are_out_of_range() {
        assert_eq!(
            parse_filter_expression(r#"[[18446744073709551615, "=", "x"]]"#, 3).unwrap_err(),
            SearchError::IndexOutOfRange {
                index: 18_446_744_073_709_551_615,
                len: 3,
            }
        );
        assert_eq!(
            parse_filter_expression(r#"[["99999999999999999999", "=", "x"]]"#, 3).unwrap_err(),
            SearchError::IndexOutOfRange {
                index: 99_999_999_999_999_999_999,
                len: 3,
            }
        );
        let huge = format!(r#"[["{}", "=", "x"]]"#, "9".repeat(60));
        assert_eq!(
            parse_filter_expression(&huge, 3).unwrap_err(),
            SearchError::IndexOutOfRange {
                index: i128::MAX,
                len: 3,
            }
        );
    }

    #[test]
    fn test_absent_payload_is_a_no_op() {
        let config = config(&["age"]);
        let query = WhereClauses::new().with("id", ">", "0");
        for raw in [None, Some(""), Some("   ")] {
            let result = apply_search(query.clone(), &config, raw).unwrap();
            assert_eq!(result, query);
        }
    }

    #[test]
    fn test_empty_list_adds_nothing() {
        let config = config(&["age"]);
        let result = apply_search(WhereClauses::new(), &config, Some("[]")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_conditions_accumulate_in_order() {
        let config = config(&["name", "age"]);
        let result = config
            .apply(
                WhereClauses::new(),
                Some(r#"[[1, ">", "30"], [0, "*%", "Ad"], [1, "<", "60"]]"#),
            )
            .unwrap();
        assert_eq!(
            result,
            WhereClauses::new()
                .with("age", ">", "30")
                .with("name", "LIKE", "Ad%")
                .with("age", "<", "60")
        );
    }

    #[test]
    fn test_explicit_column_is_used() {
        let mut config = config(&["author"]);
        let mut field = FieldDescriptor::new("author", FieldType::Text, "Author");
        field.column = Some("users.name".into());
        config.insert(field);

        let result = config
            .apply(WhereClauses::new(), Some(r#"[[0, "=", "Ada"]]"#))
            .unwrap();
        assert_eq!(result, WhereClauses::new().with("users.name", "=", "Ada"));
    }

    #[test]
    fn test_custom_callback_replaces_default_grammar() {
        let config = config(&["name", "tags"])
            .with_query("tags", |query: &mut WhereClauses, comparison, input| {
                for tag in input.split(',') {
                    query.and_where("tag", comparison, tag.trim())?;
                }
                Ok(())
            })
            .unwrap();

        let result = config
            .apply(WhereClauses::new(), Some(r#"[[1, "%*%", "a, b"], [0, "%*%", "bob"]]"#))
            .unwrap();
        assert_eq!(
            result,
            WhereClauses::new()
                .with("tag", "%*%", "a")
                .with("tag", "%*%", "b")
                .with("name", "LIKE", "%bob%")
        );
    }

    #[test]
    fn test_callback_errors_propagate() {
        let config = config(&["name"])
            .with_query("name", |_: &mut WhereClauses, comparison, _| {
                Err(SearchError::UnsupportedOperator(comparison.to_string()))
            })
            .unwrap();

        let err = config
            .apply(WhereClauses::new(), Some(r#"[[0, "~", "x"]]"#))
            .unwrap_err();
        assert_eq!(err, SearchError::UnsupportedOperator("~".into()));
    }

    #[test]
    fn test_bad_payload_fails_before_any_clause() {
        let config = config(&["name"]);
        let err = config
            .apply(WhereClauses::new(), Some(r#"[[0, "=", "x"], [9, "=", "y"]]"#))
            .unwrap_err();
        assert_eq!(err, SearchError::IndexOutOfRange { index: 9, len: 1 });
    }
}
