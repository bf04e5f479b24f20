use crate::data::CanonicalResponse;
use serde_json::Value;
use std::{
    collections::{BTreeSet, HashSet},
    fmt::Display,
};

/// Field names skipped during comparison wherever they appear as an object key.
///
/// Matching is by the key that directly owns a value, never by its full path, so `id` hides
/// `data["id"]` just as well as `data["items"][3]["id"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    fields: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(fields: I) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> std::iter::FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResponseField {
    StatusCode,
    Message,
    Data,
}

impl ResponseField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseField::StatusCode => "statusCode",
            ResponseField::Message => "message",
            ResponseField::Data => "data",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueDifference {
    /// Location inside the compared field, e.g. `["items"][0]`. Empty for the field itself.
    pub path: String,
    pub expected: Option<Value>,
    pub actual: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDifference {
    pub field: ResponseField,
    pub differences: Vec<ValueDifference>,
}

impl Display for FieldDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} differs (-expected +actual):", self.field.as_str())?;

        for difference in &self.differences {
            write!(
                f,
                "\n  {}{}:\n    - {}\n    + {}",
                self.field.as_str(),
                difference.path,
                describe(difference.expected.as_ref()),
                describe(difference.actual.as_ref())
            )?;
        }

        Ok(())
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<missing>".into(),
    }
}

/// Compares every top-level field independently. An empty expected message means the message
/// isn't checked at all.
pub fn diff_responses(
    expected: &CanonicalResponse,
    actual: &CanonicalResponse,
    exclusions: &ExclusionSet,
) -> Vec<FieldDifference> {
    let mut fields = vec![(
        ResponseField::StatusCode,
        diff_values(
            &Value::from(expected.status_code),
            &Value::from(actual.status_code),
            exclusions,
        ),
    )];

    if !expected.message.is_empty() {
        fields.push((
            ResponseField::Message,
            diff_values(
                &Value::from(expected.message.as_str()),
                &Value::from(actual.message.as_str()),
                exclusions,
            ),
        ));
    }

    fields.push((
        ResponseField::Data,
        diff_values(&expected.data, &actual.data, exclusions),
    ));

    fields
        .into_iter()
        .filter(|(_, differences)| !differences.is_empty())
        .map(|(field, differences)| FieldDifference { field, differences })
        .collect()
}

pub fn diff_values(
    expected: &Value,
    actual: &Value,
    exclusions: &ExclusionSet,
) -> Vec<ValueDifference> {
    let mut differences = Vec::new();
    collect_differences(expected, actual, String::new(), exclusions, &mut differences);
    differences
}

fn collect_differences(
    expected: &Value,
    actual: &Value,
    path: String,
    exclusions: &ExclusionSet,
    differences: &mut Vec<ValueDifference>,
) {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            let keys: BTreeSet<&String> = expected_map.keys().chain(actual_map.keys()).collect();

            for key in keys.into_iter().filter(|key| !exclusions.contains(key)) {
                let child_path = format!("{}[{}]", path, Value::from(key.as_str()));
                compare_children(
                    expected_map.get(key),
                    actual_map.get(key),
                    child_path,
                    exclusions,
                    differences,
                );
            }
        }
        (Value::Array(expected_items), Value::Array(actual_items)) => {
            for index in 0..expected_items.len().max(actual_items.len()) {
                compare_children(
                    expected_items.get(index),
                    actual_items.get(index),
                    format!("{}[{}]", path, index),
                    exclusions,
                    differences,
                );
            }
        }
        _ => {
            if !scalars_equal(expected, actual) {
                differences.push(ValueDifference {
                    path,
                    expected: Some(expected.clone()),
                    actual: Some(actual.clone()),
                });
            }
        }
    }
}

fn compare_children(
    expected: Option<&Value>,
    actual: Option<&Value>,
    path: String,
    exclusions: &ExclusionSet,
    differences: &mut Vec<ValueDifference>,
) {
    match (expected, actual) {
        (Some(expected), Some(actual)) => {
            collect_differences(expected, actual, path, exclusions, differences)
        }
        (expected, actual) => differences.push(ValueDifference {
            path,
            expected: expected.cloned(),
            actual: actual.cloned(),
        }),
    }
}

// Numbers compare by value so that `1` and `1.0` agree.
fn scalars_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(lhs), Value::Number(rhs)) => lhs == rhs || lhs.as_f64() == rhs.as_f64(),
        _ => expected == actual,
    }
}
