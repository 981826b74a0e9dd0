use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;

use crate::schema::ValidationIssue;

/// JSON Schema for a widget kind's properties, compiled on first use.
pub struct PropsSchema {
    schema: Value,
    compiled: OnceLock<Option<jsonschema::Validator>>,
}

impl fmt::Debug for PropsSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropsSchema")
            .field("schema", &self.schema)
            .finish()
    }
}

impl PropsSchema {
    pub fn new(schema: Value) -> Self {
        Self {
            schema,
            compiled: OnceLock::new(),
        }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn validator(&self) -> Option<&jsonschema::Validator> {
        self.compiled
            .get_or_init(|| match jsonschema::validator_for(&self.schema) {
                Ok(validator) => Some(validator),
                Err(e) => {
                    tracing::error!(error = %e, "widget props schema does not compile");
                    None
                }
            })
            .as_ref()
    }

    /// Checks `value` against the schema. Absent properties validate as `null`.
    pub fn parse(&self, value: Option<&Value>) -> Result<Value, Vec<ValidationIssue>> {
        let Some(validator) = self.validator() else {
            return Err(vec![ValidationIssue::new("", "schema unavailable")]);
        };

        let value = value.cloned().unwrap_or(Value::Null);
        let issues: Vec<ValidationIssue> = validator
            .iter_errors(&value)
            .map(|e| ValidationIssue::new(e.instance_path.to_string(), e.to_string()))
            .collect();
        if issues.is_empty() {
            Ok(value)
        } else {
            Err(issues)
        }
    }
}

/// Property contract of a widget kind: schema plus the value used for new widgets and as
/// the substitute for properties that fail the schema.
#[derive(Debug)]
pub struct PropsSpec {
    pub schema: PropsSchema,
    pub default_value: Value,
}

impl PropsSpec {
    pub fn new(schema: Value, default_value: Value) -> Self {
        Self {
            schema: PropsSchema::new(schema),
            default_value,
        }
    }
}
