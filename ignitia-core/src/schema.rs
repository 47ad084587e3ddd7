//! Declarative field-level shape contracts.
//!
//! A [`Schema`] describes a named shape: an ordered list of fields, each
//! with an explicit [`FieldType`], a human-readable description, and an
//! optionality flag. The same schema serves two purposes:
//!
//! - **Input validation**: [`Schema::validate`] checks untyped form/request
//!   input before it reaches a prompt, collecting every top-level failure
//!   in one pass with human-readable reasons.
//! - **Output verification**: flows re-validate generated output against
//!   their output schema, and [`Schema::response_format`] renders the
//!   schema as a JSON-schema generation constraint for the service.
//!
//! Field types are explicit tagged variants so validation and rendering
//! use exhaustive matching, never runtime type inspection.

use crate::error::{FieldViolation, ValidationError};
use serde_json::{json, Map, Value};

/// The type of a schema field.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// A string, optionally with a minimum length (measured after trimming)
    Str { min_len: Option<usize> },
    /// A number, optionally bounded on either side (inclusive)
    Number { min: Option<f64>, max: Option<f64> },
    /// A boolean
    Bool,
    /// A list of homogeneous items, optionally bounded in length
    List {
        item: Box<FieldType>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    /// A nested object described by its own schema
    Object(Schema),
}

impl FieldType {
    /// An unconstrained string.
    pub fn string() -> Self {
        FieldType::Str { min_len: None }
    }

    /// A string that must be at least `min_len` characters after trimming.
    pub fn string_min(min_len: usize) -> Self {
        FieldType::Str {
            min_len: Some(min_len),
        }
    }

    /// An unconstrained number.
    pub fn number() -> Self {
        FieldType::Number {
            min: None,
            max: None,
        }
    }

    /// A number bounded to `[min, max]` inclusive.
    pub fn number_range(min: f64, max: f64) -> Self {
        FieldType::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    /// A boolean.
    pub fn boolean() -> Self {
        FieldType::Bool
    }

    /// An unbounded list.
    pub fn list(item: FieldType) -> Self {
        FieldType::List {
            item: Box::new(item),
            min_items: None,
            max_items: None,
        }
    }

    /// A list with at least `min_items` elements.
    pub fn list_min(item: FieldType, min_items: usize) -> Self {
        FieldType::List {
            item: Box::new(item),
            min_items: Some(min_items),
            max_items: None,
        }
    }

    /// A list with between `min_items` and `max_items` elements inclusive.
    pub fn list_bounded(item: FieldType, min_items: usize, max_items: usize) -> Self {
        FieldType::List {
            item: Box::new(item),
            min_items: Some(min_items),
            max_items: Some(max_items),
        }
    }

    /// A nested object.
    pub fn object(schema: Schema) -> Self {
        FieldType::Object(schema)
    }
}

/// A single named field within a schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    ty: FieldType,
    description: String,
    optional: bool,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A named, immutable, ordered shape contract.
///
/// Built once at flow definition time with the builder-style [`Schema::field`]
/// and [`Schema::optional_field`] methods, then shared freely; validation
/// takes `&self` and has no side effects.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    /// Create an empty schema with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a required field.
    #[must_use]
    pub fn field(
        mut self,
        name: impl Into<String>,
        ty: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
            description: description.into(),
            optional: false,
        });
        self
    }

    /// Add an optional field.
    ///
    /// An optional field may be absent or `null`; when present it must
    /// still match its declared type.
    #[must_use]
    pub fn optional_field(
        mut self,
        name: impl Into<String>,
        ty: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
            description: description.into(),
            optional: true,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validate an untyped value against this schema.
    ///
    /// Every top-level field is checked in one pass, so the returned error
    /// enumerates all failing fields at once. Within a list-valued field,
    /// checking stops at the first failing element.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        self.check(value, "", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    fn check(&self, value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
        let Some(object) = value.as_object() else {
            violations.push(FieldViolation::new(path, "expected an object"));
            return;
        };

        for field in &self.fields {
            let field_path = join_path(path, &field.name);
            match object.get(&field.name) {
                None | Some(Value::Null) => {
                    if !field.optional {
                        violations.push(FieldViolation::new(field_path, "missing required field"));
                    }
                }
                Some(v) => check_type(&field.ty, v, &field_path, violations),
            }
        }
    }

    /// Render this schema as a JSON-schema generation constraint.
    ///
    /// Passed to the generation service as its `responseSchema` so that
    /// structured output is requested in the declared shape. Numeric and
    /// list bounds are included; string minimum lengths are an input-side
    /// rule and are not forwarded.
    pub fn response_format(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            let mut prop = type_format(&field.ty);
            if !field.description.is_empty() {
                prop["description"] = json!(field.description);
            }
            properties.insert(field.name.clone(), prop);
            if !field.optional {
                required.push(Value::String(field.name.clone()));
            }
        }
        json!({
            "type": "object",
            "properties": Value::Object(properties),
            "required": Value::Array(required),
        })
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn check_type(ty: &FieldType, value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    match ty {
        FieldType::Str { min_len } => match value.as_str() {
            Some(s) => {
                if let Some(min) = min_len {
                    if s.trim().chars().count() < *min {
                        violations.push(FieldViolation::new(
                            path,
                            format!("string shorter than minimum length {min}"),
                        ));
                    }
                }
            }
            None => violations.push(FieldViolation::new(path, "expected a string")),
        },
        FieldType::Number { min, max } => match value.as_f64() {
            Some(n) => {
                if let Some(min) = min {
                    if n < *min {
                        violations.push(FieldViolation::new(
                            path,
                            format!("number below minimum {min}"),
                        ));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        violations.push(FieldViolation::new(
                            path,
                            format!("number above maximum {max}"),
                        ));
                    }
                }
            }
            None => violations.push(FieldViolation::new(path, "expected a number")),
        },
        FieldType::Bool => {
            if !value.is_boolean() {
                violations.push(FieldViolation::new(path, "expected a boolean"));
            }
        }
        FieldType::List {
            item,
            min_items,
            max_items,
        } => match value.as_array() {
            Some(items) => {
                if let Some(min) = min_items {
                    if items.len() < *min {
                        violations.push(FieldViolation::new(
                            path,
                            format!("list shorter than minimum length {min}"),
                        ));
                    }
                }
                if let Some(max) = max_items {
                    if items.len() > *max {
                        violations.push(FieldViolation::new(
                            path,
                            format!("list longer than maximum length {max}"),
                        ));
                    }
                }
                // First failing element is enough; elements are homogeneous.
                for (index, element) in items.iter().enumerate() {
                    let before = violations.len();
                    check_type(item, element, &format!("{path}[{index}]"), violations);
                    if violations.len() > before {
                        break;
                    }
                }
            }
            None => violations.push(FieldViolation::new(path, "expected a list")),
        },
        FieldType::Object(schema) => schema.check(value, path, violations),
    }
}

fn type_format(ty: &FieldType) -> Value {
    match ty {
        FieldType::Str { .. } => json!({ "type": "string" }),
        FieldType::Number { min, max } => {
            let mut prop = json!({ "type": "number" });
            if let Some(min) = min {
                prop["minimum"] = json!(min);
            }
            if let Some(max) = max {
                prop["maximum"] = json!(max);
            }
            prop
        }
        FieldType::Bool => json!({ "type": "boolean" }),
        FieldType::List {
            item,
            min_items,
            max_items,
        } => {
            let mut prop = json!({ "type": "array", "items": type_format(item) });
            if let Some(min) = min_items {
                prop["minItems"] = json!(min);
            }
            if let Some(max) = max_items {
                prop["maxItems"] = json!(max);
            }
            prop
        }
        FieldType::Object(schema) => schema.response_format(),
    }
}
