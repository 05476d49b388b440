//! Generator Port - text and structured generation for conversation nodes.
//!
//! Nodes never talk to a provider directly. They ask a [`Generator`] for
//! either free text or a JSON object matching an [`OutputSchema`], and
//! fall back to deterministic behaviour when it fails.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::AIError;

/// Port for generation used by conversation nodes.
///
/// Implementations own their retry policy; callers never retry.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Free-text generation.
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String, AIError>;

    /// JSON generation conforming to `schema`.
    ///
    /// The returned value is an object containing every required field.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &OutputSchema,
        system_prompt: Option<&str>,
    ) -> Result<Value, AIError>;
}

/// Typed check run on a value after its required fields are present.
pub type ValueValidator = fn(&Value) -> Result<(), String>;

/// JSON schema a structured generation must satisfy.
#[derive(Clone)]
pub struct OutputSchema {
    pub name: &'static str,
    /// JSON schema document shown to the model.
    pub schema: Value,
    validator: Option<ValueValidator>,
}

impl OutputSchema {
    pub fn new(name: &'static str, schema: Value) -> Self {
        Self {
            name,
            schema,
            validator: None,
        }
    }

    /// Also requires values to deserialize into `T`.
    pub fn conforming_to<T: DeserializeOwned>(mut self) -> Self {
        self.validator = Some(deserializes_as::<T>);
        self
    }

    /// Top-level fields listed under the schema's `required` key.
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Checks that `value` is an object with every required field and
    /// passes the typed validator, if any.
    pub fn check(&self, value: &Value) -> Result<(), AIError> {
        let object = value
            .as_object()
            .ok_or_else(|| AIError::parse(format!("{}: expected a JSON object", self.name)))?;
        let missing: Vec<&str> = self
            .required_fields()
            .into_iter()
            .filter(|field| !object.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(AIError::parse(format!(
                "{}: missing required fields: {}",
                self.name,
                missing.join(", ")
            )));
        }
        match self.validator {
            Some(validate) => validate(value).map_err(|e| AIError::parse(format!("{}: {}", self.name, e))),
            None => Ok(()),
        }
    }

    /// Pretty-printed schema for embedding in a prompt.
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string_pretty(&self.schema).unwrap_or_else(|_| self.schema.to_string())
    }
}

fn deserializes_as<T: DeserializeOwned>(value: &Value) -> Result<(), String> {
    serde_json::from_value::<T>(value.clone())
        .map(drop)
        .map_err(|e| e.to_string())
}

impl fmt::Debug for OutputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSchema")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("typed", &self.validator.is_some())
            .finish()
    }
}

/// A type that can be produced by structured generation.
pub trait StructuredResponse: DeserializeOwned + Send {
    fn schema() -> OutputSchema;
}

/// Structured generation deserialized into `T`.
///
/// The schema carries a `T` validator, so a generator that checks values
/// before accepting them retries type mismatches like any malformed reply.
pub async fn generate_as<T: StructuredResponse>(
    generator: &dyn Generator,
    prompt: &str,
    system_prompt: Option<&str>,
) -> Result<T, AIError> {
    let schema = T::schema().conforming_to::<T>();
    let value = generator
        .generate_structured(prompt, &schema, system_prompt)
        .await?;
    serde_json::from_value(value).map_err(|e| AIError::parse(format!("{}: {}", schema.name, e)))
}
