use std::rc::Rc;
use std::sync::OnceLock;

use pik_core::{Callback, CallbackDefinition, Script, ScriptError, Value};
use pik_parser::{evaluate_constant_args, parse_script};
use regex::Regex;

use crate::error::DefinitionError;
use crate::source_parse::{RawDefinition, RawField};

fn behaviour_reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^([$A-Za-z_][$0-9A-Za-z_.]*)\s*(?:\((.*)\))?$")
            .expect("behaviour reference regex must compile")
    })
}

/// Reads the fields of one definition, tagging every failure with the object,
/// field and line it came from.
pub(crate) struct FieldReader<'a> {
    definition: &'a RawDefinition,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(definition: &'a RawDefinition) -> Self {
        Self { definition }
    }

    pub(crate) fn name(&self) -> &'a str {
        &self.definition.name
    }

    /// Rejects fields the kind does not know and keys on fields that are not
    /// callback slots.
    pub(crate) fn expect_fields(
        &self,
        plain: &[&str],
        callbacks: &[&str],
    ) -> Result<(), DefinitionError> {
        for field in &self.definition.fields {
            let name = field.name.as_str();
            if name == "TYPE" && field.key.is_none() {
                continue;
            }
            if callbacks.contains(&name) {
                continue;
            }
            if plain.contains(&name) {
                if field.key.is_some() {
                    return Err(self.invalid(field, "does not take a parameter key"));
                }
                continue;
            }
            return Err(self.invalid(field, "is not a known field"));
        }
        Ok(())
    }

    pub(crate) fn text(&self, name: &str) -> Option<&'a str> {
        self.definition.field(name).map(|field| field.value.as_str())
    }

    pub(crate) fn required(&self, name: &str) -> Result<&'a RawField, DefinitionError> {
        self.definition
            .field(name)
            .ok_or_else(|| DefinitionError::MissingField {
                line: self.definition.line,
                object: self.definition.name.clone(),
                field: name.to_string(),
            })
    }

    pub(crate) fn integer(&self, name: &str, default: i64) -> Result<i64, DefinitionError> {
        let Some(field) = self.definition.field(name) else {
            return Ok(default);
        };
        field
            .value
            .parse::<i64>()
            .map_err(|_| self.invalid(field, "must be an integer"))
    }

    pub(crate) fn number(&self, name: &str, default: f64) -> Result<f64, DefinitionError> {
        let Some(field) = self.definition.field(name) else {
            return Ok(default);
        };
        Value::from(field.value.as_str())
            .to_number()
            .ok_or_else(|| self.invalid(field, "must be a number"))
    }

    pub(crate) fn boolean(&self, name: &str, default: bool) -> Result<bool, DefinitionError> {
        let Some(field) = self.definition.field(name) else {
            return Ok(default);
        };
        Value::from(field.value.as_str())
            .to_bool()
            .ok_or_else(|| self.invalid(field, "must be TRUE or FALSE"))
    }

    pub(crate) fn numbers(&self, name: &str) -> Result<Vec<f64>, DefinitionError> {
        let Some(field) = self.definition.field(name) else {
            return Ok(Vec::new());
        };
        if field.value.is_empty() {
            return Ok(Vec::new());
        }
        field
            .value
            .split(',')
            .map(|part| {
                Value::from(part)
                    .to_number()
                    .ok_or_else(|| self.invalid(field, "must be comma separated numbers"))
            })
            .collect()
    }

    /// A single constant, read the way definition-time arguments are.
    pub(crate) fn constant(&self, field: &RawField) -> Result<Value, DefinitionError> {
        let mut values =
            evaluate_constant_args(&field.value).map_err(|error| self.script_error(field, error))?;
        if values.len() != 1 {
            return Err(self.invalid(field, "must be a single constant"));
        }
        Ok(values.remove(0))
    }

    /// Code written as `{...}`; the braces are optional.
    pub(crate) fn script(&self, field: &RawField) -> Result<Rc<Script>, DefinitionError> {
        let source = strip_braces(&field.value).unwrap_or(&field.value);
        parse_script(source)
            .map(Rc::new)
            .map_err(|error| self.script_error(field, error.into()))
    }

    /// Collects every entry of a callback slot: the plain field becomes the
    /// nonparametrized entry, `FIELD^KEY` fields become parametrized ones.
    pub(crate) fn callbacks(&self, name: &str) -> Result<CallbackDefinition, DefinitionError> {
        let mut definition = CallbackDefinition::none();
        for field in self.definition.entries(name) {
            let callback = self.callback(field)?;
            definition = match &field.key {
                None => definition.with_nonparametrized(callback),
                Some(key) => definition.with_parametrized(parameter_key(key), callback),
            };
        }
        Ok(definition)
    }

    fn callback(&self, field: &RawField) -> Result<Callback, DefinitionError> {
        if strip_braces(&field.value).is_some() {
            return Ok(Callback::Inline(self.script(field)?));
        }
        let Some(captures) = behaviour_reference_regex().captures(&field.value) else {
            return Err(self.invalid(field, "must be {code} or a behaviour reference"));
        };
        let args = match captures.get(2) {
            Some(args) => evaluate_constant_args(args.as_str())
                .map_err(|error| self.script_error(field, error))?,
            None => Vec::new(),
        };
        Ok(Callback::Behaviour {
            name: captures[1].to_string(),
            args,
        })
    }

    pub(crate) fn invalid(&self, field: &RawField, message: &str) -> DefinitionError {
        DefinitionError::InvalidField {
            line: field.line,
            object: self.definition.name.clone(),
            field: field_label(field),
            message: message.to_string(),
        }
    }

    fn script_error(&self, field: &RawField, source: ScriptError) -> DefinitionError {
        DefinitionError::Script {
            line: field.line,
            object: self.definition.name.clone(),
            field: field_label(field),
            source,
        }
    }
}

fn strip_braces(value: &str) -> Option<&str> {
    value.strip_prefix('{')?.strip_suffix('}')
}

/// Numeric keys are normalized so `^3` and `^3.0` address the same entry.
fn parameter_key(key: &str) -> Value {
    match Value::from(key).to_number() {
        Some(number) => Value::Number(number),
        None => Value::from(key),
    }
}

fn field_label(field: &RawField) -> String {
    match &field.key {
        Some(key) => format!("{}^{}", field.name, key),
        None => field.name.clone(),
    }
}
