use std::sync::OnceLock;

use regex::Regex;

use crate::error::DefinitionError;

/// One `OBJECT=` block as written, before any field is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDefinition {
    pub name: String,
    pub line: usize,
    pub fields: Vec<RawField>,
}

/// `NAME:FIELD=VALUE` or `NAME:FIELD^KEY=VALUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: String,
    pub key: Option<String>,
    pub value: String,
    pub line: usize,
}

impl RawDefinition {
    /// Last assignment of a non-parametrized field wins.
    pub fn field(&self, name: &str) -> Option<&RawField> {
        self.fields
            .iter()
            .rev()
            .find(|field| field.name == name && field.key.is_none())
    }

    pub fn entries<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawField> + 'a {
        self.fields.iter().filter(move |field| field.name == name)
    }
}

fn object_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^OBJECT\s*=\s*([$A-Za-z_][$0-9A-Za-z_.]*)\s*$")
            .expect("object line regex must compile")
    })
}

fn field_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^([$A-Za-z_][$0-9A-Za-z_.]*)\s*:\s*([A-Za-z_][0-9A-Za-z_]*)(?:\^([^=]*))?\s*=(.*)$")
            .expect("field line regex must compile")
    })
}

/// Splits definition text into object blocks in file order.
pub fn parse_definitions(text: &str) -> Result<Vec<RawDefinition>, DefinitionError> {
    let mut definitions: Vec<RawDefinition> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(captures) = object_line_regex().captures(trimmed) {
            let name = captures[1].to_string();
            if definitions.iter().any(|definition| definition.name == name) {
                return Err(DefinitionError::DuplicateObject { line, object: name });
            }
            definitions.push(RawDefinition {
                name,
                line,
                fields: Vec::new(),
            });
            continue;
        }

        let Some(captures) = field_line_regex().captures(trimmed) else {
            return Err(DefinitionError::MalformedLine {
                line,
                text: trimmed.to_string(),
            });
        };
        let object = &captures[1];
        let Some(definition) = definitions
            .iter_mut()
            .find(|definition| definition.name == object)
        else {
            return Err(DefinitionError::UndeclaredObject {
                line,
                object: object.to_string(),
            });
        };
        definition.fields.push(RawField {
            name: captures[2].to_ascii_uppercase(),
            key: captures.get(3).map(|key| key.as_str().trim().to_string()),
            value: captures[4].trim().to_string(),
            line,
        });
    }

    Ok(definitions)
}
