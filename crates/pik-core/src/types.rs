use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn synthetic() -> Self {
        Self {
            start: SourceLocation { line: 1, column: 1 },
            end: SourceLocation { line: 1, column: 1 },
        }
    }
}

/// A parsed callback or loop body. Immutable once built; evaluating it never
/// changes it, so one instance is shared by every invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub statements: Vec<Expression>,
}

impl Script {
    pub fn new(statements: Vec<Expression>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expression {
    MethodCall {
        target: ObjectRef,
        method: String,
        args: Vec<Expression>,
    },
    Identifier {
        name: String,
    },
    Number {
        value: f64,
    },
    String {
        value: String,
    },
    Bool {
        value: bool,
    },
}

impl Expression {
    pub fn call(target: ObjectRef, method: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::MethodCall {
            target,
            method: method.into(),
            args,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    pub fn number(value: f64) -> Self {
        Self::Number { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            value: value.into(),
        }
    }

    pub fn bool(value: bool) -> Self {
        Self::Bool { value }
    }
}

/// The receiver of a method call. Never resolved at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ObjectRef {
    This,
    Name { name: String },
    Qualified { segments: Vec<String> },
}

impl ObjectRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    /// Scope key for named references; `None` for `THIS`.
    pub fn scope_key(&self) -> Option<String> {
        match self {
            Self::This => None,
            Self::Name { name } => Some(name.clone()),
            Self::Qualified { segments } => Some(segments.join(".")),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::This => f.write_str("THIS"),
            Self::Name { name } => f.write_str(name),
            Self::Qualified { segments } => f.write_str(&segments.join(".")),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodCall {
                target,
                method,
                args,
            } => {
                write!(f, "{}.{}(", target, method)?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Self::Identifier { name } => f.write_str(name),
            Self::Number { value } => write!(f, "{}", value),
            Self::String { value } => write!(f, "\"{}\"", value),
            Self::Bool { value: true } => f.write_str("TRUE"),
            Self::Bool { value: false } => f.write_str("FALSE"),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, statement) in self.statements.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_prints_canonical_script_text() {
        let script = Script::new(vec![
            Expression::call(
                ObjectRef::name("OBJ"),
                "METHOD",
                vec![
                    Expression::number(1.0),
                    Expression::string("a"),
                    Expression::bool(true),
                ],
            ),
            Expression::call(
                ObjectRef::This,
                "SET",
                vec![Expression::call(
                    ObjectRef::Qualified {
                        segments: vec!["SCENE".to_string(), "VAR".to_string()],
                    },
                    "GET",
                    vec![],
                )],
            ),
            Expression::identifier("$1"),
        ]);
        assert_eq!(
            script.to_string(),
            "OBJ.METHOD(1, \"a\", TRUE); THIS.SET(SCENE.VAR.GET()); $1"
        );
    }

    #[test]
    fn scope_key_joins_qualified_segments() {
        let qualified = ObjectRef::Qualified {
            segments: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(qualified.scope_key(), Some("A.B".to_string()));
        assert_eq!(ObjectRef::This.scope_key(), None);
    }

    #[test]
    fn script_serializes_with_kind_tags() {
        let script = Script::new(vec![Expression::call(
            ObjectRef::name("OBJ"),
            "RUN",
            vec![Expression::number(2.5)],
        )]);
        let json = serde_json::to_value(&script).expect("script should serialize");
        assert_eq!(json["statements"][0]["kind"], "methodCall");
        assert_eq!(json["statements"][0]["target"]["kind"], "name");
        assert_eq!(json["statements"][0]["args"][0]["value"], 2.5);
    }
}
