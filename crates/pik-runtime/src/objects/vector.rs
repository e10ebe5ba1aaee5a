use std::cell::RefCell;
use std::rc::Rc;

use pik_core::{Call, Completion, EvalResult, EvaluationError, ObjectHandle, ScriptObject, Value};

pub struct Vector {
    name: String,
    components: RefCell<Vec<f64>>,
}

impl Vector {
    pub fn new(name: &str, components: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            components: RefCell::new(components),
        }
    }

    pub fn handle(self) -> ObjectHandle {
        Rc::new(self)
    }

    fn length(&self) -> f64 {
        self.components
            .borrow()
            .iter()
            .map(|component| component * component)
            .sum::<f64>()
            .sqrt()
    }

    fn same_dimension(&self, call: &Call<'_>, other: &[f64]) -> Result<(), EvaluationError> {
        let dimension = self.components.borrow().len();
        if other.len() == dimension {
            return Ok(());
        }
        Err(EvaluationError::invalid_argument(format!(
            "{}.{} expects {} component(s), got {}.",
            self.name,
            call.method,
            dimension,
            other.len()
        )))
    }
}

/// Flattens the arguments into components. An argument may be a single number,
/// a comma separated list or another vector.
fn components(call: &Call<'_>) -> Result<Vec<f64>, EvaluationError> {
    let mut components = Vec::new();
    for value in call.args {
        for part in value.to_text().split(',') {
            let component = Value::from(part).to_number().ok_or_else(|| {
                EvaluationError::invalid_argument(format!(
                    "{}.{} expects numeric components, got \"{}\".",
                    call.target.name(),
                    call.method,
                    part.trim()
                ))
            })?;
            components.push(component);
        }
    }
    Ok(components)
}

impl ScriptObject for Vector {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "VECTOR"
    }

    fn methods(&self) -> &'static [&'static str] {
        &["ASSIGN", "ADD", "MUL", "GET", "NORMALIZE", "LEN", "REFLECT"]
    }

    fn invoke(&self, call: &Call<'_>) -> EvalResult {
        match call.method {
            "ASSIGN" => {
                *self.components.borrow_mut() = components(call)?;
            }
            "ADD" => {
                let other = components(call)?;
                self.same_dimension(call, &other)?;
                for (component, delta) in self.components.borrow_mut().iter_mut().zip(other) {
                    *component += delta;
                }
            }
            "MUL" => {
                call.expect_arity(1, Some(1))?;
                let scalar = call.number(0)?;
                for component in self.components.borrow_mut().iter_mut() {
                    *component *= scalar;
                }
            }
            "GET" => {
                call.expect_arity(1, Some(1))?;
                let index = call.number(0)?;
                let component = if index >= 0.0 {
                    self.components.borrow().get(index as usize).copied()
                } else {
                    None
                };
                return Ok(component.map(Value::Number).unwrap_or_default().into());
            }
            "NORMALIZE" => {
                let length = self.length();
                if length == 0.0 {
                    return Err(EvaluationError::invalid_argument(format!(
                        "{}.NORMALIZE on a zero vector.",
                        self.name
                    )));
                }
                for component in self.components.borrow_mut().iter_mut() {
                    *component /= length;
                }
            }
            "LEN" => return Ok(Value::Number(self.length()).into()),
            "REFLECT" => {
                // incoming vector components followed by the normal's
                let all = components(call)?;
                let half = all.len() / 2;
                let (incoming, normal) = all.split_at(half);
                if all.len() % 2 != 0 {
                    return Err(EvaluationError::invalid_argument(format!(
                        "{}.REFLECT expects a vector and a normal of equal size.",
                        self.name
                    )));
                }
                self.same_dimension(call, incoming)?;
                let dot = incoming
                    .iter()
                    .zip(normal)
                    .map(|(value, normal)| value * normal)
                    .sum::<f64>();
                *self.components.borrow_mut() = incoming
                    .iter()
                    .zip(normal)
                    .map(|(value, normal)| value - 2.0 * dot * normal)
                    .collect();
            }
            _ => return Err(call.unknown_method()),
        }
        Ok(Completion::null())
    }

    fn value(&self) -> Value {
        let text = self
            .components
            .borrow()
            .iter()
            .map(|component| Value::Number(*component).to_text())
            .collect::<Vec<_>>()
            .join(",");
        Value::String(text)
    }
}
