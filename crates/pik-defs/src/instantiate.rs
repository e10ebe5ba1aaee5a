use pik_core::ObjectHandle;
use pik_runtime::objects::{Behaviour, Condition, Integer, Operator, Timer, Vector};

use crate::error::DefinitionError;
use crate::fields::FieldReader;
use crate::source_parse::RawDefinition;

pub fn instantiate(definition: &RawDefinition) -> Result<ObjectHandle, DefinitionError> {
    let reader = FieldReader::new(definition);
    let kind_field = reader.required("TYPE")?;
    let kind = kind_field.value.to_ascii_uppercase();
    match kind.as_str() {
        "INTEGER" => integer(&reader),
        "BEHAVIOUR" => behaviour(&reader),
        "CONDITION" => condition(&reader),
        "TIMER" => timer(&reader),
        "VECTOR" => vector(&reader),
        _ => Err(DefinitionError::UnknownType {
            line: kind_field.line,
            object: definition.name.clone(),
            kind: kind_field.value.clone(),
        }),
    }
}

fn integer(reader: &FieldReader<'_>) -> Result<ObjectHandle, DefinitionError> {
    reader.expect_fields(&["VALUE"], &["ONCHANGED"])?;
    Ok(Integer::new(reader.name(), reader.integer("VALUE", 0)?)
        .with_on_changed(reader.callbacks("ONCHANGED")?)
        .handle())
}

fn behaviour(reader: &FieldReader<'_>) -> Result<ObjectHandle, DefinitionError> {
    reader.expect_fields(&["CODE", "CONDITION"], &[])?;
    let code = reader.script(reader.required("CODE")?)?;
    let mut behaviour = Behaviour::new(reader.name(), code);
    if let Some(condition) = reader.text("CONDITION").filter(|name| !name.is_empty()) {
        behaviour = behaviour.with_condition(condition);
    }
    Ok(behaviour.handle())
}

fn condition(reader: &FieldReader<'_>) -> Result<ObjectHandle, DefinitionError> {
    reader.expect_fields(
        &["OPERAND1", "OPERATOR", "OPERAND2"],
        &["ONRUNTIMESUCCESS", "ONRUNTIMEFAILED"],
    )?;
    let operator_field = reader.required("OPERATOR")?;
    let operator = operator_field
        .value
        .parse::<Operator>()
        .map_err(|error| reader.invalid(operator_field, &error.message))?;
    let operand1 = reader.constant(reader.required("OPERAND1")?)?;
    let operand2 = reader.constant(reader.required("OPERAND2")?)?;
    Ok(Condition::new(reader.name(), operand1, operator, operand2)
        .with_on_success(reader.callbacks("ONRUNTIMESUCCESS")?)
        .with_on_failed(reader.callbacks("ONRUNTIMEFAILED")?)
        .handle())
}

fn timer(reader: &FieldReader<'_>) -> Result<ObjectHandle, DefinitionError> {
    reader.expect_fields(&["ELAPSE", "ENABLED"], &["ONTICK", "ONINIT"])?;
    Ok(Timer::new(reader.name(), reader.number("ELAPSE", 0.0)?)
        .with_enabled(reader.boolean("ENABLED", true)?)
        .with_on_tick(reader.callbacks("ONTICK")?)
        .with_on_init(reader.callbacks("ONINIT")?)
        .handle())
}

fn vector(reader: &FieldReader<'_>) -> Result<ObjectHandle, DefinitionError> {
    reader.expect_fields(&["VALUE"], &[])?;
    Ok(Vector::new(reader.name(), reader.numbers("VALUE")?).handle())
}
