use serde_json::Value;

use super::parser::{BinaryOp, Expr};
use crate::error::{FormulaError, FormulaResult};

/// Evaluate a formula against clause data
pub fn evaluate(expr: &Expr, data: &Value) -> FormulaResult<Value> {
    match expr {
        Expr::Number(n) => number(*n),
        Expr::String(s) => Ok(Value::String(s.clone())),
        Expr::Boolean(b) => Ok(Value::Bool(*b)),
        Expr::Variable(name) => data
            .get(name)
            .cloned()
            .ok_or_else(|| FormulaError::UnknownVariable { name: name.clone() }),
        Expr::Member { object, property } => {
            let object = evaluate(object, data)?;
            match object {
                Value::Object(map) => {
                    map.get(property)
                        .cloned()
                        .ok_or_else(|| FormulaError::UnknownVariable {
                            name: property.clone(),
                        })
                }
                other => Err(FormulaError::InvalidOperands {
                    operator: ".".to_string(),
                    details: format!("Cannot access property {} on {}", property, other),
                }),
            }
        }
        Expr::Negate(operand) => match evaluate(operand, data)?.as_f64() {
            Some(n) => number(-n),
            None => Err(FormulaError::InvalidOperands {
                operator: "-".to_string(),
                details: "Expected a number".to_string(),
            }),
        },
        Expr::Binary {
            left,
            operator,
            right,
        } => {
            let left_val = evaluate(left, data)?;
            let right_val = evaluate(right, data)?;
            binary(*operator, &left_val, &right_val)
        }
    }
}

fn binary(operator: BinaryOp, left: &Value, right: &Value) -> FormulaResult<Value> {
    match operator {
        BinaryOp::Equals => return Ok(Value::Bool(loosely_equal(left, right))),
        BinaryOp::NotEquals => return Ok(Value::Bool(!loosely_equal(left, right))),
        BinaryOp::Add => {
            if let (Value::String(a), Value::String(b)) = (left, right) {
                return Ok(Value::String(format!("{}{}", a, b)));
            }
        }
        _ => {}
    }

    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Err(FormulaError::InvalidOperands {
            operator: operator.symbol().to_string(),
            details: format!(
                "Expected number {} number, got {} {} {}",
                operator.symbol(),
                left,
                operator.symbol(),
                right
            ),
        });
    };

    match operator {
        BinaryOp::Add => number(a + b),
        BinaryOp::Subtract => number(a - b),
        BinaryOp::Multiply => number(a * b),
        BinaryOp::Divide => {
            if b != 0.0 {
                number(a / b)
            } else {
                Err(FormulaError::DivisionByZero)
            }
        }
        BinaryOp::LessThan => Ok(Value::Bool(a < b)),
        BinaryOp::LessThanOrEqual => Ok(Value::Bool(a <= b)),
        BinaryOp::GreaterThan => Ok(Value::Bool(a > b)),
        BinaryOp::GreaterThanOrEqual => Ok(Value::Bool(a >= b)),
        BinaryOp::Equals => Ok(Value::Bool(a == b)),
        BinaryOp::NotEquals => Ok(Value::Bool(a != b)),
    }
}

/// Numbers compare by value regardless of integer or float representation
fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

/// Integral results stay integers so they render without a fraction
fn number(n: f64) -> FormulaResult<Value> {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Ok(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| FormulaError::InvalidOperands {
            operator: "=".to_string(),
            details: format!("Result {} is not a finite number", n),
        })
}

/// Render a value the way it appears in clause text
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}
