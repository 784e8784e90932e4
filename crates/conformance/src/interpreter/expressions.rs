//! Expression evaluation.

use loopdown_parser::parser::NodeIndex;
use loopdown_parser::parser::syntax_kind_ext::*;
use loopdown_parser::syntax::transform_utils::skip_parentheses;
use loopdown_scanner::SyntaxKind;

use super::environment::AssignError;
use super::value::{Value, format_number};
use super::{EvalResult, Interpreter, InterpreterError};

/// An assignable location.
enum Reference {
    Binding(String),
    Property { object: Value, key: String },
}

impl<'a> Interpreter<'a> {
    pub(crate) fn eval(&mut self, idx: NodeIndex) -> EvalResult<Value> {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return Ok(Value::Undefined);
        };

        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => {
                let name = self.identifier_name(idx)?;
                match self.env.lookup(&name) {
                    Some(value) => Ok(value),
                    None => self.throw_error("ReferenceError", format!("{name} is not defined")),
                }
            }
            k if k == SyntaxKind::NumericLiteral as u16 => Ok(Value::Number(
                arena.get_literal(node).and_then(|l| l.value).unwrap_or(f64::NAN),
            )),
            k if k == SyntaxKind::StringLiteral as u16 => Ok(Value::string(
                arena.get_literal(node).map_or("", |l| l.text.as_str()),
            )),
            k if k == SyntaxKind::TrueKeyword as u16 => Ok(Value::Bool(true)),
            k if k == SyntaxKind::FalseKeyword as u16 => Ok(Value::Bool(false)),
            k if k == SyntaxKind::NullKeyword as u16 => Ok(Value::Null),
            k if k == SyntaxKind::ThisKeyword as u16 => Ok(self.this_value.clone()),
            ARRAY_LITERAL_EXPRESSION => {
                let elements = arena
                    .get_literal_expr(node)
                    .map(|l| l.elements.nodes.clone())
                    .unwrap_or_default();
                let items = self.eval_list(&elements)?;
                Ok(Value::array(items))
            }
            OBJECT_LITERAL_EXPRESSION => self.eval_object_literal(idx),
            FUNCTION_EXPRESSION | ARROW_FUNCTION => Ok(self.make_closure(idx)),
            PROPERTY_ACCESS_EXPRESSION | ELEMENT_ACCESS_EXPRESSION => {
                let (object, key) = self.eval_member(idx)?;
                self.get_property(&object, &key)
            }
            CALL_EXPRESSION => self.eval_call(idx),
            NEW_EXPRESSION => {
                let Some(call) = arena.get_call_expr(node) else {
                    return Ok(Value::Undefined);
                };
                let callee = self.eval(call.expression)?;
                let args = match &call.arguments {
                    Some(list) => self.eval_list(&list.nodes)?,
                    None => Vec::new(),
                };
                self.construct(&callee, args)
            }
            PARENTHESIZED_EXPRESSION => match arena.get_parenthesized(node) {
                Some(paren) => self.eval(paren.expression),
                None => Ok(Value::Undefined),
            },
            PREFIX_UNARY_EXPRESSION => self.eval_prefix_unary(idx),
            POSTFIX_UNARY_EXPRESSION => {
                let Some(unary) = arena.get_unary_expr(node) else {
                    return Ok(Value::Undefined);
                };
                let delta = if unary.operator == SyntaxKind::PlusPlusToken as u16 {
                    1.0
                } else {
                    -1.0
                };
                let reference = self.eval_reference(unary.operand)?;
                let old = self.get_reference(&reference)?.to_number();
                self.put_reference(&reference, Value::Number(old + delta))?;
                Ok(Value::Number(old))
            }
            BINARY_EXPRESSION => self.eval_binary(idx),
            CONDITIONAL_EXPRESSION => {
                let Some(cond) = arena.get_conditional_expr(node) else {
                    return Ok(Value::Undefined);
                };
                if self.eval(cond.condition)?.is_truthy() {
                    self.eval(cond.when_true)
                } else {
                    self.eval(cond.when_false)
                }
            }
            _ => Err(InterpreterError::Unsupported("expression kind").into()),
        }
    }

    fn eval_list(&mut self, nodes: &[NodeIndex]) -> EvalResult<Vec<Value>> {
        nodes.iter().map(|&n| self.eval(n)).collect()
    }

    fn eval_object_literal(&mut self, idx: NodeIndex) -> EvalResult<Value> {
        let arena = self.arena;
        let elements = arena
            .get(idx)
            .and_then(|n| arena.get_literal_expr(n))
            .map(|l| l.elements.nodes.clone())
            .unwrap_or_default();
        let mut properties = indexmap::IndexMap::new();
        for element in elements {
            let Some(property) = arena
                .get(element)
                .and_then(|n| arena.get_property_assignment(n))
            else {
                continue;
            };
            let key = self.property_name(property.name)?;
            let value = if property.initializer.is_some() {
                self.eval(property.initializer)?
            } else {
                self.eval(property.name)?
            };
            properties.insert(key, value);
        }
        Ok(Value::plain(properties))
    }

    /// Key text of an identifier, string or numeric property name.
    fn property_name(&self, idx: NodeIndex) -> EvalResult<String> {
        let arena = self.arena;
        let node = arena
            .get(idx)
            .ok_or(InterpreterError::Unsupported("missing property name"))?;
        if let Some(ident) = arena.get_identifier(node) {
            return Ok(ident.escaped_text.clone());
        }
        if let Some(literal) = arena.get_literal(node) {
            return Ok(match literal.value {
                Some(n) => format_number(n),
                None => literal.text.clone(),
            });
        }
        Err(InterpreterError::Unsupported("computed property name").into())
    }

    /// Evaluate the object and key of a property or element access.
    fn eval_member(&mut self, idx: NodeIndex) -> EvalResult<(Value, String)> {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return Err(InterpreterError::Unsupported("missing member").into());
        };
        let Some(access) = arena.get_access_expr(node) else {
            return Err(InterpreterError::Unsupported("member expression").into());
        };
        let object = self.eval(access.expression)?;
        let key = if node.kind == PROPERTY_ACCESS_EXPRESSION {
            self.identifier_name(access.name_or_argument)?
        } else {
            self.eval(access.name_or_argument)?.to_display_string()
        };
        Ok((object, key))
    }

    fn eval_call(&mut self, idx: NodeIndex) -> EvalResult<Value> {
        let arena = self.arena;
        let Some(call) = arena.get(idx).and_then(|n| arena.get_call_expr(n)) else {
            return Ok(Value::Undefined);
        };
        let callee_idx = skip_parentheses(arena, call.expression);
        let is_member = arena.get(callee_idx).is_some_and(|n| {
            n.kind == PROPERTY_ACCESS_EXPRESSION || n.kind == ELEMENT_ACCESS_EXPRESSION
        });

        let (callee, this) = if is_member {
            let (object, key) = self.eval_member(callee_idx)?;
            let method = self.get_property(&object, &key)?;
            if method.as_callable().is_none() {
                return self.throw_error(
                    "TypeError",
                    format!("{}.{key} is not a function", object.type_of()),
                );
            }
            (method, object)
        } else {
            (self.eval(call.expression)?, Value::Undefined)
        };

        let args = match &call.arguments {
            Some(list) => self.eval_list(&list.nodes)?,
            None => Vec::new(),
        };
        self.call_function(&callee, this, args)
    }

    fn eval_prefix_unary(&mut self, idx: NodeIndex) -> EvalResult<Value> {
        let arena = self.arena;
        let Some(unary) = arena.get(idx).and_then(|n| arena.get_unary_expr(n)) else {
            return Ok(Value::Undefined);
        };
        let operator = SyntaxKind::try_from_u16(unary.operator).unwrap_or(SyntaxKind::Unknown);

        match operator {
            SyntaxKind::TypeOfKeyword => {
                let operand = skip_parentheses(arena, unary.operand);
                let is_identifier = arena
                    .get(operand)
                    .is_some_and(|n| n.kind == SyntaxKind::Identifier as u16);
                if is_identifier {
                    let name = self.identifier_name(operand)?;
                    if self.env.lookup(&name).is_none() {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.eval(unary.operand)?;
                Ok(Value::string(value.type_of()))
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                let delta = if operator == SyntaxKind::PlusPlusToken { 1.0 } else { -1.0 };
                let reference = self.eval_reference(unary.operand)?;
                let value = Value::Number(self.get_reference(&reference)?.to_number() + delta);
                self.put_reference(&reference, value.clone())?;
                Ok(value)
            }
            _ => {
                let value = self.eval(unary.operand)?;
                Ok(match operator {
                    SyntaxKind::ExclamationToken => Value::Bool(!value.is_truthy()),
                    SyntaxKind::MinusToken => Value::Number(-value.to_number()),
                    SyntaxKind::PlusToken => Value::Number(value.to_number()),
                    SyntaxKind::TildeToken => Value::Number(f64::from(!value.to_int32())),
                    SyntaxKind::VoidKeyword => Value::Undefined,
                    _ => return Err(InterpreterError::Unsupported("prefix operator").into()),
                })
            }
        }
    }

    fn eval_binary(&mut self, idx: NodeIndex) -> EvalResult<Value> {
        let arena = self.arena;
        let Some(binary) = arena.get(idx).and_then(|n| arena.get_binary_expr(n)) else {
            return Ok(Value::Undefined);
        };
        let operator =
            SyntaxKind::try_from_u16(binary.operator_token).unwrap_or(SyntaxKind::Unknown);

        match operator {
            SyntaxKind::AmpersandAmpersandToken => {
                let left = self.eval(binary.left)?;
                if left.is_truthy() { self.eval(binary.right) } else { Ok(left) }
            }
            SyntaxKind::BarBarToken => {
                let left = self.eval(binary.left)?;
                if left.is_truthy() { Ok(left) } else { self.eval(binary.right) }
            }
            SyntaxKind::QuestionQuestionToken => {
                let left = self.eval(binary.left)?;
                if left.is_nullish() { self.eval(binary.right) } else { Ok(left) }
            }
            SyntaxKind::CommaToken => {
                self.eval(binary.left)?;
                self.eval(binary.right)
            }
            SyntaxKind::EqualsToken => {
                let reference = self.eval_reference(binary.left)?;
                let value = self.eval(binary.right)?;
                self.put_reference(&reference, value.clone())?;
                Ok(value)
            }
            op if op.is_assignment_operator() => {
                let reference = self.eval_reference(binary.left)?;
                let current = self.get_reference(&reference)?;
                let right = self.eval(binary.right)?;
                let value = self.apply_binary(compound_base(op), &current, &right)?;
                self.put_reference(&reference, value.clone())?;
                Ok(value)
            }
            op => {
                let left = self.eval(binary.left)?;
                let right = self.eval(binary.right)?;
                self.apply_binary(op, &left, &right)
            }
        }
    }

    /// Non-short-circuiting binary operators.
    fn apply_binary(&self, op: SyntaxKind, left: &Value, right: &Value) -> EvalResult<Value> {
        use SyntaxKind::*;

        let number = |f: fn(f64, f64) -> f64| -> EvalResult<Value> {
            Ok(Value::Number(f(left.to_number(), right.to_number())))
        };
        let int32 = |f: fn(i32, i32) -> i32| -> EvalResult<Value> {
            Ok(Value::Number(f64::from(f(left.to_int32(), right.to_int32()))))
        };

        match op {
            PlusToken => {
                let is_stringish =
                    |v: &Value| matches!(v, Value::String(_) | Value::Object(_));
                if is_stringish(left) || is_stringish(right) {
                    Ok(Value::string(format!(
                        "{}{}",
                        left.to_display_string(),
                        right.to_display_string()
                    )))
                } else {
                    number(|a, b| a + b)
                }
            }
            MinusToken => number(|a, b| a - b),
            AsteriskToken => number(|a, b| a * b),
            SlashToken => number(|a, b| a / b),
            PercentToken => number(|a, b| a % b),
            AsteriskAsteriskToken => number(f64::powf),
            LessThanToken => Ok(compare(left, right, |o| o.is_lt())),
            GreaterThanToken => Ok(compare(left, right, |o| o.is_gt())),
            LessThanEqualsToken => Ok(compare(left, right, |o| o.is_le())),
            GreaterThanEqualsToken => Ok(compare(left, right, |o| o.is_ge())),
            EqualsEqualsEqualsToken => Ok(Value::Bool(left.strict_equals(right))),
            ExclamationEqualsEqualsToken => Ok(Value::Bool(!left.strict_equals(right))),
            EqualsEqualsToken => Ok(Value::Bool(left.loose_equals(right))),
            ExclamationEqualsToken => Ok(Value::Bool(!left.loose_equals(right))),
            AmpersandToken => int32(|a, b| a & b),
            BarToken => int32(|a, b| a | b),
            CaretToken => int32(|a, b| a ^ b),
            LessThanLessThanToken => int32(|a, b| a.wrapping_shl(b as u32 & 31)),
            GreaterThanGreaterThanToken => int32(|a, b| a.wrapping_shr(b as u32 & 31)),
            GreaterThanGreaterThanGreaterThanToken => {
                let shifted = (left.to_int32() as u32) >> (right.to_int32() as u32 & 31);
                Ok(Value::Number(f64::from(shifted)))
            }
            _ => Err(InterpreterError::Unsupported("binary operator").into()),
        }
    }

    fn eval_reference(&mut self, idx: NodeIndex) -> EvalResult<Reference> {
        let target = skip_parentheses(self.arena, idx);
        let Some(node) = self.arena.get(target) else {
            return Err(InterpreterError::Unsupported("missing assignment target").into());
        };
        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => {
                Ok(Reference::Binding(self.identifier_name(target)?))
            }
            PROPERTY_ACCESS_EXPRESSION | ELEMENT_ACCESS_EXPRESSION => {
                let (object, key) = self.eval_member(target)?;
                Ok(Reference::Property { object, key })
            }
            _ => Err(InterpreterError::Unsupported("assignment target").into()),
        }
    }

    fn get_reference(&mut self, reference: &Reference) -> EvalResult<Value> {
        match reference {
            Reference::Binding(name) => match self.env.lookup(name) {
                Some(value) => Ok(value),
                None => self.throw_error("ReferenceError", format!("{name} is not defined")),
            },
            Reference::Property { object, key } => self.get_property(object, key),
        }
    }

    fn put_reference(&mut self, reference: &Reference, value: Value) -> EvalResult<()> {
        match reference {
            Reference::Binding(name) => match self.env.assign(name, value.clone()) {
                Ok(true) => Ok(()),
                // Sloppy-mode implicit global.
                Ok(false) => {
                    self.env.root().declare(name, value, true);
                    Ok(())
                }
                Err(AssignError::ConstAssignment) => {
                    self.throw_error("TypeError", "Assignment to constant variable.")
                }
            },
            Reference::Property { object, key } => self.set_property(object, key, value),
        }
    }
}

/// `+=` -> `+`, etc.
fn compound_base(op: SyntaxKind) -> SyntaxKind {
    match op {
        SyntaxKind::PlusEqualsToken => SyntaxKind::PlusToken,
        SyntaxKind::MinusEqualsToken => SyntaxKind::MinusToken,
        SyntaxKind::AsteriskEqualsToken => SyntaxKind::AsteriskToken,
        SyntaxKind::SlashEqualsToken => SyntaxKind::SlashToken,
        SyntaxKind::PercentEqualsToken => SyntaxKind::PercentToken,
        other => other,
    }
}

/// Relational comparison: strings compare lexically, everything else
/// numerically (`NaN` compares false).
fn compare(left: &Value, right: &Value, test: fn(std::cmp::Ordering) -> bool) -> Value {
    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    Value::Bool(ordering.is_some_and(test))
}
