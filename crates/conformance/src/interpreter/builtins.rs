//! Globals, property access and the array builtins.

use super::environment::Environment;
use super::value::{NativeFn, ObjRef, ObjectClass, Value, array_index};
use super::{EvalResult, Interpreter};

pub(super) fn install_globals(env: &Environment) {
    env.declare("undefined", Value::Undefined, false);
    env.declare("NaN", Value::Number(f64::NAN), false);
    env.declare("Infinity", Value::Number(f64::INFINITY), false);
    env.declare("log", Value::native("log", native_log), true);
    env.declare("String", Value::native("String", native_string), true);
    env.declare("Number", Value::native("Number", native_number), true);
    env.declare("Error", Value::native("Error", error_constructor::<0>), true);
    env.declare("TypeError", Value::native("TypeError", error_constructor::<1>), true);
    env.declare("RangeError", Value::native("RangeError", error_constructor::<2>), true);
}

const ERROR_NAMES: [&str; 3] = ["Error", "TypeError", "RangeError"];

fn error_constructor<const N: usize>(
    _: &mut Interpreter<'_>,
    _: Value,
    args: Vec<Value>,
) -> EvalResult<Value> {
    let message = match args.first() {
        Some(Value::Undefined) | None => String::new(),
        Some(value) => value.to_display_string(),
    };
    Ok(Value::error(ERROR_NAMES[N], &message))
}

fn native_log(interp: &mut Interpreter<'_>, _: Value, args: Vec<Value>) -> EvalResult<Value> {
    let line = args.iter().map(Value::inspect).collect::<Vec<_>>().join(" ");
    interp.push_log(line);
    Ok(Value::Undefined)
}

fn native_string(_: &mut Interpreter<'_>, _: Value, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::string(
        args.first().map_or_else(String::new, Value::to_display_string),
    ))
}

fn native_number(_: &mut Interpreter<'_>, _: Value, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::Number(args.first().map_or(0.0, Value::to_number)))
}

/// `Function.prototype.call`
fn native_call(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let mut args = args.into_iter();
    let this_arg = args.next().unwrap_or(Value::Undefined);
    interp.call_function(&this, this_arg, args.collect())
}

impl<'a> Interpreter<'a> {
    pub(crate) fn get_property(&mut self, object: &Value, key: &str) -> EvalResult<Value> {
        match object {
            Value::Undefined | Value::Null => self.throw_error(
                "TypeError",
                format!(
                    "Cannot read properties of {} (reading '{key}')",
                    object.to_display_string()
                ),
            ),
            Value::String(s) => Ok(match key {
                "length" => Value::Number(s.encode_utf16().count() as f64),
                _ => array_index(key)
                    .and_then(|i| s.chars().nth(i))
                    .map_or(Value::Undefined, |c| Value::string(c.to_string())),
            }),
            Value::Bool(_) | Value::Number(_) => Ok(Value::Undefined),
            Value::Object(obj) => Ok(object_property(obj, key)),
        }
    }

    pub(crate) fn set_property(&mut self, object: &Value, key: &str, value: Value) -> EvalResult<()> {
        let obj = match object {
            Value::Undefined | Value::Null => {
                return self.throw_error(
                    "TypeError",
                    format!(
                        "Cannot set properties of {} (setting '{key}')",
                        object.to_display_string()
                    ),
                );
            }
            Value::Object(obj) => obj,
            _ => return Ok(()),
        };
        let mut obj = obj.borrow_mut();
        if let ObjectClass::Array(items) = &mut obj.class {
            if let Some(index) = array_index(key) {
                if index >= items.len() {
                    items.resize(index + 1, Value::Undefined);
                }
                items[index] = value;
                return Ok(());
            }
            if key == "length" {
                let length = value.to_number();
                if length < 0.0 || length.fract() != 0.0 || length > u32::MAX as f64 {
                    drop(obj);
                    return self.throw_error("RangeError", "Invalid array length");
                }
                items.resize(length as usize, Value::Undefined);
                return Ok(());
            }
        }
        obj.properties.insert(key.to_string(), value);
        Ok(())
    }
}

fn object_property(obj: &ObjRef, key: &str) -> Value {
    let object = obj.borrow();
    match &object.class {
        ObjectClass::Array(items) => {
            if key == "length" {
                return Value::Number(items.len() as f64);
            }
            if let Some(index) = array_index(key) {
                return items.get(index).cloned().unwrap_or(Value::Undefined);
            }
            if let Some(value) = object.properties.get(key) {
                return value.clone();
            }
            array_method(key).unwrap_or(Value::Undefined)
        }
        ObjectClass::Function(_) if key == "call" && !object.properties.contains_key(key) => {
            Value::native("call", native_call)
        }
        _ => object.properties.get(key).cloned().unwrap_or(Value::Undefined),
    }
}

fn array_method(name: &str) -> Option<Value> {
    let (name, func): (&'static str, NativeFn) = match name {
        "push" => ("push", array_push),
        "pop" => ("pop", array_pop),
        "join" => ("join", array_join),
        "indexOf" => ("indexOf", array_index_of),
        "slice" => ("slice", array_slice),
        "concat" => ("concat", array_concat),
        "forEach" => ("forEach", array_for_each),
        "map" => ("map", array_map),
        "filter" => ("filter", array_filter),
        "every" => ("every", array_every),
        "some" => ("some", array_some),
        "reduce" => ("reduce", array_reduce),
        _ => return None,
    };
    Some(Value::native(name, func))
}

fn this_array(interp: &Interpreter<'_>, this: &Value, method: &str) -> EvalResult<ObjRef> {
    match this {
        Value::Object(obj) if matches!(obj.borrow().class, ObjectClass::Array(_)) => Ok(obj.clone()),
        _ => interp.throw_error(
            "TypeError",
            format!("Array.prototype.{method} called on non-array"),
        ),
    }
}

fn array_len(array: &ObjRef) -> usize {
    match &array.borrow().class {
        ObjectClass::Array(items) => items.len(),
        _ => 0,
    }
}

/// Element `index`, or `None` past the current end.
fn array_get(array: &ObjRef, index: usize) -> Option<Value> {
    match &array.borrow().class {
        ObjectClass::Array(items) => items.get(index).cloned(),
        _ => None,
    }
}

fn with_items<T>(array: &ObjRef, f: impl FnOnce(&mut Vec<Value>) -> T) -> Option<T> {
    match &mut array.borrow_mut().class {
        ObjectClass::Array(items) => Some(f(items)),
        _ => None,
    }
}

fn array_push(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let array = this_array(interp, &this, "push")?;
    let len = with_items(&array, |items| {
        items.extend(args);
        items.len()
    })
    .unwrap_or(0);
    Ok(Value::Number(len as f64))
}

fn array_pop(interp: &mut Interpreter<'_>, this: Value, _: Vec<Value>) -> EvalResult<Value> {
    let array = this_array(interp, &this, "pop")?;
    Ok(with_items(&array, Vec::pop).flatten().unwrap_or(Value::Undefined))
}

fn array_join(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let array = this_array(interp, &this, "join")?;
    let separator = match args.first() {
        Some(Value::Undefined) | None => ",".to_string(),
        Some(value) => value.to_display_string(),
    };
    let joined = with_items(&array, |items| {
        items
            .iter()
            .map(|item| {
                if item.is_nullish() {
                    String::new()
                } else {
                    item.to_display_string()
                }
            })
            .collect::<Vec<_>>()
            .join(&separator)
    })
    .unwrap_or_default();
    Ok(Value::string(joined))
}

fn array_index_of(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let array = this_array(interp, &this, "indexOf")?;
    let needle = args.into_iter().next().unwrap_or(Value::Undefined);
    let found = with_items(&array, |items| items.iter().position(|item| item.strict_equals(&needle)))
        .flatten();
    Ok(Value::Number(found.map_or(-1.0, |i| i as f64)))
}

/// Relative index argument clamped to `0..=len`.
fn relative_index(value: Option<&Value>, len: usize, default: usize) -> usize {
    let Some(value) = value.filter(|v| !matches!(v, Value::Undefined)) else {
        return default;
    };
    let n = value.to_number();
    let n = if n.is_nan() { 0.0 } else { n.trunc() };
    let len_f = len as f64;
    let resolved = if n < 0.0 { (len_f + n).max(0.0) } else { n.min(len_f) };
    resolved as usize
}

fn array_slice(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let array = this_array(interp, &this, "slice")?;
    let len = array_len(&array);
    let start = relative_index(args.first(), len, 0);
    let end = relative_index(args.get(1), len, len);
    let items = with_items(&array, |items| {
        items.get(start..end.max(start)).map(<[Value]>::to_vec).unwrap_or_default()
    })
    .unwrap_or_default();
    Ok(Value::array(items))
}

fn array_concat(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let array = this_array(interp, &this, "concat")?;
    let mut items = with_items(&array, |items| items.clone()).unwrap_or_default();
    for arg in args {
        let spread = arg
            .as_object()
            .and_then(|obj| with_items(obj, |inner| inner.clone()));
        match spread {
            Some(inner) => items.extend(inner),
            None => items.push(arg),
        }
    }
    Ok(Value::array(items))
}

/// Receiver, callback and `thisArg` shared by the iteration methods.
struct Iteration {
    array: ObjRef,
    receiver: Value,
    callback: Value,
    this_arg: Value,
    /// Length read once before iterating.
    len: usize,
}

fn begin_iteration(
    interp: &Interpreter<'_>,
    this: Value,
    args: &[Value],
    method: &str,
) -> EvalResult<Iteration> {
    let array = this_array(interp, &this, method)?;
    let callback = args.first().cloned().unwrap_or(Value::Undefined);
    if callback.as_callable().is_none() {
        return interp.throw_error(
            "TypeError",
            format!("{} is not a function", callback.inspect()),
        );
    }
    let len = array_len(&array);
    Ok(Iteration {
        array,
        receiver: this,
        callback,
        this_arg: args.get(1).cloned().unwrap_or(Value::Undefined),
        len,
    })
}

impl Iteration {
    /// Call the callback for each index still present, stopping when
    /// `visit` returns false.
    fn run(
        &self,
        interp: &mut Interpreter<'_>,
        mut visit: impl FnMut(usize, Value, Value) -> bool,
    ) -> EvalResult<()> {
        for index in 0..self.len {
            let Some(element) = array_get(&self.array, index) else {
                continue;
            };
            let result = interp.call_function(
                &self.callback,
                self.this_arg.clone(),
                vec![
                    element.clone(),
                    Value::Number(index as f64),
                    self.receiver.clone(),
                ],
            )?;
            if !visit(index, element, result) {
                break;
            }
        }
        Ok(())
    }
}

fn array_for_each(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let iteration = begin_iteration(interp, this, &args, "forEach")?;
    iteration.run(interp, |_, _, _| true)?;
    Ok(Value::Undefined)
}

fn array_map(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let iteration = begin_iteration(interp, this, &args, "map")?;
    let mut mapped = vec![Value::Undefined; iteration.len];
    iteration.run(interp, |index, _, result| {
        mapped[index] = result;
        true
    })?;
    Ok(Value::array(mapped))
}

fn array_filter(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let iteration = begin_iteration(interp, this, &args, "filter")?;
    let mut kept = Vec::new();
    iteration.run(interp, |_, element, result| {
        if result.is_truthy() {
            kept.push(element);
        }
        true
    })?;
    Ok(Value::array(kept))
}

fn array_every(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let iteration = begin_iteration(interp, this, &args, "every")?;
    let mut all = true;
    iteration.run(interp, |_, _, result| {
        all = result.is_truthy();
        all
    })?;
    Ok(Value::Bool(all))
}

fn array_some(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let iteration = begin_iteration(interp, this, &args, "some")?;
    let mut any = false;
    iteration.run(interp, |_, _, result| {
        any = result.is_truthy();
        !any
    })?;
    Ok(Value::Bool(any))
}

fn array_reduce(interp: &mut Interpreter<'_>, this: Value, args: Vec<Value>) -> EvalResult<Value> {
    let array = this_array(interp, &this, "reduce")?;
    let callback = args.first().cloned().unwrap_or(Value::Undefined);
    if callback.as_callable().is_none() {
        return interp.throw_error(
            "TypeError",
            format!("{} is not a function", callback.inspect()),
        );
    }
    let len = array_len(&array);
    let (mut acc, start) = match args.get(1) {
        Some(initial) => (initial.clone(), 0),
        None => match array_get(&array, 0) {
            Some(first) => (first, 1),
            _ => {
                return interp
                    .throw_error("TypeError", "Reduce of empty array with no initial value");
            }
        },
    };
    for index in start..len {
        let Some(element) = array_get(&array, index) else {
            continue;
        };
        acc = interp.call_function(
            &callback,
            Value::Undefined,
            vec![acc, element, Value::Number(index as f64), this.clone()],
        )?;
    }
    Ok(acc)
}
