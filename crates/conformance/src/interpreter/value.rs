//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use loopdown_parser::parser::NodeIndex;

use super::environment::Environment;
use super::{EvalResult, Interpreter};

pub type ObjRef = Rc<RefCell<Object>>;

/// Host function: `(interpreter, this, arguments)`.
pub type NativeFn = fn(&mut Interpreter<'_>, Value, Vec<Value>) -> EvalResult<Value>;

/// Nesting depth at which `inspect` stops descending.
const MAX_INSPECT_DEPTH: usize = 4;

#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Object(ObjRef),
}

#[derive(Debug)]
pub struct Object {
    pub class: ObjectClass,
    pub properties: IndexMap<String, Value>,
}

#[derive(Debug)]
pub enum ObjectClass {
    Plain,
    Array(Vec<Value>),
    Function(Callable),
    /// `Error` and its subclasses; `name` and `message` are properties.
    Error,
}

#[derive(Clone)]
pub enum Callable {
    Closure(Closure),
    Native { name: &'static str, func: NativeFn },
}

/// A function value created from a function expression, arrow function or
/// declaration.
#[derive(Clone)]
pub struct Closure {
    pub node: NodeIndex,
    pub env: Environment,
    /// Captured `this` for arrow functions.
    pub lexical_this: Option<Value>,
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Closure(closure) => write!(f, "Closure({})", closure.node.0),
            Callable::Native { name, .. } => write!(f, "Native({name})"),
        }
    }
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Value {
        Value::String(Rc::from(text.as_ref()))
    }

    fn from_object(class: ObjectClass, properties: IndexMap<String, Value>) -> Value {
        Value::Object(Rc::new(RefCell::new(Object { class, properties })))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::from_object(ObjectClass::Array(items), IndexMap::new())
    }

    pub fn plain(properties: IndexMap<String, Value>) -> Value {
        Value::from_object(ObjectClass::Plain, properties)
    }

    pub fn native(name: &'static str, func: NativeFn) -> Value {
        Value::from_object(
            ObjectClass::Function(Callable::Native { name, func }),
            IndexMap::new(),
        )
    }

    pub fn closure(closure: Closure) -> Value {
        Value::from_object(ObjectClass::Function(Callable::Closure(closure)), IndexMap::new())
    }

    pub fn error(name: &str, message: &str) -> Value {
        let mut properties = IndexMap::new();
        properties.insert("name".to_string(), Value::string(name));
        properties.insert("message".to_string(), Value::string(message));
        Value::from_object(ObjectClass::Error, properties)
    }

    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The callable behind a function value.
    pub fn as_callable(&self) -> Option<Callable> {
        let object = self.as_object()?.borrow();
        match &object.class {
            ObjectClass::Function(callable) => Some(callable.clone()),
            _ => None,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(object) => match object.borrow().class {
                ObjectClass::Function(_) => "function",
                _ => "object",
            },
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Object(_) => string_to_number(&self.to_display_string()),
        }
    }

    /// `ToInt32`
    pub fn to_int32(&self) -> i32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        (n.trunc().rem_euclid(4_294_967_296.0) as u32) as i32
    }

    /// `ToString`
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Object(object) => {
                let object = object.borrow();
                match &object.class {
                    ObjectClass::Array(items) => items
                        .iter()
                        .map(|item| {
                            if item.is_nullish() {
                                String::new()
                            } else {
                                item.to_display_string()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(","),
                    ObjectClass::Function(_) => "function () { [code] }".to_string(),
                    ObjectClass::Error => error_summary(&object.properties),
                    ObjectClass::Plain => "[object Object]".to_string(),
                }
            }
        }
    }

    /// Deterministic rendering used by `log` and program completions.
    /// Strings are unquoted at the top level only.
    pub fn inspect(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            other => other.inspect_nested(0),
        }
    }

    fn inspect_nested(&self, depth: usize) -> String {
        let Value::Object(object) = self else {
            return match self {
                Value::String(s) => quote(s),
                other => other.to_display_string(),
            };
        };
        let object = object.borrow();
        match &object.class {
            ObjectClass::Function(Callable::Native { name, .. }) => format!("[Function: {name}]"),
            ObjectClass::Function(Callable::Closure(_)) => "[Function]".to_string(),
            ObjectClass::Error => error_summary(&object.properties),
            ObjectClass::Array(_) if depth >= MAX_INSPECT_DEPTH => "[Array]".to_string(),
            ObjectClass::Plain if depth >= MAX_INSPECT_DEPTH => "[Object]".to_string(),
            ObjectClass::Array(items) => {
                let parts: Vec<_> = items.iter().map(|v| v.inspect_nested(depth + 1)).collect();
                format!("[{}]", parts.join(", "))
            }
            ObjectClass::Plain if object.properties.is_empty() => "{}".to_string(),
            ObjectClass::Plain => {
                let parts: Vec<_> = object
                    .properties
                    .iter()
                    .map(|(key, value)| format!("{key}: {}", value.inspect_nested(depth + 1)))
                    .collect();
                format!("{{ {} }}", parts.join(", "))
            }
        }
    }

    /// `===`
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `==`
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Value::Object(_), Value::Object(_)) => self.strict_equals(other),
            (Value::Object(_), _) | (_, Value::Object(_)) => {
                self.to_primitive_string() == other.to_primitive_string()
            }
            (Value::String(a), Value::String(b)) => a == b,
            _ => self.to_number() == other.to_number(),
        }
    }

    fn to_primitive_string(&self) -> String {
        match self {
            Value::Object(_) => self.to_display_string(),
            Value::String(s) => s.to_string(),
            other => format_number(other.to_number()),
        }
    }
}

fn error_summary(properties: &IndexMap<String, Value>) -> String {
    let field = |key: &str| {
        properties
            .get(key)
            .map(Value::to_display_string)
            .unwrap_or_default()
    };
    let (name, message) = (field("name"), field("message"));
    if message.is_empty() {
        name
    } else {
        format!("{name}: {message}")
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

/// JavaScript `Number::toString` for the values the interpreter produces.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// Canonical array index for a property key (`"3"` but not `"03"`).
pub fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(Value::string(" 42 ").to_number(), 42.0);
        assert_eq!(Value::string("").to_number(), 0.0);
        assert_eq!(Value::string("0x10").to_number(), 16.0);
        assert!(Value::string("inf").to_number().is_nan());
        assert!(Value::string("12px").to_number().is_nan());
        assert_eq!(Value::string("1e3").to_number(), 1000.0);
    }

    #[test]
    fn test_inspect() {
        let nested = Value::array(vec![
            Value::Number(1.0),
            Value::string("two"),
            Value::array(vec![]),
            Value::Null,
        ]);
        assert_eq!(nested.inspect(), "[1, \"two\", [], null]");
        assert_eq!(Value::string("raw").inspect(), "raw");
        let mut props = IndexMap::new();
        props.insert("a".to_string(), Value::Bool(true));
        assert_eq!(Value::plain(props).inspect(), "{ a: true }");
        assert_eq!(
            Value::error("TypeError", "boom").inspect(),
            "TypeError: boom"
        );
    }

    #[test]
    fn test_equality() {
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
        assert!(Value::string("1").loose_equals(&Value::Number(1.0)));
        assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));
        let array = Value::array(vec![]);
        assert!(array.strict_equals(&array.clone()));
        assert!(!array.strict_equals(&Value::array(vec![])));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_array_index() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("12"), Some(12));
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("length"), None);
        assert_eq!(array_index("-1"), None);
    }
}
