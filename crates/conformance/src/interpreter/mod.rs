//! A tree-walking interpreter for the JavaScript subset the parser accepts.
//!
//! It exists to execute a program before and after lowering and compare
//! what happened: every `log(...)` line and how the program completed.
//! Arrays carry native `forEach`/`map`/`filter`/`every`/`some`/`reduce`
//! with standard semantics (including `thisArg`), so the lowered loops are
//! checked against the real behaviour.
//!
//! The completion value of a program is its global `result` binding, or
//! the exception it threw.

mod builtins;
mod environment;
mod expressions;
mod statements;
pub mod value;

use loopdown_common::limits::{MAX_CALL_DEPTH, MAX_LOOP_ITERATIONS};
use loopdown_parser::parser::syntax_kind_ext::{ARROW_FUNCTION, BLOCK};
use loopdown_parser::parser::{NodeArena, NodeFlags, NodeIndex, parse_source};
use thiserror::Error;
use tracing::{debug, trace};

pub use environment::Environment;
pub use value::Value;

use value::{Callable, Closure};

/// A failure of the interpreter itself, as opposed to a JavaScript exception.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("{count} syntax error(s), first: {first}")]
    Syntax { count: usize, first: String },

    #[error("unsupported construct: {0}")]
    Unsupported(&'static str),

    #[error("loop iteration limit ({limit}) exceeded")]
    LoopLimit { limit: u64 },

    #[error("interpreter thread failed: {0}")]
    Thread(String),
}

/// Abrupt completion of an evaluation step.
#[derive(Debug)]
pub enum Exception {
    /// A JavaScript `throw`.
    Thrown(Value),
    Fatal(InterpreterError),
}

impl From<InterpreterError> for Exception {
    fn from(err: InterpreterError) -> Self {
        Exception::Fatal(err)
    }
}

pub type EvalResult<T> = Result<T, Exception>;

/// How a statement completed.
#[derive(Debug)]
pub enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// How a whole program completed, rendered with [`Value::inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramCompletion {
    /// The global `result` binding (`undefined` if never assigned).
    Normal(String),
    Threw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub log: Vec<String>,
    pub completion: ProgramCompletion,
}

/// Evaluation recurses on the native stack once per JavaScript call.
const INTERPRETER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Parse and run `source` on a thread with a large stack.
pub fn run_source(source: &str) -> Result<RunOutcome, InterpreterError> {
    let (arena, root, diagnostics) = parse_source("program.js", source);
    if let Some(first) = diagnostics.first() {
        return Err(InterpreterError::Syntax {
            count: diagnostics.len(),
            first: first.message.clone(),
        });
    }
    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name("interpreter".into())
            .stack_size(INTERPRETER_STACK_SIZE)
            .spawn_scoped(scope, || Interpreter::new(&arena).run(root))
            .map_err(|err| InterpreterError::Thread(err.to_string()))?;
        handle
            .join()
            .map_err(|_| InterpreterError::Thread("interpreter panicked".into()))?
    })
}

pub struct Interpreter<'a> {
    arena: &'a NodeArena,
    env: Environment,
    this_value: Value,
    log: Vec<String>,
    call_depth: u32,
    loop_iterations: u64,
}

impl<'a> Interpreter<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        let env = Environment::global();
        builtins::install_globals(&env);
        Interpreter {
            arena,
            env,
            this_value: Value::Undefined,
            log: Vec::new(),
            call_depth: 0,
            loop_iterations: 0,
        }
    }

    /// Run the program rooted at `root` (a source file).
    pub fn run(mut self, root: NodeIndex) -> Result<RunOutcome, InterpreterError> {
        let statements = self
            .arena
            .get(root)
            .and_then(|node| self.arena.get_source_file(node))
            .map(|file| file.statements.nodes.clone())
            .unwrap_or_default();

        let completion = match self.exec_statement_list(&statements) {
            Ok(_) => {
                let result = self.env.lookup("result").unwrap_or(Value::Undefined);
                ProgramCompletion::Normal(result.inspect())
            }
            Err(Exception::Thrown(value)) => ProgramCompletion::Threw(value.inspect()),
            Err(Exception::Fatal(err)) => return Err(err),
        };
        debug!(log_lines = self.log.len(), ?completion, "program finished");
        Ok(RunOutcome {
            log: self.log,
            completion,
        })
    }

    pub(crate) fn push_log(&mut self, line: String) {
        trace!(%line, "log");
        self.log.push(line);
    }

    /// Throw a new error object of class `name`.
    pub(crate) fn throw_error<T>(&self, name: &str, message: impl AsRef<str>) -> EvalResult<T> {
        Err(Exception::Thrown(Value::error(name, message.as_ref())))
    }

    pub(crate) fn count_iteration(&mut self) -> EvalResult<()> {
        self.loop_iterations += 1;
        if self.loop_iterations > MAX_LOOP_ITERATIONS {
            return Err(InterpreterError::LoopLimit {
                limit: MAX_LOOP_ITERATIONS,
            }
            .into());
        }
        Ok(())
    }

    /// Run `f` with `env` as the current scope, restoring the previous one.
    pub(crate) fn with_env<T>(
        &mut self,
        env: Environment,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let saved = std::mem::replace(&mut self.env, env);
        let result = f(self);
        self.env = saved;
        result
    }

    pub(crate) fn make_closure(&self, node: NodeIndex) -> Value {
        let is_arrow = self
            .arena
            .get(node)
            .is_some_and(|n| n.kind == ARROW_FUNCTION);
        Value::closure(Closure {
            node,
            env: self.env.clone(),
            lexical_this: is_arrow.then(|| self.this_value.clone()),
        })
    }

    /// Invoke `callee` with the given `this` and arguments.
    pub fn call_function(
        &mut self,
        callee: &Value,
        this: Value,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        let Some(callable) = callee.as_callable() else {
            return self.throw_error(
                "TypeError",
                format!("{} is not a function", callee.inspect()),
            );
        };
        match callable {
            Callable::Native { func, .. } => func(self, this, args),
            Callable::Closure(closure) => self.call_closure(&closure, this, args),
        }
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        this: Value,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return self.throw_error("RangeError", "Maximum call stack size exceeded");
        }
        let arena = self.arena;
        let Some(node) = arena.get(closure.node) else {
            return Ok(Value::Undefined);
        };
        let Some(function) = arena.get_function(node) else {
            return Err(InterpreterError::Unsupported("callable node is not a function").into());
        };
        let expression_body =
            NodeFlags::from_bits_truncate(node.flags).contains(NodeFlags::EXPRESSION_BODY);

        let scope = closure.env.child(true);
        let this = closure.lexical_this.clone().unwrap_or(this);
        let saved_this = std::mem::replace(&mut self.this_value, this);
        self.call_depth += 1;

        let result = self.with_env(scope, |interp| {
            interp.bind_parameters(&function.parameters.nodes, args)?;
            if expression_body {
                return interp.eval(function.body);
            }
            let Some(body) = arena.get(function.body).filter(|n| n.kind == BLOCK) else {
                return Ok(Value::Undefined);
            };
            let statements = arena
                .get_block(body)
                .map(|block| block.statements.nodes.clone())
                .unwrap_or_default();
            match interp.exec_statement_list(&statements)? {
                Completion::Return(value) => Ok(value),
                _ => Ok(Value::Undefined),
            }
        });

        self.call_depth -= 1;
        self.this_value = saved_this;
        result
    }

    fn bind_parameters(&mut self, parameters: &[NodeIndex], args: Vec<Value>) -> EvalResult<()> {
        let mut args = args.into_iter();
        for &param in parameters {
            let Some(data) = self.arena.get(param).and_then(|n| self.arena.get_parameter(n)) else {
                continue;
            };
            let mut value = args.next().unwrap_or(Value::Undefined);
            if matches!(value, Value::Undefined) && data.initializer.is_some() {
                value = self.eval(data.initializer)?;
            }
            let name = self.identifier_name(data.name)?;
            self.env.declare(&name, value, true);
        }
        Ok(())
    }

    /// `new callee(args)`
    pub(crate) fn construct(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee.as_callable() {
            Some(Callable::Native { func, .. }) => func(self, Value::Undefined, args),
            Some(Callable::Closure(closure)) if closure.lexical_this.is_none() => {
                let instance = Value::plain(Default::default());
                let returned = self.call_closure(&closure, instance.clone(), args)?;
                Ok(match returned {
                    Value::Object(_) => returned,
                    _ => instance,
                })
            }
            _ => self.throw_error(
                "TypeError",
                format!("{} is not a constructor", callee.inspect()),
            ),
        }
    }

    pub(crate) fn identifier_name(&self, idx: NodeIndex) -> EvalResult<String> {
        self.arena
            .get(idx)
            .and_then(|node| self.arena.get_identifier(node))
            .map(|ident| ident.escaped_text.clone())
            .ok_or_else(|| InterpreterError::Unsupported("binding pattern").into())
    }
}
