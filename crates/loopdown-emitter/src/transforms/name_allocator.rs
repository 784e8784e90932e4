//! Collision-free temporary names for generated loops.
//!
//! `fresh_name("a")` yields `_a`, then `_a2`, `_a3`, ... skipping every
//! identifier that occurs in the file and every name already handed out in
//! the current chain of function scopes. Names allocated in a function that
//! has been exited may be reused by its siblings.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

#[derive(Debug)]
pub struct NameAllocator {
    reserved: FxHashSet<String>,
    /// Names allocated per open function scope, outermost first.
    scopes: SmallVec<[FxHashSet<String>; 8]>,
}

impl NameAllocator {
    /// Create an allocator with the file-level scope open.
    pub fn new(reserved: FxHashSet<String>) -> Self {
        let mut scopes = SmallVec::new();
        scopes.push(FxHashSet::default());
        NameAllocator { reserved, scopes }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(FxHashSet::default());
    }

    /// Close the innermost function scope. The file scope is never closed.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn is_taken(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.scopes.iter().any(|scope| scope.contains(name))
    }

    /// Allocate a fresh name derived from `hint` in the innermost scope.
    pub fn fresh_name(&mut self, hint: &str) -> String {
        let base = format!("_{hint}");
        let mut candidate = base.clone();
        let mut suffix = 2u32;
        while self.is_taken(&candidate) {
            candidate = format!("{base}{suffix}");
            suffix += 1;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(candidate.clone());
        }
        candidate
    }
}
