//! [`State`]: the triple of mappings (`v`, `a`, `f`) that holds everything a running
//! Jerboa program can see. It plays the role the teacher's [`Scope`](crate) plays for
//! `rhai`: owned and kept alive by the caller across repeated [`crate::Interpreter`]
//! runs, never a process-wide singleton.

use crate::ast::Block;
use crate::Identifier;
use std::collections::HashMap;

type Map<K, V> = HashMap<K, V, ahash::RandomState>;

/// The global environment a Jerboa program runs against.
///
/// `v`, `a`, and `f` inhabit disjoint namespaces — a name may legally exist in more
/// than one at once, since nothing in the language enforces shadowing between them.
#[derive(Debug, Clone, Default)]
pub struct State {
    v: Map<Identifier, i64>,
    a: Map<Identifier, Map<i64, i64>>,
    f: Map<Identifier, Block>,
}

impl State {
    /// A fresh, empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a simple variable; never-assigned names read as `0`.
    #[must_use]
    pub fn get_var(&self, name: &str) -> i64 {
        self.v.get(name).copied().unwrap_or(0)
    }

    pub fn set_var(&mut self, name: impl Into<Identifier>, value: i64) {
        self.v.insert(name.into(), value);
    }

    /// Read an array slot; a never-assigned array, or a never-assigned slot within an
    /// existing array, both read as `0`.
    #[must_use]
    pub fn get_array(&self, name: &str, index: i64) -> i64 {
        self.a
            .get(name)
            .and_then(|slots| slots.get(&index))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_array(&mut self, name: impl Into<Identifier>, index: i64, value: i64) {
        self.a.entry(name.into()).or_default().insert(index, value);
    }

    /// Bind `name` to `body` in the function table, overwriting any previous binding.
    pub fn define_function(&mut self, name: impl Into<Identifier>, body: Block) {
        self.f.insert(name.into(), body);
    }

    /// Look up a function body by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Block> {
        self.f.get(name)
    }

    /// All bound simple-variable names and values, for a driver building a state dump.
    pub fn vars(&self) -> impl Iterator<Item = (&str, i64)> {
        self.v.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// All bound array names, each with its sparse index → value slots.
    pub fn arrays(&self) -> impl Iterator<Item = (&str, impl Iterator<Item = (i64, i64)> + '_)> {
        self.a
            .iter()
            .map(|(k, slots)| (k.as_str(), slots.iter().map(|(i, v)| (*i, *v))))
    }

    /// All bound function names.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.f.keys().map(|k| k.as_str())
    }
}
