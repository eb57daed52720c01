use crate::error::MintError;
use crate::value::Value;
use std::collections::HashMap;

/// Handle to a scope inside an [`Environments`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Outcome of a write-once insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Inserted,
    AlreadyBound,
}

#[derive(Debug, Clone)]
struct Scope {
    parent: Option<ScopeId>,
    name: String,
    values: HashMap<String, Value>,
    // insertion order, for introspection output
    order: Vec<String>,
}

/// Snapshot of one scope for debugging tools.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentInfo {
    pub name: String,
    pub bindings: Vec<(String, String)>,
    pub distance: usize,
}

impl EnvironmentInfo {
    /// `@name` followed by one indented line per binding.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("@{}", self.name)];
        if self.bindings.is_empty() {
            lines.push("  No items.".to_string());
        } else {
            lines.extend(
                self.bindings
                    .iter()
                    .map(|(name, value)| format!("  {}: {}", name, value)),
            );
        }
        lines
    }
}

/// Arena of lexical scopes. Parent links are indices into the arena, so
/// closures can hold on to their defining scope without reference cycles.
#[derive(Debug, Clone)]
pub struct Environments {
    scopes: Vec<Scope>,
}

impl Environments {
    /// A fresh arena holding only the root scope.
    pub fn new(root_name: &str) -> Self {
        Self {
            scopes: vec![Scope {
                parent: None,
                name: root_name.to_string(),
                values: HashMap::new(),
                order: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn create(&mut self, parent: ScopeId, name: impl Into<String>) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            name: name.into(),
            values: HashMap::new(),
            order: Vec::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Number of scopes currently held, usable as a mark for [`Self::release_to`].
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Drop every scope created after `mark`. The root scope is never released.
    pub fn release_to(&mut self, mark: usize) {
        self.scopes.truncate(mark.max(1));
    }

    /// Bind `name` in `scope` only, unless it is already bound there.
    pub fn insert_if_absent(&mut self, scope: ScopeId, name: &str, value: Value) -> Binding {
        let scope = &mut self.scopes[scope.0];
        if scope.values.contains_key(name) {
            return Binding::AlreadyBound;
        }
        scope.values.insert(name.to_string(), value);
        scope.order.push(name.to_string());
        Binding::Inserted
    }

    /// Bind `name` in `scope`; rebinding in the same scope is an error.
    pub fn set_item(&mut self, scope: ScopeId, name: &str, value: Value) -> Result<(), MintError> {
        match self.insert_if_absent(scope, name, value) {
            Binding::Inserted => Ok(()),
            Binding::AlreadyBound => Err(MintError::duplicate_binding(None, name)),
        }
    }

    /// Nearest binding of `name`, walking the parent chain.
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Value> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(value) = scope.values.get(name) {
                return Some(value);
            }
            current = scope.parent;
        }
        None
    }

    pub fn get_item(&self, scope: ScopeId, name: &str) -> Result<Value, MintError> {
        self.get(scope, name)
            .cloned()
            .ok_or_else(|| MintError::unbound_identifier(None, name))
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    pub fn name(&self, scope: ScopeId) -> &str {
        &self.scopes[scope.0].name
    }

    /// Number of parent hops to the root.
    pub fn distance(&self, scope: ScopeId) -> usize {
        let mut hops = 0;
        let mut current = self.parent(scope);
        while let Some(id) = current {
            hops += 1;
            current = self.parent(id);
        }
        hops
    }

    pub fn info(&self, scope: ScopeId) -> EnvironmentInfo {
        let inner = &self.scopes[scope.0];
        let bindings = inner
            .order
            .iter()
            .map(|name| (name.clone(), inner.values[name].to_string()))
            .collect();

        EnvironmentInfo {
            name: inner.name.clone(),
            bindings,
            distance: self.distance(scope),
        }
    }
}
