use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

#[derive(Default)]
struct Scope {
    store: HashMap<String, Object>,
    outer: Option<Environment>,
}

/// A chain of scopes. Cloning yields another handle to the same scope, which
/// is how function values keep their defining environment alive.
#[derive(Clone, Default)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_enclosed(outer: &Environment) -> Self {
        Self {
            scope: Rc::new(RefCell::new(Scope {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        let scope = self.scope.borrow();
        match scope.store.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Assigns to the nearest scope that already binds `name`, falling back
    /// to this scope.
    pub fn put(&self, name: &str, value: Object) {
        let target = self.where_defined(name).unwrap_or_else(|| self.clone());
        target.put_new(name, value);
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn put_new(&self, name: &str, value: Object) {
        self.scope.borrow_mut().store.insert(name.to_owned(), value);
    }

    pub fn where_defined(&self, name: &str) -> Option<Environment> {
        let scope = self.scope.borrow();
        if scope.store.contains_key(name) {
            return Some(self.clone());
        }
        scope
            .outer
            .as_ref()
            .and_then(|outer| outer.where_defined(name))
    }

    pub fn is_same(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&String> = scope.store.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("outer", &scope.outer)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let global = Environment::new();
        global.put_new("a", 1.into());
        let inner = Environment::with_enclosed(&global);
        let innermost = Environment::with_enclosed(&inner);

        assert_eq!(innermost.get("a"), Some(Object::Integer(1)));
        assert_eq!(innermost.get("b"), None);
    }

    #[test]
    fn test_put_targets_nearest_binding() {
        let global = Environment::new();
        global.put_new("a", 1.into());
        let inner = Environment::with_enclosed(&global);

        inner.put("a", 2.into());
        assert_eq!(global.get("a"), Some(Object::Integer(2)));
        assert!(inner.where_defined("a").unwrap().is_same(&global));

        inner.put("b", 3.into());
        assert_eq!(inner.get("b"), Some(Object::Integer(3)));
        assert_eq!(global.get("b"), None);
    }

    #[test]
    fn test_put_new_shadows() {
        let global = Environment::new();
        global.put_new("x", "outer".into());
        let inner = Environment::with_enclosed(&global);

        inner.put_new("x", "inner".into());
        assert_eq!(inner.get("x"), Some(Object::from("inner")));
        assert_eq!(global.get("x"), Some(Object::from("outer")));

        inner.put("x", "changed".into());
        assert_eq!(inner.get("x"), Some(Object::from("changed")));
        assert_eq!(global.get("x"), Some(Object::from("outer")));
    }

    #[test]
    fn test_child_outlives_creator() {
        let global = Environment::new();
        let child = {
            let frame = Environment::with_enclosed(&global);
            frame.put_new("captured", 7.into());
            Environment::with_enclosed(&frame)
        };
        global.put_new("late", 8.into());

        assert_eq!(child.get("captured"), Some(Object::Integer(7)));
        assert_eq!(child.get("late"), Some(Object::Integer(8)));
    }
}
