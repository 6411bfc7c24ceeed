//! Validated, immutable collections of menu definitions.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::{Error, MenuDefinition};

/// An ordered set of menus with unique ids and an acyclic delegation graph.
///
/// Construction is the only place the invariants are checked; a `MenuSet`
/// is never mutated afterwards, so resolution over it always terminates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuSet {
    /// Menus in declaration order (selection order).
    menus: Vec<MenuDefinition>,
    /// Id to position in `menus`.
    index: HashMap<String, usize>,
}

impl MenuSet {
    /// Validate and freeze a list of menus.
    ///
    /// Fails on duplicate ids and on delegation cycles. Delegating items that
    /// point at unknown ids are logged and left in place; they resolve to
    /// nothing.
    pub fn new(menus: Vec<MenuDefinition>) -> Result<Self, Error> {
        let mut index = HashMap::with_capacity(menus.len());
        for (i, m) in menus.iter().enumerate() {
            if index.insert(m.id.clone(), i).is_some() {
                return Err(Error::DuplicateMenu { id: m.id.clone() });
            }
        }
        for m in &menus {
            for target in m.delegates() {
                if !index.contains_key(target) {
                    warn!(menu_id = %m.id, sub_menu = %target, "delegating item targets unknown menu");
                }
            }
        }
        let set = Self { menus, index };
        set.check_acyclic()?;
        Ok(set)
    }

    /// Menus in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuDefinition> {
        self.menus.iter()
    }

    /// Look up a menu by id.
    pub fn get(&self, id: &str) -> Option<&MenuDefinition> {
        self.index.get(id).map(|&i| &self.menus[i])
    }

    /// Number of menus.
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// True when there are no menus.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// Depth-first search over delegation edges, reporting the first cycle.
    fn check_acyclic(&self) -> Result<(), Error> {
        let mut done: HashSet<&str> = HashSet::new();
        for m in &self.menus {
            let mut stack: Vec<&str> = Vec::new();
            self.visit(&m.id, &mut stack, &mut done)?;
        }
        Ok(())
    }

    /// Visit `id`, with `stack` holding the current delegation chain.
    fn visit<'a>(
        &'a self,
        id: &'a str,
        stack: &mut Vec<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<(), Error> {
        if done.contains(id) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|s| *s == id) {
            let mut cycle: Vec<String> = stack[pos..].iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            return Err(Error::CyclicMenuDefinition { cycle });
        }
        let Some(menu) = self.get(id) else {
            return Ok(());
        };
        stack.push(id);
        for target in menu.delegates() {
            self.visit(target, stack, done)?;
        }
        stack.pop();
        done.insert(id);
        Ok(())
    }
}
