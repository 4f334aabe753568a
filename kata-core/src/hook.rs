//! before/after-each hooks.
//!
//! Every group owns a [`HookSet`]. An example runs under the hooks of all of
//! its ancestors: setup hooks from the outermost group inwards, teardown hooks
//! from the innermost group outwards, so whatever is acquired last is released
//! first.

use std::fmt;

use crate::scope::Scope;

/// A callable run around every example of the group that declares it.
pub type Hook = Box<dyn Fn(&mut Scope) -> eyre::Result<()>>;

#[derive(Default)]
pub struct HookSet {
    pub(crate) before_each: Vec<Hook>,
    pub(crate) after_each: Vec<Hook>,
}

impl HookSet {
    pub fn is_empty(&self) -> bool {
        self.before_each.is_empty() && self.after_each.is_empty()
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .finish()
    }
}

/// Setup hooks of `chain` (root first), outermost group first, declaration
/// order within a group.
pub(crate) fn before_each<'a>(chain: &'a [&'a HookSet]) -> impl Iterator<Item = &'a Hook> {
    chain.iter().flat_map(|set| set.before_each.iter())
}

/// Teardown hooks of `chain` (root first) in exact reverse of the setup
/// order: innermost group first, last declared first.
pub(crate) fn after_each<'a>(chain: &'a [&'a HookSet]) -> impl Iterator<Item = &'a Hook> {
    chain.iter().rev().flat_map(|set| set.after_each.iter().rev())
}
