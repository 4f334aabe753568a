//! Registration: building the example tree.
//!
//! ```rust,ignore
//! let mut suite = Suite::new();
//! suite.describe("calc", Location::new(file!(), 10, 16), |calc| {
//!     calc.before_each(|scope| {
//!         scope.insert(Calculator::default());
//!         Ok(())
//!     });
//!     calc.it("adds", Location::new(file!(), 14, 15), |scope| {
//!         check_eq!(scope.get::<Calculator>().unwrap().add(1, 1), 2);
//!         Ok(())
//!     });
//! });
//! ```
//!
//! Most code uses the `suite!` macro instead, which captures locations
//! automatically.

use crate::{
    hook::Hook,
    scope::{ensure_registration_allowed, Scope},
    tree::{full_description, Example, ExampleInfo, Group, Node},
    Location,
};

/// A tree of example groups under one implicit root group.
pub struct Suite {
    root: Group,
    /// Child indices from the root to the group currently open for
    /// registration.
    cursor: Vec<usize>,
}

impl Default for Suite {
    fn default() -> Suite {
        Suite::new()
    }
}

impl Suite {
    pub fn new() -> Suite {
        Suite {
            root: Group::new("", Location::at("", 0)),
            cursor: Vec::new(),
        }
    }

    /// Add a group to the open group and register its contents by calling
    /// `body` right away with the new group open.
    pub fn describe(
        &mut self,
        description: impl Into<String>,
        location: Location,
        body: impl FnOnce(&mut Suite),
    ) -> &mut Suite {
        let description = description.into();
        ensure_registration_allowed(&description);

        let group = self.open_group();
        group.children.push(Node::Group(Group::new(description, location)));
        let index = group.children.len() - 1;

        self.cursor.push(index);
        body(self);
        self.cursor.pop();
        self
    }

    /// Alias of [`describe`](Suite::describe).
    pub fn context(
        &mut self,
        description: impl Into<String>,
        location: Location,
        body: impl FnOnce(&mut Suite),
    ) -> &mut Suite {
        self.describe(description, location, body)
    }

    /// Add an example to the open group. `body` is stored, not called.
    pub fn it(
        &mut self,
        description: impl Into<String>,
        location: Location,
        body: impl Fn(&mut Scope) -> eyre::Result<()> + 'static,
    ) -> &mut Suite {
        let description = description.into();
        ensure_registration_allowed(&description);

        self.open_group()
            .children
            .push(Node::Example(Example::new(description, location, Box::new(body))));
        self
    }

    /// Add an example that is reported as pending and never runs.
    pub fn pending(&mut self, description: impl Into<String>, location: Location) -> &mut Suite {
        let description = description.into();
        ensure_registration_allowed(&description);

        self.open_group()
            .children
            .push(Node::Example(Example::pending(description, location)));
        self
    }

    /// Like [`pending`](Suite::pending) for an example that already has a
    /// body. The body is type-checked by the compiler and then dropped.
    pub fn pending_with(
        &mut self,
        description: impl Into<String>,
        location: Location,
        body: impl Fn(&mut Scope) -> eyre::Result<()>,
    ) -> &mut Suite {
        drop(body);
        self.pending(description, location)
    }

    /// Run `hook` before every example of the open group and its descendants.
    pub fn before_each(
        &mut self,
        hook: impl Fn(&mut Scope) -> eyre::Result<()> + 'static,
    ) -> &mut Suite {
        ensure_registration_allowed("before_each");
        let hook: Hook = Box::new(hook);
        self.open_group().hooks.before_each.push(hook);
        self
    }

    /// Run `hook` after every example of the open group and its descendants,
    /// whatever the example's outcome.
    pub fn after_each(
        &mut self,
        hook: impl Fn(&mut Scope) -> eyre::Result<()> + 'static,
    ) -> &mut Suite {
        ensure_registration_allowed("after_each");
        let hook: Hook = Box::new(hook);
        self.open_group().hooks.after_each.push(hook);
        self
    }

    /// Add every group, example and hook of `other` to the open group.
    ///
    /// `other`'s top-level hooks keep applying to `other`'s examples only,
    /// and full descriptions are unchanged.
    pub fn append(&mut self, other: Suite) -> &mut Suite {
        ensure_registration_allowed("suite");
        self.open_group().children.push(Node::Group(other.root));
        self
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    /// Every example in declaration order.
    pub fn examples(&self) -> Vec<ExampleInfo> {
        fn collect<'a>(group: &'a Group, path: &mut Vec<&'a str>, out: &mut Vec<ExampleInfo>) {
            path.push(&group.description);
            for child in &group.children {
                match child {
                    Node::Group(group) => collect(group, path, out),
                    Node::Example(example) => out.push(ExampleInfo {
                        description: full_description(path.iter().copied(), &example.description),
                        location: example.location.clone(),
                        pending: example.is_pending(),
                    }),
                }
            }
            path.pop();
        }

        let mut out = Vec::new();
        collect(&self.root, &mut Vec::new(), &mut out);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    fn open_group(&mut self) -> &mut Group {
        let mut group = &mut self.root;
        for &index in &self.cursor {
            group = match &mut group.children[index] {
                Node::Group(child) => child,
                Node::Example(_) => unreachable!("registration cursor points at an example"),
            };
        }
        group
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite").field("root", &self.root).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::ConfigurationError, scope::ExecutionGuard};
    use pretty_assertions::assert_eq;

    fn loc(line: u32, end_line: u32) -> Location {
        Location::new("calc_spec.rs", line, end_line)
    }

    #[test]
    fn builds_tree_in_declaration_order() {
        let mut suite = Suite::new();
        suite.describe("calc", loc(1, 12), |calc| {
            calc.it("adds", loc(2, 4), |_| Ok(()));
            calc.context("with negatives", loc(5, 9), |negatives| {
                negatives.it("subtracts", loc(6, 8), |_| Ok(()));
            });
            calc.pending("divides", loc(10, 10));
        });
        suite.it("stands alone", loc(13, 14), |_| Ok(()));

        let listed: Vec<_> = suite
            .examples()
            .into_iter()
            .map(|info| (info.description, info.location.line, info.pending))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("calc adds".to_string(), 2, false),
                ("calc with negatives subtracts".to_string(), 6, false),
                ("calc divides".to_string(), 10, true),
                ("stands alone".to_string(), 13, false),
            ]
        );
    }

    #[test]
    fn describe_restores_the_open_group() {
        let mut suite = Suite::new();
        suite.describe("a", loc(1, 5), |a| {
            a.describe("b", loc(2, 3), |_| {});
            a.it("after b", loc(4, 4), |_| Ok(()));
        });

        let Node::Group(a) = &suite.root().children()[0] else {
            panic!("expected a group");
        };
        assert_eq!(a.children().len(), 2);
        assert_eq!(a.children()[1].description(), "after b");
        assert_eq!(suite.root().children().len(), 1);
    }

    #[test]
    fn hooks_attach_to_the_open_group() {
        let mut suite = Suite::new();
        suite.before_each(|_| Ok(()));
        suite.describe("a", loc(1, 5), |a| {
            a.after_each(|_| Ok(()));
            a.after_each(|_| Ok(()));
        });

        let root = suite.root();
        assert_eq!(root.hooks().before_each.len(), 1);
        let Node::Group(a) = &root.children()[0] else {
            panic!("expected a group");
        };
        assert_eq!(a.hooks().after_each.len(), 2);
        assert!(a.hooks().before_each.is_empty());
    }

    #[test]
    fn registration_while_executing_is_a_configuration_error() {
        let result = std::panic::catch_unwind(|| {
            let _guard = ExecutionGuard::enter("calc adds");
            Suite::new().it("nested", loc(1, 1), |_| Ok(()));
        });
        let payload = result.unwrap_err();
        let err = payload.downcast_ref::<ConfigurationError>().unwrap();
        assert_eq!(err.registered, "nested");
    }

    #[test]
    fn append_keeps_descriptions_and_hooks() {
        let mut other = Suite::new();
        other.before_each(|_| Ok(()));
        other.it("pops", loc(3, 4), |_| Ok(()));

        let mut suite = Suite::new();
        suite.it("pushes", loc(1, 2), |_| Ok(()));
        suite.append(other);

        let listed: Vec<_> = suite
            .examples()
            .into_iter()
            .map(|info| info.description)
            .collect();
        assert_eq!(listed, vec!["pushes", "pops"]);
        assert!(suite.root().hooks().is_empty());
        let Node::Group(appended) = &suite.root().children()[1] else {
            panic!("expected a group");
        };
        assert_eq!(appended.hooks().before_each.len(), 1);
    }

    #[test]
    fn empty_suite() {
        let suite = Suite::default();
        assert!(suite.is_empty());
        assert!(suite.examples().is_empty());
    }
}
