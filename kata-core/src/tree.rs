//! The example tree built by [`Suite`](crate::Suite) and walked by
//! [`Runner`](crate::Runner).

use std::{fmt, time::Duration};

use crate::{hook::HookSet, scope::Scope, Location};

/// Body of an example.
pub type Body = Box<dyn Fn(&mut Scope) -> eyre::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Unrun,
    Success,
    Fail,
    Error,
    Pending,
}

impl Status {
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Fail | Status::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FailureKind {
    /// A failed check or an explicit `fail`.
    Assertion,
    /// Any other error or panic raised by a hook or the body.
    Unexpected,
}

/// Why an example did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// Where the failure was raised when known, otherwise the example itself.
    pub location: Location,
    /// The underlying error's own description, including its cause chain.
    pub cause: Option<String>,
}

pub enum Node {
    Group(Group),
    Example(Example),
}

impl Node {
    pub fn description(&self) -> &str {
        match self {
            Node::Group(group) => &group.description,
            Node::Example(example) => &example.description,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Node::Group(group) => &group.location,
            Node::Example(example) => &example.location,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Group(group) => group.fmt(f),
            Node::Example(example) => example.fmt(f),
        }
    }
}

/// A named, ordered collection of groups and examples.
#[derive(Debug)]
pub struct Group {
    pub(crate) description: String,
    pub(crate) location: Location,
    pub(crate) children: Vec<Node>,
    pub(crate) hooks: HookSet,
}

impl Group {
    pub(crate) fn new(description: impl Into<String>, location: Location) -> Group {
        Group {
            description: description.into(),
            location,
            children: Vec::new(),
            hooks: HookSet::default(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }
}

/// A leaf test case.
pub struct Example {
    pub(crate) description: String,
    pub(crate) location: Location,
    /// `None` for pending examples.
    pub(crate) body: Option<Body>,
    pub(crate) status: Status,
    pub(crate) duration: Option<Duration>,
    pub(crate) failure: Option<Failure>,
}

impl Example {
    pub(crate) fn new(description: impl Into<String>, location: Location, body: Body) -> Example {
        Example {
            description: description.into(),
            location,
            body: Some(body),
            status: Status::Unrun,
            duration: None,
            failure: None,
        }
    }

    pub(crate) fn pending(description: impl Into<String>, location: Location) -> Example {
        Example {
            description: description.into(),
            location,
            body: None,
            status: Status::Pending,
            duration: None,
            failure: None,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_pending(&self) -> bool {
        self.body.is_none()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }
}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example")
            .field("description", &self.description)
            .field("location", &self.location)
            .field("pending", &self.is_pending())
            .field("status", &self.status)
            .field("duration", &self.duration)
            .field("failure", &self.failure)
            .finish()
    }
}

/// An example as listed by [`Suite::examples`](crate::Suite::examples).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleInfo {
    /// Group descriptions and the example's own, joined by spaces.
    pub description: String,
    pub location: Location,
    pub pending: bool,
}

/// Joins group descriptions and an example's own description with spaces,
/// skipping empty ones such as the implicit root group.
pub(crate) fn full_description<'a>(
    ancestors: impl IntoIterator<Item = &'a str>,
    own: &'a str,
) -> String {
    use itertools::Itertools;

    ancestors
        .into_iter()
        .chain(std::iter::once(own))
        .filter(|description| !description.is_empty())
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    use test_case::test_case;

    #[test_case(&[], "adds" => "adds"; "top level")]
    #[test_case(&["calc"], "adds" => "calc adds"; "one group")]
    #[test_case(&["", "calc", "integers"], "adds" => "calc integers adds"; "root and nested groups")]
    fn full_description(ancestors: &[&str], own: &str) -> String {
        super::full_description(ancestors.iter().copied(), own)
    }

    #[test]
    fn status_names() -> eyre::Result<()> {
        pretty_assertions::assert_eq!(Status::Fail.to_string(), "fail");
        pretty_assertions::assert_eq!(Status::from_str("pending")?, Status::Pending);
        assert!(Status::Error.is_failure());
        assert!(!Status::Pending.is_failure());
        Ok(())
    }
}
