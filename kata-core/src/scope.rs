//! What a running example can see.
//!
//! Hooks and example bodies receive a [`Scope`] rather than the registration
//! API, so they have no handle through which to declare further examples. A
//! body can still build a fresh [`Suite`](crate::Suite) of its own; for that
//! case the runner marks the thread as executing and every registration call
//! made meanwhile raises a [`ConfigurationError`].

use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    fmt,
};

use crate::{error::ConfigurationError, Location};

/// The example running on this thread, and the first registration it
/// attempted, if any.
struct Running {
    description: String,
    violation: Option<ConfigurationError>,
}

thread_local! {
    static RUNNING: RefCell<Option<Running>> = const { RefCell::new(None) };
}

/// Marks the current thread as executing an example until dropped.
pub(crate) struct ExecutionGuard {
    previous: Option<Running>,
}

impl ExecutionGuard {
    pub(crate) fn enter(description: &str) -> ExecutionGuard {
        let running = Running {
            description: description.to_string(),
            violation: None,
        };
        let previous = RUNNING.with(|cell| cell.replace(Some(running)));
        ExecutionGuard { previous }
    }

    /// The registration attempted while this guard was held, even when the
    /// unwind it started was caught by the example itself.
    pub(crate) fn take_violation(&self) -> Option<ConfigurationError> {
        RUNNING.with(|cell| {
            cell.borrow_mut()
                .as_mut()
                .and_then(|running| running.violation.take())
        })
    }
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        RUNNING.with(|cell| *cell.borrow_mut() = previous);
    }
}

/// Unwinds with a [`ConfigurationError`] payload when an example is running
/// on this thread.
///
/// The error is also recorded on the thread, so the runner aborts the run
/// even if the example catches the unwind. `resume_unwind` skips the panic
/// hook; nothing is printed for what is not a panic.
pub(crate) fn ensure_registration_allowed(registered: &str) {
    let err = RUNNING.with(|cell| {
        let mut cell = cell.borrow_mut();
        let running = cell.as_mut()?;
        let err = ConfigurationError {
            registered: registered.to_string(),
            running: running.description.clone(),
        };
        running.violation.get_or_insert_with(|| err.clone());
        Some(err)
    });
    if let Some(err) = err {
        std::panic::resume_unwind(Box::new(err));
    }
}

/// Capabilities of a running example.
pub struct Scope {
    description: String,
    location: Location,
    state: HashMap<TypeId, Box<dyn Any>>,
}

impl Scope {
    pub fn new(description: impl Into<String>, location: Location) -> Scope {
        Scope {
            description: description.into(),
            location,
            state: HashMap::new(),
        }
    }

    /// Full description of the running example, group descriptions included.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Fails the running example. See [`fail`](crate::assertion::fail).
    #[track_caller]
    pub fn fail(&self, message: impl Into<String>) -> eyre::Result<()> {
        crate::assertion::fail(message)
    }

    /// Fails the running example, blaming `location`.
    pub fn fail_at(&self, message: impl Into<String>, location: Location) -> eyre::Result<()> {
        crate::assertion::fail_at(message, location)
    }

    /// Stores a value for the rest of this example, replacing and returning
    /// any value of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        self.state
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.state
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.state
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>())
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.state
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("description", &self.description)
            .field("location", &self.location)
            .field("state", &self.state.len())
            .finish()
    }
}
