//! Example selection.
//!
//! A run evaluates exactly one rule, chosen by [`Selection`]. Each example is
//! judged on its own full description and location only; the group around it
//! plays no part, so a target line on a group's header or closing line
//! selects nothing.

use std::{path::PathBuf, str::FromStr};

use crate::{Error, Location};

/// Example filter trait.
pub trait Filter {
    fn filter(&self, description: &str, location: &Location) -> bool;
}

/// Filter examples by a substring of their full description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionFilter {
    pattern: String,
}

impl DescriptionFilter {
    pub fn new(pattern: impl Into<String>) -> DescriptionFilter {
        DescriptionFilter {
            pattern: pattern.into(),
        }
    }
}

impl Filter for DescriptionFilter {
    fn filter(&self, description: &str, _location: &Location) -> bool {
        description.contains(&self.pattern)
    }
}

/// Filter examples by a line anywhere within their source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFilter {
    file: PathBuf,
    line: u32,
}

impl LocationFilter {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> LocationFilter {
        LocationFilter {
            file: file.into(),
            line,
        }
    }
}

impl Filter for LocationFilter {
    fn filter(&self, _description: &str, location: &Location) -> bool {
        location.is_in(&self.file) && location.contains(self.line)
    }
}

impl FromStr for LocationFilter {
    type Err = Error;

    /// Parses `FILE:LINE`.
    fn from_str(s: &str) -> Result<LocationFilter, Error> {
        let invalid = || Error::InvalidLocation(s.to_string());
        let (file, line) = s.rsplit_once(':').ok_or_else(invalid)?;
        if file.is_empty() {
            return Err(invalid());
        }
        let line = line.trim().parse().map_err(|_| invalid())?;
        Ok(LocationFilter::new(file, line))
    }
}

/// The filter active for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Description(DescriptionFilter),
    Location(LocationFilter),
}

impl Selection {
    pub fn description(pattern: impl Into<String>) -> Selection {
        Selection::Description(DescriptionFilter::new(pattern))
    }

    pub fn location(file: impl Into<PathBuf>, line: u32) -> Selection {
        Selection::Location(LocationFilter::new(file, line))
    }
}

impl Filter for Selection {
    fn filter(&self, description: &str, location: &Location) -> bool {
        match self {
            Selection::All => true,
            Selection::Description(filter) => filter.filter(description, location),
            Selection::Location(filter) => filter.filter(description, location),
        }
    }
}

/// Whether an example with `description` declared at `location` runs under
/// `selection`.
pub fn matches(description: &str, location: &Location, selection: &Selection) -> bool {
    selection.filter(description, location)
}
