//! Build-time validation of navigation trees.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::entry::NavEntry;
use crate::route::{RouteLink, RoutePath, Target};

/// Navigation configuration error.
///
/// Raised by [`validate`] at build time only. A tree that passed validation
/// is never re-checked during navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two leaves share a route but are bound to different page records.
    #[error("duplicate route {route}: linked as both {first} and {second}")]
    DuplicateRoute {
        /// The shared route.
        route: RoutePath,
        /// Record bound by the first occurrence.
        first: String,
        /// Record bound by the conflicting occurrence.
        second: String,
    },
    /// A group has no children.
    #[error("navigation group \"{label}\" has no entries")]
    EmptyGroup {
        /// Label of the group.
        label: String,
    },
    /// A leaf has no link.
    #[error("navigation entry \"{label}\" has no link")]
    MissingTarget {
        /// Label of the entry.
        label: String,
    },
}

/// Out-of-band lookup from a site link to the page record it would show.
///
/// Implemented by the build's content index. Returns the record identity
/// (its relative source path), or `None` when the link is not bound.
pub trait RecordBinding {
    /// Record identity for `link`.
    fn record_for(&self, link: &RouteLink) -> Option<String>;
}

impl<F> RecordBinding for F
where
    F: Fn(&RouteLink) -> Option<String>,
{
    fn record_for(&self, link: &RouteLink) -> Option<String> {
        self(link)
    }
}

/// Validate a navigation tree.
///
/// Walks the tree depth-first and reports the first problem found:
/// - [`ConfigError::EmptyGroup`] for a group without children
/// - [`ConfigError::MissingTarget`] for a leaf without a link
/// - [`ConfigError::DuplicateRoute`] for two leaves on the same route whose
///   links `binding` resolves to different records
///
/// Two leaves on the same route bound to the same record are aliases and
/// pass. External links are not checked.
pub fn validate(tree: &[NavEntry], binding: &impl RecordBinding) -> Result<(), ConfigError> {
    let mut seen = HashMap::new();
    validate_entries(tree, binding, &mut seen)
}

fn validate_entries(
    entries: &[NavEntry],
    binding: &impl RecordBinding,
    seen: &mut HashMap<RoutePath, Option<String>>,
) -> Result<(), ConfigError> {
    for entry in entries {
        match entry {
            NavEntry::Group(group) => {
                if group.children.is_empty() {
                    return Err(ConfigError::EmptyGroup {
                        label: group.label.clone(),
                    });
                }
                validate_entries(&group.children, binding, seen)?;
            }
            NavEntry::Leaf(leaf) => match &leaf.target {
                None => {
                    return Err(ConfigError::MissingTarget {
                        label: leaf.label.clone(),
                    });
                }
                Some(Target::External(_)) => {}
                Some(Target::Route(link)) => {
                    check_binding(link, binding, seen)?;
                }
            },
        }
    }
    Ok(())
}

fn check_binding(
    link: &RouteLink,
    binding: &impl RecordBinding,
    seen: &mut HashMap<RoutePath, Option<String>>,
) -> Result<(), ConfigError> {
    let record = binding.record_for(link);
    match seen.entry(link.path().clone()) {
        Entry::Vacant(slot) => {
            slot.insert(record);
        }
        Entry::Occupied(mut slot) => match (slot.get(), record) {
            (Some(first), Some(second)) if *first != second => {
                return Err(ConfigError::DuplicateRoute {
                    route: link.path().clone(),
                    first: first.clone(),
                    second,
                });
            }
            // Unbound links are dead links, reported elsewhere
            (None, Some(second)) => {
                slot.insert(Some(second));
            }
            _ => {}
        },
    }
    Ok(())
}
