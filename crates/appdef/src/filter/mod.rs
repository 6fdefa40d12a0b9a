//! Predicates over types, used to select ACL resources, projector triggers and limit targets.
//!
//! A filter stores no match results. Every evaluation runs against the registry as it is at
//! that moment, so a filter declared before its targets matches them once they exist.

use std::fmt;

use itertools::Itertools;

use crate::{Error, FilterKind, QName, QNames, Type, TypeKind, TypeKindSet, Types};

#[cfg(test)]
mod tests;

/// A predicate over types.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
	/// Matches every type.
	True,
	/// Matches types with one of the names.
	QNames(QNames),
	/// Matches types carrying any of the tags.
	Tags(QNames),
	/// Matches non-system types of the kinds, optionally only those visible in a workspace.
	Types { workspace: Option<QName>, kinds: TypeKindSet },
	And(Vec<Filter>),
	Or(Vec<Filter>),
	Not(Box<Filter>),
}

impl Filter {
	/// Matches every type.
	pub fn truth() -> Self {
		Self::True
	}

	/// Matches types by name.
	pub fn qnames<'a>(names: impl IntoIterator<Item = &'a QName>) -> Result<Self, Error> {
		let names: QNames = names.into_iter().collect();
		if names.is_empty() {
			return Err(Error::Missed("filter names".into()));
		}
		Ok(Self::QNames(names))
	}

	/// Matches types by tag.
	pub fn tags<'a>(tags: impl IntoIterator<Item = &'a QName>) -> Result<Self, Error> {
		let tags: QNames = tags.into_iter().collect();
		if tags.is_empty() {
			return Err(Error::Missed("filter tags".into()));
		}
		Ok(Self::Tags(tags))
	}

	/// Matches non-system types of the kinds anywhere in the application.
	pub fn types(kinds: impl IntoIterator<Item = TypeKind>) -> Self {
		Self::Types {
			workspace: None,
			kinds: kinds.into_iter().collect(),
		}
	}

	/// Matches non-system types of the kinds visible in workspace `ws`.
	pub fn ws_types(ws: &QName, kinds: impl IntoIterator<Item = TypeKind>) -> Result<Self, Error> {
		if ws.is_null() {
			return Err(Error::Missed("filter workspace".into()));
		}
		Ok(Self::Types {
			workspace: Some(ws.clone()),
			kinds: kinds.into_iter().collect(),
		})
	}

	/// Matches types that every child filter matches. At least two children are required.
	pub fn and(children: impl IntoIterator<Item = Filter>) -> Result<Self, Error> {
		let children: Vec<Filter> = children.into_iter().collect();
		if children.len() < 2 {
			return Err(Error::Missed("filters to conjoin, at least two are required".into()));
		}
		Ok(Self::And(children))
	}

	/// Matches types that any child filter matches. At least two children are required.
	pub fn or(children: impl IntoIterator<Item = Filter>) -> Result<Self, Error> {
		let children: Vec<Filter> = children.into_iter().collect();
		if children.len() < 2 {
			return Err(Error::Missed("filters to disjoin, at least two are required".into()));
		}
		Ok(Self::Or(children))
	}

	#[allow(clippy::should_implement_trait)]
	pub fn not(filter: Filter) -> Self {
		Self::Not(Box::new(filter))
	}

	/// All documents, records and objects.
	pub fn all_tables() -> Self {
		Self::Types {
			workspace: None,
			kinds: TypeKindSet::STRUCTURES,
		}
	}

	/// All commands and queries.
	pub fn all_functions() -> Self {
		Self::Types {
			workspace: None,
			kinds: TypeKindSet::FUNCTIONS,
		}
	}

	/// All documents, records and objects visible in `ws`.
	pub fn all_ws_tables(ws: &QName) -> Result<Self, Error> {
		Self::ws_types(ws, TypeKindSet::STRUCTURES.kinds())
	}

	/// All commands and queries visible in `ws`.
	pub fn all_ws_functions(ws: &QName) -> Result<Self, Error> {
		Self::ws_types(ws, TypeKindSet::FUNCTIONS.kinds())
	}

	pub fn kind(&self) -> FilterKind {
		match self {
			Self::True => FilterKind::True,
			Self::QNames(_) => FilterKind::QNames,
			Self::Tags(_) => FilterKind::Tags,
			Self::Types { .. } => FilterKind::Types,
			Self::And(_) => FilterKind::And,
			Self::Or(_) => FilterKind::Or,
			Self::Not(_) => FilterKind::Not,
		}
	}

	/// Names of a `QNames` filter.
	pub fn qname_set(&self) -> Option<&QNames> {
		match self {
			Self::QNames(n) => Some(n),
			_ => None,
		}
	}

	/// Tags of a `Tags` filter.
	pub fn tag_set(&self) -> Option<&QNames> {
		match self {
			Self::Tags(n) => Some(n),
			_ => None,
		}
	}

	/// Kinds of a `Types` filter, in declaration order.
	pub fn type_kinds(&self) -> Vec<TypeKind> {
		match self {
			Self::Types { kinds, .. } => kinds.to_vec(),
			_ => Vec::new(),
		}
	}

	/// Workspace of a workspace-scoped `Types` filter.
	pub fn workspace(&self) -> Option<&QName> {
		match self {
			Self::Types { workspace, .. } => workspace.as_ref(),
			_ => None,
		}
	}

	/// Children of `And`, `Or` and `Not` filters.
	pub fn children(&self) -> &[Filter] {
		match self {
			Self::And(c) | Self::Or(c) => c,
			Self::Not(c) => std::slice::from_ref(c),
			_ => &[],
		}
	}

	/// Returns true if `t` satisfies this filter.
	pub fn matches(&self, t: &Type, types: &Types) -> bool {
		match self {
			Self::True => true,
			Self::QNames(names) => names.contains(t.name()),
			Self::Tags(tags) => t.tags().iter().any(|tag| tags.contains(tag)),
			Self::Types { workspace, kinds } => {
				if t.is_system() || !kinds.has(t.kind()) {
					return false;
				}
				match workspace {
					None => true,
					Some(ws) => crate::workspace::is_visible_in(types, ws, t),
				}
			}
			Self::And(children) => children.iter().all(|f| f.matches(t, types)),
			Self::Or(children) => children.iter().any(|f| f.matches(t, types)),
			Self::Not(child) => !child.matches(t, types),
		}
	}
}

impl fmt::Display for Filter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::True => f.write_str("TRUE"),
			Self::QNames(names) => write!(f, "QNAMES({names})"),
			Self::Tags(tags) => write!(f, "TAGS({tags})"),
			Self::Types { workspace, kinds } => {
				if *kinds == TypeKindSet::STRUCTURES {
					f.write_str("ALL TABLES")?;
				} else if *kinds == TypeKindSet::FUNCTIONS {
					f.write_str("ALL FUNCTIONS")?;
				} else {
					write!(f, "TYPES({})", kinds.kinds().map(TypeKind::trim_string).join(", "))?;
				}
				if let Some(ws) = workspace {
					write!(f, " FROM {ws}")?;
				}
				Ok(())
			}
			Self::And(children) => write!(f, "{}", children.iter().map(|c| format!("({c})")).join(" AND ")),
			Self::Or(children) => write!(f, "{}", children.iter().map(|c| format!("({c})")).join(" OR ")),
			Self::Not(child) => write!(f, "NOT ({child})"),
		}
	}
}

/// Returns all types of `candidates` that `filter` matches, preserving candidate order.
pub fn filter_matches<'a>(
	filter: &Filter,
	candidates: impl IntoIterator<Item = &'a Type>,
	types: &Types,
) -> Vec<&'a Type> {
	candidates.into_iter().filter(|t| filter.matches(t, types)).collect()
}

/// Returns the first type of `candidates` that `filter` matches.
pub fn first_filter_match<'a>(
	filter: &Filter,
	candidates: impl IntoIterator<Item = &'a Type>,
	types: &Types,
) -> Option<&'a Type> {
	candidates.into_iter().find(|t| filter.matches(t, types))
}
