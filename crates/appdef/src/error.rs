//! Error taxonomy shared by every builder operation and the build pipeline.
//!
//! Construction-time checks return a single [`Error`] immediately. Whole-graph checks run in
//! [`crate::AppDefBuilder::build`] and are collected into a [`BuildError`], which never stops at
//! the first violation.

use std::fmt;

use crate::{QName, Type};

/// Coarse error category, used for `is`-style matching independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// A required value or name is absent.
	Missed,
	/// A value is present but malformed.
	Invalid,
	/// A uniqueness constraint is violated.
	AlreadyExists,
	/// A referenced name does not resolve.
	NotFound,
	/// Two otherwise valid values can not be combined.
	Incompatible,
	/// The operation is not defined for this kind at all.
	Unsupported,
	/// A numeric value lies outside a hard limit.
	OutOfBounds,
	/// A count limit is exceeded.
	TooMany,
	/// A string can not be converted to a structured value.
	Convert,
}

/// A single definition error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("missed: {0}")]
	Missed(String),
	#[error("invalid: {0}")]
	Invalid(String),
	#[error("already exists: {0}")]
	AlreadyExists(String),
	#[error("not found: {0}")]
	NotFound(String),
	#[error("incompatible: {0}")]
	Incompatible(String),
	#[error("unsupported: {0}")]
	Unsupported(String),
	#[error("out of bounds: {0}")]
	OutOfBounds(String),
	#[error("too many: {0}")]
	TooMany(String),
	#[error("convert error: {0}")]
	Convert(String),
}

impl Error {
	/// Returns the category of this error.
	pub const fn kind(&self) -> ErrorKind {
		match self {
			Self::Missed(_) => ErrorKind::Missed,
			Self::Invalid(_) => ErrorKind::Invalid,
			Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
			Self::NotFound(_) => ErrorKind::NotFound,
			Self::Incompatible(_) => ErrorKind::Incompatible,
			Self::Unsupported(_) => ErrorKind::Unsupported,
			Self::OutOfBounds(_) => ErrorKind::OutOfBounds,
			Self::TooMany(_) => ErrorKind::TooMany,
			Self::Convert(_) => ErrorKind::Convert,
		}
	}

	/// Returns true if this error is of the given kind.
	pub fn is(&self, kind: ErrorKind) -> bool {
		self.kind() == kind
	}

	pub(crate) fn field_not_found(name: &str) -> Self {
		Self::NotFound(format!("field «{name}»"))
	}

	pub(crate) fn filter_has_no_matches(filter: impl fmt::Display, ws: &QName) -> Self {
		Self::NotFound(format!("filter «{filter}» has no matches in workspace «{ws}»"))
	}

	pub(crate) fn acl_unsupported_type(t: &Type) -> Self {
		Self::Unsupported(format!("ACL on type {t}"))
	}
}

/// Aggregated result of a failed [`crate::AppDefBuilder::build`].
///
/// Holds every independent violation found by the validation pass, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildError {
	errors: Vec<Error>,
}

impl BuildError {
	pub(crate) fn new(errors: Vec<Error>) -> Self {
		Self { errors }
	}

	/// Returns all collected errors.
	pub fn errors(&self) -> &[Error] {
		&self.errors
	}

	/// Returns true if any collected error is of the given kind.
	pub fn has(&self, kind: ErrorKind) -> bool {
		self.errors.iter().any(|e| e.is(kind))
	}

	/// Returns true if any collected error of the given kind mentions `text`.
	pub fn has_with(&self, kind: ErrorKind, text: &str) -> bool {
		self.errors
			.iter()
			.any(|e| e.is(kind) && e.to_string().contains(text))
	}

	/// Returns true if the joined message contains `text`.
	pub fn contains(&self, text: &str) -> bool {
		self.errors.iter().any(|e| e.to_string().contains(text))
	}
}

impl fmt::Display for BuildError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, err) in self.errors.iter().enumerate() {
			if i > 0 {
				f.write_str("\n")?;
			}
			write!(f, "{err}")?;
		}
		Ok(())
	}
}

impl std::error::Error for BuildError {}

impl From<Error> for BuildError {
	fn from(err: Error) -> Self {
		Self { errors: vec![err] }
	}
}
