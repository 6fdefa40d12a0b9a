//! Package-qualified names and identifier rules.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::{Error, MAX_IDENT_LEN, SYS_PACKAGE};

#[cfg(test)]
mod tests;

/// Separator between package and entity parts.
pub const QNAME_QUALIFIER: char = '.';

/// Package-qualified name `(pkg, entity)`.
///
/// Ordering is lexicographic by package, then by entity. The empty pair is [`QName::NULL`] and
/// denotes "no type".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
	pkg: String,
	entity: String,
}

impl QName {
	/// The null name.
	pub const NULL: QName = QName {
		pkg: String::new(),
		entity: String::new(),
	};

	pub fn new(pkg: impl Into<String>, entity: impl Into<String>) -> Self {
		Self {
			pkg: pkg.into(),
			entity: entity.into(),
		}
	}

	/// Shorthand for a name in the `sys` package.
	pub fn sys(entity: impl Into<String>) -> Self {
		Self::new(SYS_PACKAGE, entity)
	}

	/// Parses `pkg.entity`. Exactly one qualifier is required.
	pub fn parse(s: &str) -> Result<Self, Error> {
		let (pkg, entity) = split_qualified(s)?;
		Ok(Self::new(pkg, entity))
	}

	pub fn pkg(&self) -> &str {
		&self.pkg
	}

	pub fn entity(&self) -> &str {
		&self.entity
	}

	pub fn is_null(&self) -> bool {
		self.pkg.is_empty() && self.entity.is_empty()
	}

	pub fn is_sys(&self) -> bool {
		self.pkg == SYS_PACKAGE
	}
}

impl fmt::Display for QName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{QNAME_QUALIFIER}{}", self.pkg, self.entity)
	}
}

impl FromStr for QName {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

fn split_qualified(s: &str) -> Result<(&str, &str), Error> {
	let mut parts = s.split(QNAME_QUALIFIER);
	match (parts.next(), parts.next(), parts.next()) {
		(Some(pkg), Some(entity), None) => Ok((pkg, entity)),
		_ => Err(Error::Convert(format!("invalid string representation of qualified name «{s}»"))),
	}
}

/// Builds the name of a unique constraint declared on `doc`.
pub fn unique_qname(doc: &QName, name: &str) -> QName {
	QName::new(doc.pkg(), format!("{}$uniques${name}", doc.entity()))
}

/// Sorted, duplicate-free set of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QNames(Vec<QName>);

impl QNames {
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	/// Inserts a name, keeping the set sorted. Returns false if already present.
	pub fn add(&mut self, name: QName) -> bool {
		match self.0.binary_search(&name) {
			Ok(_) => false,
			Err(pos) => {
				self.0.insert(pos, name);
				true
			}
		}
	}

	pub fn contains(&self, name: &QName) -> bool {
		self.0.binary_search(name).is_ok()
	}

	/// Returns the position of `name`, if present.
	pub fn find(&self, name: &QName) -> Option<usize> {
		self.0.binary_search(name).ok()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, QName> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn first(&self) -> Option<&QName> {
		self.0.first()
	}

	pub fn as_slice(&self) -> &[QName] {
		&self.0
	}
}

impl FromIterator<QName> for QNames {
	fn from_iter<I: IntoIterator<Item = QName>>(iter: I) -> Self {
		let mut names: Vec<QName> = iter.into_iter().collect();
		names.sort();
		names.dedup();
		Self(names)
	}
}

impl<'a> FromIterator<&'a QName> for QNames {
	fn from_iter<I: IntoIterator<Item = &'a QName>>(iter: I) -> Self {
		iter.into_iter().cloned().collect()
	}
}

impl<'a> IntoIterator for &'a QNames {
	type Item = &'a QName;
	type IntoIter = std::slice::Iter<'a, QName>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl fmt::Display for QNames {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.iter().join(", "))
	}
}

/// Name keyed by package path rather than local alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FullQName {
	pkg_path: String,
	entity: String,
}

impl FullQName {
	pub const NULL: FullQName = FullQName {
		pkg_path: String::new(),
		entity: String::new(),
	};

	pub fn new(pkg_path: impl Into<String>, entity: impl Into<String>) -> Self {
		Self {
			pkg_path: pkg_path.into(),
			entity: entity.into(),
		}
	}

	/// Parses `path.entity`, splitting on the last qualifier so paths may contain dots.
	pub fn parse(s: &str) -> Result<Self, Error> {
		match s.rsplit_once(QNAME_QUALIFIER) {
			Some((path, entity)) if !path.is_empty() || !entity.is_empty() => Ok(Self::new(path, entity)),
			Some(_) => Ok(Self::NULL),
			None => Err(Error::Convert(format!("invalid string representation of full qualified name «{s}»"))),
		}
	}

	pub fn pkg_path(&self) -> &str {
		&self.pkg_path
	}

	pub fn entity(&self) -> &str {
		&self.entity
	}

	pub fn is_null(&self) -> bool {
		self.pkg_path.is_empty() && self.entity.is_empty()
	}
}

impl fmt::Display for FullQName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{QNAME_QUALIFIER}{}", self.pkg_path, self.entity)
	}
}

impl FromStr for FullQName {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Checks that `ident` is an identifier: ASCII letter or `_` first, then letters, digits, `_`
/// or `$`, at most [`MAX_IDENT_LEN`] bytes.
pub fn valid_ident(ident: &str) -> Result<(), Error> {
	let mut chars = ident.chars();
	let Some(first) = chars.next() else {
		return Err(Error::Missed("identifier".into()));
	};
	if ident.len() > MAX_IDENT_LEN {
		return Err(Error::TooMany(format!(
			"identifier «{ident}» is too long, maximum is {MAX_IDENT_LEN}"
		)));
	}
	if !(first.is_ascii_alphabetic() || first == '_') {
		return Err(Error::Invalid(format!("identifier «{ident}» has invalid first char «{first}»")));
	}
	if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$')) {
		return Err(Error::Invalid(format!("identifier «{ident}» has invalid char «{c}»")));
	}
	Ok(())
}

/// Checks both parts of a name. [`QName::NULL`] is valid.
pub fn valid_qname(name: &QName) -> Result<(), Error> {
	if name.is_null() {
		return Ok(());
	}
	valid_ident(name.pkg())
		.and_then(|()| valid_ident(name.entity()))
		.map_err(|err| Error::Invalid(format!("qualified name «{name}»: {err}")))
}
