//! Package table: the bijection between local package aliases and package paths.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap as HashMap;

use crate::{Error, FullQName, QName, SYS_PACKAGE, SYS_PACKAGE_PATH};

#[cfg(test)]
mod tests;

/// Local aliases and full paths of the packages an application uses.
///
/// The `sys` package is always present.
#[derive(Debug, Clone)]
pub struct Packages {
	/// Local alias to path, sorted by alias.
	local: BTreeMap<String, String>,
	path: HashMap<String, String>,
}

impl Default for Packages {
	fn default() -> Self {
		let mut p = Self {
			local: BTreeMap::new(),
			path: HashMap::default(),
		};
		p.local.insert(SYS_PACKAGE.to_owned(), SYS_PACKAGE_PATH.to_owned());
		p.path.insert(SYS_PACKAGE_PATH.to_owned(), SYS_PACKAGE.to_owned());
		p
	}
}

impl Packages {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `local` as the alias of package `path`.
	///
	/// Fails with `Missed`/`Invalid` on a bad alias, `Missed` on an empty path and
	/// `AlreadyExists` if either side is already taken.
	pub(crate) fn add(&mut self, local: &str, path: &str) -> Result<(), Error> {
		crate::valid_ident(local)?;
		if path.is_empty() {
			return Err(Error::Missed(format!("path of package «{local}»")));
		}
		if let Some(p) = self.local.get(local) {
			return Err(Error::AlreadyExists(format!("package «{local}» already exists with path «{p}»")));
		}
		if let Some(l) = self.path.get(path) {
			return Err(Error::AlreadyExists(format!("package path «{path}» already used by «{l}»")));
		}
		tracing::trace!(local, path, "package registered");
		self.local.insert(local.to_owned(), path.to_owned());
		self.path.insert(path.to_owned(), local.to_owned());
		Ok(())
	}

	/// Returns the local alias of `path`.
	pub fn local_by_path(&self, path: &str) -> Option<&str> {
		self.path.get(path).map(String::as_str)
	}

	/// Returns the path of alias `local`.
	pub fn path_by_local(&self, local: &str) -> Option<&str> {
		self.local.get(local).map(String::as_str)
	}

	/// Converts a local name to a full one. Unknown packages give [`FullQName::NULL`].
	pub fn full_qname(&self, name: &QName) -> FullQName {
		match self.path_by_local(name.pkg()) {
			Some(path) => FullQName::new(path, name.entity()),
			None => FullQName::NULL,
		}
	}

	/// Converts a full name to a local one. Unknown paths give [`QName::NULL`].
	pub fn local_qname(&self, name: &FullQName) -> QName {
		match self.local_by_path(name.pkg_path()) {
			Some(local) => QName::new(local, name.entity()),
			None => QName::NULL,
		}
	}

	/// Iterates `(alias, path)` pairs sorted by alias.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.local.iter().map(|(l, p)| (l.as_str(), p.as_str()))
	}

	/// Local aliases, sorted.
	pub fn locals(&self) -> impl Iterator<Item = &str> {
		self.local.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.local.len()
	}

	pub fn is_empty(&self) -> bool {
		self.local.is_empty()
	}
}
