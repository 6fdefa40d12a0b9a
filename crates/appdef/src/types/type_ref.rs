use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{Type, TypeId, Types};
use crate::QName;

/// Named reference to another type, resolved through the registry on demand.
///
/// The last resolution is cached by arena index. A cached index is only trusted while the type
/// at that index still carries the referenced name.
pub struct TypeRef {
	name: QName,
	/// Cached `TypeId + 1`, zero when empty.
	cached: AtomicU32,
}

impl TypeRef {
	pub fn new(name: QName) -> Self {
		Self {
			name,
			cached: AtomicU32::new(0),
		}
	}

	pub fn name(&self) -> &QName {
		&self.name
	}

	/// Points the reference at another name. The cache goes stale and is refreshed on the next
	/// resolution.
	#[cfg(test)]
	pub(crate) fn set_name(&mut self, name: QName) {
		self.name = name;
	}

	/// Resolves the referenced type.
	pub fn target<'a>(&self, types: &'a Types) -> Option<&'a Type> {
		let cached = self.cached.load(Ordering::Relaxed);
		if cached != 0
			&& let Some(t) = types.at_checked(TypeId(cached - 1))
			&& t.name == self.name
		{
			return Some(t);
		}

		let id = types.id(&self.name)?;
		self.cached.store(id.0 + 1, Ordering::Relaxed);
		Some(types.at(id))
	}

	#[cfg(test)]
	pub(crate) fn cached_id(&self) -> Option<TypeId> {
		match self.cached.load(Ordering::Relaxed) {
			0 => None,
			n => Some(TypeId(n - 1)),
		}
	}
}

impl Clone for TypeRef {
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			cached: AtomicU32::new(self.cached.load(Ordering::Relaxed)),
		}
	}
}

impl PartialEq for TypeRef {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl fmt::Debug for TypeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TypeRef").field(&self.name).finish()
	}
}
