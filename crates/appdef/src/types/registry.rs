use rustc_hash::FxHashMap as HashMap;

use super::{NULL_TYPE, Type, check_type_name};
use crate::{Error, QName, TypeKindSet};

/// Index of a type in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

/// Arena of every type in an application, indexed by name.
#[derive(Debug, Default, Clone)]
pub struct Types {
	arena: Vec<Type>,
	by_name: HashMap<QName, TypeId>,
	/// Ids sorted by type name.
	order: Vec<TypeId>,
}

impl Types {
	/// Registers a new type.
	///
	/// Fails with `Missed` on the null name, `Invalid` on a malformed one and `AlreadyExists`
	/// if the name is already taken anywhere in the application.
	pub(crate) fn insert(&mut self, t: Type) -> Result<TypeId, Error> {
		check_type_name(&t.name)?;
		if let Some(existing) = self.get(&t.name) {
			return Err(Error::AlreadyExists(format!("type «{}» already exists as {existing}", t.name)));
		}
		Ok(self.push(t))
	}

	/// Registers a built-in type. Its name must be well formed and not yet taken.
	pub(crate) fn push(&mut self, t: Type) -> TypeId {
		debug_assert!(check_type_name(&t.name).is_ok() && self.get(&t.name).is_none(), "{}", t.name);
		let id = TypeId(self.arena.len() as u32);
		let pos = self
			.order
			.partition_point(|other| self.arena[other.index()].name < t.name);
		tracing::trace!(r#type = %t.name, kind = ?t.kind, "type registered");
		self.by_name.insert(t.name.clone(), id);
		self.order.insert(pos, id);
		self.arena.push(t);
		id
	}

	/// Returns the type with `name`, if any.
	pub fn get(&self, name: &QName) -> Option<&Type> {
		self.id(name).map(|id| self.at(id))
	}

	pub fn id(&self, name: &QName) -> Option<TypeId> {
		self.by_name.get(name).copied()
	}

	pub(crate) fn at(&self, id: TypeId) -> &Type {
		&self.arena[id.index()]
	}

	pub(crate) fn at_checked(&self, id: TypeId) -> Option<&Type> {
		self.arena.get(id.index())
	}

	pub(crate) fn at_mut(&mut self, id: TypeId) -> &mut Type {
		&mut self.arena[id.index()]
	}

	pub fn len(&self) -> usize {
		self.arena.len()
	}

	pub fn is_empty(&self) -> bool {
		self.arena.is_empty()
	}

	/// Iterates all types in ascending name order.
	pub fn iter(&self) -> impl Iterator<Item = &Type> + Clone + '_ {
		self.order.iter().map(|id| self.at(*id))
	}

	/// Iterates types of the given kinds in ascending name order.
	pub fn of_kinds(&self, kinds: TypeKindSet) -> impl Iterator<Item = &Type> + Clone + '_ {
		self.iter().filter(move |t| kinds.has(t.kind))
	}

	/// Returns true if the order vector is sorted by name and covers the arena.
	pub(crate) fn is_consistent(&self) -> bool {
		self.order.len() == self.arena.len()
			&& self
				.order
				.windows(2)
				.all(|w| self.at(w[0]).name < self.at(w[1]).name)
	}
}

/// Read access to an application's types.
///
/// Implemented by the registry itself, by [`crate::AppDefBuilder`] and by the sealed
/// [`crate::AppDef`], so lookups read the same way before and after build.
pub trait FindType {
	fn types(&self) -> &Types;

	/// Returns the type with `name`, if any.
	fn type_by_name(&self, name: &QName) -> Option<&Type> {
		self.types().get(name)
	}

	/// Returns the type with `name`, or [`NULL_TYPE`] if there is none.
	fn type_of(&self, name: &QName) -> &Type {
		self.type_by_name(name).unwrap_or(&NULL_TYPE)
	}
}

impl FindType for Types {
	fn types(&self) -> &Types {
		self
	}
}
