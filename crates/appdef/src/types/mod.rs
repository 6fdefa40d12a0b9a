//! Type nodes and the registry that owns them.
//!
//! # Purpose
//!
//! Every declared entity of an application (data type, document, view, function, role, rate,
//! ...) is a [`Type`] addressed by a globally unique [`QName`]. The [`Types`] registry is the
//! single source of truth for "does a type with this name exist, and what is it".
//!
//! # Mental Model
//!
//! - Types live in an arena and are addressed by [`TypeId`]. Ids are never reused and never
//!   invalidated because types are never removed.
//! - A [`Type`] is a common header (name, kind, owning workspace, comment, tags) plus a
//!   [`TypeBody`] variant. Which parts a kind carries is declared by [`TypeKind::mixins`]
//!   rather than discovered at runtime.
//! - Cross-type edges are [`TypeRef`] name cells resolved through the registry on demand, so
//!   forward references are legal during construction.
//!
//! # Invariants
//!
//! - Must keep names unique across the whole application.
//!   - Enforced in: [`Types::insert`]
//!   - Tested by: [`crate::invariants::test_type_names_unique`]
//!   - Failure symptom: Two definitions shadow each other in lookups.
//!
//! - Must enumerate types in ascending name order.
//!   - Enforced in: [`Types::insert`] (sorted order vector)
//!   - Tested by: [`crate::invariants::test_types_sorted`]
//!   - Failure symptom: Non-deterministic rule or limit enumeration downstream.
//!
//! - Must invalidate a cached reference whose target name no longer matches.
//!   - Enforced in: [`TypeRef::target`]
//!   - Tested by: [`crate::types::tests::test_type_ref_stale_cache`]
//!   - Failure symptom: A reference resolves to an unrelated type.

use std::fmt;

use crate::{
	Data, Error, Function, Job, Limit, Projector, QName, QNames, Rate, Structure, Tag, TypeKind,
	TypeKindSet, View, Workspace,
};

mod registry;
mod type_ref;

pub use registry::{FindType, TypeId, Types};
pub use type_ref::TypeRef;

bitflags::bitflags! {
	/// Structural parts a type kind carries.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Mixins: u8 {
		/// Named fields, including injected system fields.
		const FIELDS = 1 << 0;
		/// Nested child types.
		const CONTAINERS = 1 << 1;
		/// Unique field combinations.
		const UNIQUES = 1 << 2;
		/// Engine kind and extension name.
		const EXTENSION = 1 << 3;
		/// State and intent storages.
		const STORAGES = 1 << 4;
	}
}

impl TypeKind {
	/// Returns the structural parts carried by types of this kind.
	pub const fn mixins(self) -> Mixins {
		match self {
			Self::GDoc
			| Self::CDoc
			| Self::WDoc
			| Self::ODoc
			| Self::GRecord
			| Self::CRecord
			| Self::WRecord
			| Self::ORecord
			| Self::Object => Mixins::FIELDS.union(Mixins::CONTAINERS).union(Mixins::UNIQUES),
			Self::ViewRecord => Mixins::FIELDS,
			Self::Query | Self::Command => Mixins::EXTENSION,
			Self::Projector | Self::Job => Mixins::EXTENSION.union(Mixins::STORAGES),
			_ => Mixins::empty(),
		}
	}

	/// Returns true if this kind belongs to `set`.
	pub const fn is_in(self, set: TypeKindSet) -> bool {
		set.has(self)
	}
}

/// Kind-specific payload of a [`Type`].
#[derive(Debug, Clone)]
pub enum TypeBody {
	/// Kinds without payload: null, any, role.
	Empty,
	Data(Data),
	Structure(Structure),
	View(View),
	Function(Function),
	Projector(Projector),
	Job(Job),
	Workspace(Workspace),
	Rate(Rate),
	Limit(Limit),
	Tag(Tag),
}

/// A node of the application graph.
#[derive(Debug, Clone)]
pub struct Type {
	pub(crate) name: QName,
	pub(crate) kind: TypeKind,
	pub(crate) workspace: QName,
	pub(crate) comment: Option<String>,
	pub(crate) tags: QNames,
	pub(crate) body: TypeBody,
}

/// Returned by lookups that never fail.
pub static NULL_TYPE: Type = Type {
	name: QName::NULL,
	kind: TypeKind::Null,
	workspace: QName::NULL,
	comment: None,
	tags: QNames::new(),
	body: TypeBody::Empty,
};

macro_rules! body_accessors {
	($($fn:ident, $fn_mut:ident => $variant:ident($ty:ty);)*) => {
		$(
			pub fn $fn(&self) -> Option<&$ty> {
				match &self.body {
					TypeBody::$variant(v) => Some(v),
					_ => None,
				}
			}

			pub(crate) fn $fn_mut(&mut self) -> Option<&mut $ty> {
				match &mut self.body {
					TypeBody::$variant(v) => Some(v),
					_ => None,
				}
			}
		)*
	};
}

impl Type {
	pub(crate) fn new(name: QName, kind: TypeKind, workspace: QName, body: TypeBody) -> Self {
		Self {
			name,
			kind,
			workspace,
			comment: None,
			tags: QNames::new(),
			body,
		}
	}

	pub fn name(&self) -> &QName {
		&self.name
	}

	pub fn kind(&self) -> TypeKind {
		self.kind
	}

	/// Name of the workspace that owns this type.
	pub fn workspace(&self) -> &QName {
		&self.workspace
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub fn tags(&self) -> &QNames {
		&self.tags
	}

	pub fn has_tag(&self, tag: &QName) -> bool {
		self.tags.contains(tag)
	}

	/// Returns true for the null sentinel.
	pub fn is_null(&self) -> bool {
		self.kind == TypeKind::Null
	}

	/// Returns true for built-in types of the `sys` package.
	pub fn is_system(&self) -> bool {
		self.name.is_sys()
	}

	pub fn body(&self) -> &TypeBody {
		&self.body
	}

	body_accessors! {
		as_data, as_data_mut => Data(Data);
		as_structure, as_structure_mut => Structure(Structure);
		as_view, as_view_mut => View(View);
		as_function, as_function_mut => Function(Function);
		as_projector, as_projector_mut => Projector(Projector);
		as_job, as_job_mut => Job(Job);
		as_workspace, as_workspace_mut => Workspace(Workspace);
		as_rate, as_rate_mut => Rate(Rate);
		as_limit, as_limit_mut => Limit(Limit);
		as_tag, as_tag_mut => Tag(Tag);
	}

	/// Returns the fields of structures and views.
	pub fn fields(&self) -> Option<&crate::Fields> {
		match &self.body {
			TypeBody::Structure(s) => Some(s.fields()),
			TypeBody::View(v) => Some(v.fields()),
			_ => None,
		}
	}

	pub(crate) fn fields_mut(&mut self) -> Option<&mut crate::Fields> {
		match &mut self.body {
			TypeBody::Structure(s) => Some(&mut s.fields),
			TypeBody::View(v) => Some(&mut v.fields),
			_ => None,
		}
	}

	/// Returns the extension header of functions, projectors and jobs.
	pub fn extension(&self) -> Option<&crate::Extension> {
		match &self.body {
			TypeBody::Function(f) => Some(&f.ext),
			TypeBody::Projector(p) => Some(&p.ext),
			TypeBody::Job(j) => Some(&j.ext),
			_ => None,
		}
	}

	pub(crate) fn extension_mut(&mut self) -> Option<&mut crate::Extension> {
		match &mut self.body {
			TypeBody::Function(f) => Some(&mut f.ext),
			TypeBody::Projector(p) => Some(&mut p.ext),
			TypeBody::Job(j) => Some(&mut j.ext),
			_ => None,
		}
	}
}

impl PartialEq for Type {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name && self.kind == other.kind
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(ext) = self.extension() {
			write!(f, "{}-", ext.engine().trim_string())?;
		}
		write!(f, "{} «{}»", self.kind.trim_string(), self.name)
	}
}

/// Checks that `name` can identify a new type.
pub(crate) fn check_type_name(name: &QName) -> Result<(), Error> {
	if name.is_null() {
		return Err(Error::Missed("type name".into()));
	}
	crate::valid_qname(name)
}
