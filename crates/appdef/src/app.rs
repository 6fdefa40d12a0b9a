//! The sealed application definition.

use std::fmt;

use crate::builder::AppDefBuilder;
use crate::{
	AclRule, Data, FindType, Function, Job, Limit, Packages, Projector, QName, QNames, Rate, Structure, Tag,
	Type, TypeKindSet, Types, View, Workspace, role_ancestors,
};

/// A validated, immutable application definition.
///
/// Only [`AppDefBuilder::build`] creates one. It is `Send + Sync` and may be shared freely.
pub struct AppDef {
	packages: Packages,
	types: Types,
	acl: Vec<AclRule>,
}

impl AppDef {
	pub(crate) fn seal(app: AppDefBuilder) -> Self {
		Self {
			packages: app.packages,
			types: app.types,
			acl: app.acl,
		}
	}

	pub fn packages(&self) -> &Packages {
		&self.packages
	}

	/// Every type, sorted by name.
	pub fn iter(&self) -> impl Iterator<Item = &Type> + Clone + '_ {
		self.types.iter()
	}

	/// Types of `kinds`, sorted by name.
	pub fn types_of_kind(&self, kinds: TypeKindSet) -> impl Iterator<Item = &Type> + Clone + '_ {
		self.types.of_kinds(kinds)
	}

	/// Every ACL rule, in declaration order.
	pub fn acl(&self) -> &[AclRule] {
		&self.acl
	}

	fn of_kind(&self, name: &QName, kinds: TypeKindSet) -> Option<&Type> {
		self.types.get(name).filter(|t| kinds.has(t.kind()))
	}

	pub fn data(&self, name: &QName) -> Option<&Data> {
		self.types.get(name).and_then(Type::as_data)
	}

	/// Returns the document, record or object named `name`.
	pub fn structure(&self, name: &QName) -> Option<&Structure> {
		self.types.get(name).and_then(Type::as_structure)
	}

	pub fn gdoc(&self, name: &QName) -> Option<&Structure> {
		self.of_kind(name, TypeKindSet::GDOC).and_then(Type::as_structure)
	}

	pub fn cdoc(&self, name: &QName) -> Option<&Structure> {
		self.of_kind(name, TypeKindSet::CDOC).and_then(Type::as_structure)
	}

	pub fn wdoc(&self, name: &QName) -> Option<&Structure> {
		self.of_kind(name, TypeKindSet::WDOC).and_then(Type::as_structure)
	}

	pub fn odoc(&self, name: &QName) -> Option<&Structure> {
		self.of_kind(name, TypeKindSet::ODOC).and_then(Type::as_structure)
	}

	pub fn object(&self, name: &QName) -> Option<&Structure> {
		self.of_kind(name, TypeKindSet::OBJECT).and_then(Type::as_structure)
	}

	pub fn view(&self, name: &QName) -> Option<&View> {
		self.types.get(name).and_then(Type::as_view)
	}

	pub fn command(&self, name: &QName) -> Option<&Function> {
		self.of_kind(name, TypeKindSet::COMMAND).and_then(Type::as_function)
	}

	pub fn query(&self, name: &QName) -> Option<&Function> {
		self.of_kind(name, TypeKindSet::QUERY).and_then(Type::as_function)
	}

	pub fn projector(&self, name: &QName) -> Option<&Projector> {
		self.types.get(name).and_then(Type::as_projector)
	}

	pub fn job(&self, name: &QName) -> Option<&Job> {
		self.types.get(name).and_then(Type::as_job)
	}

	pub fn workspace(&self, name: &QName) -> Option<&Workspace> {
		self.types.get(name).and_then(Type::as_workspace)
	}

	pub fn rate(&self, name: &QName) -> Option<&Rate> {
		self.types.get(name).and_then(Type::as_rate)
	}

	pub fn limit(&self, name: &QName) -> Option<&Limit> {
		self.types.get(name).and_then(Type::as_limit)
	}

	pub fn tag(&self, name: &QName) -> Option<&Tag> {
		self.types.get(name).and_then(Type::as_tag)
	}

	pub fn role(&self, name: &QName) -> Option<Role<'_>> {
		self.of_kind(name, TypeKindSet::ROLE).map(|t| Role { app: self, t })
	}

	/// Roles, sorted by name.
	pub fn roles(&self) -> impl Iterator<Item = Role<'_>> {
		self.types.of_kinds(TypeKindSet::ROLE).map(move |t| Role { app: self, t })
	}

	/// Limits, sorted by name.
	pub fn limits(&self) -> impl Iterator<Item = (&QName, &Limit)> {
		self.types
			.of_kinds(TypeKindSet::LIMIT)
			.filter_map(|t| t.as_limit().map(|l| (t.name(), l)))
	}

	/// Rates, sorted by name.
	pub fn rates(&self) -> impl Iterator<Item = (&QName, &Rate)> {
		self.types
			.of_kinds(TypeKindSet::RATE)
			.filter_map(|t| t.as_rate().map(|r| (t.name(), r)))
	}
}

impl FindType for AppDef {
	fn types(&self) -> &Types {
		&self.types
	}
}

impl fmt::Debug for AppDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AppDef")
			.field("packages", &self.packages.len())
			.field("types", &self.types.len())
			.field("acl", &self.acl.len())
			.finish()
	}
}

/// A role of a sealed application, with its ACL view.
#[derive(Clone, Copy)]
pub struct Role<'a> {
	app: &'a AppDef,
	t: &'a Type,
}

impl<'a> Role<'a> {
	pub fn name(&self) -> &'a QName {
		self.t.name()
	}

	pub fn as_type(&self) -> &'a Type {
		self.t
	}

	/// Roles this role directly inherits.
	pub fn ancestors(&self) -> QNames {
		role_ancestors(self.t.name(), &self.app.acl, &self.app.types)
	}

	/// Rules whose principal is this role, in declaration order.
	pub fn acl(&self) -> impl Iterator<Item = &'a AclRule> + 'a {
		let name = self.t.name();
		self.app.acl.iter().filter(move |r| r.principal() == name)
	}
}

impl fmt::Debug for Role<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Role").field(self.t.name()).finish()
	}
}

impl fmt::Display for Role<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.t)
	}
}
