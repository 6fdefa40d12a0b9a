//! Mutable construction of an application definition.
//!
//! # Purpose
//!
//! [`AppDefBuilder`] is the open state of an application: packages, workspaces and types are
//! added through it and through the builders it hands out. [`AppDefBuilder::build`] consumes it
//! and returns either the sealed [`AppDef`] or every whole-graph violation at once.
//!
//! # Mental Model
//!
//! - Builders borrow the application mutably, so only one builder is live at a time and the
//!   sealed graph can never be reached through a stale builder.
//! - Local shape errors (bad names, duplicates, illegal kinds) are returned from the builder
//!   call that caused them. Callers stop building on the first `Err`.
//! - Anything that depends on types declared later is only checked by [`AppDefBuilder::build`].
//!
//! # Invariants
//!
//! - Must own every type by exactly one workspace.
//!   - Enforced in: `AppDefBuilder::add_type`
//!   - Tested by: [`crate::invariants::test_every_type_has_workspace`]
//!   - Failure symptom: Workspace enumeration misses types or ACL filters scope wrongly.
//!
//! - Must report every independent validation error, never only the first.
//!   - Enforced in: [`AppDefBuilder::build`]
//!   - Tested by: [`crate::invariants::test_build_errors_are_joined`]
//!   - Failure symptom: Fixing one error reveals another on the next build.

use std::sync::Arc;

use crate::extension::{CronValidator, sys_records_storage, sys_views_storage, sys_wlog_storage};
use crate::workspace::sys_workspace_name;
use crate::{
	AclRule, AppDef, Data, DataKind, Error, FindType, Packages, QName, QNames, Type, TypeBody, TypeId,
	TypeKind, Types, View, Workspace, any_qname,
};

mod build;
mod types;
mod workspace;

pub use types::{
	DataBuilder, FunctionBuilder, JobBuilder, ProjectorBuilder, RoleBuilder, StructureBuilder, TagBuilder,
	ViewBuilder,
};
pub use workspace::WorkspaceBuilder;

/// Open, mutable application definition.
pub struct AppDefBuilder {
	pub(crate) packages: Packages,
	pub(crate) types: Types,
	/// Every ACL rule in declaration order.
	pub(crate) acl: Vec<AclRule>,
	pub(crate) cron: Option<CronValidator>,
}

impl Default for AppDefBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for AppDefBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppDefBuilder")
			.field("packages", &self.packages.len())
			.field("types", &self.types.len())
			.field("acl", &self.acl.len())
			.finish_non_exhaustive()
	}
}

impl AppDefBuilder {
	/// Creates an application holding only the built-in `sys` content.
	pub fn new() -> Self {
		let mut app = Self {
			packages: Packages::new(),
			types: Types::default(),
			acl: Vec::new(),
			cron: None,
		};
		app.add_sys_content();
		app
	}

	fn add_sys_content(&mut self) {
		let sys_ws = sys_workspace_name();
		let mut ws = Workspace::new(QNames::new());
		ws.is_abstract = true;
		let ws_id = self.types.push(Type::new(
			sys_ws.clone(),
			TypeKind::Workspace,
			sys_ws.clone(),
			TypeBody::Workspace(ws),
		));
		self.own(ws_id, sys_ws);

		for kind in DataKind::all().filter(|k| k.is_sys_data()) {
			self.add_sys_type(ws_id, crate::sys_data_name(kind), TypeKind::Data, TypeBody::Data(Data::sys(kind)));
		}
		for name in [any_qname(), sys_records_storage(), sys_views_storage(), sys_wlog_storage()] {
			self.add_sys_type(ws_id, name, TypeKind::Any, TypeBody::Empty);
		}

		let offsets = View::sys(
			("partition", DataKind::Int32),
			("projector", DataKind::QName),
			("offset", DataKind::Int64),
		);
		self.add_sys_type(ws_id, QName::sys("projectionOffsets"), TypeKind::ViewRecord, TypeBody::View(offsets));
		let next_wsid = View::sys(
			("dummy1", DataKind::Int32),
			("dummy2", DataKind::Int32),
			("NextBaseWSID", DataKind::Int64),
		);
		self.add_sys_type(ws_id, QName::sys("NextBaseWSID"), TypeKind::ViewRecord, TypeBody::View(next_wsid));
	}

	fn add_sys_type(&mut self, ws: TypeId, name: QName, kind: TypeKind, body: TypeBody) {
		let ws_name = self.types.at(ws).name().clone();
		self.types.push(Type::new(name.clone(), kind, ws_name, body));
		self.own(ws, name);
	}

	/// Registers package `local` with `path`.
	pub fn add_package(&mut self, local: &str, path: &str) -> Result<&mut Self, Error> {
		self.packages.add(local, path)?;
		Ok(self)
	}

	pub fn packages(&self) -> &Packages {
		&self.packages
	}

	/// Adds a workspace inheriting `sys.Workspace` and returns its builder.
	pub fn add_workspace(&mut self, name: QName) -> Result<WorkspaceBuilder<'_>, Error> {
		let ws = Workspace::new(std::iter::once(sys_workspace_name()).collect());
		let id = self
			.types
			.insert(Type::new(name.clone(), TypeKind::Workspace, name.clone(), TypeBody::Workspace(ws)))?;
		self.own(id, name);
		Ok(WorkspaceBuilder::new(self, id))
	}

	/// Reopens a declared workspace.
	pub fn alter_workspace(&mut self, name: &QName) -> Result<WorkspaceBuilder<'_>, Error> {
		let id = self
			.types
			.id(name)
			.filter(|id| self.types.at(*id).kind() == TypeKind::Workspace)
			.ok_or_else(|| Error::NotFound(format!("workspace «{name}»")))?;
		if name == &sys_workspace_name() {
			return Err(Error::Unsupported(format!("altering built-in workspace «{name}»")));
		}
		Ok(WorkspaceBuilder::new(self, id))
	}

	/// Wires in a parser for job schedules. Its errors fail the build as `Invalid`.
	pub fn set_cron_validator(
		&mut self,
		validator: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static,
	) -> &mut Self {
		self.cron = Some(Arc::new(validator));
		self
	}

	/// Every ACL rule declared so far, in declaration order.
	pub fn acl(&self) -> &[AclRule] {
		&self.acl
	}

	/// Registers a type owned by workspace `ws`.
	pub(crate) fn add_type(&mut self, ws: TypeId, name: QName, kind: TypeKind, body: TypeBody) -> Result<TypeId, Error> {
		let ws_name = self.types.at(ws).name().clone();
		let id = self.types.insert(Type::new(name.clone(), kind, ws_name, body))?;
		self.own(ws, name);
		Ok(id)
	}

	fn own(&mut self, ws: TypeId, name: QName) {
		if let Some(w) = self.types.at_mut(ws).as_workspace_mut() {
			w.local.add(name);
		}
	}

	/// Validates the whole graph and seals it.
	pub fn build(self) -> Result<AppDef, crate::BuildError> {
		build::build(self)
	}
}

impl FindType for AppDefBuilder {
	fn types(&self) -> &Types {
		&self.types
	}
}
