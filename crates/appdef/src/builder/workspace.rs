use std::time::Duration;

use super::AppDefBuilder;
use super::types::{
	DataBuilder, FunctionBuilder, JobBuilder, ProjectorBuilder, RoleBuilder, StructureBuilder, TagBuilder,
	ViewBuilder,
};
use crate::{
	AclRule, Constraint, Data, DataKind, Error, Filter, Function, Job, Limit, LimitFilterOption, OperationKind,
	PolicyKind, Projector, QName, QNames, Rate, RateScope, Structure, Tag, Type, TypeBody, TypeId, TypeKind,
	TypeRef, View, Workspace,
};

/// Builder of one workspace and the types it owns.
#[derive(Debug)]
pub struct WorkspaceBuilder<'a> {
	pub(super) app: &'a mut AppDefBuilder,
	pub(super) id: TypeId,
}

impl<'a> WorkspaceBuilder<'a> {
	pub(super) fn new(app: &'a mut AppDefBuilder, id: TypeId) -> Self {
		Self { app, id }
	}

	/// Name of the workspace.
	pub fn name(&self) -> &QName {
		self.app.types.at(self.id).name()
	}

	/// The workspace as declared so far.
	pub fn workspace(&self) -> Option<&Workspace> {
		self.app.types.at(self.id).as_workspace()
	}

	fn ws_mut(&mut self) -> Result<&mut Workspace, Error> {
		let t = self.app.types.at_mut(self.id);
		let name = t.name().clone();
		t.as_workspace_mut()
			.ok_or_else(|| Error::NotFound(format!("workspace «{name}»")))
	}

	pub fn set_comment(&mut self, comment: &str) -> &mut Self {
		self.app.types.at_mut(self.id).comment = Some(comment.to_owned());
		self
	}

	/// Marks the workspace with tags. Every tag must already be declared.
	pub fn set_tag(&mut self, tags: &[QName]) -> Result<&mut Self, Error> {
		super::types::set_tags(self.app, self.id, tags)?;
		Ok(self)
	}

	pub fn set_abstract(&mut self) -> Result<&mut Self, Error> {
		self.ws_mut()?.is_abstract = true;
		Ok(self)
	}

	/// Replaces the ancestors. Every ancestor must be a declared workspace that does not
	/// inherit this one.
	pub fn set_ancestors(&mut self, ancestors: &[QName]) -> Result<&mut Self, Error> {
		let ancestors: QNames = ancestors.iter().collect();
		let name = self.name().clone();
		crate::workspace::check_ancestors(&self.app.types, &name, &ancestors)?;
		self.ws_mut()?.ancestors = ancestors;
		Ok(self)
	}

	/// Makes the workspaces visible here without inheriting their types.
	pub fn use_workspaces(&mut self, names: &[QName]) -> Result<&mut Self, Error> {
		for n in names {
			if self.app.types.get(n).filter(|t| t.kind() == TypeKind::Workspace).is_none() {
				return Err(Error::NotFound(format!("used workspace «{n}»")));
			}
		}
		let ws = self.ws_mut()?;
		for n in names {
			ws.used.add(n.clone());
		}
		Ok(self)
	}

	/// Sets the descriptor document. It must be a declared CDoc.
	pub fn set_descriptor(&mut self, name: &QName) -> Result<&mut Self, Error> {
		match self.app.types.get(name) {
			None => return Err(Error::NotFound(format!("workspace descriptor «{name}»"))),
			Some(t) if t.kind() != TypeKind::CDoc => {
				return Err(Error::Incompatible(format!("workspace descriptor {t} is not a CDoc")));
			}
			Some(_) => {}
		}
		self.ws_mut()?.descriptor = Some(TypeRef::new(name.clone()));
		Ok(self)
	}

	fn add(&mut self, name: QName, kind: TypeKind, body: TypeBody) -> Result<TypeId, Error> {
		self.app.add_type(self.id, name, kind, body)
	}

	/// Adds a data type of `kind`, derived from `ancestor` or from the built-in data of `kind`
	/// if `ancestor` is null.
	pub fn add_data(
		&mut self,
		name: QName,
		kind: DataKind,
		ancestor: &QName,
		constraints: impl IntoIterator<Item = Constraint>,
	) -> Result<DataBuilder<'_>, Error> {
		let mut data = Data::derive(&self.app.types, kind, ancestor)?;
		data.add_constraints(constraints)?;
		let id = self.add(name, TypeKind::Data, TypeBody::Data(data))?;
		Ok(DataBuilder::new(self.app, id))
	}

	fn add_structure(&mut self, name: QName, kind: TypeKind) -> Result<StructureBuilder<'_>, Error> {
		let s = Structure::new(kind);
		let id = self.add(name, kind, TypeBody::Structure(s))?;
		Ok(StructureBuilder::new(self.app, id))
	}

	pub fn add_gdoc(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::GDoc)
	}

	pub fn add_cdoc(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::CDoc)
	}

	pub fn add_wdoc(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::WDoc)
	}

	pub fn add_odoc(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::ODoc)
	}

	pub fn add_grecord(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::GRecord)
	}

	pub fn add_crecord(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::CRecord)
	}

	pub fn add_wrecord(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::WRecord)
	}

	pub fn add_orecord(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::ORecord)
	}

	pub fn add_object(&mut self, name: QName) -> Result<StructureBuilder<'_>, Error> {
		self.add_structure(name, TypeKind::Object)
	}

	pub fn add_view(&mut self, name: QName) -> Result<ViewBuilder<'_>, Error> {
		let id = self.add(name, TypeKind::ViewRecord, TypeBody::View(View::new()))?;
		Ok(ViewBuilder::new(self.app, id))
	}

	pub fn add_command(&mut self, name: QName) -> Result<FunctionBuilder<'_>, Error> {
		let f = Function::new(&name);
		let id = self.add(name, TypeKind::Command, TypeBody::Function(f))?;
		Ok(FunctionBuilder::new(self.app, id))
	}

	pub fn add_query(&mut self, name: QName) -> Result<FunctionBuilder<'_>, Error> {
		let f = Function::new(&name);
		let id = self.add(name, TypeKind::Query, TypeBody::Function(f))?;
		Ok(FunctionBuilder::new(self.app, id))
	}

	pub fn add_projector(&mut self, name: QName) -> Result<ProjectorBuilder<'_>, Error> {
		let p = Projector::new(&name);
		let id = self.add(name, TypeKind::Projector, TypeBody::Projector(p))?;
		Ok(ProjectorBuilder::new(self.app, id))
	}

	pub fn add_job(&mut self, name: QName) -> Result<JobBuilder<'_>, Error> {
		let j = Job::new(&name);
		let id = self.add(name, TypeKind::Job, TypeBody::Job(j))?;
		Ok(JobBuilder::new(self.app, id))
	}

	pub fn add_role(&mut self, name: QName) -> Result<RoleBuilder<'_>, Error> {
		let id = self.add(name, TypeKind::Role, TypeBody::Empty)?;
		Ok(RoleBuilder::new(self.app, id))
	}

	pub fn add_tag(&mut self, name: QName, feature: &str) -> Result<TagBuilder<'_>, Error> {
		let id = self.add(name, TypeKind::Tag, TypeBody::Tag(Tag::new(feature)))?;
		Ok(TagBuilder::new(self.app, id))
	}

	/// Adds a rate of `count` operations per `period`. Empty `scopes` count per application
	/// partition.
	pub fn add_rate(
		&mut self,
		name: QName,
		count: u32,
		period: Duration,
		scopes: &[RateScope],
		comment: &str,
	) -> Result<&mut Self, Error> {
		let rate = Rate::new(count, period, scopes)?;
		let id = self.add(name, TypeKind::Rate, TypeBody::Rate(rate))?;
		self.comment(id, comment);
		Ok(self)
	}

	/// Adds a limit applying `rate` to `ops` on the types `filter` matches in this workspace.
	///
	/// Current matches must be limitable. The rate may be declared later.
	#[allow(clippy::too_many_arguments)]
	pub fn add_limit(
		&mut self,
		name: QName,
		ops: &[OperationKind],
		option: LimitFilterOption,
		filter: Filter,
		rate: &QName,
		comment: &str,
	) -> Result<&mut Self, Error> {
		let ws = self.name().clone();
		let limit = Limit::new(&self.app.types, &ws, ops, option, filter, rate)?;
		let id = self.add(name, TypeKind::Limit, TypeBody::Limit(limit))?;
		self.comment(id, comment);
		Ok(self)
	}

	fn comment(&mut self, id: TypeId, comment: &str) {
		if !comment.is_empty() {
			self.app.types.at_mut(id).comment = Some(comment.to_owned());
		}
	}

	fn push_rule(&mut self, rule: AclRule) -> &mut Self {
		tracing::trace!(rule = %rule, "acl rule declared");
		if let Ok(ws) = self.ws_mut() {
			ws.acl.push(rule.clone());
		}
		self.app.acl.push(rule);
		self
	}

	/// Grants `ops` on the types `filter` matches, optionally only on `fields`, to `role`.
	pub fn grant(
		&mut self,
		ops: &[OperationKind],
		filter: Filter,
		fields: &[&str],
		role: &QName,
		comment: &str,
	) -> Result<&mut Self, Error> {
		let ws = self.name().clone();
		let rule = AclRule::new(&self.app.types, &ws, PolicyKind::Allow, ops, filter, fields, role, comment)?;
		Ok(self.push_rule(rule))
	}

	/// Grants every operation the first type `filter` matches supports.
	pub fn grant_all(&mut self, filter: Filter, role: &QName, comment: &str) -> Result<&mut Self, Error> {
		let ws = self.name().clone();
		let rule = AclRule::all(&self.app.types, &ws, PolicyKind::Allow, filter, role, comment)?;
		Ok(self.push_rule(rule))
	}

	/// Revokes `ops` on the types `filter` matches, optionally only on `fields`, from `role`.
	pub fn revoke(
		&mut self,
		ops: &[OperationKind],
		filter: Filter,
		fields: &[&str],
		role: &QName,
		comment: &str,
	) -> Result<&mut Self, Error> {
		let ws = self.name().clone();
		let rule = AclRule::new(&self.app.types, &ws, PolicyKind::Deny, ops, filter, fields, role, comment)?;
		Ok(self.push_rule(rule))
	}

	/// Revokes every operation the first type `filter` matches supports.
	pub fn revoke_all(&mut self, filter: Filter, role: &QName, comment: &str) -> Result<&mut Self, Error> {
		let ws = self.name().clone();
		let rule = AclRule::all(&self.app.types, &ws, PolicyKind::Deny, filter, role, comment)?;
		Ok(self.push_rule(rule))
	}

	/// Type registered under `name` in the whole application.
	pub fn type_by_name(&self, name: &QName) -> Option<&Type> {
		self.app.types.get(name)
	}
}
