use super::AppDefBuilder;
use crate::structure::{new_data_field, new_field, new_ref_field};
use crate::{
	Constraint, DataKind, Error, ExtensionEngineKind, Filter, Function, Job, Occurs, OperationKind, Projector,
	QName, Structure, Type, TypeId, TypeKind, TypeKindSet, TypeRef, VerificationKind, View,
	unique_qname,
};

/// Checks that every tag is declared and attaches them to type `id`.
pub(super) fn set_tags(app: &mut AppDefBuilder, id: TypeId, tags: &[QName]) -> Result<(), Error> {
	for tag in tags {
		if app.types.get(tag).filter(|t| t.kind() == TypeKind::Tag).is_none() {
			return Err(Error::NotFound(format!("tag «{tag}»")));
		}
	}
	let t = app.types.at_mut(id);
	for tag in tags {
		t.tags.add(tag.clone());
	}
	Ok(())
}

macro_rules! type_builder {
	($($builder:ident),* $(,)?) => {
		$(
			impl<'a> $builder<'a> {
				pub(super) fn new(app: &'a mut AppDefBuilder, id: TypeId) -> Self {
					Self { app, id }
				}

				/// The type as declared so far.
				pub fn as_type(&self) -> &Type {
					self.app.types.at(self.id)
				}

				pub fn name(&self) -> &QName {
					self.as_type().name()
				}

				pub fn set_comment(&mut self, comment: &str) -> &mut Self {
					self.app.types.at_mut(self.id).comment = Some(comment.to_owned());
					self
				}

				/// Marks the type with tags. Every tag must already be declared.
				pub fn set_tag(&mut self, tags: &[QName]) -> Result<&mut Self, Error> {
					set_tags(self.app, self.id, tags)?;
					Ok(self)
				}
			}
		)*
	};
}

/// Builder of a data type.
#[derive(Debug)]
pub struct DataBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

/// Builder of a document, record or object.
#[derive(Debug)]
pub struct StructureBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

/// Builder of a view record.
#[derive(Debug)]
pub struct ViewBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

/// Builder of a command or query.
#[derive(Debug)]
pub struct FunctionBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

/// Builder of a projector.
#[derive(Debug)]
pub struct ProjectorBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

/// Builder of a scheduled job.
#[derive(Debug)]
pub struct JobBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

#[derive(Debug)]
pub struct RoleBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

#[derive(Debug)]
pub struct TagBuilder<'a> {
	app: &'a mut AppDefBuilder,
	id: TypeId,
}

type_builder!(
	DataBuilder,
	StructureBuilder,
	ViewBuilder,
	FunctionBuilder,
	ProjectorBuilder,
	JobBuilder,
	RoleBuilder,
	TagBuilder,
);

fn kind_mismatch(t: &Type, what: &str) -> Error {
	Error::Unsupported(format!("{t} has no {what}"))
}

impl DataBuilder<'_> {
	/// Adds constraints. All of them are checked before any is stored.
	pub fn add_constraints(&mut self, constraints: impl IntoIterator<Item = Constraint>) -> Result<&mut Self, Error> {
		let t = self.app.types.at_mut(self.id);
		match t.as_data_mut() {
			Some(d) => d.add_constraints(constraints)?,
			None => return Err(kind_mismatch(t, "constraints")),
		}
		Ok(self)
	}
}

impl StructureBuilder<'_> {
	fn with<R>(&mut self, f: impl FnOnce(TypeKind, &mut Structure) -> Result<R, Error>) -> Result<R, Error> {
		let t = self.app.types.at_mut(self.id);
		let kind = t.kind();
		match t.as_structure_mut() {
			Some(s) => f(kind, s),
			None => Err(Error::Unsupported(format!("{} has no structure", kind.trim_string()))),
		}
	}

	/// Adds a field of a built-in data kind. Constraints give the field its own anonymous data.
	pub fn add_field(
		&mut self,
		name: &str,
		kind: DataKind,
		required: bool,
		constraints: impl IntoIterator<Item = Constraint>,
	) -> Result<&mut Self, Error> {
		let field = new_field(&self.app.types, name, kind, required, constraints.into_iter().collect())?;
		self.with(|kind, s| s.fields.append(kind, field))?;
		Ok(self)
	}

	/// Adds a field of the named data type.
	pub fn add_data_field(
		&mut self,
		name: &str,
		data: &QName,
		required: bool,
		constraints: impl IntoIterator<Item = Constraint>,
	) -> Result<&mut Self, Error> {
		let field = new_data_field(&self.app.types, name, data, required, constraints.into_iter().collect())?;
		self.with(|kind, s| s.fields.append(kind, field))?;
		Ok(self)
	}

	/// Adds a record reference field. Empty `refs` allow any record.
	pub fn add_ref_field(&mut self, name: &str, required: bool, refs: &[QName]) -> Result<&mut Self, Error> {
		let field = new_ref_field(name, required, refs);
		self.with(|kind, s| s.fields.append(kind, field))?;
		Ok(self)
	}

	pub fn set_field_comment(&mut self, name: &str, comment: &str) -> Result<&mut Self, Error> {
		self.with(|_, s| s.fields.field_mut(name).map(|f| f.set_comment(comment)))?;
		Ok(self)
	}

	/// Marks a field as verified by one of `kinds`.
	pub fn set_field_verifiable(&mut self, name: &str, kinds: &[VerificationKind]) -> Result<&mut Self, Error> {
		self.with(|_, s| s.fields.field_mut(name).map(|f| f.set_verifiable(kinds.iter().collect())))?;
		Ok(self)
	}

	/// Adds a container of `target` types. A target declared later is checked at build.
	pub fn add_container(&mut self, name: &str, target: &QName, min: Occurs, max: Occurs) -> Result<&mut Self, Error> {
		let target_kind = self.app.types.get(target).map(Type::kind);
		self.with(|kind, s| s.containers.append(kind, name, target.clone(), target_kind, min, max))?;
		Ok(self)
	}

	pub fn set_container_comment(&mut self, name: &str, comment: &str) -> Result<&mut Self, Error> {
		self.with(|_, s| s.containers.container_mut(name).map(|c| c.set_comment(comment)))?;
		Ok(self)
	}

	/// Adds a named combination of fields whose values are unique together.
	pub fn add_unique(&mut self, name: QName, fields: &[&str]) -> Result<&mut Self, Error> {
		if let Some(t) = self.app.types.get(&name) {
			return Err(Error::AlreadyExists(format!("unique name «{name}» is used by {t}")));
		}
		self.with(|_, s| {
			let Structure { fields: ff, uniques, .. } = s;
			uniques.append(name, fields, ff)
		})?;
		Ok(self)
	}

	/// Adds an unnamed unique with the default name `<doc>$uniques$<n>`.
	pub fn add_auto_unique(&mut self, fields: &[&str]) -> Result<&mut Self, Error> {
		let n = self.with(|_, s| Ok(s.uniques.count() + 1))?;
		let name = unique_qname(self.name(), &format!("{:02}", n));
		self.add_unique(name, fields)
	}

	/// Declares `name` as the single unique field. The field is checked at build.
	pub fn set_unique_field(&mut self, name: &str) -> Result<&mut Self, Error> {
		self.with(|_, s| {
			s.uniques.set_field(name);
			Ok(())
		})?;
		Ok(self)
	}

	pub fn set_abstract(&mut self) -> Result<&mut Self, Error> {
		self.with(|_, s| {
			s.is_abstract = true;
			Ok(())
		})?;
		Ok(self)
	}

	/// Declares a CDoc or WDoc as a singleton.
	pub fn set_singleton(&mut self) -> Result<&mut Self, Error> {
		self.with(|kind, s| {
			if !kind.is_in(TypeKindSet::SINGLETONS) {
				return Err(Error::Unsupported(format!("singleton {}", kind.trim_string())));
			}
			s.singleton = true;
			Ok(())
		})?;
		Ok(self)
	}
}

impl ViewBuilder<'_> {
	fn with<R>(&mut self, f: impl FnOnce(&mut View) -> Result<R, Error>) -> Result<R, Error> {
		let t = self.app.types.at_mut(self.id);
		match t.as_view_mut() {
			Some(v) => f(v),
			None => Err(kind_mismatch(t, "view key")),
		}
	}

	/// Adds a partition key field. Only fixed-width kinds are allowed.
	pub fn add_partition_field(&mut self, name: &str, kind: DataKind) -> Result<&mut Self, Error> {
		let field = new_field(&self.app.types, name, kind, true, Vec::new())?;
		self.with(|v| v.add_part_key(field))?;
		Ok(self)
	}

	/// Adds a partition key field of the named data type.
	pub fn add_partition_data_field(&mut self, name: &str, data: &QName) -> Result<&mut Self, Error> {
		let field = new_data_field(&self.app.types, name, data, true, Vec::new())?;
		self.with(|v| v.add_part_key(field))?;
		Ok(self)
	}

	/// Adds a clustering column. A variable-length column must be the last one.
	pub fn add_clustering_field(
		&mut self,
		name: &str,
		kind: DataKind,
		constraints: impl IntoIterator<Item = Constraint>,
	) -> Result<&mut Self, Error> {
		let field = new_field(&self.app.types, name, kind, false, constraints.into_iter().collect())?;
		self.with(|v| v.add_clust_col(field))?;
		Ok(self)
	}

	/// Adds a clustering column of the named data type.
	pub fn add_clustering_data_field(
		&mut self,
		name: &str,
		data: &QName,
		constraints: impl IntoIterator<Item = Constraint>,
	) -> Result<&mut Self, Error> {
		let field = new_data_field(&self.app.types, name, data, false, constraints.into_iter().collect())?;
		self.with(|v| v.add_clust_col(field))?;
		Ok(self)
	}

	pub fn add_value_field(
		&mut self,
		name: &str,
		kind: DataKind,
		required: bool,
		constraints: impl IntoIterator<Item = Constraint>,
	) -> Result<&mut Self, Error> {
		let field = new_field(&self.app.types, name, kind, required, constraints.into_iter().collect())?;
		self.with(|v| v.add_value(field))?;
		Ok(self)
	}

	pub fn add_value_data_field(
		&mut self,
		name: &str,
		data: &QName,
		required: bool,
		constraints: impl IntoIterator<Item = Constraint>,
	) -> Result<&mut Self, Error> {
		let field = new_data_field(&self.app.types, name, data, required, constraints.into_iter().collect())?;
		self.with(|v| v.add_value(field))?;
		Ok(self)
	}

	pub fn add_value_ref_field(&mut self, name: &str, required: bool, refs: &[QName]) -> Result<&mut Self, Error> {
		let field = new_ref_field(name, required, refs);
		self.with(|v| v.add_value(field))?;
		Ok(self)
	}

	pub fn set_field_comment(&mut self, name: &str, comment: &str) -> Result<&mut Self, Error> {
		self.with(|v| v.fields.field_mut(name).map(|f| f.set_comment(comment)))?;
		Ok(self)
	}
}

/// Engine and entry name setters shared by every extension builder.
macro_rules! extension_builder {
	($($builder:ident),*) => {
		$(
			impl $builder<'_> {
				pub fn set_engine(&mut self, engine: ExtensionEngineKind) -> &mut Self {
					if let Some(ext) = self.app.types.at_mut(self.id).extension_mut() {
						ext.set_engine(engine);
					}
					self
				}

				/// Overrides the entry point name, which defaults to the type entity.
				pub fn set_name(&mut self, name: &str) -> Result<&mut Self, Error> {
					let t = self.app.types.at_mut(self.id);
					match t.extension_mut() {
						Some(ext) => ext.set_name(name)?,
						None => return Err(kind_mismatch(t, "extension")),
					}
					Ok(self)
				}
			}
		)*
	};
}

extension_builder!(FunctionBuilder, ProjectorBuilder, JobBuilder);

impl FunctionBuilder<'_> {
	fn with(&mut self, f: impl FnOnce(TypeKind, &mut Function) -> Result<(), Error>) -> Result<&mut Self, Error> {
		let t = self.app.types.at_mut(self.id);
		let kind = t.kind();
		match t.as_function_mut() {
			Some(func) => f(kind, func)?,
			None => return Err(kind_mismatch(t, "parameters")),
		}
		Ok(self)
	}

	/// Sets the parameter type. The null name clears it. Resolved at build.
	pub fn set_param(&mut self, name: &QName) -> Result<&mut Self, Error> {
		let r = param_ref(name)?;
		self.with(|_, f| {
			f.param = r;
			Ok(())
		})
	}

	/// Sets the result type. The null name clears it. Resolved at build.
	pub fn set_result(&mut self, name: &QName) -> Result<&mut Self, Error> {
		let r = param_ref(name)?;
		self.with(|_, f| {
			f.result = r;
			Ok(())
		})
	}

	/// Sets the parameter that is not written to the event log. Commands only.
	pub fn set_unlogged_param(&mut self, name: &QName) -> Result<&mut Self, Error> {
		let r = param_ref(name)?;
		self.with(|kind, f| {
			if kind != TypeKind::Command {
				return Err(Error::Unsupported(format!("unlogged parameter of {}", kind.trim_string())));
			}
			f.unlogged_param = r;
			Ok(())
		})
	}
}

fn param_ref(name: &QName) -> Result<Option<TypeRef>, Error> {
	if name.is_null() {
		return Ok(None);
	}
	crate::valid_qname(name)?;
	Ok(Some(TypeRef::new(name.clone())))
}

impl ProjectorBuilder<'_> {
	fn with(&mut self, f: impl FnOnce(&mut Projector) -> Result<(), Error>) -> Result<&mut Self, Error> {
		let t = self.app.types.at_mut(self.id);
		match t.as_projector_mut() {
			Some(p) => f(p)?,
			None => return Err(kind_mismatch(t, "events")),
		}
		Ok(self)
	}

	/// Fires the projector on `ops` over the types `filter` matches.
	pub fn add_event(&mut self, ops: &[OperationKind], filter: Filter, comment: &str) -> Result<&mut Self, Error> {
		self.with(|p| p.add_event(ops, filter, comment))
	}

	pub fn set_sync(&mut self, sync: bool) -> Result<&mut Self, Error> {
		self.with(|p| {
			p.sync = sync;
			Ok(())
		})
	}

	pub fn set_want_errors(&mut self) -> Result<&mut Self, Error> {
		self.with(|p| {
			p.want_errors = true;
			Ok(())
		})
	}

	/// Adds `names` read from `storage`.
	pub fn add_state(&mut self, storage: &QName, names: &[QName]) -> Result<&mut Self, Error> {
		self.with(|p| p.states.add(storage, names))
	}

	/// Adds `names` written to `storage`.
	pub fn add_intent(&mut self, storage: &QName, names: &[QName]) -> Result<&mut Self, Error> {
		self.with(|p| p.intents.add(storage, names))
	}

	pub fn set_state_comment(&mut self, storage: &QName, comment: &str) -> Result<&mut Self, Error> {
		self.with(|p| p.states.set_comment(storage, comment))
	}

	pub fn set_intent_comment(&mut self, storage: &QName, comment: &str) -> Result<&mut Self, Error> {
		self.with(|p| p.intents.set_comment(storage, comment))
	}
}

impl JobBuilder<'_> {
	fn with(&mut self, f: impl FnOnce(&mut Job) -> Result<(), Error>) -> Result<&mut Self, Error> {
		let t = self.app.types.at_mut(self.id);
		match t.as_job_mut() {
			Some(j) => f(j)?,
			None => return Err(kind_mismatch(t, "schedule")),
		}
		Ok(self)
	}

	/// Sets the raw schedule expression. Parsed at build if a validator is wired in.
	pub fn set_cron(&mut self, cron: &str) -> Result<&mut Self, Error> {
		self.with(|j| {
			j.cron = cron.to_owned();
			Ok(())
		})
	}

	/// Adds `names` read from `storage`.
	pub fn add_state(&mut self, storage: &QName, names: &[QName]) -> Result<&mut Self, Error> {
		self.with(|j| j.states.add(storage, names))
	}

	pub fn add_intent(&mut self, storage: &QName, names: &[QName]) -> Result<&mut Self, Error> {
		self.with(|j| j.intents.add(storage, names))
	}
}
