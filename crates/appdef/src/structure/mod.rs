//! Structural composition: fields, containers and uniques of documents, records and objects.
//!
//! Which data kinds a field may use, which child kinds a container may hold and which system
//! fields are injected is fixed per [`TypeKind`] in [`props`]. Checks that only need the type
//! itself run when a field or container is added. Checks that need other types (container
//! targets, reference field targets) run again in the build pass, because those targets may be
//! declared later.

use crate::data::sys_data_name;
use crate::{Constraint, Data, DataKind, Error, QName, QNames, Type, TypeKind, TypeKindSet, TypeRef, Types};

mod containers;
mod fields;
pub mod props;
mod uniques;

pub(crate) use containers::validate_containers;
pub use containers::{Container, Containers};
pub use fields::{Field, FieldData, Fields};
pub use uniques::{Unique, Uniques};

/// Payload of documents, records and objects.
#[derive(Debug, Clone, Default)]
pub struct Structure {
	pub(crate) fields: Fields,
	pub(crate) containers: Containers,
	pub(crate) uniques: Uniques,
	pub(crate) is_abstract: bool,
	pub(crate) singleton: bool,
}

impl Structure {
	/// Creates an empty structure with the system fields of `kind` injected.
	pub(crate) fn new(kind: TypeKind) -> Self {
		Self {
			fields: system_fields(kind),
			..Self::default()
		}
	}

	pub fn fields(&self) -> &Fields {
		&self.fields
	}

	pub fn containers(&self) -> &Containers {
		&self.containers
	}

	pub fn uniques(&self) -> &Uniques {
		&self.uniques
	}

	pub fn is_abstract(&self) -> bool {
		self.is_abstract
	}

	pub fn singleton(&self) -> bool {
		self.singleton
	}
}

/// Builds the field set of a new type of `kind` with its system fields.
pub(crate) fn system_fields(kind: TypeKind) -> Fields {
	let mut fields = Fields::default();
	for f in kind.system_fields() {
		fields.push(Field::system(f, FieldData::Named(TypeRef::new(sys_data_name(f.kind)))));
	}
	fields
}

/// Creates a user field of a built-in data kind.
///
/// With constraints the field gets anonymous data derived from `sys.<kind>`.
pub(crate) fn new_field(
	types: &Types,
	name: &str,
	kind: DataKind,
	required: bool,
	constraints: Vec<Constraint>,
) -> Result<Field, Error> {
	let data = if constraints.is_empty() {
		FieldData::Named(TypeRef::new(sys_data_name(kind)))
	} else {
		let mut data = Data::derive(types, kind, &QName::NULL)?;
		data.add_constraints(constraints)?;
		FieldData::Anonymous(Box::new(data))
	};
	Ok(Field::new(name, kind, data, required))
}

/// Creates a user field of a named data type.
///
/// With constraints the field gets anonymous data derived from `data`.
pub(crate) fn new_data_field(
	types: &Types,
	name: &str,
	data: &QName,
	required: bool,
	constraints: Vec<Constraint>,
) -> Result<Field, Error> {
	let kind = types
		.get(data)
		.and_then(Type::as_data)
		.map(Data::data_kind)
		.ok_or_else(|| Error::NotFound(format!("data type «{data}» of field «{name}»")))?;
	let field_data = if constraints.is_empty() {
		FieldData::Named(TypeRef::new(data.clone()))
	} else {
		let mut anon = Data::derive(types, kind, data)?;
		anon.add_constraints(constraints)?;
		FieldData::Anonymous(Box::new(anon))
	};
	Ok(Field::new(name, kind, field_data, required))
}

/// Creates a reference field. Empty `refs` allow any record target.
pub(crate) fn new_ref_field(name: &str, required: bool, refs: &[QName]) -> Field {
	let data = FieldData::Named(TypeRef::new(sys_data_name(DataKind::RecordID)));
	Field::new(name, DataKind::RecordID, data, required).with_refs(refs.iter().collect::<QNames>())
}

/// Checks that field data and reference targets of `owner` resolve.
pub(crate) fn validate_fields(owner: &Type, fields: &Fields, types: &Types, errors: &mut Vec<Error>) {
	for f in fields.iter() {
		if f.resolve_data(types).is_none() {
			errors.push(Error::NotFound(format!("{owner} field «{}» data type", f.name())));
		}
		let Some(refs) = f.refs() else { continue };
		for target in refs {
			match types.get(target) {
				None => errors.push(Error::NotFound(format!(
					"{owner} reference field «{}» target «{target}»",
					f.name()
				))),
				Some(t) if !t.kind().is_in(TypeKindSet::RECORDS) => errors.push(Error::Incompatible(format!(
					"{owner} reference field «{}» target {t} is not a record",
					f.name()
				))),
				Some(_) => {}
			}
		}
	}
}

/// Checks that the single unique field of `owner` exists.
pub(crate) fn validate_uniques(owner: &Type, s: &Structure, errors: &mut Vec<Error>) {
	if let Some(name) = s.uniques.field()
		&& !s.fields.contains(name)
	{
		errors.push(Error::NotFound(format!("{owner} unique field «{name}»")));
	}
}
