use rustc_hash::FxHashMap as HashMap;

use super::props::SystemField;
use crate::data::ConstraintMap;
use crate::{
	Data, DataKind, Error, MAX_TYPE_FIELD_COUNT, QNames, TypeKind, TypeRef, Types, VerificationKindSet,
	valid_ident,
};

/// Where a field's data type comes from.
#[derive(Debug, Clone)]
pub enum FieldData {
	/// A named data type in the registry.
	Named(TypeRef),
	/// Inline data created for a field declared with its own constraints.
	Anonymous(Box<Data>),
}

/// A named, typed slot of a structure or view.
#[derive(Debug, Clone)]
pub struct Field {
	name: String,
	kind: DataKind,
	data: FieldData,
	required: bool,
	system: bool,
	verifiable: VerificationKindSet,
	refs: Option<QNames>,
	comment: Option<String>,
}

impl Field {
	pub(crate) fn new(name: impl Into<String>, kind: DataKind, data: FieldData, required: bool) -> Self {
		Self {
			name: name.into(),
			kind,
			data,
			required,
			system: false,
			verifiable: VerificationKindSet::empty(),
			refs: None,
			comment: None,
		}
	}

	pub(crate) fn system(f: &SystemField, data: FieldData) -> Self {
		let mut field = Self::new(f.name, f.kind, data, f.required);
		field.system = true;
		field
	}

	/// Makes this a reference field. Empty `refs` allow any record target.
	pub(crate) fn with_refs(mut self, refs: QNames) -> Self {
		self.refs = Some(refs);
		self
	}

	pub(crate) fn set_required(&mut self, required: bool) {
		self.required = required;
	}

	pub(crate) fn set_comment(&mut self, comment: impl Into<String>) {
		self.comment = Some(comment.into());
	}

	pub(crate) fn set_verifiable(&mut self, kinds: VerificationKindSet) {
		self.verifiable = kinds;
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn data_kind(&self) -> DataKind {
		self.kind
	}

	pub fn data(&self) -> &FieldData {
		&self.data
	}

	pub fn required(&self) -> bool {
		self.required
	}

	pub fn is_system(&self) -> bool {
		self.system
	}

	pub fn is_fixed_width(&self) -> bool {
		self.kind.is_fixed()
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub fn verifiable(&self) -> bool {
		!self.verifiable.is_empty()
	}

	pub fn verification_kinds(&self) -> VerificationKindSet {
		self.verifiable
	}

	/// Returns the allowed targets of a reference field. Empty means any record.
	pub fn refs(&self) -> Option<&QNames> {
		self.refs.as_ref()
	}

	pub fn is_ref(&self) -> bool {
		self.refs.is_some()
	}

	/// Returns true if a reference field may point to records of `target`.
	pub fn ref_allowed(&self, target: &crate::QName) -> bool {
		self.refs
			.as_ref()
			.is_some_and(|refs| refs.is_empty() || refs.contains(target))
	}

	/// Resolves the data of this field.
	pub fn resolve_data<'a>(&'a self, types: &'a Types) -> Option<&'a Data> {
		match &self.data {
			FieldData::Named(r) => r.target(types).and_then(|t| t.as_data()),
			FieldData::Anonymous(d) => Some(d),
		}
	}

	/// Returns the constraints of this field's data, inherited ones included.
	pub fn constraints<'a>(&'a self, types: &'a Types) -> ConstraintMap<'a> {
		self.resolve_data(types)
			.map(|d| d.constraints(true, types))
			.unwrap_or_default()
	}

	/// Effective maximum length of string and bytes values. See [`Data::max_len`].
	pub fn max_len(&self, types: &Types) -> Option<u16> {
		self.resolve_data(types).and_then(|d| d.max_len(types))
	}
}

/// Ordered set of fields with unique names.
#[derive(Debug, Clone, Default)]
pub struct Fields {
	list: Vec<Field>,
	by_name: HashMap<String, usize>,
	user_count: usize,
}

impl Fields {
	/// Appends a field declared on a type of kind `owner`.
	///
	/// System fields bypass identifier and data kind checks.
	pub(crate) fn append(&mut self, owner: TypeKind, field: Field) -> Result<(), Error> {
		if field.name.is_empty() {
			return Err(Error::Missed("field name".into()));
		}
		if self.by_name.contains_key(&field.name) {
			return Err(Error::AlreadyExists(format!("field «{}»", field.name)));
		}
		if self.list.len() >= MAX_TYPE_FIELD_COUNT {
			return Err(Error::TooMany(format!("fields, maximum is {MAX_TYPE_FIELD_COUNT}")));
		}
		if !field.system {
			valid_ident(&field.name)
				.map_err(|err| Error::Invalid(format!("field name «{}»: {err}", field.name)))?;
			if !owner.field_kinds().has(field.kind) {
				return Err(Error::Incompatible(format!(
					"field «{}» data kind {} is not allowed in {}",
					field.name,
					field.kind.trim_string(),
					owner.trim_string()
				)));
			}
		}
		self.push(field);
		Ok(())
	}

	/// Appends a field without checks. Only for fields whose names are known to be distinct.
	pub(crate) fn push(&mut self, field: Field) {
		if !field.system {
			self.user_count += 1;
		}
		self.by_name.insert(field.name.clone(), self.list.len());
		self.list.push(field);
	}

	pub fn field(&self, name: &str) -> Option<&Field> {
		self.by_name.get(name).map(|i| &self.list[*i])
	}

	pub(crate) fn field_mut(&mut self, name: &str) -> Result<&mut Field, Error> {
		match self.by_name.get(name) {
			Some(i) => Ok(&mut self.list[*i]),
			None => Err(Error::field_not_found(name)),
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// Iterates all fields in declaration order, system fields first.
	pub fn iter(&self) -> std::slice::Iter<'_, Field> {
		self.list.iter()
	}

	pub fn user_fields(&self) -> impl Iterator<Item = &Field> {
		self.list.iter().filter(|f| !f.system)
	}

	pub fn ref_fields(&self) -> impl Iterator<Item = &Field> {
		self.list.iter().filter(|f| f.is_ref())
	}

	pub fn count(&self) -> usize {
		self.list.len()
	}

	pub fn user_count(&self) -> usize {
		self.user_count
	}
}
