//! View records: a partition key, clustering columns and a value, sharing one field namespace.
//!
//! # Invariants
//!
//! - Must only hold fixed-width fields in the partition key.
//!   - Enforced in: [`View::add_part_key`]
//!   - Tested by: [`crate::view::tests::test_part_key_fixed_only`]
//!   - Failure symptom: Partition hashing sees variable-length bytes.
//!
//! - Must hold at most one variable-length clustering column, and only as the last one.
//!   - Enforced in: [`View::add_clust_col`]
//!   - Tested by: [`crate::invariants::test_clust_cols_single_trailing_variable`]
//!   - Failure symptom: Clustering key is not order-preserving.

use crate::structure::system_fields;
use crate::{DataKind, Error, Field, FieldData, Fields, Type, TypeKind, TypeRef, sys_data_name};

#[cfg(test)]
mod tests;

/// Payload of a [`TypeKind::ViewRecord`] type.
#[derive(Debug, Clone)]
pub struct View {
	pub(crate) fields: Fields,
	part_key: Vec<String>,
	clust_cols: Vec<String>,
	value: Vec<String>,
}

impl View {
	pub(crate) fn new() -> Self {
		let fields = system_fields(TypeKind::ViewRecord);
		let value = fields.iter().map(|f| f.name().to_owned()).collect();
		Self {
			fields,
			part_key: Vec::new(),
			clust_cols: Vec::new(),
			value,
		}
	}

	/// Built-in view with one fixed-width partition field, one clustering column and one value.
	/// Names must be distinct and differ from the system field names.
	pub(crate) fn sys(part_key: (&str, DataKind), clust_col: (&str, DataKind), value: (&str, DataKind)) -> Self {
		let mut view = Self::new();
		let field = |(name, kind): (&str, DataKind), required| {
			Field::new(name, kind, FieldData::Named(TypeRef::new(sys_data_name(kind))), required)
		};
		view.fields.push(field(part_key, true));
		view.part_key.push(part_key.0.to_owned());
		view.fields.push(field(clust_col, false));
		view.clust_cols.push(clust_col.0.to_owned());
		view.fields.push(field(value, true));
		view.value.push(value.0.to_owned());
		view
	}

	/// All fields of the view: key and value.
	pub fn fields(&self) -> &Fields {
		&self.fields
	}

	fn named<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a Field> + 'a {
		names.iter().filter_map(|n| self.fields.field(n))
	}

	/// Partition key fields, in declaration order.
	pub fn part_key(&self) -> impl Iterator<Item = &Field> {
		self.named(&self.part_key)
	}

	/// Clustering column fields, in declaration order.
	pub fn clust_cols(&self) -> impl Iterator<Item = &Field> {
		self.named(&self.clust_cols)
	}

	/// Full key: partition key followed by clustering columns.
	pub fn key(&self) -> impl Iterator<Item = &Field> {
		self.part_key().chain(self.clust_cols())
	}

	/// Value fields, `sys.QName` first.
	pub fn value(&self) -> impl Iterator<Item = &Field> {
		self.named(&self.value)
	}

	pub fn part_key_count(&self) -> usize {
		self.part_key.len()
	}

	pub fn clust_cols_count(&self) -> usize {
		self.clust_cols.len()
	}

	/// Adds a partition key field. Variable-length fields are unsupported. Key fields are
	/// always required.
	pub(crate) fn add_part_key(&mut self, mut field: Field) -> Result<(), Error> {
		if !field.is_fixed_width() {
			return Err(Error::Unsupported(format!(
				"variable-length field «{}» ({}) in view partition key",
				field.name(),
				field.data_kind().trim_string()
			)));
		}
		field.set_required(true);
		let name = field.name().to_owned();
		self.fields.append(TypeKind::ViewRecord, field)?;
		self.part_key.push(name);
		Ok(())
	}

	/// Adds a clustering column. Nothing may follow a variable-length column. Clustering
	/// columns are never required.
	pub(crate) fn add_clust_col(&mut self, mut field: Field) -> Result<(), Error> {
		if let Some(last) = self.clust_cols().last()
			&& !last.is_fixed_width()
		{
			return Err(Error::Unsupported(format!(
				"field «{}» after variable-length clustering column «{}»",
				field.name(),
				last.name()
			)));
		}
		field.set_required(false);
		let name = field.name().to_owned();
		self.fields.append(TypeKind::ViewRecord, field)?;
		self.clust_cols.push(name);
		Ok(())
	}

	pub(crate) fn add_value(&mut self, field: Field) -> Result<(), Error> {
		let name = field.name().to_owned();
		self.fields.append(TypeKind::ViewRecord, field)?;
		self.value.push(name);
		Ok(())
	}

	pub(crate) fn validate(&self, owner: &Type, errors: &mut Vec<Error>) {
		if self.part_key.is_empty() {
			errors.push(Error::Missed(format!("{owner} partition key fields")));
		}
		if self.clust_cols.is_empty() {
			errors.push(Error::Missed(format!("{owner} clustering columns")));
		}
	}
}
