use crate::{Error, Fields, MAX_TYPE_UNIQUE_COUNT, MAX_TYPE_UNIQUE_FIELDS_COUNT, QName};

/// A set of fields whose combined value is unique among rows of a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unique {
	name: QName,
	/// Sorted field names.
	fields: Vec<String>,
}

impl Unique {
	pub fn name(&self) -> &QName {
		&self.name
	}

	/// Field names, sorted.
	pub fn fields(&self) -> &[String] {
		&self.fields
	}
}

/// Uniques of a structure, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Uniques {
	list: Vec<Unique>,
	/// Single-field uniqueness declared outside any named unique.
	field: Option<String>,
}

impl Uniques {
	/// Adds a unique over `fields` of `owner`.
	///
	/// The caller checks that `name` does not clash with any application type.
	pub(crate) fn append(&mut self, name: QName, fields: &[&str], owner: &Fields) -> Result<(), Error> {
		if name.is_null() {
			return Err(Error::Missed("unique name".into()));
		}
		crate::valid_qname(&name)?;
		if let Some(u) = self.unique(&name) {
			return Err(Error::AlreadyExists(format!("unique «{}»", u.name)));
		}
		if fields.is_empty() {
			return Err(Error::Missed(format!("unique «{name}» fields")));
		}
		if fields.len() > MAX_TYPE_UNIQUE_FIELDS_COUNT {
			return Err(Error::TooMany(format!(
				"unique «{name}» fields, maximum is {MAX_TYPE_UNIQUE_FIELDS_COUNT}"
			)));
		}
		if self.list.len() >= MAX_TYPE_UNIQUE_COUNT {
			return Err(Error::TooMany(format!("uniques, maximum is {MAX_TYPE_UNIQUE_COUNT}")));
		}

		let mut sorted: Vec<String> = Vec::with_capacity(fields.len());
		for f in fields {
			if !owner.contains(f) {
				return Err(Error::field_not_found(f));
			}
			sorted.push((*f).to_owned());
		}
		sorted.sort();
		if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
			return Err(Error::AlreadyExists(format!("field «{}» repeated in unique «{name}»", w[0])));
		}

		// One field set covering another makes the narrower unique redundant.
		for u in &self.list {
			let covers = |a: &[String], b: &[String]| b.iter().all(|f| a.binary_search(f).is_ok());
			if covers(&u.fields, &sorted) || covers(&sorted, &u.fields) {
				return Err(Error::AlreadyExists(format!(
					"unique «{}» overlaps fields of «{name}»",
					u.name
				)));
			}
		}

		self.list.push(Unique { name, fields: sorted });
		Ok(())
	}

	pub(crate) fn set_field(&mut self, name: &str) {
		self.field = Some(name.to_owned());
	}

	pub fn unique(&self, name: &QName) -> Option<&Unique> {
		self.list.iter().find(|u| &u.name == name)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Unique> {
		self.list.iter()
	}

	pub fn count(&self) -> usize {
		self.list.len()
	}

	/// Returns the single unique field, if declared.
	pub fn field(&self) -> Option<&str> {
		self.field.as_deref()
	}
}
