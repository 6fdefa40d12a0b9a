use rustc_hash::FxHashMap as HashMap;

use crate::{Error, MAX_TYPE_CONTAINER_COUNT, Occurs, QName, Type, TypeKind, TypeRef, Types, valid_ident};

/// A named slot for nested child types.
#[derive(Debug, Clone)]
pub struct Container {
	name: String,
	target: TypeRef,
	min: Occurs,
	max: Occurs,
	comment: Option<String>,
}

impl Container {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn target_name(&self) -> &QName {
		self.target.name()
	}

	/// Resolves the child type. `None` while the target is not declared yet.
	pub fn target<'a>(&self, types: &'a Types) -> Option<&'a Type> {
		self.target.target(types)
	}

	pub fn min_occurs(&self) -> Occurs {
		self.min
	}

	pub fn max_occurs(&self) -> Occurs {
		self.max
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub(crate) fn set_comment(&mut self, comment: impl Into<String>) {
		self.comment = Some(comment.into());
	}
}

/// Ordered set of containers with unique names.
#[derive(Debug, Clone, Default)]
pub struct Containers {
	list: Vec<Container>,
	by_name: HashMap<String, usize>,
}

impl Containers {
	/// Appends a container to a type of kind `owner`.
	///
	/// `target_kind` is the kind of the target if it is already declared. An unknown target is
	/// accepted here and checked by [`validate_containers`].
	pub(crate) fn append(
		&mut self,
		owner: TypeKind,
		name: &str,
		target: QName,
		target_kind: Option<TypeKind>,
		min: Occurs,
		max: Occurs,
	) -> Result<(), Error> {
		if name.is_empty() {
			return Err(Error::Missed("container name".into()));
		}
		valid_ident(name).map_err(|err| Error::Invalid(format!("container name «{name}»: {err}")))?;
		if self.by_name.contains_key(name) {
			return Err(Error::AlreadyExists(format!("container «{name}»")));
		}
		if target.is_null() {
			return Err(Error::Missed(format!("container «{name}» type name")));
		}
		if max.0 == 0 || max < min {
			return Err(Error::Invalid(format!("Occurs of container «{name}»: min {min}, max {max}")));
		}
		if self.list.len() >= MAX_TYPE_CONTAINER_COUNT {
			return Err(Error::TooMany(format!("containers, maximum is {MAX_TYPE_CONTAINER_COUNT}")));
		}
		if let Some(kind) = target_kind
			&& !owner.container_kinds().has(kind)
		{
			return Err(Error::Incompatible(format!(
				"{} can not be a child of {} in container «{name}»",
				kind.trim_string(),
				owner.trim_string()
			)));
		}

		self.by_name.insert(name.to_owned(), self.list.len());
		self.list.push(Container {
			name: name.to_owned(),
			target: TypeRef::new(target),
			min,
			max,
			comment: None,
		});
		Ok(())
	}

	pub fn container(&self, name: &str) -> Option<&Container> {
		self.by_name.get(name).map(|i| &self.list[*i])
	}

	pub(crate) fn container_mut(&mut self, name: &str) -> Result<&mut Container, Error> {
		match self.by_name.get(name) {
			Some(i) => Ok(&mut self.list[*i]),
			None => Err(Error::NotFound(format!("container «{name}»"))),
		}
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Container> {
		self.list.iter()
	}

	pub fn count(&self) -> usize {
		self.list.len()
	}
}

/// Checks that every container target of `owner` is declared and of a legal kind.
pub(crate) fn validate_containers(owner: &Type, containers: &Containers, types: &Types, errors: &mut Vec<Error>) {
	for c in containers.iter() {
		match c.target(types) {
			None => errors.push(Error::NotFound(format!(
				"{owner} container «{}» type «{}»",
				c.name,
				c.target_name()
			))),
			Some(t) if !owner.kind().container_kinds().has(t.kind()) => errors.push(Error::Incompatible(format!(
				"{owner} container «{}» has incompatible type {t}",
				c.name
			))),
			Some(_) => {}
		}
	}
}
