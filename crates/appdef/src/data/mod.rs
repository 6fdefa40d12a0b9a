//! Data types: named value kinds refined by constraints.
//!
//! Every data chain is rooted at a built-in `sys.<kind>` data type. A derived data type keeps its
//! ancestor's [`DataKind`] and may add or override constraints.
//!
//! Constraint resolution walks from the node towards the root and keeps the first constraint
//! seen for each [`ConstraintKind`]. A descendant's constraint fully shadows the ancestor's
//! constraint of the same kind; the two are never intersected.

use std::collections::BTreeMap;

use crate::{
	Constraint, ConstraintKind, DEFAULT_FIELD_MAX_LENGTH, DataKind, Error, QName, Type, TypeKind, TypeRef, Types,
};


/// Returns the name of the built-in data type for `kind`, e.g. `sys.int32`.
pub fn sys_data_name(kind: DataKind) -> QName {
	QName::sys(kind.trim_string())
}

/// Resolved constraints, keyed and ordered by kind.
pub type ConstraintMap<'a> = BTreeMap<ConstraintKind, &'a Constraint>;

/// Payload of a [`TypeKind::Data`] type, and of anonymous field data.
#[derive(Debug, Clone)]
pub struct Data {
	kind: DataKind,
	ancestor: Option<TypeRef>,
	constraints: BTreeMap<ConstraintKind, Constraint>,
}

impl Data {
	/// Root data of the `sys` package.
	pub(crate) fn sys(kind: DataKind) -> Self {
		Self {
			kind,
			ancestor: None,
			constraints: BTreeMap::new(),
		}
	}

	/// Derives new data.
	///
	/// With a null `ancestor` the data derives from the `sys` root of `kind`. Otherwise the
	/// ancestor must be a known data type, and a non-null `kind` must equal its kind.
	pub(crate) fn derive(types: &Types, kind: DataKind, ancestor: &QName) -> Result<Self, Error> {
		let ancestor = if ancestor.is_null() {
			let name = sys_data_name(kind);
			if kind == DataKind::Null || types.get(&name).and_then(Type::as_data).is_none() {
				return Err(Error::NotFound(format!("system data type for data kind {}", kind.trim_string())));
			}
			name
		} else {
			ancestor.clone()
		};

		let anc = types
			.get(&ancestor)
			.filter(|t| t.kind() == TypeKind::Data)
			.and_then(Type::as_data)
			.ok_or_else(|| Error::NotFound(format!("ancestor data type «{ancestor}»")))?;
		if kind != DataKind::Null && kind != anc.kind {
			return Err(Error::Invalid(format!(
				"data kind {} differs from {} of ancestor «{ancestor}»",
				kind.trim_string(),
				anc.kind.trim_string()
			)));
		}

		Ok(Self {
			kind: anc.kind,
			ancestor: Some(TypeRef::new(ancestor)),
			constraints: BTreeMap::new(),
		})
	}

	pub fn data_kind(&self) -> DataKind {
		self.kind
	}

	/// Returns true for the built-in roots of the `sys` package.
	pub fn is_system(&self) -> bool {
		self.ancestor.is_none()
	}

	pub fn ancestor_name(&self) -> Option<&QName> {
		self.ancestor.as_ref().map(TypeRef::name)
	}

	/// Resolves the ancestor data type.
	pub fn ancestor<'a>(&self, types: &'a Types) -> Option<&'a Type> {
		self.ancestor.as_ref().and_then(|r| r.target(types))
	}

	/// Attaches constraints, replacing any earlier local constraint of the same kind.
	///
	/// Fails with `Incompatible` if a constraint kind or enumeration value type does not fit
	/// this data kind. No constraint is attached if any of them fails.
	pub fn add_constraints(&mut self, constraints: impl IntoIterator<Item = Constraint>) -> Result<(), Error> {
		let constraints: Vec<Constraint> = constraints.into_iter().collect();
		for c in &constraints {
			c.check_data_kind(self.kind)?;
		}
		for c in constraints {
			self.constraints.insert(c.kind(), c);
		}
		Ok(())
	}

	/// Returns a locally declared constraint.
	pub fn local_constraint(&self, kind: ConstraintKind) -> Option<&Constraint> {
		self.constraints.get(&kind)
	}

	/// Returns constraints, optionally merged with those inherited along the ancestor chain.
	///
	/// The first definer of each kind, walking from this node to the root, wins.
	pub fn constraints<'a>(&'a self, with_inherited: bool, types: &'a Types) -> ConstraintMap<'a> {
		let mut map: ConstraintMap<'a> = self.constraints.iter().map(|(k, c)| (*k, c)).collect();
		if !with_inherited {
			return map;
		}

		let mut next = self.ancestor(types);
		while let Some(t) = next {
			let Some(data) = t.as_data() else { break };
			for (k, c) in &data.constraints {
				map.entry(*k).or_insert(c);
			}
			next = data.ancestor(types);
		}
		map
	}

	/// Effective maximum length of string and bytes values: the nearest `MaxLen`, or
	/// [`DEFAULT_FIELD_MAX_LENGTH`] if the chain declares none. `None` for other kinds.
	pub fn max_len(&self, types: &Types) -> Option<u16> {
		if !matches!(self.kind, DataKind::String | DataKind::Bytes) {
			return None;
		}
		let declared = self.constraints(true, types).get(&ConstraintKind::MaxLen).and_then(|c| c.len());
		Some(declared.unwrap_or(DEFAULT_FIELD_MAX_LENGTH))
	}
}
