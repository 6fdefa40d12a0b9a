//! Workspaces: named subgraphs that own types and ACL rules.
//!
//! A workspace sees its own types, the types of every ancestor workspace (transitively) and the
//! workspace types it uses. Every workspace except `sys.Workspace` inherits `sys.Workspace`
//! unless ancestors are set explicitly.

use rustc_hash::FxHashSet as HashSet;

use crate::{AclRule, Error, QName, QNames, Type, TypeKind, TypeRef, Types};

#[cfg(test)]
mod tests;

/// Name of the built-in root workspace.
pub fn sys_workspace_name() -> QName {
	QName::sys("Workspace")
}

/// Payload of a [`TypeKind::Workspace`] type.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
	pub(crate) ancestors: QNames,
	pub(crate) used: QNames,
	pub(crate) descriptor: Option<TypeRef>,
	pub(crate) is_abstract: bool,
	/// Names of types owned by this workspace.
	pub(crate) local: QNames,
	/// Rules declared in this workspace, in declaration order.
	pub(crate) acl: Vec<AclRule>,
}

impl Workspace {
	pub(crate) fn new(ancestors: QNames) -> Self {
		Self {
			ancestors,
			..Self::default()
		}
	}

	/// Direct ancestors.
	pub fn ancestors(&self) -> &QNames {
		&self.ancestors
	}

	/// Workspaces used by this one.
	pub fn used_workspaces(&self) -> &QNames {
		&self.used
	}

	pub fn descriptor_name(&self) -> Option<&QName> {
		self.descriptor.as_ref().map(TypeRef::name)
	}

	/// Resolves the descriptor document.
	pub fn descriptor<'a>(&self, types: &'a Types) -> Option<&'a Type> {
		self.descriptor.as_ref().and_then(|r| r.target(types))
	}

	pub fn is_abstract(&self) -> bool {
		self.is_abstract
	}

	/// ACL rules declared in this workspace, in declaration order.
	pub fn acl(&self) -> &[AclRule] {
		&self.acl
	}

	/// Names of types owned by this workspace, sorted.
	pub fn local_type_names(&self) -> &QNames {
		&self.local
	}

	/// Types owned by this workspace, sorted by name.
	pub fn local_types<'a>(&'a self, types: &'a Types) -> impl Iterator<Item = &'a Type> + 'a {
		self.local.iter().filter_map(|n| types.get(n))
	}

	/// Returns true if `ws` is a direct or transitive ancestor.
	pub fn inherits(&self, ws: &QName, types: &Types) -> bool {
		let mut seen = HashSet::default();
		inherits_from(self, ws, types, &mut seen)
	}

	/// Every type visible in this workspace: local types, all ancestors' types and used
	/// workspaces, sorted by name.
	pub fn types<'a>(&'a self, types: &'a Types) -> Vec<&'a Type> {
		let mut names = QNames::new();
		let mut seen = HashSet::default();
		collect_visible(self, types, &mut names, &mut seen);
		for used in &self.used {
			names.add(used.clone());
		}
		names.iter().filter_map(|n| types.get(n)).collect()
	}

	/// Returns the visible type named `name`.
	pub fn type_by_name<'a>(&'a self, name: &QName, types: &'a Types) -> Option<&'a Type> {
		let t = types.get(name)?;
		(self.local.contains(name) || self.used.contains(name) || self.inherits_type(t, types)).then_some(t)
	}

	fn inherits_type(&self, t: &Type, types: &Types) -> bool {
		self.inherits(t.workspace(), types)
			&& types
				.get(t.workspace())
				.and_then(Type::as_workspace)
				.is_some_and(|ws| ws.local.contains(t.name()))
	}
}

fn inherits_from(ws: &Workspace, target: &QName, types: &Types, seen: &mut HashSet<QName>) -> bool {
	for anc in &ws.ancestors {
		if anc == target {
			return true;
		}
		if !seen.insert(anc.clone()) {
			continue;
		}
		if let Some(a) = types.get(anc).and_then(Type::as_workspace)
			&& inherits_from(a, target, types, seen)
		{
			return true;
		}
	}
	false
}

fn collect_visible(ws: &Workspace, types: &Types, names: &mut QNames, seen: &mut HashSet<QName>) {
	for n in &ws.local {
		names.add(n.clone());
	}
	for anc in &ws.ancestors {
		if !seen.insert(anc.clone()) {
			continue;
		}
		if let Some(a) = types.get(anc).and_then(Type::as_workspace) {
			collect_visible(a, types, names, seen);
		}
	}
}

/// Types visible in workspace `ws`, sorted by name. Empty if `ws` is not a workspace.
pub(crate) fn visible_types<'a>(types: &'a Types, ws: &QName) -> Vec<&'a Type> {
	types
		.get(ws)
		.and_then(Type::as_workspace)
		.map(|w| w.types(types))
		.unwrap_or_default()
}

/// Returns true if `t` is owned by `ws` or by one of its ancestors.
pub(crate) fn is_visible_in(types: &Types, ws: &QName, t: &Type) -> bool {
	let Some(w) = types.get(ws).and_then(Type::as_workspace) else {
		return false;
	};
	w.local.contains(t.name()) || w.inherits_type(t, types)
}

/// Checks that setting `ancestors` on `ws` does not close an inheritance cycle.
pub(crate) fn check_ancestors(types: &Types, ws: &QName, ancestors: &QNames) -> Result<(), Error> {
	for anc in ancestors {
		let Some(a) = types.get(anc).filter(|t| t.kind() == TypeKind::Workspace) else {
			return Err(Error::NotFound(format!("ancestor workspace «{anc}»")));
		};
		let circular = anc == ws || a.as_workspace().is_some_and(|a| a.inherits(ws, types));
		if circular {
			return Err(Error::Unsupported(format!(
				"circular inheritance of workspace «{ws}» from «{anc}»"
			)));
		}
	}
	Ok(())
}

/// Validates workspace-wide rules of `owner`.
pub(crate) fn validate_workspace(owner: &Type, ws: &Workspace, types: &Types, errors: &mut Vec<Error>) {
	let Some(descriptor) = &ws.descriptor else { return };
	match descriptor.target(types) {
		None => errors.push(Error::NotFound(format!("{owner} descriptor «{}»", descriptor.name()))),
		Some(d) => {
			let abstract_desc = d.as_structure().is_some_and(|s| s.is_abstract());
			if abstract_desc && !ws.is_abstract {
				errors.push(Error::Incompatible(format!(
					"non-abstract {owner} has abstract descriptor {d}"
				)));
			}
		}
	}
}
