//! Access control rules: grants and revokes of operations on filtered resources to roles.
//!
//! # Purpose
//!
//! An [`AclRule`] states that a role is allowed ([`PolicyKind::Allow`]) or denied
//! ([`PolicyKind::Deny`]) a set of operations on every type its filter matches, optionally
//! restricted to some fields. The engine only defines and validates rules; enforcement happens
//! elsewhere.
//!
//! # Mental Model
//!
//! 1. **Shape check:** When a rule is declared, its operation set, policy and field list are
//!    checked on their own ([`check_operations`]).
//! 2. **Local match check:** The filter is evaluated against the workspace as it is at that
//!    moment. Every current match must accept the operations and carry the fields.
//! 3. **Build check:** [`AclRule::validate`] re-evaluates the filter against the final graph.
//!    Types declared after the rule are checked here, and a filter without matches is an error.
//!
//! `grant_all`/`revoke_all` infer the operation set from the first match only; disagreeing
//! later matches surface through the regular match check.
//!
//! # Invariants
//!
//! - Must only combine operations from one compatibility group.
//!   - Enforced in: [`check_operations`]
//!   - Tested by: [`crate::invariants::test_acl_operation_self_compatibility`]
//!   - Failure symptom: A rule grants both record access and execution.
//!
//! - Must never revoke inheritance or restrict inheritance and execution by fields.
//!   - Enforced in: [`check_operations`]
//!   - Tested by: [`crate::acl::tests::test_operation_shape_errors`]
//!   - Failure symptom: Role graph depends on deny rules.
//!
//! - Must reject role inheritance cycles.
//!   - Enforced in: [`validate_role_cycles`]
//!   - Tested by: [`crate::invariants::test_role_inheritance_acyclic`]
//!   - Failure symptom: Infinite recursion in consumers walking role ancestors.

use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashSet as HashSet;
use smallvec::SmallVec;

use crate::{
	Error, Filter, OperationKind, OperationSet, PolicyKind, QName, QNames, Type, TypeKind, Types,
	filter_matches, first_filter_match,
};
use crate::workspace::visible_types;


/// Every operation an ACL rule may name.
const ACL_OPERATIONS: OperationSet =
	OperationSet::RECORDS.union(OperationSet::EXECUTE).union(OperationSet::INHERITS);

/// Returns the operations an ACL rule may grant or revoke on `t`. Empty if `t` can not be an
/// ACL resource.
pub fn acl_operations_on(t: &Type) -> OperationSet {
	match t.kind() {
		TypeKind::Any if t.name() == &crate::any_qname() => {
			ACL_OPERATIONS
		}
		TypeKind::GDoc
		| TypeKind::CDoc
		| TypeKind::WDoc
		| TypeKind::ODoc
		| TypeKind::GRecord
		| TypeKind::CRecord
		| TypeKind::WRecord
		| TypeKind::ORecord
		| TypeKind::Object
		| TypeKind::ViewRecord => OperationSet::RECORDS,
		TypeKind::Command | TypeKind::Query => OperationSet::EXECUTE,
		TypeKind::Workspace => {
			OperationSet::INSERT | OperationSet::UPDATE | OperationSet::SELECT | OperationSet::EXECUTE
		}
		TypeKind::Role => OperationSet::INHERITS,
		_ => OperationSet::empty(),
	}
}

/// Checks an operation list on its own and returns it as a set.
///
/// - `Missed` if empty
/// - `Unsupported` for operations an ACL rule can not name, and for `Inherits` under any
///   policy but allow
/// - `Incompatible` if the operations can not be combined, or if `Inherits` or `Execute` are
///   restricted by fields
pub fn check_operations(policy: PolicyKind, ops: &[OperationKind], has_fields: bool) -> Result<OperationSet, Error> {
	if ops.is_empty() {
		return Err(Error::Missed("operations".into()));
	}
	if let Some(op) = ops.iter().find(|op| **op == OperationKind::Null) {
		return Err(Error::Unsupported(format!("operation {op}")));
	}
	let set: OperationSet = ops.iter().collect();
	let outside = set.difference(ACL_OPERATIONS);
	if !outside.is_empty() {
		return Err(Error::Unsupported(format!("operations {outside} in ACL rule")));
	}
	if set.has(OperationKind::Inherits) && policy != PolicyKind::Allow {
		return Err(Error::Unsupported(format!("{} {set}", policy.action_string())));
	}
	if !set.is_compatible() {
		return Err(Error::Incompatible(format!("operations {set} can not be combined")));
	}
	if has_fields && set.intersects(OperationSet::INHERITS | OperationSet::EXECUTE) {
		return Err(Error::Incompatible(format!("operations {set} can not be restricted by fields")));
	}
	Ok(set)
}

/// Resource filter of an ACL rule, with an optional field restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct AclFilter {
	filter: Filter,
	fields: SmallVec<[String; 4]>,
}

impl AclFilter {
	pub fn filter(&self) -> &Filter {
		&self.filter
	}

	/// Restricted fields, in declaration order. Empty means all fields.
	pub fn fields(&self) -> &[String] {
		&self.fields
	}

	pub fn has_fields(&self) -> bool {
		!self.fields.is_empty()
	}
}

impl std::ops::Deref for AclFilter {
	type Target = Filter;

	fn deref(&self) -> &Filter {
		&self.filter
	}
}

impl fmt::Display for AclFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.filter)?;
		if self.has_fields() {
			write!(f, "[{}]", self.fields.iter().join(" "))?;
		}
		Ok(())
	}
}

/// A grant or revoke of operations to a role.
#[derive(Debug, Clone, PartialEq)]
pub struct AclRule {
	policy: PolicyKind,
	ops: OperationSet,
	filter: AclFilter,
	principal: QName,
	workspace: QName,
	comment: String,
}

impl AclRule {
	/// Declares a rule in workspace `ws`, checking it against the current graph.
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn new(
		types: &Types,
		ws: &QName,
		policy: PolicyKind,
		ops: &[OperationKind],
		filter: Filter,
		fields: &[&str],
		principal: &QName,
		comment: &str,
	) -> Result<Self, Error> {
		let ops = check_operations(policy, ops, !fields.is_empty())?;
		if types.get(principal).filter(|t| t.kind() == TypeKind::Role).is_none() {
			return Err(Error::NotFound(format!("role «{principal}»")));
		}

		let mut rule = Self {
			policy,
			ops,
			filter: AclFilter {
				filter,
				fields: fields.iter().map(|f| (*f).to_owned()).collect(),
			},
			principal: principal.clone(),
			workspace: ws.clone(),
			comment: comment.to_owned(),
		};
		for t in rule.matches(types) {
			rule.check_match(t)?;
		}
		if rule.comment.is_empty() {
			rule.comment = rule.to_string();
		}
		Ok(rule)
	}

	/// Declares a rule over every operation the first filter match accepts.
	pub(crate) fn all(
		types: &Types,
		ws: &QName,
		policy: PolicyKind,
		filter: Filter,
		principal: &QName,
		comment: &str,
	) -> Result<Self, Error> {
		let candidates = visible_types(types, ws);
		let first = first_filter_match(&filter, candidates, types)
			.ok_or_else(|| Error::filter_has_no_matches(&filter, ws))?;
		let mut ops = acl_operations_on(first);
		if ops.is_empty() {
			return Err(Error::acl_unsupported_type(first));
		}
		if policy != PolicyKind::Allow {
			ops.remove(OperationSet::INHERITS);
		}
		if ops.is_empty() {
			return Err(Error::Unsupported(format!("{} on {first}", policy.action_string())));
		}
		Self::new(types, ws, policy, &ops.to_vec(), filter, &[], principal, comment)
	}

	pub fn policy(&self) -> PolicyKind {
		self.policy
	}

	/// Operations, in declaration order of [`OperationKind`].
	pub fn ops(&self) -> Vec<OperationKind> {
		self.ops.to_vec()
	}

	pub fn op_set(&self) -> OperationSet {
		self.ops
	}

	/// Returns true if the rule covers `op`.
	pub fn op(&self, op: OperationKind) -> bool {
		self.ops.has(op)
	}

	pub fn filter(&self) -> &AclFilter {
		&self.filter
	}

	/// Name of the role the rule applies to.
	pub fn principal(&self) -> &QName {
		&self.principal
	}

	/// Name of the workspace the rule is declared in.
	pub fn workspace(&self) -> &QName {
		&self.workspace
	}

	/// Comment of the rule. Defaults to the rule text.
	pub fn comment(&self) -> &str {
		&self.comment
	}

	/// Types the rule currently applies to.
	pub fn matches<'a>(&self, types: &'a Types) -> Vec<&'a Type> {
		filter_matches(&self.filter.filter, visible_types(types, &self.workspace), types)
	}

	fn check_match(&self, t: &Type) -> Result<(), Error> {
		let allowed = acl_operations_on(t);
		if allowed.is_empty() {
			return Err(Error::acl_unsupported_type(t));
		}
		if !allowed.contains(self.ops) {
			return Err(Error::Incompatible(format!(
				"operations {} are not applicable to {t}",
				self.ops.difference(allowed)
			)));
		}
		for name in &self.filter.fields {
			if !t.fields().is_some_and(|ff| ff.contains(name)) {
				return Err(Error::NotFound(format!("field «{name}» in {t}")));
			}
		}
		Ok(())
	}

	/// Re-checks the rule against the final graph.
	pub(crate) fn validate(&self, types: &Types, errors: &mut Vec<Error>) {
		let matches = self.matches(types);
		if matches.is_empty() {
			errors.push(Error::filter_has_no_matches(&self.filter, &self.workspace));
			return;
		}
		for t in matches {
			if let Err(err) = self.check_match(t) {
				errors.push(err);
			}
		}
	}
}

impl fmt::Display for AclRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let to = match self.policy {
			PolicyKind::Deny => "FROM",
			_ => "TO",
		};
		write!(
			f,
			"{} {} ON {} {to} {}",
			self.policy.action_string(),
			self.ops,
			self.filter,
			self.principal
		)
	}
}

/// Returns the roles `role` directly inherits through allow rules in `acl`.
pub fn role_ancestors(role: &QName, acl: &[AclRule], types: &Types) -> QNames {
	let mut ancestors = QNames::new();
	for rule in acl.iter().filter(|r| {
		&r.principal == role && r.policy == PolicyKind::Allow && r.ops.has(OperationKind::Inherits)
	}) {
		if let Some(names) = rule.filter.qname_set() {
			for n in names {
				ancestors.add(n.clone());
			}
		} else {
			for t in rule.matches(types) {
				if t.kind() == TypeKind::Role {
					ancestors.add(t.name().clone());
				}
			}
		}
	}
	ancestors
}

/// Reports every role that transitively inherits itself.
pub(crate) fn validate_role_cycles(types: &Types, acl: &[AclRule], errors: &mut Vec<Error>) {
	for role in types.of_kinds(TypeKind::Role.as_set()) {
		let mut seen = HashSet::default();
		let mut stack: Vec<QName> = role_ancestors(role.name(), acl, types).iter().cloned().collect();
		while let Some(next) = stack.pop() {
			if &next == role.name() {
				errors.push(Error::Unsupported(format!("circular inheritance of {role}")));
				break;
			}
			if seen.insert(next.clone()) {
				stack.extend(role_ancestors(&next, acl, types).iter().cloned());
			}
		}
	}
}
