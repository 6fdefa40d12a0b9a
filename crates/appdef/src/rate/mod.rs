//! Rates and the limits that apply them to filtered types.

use std::fmt;
use std::time::Duration;

use crate::{
	Error, Filter, LimitFilterOption, OperationKind, OperationSet, QName, RateScope, RateScopeSet, Type,
	TypeKind, TypeKindSet, TypeRef, Types, filter_matches,
};
use crate::workspace::visible_types;

#[cfg(test)]
mod tests;

/// Payload of a [`TypeKind::Rate`] type: at most `count` operations per `period`, counted
/// separately per scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
	count: u32,
	period: Duration,
	scopes: RateScopeSet,
}

impl Rate {
	/// Creates a rate. Empty `scopes` default to [`RateScope::AppPartition`].
	pub(crate) fn new(count: u32, period: Duration, scopes: &[RateScope]) -> Result<Self, Error> {
		if count == 0 {
			return Err(Error::OutOfBounds("rate count must be positive".into()));
		}
		if period.is_zero() {
			return Err(Error::OutOfBounds("rate period must be positive".into()));
		}
		let mut scopes: RateScopeSet = scopes.iter().collect();
		if scopes.is_empty() {
			scopes = RateScopeSet::APP_PARTITION;
		}
		Ok(Self { count, period, scopes })
	}

	pub fn count(&self) -> u32 {
		self.count
	}

	pub fn period(&self) -> Duration {
		self.period
	}

	/// Scopes, in declaration order of [`RateScope`].
	pub fn scopes(&self) -> Vec<RateScope> {
		self.scopes.to_vec()
	}

	/// Returns true if the rate is counted per `scope`.
	pub fn scope(&self, scope: RateScope) -> bool {
		self.scopes.has(scope)
	}
}

/// Which types of a limit filter share one counter.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitFilter {
	option: LimitFilterOption,
	filter: Filter,
}

impl LimitFilter {
	/// `All` counts every matched type together, `Each` counts every matched type separately.
	pub fn option(&self) -> LimitFilterOption {
		self.option
	}

	pub fn filter(&self) -> &Filter {
		&self.filter
	}
}

impl std::ops::Deref for LimitFilter {
	type Target = Filter;

	fn deref(&self) -> &Filter {
		&self.filter
	}
}

impl fmt::Display for LimitFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = self.filter.to_string();
		let text = text.strip_prefix("ALL ").unwrap_or(&text);
		write!(f, "{} {text}", self.option.trim_string())
	}
}

/// Payload of a [`TypeKind::Limit`] type.
#[derive(Debug, Clone)]
pub struct Limit {
	ops: OperationSet,
	filter: LimitFilter,
	rate: TypeRef,
}

impl Limit {
	/// Creates a limit and checks it against the types currently visible in `ws`. The rate is
	/// resolved at build.
	pub(crate) fn new(
		types: &Types,
		ws: &QName,
		ops: &[OperationKind],
		option: LimitFilterOption,
		filter: Filter,
		rate: &QName,
	) -> Result<Self, Error> {
		if ops.is_empty() {
			return Err(Error::Missed("limit operations".into()));
		}
		let set: OperationSet = ops.iter().collect();
		if set.has(OperationKind::Inherits) || set.has(OperationKind::Null) {
			return Err(Error::Unsupported(format!("limit operations {set}")));
		}
		if !set.is_compatible() {
			return Err(Error::Incompatible(format!("limit operations {set} can not be combined")));
		}
		if rate.is_null() {
			return Err(Error::Missed("limit rate".into()));
		}

		let limit = Self {
			ops: set,
			filter: LimitFilter { option, filter },
			rate: TypeRef::new(rate.clone()),
		};
		for t in filter_matches(&limit.filter.filter, visible_types(types, ws), types) {
			check_limitable(t)?;
		}
		Ok(limit)
	}

	/// Operations, in declaration order of [`OperationKind`].
	pub fn ops(&self) -> Vec<OperationKind> {
		self.ops.to_vec()
	}

	pub fn op(&self, op: OperationKind) -> bool {
		self.ops.has(op)
	}

	pub fn filter(&self) -> &LimitFilter {
		&self.filter
	}

	pub fn rate_name(&self) -> &QName {
		self.rate.name()
	}

	pub fn rate<'a>(&self, types: &'a Types) -> Option<&'a Rate> {
		self.rate.target(types).and_then(Type::as_rate)
	}

	pub(crate) fn validate(&self, owner: &Type, types: &Types, errors: &mut Vec<Error>) {
		let matches = filter_matches(&self.filter.filter, visible_types(types, owner.workspace()), types);
		if matches.is_empty() {
			errors.push(Error::filter_has_no_matches(&self.filter, owner.workspace()));
		}
		for t in matches {
			if let Err(err) = check_limitable(t) {
				errors.push(err);
			}
		}
		if self.rate(types).is_none() {
			errors.push(Error::NotFound(format!("{owner} rate «{}»", self.rate.name())));
		}
	}
}

fn check_limitable(t: &Type) -> Result<(), Error> {
	if is_limitable(t.kind()) {
		Ok(())
	} else {
		Err(Error::Unsupported(format!("limit on {t}, only {} are limitable", TypeKindSet::LIMITABLES)))
	}
}

/// Returns true if types of `kind` may be limited.
pub fn is_limitable(kind: TypeKind) -> bool {
	kind.is_in(TypeKindSet::LIMITABLES)
}
