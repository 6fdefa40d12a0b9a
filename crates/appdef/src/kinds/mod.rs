//! Closed enumerations of the definition model and their text forms.
//!
//! Every enumeration renders as `<Enum>_<Variant>` (e.g. `TypeKind_CDoc`) and offers
//! `trim_string()` for the bare variant text used in messages and rule rendering.

use std::fmt;

use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

mod sets;
#[cfg(test)]
mod tests;

pub use sets::{
	ConstraintKindSet, DataKindSet, OperationSet, RateScopeSet, TypeKindSet, VerificationKindSet,
};

macro_rules! kind_text {
	($ty:ident, $prefix:literal) => {
		impl $ty {
			/// Returns the variant text without the enumeration prefix.
			pub fn trim_string(self) -> &'static str {
				self.into()
			}

			/// Iterates all variants in declaration order.
			pub fn all() -> impl Iterator<Item = Self> {
				<Self as IntoEnumIterator>::iter()
			}
		}

		impl fmt::Display for $ty {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, concat!($prefix, "_{}"), self.trim_string())
			}
		}
	};
}

/// Kind of a type in the application graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum TypeKind {
	#[default]
	#[strum(serialize = "null")]
	Null,
	Any,
	Data,
	GDoc,
	CDoc,
	WDoc,
	ODoc,
	GRecord,
	CRecord,
	WRecord,
	ORecord,
	Object,
	ViewRecord,
	Query,
	Command,
	Projector,
	Job,
	Workspace,
	Role,
	Rate,
	Limit,
	Tag,
}
kind_text!(TypeKind, "TypeKind");

/// Primitive value kind of a data type or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum DataKind {
	#[default]
	#[strum(serialize = "null")]
	Null,
	#[strum(serialize = "int32")]
	Int32,
	#[strum(serialize = "int64")]
	Int64,
	#[strum(serialize = "float32")]
	Float32,
	#[strum(serialize = "float64")]
	Float64,
	#[strum(serialize = "bytes")]
	Bytes,
	#[strum(serialize = "string")]
	String,
	QName,
	#[strum(serialize = "bool")]
	Bool,
	RecordID,
	Record,
	Event,
}
kind_text!(DataKind, "DataKind");

impl DataKind {
	/// Returns true for kinds with a fixed storage width.
	pub const fn is_fixed(self) -> bool {
		matches!(
			self,
			Self::Int32 | Self::Int64 | Self::Float32 | Self::Float64 | Self::QName | Self::Bool | Self::RecordID
		)
	}

	/// Returns true for kinds that can be the root of a data chain in the `sys` package.
	pub const fn is_sys_data(self) -> bool {
		!matches!(self, Self::Null)
	}

	/// Returns the constraint kinds that may restrict values of this kind.
	pub const fn constraints(self) -> ConstraintKindSet {
		match self {
			Self::Bytes => ConstraintKindSet::LENGTHS.union(ConstraintKindSet::PATTERN),
			Self::String => ConstraintKindSet::LENGTHS
				.union(ConstraintKindSet::PATTERN)
				.union(ConstraintKindSet::ENUM),
			Self::Int32 | Self::Int64 | Self::Float32 | Self::Float64 => {
				ConstraintKindSet::BOUNDS.union(ConstraintKindSet::ENUM)
			}
			_ => ConstraintKindSet::empty(),
		}
	}

	/// Returns true if values of this kind may carry a constraint of `ck`.
	pub const fn supports_constraint(self, ck: ConstraintKind) -> bool {
		self.constraints().contains(ck.as_set())
	}
}

/// Kind of a data constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum ConstraintKind {
	#[default]
	#[strum(serialize = "null")]
	Null,
	MinLen,
	MaxLen,
	Pattern,
	MinIncl,
	MinExcl,
	MaxIncl,
	MaxExcl,
	Enum,
}
kind_text!(ConstraintKind, "ConstraintKind");

/// Operation that an ACL rule, projector event or limit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum OperationKind {
	#[default]
	#[strum(serialize = "null")]
	Null,
	Insert,
	Update,
	Activate,
	Deactivate,
	Select,
	Execute,
	ExecuteWithParam,
	Inherits,
}
kind_text!(OperationKind, "OperationKind");

/// Policy of an ACL rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum PolicyKind {
	#[default]
	#[strum(serialize = "null")]
	Null,
	Allow,
	Deny,
}
kind_text!(PolicyKind, "PolicyKind");

impl PolicyKind {
	/// Returns the rule verb: `GRANT` for allow, `REVOKE` for deny.
	pub fn action_string(self) -> &'static str {
		match self {
			Self::Allow => "GRANT",
			Self::Deny => "REVOKE",
			Self::Null => self.trim_string(),
		}
	}
}

/// Discriminant of a [`crate::Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum FilterKind {
	True,
	QNames,
	Tags,
	Types,
	And,
	Or,
	Not,
}
kind_text!(FilterKind, "FilterKind");

/// Scope a rate is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum RateScope {
	AppPartition,
	Workspace,
	User,
	IP,
}
kind_text!(RateScope, "RateScope");

/// How a limit applies to the types its filter matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum LimitFilterOption {
	/// One shared budget for all matched types.
	#[default]
	#[strum(serialize = "ALL")]
	All,
	/// A separate budget for each matched type.
	#[strum(serialize = "EACH")]
	Each,
}
kind_text!(LimitFilterOption, "LimitFilterOption");

/// Engine that runs an extension. The definition only records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum ExtensionEngineKind {
	#[default]
	BuiltIn,
	WASM,
}
kind_text!(ExtensionEngineKind, "ExtensionEngineKind");

/// How a verifiable field value is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(IntoStaticStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum VerificationKind {
	EMail,
	Phone,
}
kind_text!(VerificationKind, "VerificationKind");

/// Container occurrence bound. [`Occurs::UNBOUNDED`] has no upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occurs(pub u16);

impl Occurs {
	pub const UNBOUNDED: Occurs = Occurs(u16::MAX);

	pub const fn is_unbounded(self) -> bool {
		self.0 == u16::MAX
	}
}

impl fmt::Display for Occurs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_unbounded() {
			f.write_str("unbounded")
		} else {
			write!(f, "{}", self.0)
		}
	}
}
