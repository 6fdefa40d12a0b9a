//! Bit sets over the closed enumerations.
//!
//! Bit `n` of a set stands for the variant with discriminant `n`, so iteration in bit order is
//! iteration in declaration order.

use std::fmt;

use itertools::Itertools;
use strum::EnumCount;

use super::{ConstraintKind, DataKind, OperationKind, RateScope, TypeKind, VerificationKind};

macro_rules! kind_set {
	($set:ident, $kind:ident, $bits:ty) => {
		const _: () = assert!($kind::COUNT <= <$bits>::BITS as usize);

		impl $kind {
			/// Returns the single-element set for this kind.
			pub const fn as_set(self) -> $set {
				$set::from_bits_retain(1 << (self as u8))
			}
		}

		impl $set {
			/// Iterates the kinds in the set in declaration order.
			pub fn kinds(self) -> impl Iterator<Item = $kind> {
				$kind::all().filter(move |k| self.contains(k.as_set()))
			}

			/// Returns true if `kind` is a member.
			pub const fn has(self, kind: $kind) -> bool {
				self.contains(kind.as_set())
			}

			/// Returns the kinds as an ordered vector.
			pub fn to_vec(self) -> Vec<$kind> {
				self.kinds().collect()
			}
		}

		impl From<$kind> for $set {
			fn from(kind: $kind) -> Self {
				kind.as_set()
			}
		}

		impl FromIterator<$kind> for $set {
			fn from_iter<I: IntoIterator<Item = $kind>>(iter: I) -> Self {
				let mut set = $set::empty();
				for kind in iter {
					set |= kind.as_set();
				}
				set
			}
		}

		impl<'a> FromIterator<&'a $kind> for $set {
			fn from_iter<I: IntoIterator<Item = &'a $kind>>(iter: I) -> Self {
				iter.into_iter().copied().collect()
			}
		}

		impl fmt::Display for $set {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "[{}]", self.kinds().map(|k| k.trim_string()).join(" "))
			}
		}
	};
}

bitflags::bitflags! {
	/// A set of type kinds.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct TypeKindSet: u32 {
		const ANY = 1 << TypeKind::Any as u8;
		const DATA = 1 << TypeKind::Data as u8;
		const GDOC = 1 << TypeKind::GDoc as u8;
		const CDOC = 1 << TypeKind::CDoc as u8;
		const WDOC = 1 << TypeKind::WDoc as u8;
		const ODOC = 1 << TypeKind::ODoc as u8;
		const GRECORD = 1 << TypeKind::GRecord as u8;
		const CRECORD = 1 << TypeKind::CRecord as u8;
		const WRECORD = 1 << TypeKind::WRecord as u8;
		const ORECORD = 1 << TypeKind::ORecord as u8;
		const OBJECT = 1 << TypeKind::Object as u8;
		const VIEW_RECORD = 1 << TypeKind::ViewRecord as u8;
		const QUERY = 1 << TypeKind::Query as u8;
		const COMMAND = 1 << TypeKind::Command as u8;
		const PROJECTOR = 1 << TypeKind::Projector as u8;
		const JOB = 1 << TypeKind::Job as u8;
		const WORKSPACE = 1 << TypeKind::Workspace as u8;
		const ROLE = 1 << TypeKind::Role as u8;
		const RATE = 1 << TypeKind::Rate as u8;
		const LIMIT = 1 << TypeKind::Limit as u8;
		const TAG = 1 << TypeKind::Tag as u8;

		/// Documents of every storage class.
		const DOCS = Self::GDOC.bits() | Self::CDOC.bits() | Self::WDOC.bits() | Self::ODOC.bits();
		/// Documents and their nested records.
		const RECORDS = Self::DOCS.bits()
			| Self::GRECORD.bits() | Self::CRECORD.bits() | Self::WRECORD.bits() | Self::ORECORD.bits();
		/// Everything with fields and containers.
		const STRUCTURES = Self::RECORDS.bits() | Self::OBJECT.bits();
		/// Documents that may be declared singletons.
		const SINGLETONS = Self::CDOC.bits() | Self::WDOC.bits();
		const FUNCTIONS = Self::QUERY.bits() | Self::COMMAND.bits();
		const EXTENSIONS = Self::FUNCTIONS.bits() | Self::PROJECTOR.bits() | Self::JOB.bits();
		/// Kinds a rate limit may apply to.
		const LIMITABLES = Self::STRUCTURES.bits() | Self::VIEW_RECORD.bits() | Self::FUNCTIONS.bits();
	}
}
kind_set!(TypeKindSet, TypeKind, u32);

bitflags::bitflags! {
	/// A set of data kinds.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct DataKindSet: u16 {
		const INT32 = 1 << DataKind::Int32 as u8;
		const INT64 = 1 << DataKind::Int64 as u8;
		const FLOAT32 = 1 << DataKind::Float32 as u8;
		const FLOAT64 = 1 << DataKind::Float64 as u8;
		const BYTES = 1 << DataKind::Bytes as u8;
		const STRING = 1 << DataKind::String as u8;
		const QNAME = 1 << DataKind::QName as u8;
		const BOOL = 1 << DataKind::Bool as u8;
		const RECORD_ID = 1 << DataKind::RecordID as u8;
		const RECORD = 1 << DataKind::Record as u8;
		const EVENT = 1 << DataKind::Event as u8;

		/// Kinds a field of a document, record or object may use.
		const SCALARS = Self::INT32.bits() | Self::INT64.bits() | Self::FLOAT32.bits() | Self::FLOAT64.bits()
			| Self::BYTES.bits() | Self::STRING.bits() | Self::QNAME.bits() | Self::BOOL.bits()
			| Self::RECORD_ID.bits();
	}
}
kind_set!(DataKindSet, DataKind, u16);

bitflags::bitflags! {
	/// A set of constraint kinds.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct ConstraintKindSet: u16 {
		const MIN_LEN = 1 << ConstraintKind::MinLen as u8;
		const MAX_LEN = 1 << ConstraintKind::MaxLen as u8;
		const PATTERN = 1 << ConstraintKind::Pattern as u8;
		const MIN_INCL = 1 << ConstraintKind::MinIncl as u8;
		const MIN_EXCL = 1 << ConstraintKind::MinExcl as u8;
		const MAX_INCL = 1 << ConstraintKind::MaxIncl as u8;
		const MAX_EXCL = 1 << ConstraintKind::MaxExcl as u8;
		const ENUM = 1 << ConstraintKind::Enum as u8;

		const LENGTHS = Self::MIN_LEN.bits() | Self::MAX_LEN.bits();
		const BOUNDS = Self::MIN_INCL.bits() | Self::MIN_EXCL.bits() | Self::MAX_INCL.bits() | Self::MAX_EXCL.bits();
	}
}
kind_set!(ConstraintKindSet, ConstraintKind, u16);

bitflags::bitflags! {
	/// A set of operations.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct OperationSet: u16 {
		const INSERT = 1 << OperationKind::Insert as u8;
		const UPDATE = 1 << OperationKind::Update as u8;
		const ACTIVATE = 1 << OperationKind::Activate as u8;
		const DEACTIVATE = 1 << OperationKind::Deactivate as u8;
		const SELECT = 1 << OperationKind::Select as u8;
		const EXECUTE = 1 << OperationKind::Execute as u8;
		const EXECUTE_WITH_PARAM = 1 << OperationKind::ExecuteWithParam as u8;
		const INHERITS = 1 << OperationKind::Inherits as u8;

		/// Operations on records. Any subset of them is a valid combination.
		const RECORDS = Self::INSERT.bits() | Self::UPDATE.bits() | Self::ACTIVATE.bits()
			| Self::DEACTIVATE.bits() | Self::SELECT.bits();
	}
}
kind_set!(OperationSet, OperationKind, u16);

impl OperationSet {
	/// Returns true if the operations may appear together in one rule.
	///
	/// Records operations combine freely. Any other operation must be the only one.
	pub fn is_compatible(self) -> bool {
		Self::RECORDS.contains(self) || self.bits().count_ones() <= 1
	}
}

bitflags::bitflags! {
	/// A set of rate scopes.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct RateScopeSet: u8 {
		const APP_PARTITION = 1 << RateScope::AppPartition as u8;
		const WORKSPACE = 1 << RateScope::Workspace as u8;
		const USER = 1 << RateScope::User as u8;
		const IP = 1 << RateScope::IP as u8;
	}
}
kind_set!(RateScopeSet, RateScope, u8);

bitflags::bitflags! {
	/// A set of verification kinds.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct VerificationKindSet: u8 {
		const EMAIL = 1 << VerificationKind::EMail as u8;
		const PHONE = 1 << VerificationKind::Phone as u8;
	}
}
kind_set!(VerificationKindSet, VerificationKind, u8);
