//! Static composition tables keyed by [`TypeKind`].

use crate::{DataKind, DataKindSet, TypeKind, TypeKindSet};

/// Name of the system field holding the type name of a row.
pub const SYS_FIELD_QNAME: &str = "sys.QName";
/// Name of the system field holding the record id.
pub const SYS_FIELD_ID: &str = "sys.ID";
/// Name of the system field holding the parent record id.
pub const SYS_FIELD_PARENT_ID: &str = "sys.ParentID";
/// Name of the system field holding the container name within the parent.
pub const SYS_FIELD_CONTAINER: &str = "sys.Container";
/// Name of the system field holding the activity flag.
pub const SYS_FIELD_IS_ACTIVE: &str = "sys.IsActive";

/// A field injected into every type of some kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemField {
	pub name: &'static str,
	pub kind: DataKind,
	pub required: bool,
}

const fn sys_field(name: &'static str, kind: DataKind, required: bool) -> SystemField {
	SystemField { name, kind, required }
}

const QNAME: SystemField = sys_field(SYS_FIELD_QNAME, DataKind::QName, true);
const ID: SystemField = sys_field(SYS_FIELD_ID, DataKind::RecordID, true);
const PARENT_ID: SystemField = sys_field(SYS_FIELD_PARENT_ID, DataKind::RecordID, true);
const CONTAINER: SystemField = sys_field(SYS_FIELD_CONTAINER, DataKind::String, true);
const IS_ACTIVE: SystemField = sys_field(SYS_FIELD_IS_ACTIVE, DataKind::Bool, false);

const DOC_FIELDS: &[SystemField] = &[QNAME, ID, IS_ACTIVE];
const ODOC_FIELDS: &[SystemField] = &[QNAME, ID];
const RECORD_FIELDS: &[SystemField] = &[QNAME, ID, PARENT_ID, CONTAINER, IS_ACTIVE];
const ORECORD_FIELDS: &[SystemField] = &[QNAME, ID, PARENT_ID, CONTAINER];
const VIEW_FIELDS: &[SystemField] = &[QNAME];
const OBJECT_FIELDS: &[SystemField] = &[QNAME, sys_field(SYS_FIELD_CONTAINER, DataKind::String, false)];

impl TypeKind {
	/// System fields injected into new types of this kind, in injection order.
	pub const fn system_fields(self) -> &'static [SystemField] {
		match self {
			Self::GDoc | Self::CDoc | Self::WDoc => DOC_FIELDS,
			Self::ODoc => ODOC_FIELDS,
			Self::GRecord | Self::CRecord | Self::WRecord => RECORD_FIELDS,
			Self::ORecord => ORECORD_FIELDS,
			Self::ViewRecord => VIEW_FIELDS,
			Self::Object => OBJECT_FIELDS,
			_ => &[],
		}
	}

	/// Data kinds a user field of this type kind may use.
	pub const fn field_kinds(self) -> DataKindSet {
		match self {
			Self::ViewRecord => DataKindSet::SCALARS
				.union(DataKindSet::RECORD)
				.union(DataKindSet::EVENT),
			_ if self.is_in(TypeKindSet::STRUCTURES) => DataKindSet::SCALARS,
			_ => DataKindSet::empty(),
		}
	}

	/// Type kinds a container of this type kind may hold.
	pub const fn container_kinds(self) -> TypeKindSet {
		match self {
			Self::GDoc | Self::GRecord => TypeKindSet::GRECORD,
			Self::CDoc | Self::CRecord => TypeKindSet::CRECORD,
			Self::WDoc | Self::WRecord => TypeKindSet::WRECORD,
			Self::ODoc => TypeKindSet::ODOC.union(TypeKindSet::ORECORD),
			Self::ORecord => TypeKindSet::ORECORD,
			Self::Object => TypeKindSet::OBJECT,
			_ => TypeKindSet::empty(),
		}
	}
}
