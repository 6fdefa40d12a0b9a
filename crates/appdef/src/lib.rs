//! Application definition registry.
//!
//! An application is declared through [`AppDefBuilder`]: packages, workspaces and the types
//! each workspace owns (data types, documents, records, objects, views, commands, queries,
//! projectors, jobs, roles, rates, limits and tags), plus the ACL rules granting roles access.
//! [`AppDefBuilder::build`] validates the whole graph and seals it into an immutable
//! [`AppDef`] that is read concurrently by the rest of the system.
//!
//! # Module map
//!
//! - [`qname`] - qualified names and identifier rules
//! - [`kinds`] - closed enumerations and their bit sets
//! - [`types`] - the type arena, `Type` header and lazily resolved references
//! - [`data`], [`constraint`] - scalar data types and their constraints
//! - [`structure`], [`view`] - fields, containers, uniques and view keys
//! - [`filter`] - type filters used by ACL, limits and projector events
//! - [`workspace`] - ownership, inheritance and visibility
//! - [`acl`] - grant/revoke rules and role inheritance
//! - [`extension`] - commands, queries, projectors and jobs
//! - [`rate`] - rates and limits
//! - [`builder`] - mutable construction and the build pipeline
//! - [`app`] - the sealed application

pub mod acl;
pub mod app;
pub mod builder;
pub mod constraint;
pub mod data;
pub mod error;
pub mod extension;
pub mod filter;
pub mod kinds;
pub mod packages;
pub mod qname;
pub mod rate;
pub mod structure;
pub mod tag;
pub mod types;
pub mod view;
pub mod workspace;

#[cfg(test)]
mod invariants;

pub use constraint as constraints;

pub use acl::{AclFilter, AclRule, acl_operations_on, check_operations, role_ancestors};
pub use app::{AppDef, Role};
pub use builder::{
	AppDefBuilder, DataBuilder, FunctionBuilder, JobBuilder, ProjectorBuilder, RoleBuilder, StructureBuilder,
	TagBuilder, ViewBuilder, WorkspaceBuilder,
};
pub use constraint::{Constraint, ConstraintValue, EnumValue, EnumValues};
pub use data::{ConstraintMap, Data, sys_data_name};
pub use error::{BuildError, Error, ErrorKind};
pub use extension::{
	CronValidator, Extension, Function, Job, Projector, ProjectorEvent, Storage, Storages, sys_records_storage,
	sys_views_storage, sys_wlog_storage,
};
pub use filter::{Filter, filter_matches, first_filter_match};
pub use kinds::{
	ConstraintKind, ConstraintKindSet, DataKind, DataKindSet, ExtensionEngineKind, FilterKind, LimitFilterOption,
	Occurs, OperationKind, OperationSet, PolicyKind, RateScope, RateScopeSet, TypeKind, TypeKindSet,
	VerificationKind, VerificationKindSet,
};
pub use packages::Packages;
pub use qname::{FullQName, QNAME_QUALIFIER, QName, QNames, unique_qname, valid_ident, valid_qname};
pub use rate::{Limit, LimitFilter, Rate, is_limitable};
pub use structure::{Container, Containers, Field, FieldData, Fields, Structure, Unique, Uniques};
pub use tag::Tag;
pub use types::{FindType, Mixins, NULL_TYPE, Type, TypeBody, TypeId, TypeRef, Types};
pub use view::View;
pub use workspace::{Workspace, sys_workspace_name};

/// Local name of the built-in package.
pub const SYS_PACKAGE: &str = "sys";
/// Full path of the built-in package.
pub const SYS_PACKAGE_PATH: &str = "appdef/sys";

/// Maximum length of an identifier.
pub const MAX_IDENT_LEN: usize = 255;
/// Maximum number of fields in a structure or view, system fields included.
pub const MAX_TYPE_FIELD_COUNT: usize = 65536;
/// Maximum number of containers in a structure.
pub const MAX_TYPE_CONTAINER_COUNT: usize = 65536;
/// Maximum number of uniques in a structure.
pub const MAX_TYPE_UNIQUE_COUNT: usize = 100;
/// Maximum number of fields in one unique.
pub const MAX_TYPE_UNIQUE_FIELDS_COUNT: usize = 256;
/// Largest value of a `MaxLen` constraint.
pub const MAX_FIELD_LENGTH: u16 = 65535;
/// Length limit applied to string and bytes data without an explicit `MaxLen`.
pub const DEFAULT_FIELD_MAX_LENGTH: u16 = 255;

/// Name of the wildcard type matching any type in filters and function signatures.
pub fn any_qname() -> QName {
	QName::sys("ANY")
}
