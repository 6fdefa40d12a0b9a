use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;

/// Enum text carries the prefix, trimmed text never does.
#[test]
fn test_kind_text() {
	assert_eq!(TypeKind::CDoc.to_string(), "TypeKind_CDoc");
	assert_eq!(TypeKind::Null.to_string(), "TypeKind_null");
	assert_eq!(DataKind::RecordID.trim_string(), "RecordID");
	assert_eq!(DataKind::Int32.to_string(), "DataKind_int32");
	assert_eq!(OperationKind::Select.trim_string(), "Select");
	assert_eq!(LimitFilterOption::Each.trim_string(), "EACH");
	assert_eq!(PolicyKind::Deny.action_string(), "REVOKE");

	for k in TypeKind::all() {
		assert!(!k.trim_string().contains("TypeKind"), "{k}");
	}
	for k in OperationKind::all() {
		assert!(!k.trim_string().contains("OperationKind"), "{k}");
	}
}

/// Fixed-width data kinds.
#[rstest]
#[case(DataKind::Int32, true)]
#[case(DataKind::Int64, true)]
#[case(DataKind::Float32, true)]
#[case(DataKind::Float64, true)]
#[case(DataKind::QName, true)]
#[case(DataKind::Bool, true)]
#[case(DataKind::RecordID, true)]
#[case(DataKind::String, false)]
#[case(DataKind::Bytes, false)]
#[case(DataKind::Record, false)]
fn test_data_kind_fixed(#[case] kind: DataKind, #[case] fixed: bool) {
	assert_eq!(kind.is_fixed(), fixed);
}

/// Constraint compatibility table.
#[rstest]
#[case(DataKind::String, ConstraintKind::Enum, true)]
#[case(DataKind::String, ConstraintKind::MinIncl, false)]
#[case(DataKind::Bytes, ConstraintKind::Pattern, true)]
#[case(DataKind::Bytes, ConstraintKind::Enum, false)]
#[case(DataKind::Int64, ConstraintKind::MaxExcl, true)]
#[case(DataKind::Float32, ConstraintKind::MaxLen, false)]
#[case(DataKind::Bool, ConstraintKind::Enum, false)]
#[case(DataKind::RecordID, ConstraintKind::MinIncl, false)]
fn test_data_kind_constraints(#[case] dk: DataKind, #[case] ck: ConstraintKind, #[case] ok: bool) {
	assert_eq!(dk.supports_constraint(ck), ok);
}

/// Sets iterate in declaration order and render trimmed names.
#[test]
fn test_set_order_and_text() {
	let ops: OperationSet = [OperationKind::Select, OperationKind::Insert].into_iter().collect();
	assert_eq!(ops.to_vec(), vec![OperationKind::Insert, OperationKind::Select]);
	assert_eq!(ops.to_string(), "[Insert Select]");

	assert_eq!(TypeKindSet::FUNCTIONS.to_vec(), vec![TypeKind::Query, TypeKind::Command]);
	assert!(TypeKindSet::LIMITABLES.has(TypeKind::ViewRecord));
	assert!(!TypeKindSet::LIMITABLES.has(TypeKind::Role));
}

/// Records operations combine; execute and inherits stand alone.
#[rstest]
#[case(&[OperationKind::Insert, OperationKind::Update, OperationKind::Activate], true)]
#[case(&[OperationKind::Select], true)]
#[case(&[OperationKind::Execute], true)]
#[case(&[OperationKind::Inherits], true)]
#[case(&[OperationKind::Select, OperationKind::Execute], false)]
#[case(&[OperationKind::Inherits, OperationKind::Insert], false)]
#[case(&[OperationKind::Execute, OperationKind::ExecuteWithParam], false)]
fn test_operation_compatibility(#[case] ops: &[OperationKind], #[case] ok: bool) {
	assert_eq!(ops.iter().collect::<OperationSet>().is_compatible(), ok);
}

/// Unbounded occurrence renders as text.
#[test]
fn test_occurs_text() {
	assert_eq!(Occurs(3).to_string(), "3");
	assert_eq!(Occurs::UNBOUNDED.to_string(), "unbounded");
}

fn records_op() -> impl Strategy<Value = OperationKind> {
	prop::sample::select(OperationSet::RECORDS.to_vec())
}

fn other_op() -> impl Strategy<Value = OperationKind> {
	prop::sample::select(vec![OperationKind::Execute, OperationKind::ExecuteWithParam, OperationKind::Inherits])
}

proptest! {
	/// Any subset of records operations is compatible.
	#[test]
	fn prop_records_subsets_compatible(ops in prop::collection::vec(records_op(), 1..6)) {
		prop_assert!(ops.iter().collect::<OperationSet>().is_compatible());
	}

	/// Adding any non-records operation to a non-empty records set breaks compatibility.
	#[test]
	fn prop_mixed_sets_incompatible(ops in prop::collection::vec(records_op(), 1..6), other in other_op()) {
		let mut set: OperationSet = ops.iter().collect();
		set |= other.as_set();
		prop_assert!(!set.is_compatible());
	}
}
