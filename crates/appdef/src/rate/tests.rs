use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::{AppDefBuilder, DataKind, ErrorKind, OperationKind::*};

fn q(entity: &str) -> QName {
	QName::new("test", entity)
}

const MINUTE: Duration = Duration::from_secs(60);

/// Rates need a positive count and period and default to the partition scope.
#[test]
fn test_rate_new() {
	let r = Rate::new(10, MINUTE, &[]).unwrap();
	assert_eq!(r.count(), 10);
	assert_eq!(r.period(), MINUTE);
	assert_eq!(r.scopes(), vec![RateScope::AppPartition]);

	let r = Rate::new(1, MINUTE, &[RateScope::User, RateScope::IP]).unwrap();
	assert!(r.scope(RateScope::IP));
	assert!(!r.scope(RateScope::AppPartition));

	assert!(Rate::new(0, MINUTE, &[]).is_err_and(|e| e.is(ErrorKind::OutOfBounds)));
	assert!(Rate::new(1, Duration::ZERO, &[]).is_err_and(|e| e.is(ErrorKind::OutOfBounds)));
}

#[rstest]
#[case(TypeKind::CDoc, true)]
#[case(TypeKind::ORecord, true)]
#[case(TypeKind::Object, true)]
#[case(TypeKind::ViewRecord, true)]
#[case(TypeKind::Command, true)]
#[case(TypeKind::Query, true)]
#[case(TypeKind::Projector, false)]
#[case(TypeKind::Role, false)]
#[case(TypeKind::Data, false)]
fn test_limitable_kinds(#[case] kind: TypeKind, #[case] want: bool) {
	assert_eq!(is_limitable(kind), want);
}

/// Limit shape errors are raised when the limit is declared.
#[test]
fn test_limit_shape_errors() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_role(q("role")).unwrap();
	ws.add_rate(q("rate"), 10, MINUTE, &[], "").unwrap();

	let cases: [(&[OperationKind], Filter, QName, ErrorKind); 5] = [
		(&[], Filter::all_tables(), q("rate"), ErrorKind::Missed),
		(&[Inherits], Filter::all_tables(), q("rate"), ErrorKind::Unsupported),
		(&[Select, Execute], Filter::all_tables(), q("rate"), ErrorKind::Incompatible),
		(&[Select], Filter::all_tables(), QName::NULL, ErrorKind::Missed),
		(&[Select], Filter::qnames([&q("role")]).unwrap(), q("rate"), ErrorKind::Unsupported),
	];
	for (i, (ops, filter, rate, want)) in cases.into_iter().enumerate() {
		let err = ws
			.add_limit(q(&format!("limit{i}")), ops, LimitFilterOption::Each, filter, &rate, "")
			.unwrap_err();
		assert!(err.is(want), "case {i}: {err}");
	}
}

/// Limits resolve their rate and filter at build.
#[test]
fn test_limit_build() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_limit(
		q("selects"),
		&[Select],
		LimitFilterOption::All,
		Filter::all_ws_tables(&q("ws")).unwrap(),
		&q("rate"),
		"per minute",
	)
	.unwrap();
	ws.add_cdoc(q("doc")).unwrap();
	ws.add_view(q("view"))
		.unwrap()
		.add_partition_field("id", DataKind::Int64)
		.unwrap()
		.add_clustering_field("n", DataKind::Int32, [])
		.unwrap();
	ws.add_rate(q("rate"), 100, MINUTE, &[RateScope::Workspace], "").unwrap();

	let app = app.build().unwrap();
	let limit = app.limit(&q("selects")).unwrap();
	assert_eq!(limit.ops(), vec![Select]);
	assert!(limit.op(Select));
	assert_eq!(limit.rate_name(), &q("rate"));
	assert_eq!(limit.rate(crate::FindType::types(&app)).map(Rate::count), Some(100));
	assert_eq!(limit.filter().option(), LimitFilterOption::All);
	assert_eq!(limit.filter().to_string(), "ALL TABLES FROM test.ws");
	assert_eq!(app.limits().map(|(n, _)| n.clone()).collect::<Vec<_>>(), vec![q("selects")]);
	assert_eq!(app.rates().count(), 1);
}

/// A limit whose rate or matches are missing at build fails.
#[test]
fn test_limit_validation() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_limit(
		q("each"),
		&[Execute],
		LimitFilterOption::Each,
		Filter::qnames([&q("cmd")]).unwrap(),
		&q("noRate"),
		"",
	)
	.unwrap();

	let err = app.build().unwrap_err();
	assert_eq!(err.errors().len(), 2, "{err}");
	assert!(err.has_with(ErrorKind::NotFound, "EACH QNAMES(test.cmd)"), "{err}");
	assert!(err.has_with(ErrorKind::NotFound, "rate «test.noRate»"), "{err}");
}
