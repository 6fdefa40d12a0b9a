use proptest::prelude::*;
use strum::IntoEnumIterator;

use crate::{
	AppDefBuilder, DataKind, ErrorKind, Filter, FindType, Occurs, OperationKind, OperationSet, PolicyKind, QName,
	TypeKind, WorkspaceBuilder, check_operations,
};

fn q(entity: &str) -> QName {
	QName::new("test", entity)
}

fn inherit(ws: &mut WorkspaceBuilder<'_>, role: &str, parent: &str) {
	ws.grant(&[OperationKind::Inherits], Filter::qnames([&q(parent)]).unwrap(), &[], &q(role), "")
		.unwrap();
}

/// Must keep type names unique across every workspace and kind.
///
/// * Enforced in: `Types::insert`
/// * Failure symptom: Lookups by name return a different type than the one declared.
#[cfg_attr(test, test)]
pub(crate) fn test_type_names_unique() {
	let mut app = AppDefBuilder::new();
	app.add_workspace(q("ws1")).unwrap().add_cdoc(q("doc")).unwrap();
	let mut ws2 = app.add_workspace(q("ws2")).unwrap();
	let err = ws2.add_command(q("doc")).unwrap_err();
	assert!(err.is(ErrorKind::AlreadyExists), "{err}");
	let err = ws2.add_gdoc(q("ws1")).unwrap_err();
	assert!(err.is(ErrorKind::AlreadyExists), "{err}");

	let app = app.build().unwrap();
	assert_eq!(app.type_of(&q("doc")).kind(), TypeKind::CDoc);
	let mut names: Vec<_> = app.iter().map(|t| t.name().clone()).collect();
	let total = names.len();
	names.dedup();
	assert_eq!(names.len(), total);
}

/// Must enumerate types in ascending name order regardless of declaration order.
///
/// * Enforced in: `Types::insert`
/// * Failure symptom: Enumeration order depends on the order of builder calls.
#[cfg_attr(test, test)]
pub(crate) fn test_types_sorted() {
	proptest!(|(entities in proptest::collection::vec("[a-z][a-z0-9]{0,6}", 1..24))| {
		let mut app = AppDefBuilder::new();
		let mut ws = app.add_workspace(QName::new("zz", "ws")).unwrap();
		for e in &entities {
			// Repeated names fail and leave the registry untouched.
			let _ = ws.add_gdoc(q(e));
		}
		prop_assert!(app.types.is_consistent());

		let names: Vec<_> = app.types.iter().map(|t| t.name().clone()).collect();
		prop_assert!(names.windows(2).all(|w| w[0] < w[1]));
		for e in &entities {
			prop_assert_eq!(app.type_of(&q(e)).kind(), TypeKind::GDoc);
		}
	});
}

/// Must allow a variable-length clustering column only as the last one.
///
/// * Enforced in: `View::add_clust_col`
/// * Failure symptom: Clustering key bytes are not order-preserving.
#[cfg_attr(test, test)]
pub(crate) fn test_clust_cols_single_trailing_variable() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	let mut view = ws.add_view(q("view")).unwrap();
	view.add_partition_field("id", DataKind::Int64)
		.unwrap()
		.add_clustering_field("day", DataKind::Int32, [])
		.unwrap()
		.add_clustering_field("name", DataKind::String, [])
		.unwrap();

	for (name, kind) in [("after", DataKind::Int32), ("more", DataKind::Bytes)] {
		let err = view.add_clustering_field(name, kind, []).unwrap_err();
		assert!(err.is(ErrorKind::Unsupported), "{name}: {err}");
	}
	let err = view.add_clustering_data_field("named", &crate::sys_data_name(DataKind::String), []).unwrap_err();
	assert!(err.is(ErrorKind::Unsupported), "{err}");

	let app = app.build().unwrap();
	let cols: Vec<_> = app.view(&q("view")).unwrap().clust_cols().map(|f| f.name().to_owned()).collect();
	assert_eq!(cols, ["day", "name"]);
}

/// Must accept an operation list exactly when its operations may share one rule.
///
/// * Enforced in: `check_operations`
/// * Failure symptom: A rule mixes record access with execution or inheritance.
#[cfg_attr(test, test)]
pub(crate) fn test_acl_operation_self_compatibility() {
	let ops: Vec<OperationKind> = OperationKind::iter().filter(|op| *op != OperationKind::Null).collect();
	proptest!(|(mask in 1u16..(1 << ops.len()))| {
		let picked: Vec<OperationKind> =
			ops.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, op)| *op).collect();
		let set: OperationSet = picked.iter().collect();

		match check_operations(PolicyKind::Allow, &picked, false) {
			Ok(checked) => {
				prop_assert_eq!(checked, set);
				prop_assert!(!set.has(OperationKind::ExecuteWithParam));
				prop_assert!(OperationSet::RECORDS.contains(set) || picked.len() == 1);
			}
			Err(err) if set.has(OperationKind::ExecuteWithParam) => {
				prop_assert!(err.is(ErrorKind::Unsupported), "{}", err);
			}
			Err(err) => {
				prop_assert!(err.is(ErrorKind::Incompatible), "{}", err);
				prop_assert!(!set.is_compatible());
			}
		}
	});
}

/// Must reject every role that inherits itself, however long the chain.
///
/// * Enforced in: `validate_role_cycles`
/// * Failure symptom: Walking role ancestors never terminates.
#[cfg_attr(test, test)]
pub(crate) fn test_role_inheritance_acyclic() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	for role in ["a", "b", "c", "free"] {
		ws.add_role(q(role)).unwrap();
	}
	inherit(&mut ws, "a", "b");
	inherit(&mut ws, "b", "c");
	inherit(&mut ws, "c", "a");
	inherit(&mut ws, "free", "a");

	let err = app.build().unwrap_err();
	assert_eq!(err.errors().len(), 3, "{err}");
	for role in ["a", "b", "c"] {
		assert!(err.has_with(ErrorKind::Unsupported, &format!("circular inheritance of Role «test.{role}»")), "{err}");
	}

	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	for role in ["top", "left", "right", "bottom"] {
		ws.add_role(q(role)).unwrap();
	}
	inherit(&mut ws, "left", "top");
	inherit(&mut ws, "right", "top");
	inherit(&mut ws, "bottom", "left");
	inherit(&mut ws, "bottom", "right");
	let app = app.build().unwrap();
	assert_eq!(app.role(&q("bottom")).unwrap().ancestors().len(), 2);
}

/// Must own every type by exactly one declared workspace.
///
/// * Enforced in: `AppDefBuilder::add_type`
/// * Failure symptom: Workspace enumeration misses types or filters scope wrongly.
#[cfg_attr(test, test)]
pub(crate) fn test_every_type_has_workspace() {
	let mut app = AppDefBuilder::new();
	let mut base = app.add_workspace(q("base")).unwrap();
	base.add_cdoc(q("doc")).unwrap();
	base.add_role(q("role")).unwrap();
	let mut child = app.add_workspace(q("child")).unwrap();
	child.set_ancestors(&[q("base")]).unwrap();
	child.add_command(q("cmd")).unwrap();
	child.add_data(q("num"), DataKind::Int32, &QName::NULL, []).unwrap();
	app.alter_workspace(&q("base")).unwrap().add_object(q("obj")).unwrap();

	let app = app.build().unwrap();
	for t in app.iter() {
		let owner = app.workspace(t.workspace());
		assert!(owner.is_some_and(|ws| ws.local_type_names().contains(t.name())), "{t}");

		let owners = app
			.types_of_kind(TypeKind::Workspace.as_set())
			.filter_map(|w| w.as_workspace())
			.filter(|ws| ws.local_type_names().contains(t.name()))
			.count();
		assert_eq!(owners, 1, "{t}");
	}
	assert_eq!(app.type_of(&q("obj")).workspace(), &q("base"));
	assert_eq!(app.type_of(&q("cmd")).workspace(), &q("child"));
}

/// Must report every independent build error together.
///
/// * Enforced in: `AppDefBuilder::build`
/// * Failure symptom: Fixing one error only reveals the next one on rebuild.
#[cfg_attr(test, test)]
pub(crate) fn test_build_errors_are_joined() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_role(q("reader")).unwrap();
	ws.add_view(q("view")).unwrap();
	ws.add_job(q("job")).unwrap();
	ws.add_gdoc(q("doc"))
		.unwrap()
		.add_container("items", &q("item"), Occurs(0), Occurs(1))
		.unwrap();
	ws.grant(&[OperationKind::Select], Filter::qnames([&q("later")]).unwrap(), &[], &q("reader"), "")
		.unwrap();

	let err = app.build().unwrap_err();
	assert_eq!(err.errors().len(), 5, "{err}");
	assert_eq!(err.to_string().lines().count(), 5);
	assert!(err.has_with(ErrorKind::Missed, "partition key"), "{err}");
	assert!(err.has_with(ErrorKind::Missed, "clustering columns"), "{err}");
	assert!(err.has_with(ErrorKind::Missed, "cron"), "{err}");
	assert!(err.has_with(ErrorKind::NotFound, "test.item"), "{err}");
	assert!(err.has_with(ErrorKind::NotFound, "QNAMES(test.later)"), "{err}");
}
