use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::{AppDefBuilder, ErrorKind};

fn q(entity: &str) -> QName {
	QName::new("test", entity)
}

/// `base` owns `doc` and `cmd` with tag `hot`; `child` inherits `base` and owns `rec`;
/// `other` owns `odoc`.
fn fixture() -> AppDefBuilder {
	let mut app = AppDefBuilder::new();
	let mut base = app.add_workspace(q("base")).unwrap();
	base.add_tag(q("hot"), "").unwrap();
	base.add_cdoc(q("doc")).unwrap().set_tag(&[q("hot")]).unwrap();
	base.add_command(q("cmd")).unwrap();
	base.add_role(q("reader")).unwrap();

	let mut child = app.add_workspace(q("child")).unwrap();
	child.set_ancestors(&[q("base")]).unwrap();
	child.add_crecord(q("rec")).unwrap();

	app.add_workspace(q("other")).unwrap().add_odoc(q("odoc")).unwrap();
	app
}

fn names(filter: &Filter, types: &Types) -> Vec<String> {
	filter_matches(filter, types.iter(), types)
		.into_iter()
		.map(|t| t.name().entity().to_owned())
		.collect()
}

/// Constructors reject empty inputs.
#[test]
fn test_constructor_errors() {
	let empty: [&QName; 0] = [];
	assert!(Filter::qnames(empty).is_err_and(|e| e.is(ErrorKind::Missed)));
	assert!(Filter::tags(empty).is_err_and(|e| e.is(ErrorKind::Missed)));
	assert!(Filter::ws_types(&QName::NULL, [TypeKind::CDoc]).is_err_and(|e| e.is(ErrorKind::Missed)));
	assert!(Filter::and([Filter::truth()]).is_err_and(|e| e.is(ErrorKind::Missed)));
	assert!(Filter::or(Vec::new()).is_err_and(|e| e.is(ErrorKind::Missed)));
}

/// Leaf filters over the whole application.
#[test]
fn test_leaf_matches() {
	let app = fixture();
	let types = &app.types;

	assert_eq!(names(&Filter::qnames([&q("doc"), &q("rec")]).unwrap(), types), vec!["doc", "rec"]);
	assert_eq!(names(&Filter::tags([&q("hot")]).unwrap(), types), vec!["doc"]);
	assert_eq!(names(&Filter::types([TypeKind::Command]), types), vec!["cmd"]);
	assert_eq!(names(&Filter::all_tables(), types), vec!["doc", "odoc", "rec"]);
	assert_eq!(names(&Filter::all_functions(), types), vec!["cmd"]);
	assert_eq!(Filter::truth().kind(), FilterKind::True);
	assert!(filter_matches(&Filter::truth(), types.iter(), types).len() == types.len());
}

/// Type filters never match built-in types.
#[test]
fn test_types_skip_system() {
	let app = fixture();
	let types = &app.types;
	let views = Filter::types([TypeKind::ViewRecord]);
	assert!(names(&views, types).is_empty());
	let ws = Filter::types([TypeKind::Workspace]);
	assert_eq!(names(&ws, types), vec!["base", "child", "other"]);
}

/// Workspace-scoped filters see ancestors but not siblings.
#[test]
fn test_workspace_scope() {
	let app = fixture();
	let types = &app.types;

	let child = Filter::all_ws_tables(&q("child")).unwrap();
	assert_eq!(child.workspace(), Some(&q("child")));
	assert_eq!(names(&child, types), vec!["doc", "rec"]);

	let base = Filter::all_ws_tables(&q("base")).unwrap();
	assert_eq!(names(&base, types), vec!["doc"]);

	let funcs = Filter::all_ws_functions(&q("other")).unwrap();
	assert!(names(&funcs, types).is_empty());
}

/// Combinators evaluate their children.
#[test]
fn test_combinators() {
	let app = fixture();
	let types = &app.types;

	let tables_not_hot = Filter::and([Filter::all_tables(), Filter::not(Filter::tags([&q("hot")]).unwrap())]).unwrap();
	assert_eq!(names(&tables_not_hot, types), vec!["odoc", "rec"]);
	assert_eq!(tables_not_hot.children().len(), 2);

	let either = Filter::or([Filter::qnames([&q("cmd")]).unwrap(), Filter::types([TypeKind::Role])]).unwrap();
	assert_eq!(names(&either, types), vec!["cmd", "reader"]);

	let first = first_filter_match(&Filter::all_tables(), types.iter(), types).map(|t| t.name().clone());
	assert_eq!(first, Some(q("doc")));
}

/// A filter declared before its targets matches them once they exist.
#[test]
fn test_late_binding() {
	let mut app = AppDefBuilder::new();
	let filter = Filter::qnames([&q("late")]).unwrap();
	assert!(names(&filter, &app.types).is_empty());

	app.add_workspace(q("ws")).unwrap().add_gdoc(q("late")).unwrap();
	assert_eq!(names(&filter, &app.types), vec!["late"]);
}

#[rstest]
#[case(Filter::truth(), "TRUE")]
#[case(Filter::qnames([&q("b"), &q("a")]).unwrap(), "QNAMES(test.a, test.b)")]
#[case(Filter::tags([&q("hot")]).unwrap(), "TAGS(test.hot)")]
#[case(Filter::types([TypeKind::Command, TypeKind::CDoc]), "TYPES(CDoc, Command)")]
#[case(Filter::all_tables(), "ALL TABLES")]
#[case(Filter::all_ws_functions(&q("ws")).unwrap(), "ALL FUNCTIONS FROM test.ws")]
#[case(Filter::not(Filter::all_tables()), "NOT (ALL TABLES)")]
#[case(
	Filter::and([Filter::all_tables(), Filter::tags([&q("hot")]).unwrap()]).unwrap(),
	"(ALL TABLES) AND (TAGS(test.hot))"
)]
fn test_display(#[case] filter: Filter, #[case] want: &str) {
	assert_eq!(filter.to_string(), want);
}
