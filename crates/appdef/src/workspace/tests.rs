use pretty_assertions::assert_eq;

use super::*;
use crate::{AppDefBuilder, ErrorKind, FindType};

fn q(entity: &str) -> QName {
	QName::new("test", entity)
}

fn entities<'a>(types: impl IntoIterator<Item = &'a Type>) -> Vec<&'a str> {
	types
		.into_iter()
		.filter(|t| !t.is_system())
		.map(|t| t.name().entity())
		.collect()
}

/// New workspaces inherit the built-in root and own themselves.
#[test]
fn test_default_ancestor() {
	let mut app = AppDefBuilder::new();
	app.add_workspace(q("ws")).unwrap().add_cdoc(q("doc")).unwrap();
	let app = app.build().unwrap();

	let ws = app.workspace(&q("ws")).unwrap();
	assert_eq!(ws.ancestors().as_slice(), [sys_workspace_name()]);
	assert!(ws.inherits(&sys_workspace_name(), app.types()));
	assert!(!ws.is_abstract());
	assert_eq!(entities(ws.local_types(app.types())), vec!["doc", "ws"]);
	assert_eq!(app.type_of(&q("doc")).workspace(), &q("ws"));

	let sys = app.workspace(&sys_workspace_name()).unwrap();
	assert!(sys.is_abstract());
	assert!(sys.ancestors().is_empty());
	assert!(sys.type_by_name(&QName::sys("int32"), app.types()).is_some());
}

/// Visibility covers local types, ancestors transitively and used workspaces.
#[test]
fn test_visibility() {
	let mut app = AppDefBuilder::new();
	app.add_workspace(q("root")).unwrap().add_gdoc(q("rootDoc")).unwrap();
	let mut mid = app.add_workspace(q("mid")).unwrap();
	mid.set_ancestors(&[q("root")]).unwrap();
	mid.add_gdoc(q("midDoc")).unwrap();
	let mut leaf = app.add_workspace(q("leaf")).unwrap();
	leaf.set_ancestors(&[q("mid")]).unwrap();
	leaf.add_gdoc(q("leafDoc")).unwrap();
	app.add_workspace(q("side")).unwrap().add_gdoc(q("sideDoc")).unwrap();
	app.alter_workspace(&q("leaf"))
		.unwrap()
		.use_workspaces(&[q("side")])
		.unwrap();
	let app = app.build().unwrap();
	let types = app.types();

	let leaf = app.workspace(&q("leaf")).unwrap();
	assert!(leaf.inherits(&q("root"), types));
	assert!(!leaf.inherits(&q("side"), types));
	assert_eq!(leaf.used_workspaces().as_slice(), [q("side")]);
	assert_eq!(
		entities(leaf.types(types)),
		vec!["leaf", "leafDoc", "mid", "midDoc", "root", "rootDoc", "side"]
	);

	assert!(leaf.type_by_name(&q("rootDoc"), types).is_some());
	assert!(leaf.type_by_name(&q("side"), types).is_some());
	assert!(leaf.type_by_name(&q("sideDoc"), types).is_none());

	let root = app.workspace(&q("root")).unwrap();
	assert!(root.type_by_name(&q("leafDoc"), types).is_none());
}

/// Ancestors must exist and must not close a cycle.
#[test]
fn test_ancestor_errors() {
	let mut app = AppDefBuilder::new();
	app.add_workspace(q("a")).unwrap();
	app.add_workspace(q("b")).unwrap().set_ancestors(&[q("a")]).unwrap();

	let mut a = app.alter_workspace(&q("a")).unwrap();
	let err = a.set_ancestors(&[q("b")]).unwrap_err();
	assert!(err.is(ErrorKind::Unsupported), "{err}");
	let err = a.set_ancestors(&[q("a")]).unwrap_err();
	assert!(err.is(ErrorKind::Unsupported), "{err}");
	let err = a.set_ancestors(&[q("missing")]).unwrap_err();
	assert!(err.is(ErrorKind::NotFound), "{err}");
	let err = a.use_workspaces(&[q("missing")]).unwrap_err();
	assert!(err.is(ErrorKind::NotFound), "{err}");

	let err = app.alter_workspace(&sys_workspace_name()).unwrap_err();
	assert!(err.is(ErrorKind::Unsupported), "{err}");
	let err = app.alter_workspace(&q("missing")).unwrap_err();
	assert!(err.is(ErrorKind::NotFound), "{err}");
}

/// The descriptor must be a CDoc, and an abstract one only fits an abstract workspace.
#[test]
fn test_descriptor() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_gdoc(q("gdoc")).unwrap();
	ws.add_cdoc(q("desc")).unwrap().set_abstract().unwrap();

	let err = ws.set_descriptor(&q("gdoc")).unwrap_err();
	assert!(err.is(ErrorKind::Incompatible), "{err}");
	let err = ws.set_descriptor(&q("missing")).unwrap_err();
	assert!(err.is(ErrorKind::NotFound), "{err}");

	ws.set_descriptor(&q("desc")).unwrap();
	assert_eq!(ws.workspace().and_then(Workspace::descriptor_name), Some(&q("desc")));

	let err = app.build().unwrap_err();
	assert!(err.has_with(ErrorKind::Incompatible, "abstract descriptor"), "{err}");
}

/// An abstract workspace accepts an abstract descriptor.
#[test]
fn test_abstract_descriptor() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_cdoc(q("desc")).unwrap().set_abstract().unwrap();
	ws.set_abstract().unwrap().set_descriptor(&q("desc")).unwrap();

	let app = app.build().unwrap();
	let ws = app.workspace(&q("ws")).unwrap();
	assert_eq!(ws.descriptor(app.types()).map(Type::name), Some(&q("desc")));
}
