use pretty_assertions::assert_eq;

use crate::constraints::max_len;
use crate::structure::props::SYS_FIELD_QNAME;
use crate::{AppDefBuilder, DataKind, ErrorKind, Field, FindType, QName};

fn q(entity: &str) -> QName {
	QName::new("test", entity)
}

/// Variable-length kinds can not be partition key fields.
#[test]
fn test_part_key_fixed_only() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	let mut view = ws.add_view(q("view")).unwrap();

	view.add_partition_field("year", DataKind::Int32).unwrap();
	for kind in [DataKind::String, DataKind::Bytes] {
		let err = view.add_partition_field("text", kind).unwrap_err();
		assert!(err.is(ErrorKind::Unsupported), "{err}");
	}
	assert_eq!(view.as_type().as_view().unwrap().part_key_count(), 1);
}

/// Key shape rules hold the same for fields of named data types.
#[test]
fn test_key_shape_with_data_fields() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_data(q("text"), DataKind::String, &QName::NULL, []).unwrap();
	ws.add_data(q("id"), DataKind::Int64, &QName::NULL, []).unwrap();
	let mut view = ws.add_view(q("view")).unwrap();

	let err = view.add_partition_data_field("p", &q("text")).unwrap_err();
	assert!(err.is(ErrorKind::Unsupported), "{err}");
	view.add_partition_data_field("p", &q("id"))
		.unwrap()
		.add_clustering_data_field("c1", &q("text"), [])
		.unwrap();
	for (name, data) in [("c2", q("text")), ("c3", q("id"))] {
		let err = view.add_clustering_data_field(name, &data, []).unwrap_err();
		assert!(err.is(ErrorKind::Unsupported), "{name}: {err}");
	}

	let app = app.build().unwrap();
	let v = app.view(&q("view")).unwrap();
	let key: Vec<_> = v.key().map(|f| f.name().to_owned()).collect();
	assert_eq!(key, ["p", "c1"]);
	let c1 = v.fields().field("c1").unwrap();
	assert_eq!(c1.data_kind(), DataKind::String);
	assert_eq!(c1.max_len(app.types()), Some(crate::DEFAULT_FIELD_MAX_LENGTH));
	assert_eq!(v.fields().field("p").unwrap().max_len(app.types()), None);
}

/// Key, clustering and value fields share one namespace, and key fields have fixed
/// requiredness.
#[test]
fn test_view_layout() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_view(q("view"))
		.unwrap()
		.add_partition_field("year", DataKind::Int32)
		.unwrap()
		.add_clustering_field("month", DataKind::Int32, [])
		.unwrap()
		.add_clustering_field("name", DataKind::String, [max_len(20).unwrap()])
		.unwrap()
		.add_value_field("total", DataKind::Float64, true, [])
		.unwrap()
		.add_value_ref_field("doc", false, &[])
		.unwrap()
		.set_field_comment("total", "sum of all lines")
		.unwrap();

	let app = app.build().unwrap();
	let v = app.view(&q("view")).unwrap();
	let names = |it: &mut dyn Iterator<Item = &Field>| it.map(|f| f.name().to_owned()).collect::<Vec<_>>();
	assert_eq!(names(&mut v.part_key()), vec!["year"]);
	assert_eq!(names(&mut v.clust_cols()), vec!["month", "name"]);
	assert_eq!(names(&mut v.key()), vec!["year", "month", "name"]);
	assert_eq!(names(&mut v.value()), vec![SYS_FIELD_QNAME, "total", "doc"]);
	assert_eq!(v.fields().count(), 6);

	assert!(v.fields().field("year").unwrap().required());
	assert!(!v.fields().field("month").unwrap().required());
	assert_eq!(v.fields().field("total").unwrap().comment(), Some("sum of all lines"));
}

/// A field name is taken once across key and value.
#[test]
fn test_view_field_names_shared() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	let mut view = ws.add_view(q("view")).unwrap();
	view.add_partition_field("id", DataKind::Int64).unwrap();

	let err = view.add_value_field("id", DataKind::Int64, false, []).unwrap_err();
	assert!(err.is(ErrorKind::AlreadyExists), "{err}");
	let err = view.add_clustering_field("id", DataKind::Int64, []).unwrap_err();
	assert!(err.is(ErrorKind::AlreadyExists), "{err}");
}

/// A view without partition key or clustering columns fails the build.
#[test]
fn test_view_requires_key() {
	let mut app = AppDefBuilder::new();
	let mut ws = app.add_workspace(q("ws")).unwrap();
	ws.add_view(q("empty")).unwrap();
	ws.add_view(q("partial"))
		.unwrap()
		.add_partition_field("id", DataKind::Int64)
		.unwrap();

	let err = app.build().unwrap_err();
	assert_eq!(err.errors().len(), 3, "{err}");
	assert!(err.has_with(ErrorKind::Missed, "«test.empty» partition key"), "{err}");
	assert!(err.has_with(ErrorKind::Missed, "«test.empty» clustering columns"), "{err}");
	assert!(err.has_with(ErrorKind::Missed, "«test.partial» clustering columns"), "{err}");
}

/// The built-in views are complete.
#[test]
fn test_sys_views() {
	let app = AppDefBuilder::new().build().unwrap();
	let v = app.view(&QName::sys("projectionOffsets")).unwrap();
	assert_eq!(v.part_key_count(), 1);
	assert_eq!(v.clust_cols_count(), 1);
	assert!(v.fields().contains("offset"));
	assert!(app.view(&QName::sys("NextBaseWSID")).is_some());
}
