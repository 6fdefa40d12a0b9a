use pretty_assertions::assert_eq;

use super::*;
use crate::ErrorKind;

/// The built-in package is always registered.
#[test]
fn test_sys_package() {
	let p = Packages::new();
	assert_eq!(p.len(), 1);
	assert_eq!(p.path_by_local(SYS_PACKAGE), Some(SYS_PACKAGE_PATH));
	assert_eq!(p.local_by_path(SYS_PACKAGE_PATH), Some(SYS_PACKAGE));
}

/// Aliases and paths map both ways and must each be unique.
#[test]
fn test_add() {
	let mut p = Packages::new();
	p.add("test", "example.com/test").unwrap();
	p.add("air", "example.com/air").unwrap();

	let cases = [
		("", "example.com/x", ErrorKind::Missed),
		("1x", "example.com/x", ErrorKind::Invalid),
		("x", "", ErrorKind::Missed),
		("test", "example.com/other", ErrorKind::AlreadyExists),
		("other", "example.com/test", ErrorKind::AlreadyExists),
	];
	for (local, path, want) in cases {
		let err = p.add(local, path).unwrap_err();
		assert!(err.is(want), "{local} {path}: {err}");
	}

	assert_eq!(p.locals().collect::<Vec<_>>(), vec!["air", "sys", "test"]);
	assert_eq!(
		p.iter().collect::<Vec<_>>(),
		vec![("air", "example.com/air"), ("sys", "appdef/sys"), ("test", "example.com/test")]
	);
}

/// Names convert between local and full forms; unknown packages give the null name.
#[test]
fn test_name_conversion() {
	let mut p = Packages::new();
	p.add("test", "example.com/test").unwrap();

	let local = QName::new("test", "doc");
	let full = p.full_qname(&local);
	assert_eq!(full, FullQName::new("example.com/test", "doc"));
	assert_eq!(full.to_string(), "example.com/test.doc");
	assert_eq!(p.local_qname(&full), local);

	assert!(p.full_qname(&QName::new("unknown", "doc")).is_null());
	assert!(p.local_qname(&FullQName::new("example.com/unknown", "doc")).is_null());
}
