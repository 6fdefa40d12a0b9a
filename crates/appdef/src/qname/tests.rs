use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::ErrorKind;

/// Names order by package first, then by entity.
#[test]
fn test_qname_ordering() {
	let mut names = vec![
		QName::new("test", "b"),
		QName::new("sys", "z"),
		QName::new("test", "a"),
		QName::NULL,
	];
	names.sort();
	assert_eq!(
		names,
		vec![QName::NULL, QName::new("sys", "z"), QName::new("test", "a"), QName::new("test", "b")]
	);
}

/// Parsing requires exactly one qualifier.
#[rstest]
#[case("test.doc", Some(("test", "doc")))]
#[case(".", Some(("", "")))]
#[case("test", None)]
#[case("a.b.c", None)]
#[case("", None)]
fn test_qname_parse(#[case] input: &str, #[case] want: Option<(&str, &str)>) {
	match (QName::parse(input), want) {
		(Ok(q), Some((pkg, entity))) => {
			assert_eq!(q.pkg(), pkg);
			assert_eq!(q.entity(), entity);
		}
		(Err(err), None) => assert!(err.is(ErrorKind::Convert), "{err}"),
		(got, want) => panic!("parse({input:?}) = {got:?}, want {want:?}"),
	}
}

/// The null name renders as a bare qualifier and parses back.
#[test]
fn test_null_qname_text() {
	assert_eq!(QName::NULL.to_string(), ".");
	assert!(QName::parse(".").is_ok_and(|q| q.is_null()));
}

/// Identifier validation covers missing, invalid and overlong values.
#[rstest]
#[case("doc", None)]
#[case("_doc1", None)]
#[case("doc$uniques$01", None)]
#[case("", Some(ErrorKind::Missed))]
#[case("1doc", Some(ErrorKind::Invalid))]
#[case("my-doc", Some(ErrorKind::Invalid))]
#[case("🔫", Some(ErrorKind::Invalid))]
fn test_valid_ident(#[case] ident: &str, #[case] want: Option<ErrorKind>) {
	assert_eq!(valid_ident(ident).err().map(|e| e.kind()), want);
}

/// Identifiers longer than the limit are rejected.
#[test]
fn test_valid_ident_too_long() {
	let ident = "a".repeat(MAX_IDENT_LEN + 1);
	assert!(valid_ident(&ident).is_err_and(|e| e.is(ErrorKind::TooMany)));
	assert!(valid_ident(&ident[..MAX_IDENT_LEN]).is_ok());
}

/// Invalid names report the whole name.
#[test]
fn test_valid_qname() {
	assert!(valid_qname(&QName::NULL).is_ok());
	assert!(valid_qname(&QName::new("test", "doc")).is_ok());
	let err = valid_qname(&QName::new("naked", "🔫")).unwrap_err();
	assert!(err.is(ErrorKind::Invalid));
	assert!(err.to_string().contains("naked.🔫"));
}

/// Sets stay sorted and duplicate-free regardless of insertion order.
#[test]
fn test_qnames_set() {
	let a = QName::new("test", "a");
	let b = QName::new("test", "b");
	let c = QName::new("test", "c");

	let mut names: QNames = [c.clone(), a.clone(), c.clone()].into_iter().collect();
	assert_eq!(names.as_slice(), &[a.clone(), c.clone()]);

	assert!(names.add(b.clone()));
	assert!(!names.add(b.clone()));
	assert_eq!(names.as_slice(), &[a.clone(), b.clone(), c.clone()]);
	assert_eq!(names.find(&b), Some(1));
	assert!(names.contains(&c));
	assert!(!names.contains(&QName::new("test", "d")));
	assert_eq!(names.to_string(), "test.a, test.b, test.c");
}

/// Full names split on the last qualifier so paths may contain dots.
#[test]
fn test_full_qname_parse() {
	let fqn = FullQName::parse("example.com/test.doc").unwrap();
	assert_eq!(fqn.pkg_path(), "example.com/test");
	assert_eq!(fqn.entity(), "doc");
	assert_eq!(fqn.to_string(), "example.com/test.doc");

	assert!(FullQName::parse(".").is_ok_and(|f| f.is_null()));
	assert!(FullQName::parse("nodot").is_err_and(|e| e.is(ErrorKind::Convert)));
}

/// Unique names are derived from the owning document.
#[test]
fn test_unique_qname() {
	let doc = QName::new("test", "doc");
	assert_eq!(unique_qname(&doc, "EMail"), QName::new("test", "doc$uniques$EMail"));
}

proptest! {
	/// Any constructed name with valid identifiers survives a text round trip.
	#[test]
	fn prop_qname_round_trip(pkg in "[a-zA-Z_][a-zA-Z0-9_]{0,16}", entity in "[a-zA-Z_][a-zA-Z0-9_$]{0,16}") {
		let q = QName::new(pkg, entity);
		prop_assert!(valid_qname(&q).is_ok());
		prop_assert_eq!(QName::parse(&q.to_string()).unwrap(), q);
	}
}
