use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::ErrorKind;

/// Constructors reject values outside their own domain.
#[rstest]
#[case::zero_max_len(max_len(0), ErrorKind::OutOfBounds)]
#[case::bad_pattern(pattern("^(unclosed"), ErrorKind::Invalid)]
#[case::nan_min(min_incl(f64::NAN), ErrorKind::Invalid)]
#[case::inf_min(min_excl(f64::INFINITY), ErrorKind::OutOfBounds)]
#[case::neg_inf_max(max_incl(f64::NEG_INFINITY), ErrorKind::OutOfBounds)]
#[case::nan_max(max_excl(f64::NAN), ErrorKind::Invalid)]
#[case::empty_enum(enumeration(Vec::<i32>::new()), ErrorKind::Missed)]
fn test_constructor_errors(#[case] got: Result<Constraint, Error>, #[case] want: ErrorKind) {
	assert_eq!(got.map_err(|e| e.kind()).err(), Some(want));
}

/// Maximum lengths span the whole field length range.
#[test]
fn test_max_len_range() {
	assert_eq!(max_len(MAX_FIELD_LENGTH).unwrap().len(), Some(MAX_FIELD_LENGTH));
	assert_eq!(max_len(1).unwrap().len(), Some(1));
	let err = max_len(0).unwrap_err();
	assert!(err.to_string().contains(&MAX_FIELD_LENGTH.to_string()), "{err}");
}

/// Opposite infinities are legal bounds.
#[test]
fn test_open_infinite_bounds() {
	assert!(min_incl(f64::NEG_INFINITY).is_ok());
	assert!(max_excl(f64::INFINITY).is_ok());
}

/// Enumerations are sorted and deduplicated.
#[test]
fn test_enum_sorted() {
	let c = enumeration(["c", "a", "b", "a"]).unwrap();
	assert_eq!(
		c.enumeration(),
		Some(&EnumValues::String(vec!["a".into(), "b".into(), "c".into()]))
	);
	assert_eq!(c.to_string(), "Enum: [a b c]");

	let c = enumeration([3.5f64, -1.0, 3.5]).unwrap();
	assert_eq!(c.enumeration(), Some(&EnumValues::Float64(vec![-1.0, 3.5])));
}

/// Enumeration values must match the data kind exactly.
#[test]
fn test_enum_kind_must_match() {
	let c = enumeration([1i32, 2, 3]).unwrap();
	assert!(c.check_data_kind(DataKind::Int32).is_ok());
	let err = c.check_data_kind(DataKind::Int64).unwrap_err();
	assert!(err.is(ErrorKind::Incompatible), "{err}");
	let err = c.check_data_kind(DataKind::String).unwrap_err();
	assert!(err.is(ErrorKind::Incompatible), "{err}");
}

/// Kinds outside the compatibility table are rejected.
#[test]
fn test_incompatible_kind() {
	let err = min_len(1).check_data_kind(DataKind::Int32).unwrap_err();
	assert!(err.is(ErrorKind::Incompatible));
	assert!(err.to_string().contains("MinLen"));
	assert!(pattern(r"^\d+$").unwrap().check_data_kind(DataKind::Bytes).is_ok());
}

/// Long renderings are truncated with an ellipsis.
#[test]
fn test_display_truncated() {
	let values: Vec<String> = (0..40).map(|i| format!("value{i}")).collect();
	let text = enumeration(values).unwrap().to_string();
	assert_eq!(text.chars().count(), MAX_DISPLAY_LEN);
	assert!(text.ends_with('…'));

	assert_eq!(min_len(3).to_string(), "MinLen: 3");
	assert_eq!(pattern(r"^\w+$").unwrap().to_string(), r"Pattern: ^\w+$");
}

/// Comments are carried along.
#[test]
fn test_comment() {
	let c = max_len(100).unwrap().with_comment("short names only");
	assert_eq!(c.comment(), Some("short names only"));
	assert_eq!(c.len(), Some(100));
}
