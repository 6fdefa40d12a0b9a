//! Data constraints and their constructors.
//!
//! Each constructor validates the value against its own domain. Compatibility with a concrete
//! [`DataKind`] is checked when the constraint is attached to a data type.

use std::fmt;

use itertools::Itertools;
use regex::Regex;

use crate::{ConstraintKind, DataKind, Error, MAX_FIELD_LENGTH};

#[cfg(test)]
mod tests;

/// Maximum length of a constraint rendering before it is truncated.
const MAX_DISPLAY_LEN: usize = 64;

/// Enumeration values, typed by the data kind they restrict.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValues {
	String(Vec<String>),
	Int32(Vec<i32>),
	Int64(Vec<i64>),
	Float32(Vec<f32>),
	Float64(Vec<f64>),
}

impl EnumValues {
	/// Returns the only data kind these values can restrict.
	pub const fn data_kind(&self) -> DataKind {
		match self {
			Self::String(_) => DataKind::String,
			Self::Int32(_) => DataKind::Int32,
			Self::Int64(_) => DataKind::Int64,
			Self::Float32(_) => DataKind::Float32,
			Self::Float64(_) => DataKind::Float64,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			Self::String(v) => v.len(),
			Self::Int32(v) => v.len(),
			Self::Int64(v) => v.len(),
			Self::Float32(v) => v.len(),
			Self::Float64(v) => v.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Display for EnumValues {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let joined = match self {
			Self::String(v) => v.iter().join(" "),
			Self::Int32(v) => v.iter().join(" "),
			Self::Int64(v) => v.iter().join(" "),
			Self::Float32(v) => v.iter().join(" "),
			Self::Float64(v) => v.iter().join(" "),
		};
		write!(f, "[{joined}]")
	}
}

/// Value types accepted by [`enumeration`].
pub trait EnumValue: Sized {
	#[doc(hidden)]
	fn into_values(values: Vec<Self>) -> EnumValues;
}

impl EnumValue for String {
	fn into_values(mut values: Vec<Self>) -> EnumValues {
		values.sort();
		values.dedup();
		EnumValues::String(values)
	}
}

impl EnumValue for &str {
	fn into_values(values: Vec<Self>) -> EnumValues {
		String::into_values(values.into_iter().map(str::to_owned).collect())
	}
}

impl EnumValue for i32 {
	fn into_values(mut values: Vec<Self>) -> EnumValues {
		values.sort_unstable();
		values.dedup();
		EnumValues::Int32(values)
	}
}

impl EnumValue for i64 {
	fn into_values(mut values: Vec<Self>) -> EnumValues {
		values.sort_unstable();
		values.dedup();
		EnumValues::Int64(values)
	}
}

impl EnumValue for f32 {
	fn into_values(mut values: Vec<Self>) -> EnumValues {
		values.sort_by(f32::total_cmp);
		values.dedup();
		EnumValues::Float32(values)
	}
}

impl EnumValue for f64 {
	fn into_values(mut values: Vec<Self>) -> EnumValues {
		values.sort_by(f64::total_cmp);
		values.dedup();
		EnumValues::Float64(values)
	}
}

/// Constraint payload.
#[derive(Debug, Clone)]
pub enum ConstraintValue {
	Len(u16),
	Pattern(Regex),
	Bound(f64),
	Enum(EnumValues),
}

impl PartialEq for ConstraintValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Len(a), Self::Len(b)) => a == b,
			(Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
			(Self::Bound(a), Self::Bound(b)) => a == b,
			(Self::Enum(a), Self::Enum(b)) => a == b,
			_ => false,
		}
	}
}

impl fmt::Display for ConstraintValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Len(v) => write!(f, "{v}"),
			Self::Pattern(re) => f.write_str(re.as_str()),
			Self::Bound(v) => write!(f, "{v}"),
			Self::Enum(v) => write!(f, "{v}"),
		}
	}
}

/// A named restriction on data values.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
	kind: ConstraintKind,
	value: ConstraintValue,
	comment: Option<String>,
}

impl Constraint {
	fn new(kind: ConstraintKind, value: ConstraintValue) -> Self {
		Self {
			kind,
			value,
			comment: None,
		}
	}

	pub fn kind(&self) -> ConstraintKind {
		self.kind
	}

	pub fn value(&self) -> &ConstraintValue {
		&self.value
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = Some(comment.into());
		self
	}

	/// Returns the length limit of `MinLen` and `MaxLen` constraints.
	pub fn len(&self) -> Option<u16> {
		match self.value {
			ConstraintValue::Len(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the bound of numeric bound constraints.
	pub fn bound(&self) -> Option<f64> {
		match self.value {
			ConstraintValue::Bound(v) => Some(v),
			_ => None,
		}
	}

	pub fn pattern(&self) -> Option<&Regex> {
		match &self.value {
			ConstraintValue::Pattern(re) => Some(re),
			_ => None,
		}
	}

	pub fn enumeration(&self) -> Option<&EnumValues> {
		match &self.value {
			ConstraintValue::Enum(v) => Some(v),
			_ => None,
		}
	}

	/// Checks that this constraint may restrict values of `data`.
	pub fn check_data_kind(&self, data: DataKind) -> Result<(), Error> {
		if !data.supports_constraint(self.kind) {
			return Err(Error::Incompatible(format!(
				"constraint «{self}» is not compatible with {}",
				data.trim_string()
			)));
		}
		if let ConstraintValue::Enum(values) = &self.value
			&& values.data_kind() != data
		{
			return Err(Error::Incompatible(format!(
				"enumeration of {} values is not compatible with {}",
				values.data_kind().trim_string(),
				data.trim_string()
			)));
		}
		Ok(())
	}
}

impl fmt::Display for Constraint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = format!("{}: {}", self.kind.trim_string(), self.value);
		if text.chars().count() > MAX_DISPLAY_LEN {
			let cut: String = text.chars().take(MAX_DISPLAY_LEN - 1).collect();
			write!(f, "{cut}…")
		} else {
			f.write_str(&text)
		}
	}
}

/// Minimum length of string or bytes values.
pub fn min_len(len: u16) -> Constraint {
	Constraint::new(ConstraintKind::MinLen, ConstraintValue::Len(len))
}

/// Maximum length of string or bytes values, in `1..=MAX_FIELD_LENGTH`.
pub fn max_len(len: u16) -> Result<Constraint, Error> {
	if !(1..=MAX_FIELD_LENGTH).contains(&len) {
		return Err(Error::OutOfBounds(format!("maximum length {len}, must be in 1..={MAX_FIELD_LENGTH}")));
	}
	Ok(Constraint::new(ConstraintKind::MaxLen, ConstraintValue::Len(len)))
}

/// Regular expression that string or bytes values must match.
pub fn pattern(expr: &str) -> Result<Constraint, Error> {
	let re = Regex::new(expr).map_err(|err| Error::Invalid(format!("pattern «{expr}»: {err}")))?;
	Ok(Constraint::new(ConstraintKind::Pattern, ConstraintValue::Pattern(re)))
}

fn bound(kind: ConstraintKind, value: f64, forbidden_inf: f64) -> Result<Constraint, Error> {
	if value.is_nan() {
		return Err(Error::Invalid(format!("{} value is NaN", kind.trim_string())));
	}
	if value == forbidden_inf {
		return Err(Error::OutOfBounds(format!("{} value is {value}", kind.trim_string())));
	}
	Ok(Constraint::new(kind, ConstraintValue::Bound(value)))
}

/// Inclusive lower bound. NaN is invalid, `+inf` is out of bounds.
pub fn min_incl(value: f64) -> Result<Constraint, Error> {
	bound(ConstraintKind::MinIncl, value, f64::INFINITY)
}

/// Exclusive lower bound. NaN is invalid, `+inf` is out of bounds.
pub fn min_excl(value: f64) -> Result<Constraint, Error> {
	bound(ConstraintKind::MinExcl, value, f64::INFINITY)
}

/// Inclusive upper bound. NaN is invalid, `-inf` is out of bounds.
pub fn max_incl(value: f64) -> Result<Constraint, Error> {
	bound(ConstraintKind::MaxIncl, value, f64::NEG_INFINITY)
}

/// Exclusive upper bound. NaN is invalid, `-inf` is out of bounds.
pub fn max_excl(value: f64) -> Result<Constraint, Error> {
	bound(ConstraintKind::MaxExcl, value, f64::NEG_INFINITY)
}

/// Closed set of allowed values, stored sorted and without duplicates.
pub fn enumeration<T: EnumValue>(values: impl IntoIterator<Item = T>) -> Result<Constraint, Error> {
	let values = T::into_values(values.into_iter().collect());
	if values.is_empty() {
		return Err(Error::Missed("enumeration values".into()));
	}
	Ok(Constraint::new(ConstraintKind::Enum, ConstraintValue::Enum(values)))
}
