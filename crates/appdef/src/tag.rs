//! Tags: named labels attached to types and matched by tag filters.

/// Payload of a [`crate::TypeKind::Tag`] type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
	feature: String,
}

impl Tag {
	pub(crate) fn new(feature: &str) -> Self {
		Self {
			feature: feature.to_owned(),
		}
	}

	/// Feature the tag marks. Empty for plain labels.
	pub fn feature(&self) -> &str {
		&self.feature
	}
}
