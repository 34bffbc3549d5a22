use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use derive_more::Deref;

use crate::Item;

/// Name of the gap created by [`Jig::new`](crate::Jig::new) and targeted by
/// [`Jig::plug_default`](crate::Jig::plug_default).
pub const DEFAULT_GAP_NAME: &str = "___";

/// The function type of a gap transform. It receives the replacement items
/// and returns the items that are actually spliced into the gap.
pub type TransformFn = dyn Fn(Vec<Item>) -> Vec<Item> + Send + Sync;

/// The name of a gap. Names are cheap to clone and compare and are not
/// required to be unique within a jig.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref)]
pub struct GapName(Arc<str>);

impl GapName {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for GapName {
	fn default() -> Self {
		Self::from(DEFAULT_GAP_NAME)
	}
}

impl From<&str> for GapName {
	fn from(name: &str) -> Self {
		Self(Arc::from(name))
	}
}

impl From<String> for GapName {
	fn from(name: String) -> Self {
		Self(Arc::from(name))
	}
}

impl From<&String> for GapName {
	fn from(name: &String) -> Self {
		Self::from(name.as_str())
	}
}

impl From<&GapName> for GapName {
	fn from(name: &GapName) -> Self {
		name.clone()
	}
}

impl Borrow<str> for GapName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for GapName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for GapName {
	fn eq(&self, other: &str) -> bool {
		&*self.0 == other
	}
}

impl PartialEq<&str> for GapName {
	fn eq(&self, other: &&str) -> bool {
		&*self.0 == *other
	}
}

impl fmt::Display for GapName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for GapName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, ":{}", self.0)
	}
}

/// A named position within a jig.
///
/// A gap may carry a transform. When the gap is plugged, the replacement
/// items are passed through the transform and its output is what gets
/// spliced in. Without a transform the replacement items are used as they
/// are.
///
/// Gaps are immutable: plugging never changes a gap, it only removes it from
/// the jig or replaces it with other gaps.
#[derive(Clone, Default)]
pub struct Gap {
	name: GapName,
	transform: Option<Arc<TransformFn>>,
}

impl Gap {
	pub fn new(name: impl Into<GapName>) -> Self {
		Self {
			name: name.into(),
			transform: None,
		}
	}

	/// Create a gap whose replacement items are passed through `transform`
	/// before they are spliced in.
	///
	/// ```rust
	/// use jig_core::Gap;
	/// use jig_core::Item;
	/// use jig_core::jig;
	///
	/// let shout = Gap::with_transform("name", |mut items: Vec<Item>| {
	/// 	items.push(Item::from("!"));
	/// 	items
	/// });
	/// let greeting = jig!["hello ", shout];
	/// assert_eq!(greeting.plug("name", "world").render().unwrap(), "hello world!");
	/// ```
	pub fn with_transform<F>(name: impl Into<GapName>, transform: F) -> Self
	where
		F: Fn(Vec<Item>) -> Vec<Item> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			transform: Some(Arc::new(transform)),
		}
	}

	pub fn name(&self) -> &GapName {
		&self.name
	}

	pub fn has_transform(&self) -> bool {
		self.transform.is_some()
	}

	/// Run the replacement items through the transform. Identity when the gap
	/// has no transform.
	pub fn fill(&self, items: Vec<Item>) -> Vec<Item> {
		match &self.transform {
			Some(transform) => transform(items),
			None => items,
		}
	}
}

/// Two gaps are equal when they share a name and the same transform
/// instance (or both have none).
impl PartialEq for Gap {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
			&& match (&self.transform, &other.transform) {
				(None, None) => true,
				(Some(transform), Some(other_transform)) => Arc::ptr_eq(transform, other_transform),
				_ => false,
			}
	}
}

impl fmt::Debug for Gap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.has_transform() {
			write!(f, "{:?}{{}}", self.name)
		} else {
			write!(f, "{:?}", self.name)
		}
	}
}

/// Shorthand for [`Gap::new`], handy inside [`jig!`](crate::jig).
pub fn gap(name: impl Into<GapName>) -> Gap {
	Gap::new(name)
}
