use std::fmt;
use std::sync::Arc;

use crate::ContentItem;
use crate::Gap;
use crate::GapName;
use crate::Item;

/// One content cell: the items sitting between two gaps (or before the
/// first gap, or after the last one).
pub type Cell = Vec<ContentItem>;

/// An ordered sequence of content interleaved with named gaps.
///
/// A jig stores its content cells and its gaps in two vectors. There is
/// always exactly one more cell than there are gaps, so the sequence reads
/// `cell, gap, cell, gap, ..., cell`. Logical position `2k` is `cells[k]` and
/// position `2k + 1` is `gaps[k]`.
///
/// Cloning a jig copies both vectors and shares the content items, which are
/// never changed after they are pushed. Every operation that takes `&self`
/// (`plug`, `fill`, `slice`, `concat`, ...) returns a fresh jig and leaves the
/// original untouched. The `_in_place` variants and [`Jig::push`] change
/// `self`.
#[derive(Clone)]
pub struct Jig {
	pub(crate) contents: Vec<Cell>,
	pub(crate) gaps: Vec<Gap>,
}

impl Jig {
	/// A jig holding a single default gap. It acts as a universal insertion
	/// point.
	pub fn new() -> Self {
		Self::from_items(Vec::<Item>::new())
	}

	/// A closed jig with no content. It renders as the empty string.
	pub fn null() -> Self {
		Self {
			contents: vec![Cell::new()],
			gaps: Vec::new(),
		}
	}

	/// Build a jig by pushing every item in order. When no item is supplied
	/// the jig gets a single default gap, like [`Jig::new`].
	pub fn from_items<I, T>(items: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		let mut jig = Self::null();
		let mut supplied = false;

		for item in items {
			jig.push(item);
			supplied = true;
		}

		if !supplied {
			jig.push_gap(Gap::default());
		}

		jig
	}

	/// Append an item to the end of the jig.
	///
	/// Text, thunks and values are added to the last cell. A gap opens a new
	/// cell. A jig is flattened: its first cell joins the last cell and its
	/// remaining cells and gaps are appended. Lists push each element and
	/// `Null` is skipped.
	pub fn push(&mut self, item: impl Into<Item>) -> &mut Self {
		match item.into() {
			Item::Text(text) => self.last_cell().push(ContentItem::Text(Arc::from(text))),
			Item::Gap(gap) => self.push_gap(gap),
			Item::Jig(jig) => self.push_jig(jig),
			Item::Thunk(thunk) => self.last_cell().push(ContentItem::Thunk(thunk)),
			Item::Value(value) => self.last_cell().push(ContentItem::Opaque(value)),
			Item::List(items) => {
				for item in items {
					self.push(item);
				}
			}
			Item::Null => {}
		}

		self
	}

	/// Push every item of the collection, in order.
	pub fn concat_in_place<I, T>(&mut self, items: I) -> &mut Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		for item in items {
			self.push(item);
		}

		self
	}

	/// A copy of the jig with every item of the collection pushed onto it.
	pub fn concat<I, T>(&self, items: I) -> Jig
	where
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		let mut jig = self.clone();
		jig.concat_in_place(items);
		jig
	}

	pub(crate) fn push_gap(&mut self, gap: Gap) {
		self.gaps.push(gap);
		self.contents.push(Cell::new());
	}

	pub(crate) fn push_jig(&mut self, other: Jig) {
		let Jig { contents, gaps } = other;
		let mut cells = contents.into_iter();

		if let Some(first) = cells.next() {
			self.last_cell().extend(first);
		}

		self.contents.extend(cells);
		self.gaps.extend(gaps);
	}

	fn last_cell(&mut self) -> &mut Cell {
		if self.contents.is_empty() {
			self.contents.push(Cell::new());
		}

		let last = self.contents.len() - 1;
		&mut self.contents[last]
	}

	/// The names of the open gaps, in order. A name appears once per gap.
	pub fn gaps(&self) -> Vec<GapName> {
		self.gaps.iter().map(|gap| gap.name().clone()).collect()
	}

	/// The open gaps themselves, including their transforms.
	pub fn raw_gaps(&self) -> &[Gap] {
		&self.gaps
	}

	/// The content cells. There is always one more cell than there are gaps.
	pub fn cells(&self) -> &[Cell] {
		&self.contents
	}

	pub fn has_gap(&self, name: &str) -> bool {
		self.gaps.iter().any(|gap| gap.name() == name)
	}

	/// Logical position of the first gap called `name`. See
	/// [`Jig::slice`] for the position scheme.
	pub fn index(&self, name: &str) -> Option<usize> {
		self.gaps
			.iter()
			.position(|gap| gap.name() == name)
			.map(|index| index * 2 + 1)
	}

	/// Number of logical positions: every cell and every gap.
	pub fn positions(&self) -> usize {
		self.contents.len() + self.gaps.len()
	}

	/// True when no gap is left to plug.
	pub fn is_closed(&self) -> bool {
		self.gaps.is_empty()
	}

	pub fn is_open(&self) -> bool {
		!self.gaps.is_empty()
	}
}

impl Default for Jig {
	fn default() -> Self {
		Self::new()
	}
}

/// Equal when the cells and gaps are equal. Two jigs that render the same
/// string can still differ, see [`Jig::renders_like`].
impl PartialEq for Jig {
	fn eq(&self, other: &Self) -> bool {
		self.contents == other.contents && self.gaps == other.gaps
	}
}

impl fmt::Debug for Jig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut entries: Vec<String> = Vec::new();

		for (index, cell) in self.contents.iter().enumerate() {
			entries.extend(cell.iter().map(|item| format!("{item:?}")));

			if let Some(gap) = self.gaps.get(index) {
				entries.push(format!("{gap:?}"));
			}
		}

		write!(f, "Jig[{}]", entries.join(", "))
	}
}

impl<T: Into<Item>> FromIterator<T> for Jig {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self::from_items(iter)
	}
}

impl<T: Into<Item>> Extend<T> for Jig {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.concat_in_place(iter);
	}
}

impl From<&str> for Jig {
	fn from(text: &str) -> Self {
		Self::from_items([text])
	}
}

impl From<String> for Jig {
	fn from(text: String) -> Self {
		Self::from_items([text])
	}
}

impl From<Gap> for Jig {
	fn from(gap: Gap) -> Self {
		Self::from_items([gap])
	}
}

/// Build a [`Jig`] from a list of items.
///
/// ```rust
/// use jig_core::gap;
/// use jig_core::jig;
///
/// let path = jig!["first", gap("sep"), "middle", gap("sep"), "after"];
/// assert_eq!(path.plug("sep", "/").render().unwrap(), "first/middle/after");
///
/// // Without items the jig holds the default gap.
/// assert!(jig![].is_open());
/// ```
#[macro_export]
macro_rules! jig {
	() => {
		$crate::Jig::new()
	};
	($($item:expr),+ $(,)?) => {
		$crate::Jig::from_items([$($crate::Item::from($item)),+])
	};
}
