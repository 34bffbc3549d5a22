use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::hash::Hash;
use std::ops::Bound;
use std::ops::RangeBounds;

use tracing::debug;
use tracing::trace;

use crate::ContentItem;
use crate::DEFAULT_GAP_NAME;
use crate::Gap;
use crate::Item;
use crate::Jig;
use crate::JigError;
use crate::JigResult;
use crate::jig::Cell;

/// A lookup from gap names to replacement items, used by [`Jig::fill`].
///
/// Returning `None` leaves the gap open.
pub trait GapValues {
	fn value_for(&self, name: &str) -> Option<Item>;
}

impl<K, V, S> GapValues for HashMap<K, V, S>
where
	K: Borrow<str> + Hash + Eq,
	V: Clone + Into<Item>,
	S: BuildHasher,
{
	fn value_for(&self, name: &str) -> Option<Item> {
		self.get(name).cloned().map(Into::into)
	}
}

impl<K, V> GapValues for BTreeMap<K, V>
where
	K: Borrow<str> + Ord,
	V: Clone + Into<Item>,
{
	fn value_for(&self, name: &str) -> Option<Item> {
		self.get(name).cloned().map(Into::into)
	}
}

impl<T: GapValues + ?Sized> GapValues for &T {
	fn value_for(&self, name: &str) -> Option<Item> {
		(**self).value_for(name)
	}
}

/// How a transformed replacement lands in the host jig.
enum Splice {
	/// Join the cells on both sides of the gap.
	Close,
	/// Join the cells on both sides with one item between them.
	Insert(ContentItem),
	/// Keep the cells and put another gap in this position.
	Regap(Gap),
	/// Merge the jig's first and last cells with the surrounding cells and
	/// take over its gaps.
	Graft(Jig),
}

impl Splice {
	fn from_items(mut items: Vec<Item>) -> Self {
		if items.len() > 1 {
			return Self::Graft(Jig::from_items(items));
		}

		match items.pop() {
			None | Some(Item::Null) => Self::Close,
			Some(Item::Text(text)) => Self::Insert(ContentItem::text(text)),
			Some(Item::Thunk(thunk)) => Self::Insert(ContentItem::Thunk(thunk)),
			Some(Item::Value(value)) => Self::Insert(ContentItem::Opaque(value)),
			Some(Item::Gap(gap)) => Self::Regap(gap),
			Some(Item::Jig(jig)) => Self::Graft(jig),
			Some(Item::List(list)) if list.is_empty() => Self::Close,
			Some(Item::List(list)) => Self::Graft(Jig::from_items(list)),
		}
	}
}

impl Jig {
	/// A copy of the jig with every gap called `name` plugged with
	/// `replacement`. Unknown names leave the copy unchanged.
	///
	/// ```rust
	/// use jig_core::gap;
	/// use jig_core::jig;
	///
	/// let template = jig!["-", gap("g")];
	/// let plugged = template.plug("g", jig!["X", gap("inner"), "x"]);
	/// assert_eq!(plugged.render().unwrap(), "-Xx");
	/// assert_eq!(plugged.gaps(), vec!["inner"]);
	/// ```
	pub fn plug(&self, name: &str, replacement: impl Into<Item>) -> Jig {
		let mut jig = self.clone();
		jig.plug_in_place(name, replacement);
		jig
	}

	/// Plug every gap called `name` with `replacement`, changing `self`.
	pub fn plug_in_place(&mut self, name: &str, replacement: impl Into<Item>) -> &mut Self {
		let replacement = replacement.into();
		self.fill_by(|gap| (gap.name() == name).then(|| replacement.clone()))
	}

	/// Plug the default gap.
	pub fn plug_default(&self, replacement: impl Into<Item>) -> Jig {
		self.plug(DEFAULT_GAP_NAME, replacement)
	}

	pub fn plug_default_in_place(&mut self, replacement: impl Into<Item>) -> &mut Self {
		self.plug_in_place(DEFAULT_GAP_NAME, replacement)
	}

	/// A copy with every gap plugged with nothing.
	pub fn close(&self) -> Jig {
		let mut jig = self.clone();
		jig.close_in_place();
		jig
	}

	pub fn close_in_place(&mut self) -> &mut Self {
		self.fill_by(|_| Some(Item::Null))
	}

	/// A copy with every gap whose name appears in `values` plugged with the
	/// matching value.
	///
	/// All gaps are resolved against the gaps that were open when the call
	/// started. Gaps introduced by a replacement stay open even when `values`
	/// has an entry for their name.
	pub fn fill(&self, values: &impl GapValues) -> Jig {
		let mut jig = self.clone();
		jig.fill_in_place(values);
		jig
	}

	pub fn fill_in_place(&mut self, values: &impl GapValues) -> &mut Self {
		self.fill_by(|gap| values.value_for(gap.name().as_str()))
	}

	/// Like [`Jig::fill`], but the value for each open gap comes from
	/// `callback`, called once per gap with the gap's name.
	pub fn fill_with(&self, callback: impl FnMut(&str) -> Option<Item>) -> Jig {
		let mut jig = self.clone();
		jig.fill_with_in_place(callback);
		jig
	}

	pub fn fill_with_in_place(
		&mut self,
		mut callback: impl FnMut(&str) -> Option<Item>,
	) -> &mut Self {
		self.fill_by(|gap| callback(gap.name().as_str()))
	}

	/// Plug only the gaps whose names are listed, asking `callback` for each
	/// one's value.
	pub fn plug_at<I, S>(&self, names: I, callback: impl FnMut(&str) -> Option<Item>) -> Jig
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut jig = self.clone();
		jig.plug_at_in_place(names, callback);
		jig
	}

	pub fn plug_at_in_place<I, S>(
		&mut self,
		names: I,
		mut callback: impl FnMut(&str) -> Option<Item>,
	) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let names: Vec<S> = names.into_iter().collect();
		self.fill_by(|gap| {
			if names.iter().any(|name| gap.name() == name.as_ref()) {
				callback(gap.name().as_str())
			} else {
				None
			}
		})
	}

	/// A copy with `items` inserted before every gap called `name`. The gaps
	/// stay open.
	pub fn before(&self, name: &str, items: impl Into<Item>) -> Jig {
		let Some(current) = self.find_gap(name) else {
			return self.clone();
		};

		self.plug(name, Item::List(vec![items.into(), Item::Gap(current)]))
	}

	/// A copy with `items` inserted after every gap called `name`. The gaps
	/// stay open.
	pub fn after(&self, name: &str, items: impl Into<Item>) -> Jig {
		let Some(current) = self.find_gap(name) else {
			return self.clone();
		};

		self.plug(name, Item::List(vec![Item::Gap(current), items.into()]))
	}

	fn find_gap(&self, name: &str) -> Option<Gap> {
		self.gaps.iter().find(|gap| gap.name() == name).cloned()
	}

	/// Walk the open gaps once. `lookup` decides per gap whether it is
	/// plugged; gaps created by a replacement are never offered to it.
	fn fill_by(&mut self, mut lookup: impl FnMut(&Gap) -> Option<Item>) -> &mut Self {
		let gaps = std::mem::take(&mut self.gaps);
		let mut open: Vec<Gap> = Vec::with_capacity(gaps.len());
		let mut plugged = 0usize;

		for gap in gaps {
			let Some(replacement) = lookup(&gap) else {
				open.push(gap);
				continue;
			};

			// `open.len()` is the index of the cell in front of this gap.
			let at = open.len();
			trace!(gap = %gap.name(), position = at * 2 + 1, "plugging gap");
			let splice = Splice::from_items(gap.fill(replacement.into_items()));
			open.extend(self.splice_cells(at, splice));
			plugged += 1;
		}

		debug!(plugged, open = open.len(), "filled gaps");
		self.gaps = open;
		self
	}

	/// Merge the replacement into `contents[at]` and `contents[at + 1]`,
	/// returning the gaps that take the plugged gap's place.
	fn splice_cells(&mut self, at: usize, splice: Splice) -> Vec<Gap> {
		match splice {
			Splice::Close => {
				let after = self.contents.remove(at + 1);
				self.contents[at].extend(after);
				Vec::new()
			}
			Splice::Insert(item) => {
				let after = self.contents.remove(at + 1);
				let cell = &mut self.contents[at];
				cell.push(item);
				cell.extend(after);
				Vec::new()
			}
			Splice::Regap(gap) => vec![gap],
			Splice::Graft(jig) => {
				let Jig { contents, gaps } = jig;
				let after = self.contents.remove(at + 1);
				let mut cells = contents.into_iter();

				if let Some(first) = cells.next() {
					self.contents[at].extend(first);
				}

				let mut middle: Vec<Cell> = cells.collect();
				match middle.last_mut() {
					Some(last) => last.extend(after),
					None => self.contents[at].extend(after),
				}

				self.contents.splice(at + 1..at + 1, middle);
				gaps
			}
		}
	}

	/// A copy with the gap at `index` (0-based, counting gaps only) plugged.
	pub fn plugn(&self, index: usize, replacement: impl Into<Item>) -> JigResult<Jig> {
		let mut jig = self.clone();
		jig.plugn_in_place(index, replacement)?;
		Ok(jig)
	}

	pub fn plugn_in_place(
		&mut self,
		index: usize,
		replacement: impl Into<Item>,
	) -> JigResult<&mut Self> {
		self.fill_positions(BTreeMap::from([(index, replacement.into())]))
	}

	/// A copy with the gaps in `range` plugged by the replacements, in order.
	/// The number of replacements must match the length of the range.
	pub fn plugn_range<R, I, T>(&self, range: R, replacements: I) -> JigResult<Jig>
	where
		R: RangeBounds<usize>,
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		let mut jig = self.clone();
		jig.plugn_range_in_place(range, replacements)?;
		Ok(jig)
	}

	pub fn plugn_range_in_place<R, I, T>(
		&mut self,
		range: R,
		replacements: I,
	) -> JigResult<&mut Self>
	where
		R: RangeBounds<usize>,
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		let gaps = self.gaps.len();
		let past = |index: usize| {
			index
				.checked_add(1)
				.ok_or(JigError::InvalidGapIndex { index, gaps })
		};
		let start = match range.start_bound() {
			Bound::Included(start) => *start,
			Bound::Excluded(start) => past(*start)?,
			Bound::Unbounded => 0,
		};
		let end = match range.end_bound() {
			Bound::Included(end) => past(*end)?,
			Bound::Excluded(end) => *end,
			Bound::Unbounded => gaps,
		};

		let replacements: Vec<Item> = replacements.into_iter().map(Into::into).collect();
		let expected = end.saturating_sub(start);
		if replacements.len() != expected {
			return Err(JigError::GapCountMismatch {
				expected,
				got: replacements.len(),
			});
		}

		self.fill_positions((start..end).zip(replacements).collect())
	}

	/// A copy with each listed gap index plugged by its paired value.
	pub fn plugn_map<I, T>(&self, pairs: I) -> JigResult<Jig>
	where
		I: IntoIterator<Item = (usize, T)>,
		T: Into<Item>,
	{
		let mut jig = self.clone();
		jig.plugn_map_in_place(pairs)?;
		Ok(jig)
	}

	pub fn plugn_map_in_place<I, T>(&mut self, pairs: I) -> JigResult<&mut Self>
	where
		I: IntoIterator<Item = (usize, T)>,
		T: Into<Item>,
	{
		let pairs = pairs
			.into_iter()
			.map(|(index, item)| (index, item.into()))
			.collect();
		self.fill_positions(pairs)
	}

	/// A copy where the nth item plugs the nth gap. Every gap is visited:
	/// gaps beyond the last item are closed and items beyond the last gap are
	/// ignored.
	pub fn plugn_each<I, T>(&self, items: I) -> JigResult<Jig>
	where
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		let mut jig = self.clone();
		jig.plugn_each_in_place(items)?;
		Ok(jig)
	}

	pub fn plugn_each_in_place<I, T>(&mut self, items: I) -> JigResult<&mut Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		let mut items = items.into_iter();
		let pairs = (0..self.gaps.len())
			.map(|index| (index, items.next().map_or(Item::Null, Into::into)))
			.collect();
		self.fill_positions(pairs)
	}

	/// Plug gaps by index. Indices refer to the gap list as it was before the
	/// call; `adjust` tracks how far earlier splices shifted the later gaps.
	fn fill_positions(&mut self, pairs: BTreeMap<usize, Item>) -> JigResult<&mut Self> {
		let gaps = self.gaps.len();
		if let Some((&index, _)) = pairs.last_key_value() {
			if index >= gaps {
				return Err(JigError::InvalidGapIndex { index, gaps });
			}
		}

		let mut adjust: isize = 0;
		for (index, replacement) in pairs {
			let at = (index as isize + adjust) as usize;
			let gap = self.gaps[at].clone();
			trace!(gap = %gap.name(), index, at, "plugging gap by index");

			let splice = Splice::from_items(gap.fill(replacement.into_items()));
			let introduced = self.splice_cells(at, splice);
			adjust += introduced.len() as isize - 1;
			self.gaps.splice(at..=at, introduced);
		}

		Ok(self)
	}
}
