use std::ops::Bound;
use std::ops::Range;
use std::ops::RangeBounds;
use std::ops::RangeFrom;
use std::ops::RangeFull;
use std::ops::RangeInclusive;
use std::ops::RangeTo;
use std::ops::RangeToInclusive;

use crate::Jig;
use crate::JigError;
use crate::JigResult;
use crate::jig::Cell;

/// A single logical position or a range of them, as accepted by
/// [`Jig::slice`]. Negative values count back from the end.
pub trait SliceRange {
	fn slice_bounds(&self) -> (Bound<isize>, Bound<isize>);
}

macro_rules! impl_slice_position {
	($($ty:ty),+ $(,)?) => {
		$(
			impl SliceRange for $ty {
				fn slice_bounds(&self) -> (Bound<isize>, Bound<isize>) {
					let position = to_position(*self);
					(Bound::Included(position), Bound::Included(position))
				}
			}
		)+
	};
}

macro_rules! impl_slice_range {
	($($range:ident),+ $(,)?) => {
		$(
			impl_slice_range!(@impl $range<i32>);
			impl_slice_range!(@impl $range<i64>);
			impl_slice_range!(@impl $range<isize>);
			impl_slice_range!(@impl $range<usize>);
		)+
	};
	(@impl $range:ty) => {
		impl SliceRange for $range {
			fn slice_bounds(&self) -> (Bound<isize>, Bound<isize>) {
				(
					self.start_bound().map(|value| to_position(*value)),
					self.end_bound().map(|value| to_position(*value)),
				)
			}
		}
	};
}

/// Positions too large for `isize` saturate, so they stay out of range
/// instead of wrapping into negative positions.
fn to_position<T: TryInto<isize>>(value: T) -> isize {
	value.try_into().unwrap_or(isize::MAX)
}

impl_slice_position!(i32, i64, isize, usize);
impl_slice_range!(Range, RangeInclusive, RangeFrom, RangeTo, RangeToInclusive);

impl SliceRange for RangeFull {
	fn slice_bounds(&self) -> (Bound<isize>, Bound<isize>) {
		(Bound::Unbounded, Bound::Unbounded)
	}
}

impl SliceRange for (Bound<isize>, Bound<isize>) {
	fn slice_bounds(&self) -> (Bound<isize>, Bound<isize>) {
		*self
	}
}

impl Jig {
	/// Extract part of the jig as a new jig.
	///
	/// Content cells and gaps are addressed by one position scheme:
	///
	/// ```text
	///        1    3       <- gaps
	///   +----+----+----+
	///   |    |    |    |
	///   +----+----+----+
	///     0    2    4     <- cells
	/// ```
	///
	/// A jig with `n` gaps has `2n + 1` positions. Negative positions count
	/// from the end. When the slice starts or ends on a gap, an empty cell is
	/// added on that side so the result is a well formed jig.
	///
	/// ```rust
	/// use jig_core::gap;
	/// use jig_core::jig;
	///
	/// let j = jig!["a", gap("x"), "c"];
	/// assert_eq!(j.slice(0).unwrap().render().unwrap(), "a");
	/// assert_eq!(j.slice(1).unwrap(), jig![gap("x")]);
	/// assert_eq!(j.slice(-2..).unwrap(), jig![gap("x"), "c"]);
	/// ```
	pub fn slice(&self, range: impl SliceRange) -> JigResult<Jig> {
		let positions = self.positions() as isize;
		let (start, end) = range.slice_bounds();

		let first = match start {
			Bound::Included(first) => normalize(first, positions),
			Bound::Excluded(first) => normalize(first, positions).saturating_add(1),
			Bound::Unbounded => 0,
		};
		let last = match end {
			Bound::Included(last) => normalize(last, positions),
			Bound::Excluded(last) => normalize(last, positions).saturating_sub(1),
			Bound::Unbounded => positions - 1,
		};

		self.slice_positions(first, last)
	}

	/// Extract `len` positions starting at `start`.
	pub fn slice_len(&self, start: isize, len: usize) -> JigResult<Jig> {
		let first = normalize(start, self.positions() as isize);
		let last = first.saturating_add(to_position(len)).saturating_sub(1);
		self.slice_positions(first, last)
	}

	/// Slice the inclusive span `first..=last` of already normalized
	/// positions. An empty span (`last == first - 1`) yields a null jig.
	fn slice_positions(&self, first: isize, last: isize) -> JigResult<Jig> {
		let positions = self.positions() as isize;
		if first < 0 || last >= positions || first > last + 1 {
			return Err(JigError::InvalidSliceRange {
				start: first,
				end: last,
				positions: self.positions(),
			});
		}

		if first == last + 1 {
			return Ok(Jig::null());
		}

		let (first, last) = (first as usize, last as usize);
		let (first_gap, last_gap) = (first % 2, last % 2);

		let gaps = self.gaps[(first - first_gap) / 2..(last + last_gap) / 2].to_vec();
		let cells = (first + first_gap) / 2..(last - last_gap) / 2 + 1;

		let mut contents: Vec<Cell> = Vec::with_capacity(gaps.len() + 1);
		if first_gap == 1 {
			contents.push(Cell::new());
		}
		contents.extend_from_slice(&self.contents[cells]);
		if last_gap == 1 {
			contents.push(Cell::new());
		}

		Ok(Jig { contents, gaps })
	}
}

fn normalize(position: isize, positions: isize) -> isize {
	if position < 0 {
		positions + position
	} else {
		position
	}
}
