use std::ops::Add;
use std::ops::AddAssign;

use crate::Item;
use crate::Jig;
use crate::JigError;
use crate::JigResult;

impl Jig {
	/// A jig made of `count` copies of this one, one after the other. The
	/// gaps of every copy stay open.
	///
	/// ```rust
	/// use jig_core::Jig;
	///
	/// let three = Jig::new().repeat(3).unwrap();
	/// assert_eq!(three.gaps().len(), 3);
	/// assert_eq!(three.plug_default("3").render().unwrap(), "333");
	/// ```
	pub fn repeat(&self, count: usize) -> JigResult<Jig> {
		if count == 0 {
			return Err(JigError::InvalidReplicationCount(count));
		}

		let mut jig = self.clone();
		for _ in 1..count {
			jig.push_jig(self.clone());
		}

		Ok(jig)
	}

	/// One copy of this jig per item, with the default gap of each copy
	/// plugged by that item. No items give a null jig.
	///
	/// ```rust
	/// use jig_core::jig;
	/// use jig_core::Jig;
	///
	/// let row = jig!["<li>", Jig::new(), "</li>"];
	/// let list = row.repeat_each(["a", "b"]);
	/// assert_eq!(list.render().unwrap(), "<li>a</li><li>b</li>");
	/// ```
	pub fn repeat_each<I, T>(&self, items: I) -> Jig
	where
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		items.into_iter().fold(Jig::null(), |mut jig, item| {
			jig.push_jig(self.plug_default(item));
			jig
		})
	}
}

impl<T: Into<Item>> Add<T> for Jig {
	type Output = Jig;

	fn add(mut self, rhs: T) -> Jig {
		self.push(rhs);
		self
	}
}

impl<T: Into<Item>> Add<T> for &Jig {
	type Output = Jig;

	fn add(self, rhs: T) -> Jig {
		self.concat([rhs])
	}
}

impl<T: Into<Item>> AddAssign<T> for Jig {
	fn add_assign(&mut self, rhs: T) {
		self.push(rhs);
	}
}
