use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::Gap;
use crate::Jig;
use crate::ThunkError;

/// The function type wrapped by a [`Thunk`].
pub type ThunkFn = dyn Fn() -> Result<Item, ThunkError> + Send + Sync;

/// A deferred computation stored in a jig. It is evaluated every time the
/// jig is rendered and its result is never cached.
#[derive(Clone)]
pub struct Thunk(Arc<ThunkFn>);

impl Thunk {
	/// Wrap an infallible computation.
	pub fn new<F, T>(f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Item>,
	{
		let thunk = move || -> Result<Item, ThunkError> { Ok(f().into()) };
		Self(Arc::new(thunk))
	}

	/// Wrap a computation that can fail. The error is returned from
	/// [`Jig::render`] as [`JigError::Thunk`](crate::JigError::Thunk).
	pub fn fallible<F, T, E>(f: F) -> Self
	where
		F: Fn() -> Result<T, E> + Send + Sync + 'static,
		T: Into<Item>,
		E: Into<ThunkError>,
	{
		let thunk = move || -> Result<Item, ThunkError> { f().map(Into::into).map_err(Into::into) };
		Self(Arc::new(thunk))
	}

	pub fn call(&self) -> Result<Item, ThunkError> {
		(self.0)()
	}

	/// True when both thunks wrap the same closure instance.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Thunk {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("<thunk>")
	}
}

/// Any value that is rendered through its [`Display`](fmt::Display)
/// implementation.
#[derive(Clone)]
pub struct Opaque(Arc<dyn fmt::Display + Send + Sync>);

impl Opaque {
	pub fn new(value: impl fmt::Display + Send + Sync + 'static) -> Self {
		Self(Arc::new(value))
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Display for Opaque {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl fmt::Debug for Opaque {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// A renderable entry of a content cell.
///
/// Content items are never changed once they are stored in a jig. Cloning a
/// jig shares them with the clone.
#[derive(Clone)]
pub enum ContentItem {
	Text(Arc<str>),
	Thunk(Thunk),
	Opaque(Opaque),
}

impl ContentItem {
	pub fn text(text: impl Into<Arc<str>>) -> Self {
		Self::Text(text.into())
	}
}

/// Text compares by value. Thunks and opaque values compare by identity and
/// are never evaluated.
impl PartialEq for ContentItem {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Text(text), Self::Text(other_text)) => text == other_text,
			(Self::Thunk(thunk), Self::Thunk(other_thunk)) => thunk.ptr_eq(other_thunk),
			(Self::Opaque(value), Self::Opaque(other_value)) => value.ptr_eq(other_value),
			_ => false,
		}
	}
}

impl fmt::Debug for ContentItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => write!(f, "{:?}", &**text),
			Self::Thunk(thunk) => write!(f, "{thunk:?}"),
			Self::Opaque(value) => write!(f, "{value}"),
		}
	}
}

/// Anything that can be pushed into a jig or used to plug a gap.
///
/// Most values convert into an `Item` with `From`, so construction and plug
/// methods accept `impl Into<Item>`:
///
/// - `&str`, `String` and `char` become [`Item::Text`].
/// - [`Gap`] becomes [`Item::Gap`].
/// - [`Jig`] becomes [`Item::Jig`] and is flattened into its host.
/// - `None` and `false` become [`Item::Null`] and are skipped.
/// - Vectors and arrays become [`Item::List`].
/// - Numbers and `true` become [`Item::Value`].
#[derive(Clone, Debug)]
pub enum Item {
	Text(String),
	Gap(Gap),
	Jig(Jig),
	Thunk(Thunk),
	Value(Opaque),
	List(Vec<Item>),
	Null,
}

impl Item {
	/// A deferred computation evaluated at render time.
	pub fn thunk<F, T>(f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Item>,
	{
		Self::Thunk(Thunk::new(f))
	}

	/// A value rendered through its `Display` implementation.
	pub fn value(value: impl fmt::Display + Send + Sync + 'static) -> Self {
		Self::Value(Opaque::new(value))
	}

	/// Flatten the item into the list a gap transform receives. `Null` is the
	/// empty list and a `List` is its own elements.
	pub fn into_items(self) -> Vec<Item> {
		match self {
			Self::List(items) => items,
			Self::Null => Vec::new(),
			item => vec![item],
		}
	}
}

impl From<&str> for Item {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for Item {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&String> for Item {
	fn from(text: &String) -> Self {
		Self::Text(text.clone())
	}
}

impl From<Cow<'_, str>> for Item {
	fn from(text: Cow<'_, str>) -> Self {
		Self::Text(text.into_owned())
	}
}

impl From<char> for Item {
	fn from(ch: char) -> Self {
		Self::Text(ch.to_string())
	}
}

impl From<Gap> for Item {
	fn from(gap: Gap) -> Self {
		Self::Gap(gap)
	}
}

impl From<Jig> for Item {
	fn from(jig: Jig) -> Self {
		Self::Jig(jig)
	}
}

impl From<&Jig> for Item {
	fn from(jig: &Jig) -> Self {
		Self::Jig(jig.clone())
	}
}

impl From<Thunk> for Item {
	fn from(thunk: Thunk) -> Self {
		Self::Thunk(thunk)
	}
}

impl From<Opaque> for Item {
	fn from(value: Opaque) -> Self {
		Self::Value(value)
	}
}

impl From<bool> for Item {
	fn from(value: bool) -> Self {
		if value { Self::value(value) } else { Self::Null }
	}
}

impl<T: Into<Item>> From<Option<T>> for Item {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

impl<T: Into<Item>> From<Vec<T>> for Item {
	fn from(items: Vec<T>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Item>, const N: usize> From<[T; N]> for Item {
	fn from(items: [T; N]) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

macro_rules! impl_value_from {
	($($ty:ty),+ $(,)?) => {
		$(
			impl From<$ty> for Item {
				fn from(value: $ty) -> Self {
					Self::value(value)
				}
			}
		)+
	};
}

impl_value_from!(
	i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);
