use crate::ContentItem;
use crate::Item;
use crate::Jig;
use crate::JigError;
use crate::JigResult;
use crate::jig::Cell;

impl Jig {
	/// Render the jig to a string.
	///
	/// Cells are rendered in order. Gaps contribute nothing, whether they are
	/// open or not. Thunks are evaluated on every call, so a jig holding a
	/// thunk can render differently each time. The first thunk error stops
	/// rendering and is returned as [`JigError::Thunk`].
	///
	/// ```rust
	/// use jig_core::Item;
	/// use jig_core::gap;
	/// use jig_core::jig;
	///
	/// let j = jig!["a", gap("open"), Item::thunk(|| 1 + 1), 'c'];
	/// assert_eq!(j.render().unwrap(), "a2c");
	/// ```
	pub fn render(&self) -> JigResult<String> {
		let mut output = String::new();
		self.render_into(&mut output)?;
		Ok(output)
	}

	/// Append the rendered jig to `output`.
	pub fn render_into(&self, output: &mut String) -> JigResult<()> {
		for cell in &self.contents {
			render_cell(cell, output)?;
		}

		Ok(())
	}

	/// Render every cell on its own. The result has one string per cell, so
	/// it is the rendered text split at each gap.
	pub fn split(&self) -> JigResult<Vec<String>> {
		self.contents
			.iter()
			.map(|cell| {
				let mut output = String::new();
				render_cell(cell, &mut output)?;
				Ok(output)
			})
			.collect()
	}

	/// Render the cells with `separator` where each gap sits.
	pub fn join(&self, separator: &str) -> JigResult<String> {
		Ok(self.split()?.join(separator))
	}

	/// True when both jigs render the same string, whatever their structure.
	pub fn renders_like(&self, other: &Jig) -> JigResult<bool> {
		Ok(self.render()? == other.render()?)
	}

	/// True when the jig is closed and renders as the empty string.
	pub fn is_null(&self) -> JigResult<bool> {
		if self.is_open() {
			return Ok(false);
		}

		for cell in &self.contents {
			let mut output = String::new();
			render_cell(cell, &mut output)?;

			if !output.is_empty() {
				return Ok(false);
			}
		}

		Ok(true)
	}
}

fn render_cell(cell: &Cell, output: &mut String) -> JigResult<()> {
	for item in cell {
		match item {
			ContentItem::Text(text) => output.push_str(text),
			ContentItem::Thunk(thunk) => {
				let item = thunk.call().map_err(JigError::Thunk)?;
				render_item(&item, output)?;
			}
			ContentItem::Opaque(value) => output.push_str(&value.to_string()),
		}
	}

	Ok(())
}

/// Render the value a thunk produced.
fn render_item(item: &Item, output: &mut String) -> JigResult<()> {
	match item {
		Item::Text(text) => output.push_str(text),
		Item::Jig(jig) => jig.render_into(output)?,
		Item::Thunk(thunk) => {
			let item = thunk.call().map_err(JigError::Thunk)?;
			render_item(&item, output)?;
		}
		Item::Value(value) => output.push_str(&value.to_string()),
		Item::List(items) => {
			for item in items {
				render_item(item, output)?;
			}
		}
		Item::Gap(_) | Item::Null => {}
	}

	Ok(())
}
