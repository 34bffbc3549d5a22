//! Jigs and fill values described as data.
//!
//! A document is JSON, TOML or YAML. Values map to [`Item`]s as follows:
//!
//! | data                  | item                          |
//! |-----------------------|-------------------------------|
//! | string                | text                          |
//! | number, `true`        | value                         |
//! | `false`, null         | null                          |
//! | array                 | list                          |
//! | `{ gap = "name" }`    | gap                           |
//! | `{ items = [...] }`   | nested jig                    |
//!
//! Any other table is rejected with [`JigError::InvalidGapFillShape`].
//!
//! A template document is either an array of items or a table with an
//! `items` key. TOML documents always use the second form:
//!
//! ```toml
//! items = ["Hello, ", { gap = "name" }, "!"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::Gap;
use crate::Item;
use crate::Jig;
use crate::JigError;
use crate::JigResult;

const GAP_KEY: &str = "gap";
const ITEMS_KEY: &str = "items";

/// Convert a data value into an item.
pub fn item_from_value(value: Value) -> JigResult<Item> {
	let item = match value {
		Value::Null | Value::Bool(false) => Item::Null,
		Value::Bool(true) => Item::from(true),
		Value::Number(number) => Item::value(number),
		Value::String(text) => Item::Text(text),
		Value::Array(values) => {
			Item::List(
				values
					.into_iter()
					.map(item_from_value)
					.collect::<JigResult<_>>()?,
			)
		}
		Value::Object(map) => object_item(map)?,
	};

	Ok(item)
}

fn object_item(map: serde_json::Map<String, Value>) -> JigResult<Item> {
	if map.len() == 1 {
		if let Some(Value::String(name)) = map.get(GAP_KEY) {
			return Ok(Item::Gap(Gap::new(name)));
		}

		if let Some(Value::Array(values)) = map.get(ITEMS_KEY) {
			return Ok(Item::Jig(jig_from_items(values.clone())?));
		}
	}

	Err(JigError::InvalidGapFillShape(Value::Object(map).to_string()))
}

fn jig_from_items(values: Vec<Value>) -> JigResult<Jig> {
	let items = values
		.into_iter()
		.map(item_from_value)
		.collect::<JigResult<Vec<_>>>()?;

	Ok(Jig::from_items(items))
}

/// Build a jig from a template document. An empty item list gives a jig
/// with the default gap, like [`Jig::new`].
pub fn jig_from_value(value: Value, path_display: &str) -> JigResult<Jig> {
	match value {
		Value::Array(values) => jig_from_items(values),
		Value::Object(mut map) => {
			match map.remove(ITEMS_KEY) {
				Some(Value::Array(values)) => jig_from_items(values),
				_ => Err(not_a_template(path_display)),
			}
		}
		_ => Err(not_a_template(path_display)),
	}
}

fn not_a_template(path_display: &str) -> JigError {
	JigError::DocumentParse {
		path: path_display.to_string(),
		reason: "expected an array of items or a table with an `items` array".to_string(),
	}
}

/// Decode a table of fill values keyed by gap name.
pub fn values_from_value(value: Value, path_display: &str) -> JigResult<BTreeMap<String, Item>> {
	let Value::Object(map) = value else {
		return Err(JigError::DocumentParse {
			path: path_display.to_string(),
			reason: "expected a table of gap names to values".to_string(),
		});
	};

	map.into_iter()
		.map(|(name, value)| Ok((name, item_from_value(value)?)))
		.collect()
}

/// Parse document `content` in the given format (`json`, `toml`, `yaml` or
/// `yml`).
pub fn parse_document(content: &str, format: &str, path_display: &str) -> JigResult<Value> {
	let parse_error = |reason: String| {
		JigError::DocumentParse {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"json" => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
		"toml" => {
			let toml_value: toml::Value =
				toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
			toml_to_json(toml_value, path_display)
		}
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| parse_error(e.to_string())),
		other => Err(JigError::UnsupportedFormat(other.to_string())),
	}
}

/// Read a document, choosing the format from the file extension.
pub fn load_document(path: &Path) -> JigResult<Value> {
	let path_display = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		JigError::DocumentParse {
			path: path_display.clone(),
			reason: e.to_string(),
		}
	})?;
	let format = path
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();

	parse_document(&content, &format, &path_display)
}

/// Read a template document into a jig.
pub fn load_jig(path: &Path) -> JigResult<Jig> {
	jig_from_value(load_document(path)?, &path.display().to_string())
}

/// Read a document of fill values keyed by gap name.
pub fn load_values(path: &Path) -> JigResult<BTreeMap<String, Item>> {
	values_from_value(load_document(path)?, &path.display().to_string())
}

/// Convert a `toml::Value` to a `serde_json::Value`.
pub(crate) fn toml_to_json(value: toml::Value, path_display: &str) -> JigResult<Value> {
	let json = match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::from(i),
		toml::Value::Float(f) => {
			Value::Number(serde_json::Number::from_f64(f).ok_or_else(|| {
				JigError::DocumentParse {
					path: path_display.to_string(),
					reason: format!("`{f}` cannot be represented as a number"),
				}
			})?)
		}
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(arr) => {
			let items: JigResult<Vec<Value>> = arr
				.into_iter()
				.map(|v| toml_to_json(v, path_display))
				.collect();
			Value::Array(items?)
		}
		toml::Value::Table(table) => {
			let mut map = serde_json::Map::new();
			for (k, v) in table {
				map.insert(k, toml_to_json(v, path_display)?);
			}
			Value::Object(map)
		}
	};

	Ok(json)
}
