use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Item;
use crate::JigError;
use crate::JigResult;
use crate::document::item_from_value;
use crate::document::toml_to_json;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["jig.toml", ".jig.toml", ".config/jig.toml"];

/// Configuration loaded from a `jig.toml` file.
///
/// ```toml
/// template = "page.json"
/// expected = "page.html"
///
/// [values]
/// title = "Hello"
/// items = ["a", { gap = "rest" }]
///
/// [files]
/// body = "body.txt"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct JigConfig {
	/// Template document used when no template is passed on the command
	/// line. Relative to the project root.
	#[serde(default)]
	pub template: Option<PathBuf>,
	/// File holding the expected output for `jig check`.
	#[serde(default)]
	pub expected: Option<PathBuf>,
	/// Fill values keyed by gap name, in document syntax.
	#[serde(default)]
	pub values: BTreeMap<String, toml::Value>,
	/// Gaps plugged with the text of a file, keyed by gap name.
	#[serde(default)]
	pub files: BTreeMap<String, PathBuf>,
}

impl JigConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> JigResult<Option<JigConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: JigConfig =
			toml::from_str(&content).map_err(|e| JigError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Decode `[values]` and read every `[files]` entry into fill values.
	/// A name listed in both takes the file's text.
	pub fn load_values(&self, root: &Path) -> JigResult<BTreeMap<String, Item>> {
		let mut values = BTreeMap::new();

		for (name, value) in &self.values {
			let value = toml_to_json(value.clone(), &format!("[values].{name}"))?;
			values.insert(name.clone(), item_from_value(value)?);
		}

		for (name, rel_path) in &self.files {
			let content = std::fs::read_to_string(root.join(rel_path)).map_err(|e| {
				JigError::DocumentParse {
					path: rel_path.display().to_string(),
					reason: e.to_string(),
				}
			})?;
			values.insert(name.clone(), Item::Text(content));
		}

		Ok(values)
	}
}
