use miette::Diagnostic;
use thiserror::Error;

/// Boxed error returned by a failing thunk.
pub type ThunkError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum JigError {
	#[error(transparent)]
	#[diagnostic(code(jig::io_error))]
	Io(#[from] std::io::Error),

	#[error("slice {start}..={end} is out of range for a jig with {positions} position(s)")]
	#[diagnostic(
		code(jig::invalid_slice_range),
		help("even positions address content cells and odd positions address gaps")
	)]
	InvalidSliceRange {
		start: isize,
		end: isize,
		positions: usize,
	},

	#[error("replication count must be greater than zero, got {0}")]
	#[diagnostic(code(jig::invalid_replication_count))]
	InvalidReplicationCount(usize),

	#[error("value cannot be used to fill a gap: {0}")]
	#[diagnostic(
		code(jig::invalid_gap_fill_shape),
		help(
			"use a string, number, boolean, null, array, `{{ gap = \"name\" }}` or `{{ items = \
			 [...] }}`"
		)
	)]
	InvalidGapFillShape(String),

	#[error("gap index {index} is out of range for a jig with {gaps} gap(s)")]
	#[diagnostic(code(jig::invalid_gap_index))]
	InvalidGapIndex { index: usize, gaps: usize },

	#[error("expected {expected} replacement(s) for the gap range, got {got}")]
	#[diagnostic(code(jig::gap_count_mismatch))]
	GapCountMismatch { expected: usize, got: usize },

	#[error(transparent)]
	#[diagnostic(code(jig::thunk))]
	Thunk(ThunkError),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(jig::config_parse),
		help("check that jig.toml is valid TOML with `template`, [values] and/or [files]")
	)]
	ConfigParse(String),

	#[error("failed to load document `{path}`: {reason}")]
	#[diagnostic(code(jig::document_parse))]
	DocumentParse { path: String, reason: String },

	#[error("unsupported document format: `{0}`")]
	#[diagnostic(
		code(jig::unsupported_format),
		help("supported formats: json, toml, yaml, yml")
	)]
	UnsupportedFormat(String),
}

pub type JigResult<T> = Result<T, JigError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
