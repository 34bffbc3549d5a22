use std::collections::BTreeMap;
use std::collections::HashMap;
use std::ops::Bound;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use insta::assert_snapshot;
use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::__fixtures::*;
use super::*;
use crate::document::item_from_value;
use crate::document::jig_from_value;
use crate::document::load_jig;
use crate::document::load_values;
use crate::document::parse_document;
use crate::gap;
use crate::jig;

#[test]
fn plug_separator_everywhere() {
	let path = separator_jig().plug("separator", "/");

	assert_eq!(path.render().unwrap(), "first/middle/after");
	assert!(path.is_closed());
	assert_well_formed(&path);
}

#[test]
fn new_jig_has_the_default_gap() -> JigResult<()> {
	let empty = Jig::new();

	assert_eq!(empty.gaps(), vec![DEFAULT_GAP_NAME]);
	assert_eq!(empty.close().render()?, "");
	assert!(empty.close().is_closed());

	Ok(())
}

#[test]
fn null_jig_is_closed_and_empty() -> JigResult<()> {
	let null = Jig::null();

	assert!(null.is_closed());
	assert!(null.is_null()?);
	assert_eq!(null.positions(), 1);

	Ok(())
}

#[test]
fn open_jig_is_never_null() -> JigResult<()> {
	let open = Jig::new();

	assert_eq!(open.render()?, "");
	assert!(!open.is_null()?);
	assert!(open.close().is_null()?);
	assert!(!abc_jig().close().is_null()?);

	Ok(())
}

#[test]
fn slice_single_positions() -> JigResult<()> {
	let j = jig!["a", gap("x"), "c"];

	assert_eq!(j.slice(1)?, jig![gap("x")]);
	assert_eq!(j.slice(0)?.render()?, "a");
	assert_eq!(j.slice(2)?.render()?, "c");

	Ok(())
}

#[test]
fn fill_every_occurrence() {
	let values = HashMap::from([("item", "x")]);
	let filled = item_list_jig().fill(&values);

	assert_eq!(filled.render().unwrap(), "x,x,x");
	assert!(filled.is_closed());
}

#[test]
fn plug_with_a_jig_takes_over_its_gaps() -> JigResult<()> {
	let template = jig!["-", gap("g")];
	let plugged = template.plug("g", jig!["X", gap("inner"), "x"]);

	assert_eq!(plugged.render()?, "-Xx");
	assert_eq!(plugged.gaps(), vec!["inner"]);
	assert_well_formed(&plugged);
	// the original is untouched
	assert_eq!(template.gaps(), vec!["g"]);

	Ok(())
}

#[test]
fn repeat_then_plug_default() -> JigResult<()> {
	let repeated = Jig::new().repeat(3)?;

	assert_eq!(repeated.gaps().len(), 3);
	assert_eq!(repeated.plug_default("3").render()?, "333");

	Ok(())
}

#[test]
fn plug_unknown_gap_is_a_no_op() -> JigResult<()> {
	let original = abc_jig();
	let plugged = original.plug("missing", "value");

	assert_eq!(plugged, original);
	assert_eq!(plugged.gaps(), original.gaps());
	assert_eq!(plugged.render()?, original.render()?);

	Ok(())
}

#[test]
fn gap_names_never_render() -> JigResult<()> {
	let one = jig!["a", gap("x"), "b"];
	let other = jig!["a", gap("something_else"), "b"];

	assert!(one.renders_like(&other)?);
	assert_ne!(one, other);

	Ok(())
}

#[test]
fn pushing_a_jig_flattens_its_gaps() {
	let inner = jig![gap("a1"), "a", gap("a2")];
	let mut outer = jig!["b", gap("b1")];
	outer.push(inner);

	assert_eq!(outer.gaps(), vec!["b1", "a1", "a2"]);
	assert_eq!(outer.cells().len(), 4);
	assert_well_formed(&outer);
}

#[test]
fn slice_round_trip() -> JigResult<()> {
	let original = abc_jig();
	let total = original.positions();

	for split in 0..=total {
		let head = original.slice_len(0, split)?;
		let tail = original.slice_len(split as isize, total - split)?;
		let joined = head.concat([tail]);

		assert_eq!(joined.render()?, original.render()?, "split at {split}");
		assert_eq!(joined, original, "split at {split}");
		assert_well_formed(&joined);
	}

	Ok(())
}

#[rstest]
#[case::last_cell(-1, jig!["c"])]
#[case::tail(-2.., jig![gap("y"), "c"])]
#[case::middle(1..=3, jig![gap("x"), "b", gap("y")])]
#[case::exclusive(0..2, jig!["a", gap("x")])]
#[case::head(..=2, jig!["a", gap("x"), "b"])]
#[case::full((..), abc_jig())]
#[case::explicit_bounds((Bound::Excluded(0_isize), Bound::Included(1_isize)), jig![gap("x")])]
fn slice_ranges(#[case] range: impl SliceRange, #[case] expected: Jig) -> JigResult<()> {
	let sliced = abc_jig().slice(range)?;

	assert_eq!(sliced, expected);
	assert_well_formed(&sliced);

	Ok(())
}

#[test]
fn empty_slice_is_null() -> JigResult<()> {
	let sliced = abc_jig().slice(2..2)?;

	assert_eq!(sliced, Jig::null());
	assert_eq!(abc_jig().slice_len(5, 0)?, Jig::null());

	Ok(())
}

#[rstest]
#[case::past_the_end(5)]
#[case::before_the_start(-6)]
#[case::way_past(100)]
fn slice_out_of_range(#[case] position: isize) {
	let result = abc_jig().slice(position);

	assert!(matches!(
		result,
		Err(JigError::InvalidSliceRange { positions: 5, .. })
	));
}

#[test]
fn huge_positions_do_not_wrap() {
	let jig = abc_jig();

	let results = [
		jig.slice(usize::MAX),
		jig.slice(usize::MAX..),
		jig.slice(0..usize::MAX),
		jig.slice((Bound::Excluded(isize::MAX), Bound::Unbounded)),
		jig.slice_len(0, usize::MAX),
		jig.slice_len(-1, usize::MAX),
	];

	for result in results {
		assert!(
			matches!(result, Err(JigError::InvalidSliceRange { positions: 5, .. })),
			"{result:?}"
		);
	}
}

#[test]
fn reversed_slice_is_an_error() {
	let result = abc_jig().slice(3..1);

	assert!(matches!(result, Err(JigError::InvalidSliceRange { .. })));
}

#[test]
fn fill_uses_the_gaps_open_at_the_start() -> JigResult<()> {
	let values: HashMap<&str, Item> = HashMap::from([
		("a", Item::from(gap("b"))),
		("b", Item::from("B")),
	]);
	let filled = jig!["<", gap("a"), ">"].fill(&values);

	assert_eq!(filled.gaps(), vec!["b"]);
	assert_eq!(filled.render()?, "<>");
	assert_eq!(filled.fill(&values).render()?, "<B>");

	Ok(())
}

#[test]
fn fill_with_btree_map_and_callback() -> JigResult<()> {
	let values = BTreeMap::from([("x".to_string(), "X")]);
	assert_eq!(abc_jig().fill(&values).render()?, "aXbc");

	let mut asked = Vec::new();
	let filled = abc_jig().fill_with(|name| {
		asked.push(name.to_string());
		(name == "y").then(|| Item::from(42))
	});

	assert_eq!(asked, vec!["x", "y"]);
	assert_eq!(filled.render()?, "ab42c");
	assert_eq!(filled.gaps(), vec!["x"]);

	Ok(())
}

#[test]
fn plug_with_gap_regaps_the_position() -> JigResult<()> {
	let regapped = abc_jig().plug("x", gap("z"));

	assert_eq!(regapped.gaps(), vec!["z", "y"]);
	assert_eq!(regapped.render()?, "abc");
	assert_eq!(regapped.index("z"), Some(1));

	Ok(())
}

#[test]
fn plug_with_list_splices_each_item() -> JigResult<()> {
	let bracketed = vec![Item::from("["), Item::from(gap("inner")), Item::from("]")];
	let plugged = abc_jig().plug("x", bracketed);

	assert_eq!(plugged.gaps(), vec!["inner", "y"]);
	assert_eq!(plugged.plug("inner", "i").render()?, "a[i]bc");
	assert_well_formed(&plugged);

	Ok(())
}

#[test]
fn plug_with_empty_values_closes_the_gap() -> JigResult<()> {
	let closed = abc_jig()
		.plug("x", None::<&str>)
		.plug("y", Vec::<Item>::new());

	assert!(closed.is_closed());
	assert_eq!(closed.render()?, "abc");
	assert_eq!(closed.cells().len(), 1);

	Ok(())
}

#[test]
fn transform_rewrites_the_replacement() -> JigResult<()> {
	let greeting = jig!["hello ", shouting_gap("name"), "!"];

	assert_eq!(greeting.plug("name", "world").render()?, "hello WORLD!");
	assert_eq!(greeting.close().render()?, "hello !");

	Ok(())
}

#[test]
fn thunks_are_evaluated_on_every_render() -> JigResult<()> {
	let (counter, thunk) = counter_thunk();
	let j = jig![gap("n"), "/", gap("n")].plug("n", thunk);

	assert_eq!(j.render()?, "0/0");
	counter.store(7, Ordering::SeqCst);
	assert_eq!(j.render()?, "7/7");

	Ok(())
}

#[test]
fn thunk_errors_surface_from_render() {
	let failing = Item::Thunk(Thunk::fallible(|| {
		Err::<String, _>(std::io::Error::other("boom"))
	}));
	let j = jig!["before ", failing];

	let error = j.render().unwrap_err();
	assert!(matches!(error, JigError::Thunk(_)));
	assert_eq!(error.to_string(), "boom");
}

#[test]
fn thunk_can_return_a_jig() -> JigResult<()> {
	let j = jig!["<", Item::thunk(|| jig!["in", gap("open"), "ner"]), ">"];

	assert_eq!(j.render()?, "<inner>");
	assert!(j.is_closed());

	Ok(())
}

#[test]
fn plugn_single_index() -> JigResult<()> {
	let plugged = abc_jig().plugn(1, "Y")?;

	assert_eq!(plugged.render()?, "abYc");
	assert_eq!(plugged.gaps(), vec!["x"]);

	Ok(())
}

#[test]
fn plugn_out_of_range() {
	let result = abc_jig().plugn(2, "Z");

	assert!(matches!(
		result,
		Err(JigError::InvalidGapIndex { index: 2, gaps: 2 })
	));
}

#[test]
fn plugn_range_in_order() -> JigResult<()> {
	assert_eq!(abc_jig().plugn_range(0..2, ["1", "2"])?.render()?, "a1b2c");
	assert_eq!(abc_jig().plugn_range(1.., ["2"])?.render()?, "ab2c");

	let mismatch = abc_jig().plugn_range(0..2, ["1"]);
	assert!(matches!(
		mismatch,
		Err(JigError::GapCountMismatch {
			expected: 2,
			got: 1
		})
	));

	Ok(())
}

#[test]
fn plugn_map_adjusts_for_introduced_gaps() -> JigResult<()> {
	let plugged = abc_jig().plugn_map([
		(0, Item::from(jig![gap("p"), gap("q")])),
		(1, Item::from("Y")),
	])?;

	assert_eq!(plugged.gaps(), vec!["p", "q"]);
	assert_eq!(plugged.render()?, "abYc");
	assert_well_formed(&plugged);

	Ok(())
}

#[test]
fn plugn_map_in_any_order() -> JigResult<()> {
	let plugged = abc_jig().plugn_map([(1, "Y"), (0, "X")])?;

	assert_eq!(plugged.render()?, "aXbYc");

	Ok(())
}

#[test]
fn plugn_each_closes_trailing_gaps() -> JigResult<()> {
	let plugged = abc_jig().plugn_each(["1"])?;

	assert_eq!(plugged.render()?, "a1bc");
	assert!(plugged.is_closed());
	assert_well_formed(&plugged);

	Ok(())
}

#[test]
fn plugn_each_ignores_extra_items() -> JigResult<()> {
	let plugged = abc_jig().plugn_each(["1", "2", "3"])?;

	assert_eq!(plugged.render()?, "a1b2c");
	assert!(plugged.is_closed());

	Ok(())
}

#[test]
fn plugn_range_rejects_overflowing_bounds() {
	let result = abc_jig().plugn_range(..=usize::MAX, ["1"]);
	assert!(matches!(
		result,
		Err(JigError::InvalidGapIndex {
			index: usize::MAX,
			gaps: 2
		})
	));

	let result = abc_jig().plugn_range((Bound::Excluded(usize::MAX), Bound::Unbounded), ["1"]);
	assert!(matches!(
		result,
		Err(JigError::InvalidGapIndex {
			index: usize::MAX,
			gaps: 2
		})
	));
}

#[test]
fn in_place_variants_chain() -> JigResult<()> {
	let mut j = abc_jig();
	j.plug_in_place("x", "X").plug_in_place("y", "Y");
	assert_eq!(j.render()?, "aXbYc");

	let mut k = abc_jig();
	k.plugn_in_place(0, "0")?.close_in_place();
	assert_eq!(k.render()?, "a0bc");
	assert!(k.is_closed());

	Ok(())
}

#[test]
fn repeat_zero_is_an_error() {
	let result = abc_jig().repeat(0);

	assert!(matches!(result, Err(JigError::InvalidReplicationCount(0))));
}

#[test]
fn repeat_closed_jig() -> JigResult<()> {
	assert_eq!(jig!["ab"].repeat(2)?.render()?, "abab");
	assert_eq!(jig!["ab"].repeat(1)?, jig!["ab"]);

	Ok(())
}

#[test]
fn repeat_each_plugs_one_copy_per_item() -> JigResult<()> {
	let row = jig!["<li>", Jig::new(), "</li>"];

	assert_eq!(row.repeat_each(["a", "b", "c"]).render()?, "<li>a</li><li>b</li><li>c</li>");
	assert_eq!(row.repeat_each(Vec::<Item>::new()), Jig::null());

	Ok(())
}

#[test]
fn before_and_after_keep_the_gap_open() -> JigResult<()> {
	let j = jig!["<", gap("x"), ">"].before("x", "1").after("x", "2");

	assert_eq!(j.gaps(), vec!["x"]);
	assert_eq!(j.plug("x", "|").render()?, "<1|2>");
	assert_eq!(abc_jig().before("missing", "!"), abc_jig());

	Ok(())
}

#[test]
fn plug_at_only_listed_gaps() -> JigResult<()> {
	let j = jig![gap("a"), gap("b"), gap("c")];
	let plugged = j.plug_at(["a", "c"], |name| Some(Item::from(name.to_uppercase())));

	assert_eq!(plugged.render()?, "AC");
	assert_eq!(plugged.gaps(), vec!["b"]);

	Ok(())
}

#[test]
fn reflection() {
	let j = abc_jig();

	assert!(j.has_gap("x"));
	assert!(!j.has_gap("z"));
	assert_eq!(j.index("y"), Some(3));
	assert_eq!(j.index("z"), None);
	assert!(j.is_open());
	assert_eq!(j.positions(), 5);
}

#[test]
fn push_skips_nulls_and_flattens_lists() -> JigResult<()> {
	let j = jig!["a", None::<&str>, false, vec!["b", "c"], 'd', 1.5];

	assert_eq!(j.render()?, "abcd1.5");
	assert!(j.is_closed());

	Ok(())
}

#[test]
fn split_and_join_at_gaps() -> JigResult<()> {
	let j = abc_jig();

	assert_eq!(j.split()?, vec!["a", "b", "c"]);
	assert_eq!(j.join("-")?, "a-b-c");

	Ok(())
}

#[test]
fn structural_equality() -> JigResult<()> {
	let thunk = Item::thunk(|| "t");

	assert_eq!(jig![thunk.clone()], jig![thunk]);
	assert_ne!(jig![Item::thunk(|| "t")], jig![Item::thunk(|| "t")]);
	assert_ne!(jig!["a", "b"], jig!["ab"]);
	assert!(jig!["a", "b"].renders_like(&jig!["ab"])?);

	Ok(())
}

#[test]
fn add_operators_concatenate() -> JigResult<()> {
	let j = jig!["a"] + gap("b") + "c";
	assert_eq!(j.gaps(), vec!["b"]);

	let borrowed = &j + "d";
	assert_eq!(borrowed.render()?, "acd");
	assert_eq!(j.render()?, "ac");

	let mut k = Jig::null();
	k += "x";
	k += jig![gap("y")];
	assert_eq!(k.gaps(), vec!["y"]);

	Ok(())
}

#[test]
fn collect_and_extend() -> JigResult<()> {
	let mut j: Jig = ["a", "b"].into_iter().collect();
	j.extend([gap("c")]);

	assert_eq!(j.render()?, "ab");
	assert_eq!(j.gaps(), vec!["c"]);

	Ok(())
}

#[test]
fn inspect_jig() {
	let j = jig![
		"a",
		gap("x"),
		1,
		Gap::with_transform("t", |items| items),
		Item::thunk(|| "t")
	];

	assert_snapshot!(format!("{j:?}"), @r#"Jig["a", :x, 1, :t{}, <thunk>]"#);
	assert_snapshot!(format!("{:?}", Jig::new()), @"Jig[:___]");
}

#[traced_test]
#[test]
fn fill_logs_a_summary() {
	let _ = separator_jig().plug("separator", "/");

	assert!(logs_contain("filled gaps"));
	assert!(logs_contain("plugging gap"));
}

#[rstest]
#[case::text(serde_json::json!("hi"), "hi")]
#[case::number(serde_json::json!(3), "3")]
#[case::truthy(serde_json::json!(true), "true")]
#[case::falsy(serde_json::json!(false), "")]
#[case::null(serde_json::json!(null), "")]
#[case::list(serde_json::json!(["a", 1, ["b"]]), "a1b")]
#[case::nested(serde_json::json!({ "items": ["x", { "gap": "open" }, "y"] }), "xy")]
fn document_values_render(#[case] value: serde_json::Value, #[case] expected: &str) -> JigResult<()> {
	let item = item_from_value(value)?;

	assert_eq!(jig![item].render()?, expected);

	Ok(())
}

#[rstest]
#[case::unknown_key(serde_json::json!({ "name": "x" }))]
#[case::two_keys(serde_json::json!({ "gap": "x", "items": [] }))]
#[case::gap_not_a_string(serde_json::json!({ "gap": 1 }))]
fn document_rejects_unknown_tables(#[case] value: serde_json::Value) {
	let result = item_from_value(value);

	assert!(matches!(result, Err(JigError::InvalidGapFillShape(_))));
}

#[test]
fn jig_from_json_document() -> JigResult<()> {
	let value = serde_json::json!(["Hello, ", { "gap": "name" }, "!"]);
	let template = jig_from_value(value, "inline")?;

	assert_eq!(template.gaps(), vec!["name"]);
	assert_eq!(template.plug("name", "world").render()?, "Hello, world!");

	Ok(())
}

#[rstest]
#[case::toml("toml", "items = [\"a\", { gap = \"x\" }, 1]")]
#[case::yaml("yaml", "- a\n- gap: x\n- 1\n")]
#[case::yml("yml", "items:\n  - a\n  - gap: x\n  - 1\n")]
#[case::json("json", r#"{ "items": ["a", { "gap": "x" }, 1] }"#)]
fn parse_documents(#[case] format: &str, #[case] content: &str) -> JigResult<()> {
	let value = parse_document(content, format, "inline")?;
	let template = jig_from_value(value, "inline")?;

	assert_eq!(template.gaps(), vec!["x"]);
	assert_eq!(template.plug("x", "-").render()?, "a-1");

	Ok(())
}

#[test]
fn unsupported_document_format() {
	let result = parse_document("a = 1", "ini", "inline");

	assert!(matches!(result, Err(JigError::UnsupportedFormat(format)) if format == "ini"));
}

#[test]
fn template_document_must_hold_items() {
	let result = jig_from_value(serde_json::json!({ "name": "x" }), "page.json");

	assert!(matches!(
		result,
		Err(JigError::DocumentParse { path, .. }) if path == "page.json"
	));
}

#[test]
fn load_documents_from_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template_path = tmp.path().join("page.json");
	let values_path = tmp.path().join("values.yaml");
	std::fs::write(&template_path, r#"["<", { "gap": "a" }, "|", { "gap": "b" }, ">"]"#)?;
	std::fs::write(&values_path, "a: A\nb:\n  - 1\n  - 2\n")?;

	let template = load_jig(&template_path)?;
	let values = load_values(&values_path)?;

	assert_eq!(template.fill(&values).render()?, "<A|12>");

	Ok(())
}

#[test]
fn load_missing_document() {
	let result = load_jig(std::path::Path::new("does/not/exist.json"));

	assert!(matches!(result, Err(JigError::DocumentParse { .. })));
}

#[test]
fn config_loads_values_and_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("jig.toml"),
		"template = \"page.json\"\n\n[values]\ntitle = \"Hi\"\ncount = 3\n\n[files]\nbody = \
		 \"body.txt\"\n",
	)?;
	std::fs::write(tmp.path().join("body.txt"), "text from a file")?;

	let config = JigConfig::load(tmp.path())?.ok_or("config not found")?;
	assert_eq!(config.template, Some(PathBuf::from("page.json")));

	let values = config.load_values(tmp.path())?;
	let page = jig![gap("title"), " ", gap("count"), ": ", gap("body")];
	assert_eq!(page.fill(&values).render()?, "Hi 3: text from a file");

	Ok(())
}

#[test]
fn config_discovery_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	assert!(JigConfig::load(tmp.path())?.is_none());

	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(tmp.path().join(".config/jig.toml"), "")?;
	assert_eq!(
		JigConfig::resolve_path(tmp.path()),
		Some(tmp.path().join(".config/jig.toml"))
	);

	std::fs::write(tmp.path().join(".jig.toml"), "")?;
	assert_eq!(
		JigConfig::resolve_path(tmp.path()),
		Some(tmp.path().join(".jig.toml"))
	);

	Ok(())
}

#[test]
fn invalid_config_is_a_parse_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("jig.toml"), "[values\n")?;

	let result = JigConfig::load(tmp.path());
	assert!(matches!(result, Err(JigError::ConfigParse(_))));

	Ok(())
}
