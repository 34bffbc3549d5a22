use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::Gap;
use crate::Item;
use crate::Jig;
use crate::gap;
use crate::jig;

/// `"a" :x "b" :y "c"`
pub fn abc_jig() -> Jig {
	jig!["a", gap("x"), "b", gap("y"), "c"]
}

pub fn separator_jig() -> Jig {
	jig!["first", gap("separator"), "middle", gap("separator"), "after"]
}

pub fn item_list_jig() -> Jig {
	jig![gap("item"), ",", gap("item"), ",", gap("item")]
}

/// A gap that upper-cases any text plugged into it.
pub fn shouting_gap(name: &str) -> Gap {
	Gap::with_transform(name, |items: Vec<Item>| {
		items
			.into_iter()
			.map(|item| {
				match item {
					Item::Text(text) => Item::Text(text.to_uppercase()),
					other => other,
				}
			})
			.collect()
	})
}

/// A thunk rendering the current value of the returned counter.
pub fn counter_thunk() -> (Arc<AtomicUsize>, Item) {
	let counter = Arc::new(AtomicUsize::new(0));
	let captured = Arc::clone(&counter);
	let thunk = Item::thunk(move || captured.load(Ordering::SeqCst));

	(counter, thunk)
}

/// Every reachable jig keeps exactly one more cell than it has gaps.
pub fn assert_well_formed(jig: &Jig) {
	assert_eq!(
		jig.cells().len(),
		jig.raw_gaps().len() + 1,
		"malformed jig: {jig:?}"
	);
}
