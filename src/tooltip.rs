use tracing::{trace, warn};
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Document, Element};

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(js_namespace = bootstrap)]
	type Tooltip;

	#[wasm_bindgen(catch, constructor, js_namespace = bootstrap)]
	fn new(element: &Element) -> Result<Tooltip, JsValue>;
}

/// Initializes Bootstrap's tooltip behaviour on `element`.
pub fn attach(element: &Element) -> bool {
	match Tooltip::new(element) {
		Ok(_) => true,
		Err(error) => {
			warn!("Failed to initialize tooltip (is Bootstrap loaded?): {:?}", error);
			false
		}
	}
}

/// Initializes tooltips on every element matching `selector` and returns how many succeeded.
pub fn attach_all(document: &Document, selector: &str) -> usize {
	let elements = match document.query_selector_all(selector) {
		Ok(elements) => elements,
		Err(error) => {
			warn!("Invalid tooltip selector {:?}: {:?}", selector, error);
			return 0;
		}
	};
	let attached = (0..elements.length()).filter_map(|i| elements.get(i)).filter_map(|node| node.dyn_into::<Element>().ok()).filter(attach).count();
	trace!("Initialized {} tooltip(s).", attached);
	attached
}
