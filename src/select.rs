use tracing::trace;
use wasm_bindgen::JsValue;
use web_sys::{HtmlOptionElement, HtmlSelectElement};

/// Rebuilds `select` as one selected, empty-valued placeholder followed by `options` (`(value, label)`) in order.
pub(crate) fn replace_options(select: &HtmlSelectElement, placeholder: &str, options: impl IntoIterator<Item = (String, String)>) -> Result<usize, JsValue> {
	select.set_length(0);
	let placeholder = HtmlOptionElement::new_with_text_and_value_and_default_selected_and_selected(placeholder, "", true, true)?;
	select.append_child(&placeholder)?;

	let mut count = 0;
	for (value, label) in options {
		let option = HtmlOptionElement::new_with_text_and_value(&label, &value)?;
		select.append_child(&option)?;
		count += 1;
	}
	trace!("Replaced options of #{}: {} plus placeholder.", select.id(), count);
	Ok(count)
}
