#![cfg(target_arch = "wasm32")]

use reservation_desk::{config::Config, Page};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Event, EventInit, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

use web_fakes_::{document, init_logging, settle, Fixture};

const ROW: &str = r##"<table><tbody><tr>
	<td>42</td><td>Maria</td><td>101</td><td>2024-05-01</td><td>2024-05-03</td>
	<td><p class="mb-0 fw-normal">Reservado</p></td>
	<td><a href="#" class="text-success btn-res-1" data-id="42" data-name="Maria" data-text="in" data-guest-id="7"><i class="ti ti-door-enter"></i></a></td>
</tr></tbody></table>"##;

/// Dispatches a cancelable click and reports whether a listener prevented its default.
fn click_is_handled(control: &HtmlElement) -> bool {
	let init = EventInit::new();
	init.set_cancelable(true);
	let click = Event::new_with_event_init_dict("click", &init).unwrap();
	!control.dispatch_event(&click).unwrap()
}

#[wasm_bindgen_test]
async fn boots_only_what_the_page_has() {
	init_logging();
	let fixture = Fixture::new(ROW);
	let control: HtmlElement = fixture.get(".btn-res-1");
	assert!(!click_is_handled(&control));

	let page = Page::boot(&document(), Config::default());
	assert!(page.availability.is_none());
	assert!(page.rooms.is_none());
	assert!(page.guard.is_none());
	assert_eq!(page.reservations.refresh_bindings(), 1);
	assert!(click_is_handled(&control));
	settle().await;

	drop(page);
	assert!(!click_is_handled(&control));
}

#[wasm_bindgen_test]
async fn booking_form_and_guards_are_picked_up() {
	init_logging();
	let _fixture = Fixture::new(
		r#"<input id="check_in"><input id="check_out"><select id="room_id"></select>
		<select id="room"></select>
		<a class="btn-cancel-reservation" href="/dashboard_reservations/cancel/42">Cancelar</a>"#,
	);

	let page = Page::boot(&document(), Config { hotel_id: Some("3".to_owned()), ..Config::default() });
	assert!(page.availability.is_some());
	assert!(page.rooms.is_some());
	assert!(page.guard.is_some());
	assert_eq!(page.reservations.refresh_bindings(), 0);
}

#[wasm_bindgen_test]
async fn shutdown_unbinds_the_booted_page() {
	init_logging();
	let fixture = Fixture::new(ROW);
	let control: HtmlElement = fixture.get(".btn-res-1");

	// The document has finished loading, so both boots install right away and the second replaces the first.
	reservation_desk::boot();
	reservation_desk::boot();
	assert!(click_is_handled(&control));
	settle().await;

	reservation_desk::shutdown();
	assert!(!click_is_handled(&control));

	// Idempotent.
	reservation_desk::shutdown();
}
