//! One-per-page-load wiring of the controllers.

use crate::{
	api::Fetch,
	availability::AvailabilityForm,
	config::Config,
	dialog::SweetAlert,
	guard::{NavigationGuard, WindowLocation},
	reconciler::ReservationTable,
	rooms::RoomCatalog,
	tooltip,
};
use core::cell::RefCell;
use tracing::{info, instrument, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Document;

thread_local! {
	static PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

/// The controllers whose DOM hooks exist on the current page.
pub struct Page {
	pub reservations: ReservationTable<SweetAlert, Fetch>,
	pub availability: Option<AvailabilityForm<SweetAlert, Fetch>>,
	pub rooms: Option<RoomCatalog<Fetch>>,
	pub guard: Option<NavigationGuard<SweetAlert, WindowLocation>>,
}

impl Page {
	#[must_use]
	#[instrument(skip(config))]
	pub fn boot(document: &Document, config: Config) -> Self {
		let tooltips = tooltip::attach_all(document, config.tooltip_selector);
		let page = Self {
			guard: NavigationGuard::new(document, &config, SweetAlert, WindowLocation),
			availability: AvailabilityForm::new(document, config.clone(), SweetAlert, Fetch),
			rooms: RoomCatalog::new(document, config.clone(), Fetch),
			reservations: ReservationTable::new(document.clone(), config, SweetAlert, Fetch),
		};
		info!(
			tooltips,
			availability = page.availability.is_some(),
			rooms = page.rooms.is_some(),
			guard = page.guard.is_some(),
			"Page booted."
		);
		page
	}
}

fn install(document: &Document) {
	let page = Page::boot(document, Config::from_document(document));
	PAGE.with(|slot| {
		if slot.borrow_mut().replace(page).is_some() {
			warn!("Page booted more than once; Replaced the previous controllers.");
		}
	});
}

/// Installs the console log subscriber and boots the current document, deferring to `DOMContentLoaded` while it is
/// still loading.
pub fn boot() {
	// Fails only if a subscriber is already installed, which is fine.
	let _ = tracing_wasm::try_set_as_global_default();

	let document = match web_sys::window().and_then(|window| window.document()) {
		Some(document) => document,
		None => return warn!("No document to boot."),
	};

	if document.ready_state() != "loading" {
		return install(&document);
	}

	let listener = Closure::once_into_js({
		let document = document.clone();
		move || install(&document)
	});
	if let Err(error) = document.add_event_listener_with_callback("DOMContentLoaded", listener.unchecked_ref()) {
		warn!("Failed to wait for `DOMContentLoaded`: {:?}; Booting now.", error);
		install(&document);
	}
}

/// Drops the booted controllers, unbinding their listeners.
pub fn shutdown() {
	let page = PAGE.with(|slot| slot.borrow_mut().take());
	drop(page);
}
