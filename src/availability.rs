//! Room and guest availability for the booking form's date range.

use crate::{
	api::{AvailabilityReport, FetchError, Transport},
	config::Config,
	dialog::{DialogRequest, Dialogs, Severity},
	format::{guest_option_label, plan_stay, room_option_label, StayPlan},
	select::replace_options,
};
use js_sys::Function;
use std::rc::{Rc, Weak};
use tracing::{error, info, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, EventTarget, HtmlInputElement, HtmlSelectElement};

const CHANGE: &str = "change";
const REVERSED_NOTICE_MS: u32 = 2000;
const CONFLICT_NOTICE_MS: u32 = 1500;

pub const ROOM_PLACEHOLDER: &str = "Pesquise e selecione o quarto";
pub const GUEST_PLACEHOLDER: &str = "Pesquise e selecione o hóspede";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityOutcome {
	/// A date is missing. Nothing happened.
	Incomplete,
	/// Check-in was after check-out. Both dates were cleared and nothing was sent.
	Reversed,
	/// The guest already has a reservation in the range. Both dates were cleared, the selects still refreshed.
	Conflict,
	Refreshed { rooms: usize },
	/// The lookup failed. The selects keep their previous options.
	Failed,
}

struct Inner<D, T> {
	check_in: HtmlInputElement,
	check_out: HtmlInputElement,
	room_select: HtmlSelectElement,
	guest_select: Option<HtmlSelectElement>,
	config: Config,
	dialogs: D,
	transport: T,
	on_change: Closure<dyn Fn(Event)>,
}

/// Keeps the booking form's room (and, if present, guest) select in sync with its check-in and check-out fields.
pub struct AvailabilityForm<D, T> {
	inner: Rc<Inner<D, T>>,
}

fn element_by_id<E: JsCast>(document: &Document, id: &str) -> Option<E> {
	document.get_element_by_id(id).and_then(|element| match element.dyn_into::<E>() {
		Ok(element) => Some(element),
		Err(element) => {
			warn!("#{} is not the expected kind of element: {:?}", id, element);
			None
		}
	})
}

impl<D: Dialogs + 'static, T: Transport + 'static> AvailabilityForm<D, T> {
	/// [`None`] unless the page has both date fields and the room select.
	pub fn new(document: &Document, config: Config, dialogs: D, transport: T) -> Option<Self> {
		let check_in = element_by_id::<HtmlInputElement>(document, config.check_in_id)?;
		let check_out = element_by_id::<HtmlInputElement>(document, config.check_out_id)?;
		let room_select = element_by_id::<HtmlSelectElement>(document, config.room_select_id)?;
		let guest_select = element_by_id::<HtmlSelectElement>(document, config.guest_select_id);

		let inner = Rc::new_cyclic(|weak: &Weak<Inner<D, T>>| {
			let weak = weak.clone();
			Inner {
				check_in,
				check_out,
				room_select,
				guest_select,
				config,
				dialogs,
				transport,
				on_change: Closure::wrap(Box::new(move |_: Event| {
					if let Some(inner) = weak.upgrade() {
						spawn_local(async move {
							let outcome = inner.update_availability().await;
							trace!(?outcome, "Availability updated.");
						});
					}
				}) as Box<dyn Fn(Event)>),
			}
		});

		for target in inner.listened_targets() {
			if let Err(error) = target.add_event_listener_with_callback(CHANGE, inner.callback()) {
				error!("Failed to add change listener: {:?}", error);
			}
		}

		Some(Self { inner })
	}

	/// Validates the range, queries the backend and repopulates the selects.
	pub async fn update_availability(&self) -> AvailabilityOutcome {
		self.inner.update_availability().await
	}
}

impl<D: Dialogs, T: Transport> Inner<D, T> {
	fn clear_dates(&self) {
		self.check_in.set_value("");
		self.check_out.set_value("");
	}

	fn guest_id(&self) -> Option<String> {
		self.guest_select.as_ref().map(HtmlSelectElement::value).filter(|value| !value.is_empty()).or_else(|| self.config.guest_id.clone())
	}

	async fn fetch(&self, url: &str) -> Result<AvailabilityReport, FetchError> {
		AvailabilityReport::decode(&self.transport.get(url).await?)
	}

	#[instrument(skip(self))]
	async fn update_availability(&self) -> AvailabilityOutcome {
		let (check_in, check_out) = (self.check_in.value(), self.check_out.value());
		let nights = match plan_stay(&check_in, &check_out) {
			StayPlan::Incomplete => return AvailabilityOutcome::Incomplete,
			StayPlan::Reversed => {
				self.clear_dates();
				self.dialogs.show_dialog(DialogRequest::notice("Opa...", "O check-out deve ser posterior ao check-in", Severity::Error, REVERSED_NOTICE_MS)).await;
				return AvailabilityOutcome::Reversed;
			}
			StayPlan::Query { nights } => nights,
		};

		let url = self.config.availability_url(&check_in, &check_out, self.guest_id().as_deref());
		let report = match self.fetch(&url).await {
			Ok(report) => report,
			Err(error) => {
				error!("Failed to check availability: {}", error);
				return AvailabilityOutcome::Failed;
			}
		};

		if report.guest_conflict {
			self.clear_dates();
		}

		let rooms = match replace_options(
			&self.room_select,
			ROOM_PLACEHOLDER,
			report.available_rooms.iter().map(|room| (room.id.to_string(), room_option_label(room, nights))),
		) {
			Ok(rooms) => rooms,
			Err(error) => {
				error!("Failed to fill the room select: {:?}", error);
				0
			}
		};
		if let Some(guest_select) = &self.guest_select {
			if let Err(error) = replace_options(guest_select, GUEST_PLACEHOLDER, report.available_guests.iter().map(|guest| (guest.cpf.clone(), guest_option_label(guest)))) {
				error!("Failed to fill the guest select: {:?}", error);
			}
		}
		info!(nights, rooms, guests = report.available_guests.len(), conflict = report.guest_conflict, "Availability applied.");

		if report.guest_conflict {
			self.dialogs.show_dialog(DialogRequest::notice("Opa...", "Esse hóspede tem uma reserva ativa nesse período!", Severity::Error, CONFLICT_NOTICE_MS)).await;
			return AvailabilityOutcome::Conflict;
		}
		AvailabilityOutcome::Refreshed { rooms }
	}
}

impl<D, T> Inner<D, T> {
	fn callback(&self) -> &Function {
		self.on_change.as_ref().unchecked_ref()
	}

	fn listened_targets(&self) -> Vec<&EventTarget> {
		let (check_in, check_out): (&EventTarget, &EventTarget) = (&self.check_in, &self.check_out);
		let mut targets = vec![check_in, check_out];
		if self.config.refresh_on_guest_change {
			if let Some(guest_select) = &self.guest_select {
				targets.push(guest_select);
			}
		}
		targets
	}
}

impl<D, T> Drop for Inner<D, T> {
	fn drop(&mut self) {
		for target in self.listened_targets() {
			if let Err(error) = target.remove_event_listener_with_callback(CHANGE, self.callback()) {
				warn!("Failed to remove change listener: {:?}", error);
			}
		}
	}
}
