//! Check-in/check-out handling for the reservations table.
//!
//! Clicking an action control asks for confirmation, posts the status change and, once the server acknowledges it,
//! rewrites the row in place: the status cell gets its new label and the control is swapped for the one
//! [`next_control`] describes.

use crate::{
	api::{FetchError, ServerStatus, StatusUpdate, Transport},
	config::{loggable, Config},
	control::{next_control, ControlState, Direction, RowSubject},
	dialog::{DialogRequest, Dialogs, Severity, DEFAULT_DISMISS_DELAY_MS},
	render::{self, RenderError},
	tooltip,
};
use js_sys::Function;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{error, info, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement};

const CLICK: &str = "click";
const CONTROL_DEPTH_LIMIT: usize = 4;

#[derive(Debug, Error)]
pub enum ControlError {
	#[error("action control has no {0} attribute")]
	MissingData(&'static str),
	#[error("action control has an unknown direction marker {0:?}")]
	UnknownDirection(String),
	#[error("action control is not inside a table row")]
	NoRow,
	#[error("DOM operation failed: {0}")]
	Dom(String),
	#[error(transparent)]
	Render(#[from] RenderError),
}

impl ControlError {
	fn dom(error: &JsValue) -> Self {
		Self::Dom(format!("{:?}", error))
	}
}

/// What a click on an action control ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
	/// The control lacked the data needed to act on it.
	Malformed,
	/// The user cancelled the confirmation. Nothing was sent.
	Declined,
	/// The server refused the change. The row is unchanged.
	Rejected,
	/// The request failed or the answer was unreadable. The row is unchanged.
	TransportFailed,
	/// The server applied the change. Holds the row's new state, or [`None`] if the row could not be updated.
	Applied(Option<ControlState>),
}

/// Data-attributes of a clicked trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingAction {
	reservation_id: String,
	name: String,
	direction: Direction,
	guest_id: Option<String>,
}

impl PendingAction {
	fn read(control: &Element) -> Result<Self, ControlError> {
		let data = |name: &'static str| control.get_attribute(name).ok_or(ControlError::MissingData(name));
		let marker = data("data-text")?;
		Ok(Self {
			reservation_id: data("data-id")?,
			name: data("data-name")?,
			direction: Direction::parse(&marker).ok_or(ControlError::UnknownDirection(marker))?,
			guest_id: control.get_attribute("data-guest-id").filter(|id| !id.is_empty()),
		})
	}

	fn confirmation(&self) -> DialogRequest {
		let marker = self.direction.marker();
		DialogRequest::confirm(format!("Confirmar check-{} de {}?", marker, self.name), format!("Não há como desfazer o check-{}.", marker), Severity::Warning)
	}
}

struct Inner<D, T> {
	document: Document,
	config: Config,
	dialogs: D,
	transport: T,
	on_click: Closure<dyn Fn(Event)>,
}

/// Owns the click handler shared by every action control of the page's reservations table.
///
/// The same handler reference is used for all controls, so [`ReservationTable::refresh_bindings`] can remove and
/// re-add it without ever stacking listeners. Dropping the table (once no request is in flight) unbinds it.
pub struct ReservationTable<D, T> {
	inner: Rc<Inner<D, T>>,
}

impl<D: Dialogs + 'static, T: Transport + 'static> ReservationTable<D, T> {
	/// Binds every control currently matching [`Config::action_control_selector`].
	pub fn new(document: Document, config: Config, dialogs: D, transport: T) -> Self {
		let inner = Rc::new_cyclic(|weak: &Weak<Inner<D, T>>| {
			let weak = weak.clone();
			Inner {
				document,
				config,
				dialogs,
				transport,
				on_click: Closure::wrap(Box::new(move |event: Event| {
					// Never follow the control's href.
					event.prevent_default();

					let inner = match weak.upgrade() {
						Some(inner) => inner,
						None => return warn!("Click on an action control after its table was dropped."),
					};
					let control = match event.current_target().and_then(|target| target.dyn_into::<HtmlElement>().ok()) {
						Some(control) => control,
						None => return error!("Click event without an element as its current target."),
					};
					spawn_local(async move {
						let outcome = inner.handle_status_change_request(&control).await;
						trace!(?outcome, "Status change request handled.");
					});
				}) as Box<dyn Fn(Event)>),
			}
		});
		let table = Self { inner };
		table.refresh_bindings();
		table
	}

	/// Detaches and re-attaches the click handler on every current action control. Returns how many are bound.
	pub fn refresh_bindings(&self) -> usize {
		self.inner.refresh_bindings()
	}

	/// Runs the full confirm, post and reconcile sequence for one clicked control.
	pub async fn handle_status_change_request(&self, control: &HtmlElement) -> RowOutcome {
		self.inner.handle_status_change_request(control).await
	}
}

impl<D, T> Inner<D, T> {
	fn handler(&self) -> &Function {
		self.on_click.as_ref().unchecked_ref()
	}

	fn action_controls(&self) -> Vec<EventTarget> {
		match self.document.query_selector_all(self.config.action_control_selector) {
			Ok(controls) => (0..controls.length()).filter_map(|i| controls.get(i)).map(Into::into).collect(),
			Err(error) => {
				error!("Invalid action control selector {:?}: {:?}", self.config.action_control_selector, error);
				Vec::new()
			}
		}
	}

	fn bind(&self, control: &EventTarget) {
		if let Err(error) = control.add_event_listener_with_callback(CLICK, self.handler()) {
			error!("Failed to add click listener: {:?}", error);
		}
	}

	fn unbind(&self, control: &EventTarget) {
		if let Err(error) = control.remove_event_listener_with_callback(CLICK, self.handler()) {
			error!("Failed to remove click listener: {:?}", error);
		}
	}

	fn refresh_bindings(&self) -> usize {
		let controls = self.action_controls();
		for control in &controls {
			self.unbind(control);
			self.bind(control);
		}
		info!("Bound {} action control(s).", controls.len());
		controls.len()
	}
}

impl<D: Dialogs, T: Transport> Inner<D, T> {
	#[instrument(skip(self, control))]
	async fn handle_status_change_request(&self, control: &HtmlElement) -> RowOutcome {
		let action = match PendingAction::read(control) {
			Ok(action) => action,
			Err(error) => {
				error!("Ignoring click: {}", error);
				return RowOutcome::Malformed;
			}
		};
		info!(reservation = %action.reservation_id, name = loggable(&action.name), direction = ?action.direction, "Status change requested.");

		if !self.dialogs.show_dialog(action.confirmation()).await.confirmed {
			trace!("Declined.");
			return RowOutcome::Declined;
		}

		let update = match self.post_update(&action.reservation_id).await {
			Ok(update) => update,
			Err(error) => {
				error!("Status update for reservation {} failed: {}", action.reservation_id, error);
				self.dialogs.show_dialog(DialogRequest::acknowledge("Erro", "Não foi possível atualizar a reserva.", Severity::Error)).await;
				return RowOutcome::TransportFailed;
			}
		};

		match update {
			StatusUpdate::Failure { message } => {
				warn!("Status update for reservation {} was refused.", action.reservation_id);
				self.dialogs.show_dialog(DialogRequest::notice("Erro", message, Severity::Error, DEFAULT_DISMISS_DELAY_MS)).await;
				RowOutcome::Rejected
			}
			StatusUpdate::Success { status, message, guest } => {
				let state = match self.reconcile(control, &action, &status, guest.as_ref().map(|guest| guest.as_str())) {
					Ok(state) => state,
					Err(error) => {
						error!("Reservation {} changed but its row could not be updated: {}", action.reservation_id, error);
						None
					}
				};
				self.refresh_bindings();
				self.dialogs.show_dialog(DialogRequest::notice("Sucesso", message, Severity::Success, DEFAULT_DISMISS_DELAY_MS)).await;
				RowOutcome::Applied(state)
			}
		}
	}

	async fn post_update(&self, reservation_id: &str) -> Result<StatusUpdate, FetchError> {
		let body = self.transport.post_ajax(&self.config.update_url(reservation_id)).await?;
		StatusUpdate::decode(&body)
	}

	/// Applies a confirmed status to the control's row. [`None`] if the status has no row representation.
	fn reconcile(&self, control: &HtmlElement, action: &PendingAction, status: &ServerStatus, guest: Option<&str>) -> Result<Option<ControlState>, ControlError> {
		let subject = RowSubject { reservation_id: &action.reservation_id, name: &action.name, guest_id: guest.or(action.guest_id.as_deref()) };
		let transition = match next_control(action.direction.state(), status, subject, |guest_id| self.config.rebook_url(guest_id)) {
			Some(transition) => transition,
			None => {
				warn!("No row representation for status {:?}; Leaving the row as is.", status);
				return Ok(None);
			}
		};

		let row = control.closest("tr").map_err(|error| ControlError::dom(&error))?.ok_or(ControlError::NoRow)?;
		match row.query_selector(self.config.status_cell_selector).map_err(|error| ControlError::dom(&error))? {
			Some(status_cell) => {
				status_cell.set_text_content(Some(transition.label.text));
				status_cell.set_class_name(transition.label.class_name);
			}
			None => warn!("Row of reservation {} has no status cell.", action.reservation_id),
		}

		let replacement = transition.control.with_vdom(|vdom| render::create_element(&self.document, vdom, CONTROL_DEPTH_LIMIT))?;

		// The old control leaves the DOM with its listener removed, so it can't fire again wherever it ends up.
		self.unbind(control);
		control.replace_with_with_node_1(&replacement).map_err(|error| ControlError::dom(&error))?;
		tooltip::attach(&replacement);
		if transition.control.is_trigger() {
			self.bind(&replacement);
		}

		info!(reservation = %action.reservation_id, state = ?transition.state, "Row reconciled.");
		Ok(Some(transition.state))
	}
}

impl<D, T> Drop for Inner<D, T> {
	fn drop(&mut self) {
		for control in self.action_controls() {
			self.unbind(&control);
		}
		trace!("Unbound action controls.");
	}
}
