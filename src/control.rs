//! The per-row action control as a finite-state machine.
//!
//! A reservation row starts out as [`ControlState::NeedsCheckIn`] or [`ControlState::NeedsCheckOut`] (rendered by
//! the server) and only moves on server-acknowledged transitions:
//!
//! ```text
//! NeedsCheckIn --checked_in--> NeedsCheckOut --checked_out--> Completed
//! ```
//!
//! [`next_control`] is pure. Turning its [`ControlDescriptor`] into DOM is [`crate::render`]'s job.

use crate::api::ServerStatus;
use lignin::{Attribute, Element, ElementCreationOptions, Node, ThreadBound};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
	/// The control is a check-in trigger.
	NeedsCheckIn,
	/// The control is a check-out trigger.
	NeedsCheckOut,
	/// The control is a rebook link. No further automatic reconciliation happens for this row.
	Completed,
}

/// Which lifecycle transition a trigger asks for, as carried in its `data-text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	In,
	Out,
}

impl Direction {
	#[must_use]
	pub fn parse(marker: &str) -> Option<Self> {
		match marker.trim() {
			"in" => Some(Self::In),
			"out" => Some(Self::Out),
			_ => None,
		}
	}

	#[must_use]
	pub fn marker(self) -> &'static str {
		match self {
			Self::In => "in",
			Self::Out => "out",
		}
	}

	#[must_use]
	pub fn state(self) -> ControlState {
		match self {
			Self::In => ControlState::NeedsCheckIn,
			Self::Out => ControlState::NeedsCheckOut,
		}
	}
}

/// Text and classes of the row's status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLabel {
	pub text: &'static str,
	pub class_name: &'static str,
}

pub const CHECKED_IN_LABEL: StatusLabel = StatusLabel { text: "Entrada", class_name: "mb-0 fw-normal text-success" };
pub const CHECKED_OUT_LABEL: StatusLabel = StatusLabel { text: "Saída", class_name: "mb-0 fw-normal text-danger" };

/// Everything needed to build a replacement control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlDescriptor {
	/// `<a href="#">` that triggers the status-change handler.
	CheckOut { reservation_id: String, name: String, guest_id: Option<String> },
	/// Plain navigation link to the reservation-creation view.
	Rebook { href: String, name: String, guest_id: Option<String> },
}

const CHECK_OUT_TOOLTIP: &str = "Fazer check-out";
const REBOOK_TOOLTIP: &str = "Reservar este hóspede novamente";

impl ControlDescriptor {
	/// Whether the control needs the status-change click handler.
	#[must_use]
	pub fn is_trigger(&self) -> bool {
		matches!(self, Self::CheckOut { .. })
	}

	#[must_use]
	pub fn tooltip(&self) -> &'static str {
		match self {
			Self::CheckOut { .. } => CHECK_OUT_TOOLTIP,
			Self::Rebook { .. } => REBOOK_TOOLTIP,
		}
	}

	fn icon_class(&self) -> &'static str {
		match self {
			Self::CheckOut { .. } => "ti ti-door-exit",
			Self::Rebook { .. } => "ti ti-calendar-plus",
		}
	}

	/// Attributes of the anchor element, in insertion order.
	#[must_use]
	pub fn attributes(&self) -> Vec<(&'static str, &str)> {
		let (mut attributes, guest_id) = match self {
			Self::CheckOut { reservation_id, name, guest_id } => (
				vec![
					("href", "#"),
					("class", "text-danger btn-res-1"),
					("data-id", reservation_id.as_str()),
					("data-name", name.as_str()),
					("data-text", Direction::Out.marker()),
				],
				guest_id,
			),
			Self::Rebook { href, name, guest_id } => (vec![("href", href.as_str()), ("class", "text-success"), ("data-name", name.as_str())], guest_id),
		};
		if let Some(guest_id) = guest_id {
			attributes.push(("data-guest-id", guest_id.as_str()));
		}
		attributes.extend_from_slice(&[
			("data-bs-toggle", "tooltip"),
			("data-bs-placement", "bottom"),
			("data-bs-title", self.tooltip()),
			("aria-label", self.tooltip()),
		]);
		attributes
	}

	/// Calls `f` with the control's VDOM: an `<a>` wrapping a single icon `<i>`.
	pub fn with_vdom<R>(&self, f: impl FnOnce(&Node<'_, ThreadBound>) -> R) -> R {
		let attributes: Vec<Attribute<'_>> = self.attributes().into_iter().map(|(name, value)| Attribute { name, value }).collect();
		let icon_attributes = [Attribute { name: "class", value: self.icon_class() }];
		let icon = Element {
			name: "I",
			creation_options: ElementCreationOptions::new(),
			attributes: &icon_attributes,
			content: Node::Multi(&[]),
			event_bindings: &[],
		};
		let content = [Node::HtmlElement { element: &icon, dom_binding: None }];
		let anchor = Element {
			name: "A",
			creation_options: ElementCreationOptions::new(),
			attributes: &attributes,
			content: Node::Multi(&content),
			event_bindings: &[],
		};
		f(&Node::HtmlElement { element: &anchor, dom_binding: None })
	}
}

/// Row identity the next control is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSubject<'a> {
	pub reservation_id: &'a str,
	pub name: &'a str,
	/// The guest the server named in its answer, or else the one the old control carried.
	pub guest_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	pub state: ControlState,
	pub label: StatusLabel,
	pub control: ControlDescriptor,
}

/// Computes the row's next state and control for a confirmed server status.
///
/// The server is authoritative, so `checked_out` completes the row from either trigger state. A completed row never
/// goes back to a trigger. Unknown statuses leave the row alone and yield [`None`].
#[must_use]
pub fn next_control(state: ControlState, status: &ServerStatus, subject: RowSubject<'_>, rebook_url: impl FnOnce(Option<&str>) -> String) -> Option<Transition> {
	match (state, status) {
		(_, ServerStatus::Other(_)) => None,
		(ControlState::Completed, _) | (_, ServerStatus::CheckedOut) => Some(Transition {
			state: ControlState::Completed,
			label: CHECKED_OUT_LABEL,
			control: ControlDescriptor::Rebook {
				href: rebook_url(subject.guest_id),
				name: subject.name.to_owned(),
				guest_id: subject.guest_id.map(str::to_owned),
			},
		}),
		(ControlState::NeedsCheckIn | ControlState::NeedsCheckOut, ServerStatus::CheckedIn) => Some(Transition {
			state: ControlState::NeedsCheckOut,
			label: CHECKED_IN_LABEL,
			control: ControlDescriptor::CheckOut {
				reservation_id: subject.reservation_id.to_owned(),
				name: subject.name.to_owned(),
				guest_id: subject.guest_id.map(str::to_owned),
			},
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Config;

	const SUBJECT: RowSubject<'static> = RowSubject { reservation_id: "42", name: "Maria", guest_id: Some("7") };

	fn step(state: ControlState, status: &ServerStatus) -> Option<Transition> {
		let config = Config::default();
		next_control(state, status, SUBJECT, |guest_id| config.rebook_url(guest_id))
	}

	#[test]
	fn check_in_leads_to_check_out_trigger() {
		let transition = step(ControlState::NeedsCheckIn, &ServerStatus::CheckedIn).unwrap();
		assert_eq!(transition.state, ControlState::NeedsCheckOut);
		assert_eq!(transition.label, CHECKED_IN_LABEL);
		assert_eq!(transition.control, ControlDescriptor::CheckOut { reservation_id: "42".into(), name: "Maria".into(), guest_id: Some("7".into()) });
		assert!(transition.control.attributes().contains(&("data-guest-id", "7")));
		assert!(transition.control.is_trigger());
	}

	#[test]
	fn check_out_leads_to_rebook_link() {
		let transition = step(ControlState::NeedsCheckOut, &ServerStatus::CheckedOut).unwrap();
		assert_eq!(transition.state, ControlState::Completed);
		assert_eq!(transition.label, CHECKED_OUT_LABEL);
		assert_eq!(
			transition.control,
			ControlDescriptor::Rebook { href: "/dashboard_reservations/new?guest_id=7".into(), name: "Maria".into(), guest_id: Some("7".into()) }
		);
		assert!(!transition.control.is_trigger());
	}

	#[test]
	fn completed_never_returns_to_a_trigger() {
		for status in [ServerStatus::CheckedIn, ServerStatus::CheckedOut] {
			let transition = step(ControlState::Completed, &status).unwrap();
			assert_eq!(transition.state, ControlState::Completed);
			assert!(!transition.control.is_trigger());
		}
	}

	#[test]
	fn unknown_status_leaves_the_row() {
		assert_eq!(step(ControlState::NeedsCheckOut, &ServerStatus::Other("cancelled".into())), None);
	}

	#[test]
	fn direction_markers() {
		assert_eq!(Direction::parse("in"), Some(Direction::In));
		assert_eq!(Direction::parse(" out "), Some(Direction::Out));
		assert_eq!(Direction::parse("sideways"), None);
		assert_eq!(Direction::Out.state(), ControlState::NeedsCheckOut);
	}

	#[test]
	fn check_out_vdom() {
		let control = ControlDescriptor::CheckOut { reservation_id: "42".into(), name: "Maria".into(), guest_id: None };
		control.with_vdom(|vdom| match vdom {
			Node::HtmlElement { element, .. } => {
				assert_eq!(element.name, "A");
				let get = |name: &str| element.attributes.iter().find(|attribute| attribute.name == name).map(|attribute| attribute.value);
				assert_eq!(get("href"), Some("#"));
				assert_eq!(get("class"), Some("text-danger btn-res-1"));
				assert_eq!(get("data-id"), Some("42"));
				assert_eq!(get("data-name"), Some("Maria"));
				assert_eq!(get("data-text"), Some("out"));
				assert_eq!(get("data-bs-title"), Some("Fazer check-out"));
				assert_eq!(get("aria-label"), Some("Fazer check-out"));
				match element.content {
					Node::Multi(&[Node::HtmlElement { element: icon, .. }]) => {
						assert_eq!(icon.name, "I");
						assert_eq!(icon.attributes[0].value, "ti ti-door-exit");
					}
					_ => panic!("expected a single icon"),
				}
			}
			_ => panic!("expected an element"),
		});
	}

	#[test]
	fn rebook_attributes() {
		let control = ControlDescriptor::Rebook { href: "/dashboard_reservations/new".into(), name: "Maria".into(), guest_id: None };
		let attributes = control.attributes();
		assert!(attributes.contains(&("href", "/dashboard_reservations/new")));
		assert!(attributes.contains(&("class", "text-success")));
		assert!(attributes.contains(&("aria-label", "Reservar este hóspede novamente")));
		assert!(!attributes.iter().any(|(name, _)| *name == "data-guest-id" || *name == "data-text"));
	}
}
