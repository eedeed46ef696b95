//! DOM hooks and endpoints shared by the page controllers.

use web_sys::Document;

/// Names every element id, selector and endpoint path the controllers rely on.
///
/// The [`Default`] matches the dashboard templates. Page-scoped values (the current hotel and the guest a booking
/// form was opened for) are read from the document by [`Config::from_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub check_in_id: &'static str,
	pub check_out_id: &'static str,
	pub room_select_id: &'static str,
	pub guest_select_id: &'static str,
	pub room_catalog_id: &'static str,

	/// Matches every action control that should carry the status-change click handler.
	pub action_control_selector: &'static str,
	/// Locates the status text relative to the reservation's `<tr>`.
	pub status_cell_selector: &'static str,
	pub tooltip_selector: &'static str,
	pub update_link_selector: &'static str,
	pub cancel_link_selector: &'static str,

	pub availability_endpoint: &'static str,
	pub rooms_endpoint: &'static str,
	pub update_endpoint: &'static str,
	pub rebook_endpoint: &'static str,

	pub hotel_id: Option<String>,
	pub guest_id: Option<String>,

	/// Also re-check availability when the guest selector changes.
	pub refresh_on_guest_change: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			check_in_id: "check_in",
			check_out_id: "check_out",
			room_select_id: "room_id",
			guest_select_id: "name_select2",
			room_catalog_id: "room",

			action_control_selector: ".btn-res-1",
			status_cell_selector: "td:nth-child(6) p",
			tooltip_selector: r#"[data-bs-toggle="tooltip"]"#,
			update_link_selector: ".btn-update-reservation",
			cancel_link_selector: ".btn-cancel-reservation",

			availability_endpoint: "/dashboard_reservations/check_availability",
			rooms_endpoint: "/api/get_rooms",
			update_endpoint: "/dashboard_reservations/update",
			rebook_endpoint: "/dashboard_reservations/new",

			hotel_id: None,
			guest_id: None,

			refresh_on_guest_change: false,
		}
	}
}

impl Config {
	/// Defaults plus `data-hotel-id` and `data-guest-id` from `<body>`. Empty attributes count as absent.
	#[must_use]
	pub fn from_document(document: &Document) -> Self {
		let body = document.body();
		let read = |name: &str| body.as_ref().and_then(|body| body.get_attribute(name)).filter(|value| !value.trim().is_empty());
		Self { hotel_id: read("data-hotel-id"), guest_id: read("data-guest-id"), ..Self::default() }
	}

	#[must_use]
	pub fn update_url(&self, reservation_id: &str) -> String {
		format!("{}/{}", self.update_endpoint, reservation_id)
	}

	#[must_use]
	pub fn rebook_url(&self, guest_id: Option<&str>) -> String {
		match guest_id {
			Some(guest_id) => format!("{}?guest_id={}", self.rebook_endpoint, guest_id),
			None => self.rebook_endpoint.to_owned(),
		}
	}

	#[must_use]
	pub fn availability_url(&self, check_in: &str, check_out: &str, guest_id: Option<&str>) -> String {
		let mut url = format!("{}?check_in={}&check_out={}", self.availability_endpoint, check_in, check_out);
		if let Some(guest_id) = guest_id.filter(|id| !id.is_empty()) {
			url.push_str("&guest_id=");
			url.push_str(guest_id);
		}
		url
	}

	#[must_use]
	pub fn rooms_url(&self, hotel_id: &str) -> String {
		format!("{}?hotel_id={}", self.rooms_endpoint, hotel_id)
	}
}

/// Replaces personally identifiable values in log fields unless `dangerous-logging` is enabled.
pub(crate) fn loggable(value: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		value
	} else {
		"<redacted>"
	}
}
