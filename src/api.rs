//! Backend payloads and the HTTP seam.
//!
//! Bodies are decoded here, so controllers only ever see typed values.

use core::{fmt, future::Future};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{instrument, trace};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("no `window` to fetch from")]
	NoWindow,
	#[error("request was rejected: {0}")]
	Rejected(String),
	#[error("server answered with HTTP {0}")]
	Status(u16),
	#[error("response body is not text")]
	NotText,
	#[error("response body could not be decoded: {0}")]
	Decode(#[from] serde_json::Error),
}

impl FetchError {
	pub(crate) fn rejected(error: &JsValue) -> Self {
		Self::Rejected(format!("{:?}", error))
	}
}

/// Issues requests against the dashboard backend and yields the response body.
pub trait Transport {
	/// An idempotent read.
	fn get(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;

	/// A state-changing request, marked with `X-Requested-With: XMLHttpRequest` so the backend answers with JSON
	/// instead of a redirect.
	fn post_ajax(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// [`Transport`] over the window's `fetch`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fetch;

impl Fetch {
	async fn send(request: &Request) -> Result<String, FetchError> {
		let window = web_sys::window().ok_or(FetchError::NoWindow)?;
		let response: Response = JsFuture::from(window.fetch_with_request(request))
			.await
			.map_err(|error| FetchError::rejected(&error))?
			.dyn_into()
			.map_err(|error| FetchError::rejected(&error))?;
		if !response.ok() {
			return Err(FetchError::Status(response.status()));
		}
		let text = response.text().map_err(|error| FetchError::rejected(&error))?;
		let text = JsFuture::from(text).await.map_err(|error| FetchError::rejected(&error))?;
		trace!("Received {} byte(s).", text.as_string().map_or(0, |text| text.len()));
		text.as_string().ok_or(FetchError::NotText)
	}
}

impl Transport for Fetch {
	#[instrument]
	async fn get(&self, url: &str) -> Result<String, FetchError> {
		let request = Request::new_with_str(url).map_err(|error| FetchError::rejected(&error))?;
		Self::send(&request).await
	}

	#[instrument]
	async fn post_ajax(&self, url: &str) -> Result<String, FetchError> {
		let init = RequestInit::new();
		init.set_method("POST");
		let request = Request::new_with_str_and_init(url, &init).map_err(|error| FetchError::rejected(&error))?;
		request.headers().set("X-Requested-With", "XMLHttpRequest").map_err(|error| FetchError::rejected(&error))?;
		Self::send(&request).await
	}
}

/// An id the backend may serialize as either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for Identifier {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for Identifier {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Text(String),
			Integer(i64),
		}

		Ok(Self(match Raw::deserialize(deserializer)? {
			Raw::Text(text) => text,
			Raw::Integer(integer) => integer.to_string(),
		}))
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Room {
	pub id: Identifier,
	pub room_number: Identifier,
	/// The backend's capacity and price columns are nullable.
	#[serde(default)]
	pub capacity_adults: Option<u32>,
	#[serde(default)]
	pub capacity_children: Option<u32>,
	#[serde(default)]
	pub price: Option<f64>,
}

impl Room {
	/// Missing capacities count as zero.
	#[must_use]
	pub fn adults(&self) -> u32 {
		self.capacity_adults.unwrap_or(0)
	}

	#[must_use]
	pub fn children(&self) -> u32 {
		self.capacity_children.unwrap_or(0)
	}

	/// Per-night price. A missing price counts as zero, in the label and in the stay total.
	#[must_use]
	pub fn nightly_price(&self) -> f64 {
		self.price.unwrap_or(0.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvailableGuest {
	pub cpf: String,
	pub name: String,
}

/// Answer of the availability endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AvailabilityReport {
	#[serde(default)]
	pub guest_conflict: bool,
	#[serde(default)]
	pub available_rooms: Vec<Room>,
	#[serde(default)]
	pub available_guests: Vec<AvailableGuest>,
}

impl AvailabilityReport {
	pub fn decode(body: &str) -> Result<Self, FetchError> {
		Ok(serde_json::from_str(body)?)
	}
}

pub fn decode_rooms(body: &str) -> Result<Vec<Room>, FetchError> {
	Ok(serde_json::from_str(body)?)
}

/// Reservation status confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
	CheckedIn,
	CheckedOut,
	/// Any other truthy status. Reported as a success, but the row stays as it is.
	Other(String),
}

/// Answer of the update endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
	Success { status: ServerStatus, message: String, guest: Option<Identifier> },
	Failure { message: String },
}

#[derive(Deserialize)]
struct RawStatusUpdate {
	#[serde(default)]
	status: Value,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	guest: Option<Identifier>,
}

fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().map_or(true, |number| number != 0.0 && !number.is_nan()),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

impl StatusUpdate {
	pub fn decode(body: &str) -> Result<Self, FetchError> {
		let raw: RawStatusUpdate = serde_json::from_str(body)?;
		let message = raw.message.unwrap_or_default();
		if !truthy(&raw.status) {
			return Ok(Self::Failure { message });
		}

		let status = match raw.status {
			Value::String(status) if status == "checked_in" => ServerStatus::CheckedIn,
			Value::String(status) if status == "checked_out" => ServerStatus::CheckedOut,
			Value::String(status) => ServerStatus::Other(status),
			other => ServerStatus::Other(other.to_string()),
		};
		Ok(Self::Success { status, message, guest: raw.guest })
	}

	#[must_use]
	pub fn message(&self) -> &str {
		match self {
			Self::Success { message, .. } | Self::Failure { message } => message,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn checked_out_with_numeric_guest() {
		assert_eq!(
			StatusUpdate::decode(r#"{"status":"checked_out","message":"OK","guest":7}"#).unwrap(),
			StatusUpdate::Success { status: ServerStatus::CheckedOut, message: "OK".into(), guest: Some(Identifier::from("7")) }
		);
	}

	#[test]
	fn falsy_status_is_a_failure() {
		for body in [
			r#"{"status":false,"message":"Reserva não encontrada"}"#,
			r#"{"status":"","message":"Reserva não encontrada"}"#,
			r#"{"status":null,"message":"Reserva não encontrada"}"#,
			r#"{"message":"Reserva não encontrada"}"#,
		] {
			assert_eq!(StatusUpdate::decode(body).unwrap(), StatusUpdate::Failure { message: "Reserva não encontrada".into() }, "{}", body);
		}
	}

	#[test]
	fn unknown_truthy_status() {
		assert_eq!(
			StatusUpdate::decode(r#"{"status":"cancelled","message":"OK"}"#).unwrap(),
			StatusUpdate::Success { status: ServerStatus::Other("cancelled".into()), message: "OK".into(), guest: None }
		);
	}

	#[test]
	fn non_json_is_a_decode_error() {
		assert!(matches!(StatusUpdate::decode("<html></html>"), Err(FetchError::Decode(_))));
	}

	#[test]
	fn availability_without_guests() {
		let report = AvailabilityReport::decode(
			r#"{"guest_conflict":false,"available_rooms":[{"id":1,"room_number":"101","capacity_adults":2,"capacity_children":0,"price":150.0}]}"#,
		)
		.unwrap();
		assert!(!report.guest_conflict);
		assert_eq!(report.available_rooms.len(), 1);
		assert_eq!(report.available_rooms[0].id.as_str(), "1");
		assert_eq!(report.available_rooms[0].room_number.as_str(), "101");
		assert!(report.available_guests.is_empty());
	}

	#[test]
	fn room_list() {
		let rooms = decode_rooms(r#"[{"id":"a","room_number":12,"capacity_adults":1,"capacity_children":2,"price":80}]"#).unwrap();
		assert_eq!(rooms[0].room_number.as_str(), "12");
		assert!((rooms[0].nightly_price() - 80.0).abs() < f64::EPSILON);
	}

	#[test]
	fn nullable_room_columns() {
		let report = AvailabilityReport::decode(
			r#"{"guest_conflict":false,"available_rooms":[
				{"id":1,"room_number":"101","capacity_adults":2,"capacity_children":null,"price":150.0},
				{"id":2,"room_number":"102","capacity_adults":null,"price":null}
			]}"#,
		)
		.unwrap();
		assert_eq!(report.available_rooms.len(), 2);
		let (first, second) = (&report.available_rooms[0], &report.available_rooms[1]);
		assert_eq!((first.adults(), first.children()), (2, 0));
		assert_eq!(first.price, Some(150.0));
		assert_eq!((second.capacity_adults, second.capacity_children, second.price), (None, None, None));
		assert!(second.nightly_price().abs() < f64::EPSILON);
	}
}
