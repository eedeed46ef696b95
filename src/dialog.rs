//! Confirmation dialogs and transient notifications.
//!
//! Exactly one dialog is visible at a time. There is no queue: a second [`Dialogs::show_dialog`] replaces whatever
//! is on screen.

use core::{cell::Cell, future::Future};
use js_sys::{Object, Promise, Reflect, JSON};
use serde::Serialize;
use std::rc::Rc;
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

pub const DEFAULT_DISMISS_DELAY_MS: u32 = 1000;
const COUNTDOWN_REFRESH_MS: i32 = 100;

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(catch, js_namespace = Swal, js_name = fire)]
	fn swal_fire(options: &JsValue) -> Result<Promise, JsValue>;

	#[wasm_bindgen(catch, js_namespace = Swal, js_name = showLoading)]
	fn swal_show_loading() -> Result<(), JsValue>;

	#[wasm_bindgen(catch, js_namespace = Swal, js_name = getPopup)]
	fn swal_get_popup() -> Result<Option<web_sys::HtmlElement>, JsValue>;

	#[wasm_bindgen(catch, js_namespace = Swal, js_name = getTimerLeft)]
	fn swal_get_timer_left() -> Result<Option<f64>, JsValue>;
}

/// Selects the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Success,
	Error,
	Warning,
	Info,
	Question,
}

/// How a dialog ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
	/// Confirm and cancel actions. Only an explicit confirm counts.
	Confirm { confirm_label: &'static str, cancel_label: &'static str },
	/// A single acknowledgement button.
	Acknowledge,
	/// Non-interactive, closes by itself after the delay and shows a countdown meanwhile.
	Auto { delay_ms: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
	pub title: String,
	pub body: String,
	pub severity: Severity,
	pub dismissal: Dismissal,
}

impl DialogRequest {
	/// Asks for consent with "Confirmar"/"Não".
	pub fn confirm(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
		Self { title: title.into(), body: body.into(), severity, dismissal: Dismissal::Confirm { confirm_label: "Confirmar", cancel_label: "Não" } }
	}

	/// Reports an outcome and closes after `delay_ms`.
	pub fn notice(title: impl Into<String>, body: impl Into<String>, severity: Severity, delay_ms: u32) -> Self {
		Self { title: title.into(), body: body.into(), severity, dismissal: Dismissal::Auto { delay_ms } }
	}

	pub fn acknowledge(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
		Self { title: title.into(), body: body.into(), severity, dismissal: Dismissal::Acknowledge }
	}

	#[must_use]
	pub fn with_confirm_label(mut self, label: &'static str) -> Self {
		if let Dismissal::Confirm { confirm_label, .. } = &mut self.dismissal {
			*confirm_label = label;
		}
		self
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogResult {
	pub confirmed: bool,
}

pub trait Dialogs {
	/// Resolves once the dialog closes. Auto-dismissed notices never resolve as confirmed.
	fn show_dialog(&self, request: DialogRequest) -> impl Future<Output = DialogResult>;
}

/// Plain-data part of the SweetAlert2 options. Callbacks are attached separately.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SwalOptions<'a> {
	title: &'a str,
	text: &'a str,
	icon: Severity,
	#[serde(skip_serializing_if = "Option::is_none")]
	timer: Option<u32>,
	#[serde(skip_serializing_if = "core::ops::Not::not")]
	timer_progress_bar: bool,
	#[serde(skip_serializing_if = "core::ops::Not::not")]
	show_cancel_button: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	confirm_button_color: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	cancel_button_color: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	confirm_button_text: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	cancel_button_text: Option<&'static str>,
}

impl<'a> SwalOptions<'a> {
	fn new(request: &'a DialogRequest) -> Self {
		let mut options = Self {
			title: &request.title,
			text: &request.body,
			icon: request.severity,
			timer: None,
			timer_progress_bar: false,
			show_cancel_button: false,
			confirm_button_color: None,
			cancel_button_color: None,
			confirm_button_text: None,
			cancel_button_text: None,
		};
		match request.dismissal {
			Dismissal::Confirm { confirm_label, cancel_label } => {
				options.show_cancel_button = true;
				options.confirm_button_color = Some("#3085d6");
				options.cancel_button_color = Some("#d33");
				options.confirm_button_text = Some(confirm_label);
				options.cancel_button_text = Some(cancel_label);
			}
			Dismissal::Acknowledge => (),
			Dismissal::Auto { delay_ms } => {
				options.timer = Some(delay_ms);
				options.timer_progress_bar = true;
			}
		}
		options
	}
}

/// [`Dialogs`] backed by the page's global `Swal` (SweetAlert2).
#[derive(Debug, Default, Clone, Copy)]
pub struct SweetAlert;

impl SweetAlert {
	fn options(request: &DialogRequest) -> Result<Object, JsValue> {
		let json = serde_json::to_string(&SwalOptions::new(request)).map_err(|error| JsValue::from_str(&error.to_string()))?;
		JSON::parse(&json)?.dyn_into::<Object>()
	}
}

/// Keeps the popup's `<b>` element (if any) showing the milliseconds left until the interval is cleared.
struct Countdown {
	interval: Rc<Cell<Option<i32>>>,
	did_open: Closure<dyn Fn()>,
	will_close: Closure<dyn Fn()>,
}

impl Countdown {
	fn new() -> Self {
		let interval = Rc::new(Cell::new(None));
		let tick = Closure::wrap(Box::new(|| {
			if let (Ok(Some(popup)), Ok(Some(left))) = (swal_get_popup(), swal_get_timer_left()) {
				if let Ok(Some(counter)) = popup.query_selector("b") {
					counter.set_text_content(Some(&format!("{}", left)));
				}
			}
		}) as Box<dyn Fn()>);

		let did_open = Closure::wrap(Box::new({
			let interval = Rc::clone(&interval);
			move || {
				if let Err(error) = swal_show_loading() {
					warn!("`Swal.showLoading` failed: {:?}", error);
				}
				let handle = web_sys::window().and_then(|window| {
					window.set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), COUNTDOWN_REFRESH_MS).ok()
				});
				interval.set(handle);
			}
		}) as Box<dyn Fn()>);

		let will_close = Closure::wrap(Box::new({
			let interval = Rc::clone(&interval);
			move || Self::clear(&interval)
		}) as Box<dyn Fn()>);

		Self { interval, did_open, will_close }
	}

	fn attach(&self, options: &Object) -> Result<(), JsValue> {
		Reflect::set(options, &"didOpen".into(), self.did_open.as_ref())?;
		Reflect::set(options, &"willClose".into(), self.will_close.as_ref())?;
		Ok(())
	}

	fn clear(interval: &Cell<Option<i32>>) {
		if let (Some(handle), Some(window)) = (interval.take(), web_sys::window()) {
			window.clear_interval_with_handle(handle);
		}
	}
}

impl Drop for Countdown {
	fn drop(&mut self) {
		Self::clear(&self.interval);
	}
}

impl Dialogs for SweetAlert {
	#[instrument(skip(request), fields(severity = ?request.severity, dismissal = ?request.dismissal))]
	async fn show_dialog(&self, request: DialogRequest) -> DialogResult {
		let options = match Self::options(&request) {
			Ok(options) => options,
			Err(error) => {
				error!("Failed to build dialog options: {:?}", error);
				return DialogResult::default();
			}
		};

		// The callbacks must outlive the popup, so they stay on this frame until it resolves.
		let countdown = match request.dismissal {
			Dismissal::Auto { .. } => {
				let countdown = Countdown::new();
				if let Err(error) = countdown.attach(&options) {
					warn!("Failed to attach countdown callbacks: {:?}", error);
				}
				Some(countdown)
			}
			Dismissal::Confirm { .. } | Dismissal::Acknowledge => None,
		};

		let promise = match swal_fire(&options) {
			Ok(promise) => promise,
			Err(error) => {
				error!("`Swal.fire` failed: {:?}", error);
				return DialogResult::default();
			}
		};

		let confirmed = match JsFuture::from(promise).await {
			Ok(result) => Reflect::get(&result, &"isConfirmed".into()).ok().and_then(|value| value.as_bool()).unwrap_or(false),
			Err(error) => {
				error!("Dialog promise rejected: {:?}", error);
				false
			}
		};
		drop(countdown);

		trace!(confirmed, "Dialog closed.");
		DialogResult { confirmed: confirmed && matches!(request.dismissal, Dismissal::Confirm { .. } | Dismissal::Acknowledge) }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn confirm_options() {
		let request = DialogRequest::confirm("Confirmar check-out de Maria?", "Não há como desfazer o check-out.", Severity::Warning);
		assert_eq!(
			serde_json::to_value(SwalOptions::new(&request)).unwrap(),
			json!({
				"title": "Confirmar check-out de Maria?",
				"text": "Não há como desfazer o check-out.",
				"icon": "warning",
				"showCancelButton": true,
				"confirmButtonColor": "#3085d6",
				"cancelButtonColor": "#d33",
				"confirmButtonText": "Confirmar",
				"cancelButtonText": "Não",
			})
		);
	}

	#[test]
	fn notice_options() {
		let request = DialogRequest::notice("Sucesso", "OK", Severity::Success, DEFAULT_DISMISS_DELAY_MS);
		assert_eq!(
			serde_json::to_value(SwalOptions::new(&request)).unwrap(),
			json!({ "title": "Sucesso", "text": "OK", "icon": "success", "timer": 1000, "timerProgressBar": true })
		);
	}

	#[test]
	fn acknowledge_options() {
		let request = DialogRequest::acknowledge("Erro", "Não foi possível atualizar a reserva.", Severity::Error);
		assert_eq!(
			serde_json::to_value(SwalOptions::new(&request)).unwrap(),
			json!({ "title": "Erro", "text": "Não foi possível atualizar a reserva.", "icon": "error" })
		);
	}

	#[test]
	fn confirm_label_override() {
		let request = DialogRequest::confirm("Cancelar esta reserva?", "Essa ação é irreversível.", Severity::Warning).with_confirm_label("Sim!");
		assert_eq!(request.dismissal, Dismissal::Confirm { confirm_label: "Sim!", cancel_label: "Não" });
		let notice = DialogRequest::notice("Erro", "", Severity::Error, 1500).with_confirm_label("Sim!");
		assert_eq!(notice.dismissal, Dismissal::Auto { delay_ms: 1500 });
	}
}
