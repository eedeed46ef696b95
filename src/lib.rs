#![doc(html_root_url = "https://docs.rs/reservation-desk/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use lignin;

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod api;
pub mod availability;
pub mod config;
pub mod control;
pub mod dialog;
pub mod format;
pub mod guard;
pub mod page;
pub mod reconciler;
pub mod render;
pub mod rooms;
mod select;
pub mod tooltip;

pub use page::{boot, shutdown, Page};

#[cfg(feature = "autostart")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
	boot();
}
