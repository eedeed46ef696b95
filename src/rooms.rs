//! The hotel's full room list, loaded into the reservation editor's room select on focus.

use crate::{
	api::{decode_rooms, FetchError, Room, Transport},
	config::Config,
	format::catalog_option_label,
	select::replace_options,
};
use js_sys::Function;
use std::rc::{Rc, Weak};
use tracing::{error, info, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlSelectElement};

const FOCUS: &str = "focus";
pub const CATALOG_PLACEHOLDER: &str = "Selecione o quarto";

struct Inner<T> {
	select: HtmlSelectElement,
	hotel_id: String,
	config: Config,
	transport: T,
	on_focus: Closure<dyn Fn(Event)>,
}

pub struct RoomCatalog<T> {
	inner: Rc<Inner<T>>,
}

impl<T: Transport + 'static> RoomCatalog<T> {
	/// [`None`] unless the page has the catalog select and names a hotel.
	pub fn new(document: &Document, config: Config, transport: T) -> Option<Self> {
		let select = document.get_element_by_id(config.room_catalog_id)?.dyn_into::<HtmlSelectElement>().ok()?;
		let hotel_id = match config.hotel_id.clone() {
			Some(hotel_id) => hotel_id,
			None => {
				warn!("#{} is present, but the page names no hotel.", config.room_catalog_id);
				return None;
			}
		};

		let inner = Rc::new_cyclic(|weak: &Weak<Inner<T>>| {
			let weak = weak.clone();
			Inner {
				select,
				hotel_id,
				config,
				transport,
				on_focus: Closure::wrap(Box::new(move |_: Event| {
					if let Some(inner) = weak.upgrade() {
						spawn_local(async move {
							let rooms = inner.update_rooms().await;
							trace!(?rooms, "Room catalog updated.");
						});
					}
				}) as Box<dyn Fn(Event)>),
			}
		});
		if let Err(error) = inner.select.add_event_listener_with_callback(FOCUS, inner.callback()) {
			error!("Failed to add focus listener: {:?}", error);
		}
		Some(Self { inner })
	}

	/// Reloads the select. Returns the number of rooms, or [`None`] if the lookup failed and the select was kept.
	pub async fn update_rooms(&self) -> Option<usize> {
		self.inner.update_rooms().await
	}
}

impl<T> Inner<T> {
	fn callback(&self) -> &Function {
		self.on_focus.as_ref().unchecked_ref()
	}
}

impl<T: Transport> Inner<T> {
	#[instrument(skip(self), fields(hotel = %self.hotel_id))]
	async fn update_rooms(&self) -> Option<usize> {
		let rooms = match self.fetch().await {
			Ok(rooms) => rooms,
			Err(error) => {
				error!("Failed to load rooms: {}", error);
				return None;
			}
		};
		match replace_options(&self.select, CATALOG_PLACEHOLDER, rooms.iter().map(|room| (room.id.to_string(), catalog_option_label(room)))) {
			Ok(count) => {
				info!("Loaded {} room(s).", count);
				Some(count)
			}
			Err(error) => {
				error!("Failed to fill the room select: {:?}", error);
				None
			}
		}
	}

	async fn fetch(&self) -> Result<Vec<Room>, FetchError> {
		decode_rooms(&self.transport.get(&self.config.rooms_url(&self.hotel_id)).await?)
	}
}

impl<T> Drop for Inner<T> {
	fn drop(&mut self) {
		if let Err(error) = self.select.remove_event_listener_with_callback(FOCUS, self.callback()) {
			warn!("Failed to remove focus listener: {:?}", error);
		}
	}
}
