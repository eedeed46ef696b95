//! Confirm-before-navigate for the irreversible reservation links (status update and cancellation).

use crate::{
	config::Config,
	dialog::{DialogRequest, Dialogs, Severity},
};
use js_sys::Function;
use std::rc::{Rc, Weak};
use tracing::{error, info, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, EventTarget, HtmlElement};

const CLICK: &str = "click";

/// Follows a link on the user's behalf.
pub trait Navigator {
	fn assign(&self, href: &str);
}

/// [`Navigator`] over `window.location`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowLocation;

impl Navigator for WindowLocation {
	fn assign(&self, href: &str) {
		match web_sys::window().map(|window| window.location().set_href(href)) {
			Some(Ok(())) => (),
			Some(Err(error)) => error!("Navigation to {:?} failed: {:?}", href, error),
			None => error!("No `window` to navigate."),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedLink {
	Update,
	Cancel,
}

impl GuardedLink {
	#[must_use]
	pub fn prompt(self) -> DialogRequest {
		let (title, severity) = match self {
			Self::Update => ("Atualizar a situação da reserva?", Severity::Question),
			Self::Cancel => ("Cancelar esta reserva?", Severity::Warning),
		};
		DialogRequest::confirm(title, "Essa ação é irreversível.", severity).with_confirm_label("Sim!")
	}
}

struct Inner<D, N> {
	links: Vec<(EventTarget, GuardedLink)>,
	dialogs: D,
	navigator: N,
	on_click: Closure<dyn Fn(Event)>,
}

/// Holds back navigation on the guarded links until the matching prompt is confirmed.
pub struct NavigationGuard<D, N> {
	inner: Rc<Inner<D, N>>,
}

impl<D: Dialogs + 'static, N: Navigator + 'static> NavigationGuard<D, N> {
	/// [`None`] if the page has no guarded links.
	pub fn new(document: &Document, config: &Config, dialogs: D, navigator: N) -> Option<Self> {
		let mut links = Vec::new();
		for (selector, kind) in [(config.update_link_selector, GuardedLink::Update), (config.cancel_link_selector, GuardedLink::Cancel)] {
			match document.query_selector_all(selector) {
				Ok(nodes) => links.extend((0..nodes.length()).filter_map(|i| nodes.get(i)).map(|node| (EventTarget::from(node), kind))),
				Err(error) => warn!("Invalid guarded link selector {:?}: {:?}", selector, error),
			}
		}
		if links.is_empty() {
			return None;
		}

		let inner = Rc::new_cyclic(|weak: &Weak<Inner<D, N>>| {
			let weak = weak.clone();
			Inner {
				links,
				dialogs,
				navigator,
				on_click: Closure::wrap(Box::new(move |event: Event| {
					event.prevent_default();
					let inner = match weak.upgrade() {
						Some(inner) => inner,
						None => return warn!("Click on a guarded link after its guard was dropped."),
					};
					let link = match event.current_target().and_then(|target| target.dyn_into::<HtmlElement>().ok()) {
						Some(link) => link,
						None => return error!("Click event without an element as its current target."),
					};
					spawn_local(async move {
						let followed = inner.confirm_navigation(&link).await;
						trace!(followed, "Guarded link handled.");
					});
				}) as Box<dyn Fn(Event)>),
			}
		});

		for (link, _) in &inner.links {
			if let Err(error) = link.add_event_listener_with_callback(CLICK, inner.callback()) {
				error!("Failed to add click listener: {:?}", error);
			}
		}
		info!("Guarding {} link(s).", inner.links.len());
		Some(Self { inner })
	}

	/// Asks for confirmation and, on consent, follows `link`'s `href`. Returns whether it navigated.
	pub async fn confirm_navigation(&self, link: &HtmlElement) -> bool {
		self.inner.confirm_navigation(link).await
	}
}

impl<D, N> Inner<D, N> {
	fn callback(&self) -> &Function {
		self.on_click.as_ref().unchecked_ref()
	}
}

impl<D: Dialogs, N: Navigator> Inner<D, N> {
	async fn confirm_navigation(&self, link: &HtmlElement) -> bool {
		let target: &EventTarget = link;
		let kind = match self.links.iter().find(|(guarded, _)| guarded == target) {
			Some(&(_, kind)) => kind,
			None => {
				warn!("Not a guarded link: {:?}", link);
				return false;
			}
		};
		let href = match link.get_attribute("href") {
			Some(href) => href,
			None => {
				warn!("Guarded link has no href.");
				return false;
			}
		};

		if !self.dialogs.show_dialog(kind.prompt()).await.confirmed {
			return false;
		}
		self.navigator.assign(&href);
		true
	}
}

impl<D, N> Drop for Inner<D, N> {
	fn drop(&mut self) {
		for (link, _) in &self.links {
			if let Err(error) = link.remove_event_listener_with_callback(CLICK, self.callback()) {
				warn!("Failed to remove click listener: {:?}", error);
			}
		}
	}
}
