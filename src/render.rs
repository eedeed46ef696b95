//! Materializes small [`lignin`] VDOM descriptions into fresh DOM nodes.
//!
//! This is the creation half of a DOM differ only: nodes are built detached and handed back, so the caller decides
//! where (and in place of what) they go. Event bindings in the description are not wired up here.

use lignin::{Node, ThreadBound};
use thiserror::Error;
use tracing::{error, instrument, trace_span, warn};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

#[derive(Debug, Error)]
pub enum RenderError {
	#[error("failed to create <{name}>: {message}")]
	CreateElement { name: String, message: String },
	#[error("failed to set attribute {name:?}: {message}")]
	SetAttribute { name: String, message: String },
	#[error("failed to append a child node: {0}")]
	Append(String),
	#[error("the description's root is not a single HTML element")]
	NotAnElement,
	#[error("depth limit reached")]
	DepthLimit,
}

fn message(error: &JsValue) -> String {
	format!("{:?}", error)
}

/// Creates the single HTML element `vdom` describes, including its content.
#[instrument(skip(vdom))]
pub fn create_element(document: &Document, vdom: &Node<'_, ThreadBound>, depth_limit: usize) -> Result<Element, RenderError> {
	match vdom {
		Node::HtmlElement { element, dom_binding } => {
			if dom_binding.is_some() {
				warn!("DOM bindings are not invoked for detached elements.");
			}
			create_html_element(document, element, depth_limit)
		}
		_ => Err(RenderError::NotAnElement),
	}
}

fn create_html_element(document: &Document, element: &lignin::Element<'_, ThreadBound>, depth_limit: usize) -> Result<Element, RenderError> {
	let &lignin::Element { name, attributes, ref content, event_bindings, .. } = element;
	let span = trace_span!("Creating HTML element", name);
	let _enter = span.enter();

	let dom_element = document.create_element(name).map_err(|error| RenderError::CreateElement { name: name.to_owned(), message: message(&error) })?;

	for &lignin::Attribute { name, value } in attributes {
		dom_element.set_attribute(name, value).map_err(|error| RenderError::SetAttribute { name: name.to_owned(), message: message(&error) })?;
	}
	if !event_bindings.is_empty() {
		warn!("Ignoring {} event binding(s) on <{}>.", event_bindings.len(), name);
	}

	append_child_nodes(document, &dom_element, core::slice::from_ref(content), depth_limit)?;
	Ok(dom_element)
}

fn append_child_nodes(document: &Document, parent: &Element, vdom: &[Node<'_, ThreadBound>], depth_limit: usize) -> Result<(), RenderError> {
	if depth_limit == 0 {
		error!("Depth limit reached");
		return Err(RenderError::DepthLimit);
	}

	for node in vdom {
		match node {
			Node::Comment { comment, .. } => {
				let dom_comment = document.create_comment(comment);
				parent.append_child(dom_comment.as_ref()).map_err(|error| RenderError::Append(message(&error)))?;
			}
			Node::HtmlElement { element, .. } => {
				let child = create_html_element(document, element, depth_limit - 1)?;
				parent.append_child(child.as_ref()).map_err(|error| RenderError::Append(message(&error)))?;
			}
			Node::Memoized { content, .. } => append_child_nodes(document, parent, core::slice::from_ref(*content), depth_limit - 1)?,
			// Skip the depth limit check one level down if there are no items at all.
			Node::Multi(nodes) => {
				if !nodes.is_empty() {
					append_child_nodes(document, parent, nodes, depth_limit - 1)?;
				}
			}
			Node::Text { text, .. } => {
				let dom_text = document.create_text_node(text);
				parent.append_child(dom_text.as_ref()).map_err(|error| RenderError::Append(message(&error)))?;
			}
			_ => {
				error!("Unsupported VDOM node in a created control; Skipping it.");
			}
		}
	}
	Ok(())
}
