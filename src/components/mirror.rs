//! Mirror Component
//!
//! Visual stand-ins cloned from live elements: the drag image that follows
//! the pointer, the clones that fade out where exiting cards stood, and the
//! overlay's instant copy of a card's already-loaded cover.

use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::dom::{self, KEY_ATTR};

pub const MIRROR_CLASS: &str = "mirror";

/// Deep clone of `source` that can live next to it: no ids, no list key,
/// not focusable
pub fn mirror_element(source: &HtmlElement) -> Option<HtmlElement> {
    let copy = source.clone_node_with_deep(true).ok()?.dyn_into::<HtmlElement>().ok()?;
    let _ = copy.remove_attribute("id");
    let _ = copy.remove_attribute(KEY_ATTR);

    if let Ok(nested) = copy.query_selector_all("[id]") {
        for i in 0..nested.length() {
            if let Some(el) = nested.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let _ = el.remove_attribute("id");
            }
        }
    }

    let _ = copy.class_list().add_1(MIRROR_CLASS);
    dom::set_inert(&copy, true);
    Some(copy)
}

/// Copy of the element with DOM id `of`, taken once when mounted
#[component]
pub fn Mirror(#[prop(into)] of: String, #[prop(into, optional)] class: String) -> impl IntoView {
    let node = NodeRef::<Div>::new();

    Effect::new(move |_| {
        let Some(host) = node.get() else { return };
        if host.child_element_count() > 0 {
            return;
        }
        let source = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&of))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        match source.as_ref().and_then(mirror_element) {
            Some(copy) => {
                let _ = host.append_child(&copy);
            }
            None => log::debug!("[MIRROR] nothing to mirror for #{}", of),
        }
    });

    view! { <div node_ref=node class=dom::merge_classes(["mirror-host", &class])></div> }
}
