//! Animated Component
//!
//! Wraps one child and fades it with its `show` signal. Fading out makes the
//! child inert at once; `on_hidden` fires when the fade-out has finished.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::AnimationHandle;

use crate::animations::{self, AnimateOptions, VisualState};
use crate::config::AnimationSettings;
use crate::dom;
use crate::reconcile::Visibility;

#[component]
pub fn Animated(
    #[prop(into)] show: Signal<bool>,
    /// Runs once the fade-out completes
    #[prop(optional)]
    on_hidden: Option<Callback<()>>,
    #[prop(into, optional)] class: String,
    #[prop(optional)] settings: Option<AnimationSettings>,
    children: Children,
) -> impl IntoView {
    let settings = settings.unwrap_or_default();
    let node = NodeRef::<Div>::new();
    let state = StoredValue::new(Visibility::initial(show.get_untracked()));
    let running = StoredValue::new_local(None::<AnimationHandle>);

    Effect::new(move |_| {
        let displayed = show.get();
        let Some(el) = node.get() else { return };

        let current = state.get_value();
        let next = current.toward(displayed);
        if next == current {
            if current == Visibility::Hidden {
                let _ = web_sys::HtmlElement::style(&el).set_property("opacity", "0");
                dom::set_inert(&el, true);
            }
            return;
        }

        state.set_value(next);
        running.update_value(|handle| {
            if let Some(handle) = handle.take() {
                handle.commit();
            }
        });

        let hiding = next == Visibility::FadingOut;
        dom::set_inert(&el, hiding);
        let target = if hiding { 0.0 } else { 1.0 };
        let options = AnimateOptions::with_settings(&settings)
            .duration(settings.fade_ms)
            .to(VisualState::opacity(target));

        let Some(handle) = animations::animate(&node, options) else {
            let _ = web_sys::HtmlElement::style(&el).set_property("opacity", if hiding { "0" } else { "1" });
            state.set_value(next.settle());
            if hiding {
                if let Some(on_hidden) = on_hidden {
                    on_hidden.run(());
                }
            }
            return;
        };

        running.set_value(Some(handle.clone()));
        spawn_local(async move {
            if !handle.finished().await {
                return;
            }
            // Superseded or unmounted
            if state.try_get_value() != Some(next) {
                return;
            }
            handle.commit();
            state.set_value(next.settle());
            if hiding {
                if let Some(on_hidden) = on_hidden {
                    on_hidden.run(());
                }
            }
        });
    });

    view! {
        <div node_ref=node class=dom::merge_classes(["animated", &class])>
            {children()}
        </div>
    }
}
