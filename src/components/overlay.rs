//! Project Overlay Component
//!
//! Full view of one project. On open the backdrop fades in while the panel
//! grows out of the card it was opened from. Escape, the backdrop or the
//! close button play that in reverse: the panel shrinks back onto the card
//! and the cover back to the card's size, and only once everything has
//! faded is the selection cleared. Without a card rect the panel slides in
//! from below the viewport and back out.

use leptos::html::{Article, Button, Div};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{Point, Rect};

use crate::animations::{self, AnimateOptions};
use crate::components::{Anchor, AnchorChain, Animated, Mirror};
use crate::config::AnimationSettings;
use crate::context::use_gallery;
use crate::dom::{self, Resolvable};
use crate::markdown::render_writeup;
use crate::models::{Link, Project};

/// Where the panel slides in from (and out to) when there is no card rect
fn offscreen(panel: &impl Resolvable) -> Option<Point> {
    let rect = dom::bounding_rect(panel)?;
    let height = web_sys::window()?.inner_height().ok()?.as_f64()?;
    Some(Point::new(rect.x, height))
}

fn expand(backdrop: NodeRef<Div>, panel: NodeRef<Article>, cover: NodeRef<Div>, origin: Option<Rect>, settings: &AnimationSettings) {
    let options = AnimateOptions::with_settings(settings);
    animations::fade_in(&backdrop, options.clone());
    match origin {
        Some(rect) => {
            animations::transform_in(&panel, rect, options.clone());
            animations::resize_in(&cover, (rect.width, rect.height), options);
        }
        None => {
            if let Some(from) = offscreen(&panel) {
                animations::move_in(&panel, from, options);
            }
        }
    }
}

fn collapse(backdrop: NodeRef<Div>, panel: NodeRef<Article>, cover: NodeRef<Div>, origin: Option<Rect>, settings: &AnimationSettings) {
    let options = AnimateOptions::with_settings(settings);
    animations::fade_out(&backdrop, options.clone());
    match origin {
        Some(rect) => {
            animations::transform_out(&panel, rect, options.clone());
            animations::resize_out(&cover, (rect.width, rect.height), options);
        }
        None => {
            if let Some(to) = offscreen(&panel) {
                animations::move_out(&panel, to, options);
            }
        }
    }
}

#[component]
pub fn Overlay(
    project: Project,
    /// Card rect to expand from
    #[prop(default = None)]
    origin: Option<Rect>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let config = use_gallery().config();
    let (open, set_open) = signal(true);
    let backdrop = NodeRef::<Div>::new();
    let panel = NodeRef::<Article>::new();
    let cover = NodeRef::<Div>::new();
    let close = NodeRef::<Button>::new();

    // The wrapper fades for as long as the panel travels
    let settings = AnimationSettings { fade_ms: config.animation.duration_ms, ..config.animation.clone() };

    let expand_settings = settings.clone();
    Effect::new(move |expanded: Option<bool>| {
        if expanded == Some(true) {
            return true;
        }
        if panel.get().is_none() {
            return false;
        }
        expand(backdrop, panel, cover, origin, &expand_settings);
        true
    });

    // Move focus into the dialog once it has painted
    spawn_local(async move {
        dom::next_frame().await;
        if let Some(button) = close.try_get_untracked().flatten() {
            let _ = button.focus();
        }
    });

    let collapse_settings = StoredValue::new(settings.clone());
    let dismiss = move || {
        if !open.get_untracked() {
            return;
        }
        collapse_settings.with_value(|settings| collapse(backdrop, panel, cover, origin, settings));
        set_open.set(false);
    };

    let keydown = window_event_listener(leptos::ev::keydown, move |ev| {
        if ev.key() == "Escape" {
            dismiss();
        }
    });
    on_cleanup(move || keydown.remove());

    let title_id = format!("{}-title", project.dom_id());

    let when = match project.end_date {
        Some(date) => date.format("%B %Y").to_string(),
        None => "Ongoing".to_string(),
    };
    let url_line = project.link.clone().map(|url| {
        view! {
            <p class="overlay-url">
                <Anchor url=Some(url) class="overlay-link" />
            </p>
        }
    });
    let built_line = (!project.tools.is_empty()).then(|| {
        let tools = project.tools.iter().cloned().map(Link::named).collect::<Vec<_>>();
        view! { <p class="overlay-built">"built with " <AnchorChain links=tools /></p> }
    });
    let for_line = (!project.is_personal()).then(|| {
        view! { <p class="overlay-for">"for " <AnchorChain links=project.clients.clone() /></p> }
    });
    let tags = project
        .tags
        .iter()
        .map(|tag| view! { <li>{tag.clone()}</li> })
        .collect_view();
    let writeup = project
        .writeup
        .as_deref()
        .map(|text| render_writeup(text, &config.assets))
        .map(|html| view! { <div class="overlay-writeup" inner_html=html></div> });
    let images = project
        .images
        .iter()
        .skip(1)
        .map(|image| {
            let src = dom::asset_url(&config.assets.base, &image.path);
            let srcset = dom::srcset(&config.assets.base, &image.path, image.widths_or(&config.assets.widths));
            let alt = image.alt.clone().unwrap_or_default();
            view! { <img class="overlay-image" src=src srcset=srcset sizes="100vw" alt=alt loading="lazy" /> }
        })
        .collect_view();

    view! {
        <Animated
            show=open
            on_hidden=Callback::new(move |_| on_close.run(()))
            class="overlay"
            settings=settings
        >
            <div node_ref=backdrop class="overlay-backdrop" on:click=move |_| dismiss()></div>
            <article
                node_ref=panel
                class="overlay-panel"
                role="dialog"
                aria-modal="true"
                aria-labelledby=title_id.clone()
            >
                <button
                    node_ref=close
                    class="overlay-close"
                    type="button"
                    aria-label="Close"
                    on:click=move |_| dismiss()
                >
                    "×"
                </button>
                <div node_ref=cover class="overlay-cover-frame">
                    <Mirror of=project.cover_dom_id() class="overlay-cover" />
                </div>
                <header class="overlay-header">
                    <h2 id=title_id.clone()>{project.title.clone()}</h2>
                    <p class="overlay-meta">{when}</p>
                </header>
                {url_line}
                {built_line}
                {for_line}
                <ul class="overlay-tags">{tags}</ul>
                {writeup}
                <div class="overlay-images">{images}</div>
            </article>
        </Animated>
    }
}
