//! Project Card Component
//!
//! One card of the grid: cover image, title, summary, tools and tags. The
//! handle starts a drag, the rest of the card opens the overlay. While open
//! the card is hidden so the overlay appears to lift it out of the grid.

use leptos::html::Article;
use leptos::prelude::*;

use crate::components::AnchorChain;
use crate::context::use_gallery;
use crate::store::GalleryStateStoreFields;
use crate::dom;
use crate::models::Project;
use crate::store::{store_open, use_gallery_store};

/// Selector for the drag handle
pub const HANDLE_SELECTOR: &str = ".project-handle";

const COVER_SIZES: &str = "(max-width: 640px) 100vw, (max-width: 1200px) 50vw, 33vw";

/// The card stays in flow but invisible while it is open in the overlay
fn card_class(expanded: bool) -> String {
    dom::merge_classes(["project-card", if expanded { "hidden" } else { "" }])
}

#[component]
pub fn ProjectCard(project: Project) -> impl IntoView {
    let store = use_gallery_store();
    let assets = use_gallery().config().assets;
    let node = NodeRef::<Article>::new();

    let id = project.id.clone();
    let open = move |_| {
        // Its rect is still in flight
        if dom::is_animating(&node) {
            return;
        }
        log::debug!("[CARD] open {}", id);
        store_open(&store, id.clone(), dom::bounding_rect(&node));
    };
    let expanded = {
        let id = project.id.clone();
        move || store.selected().with(|selected| selected.as_deref() == Some(id.as_str()))
    };

    let cover = project.cover().map(|image| {
        let src = dom::asset_url(&assets.base, &image.path);
        let srcset = dom::srcset(&assets.base, &image.path, image.widths_or(&assets.widths));
        let alt = image.alt.clone().unwrap_or_else(|| project.title.clone());
        view! {
            <img
                id=project.cover_dom_id()
                class="project-cover"
                src=src
                srcset=srcset
                sizes=COVER_SIZES
                alt=alt
                loading="lazy"
                draggable="false"
            />
        }
    });

    let clients = (!project.is_personal()).then(|| {
        view! {
            <p class="project-clients">"for " <AnchorChain links=project.clients.clone() /></p>
        }
    });

    let tools = project
        .tools
        .iter()
        .map(|tool| view! { <li class="project-tool">{tool.clone()}</li> })
        .collect_view();
    let tags = project
        .tags
        .iter()
        .map(|tag| view! { <li class="project-tag">{tag.clone()}</li> })
        .collect_view();

    view! {
        <article
            node_ref=node
            id=project.dom_id()
            class=move || card_class(expanded())
        >
            <button
                class="project-handle"
                type="button"
                aria-label="Drag to reorder"
                style="touch-action: none;"
            >
                "⠿"
            </button>
            <button class="project-open" type="button" on:click=open>
                {cover}
                <h3 class="project-title">{project.title.clone()}</h3>
            </button>
            {clients}
            <p class="project-summary">{project.summary.clone()}</p>
            <ul class="project-tools">{tools}</ul>
            <ul class="project-tags">{tags}</ul>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_card_is_hidden() {
        assert_eq!(card_class(false), "project-card");
        assert_eq!(card_class(true), "project-card hidden");
    }
}
