//! Gallery Component
//!
//! Controls, the reorderable project grid with drag-to-swap, and the
//! overlay for the selected project. Everything behind the overlay is inert
//! while it is open.

use std::rc::Rc;

use leptos::html::Div;
use leptos::prelude::*;
use leptos_dragdrop::{use_drag_over, use_draggable, DragConfig, DragImageFn, DragOverConfig};
use web_sys::HtmlElement;

use crate::components::mirror::mirror_element;
use crate::components::project::HANDLE_SELECTOR;
use crate::components::reorderable::ITEM_CLASS;
use crate::components::{Controls, Overlay, ProjectCard, Reorderable};
use crate::context::use_gallery;
use crate::dom::KEY_ATTR;
use crate::models::Project;
use crate::store::{find_project, store_close, store_swap, use_gallery_store, GalleryStateStoreFields};

#[component]
pub fn Gallery() -> impl IntoView {
    let store = use_gallery_store();
    let config = use_gallery().config();
    let grid = NodeRef::<Div>::new();

    let item = format!(".{}", ITEM_CLASS);
    use_draggable(
        grid,
        DragConfig {
            draggable: item.clone(),
            drag_trigger: HANDLE_SELECTOR.to_string(),
            droppable: item,
            dragged_class: config.drag.dragged_class.clone(),
            animate_drop: config.drag.animate_drop,
            animate_cancel: config.drag.animate_cancel,
            make_drag_image: Some(Rc::new(mirror_element) as DragImageFn),
        },
    );
    use_drag_over(
        grid,
        DragOverConfig { threshold: config.drag.swap_threshold },
        move |dragged: HtmlElement, target: HtmlElement| {
            if let (Some(a), Some(b)) = (dragged.get_attribute(KEY_ATTR), target.get_attribute(KEY_ATTR)) {
                log::debug!("[GALLERY] swap {} <-> {}", a, b);
                store_swap(&store, &a, &b);
            }
        },
    );

    let projects = Signal::derive(move || store.projects().get());
    let overlay = move || {
        let id = store.selected().get()?;
        let project = find_project(&store, &id)?;
        let origin = store.opened_from().get_untracked();
        Some(view! {
            <Overlay
                project=project
                origin=origin
                on_close=Callback::new(move |_| store_close(&store))
            />
        })
    };

    view! {
        <section class="gallery">
            <div class="gallery-body" inert=move || store.selected().with(Option::is_some)>
                <Controls />
                <Reorderable
                    each=projects
                    container=grid
                    class="project-grid"
                    settings=config.animation.clone()
                    children=|project: Project| view! { <ProjectCard project=project /> }
                />
            </div>
            {overlay}
        </section>
    }
}
