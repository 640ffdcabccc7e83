//! Reorderable Component
//!
//! Keyed list whose children glide to their new slots when the order
//! changes (FLIP), fade when their display flag flips, fade in when they
//! enter and leave behind a fading clone when they exit.
//!
//! Each update: snapshot the rendered children, plan against the next list,
//! commit, wait one tick for the DOM, then play the plan. Without unique
//! keys the list renders directly with no animation.

use std::collections::HashMap;

use leptos::either::Either;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::{spawn_local, tick};
use leptos_dragdrop::{AnimationHandle, Rect};
use web_sys::{Element, HtmlElement};

use crate::animations::{self, AnimateOptions, VisualState};
use crate::components::mirror::mirror_element;
use crate::config::AnimationSettings;
use crate::dom::{self, KEY_ATTR};
use crate::reconcile::{self, Fade, PositionCache, Reconcilable, Visibility};

/// Class of the wrapper around each child
pub const ITEM_CLASS: &str = "reorderable-item";

/// Per-list animation bookkeeping, keyed by child key
#[derive(Default)]
struct Transitions {
    cache: PositionCache,
    visibility: HashMap<String, Visibility>,
    moves: HashMap<String, AnimationHandle>,
    fades: HashMap<String, AnimationHandle>,
}

type Shared = StoredValue<Transitions, LocalStorage>;

#[component]
pub fn Reorderable<T, CF, V>(
    #[prop(into)] each: Signal<Vec<T>>,
    /// Renders one child; wrapped in a keyed `div`
    children: CF,
    #[prop(into, optional)] class: String,
    /// Ref to the list container, for drag bindings
    #[prop(optional)]
    container: Option<NodeRef<Div>>,
    #[prop(optional)] settings: Option<AnimationSettings>,
) -> impl IntoView
where
    T: Reconcilable + Clone + Send + Sync + 'static,
    CF: Fn(T) -> V + Clone + Send + Sync + 'static,
    V: IntoView + 'static,
{
    let container = container.unwrap_or_else(NodeRef::new);
    let settings = settings.unwrap_or_default();
    let rendered = RwSignal::new(each.get_untracked());
    let keyed = Memo::new(move |_| rendered.with(|list| reconcile::check_keys(list).is_ok()));

    let transitions: Shared = StoredValue::new_local(Transitions::default());
    rendered.with_untracked(|list| {
        transitions.update_value(|t| {
            for child in list {
                if let Some(key) = child.key() {
                    t.visibility.insert(key.to_string(), Visibility::initial(child.displayed()));
                }
            }
        })
    });

    Effect::new(move |_| {
        let next = each.get();
        let Some(root) = container.get_untracked() else {
            rendered.set(next);
            return;
        };

        // 1. Snapshot
        let previous = rendered.get_untracked();
        let elements = dom::children_by_key(&root, KEY_ATTR);
        let element_of = |child: &T| child.key().and_then(|k| elements.get(k));
        let snapshot: Vec<Option<Rect>> = previous
            .iter()
            .map(|child| element_of(child).map(|el| Rect::from(el.get_bounding_client_rect())))
            .collect();

        // 2. Plan
        let Some(plan) = transitions.try_with_value(|t| reconcile::plan(&previous, &snapshot, &next, &t.cache))
        else {
            return;
        };
        let plan = match plan {
            Ok(plan) => plan,
            Err(err) => {
                log::warn!("[REORDER] {}; rendering without animation", err);
                rendered.set(next.clone());
                spawn_local(async move {
                    tick().await;
                    sync_inert(container, &next, None);
                });
                return;
            }
        };
        log::debug!(
            "[REORDER] {} moves, {} fades, {} in, {} out",
            plan.moves.len(),
            plan.visibility.len(),
            plan.entering.len(),
            plan.exiting.len()
        );

        let ghosts: Vec<HtmlElement> = plan
            .exiting
            .iter()
            .filter_map(|&i| ghost(element_of(&previous[i])?, snapshot[i]?))
            .collect();
        for change in plan.visibility.iter().filter(|c| c.fade == Fade::Out) {
            if let Some(el) = element_of(&next[change.index]) {
                dom::set_inert(el, true);
            }
        }
        transitions.update_value(|t| {
            t.cache.record(&snapshot);
            for key in plan.exiting.iter().filter_map(|&i| previous[i].key()) {
                t.visibility.remove(key);
                t.moves.remove(key);
                t.fades.remove(key);
            }
        });

        // 3. Commit
        rendered.set(next.clone());

        // 4. Play
        let settings = settings.clone();
        spawn_local(async move {
            tick().await;
            let Some(root) = container.try_get_untracked().flatten() else { return };
            let elements = dom::children_by_key(&root, KEY_ATTR);
            let at = |index: usize| {
                let key = next[index].key()?;
                Some((key.to_string(), elements.get(key)?))
            };

            for m in &plan.moves {
                if let Some((key, el)) = at(m.index) {
                    play_move(transitions, key, el, m.from, &settings);
                }
            }
            for change in &plan.visibility {
                if let Some((key, el)) = at(change.index) {
                    fade(transitions, key, el, change.fade == Fade::In, &settings);
                }
            }
            for &index in &plan.entering {
                let Some((key, el)) = at(index) else { continue };
                transitions.update_value(|t| {
                    t.visibility.insert(key.clone(), Visibility::Hidden);
                });
                if next[index].displayed() {
                    fade(transitions, key, el, true, &settings);
                }
            }
            for ghost in ghosts {
                let handle = animations::fade_out(
                    &ghost,
                    AnimateOptions::with_settings(&settings).duration(settings.fade_ms),
                );
                spawn_local(async move {
                    if let Some(handle) = handle {
                        handle.finished().await;
                    }
                    ghost.remove();
                });
            }

            sync_inert(container, &next, Some(transitions));
        });
    });

    let class = dom::merge_classes(["reorderable", &class]);
    view! {
        <div node_ref=container class=class>
            {move || {
                let children = children.clone();
                if keyed.get() {
                    Either::Left(view! {
                        <For
                            each=move || rendered.get()
                            key=|child: &T| child.key().unwrap_or_default().to_string()
                            children=move |child: T| slot(child, &children)
                        />
                    })
                } else {
                    Either::Right(
                        rendered.get().into_iter().map(|child| slot(child, &children)).collect_view(),
                    )
                }
            }}
        </div>
    }
}

fn slot<T, CF, V>(child: T, children: &CF) -> impl IntoView
where
    T: Reconcilable,
    CF: Fn(T) -> V,
    V: IntoView,
{
    let key = child.key().map(str::to_string);
    let hidden = !child.displayed();
    view! {
        <div class=ITEM_CLASS data-key=key style=hidden.then_some("opacity: 0;")>
            {children(child)}
        </div>
    }
}

/// A direct child of the list container
#[derive(Clone, Copy, Debug, PartialEq)]
enum Rendered<'a> {
    /// Item wrapper and its `data-key`
    Item(Option<&'a str>),
    /// Anything else, e.g. a drag placeholder
    Foreign,
}

/// Position in `rendered` of each child of `list`: by key when the keys are
/// sound, otherwise in order among the item wrappers
fn locate<T: Reconcilable>(list: &[T], rendered: &[Rendered<'_>]) -> Vec<Option<usize>> {
    if reconcile::check_keys(list).is_ok() {
        return list
            .iter()
            .map(|child| rendered.iter().position(|r| *r == Rendered::Item(child.key())))
            .collect();
    }
    let mut items = rendered
        .iter()
        .enumerate()
        .filter(|(_, r)| matches!(r, Rendered::Item(_)))
        .map(|(i, _)| i);
    list.iter().map(|_| items.next()).collect()
}

/// Make every rendered child inert unless it is (becoming) visible
fn sync_inert<T: Reconcilable>(container: NodeRef<Div>, list: &[T], transitions: Option<Shared>) {
    let Some(root) = container.try_get_untracked().flatten() else { return };
    let children = root.children();
    let elements: Vec<Element> = (0..children.length()).filter_map(|i| children.item(i)).collect();
    let keys: Vec<Option<String>> = elements.iter().map(|el| el.get_attribute(KEY_ATTR)).collect();
    let rendered: Vec<Rendered<'_>> = elements
        .iter()
        .zip(&keys)
        .map(|(el, key)| {
            if el.class_list().contains(ITEM_CLASS) {
                Rendered::Item(key.as_deref())
            } else {
                Rendered::Foreign
            }
        })
        .collect();

    for (child, at) in list.iter().zip(locate(list, &rendered)) {
        let Some(el) = at.and_then(|i| elements.get(i)) else { continue };
        let interactive = match (transitions, child.key()) {
            (Some(transitions), Some(key)) => transitions
                .try_with_value(|t| t.visibility.get(key).copied())
                .flatten()
                .map_or(child.displayed(), Visibility::is_interactive),
            _ => child.displayed(),
        };
        dom::set_inert(el, !interactive);
    }
}

/// FLIP: start at the snapshot origin and let the element settle in its slot
fn play_move(transitions: Shared, key: String, el: &HtmlElement, from: Rect, settings: &AnimationSettings) {
    transitions.update_value(|t| {
        if let Some(previous) = t.moves.remove(&key) {
            previous.cancel();
        }
    });
    let options = AnimateOptions::with_settings(settings).dynamic(settings.dynamic_duration);
    if let Some(handle) = animations::move_in(el, from.origin(), options) {
        transitions.update_value(|t| {
            t.moves.insert(key, handle);
        });
    }
}

fn fade(transitions: Shared, key: String, el: &HtmlElement, show: bool, settings: &AnimationSettings) {
    let Some((prior, next)) = transitions.try_update_value(|t| {
        if let Some(previous) = t.fades.remove(&key) {
            previous.commit();
        }
        let prior = t.visibility.get(&key).copied().unwrap_or_default();
        let next = prior.toward(show);
        t.visibility.insert(key.clone(), next);
        (prior, next)
    }) else {
        return;
    };

    dom::set_inert(el, !show);
    let options = AnimateOptions::with_settings(settings).duration(settings.fade_ms);
    let handle = match (show, prior) {
        (true, Visibility::Hidden) => animations::fade_in(el, options.to(VisualState::opacity(1.0))),
        (true, _) => animations::animate(el, options.to(VisualState::opacity(1.0))),
        (false, _) => animations::fade_out(el, options),
    };
    let Some(handle) = handle else {
        let _ = el.style().set_property("opacity", if show { "1" } else { "0" });
        transitions.update_value(|t| {
            t.visibility.insert(key, next.settle());
        });
        return;
    };

    transitions.update_value(|t| {
        t.fades.insert(key.clone(), handle.clone());
    });
    spawn_local(async move {
        if !handle.finished().await {
            return;
        }
        let settled = transitions.try_update_value(|t| {
            if t.visibility.get(&key) != Some(&next) {
                return false;
            }
            t.visibility.insert(key.clone(), next.settle());
            t.fades.remove(&key);
            true
        });
        if settled == Some(true) {
            handle.commit();
        }
    });
}

/// Detached copy of an exiting child pinned where the child was
fn ghost(el: &HtmlElement, rect: Rect) -> Option<HtmlElement> {
    let copy = mirror_element(el)?;
    let style = copy.style();
    for (property, value) in [
        ("position", "fixed".to_string()),
        ("left", format!("{}px", rect.x)),
        ("top", format!("{}px", rect.y)),
        ("width", format!("{}px", rect.width)),
        ("height", format!("{}px", rect.height)),
        ("margin", "0".to_string()),
        ("pointer-events", "none".to_string()),
    ] {
        style.set_property(property, &value).ok()?;
    }
    web_sys::window()?.document()?.body()?.append_child(&copy).ok()?;
    Some(copy)
}
