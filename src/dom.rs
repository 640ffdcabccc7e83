//! DOM Helpers
//!
//! Element resolution, class merging, responsive image URLs and a few
//! measurements shared by the animation primitives and components.

use std::collections::HashMap;

use leptos::html::ElementType;
use leptos::prelude::*;
use leptos_dragdrop::{animation, Rect};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlElement};

/// Attribute carrying a reorderable child's key on its wrapper
pub const KEY_ATTR: &str = "data-key";

/// Anything that can name an element: the element itself, a `NodeRef`,
/// or an optional one. Resolution happens at call time.
pub trait Resolvable {
    fn resolve(&self) -> Option<HtmlElement>;
}

impl Resolvable for HtmlElement {
    fn resolve(&self) -> Option<HtmlElement> {
        Some(self.clone())
    }
}

impl Resolvable for Element {
    fn resolve(&self) -> Option<HtmlElement> {
        self.dyn_ref::<HtmlElement>().cloned()
    }
}

impl<E> Resolvable for NodeRef<E>
where
    E: ElementType,
    E::Output: JsCast + Clone + 'static,
{
    fn resolve(&self) -> Option<HtmlElement> {
        self.get_untracked().and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

impl<T: Resolvable + ?Sized> Resolvable for &T {
    fn resolve(&self) -> Option<HtmlElement> {
        (**self).resolve()
    }
}

impl<T: Resolvable> Resolvable for Option<T> {
    fn resolve(&self) -> Option<HtmlElement> {
        self.as_ref().and_then(Resolvable::resolve)
    }
}

pub fn bounding_rect(target: &impl Resolvable) -> Option<Rect> {
    target.resolve().map(|el| Rect::from(el.get_bounding_client_rect()))
}

/// True while `target` has a running animation
pub fn is_animating(target: &impl Resolvable) -> bool {
    target.resolve().is_some_and(|el| animation::is_animating(&el))
}

/// Resolves on the next animation frame
pub async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _| match web_sys::window() {
        Some(window) => {
            let _ = window.request_animation_frame(&resolve);
        }
        None => {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Computed opacity, 1.0 when unavailable
pub fn computed_opacity(el: &Element) -> f64 {
    web_sys::window()
        .and_then(|w| w.get_computed_style(el).ok().flatten())
        .and_then(|style| style.get_property_value("opacity").ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(1.0)
}

/// Toggle `inert` so a hidden card takes no focus or clicks
pub fn set_inert(el: &Element, inert: bool) {
    let result = if inert {
        el.set_attribute("inert", "").and_then(|_| el.set_attribute("aria-hidden", "true"))
    } else {
        el.remove_attribute("inert").and_then(|_| el.remove_attribute("aria-hidden"))
    };
    if let Err(err) = result {
        log::debug!("[DOM] inert toggle failed: {:?}", err);
    }
}

/// Direct children of `container` indexed by their `attr` value
pub fn children_by_key(container: &Element, attr: &str) -> HashMap<String, HtmlElement> {
    let children = container.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter_map(|el| {
            let key = el.get_attribute(attr)?;
            el.dyn_into::<HtmlElement>().ok().map(|el| (key, el))
        })
        .collect()
}

/// Join class names, dropping blanks and duplicates
pub fn merge_classes<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for class in parts.into_iter().flat_map(str::split_whitespace) {
        if !out.contains(&class) {
            out.push(class);
        }
    }
    out.join(" ")
}

pub fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

fn is_absolute(url: &str) -> bool {
    is_external(url) || url.starts_with('/') || url.starts_with("data:")
}

const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}');

/// Resolve a feed path against the asset base; absolute URLs pass through
pub fn asset_url(base: &str, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }
    let encoded = utf8_percent_encode(path.trim_start_matches("./"), PATH_ENCODE_SET);
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        encoded.to_string()
    } else {
        format!("{}/{}", base, encoded)
    }
}

/// `kiln/cover.jpg` at 480 → `kiln/cover-480w.jpg`
pub fn variant_path(path: &str, width: u32) -> String {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    };
    let file = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}w.{}", stem, width, ext),
        _ => format!("{}-{}w", file, width),
    };
    match dir {
        Some(dir) => format!("{}/{}", dir, file),
        None => file,
    }
}

/// `srcset` value listing every pre-rendered width of `path`
pub fn srcset(base: &str, path: &str, widths: &[u32]) -> String {
    if is_absolute(path) {
        return String::new();
    }
    widths
        .iter()
        .map(|&w| format!("{} {}w", asset_url(base, &variant_path(path, w)), w))
        .collect::<Vec<_>>()
        .join(", ")
}
