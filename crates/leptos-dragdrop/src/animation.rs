//! Web Animations Bindings
//!
//! Thin bindings over `Element.animate()` / `getAnimations()` that take
//! serde-serialized keyframes and timing, plus a handle for the running
//! animation.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    /// Any element, viewed through the Animatable mixin
    #[wasm_bindgen(extends = Element)]
    type Animatable;

    #[wasm_bindgen(method, catch, js_name = animate)]
    fn animate(this: &Animatable, keyframes: &JsValue, options: &JsValue) -> Result<WebAnimation, JsValue>;

    #[wasm_bindgen(method, js_name = getAnimations)]
    fn get_animations(this: &Animatable) -> js_sys::Array;

    /// `Animation` returned by `Element.animate()`
    #[wasm_bindgen(extends = js_sys::Object)]
    #[derive(Clone, Debug)]
    pub type WebAnimation;

    #[wasm_bindgen(method, getter)]
    fn finished(this: &WebAnimation) -> js_sys::Promise;

    #[wasm_bindgen(method, getter, js_name = playState)]
    fn play_state(this: &WebAnimation) -> String;

    #[wasm_bindgen(method)]
    fn cancel(this: &WebAnimation);

    #[wasm_bindgen(method, catch, js_name = commitStyles)]
    fn commit_styles(this: &WebAnimation) -> Result<(), JsValue>;
}

/// A running animation
#[derive(Clone, Debug)]
pub struct AnimationHandle {
    inner: WebAnimation,
}

impl AnimationHandle {
    /// Resolves once the animation finishes; `false` if it was cancelled
    pub async fn finished(&self) -> bool {
        JsFuture::from(self.inner.finished()).await.is_ok()
    }

    pub fn is_running(&self) -> bool {
        self.inner.play_state() == "running"
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Write the current animated values into inline style, then drop the
    /// animation so its fill no longer applies
    pub fn commit(&self) {
        if let Err(err) = self.inner.commit_styles() {
            log::debug!("[ANIM] commitStyles failed: {:?}", err);
        }
        self.inner.cancel();
    }
}

/// Start an animation from serializable keyframes and timing options
pub fn play<K, T>(element: &Element, keyframes: &K, timing: &T) -> Option<AnimationHandle>
where
    K: Serialize + ?Sized,
    T: Serialize + ?Sized,
{
    let frames = serde_wasm_bindgen::to_value(keyframes)
        .map_err(|e| log::warn!("[ANIM] keyframes not serializable: {}", e))
        .ok()?;
    let options = serde_wasm_bindgen::to_value(timing)
        .map_err(|e| log::warn!("[ANIM] timing not serializable: {}", e))
        .ok()?;

    match element.unchecked_ref::<Animatable>().animate(&frames, &options) {
        Ok(inner) => Some(AnimationHandle { inner }),
        Err(err) => {
            log::warn!("[ANIM] animate() rejected: {:?}", err);
            None
        }
    }
}

/// True when any animation on `element` is currently running
pub fn is_animating(element: &Element) -> bool {
    element
        .unchecked_ref::<Animatable>()
        .get_animations()
        .iter()
        .any(|a| AnimationHandle { inner: a.unchecked_into() }.is_running())
}
