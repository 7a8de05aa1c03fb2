//! Shaka Player bindings and the engine built on them
//!
//! Expects the page to have loaded `shaka-player.compiled.js`, which defines
//! the global `shaka` namespace.

use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use remux_core::{
    Error, ErrorListener, MediaEngine, MediaPlatform, Result, TextTrack, TextTrackKind,
};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlMediaElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["shaka", "polyfill"], js_name = installAll)]
    fn install_all_polyfills() -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = shaka, js_name = Player)]
    type ShakaPlayer;

    #[wasm_bindgen(catch, constructor, js_namespace = shaka, js_class = "Player")]
    fn new() -> std::result::Result<ShakaPlayer, JsValue>;

    #[wasm_bindgen(catch, static_method_of = ShakaPlayer, js_namespace = shaka, js_class = "Player", js_name = isBrowserSupported)]
    fn is_browser_supported() -> std::result::Result<bool, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn attach(
        this: &ShakaPlayer,
        media: &HtmlMediaElement,
        init_media_source: bool,
    ) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn detach(this: &ShakaPlayer) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn load(this: &ShakaPlayer, uri: &str) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(catch, method, js_name = addTextTrackAsync)]
    fn add_text_track_async(
        this: &ShakaPlayer,
        uri: &str,
        language: &str,
        kind: &str,
        mime_type: Option<String>,
        codec: Option<String>,
        label: &str,
    ) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, js_name = setTextTrackVisibility)]
    fn set_text_track_visibility(this: &ShakaPlayer, visible: bool);

    #[wasm_bindgen(method, js_name = addEventListener)]
    fn add_event_listener(this: &ShakaPlayer, event_type: &str, listener: &Function);
}

/// Best-effort human readable form of a thrown JS value or Shaka error event
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    // Shaka error events carry a shaka.util.Error in `detail`
    let detail = Reflect::get(value, &JsValue::from_str("detail")).unwrap_or(JsValue::UNDEFINED);
    let source = if detail.is_object() { &detail } else { value };
    match Reflect::get(source, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64())
    {
        Some(code) => format!("shaka error {code}"),
        None => format!("{value:?}"),
    }
}

async fn settle(promise: std::result::Result<Promise, JsValue>) -> std::result::Result<JsValue, JsValue> {
    JsFuture::from(promise?).await
}

/// Shaka-backed engine
pub struct ShakaEngine {
    player: ShakaPlayer,
    listeners: RefCell<Vec<Closure<dyn Fn(JsValue)>>>,
}

#[async_trait(?Send)]
impl MediaEngine for ShakaEngine {
    type Element = HtmlMediaElement;

    fn add_error_listener(&self, listener: ErrorListener) {
        let closure = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
            listener(&describe(&event));
        });
        self.player
            .add_event_listener("error", closure.as_ref().unchecked_ref());
        self.listeners.borrow_mut().push(closure);
    }

    async fn attach(&self, element: &HtmlMediaElement, init_media_source: bool) -> Result<()> {
        settle(self.player.attach(element, init_media_source))
            .await
            .map(|_| ())
            .map_err(|err| Error::Attach(describe(&err)))
    }

    async fn detach(&self) -> Result<()> {
        settle(self.player.detach())
            .await
            .map(|_| ())
            .map_err(|err| Error::Detach(describe(&err)))
    }

    async fn load(&self, url: &str) -> Result<()> {
        settle(self.player.load(url))
            .await
            .map(|_| ())
            .map_err(|err| Error::load(url, describe(&err)))
    }

    async fn add_text_track(&self, track: &TextTrack, kind: TextTrackKind) -> Result<()> {
        let promise = self.player.add_text_track_async(
            &track.url,
            &track.lang,
            &kind.to_string(),
            track.mime.clone(),
            None,
            &track.label,
        );
        settle(promise)
            .await
            .map(|_| ())
            .map_err(|err| Error::TextTrack {
                url: track.url.clone(),
                reason: describe(&err),
            })
    }

    fn set_text_track_visibility(&self, visible: bool) {
        self.player.set_text_track_visibility(visible);
    }

    async fn play(&self, element: &HtmlMediaElement) -> Result<()> {
        settle(element.play())
            .await
            .map(|_| ())
            .map_err(|err| Error::Engine(describe(&err)))
    }
}

/// The page's `shaka` namespace and DOM
#[derive(Default)]
pub struct ShakaPlatform;

impl MediaPlatform for ShakaPlatform {
    type Engine = ShakaEngine;

    fn install_polyfills(&self) {
        if let Err(err) = install_all_polyfills() {
            tracing::warn!(error = %describe(&err), "Shaka polyfills unavailable");
        }
    }

    fn find_media_element(&self, id: &str) -> Option<HtmlMediaElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlMediaElement>()
            .ok()
    }

    fn is_supported(&self) -> bool {
        ShakaPlayer::is_browser_supported().unwrap_or(false)
    }

    fn create_engine(&self) -> Result<ShakaEngine> {
        let player = ShakaPlayer::new().map_err(|err| Error::Engine(describe(&err)))?;
        Ok(ShakaEngine {
            player,
            listeners: RefCell::new(Vec::new()),
        })
    }
}
