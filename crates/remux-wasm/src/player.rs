//! `RemuxPlayer` - the page-facing player handle

use crate::shaka::ShakaPlatform;
use js_sys::Promise;
use remux_core::{Error, PlayerConfig, PlayerHandle, TextTrack};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// JS `Error` whose `name` is the error code
fn to_js_error(err: &Error) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    js_err.set_name(err.error_code());
    js_err.into()
}

/// Player bound to one `<video>` element.
///
/// ```javascript
/// import init, { RemuxPlayer } from '@remux/wasm';
///
/// await init();
/// const player = new RemuxPlayer({ videoElementId: 'video-player' });
/// const report = await player.playShaka(url, [{ url: srt, lang: 'en', label: 'English' }]);
/// if (report.failure) console.warn(report.failure.code);
/// ```
#[wasm_bindgen]
pub struct RemuxPlayer {
    inner: Rc<PlayerHandle<ShakaPlatform>>,
}

#[wasm_bindgen]
impl RemuxPlayer {
    /// Create a player; `config` is an optional plain object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<RemuxPlayer, JsError> {
        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.validate()?;
        crate::logging::init(&config.log_level);

        Ok(Self {
            inner: Rc::new(PlayerHandle::with_config(ShakaPlatform, config)),
        })
    }

    /// Ensure the Shaka player exists and is attached to `elementId`.
    ///
    /// Rejects when the element is missing or the browser is unsupported.
    pub fn bootstrap(&self, element_id: String) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            inner
                .bootstrap(&element_id)
                .await
                .map(|()| JsValue::UNDEFINED)
                .map_err(|err| to_js_error(&err))
        })
    }

    /// Load `url` and try to play it. Resolves with a report; never rejects.
    ///
    /// A `textTracks` value that is not a track list plays the source without
    /// tracks and sets `report.textTrackError`.
    #[wasm_bindgen(js_name = playShaka)]
    pub fn play_shaka(&self, url: String, text_tracks: JsValue) -> Promise {
        let tracks: Result<Vec<TextTrack>, Error> =
            if text_tracks.is_undefined() || text_tracks.is_null() {
                Ok(Vec::new())
            } else {
                serde_wasm_bindgen::from_value(text_tracks)
                    .map_err(|err| Error::Serialization(err.to_string()))
            };

        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let report = inner.start_playback_from_input(&url, tracks).await;
            Ok(serde_wasm_bindgen::to_value(&report)?)
        })
    }

    /// Current status as `{ state, message? }`
    pub fn status(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.status()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(getter, js_name = isInitialized)]
    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    #[wasm_bindgen(js_name = notifyPlay)]
    pub fn notify_play(&self) {
        self.inner.notify_play();
    }

    #[wasm_bindgen(js_name = notifyPause)]
    pub fn notify_pause(&self) {
        self.inner.notify_pause();
    }

    /// Close playback, abandoning any start still in flight
    pub fn stop(&self) {
        self.inner.stop();
    }
}
