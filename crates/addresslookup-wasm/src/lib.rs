//! addresslookup-wasm — WebAssembly bindings for addresslookup-core
//!
//! This crate exposes the suggestion session to JavaScript. The page keeps
//! doing what only a page can do (listening to the input, issuing `fetch`
//! calls, touching the DOM) and forwards every event to an
//! [`AutocompleteWidget`]. Each call returns an array of plain effect objects
//! telling the page what to do next.
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { AutocompleteWidget } from 'addresslookup-wasm';
//!
//! await init();
//! const widget = new AutocompleteWidget({
//!   apikey: 'PCW45-...', searchterm: '#search', suggestions: '#list',
//!   addressline1: '#line1', posttown: '#town', postcode: '#postcode',
//! });
//!
//! function apply(effects) {
//!   for (const fx of effects) {
//!     switch (fx.type) {
//!       case 'arm_timer':
//!         clearTimeout(timer);
//!         timer = setTimeout(() => apply(widget.timer_fired()), fx.due_at_ms - Date.now());
//!         break;
//!       case 'lookup':
//!         fetch(fx.url).then(r => r.ok ? r.json() : Promise.reject(r))
//!           .then(body => apply(widget.suggestions_loaded(fx.ticket, body)),
//!                 err => apply(widget.suggestions_failed(fx.ticket, err.status, err.statusText)));
//!         break;
//!       case 'render': /* draw fx.rows */ break;
//!       // ... retrieve, geolocate, hide, write_field, ...
//!     }
//!   }
//! }
//! searchInput.addEventListener('input', e => apply(widget.input(e.target.value)));
//! ```
//!
//! Notes
//! -----
//! - Timestamps are taken from `Date.now()`, so `due_at_ms` is directly
//!   comparable to the page's clock.
//! - Request effects (`lookup`, `retrieve`, `geolocate`) carry a ready-made
//!   `url`; the API key is part of it.
//! - `report` effects are also logged with `console.warn`.
use addresslookup_core::endpoints::Endpoints;
use addresslookup_core::model::{AddressRecord, Geolocation, SuggestionItem};
use addresslookup_core::prelude::*;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing addresslookup WASM module...".into());
}

/* --------------------------------------------------------------------------
   Effect Encoding
-------------------------------------------------------------------------- */

/// Turns effects into JSON objects, adding the request URL to the ones the
/// page has to fetch.
pub fn effects_to_json(endpoints: &Endpoints, effects: &[Effect]) -> Result<Vec<Value>> {
    effects
        .iter()
        .map(|effect| {
            let url = match effect {
                Effect::Lookup { request, .. } => Some(endpoints.find_url(request)?),
                Effect::Retrieve { request, .. } => Some(endpoints.retrieve_url(request)?),
                Effect::Geolocate => Some(endpoints.geolocate_url()?),
                _ => None,
            };
            let mut value = serde_json::to_value(effect)?;
            if let (Some(url), Value::Object(map)) = (url, &mut value) {
                map.insert("url".into(), Value::String(url.into()));
            }
            Ok(value)
        })
        .collect()
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

fn transport(status: Option<u16>, message: String) -> AutocompleteError {
    AutocompleteError::Transport { status, message }
}

/* --------------------------------------------------------------------------
   Widget
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub struct AutocompleteWidget {
    session: AutocompleteSession,
    endpoints: Endpoints,
}

#[wasm_bindgen]
impl AutocompleteWidget {
    /// Builds a widget from the option object the page was configured with.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> std::result::Result<AutocompleteWidget, JsError> {
        let config: WidgetConfig = serde_wasm_bindgen::from_value(options).map_err(js_error)?;
        let endpoints = Endpoints::from_config(&config).map_err(js_error)?;
        let session = AutocompleteSession::new(config).map_err(js_error)?;
        Ok(Self { session, endpoints })
    }

    /// Country the next lookup will use.
    pub fn country(&self) -> String {
        self.session.country()
    }

    /// Current list rows, for pages that redraw on their own schedule.
    pub fn rows(&self) -> std::result::Result<JsValue, JsError> {
        to_js(&self.session.rows())
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    pub fn start(&mut self) -> std::result::Result<JsValue, JsError> {
        let fx = self.session.start();
        self.emit(fx)
    }

    pub fn input(&mut self, text: &str) -> std::result::Result<JsValue, JsError> {
        let fx = self.session.input_changed(text, now_ms());
        self.emit(fx)
    }

    pub fn timer_fired(&mut self) -> std::result::Result<JsValue, JsError> {
        let fx = self.session.timer_fired(now_ms());
        self.emit(fx)
    }

    pub fn focus(&mut self) -> std::result::Result<JsValue, JsError> {
        let fx = self.session.focus();
        self.emit(fx)
    }

    /// Handles a `keydown`. The returned object holds `prevent_default` and
    /// the `effects` to apply.
    pub fn key(&mut self, key: &str) -> std::result::Result<JsValue, JsError> {
        let outcome = self.session.key(key);
        let effects = effects_to_json(&self.endpoints, &outcome.effects).map_err(js_error)?;
        forward_reports(&outcome.effects);
        to_js(&serde_json::json!({
            "prevent_default": outcome.prevent_default,
            "effects": effects,
        }))
    }

    pub fn select_row(&mut self, row: usize) -> std::result::Result<JsValue, JsError> {
        let fx = self.session.select_row(row);
        self.emit(fx)
    }

    pub fn outside_click(&mut self) -> std::result::Result<JsValue, JsError> {
        let fx = self.session.outside_click();
        self.emit(fx)
    }

    pub fn country_changed(&mut self, code: &str) {
        self.session.country_changed(code);
    }

    /* ---------------------------- request outcomes ---------------------------- */

    pub fn suggestions_loaded(
        &mut self,
        ticket: f64,
        body: JsValue,
    ) -> std::result::Result<JsValue, JsError> {
        let result = decode::<Vec<SuggestionItem>>(body);
        let fx = self.session.suggestions_resolved(ticket_of(ticket), result);
        self.emit(fx)
    }

    pub fn suggestions_failed(
        &mut self,
        ticket: f64,
        status: Option<u16>,
        message: String,
    ) -> std::result::Result<JsValue, JsError> {
        let fx = self
            .session
            .suggestions_resolved(ticket_of(ticket), Err(transport(status, message)));
        self.emit(fx)
    }

    /// The page aborted the request after a `cancel_lookup`.
    pub fn suggestions_aborted(&mut self, ticket: f64) -> std::result::Result<JsValue, JsError> {
        let fx = self
            .session
            .suggestions_resolved(ticket_of(ticket), Err(AutocompleteError::Cancelled));
        self.emit(fx)
    }

    pub fn address_loaded(
        &mut self,
        ticket: f64,
        body: JsValue,
    ) -> std::result::Result<JsValue, JsError> {
        let result = decode::<Vec<AddressRecord>>(body);
        let fx = self.session.address_resolved(ticket_of(ticket), result);
        self.emit(fx)
    }

    pub fn address_failed(
        &mut self,
        ticket: f64,
        status: Option<u16>,
        message: String,
    ) -> std::result::Result<JsValue, JsError> {
        let fx = self
            .session
            .address_resolved(ticket_of(ticket), Err(transport(status, message)));
        self.emit(fx)
    }

    pub fn geolocated(&mut self, body: JsValue) -> std::result::Result<JsValue, JsError> {
        let result = decode::<Geolocation>(body);
        let fx = self.session.geolocation_resolved(result);
        self.emit(fx)
    }

    pub fn geolocation_failed(
        &mut self,
        status: Option<u16>,
        message: String,
    ) -> std::result::Result<JsValue, JsError> {
        let fx = self
            .session
            .geolocation_resolved(Err(transport(status, message)));
        self.emit(fx)
    }
}

impl AutocompleteWidget {
    fn emit(&self, effects: Vec<Effect>) -> std::result::Result<JsValue, JsError> {
        let values = effects_to_json(&self.endpoints, &effects).map_err(js_error)?;
        forward_reports(&effects);
        to_js(&values)
    }
}

/* --------------------------------------------------------------------------
   Helpers
-------------------------------------------------------------------------- */

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn ticket_of(raw: f64) -> Ticket {
    Ticket::from_raw(raw as u64)
}

fn decode<T: serde::de::DeserializeOwned>(body: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(body)
        .map_err(|e| AutocompleteError::MalformedResponse(e.to_string()))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn forward_reports(effects: &[Effect]) {
    for effect in effects {
        if let Effect::Report(diagnostic) = effect {
            web_sys::console::warn_1(&diagnostic.message.as_str().into());
        }
    }
}
