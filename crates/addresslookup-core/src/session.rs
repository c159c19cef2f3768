// crates/addresslookup-core/src/session.rs

//! # Suggestion Session
//!
//! The state machine behind one autocomplete widget. It is *sans-IO*: every
//! operation takes an event (typed text, a key, a resolved request, a timer
//! tick) and returns the [`Effect`]s the host must carry out. The host owns the
//! clock, the network and the DOM.
//!
//! ```text
//!  input ──► debounce ──► cache? ──hit──► render
//!                           │
//!                          miss ──► Lookup{ticket} ··· suggestions_resolved(ticket)
//!                                                              │
//!  key/click ──► cursor ──► confirm ──► back | drill (fetch) | Retrieve{ticket}
//!                                                              │
//!                                              address_resolved ──► WriteField*
//! ```
//!
//! Ordering is enforced with [`Ticket`]s: a lookup result only counts if its
//! ticket is still the pending one. Everything older is dropped.

use crate::cache::{CacheEntry, CacheStore, Signature};
use crate::config::WidgetConfig;
use crate::error::{AutocompleteError, Diagnostic, Result};
use crate::hierarchy::SuggestionHierarchy;
use crate::materialize::{materialize, FieldWrite};
use crate::model::{
    AddressRecord, Geolocation, RetrieveRequest, SuggestionItem, SuggestionKind,
    SuggestionRequest, MAXIMUM_RESULTS, RETRIEVE_EXCLUDE,
};
use crate::render::{render, BackRow, DisplayRow, RenderView, RowKind};
use crate::selection::{step_cursor, Direction, Keymap, NavAction};
use crate::text::{is_searchable, normalize_country, normalize_query};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Identifies one issued request. Monotonic per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(u64);

impl Ticket {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Visibility of the suggestion list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    #[default]
    Hidden,
    Open,
}

/// The in-flight suggestion lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub ticket: Ticket,
    pub signature: Signature,
    /// Label the cache entry gets once the lookup succeeds.
    pub label: String,
    /// Started by new input: the hierarchy restarts when it lands.
    pub fresh: bool,
}

/// Mutable per-widget state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Normalized text of the last input event.
    pub current_query: String,
    pub path_filter: Option<String>,
    pub selected_label: String,
    /// Row under the cursor; `None` when nothing is selected.
    pub cursor: Option<usize>,
    pub pending: Option<PendingLookup>,
}

/// Something the host has to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// (Re)arm the single debounce timer; call
    /// [`AutocompleteSession::timer_fired`] once it expires.
    ArmTimer { due_at_ms: u64 },
    DisarmTimer,
    /// Abort the lookup, best-effort. Its result is ignored either way.
    CancelLookup { ticket: Ticket },
    /// Perform a suggestion lookup and report back with
    /// [`AutocompleteSession::suggestions_resolved`].
    Lookup {
        ticket: Ticket,
        request: SuggestionRequest,
    },
    /// Perform an address retrieval and report back with
    /// [`AutocompleteSession::address_resolved`].
    Retrieve {
        ticket: Ticket,
        request: RetrieveRequest,
    },
    /// Ask the geolocation endpoint for the visitor's country.
    Geolocate,
    /// Replace the list content with these rows and show it.
    Render { rows: Vec<DisplayRow> },
    Hide,
    ScrollIntoView { row: usize },
    SetInputText { text: String },
    SetCountry { code: String },
    WriteField(FieldWrite),
    /// Diagnostic channel.
    Report(Diagnostic),
}

/// Result of routing one key press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The bound action, `None` for unbound keys.
    pub action: Option<NavAction>,
    /// Whether the host should suppress the key's default behaviour.
    pub prevent_default: bool,
    pub effects: Vec<Effect>,
}

/// One widget instance.
#[derive(Debug)]
pub struct AutocompleteSession {
    config: WidgetConfig,
    keymap: Keymap,
    state: SessionState,
    cache: CacheStore,
    hierarchy: SuggestionHierarchy,
    suggestions: Vec<SuggestionItem>,
    list: ListState,
    /// Value of the host's country selector.
    country_field: String,
    timer_due: Option<u64>,
    /// Set by new input until the next fetch picks it up.
    fresh_search: bool,
    retrievals: Vec<Ticket>,
    last_ticket: u64,
}

impl AutocompleteSession {
    pub fn new(config: WidgetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            keymap: Keymap::default(),
            state: SessionState::default(),
            cache: CacheStore::new(),
            hierarchy: SuggestionHierarchy::new(),
            suggestions: Vec::new(),
            list: ListState::Hidden,
            country_field: String::new(),
            timer_due: None,
            fresh_search: false,
            retrievals: Vec::new(),
            last_ticket: 0,
        })
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    // -----------------------------------------------------------------------
    // ACCESSORS
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn hierarchy(&self) -> &SuggestionHierarchy {
        &self.hierarchy
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    pub fn list_state(&self) -> ListState {
        self.list
    }

    pub fn is_open(&self) -> bool {
        self.list == ListState::Open
    }

    /// Country sent with requests: the configured override, else the value
    /// last reported by the host's country field.
    pub fn country(&self) -> String {
        normalize_country(self.config.country_override().unwrap_or(&self.country_field))
    }

    /// The rows as they should currently be displayed.
    pub fn rows(&self) -> Vec<DisplayRow> {
        render(&self.view())
    }

    fn view(&self) -> RenderView<'_> {
        let back = self.hierarchy.parent().and_then(|entry| {
            self.cache.get(entry).map(|e| BackRow {
                entry,
                label: e.label.as_str(),
            })
        });
        RenderView {
            suggestions: &self.suggestions,
            back,
            cursor: self.state.cursor,
            single_summary: self.config.single_summary,
            placeholder: self.config.no_results_message(),
        }
    }

    // -----------------------------------------------------------------------
    // LIFECYCLE & COUNTRY
    // -----------------------------------------------------------------------

    /// Effects to run once the widget is attached to its page.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.config.geolocate && self.config.country_override().is_none() {
            vec![Effect::Geolocate]
        } else {
            Vec::new()
        }
    }

    /// The host's country field changed.
    pub fn country_changed(&mut self, code: &str) {
        self.country_field = code.trim().to_string();
    }

    /// Geolocation failures are logged and otherwise ignored.
    pub fn geolocation_resolved(&mut self, result: Result<Geolocation>) -> Vec<Effect> {
        let mut fx = Vec::new();
        match result {
            Ok(geo) => {
                let code = geo.country_code.trim();
                if code.is_empty() || self.config.country_override().is_some() {
                    return fx;
                }
                debug!(country = code, "pre-selecting country from geolocation");
                self.country_field = code.to_string();
                fx.push(Effect::SetCountry {
                    code: code.to_string(),
                });
            }
            Err(err) => self.report(&err, &mut fx),
        }
        fx
    }

    // -----------------------------------------------------------------------
    // QUERY SESSION
    // -----------------------------------------------------------------------

    /// The search input changed.
    ///
    /// Too-short input clears and hides the list at once; anything else
    /// (re)arms the debounce timer. A pending lookup is cancelled either way.
    ///
    /// The hierarchy of the displayed list survives until the new search
    /// lands, so a failed search leaves list and hierarchy in step.
    pub fn input_changed(&mut self, raw: &str, now_ms: u64) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.state.current_query = normalize_query(raw);
        self.state.path_filter = None;
        self.state.cursor = None;
        self.cancel_pending(&mut fx);

        if !is_searchable(&self.state.current_query) {
            if self.timer_due.take().is_some() {
                fx.push(Effect::DisarmTimer);
            }
            self.fresh_search = false;
            self.hierarchy.clear();
            self.suggestions.clear();
            self.hide(&mut fx);
            return fx;
        }

        self.fresh_search = true;
        let due_at_ms = now_ms.saturating_add(self.input_delay_ms());
        self.timer_due = Some(due_at_ms);
        fx.push(Effect::ArmTimer { due_at_ms });
        fx
    }

    /// The debounce timer expired.
    ///
    /// A tick before the deadline re-arms the timer instead of being lost; a
    /// deadline further away than one delay (clock moved back) is pulled in.
    /// Ticks with no timer armed do nothing.
    pub fn timer_fired(&mut self, now_ms: u64) -> Vec<Effect> {
        match self.timer_due {
            Some(due) if now_ms >= due => {
                self.timer_due = None;
                self.fetch_suggestions()
            }
            Some(due) => {
                let due_at_ms = due.min(now_ms.saturating_add(self.input_delay_ms()));
                debug!(now_ms, due_at_ms, "early timer tick, re-arming");
                self.timer_due = Some(due_at_ms);
                vec![Effect::ArmTimer { due_at_ms }]
            }
            None => Vec::new(),
        }
    }

    /// The input gained focus.
    pub fn focus(&mut self) -> Vec<Effect> {
        if self.suggestions.is_empty() {
            self.fetch_suggestions()
        } else {
            let mut fx = Vec::new();
            self.show(&mut fx);
            fx
        }
    }

    /// Looks up suggestions for the current query and path filter, from the
    /// cache if possible.
    pub fn fetch_suggestions(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        let query = self.state.current_query.clone();
        if !is_searchable(&query) {
            self.hide(&mut fx);
            return fx;
        }
        if self.state.path_filter.is_none() {
            self.state.selected_label = query.clone();
        }

        let request = SuggestionRequest {
            query,
            country: self.country(),
            maximum_results: MAXIMUM_RESULTS,
            path_filter: self.state.path_filter.clone(),
            single_summary: self.config.single_summary,
        };
        let signature = Signature::of(&request);
        self.cancel_pending(&mut fx);
        let fresh = std::mem::take(&mut self.fresh_search);

        if let Some(index) = self.cache.lookup(&signature) {
            debug!(index, query = %request.query, "serving suggestions from cache");
            self.enter_level(index, fresh, &mut fx);
            return fx;
        }

        let ticket = self.issue_ticket();
        self.state.pending = Some(PendingLookup {
            ticket,
            signature,
            label: self.state.selected_label.clone(),
            fresh,
        });
        fx.push(Effect::Lookup { ticket, request });
        fx
    }

    /// Outcome of an [`Effect::Lookup`].
    pub fn suggestions_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<SuggestionItem>>,
    ) -> Vec<Effect> {
        let mut fx = Vec::new();
        let pending = match self.state.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.state.pending = other;
                debug!(ticket = ticket.get(), "discarding superseded lookup result");
                return fx;
            }
        };

        match result {
            Ok(suggestions) => {
                let index = self.cache.insert(CacheEntry {
                    signature: pending.signature,
                    suggestions,
                    label: pending.label,
                });
                self.enter_level(index, pending.fresh, &mut fx);
            }
            Err(err) if err.is_cancelled() => {
                debug!(ticket = ticket.get(), "lookup cancelled");
            }
            Err(err) => self.report(&err, &mut fx),
        }
        fx
    }

    /// Narrows the search to within suggestion `id`.
    pub fn drill_into(&mut self, id: &str, label: &str) -> Vec<Effect> {
        self.state.path_filter = Some(id.to_string());
        self.state.selected_label = label.to_string();
        self.fetch_suggestions()
    }

    /// Returns to the previous hierarchy level without touching the network.
    pub fn go_back(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        if self.hierarchy.depth() < 2 {
            debug!("no parent level to go back to");
            return fx;
        }
        self.cancel_pending(&mut fx);
        self.hierarchy.pop();

        let restored = self
            .hierarchy
            .top()
            .and_then(|i| self.cache.get(i))
            .map(|entry| {
                (
                    entry.suggestions.clone(),
                    entry.signature.path_filter().map(str::to_owned),
                )
            });
        match restored {
            Some((suggestions, path_filter)) => {
                self.suggestions = suggestions;
                self.state.path_filter = path_filter;
                self.show(&mut fx);
            }
            None => self.hide(&mut fx),
        }
        fx
    }

    // -----------------------------------------------------------------------
    // SELECTION CONTROLLER
    // -----------------------------------------------------------------------

    /// Routes a key through the keymap.
    pub fn key(&mut self, key: &str) -> KeyOutcome {
        let Some(action) = self.keymap.action_for(key) else {
            return KeyOutcome::default();
        };
        let has_cursor = self.is_open() && self.state.cursor.is_some();

        let (prevent_default, effects) = match action {
            NavAction::Move(direction) => (true, self.move_cursor(direction)),
            NavAction::Confirm if has_cursor => (true, self.confirm_selection()),
            NavAction::Confirm => (false, Vec::new()),
            NavAction::ConfirmOrClose if has_cursor => (true, self.confirm_selection()),
            NavAction::ConfirmOrClose => {
                let mut fx = Vec::new();
                self.hide(&mut fx);
                (false, fx)
            }
            NavAction::Dismiss => (false, self.dismiss()),
        };
        KeyOutcome {
            action: Some(action),
            prevent_default,
            effects,
        }
    }

    /// Moves the cursor cyclically over the selectable rows.
    pub fn move_cursor(&mut self, direction: Direction) -> Vec<Effect> {
        if !self.is_open() {
            return Vec::new();
        }
        let count = self.view().effective_count();
        match step_cursor(self.state.cursor, direction, count) {
            Some(row) => {
                self.state.cursor = Some(row);
                vec![
                    Effect::Render { rows: self.rows() },
                    Effect::ScrollIntoView { row },
                ]
            }
            None => Vec::new(),
        }
    }

    /// Acts on the row under the cursor.
    pub fn confirm_selection(&mut self) -> Vec<Effect> {
        if !self.is_open() {
            return Vec::new();
        }
        let Some(row) = self.state.cursor.and_then(|i| self.rows().into_iter().nth(i)) else {
            return Vec::new();
        };

        match row.kind {
            RowKind::Back { .. } => self.go_back(),
            RowKind::Suggestion {
                ref id,
                kind: SuggestionKind::More,
            } => {
                let label = row.text();
                self.drill_into(&id, &label)
            }
            RowKind::Suggestion {
                id,
                kind: SuggestionKind::Address,
            } => {
                self.state.selected_label = row.label;
                self.retrieve_address(&id)
            }
            RowKind::Placeholder => Vec::new(),
        }
    }

    /// Pointer selection: cursor to `row`, then confirm.
    pub fn select_row(&mut self, row: usize) -> Vec<Effect> {
        if !self.is_open() || row >= self.view().effective_count() {
            return Vec::new();
        }
        self.state.cursor = Some(row);
        self.confirm_selection()
    }

    /// Escape: close the list and put the last confirmed query back.
    pub fn dismiss(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.hide(&mut fx);
        fx.push(Effect::SetInputText {
            text: self.state.current_query.clone(),
        });
        fx
    }

    /// A click landed outside both the input and the list.
    pub fn outside_click(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.hide(&mut fx);
        fx
    }

    // -----------------------------------------------------------------------
    // RESULT MATERIALIZER
    // -----------------------------------------------------------------------

    /// Requests the full address behind suggestion `id`.
    ///
    /// Retrievals are user-confirmed and never cancelled.
    pub fn retrieve_address(&mut self, id: &str) -> Vec<Effect> {
        let ticket = self.issue_ticket();
        self.retrievals.push(ticket);
        let request = RetrieveRequest {
            country: self.country(),
            query: self.state.current_query.clone(),
            id: id.to_string(),
            lines: self.config.fields.address_lines(),
            exclude: RETRIEVE_EXCLUDE.iter().map(|s| (*s).to_string()).collect(),
        };
        vec![Effect::Retrieve { ticket, request }]
    }

    /// Outcome of an [`Effect::Retrieve`].
    pub fn address_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<AddressRecord>>,
    ) -> Vec<Effect> {
        let mut fx = Vec::new();
        let Some(pos) = self.retrievals.iter().position(|t| *t == ticket) else {
            debug!(ticket = ticket.get(), "ignoring unknown retrieval");
            return fx;
        };
        self.retrievals.swap_remove(pos);
        self.hide(&mut fx);

        match result {
            Ok(records) => match records.first() {
                Some(address) => fx.extend(
                    materialize(address, &self.config.fields)
                        .into_iter()
                        .map(Effect::WriteField),
                ),
                None => {
                    let err = AutocompleteError::MalformedResponse(
                        "retrieval returned no address records".into(),
                    );
                    self.report(&err, &mut fx);
                }
            },
            Err(err) => self.report(&err, &mut fx),
        }
        fx
    }

    // -----------------------------------------------------------------------
    // INTERNAL HELPERS
    // -----------------------------------------------------------------------

    fn input_delay_ms(&self) -> u64 {
        u64::try_from(self.config.input_delay().as_millis()).unwrap_or(u64::MAX)
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    fn cancel_pending(&mut self, fx: &mut Vec<Effect>) {
        if let Some(pending) = self.state.pending.take() {
            debug!(ticket = pending.ticket.get(), "cancelling superseded lookup");
            fx.push(Effect::CancelLookup {
                ticket: pending.ticket,
            });
        }
    }

    /// Makes cache entry `index` the displayed level, as the new root when
    /// `fresh`.
    fn enter_level(&mut self, index: usize, fresh: bool, fx: &mut Vec<Effect>) {
        let Some(entry) = self.cache.get(index) else {
            return;
        };
        self.suggestions = entry.suggestions.clone();
        if fresh {
            self.hierarchy.clear();
        }
        self.hierarchy.push(index);
        self.show(fx);
    }

    fn show(&mut self, fx: &mut Vec<Effect>) {
        self.list = ListState::Open;
        self.state.cursor = None;
        fx.push(Effect::Render { rows: self.rows() });
    }

    fn hide(&mut self, fx: &mut Vec<Effect>) {
        self.state.cursor = None;
        if self.list == ListState::Open {
            self.list = ListState::Hidden;
            fx.push(Effect::Hide);
        }
    }

    fn report(&self, err: &AutocompleteError, fx: &mut Vec<Effect>) {
        warn!(error = %err, "address lookup failed");
        fx.push(Effect::Report(Diagnostic::from(err)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AddressField;

    fn session() -> AutocompleteSession {
        let mut config = WidgetConfig::new("PCW45-TEST");
        config.country_code = Some("UK".into());
        config.fields = config
            .fields
            .with(AddressField::AddressLine1, "#line1")
            .with(AddressField::PostTown, "#town")
            .with(AddressField::PostCode, "#postcode");
        AutocompleteSession::new(config).unwrap()
    }

    fn lookups(fx: &[Effect]) -> Vec<(Ticket, SuggestionRequest)> {
        fx.iter()
            .filter_map(|e| match e {
                Effect::Lookup { ticket, request } => Some((*ticket, request.clone())),
                _ => None,
            })
            .collect()
    }

    fn streets() -> Vec<SuggestionItem> {
        vec![
            SuggestionItem::more("GB|1", "Downing Street", "London SW1A", 14),
            SuggestionItem::more("GB|2", "Down Street", "London W1J", 137),
        ]
    }

    /// Types `text`, lets the debounce expire and returns the lookup effect.
    fn type_and_fire(s: &mut AutocompleteSession, text: &str, now: u64) -> (Ticket, SuggestionRequest) {
        s.input_changed(text, now);
        let fx = s.timer_fired(now + 300);
        lookups(&fx).pop().expect("a lookup")
    }

    #[test]
    fn short_input_issues_nothing_and_hides() {
        let mut s = session();
        let fx = s.input_changed("  ab ", 0);
        assert!(fx.is_empty());
        assert!(s.timer_fired(1_000).is_empty());
        assert!(!s.is_open());
        assert!(s.suggestions().is_empty());
    }

    #[test]
    fn short_input_after_results_disarms_and_clears() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));
        s.input_changed("10 Dow", 400);
        let fx = s.input_changed("10", 450);
        assert!(fx.contains(&Effect::DisarmTimer));
        assert!(fx.contains(&Effect::Hide));
        assert!(s.suggestions().is_empty());
        assert!(s.timer_fired(10_000).is_empty());
    }

    #[test]
    fn debounce_keeps_only_latest_input() {
        let mut s = session();
        s.input_changed("10 Dow", 0);
        s.input_changed("10 Down", 100);
        assert_eq!(
            s.timer_fired(300),
            vec![Effect::ArmTimer { due_at_ms: 400 }],
            "first deadline was replaced"
        );
        let fx = s.timer_fired(400);
        let issued = lookups(&fx);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].1.query, "10 Down");
        assert_eq!(issued[0].1.country, "UK");
        assert_eq!(issued[0].1.maximum_results, 10);
    }

    #[test]
    fn new_input_cancels_pending_and_ignores_its_result() {
        let mut s = session();
        let (first, _) = type_and_fire(&mut s, "10 Dow", 0);
        let fx = s.input_changed("10 Down", 500);
        assert!(fx.contains(&Effect::CancelLookup { ticket: first }));

        assert!(s.suggestions_resolved(first, Ok(streets())).is_empty());
        assert_eq!(s.hierarchy().depth(), 0);
        assert!(s.cache().is_empty());
    }

    #[test]
    fn failed_lookup_keeps_last_good_list() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));

        let (ticket, _) = type_and_fire(&mut s, "10 Downi", 1_000);
        let fx = s.suggestions_resolved(ticket, Err(AutocompleteError::transport(Some(500), "boom")));
        assert!(matches!(fx.as_slice(), [Effect::Report(d)] if d.kind == crate::ErrorKind::Transport));
        assert!(s.is_open());
        assert_eq!(s.suggestions(), streets().as_slice());
        assert_eq!(s.cache().len(), 1, "failures never reach the cache");
    }

    #[test]
    fn cancellation_is_silent() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        let fx = s.suggestions_resolved(ticket, Err(AutocompleteError::Cancelled));
        assert!(fx.is_empty());
    }

    #[test]
    fn identical_signature_is_served_from_cache() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));
        assert_eq!(s.hierarchy().depth(), 1);

        let fx = s.fetch_suggestions();
        assert!(lookups(&fx).is_empty());
        assert!(matches!(fx.as_slice(), [Effect::Render { .. }]));
        assert_eq!(s.hierarchy().depth(), 2);
        assert_eq!(s.cache().len(), 1);
    }

    #[test]
    fn drill_down_then_back_restores_previous_level() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));
        let before = s.rows();

        s.move_cursor(Direction::Down);
        let fx = s.confirm_selection();
        let (ticket, request) = lookups(&fx).pop().unwrap();
        assert_eq!(request.path_filter.as_deref(), Some("GB|1"));
        assert_eq!(request.query, "10 Down");

        s.suggestions_resolved(
            ticket,
            Ok(vec![SuggestionItem::address("GB|1|10", "10 Downing Street", "London SW1A 2AA")]),
        );
        let rows = s.rows();
        assert!(rows[0].is_back());
        assert_eq!(rows[0].label, "10 Down");

        s.move_cursor(Direction::Down);
        let fx = s.confirm_selection();
        assert!(lookups(&fx).is_empty());
        assert_eq!(s.rows(), before);
        assert_eq!(s.state().cursor, None);
        assert_eq!(s.state().path_filter, None);
        assert_eq!(s.hierarchy().depth(), 1);
    }

    #[test]
    fn cursor_wraps_over_back_row() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));
        let fx = s.drill_into("GB|1", "Downing Street");
        let (ticket, _) = lookups(&fx).pop().unwrap();
        s.suggestions_resolved(ticket, Ok(streets()));

        // back row + 2 suggestions
        s.move_cursor(Direction::Up);
        assert_eq!(s.state().cursor, Some(2));
        s.move_cursor(Direction::Down);
        assert_eq!(s.state().cursor, Some(0));
        let fx = s.move_cursor(Direction::Up);
        assert_eq!(s.state().cursor, Some(2));
        assert_eq!(fx.last(), Some(&Effect::ScrollIntoView { row: 2 }));
    }

    #[test]
    fn keys_dispatch_through_keymap() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));

        let tab = s.key("Tab");
        assert!(!tab.prevent_default);
        assert!(!s.is_open());

        s.focus();
        assert!(s.is_open());
        let down = s.key("ArrowDown");
        assert!(down.prevent_default);
        let enter = s.key("Enter");
        assert!(enter.prevent_default);
        assert_eq!(lookups(&enter.effects).len(), 1);

        let esc = s.key("Escape");
        assert!(esc.effects.contains(&Effect::SetInputText { text: "10 Down".into() }));
        assert_eq!(s.key("x"), KeyOutcome::default());
    }

    #[test]
    fn address_selection_writes_configured_fields() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Downing Street", 0);
        s.suggestions_resolved(
            ticket,
            Ok(vec![SuggestionItem::address("GB|1|10", "10 Downing Street", "London SW1A 2AA")]),
        );
        let fx = s.select_row(0);
        let Some(Effect::Retrieve { ticket, request }) = fx.first().cloned() else {
            panic!("expected retrieve, got {fx:?}");
        };
        assert_eq!(request.lines, 1);
        assert_eq!(request.id, "GB|1|10");
        assert_eq!(request.exclude.join(","), "organisation,posttown,county,postcode,country");

        let record = AddressRecord {
            addressline1: "10 Downing Street".into(),
            posttown: "London".into(),
            postcode: "SW1A 2AA".into(),
            ..AddressRecord::default()
        };
        let fx = s.address_resolved(ticket, Ok(vec![record]));
        assert_eq!(fx[0], Effect::Hide);
        let writes: Vec<_> = fx
            .iter()
            .filter_map(|e| match e {
                Effect::WriteField(w) => Some(w.value.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(writes, ["10 Downing Street", "London", "SW1A 2AA"]);
    }

    #[test]
    fn empty_retrieval_writes_nothing() {
        let mut s = session();
        let fx = s.retrieve_address("GB|1|10");
        let Some(Effect::Retrieve { ticket, .. }) = fx.first().cloned() else {
            panic!("expected retrieve");
        };
        let fx = s.address_resolved(ticket, Ok(Vec::new()));
        assert!(matches!(fx.as_slice(), [Effect::Report(d)] if d.kind == crate::ErrorKind::MalformedResponse));
        assert!(s.address_resolved(ticket, Ok(Vec::new())).is_empty(), "tickets are single-use");
    }

    #[test]
    fn geolocation_sets_country_unless_overridden() {
        let mut config = WidgetConfig::new("key");
        config.geolocate = true;
        let mut s = AutocompleteSession::new(config).unwrap();
        assert_eq!(s.start(), vec![Effect::Geolocate]);
        let fx = s.geolocation_resolved(Ok(Geolocation {
            country_code: "gb".into(),
        }));
        assert_eq!(fx, vec![Effect::SetCountry { code: "gb".into() }]);
        assert_eq!(s.country(), "GB");

        let mut overridden = session();
        assert!(overridden.start().is_empty());
        assert!(overridden
            .geolocation_resolved(Ok(Geolocation {
                country_code: "FR".into()
            }))
            .is_empty());
        assert_eq!(overridden.country(), "UK");
    }

    #[test]
    fn failed_fresh_search_keeps_hierarchy_of_displayed_list() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));
        let fx = s.drill_into("GB|1", "Downing Street London SW1A (14 addresses)");
        let (ticket, _) = lookups(&fx).pop().unwrap();
        s.suggestions_resolved(ticket, Ok(streets()));
        let displayed = s.rows();
        assert_eq!(displayed.len(), 3);
        assert!(displayed[0].is_back());

        let (ticket, _) = type_and_fire(&mut s, "10 Downx", 1_000);
        let fx = s.suggestions_resolved(ticket, Err(AutocompleteError::transport(Some(500), "boom")));
        assert!(matches!(fx.as_slice(), [Effect::Report(_)]));
        assert!(s.is_open());
        assert_eq!(s.hierarchy().depth(), 2);
        assert_eq!(s.rows(), displayed);

        let fx = s.move_cursor(Direction::Down);
        let Some(Effect::Render { rows }) = fx.first() else {
            panic!("expected a render, got {fx:?}");
        };
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_back());
        assert!(lookups(&s.confirm_selection()).is_empty());
        assert_eq!(s.hierarchy().depth(), 1);
    }

    #[test]
    fn fresh_search_restarts_hierarchy_when_it_lands() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));
        let fx = s.drill_into("GB|1", "Downing Street");
        let (ticket, _) = lookups(&fx).pop().unwrap();
        s.suggestions_resolved(ticket, Ok(streets()));
        assert_eq!(s.hierarchy().depth(), 2);

        // cache hit for the root query
        s.input_changed("10 Down", 1_000);
        assert_eq!(s.hierarchy().depth(), 2, "unchanged until the search lands");
        s.timer_fired(1_300);
        assert_eq!(s.hierarchy().depth(), 1);
        assert!(!s.rows()[0].is_back());
    }

    #[test]
    fn early_timer_tick_rearms_instead_of_dropping_search() {
        let mut s = session();
        s.input_changed("10 Down", 1_000);
        let fx = s.timer_fired(1_299);
        assert_eq!(fx, vec![Effect::ArmTimer { due_at_ms: 1_300 }]);
        assert!(s.state().pending.is_none());

        let issued = lookups(&s.timer_fired(1_300));
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].1.query, "10 Down");
        assert!(s.timer_fired(5_000).is_empty(), "fired timers are spent");
    }

    #[test]
    fn clock_moving_back_pulls_deadline_in() {
        let mut s = session();
        s.input_changed("10 Down", 10_000);
        let fx = s.timer_fired(2_000);
        assert_eq!(fx, vec![Effect::ArmTimer { due_at_ms: 2_300 }]);
        assert_eq!(lookups(&s.timer_fired(2_300)).len(), 1);
    }

    #[test]
    fn drilled_level_is_labelled_with_full_row_text() {
        let mut s = session();
        let (ticket, _) = type_and_fire(&mut s, "10 Down", 0);
        s.suggestions_resolved(ticket, Ok(streets()));
        s.move_cursor(Direction::Down);
        let (ticket, _) = lookups(&s.confirm_selection()).pop().unwrap();
        s.suggestions_resolved(ticket, Ok(streets()));

        // one level deeper the back row shows the street row as it was displayed
        for _ in 0..3 {
            s.move_cursor(Direction::Down);
        }
        let (ticket, _) = lookups(&s.confirm_selection()).pop().unwrap();
        s.suggestions_resolved(ticket, Ok(streets()));
        assert_eq!(s.rows()[0].label, "Downing Street London SW1A (14 addresses)");
    }
}
