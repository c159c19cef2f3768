// crates/addresslookup-core/src/driver.rs

//! # Blocking Driver
//!
//! Runs an [`AutocompleteSession`] against a [`LookupService`] on the calling
//! thread. Request effects are executed on the spot and their results fed
//! back into the session; everything the *page* has to do (render, hide,
//! write fields, ...) is returned to the caller.
//!
//! The driver also owns the debounce clock: [`BlockingDriver::settle`] fires
//! the armed timer immediately instead of sleeping until it is due.

use crate::service::LookupService;
use crate::session::{AutocompleteSession, Effect};
use std::time::Instant;

#[derive(Debug)]
pub struct BlockingDriver<S> {
    session: AutocompleteSession,
    service: S,
    started: Instant,
    timer_due: Option<u64>,
}

impl<S: LookupService> BlockingDriver<S> {
    pub fn new(session: AutocompleteSession, service: S) -> Self {
        Self {
            session,
            service,
            started: Instant::now(),
            timer_due: None,
        }
    }

    pub fn session(&self) -> &AutocompleteSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AutocompleteSession {
        &mut self.session
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Milliseconds since the driver was created.
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn timer_armed(&self) -> bool {
        self.timer_due.is_some()
    }

    pub fn start(&mut self) -> Vec<Effect> {
        let fx = self.session.start();
        self.run(fx)
    }

    pub fn input(&mut self, text: &str) -> Vec<Effect> {
        let now = self.now_ms();
        let fx = self.session.input_changed(text, now);
        self.run(fx)
    }

    /// Fires the debounce timer if one is armed.
    pub fn settle(&mut self) -> Vec<Effect> {
        match self.timer_due.take() {
            Some(due) => {
                let fx = self.session.timer_fired(due);
                self.run(fx)
            }
            None => Vec::new(),
        }
    }

    /// Types `text` and waits out the debounce.
    pub fn search(&mut self, text: &str) -> Vec<Effect> {
        let mut out = self.input(text);
        out.extend(self.settle());
        out
    }

    pub fn focus(&mut self) -> Vec<Effect> {
        let fx = self.session.focus();
        self.run(fx)
    }

    /// Routes a key press; returns the page effects and whether the key's
    /// default action should be suppressed.
    pub fn key(&mut self, key: &str) -> (Vec<Effect>, bool) {
        let outcome = self.session.key(key);
        (self.run(outcome.effects), outcome.prevent_default)
    }

    pub fn select_row(&mut self, row: usize) -> Vec<Effect> {
        let fx = self.session.select_row(row);
        self.run(fx)
    }

    pub fn outside_click(&mut self) -> Vec<Effect> {
        let fx = self.session.outside_click();
        self.run(fx)
    }

    pub fn country_changed(&mut self, code: &str) {
        self.session.country_changed(code);
    }

    /// Executes request effects, feeding results back into the session, and
    /// returns the rest in order.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut out = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::Lookup { ticket, request } => {
                    let result = self.service.find(&request);
                    let fx = self.session.suggestions_resolved(ticket, result);
                    out.extend(self.run(fx));
                }
                Effect::Retrieve { ticket, request } => {
                    let result = self.service.retrieve(&request);
                    let fx = self.session.address_resolved(ticket, result);
                    out.extend(self.run(fx));
                }
                Effect::Geolocate => {
                    let result = self.service.geolocate();
                    let fx = self.session.geolocation_resolved(result);
                    out.extend(self.run(fx));
                }
                // lookups complete before the next event can supersede them
                Effect::CancelLookup { .. } => {}
                Effect::ArmTimer { due_at_ms } => {
                    self.timer_due = Some(due_at_ms);
                    out.push(effect);
                }
                Effect::DisarmTimer => {
                    self.timer_due = None;
                    out.push(effect);
                }
                other => out.push(other),
            }
        }
        out
    }
}
