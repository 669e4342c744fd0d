//! Per-page fetch state
//!
//! `loading -> ready | error`, re-entering `loading` on every dependency
//! change. Each fetch is tagged with a generation ticket; only the outcome of
//! the latest ticket is applied, so a slow earlier response can never
//! overwrite a newer one.

use std::fmt::Display;

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// What a page should render right now
#[derive(Debug, PartialEq)]
pub enum PageView<'a, T> {
    /// Nothing to show yet
    Loading,
    /// The fetch failed and there is no earlier payload; offer a retry
    Failed(&'a str),
    /// Latest good payload (possibly while a reload is in flight)
    Ready(&'a T),
}

/// Loading/error/data state owned by one page
#[derive(Debug)]
pub struct Loadable<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T> Loadable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `loading`, clear the previous error and issue a new ticket.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.generation)
    }

    /// `ticket` is the latest one issued
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a fetch outcome.
    ///
    /// Returns `false` (and changes nothing) when `ticket` has been
    /// superseded by a later [`begin`](Self::begin).
    pub fn finish<E: Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.generation,
                "Discarding superseded fetch result"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Last good payload stays visible during reloads and after a failed
    /// reload; loading and error panels only show without one.
    pub fn view(&self) -> PageView<'_, T> {
        match (&self.data, &self.error) {
            (Some(data), _) => PageView::Ready(data),
            (None, Some(message)) => PageView::Failed(message.as_str()),
            (None, None) => PageView::Loading,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A reload failed while an older payload is still on screen
    pub fn has_stale_error(&self) -> bool {
        self.data.is_some() && self.error.is_some()
    }
}
