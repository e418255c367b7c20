//! Search page input state: trailing-edge debounce and request sequencing.

use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a search runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum trimmed query length (in characters) that triggers a request.
pub const MIN_QUERY_CHARS: usize = 3;

/// Trailing-edge debounce timer.
///
/// Every `schedule` replaces the pending deadline; `fire_if_due` reports
/// the deadline once it has passed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates an idle debouncer.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Reschedules the deadline to `now + delay`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.delay).or(Some(now));
    }

    /// Returns `true` exactly once when the pending deadline has elapsed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// What a settled query should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDecision {
    /// Too short; show the prompt.
    TooShort,
    /// Run a request for this trimmed query with this sequence number.
    Query {
        /// Trimmed query text.
        query: String,
        /// Sequence number of the request.
        seq: u64,
    },
}

/// Search box state owned by the search page.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchState {
    /// Raw input text.
    pub input: String,
    /// Input focus (typing goes to the box).
    pub editing: bool,
    debouncer: Debouncer,
    latest_seq: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    /// Creates an empty, focused search box.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            editing: true,
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            latest_seq: 0,
        }
    }

    /// Appends a character and reschedules the debounce.
    pub fn push(&mut self, ch: char, now: Instant) {
        self.input.push(ch);
        self.debouncer.schedule(now);
    }

    /// Removes the last character and reschedules the debounce.
    pub fn pop(&mut self, now: Instant) {
        self.input.pop();
        self.debouncer.schedule(now);
    }

    /// Replaces the whole input and reschedules the debounce.
    pub fn set_input(&mut self, input: String, now: Instant) {
        self.input = input;
        self.debouncer.schedule(now);
    }

    /// Polls the debounce. Once settled, decides what the current input does.
    ///
    /// Both outcomes advance the sequence, so any response still in flight
    /// becomes stale.
    pub fn poll(&mut self, now: Instant) -> Option<SearchDecision> {
        if !self.debouncer.fire_if_due(now) {
            return None;
        }
        self.latest_seq = self.latest_seq.saturating_add(1);
        let query = self.input.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Some(SearchDecision::TooShort);
        }
        Some(SearchDecision::Query {
            query: String::from(query),
            seq: self.latest_seq,
        })
    }

    /// Returns `true` if a response for `seq` is still the latest one.
    #[must_use]
    pub const fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debouncer_fires_after_delay() {
        // Arrange
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));

        // Act
        d.schedule(t0);

        // Assert
        assert!(!d.fire_if_due(t0 + ms(499)));
        assert!(d.fire_if_due(t0 + ms(500)));
        assert!(!d.fire_if_due(t0 + ms(900)));
    }

    #[test]
    fn test_debouncer_reschedule_pushes_deadline() {
        // Arrange
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.schedule(t0);

        // Act
        d.schedule(t0 + ms(400));

        // Assert
        assert!(!d.fire_if_due(t0 + ms(600)));
        assert!(d.fire_if_due(t0 + ms(900)));
    }

    #[test]
    fn test_short_query_is_too_short() {
        // Arrange
        let t0 = Instant::now();
        let mut state = SearchState::new();
        state.set_input(String::from("  ab  "), t0);

        // Act
        let decision = state.poll(t0 + SEARCH_DEBOUNCE);

        // Assert
        assert_eq!(decision, Some(SearchDecision::TooShort));
    }

    #[test]
    fn test_burst_yields_single_query_with_last_value() {
        // Arrange
        let t0 = Instant::now();
        let mut state = SearchState::new();

        // Act
        let mut decisions = Vec::new();
        for (i, ch) in "matrix".chars().enumerate() {
            let at = t0 + ms(100 * u64::try_from(i).unwrap_or(0));
            state.push(ch, at);
            decisions.extend(state.poll(at));
        }
        decisions.extend(state.poll(t0 + ms(600)));
        decisions.extend(state.poll(t0 + ms(1000)));
        decisions.extend(state.poll(t0 + ms(2000)));

        // Assert
        assert_eq!(
            decisions,
            vec![SearchDecision::Query {
                query: String::from("matrix"),
                seq: 1,
            }]
        );
    }

    #[test]
    fn test_newer_decision_makes_older_seq_stale() {
        // Arrange
        let t0 = Instant::now();
        let mut state = SearchState::new();
        state.set_input(String::from("break"), t0);
        let first = state.poll(t0 + SEARCH_DEBOUNCE);

        // Act
        state.set_input(String::from("breaking"), t0 + ms(600));
        let second = state.poll(t0 + ms(1200));

        // Assert
        assert!(matches!(first, Some(SearchDecision::Query { seq: 1, .. })));
        assert!(matches!(second, Some(SearchDecision::Query { seq: 2, .. })));
        assert!(!state.is_current(1));
        assert!(state.is_current(2));
    }

    #[test]
    fn test_too_short_also_invalidates_in_flight() {
        // Arrange
        let t0 = Instant::now();
        let mut state = SearchState::new();
        state.set_input(String::from("matrix"), t0);
        let _ = state.poll(t0 + SEARCH_DEBOUNCE);

        // Act
        state.set_input(String::from("ma"), t0 + ms(600));
        let _ = state.poll(t0 + ms(1200));

        // Assert
        assert!(!state.is_current(1));
    }
}
