//! Frame-clock timers: one-shot cues and fixed-interval gates.

/// One-shot events due at a frame-clock time. Scheduling an event that is
/// already pending replaces it, so a cue never fires twice.
#[derive(Clone, Debug)]
pub struct Timeline<E> {
    pending: Vec<(f64, E)>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<E: PartialEq> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at_ms: f64, event: E) {
        self.cancel(&event);
        self.pending.push((at_ms, event));
    }

    pub fn cancel(&mut self, event: &E) {
        self.pending.retain(|(_, e)| e != event);
    }

    pub fn is_pending(&self, event: &E) -> bool {
        self.pending.iter().any(|(_, e)| e == event)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every event due at or before `now_ms`, earliest
    /// first. Ties keep scheduling order.
    pub fn advance(&mut self, now_ms: f64) -> Vec<E> {
        let (mut due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|(at, _)| *at <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, e)| e).collect()
    }
}

/// Lets an action through at most once per interval.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Throttle {
    last_ms: Option<f64>,
}

impl Throttle {
    /// `true` when more than `interval_ms` has passed since the last pass
    /// (always on the first call); records `now_ms` as the last pass.
    pub fn ready(&mut self, now_ms: f64, interval_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last <= interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Cue {
        A,
        B,
    }

    #[test]
    fn fires_in_due_order() {
        let mut t = Timeline::new();
        t.schedule(300.0, Cue::B);
        t.schedule(100.0, Cue::A);
        assert!(t.advance(50.0).is_empty());
        assert_eq!(t.advance(400.0), vec![Cue::A, Cue::B]);
        assert!(t.advance(1e9).is_empty());
    }

    #[test]
    fn rescheduling_replaces_the_pending_cue() {
        let mut t = Timeline::new();
        t.schedule(100.0, Cue::A);
        t.schedule(500.0, Cue::A);
        assert!(t.advance(200.0).is_empty());
        assert!(t.is_pending(&Cue::A));
        assert_eq!(t.advance(500.0), vec![Cue::A]);
    }

    #[test]
    fn cancelled_cues_never_fire() {
        let mut t = Timeline::new();
        t.schedule(100.0, Cue::A);
        t.schedule(100.0, Cue::B);
        t.cancel(&Cue::A);
        assert_eq!(t.advance(100.0), vec![Cue::B]);
    }

    #[test]
    fn throttle_gates_by_interval() {
        let mut th = Throttle::default();
        assert!(th.ready(0.0, 33.0));
        assert!(!th.ready(33.0, 33.0));
        assert!(th.ready(34.0, 33.0));
        th.reset();
        assert!(th.ready(35.0, 33.0));
    }
}
