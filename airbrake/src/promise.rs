use serde_json::Value;

/// Outcome of a configuration check.
///
/// A promise is a settle-once result cell: it starts out pending and moves to
/// resolved or rejected exactly once. Settlement attempts after that are
/// ignored, so the first terminal state always wins. There are no callbacks
/// and no scheduling involved; this only records how a check turned out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Promise {
    state: State,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum State {
    #[default]
    Pending,
    Resolved(Option<Value>),
    Rejected(Option<String>),
}

impl Promise {
    pub fn new() -> Self {
        Promise {
            state: State::Pending,
        }
    }

    /// Settles the promise as resolved, keeping `value` as the payload.
    /// Does nothing if the promise has already settled.
    pub fn resolve(&mut self, value: Option<Value>) -> &mut Self {
        if self.is_pending() {
            self.state = State::Resolved(value);
        }
        self
    }

    /// Settles the promise as rejected with an optional human-readable
    /// reason. Does nothing if the promise has already settled.
    pub fn reject(&mut self, reason: Option<String>) -> &mut Self {
        if self.is_pending() {
            self.state = State::Rejected(reason);
        }
        self
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, State::Resolved(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.state, State::Rejected(_))
    }

    /// Resolution payload, if the promise resolved with one.
    pub fn value(&self) -> Option<&Value> {
        match &self.state {
            State::Resolved(value) => value.as_ref(),
            _ => None,
        }
    }

    /// Rejection reason, if the promise was rejected with one.
    pub fn reason(&self) -> Option<&str> {
        match &self.state {
            State::Rejected(reason) => reason.as_deref(),
            _ => None,
        }
    }
}
