use crossbeam::channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ScopeKind, ALL_SCOPES};

static SCOPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9]([-A-Za-z0-9]*[A-Za-z0-9])?|_all)$").expect("invalid scope regex")
});

/// Holds the currently selected scope for the whole session.
///
/// The service is created once by the render worker and passed explicitly to
/// everything that reads or changes the selection.
#[derive(Debug)]
pub struct ScopeService {
    kind: ScopeKind,
    default_scope: String,
    current: String,
    subscribers: Vec<Sender<String>>,
}

impl ScopeService {
    pub fn new(kind: ScopeKind, default_scope: impl Into<String>) -> Self {
        Self {
            kind,
            default_scope: default_scope.into(),
            current: String::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn set_current(&mut self, scope: impl Into<String>) {
        self.current = scope.into();
    }

    /// Current scope, or the default one while nothing has been selected.
    pub fn current(&self) -> &str {
        if self.current.is_empty() {
            &self.default_scope
        } else {
            &self.current
        }
    }

    pub fn default_scope(&self) -> &str {
        &self.default_scope
    }

    pub fn is_valid(&self, scope: &str) -> bool {
        SCOPE_REGEX.is_match(scope)
    }

    pub fn is_all(&self, scope: &str) -> bool {
        scope == ALL_SCOPES
    }

    pub fn are_multiple_selected(&self) -> bool {
        self.current.is_empty() || self.current == ALL_SCOPES
    }

    /// Change notifications. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<String> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit_change(&mut self, scope: &str) {
        self.subscribers
            .retain(|tx| tx.send(scope.to_string()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn service() -> ScopeService {
        ScopeService::new(ScopeKind::Cluster, "cluster")
    }

    #[rstest]
    #[case("a")]
    #[case("ns1")]
    #[case("prodV4-1")]
    #[case("a-b-c")]
    #[case("A0-9z")]
    #[case("_all")]
    fn accepts_valid_scope_names(#[case] scope: &str) {
        assert!(service().is_valid(scope));
    }

    #[rstest]
    #[case("")]
    #[case("-a")]
    #[case("a-")]
    #[case("a_b")]
    #[case("ns.1")]
    #[case("_all_")]
    #[case("ns 1")]
    #[case("ns3!")]
    fn rejects_invalid_scope_names(#[case] scope: &str) {
        assert!(!service().is_valid(scope));
    }

    #[test]
    fn current_falls_back_to_default_when_unset() {
        let s = service();
        assert_eq!(s.current(), "cluster");
    }

    #[test]
    fn current_falls_back_to_default_when_set_to_empty() {
        let mut s = service();
        s.set_current("foo");
        s.set_current("");
        assert_eq!(s.current(), "cluster");
    }

    #[test]
    fn set_current_does_not_validate() {
        let mut s = service();
        s.set_current("not valid!");
        assert_eq!(s.current(), "not valid!");
    }

    #[test]
    fn only_the_sentinel_is_all() {
        let s = service();
        assert!(s.is_all(ALL_SCOPES));
        assert!(!s.is_all(""));
        assert!(!s.is_all("cluster"));
    }

    #[test]
    fn multiple_selected_when_unset_or_all() {
        let mut s = service();
        assert!(s.are_multiple_selected());

        s.set_current(ALL_SCOPES);
        assert!(s.are_multiple_selected());

        s.set_current("foo");
        assert!(!s.are_multiple_selected());
    }

    #[test]
    fn emit_change_notifies_live_subscribers_and_prunes_dropped() {
        let mut s = service();
        let rx = s.subscribe();
        let dropped = s.subscribe();
        drop(dropped);

        s.emit_change("foo");

        assert_eq!(rx.try_recv().unwrap(), "foo");
        assert_eq!(s.subscriber_count(), 1);
    }
}
