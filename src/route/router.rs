use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::{Rc, Weak},
};

use crossbeam::channel::{unbounded, Receiver, Sender, TryIter};

use crate::logger;

use super::{ActivatedRoute, QueryParams, RouteTable, Url};

/// Oldest urls are dropped beyond this many entries.
pub const MAX_HISTORY: usize = 64;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum QueryParamsHandling {
    /// Keep the current query and overwrite the given keys.
    #[default]
    Merge,
    /// Keep the current query and ignore the given one.
    Preserve,
    /// Use only the given query.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Stay on the current path.
    Current,
    Path(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    target: NavigationTarget,
    query: QueryParams,
    handling: QueryParamsHandling,
}

impl Navigation {
    pub fn current() -> Self {
        Self {
            target: NavigationTarget::Current,
            query: QueryParams::new(),
            handling: QueryParamsHandling::default(),
        }
    }

    pub fn to(path: &str) -> Self {
        Self {
            target: NavigationTarget::Path(Url::parse(path).segments),
            ..Self::current()
        }
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn handling(mut self, handling: QueryParamsHandling) -> Self {
        self.handling = handling;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    QueryParams,
    NavigationEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    QueryParams(QueryParams),
    NavigationEnd(Url),
}

impl RouterEvent {
    fn topic(&self) -> Topic {
        match self {
            Self::QueryParams(_) => Topic::QueryParams,
            Self::NavigationEnd(_) => Topic::NavigationEnd,
        }
    }
}

#[derive(Debug, Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Topic, Sender<RouterEvent>)>,
}

/// Handle of a router subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: Receiver<RouterEvent>,
    registry: Weak<RefCell<Subscribers>>,
}

impl Subscription {
    pub fn try_iter(&self) -> TryIter<'_, RouterEvent> {
        self.rx.try_iter()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .entries
                .retain(|(id, _, _)| *id != self.id);
        }
    }
}

/// In-process router: current url, navigation history and event subscribers.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    current: Url,
    history: VecDeque<Url>,
    subscribers: Rc<RefCell<Subscribers>>,
}

impl Router {
    pub fn new(table: RouteTable, initial: Url) -> Self {
        Self {
            table,
            current: initial,
            history: VecDeque::new(),
            subscribers: Rc::default(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.current
    }

    pub fn query(&self) -> &QueryParams {
        &self.current.query
    }

    /// Deepest route activated by the current url.
    pub fn activated_route(&self) -> ActivatedRoute {
        self.table.resolve(&self.current)
    }

    pub fn previous_url(&self) -> Option<&Url> {
        self.history.back()
    }

    /// Query params subscribers immediately receive the current query.
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let (tx, rx) = unbounded();

        if topic == Topic::QueryParams {
            // unbounded channel with a live receiver
            let _ = tx.send(RouterEvent::QueryParams(self.current.query.clone()));
        }

        let mut subscribers = self.subscribers.borrow_mut();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.push((id, topic, tx));

        Subscription {
            id,
            rx,
            registry: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }

    /// Returns false when the resulting url equals the current one.
    pub fn navigate(&mut self, navigation: Navigation) -> bool {
        let Navigation {
            target,
            query,
            handling,
        } = navigation;

        let segments = match target {
            NavigationTarget::Current => self.current.segments.clone(),
            NavigationTarget::Path(segments) => segments,
        };

        let query = match handling {
            QueryParamsHandling::Merge => {
                let mut merged = self.current.query.clone();
                merged.extend(query);
                merged
            }
            QueryParamsHandling::Preserve => self.current.query.clone(),
            QueryParamsHandling::Replace => query,
        };

        self.navigate_by_url(Url { segments, query }, true)
    }

    /// Goes back to the previously visited url, or to `default_state` keeping
    /// the current query when there is no history.
    pub fn go_to_previous_state(&mut self, default_state: &str) -> bool {
        match self.history.pop_back() {
            Some(previous) => self.navigate_by_url(previous, false),
            None => self.navigate(
                Navigation::to(default_state).handling(QueryParamsHandling::Preserve),
            ),
        }
    }

    fn navigate_by_url(&mut self, url: Url, record_history: bool) -> bool {
        if url == self.current {
            logger!(debug, "Navigation to the current url ignored: {}", url);
            return false;
        }

        logger!(info, "Navigate {} -> {}", self.current, url);

        let previous = std::mem::replace(&mut self.current, url);
        let query_changed = previous.query != self.current.query;

        if record_history {
            if self.history.len() == MAX_HISTORY {
                self.history.pop_front();
            }
            self.history.push_back(previous);
        }

        if query_changed {
            self.publish(RouterEvent::QueryParams(self.current.query.clone()));
        }

        self.publish(RouterEvent::NavigationEnd(self.current.clone()));

        true
    }

    fn publish(&self, event: RouterEvent) {
        let topic = event.topic();

        self.subscribers
            .borrow_mut()
            .entries
            .retain(|(_, t, tx)| *t != topic || tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn router(url: &str) -> Router {
        Router::new(RouteTable::default(), Url::parse(url))
    }

    #[test]
    fn merge_keeps_other_query_params() {
        let mut router = router("overview?cluster=a&filter=x");

        router.navigate(Navigation::current().query_param("cluster", "b"));

        assert_eq!(router.url().to_string(), "/overview?cluster=b&filter=x");
    }

    #[test]
    fn replace_drops_other_query_params() {
        let mut router = router("overview?cluster=a&filter=x");

        router.navigate(
            Navigation::to("cluster/b")
                .query_param("cluster", "b")
                .handling(QueryParamsHandling::Replace),
        );

        assert_eq!(router.url().to_string(), "/cluster/b?cluster=b");
    }

    #[test]
    fn same_url_navigation_is_ignored() {
        let mut router = router("overview?cluster=a");
        let nav = router.subscribe(Topic::NavigationEnd);

        assert!(!router.navigate(Navigation::current().query_param("cluster", "a")));
        assert_eq!(nav.try_iter().count(), 0);
        assert_eq!(router.previous_url(), None);
    }

    #[test]
    fn query_params_subscription_replays_current_query() {
        let router = router("overview?cluster=a");
        let sub = router.subscribe(Topic::QueryParams);

        let events: Vec<RouterEvent> = sub.try_iter().collect();

        assert_eq!(
            events,
            vec![RouterEvent::QueryParams(QueryParams::from([(
                "cluster".to_string(),
                "a".to_string()
            )]))]
        );
    }

    #[test]
    fn path_only_navigation_emits_navigation_end_only() {
        let mut router = router("overview?cluster=a");
        let query = router.subscribe(Topic::QueryParams);
        let nav = router.subscribe(Topic::NavigationEnd);
        query.try_iter().for_each(drop);

        router.navigate(Navigation::to("cluster/a"));

        assert_eq!(query.try_iter().count(), 0);
        assert_eq!(
            nav.try_iter().collect::<Vec<_>>(),
            vec![RouterEvent::NavigationEnd(Url::parse("cluster/a?cluster=a"))]
        );
        assert_eq!(
            router.activated_route().param("resourceCluster"),
            Some("a")
        );
    }

    #[test]
    fn go_to_previous_state_uses_history() {
        let mut router = router("overview?cluster=a");
        router.navigate(Navigation::to("cluster/b"));

        router.go_to_previous_state("overview");

        assert_eq!(router.url().to_string(), "/overview?cluster=a");
        assert_eq!(router.previous_url(), None);
    }

    #[test]
    fn history_is_capped() {
        let mut router = router("overview");

        for i in 0..MAX_HISTORY + 10 {
            router.navigate(Navigation::to(&format!("cluster/c{}", i)));
        }

        let mut back = 0;
        while router.previous_url().is_some() {
            router.go_to_previous_state("overview");
            back += 1;
        }

        assert_eq!(back, MAX_HISTORY);
        assert_eq!(router.url().to_string(), "/cluster/c9");
    }

    #[test]
    fn go_to_previous_state_falls_back_to_default_state() {
        let mut router = router("cluster/b?cluster=a");

        router.go_to_previous_state("overview");

        assert_eq!(router.url().to_string(), "/overview?cluster=a");
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let router = router("overview");
        let sub = router.subscribe(Topic::NavigationEnd);
        assert_eq!(router.subscriber_count(), 1);

        drop(sub);

        assert_eq!(router.subscriber_count(), 0);
    }
}
