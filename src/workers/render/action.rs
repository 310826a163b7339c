use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, Sender};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    config::ScopeConfig,
    features::scope::{
        message::{ScopeMessage, ScopeRequest, ScopeResponse},
        selector::ScopeSelector,
        ScopeContext,
    },
    logger,
    message::{Message, UserEvent},
    notification::{NotificationSeverity, Notifications},
    route::{Navigation, Url, OVERVIEW_STATE},
    scope::ScopeService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    Continue,
    Quit,
}

/// Everything the render thread owns: router, scope service, selector and
/// the list of scopes shown in the body.
pub struct RenderState {
    pub ctx: ScopeContext,
    pub selector: ScopeSelector,
    body_cursor: usize,
    changes: Receiver<String>,
    tx: Sender<Message>,
}

impl RenderState {
    pub fn new(config: &ScopeConfig, notifications: Notifications, tx: Sender<Message>) -> Self {
        let mut scope = ScopeService::new(config.kind, config.default_scope());
        let changes = scope.subscribe();

        let ctx = ScopeContext::new(scope, Url::parse(&config.initial_url), notifications);

        let selector = ScopeSelector::new(
            config.kind,
            tx.clone(),
            Duration::from_millis(config.focus_delay_ms),
        );

        Self {
            ctx,
            selector,
            body_cursor: 0,
            changes,
            tx,
        }
    }

    pub fn init(&mut self) {
        self.selector.init(&mut self.ctx);
        self.forward_changes();
    }

    pub fn destroy(&mut self) {
        self.selector.destroy();
    }

    pub fn body_cursor(&self) -> usize {
        self.body_cursor
    }

    pub fn update(&mut self, msg: Message, now: Instant) -> RenderAction {
        let action = match msg {
            Message::User(UserEvent::Key(ev)) => self.on_key(ev, now),
            Message::User(UserEvent::FocusGained | UserEvent::FocusLost) => RenderAction::Continue,

            Message::Tick => {
                self.selector.tick(now);
                self.ctx.notifications.expire(now);
                RenderAction::Continue
            }

            Message::Scope(ScopeMessage::Response(res)) => {
                self.on_response(res);
                RenderAction::Continue
            }

            Message::Scope(ScopeMessage::Request(req)) => {
                logger!(debug, "Unexpected request on the render thread: {:?}", req);
                RenderAction::Continue
            }

            Message::Error(err) => {
                self.ctx.notifications.push_error(format!("{:?}", err));
                RenderAction::Continue
            }
        };

        self.forward_changes();

        action
    }

    fn on_response(&mut self, res: ScopeResponse) {
        match res {
            ScopeResponse::List { generation, result } => {
                self.selector
                    .on_list_fetched(&mut self.ctx, generation, result);

                let len = self.selector.scopes().len();
                self.body_cursor = self.body_cursor.min(len.saturating_sub(1));
            }

            ScopeResponse::Connection { cluster, result } => match result {
                Ok(conn) => self.ctx.notifications.push(
                    NotificationSeverity::Info,
                    format!("Connected to {} (version {})", cluster, conn.version),
                ),
                Err(err) => self
                    .ctx
                    .notifications
                    .push_error(format!("Failed to connect to {}: {}", cluster, err)),
            },
        }
    }

    fn on_key(&mut self, ev: KeyEvent, now: Instant) -> RenderAction {
        if ev.code == KeyCode::Char('c') && ev.modifiers == KeyModifiers::CONTROL {
            return RenderAction::Quit;
        }

        if self.selector.on_key(&mut self.ctx, &ev, now) {
            return RenderAction::Continue;
        }

        match ev.code {
            KeyCode::Char('q') => return RenderAction::Quit,

            KeyCode::Char('j') | KeyCode::Down => {
                let last = self.selector.scopes().len().saturating_sub(1);
                self.body_cursor = (self.body_cursor + 1).min(last);
            }

            KeyCode::Char('k') | KeyCode::Up => {
                self.body_cursor = self.body_cursor.saturating_sub(1);
            }

            KeyCode::Esc => self.ctx.notifications.clear(),

            KeyCode::Char('o') => {
                self.ctx.router.navigate(Navigation::to(OVERVIEW_STATE));
                self.selector.process_router_events(&mut self.ctx);
            }

            KeyCode::Enter => {
                if let Some(scope) = self.selector.scopes().get(self.body_cursor).cloned() {
                    let path = format!("{}/{}", self.selector.kind(), scope);

                    self.ctx.router.navigate(Navigation::to(&path));
                    self.selector.process_router_events(&mut self.ctx);
                }
            }

            _ => {}
        }

        RenderAction::Continue
    }

    /// Sends committed scope changes to the scope worker.
    fn forward_changes(&self) {
        for scope in self.changes.try_iter() {
            if let Err(err) = self.tx.send(ScopeRequest::Set(scope).into()) {
                logger!(error, "Failed to send ScopeRequest::Set: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use crossbeam::channel::unbounded;
    use pretty_assertions::assert_eq;

    use crate::features::scope::{connection::ClusterConnection, provider::ScopeList};

    use super::*;

    fn state(url: &str) -> (RenderState, Receiver<Message>) {
        let (tx, rx) = unbounded();

        let config = ScopeConfig {
            initial_url: url.to_string(),
            ..Default::default()
        };

        let mut state = RenderState::new(&config, Notifications::default(), tx);
        state.init();

        (state, rx)
    }

    fn set_requests(rx: &Receiver<Message>) -> Vec<String> {
        rx.try_iter()
            .filter_map(|m| match m {
                Message::Scope(ScopeMessage::Request(ScopeRequest::Set(scope))) => Some(scope),
                _ => None,
            })
            .collect()
    }

    fn key(code: KeyCode) -> Message {
        UserEvent::from(code).into()
    }

    fn list(state: &mut RenderState, items: &[&str]) {
        let generation = state.selector.generation();

        state.update(
            ScopeResponse::List {
                generation,
                result: Ok(ScopeList::new(
                    items.iter().map(ToString::to_string).collect(),
                )),
            }
            .into(),
            Instant::now(),
        );
    }

    #[test]
    fn committed_scope_is_forwarded_to_worker() {
        let (_state, rx) = state("overview?cluster=c1");

        assert_eq!(set_requests(&rx), vec!["c1"]);
    }

    #[test]
    fn default_scope_is_not_forwarded() {
        let (state, rx) = state("overview");

        assert_eq!(
            state.ctx.router.url().to_string(),
            "/overview?cluster=cluster&namespace=default"
        );
        assert!(set_requests(&rx).is_empty());
    }

    #[test]
    fn enter_on_body_opens_detail_route() {
        let (mut state, rx) = state("overview?cluster=c1");
        list(&mut state, &["c1", "c2"]);

        state.update(key(KeyCode::Down), Instant::now());
        state.update(key(KeyCode::Enter), Instant::now());

        assert_eq!(state.ctx.router.url().segments, vec!["cluster", "c2"]);
        assert!(state.selector.dialog().is_some());

        state.update(UserEvent::from('y').into(), Instant::now());

        assert_eq!(state.ctx.scope.current(), "c2");
        assert_eq!(set_requests(&rx), vec!["c1", "c2"]);
    }

    #[test]
    fn overview_key_leaves_detail_route() {
        let (mut state, _rx) = state("cluster/c1?cluster=c1");

        state.update(UserEvent::from('o').into(), Instant::now());

        assert_eq!(state.ctx.router.url().to_string(), "/overview?cluster=c1");
    }

    #[test]
    fn connection_results_are_notified() {
        let (mut state, _rx) = state("overview?cluster=c1");

        state.update(
            ScopeResponse::Connection {
                cluster: "c1".into(),
                result: Ok(ClusterConnection {
                    cluster: "c1".into(),
                    server_url: None,
                    version: "v1.30.0".into(),
                }),
            }
            .into(),
            Instant::now(),
        );

        assert_eq!(
            state.ctx.notifications.latest().map(|n| n.message.clone()),
            Some("Connected to c1 (version v1.30.0)".to_string())
        );

        state.update(
            ScopeResponse::Connection {
                cluster: "c2".into(),
                result: Err(anyhow!("not found")),
            }
            .into(),
            Instant::now(),
        );

        let latest = state.ctx.notifications.latest().unwrap();
        assert_eq!(latest.severity, NotificationSeverity::Error);
        assert_eq!(latest.message, "Failed to connect to c2: not found");
    }

    #[test]
    fn notifications_expire_on_tick_and_esc_dismisses() {
        let (mut state, _rx) = state("overview?cluster=c1");

        state.update(Message::Error(anyhow!("boom")), Instant::now());
        state.update(Message::Tick, Instant::now());
        assert_eq!(state.ctx.notifications.len(), 1);

        state.update(Message::Tick, Instant::now() + Duration::from_secs(60));
        assert!(state.ctx.notifications.is_empty());

        state.update(Message::Error(anyhow!("boom")), Instant::now());
        state.update(key(KeyCode::Esc), Instant::now());
        assert!(state.ctx.notifications.is_empty());
    }

    #[test]
    fn quit_is_ignored_while_selector_is_open() {
        let (mut state, _rx) = state("overview?cluster=c1");

        state.update(UserEvent::from('s').into(), Instant::now());
        assert!(state.selector.is_opened());

        assert_eq!(
            state.update(UserEvent::from('q').into(), Instant::now()),
            RenderAction::Continue
        );

        state.update(key(KeyCode::Esc), Instant::now());
        assert_eq!(
            state.update(UserEvent::from('q').into(), Instant::now()),
            RenderAction::Quit
        );
    }
}
