use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam::channel::Sender;
use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::{
    logger,
    message::Message,
    route::{Navigation, QueryParams, RouterEvent, Subscription, Topic, OVERVIEW_STATE},
    scope::{ScopeKind, ALL_SCOPES, DEFAULT_NAMESPACE, NAMESPACE_QUERY_KEY},
};

use super::{
    dialog::{ChangeConfirmDialog, ChangeDialogData},
    message::ScopeRequest,
    provider::ScopeList,
    ScopeContext,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    #[default]
    Idle,
    FetchingList {
        generation: u64,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    #[default]
    Unfocused,
    /// Focus is given once the deadline passes.
    Pending(Instant),
    Focused,
}

/// Dropdown for switching the current scope.
///
/// The committed scope always travels through the url: changing it means
/// navigating with the scope query parameter, and the query parameter
/// handler updates the scope service.
pub struct ScopeSelector {
    kind: ScopeKind,
    tx: Sender<Message>,
    scopes: Vec<String>,
    input: String,
    selected: String,
    resource_param: Option<String>,
    state: SelectorState,
    opened: bool,
    cursor: usize,
    /// Set once Up/Down moved the cursor since the input last changed.
    cursor_moved: bool,
    focus: InputFocus,
    focus_delay: Duration,
    dialog: Option<ChangeConfirmDialog>,
    generation: u64,
    matcher: SkimMatcherV2,
    query_subscription: Option<Subscription>,
    navigation_subscription: Option<Subscription>,
}

impl ScopeSelector {
    pub fn new(kind: ScopeKind, tx: Sender<Message>, focus_delay: Duration) -> Self {
        Self {
            kind,
            tx,
            scopes: Vec::new(),
            input: String::new(),
            selected: String::new(),
            resource_param: None,
            state: SelectorState::default(),
            opened: false,
            cursor: 0,
            cursor_moved: false,
            focus: InputFocus::default(),
            focus_delay,
            dialog: None,
            generation: 0,
            matcher: SkimMatcherV2::default(),
            query_subscription: None,
            navigation_subscription: None,
        }
    }

    pub fn init(&mut self, ctx: &mut ScopeContext) {
        self.query_subscription = Some(ctx.router.subscribe(Topic::QueryParams));
        self.navigation_subscription = Some(ctx.router.subscribe(Topic::NavigationEnd));

        self.resource_param = self.current_resource_param(ctx);
        self.selected = ctx.scope.current().to_string();

        self.request_list();

        self.process_router_events(ctx);

        // the first route never publishes a navigation end to new subscribers
        self.on_navigation_end(ctx);
    }

    /// Releases the router subscriptions.
    pub fn destroy(&mut self) {
        self.query_subscription = None;
        self.navigation_subscription = None;
    }

    /// Handles everything the router published since the last call.
    /// Query params are handled before navigation ends of the same round.
    pub fn process_router_events(&mut self, ctx: &mut ScopeContext) {
        loop {
            let events: Vec<RouterEvent> = self
                .query_subscription
                .iter()
                .chain(self.navigation_subscription.iter())
                .flat_map(|sub| sub.try_iter())
                .collect();

            if events.is_empty() {
                break;
            }

            for ev in events {
                match ev {
                    RouterEvent::QueryParams(query) => self.on_query_params(ctx, &query),
                    RouterEvent::NavigationEnd(_) => self.on_navigation_end(ctx),
                }
            }
        }
    }

    fn on_query_params(&mut self, ctx: &mut ScopeContext, query: &QueryParams) {
        let Some(scope) = query
            .get(self.kind.query_key())
            .filter(|scope| !scope.is_empty())
            .cloned()
        else {
            let default_scope = ctx.scope.default_scope().to_string();
            ctx.router
                .navigate(self.scope_navigation(Navigation::current(), &default_scope));
            return;
        };

        if ctx.scope.current() == scope {
            return;
        }

        logger!(info, "{} changed to {}", self.kind, scope);

        ctx.scope.set_current(scope.clone());
        ctx.scope.emit_change(&scope);
        self.selected = scope;
    }

    fn on_navigation_end(&mut self, ctx: &mut ScopeContext) {
        self.resource_param = self.current_resource_param(ctx);

        let Some(param) = &self.resource_param else {
            return;
        };

        if param != ctx.scope.current() {
            self.dialog = Some(ChangeConfirmDialog::new(
                self.kind,
                ChangeDialogData {
                    current: self.selected.clone(),
                    new: param.clone(),
                },
            ));
        }
    }

    pub fn on_dialog_closed(&mut self, ctx: &mut ScopeContext, confirmed: bool) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };

        if confirmed {
            self.selected = self
                .current_resource_param(ctx)
                .unwrap_or_else(|| dialog.data().new.clone());

            let nav = self.scope_navigation(Navigation::current(), &self.selected);
            ctx.router.navigate(nav);
        } else {
            ctx.router.go_to_previous_state(OVERVIEW_STATE);
        }

        self.process_router_events(ctx);
    }

    pub fn toggle(&mut self, ctx: &mut ScopeContext, opened: bool, now: Instant) {
        if opened {
            self.opened = true;
            self.cursor = 0;
            self.cursor_moved = false;
            self.focus = InputFocus::Pending(now + self.focus_delay);
            self.request_list();
        } else {
            self.close(ctx);
        }
    }

    fn close(&mut self, ctx: &mut ScopeContext) {
        self.opened = false;
        self.focus = InputFocus::Unfocused;

        let scope = self.selected.clone();
        self.change_scope(ctx, &scope);
    }

    /// Commits the typed text as the selected scope.
    pub fn select_input(&mut self, ctx: &mut ScopeContext) {
        if self.input.is_empty() {
            return;
        }

        self.selected = self.input.clone();
        self.close(ctx);
    }

    pub fn select_highlighted(&mut self, ctx: &mut ScopeContext) {
        let Some(scope) = self.filtered_scopes().get(self.cursor).cloned() else {
            return;
        };

        self.selected = scope;
        self.close(ctx);
    }

    /// Gives focus to the input once the focus delay has passed.
    pub fn tick(&mut self, now: Instant) {
        if let InputFocus::Pending(deadline) = self.focus {
            if deadline <= now {
                self.focus = InputFocus::Focused;
            }
        }
    }

    fn change_scope(&mut self, ctx: &mut ScopeContext, scope: &str) {
        self.input.clear();

        let nav = if self.resource_param.is_some() {
            // leave the detail view of the old scope
            Navigation::to(OVERVIEW_STATE)
        } else {
            Navigation::current()
        };

        ctx.router.navigate(self.scope_navigation(nav, scope));

        self.process_router_events(ctx);
    }

    fn scope_navigation(&self, nav: Navigation, scope: &str) -> Navigation {
        let nav = nav.query_param(self.kind.query_key(), scope);

        if self.kind.resets_namespace() {
            nav.query_param(NAMESPACE_QUERY_KEY, DEFAULT_NAMESPACE)
        } else {
            nav
        }
    }

    fn current_resource_param(&self, ctx: &ScopeContext) -> Option<String> {
        ctx.router
            .activated_route()
            .param(self.kind.resource_param())
            .map(ToString::to_string)
    }

    pub fn request_list(&mut self) {
        self.generation += 1;
        self.state = SelectorState::FetchingList {
            generation: self.generation,
        };

        let req = ScopeRequest::List {
            generation: self.generation,
        };

        if let Err(err) = self.tx.send(req.into()) {
            logger!(error, "Failed to send ScopeRequest::List: {}", err);
        }
    }

    pub fn on_list_fetched(
        &mut self,
        ctx: &mut ScopeContext,
        generation: u64,
        result: Result<ScopeList>,
    ) {
        if generation != self.generation {
            logger!(
                debug,
                "Discard scope list {} (latest {})",
                generation,
                self.generation
            );
            return;
        }

        self.state = SelectorState::Idle;

        match result {
            Ok(ScopeList { items, errors }) => {
                self.scopes = items;

                for err in errors {
                    ctx.notifications.push_error(err);
                }
            }
            Err(err) => {
                logger!(error, "Get {} list failed: {:?}", self.kind, err);
            }
        }

        self.on_list_loaded(ctx);
    }

    /// Falls back to the default scope when the selected one is neither
    /// listed nor valid.
    fn on_list_loaded(&mut self, ctx: &mut ScopeContext) {
        let target = &self.selected;

        let scope = if !target.is_empty()
            && (self.scopes.contains(target) || ctx.scope.is_valid(target))
        {
            target.clone()
        } else {
            ctx.scope.default_scope().to_string()
        };

        if scope != self.selected {
            if !target.is_empty() {
                ctx.notifications.push_warning(format!(
                    "{} {} is not available, switched to {}",
                    self.kind.title(),
                    target,
                    scope
                ));
            }

            self.change_scope(ctx, &scope);
        }
    }

    pub fn format(&self, scope: &str) -> String {
        if scope == ALL_SCOPES {
            self.kind.all_label().to_string()
        } else {
            scope.to_string()
        }
    }

    /// "All" entry followed by the fetched scopes, narrowed by the input.
    pub fn filtered_scopes(&self) -> Vec<String> {
        std::iter::once(ALL_SCOPES.to_string())
            .chain(self.scopes.iter().cloned())
            .filter(|scope| {
                self.input.is_empty()
                    || self
                        .matcher
                        .fuzzy_match(&self.format(scope), &self.input)
                        .is_some()
            })
            .collect()
    }

    /// Returns true when the key was consumed.
    pub fn on_key(&mut self, ctx: &mut ScopeContext, ev: &KeyEvent, now: Instant) -> bool {
        if let Some(dialog) = &self.dialog {
            if let Some(confirmed) = dialog.on_key(ev) {
                self.on_dialog_closed(ctx, confirmed);
            }
            return true;
        }

        if !self.opened {
            if ev.code == KeyCode::Char('s') {
                self.toggle(ctx, true, now);
                return true;
            }
            return false;
        }

        match ev.code {
            KeyCode::Esc => self.toggle(ctx, false, now),
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                self.cursor_moved = true;
            }
            KeyCode::Down => {
                let last = self.filtered_scopes().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
                self.cursor_moved = true;
            }
            // typed text wins unless an entry was picked with the arrows
            KeyCode::Enter => {
                if self.input.is_empty() || self.cursor_moved {
                    self.select_highlighted(ctx);
                } else {
                    self.select_input(ctx);
                }
            }
            KeyCode::Backspace if self.focus == InputFocus::Focused => {
                self.input.pop();
                self.cursor = 0;
                self.cursor_moved = false;
            }
            KeyCode::Char(c) if self.focus == InputFocus::Focused => {
                self.input.push(c);
                self.cursor = 0;
                self.cursor_moved = false;
            }
            _ => {}
        }

        true
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn resource_param(&self) -> Option<&str> {
        self.resource_param.as_deref()
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focus(&self) -> InputFocus {
        self.focus
    }

    pub fn dialog(&self) -> Option<&ChangeConfirmDialog> {
        self.dialog.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
