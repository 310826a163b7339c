use crate::{
    notification::Notifications,
    route::{RouteTable, Router, Url},
    scope::ScopeService,
};

/// Application-scoped state shared by the scope widgets of the render worker.
///
/// Created once at render start and passed explicitly; dropped with the render loop.
#[derive(Debug)]
pub struct ScopeContext {
    pub router: Router,
    pub scope: ScopeService,
    pub notifications: Notifications,
}

impl ScopeContext {
    pub fn new(scope: ScopeService, initial_url: Url, notifications: Notifications) -> Self {
        Self {
            router: Router::new(RouteTable::default(), initial_url),
            scope,
            notifications,
        }
    }
}
