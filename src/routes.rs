use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Students,
    Payments,
    Login,
    Register,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Students => "/students",
            Route::Payments => "/payments",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Unknown paths resolve to the login page.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        match normalized {
            "/" => Route::Dashboard,
            "/students" => Route::Students,
            "/payments" => Route::Payments,
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => Route::Login,
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a visit to `route` actually lands.
pub fn guard(route: Route, authenticated: bool) -> Route {
    if route.requires_auth() && !authenticated {
        Route::Login
    } else {
        route
    }
}

/// Current route, shared between pages and the HTTP client.
#[derive(Clone)]
pub struct Navigator {
    tx: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Route {
        *self.tx.borrow()
    }

    pub fn navigate(&self, route: Route) {
        let previous = self.tx.send_replace(route);
        if previous != route {
            debug!(from = %previous, to = %route, "navigate");
        }
    }

    /// Applies the guard and moves to wherever the visit lands.
    pub fn visit(&self, route: Route, authenticated: bool) -> Route {
        let landed = guard(route, authenticated);
        self.navigate(landed);
        landed
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}
