//! Router core - route storage, matching and dispatch.

use std::fmt;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, trace, warn};

use super::options::RouterOptions;
use crate::lexer::Lexer;
use crate::route::{Normalizer, Pattern, Route, RouteId};
use crate::runtime_config::RuntimeConfig;
use crate::signal::Signal;

/// Parses slower than this are logged at `warn`
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// Listener for the router-wide `match` notification: `(extra args, request, result)`
pub type RoutedListener = dyn for<'r> FnMut(&[Value], &str, &MatchResult<'r>);

/// Listener for the router-wide `default` notification: `(extra args, request)`
pub type DefaultListener = dyn FnMut(&[Value], &str);

/// One matched route of a parse call
#[derive(Debug)]
pub struct MatchResult<'a> {
    /// The route that matched
    pub route: &'a Route,
    /// Arguments delivered to the route's listeners (normalized if a normalizer applies)
    pub params: Vec<Option<String>>,
    /// True only for the highest-priority result of the parse
    pub is_first: bool,
}

/// Ordered collection of routes with match/pass/default dispatch
///
/// Routes are stored by ascending priority and consulted from the highest
/// priority down. Among equal priorities the earliest registered route is
/// consulted first.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use routecast::Router;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut router = Router::new();
///
/// let sink = Rc::clone(&seen);
/// router.add("/news/{id}").on_match(move |_, params| {
///     sink.borrow_mut().push(params[0].clone().unwrap_or_default());
/// });
///
/// router.parse("/news/42");
/// assert_eq!(*seen.borrow(), vec!["42"]);
/// ```
pub struct Router {
    /// Ascending priority
    routes: Vec<Route>,
    /// Routes that matched on the last parse that produced a result
    prev_routes: Vec<RouteId>,
    next_id: u64,
    lexer: Lexer,
    normalize_fn: Option<Normalizer>,
    routed: Signal<RoutedListener>,
    bypassed: Signal<DefaultListener>,
}

impl Router {
    /// Router with a loose-slash lexer and no default normalizer
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    #[must_use]
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            routes: Vec::new(),
            prev_routes: Vec::new(),
            next_id: 0,
            lexer: options.lexer.unwrap_or_default(),
            normalize_fn: options.normalize_fn,
            routed: Signal::new(),
            bypassed: Signal::new(),
        }
    }

    /// Router whose lexer follows [`RuntimeConfig::from_env`]
    #[must_use]
    pub fn from_env() -> Self {
        let config = RuntimeConfig::from_env();
        Self::with_options(RouterOptions::new().lexer(Lexer::new(config.slash_mode)))
    }

    /// The compiler used for every template registered on this router
    #[must_use]
    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    /// Register a route with priority 0
    pub fn add(&mut self, pattern: impl Into<Pattern>) -> &mut Route {
        self.add_with_priority(pattern, 0)
    }

    /// Register a route; higher priorities are consulted first
    pub fn add_with_priority(&mut self, pattern: impl Into<Pattern>, priority: i32) -> &mut Route {
        let id = RouteId(self.next_id);
        self.next_id += 1;

        let route = Route::new(id, pattern.into(), priority, self.lexer);

        // after the last route with a strictly lower priority
        let position = self
            .routes
            .iter()
            .rposition(|r| r.priority() < priority)
            .map_or(0, |i| i + 1);

        debug!(
            route_id = %id,
            pattern = %route.pattern(),
            priority,
            position,
            routes_count = self.routes.len() + 1,
            "Route registered"
        );

        self.routes.insert(position, route);
        &mut self.routes[position]
    }

    /// Unregister a route and hand it back
    pub fn remove(&mut self, id: RouteId) -> Option<Route> {
        let index = self.routes.iter().position(|r| r.id() == id)?;
        debug!(route_id = %id, "Route removed");
        Some(self.routes.remove(index))
    }

    pub fn remove_all(&mut self) {
        debug!(routes_count = self.routes.len(), "All routes removed");
        self.routes.clear();
        self.prev_routes.clear();
    }

    #[must_use]
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| r.id() == id)
    }

    pub fn route_mut(&mut self, id: RouteId) -> Option<&mut Route> {
        self.routes.iter_mut().find(|r| r.id() == id)
    }

    /// Routes in the order `parse` consults them
    pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        self.routes.iter().rev()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Listen for every matched route: `(extra args, request, result)`
    pub fn on_match<F>(&mut self, listener: F) -> &mut Self
    where
        F: for<'r> FnMut(&[Value], &str, &MatchResult<'r>) + 'static,
    {
        self.routed.add(Box::new(listener));
        self
    }

    pub fn on_match_once<F>(&mut self, listener: F) -> &mut Self
    where
        F: for<'r> FnMut(&[Value], &str, &MatchResult<'r>) + 'static,
    {
        self.routed.add_once(Box::new(listener));
        self
    }

    /// Listen for requests no route matched: `(extra args, request)`
    pub fn on_default<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&[Value], &str) + 'static,
    {
        self.bypassed.add(Box::new(listener));
        self
    }

    pub fn on_default_once<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&[Value], &str) + 'static,
    {
        self.bypassed.add_once(Box::new(listener));
        self
    }

    /// Drop the router-wide listeners; route listeners are untouched
    pub fn clear_listeners(&mut self) -> &mut Self {
        self.routed.clear();
        self.bypassed.clear();
        self
    }

    /// Dispatch `request` with no extra arguments
    pub fn parse<'a>(&mut self, request: impl Into<Option<&'a str>>) {
        self.parse_with(request, &[]);
    }

    /// Dispatch `request`, prefixing every notification with `extra`
    ///
    /// 1. Collect: the highest-priority matching route, plus every greedy route
    ///    below it that also matches.
    /// 2. If nothing matched, fire `default` and stop. The memory of the
    ///    previous result is left alone.
    /// 3. Fire `pass` on every route of the previous result.
    /// 4. Remember the new result.
    /// 5. For each result, highest priority first: the route's `match`, then
    ///    the router's `match`.
    ///
    /// Listeners run synchronously; a panicking listener aborts the rest of the call.
    pub fn parse_with<'a>(&mut self, request: impl Into<Option<&'a str>>, extra: &[Value]) {
        let request = request.into().unwrap_or_default();

        debug!(
            request = %request,
            routes_count = self.routes.len(),
            "Route match attempt"
        );

        let match_start = Instant::now();
        let matched = self.matched_routes(request);
        let match_duration = match_start.elapsed();

        if match_duration > SLOW_MATCH_THRESHOLD {
            warn!(
                request = %request,
                routes_count = self.routes.len(),
                matched_count = matched.len(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        }

        if matched.is_empty() {
            debug!(
                request = %request,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
            self.bypassed.dispatch(|listener| listener(extra, request));
            return;
        }

        self.notify_prev_routes(request);
        self.prev_routes = matched
            .iter()
            .map(|(index, _)| self.routes[*index].id())
            .collect();

        let Self { routes, routed, .. } = self;
        for (position, (index, params)) in matched.into_iter().enumerate() {
            routes[index].dispatch_match(extra, &params);

            let result = MatchResult {
                route: &routes[index],
                params,
                is_first: position == 0,
            };
            debug!(
                request = %request,
                route_id = %result.route.id(),
                route_pattern = %result.route.pattern(),
                params = ?result.params,
                is_first = result.is_first,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
            routed.dispatch(|listener| listener(extra, request, &result));
        }
    }

    /// Indices and listener arguments of the routes matching `request`, highest priority first
    fn matched_routes(&self, request: &str) -> Vec<(usize, Vec<Option<String>>)> {
        let mut matched = Vec::new();
        for (index, route) in self.routes.iter().enumerate().rev() {
            if (matched.is_empty() || route.is_greedy()) && route.matches(request) {
                matched.push((index, route.arguments(request, self.normalize_fn.as_ref())));
            }
        }
        matched
    }

    /// The memory is left in place; a panicking `pass` listener keeps every
    /// previous route pending for the next parse.
    fn notify_prev_routes(&mut self, request: &str) {
        let prev = self.prev_routes.clone();
        for id in prev {
            match self.route_mut(id) {
                Some(route) => {
                    trace!(route_id = %id, request = %request, "Route passed");
                    route.dispatch_pass(request);
                }
                None => trace!(route_id = %id, "Previously matched route was removed"),
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("prev_routes", &self.prev_routes)
            .field("lexer", &self.lexer)
            .field("has_normalize_fn", &self.normalize_fn.is_some())
            .field("routed", &self.routed)
            .field("bypassed", &self.bypassed)
            .finish()
    }
}
