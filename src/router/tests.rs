use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use serde_json::json;

use super::{Router, RouterOptions};
use crate::lexer::Lexer;
use crate::route::RouteId;

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn record(router: &mut Router, pattern: &str, priority: i32, tag: &str, log: &Log) -> RouteId {
    let sink = Rc::clone(log);
    let tag = tag.to_string();
    router
        .add_with_priority(pattern, priority)
        .on_match(move |_, _| sink.borrow_mut().push(tag.clone()))
        .id()
}

#[test]
fn test_insertion_keeps_ascending_priority() {
    let mut router = Router::new();
    router.add_with_priority("/a", 5);
    router.add_with_priority("/b", 1);
    router.add_with_priority("/c", 3);
    router.add_with_priority("/d", 3);

    let order: Vec<_> = router.routes().map(|r| r.pattern().to_string()).collect();
    assert_eq!(order, vec!["/a", "/c", "/d", "/b"]);
}

#[test]
fn test_equal_priority_earliest_registered_wins() {
    let log = log();
    let mut router = Router::new();
    record(&mut router, "/{a}", 0, "first", &log);
    record(&mut router, "/{b}", 0, "second", &log);

    router.parse("/foo");
    assert_eq!(*log.borrow(), vec!["first"]);
}

#[test]
fn test_higher_priority_wins() {
    let log = log();
    let mut router = Router::new();
    record(&mut router, "/{foo}/{bar}", 0, "low", &log);
    record(&mut router, "/{foo}/{bar}", 1, "high", &log);

    router.parse("/123/456");
    assert_eq!(*log.borrow(), vec!["high"]);
}

#[test]
fn test_remove_and_lookup() {
    let log = log();
    let mut router = Router::new();
    let a = record(&mut router, "/foo", 0, "a", &log);
    let b = record(&mut router, "/foo", 0, "b", &log);
    assert_eq!(router.len(), 2);
    assert!(router.route(a).is_some());

    let removed = router.remove(a).unwrap();
    assert_eq!(removed.id(), a);
    assert!(router.route(a).is_none());
    assert!(router.remove(a).is_none());

    router.parse("/foo");
    assert_eq!(*log.borrow(), vec!["b"]);

    router.route_mut(b).unwrap().clear_listeners();
    router.parse("/foo");
    assert_eq!(log.borrow().len(), 1);

    router.remove_all();
    assert!(router.is_empty());
}

#[test]
fn test_default_keeps_previous_memory() {
    let log = log();
    let mut router = Router::new();
    let id = record(&mut router, "/foo", 0, "match", &log);
    let sink = Rc::clone(&log);
    router
        .route_mut(id)
        .unwrap()
        .on_pass(move |request| sink.borrow_mut().push(format!("pass {request}")));
    let sink = Rc::clone(&log);
    router.on_default(move |_, request| sink.borrow_mut().push(format!("default {request}")));

    router.parse("/foo");
    router.parse("/nothing");
    router.parse("/foo");

    assert_eq!(
        *log.borrow(),
        vec!["match", "default /nothing", "pass /foo", "match"]
    );
}

#[test]
fn test_pass_skips_removed_route() {
    let log = log();
    let mut router = Router::new();
    let id = record(&mut router, "/foo", 0, "foo", &log);
    let sink = Rc::clone(&log);
    router
        .route_mut(id)
        .unwrap()
        .on_pass(move |_| sink.borrow_mut().push("pass".to_string()));
    record(&mut router, "/bar", 0, "bar", &log);

    router.parse("/foo");
    let removed = router.remove(id);
    router.parse("/bar");

    assert!(removed.is_some());
    assert_eq!(*log.borrow(), vec!["foo", "bar"]);
}

#[test]
fn test_null_request_is_empty_string() {
    let log = log();
    let mut router = Router::new();
    record(&mut router, "", 0, "empty", &log);

    router.parse("/123/456");
    router.parse(None);
    assert_eq!(*log.borrow(), vec!["empty"]);
}

#[test]
fn test_router_lexer_option() {
    let log = log();
    let mut router = Router::with_options(RouterOptions::new().lexer(Lexer::strict()));
    record(&mut router, "/foo", 0, "strict", &log);

    router.parse("foo");
    router.parse("/foo/");
    router.parse("/foo");
    assert_eq!(*log.borrow(), vec!["strict"]);
    assert_eq!(*router.lexer(), Lexer::strict());
}

#[test]
fn test_routed_listener_sees_extra_args_and_first_flag() {
    let log = log();
    let mut router = Router::new();
    router.add_with_priority("/{a}", 1);
    router.add("/{b}").set_greedy(true);

    let sink = Rc::clone(&log);
    router.on_match(move |extra, request, result| {
        sink.borrow_mut().push(format!(
            "{} {request} {} {:?} {}",
            extra[0], result.route.pattern(), result.params, result.is_first
        ));
    });

    router.parse_with("/x", &[json!("ctx")]);
    assert_eq!(
        *log.borrow(),
        vec![
            "\"ctx\" /x /{a} [Some(\"x\")] true",
            "\"ctx\" /x /{b} [Some(\"x\")] false",
        ]
    );
}

#[test]
fn test_once_listeners_fire_once() {
    let log = log();
    let mut router = Router::new();
    router.add("/foo");
    let sink = Rc::clone(&log);
    router.on_match_once(move |_, request, _| sink.borrow_mut().push(format!("match {request}")));
    let sink = Rc::clone(&log);
    router.on_default_once(move |_, request| sink.borrow_mut().push(format!("default {request}")));

    router.parse("/foo");
    router.parse("/foo");
    router.parse("/bar");
    router.parse("/bar");
    assert_eq!(*log.borrow(), vec!["match /foo", "default /bar"]);
}

#[test]
fn test_normalize_fn_option_applies_to_every_route() {
    let log = log();
    let options = RouterOptions::new()
        .normalize_fn(|request, _| vec![Some(request.to_string())]);
    let mut router = Router::with_options(options);
    let sink = Rc::clone(&log);
    router
        .add("/{a}/{b}")
        .on_match(move |_, params| sink.borrow_mut().push(format!("{params:?}")));

    router.parse("/1/2");
    assert_eq!(*log.borrow(), vec!["[Some(\"/1/2\")]"]);
}

#[test]
fn test_once_default_not_repeated_after_listener_panic() {
    let log = log();
    let mut router = Router::new();
    let sink = Rc::clone(&log);
    router.on_default_once(move |_, request| sink.borrow_mut().push(format!("once {request}")));
    let armed = Rc::new(Cell::new(true));
    let trigger = Rc::clone(&armed);
    router.on_default(move |_, _| {
        if trigger.replace(false) {
            panic!("default listener failure");
        }
    });

    let outcome = catch_unwind(AssertUnwindSafe(|| router.parse("/a")));
    assert!(outcome.is_err());
    router.parse("/b");

    assert!(!armed.get());
    assert_eq!(*log.borrow(), vec!["once /a"]);
}

#[test]
fn test_pass_memory_survives_panicking_pass_listener() {
    let log = log();
    let mut router = Router::new();
    let armed = Rc::new(Cell::new(true));

    let trigger = Rc::clone(&armed);
    let sink = Rc::clone(&log);
    router.add("/{a}").on_pass(move |request| {
        if trigger.replace(false) {
            panic!("pass listener failure");
        }
        sink.borrow_mut().push(format!("a {request}"));
    });
    let sink = Rc::clone(&log);
    router
        .add("/{b}")
        .set_greedy(true)
        .on_pass(move |request| sink.borrow_mut().push(format!("b {request}")));

    router.parse("/x");
    let outcome = catch_unwind(AssertUnwindSafe(|| router.parse("/y")));
    assert!(outcome.is_err());
    assert!(log.borrow().is_empty());

    router.parse("/z");
    assert_eq!(*log.borrow(), vec!["a /z", "b /z"]);
}
