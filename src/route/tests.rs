use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;

use super::{Normalizer, ParamValues, Pattern, Route, RouteId, Rule};
use crate::lexer::{Lexer, LexerError};

fn route(pattern: impl Into<Pattern>) -> Route {
    Route::new(RouteId(1), pattern.into(), 0, Lexer::default())
}

#[test]
fn test_template_route_records_ids() {
    let r = route("{a}/{b}/:c:/:d*:");
    assert_eq!(r.param_ids(), ["a", "b", "c", "d*"]);
    assert_eq!(r.optional_param_ids(), ["c", "d*"]);
    assert!(r.matcher().is_some());
}

#[test]
fn test_regex_route_is_positional() {
    let r = route(Regex::new(r"^/[0-9]+/([0-9]+)$").unwrap());
    assert!(r.param_ids().is_empty());
    assert!(r.matches("/123/456"));
    assert!(!r.matches("/maecennas/ullamcor"));

    let values = r.params("/123/456").unwrap();
    assert_eq!(values.get("0"), Some("456"));
    assert_eq!(values.get_index(0), Some("456"));
    assert_eq!(values.get("1"), None);
}

#[test]
fn test_regex_route_keeps_empty_groups() {
    let r = route(Regex::new(r"^/()/([0-9]+)$").unwrap());
    let values = r.params("//456").unwrap();
    assert_eq!(values.values(), &[Some(String::new()), Some("456".to_string())]);
}

#[test]
fn test_param_values_named_and_synthetic() {
    let r = route("{a}/{b}");
    let values = r.params("foo/bar").unwrap();
    assert_eq!(values.get("a"), Some("foo"));
    assert_eq!(values.get("b"), Some("bar"));
    assert_eq!(values.get("1"), Some("bar"));
    assert_eq!(values.get("request_"), Some("foo/bar"));
    assert_eq!(values.request(), "foo/bar");
    assert_eq!(values.len(), 2);
    let named: Vec<_> = values.named().collect();
    assert_eq!(named, vec![("a", Some("foo")), ("b", Some("bar"))]);
}

#[test]
fn test_rules_all_must_pass() {
    let mut r = route("{foo}-{bar}");
    r.add_rules([
        ("foo", Rule::one_of(["123", "456"])),
        ("bar", Rule::pattern("ullamcor").unwrap()),
    ]);
    assert!(r.matches("123-ullamcor"));
    assert!(!r.matches("45-ullamcor"));
    assert!(!r.matches("123-lorem"));
}

#[test]
fn test_predicate_rule_receives_context() {
    let seen = Rc::new(RefCell::new(None));
    let captured = Rc::clone(&seen);
    let mut r = route("{foo}-{bar}");
    r.add_rule(
        "bar",
        Rule::predicate(move |value, request, values| {
            *captured.borrow_mut() = Some((
                value.map(str::to_string),
                request.to_string(),
                values.get("foo").map(str::to_string),
            ));
            request == "lorem-123"
        }),
    );

    assert!(r.matches("lorem-123"));
    assert!(!r.matches("lorem-555"));
    assert_eq!(
        *seen.borrow(),
        Some((
            Some("555".to_string()),
            "lorem-555".to_string(),
            Some("lorem".to_string())
        ))
    );
}

#[test]
fn test_optional_absent_passes_rule() {
    let mut r = route("{a}/{b}/:c*:");
    r.add_rule("c*", ["foo/bar", "edit"]);
    assert!(r.matches("article/333"));
    assert!(r.matches("news/456/foo/bar"));
    assert!(!r.matches("news/456/123/aaa/bbb"));
}

#[test]
fn test_rule_on_absent_required_param_fails() {
    let mut r = route("{a}/:b:");
    r.add_rule("missing", Rule::pattern(".*").unwrap());
    assert!(!r.matches("news"));

    let mut r = route("{a}/:b:");
    r.add_rule("missing", Rule::predicate(|value, _, _| value.is_none()));
    assert!(r.matches("news"));
}

#[test]
fn test_request_rule() {
    let mut r = route("{a}/{b}");
    r.add_rule("request_", Rule::pattern("^news/").unwrap());
    assert!(r.matches("news/1"));
    assert!(!r.matches("blog/1"));
}

#[test]
fn test_add_rule_replaces_in_place() {
    let mut r = route("{a}");
    r.add_rule("a", ["x"]);
    r.add_rule("a", ["y"]);
    assert!(r.matches("y"));
    assert!(!r.matches("x"));
    assert!(matches!(r.rule("a"), Some(Rule::OneOf(v)) if v == &["y"]));
}

#[test]
fn test_arguments_normalizer_precedence() {
    let mut r = route("{a}/{b}");
    assert_eq!(
        r.arguments("foo/bar", None),
        vec![Some("foo".to_string()), Some("bar".to_string())]
    );

    let fallback: Normalizer =
        Rc::new(|_: &str, values: &ParamValues<'_>| vec![values.get("b").map(str::to_string)]);
    assert_eq!(
        r.arguments("foo/bar", Some(&fallback)),
        vec![Some("bar".to_string())]
    );

    r.set_normalizer(|request, _| vec![Some(request.to_uppercase())]);
    assert_eq!(
        r.arguments("foo/bar", Some(&fallback)),
        vec![Some("FOO/BAR".to_string())]
    );
}

#[test]
fn test_interpolate_regex_route_fails() {
    let r = route(Regex::new("^/x$").unwrap());
    let values: HashMap<&str, &str> = HashMap::new();
    assert_eq!(
        r.interpolate(&values),
        Err(LexerError::InvalidPatternType {
            regex: "^/x$".to_string()
        })
    );
}

#[test]
fn test_interpolate_template_route() {
    let r = route("/users/{id}/:tab:");
    let values = HashMap::from([("id", "7")]);
    assert_eq!(r.interpolate(&values).unwrap(), "/users/7");
}

#[test]
fn test_greedy_flag() {
    let mut r = route("/x");
    assert!(!r.is_greedy());
    r.set_greedy(true);
    assert!(r.is_greedy());
}

#[test]
fn test_listeners_dispatch() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut r = route("/x");
    let l = Rc::clone(&log);
    r.on_match(move |extra, params| l.borrow_mut().push(format!("match {} {}", extra.len(), params.len())));
    let l = Rc::clone(&log);
    r.on_pass_once(move |request| l.borrow_mut().push(format!("pass {request}")));

    r.dispatch_match(&[serde_json::json!(1)], &[]);
    r.dispatch_pass("/y");
    r.dispatch_pass("/z");
    assert_eq!(*log.borrow(), vec!["match 1 0", "pass /y"]);

    r.clear_listeners();
    r.dispatch_match(&[], &[]);
    assert_eq!(log.borrow().len(), 2);
}
