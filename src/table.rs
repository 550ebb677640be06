//! # Route Tables
//!
//! Declarative route definitions loaded from TOML or JSON and applied onto a
//! [`Router`]. Listeners still have to be attached in code; a table only
//! describes patterns, priorities, greediness and rules.
//!
//! ```toml
//! [lexer]
//! slash_mode = "strict"
//!
//! [[routes]]
//! pattern = "/news/{id}"
//! priority = 1
//!
//! [routes.rules]
//! id = { pattern = "^[0-9]+$" }
//!
//! [[routes]]
//! pattern = "/{section}/:slug:"
//! greedy = true
//! rules = { section = ["news", "blog"] }
//! ```
//!
//! A rule given as an array becomes [`Rule::OneOf`]; a table with a single
//! `pattern` key becomes [`Rule::Pattern`]. Anything else fails to load.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

use crate::lexer::{Lexer, SlashMode};
use crate::route::{RouteId, Rule};
use crate::router::{Router, RouterOptions};

/// A set of routes plus the lexer settings they were written for
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTable {
    #[serde(default)]
    pub lexer: Option<LexerSection>,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexerSection {
    #[serde(default)]
    pub slash_mode: SlashMode,
}

/// One `[[routes]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub pattern: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub greedy: bool,
    /// Keyed by parameter name, position or `request_`
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// Serialized form of a [`Rule`]; predicates have no serialized form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleConfig {
    OneOf(Vec<String>),
    Pattern {
        pattern: String,
    },
}

impl RuleConfig {
    fn to_rule(&self) -> Result<Rule, regex::Error> {
        match self {
            RuleConfig::OneOf(values) => Ok(Rule::OneOf(values.clone())),
            RuleConfig::Pattern { pattern } => Rule::pattern(pattern),
        }
    }
}

impl RouteTable {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse TOML route table")
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON route table")
    }

    /// Lexer described by the `[lexer]` section, the default one if absent
    #[must_use]
    pub fn lexer(&self) -> Lexer {
        self.lexer
            .as_ref()
            .map_or_else(Lexer::default, |section| Lexer::new(section.slash_mode))
    }

    /// Register every entry on `router`, in table order
    ///
    /// All rules are compiled before the first route is added, so a bad rule
    /// leaves the router untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a `pattern` rule is not a valid regex.
    pub fn apply(&self, router: &mut Router) -> anyhow::Result<Vec<RouteId>> {
        let mut compiled = Vec::with_capacity(self.routes.len());
        for entry in &self.routes {
            let mut rules = Vec::with_capacity(entry.rules.len());
            for (name, config) in &entry.rules {
                let rule = config.to_rule().with_context(|| {
                    format!("Invalid rule '{}' on route '{}'", name, entry.pattern)
                })?;
                rules.push((name.as_str(), rule));
            }
            compiled.push((entry, rules));
        }

        let mut ids = Vec::with_capacity(compiled.len());
        for (entry, rules) in compiled {
            let route = router.add_with_priority(entry.pattern.as_str(), entry.priority);
            route.set_greedy(entry.greedy).add_rules(rules);
            debug!(
                route_id = %route.id(),
                pattern = %entry.pattern,
                priority = entry.priority,
                greedy = entry.greedy,
                rules_count = entry.rules.len(),
                "Route loaded from table"
            );
            ids.push(route.id());
        }
        Ok(ids)
    }

    /// Fresh router using this table's lexer, with every entry applied
    pub fn build_router(&self) -> anyhow::Result<Router> {
        let mut router = Router::with_options(RouterOptions::new().lexer(self.lexer()));
        self.apply(&mut router)?;
        Ok(router)
    }
}

/// Load a route table from `path`
///
/// `.json` files are read as JSON, everything else as TOML.
pub fn load_route_table(path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route table {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let table = if is_json {
        RouteTable::from_json_str(&content)?
    } else {
        RouteTable::from_toml_str(&content)?
    };

    info!(
        path = %path.display(),
        routes_count = table.routes.len(),
        slash_mode = %table.lexer().slash_mode(),
        "Route table loaded"
    );
    Ok(table)
}
