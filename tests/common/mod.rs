#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `fmt` subscriber once per test binary; honours `RUST_LOG`
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Shared, append-only record of what listeners observed
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Render listener params like `foo,bar,-` with `-` for absent values
pub fn join(params: &[Option<String>]) -> String {
    params
        .iter()
        .map(|p| p.as_deref().unwrap_or("-"))
        .collect::<Vec<_>>()
        .join(",")
}
