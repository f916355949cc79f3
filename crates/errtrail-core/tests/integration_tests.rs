//! Integration tests for errtrail-core.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use errtrail_core::prelude::*;
use errtrail_core::{collect_operations, emit_log, resolve_code, resolve_log_level};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

mod store {
    use super::*;

    pub const SAVE: Operation = Operation::from_static("store.save");
    pub const CODE_DUPLICATE: Code = Code(1409);

    pub fn save(key: &str) -> Result<(), ErrorNode> {
        Err(wrap!(
            io::Error::new(io::ErrorKind::AlreadyExists, format!("key {key} exists")),
            SAVE,
            CODE_DUPLICATE,
            LogLevel::WARN,
        ))
    }
}

mod service {
    use super::*;

    pub fn register(name: &str) -> Result<(), ErrorNode> {
        store::save(name).wrap_op("service.register")
    }
}

fn handler(name: &str) -> Result<(), ErrorNode> {
    service::register(name).wrap_op("handler.post")
}

#[test]
fn test_code_and_trail_survive_layers() {
    let err = handler("alice").unwrap_err();

    assert_eq!(err.resolve_code(), store::CODE_DUPLICATE);
    assert_eq!(
        err.operations(),
        ["handler.post", "service.register", "store.save"]
    );
    assert_eq!(err.resolve_log_level(), Severity::Warn);
    assert_eq!(err.to_string(), "key alice exists");
}

#[test]
fn test_free_functions_accept_foreign_errors() {
    let leaf = io::Error::other("plain");
    assert_eq!(resolve_code(&leaf), Code::UNEXPECTED);
    assert!(collect_operations(&leaf).is_empty());
    assert_eq!(resolve_log_level(&leaf), Severity::Error);

    let sink = MemorySink::new();
    emit_log(&leaf, &sink);
    assert_eq!(sink.records(), vec![(None, "plain".to_string())]);
}

#[test]
fn test_boxed_chain_still_resolves() {
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(handler("bob").unwrap_err());
    assert_eq!(resolve_code(&*boxed), store::CODE_DUPLICATE);
    assert_eq!(collect_operations(&*boxed).len(), 3);
}

#[test]
fn test_source_chain_reaches_leaf() {
    let err = handler("carol").unwrap_err();
    let mut depth = 0;
    let mut current = Some(&err as &(dyn std::error::Error + 'static));
    while let Some(e) = current {
        depth += 1;
        current = e.source();
    }
    // three nodes plus the io::Error leaf
    assert_eq!(depth, 4);
}

#[test]
fn test_tracing_sink_writes_through_subscriber() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        handler("dave").unwrap_err().log();
    });

    let text = captured.text();
    assert!(text.contains("WARN"), "{text}");
    assert!(
        text.contains("[warn ] [handler.post service.register store.save]: key dave exists"),
        "{text}"
    );
}
