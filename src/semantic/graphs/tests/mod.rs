
use std::io;
use std::sync::{Arc, Mutex};

use crate::base::{FileId, Identifier, QualifiedIdentifier, Span};
use crate::semantic::graphs::{ContextGraph, ContextId, DeclId, DeclarationKind, TopContextId};
use crate::semantic::types::ContextType;

fn new_file(graph: &mut ContextGraph, file: u32) -> TopContextId {
    graph.create_top_context(FileId(file), Span::lines(0, 100))
}

fn scope(
    graph: &mut ContextGraph,
    parent: ContextId,
    context_type: ContextType,
    name: &str,
    lines: (u32, u32),
) -> ContextId {
    let context = graph
        .create_context(parent, Span::lines(lines.0, lines.1))
        .unwrap();
    graph.set_context_type(context, context_type).unwrap();
    if !name.is_empty() {
        graph
            .set_local_scope_identifier(context, QualifiedIdentifier::parse(name))
            .unwrap();
    }
    context
}

fn declare(graph: &mut ContextGraph, context: ContextId, name: &str, line: u32) -> DeclId {
    graph
        .create_declaration(
            context,
            Identifier::new(name),
            Span::from_coords(line, 0, line, 10),
            DeclarationKind::Ordinary,
        )
        .unwrap()
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` and return the warnings it logged.
fn warnings_during<R>(f: impl FnOnce() -> R) -> (R, String) {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&log.0.lock().unwrap()).into_owned();
    (result, text)
}
