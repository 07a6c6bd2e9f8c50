
use crate::base::{FileId, Identifier, Position, QualifiedIdentifier, Span};
use crate::semantic::graphs::{ContextGraph, ContextId, DeclId, DeclarationKind, TopContextId};
use crate::semantic::types::ContextType;

fn new_file(graph: &mut ContextGraph, file: u32) -> TopContextId {
    graph.create_top_context(FileId(file), Span::lines(0, 100))
}

fn namespace(graph: &mut ContextGraph, parent: ContextId, name: &str, lines: (u32, u32)) -> ContextId {
    let context = graph
        .create_context(parent, Span::lines(lines.0, lines.1))
        .unwrap();
    graph.set_context_type(context, ContextType::Namespace).unwrap();
    graph
        .set_local_scope_identifier(context, QualifiedIdentifier::parse(name))
        .unwrap();
    context
}

fn declare_kind(
    graph: &mut ContextGraph,
    context: ContextId,
    identifier: Identifier,
    line: u32,
    kind: DeclarationKind,
) -> DeclId {
    graph
        .create_declaration(context, identifier, Span::from_coords(line, 0, line, 10), kind)
        .unwrap()
}

fn declare(graph: &mut ContextGraph, context: ContextId, name: &str, line: u32) -> DeclId {
    declare_kind(graph, context, Identifier::new(name), line, DeclarationKind::Ordinary)
}

fn at(line: u32) -> Option<Position> {
    Some(Position::line(line))
}
