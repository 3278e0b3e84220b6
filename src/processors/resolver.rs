//! Name resolution.
//!
//! Builds the symbol table of all message, enum, interface and method full
//! names, then links every field to its type and every method to its request
//! and response messages. Relative type names are searched outward through
//! the enclosing scopes, innermost first.

use rustc_hash::FxHashMap;

use crate::base::{ElementId, FieldId, InterfaceId};
use crate::descriptor::FieldType;
use crate::diagnostics::codes;
use crate::graph::{Graph, MethodSignature, ResolvedSignature, ResolvedType, TypeRef};
use crate::model::{Model, Processor, StageId};

use super::Resolved;

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// Full-name index of the named elements of the graph.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Messages and enums.
    types: FxHashMap<String, ElementId>,
    interfaces: FxHashMap<String, InterfaceId>,
}

impl SymbolTable {
    /// Index `graph`. Elements whose full name is already taken are returned
    /// as duplicates; the first definition wins.
    pub fn build(graph: &Graph) -> (Self, Vec<ElementId>) {
        let mut table = SymbolTable::default();
        let mut duplicates = Vec::new();
        let mut taken: FxHashMap<&str, ElementId> = FxHashMap::default();

        let named = graph
            .message_ids()
            .map(ElementId::Message)
            .chain(graph.enum_ids().map(ElementId::Enum))
            .chain(graph.interface_ids().map(ElementId::Interface))
            .chain(graph.method_ids().map(ElementId::Method));
        for id in named {
            let full_name = graph.full_name(id);
            if taken.insert(full_name, id).is_some() {
                duplicates.push(id);
                continue;
            }
            match id {
                ElementId::Message(_) | ElementId::Enum(_) => {
                    table.types.insert(full_name.to_string(), id);
                }
                ElementId::Interface(interface) => {
                    table.interfaces.insert(full_name.to_string(), interface);
                }
                _ => {}
            }
        }
        tracing::debug!(
            "symbol table: {} type(s), {} interface(s)",
            table.types.len(),
            table.interfaces.len()
        );
        (table, duplicates)
    }

    /// Message or enum by full name. A leading `.` is ignored.
    pub fn lookup_type(&self, full_name: &str) -> Option<ElementId> {
        self.types.get(full_name.trim_start_matches('.')).copied()
    }

    pub fn lookup_interface(&self, full_name: &str) -> Option<InterfaceId> {
        self.interfaces
            .get(full_name.trim_start_matches('.'))
            .copied()
    }

    /// Resolve a type name as written inside `scope`.
    ///
    /// `.pkg.T` is absolute. Otherwise `scope.T` is tried first, then each
    /// enclosing scope of `scope`, ending with the root.
    pub fn resolve_type(&self, scope: &str, name: &str) -> Option<ElementId> {
        if let Some(absolute) = name.strip_prefix('.') {
            return self.lookup_type(absolute);
        }
        let mut current = scope;
        loop {
            let candidate = if current.is_empty() {
                name.to_string()
            } else {
                format!("{current}.{name}")
            };
            if let Some(found) = self.types.get(&candidate) {
                return Some(*found);
            }
            if current.is_empty() {
                return None;
            }
            current = current.rfind('.').map_or("", |i| &current[..i]);
        }
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Establishes [`Resolved`].
#[derive(Debug, Default)]
pub struct Resolver;

impl Processor for Resolver {
    fn requires(&self) -> Vec<StageId> {
        Vec::new()
    }

    fn establishes(&self) -> StageId {
        StageId::of::<Resolved>()
    }

    fn run(&mut self, model: &mut Model) -> bool {
        let (table, duplicates) = SymbolTable::build(model.graph());
        for duplicate in duplicates {
            let message = format!(
                "Duplicate definition of '{}'.",
                model.graph().full_name(duplicate)
            );
            model.error_at(duplicate, codes::DUPLICATE_DEFINITION, message);
        }
        resolve_fields(model, &table);
        resolve_methods(model, &table);
        check_imports(model);
        model.put_stage::<Resolved>(table);
        true
    }
}

/// A resolution problem, reported after the graph borrow ends.
struct Problem {
    element: ElementId,
    code: &'static str,
    message: String,
}

fn resolve_fields(model: &mut Model, table: &SymbolTable) {
    let mut links = Vec::new();
    let mut problems = Vec::new();
    let graph = model.graph();
    for field in graph.field_ids() {
        match resolve_field(graph, table, field) {
            Ok(Some(ty)) => links.push((field, ty)),
            Ok(None) => {}
            Err(problem) => problems.push(problem),
        }
    }
    for (field, ty) in links {
        model.graph_mut().put_attr::<ResolvedType>(field.into(), ty);
    }
    for problem in problems {
        model.error_at(problem.element, problem.code, problem.message);
    }
}

fn resolve_field(
    graph: &Graph,
    table: &SymbolTable,
    field_id: FieldId,
) -> Result<Option<TypeRef>, Problem> {
    let field = graph.field(field_id);
    let element = ElementId::Field(field_id);
    let full_name = field.header().full_name();
    let Some(type_name) = field.type_name() else {
        return match field.kind() {
            Some(kind) if kind.is_named() => Err(Problem {
                element,
                code: codes::UNRESOLVED_TYPE,
                message: format!("Field '{full_name}' of type {kind:?} has no type name."),
            }),
            Some(kind) => Ok(Some(TypeRef::Scalar(kind))),
            None => Ok(None),
        };
    };

    let resolved = table.resolve_type(field_scope(graph, field_id), type_name);
    let kind = field.kind();
    match resolved {
        Some(ElementId::Message(message)) => {
            if kind == Some(FieldType::Enum) {
                return Err(wrong_kind(element, type_name, full_name, "message", "enum"));
            }
            let map_entry = graph.message(message).is_map_entry() && field.is_repeated();
            let entry_fields = (
                graph.lookup_field(message, "key"),
                graph.lookup_field(message, "value"),
            );
            Ok(Some(match entry_fields {
                (Some(key), Some(value)) if map_entry => TypeRef::Map {
                    entry: message,
                    key,
                    value,
                },
                _ => TypeRef::Message(message),
            }))
        }
        Some(ElementId::Enum(enum_type)) => {
            if matches!(kind, Some(FieldType::Message | FieldType::Group)) {
                return Err(wrong_kind(element, type_name, full_name, "enum", "message"));
            }
            Ok(Some(TypeRef::Enum(enum_type)))
        }
        _ => Err(Problem {
            element,
            code: codes::UNRESOLVED_TYPE,
            message: format!("Cannot resolve type '{type_name}' of field '{full_name}'."),
        }),
    }
}

fn wrong_kind(
    element: ElementId,
    type_name: &str,
    field: &str,
    found: &str,
    expected: &str,
) -> Problem {
    Problem {
        element,
        code: codes::WRONG_TYPE_KIND,
        message: format!(
            "Type '{type_name}' of field '{field}' is {} {found}, expected {} {expected}.",
            article(found),
            article(expected)
        ),
    }
}

fn article(noun: &str) -> &'static str {
    if noun.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    }
}

/// Scope type names of a field are written in: the enclosing message, or the
/// declaring file's package for extensions.
fn field_scope(graph: &Graph, field: FieldId) -> &str {
    let field = graph.field(field);
    if field.is_extension() {
        return graph.file(field.header().file()).package();
    }
    match field.header().parent() {
        Some(parent) => graph.full_name(parent),
        None => "",
    }
}

fn resolve_methods(model: &mut Model, table: &SymbolTable) {
    let mut links = Vec::new();
    let mut problems = Vec::new();
    let graph = model.graph();
    for method_id in graph.method_ids() {
        let method = graph.method(method_id);
        let element = ElementId::Method(method_id);
        let scope = method
            .header()
            .parent()
            .map_or("", |interface| graph.full_name(interface));
        let mut resolve = |role: &str, name: &str| match table.resolve_type(scope, name) {
            Some(ElementId::Message(message)) => Some(message),
            _ => {
                problems.push(Problem {
                    element,
                    code: codes::UNRESOLVED_TYPE,
                    message: format!(
                        "Cannot resolve {role} type '{name}' of method '{}'.",
                        method.header().full_name()
                    ),
                });
                None
            }
        };
        let input = resolve("input", method.input_type_name());
        let output = resolve("output", method.output_type_name());
        if let (Some(input), Some(output)) = (input, output) {
            links.push((method_id, MethodSignature { input, output }));
        }
    }
    for (method, signature) in links {
        model
            .graph_mut()
            .put_attr::<ResolvedSignature>(method.into(), signature);
    }
    for problem in problems {
        model.error_at(problem.element, problem.code, problem.message);
    }
}

fn check_imports(model: &mut Model) {
    let graph = model.graph();
    let unresolved: Vec<_> = graph
        .file_ids()
        .filter(|&f| graph.file(f).is_source())
        .flat_map(|f| {
            graph
                .dependencies(f)
                .into_iter()
                .filter(|(_, resolved)| resolved.is_none())
                .map(move |(name, _)| (f, name.to_string()))
        })
        .collect();
    for (file, name) in unresolved {
        model.warning_at(
            file.into(),
            codes::UNRESOLVED_IMPORT,
            format!("Import '{name}' cannot be resolved."),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisOptions;
    use crate::descriptor::{
        DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
        FileDescriptorSet,
    };
    use rstest::rstest;

    fn graph() -> Graph {
        let set = FileDescriptorSet::new(vec![
            FileDescriptorProto::new("a.proto", "a.b")
                .with_message(DescriptorProto::new("T").with_nested(DescriptorProto::new("T")))
                .with_message(DescriptorProto::new("U")),
            FileDescriptorProto::new("root.proto", "").with_enum(EnumDescriptorProto::new("U")),
        ]);
        Graph::build(&set, &AnalysisOptions::default()).unwrap()
    }

    #[rstest]
    #[case("a.b.T", "T", "a.b.T.T")]
    #[case("a.b", "T", "a.b.T")]
    #[case("a.b.T", ".a.b.T", "a.b.T")]
    #[case("a.b.T", "U", "a.b.U")]
    #[case("x.y", "U", "U")]
    #[case("a", "b.T.T", "a.b.T.T")]
    fn test_resolve_type(#[case] scope: &str, #[case] name: &str, #[case] expected: &str) {
        let graph = graph();
        let (table, duplicates) = SymbolTable::build(&graph);
        assert!(duplicates.is_empty());
        let found = table.resolve_type(scope, name).unwrap();
        assert_eq!(graph.full_name(found), expected);
    }

    #[test]
    fn test_unresolvable_type() {
        let graph = graph();
        let (table, _) = SymbolTable::build(&graph);
        assert!(table.resolve_type("a.b", "Missing").is_none());
        assert!(table.resolve_type("a.b", ".T").is_none());
    }

    #[test]
    fn test_duplicates() {
        let set = FileDescriptorSet::new(vec![
            FileDescriptorProto::new("a.proto", "p").with_message(DescriptorProto::new("M")),
            FileDescriptorProto::new("b.proto", "p").with_enum(EnumDescriptorProto::new("M")),
        ]);
        let graph = Graph::build(&set, &AnalysisOptions::default()).unwrap();
        let (table, duplicates) = SymbolTable::build(&graph);
        assert_eq!(duplicates.len(), 1);
        assert!(matches!(duplicates[0], ElementId::Enum(_)));
        assert!(matches!(table.lookup_type("p.M"), Some(ElementId::Message(_))));
    }

    #[test]
    fn test_scalar_and_map_fields() {
        let set = FileDescriptorSet::new(vec![
            FileDescriptorProto::new("m.proto", "p").with_message(
                DescriptorProto::new("M")
                    .with_field(FieldDescriptorProto::scalar("id", 1, FieldType::Int64))
                    .with_field(
                        FieldDescriptorProto::message("labels", 2, "LabelsEntry").repeated(),
                    )
                    .with_nested(DescriptorProto::map_entry(
                        "LabelsEntry",
                        FieldType::String,
                        FieldDescriptorProto::scalar("value", 2, FieldType::String),
                    )),
            ),
        ]);
        let graph = Graph::build(&set, &AnalysisOptions::default()).unwrap();
        let (table, _) = SymbolTable::build(&graph);
        let id = resolve_field(&graph, &table, FieldId::new(0)).ok().flatten();
        assert_eq!(id, Some(TypeRef::Scalar(FieldType::Int64)));
        let labels = resolve_field(&graph, &table, FieldId::new(1)).ok().flatten().unwrap();
        assert!(labels.is_map());
    }
}
