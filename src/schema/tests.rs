//! Tests for schema inference

use super::*;
use crate::error::Error;
use crate::types::{OutputKind, SourceKind, TypeDescriptor};

fn prim(kind: SourceKind) -> TypeDescriptor {
    TypeDescriptor::Primitive(kind)
}

#[test]
fn field_order_follows_branch_declaration_order() {
    let tree = SchemaBuilder::new("events")
        .build(&[
            ("c".into(), prim(SourceKind::Int32)),
            ("a".into(), prim(SourceKind::Float64)),
            ("b".into(), prim(SourceKind::Bool)),
        ])
        .unwrap();

    let names: Vec<&str> = tree
        .root()
        .fields
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, ["c", "a", "b"]);
}

#[test]
fn primitive_leaves_are_widened() {
    let tree = SchemaBuilder::new("t")
        .build(&[
            ("small".into(), prim(SourceKind::Int8)),
            ("wide".into(), prim(SourceKind::UInt32)),
            ("huge".into(), prim(SourceKind::UInt64)),
        ])
        .unwrap();

    let kind_of = |name: &str| match tree.root().field(name).unwrap() {
        OutputType::Primitive { kind, .. } => *kind,
        other => panic!("expected primitive, got {other:?}"),
    };
    assert_eq!(kind_of("small"), OutputKind::Int);
    assert_eq!(kind_of("wide"), OutputKind::Long);
    assert_eq!(kind_of("huge"), OutputKind::Double);
}

#[test]
fn cstring_branch_fails_before_any_row() {
    let err = SchemaBuilder::new("t")
        .build(&[("label".into(), prim(SourceKind::CStringPtr))])
        .unwrap_err();
    assert!(matches!(err, Error::UnrepresentableType { .. }));
    assert_eq!(err.path(), Some("label"));
}

#[test]
fn duplicate_branch_names_collide() {
    let err = SchemaBuilder::new("t")
        .build(&[
            ("x".into(), prim(SourceKind::Int32)),
            ("x".into(), prim(SourceKind::Int64)),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateFieldName { .. }));
}

#[test]
fn branch_names_colliding_after_sanitization_collide() {
    let err = SchemaBuilder::new("t")
        .build(&[
            ("pt-x".into(), prim(SourceKind::Float32)),
            ("pt.x".into(), prim(SourceKind::Float32)),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateFieldName { .. }));
}

#[test]
fn counter_resolves_to_preceding_integer_sibling() {
    let tree = SchemaBuilder::new("t")
        .build(&[
            ("n".into(), prim(SourceKind::Int32)),
            (
                "x".into(),
                TypeDescriptor::variable_array(prim(SourceKind::Float32), "n"),
            ),
        ])
        .unwrap();

    match tree.root().field("x").unwrap() {
        OutputType::Array {
            counter, fixed_len, ..
        } => {
            assert_eq!(counter.as_deref(), Some("n"));
            assert_eq!(*fixed_len, None);
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn counter_declared_after_the_array_fails() {
    let err = SchemaBuilder::new("t")
        .build(&[
            (
                "x".into(),
                TypeDescriptor::variable_array(prim(SourceKind::Float32), "n"),
            ),
            ("n".into(), prim(SourceKind::Int32)),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedLengthSource { .. }));
}

#[test]
fn non_integer_counter_fails() {
    let err = SchemaBuilder::new("t")
        .build(&[
            ("n".into(), prim(SourceKind::Float64)),
            (
                "x".into(),
                TypeDescriptor::variable_array(prim(SourceKind::Int32), "n"),
            ),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedLengthSource { .. }));
}

#[test]
fn uint64_counter_fails_because_it_widens_to_double() {
    let err = SchemaBuilder::new("t")
        .build(&[
            ("n".into(), prim(SourceKind::UInt64)),
            (
                "x".into(),
                TypeDescriptor::variable_array(prim(SourceKind::Int32), "n"),
            ),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedLengthSource { .. }));
}

#[test]
fn nested_record_is_registered_once_and_reused() {
    let point = TypeDescriptor::record(
        "Point",
        vec![
            ("x".into(), prim(SourceKind::Float64)),
            ("y".into(), prim(SourceKind::Float64)),
        ],
    );
    let tree = SchemaBuilder::new("t")
        .build(&[
            ("begin".into(), point.clone()),
            ("end".into(), point.clone()),
        ])
        .unwrap();

    // Root plus one shared nested definition.
    assert_eq!(tree.record_count(), 2);
    assert_eq!(
        tree.root().field("begin"),
        tree.root().field("end")
    );
    let point_type = tree.record("Point").unwrap();
    assert_eq!(point_type.fields.len(), 2);
}

#[test]
fn same_identity_with_different_shape_fails() {
    let a = TypeDescriptor::record("Point", vec![("x".into(), prim(SourceKind::Float64))]);
    let b = TypeDescriptor::record("Point", vec![("x".into(), prim(SourceKind::Int32))]);
    let err = SchemaBuilder::new("t")
        .build(&[("begin".into(), a), ("end".into(), b)])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateFieldName { .. }));
}

#[test]
fn self_reference_through_a_list_folds_to_a_ref() {
    let node = TypeDescriptor::record(
        "Node",
        vec![
            ("value".into(), prim(SourceKind::Int32)),
            (
                "children".into(),
                TypeDescriptor::list(TypeDescriptor::SelfRef {
                    type_name: "Node".into(),
                }),
            ),
        ],
    );
    let tree = SchemaBuilder::new("t")
        .build(&[("root".into(), node)])
        .unwrap();

    let node_type = tree.record("Node").unwrap();
    match node_type.field("children").unwrap() {
        OutputType::Array { items, .. } => {
            assert_eq!(**items, OutputType::RecursiveRef("Node".into()));
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn reader_reported_unrolling_folds_to_the_same_ref() {
    // The reader expanded the declaration once before marking the cycle.
    let inner = TypeDescriptor::record(
        "Node",
        vec![
            ("value".into(), prim(SourceKind::Int32)),
            (
                "children".into(),
                TypeDescriptor::list(TypeDescriptor::SelfRef {
                    type_name: "Node".into(),
                }),
            ),
        ],
    );
    let outer = TypeDescriptor::record(
        "Node",
        vec![
            ("value".into(), prim(SourceKind::Int32)),
            ("children".into(), TypeDescriptor::list(inner)),
        ],
    );
    let tree = SchemaBuilder::new("t")
        .build(&[("root".into(), outer)])
        .unwrap();

    assert_eq!(tree.record_count(), 2);
    let node_type = tree.record("Node").unwrap();
    match node_type.field("children").unwrap() {
        OutputType::Array { items, .. } => {
            assert_eq!(**items, OutputType::RecursiveRef("Node".into()));
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn cycle_without_a_sequence_boundary_is_rejected() {
    let node = TypeDescriptor::record(
        "Node",
        vec![
            ("value".into(), prim(SourceKind::Int32)),
            (
                "next".into(),
                TypeDescriptor::SelfRef {
                    type_name: "Node".into(),
                },
            ),
        ],
    );
    let err = SchemaBuilder::new("t")
        .build(&[("root".into(), node)])
        .unwrap_err();
    assert!(matches!(err, Error::RecursionDepthUnbounded { .. }));
}

#[test]
fn self_reference_to_a_non_ancestor_fails() {
    let err = SchemaBuilder::new("t")
        .build(&[(
            "root".into(),
            TypeDescriptor::list(TypeDescriptor::SelfRef {
                type_name: "Elsewhere".into(),
            }),
        )])
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedTypeReference { .. }));
}

#[test]
fn namespace_qualifies_every_record_identity() {
    let point = TypeDescriptor::record("Point", vec![("x".into(), prim(SourceKind::Float64))]);
    let tree = SchemaBuilder::new("events")
        .with_namespace("org.example")
        .build(&[("p".into(), point)])
        .unwrap();

    assert_eq!(tree.root_identity(), "org.example.events");
    assert!(tree.record("org.example.Point").is_some());
    assert_eq!(
        tree.root().field("p"),
        Some(&OutputType::Record("org.example.Point".into()))
    );
}

#[test]
fn sanitize_rewrites_invalid_identifier_characters() {
    assert_eq!(sanitize("pt.x"), "pt_x");
    assert_eq!(sanitize("2fast"), "_2fast");
    assert_eq!(sanitize(""), "_");
    assert_eq!(sanitize("ok_name3"), "ok_name3");
}

#[test]
fn fixed_arrays_keep_their_declared_length() {
    let tree = SchemaBuilder::new("t")
        .build(&[(
            "m".into(),
            TypeDescriptor::fixed_array(
                TypeDescriptor::fixed_array(prim(SourceKind::Float32), 3),
                2,
            ),
        )])
        .unwrap();

    match tree.root().field("m").unwrap() {
        OutputType::Array {
            items, fixed_len, ..
        } => {
            assert_eq!(*fixed_len, Some(2));
            match &**items {
                OutputType::Array { fixed_len, .. } => assert_eq!(*fixed_len, Some(3)),
                other => panic!("expected inner array, got {other:?}"),
            }
        }
        other => panic!("expected array, got {other:?}"),
    }
}
