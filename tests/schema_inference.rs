//! # Schema Inference Integration Tests
//!
//! Drives schema derivation through the public surface: fixture documents
//! loaded into a `MemoryDataset`, branch declarations fed to the
//! `SchemaBuilder`, declarations rendered by the `JsonCodec`. Covers:
//!
//! - Primitive widening in the emitted declaration
//! - Namespace qualification of record identities
//! - Structural memoization of repeated record types
//! - Recursive folding and its bounds
//! - Structural errors surfaced before any row is touched

use serde_json::Value;
use treecast::codec::JsonCodec;
use treecast::error::Error;
use treecast::reader::MemoryDataset;
use treecast::schema::{SchemaBuilder, SchemaTree};
use treecast::DatasetReader;

fn derive(fixture: &str) -> treecast::error::Result<SchemaTree> {
    let dataset = MemoryDataset::from_json_str(fixture).unwrap();
    SchemaBuilder::new(dataset.name()).build(dataset.branches())
}

fn declaration(schema: &SchemaTree) -> Value {
    serde_json::from_str(&JsonCodec::new().emit_schema(schema)).unwrap()
}

fn field_type<'a>(declaration: &'a Value, name: &str) -> &'a Value {
    declaration["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|field| field["name"] == name)
        .unwrap_or_else(|| panic!("no field `{name}` in {declaration}"))
        .get("type")
        .unwrap()
}

mod widening {
    use super::*;

    #[test]
    fn every_source_primitive_maps_to_its_output_kind() {
        let schema = derive(
            r#"{
                "name": "t",
                "branches": [
                    ["flag", "bool"],
                    ["tiny", "int8"], ["utiny", "uint8"],
                    ["small", "int16"], ["usmall", "uint16"],
                    ["medium", "int32"], ["umedium", "uint32"],
                    ["big", "int64"], ["ubig", "uint64"],
                    ["single", "float32"], ["wide", "float64"],
                    ["text", "string"], ["buf", "chars"], ["fw", "fstring"]
                ],
                "rows": []
            }"#,
        )
        .unwrap();
        let doc = declaration(&schema);

        for (name, expected) in [
            ("flag", "boolean"),
            ("tiny", "int"),
            ("utiny", "int"),
            ("small", "int"),
            ("usmall", "int"),
            ("medium", "int"),
            ("umedium", "long"),
            ("big", "long"),
            ("ubig", "double"),
            ("single", "float"),
            ("wide", "double"),
            ("text", "string"),
            ("buf", "string"),
            ("fw", "string"),
        ] {
            assert_eq!(field_type(&doc, name), expected, "branch `{name}`");
        }
    }

    #[test]
    fn raw_string_pointers_are_rejected() {
        let err = derive(
            r#"{"name": "t", "branches": [["p", "cstring"]], "rows": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnrepresentableType { .. }), "got {err:?}");
    }
}

mod identities {
    use super::*;

    #[test]
    fn namespace_qualifies_every_record() {
        let dataset = MemoryDataset::from_json_str(
            r#"{
                "name": "events",
                "branches": [["p", {
                    "record": "Point",
                    "fields": [["x", "float64"]]
                }]],
                "rows": []
            }"#,
        )
        .unwrap();
        let schema = SchemaBuilder::new(dataset.name())
            .with_namespace("physics")
            .build(dataset.branches())
            .unwrap();

        assert_eq!(schema.root_identity(), "physics.events");
        assert!(schema.record("physics.Point").is_some());
    }

    #[test]
    fn hostile_branch_names_are_sanitized() {
        let schema = derive(
            r#"{"name": "2tree", "branches": [["my-branch", "int32"]], "rows": []}"#,
        )
        .unwrap();
        let doc = declaration(&schema);

        assert_eq!(doc["name"], "_2tree");
        assert_eq!(field_type(&doc, "my_branch"), "int");
    }

    #[test]
    fn sanitization_collisions_are_duplicates() {
        let err = derive(
            r#"{"name": "t", "branches": [["a-b", "int32"], ["a.b", "int32"]], "rows": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateFieldName { .. }), "got {err:?}");
    }
}

mod repeated_records {
    use super::*;

    #[test]
    fn identical_type_names_share_one_definition() {
        let schema = derive(
            r#"{
                "name": "t",
                "branches": [
                    ["begin", {"record": "Point", "fields": [["x", "float64"]]}],
                    ["end", {"record": "Point", "fields": [["x", "float64"]]}]
                ],
                "rows": []
            }"#,
        )
        .unwrap();
        // Root plus one Point.
        assert_eq!(schema.record_count(), 2);

        let doc = declaration(&schema);
        assert_eq!(field_type(&doc, "begin")["type"], "record");
        assert_eq!(field_type(&doc, "end"), "Point");
    }

    #[test]
    fn same_name_different_shape_fails() {
        let err = derive(
            r#"{
                "name": "t",
                "branches": [
                    ["begin", {"record": "Point", "fields": [["x", "float64"]]}],
                    ["end", {"record": "Point", "fields": [["y", "float64"]]}]
                ],
                "rows": []
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateFieldName { .. }), "got {err:?}");
    }
}

mod counters {
    use super::*;

    #[test]
    fn counter_must_precede_the_array() {
        let err = derive(
            r#"{
                "name": "t",
                "branches": [
                    ["x", {"element": "float32", "counter": "n"}],
                    ["n", "int32"]
                ],
                "rows": []
            }"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::UnresolvedLengthSource { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn counter_must_widen_to_an_exact_integer() {
        let err = derive(
            r#"{
                "name": "t",
                "branches": [
                    ["n", "uint64"],
                    ["x", {"element": "float32", "counter": "n"}]
                ],
                "rows": []
            }"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::UnresolvedLengthSource { .. }),
            "got {err:?}"
        );
    }
}

mod recursion {
    use super::*;

    #[test]
    fn self_reference_through_a_list_folds() {
        let schema = derive(
            r#"{
                "name": "t",
                "branches": [["root", {
                    "record": "Node",
                    "fields": [
                        ["value", "int32"],
                        ["children", {"element": "&Node"}]
                    ]
                }]],
                "rows": []
            }"#,
        )
        .unwrap();
        assert_eq!(schema.record_count(), 2);

        let doc = declaration(&schema);
        let node = field_type(&doc, "root");
        let children = node["fields"][1]["type"].clone();
        assert_eq!(children["type"], "array");
        assert_eq!(children["items"], "Node");
    }

    #[test]
    fn cycle_without_a_sequence_boundary_is_unbounded() {
        let err = derive(
            r#"{
                "name": "t",
                "branches": [["root", {
                    "record": "Node",
                    "fields": [["next", "&Node"]]
                }]],
                "rows": []
            }"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::RecursionDepthUnbounded { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn reference_to_a_non_ancestor_fails() {
        let err = derive(
            r#"{"name": "t", "branches": [["x", "&Ghost"]], "rows": []}"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::UnresolvedTypeReference { .. }),
            "got {err:?}"
        );
    }
}
