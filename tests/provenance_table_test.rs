use serde_json::{json, Value};
use workbench::errors::{FusionSide, ProvenanceError};
use workbench::model::Provenance;
use workbench::provenance::{
    build_provenance_table, DataCell, ProvenanceStep, ProvenanceTable, ProvenanceTableBuilder,
};

fn provenance(value: Value) -> Provenance {
    serde_json::from_value(value).expect("invalid provenance fixture")
}

fn feature(source: &str, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "source": source,
        "geometry": { "type": "Point", "coordinates": [23.7, 37.9] },
        "properties": properties
    })
}

/// Cells of the given property row that belong to the given 1-based step
fn cells<'a>(table: &'a ProvenanceTable, property: &str, step: usize) -> Vec<&'a DataCell> {
    let row = table
        .properties
        .iter()
        .position(|p| p == property)
        .expect("property missing");
    table.data_rows[row]
        .iter()
        .filter(|c| c.step == step)
        .collect()
}

fn two_fusions() -> Provenance {
    provenance(json!({
        "stepName": "Fuse 2",
        "outputKey": "r5",
        "featureId": "42",
        "featureUri": "urn:c",
        "operations": [
            {
                "tool": "FAGI",
                "level": 1,
                "stepName": "Fuse 1",
                "selectedUri": "urn:a",
                "leftUri": "urn:a",
                "rightUri": "urn:b",
                "leftInput": "Transform A",
                "rightInput": "Transform B",
                "actions": [
                    { "property": "name", "operation": "concat", "value": "Acme (ACME Inc)" }
                ]
            },
            {
                "tool": "FAGI",
                "level": 0,
                "stepName": "Fuse 2",
                "selectedUri": "urn:c",
                "leftUri": "urn:a",
                "rightUri": "urn:c",
                "leftInput": "Fuse 1",
                "rightInput": "Transform C",
                "actions": []
            }
        ],
        "features": {
            "type": "FeatureCollection",
            "features": [
                feature("Transform A", json!({ "uri": "urn:a", "name": "Acme", "phone": "123" })),
                feature("Transform B", json!({ "uri": "urn:b", "name": "ACME Inc" })),
                feature("Transform C", json!({ "uri": "urn:c", "name": "Acme Corp" }))
            ]
        }
    }))
}

#[test]
fn test_explicit_fusion_action_is_used_verbatim() {
    let table = build_provenance_table(&two_fusions()).unwrap();

    let name = cells(&table, "name", 1);
    assert_eq!(name.len(), 4);
    assert_eq!(name[0].value, Some(json!("Acme")));
    assert_eq!(name[1].value, Some(json!("ACME Inc")));
    assert_eq!(name[2].value, Some(json!("concat")));
    assert_eq!(name[3].value, Some(json!("Acme (ACME Inc)")));
    assert_eq!(name[3].selected, Some(true));
    assert_eq!(name[3].property.as_deref(), Some("name"));
}

#[test]
fn test_fused_values_accumulate_across_steps() {
    let table = build_provenance_table(&two_fusions()).unwrap();

    // The second fusion reads its left input from the feature fused by the first
    let name = cells(&table, "name", 2);
    assert_eq!(name[0].value, Some(json!("Acme (ACME Inc)")));
    assert_eq!(name[1].value, Some(json!("Acme Corp")));
    assert_eq!(name[2].value, None);
    assert_eq!(name[3].value, None);
    assert_eq!(name[3].selected, Some(false));

    let phone = cells(&table, "phone", 2);
    assert_eq!(phone[0].value, Some(json!("123")));
    assert_eq!(phone[1].value, None);

    assert_eq!(table.features.len(), 5);
    let fuse_1 = &table.features[3];
    assert_eq!(fuse_1.source, "Fuse 1");
    assert!(fuse_1.geometry.is_none());
    assert_eq!(fuse_1.property("uri"), Some(&json!("urn:a")));
    assert_eq!(fuse_1.property("name"), Some(&json!("Acme (ACME Inc)")));
    // No action: selected URI is the left one
    assert_eq!(fuse_1.property("phone"), Some(&json!("123")));

    let fuse_2 = &table.features[4];
    assert_eq!(fuse_2.source, "Fuse 2");
    assert_eq!(fuse_2.property("uri"), Some(&json!("urn:c")));
    // No action: selected URI is the right one
    assert_eq!(fuse_2.property("name"), Some(&json!("Acme Corp")));
    assert_eq!(fuse_2.property("phone"), None);
}

#[test]
fn test_input_provenance_is_not_modified() {
    let provenance = two_fusions();
    let before = provenance.clone();

    let table = build_provenance_table(&provenance).unwrap();

    assert_eq!(provenance.features, before.features);
    assert_eq!(provenance.features.features.len(), 3);
    assert!(table.features.len() > provenance.features.features.len());

    let again = build_provenance_table(&provenance).unwrap();
    assert_eq!(table, again);
}

#[test]
fn test_rows_follow_sorted_properties() {
    let table = build_provenance_table(&two_fusions()).unwrap();

    assert_eq!(table.properties, vec!["name", "phone", "uri"]);
    assert_eq!(table.data_rows.len(), table.properties.len());
    for (row, property) in table.data_rows.iter().zip(&table.properties) {
        assert_eq!(row[0].value, Some(json!(property)));
        assert_eq!(row[0].step, 0);
        // property name plus four columns per fusion step
        assert_eq!(row.len(), 1 + 4 + 4);
    }

    assert_eq!(table.step_name, "Fuse 2");
    assert_eq!(table.feature_id.as_deref(), Some("42"));
    assert_eq!(table.feature_uri.as_deref(), Some("urn:c"));
}

#[test]
fn test_header_and_input_rows() {
    let table = build_provenance_table(&two_fusions()).unwrap();

    assert_eq!(table.step_row.len(), 3);
    assert_eq!(table.step_row[0].value, "");
    assert_eq!(table.step_row[0].row_span, Some(2));
    assert_eq!(table.step_row[1].value, "Fuse 1");
    assert_eq!(table.step_row[1].col_span, Some(4));

    assert_eq!(table.input_row.len(), 8);
    assert_eq!(table.input_row[0].value.as_deref(), Some("Transform A"));
    assert_eq!(table.input_row[0].selected, Some(true));
    assert_eq!(table.input_row[1].selected, Some(false));
    assert_eq!(table.input_row[2].value.as_deref(), Some("Operation"));
    assert_eq!(table.input_row[3].value.as_deref(), Some("Value"));
    assert_eq!(table.input_row[4].step, 2);
    assert_eq!(table.input_row[4].selected, Some(false));
    assert_eq!(table.input_row[5].selected, Some(true));
}

#[test]
fn test_fusion_steps_carry_their_input_features() {
    let table = build_provenance_table(&two_fusions()).unwrap();

    let ProvenanceStep::Fusion(fuse_2) = &table.steps[1] else {
        panic!("Expected fusion step, got {:?}", table.steps[1]);
    };
    // Resolved by URI against the input features only
    let left = fuse_2.left.feature.as_ref().unwrap();
    assert_eq!(left.source, "Transform A");
    let right = fuse_2.right.feature.as_ref().unwrap();
    assert_eq!(right.source, "Transform C");

    let value = serde_json::to_value(&table.steps[0]).unwrap();
    assert_eq!(value["tool"], "FAGI");
    assert_eq!(value["left"]["feature"]["source"], "Transform A");
    assert_eq!(value["right"]["feature"]["properties"]["name"], "ACME Inc");
}

#[test]
fn test_fusion_input_feature_is_null_without_features() {
    let mut provenance = two_fusions();
    provenance.features.features.clear();

    let table = build_provenance_table(&provenance).unwrap();

    assert!(table.data_rows.is_empty());
    let value = serde_json::to_value(&table.steps[0]).unwrap();
    assert_eq!(value["left"]["feature"], Value::Null);
    assert_eq!(value["right"]["feature"], Value::Null);
}

#[test]
fn test_null_action_value_is_written_to_fused_feature() {
    let provenance = provenance(json!({
        "stepName": "Fuse",
        "operations": [{
            "tool": "FAGI",
            "stepName": "Fuse",
            "selectedUri": "urn:a",
            "leftUri": "urn:a",
            "rightUri": "urn:b",
            "leftInput": "A",
            "rightInput": "B",
            "actions": [{ "property": "phone", "operation": "clear", "value": null }]
        }],
        "features": {
            "features": [
                feature("A", json!({ "uri": "urn:a", "phone": "123" })),
                feature("B", json!({ "uri": "urn:b" }))
            ]
        }
    }));

    let table = build_provenance_table(&provenance).unwrap();

    let phone = cells(&table, "phone", 1);
    assert_eq!(phone[0].value, Some(json!("123")));
    assert_eq!(phone[2].value, Some(json!("clear")));
    assert_eq!(phone[3].value, None);
    assert_eq!(phone[3].selected, Some(false));

    let fused = table.features.last().unwrap();
    assert_eq!(fused.source, "Fuse");
    assert_eq!(fused.property("phone"), Some(&Value::Null));
}

fn enrichment(features: Vec<Value>) -> Provenance {
    provenance(json!({
        "stepName": "Enrich",
        "featureId": "7",
        "featureUri": "urn:p",
        "operations": [
            { "tool": "LIMES", "level": 2, "stepName": "Link" },
            { "tool": "DEER", "level": 0, "stepName": "Enrich", "uri": "urn:p", "input": "Transform" }
        ],
        "features": { "type": "FeatureCollection", "features": features }
    }))
}

#[test]
fn test_enrichment_marks_modified_properties() {
    let provenance = enrichment(vec![
        feature("Transform", json!({ "uri": "urn:p", "name": "Cafe", "rating": 3 })),
        feature(
            "Enrich",
            json!({ "uri": "urn:p", "name": "Cafe", "rating": 4, "category": "food" }),
        ),
    ]);

    let table = build_provenance_table(&provenance).unwrap();

    assert_eq!(table.steps.len(), 1);
    assert!(matches!(table.steps[0], ProvenanceStep::Enrichment(_)));
    assert_eq!(table.step_row.len(), 2);
    assert_eq!(table.input_row.len(), 1);
    assert_eq!(table.input_row[0].value.as_deref(), Some("Transform"));

    let category = cells(&table, "category", 1);
    assert_eq!(category[0].value, Some(json!("food")));
    assert_eq!(category[0].modified, Some(true));

    let name = cells(&table, "name", 1);
    assert_eq!(name[0].value, Some(json!("Cafe")));
    assert_eq!(name[0].modified, Some(false));

    let rating = cells(&table, "rating", 1);
    assert_eq!(rating[0].value, Some(json!(4)));
    assert_eq!(rating[0].modified, Some(true));
}

#[test]
fn test_missing_enrichment_shows_placeholder() {
    let provenance = enrichment(vec![feature(
        "Transform",
        json!({ "uri": "urn:p", "name": "Cafe" }),
    )]);

    let table = build_provenance_table(&provenance).unwrap();

    for property in ["name", "uri"] {
        let cell = cells(&table, property, 1);
        assert_eq!(cell[0].value, Some(json!("-")));
        assert_eq!(cell[0].modified, Some(false));
    }
}

#[test]
fn test_enrichment_without_initial_feature_is_not_modified() {
    let provenance = enrichment(vec![feature(
        "Enrich",
        json!({ "uri": "urn:p", "name": "Cafe" }),
    )]);

    let table = build_provenance_table(&provenance).unwrap();
    let name = cells(&table, "name", 1);
    assert_eq!(name[0].value, Some(json!("Cafe")));
    assert_eq!(name[0].modified, Some(false));
}

#[test]
fn test_enrichment_after_fusion_compares_with_fused_value() {
    let provenance = provenance(json!({
        "stepName": "Enrich",
        "featureId": "1",
        "featureUri": "urn:a",
        "operations": [
            {
                "tool": "FAGI",
                "stepName": "Fuse",
                "selectedUri": "urn:a",
                "leftUri": "urn:a",
                "rightUri": "urn:b",
                "leftInput": "A",
                "rightInput": "B",
                "actions": [{ "property": "name", "operation": "keep-right", "value": "Acme Ltd" }]
            },
            { "tool": "DEER", "stepName": "Enrich", "uri": "urn:a", "input": "Fuse" }
        ],
        "features": {
            "features": [
                feature("A", json!({ "uri": "urn:a", "name": "Acme" })),
                feature("B", json!({ "uri": "urn:b", "name": "Acme Ltd" })),
                feature("Enrich", json!({ "uri": "urn:a", "name": "Acme Ltd" }))
            ]
        }
    }));

    let table = build_provenance_table(&provenance).unwrap();

    let name = cells(&table, "name", 2);
    assert_eq!(name[0].value, Some(json!("Acme Ltd")));
    assert_eq!(name[0].modified, Some(false));
}

#[test]
fn test_missing_fusion_input_fails() {
    let mut provenance = two_fusions();
    provenance.features.features.remove(0);

    let err = build_provenance_table(&provenance).unwrap_err();
    assert_eq!(
        err,
        ProvenanceError::FeatureNotFound {
            step: "Fuse 1".to_string(),
            side: FusionSide::Left,
            uri: "urn:a".to_string(),
            input: Some("Transform A".to_string()),
        }
    );
}

#[test]
fn test_custom_feature_uri_key() {
    let provenance = provenance(json!({
        "stepName": "Enrich",
        "operations": [
            { "tool": "DEER", "stepName": "Enrich", "uri": "urn:p", "input": "Transform" }
        ],
        "features": {
            "features": [
                feature("Transform", json!({ "poi_uri": "urn:p", "name": "Old" })),
                feature("Enrich", json!({ "poi_uri": "urn:p", "name": "New" }))
            ]
        }
    }));

    let default_table = build_provenance_table(&provenance).unwrap();
    assert_eq!(cells(&default_table, "name", 1)[0].value, Some(json!("-")));

    let table = ProvenanceTableBuilder::new()
        .with_feature_uri_key("poi_uri")
        .build(&provenance)
        .unwrap();
    let name = cells(&table, "name", 1);
    assert_eq!(name[0].value, Some(json!("New")));
    assert_eq!(name[0].modified, Some(true));
}

#[test]
fn test_empty_provenance() {
    let provenance = provenance(json!({ "stepName": "Fuse", "operations": [], "features": null }));
    let table = build_provenance_table(&provenance).unwrap();

    assert!(table.properties.is_empty());
    assert!(table.data_rows.is_empty());
    assert_eq!(table.step_row.len(), 1);
    assert!(table.input_row.is_empty());
}
