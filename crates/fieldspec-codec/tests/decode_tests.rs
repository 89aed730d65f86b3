mod common;

use common::{catalog, names, spec};
use fieldspec_codec::{CodecError, DatePart, FieldSpec, SavedQueryField, Terminal};

fn decode(string_id: &str, is_relationship: bool) -> Result<FieldSpec, CodecError> {
    FieldSpec::decode(catalog(), string_id, is_relationship)
}

#[test]
fn decodes_attribute_through_pair_and_bare_hops() {
    let s = decode("1,9-determinations,4.taxon.fullname", false).expect("decode");
    assert_eq!(s.base_table().name, "CollectionObject");
    assert_eq!(names(&s), vec!["determinations", "taxon", "fullName"]);
    assert_eq!(s.table().name, "Taxon");
    assert_eq!(s.terminal(), &Terminal::Resolved);
    assert_eq!(s, spec("CollectionObject.determinations.taxon.fullName"));
}

#[test]
fn accepts_legacy_camel_case_names() {
    let s = decode("1,10,2.locality.localityName", false).expect("decode");
    assert_eq!(names(&s), vec!["collectingEvent", "locality", "localityName"]);
    assert_eq!(s.encode().string_id, "1,10,2.locality.localityname");
}

#[test]
fn disambiguates_roles_into_the_same_table() {
    let created = decode("1,5-createdbyagent.agent.lastname", false).expect("decode");
    let modified = decode("1,5-modifiedbyagent.agent.lastname", false).expect("decode");
    assert_eq!(names(&created), vec!["createdByAgent", "lastName"]);
    assert_eq!(names(&modified), vec!["modifiedByAgent", "lastName"]);
}

#[test]
fn self_reference_decodes_through_named_hop() {
    let s = decode("4,4-parent,4-parent.taxon.fullname", false).expect("decode");
    assert_eq!(names(&s), vec!["parent", "parent", "fullName"]);
    assert_eq!(s.table().name, "Taxon");
}

#[test]
fn relationship_column_drops_its_target_from_the_table_list() {
    let s = decode("1,5-cataloger.agent.cataloger", true).expect("decode");
    assert_eq!(names(&s), vec!["cataloger"]);
    assert_eq!(s.table().name, "Agent");
    assert!(s.is_relationship());
    assert_eq!(s.date_part(), None);

    let s = decode("1,9-determinations,4.taxon.taxon", true).expect("decode");
    assert_eq!(names(&s), vec!["determinations", "taxon"]);
    assert!(s.is_relationship());
}

#[test]
fn date_suffix_sets_the_date_part() {
    let month = decode("1,10.collectingevent.startdateNumericMonth", false).expect("decode");
    assert_eq!(names(&month), vec!["collectingEvent", "startDate"]);
    assert_eq!(month.date_part(), Some(DatePart::Month));

    let full = decode("1,10.collectingevent.startdate", false).expect("decode");
    assert_eq!(full.date_part(), Some(DatePart::FullDate));

    let day = decode("9.determination.determineddateNumericDay", false).expect("decode");
    assert_eq!(day.date_part(), Some(DatePart::Day));
}

#[test]
fn date_suffix_on_plain_field_is_ignored() {
    let s = decode("1.collectionobject.catalognumberNumericYear", false).expect("decode");
    assert_eq!(names(&s), vec!["catalogNumber"]);
    assert_eq!(s.date_part(), None);
    assert_eq!(s.terminal(), &Terminal::Resolved);
}

#[test]
fn unknown_terminal_name_is_a_tree_rank() {
    let s = decode("1,9-determinations,4.taxon.Genus", false).expect("decode");
    assert_eq!(s.tree_rank(), Some("Genus"));
    assert_eq!(names(&s), vec!["determinations", "taxon"]);
    assert_eq!(s.table().name, "Taxon");
    assert_eq!(s.date_part(), None);
    assert!(!s.is_relationship());

    let s = decode("4.taxon.Species", false).expect("decode");
    assert!(s.join_path().is_empty());
    assert_eq!(s.tree_rank(), Some("Species"));
}

#[test]
fn empty_field_name_is_the_base_record() {
    let s = decode("1.collectionobject.", false).expect("decode");
    assert!(s.join_path().is_empty());
    assert_eq!(s.base_table().name, "CollectionObject");
    assert_eq!(s.table().name, "CollectionObject");
    assert_eq!(s.tree_rank(), None);
}

#[test]
fn rejects_strings_without_three_segments() {
    for bad in ["", "garbage", "1.collectionobject"] {
        let err = decode(bad, false).expect_err("malformed");
        assert!(matches!(err, CodecError::MalformedStringId { .. }), "{bad}: {err}");
    }
}

#[test]
fn rejects_non_numeric_table_ids() {
    for bad in ["x.collectionobject.remarks", "1,+9-determinations.determination.remarks", ".a.b"] {
        let err = decode(bad, false).expect_err("malformed");
        assert!(matches!(err, CodecError::MalformedStringId { .. }), "{bad}: {err}");
    }
}

#[test]
fn rejects_unknown_table_ids() {
    assert_eq!(
        decode("999.foo.bar", false).expect_err("unknown"),
        CodecError::UnknownTableId { id: 999 }
    );
    assert_eq!(
        decode("1,999-foo.foo.bar", false).expect_err("unknown hop"),
        CodecError::UnknownTableId { id: 999 }
    );
}

#[test]
fn rejects_hops_that_do_not_resolve() {
    // Bare `9` would need a relationship named `Determination` on CollectionObject.
    let err = decode("1,9.determination.remarks", false).expect_err("no such field");
    assert!(matches!(err, CodecError::BrokenJoinPath { .. }), "err={err}");

    // `determinations` exists but leads to table 9, not 4.
    let err = decode("1,4-determinations.taxon.name", false).expect_err("wrong target");
    assert!(err.to_string().contains("leads to table 9"), "err={err}");

    // `catalogNumber` is a plain field.
    let err = decode("1,9-catalognumber.determination.remarks", false).expect_err("attribute hop");
    assert!(err.to_string().contains("is not a relationship"), "err={err}");
}

#[test]
fn relationship_column_needs_a_target_entry() {
    let err = decode("1.collectionobject.cataloger", true).expect_err("no target id");
    assert!(matches!(err, CodecError::MalformedStringId { .. }), "err={err}");
}

#[test]
fn unflagged_relationship_terminal_is_appended() {
    let s = decode("1.collectionobject.cataloger", false).expect("decode");
    assert_eq!(names(&s), vec!["cataloger"]);
    assert_eq!(s.table().name, "Agent");
    assert!(s.is_relationship());
    assert_eq!(s, spec("CollectionObject.cataloger"));

    let s = decode("1,9-determinations.determination.taxon", false).expect("decode");
    assert_eq!(names(&s), vec!["determinations", "taxon"]);
    assert_eq!(s.table().name, "Taxon");
    let attrs = s.encode();
    assert_eq!(attrs.string_id, "1,9-determinations,4.taxon.taxon");
    assert!(attrs.is_relationship);
}

#[test]
fn flagged_plain_field_is_appended() {
    let s = decode("1,5.agent.catalognumber", true).expect("decode");
    assert_eq!(names(&s), vec!["catalogNumber"]);
    assert_eq!(s.table().name, "CollectionObject");
    assert!(!s.is_relationship());
    assert_eq!(s.encode().string_id, "1.collectionobject.catalognumber");
}

#[test]
fn flagged_unknown_terminal_is_a_tree_rank() {
    // The flag drops `4`, so the rank hangs off Determination.
    let s = decode("1,9-determinations,4.taxon.Genus", true).expect("decode");
    assert_eq!(s.tree_rank(), Some("Genus"));
    assert_eq!(names(&s), vec!["determinations"]);
    assert_eq!(s.table().name, "Determination");
    let attrs = s.encode();
    assert_eq!(attrs.string_id, "1,9-determinations.determination.Genus");
    assert!(!attrs.is_relationship);
}

#[test]
fn empty_field_name_after_hops_is_the_related_record() {
    let s = decode("1,9-determinations.determination.", false).expect("decode");
    assert_eq!(names(&s), vec!["determinations"]);
    assert_eq!(s.table().name, "Determination");
    assert_eq!(s.tree_rank(), None);
    assert!(s.is_relationship());
    assert_eq!(s, spec("CollectionObject.determinations"));
}

#[test]
fn saved_query_fields_decode_from_json() {
    let rows: Vec<SavedQueryField> = serde_json::from_str(
        r#"[
            { "stringid": "1,5-cataloger.agent.cataloger", "isrelfld": true, "position": 0 },
            { "stringid": "1.collectionobject.catalognumber", "isrelfld": false },
            { "stringid": "1,10.collectingevent.startdateNumericYear" }
        ]"#,
    )
    .expect("parse rows");

    let specs: Vec<FieldSpec> = rows
        .iter()
        .map(|row| row.decode(catalog()))
        .collect::<Result<_, _>>()
        .expect("decode rows");
    assert!(specs[0].is_relationship());
    assert_eq!(names(&specs[1]), vec!["catalogNumber"]);
    assert_eq!(specs[2].date_part(), Some(DatePart::Year));
}
