#![allow(dead_code)]

use std::sync::LazyLock;

use fieldspec_codec::FieldSpec;
use fieldspec_schema::SchemaCatalog;

static CATALOG: LazyLock<SchemaCatalog> = LazyLock::new(|| {
    SchemaCatalog::from_json_str(include_str!("../../../../fixtures/specify_datamodel.json"))
        .expect("fixture datamodel")
});

pub fn catalog() -> &'static SchemaCatalog {
    &CATALOG
}

pub fn spec(path: &str) -> FieldSpec {
    FieldSpec::from_dotted_path(catalog(), path).expect("resolve fixture path")
}

pub fn names(spec: &FieldSpec) -> Vec<&str> {
    spec.join_path().iter().map(|f| f.name.as_str()).collect()
}
