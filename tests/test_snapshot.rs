mod common;

use memcat::catalog::{
    Algorithm, CatalogSnapshot, DataType, Expr, Operation, Permission, Value,
};
use memcat::{Catalog, Error};
use std::collections::BTreeMap;
use std::time::Duration;

fn populated() -> Catalog {
    let catalog = Catalog::new();

    let ns = catalog.namespace("acme");
    ns.access("owner").set_pass(b"ns-pass".to_vec());
    ns.token("ns_jwt").define(Algorithm::Rs256, b"ns-key".to_vec());

    let db = ns.database("prod");
    db.access("app").rotate(b"db-pass".to_vec(), b"db-code".to_vec());
    db.token("db_jwt").define(Algorithm::Hs256, b"db-secret".to_vec());

    let sc = db.scope("account");
    sc.update(|a| {
        a.session = Some(Duration::from_secs(3600));
        a.signup = Some(Expr::new("CREATE user SET email = $email"));
    });
    sc.token("sc_jwt").define(Algorithm::EdDsa, b"sc-key".to_vec());

    let tb = db.table("person");
    tb.set_schemafull(true);
    tb.field("age")
        .update(|a| {
            a.data_type = DataType::Integer;
            a.min = Some(0.0);
            a.max = Some(150.0);
            a.default = Some(Value::Int(0));
        })
        .unwrap();
    tb.index("idx_age")
        .define(vec!["age".to_string()], false)
        .unwrap();
    tb.rule("public")
        .define(vec![Operation::Select], Permission::Full);

    catalog
}

#[test]
fn test_snapshot_restores_into_empty_catalog() {
    common::init_tracing();
    let source = populated();
    let snapshot = source.snapshot();

    let json = snapshot.to_json().unwrap();
    let decoded = CatalogSnapshot::from_json(&json).unwrap();
    assert_eq!(decoded, snapshot);

    let target = Catalog::new();
    target.restore(&decoded).unwrap();
    assert_eq!(target.snapshot(), snapshot);

    let db = target.lookup_database("acme", "prod").unwrap();
    assert_eq!(
        db.scope_if_exists("account").unwrap().session_duration(),
        Some(Duration::from_secs(3600))
    );
    assert_eq!(
        db.scope("account").token_if_exists("sc_jwt").unwrap().algorithm(),
        Algorithm::EdDsa
    );
    let tb = target.lookup_table("acme", "prod", "person").unwrap();
    assert!(tb.is_schemafull());
    assert_eq!(
        tb.field_if_exists("age").unwrap().bounds(),
        (Some(0.0), Some(150.0))
    );
}

#[test]
fn test_snapshot_overwrites_existing_attributes() {
    let source = populated();

    let target = Catalog::new();
    let ac = target.namespace("acme").database("prod").access("app");
    ac.set_pass(b"stale".to_vec());

    target.restore(&source.snapshot()).unwrap();
    assert!(ac.verify_pass(b"db-pass"));
    assert_eq!(ac.code(), b"db-code");
}

#[test]
fn test_malformed_json_is_rejected() {
    let result = CatalogSnapshot::from_json("{\"namespaces\": 3}");
    assert!(matches!(result, Err(Error::Serialization(_))));
}

#[test]
fn test_invalid_index_is_rejected() {
    let source = populated();
    let mut snapshot = source.snapshot();
    snapshot.namespaces[0].databases[0].tables[0].indexes[0]
        .attrs
        .columns
        .push("age".to_string());

    let target = Catalog::new();
    assert!(matches!(
        target.restore(&snapshot),
        Err(Error::InvalidIndex { .. })
    ));
    assert!(target.namespace_if_exists("acme").is_none());
}

#[test]
fn test_non_finite_values_never_reach_a_snapshot() {
    common::init_tracing();
    let catalog = populated();
    let age = catalog
        .lookup_table("acme", "prod", "person")
        .unwrap()
        .field("age");

    let err = age.set_bounds(Some(f64::NAN), Some(10.0)).unwrap_err();
    assert!(matches!(err, Error::InvalidBounds { .. }));
    let err = age.set_bounds(Some(0.0), Some(f64::INFINITY)).unwrap_err();
    assert!(matches!(err, Error::InvalidBounds { .. }));

    let tags = catalog
        .lookup_table("acme", "prod", "person")
        .unwrap()
        .field("tags");
    tags.set_data_type(DataType::Any).unwrap();
    let err = tags
        .set_default_value(Some(Value::Float(f64::NAN)))
        .unwrap_err();
    assert!(matches!(err, Error::NonFinite(_)));
    let err = tags
        .set_enum_values(vec![Value::Array(vec![Value::Float(f64::NEG_INFINITY)])])
        .unwrap_err();
    assert!(matches!(err, Error::NonFinite(_)));
    let nested = BTreeMap::from([("score".to_string(), Value::Float(f64::INFINITY))]);
    let err = tags
        .set_default_value(Some(Value::Object(nested)))
        .unwrap_err();
    assert!(matches!(err, Error::NonFinite(_)));

    assert_eq!(age.bounds(), (Some(0.0), Some(150.0)));
    assert!(tags.default_value().is_none());
    assert!(tags.enum_values().is_empty());

    let snapshot = catalog.snapshot();
    let decoded = CatalogSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(decoded, snapshot);

    let target = Catalog::new();
    target.restore(&decoded).unwrap();
    assert_eq!(target.snapshot(), snapshot);
}
