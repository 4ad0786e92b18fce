use ezsql::prelude::*;
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
dialect = "oracle"
escape_keywords = false

[[entity]]
name = "User"
snake_fields = ["userName", "orgId"]
[entity.fields]
id = "id"
"#;

const QUERY: &str = r#"{
    "from": {"alias": "t0", "kind": {"Entity": {"entity": "User"}}},
    "select": [
        {"Expr": {"operand": {"Field": {"table": {"alias": "t0", "entity": "User"}, "field": "userName"}}}}
    ],
    "where": [
        {"Compare": {
            "logic": "And",
            "left": {"Field": {"table": {"alias": "t0", "entity": "User"}, "field": "orgId"}},
            "op": "Eq",
            "right": {"Value": {"Int": 3}}
        }}
    ],
    "order_by": [
        {"operand": {"Column": {"table": {"alias": "t0"}, "column": "id"}}, "direction": "Desc"}
    ],
    "limit": {"skip": 0, "size": 10}
}"#;

#[test]
fn test_json_query_with_toml_config() {
    let config = Config::from_toml(CONFIG).unwrap();
    let catalog = config.catalog().unwrap();
    let query: Query = serde_json::from_str(QUERY).unwrap();
    query.validate().unwrap();

    let out = Compiler::new(&catalog)
        .with_options(config.options())
        .compile(config.db_type().unwrap(), &query)
        .unwrap();
    assert_eq!(
        out.sql,
        "SELECT t0.user_name FROM user t0 WHERE t0.org_id = :p0 \
         ORDER BY t0.id DESC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
    );
    assert_eq!(out.params, vec![Value::Int(3)]);
}

#[test]
fn test_query_round_trips_through_json() {
    let t0 = Table::entity("User", "t0").unwrap();
    let query = Query::builder(t0.clone())
        .filter(|w| w.in_values(t0.column("id"), vec![1, 2]).or().is_null(t0.column("org_id")))
        .build()
        .unwrap();
    let json = serde_json::to_string(&query).unwrap();
    let back: Query = serde_json::from_str(&json).unwrap();
    assert_eq!(back, query);
}

#[test]
fn test_concurrent_compiles_share_one_compiler() {
    let config = Config::from_toml(CONFIG).unwrap();
    let catalog = config.catalog().unwrap();
    let compiler = Compiler::new(&catalog);

    let results: Vec<CompiledSql> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4i64)
            .map(|i| {
                s.spawn(move || {
                    let t0 = Table::entity("User", "t0").unwrap();
                    let query = Query::builder(t0.clone())
                        .filter(|w| w.eq(t0.column("id"), i))
                        .build()
                        .unwrap();
                    compiler.compile(DbType::PostgreSql, &query).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, out) in results.iter().enumerate() {
        assert_eq!(out.sql, "SELECT t0.* FROM \"user\" t0 WHERE t0.\"id\" = :p0");
        assert_eq!(out.params, vec![Value::Int(i as i64)]);
    }
}

#[test]
fn test_build_errors_surface_before_compile() {
    let t0 = Table::entity("User", "t0").unwrap();
    let err = Query::builder(t0.clone())
        .filter(|w| w.in_values(t0.column("id"), Vec::<i64>::new()))
        .build()
        .unwrap_err();
    assert!(err.is_build_error());

    let plain = Table::db("user", "u").unwrap();
    let err = Function::builder("UPPER").field_arg(&plain, "name").build().unwrap_err();
    assert!(matches!(err, EzError::FieldOnNonEntity { .. }));
}

#[test]
fn test_json_alias_injection_rejected() {
    let query: Query =
        serde_json::from_str(r#"{"from": {"alias": "t0 WHERE 1=1 --", "kind": {"Db": {"name": "user"}}}}"#)
            .unwrap();
    let err = query.validate().unwrap_err();
    assert!(matches!(err, EzError::InvalidAlias(_)));
    assert!(err.is_build_error());
}
