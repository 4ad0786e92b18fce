//! Joins, counts, subqueries, CASE and the other query features.

use pretty_assertions::assert_eq;

use super::{catalog, plain};
use crate::ast::*;
use crate::metadata::EntityCatalog;
use crate::transpiler::DbType;

fn user() -> Table {
    Table::entity("User", "t0").unwrap()
}

fn org() -> Table {
    Table::entity("Org", "t1").unwrap()
}

#[test]
fn test_joins_keep_order_around_unsure_join() {
    let catalog = catalog();
    let (t0, t1) = (user(), org());
    let region = Table::db("region", "t2").unwrap();
    let calendar = Table::db("calendar", "c").unwrap();
    let query = Query::builder(t0.clone())
        .join(Join::left(t1.clone()).on(|on| on.eq(t1.field("id").unwrap(), t0.field("orgId").unwrap())))
        .join(Join::inner(region).sure(false))
        .join(Join::cross(calendar))
        .build()
        .unwrap();
    let out = plain(&catalog).compile(DbType::MySql, &query).unwrap();
    assert_eq!(
        out.sql,
        "SELECT t0.* FROM user t0 LEFT JOIN sys_org t1 ON t1.id = t0.org_id CROSS JOIN calendar c"
    );
}

#[test]
fn test_join_params_follow_text_order() {
    let catalog = catalog();
    let t0 = user();
    let o = Table::db("orders", "o").unwrap();
    let big = Query::builder(o.clone())
        .select_column(&o, "user_id")
        .filter(|w| w.gt(o.column("total"), 100))
        .build()
        .unwrap();
    let s = Table::subquery(big, "s").unwrap();
    let query = Query::builder(t0.clone())
        .select_column(&s, "user_id")
        .join(Join::inner(s.clone()).on(|on| on.eq(s.column("user_id"), t0.column("id")).ne(t0.column("name"), "root")))
        .filter(|w| w.eq(t0.column("age"), 40))
        .build()
        .unwrap();
    let out = plain(&catalog).compile(DbType::MySql, &query).unwrap();
    assert_eq!(
        out.sql,
        "SELECT s.user_id FROM user t0 \
         INNER JOIN (SELECT o.user_id FROM orders o WHERE o.total > :p0) s \
         ON s.user_id = t0.id AND t0.name <> :p1 WHERE t0.age = :p2"
    );
    assert_eq!(
        out.params,
        vec![Value::Int(100), Value::from("root"), Value::Int(40)]
    );
}

#[test]
fn test_count_simple() {
    let catalog = catalog();
    let t0 = user();
    let query = Query::builder(t0.clone())
        .filter(|w| w.eq(t0.column("name"), "Ann"))
        .order_asc(t0.column("id"))
        .limit(0, 10)
        .build()
        .unwrap();
    let out = plain(&catalog).compile_count(DbType::MySql, &query).unwrap();
    assert_eq!(out.sql, "SELECT COUNT(*) FROM user t0 WHERE t0.name = :p0");
    assert_eq!(out.params, vec![Value::from("Ann")]);
}

#[test]
fn test_count_wraps_grouped_query() {
    let catalog = catalog();
    let t0 = user();
    let query = Query::builder(t0.clone())
        .select(t0.field("orgId").unwrap())
        .select(SelectItem::operand(count_all()).alias("cnt"))
        .group_by_field(&t0, "orgId")
        .having(|h| h.gt(count_all(), 1))
        .order_desc(count_all())
        .build()
        .unwrap();

    let compiler = plain(&catalog);
    assert_eq!(
        compiler.compile(DbType::Oracle, &query).unwrap().sql,
        "SELECT t0.org_id, COUNT(*) AS cnt FROM user t0 GROUP BY t0.org_id \
         HAVING COUNT(*) > :p0 ORDER BY COUNT(*) DESC"
    );
    assert_eq!(
        compiler.compile_count(DbType::Oracle, &query).unwrap().sql,
        "SELECT COUNT(*) FROM (SELECT t0.org_id, COUNT(*) AS cnt FROM user t0 \
         GROUP BY t0.org_id HAVING COUNT(*) > :p0) ez_count"
    );
}

#[test]
fn test_distinct_page_and_count() {
    let catalog = catalog();
    let t0 = user();
    let query = Query::builder(t0.clone())
        .distinct()
        .select_column(&t0, "name")
        .page(3, 10)
        .build()
        .unwrap();
    let compiler = plain(&catalog);
    assert_eq!(
        compiler.compile(DbType::MySql, &query).unwrap().sql,
        "SELECT DISTINCT t0.name FROM user t0 LIMIT 20, 10"
    );
    assert_eq!(
        compiler.compile_count(DbType::MySql, &query).unwrap().sql,
        "SELECT COUNT(*) FROM (SELECT DISTINCT t0.name FROM user t0) ez_count"
    );
}

#[test]
fn test_case_when_and_formula_select() {
    let catalog = catalog();
    let t0 = user();
    let stage = case_when()
        .when(|c| c.lt(t0.column("age"), 18), "minor")
        .otherwise("adult")
        .build()
        .unwrap();
    let next_age = Formula::builder(t0.column("age")).add(1).build();
    let query = Query::builder(t0.clone())
        .select(SelectItem::operand(stage).alias("stage"))
        .select(SelectItem::operand(next_age).alias("next_age"))
        .select(SelectItem::operand(count_distinct(&t0, "id")))
        .build()
        .unwrap();
    let out = plain(&catalog).compile(DbType::MySql, &query).unwrap();
    assert_eq!(
        out.sql,
        "SELECT CASE WHEN t0.age < :p0 THEN :p1 ELSE :p2 END AS stage, \
         (t0.age + :p3) AS next_age, COUNT(DISTINCT t0.id) FROM user t0"
    );
    assert_eq!(
        out.params,
        vec![
            Value::Int(18),
            Value::from("minor"),
            Value::from("adult"),
            Value::Int(1)
        ]
    );
}

#[test]
fn test_in_subquery_and_raw_table() {
    let catalog = catalog();
    let t0 = user();
    let o = Table::db("orders", "o").unwrap();
    let buyers = Query::builder(o.clone())
        .select_column(&o, "user_id")
        .build()
        .unwrap();
    let query = Query::builder(t0.clone())
        .filter(|w| w.not_in_subquery(t0.column("id"), buyers))
        .build()
        .unwrap();
    assert_eq!(
        plain(&catalog).compile(DbType::MySql, &query).unwrap().sql,
        "SELECT t0.* FROM user t0 WHERE t0.id NOT IN (SELECT o.user_id FROM orders o)"
    );

    let raw = Table::raw("SELECT 1 AS one FROM dual", "r").unwrap();
    let query = Query::builder(raw).build().unwrap();
    assert_eq!(
        plain(&catalog).compile(DbType::Oracle, &query).unwrap().sql,
        "SELECT r.* FROM (SELECT 1 AS one FROM dual) r"
    );
}

#[test]
fn test_by_ids() {
    let catalog = catalog();
    let info = catalog.entity("User").unwrap();
    let query = Query::by_ids(info, "t0", vec![4_i64, 8]).unwrap();
    let out = plain(&catalog).compile(DbType::Dm, &query).unwrap();
    assert_eq!(out.sql, "SELECT t0.* FROM user t0 WHERE t0.id IN (:p0, :p1)");
    assert_eq!(out.params, vec![Value::Int(4), Value::Int(8)]);
}
