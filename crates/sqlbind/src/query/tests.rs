use super::*;
use crate::criteria::{Criteria, Criterion};
use crate::join::Join;
use crate::params;
use crate::value::Value;

#[test]
fn select_defaults_to_star_and_no_where() {
    let built = SelectQuery::new("users").build().unwrap();
    assert_eq!(built.sql, "SELECT * FROM users");
    assert!(built.params.is_empty());
}

#[test]
fn select_round_trip_with_qualified_criteria() {
    let built = SelectQuery::new("t")
        .criteria(Criteria::new().field("status", "active"))
        .qualify("t")
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM t WHERE t.status = :status");
    assert_eq!(built.params, params! { "status" => "active" });
}

#[test]
fn select_full_clause_order() {
    let built = SelectQuery::new("users u")
        .columns(["u.id", "COUNT(o.id) AS orders"])
        .join(Join::left("orders o", "o.user_id = u.id").unwrap())
        .criteria(Criteria::new().criterion(Criterion::is_not_null("u.confirmed_at")))
        .group_by("u.id")
        .order_by("orders", Direction::Desc)
        .order_by("u.id", Direction::Asc)
        .limit(10)
        .offset(20)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT u.id, COUNT(o.id) AS orders FROM users u \
         LEFT JOIN orders o ON o.user_id = u.id \
         WHERE u.confirmed_at IS NOT NULL \
         GROUP BY u.id ORDER BY orders DESC, u.id ASC LIMIT 10 OFFSET 20"
    );
    assert!(built.params.is_empty());
}

#[test]
fn select_rejects_empty_column_list_and_blank_table() {
    let err = SelectQuery::new("users")
        .columns(Vec::<String>::new())
        .build()
        .unwrap_err();
    assert!(err.is_invalid_input());

    let err = SelectQuery::new("  ").build().unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn insert_renders_columns_and_placeholders_in_order() {
    let built = InsertQuery::new("users")
        .set("name", "bob")
        .set("age", 30)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "INSERT INTO users (name, age) VALUES (:name, :age)"
    );
    assert_eq!(built.params, params! { "name" => "bob", "age" => 30 });
}

#[test]
fn insert_on_duplicate_key_update_suffixes_parameters() {
    let built = InsertQuery::new("counters")
        .set("id", 1)
        .set("hits", 1)
        .on_duplicate_key_update("hits", 2)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "INSERT INTO counters (id, hits) VALUES (:id, :hits) \
         ON DUPLICATE KEY UPDATE hits = :hits_duplicate_key_update"
    );
    assert_eq!(
        built.params,
        params! { "id" => 1, "hits" => 1, "hits_duplicate_key_update" => 2 }
    );
}

#[test]
fn insert_rejects_empty_data() {
    let err = InsertQuery::new("users").build().unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn update_prepends_where_case_insensitively() {
    let built = UpdateQuery::new("users")
        .set("name", "bob")
        .condition("id = :id")
        .bind("id", 7)
        .build()
        .unwrap();
    assert_eq!(built.sql, "UPDATE users SET name = :name WHERE id = :id");

    let built = UpdateQuery::new("users")
        .set("name", "bob")
        .condition("wHeRe id = :id")
        .bind("id", 7)
        .build()
        .unwrap();
    assert_eq!(built.sql, "UPDATE users SET name = :name wHeRe id = :id");
}

#[test]
fn update_data_keys_win_over_bound_parameters() {
    let built = UpdateQuery::new("users")
        .set("name", "new")
        .condition("name = :name")
        .bind("name", "old")
        .build()
        .unwrap();
    assert_eq!(built.params, params! { "name" => "new" });
}

#[test]
fn update_requires_data_and_condition() {
    let err = UpdateQuery::new("users")
        .condition("id = 1")
        .build()
        .unwrap_err();
    assert!(err.is_invalid_input());

    let err = UpdateQuery::new("users").set("a", 1).build().unwrap_err();
    assert!(err.is_invalid_input());

    let err = UpdateQuery::new("users")
        .set("a", 1)
        .condition("   ")
        .build()
        .unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn delete_normalizes_where() {
    let built = DeleteQuery::new("users")
        .condition("id = :id")
        .bind("id", Value::Int(5))
        .build()
        .unwrap();
    assert_eq!(built.sql, "DELETE FROM users WHERE id = :id");
    assert_eq!(built.params, params! { "id" => 5 });

    let built = DeleteQuery::new("users")
        .condition("WHERE id = :id")
        .bind("id", 5)
        .build()
        .unwrap();
    assert_eq!(built.sql, "DELETE FROM users WHERE id = :id");
}

#[test]
fn normalize_where_leaves_longer_identifiers_alone() {
    assert_eq!(normalize_where("whereabouts = 1"), "WHERE whereabouts = 1");
    assert_eq!(normalize_where("where id = 1"), "where id = 1");
    assert_eq!(normalize_where("  WHERE id = 1  "), "WHERE id = 1");
}
