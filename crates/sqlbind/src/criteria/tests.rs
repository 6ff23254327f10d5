use super::*;
use crate::params;

fn compiled(criteria: &Criteria) -> (String, Params) {
    criteria.compile(None).unwrap()
}

#[test]
fn empty_tree_compiles_to_nothing() {
    let (condition, parameters) = compiled(&Criteria::new());
    assert_eq!(condition, "");
    assert!(parameters.is_empty());
}

#[test]
fn single_field_sugar() {
    let criteria = Criteria::new().field("status", "active");
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "status = :status");
    assert_eq!(parameters, params! { "status" => "active" });
}

#[test]
fn null_field_sugar_becomes_is_null() {
    let criteria = Criteria::new().field("deleted_at", Value::Null);
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "deleted_at IS NULL");
    assert!(parameters.is_empty());
}

#[test]
fn explicit_equals_null_is_redirected_to_is_null() {
    let criteria = Criteria::new().criterion(Criterion::equals("deleted_at", Value::Null));
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "deleted_at IS NULL");
    assert!(parameters.is_empty());
}

#[test]
fn default_connective_is_and() {
    let criteria = Criteria::new().field("a", 1).field("b", 2);
    let (condition, _) = compiled(&criteria);
    assert_eq!(condition, "a = :a AND b = :b");
}

#[test]
fn explicit_or_and_xor() {
    let criteria = Criteria::new().field("a", 1).or().field("b", 2);
    let (condition, _) = compiled(&criteria);
    assert_eq!(condition, "a = :a OR b = :b");

    let criteria = Criteria::new().field("a", 1).xor().field("b", 2);
    let (condition, _) = compiled(&criteria);
    assert_eq!(condition, "a = :a XOR b = :b");
}

#[test]
fn consecutive_connectives_collapse_to_the_last() {
    let criteria = Criteria::new().field("a", 1).and().or().field("b", 2);
    let (condition, _) = compiled(&criteria);
    assert_eq!(condition, "a = :a OR b = :b");
}

#[test]
fn leading_and_trailing_connectives_are_stripped() {
    let criteria = Criteria::new().or().field("a", 1).field("b", 2).xor();
    let (condition, _) = compiled(&criteria);
    assert_eq!(condition, "a = :a AND b = :b");
}

#[test]
fn not_prefixes_the_next_element() {
    let criteria = Criteria::new()
        .field("a", 1)
        .not()
        .criterion(Criterion::like("name", "bob", LikeMatch::Contains));
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "a = :a AND NOT name LIKE :name");
    assert_eq!(parameters, params! { "a" => 1, "name" => "%bob%" });
}

#[test]
fn nested_group_is_parenthesized() {
    let criteria = Criteria::new().field("status", "active").group(
        Criteria::new().field("role", "admin").or().field("role", "owner"),
    );
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(
        condition,
        "status = :status AND (role = :role OR role = :role_1)"
    );
    assert_eq!(
        parameters,
        params! { "status" => "active", "role" => "admin", "role_1" => "owner" }
    );
}

#[test]
fn empty_group_is_skipped() {
    let criteria = Criteria::new().field("a", 1).group(Criteria::new());
    let (condition, _) = compiled(&criteria);
    assert_eq!(condition, "a = :a");
}

#[test]
fn duplicate_base_names_get_numeric_suffixes() {
    let criteria = Criteria::new()
        .criterion(Criterion::greater_than("age", 18))
        .criterion(Criterion::less_than("age", 65))
        .criterion(Criterion::not_equals("age", 40));
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "age > :age AND age < :age_1 AND age != :age_2");
    assert_eq!(
        parameters,
        params! { "age" => 18, "age_1" => 65, "age_2" => 40 }
    );
}

#[test]
fn collision_rename_spans_groups() {
    let criteria = Criteria::new()
        .field("id", 1)
        .group(Criteria::new().field("id", 2));
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "id = :id AND (id = :id_1)");
    assert_eq!(parameters, params! { "id" => 1, "id_1" => 2 });
}

#[test]
fn in_list_collides_with_renamed_parameter_cleanly() {
    // The IN criterion emits id_1 itself; the registry keys on base names,
    // so the rename of the second bare `id` still lands on a distinct name.
    let criteria = Criteria::new()
        .criterion(Criterion::is_in("id", [10, 20]).unwrap())
        .field("id", 30);
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "id IN (:id_1, :id_2) AND id = :id");
    assert_eq!(
        parameters,
        params! { "id_1" => 10, "id_2" => 20, "id" => 30 }
    );
}

#[test]
fn between_parameters_are_registered() {
    let criteria = Criteria::new()
        .criterion(Criterion::between("age", 18, 65))
        .criterion(Criterion::between("age", 0, 10));
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(
        condition,
        "(age BETWEEN :age_lower_limit AND :age_upper_limit) AND \
         (age BETWEEN :age_lower_limit_1 AND :age_upper_limit_1)"
    );
    assert_eq!(parameters.len(), 4);
}

#[test]
fn expression_parameters_participate_in_the_registry() {
    let criteria = Criteria::new()
        .field("min", 1)
        .criterion(Criterion::expression(
            "age > :min",
            params! { "min" => 21 },
        ));
    let (condition, parameters) = compiled(&criteria);
    assert_eq!(condition, "min = :min AND age > :min_1");
    assert_eq!(parameters, params! { "min" => 1, "min_1" => 21 });
}

#[test]
fn qualification_applies_to_every_criterion() {
    let criteria = Criteria::new()
        .field("status", "active")
        .criterion(Criterion::is_null("deleted_at"));
    let (condition, _) = criteria.compile(Some("t")).unwrap();
    assert_eq!(condition, "t.status = :status AND t.deleted_at IS NULL");
}

#[test]
fn compilation_is_idempotent() {
    let criteria = Criteria::new()
        .field("a", 1)
        .or()
        .group(Criteria::new().field("a", 2).criterion(Criterion::between("b", 1, 9)))
        .not()
        .criterion(Criterion::is_in("c", ["x", "y"]).unwrap());
    let first = criteria.compile(None).unwrap();
    let second = criteria.compile(None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_placeholder_has_a_matching_parameter() {
    let criteria = Criteria::new()
        .field("status", "active")
        .field("status", "pending")
        .criterion(Criterion::is_in("status", ["a", "b"]).unwrap())
        .or()
        .group(Criteria::new().criterion(Criterion::between("status", 1, 2)));
    let (condition, parameters) = compiled(&criteria);

    // One parameter per logical value slot, all names distinct.
    assert_eq!(parameters.len(), 6);

    // Scan every `:name` token and check it against the map.
    let mut rest = condition.as_str();
    let mut seen = 0;
    while let Some(pos) = rest.find(':') {
        rest = &rest[pos + 1..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let name = &rest[..end];
        assert!(
            parameters.contains_key(name),
            "placeholder :{name} missing from parameter map"
        );
        seen += 1;
        rest = &rest[end..];
    }
    assert_eq!(seen, 6);
}

#[test]
fn no_leading_or_trailing_connective_for_any_nonempty_tree() {
    let trees = [
        Criteria::new().or().field("a", 1),
        Criteria::new().field("a", 1).xor(),
        Criteria::new().and().or().field("a", 1).and().and(),
        Criteria::new().group(Criteria::new().or().field("a", 1).or()),
    ];
    for tree in &trees {
        let (condition, _) = compiled(tree);
        for token in ["AND", "OR", "XOR"] {
            assert!(!condition.starts_with(&format!("{token} ")), "{condition}");
            assert!(!condition.ends_with(&format!(" {token}")), "{condition}");
        }
        assert_eq!(condition.trim(), condition);
    }
}
