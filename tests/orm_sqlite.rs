//! End-to-end persistence tests against in-memory SQLite.

use std::sync::Arc;

use gantry::orm::{BindMap, Direction, Model, Query, SqliteExecutor, StatementExecutor, Value};

fn executor() -> Arc<SqliteExecutor> {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.execute(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER)",
        &BindMap::new(),
    )
    .unwrap();
    Arc::new(exec)
}

fn seed(exec: &Arc<SqliteExecutor>, name: &str, age: i64) {
    let created = Query::table(exec.clone(), "users")
        .create([("name", Value::from(name)), ("age", Value::from(age))])
        .unwrap();
    assert!(created);
}

#[test]
fn create_then_read_hydrates_models() {
    let exec = executor();
    seed(&exec, "ada", 36);
    seed(&exec, "grace", 45);

    let records = Query::for_model(exec.clone(), "users", "User")
        .select(["id", "name", "age"])
        .order_by("age", Direction::Desc)
        .all()
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name(), "User");
    assert_eq!(
        records[0].get_attribute("name"),
        Some(&Value::Text("grace".into()))
    );
    assert_eq!(records[1].get_attribute("age"), Some(&Value::Integer(36)));
}

#[test]
fn filter_and_first_narrow_the_result() {
    let exec = executor();
    seed(&exec, "ada", 36);
    seed(&exec, "grace", 45);

    let found = Query::table(exec.clone(), "users")
        .filter("name", "=", "grace")
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(found.get_attribute("age"), Some(&Value::Integer(45)));

    let missing = Query::table(exec.clone(), "users")
        .filter("name", "=", "linus")
        .first()
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn limit_windows_the_fetch() {
    let exec = executor();
    seed(&exec, "a", 1);
    seed(&exec, "b", 2);
    seed(&exec, "c", 3);

    let rows = Query::table(exec.clone(), "users")
        .order_by("age", Direction::Asc)
        .limit(1, 2)
        .rows()
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("name"), Some(&Value::Text("b".into())));
    assert_eq!(rows[1].get("name"), Some(&Value::Text("c".into())));
}

#[test]
fn edit_updates_only_matching_rows() {
    let exec = executor();
    seed(&exec, "ada", 36);
    seed(&exec, "grace", 45);

    let edited = Query::table(exec.clone(), "users")
        .filter("name", "=", "ada")
        .edit([("age", Value::from(37i64))])
        .unwrap();
    assert!(edited);

    let ada = Query::table(exec.clone(), "users")
        .filter("name", "=", "ada")
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(ada.get_attribute("age"), Some(&Value::Integer(37)));

    let grace = Query::table(exec.clone(), "users")
        .filter("name", "=", "grace")
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(grace.get_attribute("age"), Some(&Value::Integer(45)));
}

#[test]
fn delete_removes_matching_rows() {
    let exec = executor();
    seed(&exec, "ada", 36);
    seed(&exec, "grace", 45);

    Query::table(exec.clone(), "users")
        .filter("name", "=", "ada")
        .run("delete")
        .unwrap();

    let remaining = Query::table(exec.clone(), "users").rows().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].get("name"), Some(&Value::Text("grace".into())));
}

#[test]
fn describe_reports_the_table_columns() {
    let exec = executor();

    let columns = Query::table(exec.clone(), "users").describe().unwrap();
    let names: Vec<&Value> = columns.iter().filter_map(|row| row.get("name")).collect();

    assert_eq!(columns.len(), 3);
    assert!(names.contains(&&Value::Text("id".into())));
    assert!(names.contains(&&Value::Text("name".into())));
    assert!(names.contains(&&Value::Text("age".into())));
}

#[test]
fn save_inserts_and_backfills_the_id() {
    let exec = executor();

    let mut model = Model::new("users");
    model.set_attribute("name", Value::Text("ada".into()));
    model.set_attribute("age", Value::Integer(36));

    let saved = model.save(exec.clone()).unwrap();
    assert!(saved);
    assert_eq!(model.get_attribute("id"), Some(&Value::Integer(1)));
}

#[test]
fn save_updates_when_an_id_is_present() {
    let exec = executor();

    let mut model = Model::new("users");
    model.set_attribute("name", Value::Text("ada".into()));
    model.set_attribute("age", Value::Integer(36));
    model.save(exec.clone()).unwrap();

    model.set_attribute("age", Value::Integer(37));
    model.save(exec.clone()).unwrap();

    let rows = Query::table(exec.clone(), "users").rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("age"), Some(&Value::Integer(37)));
}

#[test]
fn guarded_attributes_are_never_written() {
    let exec = executor();
    seed(&exec, "ada", 36);

    let mut model = Query::table(exec.clone(), "users")
        .filter("name", "=", "ada")
        .first()
        .unwrap()
        .unwrap()
        .guard(["age"]);
    model.set_attribute("name", Value::Text("lovelace".into()));
    model.set_attribute("age", Value::Integer(99));
    model.save(exec.clone()).unwrap();

    let row = &Query::table(exec.clone(), "users").rows().unwrap()[0];
    assert_eq!(row.get("name"), Some(&Value::Text("lovelace".into())));
    assert_eq!(row.get("age"), Some(&Value::Integer(36)));
}

#[test]
fn save_with_nothing_writable_is_a_noop() {
    let exec = executor();
    seed(&exec, "ada", 36);

    let mut model = Query::table(exec.clone(), "users")
        .filter("name", "=", "ada")
        .first()
        .unwrap()
        .unwrap()
        .guard(["name", "age"]);
    model.set_attribute("age", Value::Integer(99));

    let saved = model.save(exec.clone()).unwrap();
    assert!(!saved);

    let row = &Query::table(exec.clone(), "users").rows().unwrap()[0];
    assert_eq!(row.get("age"), Some(&Value::Integer(36)));
}
