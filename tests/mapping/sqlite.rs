//! Records through a real SQLite table.

use crate::common::*;
use rowmap::prelude::*;
use rowmap::rowmap_sqlite::{insert_statement, select_statement};

#[test]
fn test_insert_then_select() {
    let db = tasks_db();
    db.insert("tasks", &sample_task(1)).unwrap();
    db.insert("tasks", &sparse_task(2)).unwrap();

    let tasks: Vec<Task> = db.select("tasks").unwrap();
    assert_eq!(tasks, vec![sample_task(1), sparse_task(2)]);
}

#[test]
fn test_query_with_params() {
    let db = tasks_db();
    for id in 1..=4 {
        db.insert("tasks", &sample_task(id)).unwrap();
    }
    let even: Vec<Task> = db
        .query("SELECT * FROM tasks WHERE done = ?1 ORDER BY id", [1])
        .unwrap();
    assert_eq!(even, vec![sample_task(2), sample_task(4)]);
}

#[test]
fn test_insert_many_in_one_transaction() {
    let mut db = tasks_db();
    let tasks: Vec<Task> = (1..=3).map(sample_task).collect();
    assert_eq!(db.insert_many("tasks", &tasks).unwrap(), 3);
    assert_eq!(db.select::<Task>("tasks").unwrap(), tasks);
}

#[test]
fn test_insert_many_encodes_before_writing() {
    record! {
        #[derive(Debug)]
        struct Hit {
            id: i64,
            n: u16,
        }
    }

    let mut db = Database::open_in_memory().unwrap();
    db.execute("CREATE TABLE hits (id INTEGER, n INTEGER)").unwrap();
    let err = db
        .insert_many("hits", &[Hit { id: 1, n: 1 }, Hit { id: 2, n: 2 }])
        .unwrap_err();
    assert!(err.is_mapping_error());
    let count: i64 = db
        .connection()
        .query_row("SELECT count(*) FROM hits", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_insert_with_overrides_field() {
    let db = tasks_db();
    db.insert_with(
        "tasks",
        &sample_task(1),
        [Assignment::new("title", "renamed")],
    )
    .unwrap();
    let tasks: Vec<Task> = db.select("tasks").unwrap();
    assert_eq!(tasks[0].title, "renamed");
}

#[test]
fn test_missing_table_column_for_optional_field() {
    record! {
        #[derive(Debug, PartialEq)]
        struct Slim {
            id: i64,
            note: Option<String>,
        }
    }

    let db = tasks_db();
    db.insert("tasks", &sample_task(1)).unwrap();
    let rows: Vec<Slim> = db.query("SELECT id FROM tasks", []).unwrap();
    assert_eq!(rows, vec![Slim { id: 1, note: None }]);
}

#[test]
fn test_decode_failure_surfaces_field() {
    let db = tasks_db();
    db.insert("tasks", &sample_task(1)).unwrap();
    db.execute("UPDATE tasks SET created = 'yesterday'").unwrap();
    let err = db.select::<Task>("tasks").unwrap_err();
    assert_eq!(err.field(), Some("created"));
    assert!(matches!(
        err,
        Error::Mapping(MappingError::TypeMismatch { .. })
    ));
}

#[test]
fn test_statement_helpers() {
    let schema = <Task as Record>::schema().unwrap();
    let sql = select_statement("tasks", &schema);
    assert!(sql.starts_with("SELECT \"id\", \"title\", "));
    assert!(sql.ends_with(" FROM \"tasks\""));

    let (sql, values) = insert_statement("tasks", &rowmap::encode(&sample_task(1)).unwrap());
    assert!(sql.starts_with("INSERT INTO \"tasks\" (\"id\", "));
    assert_eq!(values.len(), 14);
}

#[test]
fn test_file_backed_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    {
        let db = Database::open(&path).unwrap();
        db.execute(TASKS_DDL).unwrap();
        db.insert("tasks", &sample_task(9)).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.select::<Task>("tasks").unwrap(), vec![sample_task(9)]);
}
