//! Dialect-specific execution paths, exercised against a recording handle.

mod common;

use common::MockHandle;
use sqlweave::builder::{DeleteParams, InsertParams, SelectParams, UpdateParams};
use sqlweave::{
    BuildError, ColumnDefinition, ColumnType, Dialect, Error, IndexDefinition, IndexParams,
    SqlValue, TableDefinition, ValueMap,
};

/// MySQL `ER_DUP_KEYNAME`.
const ER_DUP_KEYNAME: u32 = 1061;
const DUPLICATE_MESSAGE: &str = "Duplicate key name 'idx_tasks_status'";

fn tasks() -> TableDefinition {
    TableDefinition::new("tasks")
        .column(ColumnDefinition::new("id", ColumnType::Text).primary_key().not_null())
        .column(ColumnDefinition::new("status", ColumnType::Text).not_null())
        .column(ColumnDefinition::new("priority", ColumnType::Integer))
        .index(IndexDefinition::new(["status"]))
        .index(IndexDefinition::new(["priority"]).unique())
        .if_not_exists(true)
}

// =============================================================================
// DDL
// =============================================================================

#[tokio::test]
async fn test_create_table_runs_table_then_indexes() {
    let mut handle = MockHandle::new();
    sqlweave::create_table(&mut handle, Dialect::Postgres, &tasks())
        .await
        .unwrap();

    assert_eq!(
        handle.executed_sql(),
        vec![
            "CREATE TABLE IF NOT EXISTS \"tasks\" (\"id\" TEXT NOT NULL PRIMARY KEY, \
             \"status\" TEXT NOT NULL, \"priority\" BIGINT)",
            "CREATE INDEX IF NOT EXISTS \"idx_tasks_status\" ON \"tasks\" (\"status\")",
            "CREATE UNIQUE INDEX IF NOT EXISTS \"idx_tasks_priority\" ON \"tasks\" (\"priority\")",
        ]
    );
    assert!(handle.executed.iter().all(|(_, args)| args.is_empty()));
}

#[tokio::test]
async fn test_invalid_definition_sends_nothing() {
    let mut handle = MockHandle::new();
    let def = tasks().column(ColumnDefinition::new("select", ColumnType::Text));

    let err = sqlweave::create_table(&mut handle, Dialect::Sqlite, &def)
        .await
        .unwrap_err();

    assert!(err.is_programmer_error());
    assert!(matches!(
        err.as_build_error(),
        Some(BuildError::InvalidIdentifier { .. })
    ));
    assert!(handle.executed.is_empty());
}

#[tokio::test]
async fn test_mysql_duplicate_index_is_swallowed_with_if_not_exists() {
    let mut handle = MockHandle::new();
    handle.fail_next_execute_with_number(ER_DUP_KEYNAME, DUPLICATE_MESSAGE);

    let params = IndexParams::new("tasks", ["status"]).if_not_exists(true);
    sqlweave::create_index(&mut handle, Dialect::MySql, &params)
        .await
        .unwrap();

    assert_eq!(
        handle.executed_sql(),
        vec!["CREATE INDEX `idx_tasks_status` ON `tasks` (`status`)"]
    );
}

#[tokio::test]
async fn test_mysql_duplicate_index_fails_without_if_not_exists() {
    let mut handle = MockHandle::new();
    handle.fail_next_execute_with_number(ER_DUP_KEYNAME, DUPLICATE_MESSAGE);

    let params = IndexParams::new("tasks", ["status"]);
    let err = sqlweave::create_index(&mut handle, Dialect::MySql, &params)
        .await
        .unwrap_err();

    assert!(err.is_execution_failure());
    match err {
        Error::Execution {
            operation, target, ..
        } => {
            assert_eq!(operation, "create index");
            assert_eq!(target, "idx_tasks_status");
        }
        Error::Build(other) => panic!("unexpected build error: {other}"),
    }
}

#[tokio::test]
async fn test_other_mysql_failures_propagate() {
    let mut handle = MockHandle::new();
    handle.fail_next_execute_with_number(1146, "Table 'app.tasks' doesn't exist");

    let params = IndexParams::new("tasks", ["status"]).if_not_exists(true);
    let err = sqlweave::create_index(&mut handle, Dialect::MySql, &params)
        .await
        .unwrap_err();
    assert!(err.is_execution_failure());
}

#[tokio::test]
async fn test_duplicate_text_without_error_number_propagates() {
    let mut handle = MockHandle::new();
    handle.fail_next_execute(
        "error returned from database: 1061 (42000): Duplicate key name 'idx_tasks_status'",
    );

    let params = IndexParams::new("tasks", ["status"]).if_not_exists(true);
    let err = sqlweave::create_index(&mut handle, Dialect::MySql, &params)
        .await
        .unwrap_err();
    assert!(err.is_execution_failure());
}

#[tokio::test]
async fn test_duplicate_number_is_not_special_outside_mysql() {
    for dialect in [Dialect::Sqlite, Dialect::Postgres] {
        let mut handle = MockHandle::new();
        handle.fail_next_execute_with_number(ER_DUP_KEYNAME, DUPLICATE_MESSAGE);

        let params = IndexParams::new("tasks", ["status"]).if_not_exists(true);
        let result = sqlweave::create_index(&mut handle, dialect, &params).await;
        assert!(result.is_err(), "{dialect} swallowed the failure");
    }
}

#[tokio::test]
async fn test_mysql_create_table_tolerates_existing_index() {
    let mut handle = MockHandle::new();
    handle
        .succeed_next_execute()
        .fail_next_execute_with_number(ER_DUP_KEYNAME, DUPLICATE_MESSAGE)
        .succeed_next_execute();

    sqlweave::create_table(&mut handle, Dialect::MySql, &tasks())
        .await
        .unwrap();
    assert_eq!(handle.executed.len(), 3);
}

#[tokio::test]
async fn test_table_failure_stops_before_indexes() {
    let mut handle = MockHandle::new();
    handle.fail_next_execute("permission denied for schema public");

    let err = sqlweave::create_table(&mut handle, Dialect::Postgres, &tasks())
        .await
        .unwrap_err();

    assert!(err.is_execution_failure());
    assert!(err.to_string().contains("create table on 'tasks' failed"));
    assert_eq!(handle.executed.len(), 1);
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_update_numbers_set_before_where_on_postgres() {
    let mut handle = MockHandle::new();
    handle.affected = 1;

    let params = UpdateParams::new("tasks")
        .set("status", "done")
        .set("priority", 3_i64)
        .filter("id", "t1");
    let affected = sqlweave::update(&mut handle, Dialect::Postgres, &params)
        .await
        .unwrap();

    assert_eq!(affected, 1);
    let (sql, args) = &handle.executed[0];
    assert_eq!(
        sql,
        "UPDATE \"tasks\" SET \"priority\" = $1, \"status\" = $2 WHERE \"id\" = $3"
    );
    assert_eq!(
        args,
        &vec![SqlValue::Int(3), SqlValue::from("done"), SqlValue::from("t1")]
    );
}

#[tokio::test]
async fn test_unsafe_mutations_never_reach_the_handle() {
    let mut handle = MockHandle::new();

    let update = UpdateParams::new("tasks").set("status", "done");
    let err = sqlweave::update(&mut handle, Dialect::Sqlite, &update)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Build(BuildError::UnsafeMutation(_))));

    let delete = DeleteParams::new("tasks");
    let err = sqlweave::delete(&mut handle, Dialect::Sqlite, &delete)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Build(BuildError::UnsafeMutation(_))));

    let insert = InsertParams::new("tasks");
    let err = sqlweave::insert(&mut handle, Dialect::Sqlite, &insert)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Build(BuildError::UnsafeMutation(_))));

    assert!(handle.executed.is_empty());
}

#[tokio::test]
async fn test_select_pairs_columns_with_cells() {
    let mut handle = MockHandle::new();
    handle.push_rows(
        &["id", "status"],
        vec![
            vec![SqlValue::from("t1"), SqlValue::from("open")],
            vec![SqlValue::from("t2"), SqlValue::Null, SqlValue::Int(9)],
        ],
    );

    let params = SelectParams::new("tasks").columns(["id", "status"]);
    let rows = sqlweave::select(&mut handle, Dialect::MySql, &params)
        .await
        .unwrap();

    assert_eq!(
        handle.queried[0].0,
        "SELECT `id`, `status` FROM `tasks` LIMIT 10000"
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("status"), Some(&SqlValue::from("open")));
    assert_eq!(rows[1].get("status"), Some(&SqlValue::Null));
    assert_eq!(rows[1].get("column_3"), Some(&SqlValue::Int(9)));
}

#[tokio::test]
async fn test_select_one_without_match_is_none() {
    let mut handle = MockHandle::new();

    let params = SelectParams::new("tasks").filter("id", "missing").limit(50);
    let row = sqlweave::select_one(&mut handle, Dialect::Postgres, &params)
        .await
        .unwrap();

    assert!(row.is_none());
    assert_eq!(
        handle.queried[0].0,
        "SELECT * FROM \"tasks\" WHERE \"id\" = $1 LIMIT 1"
    );
}

#[tokio::test]
async fn test_count_decodes_first_cell() {
    let mut handle = MockHandle::new();
    handle
        .push_rows(&["count"], vec![vec![SqlValue::Int(42)]])
        .push_rows(&["count"], vec![vec![SqlValue::from("7")]]);

    let mut predicate = ValueMap::new();
    predicate.insert("status".into(), SqlValue::from("open"));

    let first = sqlweave::count(&mut handle, Dialect::Postgres, "tasks", &predicate)
        .await
        .unwrap();
    let second = sqlweave::count(&mut handle, Dialect::Postgres, "tasks", &predicate)
        .await
        .unwrap();
    let empty = sqlweave::count(&mut handle, Dialect::Postgres, "tasks", &predicate)
        .await
        .unwrap();

    assert_eq!((first, second, empty), (42, 7, 0));
    assert_eq!(
        handle.queried[0].0,
        "SELECT COUNT(*) FROM \"tasks\" WHERE \"status\" = $1"
    );
}

#[tokio::test]
async fn test_count_rejects_non_numeric_result() {
    let mut handle = MockHandle::new();
    handle.push_rows(&["count"], vec![vec![SqlValue::Blob(vec![1, 2])]]);

    let err = sqlweave::count(&mut handle, Dialect::Sqlite, "tasks", &ValueMap::new())
        .await
        .unwrap_err();
    assert!(err.is_execution_failure());
}

#[tokio::test]
async fn test_exists_reports_any_row() {
    let mut handle = MockHandle::new();
    handle.push_rows(&["1"], vec![vec![SqlValue::Int(1)]]);

    let mut predicate = ValueMap::new();
    predicate.insert("id".into(), SqlValue::from("t1"));

    assert!(sqlweave::exists(&mut handle, Dialect::Sqlite, "tasks", &predicate)
        .await
        .unwrap());
    assert!(!sqlweave::exists(&mut handle, Dialect::Sqlite, "tasks", &predicate)
        .await
        .unwrap());
    assert_eq!(
        handle.queried[0].0,
        "SELECT 1 FROM \"tasks\" WHERE \"id\" = ? LIMIT 1"
    );
}
