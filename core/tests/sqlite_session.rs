use sqlxmap::{
    params, DbConfig, InsertBuilder, Params, QueryMapper, Repository, ReturnMode, Session,
    SqlValue, SqlxMapError, SqlxSession, TableConfig,
};

async fn users_session() -> anyhow::Result<SqlxSession> {
    let mut session = SqlxSession::connect("sqlite::memory:").await?;
    QueryMapper::new(&mut session)
        .execute_raw(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                gender TEXT,
                age INTEGER
            )",
            ReturnMode::AffectedRows,
        )
        .await?;
    Ok(session)
}

#[tokio::test]
async fn insert_returns_generated_id() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let mut mapper = QueryMapper::new(&mut session);

    let first = mapper
        .insert("users", [("name", SqlValue::from("Alice")), ("age", SqlValue::from(30))])
        .await?;
    let second = mapper
        .insert("users", [("name", SqlValue::from("Bob")), ("age", SqlValue::from(41))])
        .await?;
    assert_eq!(first, "1");
    assert_eq!(second, "2");
    assert_eq!(session.last_insert_id(), 2);
    Ok(())
}

#[tokio::test]
async fn mapped_select_binds_by_name() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let mut mapper = QueryMapper::new(&mut session);
    mapper
        .insert("users", [("name", "Alice"), ("gender", "f")])
        .await?;
    mapper.insert("users", [("name", "Bob"), ("gender", "m")]).await?;

    let row = mapper
        .fetch_one(
            "SELECT * FROM users WHERE id = :userId AND name = :name",
            &params! { ":userId" => 2, ":name" => "Bob" },
        )
        .await?
        .expect("row for Bob");
    assert_eq!(row.get("id"), Some(&SqlValue::Int64(2)));
    assert_eq!(row.get("gender"), Some(&SqlValue::from("m")));

    let missing = mapper
        .fetch_one(
            "SELECT * FROM users WHERE id = :userId",
            &params! { ":userId" => 99 },
        )
        .await?;
    assert!(missing.is_none());
    Ok(())
}

#[tokio::test]
async fn fetch_all_keeps_order_and_is_repeatable() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let mut mapper = QueryMapper::new(&mut session);
    for name in ["Ann", "Beth", "Cora"] {
        mapper
            .insert("users", [("name", name), ("gender", "f")])
            .await?;
    }

    let query = "SELECT name FROM users WHERE gender = :gender ORDER BY id";
    let params = params! { ":gender" => "f" };
    let first = mapper.fetch_all(query, &params).await?;
    let second = mapper.fetch_all(query, &params).await?;

    let names: Vec<&SqlValue> = first.iter().filter_map(|r| r.get("name")).collect();
    assert_eq!(
        names,
        vec![
            &SqlValue::from("Ann"),
            &SqlValue::from("Beth"),
            &SqlValue::from("Cora")
        ]
    );
    assert_eq!(first, second);
    assert_eq!(mapper.row_count(query, &params).await?, 3);
    assert_eq!(
        mapper
            .row_count("SELECT * FROM users WHERE gender = 'm'", &Params::new())
            .await?,
        0
    );
    Ok(())
}

#[tokio::test]
async fn update_reports_affected_rows() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let mut users = Repository::new(TableConfig::new("users"), &mut session);
    let id = users.insert([("name", "Alice"), ("gender", "f")]).await?;

    let affected = users
        .update("id", id.parse::<i64>()?, [("name", "Alicia")])
        .await?;
    assert_eq!(affected, 1);

    let row = users.get("id", id.parse::<i64>()?).await?.expect("updated row");
    assert_eq!(row.get("name"), Some(&SqlValue::from("Alicia")));

    let untouched = users.update("id", 404, [("name", "Nobody")]).await?;
    assert_eq!(untouched, 0);
    Ok(())
}

#[tokio::test]
async fn null_and_falsy_values_are_stored_as_empty_text() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let id = InsertBuilder::new("users")
        .value("name", "Alice")
        .value("gender", SqlValue::Null)
        .execute(&mut session)
        .await?;

    let mut mapper = QueryMapper::new(&mut session);
    mapper
        .execute_mapped(
            "UPDATE users SET age = :age WHERE id = :id",
            &params! { ":age" => SqlValue::Null, ":id" => id.parse::<i64>()? },
            ReturnMode::AffectedRows,
        )
        .await?;

    let row = mapper
        .fetch_one("SELECT gender, age FROM users", &Params::new())
        .await?
        .expect("inserted row");
    assert_eq!(row.get("gender"), Some(&SqlValue::String(String::new())));
    assert_eq!(row.get("age"), Some(&SqlValue::String(String::new())));
    Ok(())
}

#[tokio::test]
async fn malformed_sql_is_a_prepare_error() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let mut mapper = QueryMapper::new(&mut session);
    let err = mapper
        .fetch_all("SELEC * FROM users WHERE id = :id", &params! { ":id" => 1 })
        .await
        .unwrap_err();

    match &err {
        SqlxMapError::Prepare { sql, message, .. } => {
            assert_eq!(sql, "SELEC * FROM users WHERE id = ?");
            assert!(!message.is_empty());
        }
        other => panic!("expected prepare error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Bad SQL: SELEC"));
    assert!(session.last_error().is_some());
    Ok(())
}

#[tokio::test]
async fn connect_with_sqlite_config() -> anyhow::Result<()> {
    let mut session = SqlxSession::connect_with(&DbConfig::from_url("sqlite::memory:")?).await?;
    let row = QueryMapper::new(&mut session)
        .fetch_one("SELECT :a + 1 AS n", &params! { ":a" => 41 })
        .await?
        .expect("one row");
    assert_eq!(row.get("n"), Some(&SqlValue::Int64(42)));
    session.close().await?;
    Ok(())
}

#[tokio::test]
async fn sqlite_config_without_path_is_rejected() {
    let err = SqlxSession::connect_with(&DbConfig::sqlite("")).await.unwrap_err();
    assert!(matches!(err, SqlxMapError::Config(_)));
}

#[tokio::test]
async fn raw_insert_reports_generated_id() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let mut mapper = QueryMapper::new(&mut session);
    let result = mapper
        .execute_raw("INSERT INTO users (name) VALUES ('Dora')", ReturnMode::InsertId)
        .await?;
    assert_eq!(result.insert_id(), Some("1"));

    let rows = mapper
        .fetch_all("SELECT name FROM users", &Params::new())
        .await?;
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[tokio::test]
async fn false_binds_as_empty_text() -> anyhow::Result<()> {
    let mut session = users_session().await?;
    let mut mapper = QueryMapper::new(&mut session);
    mapper
        .execute_mapped(
            "INSERT INTO users (name, gender) VALUES (:name, :gender)",
            &params! { ":name" => "Eve", ":gender" => false },
            ReturnMode::InsertId,
        )
        .await?;

    let row = mapper
        .fetch_one("SELECT gender FROM users", &Params::new())
        .await?
        .expect("inserted row");
    assert_eq!(row.get("gender"), Some(&SqlValue::String(String::new())));
    Ok(())
}
