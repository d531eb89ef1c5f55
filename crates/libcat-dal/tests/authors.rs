use futures::TryStreamExt as _;
use libcat_dal::{Filter, Order};
use sqlx::Executor;

const TEST_DATA: &str = r#"
INSERT INTO author (id, first_name, family_name, date_of_birth, date_of_death)
VALUES (1, 'Amin', 'Aoun', '1923-04-02', '1999-11-30');
INSERT INTO author (id, first_name, family_name, date_of_birth, date_of_death)
VALUES (2, 'Jane', 'Dune', '1965-07-14', NULL);
INSERT INTO author (id, first_name, family_name, date_of_birth, date_of_death)
VALUES (3, 'Bora', 'Boon', NULL, '2001-01-01');
INSERT INTO author (id, first_name, family_name, date_of_birth, date_of_death)
VALUES (4, 'Ewa', 'Ewan', NULL, NULL);

INSERT INTO book (id, title, author_id, summary, isbn)
VALUES (1, 'Dust and Dunes', 2, 'A desert saga', '978-0000000001');
INSERT INTO book (id, title, author_id, summary, isbn)
VALUES (2, 'Another Dune', 2, NULL, NULL);
"#;

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    sqlx::migrate!("../../migrations").run(&conn).await.unwrap();

    conn.execute_many(TEST_DATA)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    conn
}

#[tokio::test]
async fn test_author_listing_order() {
    let conn = init_db().await;
    let repo = libcat_dal::author::AuthorRepositoryImpl::new(conn);

    let unordered = repo.list(None).await.unwrap();
    let names: Vec<String> = unordered.iter().map(|a| a.family_name.clone()).collect();
    assert_eq!(names, vec!["Aoun", "Dune", "Boon", "Ewan"]);

    let asc = repo
        .list(Some(Order::Asc("family_name".to_string())))
        .await
        .unwrap();
    let names: Vec<String> = asc.iter().map(|a| a.family_name.clone()).collect();
    assert_eq!(names, vec!["Aoun", "Boon", "Dune", "Ewan"]);

    let desc = repo
        .list(Some(Order::Desc("family_name".to_string())))
        .await
        .unwrap();
    let names: Vec<String> = desc.iter().map(|a| a.family_name.clone()).collect();
    assert_eq!(names, vec!["Ewan", "Dune", "Boon", "Aoun"]);

    let err = repo.list(Some(Order::Asc("id".to_string()))).await;
    assert!(matches!(err, Err(libcat_dal::Error::InvalidOrderByField(_))));
}

#[tokio::test]
async fn test_author_display_strings() {
    let conn = init_db().await;
    let repo = libcat_dal::author::AuthorRepositoryImpl::new(conn);

    let authors = repo
        .list(Some(Order::Asc("family_name".to_string())))
        .await
        .unwrap();
    let display: Vec<String> = authors.iter().map(|a| a.display()).collect();
    assert_eq!(
        display,
        vec![
            "Aoun, Amin : 1923 - 1999",
            "Boon, Bora :  - 2001",
            "Dune, Jane : 1965 - ",
            "Ewan, Ewa :  - ",
        ]
    );
}

#[tokio::test]
async fn test_author_count_filters() {
    let conn = init_db().await;
    let repo = libcat_dal::author::AuthorRepositoryImpl::new(conn);

    assert_eq!(repo.count(&Filter::new()).await.unwrap(), 4);
    assert_eq!(
        repo.count(&Filter::new().equals("first_name", "Jane"))
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        repo.count(&Filter::new().exists("date_of_death", true))
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        repo.count(&Filter::new().exists("date_of_death", false))
            .await
            .unwrap(),
        2
    );
    // AND of two single-key filters
    assert_eq!(
        repo.count(
            &Filter::new()
                .equals("first_name", "Jane")
                .exists("date_of_death", true)
        )
        .await
        .unwrap(),
        0
    );
    assert_eq!(
        repo.count(
            &Filter::new()
                .equals("first_name", "Amin")
                .exists("date_of_death", true)
        )
        .await
        .unwrap(),
        1
    );

    let err = repo.count(&Filter::new().equals("id", "1")).await;
    assert!(matches!(err, Err(libcat_dal::Error::InvalidFilterField(_))));
}

#[tokio::test]
async fn test_author_find_id_by_name() {
    let conn = init_db().await;
    let repo = libcat_dal::author::AuthorRepositoryImpl::new(conn);

    let id = repo.find_id_by_name("Dune", "Jane").await.unwrap();
    assert_eq!(id, Some(2));

    let missing = repo.find_id_by_name("Dune", "John").await.unwrap();
    assert_eq!(missing, None);

    // Case-sensitive exact match
    let missing = repo.find_id_by_name("dune", "jane").await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_author_create_update() {
    let conn = init_db().await;
    let repo = libcat_dal::author::AuthorRepositoryImpl::new(conn);

    let created = repo
        .create(libcat_dal::author::CreateAuthor {
            first_name: "Karel".to_string(),
            family_name: "Capek".to_string(),
            date_of_birth: Some("1890-01-09".to_string()),
            date_of_death: None,
        })
        .await
        .unwrap();
    assert_eq!(created.display(), "Capek, Karel : 1890 - ");

    let updated = repo
        .update(
            created.id,
            libcat_dal::author::CreateAuthor {
                first_name: "Karel".to_string(),
                family_name: "Capek".to_string(),
                date_of_birth: Some("1890-01-09".to_string()),
                date_of_death: Some("1938-12-25".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.lifespan(), "1890 - 1938");

    let err = repo
        .update(
            9999,
            libcat_dal::author::CreateAuthor {
                first_name: "No".to_string(),
                family_name: "One".to_string(),
                date_of_birth: None,
                date_of_death: None,
            },
        )
        .await;
    assert!(matches!(err, Err(libcat_dal::Error::RecordNotFound(_))));
}

#[tokio::test]
async fn test_books() {
    let conn = init_db().await;
    let repo = libcat_dal::book::BookRepositoryImpl::new(conn);

    let book = repo.get(1).await.unwrap();
    assert_eq!(book.title, "Dust and Dunes");
    assert_eq!(book.author.family_name, "Dune");

    let all = repo
        .list(Some(Order::Asc("title".to_string())))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Another Dune");

    let by_author = repo.list_by_author(2).await.unwrap();
    assert_eq!(by_author.len(), 2);

    let created = repo
        .create(libcat_dal::book::CreateBook {
            title: "Boon Companion".to_string(),
            author_id: 3,
            summary: None,
            isbn: None,
        })
        .await
        .unwrap();
    assert_eq!(created.author.family_name, "Boon");

    let err = repo
        .create(libcat_dal::book::CreateBook {
            title: "Orphan".to_string(),
            author_id: 9999,
            summary: None,
            isbn: None,
        })
        .await;
    assert!(matches!(err, Err(libcat_dal::Error::RecordNotFound(_))));
}
