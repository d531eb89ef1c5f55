use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row};

use crate::author::AuthorShort;
use crate::error::Result;
use crate::{ChosenRow, Error, Order};

pub const SORT_FIELDS: &[&str] = &["title"];

#[derive(Debug, Serialize, Clone)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: AuthorShort,
    pub summary: Option<String>,
    pub isbn: Option<String>,
}

impl sqlx::FromRow<'_, ChosenRow> for Book {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let author = AuthorShort {
            id: row.try_get("author_id")?,
            first_name: row.try_get("author_first_name")?,
            family_name: row.try_get("author_family_name")?,
        };
        Ok(Book {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            author,
            summary: row.try_get("summary")?,
            isbn: row.try_get("isbn")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateBook {
    #[garde(length(min = 1, max = 255))]
    pub title: String,
    #[garde(range(min = 0))]
    pub author_id: i64,
    #[garde(length(min = 1, max = 5000))]
    pub summary: Option<String>,
    #[garde(length(min = 1, max = 32))]
    pub isbn: Option<String>,
}

const SELECT_BOOK: &str = r#"
SELECT b.id, b.title, b.summary, b.isbn, b.author_id,
a.first_name AS author_first_name, a.family_name AS author_family_name
FROM book b
JOIN author a ON b.author_id = a.id
"#;

pub type BookRepository = BookRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct BookRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> BookRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateBook) -> Result<Book> {
        // Check the referenced author first, for a better error than the FK failure
        sqlx::query_scalar::<_, i64>("SELECT id FROM author WHERE id = ?")
            .bind(payload.author_id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Author".to_string()))?;

        let result =
            sqlx::query("INSERT INTO book (title, author_id, summary, isbn) VALUES (?, ?, ?, ?)")
                .bind(&payload.title)
                .bind(payload.author_id)
                .bind(&payload.summary)
                .bind(&payload.isbn)
                .execute(&self.executor)
                .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn get(&self, id: i64) -> Result<Book> {
        let sql = format!("{SELECT_BOOK} WHERE b.id = ?");
        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Book".to_string()))
    }

    pub async fn list(&self, order: Option<Order>) -> Result<Vec<Book>> {
        let mut sql = SELECT_BOOK.to_string();
        if let Some(order) = order {
            sql.push_str(&format!(" ORDER BY {}, b.id", order.clause(SORT_FIELDS)?));
        }
        let books = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(&self.executor)
            .await?;
        Ok(books)
    }

    pub async fn list_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        let sql = format!("{SELECT_BOOK} WHERE b.author_id = ? ORDER BY b.title, b.id");
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(author_id)
            .fetch_all(&self.executor)
            .await?;
        Ok(books)
    }
}
