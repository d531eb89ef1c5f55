use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::format_description::BorrowedFormatItem;
use time::Date;

use crate::error::Result;
use crate::{Error, Filter, Order};

/// Fields accepted in a sort specification for author listings.
pub const SORT_FIELDS: &[&str] = &["family_name", "first_name"];

/// Fields accepted in a count filter.
pub const FILTER_FIELDS: &[&str] = &[
    "first_name",
    "family_name",
    "date_of_birth",
    "date_of_death",
];

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, DATE_FORMAT)
}

fn is_valid_date(value: &str, _ctx: &()) -> garde::Result {
    parse_date(value)
        .map(|_| ())
        .map_err(|_| garde::Error::new("must be a valid calendar date in YYYY-MM-DD format"))
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<Date>,
    pub date_of_death: Option<Date>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthorShort {
    pub id: i64,
    pub first_name: String,
    pub family_name: String,
}

impl Author {
    /// Display name, `"Family, First"`. Empty when either part is missing,
    /// so a broken record renders as blank instead of a dangling comma.
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            String::new()
        } else {
            format!("{}, {}", self.family_name, self.first_name)
        }
    }

    /// `"<birth_year> - <death_year>"`, with an empty side for a missing date.
    pub fn lifespan(&self) -> String {
        let birth = self
            .date_of_birth
            .map(|d| d.year().to_string())
            .unwrap_or_default();
        let death = self
            .date_of_death
            .map(|d| d.year().to_string())
            .unwrap_or_default();
        format!("{} - {}", birth, death)
    }

    /// The listing display string, `"<name> : <lifespan>"`.
    pub fn display(&self) -> String {
        format!("{} : {}", self.name(), self.lifespan())
    }
}

/// Payload for create and for full-document replace on update.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateAuthor {
    #[garde(length(min = 1, max = 100))]
    pub first_name: String,
    #[garde(length(min = 1, max = 100))]
    pub family_name: String,
    #[garde(inner(custom(is_valid_date)))]
    pub date_of_birth: Option<String>,
    #[garde(inner(custom(is_valid_date)))]
    pub date_of_death: Option<String>,
}

fn parse_optional_date(value: Option<&str>, field: &str) -> Result<Option<Date>> {
    value
        .map(|v| parse_date(v).map_err(|_| Error::InvalidDate(field.to_string())))
        .transpose()
}

pub type AuthorRepository = AuthorRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct AuthorRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> AuthorRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateAuthor) -> Result<Author> {
        let date_of_birth = parse_optional_date(payload.date_of_birth.as_deref(), "date_of_birth")?;
        let date_of_death = parse_optional_date(payload.date_of_death.as_deref(), "date_of_death")?;
        let result = sqlx::query(
            "INSERT INTO author (first_name, family_name, date_of_birth, date_of_death) VALUES (?, ?, ?, ?)",
        )
        .bind(&payload.first_name)
        .bind(&payload.family_name)
        .bind(date_of_birth)
        .bind(date_of_death)
        .execute(&self.executor)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn get(&self, id: i64) -> Result<Author> {
        sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_of_birth, date_of_death FROM author WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound("Author".to_string()))
    }

    /// Full-document replace; identity is the only thing kept.
    pub async fn update(&self, id: i64, payload: CreateAuthor) -> Result<Author> {
        let date_of_birth = parse_optional_date(payload.date_of_birth.as_deref(), "date_of_birth")?;
        let date_of_death = parse_optional_date(payload.date_of_death.as_deref(), "date_of_death")?;
        let result = sqlx::query(
            "UPDATE author SET first_name = ?, family_name = ?, date_of_birth = ?, date_of_death = ? WHERE id = ?",
        )
        .bind(&payload.first_name)
        .bind(&payload.family_name)
        .bind(date_of_birth)
        .bind(date_of_death)
        .bind(id)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RecordNotFound("Author".to_string()));
        }
        self.get(id).await
    }

    /// Lists authors, optionally sorted by one of [`SORT_FIELDS`]. Without an
    /// order the rows come back in storage order; with one, ties are broken
    /// by id so the order is stable.
    pub async fn list(&self, order: Option<Order>) -> Result<Vec<Author>> {
        let mut sql =
            "SELECT id, first_name, family_name, date_of_birth, date_of_death FROM author"
                .to_string();
        if let Some(order) = order {
            sql.push_str(&format!(" ORDER BY {}, id", order.clause(SORT_FIELDS)?));
        }
        let authors = sqlx::query_as::<_, Author>(&sql)
            .fetch_all(&self.executor)
            .await?;
        Ok(authors)
    }

    /// Counts authors matching the filter; all predicates are ANDed.
    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        let (clause, binds) = filter.where_clause(FILTER_FIELDS)?;
        let sql = format!("SELECT count(*) FROM author{clause}");
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in binds {
            query = query.bind(value);
        }
        let count = query.fetch_one(&self.executor).await?;
        Ok(count as u64)
    }

    /// Exact match on both name fields, first match in storage order.
    /// Absence is a normal result, not an error.
    pub async fn find_id_by_name(
        &self,
        family_name: &str,
        first_name: &str,
    ) -> Result<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM author WHERE family_name = ? AND first_name = ? LIMIT 1",
        )
        .bind(family_name)
        .bind(first_name)
        .fetch_optional(&self.executor)
        .await?;
        Ok(id)
    }
}
