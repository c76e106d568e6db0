use async_trait::async_trait;
use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{Connection, FromRow};

use crate::models::format_date;
use crate::{
    Book, BookRepository, DbError, DbResult, NewBook, NewPublisher, Publisher, PublisherRepository,
};

const SERVER_FORMATTED_COLUMNS: &str = "book.id, book.name, \
     DATE_FORMAT(book.date, '%Y-%m-%d') AS date, \
     publisher.name AS publisher, book.publisher_id";

const NATIVE_DATE_COLUMNS: &str = "book.id, book.name, book.date, \
     publisher.name AS publisher, book.publisher_id";

#[derive(FromRow)]
struct FormattedBookRow {
    id: i64,
    name: String,
    date: String,
    publisher: Option<String>,
    publisher_id: i64,
}

impl From<FormattedBookRow> for Book {
    fn from(row: FormattedBookRow) -> Self {
        Book {
            id: row.id,
            name: row.name,
            date: row.date,
            publisher: row.publisher,
            publisher_id: row.publisher_id,
        }
    }
}

#[derive(FromRow)]
struct NativeBookRow {
    id: i64,
    name: String,
    date: time::Date,
    publisher: Option<String>,
    publisher_id: i64,
}

impl TryFrom<NativeBookRow> for Book {
    type Error = DbError;

    fn try_from(row: NativeBookRow) -> Result<Self, Self::Error> {
        Ok(Book {
            id: row.id,
            name: row.name,
            date: format_date(row.date)?,
            publisher: row.publisher,
            publisher_id: row.publisher_id,
        })
    }
}

/// MySQL client holding one persistent connection.
///
/// The pool is capped at a single connection, so concurrent requests queue on
/// it instead of opening more.
#[derive(Clone)]
pub struct Database {
    pool: MySqlPool,
    date_strings: bool,
}

impl Database {
    /// Build the client without touching the network. The connection is
    /// opened on first use or by [`Database::verify`].
    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy_with(options);

        tracing::debug!(
            host = %settings.host,
            port = settings.port,
            database = %settings.name,
            date_strings = settings.date_strings,
            "MySQL client configured"
        );

        Self {
            pool,
            date_strings: settings.date_strings,
        }
    }

    /// Open the connection and ping the server.
    pub async fn verify(&self) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    /// Close the connection, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn select_books(&self, join: &str) -> String {
        let columns = if self.date_strings {
            SERVER_FORMATTED_COLUMNS
        } else {
            NATIVE_DATE_COLUMNS
        };
        format!(
            "SELECT {} FROM book {} JOIN publisher ON book.publisher_id = publisher.id",
            columns, join
        )
    }
}

fn generated_id(raw: u64) -> DbResult<i64> {
    i64::try_from(raw).map_err(|_| DbError::IdOutOfRange(raw))
}

#[async_trait]
impl BookRepository for Database {
    async fn list_books(&self) -> DbResult<Vec<Book>> {
        let sql = self.select_books("LEFT");

        if self.date_strings {
            let rows = sqlx::query_as::<_, FormattedBookRow>(&sql)
                .fetch_all(&self.pool)
                .await?;
            return Ok(rows.into_iter().map(Book::from).collect());
        }

        let rows = sqlx::query_as::<_, NativeBookRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn find_book(&self, id: i64) -> DbResult<Option<Book>> {
        let sql = format!("{} WHERE book.id = ?", self.select_books("INNER"));

        if self.date_strings {
            let row = sqlx::query_as::<_, FormattedBookRow>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            return Ok(row.map(Book::from));
        }

        let row = sqlx::query_as::<_, NativeBookRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Book::try_from).transpose()
    }

    async fn publisher_exists(&self, publisher_id: i64) -> DbResult<bool> {
        let row = sqlx::query("SELECT id FROM publisher WHERE id = ?")
            .bind(publisher_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert_book(&self, book: &NewBook) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO book (publisher_id, name, date) VALUES (?, ?, ?)")
            .bind(book.publisher_id)
            .bind(&book.name)
            .bind(&book.date)
            .execute(&self.pool)
            .await?;
        generated_id(result.last_insert_id())
    }

    async fn update_book(&self, id: i64, book: &NewBook) -> DbResult<u64> {
        let result =
            sqlx::query("UPDATE book SET publisher_id = ?, name = ?, date = ? WHERE id = ?")
                .bind(book.publisher_id)
                .bind(&book.name)
                .bind(&book.date)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete_book(&self, id: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PublisherRepository for Database {
    async fn list_publishers(&self) -> DbResult<Vec<Publisher>> {
        let rows = sqlx::query_as::<_, Publisher>("SELECT id, name, address, contact FROM publisher")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_publisher(&self, publisher: &NewPublisher) -> DbResult<i64> {
        let result =
            sqlx::query("INSERT INTO publisher (name, address, contact) VALUES (?, ?, ?)")
                .bind(&publisher.name)
                .bind(&publisher.address)
                .bind(&publisher.contact)
                .execute(&self.pool)
                .await?;
        generated_id(result.last_insert_id())
    }

    async fn has_books(&self, publisher_id: i64) -> DbResult<bool> {
        let row = sqlx::query("SELECT id FROM book WHERE publisher_id = ? LIMIT 1")
            .bind(publisher_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn delete_publisher(&self, id: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM publisher WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(date_strings: bool) -> DatabaseSettings {
        DatabaseSettings {
            date_strings,
            ..DatabaseSettings::default()
        }
    }

    #[tokio::test]
    async fn list_query_left_joins_publisher() {
        let db = Database::connect_lazy(&settings(true));
        let sql = db.select_books("LEFT");
        assert!(sql.contains("LEFT JOIN publisher ON book.publisher_id = publisher.id"));
        assert!(sql.contains("DATE_FORMAT(book.date, '%Y-%m-%d') AS date"));
    }

    #[tokio::test]
    async fn native_dates_select_raw_column() {
        let db = Database::connect_lazy(&settings(false));
        let sql = db.select_books("INNER");
        assert!(sql.starts_with("SELECT book.id, book.name, book.date,"));
        assert!(sql.contains("INNER JOIN publisher"));
    }

    #[test]
    fn generated_ids_must_fit_i64() {
        assert_eq!(generated_id(42).unwrap(), 42);
        assert!(matches!(
            generated_id(u64::MAX),
            Err(DbError::IdOutOfRange(u64::MAX))
        ));
    }
}
