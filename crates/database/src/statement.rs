use core_types::Book;

/// The relation holding all book rows.
pub const BOOKS_TABLE: &str = r#""bookstore.db::books""#;

/// Whether a statement returns rows or only an affected-row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Command,
}

/// SQL text plus the values bound to its `$n` placeholders.
///
/// Values are never spliced into the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    params: Vec<String>,
    kind: StatementKind,
}

impl Statement {
    pub fn query(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            kind: StatementKind::Query,
        }
    }

    pub fn command(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            kind: StatementKind::Command,
        }
    }

    pub fn bind(mut self, value: impl Into<String>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// `SELECT * FROM "bookstore.db::books"`
    pub fn select_books() -> Self {
        Self::query(format!("SELECT * FROM {}", BOOKS_TABLE))
    }

    /// One-row insert with the three book fields bound in column order.
    pub fn insert_book(book: &Book) -> Self {
        Self::command(format!("insert into {} values ($1, $2, $3)", BOOKS_TABLE))
            .bind(book.id.as_str())
            .bind(book.title.as_str())
            .bind(book.author.as_str())
    }

    /// A statement that touches no relation, used to verify connectivity.
    pub fn ping() -> Self {
        Self::command("SELECT 1")
    }
}

/// `SET SCHEMA` does not accept bind parameters, so the schema is sent as a
/// quoted literal.
pub fn set_schema_sql(schema: &str) -> String {
    format!("SET SCHEMA '{}'", schema.replace('\'', "''"))
}

/// `CREATE SCHEMA IF NOT EXISTS "<schema>"` with the identifier quoted.
///
/// The quoted identifier keeps the exact spelling that `SET SCHEMA` selects.
pub fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", schema.replace('"', "\"\""))
}

/// Statements run before the migrator: the schema must exist before it can
/// hold `_sqlx_migrations` and the books relation.
pub fn migration_preamble(schema: &str) -> [String; 2] {
    [create_schema_sql(schema), set_schema_sql(schema)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_reads_whole_relation() {
        let statement = Statement::select_books();
        assert_eq!(statement.sql(), r#"SELECT * FROM "bookstore.db::books""#);
        assert_eq!(statement.kind(), StatementKind::Query);
        assert!(statement.params().is_empty());
    }

    #[test]
    fn insert_binds_values_instead_of_splicing() {
        let book = Book {
            id: "1".into(),
            title: "It's Dune'); drop table x; --".into(),
            author: "Herbert".into(),
        };
        let statement = Statement::insert_book(&book);
        assert_eq!(
            statement.sql(),
            r#"insert into "bookstore.db::books" values ($1, $2, $3)"#
        );
        assert_eq!(statement.params(), ["1", "It's Dune'); drop table x; --", "Herbert"]);
        assert_eq!(statement.kind(), StatementKind::Command);
    }

    #[test]
    fn schema_literal_is_quoted() {
        assert_eq!(set_schema_sql("BOOKSTORE_1"), "SET SCHEMA 'BOOKSTORE_1'");
        assert_eq!(set_schema_sql("o'brien"), "SET SCHEMA 'o''brien'");
    }

    #[test]
    fn schema_identifier_is_quoted() {
        assert_eq!(
            create_schema_sql("bookstore"),
            r#"CREATE SCHEMA IF NOT EXISTS "bookstore""#
        );
        assert_eq!(
            create_schema_sql(r#"book"store"#),
            r#"CREATE SCHEMA IF NOT EXISTS "book""store""#
        );
    }

    #[test]
    fn migration_creates_schema_before_selecting_it() {
        assert_eq!(
            migration_preamble("bookstore"),
            [
                r#"CREATE SCHEMA IF NOT EXISTS "bookstore""#.to_string(),
                "SET SCHEMA 'bookstore'".to_string(),
            ]
        );
    }
}
