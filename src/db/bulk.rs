//! Multi-row inserts for bulk loading

use sqlx::query_builder::Separated;
use sqlx::{QueryBuilder, Sqlite, Transaction};

/// Rows per INSERT statement. Keeps the bound parameter count well below
/// SQLite's variable limit for the widest table (10 columns).
const BATCH_ROWS: usize = 500;

/// A value that maps onto one row of a table
pub trait TableRow {
    const TABLE: &'static str;
    /// Comma separated column list, in bind order
    const COLUMNS: &'static str;

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>);
}

/// Insert every row inside the caller's transaction. Returns rows written.
pub async fn insert_rows<R: TableRow>(
    tx: &mut Transaction<'_, Sqlite>,
    rows: &[R],
) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;

    for chunk in rows.chunks(BATCH_ROWS) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("INSERT INTO {} ({}) ", R::TABLE, R::COLUMNS));
        builder.push_values(chunk, |mut row, value| value.push_binds(&mut row));

        let result = builder.build().execute(&mut **tx).await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}
