//! Bulk loader for the `;` delimited source files
//!
//! Files are loaded in dependency order. Each file is parsed completely, then
//! written in a single transaction: a file is either fully loaded or not at
//! all. Files committed before a failure stay committed.

mod records;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::LoaderConfig;
use crate::db::{insert_rows, Database, TableRow};
use records::{
    group_orders, Category, Country, Customer, OrderHeader, OrderLine, OrderRecord, Product, Seller,
};

pub const CATEGORIES_FILE: &str = "Categorias.csv";
pub const PRODUCTS_FILE: &str = "productos.csv";
pub const COUNTRIES_FILE: &str = "paises.csv";
pub const CUSTOMERS_FILE: &str = "clientes.csv";
pub const SELLERS_FILE: &str = "vendedores.csv";
pub const ORDERS_FILE: &str = "ordenes.csv";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid row in {}: {source}", .path.display())]
    Row {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("order {order_id}: invalid date '{value}', expected DD/MM/YYYY")]
    InvalidDate {
        order_id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("order {order_id}: lines disagree on date or customer")]
    ConflictingOrder { order_id: i64 },

    #[error("failed to load table {table}: {source}")]
    Database {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("file reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl LoadError {
    /// True when the source data is at fault rather than the database
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LoadError::Read { .. }
                | LoadError::Row { .. }
                | LoadError::InvalidDate { .. }
                | LoadError::ConflictingOrder { .. }
        )
    }

    fn database(table: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| LoadError::Database { table, source }
    }
}

/// Rows written per table by a successful load
#[derive(Debug, Default, Serialize)]
pub struct LoadReport {
    pub filas: BTreeMap<&'static str, u64>,
}

pub struct Loader {
    data_dir: PathBuf,
    delimiter: u8,
}

impl Loader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            data_dir: PathBuf::from(&config.data_dir),
            delimiter: config.delimiter as u8,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub async fn load_model(&self, db: &Database) -> Result<LoadReport, LoadError> {
        info!("Loading model from {}", self.data_dir.display());
        let mut report = LoadReport::default();

        let result = self.load_all(db, &mut report).await;
        match &result {
            Ok(()) => info!("Model loaded: {:?}", report.filas),
            Err(e) => error!("Model load aborted after {:?}: {}", report.filas, e),
        }
        result.map(|()| report)
    }

    async fn load_all(&self, db: &Database, report: &mut LoadReport) -> Result<(), LoadError> {
        self.load_table::<Category>(db, CATEGORIES_FILE, report).await?;
        self.load_table::<Product>(db, PRODUCTS_FILE, report).await?;
        self.load_table::<Country>(db, COUNTRIES_FILE, report).await?;
        self.load_table::<Customer>(db, CUSTOMERS_FILE, report).await?;
        self.load_table::<Seller>(db, SELLERS_FILE, report).await?;
        self.load_orders(db, report).await
    }

    async fn load_table<R>(&self, db: &Database, file: &str, report: &mut LoadReport) -> Result<(), LoadError>
    where
        R: TableRow + DeserializeOwned + Send + 'static,
    {
        let rows: Vec<R> = self.read_records(file).await?;

        let mut tx = db.begin().await.map_err(LoadError::database(R::TABLE))?;
        let inserted = insert_rows(&mut tx, &rows)
            .await
            .map_err(LoadError::database(R::TABLE))?;
        tx.commit().await.map_err(LoadError::database(R::TABLE))?;

        info!("Loaded {} rows into {} from {}", inserted, R::TABLE, file);
        report.filas.insert(R::TABLE, inserted);
        Ok(())
    }

    async fn load_orders(&self, db: &Database, report: &mut LoadReport) -> Result<(), LoadError> {
        let records: Vec<OrderRecord> = self.read_records(ORDERS_FILE).await?;
        let (headers, lines) = group_orders(&records)?;

        let mut tx = db.begin().await.map_err(LoadError::database(OrderHeader::TABLE))?;
        let orders = insert_rows(&mut tx, &headers)
            .await
            .map_err(LoadError::database(OrderHeader::TABLE))?;
        let details = insert_rows(&mut tx, &lines)
            .await
            .map_err(LoadError::database(OrderLine::TABLE))?;
        tx.commit().await.map_err(LoadError::database(OrderLine::TABLE))?;

        info!("Loaded {} orders with {} lines from {}", orders, details, ORDERS_FILE);
        report.filas.insert(OrderHeader::TABLE, orders);
        report.filas.insert(OrderLine::TABLE, details);
        Ok(())
    }

    /// Parses a whole file on the blocking pool
    async fn read_records<R>(&self, file: &str) -> Result<Vec<R>, LoadError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let path = self.data_dir.join(file);
        let delimiter = self.delimiter;
        tokio::task::spawn_blocking(move || parse_file(&path, delimiter)).await?
    }
}

fn parse_file<R: DeserializeOwned>(path: &Path, delimiter: u8) -> Result<Vec<R>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .deserialize()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(|source| LoadError::Row {
            path: path.to_path_buf(),
            source,
        })
}
