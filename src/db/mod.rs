//! Database module

mod bulk;
pub mod queries;
mod schema;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite, Transaction};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use queries::{
    CategoryRanking, CountrySalesRanking, CountrySpend, CountryTopCategory, MonthRanking,
    MonthlySales, ProductRanking, ProductSales, QueryId, TopCustomer, TopSeller,
};

pub use bulk::{insert_rows, TableRow};
pub use schema::TABLES;

/// Shared handle to the connection pool, cloned into every request handler
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let in_memory = config.url == ":memory:";
        let mut options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // An in-memory database lives and dies with its single connection
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(
            "Database pool opened at {} (max_connections={})",
            config.url,
            pool.options().get_max_connections()
        );
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            ..DatabaseConfig::default()
        };
        Self::new(&config).await.unwrap()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    // === Schema management ===

    /// Drop every table that exists and recreate the full model, atomically
    pub async fn create_schema(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for table in schema::teardown_order() {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(&mut *tx)
                .await?;
        }
        for (table, ddl) in TABLES {
            debug!("Creating table {}", table);
            sqlx::query(ddl).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("Schema created ({} tables)", TABLES.len());
        Ok(())
    }

    pub async fn drop_schema(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for table in schema::teardown_order() {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        info!("Schema dropped");
        Ok(())
    }

    /// Delete every row, keeping the tables
    pub async fn clear_data(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for table in schema::teardown_order() {
            let result = sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
            debug!("Deleted {} rows from {}", result.rows_affected(), table);
        }
        tx.commit().await?;
        info!("All data deleted");
        Ok(())
    }

    #[cfg(test)]
    pub async fn count_rows(&self, table: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    // === Catalog queries ===

    pub async fn top_customer(&self) -> Result<Option<TopCustomer>, sqlx::Error> {
        sqlx::query_as(QueryId::TopCustomer.sql())
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn product_extremes(&self) -> Result<Vec<ProductRanking>, sqlx::Error> {
        sqlx::query_as(QueryId::ProductExtremes.sql())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn top_seller(&self) -> Result<Option<TopSeller>, sqlx::Error> {
        sqlx::query_as(QueryId::TopSeller.sql())
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn seller_country_extremes(&self) -> Result<Vec<CountrySalesRanking>, sqlx::Error> {
        sqlx::query_as(QueryId::SellerCountryExtremes.sql())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn top_buyer_countries(&self) -> Result<Vec<CountrySpend>, sqlx::Error> {
        sqlx::query_as(QueryId::TopBuyerCountries.sql())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn category_extremes(&self) -> Result<Vec<CategoryRanking>, sqlx::Error> {
        sqlx::query_as(QueryId::CategoryExtremes.sql())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn top_category_per_country(&self) -> Result<Vec<CountryTopCategory>, sqlx::Error> {
        sqlx::query_as(QueryId::TopCategoryPerCountry.sql())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn monthly_country_sales(&self, country: &str) -> Result<Vec<MonthlySales>, sqlx::Error> {
        sqlx::query_as(QueryId::MonthlyCountrySales.sql())
            .bind(country)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn month_extremes(&self) -> Result<Vec<MonthRanking>, sqlx::Error> {
        sqlx::query_as(QueryId::MonthExtremes.sql())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn category_product_sales(&self, category: &str) -> Result<Vec<ProductSales>, sqlx::Error> {
        sqlx::query_as(QueryId::CategoryProductSales.sql())
            .bind(category)
            .fetch_all(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_database, seeded_database, write_records};
    use tempfile::TempDir;

    /// One category, country, customer and seller; products and order lines vary
    async fn small_database(products: &str, orders: &str) -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let products = format!("id_producto;Nombre;Precio;id_categoria\n{}", products);
        let orders = format!(
            "id_orden;linea_orden;fecha_orden;id_cliente;id_vendedor;id_producto;cantidad\n{}",
            orders
        );
        write_records(
            dir.path(),
            &[
                ("Categorias.csv", "id_categoria;nombre\n1;Deportes\n"),
                ("productos.csv", &products),
                ("paises.csv", "id_pais;nombre\n1;Guatemala\n"),
                (
                    "clientes.csv",
                    "id_cliente;Nombre;Apellido;Direccion;Telefono;Tarjeta;Edad;Salario;Genero;id_pais\n\
                     1;Ana;Lopez;Calle 1;555;4111;30;1000.00;F;1\n",
                ),
                ("vendedores.csv", "id_vendedor;nombre;id_pais\n1;Carlos;1\n"),
                ("ordenes.csv", &orders),
            ],
        );
        let db = loaded_database(dir.path()).await;
        (db, dir)
    }

    async fn table_names(db: &Database) -> Vec<String> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&db.pool)
        .await
        .unwrap();
        rows.into_iter().map(|(name,)| name).collect()
    }

    #[tokio::test]
    async fn create_schema_builds_all_tables_and_is_repeatable() {
        let db = Database::in_memory().await;
        db.create_schema().await.unwrap();
        db.create_schema().await.unwrap();

        let names = table_names(&db).await;
        for (table, _) in TABLES {
            assert!(names.iter().any(|n| n == table), "missing {}", table);
        }
        for (table, _) in TABLES {
            assert_eq!(db.count_rows(table).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn drop_then_create_restores_empty_schema() {
        let (db, _dir) = seeded_database().await;
        db.drop_schema().await.unwrap();
        assert!(table_names(&db).await.is_empty());

        db.create_schema().await.unwrap();
        assert_eq!(db.count_rows("detalle_orden").await.unwrap(), 0);
        assert!(db.top_customer().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_data_is_idempotent_and_keeps_tables() {
        let (db, _dir) = seeded_database().await;
        assert!(db.count_rows("detalle_orden").await.unwrap() > 0);

        db.clear_data().await.unwrap();
        db.clear_data().await.unwrap();

        assert_eq!(table_names(&db).await.len(), TABLES.len());
        for (table, _) in TABLES {
            assert_eq!(db.count_rows(table).await.unwrap(), 0, "{}", table);
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::in_memory().await;
        db.create_schema().await.unwrap();
        let result = sqlx::query("INSERT INTO producto (id, nombre, precio, id_categoria) VALUES (1, 'x', 1.0, 99)")
            .execute(&db.pool)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn queries_on_empty_schema_return_nothing() {
        let db = Database::in_memory().await;
        db.create_schema().await.unwrap();

        assert!(db.top_customer().await.unwrap().is_none());
        assert!(db.product_extremes().await.unwrap().is_empty());
        assert!(db.top_seller().await.unwrap().is_none());
        assert!(db.seller_country_extremes().await.unwrap().is_empty());
        assert!(db.top_buyer_countries().await.unwrap().is_empty());
        assert!(db.category_extremes().await.unwrap().is_empty());
        assert!(db.top_category_per_country().await.unwrap().is_empty());
        assert!(db.monthly_country_sales("Inglaterra").await.unwrap().is_empty());
        assert!(db.month_extremes().await.unwrap().is_empty());
        assert!(db.category_product_sales("Deportes").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queries_fail_without_schema() {
        let db = Database::in_memory().await;
        assert!(db.top_customer().await.is_err());
        assert!(db.clear_data().await.is_err());
    }

    #[tokio::test]
    async fn top_customer_and_seller() {
        let (db, _dir) = seeded_database().await;

        let customer = db.top_customer().await.unwrap().unwrap();
        assert_eq!(
            customer,
            TopCustomer {
                id_cliente: 1,
                nombre_cliente: "Ana".to_string(),
                apellido_cliente: "Lopez".to_string(),
                pais_cliente: "Inglaterra".to_string(),
                monto_total: 110.0,
            }
        );

        let seller = db.top_seller().await.unwrap().unwrap();
        assert_eq!(seller.id_vendedor, 1);
        assert_eq!(seller.nombre_vendedor, "Carlos");
        assert_eq!(seller.monto_total_vendido, 130.0);
    }

    #[tokio::test]
    async fn product_extremes_rank_by_quantity() {
        let (db, _dir) = seeded_database().await;
        let rows = db.product_extremes().await.unwrap();
        assert_eq!(
            rows,
            vec![
                ProductRanking {
                    clasificacion: "mas_comprado".to_string(),
                    id_producto: 1,
                    nombre_producto: "Balon".to_string(),
                    categoria_producto: "Deportes".to_string(),
                    cantidad_total: 14,
                    monto_total: 70.0,
                },
                ProductRanking {
                    clasificacion: "menos_comprado".to_string(),
                    id_producto: 3,
                    nombre_producto: "Raqueta".to_string(),
                    categoria_producto: "Deportes".to_string(),
                    cantidad_total: 1,
                    monto_total: 50.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn quantity_ranking_is_not_revenue_ranking() {
        let dir = tempfile::tempdir().unwrap();
        write_records(
            dir.path(),
            &[
                ("Categorias.csv", "id_categoria;nombre\n1;General\n"),
                (
                    "productos.csv",
                    "id_producto;Nombre;Precio;id_categoria\n1;A;5.00;1\n2;B;20.00;1\n",
                ),
                ("paises.csv", "id_pais;nombre\n1;Guatemala\n"),
                (
                    "clientes.csv",
                    "id_cliente;Nombre;Apellido;Direccion;Telefono;Tarjeta;Edad;Salario;Genero;id_pais\n\
                     1;Ana;Lopez;Calle 1;555;4111;30;1000.00;F;1\n",
                ),
                ("vendedores.csv", "id_vendedor;nombre;id_pais\n1;Carlos;1\n"),
                (
                    "ordenes.csv",
                    "id_orden;linea_orden;fecha_orden;id_cliente;id_vendedor;id_producto;cantidad\n\
                     1;1;01/02/2023;1;1;1;10\n\
                     1;2;01/02/2023;1;1;2;3\n",
                ),
            ],
        );
        let db = loaded_database(dir.path()).await;

        let rows = db.product_extremes().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].nombre_producto.as_str(), rows[0].cantidad_total, rows[0].monto_total), ("A", 10, 50.0));
        assert_eq!((rows[1].nombre_producto.as_str(), rows[1].cantidad_total, rows[1].monto_total), ("B", 3, 60.0));
    }

    #[tokio::test]
    async fn country_queries() {
        let (db, _dir) = seeded_database().await;

        let sellers = db.seller_country_extremes().await.unwrap();
        let summary: Vec<_> = sellers
            .iter()
            .map(|r| (r.clasificacion.as_str(), r.nombre_pais.as_str(), r.monto_total_vendido))
            .collect();
        assert_eq!(
            summary,
            vec![("mas_vendido", "Inglaterra", 130.0), ("menos_vendido", "Guatemala", 70.0)]
        );

        let buyers = db.top_buyer_countries().await.unwrap();
        let summary: Vec<_> = buyers
            .iter()
            .map(|r| (r.id_pais, r.nombre_pais.as_str(), r.monto_total))
            .collect();
        assert_eq!(
            summary,
            vec![(3, "Mexico", 20.0), (2, "Guatemala", 70.0), (1, "Inglaterra", 110.0)]
        );
    }

    #[tokio::test]
    async fn category_queries() {
        let (db, _dir) = seeded_database().await;

        let extremes = db.category_extremes().await.unwrap();
        assert_eq!(
            extremes,
            vec![
                CategoryRanking {
                    clasificacion: "mas_comprada".to_string(),
                    nombre_categoria: "Deportes".to_string(),
                    cantidad_unidades: 15,
                },
                CategoryRanking {
                    clasificacion: "menos_comprada".to_string(),
                    nombre_categoria: "Libros".to_string(),
                    cantidad_unidades: 2,
                },
            ]
        );

        let per_country = db.top_category_per_country().await.unwrap();
        let summary: Vec<_> = per_country
            .iter()
            .map(|r| (r.nombre_pais.as_str(), r.nombre_categoria.as_str(), r.cantidad_unidades))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Guatemala", "Libros", 2),
                ("Inglaterra", "Deportes", 10),
                ("Mexico", "Deportes", 4),
            ]
        );

        let sports = db.category_product_sales("Deportes").await.unwrap();
        assert_eq!(
            sports,
            vec![
                ProductSales { id_producto: 1, nombre_producto: "Balon".to_string(), monto_total: 70.0 },
                ProductSales { id_producto: 3, nombre_producto: "Raqueta".to_string(), monto_total: 50.0 },
            ]
        );
        assert!(db.category_product_sales("Jardin").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn monthly_queries_only_report_months_with_sales() {
        let (db, _dir) = seeded_database().await;

        let england = db.monthly_country_sales("Inglaterra").await.unwrap();
        assert_eq!(
            england,
            vec![
                MonthlySales { numero_mes: 1, monto_total: 110.0 },
                MonthlySales { numero_mes: 3, monto_total: 20.0 },
            ]
        );

        let months = db.month_extremes().await.unwrap();
        assert_eq!(
            months,
            vec![
                MonthRanking { clasificacion: "mas_ventas".to_string(), numero_mes: 1, monto_total_ventas: 110.0 },
                MonthRanking { clasificacion: "menos_ventas".to_string(), numero_mes: 3, monto_total_ventas: 90.0 },
            ]
        );
    }

    #[tokio::test]
    async fn money_totals_are_exact_to_the_cent() {
        let (db, _dir) = small_database(
            "1;Cordon;0.10;1\n2;Gorra;19.99;1\n",
            "1;1;05/06/2023;1;1;1;1\n\
             1;2;05/06/2023;1;1;1;1\n\
             1;3;05/06/2023;1;1;1;1\n\
             1;4;05/06/2023;1;1;2;3\n",
        )
        .await;

        assert_eq!(
            db.category_product_sales("Deportes").await.unwrap(),
            vec![
                ProductSales { id_producto: 1, nombre_producto: "Cordon".to_string(), monto_total: 0.3 },
                ProductSales { id_producto: 2, nombre_producto: "Gorra".to_string(), monto_total: 59.97 },
            ]
        );

        let products = db.product_extremes().await.unwrap();
        let amounts: Vec<_> = products.iter().map(|r| (r.nombre_producto.as_str(), r.monto_total)).collect();
        assert_eq!(amounts, vec![("Cordon", 0.3), ("Gorra", 59.97)]);

        assert_eq!(db.top_customer().await.unwrap().unwrap().monto_total, 60.27);
        assert_eq!(db.top_seller().await.unwrap().unwrap().monto_total_vendido, 60.27);
        assert_eq!(
            db.monthly_country_sales("Guatemala").await.unwrap(),
            vec![MonthlySales { numero_mes: 6, monto_total: 60.27 }]
        );
    }

    #[tokio::test]
    async fn single_group_fills_both_halves_of_paired_queries() {
        let (db, _dir) = small_database("1;Balon;5.00;1\n", "1;1;10/04/2023;1;1;1;2\n").await;

        let products = db.product_extremes().await.unwrap();
        let summary: Vec<_> = products
            .iter()
            .map(|r| (r.clasificacion.as_str(), r.id_producto, r.cantidad_total, r.monto_total))
            .collect();
        assert_eq!(summary, vec![("mas_comprado", 1, 2, 10.0), ("menos_comprado", 1, 2, 10.0)]);

        assert_eq!(
            db.month_extremes().await.unwrap(),
            vec![
                MonthRanking { clasificacion: "mas_ventas".to_string(), numero_mes: 4, monto_total_ventas: 10.0 },
                MonthRanking { clasificacion: "menos_ventas".to_string(), numero_mes: 4, monto_total_ventas: 10.0 },
            ]
        );

        let countries = db.seller_country_extremes().await.unwrap();
        assert_eq!(countries.len(), 2);
        assert!(countries.iter().all(|r| r.nombre_pais == "Guatemala"));

        let categories = db.category_extremes().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|r| r.nombre_categoria == "Deportes" && r.cantidad_unidades == 2));
    }
}
