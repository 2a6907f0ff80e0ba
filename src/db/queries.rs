//! Analytical query catalog
//!
//! Every endpoint maps to exactly one SQL statement. Amounts are always
//! derived as `detalle_orden.cantidad * producto.precio`; nothing is cached.
//! Money totals are rounded to cents in SQL.
//!
//! "Most / least" queries are a single `UNION ALL` of two ordered, limited
//! sub-selects sharing the same column shape, tagged by `clasificacion`.
//! Ties between equal aggregates are resolved by whatever order SQLite
//! produces and are not part of the contract.

use serde::Serialize;
use sqlx::FromRow;

/// Bumped whenever a query's SQL or output columns change
pub const CATALOG_VERSION: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryId {
    TopCustomer,
    ProductExtremes,
    TopSeller,
    SellerCountryExtremes,
    TopBuyerCountries,
    CategoryExtremes,
    TopCategoryPerCountry,
    MonthlyCountrySales,
    MonthExtremes,
    CategoryProductSales,
}

impl QueryId {
    pub const ALL: [QueryId; 10] = [
        QueryId::TopCustomer,
        QueryId::ProductExtremes,
        QueryId::TopSeller,
        QueryId::SellerCountryExtremes,
        QueryId::TopBuyerCountries,
        QueryId::CategoryExtremes,
        QueryId::TopCategoryPerCountry,
        QueryId::MonthlyCountrySales,
        QueryId::MonthExtremes,
        QueryId::CategoryProductSales,
    ];

    pub fn route(self) -> &'static str {
        match self {
            QueryId::TopCustomer => "/consulta1",
            QueryId::ProductExtremes => "/consulta2",
            QueryId::TopSeller => "/consulta3",
            QueryId::SellerCountryExtremes => "/consulta4",
            QueryId::TopBuyerCountries => "/consulta5",
            QueryId::CategoryExtremes => "/consulta6",
            QueryId::TopCategoryPerCountry => "/consulta7",
            QueryId::MonthlyCountrySales => "/consulta8",
            QueryId::MonthExtremes => "/consulta9",
            QueryId::CategoryProductSales => "/consulta10",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            QueryId::TopCustomer => "Cliente que mas ha comprado",
            QueryId::ProductExtremes => "Producto mas y menos comprado por unidades",
            QueryId::TopSeller => "Vendedor que mas ha vendido",
            QueryId::SellerCountryExtremes => "Pais que mas y menos ha vendido",
            QueryId::TopBuyerCountries => "Top 5 de paises que mas han comprado, en orden ascendente",
            QueryId::CategoryExtremes => "Categoria mas y menos comprada",
            QueryId::TopCategoryPerCountry => "Categoria mas comprada por cada pais",
            QueryId::MonthlyCountrySales => "Ventas por mes de un pais",
            QueryId::MonthExtremes => "Mes con mas y menos ventas",
            QueryId::CategoryProductSales => "Ventas de cada producto de una categoria",
        }
    }

    /// Names of the positional parameters bound into the SQL text
    pub fn params(self) -> &'static [&'static str] {
        match self {
            QueryId::MonthlyCountrySales => &["pais"],
            QueryId::CategoryProductSales => &["categoria"],
            _ => &[],
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            QueryId::TopCustomer => TOP_CUSTOMER,
            QueryId::ProductExtremes => PRODUCT_EXTREMES,
            QueryId::TopSeller => TOP_SELLER,
            QueryId::SellerCountryExtremes => SELLER_COUNTRY_EXTREMES,
            QueryId::TopBuyerCountries => TOP_BUYER_COUNTRIES,
            QueryId::CategoryExtremes => CATEGORY_EXTREMES,
            QueryId::TopCategoryPerCountry => TOP_CATEGORY_PER_COUNTRY,
            QueryId::MonthlyCountrySales => MONTHLY_COUNTRY_SALES,
            QueryId::MonthExtremes => MONTH_EXTREMES,
            QueryId::CategoryProductSales => CATEGORY_PRODUCT_SALES,
        }
    }
}

const TOP_CUSTOMER: &str = r#"
SELECT cliente.id AS id_cliente,
       cliente.nombre AS nombre_cliente,
       cliente.apellido AS apellido_cliente,
       pais.nombre AS pais_cliente,
       ROUND(SUM(producto.precio * detalle_orden.cantidad), 2) AS monto_total
FROM cliente
JOIN orden ON orden.id_cliente = cliente.id
JOIN detalle_orden ON detalle_orden.id_orden = orden.id
JOIN producto ON producto.id = detalle_orden.id_producto
JOIN pais ON pais.id = cliente.id_pais
GROUP BY cliente.id, cliente.nombre, cliente.apellido, pais.nombre
ORDER BY monto_total DESC
LIMIT 1
"#;

const PRODUCT_EXTREMES: &str = r#"
SELECT * FROM (
    SELECT 'mas_comprado' AS clasificacion,
           producto.id AS id_producto,
           producto.nombre AS nombre_producto,
           categoria.nombre AS categoria_producto,
           SUM(detalle_orden.cantidad) AS cantidad_total,
           ROUND(SUM(producto.precio * detalle_orden.cantidad), 2) AS monto_total
    FROM detalle_orden
    JOIN producto ON producto.id = detalle_orden.id_producto
    JOIN categoria ON categoria.id = producto.id_categoria
    GROUP BY producto.id, producto.nombre, categoria.nombre
    ORDER BY cantidad_total DESC
    LIMIT 1
)
UNION ALL
SELECT * FROM (
    SELECT 'menos_comprado' AS clasificacion,
           producto.id AS id_producto,
           producto.nombre AS nombre_producto,
           categoria.nombre AS categoria_producto,
           SUM(detalle_orden.cantidad) AS cantidad_total,
           ROUND(SUM(producto.precio * detalle_orden.cantidad), 2) AS monto_total
    FROM detalle_orden
    JOIN producto ON producto.id = detalle_orden.id_producto
    JOIN categoria ON categoria.id = producto.id_categoria
    GROUP BY producto.id, producto.nombre, categoria.nombre
    ORDER BY cantidad_total ASC
    LIMIT 1
)
ORDER BY clasificacion
"#;

const TOP_SELLER: &str = r#"
SELECT vendedor.id AS id_vendedor,
       vendedor.nombre AS nombre_vendedor,
       ROUND(SUM(producto.precio * detalle_orden.cantidad), 2) AS monto_total_vendido
FROM vendedor
JOIN detalle_orden ON detalle_orden.id_vendedor = vendedor.id
JOIN producto ON producto.id = detalle_orden.id_producto
GROUP BY vendedor.id, vendedor.nombre
ORDER BY monto_total_vendido DESC
LIMIT 1
"#;

const SELLER_COUNTRY_EXTREMES: &str = r#"
SELECT * FROM (
    SELECT 'mas_vendido' AS clasificacion,
           pais.id AS id_pais,
           pais.nombre AS nombre_pais,
           ROUND(SUM(detalle_orden.cantidad * producto.precio), 2) AS monto_total_vendido
    FROM detalle_orden
    JOIN vendedor ON vendedor.id = detalle_orden.id_vendedor
    JOIN pais ON pais.id = vendedor.id_pais
    JOIN producto ON producto.id = detalle_orden.id_producto
    GROUP BY pais.id, pais.nombre
    ORDER BY monto_total_vendido DESC
    LIMIT 1
)
UNION ALL
SELECT * FROM (
    SELECT 'menos_vendido' AS clasificacion,
           pais.id AS id_pais,
           pais.nombre AS nombre_pais,
           ROUND(SUM(detalle_orden.cantidad * producto.precio), 2) AS monto_total_vendido
    FROM detalle_orden
    JOIN vendedor ON vendedor.id = detalle_orden.id_vendedor
    JOIN pais ON pais.id = vendedor.id_pais
    JOIN producto ON producto.id = detalle_orden.id_producto
    GROUP BY pais.id, pais.nombre
    ORDER BY monto_total_vendido ASC
    LIMIT 1
)
ORDER BY clasificacion
"#;

// Top five by spend, then listed smallest first.
const TOP_BUYER_COUNTRIES: &str = r#"
SELECT id_pais, nombre_pais, monto_total FROM (
    SELECT pais.id AS id_pais,
           pais.nombre AS nombre_pais,
           ROUND(SUM(detalle_orden.cantidad * producto.precio), 2) AS monto_total
    FROM detalle_orden
    JOIN orden ON orden.id = detalle_orden.id_orden
    JOIN cliente ON cliente.id = orden.id_cliente
    JOIN pais ON pais.id = cliente.id_pais
    JOIN producto ON producto.id = detalle_orden.id_producto
    GROUP BY pais.id, pais.nombre
    ORDER BY monto_total DESC
    LIMIT 5
)
ORDER BY monto_total ASC
"#;

const CATEGORY_EXTREMES: &str = r#"
SELECT * FROM (
    SELECT 'mas_comprada' AS clasificacion,
           categoria.nombre AS nombre_categoria,
           SUM(detalle_orden.cantidad) AS cantidad_unidades
    FROM detalle_orden
    JOIN producto ON producto.id = detalle_orden.id_producto
    JOIN categoria ON categoria.id = producto.id_categoria
    GROUP BY categoria.id, categoria.nombre
    ORDER BY cantidad_unidades DESC
    LIMIT 1
)
UNION ALL
SELECT * FROM (
    SELECT 'menos_comprada' AS clasificacion,
           categoria.nombre AS nombre_categoria,
           SUM(detalle_orden.cantidad) AS cantidad_unidades
    FROM detalle_orden
    JOIN producto ON producto.id = detalle_orden.id_producto
    JOIN categoria ON categoria.id = producto.id_categoria
    GROUP BY categoria.id, categoria.nombre
    ORDER BY cantidad_unidades ASC
    LIMIT 1
)
ORDER BY clasificacion
"#;

const TOP_CATEGORY_PER_COUNTRY: &str = r#"
SELECT nombre_pais, nombre_categoria, cantidad_unidades
FROM (
    SELECT pais.nombre AS nombre_pais,
           categoria.nombre AS nombre_categoria,
           SUM(detalle_orden.cantidad) AS cantidad_unidades,
           ROW_NUMBER() OVER (
               PARTITION BY pais.id
               ORDER BY SUM(detalle_orden.cantidad) DESC
           ) AS ranking
    FROM detalle_orden
    JOIN orden ON orden.id = detalle_orden.id_orden
    JOIN cliente ON cliente.id = orden.id_cliente
    JOIN pais ON pais.id = cliente.id_pais
    JOIN producto ON producto.id = detalle_orden.id_producto
    JOIN categoria ON categoria.id = producto.id_categoria
    GROUP BY pais.id, pais.nombre, categoria.id, categoria.nombre
)
WHERE ranking = 1
ORDER BY nombre_pais
"#;

const MONTHLY_COUNTRY_SALES: &str = r#"
SELECT CAST(strftime('%m', orden.fecha) AS INTEGER) AS numero_mes,
       ROUND(SUM(detalle_orden.cantidad * producto.precio), 2) AS monto_total
FROM detalle_orden
JOIN orden ON orden.id = detalle_orden.id_orden
JOIN vendedor ON vendedor.id = detalle_orden.id_vendedor
JOIN pais ON pais.id = vendedor.id_pais
JOIN producto ON producto.id = detalle_orden.id_producto
WHERE pais.nombre = ?
GROUP BY numero_mes
ORDER BY numero_mes
"#;

const MONTH_EXTREMES: &str = r#"
SELECT * FROM (
    SELECT 'mas_ventas' AS clasificacion,
           CAST(strftime('%m', orden.fecha) AS INTEGER) AS numero_mes,
           ROUND(SUM(detalle_orden.cantidad * producto.precio), 2) AS monto_total_ventas
    FROM detalle_orden
    JOIN orden ON orden.id = detalle_orden.id_orden
    JOIN producto ON producto.id = detalle_orden.id_producto
    GROUP BY numero_mes
    ORDER BY monto_total_ventas DESC
    LIMIT 1
)
UNION ALL
SELECT * FROM (
    SELECT 'menos_ventas' AS clasificacion,
           CAST(strftime('%m', orden.fecha) AS INTEGER) AS numero_mes,
           ROUND(SUM(detalle_orden.cantidad * producto.precio), 2) AS monto_total_ventas
    FROM detalle_orden
    JOIN orden ON orden.id = detalle_orden.id_orden
    JOIN producto ON producto.id = detalle_orden.id_producto
    GROUP BY numero_mes
    ORDER BY monto_total_ventas ASC
    LIMIT 1
)
ORDER BY clasificacion
"#;

const CATEGORY_PRODUCT_SALES: &str = r#"
SELECT producto.id AS id_producto,
       producto.nombre AS nombre_producto,
       ROUND(SUM(detalle_orden.cantidad * producto.precio), 2) AS monto_total
FROM detalle_orden
JOIN producto ON producto.id = detalle_orden.id_producto
JOIN categoria ON categoria.id = producto.id_categoria
WHERE categoria.nombre = ?
GROUP BY producto.id, producto.nombre
ORDER BY producto.id
"#;

// === Result rows (field names are the JSON contract) ===

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TopCustomer {
    pub id_cliente: i64,
    pub nombre_cliente: String,
    pub apellido_cliente: String,
    pub pais_cliente: String,
    pub monto_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProductRanking {
    pub clasificacion: String,
    pub id_producto: i64,
    pub nombre_producto: String,
    pub categoria_producto: String,
    pub cantidad_total: i64,
    pub monto_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TopSeller {
    pub id_vendedor: i64,
    pub nombre_vendedor: String,
    pub monto_total_vendido: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CountrySalesRanking {
    pub clasificacion: String,
    pub id_pais: i64,
    pub nombre_pais: String,
    pub monto_total_vendido: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CountrySpend {
    pub id_pais: i64,
    pub nombre_pais: String,
    pub monto_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CategoryRanking {
    pub clasificacion: String,
    pub nombre_categoria: String,
    pub cantidad_unidades: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CountryTopCategory {
    pub nombre_pais: String,
    pub nombre_categoria: String,
    pub cantidad_unidades: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthlySales {
    pub numero_mes: i64,
    pub monto_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthRanking {
    pub clasificacion: String,
    pub numero_mes: i64,
    pub monto_total_ventas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProductSales {
    pub id_producto: i64,
    pub nombre_producto: String,
    pub monto_total: f64,
}
