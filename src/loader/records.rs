//! Source file records
//!
//! Header names follow the existing data files and are matched exactly.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::query_builder::Separated;
use sqlx::Sqlite;

use super::LoadError;
use crate::db::TableRow;

const SOURCE_DATE_FORMAT: &str = "%d/%m/%Y";
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    #[serde(rename = "id_categoria")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    #[serde(rename = "id_producto")]
    pub id: i64,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Precio")]
    pub price: f64,
    #[serde(rename = "id_categoria")]
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Country {
    #[serde(rename = "id_pais")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    #[serde(rename = "id_cliente")]
    pub id: i64,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Apellido")]
    pub last_name: String,
    #[serde(rename = "Direccion")]
    pub address: String,
    #[serde(rename = "Telefono")]
    pub phone: String,
    #[serde(rename = "Tarjeta")]
    pub card: String,
    #[serde(rename = "Edad")]
    pub age: i64,
    #[serde(rename = "Salario")]
    pub salary: f64,
    #[serde(rename = "Genero")]
    pub gender: String,
    #[serde(rename = "id_pais")]
    pub country_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Seller {
    #[serde(rename = "id_vendedor")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "id_pais")]
    pub country_id: i64,
}

/// One line of `ordenes.csv`: order header fields repeated on every line
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "id_orden")]
    pub order_id: i64,
    #[serde(rename = "linea_orden")]
    pub line_no: i64,
    #[serde(rename = "fecha_orden")]
    pub date: String,
    #[serde(rename = "id_cliente")]
    pub customer_id: i64,
    #[serde(rename = "id_vendedor")]
    pub seller_id: i64,
    #[serde(rename = "id_producto")]
    pub product_id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderHeader {
    pub id: i64,
    /// YYYY-MM-DD
    pub date: String,
    pub customer_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub line_no: i64,
    pub seller_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// Convert `DD/MM/YYYY` into `YYYY-MM-DD`
pub fn normalize_date(order_id: i64, value: &str) -> Result<String, LoadError> {
    NaiveDate::parse_from_str(value, SOURCE_DATE_FORMAT)
        .map(|date| date.format(STORED_DATE_FORMAT).to_string())
        .map_err(|source| LoadError::InvalidDate {
            order_id,
            value: value.to_string(),
            source,
        })
}

/// Split order file lines into one header per order id plus one line per row.
///
/// Rows do not need to be sorted by order id. Headers keep first-seen order.
/// Detail ids are the 1-based row positions in the file.
pub fn group_orders(records: &[OrderRecord]) -> Result<(Vec<OrderHeader>, Vec<OrderLine>), LoadError> {
    let mut headers: Vec<OrderHeader> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut lines = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let date = normalize_date(record.order_id, &record.date)?;

        match positions.get(&record.order_id) {
            Some(&pos) => {
                let header: &OrderHeader = &headers[pos];
                if header.date != date || header.customer_id != record.customer_id {
                    return Err(LoadError::ConflictingOrder {
                        order_id: record.order_id,
                    });
                }
            }
            None => {
                positions.insert(record.order_id, headers.len());
                headers.push(OrderHeader {
                    id: record.order_id,
                    date,
                    customer_id: record.customer_id,
                });
            }
        }

        lines.push(OrderLine {
            id: index as i64 + 1,
            order_id: record.order_id,
            line_no: record.line_no,
            seller_id: record.seller_id,
            product_id: record.product_id,
            quantity: record.quantity,
        });
    }

    Ok((headers, lines))
}

impl TableRow for Category {
    const TABLE: &'static str = "categoria";
    const COLUMNS: &'static str = "id, nombre";

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id).push_bind(self.name.clone());
    }
}

impl TableRow for Product {
    const TABLE: &'static str = "producto";
    const COLUMNS: &'static str = "id, nombre, precio, id_categoria";

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.price)
            .push_bind(self.category_id);
    }
}

impl TableRow for Country {
    const TABLE: &'static str = "pais";
    const COLUMNS: &'static str = "id, nombre";

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id).push_bind(self.name.clone());
    }
}

impl TableRow for Customer {
    const TABLE: &'static str = "cliente";
    const COLUMNS: &'static str =
        "id, nombre, apellido, direccion, telefono, tarjeta_credito, edad, salario, genero, id_pais";

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.last_name.clone())
            .push_bind(self.address.clone())
            .push_bind(self.phone.clone())
            .push_bind(self.card.clone())
            .push_bind(self.age)
            .push_bind(self.salary)
            .push_bind(self.gender.clone())
            .push_bind(self.country_id);
    }
}

impl TableRow for Seller {
    const TABLE: &'static str = "vendedor";
    const COLUMNS: &'static str = "id, nombre, id_pais";

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.country_id);
    }
}

impl TableRow for OrderHeader {
    const TABLE: &'static str = "orden";
    const COLUMNS: &'static str = "id, fecha, id_cliente";

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.date.clone())
            .push_bind(self.customer_id);
    }
}

impl TableRow for OrderLine {
    const TABLE: &'static str = "detalle_orden";
    const COLUMNS: &'static str = "id, id_orden, linea_orden, id_vendedor, id_producto, cantidad";

    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.order_id)
            .push_bind(self.line_no)
            .push_bind(self.seller_id)
            .push_bind(self.product_id)
            .push_bind(self.quantity);
    }
}
