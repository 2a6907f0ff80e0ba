//! Database schema definitions
//!
//! Tables are listed in dependency order: every table only references tables
//! that appear before it.

pub const CREATE_CATEGORIA: &str = r#"
CREATE TABLE categoria (
    id INTEGER NOT NULL PRIMARY KEY,
    nombre TEXT NOT NULL
)
"#;

pub const CREATE_PRODUCTO: &str = r#"
CREATE TABLE producto (
    id INTEGER NOT NULL PRIMARY KEY,
    nombre TEXT NOT NULL,
    precio REAL NOT NULL,
    id_categoria INTEGER NOT NULL,
    FOREIGN KEY (id_categoria) REFERENCES categoria(id)
)
"#;

pub const CREATE_PAIS: &str = r#"
CREATE TABLE pais (
    id INTEGER NOT NULL PRIMARY KEY,
    nombre TEXT NOT NULL
)
"#;

pub const CREATE_CLIENTE: &str = r#"
CREATE TABLE cliente (
    id INTEGER NOT NULL PRIMARY KEY,
    nombre TEXT NOT NULL,
    apellido TEXT NOT NULL,
    direccion TEXT NOT NULL,
    telefono TEXT NOT NULL,
    tarjeta_credito TEXT NOT NULL,
    edad INTEGER NOT NULL,
    salario REAL NOT NULL,
    genero TEXT NOT NULL,
    id_pais INTEGER NOT NULL,
    FOREIGN KEY (id_pais) REFERENCES pais(id)
)
"#;

pub const CREATE_VENDEDOR: &str = r#"
CREATE TABLE vendedor (
    id INTEGER NOT NULL PRIMARY KEY,
    nombre TEXT NOT NULL,
    id_pais INTEGER NOT NULL,
    FOREIGN KEY (id_pais) REFERENCES pais(id)
)
"#;

pub const CREATE_ORDEN: &str = r#"
CREATE TABLE orden (
    id INTEGER NOT NULL PRIMARY KEY,
    fecha TEXT NOT NULL,  -- YYYY-MM-DD
    id_cliente INTEGER NOT NULL,
    FOREIGN KEY (id_cliente) REFERENCES cliente(id)
)
"#;

pub const CREATE_DETALLE_ORDEN: &str = r#"
CREATE TABLE detalle_orden (
    id INTEGER NOT NULL PRIMARY KEY,
    id_orden INTEGER NOT NULL,
    linea_orden INTEGER NOT NULL,
    id_vendedor INTEGER NOT NULL,
    id_producto INTEGER NOT NULL,
    cantidad INTEGER NOT NULL,
    FOREIGN KEY (id_orden) REFERENCES orden(id),
    FOREIGN KEY (id_vendedor) REFERENCES vendedor(id),
    FOREIGN KEY (id_producto) REFERENCES producto(id)
)
"#;

/// (table name, CREATE statement) in dependency order
pub const TABLES: &[(&str, &str)] = &[
    ("categoria", CREATE_CATEGORIA),
    ("producto", CREATE_PRODUCTO),
    ("pais", CREATE_PAIS),
    ("cliente", CREATE_CLIENTE),
    ("vendedor", CREATE_VENDEDOR),
    ("orden", CREATE_ORDEN),
    ("detalle_orden", CREATE_DETALLE_ORDEN),
];

/// Table names in reverse dependency order, safe for DROP and DELETE
pub fn teardown_order() -> impl Iterator<Item = &'static str> {
    TABLES.iter().rev().map(|(name, _)| *name)
}
