//! Shared fixtures for unit tests

use std::path::Path;

use tempfile::TempDir;

use crate::config::LoaderConfig;
use crate::db::Database;
use crate::loader::Loader;

/// Small dataset with hand-computed aggregates:
///
/// | product | category | price | units | amount |
/// |---|---|---|---|---|
/// | 1 Balon | Deportes | 5 | 14 | 70 |
/// | 2 Lampara | Hogar | 20 | 3 | 60 |
/// | 3 Raqueta | Deportes | 50 | 1 | 50 |
/// | 4 Novela | Libros | 10 | 2 | 20 |
///
/// Order lines are deliberately not sorted by order id.
pub const FIXTURE: &[(&str, &str)] = &[
    (
        "Categorias.csv",
        "id_categoria;nombre\n\
         1;Deportes\n\
         2;Hogar\n\
         3;Libros\n",
    ),
    (
        "productos.csv",
        "id_producto;Nombre;Precio;id_categoria\n\
         1;Balon;5.00;1\n\
         2;Lampara;20.00;2\n\
         3;Raqueta;50.00;1\n\
         4;Novela;10.00;3\n",
    ),
    (
        "paises.csv",
        "id_pais;nombre\n\
         1;Inglaterra\n\
         2;Guatemala\n\
         3;Mexico\n",
    ),
    (
        "clientes.csv",
        "id_cliente;Nombre;Apellido;Direccion;Telefono;Tarjeta;Edad;Salario;Genero;id_pais\n\
         1;Ana;Lopez;12 Baker St;5551234;4111111111111111;34;3500.50;F;1\n\
         2;Luis;Perez;Zona 10;55512345;4222222222222;41;2800.00;M;2\n\
         3;Sofia;Ruiz;Av Reforma 5;5550001;4333333333333;29;4100.75;F;3\n",
    ),
    (
        "vendedores.csv",
        "id_vendedor;nombre;id_pais\n\
         1;Carlos;1\n\
         2;Maria;2\n",
    ),
    (
        "ordenes.csv",
        "id_orden;linea_orden;fecha_orden;id_cliente;id_vendedor;id_producto;cantidad\n\
         1;1;15/01/2023;1;1;1;10\n\
         2;1;03/03/2023;2;2;3;1\n\
         1;2;15/01/2023;1;1;2;3\n\
         3;1;20/03/2023;3;2;1;4\n\
         2;2;03/03/2023;2;1;4;2\n",
    ),
];

pub fn write_records(dir: &Path, files: &[(&str, &str)]) {
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents).unwrap();
    }
}

pub fn write_fixture(dir: &Path) {
    write_records(dir, FIXTURE);
}

pub fn loader_config(dir: &Path) -> LoaderConfig {
    LoaderConfig {
        data_dir: dir.to_string_lossy().into_owned(),
        ..LoaderConfig::default()
    }
}

/// In-memory database with a fresh schema and `dir` loaded into it
pub async fn loaded_database(dir: &Path) -> Database {
    let db = Database::in_memory().await;
    db.create_schema().await.unwrap();
    Loader::new(&loader_config(dir)).load_model(&db).await.unwrap();
    db
}

pub async fn seeded_database() -> (Database, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let db = loaded_database(dir.path()).await;
    (db, dir)
}
