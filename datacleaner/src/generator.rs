//! Synthetic sales data for fixtures and load testing.
//!
//! Columns: `produto`, `preco_unitario`, `quantidade_vendida`, `categoria`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Number, Value};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::error::CsvResult;
use crate::models::{Dataset, PRICE_COLUMN, QUANTITY_COLUMN};

/// Rows written when no count is given.
pub const DEFAULT_ROWS: usize = 500_000;

/// Where the CLI writes generated data by default.
pub const DEFAULT_OUTPUT: &str = "data/df_produtos_500k.csv";

/// Number of distinct products (`Produto_0` .. `Produto_999`).
pub const PRODUCT_COUNT: usize = 1000;

pub const CATEGORIES: [&str; 5] = ["Eletronicos", "Livros", "Roupas", "Alimentos", "Servicos"];

/// Draw `rows` random sales records.
///
/// Prices are uniform in `[10.0, 500.0)` with 2 decimals, quantities uniform
/// in `[10, 2000)`.
pub fn generate_products<R: Rng>(rows: usize, rng: &mut R) -> Dataset {
    let mut products = Vec::with_capacity(rows);
    let mut prices = Vec::with_capacity(rows);
    let mut quantities = Vec::with_capacity(rows);
    let mut categories = Vec::with_capacity(rows);

    for _ in 0..rows {
        let product = rng.gen_range(0..PRODUCT_COUNT);
        products.push(Value::String(format!("Produto_{product}")));

        let price = (rng.gen_range(10.0..500.0_f64) * 100.0).round_ties_even() / 100.0;
        prices.push(Number::from_f64(price).map_or(Value::Null, Value::Number));

        quantities.push(Value::from(rng.gen_range(10..2000_i64)));

        let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
        categories.push(Value::String(category.to_string()));
    }

    Dataset::from_columns([
        ("produto", products),
        (PRICE_COLUMN, prices),
        (QUANTITY_COLUMN, quantities),
        ("categoria", categories),
    ])
}

/// Generate `rows` records and write them as CSV to `path`.
///
/// Parent directories are created as needed. A `seed` makes the output
/// reproducible.
pub fn write_products(path: &Path, rows: usize, seed: Option<u64>) -> CsvResult<Dataset> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = generate_products(rows, &mut rng);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    dataset.write_csv(BufWriter::new(file), b',')?;

    tracing::info!(path = %path.display(), rows = dataset.len(), "Synthetic dataset written");
    Ok(dataset)
}
