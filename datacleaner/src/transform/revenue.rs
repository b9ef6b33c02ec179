//! Revenue column: `faturamento = preco_unitario * quantidade_vendida`.

use serde_json::{Number, Value};

use crate::error::{TransformError, TransformResult};
use crate::models::{Dataset, PRICE_COLUMN, QUANTITY_COLUMN, REVENUE_COLUMN};

/// Compute `faturamento` for every row and write it onto the dataset.
///
/// Rows are paired by position. A null operand gives a null product; any
/// other non-numeric operand is an error and leaves the dataset untouched.
///
/// A product that overflows to infinity has no JSON number form. It is stored
/// as null and logged as a warning.
pub fn calcular_faturamento(dataset: &mut Dataset) -> TransformResult<()> {
    let prices = dataset.column(PRICE_COLUMN)?;
    let quantities = dataset.column(QUANTITY_COLUMN)?;

    let revenue = prices
        .iter()
        .zip(&quantities)
        .enumerate()
        .map(|(row, (price, quantity))| multiply(row, price, quantity))
        .collect::<TransformResult<Vec<Value>>>()?;

    dataset.set_column(REVENUE_COLUMN, revenue);
    Ok(())
}

fn multiply(row: usize, price: &Value, quantity: &Value) -> TransformResult<Value> {
    let price = operand(PRICE_COLUMN, row, price)?;
    let quantity = operand(QUANTITY_COLUMN, row, quantity)?;

    let (Some(price), Some(quantity)) = (price, quantity) else {
        return Ok(Value::Null);
    };

    let product = price * quantity;
    match Number::from_f64(product) {
        Some(n) => Ok(Value::Number(n)),
        None => {
            tracing::warn!(row, price, quantity, "Revenue is not finite, stored as null");
            Ok(Value::Null)
        }
    }
}

fn operand(column: &str, row: usize, value: &Value) -> TransformResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(TransformError::NonNumeric {
            column: column.to_string(),
            row,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sales(prices: Vec<Value>, quantities: Vec<Value>) -> Dataset {
        Dataset::from_columns([(PRICE_COLUMN, prices), (QUANTITY_COLUMN, quantities)])
    }

    #[test]
    fn test_revenue_per_row() {
        let mut ds = sales(
            vec![json!(10.0), json!(20.0), json!(5.0), json!(15.0)],
            vec![json!(2), json!(5), json!(1), json!(10)],
        );
        calcular_faturamento(&mut ds).unwrap();

        let revenue: Vec<f64> = ds
            .column(REVENUE_COLUMN)
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert_eq!(revenue, vec![20.0, 100.0, 5.0, 150.0]);
    }

    #[test]
    fn test_revenue_is_float_for_integer_inputs() {
        let mut ds = sales(vec![json!(3)], vec![json!(4)]);
        calcular_faturamento(&mut ds).unwrap();
        assert!(ds.rows()[0][REVENUE_COLUMN].is_f64());
    }

    #[test]
    fn test_null_propagates() {
        let mut ds = sales(vec![json!(10.0), Value::Null], vec![Value::Null, json!(3)]);
        calcular_faturamento(&mut ds).unwrap();

        assert_eq!(ds.rows()[0][REVENUE_COLUMN], Value::Null);
        assert_eq!(ds.rows()[1][REVENUE_COLUMN], Value::Null);
    }

    #[test]
    fn test_missing_price_column() {
        let mut ds = Dataset::from_columns([(QUANTITY_COLUMN, vec![json!(1)])]);
        let err = calcular_faturamento(&mut ds).unwrap_err();
        assert_eq!(err, TransformError::MissingColumn(PRICE_COLUMN.into()));
    }

    #[test]
    fn test_missing_quantity_column() {
        let mut ds = Dataset::from_columns([(PRICE_COLUMN, vec![json!(1.0)])]);
        let err = calcular_faturamento(&mut ds).unwrap_err();
        assert_eq!(err, TransformError::MissingColumn(QUANTITY_COLUMN.into()));
    }

    #[test]
    fn test_non_numeric_leaves_dataset_untouched() {
        let mut ds = sales(vec![json!(1.0), json!("caro")], vec![json!(1), json!(2)]);
        let before = ds.clone();

        let err = calcular_faturamento(&mut ds).unwrap_err();
        assert!(matches!(err, TransformError::NonNumeric { row: 1, .. }));
        assert_eq!(ds, before);
    }

    #[test]
    fn test_recompute_overwrites() {
        let mut ds = sales(vec![json!(2.0)], vec![json!(3)]);
        calcular_faturamento(&mut ds).unwrap();
        calcular_faturamento(&mut ds).unwrap();

        assert_eq!(ds.headers().len(), 3);
        assert_eq!(ds.rows()[0][REVENUE_COLUMN], 6.0);
    }

    #[test]
    fn test_overflowing_product_is_null() {
        let mut ds = sales(vec![json!(f64::MAX), json!(2.0)], vec![json!(2), json!(3)]);
        calcular_faturamento(&mut ds).unwrap();

        let revenue = ds.column(REVENUE_COLUMN).unwrap();
        assert_eq!(revenue[0], &Value::Null);
        assert_eq!(revenue[1], &json!(6.0));
    }

    proptest! {
        #[test]
        fn prop_revenue_matches_product(
            rows in prop::collection::vec((10.0f64..500.0, 10i64..2000), 0..64)
        ) {
            let prices = rows.iter().map(|(p, _)| json!(p)).collect();
            let quantities = rows.iter().map(|(_, q)| json!(q)).collect();
            let mut ds = sales(prices, quantities);

            calcular_faturamento(&mut ds).unwrap();

            prop_assert_eq!(ds.len(), rows.len());
            for (row, (price, quantity)) in ds.rows().iter().zip(&rows) {
                prop_assert_eq!(row[REVENUE_COLUMN].as_f64(), Some(price * *quantity as f64));
            }
        }
    }
}
