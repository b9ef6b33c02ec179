//! [`DataCleaner`]: owns a sales dataset and runs transformations on it.
//!
//! # Example
//!
//! ```
//! use datacleaner::{CleanerConfig, DataCleaner, Dataset};
//! use serde_json::json;
//!
//! let ds = Dataset::from_columns([
//!     ("preco_unitario", vec![json!(10.0), json!(20.0)]),
//!     ("quantidade_vendida", vec![json!(2), json!(5)]),
//! ]);
//!
//! let mut cleaner = DataCleaner::new(ds, Vec::new(), CleanerConfig::default());
//! let result = cleaner.pipeline().unwrap();
//! assert_eq!(result.rows()[1]["faturamento"], 100.0);
//!
//! assert_eq!(DataCleaner::converter_para_milhares(456231.98), 456.232);
//! ```

use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::{CleanerConfig, CsvOptions, EnvConfig};
use crate::error::{CsvError, LoadError, LoadResult, TransformResult};
use crate::models::Dataset;
use crate::parser::parse_csv_file;
use crate::transform::{calcular_faturamento, run_steps, DEFAULT_STEPS};

/// Wraps one dataset together with the options it was created with.
///
/// The cleaner owns its dataset exclusively. Transformations mutate it in
/// place and hand back a reference to it.
#[derive(Debug, Clone)]
pub struct DataCleaner {
    dataset: Dataset,
    args: Vec<Value>,
    config: CleanerConfig,
}

impl DataCleaner {
    /// Take ownership of `dataset` and store `args` and `config` verbatim.
    ///
    /// Nothing about the dataset's shape is checked here. A missing column
    /// only shows up when a transformation needs it.
    pub fn new(dataset: Dataset, args: Vec<Value>, config: CleanerConfig) -> Self {
        if !config.is_empty() {
            tracing::info!(config = ?config, "Additional configuration loaded");
        }
        tracing::info!(
            rows = dataset.len(),
            label = config.label.as_deref().unwrap_or(""),
            "DataCleaner initialized with {} rows",
            dataset.len()
        );

        Self {
            dataset,
            args,
            config,
        }
    }

    /// Load the file named by `DATA_FILE_NAME` from `base_directory`.
    ///
    /// The `encoding` and `delimiter` options are taken out of `config`
    /// (UTF-8 and `,` when absent); everything else is passed on to
    /// [`DataCleaner::new`]. Options and file name are checked before the file
    /// system is touched.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Config`] when the file name is not configured or the
    ///   delimiter is invalid
    /// - [`LoadError::FileNotFound`] naming the file and `base_directory`
    /// - [`LoadError::Csv`] when the file cannot be decoded or parsed
    pub fn from_csv(
        base_directory: impl AsRef<Path>,
        env: &EnvConfig,
        args: Vec<Value>,
        mut config: CleanerConfig,
    ) -> LoadResult<Self> {
        let base_directory = base_directory.as_ref();
        let options = config.take_csv_options()?;

        let file_name = env.require_data_file_name().map_err(|e| {
            tracing::error!("{e}");
            e
        })?;

        let path = base_directory.join(file_name);
        let dataset = load_dataset(&path, file_name, base_directory, &options)?;

        Ok(Self::new(dataset, args, config))
    }

    /// Load a CSV from an explicit path, with no environment lookup.
    ///
    /// Same option handling as [`DataCleaner::from_csv`]. A missing file
    /// is reported with its name and parent directory.
    pub fn from_csv_path(
        path: impl AsRef<Path>,
        args: Vec<Value>,
        mut config: CleanerConfig,
    ) -> LoadResult<Self> {
        let path = path.as_ref();
        let options = config.take_csv_options()?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let directory = path.parent().unwrap_or_else(|| Path::new(""));

        let dataset = load_dataset(path, &file_name, directory, &options)?;

        Ok(Self::new(dataset, args, config))
    }

    /// Add the `faturamento` column (price x quantity) to the dataset.
    ///
    /// Returns the mutated dataset, not a copy.
    pub fn calcular_faturamento(&mut self) -> TransformResult<&mut Dataset> {
        calcular_faturamento(&mut self.dataset)?;
        Ok(&mut self.dataset)
    }

    /// Run every pipeline step once and return the resulting dataset.
    pub fn pipeline(&mut self) -> TransformResult<&mut Dataset> {
        run_steps(&mut self.dataset, DEFAULT_STEPS)?;
        Ok(&mut self.dataset)
    }

    /// Express a value in thousands, rounded to 3 decimals.
    pub fn converter_para_milhares(valor: f64) -> f64 {
        round_decimals(valor / 1000.0, 3)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Extra positional arguments given at construction.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Named options given at construction, minus anything a loader consumed.
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Give the dataset back, dropping the cleaner.
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

/// Round the exact binary value once, by way of decimal formatting.
fn round_decimals(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Read and parse one CSV, turning a missing file into [`LoadError::FileNotFound`].
fn load_dataset(
    path: &Path,
    file_name: &str,
    directory: &Path,
    options: &CsvOptions,
) -> LoadResult<Dataset> {
    tracing::info!(
        path = %path.display(),
        encoding = %options.encoding,
        delimiter = %char::from(options.delimiter),
        "Loading CSV"
    );

    let dataset = match parse_csv_file(path, options) {
        Ok(ds) => ds,
        Err(CsvError::IoError(source)) if source.kind() == ErrorKind::NotFound => {
            let err = LoadError::FileNotFound {
                file: file_name.to_string(),
                directory: directory.to_path_buf(),
                source,
            };
            tracing::error!("{err}");
            return Err(err);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(path = %path.display(), rows = dataset.len(), "CSV loaded");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DATA_FILE_NAME;
    use crate::error::{ConfigError, TransformError};
    use crate::models::{PRICE_COLUMN, QUANTITY_COLUMN, REVENUE_COLUMN};
    use serde_json::json;
    use std::fs;

    fn sample_dataset() -> Dataset {
        Dataset::from_columns([
            ("id_produto", vec![json!(1), json!(2), json!(3), json!(4)]),
            (PRICE_COLUMN, vec![json!(10.0), json!(20.0), json!(5.0), json!(15.0)]),
            (QUANTITY_COLUMN, vec![json!(2), json!(5), json!(1), json!(10)]),
            ("categoria", vec![json!("A"), json!("B"), json!("A"), json!("C")]),
        ])
    }

    const SAMPLE_CSV: &str = "id_produto,preco_unitario,quantidade_vendida,categoria\n\
                              1,10.0,2,A\n\
                              2,20.0,5,B\n\
                              3,5.0,1,A\n\
                              4,15.0,10,C\n";

    fn env_with(file: &str) -> EnvConfig {
        EnvConfig {
            data_file_name: Some(file.to_string()),
        }
    }

    fn revenue(ds: &Dataset) -> Vec<f64> {
        ds.column(REVENUE_COLUMN)
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect()
    }

    // --- construction ---

    #[test]
    fn test_initialization() {
        let cleaner = DataCleaner::new(sample_dataset(), Vec::new(), CleanerConfig::default());

        assert_eq!(cleaner.dataset().len(), 4);
        assert!(cleaner.dataset().has_column("id_produto"));
        assert!(cleaner.args().is_empty());
        assert!(cleaner.config().is_empty());
    }

    #[test]
    fn test_args_and_config_stored_verbatim() {
        let config = CleanerConfig::from_pairs([("limite", "10"), ("estrategia", "media")]);
        let args = vec![json!("extra"), json!(42)];
        let cleaner = DataCleaner::new(sample_dataset(), args.clone(), config.clone());

        assert_eq!(cleaner.args(), args.as_slice());
        assert_eq!(cleaner.config(), &config);
    }

    #[test]
    fn test_construction_skips_shape_validation() {
        let ds = Dataset::from_columns([("produto", vec![json!("x")])]);
        let mut cleaner = DataCleaner::new(ds, Vec::new(), CleanerConfig::default());

        let err = cleaner.calcular_faturamento().unwrap_err();
        assert_eq!(err, TransformError::MissingColumn(PRICE_COLUMN.into()));
    }

    // --- transformations ---

    #[test]
    fn test_calcular_faturamento_logic() {
        let mut cleaner = DataCleaner::new(sample_dataset(), Vec::new(), CleanerConfig::default());
        let ds = cleaner.calcular_faturamento().unwrap();

        assert!(ds.has_column(REVENUE_COLUMN));
        assert_eq!(revenue(ds), vec![20.0, 100.0, 5.0, 150.0]);
        assert!(cleaner.dataset().has_column(REVENUE_COLUMN));
    }

    #[test]
    fn test_pipeline_matches_direct_call() {
        let mut direct = DataCleaner::new(sample_dataset(), Vec::new(), CleanerConfig::default());
        let mut piped = DataCleaner::new(sample_dataset(), Vec::new(), CleanerConfig::default());

        let a = direct.calcular_faturamento().unwrap().clone();
        let b = piped.pipeline().unwrap().clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_row_count_invariant() {
        let mut cleaner = DataCleaner::new(sample_dataset(), Vec::new(), CleanerConfig::default());
        assert_eq!(cleaner.pipeline().unwrap().len(), 4);
        assert_eq!(cleaner.into_dataset().len(), 4);
    }

    // --- unit conversion ---

    #[test]
    fn test_converter_para_milhares() {
        assert_eq!(DataCleaner::converter_para_milhares(456231.98), 456.232);
        assert_eq!(DataCleaner::converter_para_milhares(0.0), 0.0);
        assert_eq!(DataCleaner::converter_para_milhares(1500.0), 1.5);
        assert_eq!(DataCleaner::converter_para_milhares(-2500.0), -2.5);
    }

    #[test]
    fn test_converter_para_milhares_is_pure() {
        let first = DataCleaner::converter_para_milhares(123456.789);
        let second = DataCleaner::converter_para_milhares(123456.789);
        assert_eq!(first, second);
        assert_eq!(first, 123.457);
    }

    #[test]
    fn test_converter_para_milhares_rounds_once() {
        // 2.5 / 1000 sits just above 0.0025 in binary, so it rounds up
        assert_eq!(DataCleaner::converter_para_milhares(2.5), 0.003);
        assert_eq!(DataCleaner::converter_para_milhares(0.5), 0.001);
        assert_eq!(DataCleaner::converter_para_milhares(456231.98), 456.232);
    }

    // --- CSV constructors ---

    #[test]
    fn test_from_csv_missing_variable_fails_before_io() {
        // The base directory does not exist: any file access would surface
        // as FileNotFound rather than a configuration error.
        let err = DataCleaner::from_csv(
            "/nonexistent/dir",
            &EnvConfig::default(),
            Vec::new(),
            CleanerConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Config(ConfigError::MissingVariable(DATA_FILE_NAME))
        ));
        assert!(err.to_string().contains(DATA_FILE_NAME));
    }

    #[test]
    fn test_from_csv_missing_file_names_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataCleaner::from_csv(
            dir.path(),
            &env_with("df_produtos.csv"),
            Vec::new(),
            CleanerConfig::default(),
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
        assert!(msg.contains("df_produtos.csv"));
        assert!(msg.contains(&dir.path().display().to_string()));
    }

    #[test]
    fn test_from_csv_loads_and_forwards_options() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vendas.csv"), SAMPLE_CSV).unwrap();

        let config = CleanerConfig::from_pairs([("encoding", "utf-8"), ("limite", "5")]);
        let mut cleaner = DataCleaner::from_csv(
            dir.path(),
            &env_with("vendas.csv"),
            vec![json!("posicional")],
            config,
        )
        .unwrap();

        assert_eq!(cleaner.dataset().len(), 4);
        assert_eq!(cleaner.args(), &[json!("posicional")]);
        assert!(cleaner.config().encoding.is_none());
        assert_eq!(cleaner.config().extra["limite"], json!(5));

        let ds = cleaner.pipeline().unwrap();
        assert_eq!(revenue(ds), vec![20.0, 100.0, 5.0, 150.0]);
    }

    #[test]
    fn test_from_csv_with_latin1_encoding() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("vendas.csv"),
            b"produto,preco_unitario,quantidade_vendida\nCal\xE7a,2.5,4\n",
        )
        .unwrap();

        let config = CleanerConfig::default().with_encoding("latin1");
        let mut cleaner =
            DataCleaner::from_csv(dir.path(), &env_with("vendas.csv"), Vec::new(), config).unwrap();

        assert_eq!(cleaner.dataset().rows()[0]["produto"], "Calça");
        assert_eq!(revenue(cleaner.pipeline().unwrap()), vec![10.0]);
    }

    #[test]
    fn test_from_csv_with_semicolon_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("vendas.csv"),
            "produto;preco_unitario;quantidade_vendida\nProduto_1;2,5;4\nProduto_2;10;3\n",
        )
        .unwrap();

        // Decimal commas make the price a text column under ';'
        let config = CleanerConfig::from_pairs([("delimiter", ";")]);
        let cleaner =
            DataCleaner::from_csv(dir.path(), &env_with("vendas.csv"), Vec::new(), config).unwrap();

        let ds = cleaner.dataset();
        assert_eq!(ds.headers(), &["produto", "preco_unitario", "quantidade_vendida"]);
        assert_eq!(ds.rows()[0]["preco_unitario"], "2,5");
        assert_eq!(ds.rows()[1]["quantidade_vendida"], 3);
        assert!(cleaner.config().delimiter.is_none());
    }

    #[test]
    fn test_from_csv_invalid_delimiter_fails_before_io() {
        let config = CleanerConfig::default().with_delimiter("||");
        let err = DataCleaner::from_csv_path("/nonexistent/vendas.csv", Vec::new(), config)
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Config(ConfigError::InvalidDelimiter(_))
        ));
    }

    #[test]
    fn test_from_csv_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.csv");
        fs::write(&path, SAMPLE_CSV).unwrap();

        let cleaner = DataCleaner::from_csv_path(&path, Vec::new(), CleanerConfig::default()).unwrap();
        assert_eq!(cleaner.dataset().headers().len(), 4);
    }

    #[test]
    fn test_from_csv_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataCleaner::from_csv_path(
            dir.path().join("ausente.csv"),
            Vec::new(),
            CleanerConfig::default(),
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("ausente.csv"));
        assert!(msg.contains(&dir.path().display().to_string()));
    }
}
