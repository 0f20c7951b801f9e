use spendlens_analytics::{AnomalyDetector, DEFAULT_Z_THRESHOLD};
use spendlens_core::{KeywordCatalog, Transaction, TransactionSet};
use spendlens_import::{
    map_columns, read_raw_table, Classifier, CsvError, HeaderStrategy, MappingOptions, RawTable,
    SchemaError,
};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub header: HeaderStrategy,
    pub mapping: MappingOptions,
    pub z_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            header: HeaderStrategy::default(),
            mapping: MappingOptions::default(),
            z_threshold: DEFAULT_Z_THRESHOLD,
        }
    }
}

/// Raw statement table in, categorized and anomaly-flagged transactions out.
///
/// Stateless between runs: the same table and configuration always give the
/// same [`TransactionSet`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    header: HeaderStrategy,
    mapping: MappingOptions,
    classifier: Classifier,
    detector: AnomalyDetector,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default(), KeywordCatalog::default())
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig, catalog: KeywordCatalog) -> Self {
        Self {
            header: config.header,
            mapping: config.mapping,
            classifier: Classifier::new(catalog),
            detector: AnomalyDetector::new(config.z_threshold),
        }
    }

    /// An empty set is a valid outcome: nothing survived cleaning.
    pub fn run(&self, table: RawTable) -> Result<TransactionSet, SchemaError> {
        let table = self.header.apply(table);
        let rows = map_columns(table, &self.mapping)?;

        let amounts: Vec<_> = rows.iter().map(|r| r.amount()).collect();
        let flags = self.detector.flags(&amounts);

        let transactions: Vec<Transaction> = rows
            .into_iter()
            .zip(flags)
            .map(|(row, is_anomaly)| {
                let category = self.classifier.categorize(row.description()).to_string();
                Transaction::new(row, &category, is_anomaly)
            })
            .collect();

        let set = TransactionSet::new(transactions);
        if set.is_empty() {
            tracing::warn!("no valid transactions survived cleaning");
        } else {
            tracing::info!(
                transactions = set.len(),
                anomalies = set.anomalies().count(),
                "processed statement"
            );
        }
        Ok(set)
    }

    pub fn run_csv<R: Read>(
        &self,
        data: R,
        delimiter: char,
    ) -> Result<TransactionSet, PipelineError> {
        let table = read_raw_table(data, delimiter)?;
        Ok(self.run(table)?)
    }
}
