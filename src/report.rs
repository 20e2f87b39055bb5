use std::str::FromStr;

use crate::error::RecoError;
use crate::metrics::RankingMetrics;

/// Layout of the human readable metrics report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Single row markdown table
    Table,
    /// One `label:\tvalue` line per metric
    Block,
}

impl Default for ReportFormat {
    fn default() -> Self {
        ReportFormat::Table
    }
}

impl FromStr for ReportFormat {
    type Err = RecoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ReportFormat::Table),
            "block" => Ok(ReportFormat::Block),
            other => Err(RecoError::InvalidArgument(format!(
                "report format must be 'table' or 'block', got '{}'",
                other
            ))),
        }
    }
}

impl ReportFormat {

    pub fn render(self, model_name: &str, metrics: &RankingMetrics) -> String {
        match self {
            ReportFormat::Table => format!(
                "| Model | Top K | MAP | NDCG | Precision@K | Recall@K |\n\
                 | ----- | ----- | --- | ---- | ----------- | -------- |\n\
                 | {} | {} | {:.6} | {:.6} | {:.6} | {:.6} |\n",
                model_name, metrics.k, metrics.map, metrics.ndcg, metrics.precision, metrics.recall,
            ),
            ReportFormat::Block => format!(
                "Model:\t{}\nTop K:\t{}\nMAP:\t{:.6}\nNDCG:\t{:.6}\nPrecision@K:\t{:.6}\nRecall@K:\t{:.6}\n",
                model_name, metrics.k, metrics.map, metrics.ndcg, metrics.precision, metrics.recall,
            ),
        }
    }
}
