use anyhow::Result;
use tracing::info;

use crate::analyzer::{Analysis, AnalysisRecord, Analyzer};
use crate::news::NewsFetcher;
use crate::sectors;
use crate::sheets::{SheetRow, SheetWriter};

/// The per-ticker batch: fetch news, analyze, resolve sector, append.
/// Tickers are processed strictly in list order; the first fatal error
/// aborts the remainder of the run (rows already appended stay).
pub struct Pipeline {
    fetcher: NewsFetcher,
    analyzer: Option<Analyzer>,
    writer: SheetWriter,
}

impl Pipeline {
    pub fn new(fetcher: NewsFetcher, analyzer: Option<Analyzer>, writer: SheetWriter) -> Self {
        Pipeline {
            fetcher,
            analyzer,
            writer,
        }
    }

    /// Build the sheet row for one ticker without writing it.
    pub async fn process(&self, ticker: &str) -> Result<SheetRow> {
        let news_text = self.fetcher.fetch(ticker).await;

        let analysis = match &self.analyzer {
            Some(analyzer) => analyzer.analyze(ticker, &news_text).await?,
            None => Analysis::Fallback(AnalysisRecord::fallback()),
        };

        let sector = sectors::resolve(ticker);
        Ok(SheetRow::new(ticker, sector, analysis.into_record()))
    }

    pub async fn run(&self, tickers: &[String]) -> Result<()> {
        for ticker in tickers {
            let row = self.process(ticker).await?;
            self.writer.append_row(&row).await?;

            // Stdout line is part of the program contract, logs are not
            println!("Processed {}", ticker);
            info!(
                "Processed {} ({}): sentiment={}, recommendation={}, risk={}",
                ticker,
                row.sector,
                row.record.sentiment,
                row.record.recommendation,
                row.record.risk_score(),
            );
        }
        Ok(())
    }
}
