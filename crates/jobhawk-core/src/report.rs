use crate::listing::{Listing, RunReport};
use crate::Result;
use chrono::Local;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Writes run results to timestamped JSON files in an output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the report for one run. Returns the path of the written file,
    /// or `None` when the report holds no listings (no file is produced
    /// for an empty run).
    pub fn write(&self, site: &str, report: &RunReport) -> Result<Option<PathBuf>> {
        if report.is_empty() {
            tracing::info!("No listings to write, skipping result file");
            return Ok(None);
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let name = format!("{}_jobs_{}.json", site, Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.output_dir.join(name);

        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &report.listings)?;

        tracing::info!(
            "Wrote {} listings to {}",
            report.len(),
            path.display()
        );

        Ok(Some(path))
    }

    /// Read a previously written result file back into listing records.
    pub fn read(path: &Path) -> Result<Vec<Listing>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let listings: Vec<Listing> = serde_json::from_reader(reader)?;
        Ok(listings)
    }
}
