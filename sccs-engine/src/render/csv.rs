/// CSV renderer: one file per series, named after its title
use super::{Renderer, Series};
use sccs_core::{SccsError, SccsResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CsvRenderer {
    dir: PathBuf,
    timestamp: bool,
}

impl CsvRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timestamp: true,
        }
    }

    /// Omit the generation time comment (reproducible output)
    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = false;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a series is written to
    pub fn path_for(&self, series: &Series) -> PathBuf {
        let slug: String = series
            .title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.csv", slug))
    }
}

impl Renderer for CsvRenderer {
    fn render(&self, series: &Series) -> SccsResult<()> {
        if series.y.len() != series.x.len() || series.labels.len() != series.x.len() {
            return Err(SccsError::InvalidParameter(format!(
                "series '{}' has mismatched column lengths",
                series.title
            )));
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(series);
        let mut file = File::create(&path)?;

        // Metadata as comments
        writeln!(file, "# {}", series.title)?;
        if self.timestamp {
            writeln!(
                file,
                "# Generated: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }

        let mut writer = csv::Writer::from_writer(file);
        let to_err = |e: csv::Error| SccsError::Serialization(e.to_string());
        writer.write_record(["label", "x", "y"]).map_err(to_err)?;
        for ((label, x), y) in series.labels.iter().zip(&series.x).zip(&series.y) {
            let (x, y) = (x.to_string(), y.to_string());
            writer
                .write_record([label.as_str(), x.as_str(), y.as_str()])
                .map_err(to_err)?;
        }
        writer.flush()?;

        tracing::debug!("Wrote {} points to {}", series.len(), path.display());
        Ok(())
    }
}
