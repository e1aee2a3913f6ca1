// =============================================================================
// Static Site Sink — index.html + data.json
// =============================================================================
//
// Writes use an atomic tmp + rename so a crash mid-write never leaves a
// half-written page behind for the static host to serve.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::report::html::render_html;
use crate::report::{Report, ReportSink};

pub const HTML_FILE: &str = "index.html";
pub const JSON_FILE: &str = "data.json";

/// Publishes a report as two files inside `output_dir`.
#[derive(Debug, Clone)]
pub struct StaticSiteSink {
    output_dir: PathBuf,
}

impl StaticSiteSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(HTML_FILE)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(JSON_FILE)
    }
}

impl ReportSink for StaticSiteSink {
    fn publish(&self, report: &Report) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create output directory {}", self.output_dir.display())
        })?;

        write_atomic(&self.html_path(), &render_html(report))?;
        write_atomic(&self.json_path(), &report.to_json()?)?;

        info!(
            dir = %self.output_dir.display(),
            results = report.results.len(),
            "report published"
        );
        Ok(())
    }
}

/// Write to a temporary sibling file, then rename over `path`.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename {} to {}", tmp_path.display(), path.display()))?;

    Ok(())
}
