//! JSON result sink

use crate::model::Post;
use crate::output::traits::{ResultSink, SinkResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the ranked record set as pretty-printed JSON
///
/// Parent directories are created as needed. Records are written in the
/// order given, so the file reads top-ranked first.
#[derive(Debug, Default)]
pub struct JsonSink;

impl JsonSink {
    pub fn new() -> Self {
        Self
    }
}

impl ResultSink for JsonSink {
    fn persist(&self, records: &[Post], destination: &Path) -> SinkResult<()> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(destination)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!("wrote {} records to {}", records.len(), destination.display());
        Ok(())
    }
}
