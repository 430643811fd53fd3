use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sweepcore::prelude::{PublishError, SweepPublisher};
use sweepcore::SweepEnvelope;

/// Appends every published sweep as a `<topic>\t<json>` line.
pub struct SweepLog {
    path: PathBuf,
    file: File,
}

impl SweepLog {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating sweep log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening sweep log {}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SweepPublisher for SweepLog {
    fn publish(&mut self, topic: &str, envelope: &SweepEnvelope) -> Result<(), PublishError> {
        let mut line = format!("{}\t", topic);
        line.push_str(&envelope.to_json()?);
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        Ok(())
    }
}
