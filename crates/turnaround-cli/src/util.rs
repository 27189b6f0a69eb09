use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write},
    path::PathBuf,
};

use anyhow::Context;
use serde::Serialize;

/// Destination of a JSON report: a file if a path was given, stdout otherwise
#[derive(Debug)]
pub enum ReportOutput {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl ReportOutput {
    pub fn open(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }

    /// Writes `report` as pretty-printed JSON followed by a newline
    pub fn write_json<T>(&mut self, report: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let dest = self.describe();
        let writer = self.writer();
        serde_json::to_writer_pretty(&mut *writer, report)
            .with_context(|| format!("Failed to write JSON report to {dest}"))?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to flush JSON report to {dest}"))?;
        Ok(())
    }
}

/// Writes a JSON report to `path`, or to stdout if no path is given
pub fn save_json_report<T>(report: &T, path: Option<PathBuf>) -> anyhow::Result<()>
where
    T: Serialize,
{
    let mut output = ReportOutput::open(path)?;
    output.write_json(report)?;
    tracing::info!("JSON report written to {}", output.describe());
    Ok(())
}
