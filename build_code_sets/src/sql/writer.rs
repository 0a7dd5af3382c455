use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::common::{ensure_parent_dir, tmp_path_for};
use crate::record::OutputBatch;
use crate::sql::table::row_values;

/// Streams upsert statements into any writer, one batch at a time.
pub struct UpsertWriter<W: Write> {
    out: W,
    max_rows_per_statement: Option<usize>,
    statements: usize,
    rows: usize,
}

impl<W: Write> UpsertWriter<W> {
    /// `max_rows_per_statement` of `None` emits exactly one statement per
    /// non-empty batch.
    pub fn new(out: W, max_rows_per_statement: Option<usize>) -> Self {
        Self {
            out,
            max_rows_per_statement: max_rows_per_statement.map(|n| n.max(1)),
            statements: 0,
            rows: 0,
        }
    }

    pub fn write_preamble(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "-- {line}")?;
        }
        if !lines.is_empty() {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Writes every record of `batch`, chunked into complete statements.
    /// Returns the number of statements written; an empty batch writes none.
    pub fn write_batch(&mut self, batch: &OutputBatch) -> io::Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        let chunk_size = self.max_rows_per_statement.unwrap_or(batch.len());
        let chunks = batch.records.chunks(chunk_size);
        let total_chunks = chunks.len();

        for (idx, chunk) in chunks.enumerate() {
            let table = batch.table;
            if total_chunks > 1 {
                writeln!(
                    self.out,
                    "-- {} ({}) part {}/{}: {} rows",
                    batch.pipeline,
                    table.name,
                    idx + 1,
                    total_chunks,
                    chunk.len()
                )?;
            } else {
                writeln!(
                    self.out,
                    "-- {} ({}): {} rows",
                    batch.pipeline,
                    table.name,
                    chunk.len()
                )?;
            }

            writeln!(self.out, "INSERT INTO {} (", table.name)?;
            writeln!(self.out, "    {}", table.columns.join(",\n    "))?;
            writeln!(self.out, ") VALUES")?;
            for (row_idx, record) in chunk.iter().enumerate() {
                let tuple = row_values(record)
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let separator = if row_idx + 1 == chunk.len() { "" } else { "," };
                writeln!(self.out, "({tuple}){separator}")?;
            }
            writeln!(
                self.out,
                "ON CONFLICT ({}) DO UPDATE SET",
                table.conflict.join(", ")
            )?;
            writeln!(
                self.out,
                "    {};",
                table.update_assignments().join(",\n    ")
            )?;
            writeln!(self.out)?;

            self.statements += 1;
            self.rows += chunk.len();
        }
        Ok(total_chunks)
    }

    pub fn statements(&self) -> usize {
        self.statements
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactStats {
    pub statements: usize,
    pub rows: usize,
}

/// Writes the artifact to a sibling `.tmp` file and renames it into place, so
/// a failed run never leaves a partial artifact at `output_path`.
pub fn write_artifact(
    output_path: &Path,
    preamble: &[String],
    batches: &[OutputBatch],
    max_rows_per_statement: Option<usize>,
) -> Result<ArtifactStats> {
    ensure_parent_dir(output_path)?;
    let tmp_path = tmp_path_for(output_path);

    let written = write_statements(&tmp_path, preamble, batches, max_rows_per_statement);
    let stats = match written {
        Ok(stats) => stats,
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
    };

    fs::rename(&tmp_path, output_path).with_context(|| {
        format!(
            "Failed moving SQL artifact {} to {}",
            tmp_path.display(),
            output_path.display()
        )
    })?;
    Ok(stats)
}

fn write_statements(
    tmp_path: &Path,
    preamble: &[String],
    batches: &[OutputBatch],
    max_rows_per_statement: Option<usize>,
) -> Result<ArtifactStats> {
    let file = File::create(tmp_path)
        .with_context(|| format!("Failed creating SQL artifact {}", tmp_path.display()))?;
    let mut writer = UpsertWriter::new(BufWriter::new(file), max_rows_per_statement);
    writer
        .write_preamble(preamble)
        .with_context(|| format!("Failed writing {}", tmp_path.display()))?;
    for batch in batches {
        writer.write_batch(batch).with_context(|| {
            format!(
                "Failed writing {} statements to {}",
                batch.table.name,
                tmp_path.display()
            )
        })?;
    }
    let stats = ArtifactStats {
        statements: writer.statements(),
        rows: writer.rows(),
    };
    writer
        .finish()
        .with_context(|| format!("Failed flushing {}", tmp_path.display()))?;
    Ok(stats)
}
