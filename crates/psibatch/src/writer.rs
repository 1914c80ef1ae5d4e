use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::record::ResultMap;
use crate::Result;

/// Destination for completed batches.
pub trait ResultSink {
    /// Persist one batch of results, returning the number of lines written.
    fn write_batch(&mut self, results: &ResultMap) -> Result<usize>;
}

/// Appends `<id>\t<structure>` lines to a file.
///
/// The file is opened in append mode, so reruns accumulate output. Each batch
/// is flushed before `write_batch` returns.
#[derive(Debug)]
pub struct ResultWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ResultWriter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for ResultWriter {
    fn write_batch(&mut self, results: &ResultMap) -> Result<usize> {
        for (id, structure) in results.iter() {
            writeln!(self.writer, "{id}\t{structure}")?;
        }
        self.writer.flush()?;

        tracing::trace!("Appended {} line(s) to {}", results.len(), self.path.display());
        Ok(results.len())
    }
}

/// In-memory sink, mostly for tests.
impl ResultSink for Vec<(String, String)> {
    fn write_batch(&mut self, results: &ResultMap) -> Result<usize> {
        self.extend(
            results
                .iter()
                .map(|(id, structure)| (id.to_string(), structure.to_string())),
        );
        Ok(results.len())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn results(pairs: &[(&str, &str)]) -> ResultMap {
        pairs
            .iter()
            .map(|(id, s)| (id.to_string(), s.to_string()))
            .collect()
    }

    #[test]
    fn test_lines_are_tab_separated() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.tsv");

        let mut writer = ResultWriter::open(&path)?;
        assert_eq!(writer.write_batch(&results(&[("b", "HHEE"), ("a", "CCHH")]))?, 2);

        assert_eq!(fs::read_to_string(&path)?, "a\tCCHH\nb\tHHEE\n");
        Ok(())
    }

    #[test]
    fn test_existing_content_is_preserved() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.tsv");
        fs::write(&path, "old\tCCC\n")?;

        ResultWriter::open(&path)?.write_batch(&results(&[("new", "HHH")]))?;
        ResultWriter::open(&path)?.write_batch(&results(&[("new", "HHH")]))?;

        assert_eq!(fs::read_to_string(&path)?, "old\tCCC\nnew\tHHH\nnew\tHHH\n");
        Ok(())
    }

    #[test]
    fn test_flushed_per_batch() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.tsv");

        let mut writer = ResultWriter::open(&path)?;
        writer.write_batch(&results(&[("a", "C")]))?;
        assert_eq!(fs::read_to_string(&path)?, "a\tC\n");

        writer.write_batch(&results(&[("b", "E")]))?;
        assert_eq!(fs::read_to_string(&path)?, "a\tC\nb\tE\n");
        Ok(())
    }
}
