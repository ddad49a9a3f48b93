use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::Sheet;

/// Destination for the named sheets produced from one document.
pub trait TabularSink {
    fn write_sheet(&mut self, sheet: &Sheet) -> Result<(), ExtractError>;
}

/// Writes each sheet to `<dir>/<stem>_<sheet>.csv`.
#[derive(Debug)]
pub struct CsvDirectorySink {
    dir: PathBuf,
    stem: String,
    delimiter: u8,
    written: Vec<PathBuf>,
}

impl CsvDirectorySink {
    pub fn new(dir: &Path, stem: &str, delimiter: u8) -> Result<Self, ExtractError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
            delimiter,
            written: Vec::new(),
        })
    }

    #[must_use]
    pub fn sheet_path(&self, sheet_name: &str) -> PathBuf {
        self.dir.join(format!("{}_{sheet_name}.csv", self.stem))
    }

    /// Paths written so far, in write order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl TabularSink for CsvDirectorySink {
    fn write_sheet(&mut self, sheet: &Sheet) -> Result<(), ExtractError> {
        let path = self.sheet_path(&sheet.name);
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&path)?;
        writer.write_record(&sheet.headers)?;
        for row in &sheet.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        tracing::debug!(path = %path.display(), rows = sheet.rows.len(), "wrote sheet");
        self.written.push(path);
        Ok(())
    }
}

pub fn sheet_to_csv_string(sheet: &Sheet, delimiter: u8) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Outcome of one input in a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub input_file: String,
    pub status: String,
    pub tables: usize,
    pub rows: usize,
    pub error: Option<String>,
}

pub fn write_batch_summary(
    path: &Path,
    entries: &[BatchEntry],
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    writer.write_record(["input_file", "status", "tables", "rows", "error"])?;
    for entry in entries {
        writer.write_record([
            entry.input_file.clone(),
            entry.status.clone(),
            entry.tables.to_string(),
            entry.rows.to_string(),
            entry.error.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::csv_out::{
        BatchEntry, CsvDirectorySink, TabularSink, sheet_to_csv_string, write_batch_summary,
    };
    use crate::error::ExtractError;
    use crate::model::Sheet;

    fn sheet() -> Sheet {
        Sheet {
            name: "Summary".to_string(),
            headers: vec!["Table_Name".to_string(), "Sample_Value".to_string()],
            rows: vec![vec!["Table_1".to_string(), "1,200".to_string()]],
        }
    }

    #[test]
    fn quotes_values_containing_the_delimiter() {
        let csv = sheet_to_csv_string(&sheet(), b',').expect("csv should render");
        assert_eq!(csv, "Table_Name,Sample_Value\nTable_1,\"1,200\"\n");

        let tsv = sheet_to_csv_string(&sheet(), b'\t').expect("tsv should render");
        assert_eq!(tsv, "Table_Name\tSample_Value\nTable_1\t1,200\n");
    }

    #[test]
    fn renders_non_ascii_cells_as_text() {
        let sheet = Sheet {
            name: "Table_1".to_string(),
            headers: vec!["Line Item".to_string()],
            rows: vec![vec!["Résultat net".to_string()]],
        };
        let csv = sheet_to_csv_string(&sheet, b';').expect("csv should render");
        assert_eq!(csv, "Line Item\nRésultat net\n");
    }

    #[test]
    fn invalid_utf8_output_is_an_encoding_error() {
        let error = ExtractError::from(String::from_utf8(vec![0xFF]).expect_err("not utf-8"));
        assert!(matches!(error, ExtractError::OutputEncoding(_)));
        assert!(error.to_string().starts_with("CSV output is not valid UTF-8"));
    }

    #[test]
    fn directory_sink_prefixes_document_stem() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut sink = CsvDirectorySink::new(dir.path(), "report", b',').expect("sink");
        sink.write_sheet(&sheet()).expect("sheet should write");

        let path = dir.path().join("report_Summary.csv");
        assert_eq!(sink.written(), &[path.clone()]);
        let written = std::fs::read_to_string(path).expect("csv should exist");
        assert!(written.starts_with("Table_Name,Sample_Value\n"));
    }

    #[test]
    fn batch_summary_lists_every_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("batch_summary.csv");
        let entries = vec![
            BatchEntry {
                input_file: "a.txt".to_string(),
                status: "ok".to_string(),
                tables: 2,
                rows: 7,
                error: None,
            },
            BatchEntry {
                input_file: "b.pdf".to_string(),
                status: "failed".to_string(),
                tables: 0,
                rows: 0,
                error: Some("broken".to_string()),
            },
        ];
        write_batch_summary(&path, &entries, b',').expect("summary should write");
        let written = std::fs::read_to_string(path).expect("csv should exist");
        assert_eq!(
            written,
            "input_file,status,tables,rows,error\na.txt,ok,2,7,\nb.pdf,failed,0,0,broken\n"
        );
    }
}
