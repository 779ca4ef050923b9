//! CSV → Parquet conversion for GTFS tables.
//!
//! Column types are inferred from the text itself (integers, floats,
//! booleans, dates and timestamps, falling back to strings). No schema is
//! supplied by the publisher, so none is imposed here.
//!
//! Rows shorter than the header are padded with nulls; rows longer than the
//! header are rejected. Repeated header names get `.1`, `.2`, ... suffixes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{Field, Schema};
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::ConvertError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A table serialized to Parquet, with its shape for reporting.
#[derive(Debug, Clone)]
pub struct ConvertedTable {
    pub bytes: Bytes,
    pub rows: usize,
    pub columns: usize,
}

/// Converts a delimited-text table with a header row into Parquet bytes.
///
/// All rows and columns are kept and no index column is added. Types are
/// inferred over the whole table before reading.
///
/// # Errors
///
/// [`ConvertError::Empty`] when there is no header, otherwise whatever the
/// CSV reader or Parquet writer reports (rows with extra fields, bad UTF-8, ...).
pub fn csv_to_parquet(data: &[u8]) -> Result<ConvertedTable, ConvertError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(ConvertError::Empty);
    }

    let format = Format::default()
        .with_header(true)
        .with_truncated_rows(true);
    let (schema, records_read) = format.infer_schema(data, None)?;
    if schema.fields().is_empty() {
        return Err(ConvertError::Empty);
    }
    let schema = Arc::new(dedupe_column_names(&schema));
    debug!(columns = schema.fields().len(), records_read, "Inferred schema");

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_truncated_rows(true)
        .build(data)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(Vec::new(), schema.clone(), Some(props))?;

    let mut rows = 0;
    for batch in reader {
        let batch = batch?;
        rows += batch.num_rows();
        writer.write(&batch)?;
    }

    let buf = writer.into_inner()?;

    Ok(ConvertedTable {
        bytes: Bytes::from(buf),
        rows,
        columns: schema.fields().len(),
    })
}

/// Renames repeated column names to `name.1`, `name.2`, ... keeping the
/// first occurrence as is and never colliding with an existing name.
fn dedupe_column_names(schema: &Schema) -> Schema {
    let mut taken: HashSet<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut counters: HashMap<&str, usize> = HashMap::new();

    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| {
            let name = field.name().as_str();
            if seen.insert(name) {
                return field.as_ref().clone();
            }

            let counter = counters.entry(name).or_insert(0);
            let renamed = loop {
                *counter += 1;
                let candidate = format!("{name}.{counter}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };
            taken.insert(renamed.clone());
            field.as_ref().clone().with_name(renamed)
        })
        .collect();

    Schema::new_with_metadata(fields, schema.metadata().clone())
}
