//! CSV export of enriched places.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use placegrid_places::OutputRow;
use serde::Serialize;

/// UTF-8 byte-order mark so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const TYPES_SEPARATOR: &str = ", ";

#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    name: &'a str,
    address: &'a str,
    phone: &'a str,
    opening_hours: &'a str,
    rating: Option<f64>,
    types: String,
    photo_url: &'a str,
    maps_url: &'a str,
}

impl<'a> From<&'a OutputRow> for CsvRecord<'a> {
    fn from(row: &'a OutputRow) -> Self {
        Self {
            name: &row.name,
            address: &row.address,
            phone: &row.phone,
            opening_hours: &row.opening_hours,
            rating: row.rating,
            types: row.types.join(TYPES_SEPARATOR),
            photo_url: &row.photo_url,
            maps_url: &row.maps_url,
        }
    }
}

/// Writes `rows` to `path`, replacing any existing file.
///
/// Returns `false` without touching the filesystem when `rows` is empty.
///
/// # Errors
///
/// I/O or serialization failures.
pub(crate) fn write_rows(path: &Path, rows: &[OutputRow]) -> anyhow::Result<bool> {
    if rows.is_empty() {
        tracing::warn!(path = %path.display(), "no places collected, nothing written");
        return Ok(false);
    }
    let file = BufWriter::new(File::create(path)?);
    write_csv(file, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(true)
}

fn write_csv<W: Write>(mut sink: W, rows: &[OutputRow]) -> anyhow::Result<()> {
    sink.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer.serialize(CsvRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}
