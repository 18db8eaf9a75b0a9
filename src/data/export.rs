use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{CellValue, Dataset};

/// Write `dataset` as CSV: one header row in schema order, no index column.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(dataset.column_names())
        .context("writing CSV header")?;

    let columns = dataset.columns();
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for row in 0..dataset.n_rows() {
        record.clear();
        record.extend(columns.iter().map(|c| format_cell(&c.cells[row])));
        out.write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    out.flush().context("flushing CSV")?;
    Ok(())
}

/// Save `dataset` to `path` as CSV.
pub fn save_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, std::io::BufWriter::new(file))?;
    log::info!("wrote {} rows to {}", dataset.n_rows(), path.display());
    Ok(())
}

fn format_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        CellValue::Float(v) => v.to_string(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::String(s) => s.clone(),
    }
}
