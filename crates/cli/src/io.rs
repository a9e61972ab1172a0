//! Table I/O for the embedding runner (CSV or Parquet in, CSV out).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bounded_embed::Vec2;
use nalgebra::DMatrix;
use polars::prelude::*;

/// Read a table and keep its numeric columns (at most `max_dims`, in order).
///
/// Non-numeric columns such as cell identifiers are skipped. Nulls are an error.
pub fn read_matrix(path: &Path, max_dims: Option<usize>) -> Result<DMatrix<f64>> {
    let df = match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => LazyFrame::scan_parquet(path, ScanArgsParquet::default())
            .and_then(|lf| lf.collect()),
        _ => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .finish()
            .and_then(|lf| lf.collect()),
    }
    .with_context(|| format!("reading {}", path.display()))?;

    let mut cols: Vec<Vec<f64>> = Vec::new();
    for s in df.get_columns() {
        if !s.dtype().is_numeric() {
            tracing::debug!(column = %s.name(), dtype = %s.dtype(), "skipping non-numeric column");
            continue;
        }
        if max_dims.is_some_and(|k| cols.len() >= k) {
            break;
        }
        let cast = s.cast(&DataType::Float64)?;
        let values = cast
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| v.with_context(|| format!("null in column {} at row {}", s.name(), row)))
            .collect::<Result<Vec<f64>>>()?;
        cols.push(values);
    }
    if cols.is_empty() {
        bail!("{} has no numeric columns", path.display());
    }
    let n = df.height();
    tracing::info!(rows = n, cols = cols.len(), "input_matrix_shape");
    Ok(DMatrix::from_fn(n, cols.len(), |i, j| cols[j][i]))
}

/// Write one `x,y` row per observation.
pub fn write_embedding(path: &Path, points: &[Vec2]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let mut df = DataFrame::new(vec![Series::new("x".into(), xs), Series::new("y".into(), ys)])?;
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_numeric_columns_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pcs.csv");
        fs::write(
            &path,
            "cell,PC1,PC2,PC3\nc0,1.0,2.0,3.0\nc1,4.0,5.0,6.0\nc2,7.0,8.0,9.5\n",
        )
        .unwrap();
        let m = read_matrix(&path, None).unwrap();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m[(2, 2)], 9.5);
        assert_eq!(m[(1, 0)], 4.0);
        let m2 = read_matrix(&path, Some(2)).unwrap();
        assert_eq!(m2.shape(), (3, 2));
    }

    #[test]
    fn rejects_tables_without_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ids.csv");
        fs::write(&path, "cell\na\nb\n").unwrap();
        assert!(read_matrix(&path, None).is_err());
    }

    #[test]
    fn writes_xy_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/emb.csv");
        write_embedding(&path, &[Vec2::new(0.5, -1.0), Vec2::new(2.0, 3.0)]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y"));
        let m = read_matrix(&path, None).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m[(0, 1)], -1.0);
        assert_eq!(m[(1, 0)], 2.0);
    }
}
