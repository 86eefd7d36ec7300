use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};

/// Load a whitespace-delimited numeric table as a `(rows, columns)` matrix.
///
/// `#` starts a comment and blank lines are skipped. Every remaining line is a
/// row and must have the same number of columns as the first one.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    let matrix = parse_matrix(BufReader::new(file), path)?;
    debug!("Loaded {:?}: {}x{} matrix", path, matrix.nrows(), matrix.ncols());
    Ok(matrix)
}

/// Parse a matrix from any buffered reader; `source` is only used in errors.
pub fn parse_matrix<R: BufRead>(reader: R, source: &Path) -> Result<Array2<f64>> {
    let parse_error = |line: usize, message: String| Error::Parse {
        path: source.to_path_buf(),
        line,
        message,
    };

    let mut values = Vec::new();
    let mut columns: Option<usize> = None;
    let mut rows = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };

        let before = values.len();
        for token in content.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| {
                parse_error(line_no, format!("could not convert '{}' to a number", token))
            })?;
            values.push(value);
        }
        let found = values.len() - before;
        if found == 0 {
            continue;
        }

        match columns {
            None => columns = Some(found),
            Some(expected) if expected != found => {
                return Err(parse_error(
                    line_no,
                    format!("expected {} columns, found {}", expected, found),
                ));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let columns = columns.ok_or_else(|| parse_error(0, "no data rows".to_string()))?;
    Array2::from_shape_vec((rows, columns), values)
        .map_err(|e| parse_error(0, format!("inconsistent matrix shape: {}", e)))
}
