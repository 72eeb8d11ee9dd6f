use polars::prelude::*;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{Error, Result};
use crate::expression::{Type, FAILURE, SUCCESS, MISSING};
use super::{Column, DataTable};


impl DataTable {
    /// Convert a `polars::DataFrame` and a target `polars::Series`
    /// into a [`DataTable`].
    ///
    /// Boolean columns become [`Type::Boolean`] inputs,
    /// integer columns [`Type::Integer`] inputs
    /// and every other column is cast to [`Type::Double`].
    /// Null cells are missing values. The target must have no null.
    pub fn from_dataframe(data: DataFrame, target: Series) -> Result<Self> {
        let (n_rows, _) = data.shape();
        let mut table = Self::new(n_rows);

        for series in data.get_columns() {
            let (ty, column) = series_to_column(series)?;
            table.add_column(series.name(), ty, column)?;
        }

        let name = target.name().to_string();
        let target = target.cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                Error::InvalidTarget(format!("`{name}` has null labels"))
            })?;
        table.with_target(target)
    }


    /// Read a CSV file into a [`DataTable`].
    /// Every column is read as [`Type::Double`];
    /// `?` and empty cells are missing values.
    /// If `has_header` is `false`,
    /// the columns are named `Feat. [1]`, `Feat. [2]`, ...
    pub fn from_csv<P>(file: P, has_header: bool) -> Result<Self>
        where P: AsRef<Path>,
    {
        let file = File::open(file)?;
        Self::from_reader(BufReader::new(file), has_header)
    }


    /// Read CSV lines from `reader` into a [`DataTable`].
    /// See [`DataTable::from_csv`].
    pub fn from_reader<R: BufRead>(reader: R, has_header: bool)
        -> Result<Self>
    {
        let mut names: Option<Vec<String>> = None;
        let mut values: Vec<Vec<f64>> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            if line.trim().is_empty() { continue; }

            if has_header && names.is_none() {
                let header = line.split(',')
                    .map(|name| name.trim().to_string())
                    .collect::<Vec<_>>();
                values = vec![Vec::new(); header.len()];
                names = Some(header);
                continue;
            }

            let cells = line.split(',')
                .map(|cell| parse_cell(cell, line_number))
                .collect::<Result<Vec<_>>>()?;

            if names.is_none() {
                let header = (1..=cells.len())
                    .map(|k| format!("Feat. [{k}]"))
                    .collect::<Vec<_>>();
                values = vec![Vec::new(); header.len()];
                names = Some(header);
            }

            if cells.len() != values.len() {
                return Err(Error::Shape {
                    name: format!("line {line_number}"),
                    expected: values.len(),
                    found: cells.len(),
                });
            }
            values.iter_mut()
                .zip(cells)
                .for_each(|(column, x)| column.push(x));
        }

        let columns = names.unwrap_or_default()
            .into_iter()
            .zip(values)
            .map(|(name, column)| (name, Type::Double, Column::Double(column)))
            .collect::<Vec<_>>();
        Self::from_columns(columns)
    }
}


fn parse_cell(cell: &str, line: usize) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "?" {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| Error::Parse { cell: cell.to_string(), line })
}


fn series_to_column(series: &Series) -> Result<(Type, Column)> {
    let column = match series.dtype() {
        DataType::Boolean => {
            let values = series.bool()?
                .into_iter()
                .map(|b| match b {
                    Some(true) => SUCCESS,
                    Some(false) => FAILURE,
                    None => MISSING,
                })
                .collect::<Vec<_>>();
            (Type::Boolean, Column::Boolean(values))
        },
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        | DataType::UInt8 | DataType::UInt16 | DataType::UInt32
        | DataType::UInt64 => {
            let values = series.cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .collect::<Vec<_>>();
            (Type::Integer, Column::Integer(values))
        },
        _ => {
            let values = series.cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|x| x.unwrap_or(f64::NAN))
                .collect::<Vec<_>>();
            (Type::Double, Column::Double(values))
        },
    };
    Ok(column)
}
