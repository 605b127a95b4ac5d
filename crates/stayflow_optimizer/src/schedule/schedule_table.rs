use std::{fs::File, io::Read, path::Path};

use fxhash::FxHashMap;
use tracing::{debug, instrument};

use crate::{
    define_index_newtype,
    schedule::{
        error::ScheduleError,
        value::{Value, ValueType, infer_value_type},
        waypoint::{Direction, Waypoint},
    },
};

pub const WAYPOINT_COLUMN: &str = "waypoint";
pub const DAY_COLUMN: &str = "day";
pub const DIRECTION_COLUMN: &str = "direction";
pub const COST_COLUMN: &str = "cost";

define_index_newtype!(ColumnIdx, Column);

#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    value_type: ValueType,
    values: Vec<Value>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

}

/// Column-oriented schedule. Every column has the same number of rows and a
/// single inferred type; empty cells are [`Value::Null`].
#[derive(Debug, Clone)]
pub struct ScheduleTable {
    columns: Vec<Column>,
    column_lookup: FxHashMap<String, ColumnIdx>,
    row_count: usize,
}

impl ScheduleTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ScheduleTable, ScheduleError> {
        let file = File::open(path.as_ref()).map_err(|source| ScheduleError::Open {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Self::from_reader(file)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn from_reader<R: Read>(reader: R) -> Result<ScheduleTable, ScheduleError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (column, cell) in raw_columns.iter_mut().zip(record.iter()) {
                column.push(cell.to_owned());
            }
        }

        let mut builder = ScheduleTableBuilder::default();
        for (name, cells) in headers.into_iter().zip(raw_columns) {
            let value_type = infer_value_type(cells.iter().map(String::as_str));
            let values = cells
                .iter()
                .map(|cell| Value::parse_as(cell, value_type).unwrap_or(Value::Null))
                .collect::<Vec<_>>();
            builder.add_column(name, values);
        }

        let table = builder.build()?;
        debug!(
            "Loaded schedule with {} rows and {} columns",
            table.len(),
            table.columns.len()
        );

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name())
    }

    pub fn column_index(&self, name: &str) -> Option<ColumnIdx> {
        self.column_lookup.get(name).copied()
    }

    pub fn column(&self, index: ColumnIdx) -> &Column {
        &self.columns[index]
    }

    pub fn value(&self, row: usize, column: ColumnIdx) -> &Value {
        &self.columns[column].values[row]
    }

    fn required_column(
        &self,
        name: &str,
        expected: Option<ValueType>,
    ) -> Result<&Column, ScheduleError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| ScheduleError::MissingColumn(name.to_owned()))?;
        let column = self.column(index);

        if let Some(expected) = expected
            && column.value_type != expected
        {
            return Err(ScheduleError::ColumnType {
                column: name.to_owned(),
                expected,
                found: column.value_type,
            });
        }

        if let Some(row) = column.values.iter().position(Value::is_null) {
            return Err(ScheduleError::NullCell {
                column: name.to_owned(),
                row,
            });
        }

        Ok(column)
    }

    /// Validates the required columns and returns one waypoint per row.
    pub fn waypoints(&self) -> Result<Vec<Waypoint>, ScheduleError> {
        let labels = self.required_column(WAYPOINT_COLUMN, None)?;
        let days = self.required_column(DAY_COLUMN, Some(ValueType::Int))?;
        let directions = self.required_column(DIRECTION_COLUMN, Some(ValueType::Str))?;
        let costs = self.required_column(COST_COLUMN, Some(ValueType::Int))?;

        (0..self.row_count)
            .map(|row| {
                let raw_direction = directions.values[row].as_str().unwrap_or_default();
                let direction = raw_direction.parse::<Direction>().map_err(|value| {
                    ScheduleError::InvalidDirection { value, row }
                })?;

                Ok(Waypoint::new(
                    row,
                    labels.values[row].to_string(),
                    days.values[row].as_int().unwrap_or_default(),
                    direction,
                    costs.values[row].as_int().unwrap_or_default(),
                ))
            })
            .collect()
    }
}

#[derive(Default)]
pub struct ScheduleTableBuilder {
    columns: Vec<(String, Vec<Value>)>,
}

impl ScheduleTableBuilder {
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.columns.push((name.into(), values));
        self
    }

    pub fn build(self) -> Result<ScheduleTable, ScheduleError> {
        let row_count = self
            .columns
            .first()
            .map(|(_, values)| values.len())
            .unwrap_or(0);

        let mut column_lookup = FxHashMap::default();
        let mut columns = Vec::with_capacity(self.columns.len());

        for (name, values) in self.columns {
            if values.len() != row_count {
                return Err(ScheduleError::ColumnLength {
                    column: name,
                    expected: row_count,
                    found: values.len(),
                });
            }

            if column_lookup.contains_key(&name) {
                return Err(ScheduleError::DuplicateColumn(name));
            }

            let (value_type, values) = unify_column(&name, values)?;
            column_lookup.insert(name.clone(), ColumnIdx::new(columns.len()));
            columns.push(Column {
                name,
                value_type,
                values,
            });
        }

        Ok(ScheduleTable {
            columns,
            column_lookup,
            row_count,
        })
    }
}

/// Picks the column type from its non-null values. Int columns containing a
/// float are widened to Float, any other mix is rejected.
fn unify_column(name: &str, values: Vec<Value>) -> Result<(ValueType, Vec<Value>), ScheduleError> {
    let mut value_type: Option<ValueType> = None;

    for value in &values {
        let Some(current) = value.value_type() else {
            continue;
        };

        value_type = match (value_type, current) {
            (None, current) => Some(current),
            (Some(previous), current) if previous == current => Some(previous),
            (Some(ValueType::Int), ValueType::Float) | (Some(ValueType::Float), ValueType::Int) => {
                Some(ValueType::Float)
            }
            (Some(previous), current) => {
                return Err(ScheduleError::MixedColumnTypes {
                    column: name.to_owned(),
                    first: previous,
                    second: current,
                });
            }
        };
    }

    match value_type {
        Some(ValueType::Float) => {
            let values = values
                .into_iter()
                .map(|value| match value {
                    Value::Int(int) => Value::Float(int as f64),
                    other => other,
                })
                .collect();
            Ok((ValueType::Float, values))
        }
        Some(value_type) => Ok((value_type, values)),
        None => Ok((ValueType::Str, values)),
    }
}
