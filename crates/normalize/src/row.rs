use std::collections::HashMap;

use serde_json::Value;

/// Access to one logical row by field name, regardless of whether the
/// response arrived columnar or row-oriented. All field resolvers are written
/// once against this seam.
pub trait RowView {
    fn get(&self, name: &str) -> Option<&Value>;
}

/// Columnar table: field name to full value column.
pub struct ColumnarTable<'a> {
    columns: HashMap<&'a str, &'a [Value]>,
}

impl<'a> ColumnarTable<'a> {
    pub fn new(fields: &[(&'a str, &'a [Value])]) -> Self {
        let mut columns = HashMap::with_capacity(fields.len());
        for (name, values) in fields {
            columns.insert(*name, *values);
        }
        Self { columns }
    }

    pub fn row(&self, index: usize) -> ColumnarRow<'_> {
        ColumnarRow { table: self, index }
    }
}

pub struct ColumnarRow<'a> {
    table: &'a ColumnarTable<'a>,
    index: usize,
}

impl RowView for ColumnarRow<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.table.columns.get(name).and_then(|col| col.get(self.index))
    }
}

/// Field name to column index, built once per datarows response.
pub struct SchemaIndex {
    by_name: HashMap<String, usize>,
}

impl SchemaIndex {
    pub fn new(schema: &[&str]) -> Self {
        let mut by_name = HashMap::with_capacity(schema.len());
        for (index, name) in schema.iter().enumerate() {
            if !name.is_empty() {
                by_name.insert((*name).to_string(), index);
            }
        }
        Self { by_name }
    }

    pub fn row<'a>(&'a self, row: &'a [Value]) -> DatarowsRow<'a> {
        DatarowsRow { index: self, row }
    }
}

pub struct DatarowsRow<'a> {
    index: &'a SchemaIndex,
    row: &'a [Value],
}

impl RowView for DatarowsRow<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.index.by_name.get(name).and_then(|i| self.row.get(*i))
    }
}
