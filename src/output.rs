//! Output formats: aligned tables, JSON lists, and resource names

use std::io::{self, Write};

use clap::ValueEnum;
use comfy_table::presets::NOTHING;
use serde_json::{Value, json};

use kubemulti_k8s::{Record, ResourceDescriptor};

/// Spaces after each column
const PADDING: u16 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Name,
}

/// Borderless table in the shape kubectl prints
#[derive(Debug, Clone)]
pub struct Table {
    inner: comfy_table::Table,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inner = comfy_table::Table::new();
        inner
            .load_preset(NOTHING)
            .set_header(header.into_iter().map(|h| h.as_ref().to_uppercase()));
        let mut table = Self { inner };
        table.pad_columns();
        table
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.inner.add_row(row);
        self.pad_columns();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Rows can introduce columns the header did not have
    fn pad_columns(&mut self) {
        for column in self.inner.column_iter_mut() {
            column.set_padding((0, PADDING));
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.inner.trim_fmt())
    }
}

/// Records as a kubectl `List`
pub fn write_json<'a, W, I>(out: &mut W, records: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let items: Vec<&Record> = records.into_iter().collect();
    let list = json!({ "apiVersion": "v1", "kind": "List", "items": items });
    serde_json::to_writer_pretty(&mut *out, &list)?;
    writeln!(out)
}

/// `<resource>[.<group>]/<name>` per record
pub fn write_names<'a, W, I>(
    out: &mut W,
    descriptor: &ResourceDescriptor,
    records: I,
) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let prefix = if descriptor.is_core() {
        descriptor.resource.clone()
    } else {
        format!("{}.{}", descriptor.resource, descriptor.group)
    };
    for record in records {
        if let Some(name) = record.name() {
            writeln!(out, "{prefix}/{name}")?;
        }
    }
    Ok(())
}

/// Split a `List` into its items; anything else is a single record
pub fn records_from_json(value: Value) -> Vec<Record> {
    match value {
        Value::Object(mut map) if map.get("items").is_some_and(Value::is_array) => {
            match map.remove("items") {
                Some(Value::Array(items)) => items.into_iter().map(Record::new).collect(),
                _ => Vec::new(),
            }
        }
        other => vec![Record::new(other)],
    }
}
