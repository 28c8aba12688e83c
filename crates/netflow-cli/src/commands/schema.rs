use std::io::{self, Write};

use anyhow::Result;
use netflow_core::{FieldKind, Schema, TableSchema};
use tabwriter::TabWriter;

/// Print every table of `schema`: key and data fields, foreign keys and
/// row predicates.
pub fn handle(schema: &Schema) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Schema: {}", schema.name)?;
    for table in &schema.tables {
        writeln!(out)?;
        write_table(&mut out, table)?;
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, table: &TableSchema) -> Result<()> {
    writeln!(out, "{}: {}", table.name, table.tooltip)?;

    let mut writer = TabWriter::new(Vec::new());
    writeln!(writer, "  FIELD\tKEY\tTYPE\tDOMAIN\tDEFAULT\tDESCRIPTION")?;
    let key = table.primary_key_names();
    for field in table.fields() {
        let kind = match field.kind {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
        };
        let domain = field
            .domain
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let default = field
            .default
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "  {}\t{}\t{}\t{}\t{}\t{}",
            field.name,
            if key.contains(&field.name) { "yes" } else { "" },
            kind,
            domain,
            default,
            field.tooltip
        )?;
    }
    writer.flush()?;
    out.write_all(&writer.into_inner()?)?;

    for fk in &table.foreign_keys {
        writeln!(out, "  foreign key: {}", fk.describe(table.name))?;
    }
    for predicate in &table.row_predicates {
        writeln!(out, "  row check: {}", predicate.name)?;
    }
    Ok(())
}
