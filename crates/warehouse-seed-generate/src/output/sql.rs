use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use warehouse_seed_core::{Dataset, Return, ReturnItem, Shipment, ShipmentItem, TimestampStyle};

use crate::sequences::IdSequences;

pub const SHIPMENTS_HEADER: &str = "-- SHIPMENTS";
pub const SHIPMENT_ITEMS_HEADER: &str = "-- SHIPMENT ITEMS";
pub const RETURNS_HEADER: &str = "-- RETURNS";
pub const RETURN_ITEMS_HEADER: &str = "-- RETURN ITEMS";
pub const SEQUENCES_HEADER: &str = "-- Update sequences";

/// Write the dataset as PostgreSQL statements and return the bytes written.
pub fn write_sql_file(
    path: &Path,
    dataset: &Dataset,
    sequences: &IdSequences,
    timestamps: TimestampStyle,
) -> io::Result<u64> {
    let writer = BufWriter::new(File::create(path)?);
    let mut counting = CountingWriter::new(writer);
    write_sql(&mut counting, dataset, sequences, timestamps)?;
    counting.flush()?;
    Ok(counting.bytes_written())
}

/// Render every section in table order: shipments, items, returns, return
/// items, then the sequence resets.
pub fn write_sql<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    sequences: &IdSequences,
    timestamps: TimestampStyle,
) -> io::Result<()> {
    writeln!(out, "-- Generated shipments and returns data")?;
    writeln!(out)?;

    writeln!(out, "{SHIPMENTS_HEADER}")?;
    for shipment in &dataset.shipments {
        writeln!(out, "{}", shipment_statement(shipment, timestamps))?;
    }

    writeln!(out)?;
    writeln!(out, "{SHIPMENT_ITEMS_HEADER}")?;
    for item in &dataset.shipment_items {
        writeln!(out, "{}", shipment_item_statement(item))?;
    }

    writeln!(out)?;
    writeln!(out, "{RETURNS_HEADER}")?;
    for ret in &dataset.returns {
        writeln!(out, "{}", return_statement(ret, timestamps))?;
    }

    writeln!(out)?;
    writeln!(out, "{RETURN_ITEMS_HEADER}")?;
    for item in &dataset.return_items {
        writeln!(out, "{}", return_item_statement(item))?;
    }

    writeln!(out)?;
    writeln!(out, "{SEQUENCES_HEADER}")?;
    for (sequence, value) in sequences.entries() {
        writeln!(out, "SELECT setval({}, {value}, true);", text(sequence))?;
    }

    Ok(())
}

pub fn shipment_statement(shipment: &Shipment, timestamps: TimestampStyle) -> String {
    format!(
        "INSERT INTO shipments (id, shipment_number, shop_id, driver_id, shipment_date, status, \
         notes, email_sent, whatsapp_sent, created_by, created_at, updated_at) VALUES \
         ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {});",
        shipment.id,
        text(&shipment.shipment_number),
        shipment.shop_id,
        shipment.driver_id,
        date(shipment.shipment_date),
        text(shipment.status.as_str()),
        text(&shipment.notes),
        shipment.email_sent,
        shipment.whatsapp_sent,
        shipment.created_by,
        timestamp(shipment.created_at, timestamps),
        timestamp(shipment.updated_at, timestamps),
    )
}

pub fn shipment_item_statement(item: &ShipmentItem) -> String {
    format!(
        "INSERT INTO shipment_items (id, shipment_id, product_id, quantity, unit_price, \
         total_price) VALUES ({}, {}, {}, {}, {}, {});",
        item.id, item.shipment_id, item.product_id, item.quantity, item.unit_price, item.total_price,
    )
}

pub fn return_statement(ret: &Return, timestamps: TimestampStyle) -> String {
    format!(
        "INSERT INTO returns (id, return_number, shipment_id, shop_id, return_date, status, \
         reason, created_by, created_at, updated_at) VALUES \
         ({}, {}, {}, {}, {}, {}, {}, {}, {}, {});",
        ret.id,
        text(&ret.return_number),
        ret.shipment_id,
        ret.shop_id,
        date(ret.return_date),
        text(ret.status.as_str()),
        text(ret.reason.as_str()),
        ret.created_by,
        timestamp(ret.created_at, timestamps),
        timestamp(ret.updated_at, timestamps),
    )
}

pub fn return_item_statement(item: &ReturnItem) -> String {
    format!(
        "INSERT INTO return_items (id, return_id, shipment_item_id, product_id, quantity, \
         unit_price, total_amount, reason) VALUES ({}, {}, {}, {}, {}, {}, {}, {});",
        item.id,
        item.return_id,
        item.shipment_item_id,
        item.product_id,
        item.quantity,
        item.unit_price,
        item.total_amount,
        text(item.reason.as_str()),
    )
}

/// Quote a text literal, doubling embedded single quotes.
pub fn text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn date(value: NaiveDate) -> String {
    format!("'{}'", value.format("%Y-%m-%d"))
}

fn timestamp(value: NaiveDateTime, style: TimestampStyle) -> String {
    match style {
        TimestampStyle::Now => "NOW()".to_string(),
        TimestampStyle::Literal => format!("'{}'", value.format("%Y-%m-%d %H:%M:%S")),
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
