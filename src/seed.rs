// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The seed collection: its shape, its fixed contents, and the SQL text
//! derived from both.
//!
//! All DDL here is conditional (`IF NOT EXISTS`) and all DML is
//! duplicate-tolerant (`ON CONFLICT ... DO NOTHING`), so every statement is
//! safe to execute arbitrarily many times. Idempotence lives in the
//! primitives themselves, not in error handling around them.

use std::fmt::Write;

use postgres_protocol::escape::escape_identifier;

/// One column of a seed collection.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
}

/// The shape of a seed collection: an ordered column list plus the column
/// whose value identifies a record for duplicate detection.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
    /// Must name one of `columns`; becomes the primary key.
    pub natural_key: &'static str,
}

impl CollectionSpec {
    /// Conditional DDL creating the collection inside `schema`.
    pub fn create_table_sql(&self, schema: &str) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {}.{} (",
            escape_identifier(schema),
            escape_identifier(self.name),
        );
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            write!(sql, "{} {}", escape_identifier(column.name), column.sql_type)
                .expect("writing to a String cannot fail");
            if !column.nullable {
                sql.push_str(" NOT NULL");
            }
        }
        write!(sql, ", PRIMARY KEY ({}))", escape_identifier(self.natural_key))
            .expect("writing to a String cannot fail");
        sql
    }

    /// A single multi-row conditional insert for `rows` records.
    ///
    /// One statement keeps the batch atomic and the conflict handling inside
    /// the store primitive; there is no check-then-insert window for a
    /// concurrent run to race through. `rows` must be nonzero.
    pub fn insert_sql(&self, schema: &str, rows: usize) -> String {
        assert!(rows > 0, "insert_sql requires at least one row");
        let mut sql = format!(
            "INSERT INTO {}.{} (",
            escape_identifier(schema),
            escape_identifier(self.name),
        );
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&escape_identifier(column.name));
        }
        sql.push_str(") VALUES ");
        let width = self.columns.len();
        for row in 0..rows {
            if row > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            for col in 0..width {
                if col > 0 {
                    sql.push_str(", ");
                }
                write!(sql, "${}", row * width + col + 1)
                    .expect("writing to a String cannot fail");
            }
            sql.push(')');
        }
        write!(sql, " ON CONFLICT ({}) DO NOTHING", escape_identifier(self.natural_key))
            .expect("writing to a String cannot fail");
        sql
    }

    /// Unconditional read-all, in store-native order.
    pub fn select_all_sql(&self, schema: &str) -> String {
        let mut sql = String::from("SELECT ");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&escape_identifier(column.name));
        }
        write!(
            sql,
            " FROM {}.{}",
            escape_identifier(schema),
            escape_identifier(self.name),
        )
        .expect("writing to a String cannot fail");
        sql
    }
}

/// One row of seed data, identified by its `sku`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRecord {
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
}

impl SeedRecord {
    /// The record's cells in collection column order, rendered for display.
    pub fn cells(&self) -> [String; 3] {
        [self.sku.clone(), self.name.clone(), self.price_cents.to_string()]
    }
}

/// The fixed seed dataset. Config-time constant, never computed.
const SEED: &[(&str, &str, i64)] = &[
    ("WIDGET-STD", "Standard widget", 1499),
    ("WIDGET-DLX", "Deluxe widget", 2999),
    ("SPROCKET-04", "Four-tooth sprocket", 799),
    ("GEAR-MAIN", "Mainspring gear", 4250),
    ("COG-SPARE", "Spare cog, assorted", 150),
];

/// The collection the bootstrap run maintains.
pub fn collection() -> CollectionSpec {
    CollectionSpec {
        name: "products",
        columns: vec![
            ColumnSpec {
                name: "sku",
                sql_type: "text",
                nullable: false,
            },
            ColumnSpec {
                name: "name",
                sql_type: "text",
                nullable: false,
            },
            ColumnSpec {
                name: "price_cents",
                sql_type: "bigint",
                nullable: false,
            },
        ],
        natural_key: "sku",
    }
}

/// The seed dataset as records.
pub fn seed_records() -> Vec<SeedRecord> {
    SEED.iter()
        .map(|(sku, name, price_cents)| SeedRecord {
            sku: (*sku).into(),
            name: (*name).into(),
            price_cents: *price_cents,
        })
        .collect()
}
