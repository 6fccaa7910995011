// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Renders the read-back collection as a psql-shaped table.

use crate::seed::{CollectionSpec, SeedRecord};

/// Render `rows` as an aligned table in collection column order.
///
/// Consumes a one-shot sequence of records; purely observational, and an
/// empty sequence renders as a header with `(0 rows)`.
pub fn render<I>(collection: &CollectionSpec, rows: I) -> String
where
    I: IntoIterator<Item = SeedRecord>,
{
    let headers: Vec<&str> = collection.columns.iter().map(|c| c.name).collect();
    let rows: Vec<[String; 3]> = rows.into_iter().map(|r| r.cells()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    render_line(&mut out, &headers, &widths);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push('+');
        }
        out.push_str(&"-".repeat(width + 2));
    }
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(|c| c.as_str()).collect();
        render_line(&mut out, &cells, &widths);
    }
    out.push_str(&format!(
        "({} row{})\n",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    ));
    out
}

fn render_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        if i > 0 {
            out.push('|');
        }
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width - cell.len() + 1));
    }
    // Trailing spaces on the last column serve no one.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use crate::seed;

    use super::*;

    #[test]
    fn renders_aligned_table() {
        let rows = vec![
            SeedRecord {
                sku: "WIDGET-STD".into(),
                name: "Standard widget".into(),
                price_cents: 1499,
            },
            SeedRecord {
                sku: "COG-SPARE".into(),
                name: "Spare cog, assorted".into(),
                price_cents: 150,
            },
        ];
        let rendered = render(&seed::collection(), rows);
        let expected = " sku        | name                | price_cents
------------+---------------------+-------------
 WIDGET-STD | Standard widget     | 1499
 COG-SPARE  | Spare cog, assorted | 150
(2 rows)
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn renders_empty_collection() {
        let rendered = render(&seed::collection(), Vec::new());
        let expected = " sku | name | price_cents
-----+------+-------------
(0 rows)
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn singular_row_count() {
        let rows = vec![SeedRecord {
            sku: "GEAR-MAIN".into(),
            name: "Mainspring gear".into(),
            price_cents: 4250,
        }];
        let rendered = render(&seed::collection(), rows);
        assert!(rendered.ends_with("(1 row)\n"), "{}", rendered);
    }
}
