//! Presenters for the command line: an aligned text table and pretty JSON.
//!
//! Numbers are printed raw; currency and locale formatting belong to the UI.

use orderfold_core::error::Result;
use orderfold_core::{OrderfoldError, Presenter, ReconciledOrder};
use std::io::Write;

const HEADERS: [&str; 7] = ["REQUEST", "MODEL", "COLOR", "QTY", "PRICE", "STATUS", "CREATED"];

pub struct TablePresenter<W: Write> {
    out: W,
}

impl<W: Write> TablePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn row(order: &ReconciledOrder) -> [String; 7] {
        let mut status = order.status.to_string();
        if order.low_confidence {
            status.push('*');
        }
        [
            order.request_id.to_string(),
            order.model_name.clone(),
            order.color.clone(),
            order.quantity.to_string(),
            order.price.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            status,
            order
                .created_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl<W: Write> Presenter for TablePresenter<W> {
    fn present(&mut self, orders: &[ReconciledOrder]) -> Result<()> {
        let rows: Vec<[String; 7]> = orders.iter().map(Self::row).collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header = HEADERS.map(str::to_string);
        let mut lines = vec![render(&header, &widths)];
        lines.extend(rows.iter().map(|row| render(row, &widths)));
        if orders.iter().any(|o| o.low_confidence) {
            lines.push("* variant guessed among several candidates".to_string());
        }

        for line in lines {
            writeln!(self.out, "{}", line).map_err(|e| OrderfoldError::Present(e.to_string()))?;
        }
        Ok(())
    }
}

fn render(cells: &[String; 7], widths: &[usize; 7]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, orders: &[ReconciledOrder]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, orders)?;
        writeln!(self.out).map_err(|e| OrderfoldError::Present(e.to_string()))
    }
}
