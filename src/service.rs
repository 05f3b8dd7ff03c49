// src/service.rs
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::codec::Format;
use crate::config::Config;
use crate::form::rows_from_form;
use crate::table::{generate, normalize, CellValue, Table, TableStore};

/// An encoded table ready to hand back as a download.
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
    pub content_type: &'static str,
}

/// Generate, import, edit and export operations over one stored document.
pub struct Workbench<S: TableStore> {
    store: S,
    default_headers: Vec<String>,
}

impl<S: TableStore> Workbench<S> {
    pub fn new(store: S) -> Self {
        Self::from_config(store, &Config::default())
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            store,
            default_headers: config.default_headers.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current(&self) -> Table {
        self.store.get()
    }

    /// Header names of the current document, or the defaults when it is empty.
    pub fn headers(&self) -> Vec<String> {
        let table = self.store.get();
        if table.is_empty() {
            self.default_headers.clone()
        } else {
            table.headers().into_iter().map(String::from).collect()
        }
    }

    pub fn generate(&self, headers: &[String], row_count: usize) -> Table {
        let table = generate(headers, row_count);
        self.store.replace(table.clone());
        table
    }

    /// Decode `bytes` using the codec picked by `file_name`'s extension,
    /// normalize, and make the result the current document.
    pub fn import(&self, file_name: &str, bytes: &[u8]) -> Result<Table> {
        let format = Format::from_file_name(file_name)
            .ok_or_else(|| anyhow!("unsupported file type: {}", file_name))?;
        let raw = format
            .codec()
            .decode(bytes)
            .with_context(|| format!("decoding {} as {}", file_name, format))?;

        let table = normalize(&raw);
        info!(file = file_name, %format, rows = table.len(), "imported");
        self.store.replace(table.clone());
        Ok(table)
    }

    pub fn export(&self, format: Format) -> Result<Export> {
        let table = self.store.get();
        let bytes = format
            .codec()
            .encode(&table)
            .with_context(|| format!("encoding {} rows as {}", table.len(), format))?;
        info!(%format, rows = table.len(), bytes = bytes.len(), "exported");
        Ok(Export {
            bytes,
            file_name: format.file_name(),
            content_type: format.content_type(),
        })
    }

    /// Replace the document with the contents of a submitted edit form.
    pub fn save_edits(&self, fields: &HashMap<String, String>) -> Result<Table> {
        let raw = rows_from_form(fields).context("reading edit form")?;
        let table = normalize(&raw);
        info!(rows = table.len(), "saved edits");
        self.store.replace(table.clone());
        Ok(table)
    }

    pub fn add_header(&self, name: &str) -> Table {
        let mut table = self.store.get();
        table.add_header(name);
        self.store.replace(table.clone());
        table
    }

    pub fn update_cell(&self, row_index: usize, header: &str, value: impl Into<CellValue>) -> Table {
        let mut table = self.store.get();
        if table.update_cell(row_index, header, value) {
            self.store.replace(table.clone());
        } else {
            warn!(row_index, header, "cell update ignored");
        }
        table
    }
}
