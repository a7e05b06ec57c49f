use std::time::Duration;

use log::{debug, trace};
use reqwest::blocking::Client;

use super::{RemoteRow, RemoteTable};
use crate::error::RemoteError;

/// A sheet published as a JSON endpoint: `GET` answers with an array of row
/// objects, `PUT` with the same shape replaces the whole sheet.
#[derive(Debug, Clone)]
pub struct HttpTable {
    client: Client,
    url: String,
}

impl HttpTable {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RemoteTable for HttpTable {
    fn read_all(&self) -> Result<Vec<RemoteRow>, RemoteError> {
        debug!(target: "remote", "GET {}", self.url);
        let body: Vec<serde_json::Value> = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json()?;
        let rows = RemoteRow::decode_rows(body);
        trace!(target: "remote", "received {} rows", rows.len());
        Ok(rows)
    }

    fn overwrite_all(&mut self, rows: &[RemoteRow]) -> Result<(), RemoteError> {
        debug!(target: "remote", "PUT {} ({} rows)", self.url, rows.len());
        self.client
            .put(&self.url)
            .json(rows)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}
