use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use reqwest::Url;

use crate::errors::GatewayError;

/// One reusable HTTP client per backend authority (`host[:port]`),
/// created lazily and kept for the lifetime of the process.
///
/// `reqwest::Client` handles are cheap clones over a shared connection
/// pool, so every request targeting the same authority reuses the same
/// underlying connections.
#[derive(Debug)]
pub struct ClientPool {
    clients: DashMap<String, reqwest::Client>,
    timeout: Duration,
}

impl ClientPool {
    pub fn new(timeout: Duration) -> Self {
        ClientPool {
            clients: DashMap::new(),
            timeout,
        }
    }

    /// Returns the pooled client for the URL's authority, building it on
    /// first use. URLs without an authority get a throwaway client that
    /// is never stored; the caller drops it after the single call.
    ///
    /// The vacant-entry insert happens under the map's shard lock, so
    /// concurrent first use of one authority builds exactly one client.
    pub fn acquire(&self, url: &str) -> Result<reqwest::Client, GatewayError> {
        let Some(authority) = Self::authority(url) else {
            return self.build_client(url);
        };

        if let Some(client) = self.clients.get(&authority) {
            return Ok(client.clone());
        }

        match self.clients.entry(authority) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let client = self.build_client(url)?;
                entry.insert(client.clone());
                Ok(client)
            }
        }
    }

    /// Number of pooled authorities.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn build_client(&self, url: &str) -> Result<reqwest::Client, GatewayError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| GatewayError::upstream(url, e))
    }

    fn authority(url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let authority = parsed.authority();
        (!authority.is_empty()).then(|| authority.to_string())
    }
}
