//! Contains the CanvasClient struct for communicating with the Canvas API.

pub mod api_v1;
mod mutator;
mod pagination;

pub use self::{
    mutator::{is_mutation_success, MutationOutcome, Mutator},
    pagination::Paginated,
};
use crate::error::{CanvasClientError, CanvasClientResult};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::{path::Path, sync::Arc, time::Duration};
use url::Url;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 100;
pub const DEFAULT_MUTATION_DELAY: Duration = Duration::from_secs(1);

/// Bounds for walking a collection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Records requested per page with `per_page`.
    pub page_size: u32,
    /// Hard ceiling on the number of pages requested from one collection.
    pub max_pages: u32,
}

impl PageLimits {
    /// Both limits are at least 1.
    pub fn new(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_MAX_PAGES)
    }
}

/// Everything the client needs, passed in once at construction.
#[derive(Clone)]
pub struct ClientSettings {
    pub root_url: Url,
    /// Sent as a bearer credential with every API request.
    pub token: String,
    pub limits: PageLimits,
    /// Slept after every mutation, whatever its outcome.
    pub mutation_delay: Duration,
}

impl ClientSettings {
    pub fn new(root_url: Url, token: impl Into<String>) -> Self {
        Self {
            root_url,
            token: token.into(),
            limits: PageLimits::default(),
            mutation_delay: DEFAULT_MUTATION_DELAY,
        }
    }
}

/// A struct for interacting with the Canvas REST API.
/// Uses an `Arc` internally so it is cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CanvasClient(Arc<CanvasCore>);

struct CanvasCore {
    client: Client,
    root_url: Url,
    token: String,
    limits: PageLimits,
    mutation_delay: Duration,
}

impl CanvasClient {
    /// Creates a new CanvasClient from the given settings.
    ///
    /// # Errors
    /// If the root URL cannot be given a trailing slash or the HTTP client cannot be built.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use canvas_tools_client::{CanvasClient, ClientSettings};
    ///
    /// let settings = ClientSettings::new("https://canvas.example.com/api/v1".parse().unwrap(), "token");
    /// let client = CanvasClient::new(settings).unwrap();
    /// ```
    pub fn new(settings: ClientSettings) -> CanvasClientResult<Self> {
        // guarantee a trailing slash, otherwise join will drop the last component
        let root_url = if settings.root_url.as_str().ends_with('/') {
            settings.root_url
        } else {
            let with_slash = format!("{}/", settings.root_url);
            with_slash
                .parse()
                .map_err(|e| CanvasClientError::UrlParse(with_slash, e))?
        };
        let client = Client::builder()
            .build()
            .map_err(CanvasClientError::HttpClientBuilder)?;

        Ok(CanvasClient(Arc::new(CanvasCore {
            client,
            root_url,
            token: settings.token,
            limits: settings.limits,
            mutation_delay: settings.mutation_delay,
        })))
    }

    pub fn root_url(&self) -> &Url {
        &self.0.root_url
    }

    pub fn limits(&self) -> PageLimits {
        self.0.limits
    }

    pub fn mutation_delay(&self) -> Duration {
        self.0.mutation_delay
    }

    /// Walks the collection at `path` page by page, yielding the records that pass `filter` in
    /// the order the server returned them. Extra query parameters are sent with every page.
    ///
    /// The returned iterator is lazy: no request is made before the first call to `next`.
    ///
    /// # Errors
    /// If the path cannot be joined to the root URL. Errors from the server are yielded by the iterator.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use canvas_tools_client::{CanvasClient, ClientSettings, filter, response::Assignment};
    ///
    /// let settings = ClientSettings::new("https://canvas.example.com/api/v1/".parse().unwrap(), "token");
    /// let client = CanvasClient::new(settings).unwrap();
    /// let uploads = client
    ///     .fetch::<Assignment, _>("courses/9/assignments", &[], filter::is_vericite_candidate)
    ///     .unwrap();
    /// for assignment in uploads {
    ///     let _assignment = assignment.unwrap();
    /// }
    /// ```
    pub fn fetch<T, F>(
        &self,
        path: &str,
        query: &[(&str, String)],
        filter: F,
    ) -> CanvasClientResult<Paginated<'_, T, F>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let mut url = api_v1::make_url(self, path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(Paginated::new(self, url, self.0.limits, filter))
    }

    /// Returns a mutator that shares this client and its configured delay.
    pub fn mutator(&self) -> Mutator<'_> {
        Mutator::new(self)
    }

    /// Downloads `source_url` into `destination_dir/file_name`, creating the directory if needed.
    /// The request is sent without credentials. Returns the number of bytes written.
    ///
    /// The destination file is created before the request is sent and is not removed if the
    /// download fails.
    ///
    /// # Errors
    /// If the directory or file cannot be created, the server cannot be reached or responds with
    /// an error, or writing the body fails.
    pub fn download(
        &self,
        source_url: &Url,
        destination_dir: &Path,
        file_name: &str,
    ) -> CanvasClientResult<u64> {
        api_v1::download(self, source_url, destination_dir, file_name)
    }
}
