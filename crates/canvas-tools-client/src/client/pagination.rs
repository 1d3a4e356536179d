use super::{api_v1, CanvasClient, PageLimits};
use crate::error::CanvasClientResult;
use serde::de::DeserializeOwned;
use url::Url;

/// A lazy walk over a paginated collection endpoint.
///
/// Pages are requested one at a time starting from page 1. The walk ends after a page with fewer
/// records than the page size, after `max_pages` pages, or after the first error, which is yielded
/// once.
pub struct Paginated<'a, T, F> {
    client: &'a CanvasClient,
    url: Url,
    limits: PageLimits,
    filter: F,
    next_page: u32,
    buffered: std::vec::IntoIter<T>,
    finished: bool,
}

impl<'a, T, F> Paginated<'a, T, F>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    pub(crate) fn new(client: &'a CanvasClient, url: Url, limits: PageLimits, filter: F) -> Self {
        Self {
            client,
            url,
            limits,
            filter,
            next_page: 1,
            buffered: Vec::new().into_iter(),
            finished: false,
        }
    }

    /// How many pages have been requested so far.
    pub fn pages_requested(&self) -> u32 {
        self.next_page - 1
    }
}

impl<T, F> Iterator for Paginated<'_, T, F>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    type Item = CanvasClientResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for record in self.buffered.by_ref() {
                if (self.filter)(&record) {
                    return Some(Ok(record));
                }
            }
            if self.finished {
                return None;
            }

            let page = self.next_page;
            self.next_page += 1;
            let records: Vec<T> =
                match api_v1::get_page(self.client, &self.url, page, self.limits.page_size) {
                    Ok(records) => records,
                    Err(err) => {
                        self.finished = true;
                        return Some(Err(err));
                    }
                };
            log::debug!("page {} of {} had {} records", page, self.url, records.len());

            // a short page is the last one
            if records.len() < self.limits.page_size as usize || page >= self.limits.max_pages {
                self.finished = true;
            }
            self.buffered = records.into_iter();
        }
    }
}
