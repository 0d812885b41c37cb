//! # Paged Exhaustion
//!
//! Listing endpoints hand back one page per request and signal the end with
//! an empty page. [`Exhaust`] wraps such an endpoint as an async item stream:
//! it fetches only when the consumer asks and the buffer is dry, yields the
//! current page's items one by one, and stops for good at the first empty
//! page or fetch error. Stopping early, or dropping the value, means no
//! further requests are made.
//!
//! Cursor state (tokens, offsets) lives in the caller's fetch closure; the
//! iterator only tracks whether the source is exhausted. A source that never
//! returns an empty page is iterated forever, by contract.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;
use tracing::debug;

/// A fetched page that knows whether it carries any items.
///
/// The empty page is the end-of-sequence signal, so this is the one question
/// [`Exhaust`] needs answered before handing the page to the transform.
pub trait Page {
    fn has_items(&self) -> bool;
}

impl<T> Page for Vec<T> {
    fn has_items(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Page for VecDeque<T> {
    fn has_items(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Page for HashMap<K, V> {
    fn has_items(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Page for BTreeMap<K, V> {
    fn has_items(&self) -> bool {
        !self.is_empty()
    }
}

impl Page for serde_json::Map<String, serde_json::Value> {
    fn has_items(&self) -> bool {
        !self.is_empty()
    }
}

/// Drains a paged source until it reports an empty page.
///
/// `F` produces one page per call, `T` reshapes each non-empty page into the
/// items to yield. A transform may yield nothing for a page; the iterator
/// then moves straight on to the next fetch.
pub struct Exhaust<F, T, I> {
    fetch: F,
    transform: T,
    buffered: VecDeque<I>,
    done: bool,
    pages: usize,
}

impl<F, P> Exhaust<F, fn(P) -> P, P::Item>
where
    P: IntoIterator,
{
    /// Wraps a source whose pages are yielded as is.
    pub fn new(fetch: F) -> Self {
        Self::with_transform(fetch, std::convert::identity)
    }
}

impl<F, T, I> Exhaust<F, T, I> {
    /// Wraps a source with a per-page transform.
    pub fn with_transform(fetch: F, transform: T) -> Self {
        Self {
            fetch,
            transform,
            buffered: VecDeque::new(),
            done: false,
            pages: 0,
        }
    }

    /// Pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Whether the source is exhausted and the buffer drained.
    pub fn is_done(&self) -> bool {
        self.done && self.buffered.is_empty()
    }

    /// The next item, or `None` once the source is exhausted.
    ///
    /// At most one fetch is in flight at a time; a fetch error ends the
    /// sequence and is handed to the caller once.
    pub async fn next<Fut, P, It, E>(&mut self) -> Result<Option<I>, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<P, E>>,
        P: Page,
        T: FnMut(P) -> It,
        It: IntoIterator<Item = I>,
    {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Ok(Some(item));
            }
            if self.done {
                return Ok(None);
            }

            let page = match (self.fetch)().await {
                Ok(page) => page,
                Err(err) => {
                    self.done = true;
                    return Err(err);
                }
            };
            self.pages += 1;

            if !page.has_items() {
                debug!(pages = self.pages, "Source exhausted");
                self.done = true;
                return Ok(None);
            }
            self.buffered.extend((self.transform)(page));
        }
    }

    /// Drains the remaining items into a vector.
    pub async fn collect<Fut, P, It, E>(mut self) -> Result<Vec<I>, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<P, E>>,
        P: Page,
        T: FnMut(P) -> It,
        It: IntoIterator<Item = I>,
    {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::mock::scripted_pages;

    #[tokio::test]
    async fn drains_pages_in_order_until_the_empty_one() {
        let mut feed = Exhaust::new(scripted_pages(vec![vec![1, 2], vec![3], vec![]]));

        let mut items = Vec::new();
        while let Some(item) = feed.next().await.expect("Fetch cannot fail") {
            items.push(item);
        }

        assert_eq!(items, [1, 2, 3]);
        assert_eq!(feed.pages_fetched(), 3);
        assert!(feed.is_done());
    }

    #[tokio::test]
    async fn empty_first_page_ends_immediately_and_stays_ended() {
        let mut feed = Exhaust::new(scripted_pages(vec![Vec::<i32>::new()]));

        assert_eq!(feed.next().await.expect("Fetch cannot fail"), None);
        // The script has no further pages; another fetch would panic.
        assert_eq!(feed.next().await.expect("Fetch cannot fail"), None);
        assert_eq!(feed.pages_fetched(), 1);
    }

    #[tokio::test]
    async fn early_stop_fetches_nothing_further() {
        // The script never ends; only the consumed page may be fetched.
        let mut feed = Exhaust::new(scripted_pages(vec![vec![1, 2], vec![3]]));

        assert_eq!(feed.next().await.expect("Fetch cannot fail"), Some(1));
        assert_eq!(feed.next().await.expect("Fetch cannot fail"), Some(2));
        assert_eq!(feed.pages_fetched(), 1);
    }

    #[tokio::test]
    async fn transform_reshapes_each_page() {
        let pages = vec![
            BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]),
            BTreeMap::new(),
        ];
        let feed = Exhaust::with_transform(scripted_pages(pages), |page: BTreeMap<String, i32>| {
            page.into_values()
        });

        let items = feed.collect().await.expect("Fetch cannot fail");
        assert_eq!(items, [1, 2]);
    }

    #[tokio::test]
    async fn transform_yielding_nothing_moves_to_the_next_fetch() {
        let pages = vec![vec![1], vec![2], vec![]];
        let feed = Exhaust::with_transform(scripted_pages(pages), |page: Vec<i32>| {
            page.into_iter().filter(|n| n % 2 == 0)
        });

        let items = feed.collect().await.expect("Fetch cannot fail");
        assert_eq!(items, [2]);
    }

    #[tokio::test]
    async fn fetch_error_ends_the_sequence() {
        let mut calls = 0;
        let mut feed = Exhaust::new(move || {
            calls += 1;
            assert_eq!(calls, 1, "Fetch should not be retried after an error");
            std::future::ready(Err::<Vec<i32>, _>(ModelError::UnknownStatus(
                "down".to_string(),
            )))
        });

        let err = feed.next().await.unwrap_err();
        assert!(matches!(err, ModelError::UnknownStatus(_)));
        assert_eq!(feed.next().await.expect("Sequence has ended"), None);
    }
}
