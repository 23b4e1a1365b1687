//! Lazy pagination over page-numbered list endpoints.
//!
//! [`fetch_pages`] turns a `fetch(page, page_size)` function into a stream of
//! decoded pages, starting at page 1. Nothing is requested until the stream
//! is polled, and each poll requests at most one page.
//!
//! A 404 on page 1 ends the stream with no pages (GitHub answers 404 for
//! collections that do not exist yet, e.g. artifacts on a repo without
//! Actions). A 404 on any later page is a real error and is yielded as one.
//!
//! Two flatteners decide when to stop asking for more pages:
//! - [`flatten_short_pages`]: stop after a page shorter than `page_size`.
//! - [`flatten_counted_pages`]: stop once the declared `total_count` items
//!   have been seen, or on an empty page.

use std::collections::VecDeque;
use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::error::GithubError;

/// A lazily fetched sequence of pages or items.
pub type PageStream<'a, T> = BoxStream<'a, Result<T, GithubError>>;

/// A page from an endpoint that reports the total number of items alongside
/// each page.
pub trait CountedPage {
    type Item;

    fn total_count(&self) -> u64;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Stream pages `1, 2, 3, …` from `fetch` until the consumer stops polling
/// or a fetch fails.
pub fn fetch_pages<'a, P, F, Fut>(page_size: u32, fetch: F) -> PageStream<'a, P>
where
    P: Send + 'a,
    F: FnMut(u32, u32) -> Fut + Send + 'a,
    Fut: Future<Output = Result<P, GithubError>> + Send + 'a,
{
    stream::try_unfold((fetch, 1u32), move |(mut fetch, page)| async move {
        match fetch(page, page_size).await {
            Ok(result) => Ok(Some((result, (fetch, page + 1)))),
            Err(err) if page == 1 && err.is_not_found() => {
                tracing::debug!(page, "first page not found, treating as empty");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    })
    .boxed()
}

struct Flatten<'a, P, T> {
    pages: PageStream<'a, P>,
    buffered: VecDeque<T>,
    seen: u64,
    finished: bool,
}

impl<'a, P, T> Flatten<'a, P, T> {
    fn new(pages: PageStream<'a, P>) -> Self {
        Flatten {
            pages,
            buffered: VecDeque::new(),
            seen: 0,
            finished: false,
        }
    }
}

/// Flatten array pages into items, requesting another page only while the
/// previous one was exactly `page_size` long. The items of the final short
/// page are still yielded. A `page_size` of 0 is treated as 1, so an empty
/// page always ends the stream.
pub fn flatten_short_pages<'a, T>(page_size: u32, pages: PageStream<'a, Vec<T>>) -> PageStream<'a, T>
where
    T: Send + 'a,
{
    let page_size = page_size.max(1) as usize;
    stream::try_unfold(Flatten::new(pages), move |mut state| async move {
        loop {
            if let Some(item) = state.buffered.pop_front() {
                return Ok(Some((item, state)));
            }
            if state.finished {
                return Ok(None);
            }
            let page = match state.pages.try_next().await {
                Ok(Some(page)) => page,
                Ok(None) => return Ok(None),
                Err(err) => return Err(err),
            };
            state.finished = page.len() < page_size;
            state.buffered.extend(page);
        }
    })
    .boxed()
}

/// Flatten counted pages into items, stopping once `total_count` items have
/// been seen or a page comes back empty.
pub fn flatten_counted_pages<'a, P>(pages: PageStream<'a, P>) -> PageStream<'a, P::Item>
where
    P: CountedPage + Send + 'a,
    P::Item: Send + 'a,
{
    stream::try_unfold(Flatten::new(pages), |mut state| async move {
        loop {
            if let Some(item) = state.buffered.pop_front() {
                return Ok(Some((item, state)));
            }
            if state.finished {
                return Ok(None);
            }
            let page = match state.pages.try_next().await {
                Ok(Some(page)) => page,
                Ok(None) => return Ok(None),
                Err(err) => return Err(err),
            };
            let total = page.total_count();
            let items = page.into_items();
            state.seen += items.len() as u64;
            state.finished = items.is_empty() || state.seen >= total;
            state.buffered.extend(items);
        }
    })
    .boxed()
}

/// Append the page query to `path`.
pub(crate) fn page_path(path: &str, page: u32, page_size: u32) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}page={page}&per_page={page_size}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use futures::TryStreamExt;

    use super::*;

    fn status(code: u16) -> GithubError {
        GithubError::Status {
            path: "/test".to_string(),
            status: code,
        }
    }

    /// Serves `pages` in order (empty pages past the end) and counts requests.
    fn scripted(
        pages: Vec<Vec<u32>>,
        calls: Arc<AtomicU32>,
    ) -> impl FnMut(u32, u32) -> futures::future::Ready<Result<Vec<u32>, GithubError>> + Send {
        move |page, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            let result = pages.get(page as usize - 1).cloned().unwrap_or_default();
            futures::future::ready(Ok(result))
        }
    }

    #[test]
    fn page_path_picks_separator() {
        assert_eq!(page_path("/orgs/acme/teams", 2, 30), "/orgs/acme/teams?page=2&per_page=30");
        assert_eq!(
            page_path("/repos/a/b/branches?protected=true", 1, 10),
            "/repos/a/b/branches?protected=true&page=1&per_page=10"
        );
    }

    #[tokio::test]
    async fn not_found_on_first_page_is_empty() {
        let pages = fetch_pages(10, |_, _| futures::future::ready(Err::<Vec<u32>, _>(status(404))));
        let collected: Vec<Vec<u32>> = pages.try_collect().await.expect("empty, not an error");
        assert!(collected.is_empty());
    }

    #[tokio::test]
    async fn not_found_on_later_page_is_an_error() {
        let pages = fetch_pages(2, |page, _| {
            futures::future::ready(if page == 1 { Ok(vec![1, 2]) } else { Err(status(404)) })
        });
        let err = flatten_short_pages(2, pages)
            .try_collect::<Vec<u32>>()
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn other_errors_on_first_page_propagate() {
        let pages = fetch_pages(10, |_, _| futures::future::ready(Err::<Vec<u32>, _>(status(500))));
        let err = pages.try_collect::<Vec<_>>().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn short_page_ends_collection_and_is_emitted() {
        let calls = Arc::new(AtomicU32::new(0));
        let pages = fetch_pages(3, scripted(vec![vec![1, 2, 3], vec![4]], calls.clone()));
        let items: Vec<u32> = flatten_short_pages(3, pages).try_collect().await.expect("items");
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn full_last_page_costs_one_empty_request() {
        let calls = Arc::new(AtomicU32::new(0));
        let pages = fetch_pages(2, scripted(vec![vec![1, 2], vec![3, 4]], calls.clone()));
        let items: Vec<u32> = flatten_short_pages(2, pages).try_collect().await.expect("items");
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_page_size_stops_at_first_empty_page() {
        let calls = Arc::new(AtomicU32::new(0));
        let pages = fetch_pages(0, scripted(vec![vec![1], vec![2]], calls.clone()));
        let items: Vec<u32> = flatten_short_pages(0, pages).try_collect().await.expect("items");
        assert_eq!(items, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn abandoned_collection_does_not_read_ahead() {
        let calls = Arc::new(AtomicU32::new(0));
        let pages = fetch_pages(2, scripted(vec![vec![1, 2], vec![3, 4], vec![5]], calls.clone()));
        let first_two: Vec<u32> = flatten_short_pages(2, pages)
            .take(2)
            .try_collect()
            .await
            .expect("items");
        assert_eq!(first_two, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "second page must not be fetched");
    }

    #[tokio::test]
    async fn nothing_is_fetched_until_polled() {
        let calls = Arc::new(AtomicU32::new(0));
        let pages = fetch_pages(2, scripted(vec![vec![1]], calls.clone()));
        let _items = flatten_short_pages(2, pages);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    struct Counted {
        total: u64,
        items: Vec<u32>,
    }

    impl CountedPage for Counted {
        type Item = u32;

        fn total_count(&self) -> u64 {
            self.total
        }

        fn into_items(self) -> Vec<u32> {
            self.items
        }
    }

    #[tokio::test]
    async fn counted_pages_stop_at_declared_total() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let pages = fetch_pages(2, move |page, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            let items = match page {
                1 => vec![1, 2],
                2 => vec![3, 4],
                _ => vec![99],
            };
            futures::future::ready(Ok(Counted { total: 4, items }))
        });
        let items: Vec<u32> = flatten_counted_pages(pages).try_collect().await.expect("items");
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn counted_pages_stop_on_empty_page() {
        let pages = fetch_pages(2, |page, _| {
            let items = if page == 1 { vec![1, 2] } else { vec![] };
            futures::future::ready(Ok(Counted { total: 10, items }))
        });
        let items: Vec<u32> = flatten_counted_pages(pages).try_collect().await.expect("items");
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn counted_pages_with_zero_total() {
        let pages = fetch_pages(2, |_, _| {
            futures::future::ready(Ok(Counted { total: 0, items: vec![] }))
        });
        let items: Vec<u32> = flatten_counted_pages(pages).try_collect().await.expect("items");
        assert!(items.is_empty());
    }
}
