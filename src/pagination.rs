//! Cursor pagination over `{ <collection>: [...], next: "<cursor>" }` pages.
//!
//! The listing endpoints return one page of items plus an opaque `next`
//! cursor. [`get_all`] follows the cursor, sending it back as the `start`
//! query parameter, until a page comes back without one, and returns every
//! item in page order. [`get_all_map`] does the same for endpoints whose
//! collection is an object keyed by identifier; later pages win on duplicate
//! keys.
//!
//! Pages are fetched strictly one after another, since the cursor for page
//! `n + 1` is only known once page `n` has arrived. A transport error on any
//! page aborts the whole fetch and the items gathered so far are dropped.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::transport::{HttpTransport, Request};

/// Query parameter carrying the cursor back to the server.
pub const CURSOR_PARAM: &str = "start";

/// Response field holding the cursor of the next page.
pub const CURSOR_FIELD: &str = "next";

/// Bounds applied to a multi-page fetch.
///
/// Cursor cycles are always rejected: a cursor that was already followed
/// during the same fetch fails with [`Error::CursorCycle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLimits {
    /// Maximum number of requests to issue. `None` follows the cursor for as
    /// long as the server hands one out.
    pub max_pages: Option<usize>,
}

impl PageLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Issue at most `max_pages` requests; one more page fails with
    /// [`Error::PageLimitExceeded`]. `0` allows no request at all, so every
    /// fetch fails before touching the network.
    pub fn max_pages(max_pages: usize) -> Self {
        Self {
            max_pages: Some(max_pages),
        }
    }
}

/// A single page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Pass back as `start` to get the next page. `None` on the last page.
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// `true` if there is a further page to fetch.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a page whose items live under `field`.
    pub fn from_value(body: &Value, field: &str) -> Result<Self> {
        Ok(Self {
            items: read_items(body, field)?,
            next: read_cursor(body)?,
        })
    }
}

/// A single page of a listing keyed by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPage<T> {
    pub items: HashMap<String, T>,
    /// Pass back as `start` to get the next page. `None` on the last page.
    pub next: Option<String>,
}

impl<T> MapPage<T> {
    /// `true` if there is a further page to fetch.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

impl<T: DeserializeOwned> MapPage<T> {
    /// Decode a page whose items live in the object under `field`.
    pub fn from_value(body: &Value, field: &str) -> Result<Self> {
        Ok(Self {
            items: read_keyed_items(body, field)?,
            next: read_cursor(body)?,
        })
    }
}

/// Fetch every item of the array collection `field`, across all pages.
///
/// `request` is the first page request, with the caller's filters already in
/// its query. It must not carry `start` itself.
pub async fn get_all<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    request: Request,
    field: &str,
    limits: PageLimits,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    walk(transport, request, limits, |body| {
        let page: Vec<T> = read_items(body, field)?;
        let count = page.len();
        items.extend(page);
        Ok(count)
    })
    .await?;
    Ok(items)
}

/// Fetch every entry of the object collection `field`, across all pages.
///
/// Entries are keyed by the server-provided key. When two pages carry the
/// same key, the value from the later page is kept.
pub async fn get_all_map<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    request: Request,
    field: &str,
    limits: PageLimits,
) -> Result<HashMap<String, T>> {
    let mut items = HashMap::new();
    walk(transport, request, limits, |body| {
        let page: HashMap<String, T> = read_keyed_items(body, field)?;
        let count = page.len();
        items.extend(page);
        Ok(count)
    })
    .await?;
    Ok(items)
}

async fn walk<F>(
    transport: &dyn HttpTransport,
    mut request: Request,
    limits: PageLimits,
    mut on_page: F,
) -> Result<()>
where
    F: FnMut(&Value) -> Result<usize>,
{
    request.query.get_or_insert_with(BTreeMap::new);

    let mut followed: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        if let Some(max_pages) = limits.max_pages {
            if pages >= max_pages {
                return Err(Error::PageLimitExceeded {
                    path: request.path.clone(),
                    max_pages,
                });
            }
        }

        let body = transport.send(&request).await?;
        pages += 1;

        let count = on_page(&body)?;
        let next = read_cursor(&body)?;
        debug!(
            path = %request.path,
            page = pages,
            items = count,
            has_next = next.is_some(),
            "fetched page"
        );

        let Some(cursor) = next else {
            return Ok(());
        };

        if !followed.insert(cursor.clone()) {
            return Err(Error::CursorCycle {
                path: request.path.clone(),
                cursor,
            });
        }

        request
            .query
            .get_or_insert_with(BTreeMap::new)
            .insert(CURSOR_PARAM.to_string(), cursor);
    }
}

/// Items of the array under `field`. Absent or `null` means no items.
fn read_items<T: DeserializeOwned>(body: &Value, field: &str) -> Result<Vec<T>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Vec::<T>::deserialize(value).map_err(|e| Error::decode(field, e)),
    }
}

/// Entries of the object under `field`. Absent or `null` means no entries.
fn read_keyed_items<T: DeserializeOwned>(body: &Value, field: &str) -> Result<HashMap<String, T>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(HashMap::new()),
        Some(value) => {
            HashMap::<String, T>::deserialize(value).map_err(|e| Error::decode(field, e))
        }
    }
}

/// The cursor of the next page; empty, `null` and absent all mean "last page".
fn read_cursor(body: &Value) -> Result<Option<String>> {
    let cursor = match body.get(CURSOR_FIELD) {
        None => None,
        Some(value) => {
            Option::<String>::deserialize(value).map_err(|e| Error::decode(CURSOR_FIELD, e))?
        }
    };
    Ok(cursor.filter(|c| !c.is_empty()))
}
