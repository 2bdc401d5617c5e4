//! Limit/offset pagination for list endpoints.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;

const LIMIT_PARAM: &str = "limit";
const OFFSET_PARAM: &str = "offset";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// One window over an ordered list, plus the links to its neighbours.
pub struct Window<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub items: Vec<T>,
}

impl<T> Window<T> {
    /// Render the window's items into a page.
    pub fn map<U, E>(self, f: impl FnMut(&T) -> Result<U, E>) -> Result<Page<U>, E> {
        let results = self.items.iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results,
        })
    }
}

/// Cut `items` down to the requested window.
///
/// `collection_url` and `raw_query` rebuild the neighbour links; any
/// filter parameters in the query are carried over. An offset past the
/// end is clamped to the item count.
pub fn paginate<T>(
    items: Vec<T>,
    query: &PageQuery,
    config: &Config,
    collection_url: &str,
    raw_query: Option<&str>,
) -> anyhow::Result<Window<T>> {
    let count = items.len();
    let limit = query
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(config.page_size)
        .min(config.max_page_size);
    let offset = query.offset.unwrap_or(0).min(count);

    let base = Url::parse(collection_url)
        .with_context(|| format!("Invalid collection url '{}'", collection_url))?;
    let filters: Vec<(String, String)> =
        url::form_urlencoded::parse(raw_query.unwrap_or("").as_bytes())
            .filter(|(key, _)| key != LIMIT_PARAM && key != OFFSET_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
    let link = |offset: usize| {
        let mut page_url = base.clone();
        {
            let mut pairs = page_url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &filters {
                pairs.append_pair(key, value);
            }
            pairs.append_pair(LIMIT_PARAM, &limit.to_string());
            if offset > 0 {
                pairs.append_pair(OFFSET_PARAM, &offset.to_string());
            }
        }
        page_url.to_string()
    };

    let end = offset + limit;
    let next = (end < count).then(|| link(end));
    let previous = (offset > 0).then(|| link(offset.saturating_sub(limit)));
    let items = items.into_iter().skip(offset).take(limit).collect();

    Ok(Window {
        count,
        next,
        previous,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::from_env();
        config.page_size = 4;
        config.max_page_size = 100;
        config
    }

    #[test]
    fn first_page_links_forward_only() {
        let window = paginate(
            (1..=10).collect::<Vec<i32>>(),
            &PageQuery::default(),
            &config(),
            "http://t/drones",
            None,
        )
        .unwrap();
        assert_eq!(window.count, 10);
        assert_eq!(window.items, vec![1, 2, 3, 4]);
        assert_eq!(window.next.as_deref(), Some("http://t/drones?limit=4&offset=4"));
        assert_eq!(window.previous, None);
    }

    #[test]
    fn middle_page_keeps_filters() {
        let query = PageQuery {
            limit: Some(3),
            offset: Some(3),
        };
        let window = paginate(
            (1..=10).collect::<Vec<i32>>(),
            &query,
            &config(),
            "http://t/competitions",
            Some("drone_name=Atom&limit=3&offset=3"),
        )
        .unwrap();
        assert_eq!(window.items, vec![4, 5, 6]);
        assert_eq!(
            window.next.as_deref(),
            Some("http://t/competitions?drone_name=Atom&limit=3&offset=6")
        );
        assert_eq!(
            window.previous.as_deref(),
            Some("http://t/competitions?drone_name=Atom&limit=3")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let query = PageQuery {
            limit: Some(5),
            offset: Some(5),
        };
        let window = paginate((1..=10).collect::<Vec<i32>>(), &query, &config(), "http://t/u", None)
            .unwrap();
        assert_eq!(window.items.len(), 5);
        assert!(window.next.is_none());
    }

    #[test]
    fn limit_is_capped() {
        let query = PageQuery {
            limit: Some(1000),
            offset: None,
        };
        let window = paginate((0..500).collect::<Vec<i32>>(), &query, &config(), "http://t/u", None)
            .unwrap();
        assert_eq!(window.items.len(), 100);
    }

    #[test]
    fn offset_past_the_end_is_clamped() {
        let query = PageQuery {
            limit: Some(4),
            offset: Some(usize::MAX),
        };
        let window = paginate(
            (1..=10).collect::<Vec<i32>>(),
            &query,
            &config(),
            "http://t/drones",
            None,
        )
        .unwrap();
        assert!(window.items.is_empty());
        assert!(window.next.is_none());
        assert_eq!(
            window.previous.as_deref(),
            Some("http://t/drones?limit=4&offset=6")
        );
    }

    #[test]
    fn bare_paging_keys_are_dropped_and_filters_reencoded() {
        let query = PageQuery {
            limit: None,
            offset: Some(4),
        };
        let window = paginate(
            (1..=10).collect::<Vec<i32>>(),
            &query,
            &config(),
            "http://t/competitions",
            Some("limit&offset=4&drone_name=Octo%20King"),
        )
        .unwrap();
        assert_eq!(
            window.next.as_deref(),
            Some("http://t/competitions?drone_name=Octo+King&limit=4&offset=8")
        );
        assert_eq!(
            window.previous.as_deref(),
            Some("http://t/competitions?drone_name=Octo+King&limit=4")
        );
    }
}
