use std::str::FromStr;
use url::Url;

use crate::models::Genre;

/// 查询状态三元组：(分类, 搜索词, 页码)
///
/// 这是决定后端查询的唯一事实来源，并与浏览器地址栏保持一致，
/// 前进/后退和刷新都能复现同一视图。URL 只承载 `page` 和 `genre`，
/// 搜索词不进地址栏。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub genre: Genre,
    pub search: String,
    pub page: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            genre: Genre::All,
            search: String::new(),
            page: 1,
        }
    }
}

impl CatalogQuery {
    /// 序列化为 URL 查询参数对；`genre=all` 时省略 genre
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if !self.genre.is_all() {
            pairs.push(("genre", self.genre.as_str().to_string()));
        }
        pairs
    }

    /// 地址栏查询串，例如 "page=2&genre=Action"
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// 从查询参数对恢复状态
    ///
    /// 非法页码回落为 1，未知分类回落为 all：
    /// 分享出去的链接宁可降级也要能打开。
    pub fn from_query_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key {
                "page" => {
                    query.page = value.parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1);
                }
                "genre" => {
                    query.genre = Genre::from_str(value).unwrap_or(Genre::All);
                }
                _ => {}
            }
        }
        query
    }

    /// 从查询串恢复状态，允许带前导 '?'
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.trim_start_matches('?');
        let pairs: Vec<(String, String)> = raw
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| {
                let mut parts = p.splitn(2, '=');
                let key = parts.next().unwrap_or("").to_string();
                let value = parts.next().unwrap_or("");
                let value = urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_default();
                (key, value)
            })
            .collect();
        Self::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// 从完整 URL 恢复状态
    pub fn from_url(url: &Url) -> Self {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GENRES;
    use proptest::prelude::*;

    #[test]
    fn test_default_query() {
        let q = CatalogQuery::default();
        assert_eq!(q.genre, Genre::All);
        assert_eq!(q.page, 1);
        assert!(q.search.is_empty());
    }

    #[test]
    fn test_query_string_omits_all_genre() {
        let q = CatalogQuery::default();
        assert_eq!(q.to_query_string(), "page=1");
    }

    #[test]
    fn test_query_string_includes_genre() {
        let q = CatalogQuery {
            genre: Genre::Action,
            search: String::new(),
            page: 2,
        };
        assert_eq!(q.to_query_string(), "page=2&genre=Action");
    }

    #[test]
    fn test_reload_round_trip() {
        // 刷新带 ?page=2&genre=Action 的页面必须复现同一状态
        let q = CatalogQuery::from_query_string("?page=2&genre=Action");
        assert_eq!(q.page, 2);
        assert_eq!(q.genre, Genre::Action);
    }

    #[test]
    fn test_invalid_page_falls_back_to_one() {
        assert_eq!(CatalogQuery::from_query_string("page=0").page, 1);
        assert_eq!(CatalogQuery::from_query_string("page=abc").page, 1);
        assert_eq!(CatalogQuery::from_query_string("page=-3").page, 1);
    }

    #[test]
    fn test_unknown_genre_falls_back_to_all() {
        let q = CatalogQuery::from_query_string("page=1&genre=western-noir");
        assert_eq!(q.genre, Genre::All);
    }

    #[test]
    fn test_genre_parse_is_case_insensitive() {
        let q = CatalogQuery::from_query_string("genre=action");
        assert_eq!(q.genre, Genre::Action);
    }

    #[test]
    fn test_unrelated_params_ignored() {
        let q = CatalogQuery::from_query_string("page=3&utm_source=mail&genre=Drama");
        assert_eq!(q.page, 3);
        assert_eq!(q.genre, Genre::Drama);
    }

    #[test]
    fn test_from_url() {
        let url = Url::parse("https://example.com/movies?page=2&genre=Sci-Fi").unwrap();
        let q = CatalogQuery::from_url(&url);
        assert_eq!(q.page, 2);
        assert_eq!(q.genre, Genre::SciFi);
    }

    proptest! {
        #[test]
        fn prop_query_string_round_trips(genre_idx in 0usize..GENRES.len(), page in 1u32..10_000) {
            let original = CatalogQuery {
                genre: GENRES[genre_idx],
                search: String::new(),
                page,
            };
            let restored = CatalogQuery::from_query_string(&original.to_query_string());
            prop_assert_eq!(restored, original);
        }
    }
}
