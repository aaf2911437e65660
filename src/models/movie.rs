use serde::{Deserialize, Serialize};

/// 每页的默认条目数（后端未返回 per_page 时使用）
pub const DEFAULT_PER_PAGE: u32 = 10;

/// 电影/剧集记录
///
/// 由远端后端创建和持有，客户端只保存只读投影；
/// id 由后端分配，客户端绝不自行生成或回收。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    /// 逗号连接的分类标签字符串，例如 "Action,Thriller"
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: Option<i32>,
    /// 评分，0.0 - 10.0
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub director: Option<String>,
    /// 时长（分钟），展示时转换为 "Hh Mm" 文本
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    /// 会员专享标记，限制未订阅用户访问
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub lead_actor: Option<String>,
    /// 流媒体平台标签，例如 "Netflix"
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

impl Movie {
    /// 拆分逗号连接的分类字符串
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .split(',')
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .collect()
    }

    /// 时长的展示文本，例如 135 分钟 -> "2h 15m"
    pub fn duration_text(&self) -> String {
        match self.duration {
            Some(minutes) => {
                let hours = minutes / 60;
                let rest = minutes % 60;
                if hours > 0 {
                    format!("{}h {}m", hours, rest)
                } else {
                    format!("{}m", rest)
                }
            }
            None => String::new(),
        }
    }
}

/// 分页描述符
///
/// 每次列表查询由后端返回；本地仅在乐观删除后临时预测数值，
/// 下一次服务端往返会重新确认。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default = "default_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Pagination {
    /// 响应缺失分页块时的确定性兜底：
    /// 当前页 = 请求页，总页数 = 1，总数 = 返回条目数
    pub fn fallback(requested_page: u32, returned_len: usize) -> Self {
        Self {
            current_page: requested_page.max(1),
            total_pages: 1,
            total_count: returned_len as u64,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// 按当前 total_count 和 per_page 重算总页数（至少 1 页）
    pub fn recompute_total_pages(&mut self) {
        let per_page = self.per_page.max(1) as u64;
        self.total_pages = (self.total_count.div_ceil(per_page)).max(1) as u32;
    }
}

/// 列表查询的响应信封：`{ movies: [...], pagination: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieListResponse {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl MovieListResponse {
    /// 取出分页信息，缺失时按请求页做确定性兜底
    pub fn resolve_pagination(&self, requested_page: u32) -> Pagination {
        match &self.pagination {
            Some(p) => p.clone(),
            None => Pagination::fallback(requested_page, self.movies.len()),
        }
    }
}

/// 创建/更新条目的表单载荷（主管角色专用）
///
/// 实际请求为 multipart 表单，图片以附件形式上传。
#[derive(Debug, Clone, Default)]
pub struct MovieForm {
    pub title: String,
    pub genre: String,
    pub year: Option<i32>,
    pub rating: Option<f32>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub description: Option<String>,
    pub premium: bool,
    pub lead_actor: Option<String>,
    pub platform: Option<String>,
    pub poster: Option<ImageAttachment>,
    pub banner: Option<ImageAttachment>,
}

/// multipart 表单中的图片附件
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_movie() -> Movie {
        Movie {
            id: 7,
            title: "Test Movie".to_string(),
            genre: "Action, Thriller".to_string(),
            year: Some(2023),
            rating: Some(7.5),
            director: Some("Someone".to_string()),
            duration: Some(135),
            description: None,
            premium: false,
            lead_actor: None,
            platform: Some("Netflix".to_string()),
            poster_url: None,
            banner_url: None,
        }
    }

    #[test]
    fn test_genres_split_and_trim() {
        let movie = sample_movie();
        assert_eq!(movie.genres(), vec!["Action", "Thriller"]);
    }

    #[test]
    fn test_genres_empty_string() {
        let mut movie = sample_movie();
        movie.genre = String::new();
        assert!(movie.genres().is_empty());
    }

    #[test]
    fn test_duration_text_formats() {
        let mut movie = sample_movie();
        assert_eq!(movie.duration_text(), "2h 15m");

        movie.duration = Some(45);
        assert_eq!(movie.duration_text(), "45m");

        movie.duration = Some(120);
        assert_eq!(movie.duration_text(), "2h 0m");

        movie.duration = None;
        assert_eq!(movie.duration_text(), "");
    }

    #[test]
    fn test_pagination_fallback_is_deterministic() {
        let p = Pagination::fallback(3, 4);
        assert_eq!(p.current_page, 3);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.total_count, 4);
        assert_eq!(p.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_pagination_fallback_clamps_page() {
        let p = Pagination::fallback(0, 0);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn test_list_response_without_pagination_block() {
        // 响应缺失 pagination 块时必须有确定性默认值
        let json = r#"{"movies": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]}"#;
        let resp: MovieListResponse = serde_json::from_str(json).unwrap();
        let p = resp.resolve_pagination(2);
        assert_eq!(p.current_page, 2);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.total_count, 2);
    }

    #[test]
    fn test_list_response_with_pagination_block() {
        let json = r#"{
            "movies": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}],
            "pagination": {"current_page": 1, "total_pages": 2, "total_count": 15, "per_page": 10}
        }"#;
        let resp: MovieListResponse = serde_json::from_str(json).unwrap();
        let p = resp.resolve_pagination(1);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.total_count, 15);
    }

    #[test]
    fn test_recompute_total_pages() {
        let mut p = Pagination {
            current_page: 1,
            total_pages: 2,
            total_count: 11,
            per_page: 10,
        };
        p.recompute_total_pages();
        assert_eq!(p.total_pages, 2);

        p.total_count = 10;
        p.recompute_total_pages();
        assert_eq!(p.total_pages, 1);

        p.total_count = 0;
        p.recompute_total_pages();
        assert_eq!(p.total_pages, 1);
    }

    proptest! {
        #[test]
        fn prop_recompute_total_pages_covers_count(count in 0u64..10_000, per_page in 1u32..100) {
            let mut p = Pagination {
                current_page: 1,
                total_pages: 1,
                total_count: count,
                per_page,
            };
            p.recompute_total_pages();
            // 页数必须足以容纳全部条目，且至少 1 页
            prop_assert!(p.total_pages >= 1);
            prop_assert!(u64::from(p.total_pages) * u64::from(per_page) >= count);
            if count > 0 {
                prop_assert!(u64::from(p.total_pages - 1) * u64::from(per_page) < count);
            }
        }
    }
}
