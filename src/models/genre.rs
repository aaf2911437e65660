use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 目录的规范分类枚举
///
/// 旧版的两个浏览视图使用了不一致的分类集合和大小写，
/// 这里统一为单一集合、单一输出格式，解析时不区分大小写。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Genre {
    #[default]
    All,
    Action,
    Comedy,
    Drama,
    Horror,
    Romance,
    SciFi,
    Thriller,
    Animation,
    Documentary,
}

/// 完整的分类列表（用于渲染筛选控件）
pub const GENRES: [Genre; 10] = [
    Genre::All,
    Genre::Action,
    Genre::Comedy,
    Genre::Drama,
    Genre::Horror,
    Genre::Romance,
    Genre::SciFi,
    Genre::Thriller,
    Genre::Animation,
    Genre::Documentary,
];

lazy_static! {
    /// 不区分大小写的解析表，兼容旧 URL 中出现过的别名写法
    static ref GENRE_LOOKUP: HashMap<String, Genre> = {
        let mut m = HashMap::new();
        for genre in GENRES {
            m.insert(genre.as_str().to_lowercase(), genre);
        }
        // 旧视图中观察到的别名
        m.insert("scifi".to_string(), Genre::SciFi);
        m.insert("sci_fi".to_string(), Genre::SciFi);
        m
    };
}

impl Genre {
    /// 规范的分类标识（URL 查询参数和后端筛选参数均使用此格式）
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::All => "all",
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::Animation => "Animation",
            Genre::Documentary => "Documentary",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Genre::All)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        GENRE_LOOKUP
            .get(&normalized)
            .copied()
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

/// 无法识别的分类标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGenre(pub String);

impl fmt::Display for UnknownGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown genre: {}", self.0)
    }
}

impl std::error::Error for UnknownGenre {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("action".parse::<Genre>().unwrap(), Genre::Action);
        assert_eq!("ACTION".parse::<Genre>().unwrap(), Genre::Action);
        assert_eq!("Sci-Fi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!("sci-fi".parse::<Genre>().unwrap(), Genre::SciFi);
    }

    #[test]
    fn test_legacy_aliases_parse() {
        // 旧视图用过不带连字符的写法
        assert_eq!("scifi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!("sci_fi".parse::<Genre>().unwrap(), Genre::SciFi);
    }

    #[test]
    fn test_unknown_genre_is_error() {
        assert!("western-noir".parse::<Genre>().is_err());
        assert!("".parse::<Genre>().is_err());
    }

    #[test]
    fn test_canonical_round_trip() {
        for genre in GENRES {
            assert_eq!(genre.as_str().parse::<Genre>().unwrap(), genre);
        }
    }
}
