use async_trait::async_trait;
use moka::future::Cache;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use crate::api::client::{ApiClient, RequestSpec};
use crate::api::error::{ApiError, ApiResult};
use crate::controller::query::CatalogQuery;
use crate::models::{ImageAttachment, Movie, MovieForm, MovieListResponse};

/// 目录查询接口
///
/// 浏览控制器只依赖这个接口，测试里用内存实现替换。
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// 按 (分类, 搜索词, 页码) 三元组查询列表
    async fn list_movies(&self, query: &CatalogQuery) -> ApiResult<MovieListResponse>;
    async fn get_movie(&self, id: i64) -> ApiResult<Movie>;
    async fn delete_movie(&self, id: i64) -> ApiResult<()>;
}

/// 详情缓存容量
const DETAIL_CACHE_CAPACITY: u64 = 256;
/// 详情缓存存活时间
const DETAIL_CACHE_TTL: Duration = Duration::from_secs(300);

/// 电影目录的远端服务
pub struct MovieService {
    client: ApiClient,
    detail_cache: Cache<i64, Movie>,
}

impl MovieService {
    pub fn new(client: ApiClient) -> Self {
        let detail_cache = Cache::builder()
            .max_capacity(DETAIL_CACHE_CAPACITY)
            .time_to_live(DETAIL_CACHE_TTL)
            .build();
        Self {
            client,
            detail_cache,
        }
    }

    /// 创建条目（主管角色专用，multipart 表单带图片附件）
    pub async fn create_movie(&self, form: &MovieForm) -> ApiResult<Movie> {
        let form = build_multipart(form)?;
        self.client
            .send_json(RequestSpec::post("/api/movies").multipart(form))
            .await
    }

    /// 更新条目（主管角色专用）
    pub async fn update_movie(&self, id: i64, form: &MovieForm) -> ApiResult<Movie> {
        let form = build_multipart(form)?;
        let movie: Movie = self
            .client
            .send_json(RequestSpec::put(format!("/api/movies/{}", id)).multipart(form))
            .await?;
        // 本地缓存的旧详情作废
        self.detail_cache.invalidate(&id).await;
        Ok(movie)
    }
}

#[async_trait]
impl CatalogApi for MovieService {
    async fn list_movies(&self, query: &CatalogQuery) -> ApiResult<MovieListResponse> {
        let mut spec = RequestSpec::get("/api/movies").query("page", query.page.to_string());
        if !query.genre.is_all() {
            spec = spec.query("genre", query.genre.as_str());
        }
        let search = query.search.trim();
        if !search.is_empty() {
            spec = spec.query("title", search);
        }
        self.client.send_json(spec).await
    }

    async fn get_movie(&self, id: i64) -> ApiResult<Movie> {
        if let Some(movie) = self.detail_cache.get(&id).await {
            return Ok(movie);
        }
        let movie: Movie = self
            .client
            .send_json(RequestSpec::get(format!("/api/movies/{}", id)))
            .await?;
        self.detail_cache.insert(id, movie.clone()).await;
        Ok(movie)
    }

    async fn delete_movie(&self, id: i64) -> ApiResult<()> {
        self.client
            .send_unit(RequestSpec::delete(format!("/api/movies/{}", id)))
            .await?;
        self.detail_cache.invalidate(&id).await;
        Ok(())
    }
}

/// 把表单载荷装配成 multipart 请求体
fn build_multipart(form: &MovieForm) -> ApiResult<Form> {
    let mut body = Form::new()
        .text("title", form.title.clone())
        .text("genre", form.genre.clone())
        .text("premium", form.premium.to_string());

    if let Some(year) = form.year {
        body = body.text("year", year.to_string());
    }
    if let Some(rating) = form.rating {
        body = body.text("rating", rating.to_string());
    }
    if let Some(duration) = form.duration {
        body = body.text("duration", duration.to_string());
    }
    if let Some(ref director) = form.director {
        body = body.text("director", director.clone());
    }
    if let Some(ref description) = form.description {
        body = body.text("description", description.clone());
    }
    if let Some(ref lead_actor) = form.lead_actor {
        body = body.text("lead_actor", lead_actor.clone());
    }
    if let Some(ref platform) = form.platform {
        body = body.text("platform", platform.clone());
    }
    if let Some(ref poster) = form.poster {
        body = body.part("poster", image_part(poster)?);
    }
    if let Some(ref banner) = form.banner {
        body = body.part("banner", image_part(banner)?);
    }
    Ok(body)
}

fn image_part(attachment: &ImageAttachment) -> ApiResult<Part> {
    Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.mime_type)
        .map_err(|e| ApiError::Decode(format!("invalid attachment mime type: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let attachment = ImageAttachment {
            file_name: "poster.png".to_string(),
            mime_type: "not a mime".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert!(image_part(&attachment).is_err());
    }

    #[test]
    fn test_multipart_accepts_image_mime() {
        let attachment = ImageAttachment {
            file_name: "poster.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert!(image_part(&attachment).is_ok());
    }
}
