use reqwest::multipart::Form;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::services::SessionStore;

/// 单次请求的参数描述
///
/// method、路径、查询参数、JSON 体或 multipart 表单、
/// 额外请求头、是否携带认证，全部走同一条发送路径。
pub struct RequestSpec {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    json: Option<Value>,
    form: Option<Form>,
    headers: Vec<(String, String)>,
    authenticated: bool,
}

impl RequestSpec {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            json: None,
            form: None,
            headers: Vec::new(),
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// 标记为无需认证的调用（登录/注册等）
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// 远端数据访问包装器
///
/// 唯一的 HTTP 入口：从会话存储取 bearer token，
/// 集中拦截 401（强制登出）和 5xx（通用消息）。
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send(&self, spec: RequestSpec) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self.http.request(spec.method, &url);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if spec.authenticated {
            if let Some(token) = self.session.token() {
                request = request.bearer_auth(token);
            }
        }
        for (key, value) in &spec.headers {
            request = request.header(key, value);
        }
        if let Some(body) = &spec.json {
            request = request.json(body);
        }
        if let Some(form) = spec.form {
            request = request.multipart(form);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        self.intercept(response)
    }

    /// 发送并解析 JSON 响应体
    pub async fn send_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> ApiResult<T> {
        let response = self.send(spec).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 发送并丢弃响应体
    pub async fn send_unit(&self, spec: RequestSpec) -> ApiResult<()> {
        self.send(spec).await.map(|_| ())
    }

    /// 全局状态码拦截：401 清会话、5xx 给通用消息
    fn intercept(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        match status.as_u16() {
            401 => {
                tracing::warn!("Received 401, clearing stored session");
                self.session.clear();
                Err(ApiError::Unauthorized(
                    "Session expired, please sign in again".to_string(),
                ))
            }
            403 => Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            )),
            404 => Err(ApiError::NotFound(
                "The requested resource does not exist".to_string(),
            )),
            500..=599 => {
                tracing::error!("Server error: status {}", status);
                Err(ApiError::Server(
                    "Something went wrong, please try again later".to_string(),
                ))
            }
            code if !status.is_success() => Err(ApiError::Http(code)),
            _ => Ok(response),
        }
    }
}
