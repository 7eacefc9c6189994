//! 请求上下文与触发器检测
//!
//! 拦截器不读取任何全局状态：当前请求由宿主以 [`RequestContext`] 传入，
//! 环境变量通过 [`Environment`] 查询，测试时可替换为内存实现。

use std::collections::{HashMap, HashSet};

/// 宿主 Web 层提供的当前请求信息
pub trait RequestContext: Send + Sync {
    /// HTTP 方法
    fn method(&self) -> &str;
    /// 请求 URI（含查询串）
    fn uri(&self) -> &str;
    /// 是否携带指定请求头（名称不区分大小写）
    fn has_header(&self, name: &str) -> bool;
    /// 是否携带指定请求参数
    fn has_param(&self, name: &str) -> bool;
    /// 是否携带指定 Cookie
    fn has_cookie(&self, name: &str) -> bool;
}

/// 环境变量查询
pub trait Environment: Send + Sync {
    fn has_var(&self, name: &str) -> bool;
}

/// 读取进程环境变量
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn has_var(&self, name: &str) -> bool {
        !name.is_empty() && std::env::var_os(name).is_some()
    }
}

impl Environment for HashMap<String, String> {
    fn has_var(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

/// 触发器是否出现在环境变量、请求头、请求参数或 Cookie 中
///
/// 只判断是否存在，不关心取值。没有活动请求时只检查环境变量。
pub fn request_has_trigger(
    trigger: &str,
    env: &dyn Environment,
    request: Option<&dyn RequestContext>,
) -> bool {
    if env.has_var(trigger) {
        return true;
    }
    request.is_some_and(|req| {
        req.has_header(trigger) || req.has_param(trigger) || req.has_cookie(trigger)
    })
}

/// 简单的请求上下文实现
#[derive(Debug, Default, Clone)]
pub struct HttpRequest {
    method: String,
    uri: String,
    headers: HashSet<String>,
    params: HashSet<String>,
    cookies: HashSet<String>,
}

impl HttpRequest {
    pub fn new<M: Into<String>, U: Into<String>>(method: M, uri: U) -> Self {
        let uri = uri.into();
        let params = query_param_names(&uri);
        Self { method: method.into(), uri, params, ..Self::default() }
    }

    /// 添加请求头
    pub fn header<S: AsRef<str>>(mut self, name: S) -> Self {
        self.headers.insert(name.as_ref().to_ascii_lowercase());
        self
    }

    /// 添加请求参数（例如表单字段）
    pub fn param<S: Into<String>>(mut self, name: S) -> Self {
        self.params.insert(name.into());
        self
    }

    /// 添加 Cookie
    pub fn cookie<S: Into<String>>(mut self, name: S) -> Self {
        self.cookies.insert(name.into());
        self
    }
}

impl RequestContext for HttpRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.contains(&name.to_ascii_lowercase())
    }

    fn has_param(&self, name: &str) -> bool {
        self.params.contains(name)
    }

    fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains(name)
    }
}

/// 从 URI 查询串中取出参数名
fn query_param_names(uri: &str) -> HashSet<String> {
    let Some((_, query)) = uri.split_once('?') else {
        return HashSet::new();
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| {
            let name = pair.split('=').next().unwrap_or_default();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_from_uri() {
        let req = HttpRequest::new("GET", "/users?page=2&debug&=x#top");
        assert!(req.has_param("page"));
        assert!(req.has_param("debug"));
        assert!(!req.has_param("top"));
        assert!(!req.has_param(""));
    }

    #[test]
    fn test_header_case_insensitive() {
        let req = HttpRequest::new("GET", "/").header("X-Debug");
        assert!(req.has_header("x-debug"));
        assert!(req.has_header("X-DEBUG"));
    }

    #[test]
    fn test_trigger_sources() {
        let env: HashMap<String, String> = HashMap::new();
        let plain = HttpRequest::new("GET", "/");
        assert!(!request_has_trigger("X-Debug", &env, Some(&plain)));
        assert!(!request_has_trigger("X-Debug", &env, None));

        let by_header = HttpRequest::new("GET", "/").header("X-Debug");
        assert!(request_has_trigger("X-Debug", &env, Some(&by_header)));

        let by_param = HttpRequest::new("GET", "/?X-Debug=0");
        assert!(request_has_trigger("X-Debug", &env, Some(&by_param)));

        let by_cookie = HttpRequest::new("POST", "/").cookie("X-Debug");
        assert!(request_has_trigger("X-Debug", &env, Some(&by_cookie)));

        let mut env = HashMap::new();
        env.insert("X-Debug".to_string(), String::new());
        assert!(request_has_trigger("X-Debug", &env, None));
    }
}
