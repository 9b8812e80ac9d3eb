//! 寻宝码识别服务 - 业务能力层
//!
//! 只负责"识别"能力：判断一段解码文本是否指向寻宝服务，
//! 并给出可直接拉取的 URL。不发起任何网络请求。

use phf::phf_set;
use regex::Regex;
use tracing::debug;

/// 内置的寻宝服务域名片段
static KNOWN_HOST_TOKENS: phf::Set<&'static str> = phf_set! {
    "mock.pstmn.io",
    "pstmn.io",
};

/// 完整 URL 的形状
const URL_PATTERN: &str = r"^https?://\S+$";

/// 寻宝码识别服务
pub struct CodeRecognizer {
    /// 部署环境额外认可的一个域名片段
    extra_host_token: String,
}

impl CodeRecognizer {
    /// 创建新的识别服务
    ///
    /// # 参数
    /// - `extra_host_token`: 除内置列表外额外识别的域名片段
    pub fn new(extra_host_token: impl Into<String>) -> Self {
        Self {
            extra_host_token: extra_host_token.into(),
        }
    }

    /// 判断解码文本是否是可识别的寻宝码
    ///
    /// 识别条件：包含 `http`，或是一个形状完整的 URL，
    /// 或包含任何已知的寻宝服务域名片段。
    pub fn is_recognized(&self, payload: &str) -> bool {
        let payload = payload.trim();
        if payload.is_empty() {
            return false;
        }

        if payload.contains("http") {
            return true;
        }

        if let Ok(re) = Regex::new(URL_PATTERN) {
            if re.is_match(payload) {
                return true;
            }
        }

        self.contains_known_host(payload)
    }

    /// 把识别出的寻宝码归一化成可拉取的 URL
    ///
    /// # 返回
    /// 无法识别时返回 `None`；裸域名片段会补上 `https://` 前缀
    pub fn fetch_url(&self, payload: &str) -> Option<String> {
        let payload = payload.trim();
        if !self.is_recognized(payload) {
            return None;
        }

        if payload.starts_with("http://") || payload.starts_with("https://") {
            return Some(payload.to_string());
        }

        debug!("寻宝码缺少协议前缀，补全为 https: {}", payload);
        Some(format!("https://{}", payload))
    }

    fn contains_known_host(&self, payload: &str) -> bool {
        if !self.extra_host_token.is_empty() && payload.contains(&self.extra_host_token) {
            return true;
        }
        KNOWN_HOST_TOKENS.iter().any(|token| payload.contains(*token))
    }
}
