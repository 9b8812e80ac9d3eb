/// 寻宝服务 API 客户端
///
/// 封装所有与寻宝服务相关的 HTTP 调用逻辑
use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::clients::QuestionFetcher;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::question::QuestionPayload;

/// 寻宝服务 API 客户端
pub struct HuntApiClient {
    http: reqwest::Client,
}

impl HuntApiClient {
    /// 创建新的客户端
    ///
    /// 请求超时取自配置，避免提交中状态被挂死。
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http })
    }
}

impl QuestionFetcher for HuntApiClient {
    async fn fetch_question(&self, url: &str) -> AppResult<QuestionPayload> {
        debug!("拉取题目: {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::request_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(ApiError::BadStatus {
                endpoint: url.to_string(),
                status: status.as_u16(),
            }));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::request_failed(url, e))?;

        debug!("题目原始数据: {}", body);

        let payload: QuestionPayload = serde_json::from_str(&body)?;
        Ok(payload)
    }

    async fn submit_answer(&self, endpoint: &str, answer: &str) -> AppResult<Option<bool>> {
        let body = json!({ "answer": answer });

        debug!("提交答案 Payload: {}", body);

        let response = self
            .http
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }));
        }

        // 响应体只是后端回执，带 correct 字段就转交判定策略，没有也不算错
        let verdict = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("correct").and_then(|c| c.as_bool()));

        debug!("提交回执判定: {:?}", verdict);

        Ok(verdict)
    }
}
