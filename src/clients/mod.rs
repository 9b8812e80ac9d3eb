//! 远程接口客户端

pub mod hunt_client;

pub use hunt_client::HuntApiClient;

use crate::error::AppResult;
use crate::models::question::QuestionPayload;

/// 题目服务能力
///
/// 两个操作都是单次尝试，不做自动重试，失败由调用方向用户呈现。
#[allow(async_fn_in_trait)]
pub trait QuestionFetcher {
    /// 按扫码得到的 URL 拉取题目原始数据
    async fn fetch_question(&self, url: &str) -> AppResult<QuestionPayload>;

    /// 把选定答案提交到题目指定的地址
    ///
    /// # 返回
    /// 响应体里带了 `correct` 布尔字段时返回服务端判定，否则返回 `None`
    async fn submit_answer(&self, endpoint: &str, answer: &str) -> AppResult<Option<bool>>;
}
