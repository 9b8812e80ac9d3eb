//! 答案判定服务 - 业务能力层
//!
//! 判定是一个可插拔的能力：可以在本地比对答案，也可以信任服务端回执。
//! 契约只要求给出一个布尔判定。

use crate::models::question::Question;

/// 答案判定策略
pub trait AnswerVerifier {
    /// 判定一次作答
    ///
    /// # 参数
    /// - `question`: 当前题目
    /// - `answer`: 用户提交的答案
    /// - `server_ack`: 提交回执里的服务端判定（有则传入）
    fn verdict(&self, question: &Question, answer: &str, server_ack: Option<bool>) -> bool;
}

/// 本地答案比对
///
/// 与题目携带的标准答案做大小写不敏感的比对，忽略服务端回执。
/// 这是线上观察到的行为。
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAnswerKey;

impl AnswerVerifier for LocalAnswerKey {
    fn verdict(&self, question: &Question, answer: &str, _server_ack: Option<bool>) -> bool {
        let answer = answer.trim();
        !answer.is_empty() && answer.eq_ignore_ascii_case(question.expected_answer.trim())
    }
}

/// 服务端权威判定
///
/// 信任提交回执里的判定；服务端没有表态时退回本地比对。
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteAuthority;

impl AnswerVerifier for RemoteAuthority {
    fn verdict(&self, question: &Question, answer: &str, server_ack: Option<bool>) -> bool {
        match server_ack {
            Some(ack) => ack,
            None => LocalAnswerKey.verdict(question, answer, None),
        }
    }
}
