use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 题目获取接口返回的原始 JSON
///
/// 所有字段都按可选解析，字段缺失的判断放在 [`Question::from_payload`] 里，
/// 这样"缺字段"和"不是 JSON"是两种不同的错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,

    pub question: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(rename = "responseType", skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,

    #[serde(rename = "pointsRewarded", skip_serializing_if = "Option::is_none")]
    pub points_rewarded: Option<Vec<i64>>,

    /// 服务端会下发但流程不消费的字段，原样携带
    #[serde(rename = "Age group", skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,

    /// 答案提交地址，缺失时用配置兜底
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// 标准答案，缺失时用配置兜底
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// 作答方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// 多选一
    MultipleChoice,
    /// 其他（自由作答）
    Other,
}

/// 一道寻宝题目
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// 题干
    pub prompt: String,
    /// 配图引用（仅描述，不在核心流程中拉取）
    pub image_ref: Option<String>,
    /// 提示
    pub hint: Option<String>,
    /// 作答方式
    pub response_kind: ResponseKind,
    /// 候选项（仅多选题非空）
    pub choices: Vec<String>,
    /// 奖励积分
    pub reward_points: Vec<i64>,
    /// 答案提交地址
    pub submit_endpoint: String,
    /// 标准答案（大小写不敏感）
    pub expected_answer: String,
    /// 年龄组，透传字段
    pub age_group: Option<String>,
}

impl Question {
    /// 由接口原始数据构建题目实体
    ///
    /// # 参数
    /// - `payload`: 接口返回的原始 JSON 数据
    /// - `config`: 提交地址和标准答案缺失时的兜底来源
    ///
    /// # 返回
    /// 字段不完整时返回 `MalformedPayload` 错误
    pub fn from_payload(payload: QuestionPayload, config: &Config) -> AppResult<Self> {
        let prompt = match payload.question {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Err(AppError::malformed_payload("缺少 question 字段")),
        };

        let response_kind = match payload.response_type.as_deref() {
            Some("multipleChoice") => ResponseKind::MultipleChoice,
            _ => ResponseKind::Other,
        };

        let choices = payload.choices.unwrap_or_default();
        if response_kind == ResponseKind::MultipleChoice && choices.is_empty() {
            return Err(AppError::malformed_payload("多选题缺少 choices 字段"));
        }

        let submit_endpoint = payload
            .url
            .unwrap_or_else(|| config.fallback_submit_endpoint.clone());
        let expected_answer = payload
            .answer
            .unwrap_or_else(|| config.fallback_expected_answer.clone());

        let question = Self {
            prompt,
            image_ref: payload.img_src,
            hint: payload.hint,
            response_kind,
            choices,
            reward_points: payload.points_rewarded.unwrap_or_default(),
            submit_endpoint,
            expected_answer,
            age_group: payload.age_group,
        };

        // 只做最小形状检查：答案与候选项对不上仅告警，不拒绝
        if question.response_kind == ResponseKind::MultipleChoice {
            let hits = question.matching_choice_count();
            if hits != 1 {
                warn!(
                    "⚠️ 标准答案 '{}' 在候选项中命中 {} 次（预期 1 次）",
                    question.expected_answer, hits
                );
            }
        }

        Ok(question)
    }

    /// 标准答案在候选项中命中的次数（大小写不敏感）
    pub fn matching_choice_count(&self) -> usize {
        self.choices
            .iter()
            .filter(|c| c.eq_ignore_ascii_case(&self.expected_answer))
            .count()
    }

    /// 某选项是否在候选列表中（大小写不敏感）
    pub fn has_choice(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c.eq_ignore_ascii_case(choice))
    }
}
