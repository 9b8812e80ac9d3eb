//! 客户端会话状态
//!
//! 全程只有一个实例，由流程层独占持有并修改，展示层只读。

use crate::models::question::Question;

/// 当前界面所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// 空闲，等待用户发起扫码
    #[default]
    Idle,
    /// 扫码中
    Scanning,
    /// 题目已展示，等待作答
    QuestionShown,
    /// 答案提交中（兼作加载标志，期间重复提交为空操作）
    Submitting,
    /// 结果已展示
    ResultShown,
}

/// 客户端会话状态
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mode: Mode,
    /// 当前题目，每次拉取整体替换，重置时清空
    pub current_question: Option<Question>,
    /// 已选选项，仅在有题目时才会被设置
    pub selected_choice: Option<String>,
    /// 判定结果，仅在一次提交完成后才会被设置
    pub is_correct: Option<bool>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 完整重置回空闲态，不留任何残余字段
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.current_question = None;
        self.selected_choice = None;
        self.is_correct = None;
    }
}
