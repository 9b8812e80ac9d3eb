//! 寻宝交互流程 - 流程层
//!
//! 核心职责：把用户动作接到会话状态的迁移上
//!
//! 状态环：
//! Idle → Scanning → QuestionShown → Submitting → ResultShown → Scanning → ...
//!
//! 任何不可恢复的拉取/提交错误都回到 Idle；流程自身不重试，由用户重新发起。

use tracing::{info, warn};

use crate::clients::QuestionFetcher;
use crate::config::Config;
use crate::error::{AppError, AppResult, FlowError};
use crate::models::question::{Question, ResponseKind};
use crate::models::session::{Mode, Session};
use crate::scanner::{CodeScanner, ScannedCode};
use crate::services::{AnswerVerifier, CodeRecognizer};
use crate::utils::logging::truncate_text;

/// 一次用户触发的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    /// 已进入扫码状态
    ScanStarted,
    /// 本次扫码被取消，回到空闲
    ScanCancelled,
    /// 题目已就绪
    QuestionReady,
    /// 选项已记录
    ChoiceSelected,
    /// 回答正确，附奖励积分
    Correct { reward_points: Vec<i64> },
    /// 回答错误，保留题目等待重试
    Incorrect,
    /// 会话已重置并重新进入扫码
    ScanRestarted,
    /// 触发被忽略（状态不符或重复触发）
    Ignored,
}

/// 寻宝交互流程
///
/// - 独占持有会话状态，所有修改都经过这里
/// - 只依赖扫码、拉取、判定三个能力的接口
/// - 错误返回前先把会话恢复到安全状态
pub struct HuntFlow<S, F, V>
where
    S: CodeScanner,
    F: QuestionFetcher,
    V: AnswerVerifier,
{
    scanner: S,
    fetcher: F,
    verifier: V,
    recognizer: CodeRecognizer,
    session: Session,
    config: Config,
    permission_granted: bool,
}

impl<S, F, V> HuntFlow<S, F, V>
where
    S: CodeScanner,
    F: QuestionFetcher,
    V: AnswerVerifier,
{
    /// 创建新的交互流程
    pub fn new(config: Config, scanner: S, fetcher: F, verifier: V) -> Self {
        let recognizer = CodeRecognizer::new(config.known_host_token.clone());
        Self {
            scanner,
            fetcher,
            verifier,
            recognizer,
            session: Session::new(),
            config,
            permission_granted: false,
        }
    }

    /// 当前会话状态（展示层只读）
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 确认相机权限
    ///
    /// 进程内最多真正弹一次授权窗，之后直接返回缓存结论。
    /// 启动时由外层显式调用一次。
    pub async fn ensure_permission(&mut self) -> AppResult<bool> {
        if self.permission_granted {
            return Ok(true);
        }
        self.permission_granted = self.scanner.request_access().await?;
        Ok(self.permission_granted)
    }

    /// 用户发起扫码：Idle → Scanning
    pub async fn start_scan(&mut self) -> AppResult<FlowStep> {
        if self.session.mode != Mode::Idle {
            return Ok(FlowStep::Ignored);
        }

        if !self.ensure_permission().await? {
            warn!("⚠️ 相机权限被拒绝，无法扫码");
            return Err(AppError::permission_denied());
        }

        self.session.mode = Mode::Scanning;
        info!("📷 开始扫码");
        Ok(FlowStep::ScanStarted)
    }

    /// 等待一次解码事件并完成后续迁移
    ///
    /// Scanning → QuestionShown（识别成功、拉取成功）
    /// Scanning → Idle（取消 / 无法识别 / 拉取失败）
    pub async fn await_code(&mut self) -> AppResult<FlowStep> {
        if self.session.mode != Mode::Scanning {
            return Ok(FlowStep::Ignored);
        }

        let decoded = match self.scanner.scan_once().await {
            Ok(d) => d,
            Err(e) => {
                self.session.reset();
                return Err(e);
            }
        };

        match decoded {
            Some(code) => self.handle_decoded(code).await,
            None => {
                self.session.reset();
                info!("扫码已取消");
                Ok(FlowStep::ScanCancelled)
            }
        }
    }

    /// 用户主动退出扫码：Scanning → Idle
    pub fn cancel_scan(&mut self) -> AppResult<FlowStep> {
        if self.session.mode != Mode::Scanning {
            return Ok(FlowStep::Ignored);
        }
        self.session.reset();
        info!("扫码已取消");
        Ok(FlowStep::ScanCancelled)
    }

    /// 用户选定一个选项
    ///
    /// 多选题要求选项必须在候选列表中，自由作答题接受任意非空文本。
    pub fn select_choice(&mut self, choice: &str) -> AppResult<FlowStep> {
        if self.session.mode != Mode::QuestionShown {
            return Ok(FlowStep::Ignored);
        }
        let Some(question) = self.session.current_question.as_ref() else {
            return Ok(FlowStep::Ignored);
        };

        let choice = choice.trim();
        if choice.is_empty() {
            return Ok(FlowStep::Ignored);
        }

        if question.response_kind == ResponseKind::MultipleChoice && !question.has_choice(choice) {
            return Err(AppError::Flow(FlowError::ChoiceNotListed {
                choice: choice.to_string(),
            }));
        }

        self.session.selected_choice = Some(choice.to_string());
        Ok(FlowStep::ChoiceSelected)
    }

    /// 用户确认提交：QuestionShown → Submitting → ResultShown / QuestionShown
    ///
    /// 提交中重复触发是空操作，这是防止同一题重复提交的唯一并发护栏。
    pub async fn submit(&mut self) -> AppResult<FlowStep> {
        if self.session.mode == Mode::Submitting {
            info!("提交进行中，忽略重复触发");
            return Ok(FlowStep::Ignored);
        }
        if self.session.mode != Mode::QuestionShown {
            return Ok(FlowStep::Ignored);
        }
        let Some(answer) = self.session.selected_choice.clone() else {
            return Ok(FlowStep::Ignored);
        };
        let Some(question) = self.session.current_question.clone() else {
            return Ok(FlowStep::Ignored);
        };

        self.session.mode = Mode::Submitting;
        info!("📤 正在提交答案: {}", answer);

        let server_ack = match self
            .fetcher
            .submit_answer(&question.submit_endpoint, &answer)
            .await
        {
            Ok(ack) => ack,
            Err(e) => {
                self.session.reset();
                return Err(e);
            }
        };

        let correct = self.verifier.verdict(&question, &answer, server_ack);
        self.session.is_correct = Some(correct);

        if correct {
            self.session.mode = Mode::ResultShown;
            info!("✅ 回答正确");
            Ok(FlowStep::Correct {
                reward_points: question.reward_points.clone(),
            })
        } else {
            // 答错保留题目，清掉已选项等用户重试
            self.session.selected_choice = None;
            self.session.mode = Mode::QuestionShown;
            info!("❌ 回答错误，可再试一次");
            Ok(FlowStep::Incorrect)
        }
    }

    /// 用户要下一题：ResultShown → Scanning
    ///
    /// 会话完整重置，之后由外层再调 [`await_code`](Self::await_code)。
    pub fn next_question(&mut self) -> AppResult<FlowStep> {
        if self.session.mode != Mode::ResultShown {
            return Ok(FlowStep::Ignored);
        }
        self.session.reset();
        self.session.mode = Mode::Scanning;
        info!("🔁 进入下一题，重新扫码");
        Ok(FlowStep::ScanRestarted)
    }

    // ========== 内部迁移 ==========

    /// 处理一次解码事件
    async fn handle_decoded(&mut self, code: ScannedCode) -> AppResult<FlowStep> {
        let Some(url) = self.recognizer.fetch_url(&code.payload) else {
            warn!(
                "⚠️ 无法识别的码内容: {}",
                truncate_text(&code.payload, 60)
            );
            self.session.reset();
            return Err(AppError::invalid_code(code.payload));
        };

        info!("🔍 识别到寻宝码，正在拉取题目...");

        let payload = match self.fetcher.fetch_question(&url).await {
            Ok(p) => p,
            Err(e) => {
                self.session.reset();
                return Err(e);
            }
        };

        let question = match Question::from_payload(payload, &self.config) {
            Ok(q) => q,
            Err(e) => {
                self.session.reset();
                return Err(e);
            }
        };

        info!("✓ 题目已就绪: {}", truncate_text(&question.prompt, 80));
        if self.config.verbose_logging && !question.choices.is_empty() {
            info!("候选项: {}", question.choices.join(" / "));
        }

        self.session.current_question = Some(question);
        self.session.selected_choice = None;
        self.session.is_correct = None;
        self.session.mode = Mode::QuestionShown;

        Ok(FlowStep::QuestionReady)
    }
}
