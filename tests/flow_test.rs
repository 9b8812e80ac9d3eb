//! 交互流程集成测试
//!
//! 用通道扫码器和内存题目服务驱动完整状态机，不出网。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use scan_answer_submit::{
    AnswerVerifier, ApiError, AppError, AppResult, ChannelScanner, Config, FlowError, FlowStep,
    HuntFlow, LocalAnswerKey, Mode, QuestionFetcher, QuestionPayload, RemoteAuthority,
    ScannerRemote,
};

/// 内存题目服务的调用统计
#[derive(Default)]
struct FetchStats {
    fetches: AtomicUsize,
    submits: AtomicUsize,
    last_answer: Mutex<Option<String>>,
}

/// 内存题目服务
struct FakeFetcher {
    payload: QuestionPayload,
    server_ack: Option<bool>,
    fail_fetch: bool,
    fail_submit: bool,
    stats: Arc<FetchStats>,
}

impl FakeFetcher {
    fn new(payload: QuestionPayload) -> (Self, Arc<FetchStats>) {
        let stats = Arc::new(FetchStats::default());
        (
            Self {
                payload,
                server_ack: None,
                fail_fetch: false,
                fail_submit: false,
                stats: stats.clone(),
            },
            stats,
        )
    }
}

impl QuestionFetcher for FakeFetcher {
    async fn fetch_question(&self, url: &str) -> AppResult<QuestionPayload> {
        self.stats.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(AppError::request_failed(
                url,
                std::io::Error::new(std::io::ErrorKind::TimedOut, "模拟超时"),
            ));
        }
        Ok(self.payload.clone())
    }

    async fn submit_answer(&self, endpoint: &str, answer: &str) -> AppResult<Option<bool>> {
        self.stats.submits.fetch_add(1, Ordering::SeqCst);
        *self.stats.last_answer.lock().unwrap() = Some(answer.to_string());
        if self.fail_submit {
            return Err(AppError::request_failed(
                endpoint,
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "模拟断网"),
            ));
        }
        Ok(self.server_ack)
    }
}

/// 样例颜色题，对应服务端返回的 JSON 形状
fn color_payload() -> QuestionPayload {
    serde_json::from_str(
        r#"{
            "question": "Pick a color",
            "responseType": "multipleChoice",
            "choices": ["red", "blue", "green"],
            "pointsRewarded": [10, 5],
            "Age group": "8-12",
            "url": "https://example.mock.pstmn.io/answer",
            "answer": "blue"
        }"#,
    )
    .expect("样例 JSON 应能解析")
}

fn flow_with<V: AnswerVerifier>(
    fetcher: FakeFetcher,
    verifier: V,
) -> (
    HuntFlow<ChannelScanner, FakeFetcher, V>,
    ScannerRemote,
) {
    let (scanner, remote) = ChannelScanner::new(true);
    (
        HuntFlow::new(Config::default(), scanner, fetcher, verifier),
        remote,
    )
}

/// 走到出题状态的快捷方式
async fn scan_to_question(
    flow: &mut HuntFlow<ChannelScanner, FakeFetcher, LocalAnswerKey>,
    remote: &ScannerRemote,
) {
    flow.start_scan().await.expect("扫码应能启动");
    remote.decode("https://example.mock.pstmn.io/q1");
    let step = flow.await_code().await.expect("拉题应成功");
    assert_eq!(step, FlowStep::QuestionReady);
}

#[tokio::test]
async fn test_full_hunt_happy_path() {
    let (fetcher, stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    assert_eq!(flow.session().mode, Mode::Idle);

    scan_to_question(&mut flow, &remote).await;
    assert_eq!(flow.session().mode, Mode::QuestionShown);

    flow.select_choice("blue").expect("选项应被接受");
    assert_eq!(flow.session().selected_choice.as_deref(), Some("blue"));

    let step = flow.submit().await.expect("提交应成功");
    assert_eq!(
        step,
        FlowStep::Correct {
            reward_points: vec![10, 5]
        }
    );
    assert_eq!(flow.session().mode, Mode::ResultShown);
    assert_eq!(flow.session().is_correct, Some(true));

    // 提交通知确实发出去了，带的是所选答案
    assert_eq!(stats.submits.load(Ordering::SeqCst), 1);
    assert_eq!(
        stats.last_answer.lock().unwrap().as_deref(),
        Some("blue")
    );
}

#[tokio::test]
async fn test_expected_answer_any_case_is_correct() {
    let (fetcher, _stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    scan_to_question(&mut flow, &remote).await;

    flow.select_choice("BLUE").expect("大小写不同也应被接受");
    let step = flow.submit().await.expect("提交应成功");

    assert!(matches!(step, FlowStep::Correct { .. }));
    assert_eq!(flow.session().is_correct, Some(true));
}

#[tokio::test]
async fn test_wrong_answer_returns_to_question() {
    let (fetcher, _stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    scan_to_question(&mut flow, &remote).await;

    flow.select_choice("red").expect("red 在候选列表中");
    let step = flow.submit().await.expect("提交本身应成功");

    assert_eq!(step, FlowStep::Incorrect);
    // 回到出题状态：题目保留，已选项清空
    assert_eq!(flow.session().mode, Mode::QuestionShown);
    assert!(flow.session().current_question.is_some());
    assert!(flow.session().selected_choice.is_none());
    assert_eq!(flow.session().is_correct, Some(false));

    // 还能再答对
    flow.select_choice("blue").unwrap();
    let step = flow.submit().await.unwrap();
    assert!(matches!(step, FlowStep::Correct { .. }));
}

#[tokio::test]
async fn test_unrecognized_payload_never_fetches() {
    let (fetcher, stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    flow.start_scan().await.unwrap();
    remote.decode("WIFI:T:WPA;S:cafe;P:12345678;;");

    let err = flow.await_code().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Flow(FlowError::InvalidCode { .. })
    ));

    // 回到空闲，且从未发起拉取
    assert_eq!(flow.session().mode, Mode::Idle);
    assert!(flow.session().current_question.is_none());
    assert_eq!(stats.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_next_question_resets_session() {
    let (fetcher, _stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    scan_to_question(&mut flow, &remote).await;
    flow.select_choice("blue").unwrap();
    flow.submit().await.unwrap();
    assert_eq!(flow.session().mode, Mode::ResultShown);

    let step = flow.next_question().expect("应能进入下一题");
    assert_eq!(step, FlowStep::ScanRestarted);

    // 除了重新进入扫码态，其余字段等于初始值
    assert_eq!(flow.session().mode, Mode::Scanning);
    assert!(flow.session().current_question.is_none());
    assert!(flow.session().selected_choice.is_none());
    assert!(flow.session().is_correct.is_none());

    // 循环可以继续：再扫一题
    remote.decode("https://example.mock.pstmn.io/q2");
    let step = flow.await_code().await.unwrap();
    assert_eq!(step, FlowStep::QuestionReady);
}

#[tokio::test]
async fn test_duplicate_submit_is_noop() {
    let (fetcher, stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    scan_to_question(&mut flow, &remote).await;

    // 没有选项时提交是空操作
    let step = flow.submit().await.unwrap();
    assert_eq!(step, FlowStep::Ignored);
    assert_eq!(stats.submits.load(Ordering::SeqCst), 0);

    flow.select_choice("blue").unwrap();
    flow.submit().await.unwrap();

    // 结果已出后连点提交不会再发请求
    let step = flow.submit().await.unwrap();
    assert_eq!(step, FlowStep::Ignored);
    assert_eq!(stats.submits.load(Ordering::SeqCst), 1);
    assert_eq!(flow.session().mode, Mode::ResultShown);
}

#[tokio::test]
async fn test_permission_denied_stays_idle() {
    let (fetcher, _stats) = FakeFetcher::new(color_payload());
    let (scanner, _remote) = ChannelScanner::new(false);
    let mut flow = HuntFlow::new(Config::default(), scanner, fetcher, LocalAnswerKey);

    let err = flow.start_scan().await.unwrap_err();
    assert!(matches!(err, AppError::Scan(_)));
    assert_eq!(flow.session().mode, Mode::Idle);
}

#[tokio::test]
async fn test_cancel_scan_leaves_no_state() {
    let (fetcher, _stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    flow.start_scan().await.unwrap();
    assert_eq!(flow.session().mode, Mode::Scanning);

    remote.cancel();
    let step = flow.await_code().await.unwrap();
    assert_eq!(step, FlowStep::ScanCancelled);

    assert_eq!(flow.session().mode, Mode::Idle);
    assert!(flow.session().current_question.is_none());
    assert!(flow.session().selected_choice.is_none());
    assert!(flow.session().is_correct.is_none());
}

#[tokio::test]
async fn test_fetch_failure_resets_to_idle() {
    let (mut fetcher, _stats) = FakeFetcher::new(color_payload());
    fetcher.fail_fetch = true;
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    flow.start_scan().await.unwrap();
    remote.decode("https://example.mock.pstmn.io/q1");

    let err = flow.await_code().await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::RequestFailed { .. })));
    assert_eq!(flow.session().mode, Mode::Idle);
}

#[tokio::test]
async fn test_submit_failure_resets_to_idle() {
    let (mut fetcher, _stats) = FakeFetcher::new(color_payload());
    fetcher.fail_submit = true;
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    scan_to_question(&mut flow, &remote).await;
    flow.select_choice("blue").unwrap();

    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, AppError::Api(_)));

    // 不可恢复错误：整个会话回到空闲
    assert_eq!(flow.session().mode, Mode::Idle);
    assert!(flow.session().current_question.is_none());
    assert!(flow.session().is_correct.is_none());
}

#[tokio::test]
async fn test_malformed_payload_resets_to_idle() {
    // 缺 question 字段
    let payload: QuestionPayload =
        serde_json::from_str(r#"{"responseType": "multipleChoice", "choices": ["a"]}"#).unwrap();
    let (fetcher, _stats) = FakeFetcher::new(payload);
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    flow.start_scan().await.unwrap();
    remote.decode("https://example.mock.pstmn.io/q1");

    let err = flow.await_code().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Api(ApiError::MalformedPayload { .. })
    ));
    assert_eq!(flow.session().mode, Mode::Idle);

    // 多选题没有候选项同样算数据不完整
    let payload: QuestionPayload = serde_json::from_str(
        r#"{"question": "Pick", "responseType": "multipleChoice", "choices": []}"#,
    )
    .unwrap();
    let (fetcher, _stats) = FakeFetcher::new(payload);
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    flow.start_scan().await.unwrap();
    remote.decode("https://example.mock.pstmn.io/q1");
    assert!(flow.await_code().await.is_err());
    assert_eq!(flow.session().mode, Mode::Idle);
}

#[tokio::test]
async fn test_choice_not_listed_keeps_question() {
    let (fetcher, _stats) = FakeFetcher::new(color_payload());
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    scan_to_question(&mut flow, &remote).await;

    let err = flow.select_choice("purple").unwrap_err();
    assert!(matches!(
        err,
        AppError::Flow(FlowError::ChoiceNotListed { .. })
    ));

    // 安全回退态是出题状态本身
    assert_eq!(flow.session().mode, Mode::QuestionShown);
    assert!(flow.session().selected_choice.is_none());
}

#[tokio::test]
async fn test_free_response_accepts_any_text() {
    let payload: QuestionPayload = serde_json::from_str(
        r#"{"question": "宝藏埋在几号柱子下？", "answer": "42",
            "url": "https://example.mock.pstmn.io/answer"}"#,
    )
    .unwrap();
    let (fetcher, _stats) = FakeFetcher::new(payload);
    let (mut flow, remote) = flow_with(fetcher, LocalAnswerKey);

    scan_to_question(&mut flow, &remote).await;

    flow.select_choice("42").expect("自由作答接受任意非空文本");
    let step = flow.submit().await.unwrap();
    assert!(matches!(step, FlowStep::Correct { .. }));
}

#[tokio::test]
async fn test_remote_authority_overrides_local_key() {
    // 服务端说错就是错，即使本地答案键认为对
    let (mut fetcher, _stats) = FakeFetcher::new(color_payload());
    fetcher.server_ack = Some(false);
    let (mut flow, remote) = flow_with(fetcher, RemoteAuthority);

    flow.start_scan().await.unwrap();
    remote.decode("https://example.mock.pstmn.io/q1");
    flow.await_code().await.unwrap();

    flow.select_choice("blue").unwrap();
    let step = flow.submit().await.unwrap();
    assert_eq!(step, FlowStep::Incorrect);

    // 反过来：服务端说对就是对
    let (mut fetcher, _stats) = FakeFetcher::new(color_payload());
    fetcher.server_ack = Some(true);
    let (mut flow, remote) = flow_with(fetcher, RemoteAuthority);

    flow.start_scan().await.unwrap();
    remote.decode("https://example.mock.pstmn.io/q1");
    flow.await_code().await.unwrap();

    flow.select_choice("red").unwrap();
    let step = flow.submit().await.unwrap();
    assert!(matches!(step, FlowStep::Correct { .. }));
    assert_eq!(flow.session().is_correct, Some(true));
}

#[tokio::test]
async fn test_triggers_in_wrong_state_are_ignored() {
    let (fetcher, _stats) = FakeFetcher::new(color_payload());
    let (mut flow, _remote) = flow_with(fetcher, LocalAnswerKey);

    // 空闲态下这些触发都不做事
    assert_eq!(flow.select_choice("blue").unwrap(), FlowStep::Ignored);
    assert_eq!(flow.submit().await.unwrap(), FlowStep::Ignored);
    assert_eq!(flow.next_question().unwrap(), FlowStep::Ignored);
    assert_eq!(flow.cancel_scan().unwrap(), FlowStep::Ignored);
    assert_eq!(flow.await_code().await.unwrap(), FlowStep::Ignored);
    assert_eq!(flow.session().mode, Mode::Idle);
}
