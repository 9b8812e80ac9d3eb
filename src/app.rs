use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::clients::HuntApiClient;
use crate::config::Config;
use crate::models::session::Mode;
use crate::scanner::{ChannelScanner, ScannerRemote};
use crate::services::LocalAnswerKey;
use crate::views;
use crate::workflow::{FlowStep, HuntFlow};

/// 应用主结构
///
/// 演示驱动：独占 stdin，把用户敲入的行按当前状态转成流程触发；
/// 扫码输入通过通道扫码器的远端手柄注入。
pub struct App {
    flow: HuntFlow<ChannelScanner, HuntApiClient, LocalAnswerKey>,
    remote: ScannerRemote,
}

impl App {
    /// 初始化应用
    ///
    /// 权限申请等挂载期副作用收敛到这里，进程启动时显式执行一次。
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = HuntApiClient::new(&config)?;
        let (scanner, remote) = ChannelScanner::new(true);
        let mut flow = HuntFlow::new(config, scanner, client, LocalAnswerKey);

        flow.ensure_permission().await?;

        Ok(Self { flow, remote })
    }

    /// 运行交互主循环
    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            println!("\n{}", views::render(self.flow.session()));

            match self.flow.session().mode {
                Mode::Idle => {
                    let Some(line) = lines.next_line().await? else {
                        break;
                    };
                    if line.trim() == "q" {
                        break;
                    }
                    if let Err(e) = self.flow.start_scan().await {
                        println!("{}", views::render_notice(&e));
                    }
                }
                Mode::Scanning => {
                    // 把敲入的一行当作相机解出的码，空行当作取消
                    let line = lines.next_line().await?.unwrap_or_default();
                    let payload = line.trim();
                    if payload.is_empty() {
                        self.remote.cancel();
                    } else {
                        self.remote.decode(payload);
                    }
                    if let Err(e) = self.flow.await_code().await {
                        println!("{}", views::render_notice(&e));
                    }
                }
                Mode::QuestionShown => {
                    let Some(line) = lines.next_line().await? else {
                        break;
                    };
                    let input = line.trim().to_string();
                    if input == "q" {
                        break;
                    }
                    let step = if input.is_empty() {
                        self.flow.submit().await
                    } else {
                        let choice = self.resolve_choice(&input);
                        self.flow.select_choice(&choice)
                    };
                    match step {
                        Ok(FlowStep::Incorrect) => println!("❌ 不对哦，再试一次"),
                        Ok(_) => {}
                        Err(e) => println!("{}", views::render_notice(&e)),
                    }
                }
                // 顺序驱动下提交在触发内完成，不会在这个状态歇脚
                Mode::Submitting => continue,
                Mode::ResultShown => {
                    let Some(line) = lines.next_line().await? else {
                        break;
                    };
                    if line.trim() == "q" {
                        break;
                    }
                    self.flow.next_question()?;
                }
            }
        }

        info!("👋 寻宝结束");
        Ok(())
    }

    /// 把输入解析成选项：数字按 1 起的序号取候选项，其他按原文
    fn resolve_choice(&self, input: &str) -> String {
        if let Some(question) = self.flow.session().current_question.as_ref() {
            if let Ok(index) = input.parse::<usize>() {
                if index >= 1 && index <= question.choices.len() {
                    return question.choices[index - 1].clone();
                }
            }
        }
        input.to_string()
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 扫码寻宝模式");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📡 请求超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}
