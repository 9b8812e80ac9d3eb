//! # Scan Answer Submit
//!
//! 一个扫码寻宝小游戏的客户端交互内核
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Scanner）
//! - `scanner/` - 持有平台扫码能力，只暴露能力
//! - `ChannelScanner` - 通道实现，测试与演示共用
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个动作
//! - `CodeRecognizer` - 寻宝码识别能力
//! - `AnswerVerifier` - 答案判定能力（本地比对 / 服务端权威两种策略）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一轮寻宝"的完整交互流程
//! - `HuntFlow` - 状态机编排（扫码 → 拉题 → 作答 → 提交 → 结果）
//! - 独占持有 `Session`，所有状态迁移都经过它
//!
//! ### ④ 外层（App / Views）
//! - `app.rs` - 演示驱动，把控制台输入接到流程触发上
//! - `views.rs` - 会话状态的纯函数文本投影
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod scanner;
pub mod services;
pub mod utils;
pub mod views;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{HuntApiClient, QuestionFetcher};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, FlowError, ScanError};
pub use models::question::{Question, QuestionPayload, ResponseKind};
pub use models::session::{Mode, Session};
pub use scanner::{ChannelScanner, CodeScanner, ScannedCode, ScannerRemote};
pub use services::{AnswerVerifier, CodeRecognizer, LocalAnswerKey, RemoteAuthority};
pub use workflow::{FlowStep, HuntFlow};
