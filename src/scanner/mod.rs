//! 扫码适配层 - 基础设施层
//!
//! 把"从视觉码中解出文本"的平台能力收在一个窄接口后面：
//! - 只暴露"请求权限"和"等待一次解码"两个能力
//! - 一次激活在第一个解码事件或用户取消时结束，可重复激活
//! - 不做任何重试，解码失败就是没有事件

pub mod channel;

pub use channel::{ChannelScanner, ScannerRemote};

use crate::error::AppResult;

/// 解码得到的码制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFormat {
    QrCode,
    Other,
}

/// 一次解码事件
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedCode {
    pub format: CodeFormat,
    pub payload: String,
}

impl ScannedCode {
    pub fn qr(payload: impl Into<String>) -> Self {
        Self {
            format: CodeFormat::QrCode,
            payload: payload.into(),
        }
    }
}

/// 扫码能力
#[allow(async_fn_in_trait)]
pub trait CodeScanner {
    /// 请求相机权限
    ///
    /// 幂等：进程内最多向用户弹一次授权窗，之后直接返回已有结论。
    async fn request_access(&mut self) -> AppResult<bool>;

    /// 启动一次扫码激活
    ///
    /// 挂起直到第一个解码事件；`None` 表示用户主动取消本次激活。
    async fn scan_once(&mut self) -> AppResult<Option<ScannedCode>>;
}
