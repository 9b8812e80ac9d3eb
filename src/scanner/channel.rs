//! 通道扫码器
//!
//! 用 mpsc 通道模拟扫码硬件，测试和无界面环境使用。
//! `ScannerRemote` 扮演"相机"一端，负责注入解码事件或取消。

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::AppResult;
use crate::scanner::{CodeScanner, ScannedCode};

/// 相机一端发来的信号
#[derive(Debug)]
enum ScanSignal {
    Decoded(ScannedCode),
    Cancelled,
}

/// 通道扫码器
pub struct ChannelScanner {
    granted: bool,
    prompted: bool,
    rx: mpsc::UnboundedReceiver<ScanSignal>,
}

/// 扫码器的远端手柄，模拟相机解码与用户取消
#[derive(Clone)]
pub struct ScannerRemote {
    tx: mpsc::UnboundedSender<ScanSignal>,
}

impl ChannelScanner {
    /// 创建扫码器及其远端手柄
    ///
    /// # 参数
    /// - `granted`: 模拟用户对权限弹窗的回答
    pub fn new(granted: bool) -> (Self, ScannerRemote) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                granted,
                prompted: false,
                rx,
            },
            ScannerRemote { tx },
        )
    }
}

impl ScannerRemote {
    /// 注入一次二维码解码事件
    pub fn decode(&self, payload: impl Into<String>) {
        let _ = self.tx.send(ScanSignal::Decoded(ScannedCode::qr(payload)));
    }

    /// 注入一次任意码制的解码事件
    pub fn decode_code(&self, code: ScannedCode) {
        let _ = self.tx.send(ScanSignal::Decoded(code));
    }

    /// 模拟用户取消当前扫码
    pub fn cancel(&self) {
        let _ = self.tx.send(ScanSignal::Cancelled);
    }
}

impl CodeScanner for ChannelScanner {
    async fn request_access(&mut self) -> AppResult<bool> {
        if !self.prompted {
            self.prompted = true;
            debug!("模拟权限弹窗，用户回答: {}", self.granted);
        }
        Ok(self.granted)
    }

    async fn scan_once(&mut self) -> AppResult<Option<ScannedCode>> {
        match self.rx.recv().await {
            Some(ScanSignal::Decoded(code)) => Ok(Some(code)),
            // 取消或远端掉线都按取消处理，不留残余状态
            Some(ScanSignal::Cancelled) | None => Ok(None),
        }
    }
}
