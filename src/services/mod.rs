//! 业务能力层
//!
//! 描述"我能做什么"，每个服务只管一个能力，不关心流程顺序：
//! - `recognizer`: 判断扫到的内容是不是寻宝码
//! - `verifier`: 判定答案对错（可插拔策略）

pub mod recognizer;
pub mod verifier;

pub use recognizer::CodeRecognizer;
pub use verifier::{AnswerVerifier, LocalAnswerKey, RemoteAuthority};
