//! 数据模型
//!
//! - `question`: 题目实体与接口原始数据
//! - `session`: 客户端会话状态

pub mod question;
pub mod session;

pub use question::{Question, QuestionPayload, ResponseKind};
pub use session::{Mode, Session};
