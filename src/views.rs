//! 展示层
//!
//! 会话状态的纯函数文本投影，不持有状态、不做任何独立逻辑。
//! 样式不在范围内，这里只产出可读文本。

use crate::error::AppError;
use crate::models::session::{Mode, Session};

/// 渲染当前会话状态
pub fn render(session: &Session) -> String {
    match session.mode {
        Mode::Idle => "🏁 寻宝进行中！回车开始扫码，输入 q 退出".to_string(),
        Mode::Scanning => "📷 扫码中：输入二维码内容（空行取消）".to_string(),
        Mode::QuestionShown => render_question(session),
        Mode::Submitting => "⏳ 提交中...".to_string(),
        Mode::ResultShown => render_result(session),
    }
}

/// 把错误渲染成一条可关闭的提示
pub fn render_notice(error: &AppError) -> String {
    format!("❗ {}", error)
}

fn render_question(session: &Session) -> String {
    let Some(question) = session.current_question.as_ref() else {
        return String::new();
    };

    let mut out = format!("❓ {}", question.prompt);

    if let Some(hint) = &question.hint {
        out.push_str(&format!("\n💡 提示: {}", hint));
    }

    for (i, choice) in question.choices.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, choice));
    }

    match &session.selected_choice {
        Some(choice) => out.push_str(&format!("\n已选: {}（空行确认提交）", choice)),
        None => out.push_str("\n输入序号或内容选择答案"),
    }

    out
}

fn render_result(session: &Session) -> String {
    let mut out = if session.is_correct == Some(true) {
        "✅ 回答正确！".to_string()
    } else {
        "结果已出".to_string()
    };

    if let Some(question) = &session.current_question {
        if !question.reward_points.is_empty() {
            let points: Vec<String> = question
                .reward_points
                .iter()
                .map(|p| p.to_string())
                .collect();
            out.push_str(&format!(" 🎁 获得积分: {}", points.join(" + ")));
        }
    }

    out.push_str("\n回车扫下一题，输入 q 退出");
    out
}
