use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// 交互确认
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> bool;
}

/// 只有明确的肯定回答才算同意
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "是"
    )
}

/// 从标准输入读取回答
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        print!("{} [y/N]: ", question);
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_affirmative(&line),
            Err(e) => {
                tracing::warn!("读取输入失败，视为拒绝: {}", e);
                false
            }
        }
    }
}

/// 按顺序给出预设回答，用完后一律拒绝
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .map(|answer| is_affirmative(&answer))
            .unwrap_or(false)
    }
}
