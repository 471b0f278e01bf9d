use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::FileKvStore;
use crate::models::{Answer, QuestionKind, SkillLevel};
use crate::services::{self, AnswerStore, Gateway, RegistrationForm};
use crate::utils::logging::{log_question, log_review_summary, log_startup};
use crate::workflow::{greeting_name, Countdown, FlowState, SurveyFlow};

/// 应用主结构
pub struct App {
    config: Config,
    store: FileKvStore,
}

/// 一次会话的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 问卷已提交，倒计时结束
    Submitted,
    /// 用户中途退出（进度已保存）
    Quit,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let store = FileKvStore::new(&config.storage_file);
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 从标准输入运行一次完整会话
    pub async fn run(&self) -> Result<SessionOutcome> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// 使用指定输入运行一次完整会话：登记 → 作答 → 提交 → 倒计时
    pub async fn run_with<R: AsyncBufRead + Unpin>(&self, input: R) -> Result<SessionOutcome> {
        let mut console = Console::new(input);
        let answer_store = AnswerStore::new(self.store.clone());

        // ========== 登记 ==========
        let Some(form) = read_registration(&mut console, &answer_store).await? else {
            return Ok(SessionOutcome::Quit);
        };
        services::register_participant(&answer_store, form).context("登记失败")?;

        // ========== 作答 ==========
        let gateway = Gateway::from_config(&self.config, self.store.clone());
        let mut flow = SurveyFlow::start(answer_store, gateway, self.config.track_policy)
            .context("无法开始问卷")?;

        loop {
            render_question(&flow);
            let Some(line) = console.read_line("> ").await? else {
                info!("输入结束，进度已保存");
                return Ok(SessionOutcome::Quit);
            };

            match line.as_str() {
                ":q" => {
                    info!("用户退出，进度已保存");
                    return Ok(SessionOutcome::Quit);
                }
                ":p" => {
                    flow.retreat();
                    continue;
                }
                "" => {}
                _ => {
                    let handled = apply_input(&mut flow, &line);
                    if let Err(e) = handled {
                        println!("  ⚠️ {}", e);
                        continue;
                    }
                    if flow.current_question().kind() == QuestionKind::Multiple {
                        continue;
                    }
                }
            }

            if !flow.can_advance() {
                println!("  (please answer this question first)");
                continue;
            }

            let submitting = flow.is_last();
            if submitting {
                println!("  Submitting...");
            }
            match flow.advance_and_submit().await {
                FlowState::Done => break,
                FlowState::Answering(_) if submitting => {
                    println!("  Submission failed. Press Enter to try again.");
                }
                _ => {}
            }
        }

        // ========== 感谢页 ==========
        let store = flow.store();
        println!("\nThanks, {}, for participating!", greeting_name(store));
        println!("Your responses have been successfully recorded.");
        Countdown::from_config(&self.config)
            .run(store, |left| {
                println!("Redirecting you back to the start in {} seconds...", left)
            })
            .await;

        Ok(SessionOutcome::Submitted)
    }

    /// 打印本地保存的提交记录统计
    pub fn review(&self) -> Result<()> {
        let (records, summary) = services::summarize(&self.store);
        log_review_summary(&summary);
        for record in &records {
            println!(
                "#{} {} ({}, {}) - {} - {} answers",
                record.id,
                record.name,
                record.department,
                record.skill_level,
                record.completed_at,
                record.survey_answers.len()
            );
        }
        Ok(())
    }
}

/// 逐行读取输入
struct Console<R> {
    lines: tokio::io::Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
        }
    }

    /// 读取一行（去除首尾空白），输入结束时返回 `None`
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        use std::io::Write;
        let _ = std::io::stdout().flush();
        let line = self.lines.next_line().await.context("读取输入失败")?;
        Ok(line.map(|l| l.trim().to_string()))
    }
}

/// 读取登记表，空输入保留回填值
async fn read_registration<R: AsyncBufRead + Unpin, S: crate::infrastructure::KvStore>(
    console: &mut Console<R>,
    store: &AnswerStore<S>,
) -> Result<Option<RegistrationForm>> {
    let mut form = services::prefill_form(store);
    println!("Welcome to SOE Survey");

    loop {
        for (label, field) in [
            ("Full Name", &mut form.name),
            ("Nickname", &mut form.nickname),
            ("Department", &mut form.department),
        ] {
            let Some(value) = console.read_line(&format!("{} [{}]: ", label, field)).await? else {
                return Ok(None);
            };
            if !value.is_empty() {
                *field = value;
            }
        }

        let levels: Vec<&str> = SkillLevel::ALL.iter().map(|l| l.name()).collect();
        let prompt = format!("Skill Level ({}) [{}]: ", levels.join("/"), form.skill_level);
        let Some(value) = console.read_line(&prompt).await? else {
            return Ok(None);
        };
        if !value.is_empty() {
            match parse_skill_level(&value) {
                Some(level) => form.skill_level = level,
                None => warn!("无法识别的技能等级: {}", value),
            }
        }

        if [&form.name, &form.department, &form.nickname]
            .iter()
            .all(|f| !f.trim().is_empty())
        {
            return Ok(Some(form));
        }
        println!("  Name, nickname and department are all required.");
    }
}

/// 技能等级：名称或 1-4 的序号
fn parse_skill_level(value: &str) -> Option<SkillLevel> {
    SkillLevel::from_name(value).or_else(|| {
        value
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| SkillLevel::ALL.get(i).copied())
    })
}

/// 把一行输入应用到当前题目
fn apply_input<S, G>(flow: &mut SurveyFlow<S, G>, line: &str) -> crate::error::AppResult<()>
where
    S: crate::infrastructure::KvStore,
    G: services::SubmissionGateway,
{
    let question = flow.current_question().clone();
    match question.kind() {
        QuestionKind::Text => flow.set_text(line),
        QuestionKind::Single => match pick_options(question.options(), line).first() {
            Some(option) => flow.select_option(option),
            None => flow.select_option(line),
        },
        QuestionKind::Multiple => {
            let picked = pick_options(question.options(), line);
            if picked.is_empty() {
                return flow.toggle_option(line);
            }
            for option in picked {
                flow.toggle_option(&option)?;
            }
            Ok(())
        }
    }
}

/// 解析 "1, 3 4" 形式的序号列表，越界的序号忽略
fn pick_options(options: &[String], line: &str) -> Vec<String> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|token| token.parse::<usize>().ok())
        .filter_map(|n| n.checked_sub(1).and_then(|i| options.get(i)).cloned())
        .collect()
}

fn render_question<S, G>(flow: &SurveyFlow<S, G>)
where
    S: crate::infrastructure::KvStore,
    G: services::SubmissionGateway,
{
    let question = flow.current_question();
    log_question(flow.cursor(), flow.total(), question.prompt());

    println!("\nQuestion {} / {}", flow.cursor() + 1, flow.total());
    println!("{}", question.prompt());

    let answer = flow.current_answer();
    match question.kind() {
        QuestionKind::Text => {
            if let Some(Answer::Text(text)) = answer {
                println!("  current answer: {}", text);
            }
        }
        QuestionKind::Single | QuestionKind::Multiple => {
            for (i, option) in question.options().iter().enumerate() {
                let selected = match answer {
                    Some(Answer::Text(choice)) => choice == option,
                    Some(Answer::Choices(choices)) => choices.contains(option),
                    None => false,
                };
                println!("  [{}] {}. {}", if selected { "x" } else { " " }, i + 1, option);
            }
        }
    }

    let hint = match (question.kind(), flow.is_last()) {
        (QuestionKind::Multiple, true) => "toggle numbers, Enter to submit, :p previous, :q quit",
        (QuestionKind::Multiple, false) => "toggle numbers, Enter for next, :p previous, :q quit",
        (_, true) => "answer to submit, :p previous, :q quit",
        (_, false) => "answer to continue, :p previous, :q quit",
    };
    println!("  ({})", hint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_options() {
        let options: Vec<String> = ["Python", "Java", "Other"].iter().map(|s| s.to_string()).collect();
        assert_eq!(pick_options(&options, "1, 3"), vec!["Python", "Other"]);
        assert_eq!(pick_options(&options, "2 9 x"), vec!["Java"]);
        assert!(pick_options(&options, "0").is_empty());
    }

    #[test]
    fn test_parse_skill_level() {
        assert_eq!(parse_skill_level("3"), Some(SkillLevel::Expert));
        assert_eq!(parse_skill_level("intermediate"), Some(SkillLevel::Intermediate));
        assert_eq!(parse_skill_level("5"), None);
        assert_eq!(parse_skill_level("0"), None);
    }
}
