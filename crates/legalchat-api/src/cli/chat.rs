//! Interactive terminal chat.
//!
//! One history per run. Typing `q` (any case) or closing stdin ends the
//! session; agent errors end it too and reach `main` unchanged.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use legalchat_core::agent::ReasoningAgent;
use legalchat_core::chat::service::ConversationService;
use legalchat_types::chat::ConversationHistory;

pub const BANNER: &str = "법률 관련 질문에 답변해 드립니다. 종료는 'q'를 입력하세요.";
pub const PROMPT: &str = "질문을 입력해 주세요 : ";
pub const GOODBYE: &str = "프로그램을 종료합니다.";
pub const ANSWER_PREFIX: &str = "답변 : ";

/// One read from the terminal.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// User submitted a question (already trimmed).
    Question(String),
    /// User typed the quit command.
    Quit,
    /// End of input.
    Eof,
}

impl InputEvent {
    /// Classify a raw line; `None` means the input stream is exhausted.
    pub fn from_line(line: Option<String>) -> Self {
        match line {
            None => InputEvent::Eof,
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.eq_ignore_ascii_case("q") {
                    InputEvent::Quit
                } else {
                    InputEvent::Question(trimmed.to_string())
                }
            }
        }
    }
}

/// Run the chat loop over stdin/stdout.
pub async fn run<A: ReasoningAgent>(service: &ConversationService<A>) -> anyhow::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_chat_loop(service, stdin, tokio::io::stdout()).await
}

/// Run the chat loop over arbitrary input and output streams.
pub async fn run_chat_loop<A, R, W>(
    service: &ConversationService<A>,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    A: ReasoningAgent,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut history = ConversationHistory::new();
    let mut lines = input.lines();

    output.write_all(format!("{BANNER}\n").as_bytes()).await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        match InputEvent::from_line(lines.next_line().await?) {
            InputEvent::Quit => {
                output.write_all(format!("{GOODBYE}\n").as_bytes()).await?;
                break;
            }
            InputEvent::Eof => {
                output.write_all(b"\n").await?;
                break;
            }
            InputEvent::Question(question) => {
                let answer = service.process_query(&question, &mut history).await?;
                output
                    .write_all(format!("{ANSWER_PREFIX} {answer}\n").as_bytes())
                    .await?;
            }
        }
    }

    output.flush().await?;
    debug!(turns = history.len(), "chat session ended");
    Ok(())
}
