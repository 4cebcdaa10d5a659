//! LLM content actions over aligned chapter content
//!
//! Consumers of an alignment run want one of three things: a summary, an
//! answer to a question, or the key points. Each action flattens the
//! per-chapter content blocks into a timestamped prompt and invokes the
//! configured provider.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{create_llm, ChatMessage, LLMConfig, LLM};
use crate::align::CombinedResult;
use crate::chapters::ChapterEnd;

/// Content action to run over an aligned video
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Chapter-aware summary of the whole video
    Summarize,
    /// Answer a free-form question from the transcript
    AnswerQuestion { question: String },
    /// Bullet-point extraction of the main takeaways
    ExtractKeyPoints,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Summarize => "summarize",
            ActionKind::AnswerQuestion { .. } => "answer-question",
            ActionKind::ExtractKeyPoints => "extract-key-points",
        }
    }

    /// Parse an action name, attaching the question when one is required.
    pub fn parse(name: &str, question: Option<&str>) -> Result<Self> {
        match name {
            "summarize" => Ok(ActionKind::Summarize),
            "extract-key-points" => Ok(ActionKind::ExtractKeyPoints),
            "answer-question" => {
                let question = question
                    .ok_or_else(|| anyhow!("the answer-question action requires a question"))?;
                Ok(ActionKind::AnswerQuestion {
                    question: question.to_string(),
                })
            }
            other => Err(anyhow!("unknown action: {}", other)),
        }
    }
}

/// Output of one action run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub action: String,
    pub output: String,
    pub model: String,
    pub tokens_used: Option<u32>,
    pub estimated_cost_usd: Option<f64>,
}

/// Runs content actions against the configured LLM provider
pub struct ActionProcessor {
    llm: Box<dyn LLM>,
    model: String,
}

impl ActionProcessor {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        Ok(Self {
            llm: create_llm(config)?,
            model: config.model.clone(),
        })
    }

    /// Processor over an already-built provider; tests inject stubs here.
    pub fn with_llm(llm: Box<dyn LLM>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Run one action over an alignment result.
    pub async fn run(&self, result: &CombinedResult, kind: ActionKind) -> Result<ActionResult> {
        if result.chapters.is_empty() {
            return Err(anyhow!(
                "no chapter content available for video {}",
                result.video_id
            ));
        }

        let flattened = flatten_chapters(result);
        debug!(
            "Prepared {} characters of chapter content for {}",
            flattened.len(),
            kind.name()
        );

        let messages = build_messages(&kind, &flattened);
        let response = self.llm.chat(messages).await?;

        info!(
            "🤖 Action '{}' completed for {} ({} tokens)",
            kind.name(),
            result.video_id,
            response
                .tokens_used
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string())
        );

        Ok(ActionResult {
            action: kind.name().to_string(),
            output: response.content,
            model: self.model.clone(),
            tokens_used: response.tokens_used,
            estimated_cost_usd: response
                .tokens_used
                .and_then(|tokens| estimate_cost_usd(&self.model, tokens)),
        })
    }
}

/// Flatten chapters into timestamped prompt blocks.
pub fn flatten_chapters(result: &CombinedResult) -> String {
    result
        .chapters
        .iter()
        .map(|chapter| {
            let end = match chapter.end_time {
                ChapterEnd::At(end) => format_timestamp(end),
                ChapterEnd::Unbounded => "end".to_string(),
            };
            format!(
                "[{} - {}] {}\n{}",
                format_timestamp(chapter.start_time),
                end,
                chapter.title,
                chapter.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_messages(kind: &ActionKind, flattened: &str) -> Vec<ChatMessage> {
    let system = match kind {
        ActionKind::Summarize => {
            "You are a video content analyzer. You receive a video transcript split into \
             timestamped chapters. Write a concise summary of the whole video, one short \
             paragraph per chapter, preserving chapter order."
        }
        ActionKind::AnswerQuestion { .. } => {
            "You are a video content analyzer. You receive a video transcript split into \
             timestamped chapters. Answer the user's question using only the transcript; \
             cite the chapter title you drew each part of the answer from."
        }
        ActionKind::ExtractKeyPoints => {
            "You are a video content analyzer. You receive a video transcript split into \
             timestamped chapters. Extract 5-10 key takeaways as a bullet list, each with \
             the timestamp of the chapter it comes from."
        }
    };

    let user = match kind {
        ActionKind::AnswerQuestion { question } => {
            format!("Question: {}\n\nTranscript:\n\n{}", question, flattened)
        }
        _ => format!("Transcript:\n\n{}", flattened),
    };

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Blended USD per 1K tokens for the models we route to. Local models cost
/// nothing and report None.
fn estimate_cost_usd(model: &str, tokens: u32) -> Option<f64> {
    let per_1k = [
        ("gpt-4o-mini", 0.000_375),
        ("gpt-4o", 0.007_5),
        ("gemini-1.5-flash", 0.000_3),
        ("gemini-1.5-pro", 0.003_75),
    ]
    .iter()
    .find(|(prefix, _)| model.starts_with(prefix))
    .map(|(_, rate)| *rate)?;

    Some(tokens as f64 / 1000.0 * per_1k)
}

fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
