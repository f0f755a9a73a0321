use crate::utils::error::{BotError, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一天中的時段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Morning, Band::Afternoon, Band::Evening, Band::Night];

    pub fn label(&self) -> &'static str {
        match self {
            Band::Morning => "Morning",
            Band::Afternoon => "Afternoon",
            Band::Evening => "Evening",
            Band::Night => "Night",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 執行當下的時間資訊 (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreetingContext {
    pub hour: u32,
    pub month: u32,
    pub day: u32,
}

impl GreetingContext {
    pub fn new(hour: u32, month: u32, day: u32) -> Self {
        Self { hour, month, day }
    }

    pub fn from_utc(now: DateTime<Utc>) -> Self {
        Self {
            hour: now.hour(),
            month: now.month(),
            day: now.day(),
        }
    }
}

/// 選擇器的結果：可直接發送的文字，或需要交給生成服務的提示詞
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Greeting {
    Ready(String),
    Prompt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formatting {
    #[default]
    Plain,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    text: String,
    formatting: Formatting,
    header: Option<String>,
}

impl OutboundMessage {
    pub fn new(text: impl Into<String>, formatting: Formatting) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(BotError::EmptyMessageError);
        }
        Ok(Self {
            text,
            formatting,
            header: None,
        })
    }

    pub fn plain(text: impl Into<String>) -> Result<Self> {
        Self::new(text, Formatting::Plain)
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        let header = header.into();
        self.header = (!header.trim().is_empty()).then_some(header);
        self
    }

    /// 需要 Markdown 解析時回傳 true
    pub fn uses_markup(&self) -> bool {
        self.formatting != Formatting::Plain || self.header.is_some()
    }

    /// 以 Telegram 舊版 Markdown 標記組出最終文字
    pub fn render(&self) -> String {
        let body = match self.formatting {
            Formatting::Plain => self.text.clone(),
            Formatting::Bold => format!("*{}*", self.text),
            Formatting::Italic => format!("_{}_", self.text),
        };
        match &self.header {
            Some(header) => format!("*{}*\n{}", header, body),
            None => body,
        }
    }
}

/// 單一步驟的結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Skipped,
    Sent,
    GenerationFailed(String),
    DeliveryFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub greeting: StepOutcome,
    pub blog: StepOutcome,
}

impl RunReport {
    pub fn sent_count(&self) -> usize {
        [&self.greeting, &self.blog]
            .iter()
            .filter(|o| matches!(o, StepOutcome::Sent))
            .count()
    }
}
