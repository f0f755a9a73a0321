use crate::core::selector::{BandSchedule, BandSpan, GreetingSelector, GreetingSource, HolidayTable};
use crate::domain::model::Band;
use crate::utils::error::{BotError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_GREETING_PROMPT: &str = "Generate a very short, cheerful, and creative 'Good {band}' message, \
specifically for a Telegram bot that sends daily tech updates. \
Make it concise, inviting, and include a positive, tech-related touch. Avoid emojis.";

pub const DEFAULT_BLOG_PROMPT: &str = "Generate a short, engaging, and funny blog post (around 150-200 words) \
about a random, interesting, and often humorous aspect of technology. \
The topic should be quirky, cutting-edge, or a relatable observation about tech culture. \
Make it suitable for a casual audience on Telegram. Focus on a single, specific topic. \
Do not include a title. Start directly with the content. Avoid lists or bullet points. \
Make sure it's genuinely amusing and light-hearted.";

pub const DEFAULT_BLOG_HEADER: &str = "Tech Tidbit:";

/// 問候策略設定 (TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingPolicy {
    #[serde(default)]
    pub bands: BandConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default = "default_holidays")]
    pub holidays: Vec<HolidayConfig>,
    #[serde(default)]
    pub blog: BlogConfig,
}

impl Default for GreetingPolicy {
    fn default() -> Self {
        Self {
            bands: BandConfig::default(),
            source: SourceConfig::default(),
            holidays: default_holidays(),
            blog: BlogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandPreset {
    /// 晚上從 17 點開始
    EarlyEvening,
    /// 晚上從 18 點開始
    #[default]
    LateAfternoon,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandConfig {
    #[serde(default)]
    pub preset: BandPreset,
    #[serde(default)]
    pub night_greetings: bool,
    /// 設定後取代 preset
    pub spans: Option<Vec<BandSpan>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Generated,
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "default_greeting_prompt")]
    pub prompt_template: String,
    #[serde(default)]
    pub pool: PoolConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            prompt_template: default_greeting_prompt(),
            pool: PoolConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub morning: Vec<String>,
    pub afternoon: Vec<String>,
    pub evening: Vec<String>,
    pub night: Vec<String>,
}

impl PoolConfig {
    pub fn messages(&self, band: Band) -> &[String] {
        match band {
            Band::Morning => &self.morning,
            Band::Afternoon => &self.afternoon,
            Band::Evening => &self.evening,
            Band::Night => &self.night,
        }
    }

    fn into_map(self) -> HashMap<Band, Vec<String>> {
        HashMap::from([
            (Band::Morning, self.morning),
            (Band::Afternoon, self.afternoon),
            (Band::Evening, self.evening),
            (Band::Night, self.night),
        ])
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            morning: owned(&[
                "Good Morning! Fresh coffee, fresh commits, fresh ideas.",
                "Good Morning! May your builds be green and your inbox be light.",
                "Rise and shine! Today's a great day to ship something small and good.",
            ]),
            afternoon: owned(&[
                "Good Afternoon! Halfway there, keep those tests passing.",
                "Good Afternoon! A perfect time to refactor that one function.",
                "Good Afternoon! Hydrate, stretch, and push your changes.",
            ]),
            evening: owned(&[
                "Good Evening! Time to close the laptop on a job well done.",
                "Good Evening! Tomorrow's bugs can wait until tomorrow.",
                "Good Evening! Celebrate today's merged pull requests.",
            ]),
            night: owned(&[
                "Good Night! The servers are watching, so you can rest.",
                "Good Night! Sleep well, the cron jobs have it covered.",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayConfig {
    pub month: u32,
    pub day: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    #[serde(default = "default_blog_prompt")]
    pub prompt: String,
    #[serde(default = "default_blog_header")]
    pub header: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            prompt: default_blog_prompt(),
            header: default_blog_header(),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_greeting_prompt() -> String {
    DEFAULT_GREETING_PROMPT.to_string()
}

fn default_blog_prompt() -> String {
    DEFAULT_BLOG_PROMPT.to_string()
}

fn default_blog_header() -> String {
    DEFAULT_BLOG_HEADER.to_string()
}

fn default_holidays() -> Vec<HolidayConfig> {
    vec![
        HolidayConfig {
            month: 1,
            day: 1,
            message: "Happy New Year! May your code compile on the first try all year long."
                .to_string(),
        },
        HolidayConfig {
            month: 12,
            day: 25,
            message: "Merry Christmas! Wishing you a joyful holiday and a bug-free new year."
                .to_string(),
        },
    ]
}

impl GreetingPolicy {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOLIDAY_MESSAGE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BotError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn schedule(&self) -> BandSchedule {
        match &self.bands.spans {
            Some(spans) => BandSchedule::new(spans.clone()),
            None => match self.bands.preset {
                BandPreset::EarlyEvening => BandSchedule::early_evening(),
                BandPreset::LateAfternoon => BandSchedule::late_afternoon(),
            },
        }
    }

    pub fn holiday_table(&self) -> HolidayTable {
        let mut table = HolidayTable::new();
        for holiday in &self.holidays {
            table.insert(holiday.month, holiday.day, holiday.message.clone());
        }
        table
    }

    pub fn greeting_source(&self) -> GreetingSource {
        match self.source.kind {
            SourceKind::Generated => {
                GreetingSource::GeneratedPrompt(self.source.prompt_template.clone())
            }
            SourceKind::Static => GreetingSource::StaticPool(self.source.pool.clone().into_map()),
        }
    }

    pub fn selector(&self) -> GreetingSelector {
        GreetingSelector::new(
            self.schedule(),
            self.bands.night_greetings,
            self.holiday_table(),
            self.greeting_source(),
        )
    }

    fn validate_spans(spans: &[BandSpan]) -> Result<()> {
        let mut covered: [Option<Band>; 24] = [None; 24];

        for span in spans {
            validate_range("bands.spans.start", span.start, 0, 23)?;
            validate_range("bands.spans.end", span.end, 0, 24)?;
            if span.start == span.end {
                return Err(BotError::InvalidConfigValueError {
                    field: "bands.spans".to_string(),
                    value: format!("{}..{}", span.start, span.end),
                    reason: "Span cannot be empty".to_string(),
                });
            }

            for hour in (0..24).filter(|h| span.contains(*h)) {
                if let Some(existing) = covered[hour as usize] {
                    return Err(BotError::ConfigValidationError {
                        field: "bands.spans".to_string(),
                        message: format!(
                            "Hour {} is covered by both {} and {}",
                            hour, existing, span.band
                        ),
                    });
                }
                covered[hour as usize] = Some(span.band);
            }
        }

        let gaps = covered.iter().filter(|c| c.is_none()).count();
        if gaps > 0 {
            tracing::warn!("Band spans leave {} hour(s) without a greeting", gaps);
        }
        Ok(())
    }
}

impl Validate for GreetingPolicy {
    fn validate(&self) -> Result<()> {
        if let Some(spans) = &self.bands.spans {
            Self::validate_spans(spans)?;
        }

        for holiday in &self.holidays {
            validate_range("holidays.month", holiday.month, 1, 12)?;
            // 閏年，讓 2/29 可用
            if NaiveDate::from_ymd_opt(2024, holiday.month, holiday.day).is_none() {
                return Err(BotError::InvalidConfigValueError {
                    field: "holidays.day".to_string(),
                    value: holiday.day.to_string(),
                    reason: format!("month {} has no day {}", holiday.month, holiday.day),
                });
            }
            validate_non_empty_string("holidays.message", &holiday.message)?;
        }

        match self.source.kind {
            SourceKind::Generated => {
                validate_non_empty_string("source.prompt_template", &self.source.prompt_template)?
            }
            SourceKind::Static => {
                if Band::ALL
                    .iter()
                    .all(|band| self.source.pool.messages(*band).is_empty())
                {
                    return Err(BotError::ConfigValidationError {
                        field: "source.pool".to_string(),
                        message: "Static source needs at least one message".to_string(),
                    });
                }
            }
        }

        validate_non_empty_string("blog.prompt", &self.blog.prompt)?;
        Ok(())
    }
}
