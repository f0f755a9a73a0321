use crate::domain::model::{Band, Greeting, GreetingContext};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 時段範圍，`end` 不含；`start > end` 表示跨午夜
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSpan {
    pub band: Band,
    pub start: u32,
    pub end: u32,
}

impl BandSpan {
    pub fn new(band: Band, start: u32, end: u32) -> Self {
        Self { band, start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            self.start <= hour && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandSchedule {
    spans: Vec<BandSpan>,
}

impl BandSchedule {
    pub fn new(spans: Vec<BandSpan>) -> Self {
        Self { spans }
    }

    /// 下午 12-17、晚上 17-23
    pub fn early_evening() -> Self {
        Self::with_evening_start(17)
    }

    /// 下午 12-18、晚上 18-23
    pub fn late_afternoon() -> Self {
        Self::with_evening_start(18)
    }

    fn with_evening_start(evening_start: u32) -> Self {
        Self::new(vec![
            BandSpan::new(Band::Morning, 5, 12),
            BandSpan::new(Band::Afternoon, 12, evening_start),
            BandSpan::new(Band::Evening, evening_start, 23),
            BandSpan::new(Band::Night, 23, 5),
        ])
    }

    pub fn spans(&self) -> &[BandSpan] {
        &self.spans
    }

    pub fn band_for(&self, hour: u32) -> Option<Band> {
        if hour > 23 {
            return None;
        }
        self.spans
            .iter()
            .find(|span| span.contains(hour))
            .map(|span| span.band)
    }
}

impl Default for BandSchedule {
    fn default() -> Self {
        Self::late_afternoon()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreetingSource {
    StaticPool(HashMap<Band, Vec<String>>),
    /// `{band}` 會被替換為時段名稱
    GeneratedPrompt(String),
}

impl GreetingSource {
    fn pick<R: Rng + ?Sized>(&self, band: Band, rng: &mut R) -> Option<Greeting> {
        match self {
            GreetingSource::StaticPool(pools) => pools
                .get(&band)?
                .choose(rng)
                .map(|message| Greeting::Ready(message.clone())),
            GreetingSource::GeneratedPrompt(template) => Some(Greeting::Prompt(
                template.replace("{band}", band.label()),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayTable {
    entries: HashMap<(u32, u32), String>,
}

impl HolidayTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, month: u32, day: u32, message: impl Into<String>) {
        self.entries.insert((month, day), message.into());
    }

    pub fn lookup(&self, month: u32, day: u32) -> Option<&str> {
        self.entries.get(&(month, day)).map(String::as_str)
    }
}

impl Default for HolidayTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 根據時間選擇問候語
#[derive(Debug, Clone)]
pub struct GreetingSelector {
    schedule: BandSchedule,
    night_greetings: bool,
    holidays: HolidayTable,
    source: GreetingSource,
}

impl GreetingSelector {
    pub fn new(
        schedule: BandSchedule,
        night_greetings: bool,
        holidays: HolidayTable,
        source: GreetingSource,
    ) -> Self {
        Self {
            schedule,
            night_greetings,
            holidays,
            source,
        }
    }

    /// 節日優先；深夜在安靜模式下不發送
    pub fn select<R: Rng + ?Sized>(&self, ctx: &GreetingContext, rng: &mut R) -> Option<Greeting> {
        if let Some(message) = self.holidays.lookup(ctx.month, ctx.day) {
            tracing::debug!("Holiday greeting matched for {}/{}", ctx.month, ctx.day);
            return Some(Greeting::Ready(message.to_string()));
        }

        let Some(band) = self.schedule.band_for(ctx.hour) else {
            tracing::debug!("Hour {} is outside every band", ctx.hour);
            return None;
        };

        if band == Band::Night && !self.night_greetings {
            tracing::debug!("Quiet hours at {}:00 UTC, no greeting", ctx.hour);
            return None;
        }

        tracing::debug!("Hour {} falls in the {} band", ctx.hour, band);
        self.source.pick(band, rng)
    }
}
