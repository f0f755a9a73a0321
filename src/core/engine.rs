use crate::config::RunConfig;
use crate::core::notifier::Notifier;
use crate::core::requester::ContentRequester;
use crate::core::selector::GreetingSelector;
use crate::domain::model::{
    Formatting, Greeting, GreetingContext, OutboundMessage, RunReport, StepOutcome,
};
use crate::domain::ports::{Messenger, TextGenerator};
use crate::utils::error::{GenerationError, Result};
use chrono::{DateTime, Utc};
use rand::Rng;

/// 單次排程執行：問候 -> 技術短文 -> 結束
pub struct RunEngine<'a, G: TextGenerator, M: Messenger> {
    config: &'a RunConfig,
    selector: GreetingSelector,
    requester: ContentRequester<G>,
    notifier: Notifier<M>,
}

impl<'a, G: TextGenerator, M: Messenger> RunEngine<'a, G, M> {
    pub fn new(config: &'a RunConfig, generator: G, messenger: M) -> Self {
        Self {
            config,
            selector: config.policy.selector(),
            requester: ContentRequester::new(generator, config.generation_timeout),
            notifier: Notifier::new(messenger),
        }
    }

    /// 只做選擇，不呼叫任何外部服務
    pub fn preview<R: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut R) -> Option<Greeting> {
        self.selector.select(&GreetingContext::from_utc(now), rng)
    }

    pub async fn run<R: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut R) -> RunReport {
        tracing::info!(
            "🚀 Starting scheduled run at {} UTC",
            now.format("%Y-%m-%d %H:%M")
        );

        let ctx = GreetingContext::from_utc(now);
        let greeting = self.send_greeting(&ctx, rng).await;
        let blog = self.send_blog().await;

        let report = RunReport { greeting, blog };
        tracing::info!(
            "🏁 Run finished: greeting={:?}, blog={:?}",
            report.greeting,
            report.blog
        );
        report
    }

    async fn send_greeting<R: Rng + ?Sized>(
        &self,
        ctx: &GreetingContext,
        rng: &mut R,
    ) -> StepOutcome {
        let text = match self.selector.select(ctx, rng) {
            None => {
                tracing::info!("No greeting scheduled for {}:00 UTC", ctx.hour);
                return StepOutcome::Skipped;
            }
            Some(Greeting::Ready(text)) => text,
            Some(Greeting::Prompt(prompt)) => match self.requester.request(&prompt).await {
                Ok(text) => text,
                Err(e) => return self.generation_failed("greeting", e).await,
            },
        };

        tracing::info!("Generated Greeting:\n{}", text);
        self.deliver(OutboundMessage::new(text, Formatting::Italic))
            .await
    }

    async fn send_blog(&self) -> StepOutcome {
        let blog = &self.config.policy.blog;
        let text = match self.requester.request(&blog.prompt).await {
            Ok(text) => text,
            Err(e) => return self.generation_failed("blog", e).await,
        };

        tracing::info!("Generated Tech Blog:\n{}", text);
        self.deliver(OutboundMessage::plain(text).map(|m| m.with_header(blog.header.as_str())))
            .await
    }

    async fn deliver(&self, message: Result<OutboundMessage>) -> StepOutcome {
        let outcome = match message {
            Ok(message) => self.notifier.notify(&self.config.chat_id, &message).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => StepOutcome::Sent,
            Err(e) => StepOutcome::DeliveryFailed(e.to_string()),
        }
    }

    async fn generation_failed(&self, step: &str, err: GenerationError) -> StepOutcome {
        tracing::warn!("⚠️ Skipping {} send: {}", step, err);

        if let Some(operator) = &self.config.operator_chat_id {
            let alert = format!("⚠️ Content generation failed: {}", err);
            if let Ok(message) = OutboundMessage::plain(alert) {
                // 通知失敗也只記錄
                let _ = self.notifier.notify(operator, &message).await;
            }
        }

        StepOutcome::GenerationFailed(err.to_string())
    }
}
