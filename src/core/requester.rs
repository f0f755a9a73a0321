use crate::domain::ports::TextGenerator;
use crate::utils::error::GenerationError;
use std::time::Duration;

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// 向生成服務請求文字，並套用逾時
pub struct ContentRequester<G: TextGenerator> {
    generator: G,
    timeout: Duration,
}

impl<G: TextGenerator> ContentRequester<G> {
    pub fn new(generator: G, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn request(&self, prompt: &str) -> Result<String, GenerationError> {
        tracing::debug!("Requesting generation ({} chars prompt)", prompt.len());

        let text = match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(GenerationError::Failed(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f32()
                )))
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(Result<String, GenerationError>);

    #[async_trait]
    impl TextGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            self.0.clone()
        }
    }

    struct Stalled;

    #[async_trait]
    impl TextGenerator for Stalled {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test]
    async fn test_returns_trimmed_text() {
        let requester = ContentRequester::new(
            Fixed(Ok("  Good Morning, coders!\n".to_string())),
            DEFAULT_GENERATION_TIMEOUT,
        );
        assert_eq!(
            requester.request("hello").await.unwrap(),
            "Good Morning, coders!"
        );
    }

    #[tokio::test]
    async fn test_empty_generation_is_a_failure() {
        let requester =
            ContentRequester::new(Fixed(Ok(" \n ".to_string())), DEFAULT_GENERATION_TIMEOUT);
        assert_eq!(requester.request("hello").await, Err(GenerationError::Empty));
    }

    #[tokio::test]
    async fn test_collaborator_error_is_passed_through() {
        let requester = ContentRequester::new(
            Fixed(Err(GenerationError::Failed("quota exceeded".to_string()))),
            DEFAULT_GENERATION_TIMEOUT,
        );
        assert_eq!(
            requester.request("hello").await,
            Err(GenerationError::Failed("quota exceeded".to_string()))
        );
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let requester = ContentRequester::new(Stalled, Duration::from_millis(50));
        match requester.request("hello").await {
            Err(GenerationError::Failed(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout failure, got {:?}", other),
        }
    }
}
