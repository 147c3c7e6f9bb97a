//! Mock image generator for testing and development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::foundation::UserId;
use crate::domain::rendering::RenderedPrompt;
use crate::ports::{ImageError, ImageGenerator, ImageHandle};

/// Image generator that fabricates handles without calling any provider.
#[derive(Debug, Default)]
pub struct MockImageGenerator {
    counter: AtomicU64,
    /// Flat cost reported per generation, in USD cents.
    cost_cents: u32,
}

impl MockImageGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            cost_cents: 4,
        }
    }

    /// Overrides the reported per-image cost.
    pub fn with_cost_cents(mut self, cost_cents: u32) -> Self {
        self.cost_cents = cost_cents;
        self
    }

    /// How many generations were requested.
    pub fn generations(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(
        &self,
        user_id: &UserId,
        _prompt: &RenderedPrompt,
    ) -> Result<ImageHandle, ImageError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(ImageHandle {
            image_id: format!("mock-{}-{}", user_id, n),
            cost_cents: self.cost_cents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rendering::PromptSpec;

    #[tokio::test]
    async fn handles_are_unique_and_costed() {
        let generator = MockImageGenerator::new().with_cost_cents(7);
        let user = UserId::new("u1").unwrap();
        let prompt = RenderedPrompt::new("(dress:1.20)".to_string(), PromptSpec::default());

        let a = generator.generate(&user, &prompt).await.unwrap();
        let b = generator.generate(&user, &prompt).await.unwrap();

        assert_ne!(a.image_id, b.image_id);
        assert_eq!(a.cost_cents, 7);
        assert_eq!(generator.generations(), 2);
    }
}
