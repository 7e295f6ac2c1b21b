//! Completion gateway decorator that retries with backoff

use super::backoff::BackoffPolicy;
use crate::ports::llm_gateway::{
    CompletionGateway, CompletionRequest, CompletionResponse, GatewayError,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Wraps a [`CompletionGateway`] so every call goes through a [`BackoffPolicy`].
pub struct RetryingGateway {
    inner: Arc<dyn CompletionGateway>,
    policy: BackoffPolicy,
}

impl RetryingGateway {
    pub fn new(inner: Arc<dyn CompletionGateway>, policy: BackoffPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }
}

#[async_trait]
impl CompletionGateway for RetryingGateway {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let inner = &self.inner;
        self.policy.run(move || inner.complete(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tuned_domain::ChatMessage;

    struct FlakyGateway {
        failures_left: Mutex<u32>,
        calls: Mutex<u32>,
    }

    impl FlakyGateway {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionGateway for FlakyGateway {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(GatewayError::Connection("reset by peer".to_string()));
            }
            Ok(CompletionResponse::from_text("cmpl-1", "ok"))
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![ChatMessage::user("hi")],
            model: "gpt-test".to_string(),
            temperature: 0.5,
            max_tokens: 100,
        }
    }

    fn fast_policy(retries: u32) -> BackoffPolicy {
        BackoffPolicy::new(retries, Duration::from_millis(10)).with_jitter(Duration::ZERO)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let inner = Arc::new(FlakyGateway::new(2));
        let gateway = RetryingGateway::new(inner.clone(), fast_policy(5));

        let response = gateway.complete(&request()).await.unwrap();

        assert_eq!(response.first_text(), Some("ok"));
        assert_eq!(*inner.calls.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_surfaces_last_error_when_budget_spent() {
        let inner = Arc::new(FlakyGateway::new(10));
        let gateway = RetryingGateway::new(inner.clone(), fast_policy(4));

        let err = gateway.complete(&request()).await.unwrap_err();

        assert!(matches!(err, GatewayError::Connection(_)));
        assert_eq!(*inner.calls.lock().unwrap(), 4);
    }
}
