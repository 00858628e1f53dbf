/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, echoing a canned completion
 * - `MockProvider::scripted(..)` - Replays a fixed sequence of completions
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::overflowing()` - Always reports a context overflow
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The prompt the pipeline composed
    pub prompt: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The completion text
    pub text: String,
    /// Simulated prompt tokens
    pub prompt_tokens: Option<u64>,
    /// Simulated completion tokens
    pub completion_tokens: Option<u64>,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a canned completion
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Always reports a context overflow
    Overflowing,
    /// Returns an empty completion
    Empty,
    /// Replays queued completions in order
    Scripted,
}

/// Mock provider for testing pipeline behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared across clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
    /// Queued completions for scripted mode
    script: Arc<Mutex<VecDeque<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
            script: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that always reports a context overflow
    pub fn overflowing() -> Self {
        Self::new(MockBehavior::Overflowing)
    }

    /// Create a mock that returns empty completions
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that replays the given completions in order.
    /// Requests past the end of the script fail with an empty-response error.
    pub fn scripted(responses: Vec<String>) -> Self {
        let provider = Self::new(MockBehavior::Scripted);
        *provider.script.lock() = responses.into();
        provider
    }

    /// Set a custom response generator for working mode
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
            script: Arc::clone(&self.script),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    fn build_request(&self, prompt: &str) -> MockRequest {
        MockRequest { prompt: prompt.to_string() }
    }

    async fn complete(&self, request: MockRequest) -> Result<MockResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => {
                let text = if let Some(generator) = self.custom_response {
                    generator(&request)
                } else {
                    format!("[GENERATED] {}", request.prompt)
                };

                Ok(MockResponse {
                    text,
                    prompt_tokens: Some(request.prompt.len() as u64),
                    completion_tokens: Some((request.prompt.len() / 2) as u64),
                })
            }

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse {
                        text: format!("[GENERATED] {}", request.prompt),
                        prompt_tokens: Some(10),
                        completion_tokens: Some(10),
                    })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Overflowing => Err(ProviderError::ContextOverflow(
                "Simulated context overflow".to_string(),
            )),

            MockBehavior::Empty => Ok(MockResponse {
                text: String::new(),
                prompt_tokens: Some(0),
                completion_tokens: Some(0),
            }),

            MockBehavior::Scripted => match self.script.lock().pop_front() {
                Some(text) => Ok(MockResponse {
                    text,
                    prompt_tokens: Some(10),
                    completion_tokens: Some(10),
                }),
                None => Err(ProviderError::EmptyResponse(
                    "script exhausted".to_string(),
                )),
            },
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => {
                Err(ProviderError::ConnectionError("Simulated connection failure".to_string()))
            }
            _ => Ok(()),
        }
    }

    fn extract_text(response: &MockResponse) -> String {
        response.text.clone()
    }
}
