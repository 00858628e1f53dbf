/*!
 * Generation-service clients.
 *
 * This module contains client implementations for the services that produce
 * translations:
 * - Chat: OpenAI-compatible chat-completions server (LM Studio, llama.cpp,
 *   vLLM and similar local servers)
 * - Mock: scripted responses for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all generation providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing the assembly pipeline to drive them interchangeably.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Build a request carrying the given prompt, with the provider's
    /// configured model and sampling settings
    fn build_request(&self, prompt: &str) -> Self::Request;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract the completion text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted text
    fn extract_text(response: &Self::Response) -> String;
}

pub mod chat;
pub mod mock;

pub use chat::ChatApi;
pub use mock::MockProvider;
