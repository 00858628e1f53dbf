/*!
 * Tests for the provider trait surface and its error classification
 */

use anyhow::Result;
use lexitra::errors::ProviderError;
use lexitra::providers::{MockProvider, Provider};

/// Drives a provider the way the assembler does: build, complete, extract
async fn complete_prompt<P: Provider>(provider: &P, prompt: &str) -> Result<String, ProviderError> {
    let request = provider.build_request(prompt);
    let response = provider.complete(request).await?;
    Ok(P::extract_text(&response))
}

/// Tests the full trait round trip on a working provider
#[tokio::test]
async fn test_providerTrait_withWorkingMock_shouldRoundTripPrompt() -> Result<()> {
    let provider = MockProvider::working();
    let text = complete_prompt(&provider, "merge entry 23").await?;
    assert_eq!(text, "[GENERATED] merge entry 23");
    assert_eq!(provider.request_count(), 1);
    Ok(())
}

/// Tests that an exhausted script surfaces as an empty-response error
#[tokio::test]
async fn test_scriptedMock_whenExhausted_shouldReportEmptyResponse() -> Result<()> {
    let provider = MockProvider::scripted(vec!["only one".to_string()]);
    complete_prompt(&provider, "first").await?;

    let err = complete_prompt(&provider, "second").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse(_)), "Got {:?}", err);
    assert!(!err.is_retryable(), "An exhausted script will not recover on retry");
    Ok(())
}

/// Tests the connection probe on both a healthy and a failing provider
#[tokio::test]
async fn test_testConnection_shouldReflectProviderHealth() -> Result<()> {
    assert!(MockProvider::working().test_connection().await.is_ok());

    let err = MockProvider::failing().test_connection().await.unwrap_err();
    assert!(matches!(err, ProviderError::ConnectionError(_)), "Got {:?}", err);
    Ok(())
}

/// Tests which errors the retry loop is allowed to retry
#[test]
fn test_providerError_isRetryable_shouldOnlyCoverTransientKinds() {
    assert!(ProviderError::ConnectionError("refused".to_string()).is_retryable());
    assert!(ProviderError::RequestFailed("timeout".to_string()).is_retryable());

    let api = ProviderError::ApiError { status_code: 500, message: "boom".to_string() };
    assert!(!api.is_retryable(), "API errors repeat on retry");
    assert!(!ProviderError::ContextOverflow("too big".to_string()).is_retryable());
    assert!(!ProviderError::EmptyResponse("blank".to_string()).is_retryable());
}
