/*!
 * Mock generation client for testing.
 *
 * This module provides a client that simulates the behaviors the pipeline
 * has to survive:
 * - `MockClient::working()` - Always returns valid translated text
 * - `MockClient::empty()` - Always returns an empty result
 * - `MockClient::unreachable()` - Fails with a connection error
 * - `MockClient::model_missing()` - Fails with a missing-model error
 * - `MockClient::untranslated()` - Echoes the prompt back unprocessed
 * - `MockClient::markup()` - Returns non-empty output that fails validation
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::GenerationClient;
use crate::translation::profiles::GenerationProfile;

/// Valid translated output, all Hangul, comfortably above the length floor
const SAMPLE_TRANSLATION: &str = "조용한 아침이었다. 번역된 문장이 이어지고 이야기는 계속된다.";

/// Behavior mode for the mock client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always returns a valid translation
    Working,
    /// Returns an empty result
    Empty,
    /// Fails with a connection error
    Unreachable,
    /// Fails with a missing-model error
    ModelMissing,
    /// Echoes the prompt back without translating
    Untranslated,
    /// Returns non-empty output polluted with markup
    Markup,
    /// Returns empty results for the first N calls, then valid output
    EmptyThenWorking { empty_calls: usize },
}

/// Mock generation client with a counted, deterministic behavior
#[derive(Debug, Clone)]
pub struct MockClient {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of generate calls made across clones
    call_count: Arc<AtomicUsize>,
}

impl MockClient {
    /// Create a new mock client with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock client that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock client that returns empty results
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock client that cannot reach the service
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    /// Create a mock client whose model is missing
    pub fn model_missing() -> Self {
        Self::new(MockBehavior::ModelMissing)
    }

    /// Create a mock client that echoes prompts back untranslated
    pub fn untranslated() -> Self {
        Self::new(MockBehavior::Untranslated)
    }

    /// Create a mock client that returns markup-polluted output
    pub fn markup() -> Self {
        Self::new(MockBehavior::Markup)
    }

    /// Number of generate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for MockClient {
    async fn generate(
        &self,
        prompt: &str,
        _profile: &GenerationProfile,
    ) -> Result<String, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(SAMPLE_TRANSLATION.to_string()),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "mock service is unreachable".to_string(),
            )),
            MockBehavior::ModelMissing => {
                Err(ProviderError::ModelNotFound("mock-model".to_string()))
            }
            MockBehavior::Untranslated => Ok(prompt.to_string()),
            MockBehavior::Markup => Ok(format!("<p>{}</p>", SAMPLE_TRANSLATION)),
            MockBehavior::EmptyThenWorking { empty_calls } => {
                if call < empty_calls {
                    Ok(String::new())
                } else {
                    Ok(SAMPLE_TRANSLATION.to_string())
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "mock service is unreachable".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn model_available(&self, _model: &str) -> Result<bool, ProviderError> {
        match self.behavior {
            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "mock service is unreachable".to_string(),
            )),
            MockBehavior::ModelMissing => Ok(false),
            _ => Ok(true),
        }
    }
}
