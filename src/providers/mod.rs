/*!
 * Client implementations for generation services.
 *
 * This module contains the boundary to the external generation service:
 * - Ollama: Local LLM server
 * - Mock: Deterministic client for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::translation::profiles::GenerationProfile;

/// Common trait for generation service clients
///
/// The pipeline is agnostic to the wire protocol; it only needs a blocking
/// call contract plus a way to test reachability and model availability
/// before starting a run.
#[async_trait]
pub trait GenerationClient: Send + Sync + Debug {
    /// Generate text for a prompt using the given decoding profile
    ///
    /// # Arguments
    /// * `prompt` - The full prompt including the chunk text
    /// * `profile` - Decoding parameters for this attempt
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The generated text, possibly empty
    async fn generate(
        &self,
        prompt: &str,
        profile: &GenerationProfile,
    ) -> Result<String, ProviderError>;

    /// Test whether the service is reachable
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Test whether a model is available on the service
    async fn model_available(&self, model: &str) -> Result<bool, ProviderError>;
}

pub mod mock;
pub mod ollama;
