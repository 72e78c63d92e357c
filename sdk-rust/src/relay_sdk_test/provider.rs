use std::{collections::VecDeque, sync::Mutex};

use crate::{
    errors::{LanguageModelError, LanguageModelResult},
    model_provider::ModelProvider,
    ImageGenerationInput, ImageResponse, LanguageModelInput, ModelInfo, ModelResponse,
};

/// Result for a mocked provider call.
/// It can either be a full response or an error to return.
#[derive(Debug)]
pub enum MockResult<T> {
    Response(T),
    Error(LanguageModelError),
}

impl<T> MockResult<T> {
    /// Construct a result that yields the provided response.
    pub fn response(response: T) -> Self {
        Self::Response(response)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: LanguageModelError) -> Self {
        Self::Error(error)
    }

    fn into_result(self) -> LanguageModelResult<T> {
        match self {
            Self::Response(response) => Ok(response),
            Self::Error(error) => Err(error),
        }
    }
}

impl<T> From<LanguageModelError> for MockResult<T> {
    fn from(error: LanguageModelError) -> Self {
        Self::error(error)
    }
}

impl From<ModelResponse> for MockResult<ModelResponse> {
    fn from(response: ModelResponse) -> Self {
        Self::response(response)
    }
}

impl From<ImageResponse> for MockResult<ImageResponse> {
    fn from(response: ImageResponse) -> Self {
        Self::response(response)
    }
}

impl From<Vec<ModelInfo>> for MockResult<Vec<ModelInfo>> {
    fn from(models: Vec<ModelInfo>) -> Self {
        Self::response(models)
    }
}

#[derive(Default)]
struct MockProviderState {
    mocked_generate_results: VecDeque<MockResult<ModelResponse>>,
    mocked_image_results: VecDeque<MockResult<ImageResponse>>,
    mocked_list_models_results: VecDeque<MockResult<Vec<ModelInfo>>>,
    tracked_generate_inputs: Vec<LanguageModelInput>,
    tracked_image_inputs: Vec<ImageGenerationInput>,
    list_models_calls: usize,
}

impl MockProviderState {
    fn reset(&mut self) {
        self.tracked_generate_inputs.clear();
        self.tracked_image_inputs.clear();
        self.list_models_calls = 0;
    }

    fn restore(&mut self) {
        self.mocked_generate_results.clear();
        self.mocked_image_results.clear();
        self.mocked_list_models_results.clear();
        self.reset();
    }
}

/// A mock provider for testing that tracks inputs and yields predefined
/// outputs in the order they were enqueued.
pub struct MockModelProvider {
    provider: &'static str,
    state: Mutex<MockProviderState>,
}

impl Default for MockModelProvider {
    fn default() -> Self {
        Self {
            provider: "mock",
            state: Mutex::new(MockProviderState::default()),
        }
    }
}

impl MockModelProvider {
    /// Construct a new mock provider instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the provider identifier returned by the mock.
    pub fn set_provider(&mut self, provider: &'static str) {
        self.provider = provider;
    }

    /// Enqueue a mocked `generate` result.
    pub fn enqueue_generate<R>(&self, result: R) -> &Self
    where
        R: Into<MockResult<ModelResponse>>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_generate_results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked `generate_image` result.
    pub fn enqueue_generate_image<R>(&self, result: R) -> &Self
    where
        R: Into<MockResult<ImageResponse>>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_image_results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked `list_models` result.
    pub fn enqueue_list_models<R>(&self, result: R) -> &Self
    where
        R: Into<MockResult<Vec<ModelInfo>>>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_list_models_results.push_back(result.into());
        drop(state);
        self
    }

    /// Retrieve the tracked generate inputs accumulated so far.
    pub fn tracked_generate_inputs(&self) -> Vec<LanguageModelInput> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_generate_inputs.clone()
    }

    /// Retrieve the tracked image generation inputs accumulated so far.
    pub fn tracked_image_inputs(&self) -> Vec<ImageGenerationInput> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_image_inputs.clone()
    }

    /// Number of `list_models` calls made so far.
    pub fn list_models_calls(&self) -> usize {
        let state = self.state.lock().expect("mock state poisoned");
        state.list_models_calls
    }

    /// Number of calls made so far, across every method.
    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_generate_inputs.len() + state.tracked_image_inputs.len() + state.list_models_calls
    }

    /// Reset tracked inputs without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl ModelProvider for MockModelProvider {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn list_models(&self) -> LanguageModelResult<Vec<ModelInfo>> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.list_models_calls += 1;

        state
            .mocked_list_models_results
            .pop_front()
            .ok_or_else(|| {
                LanguageModelError::Invariant(
                    self.provider,
                    "no mocked list_models results available".into(),
                )
            })?
            .into_result()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_generate_inputs.push(input);

        state
            .mocked_generate_results
            .pop_front()
            .ok_or_else(|| {
                LanguageModelError::Invariant(
                    self.provider,
                    "no mocked generate results available".into(),
                )
            })?
            .into_result()
    }

    async fn generate_image(
        &self,
        input: ImageGenerationInput,
    ) -> LanguageModelResult<ImageResponse> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_image_inputs.push(input);

        state
            .mocked_image_results
            .pop_front()
            .ok_or_else(|| {
                LanguageModelError::Invariant(
                    self.provider,
                    "no mocked generate_image results available".into(),
                )
            })?
            .into_result()
    }
}
