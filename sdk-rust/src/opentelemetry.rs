use crate::{
    ImageGenerationInput, ImageResponse, LanguageModelInput, LanguageModelResult, ModelInfo,
    ModelResponse, ModelUsage,
};
use opentelemetry::trace::Status;
use std::{future::Future, time::Instant};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct LmSpan {
    span: Span,
    usage: Option<ModelUsage>,
    start_time: Instant,
}

impl LmSpan {
    fn new(span: Span, provider: &str, operation: &str, model_id: Option<&str>) -> Self {
        span.set_attribute("gen_ai.operation.name", operation.to_string());
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        if let Some(model_id) = model_id {
            span.set_attribute("gen_ai.request.model", model_id.to_string());
        }

        Self {
            span,
            usage: None,
            start_time: Instant::now(),
        }
    }

    fn for_generate(provider: &str, input: &LanguageModelInput) -> Self {
        let this = Self::new(
            info_span!("relay_sdk.generate"),
            provider,
            "chat",
            Some(&input.model),
        );
        if let Some(max_tokens) = input.max_tokens {
            this.span
                .set_attribute("gen_ai.request.max_tokens", i64::from(max_tokens));
        }
        if let Some(temperature) = input.temperature {
            this.span
                .set_attribute("gen_ai.request.temperature", temperature);
        }
        if let Some(top_p) = input.top_p {
            this.span.set_attribute("gen_ai.request.top_p", top_p);
        }
        this
    }

    fn for_generate_image(provider: &str, input: &ImageGenerationInput) -> Self {
        let this = Self::new(
            info_span!("relay_sdk.generate_image"),
            provider,
            "generate_image",
            input.model.as_deref(),
        );
        this.span
            .set_attribute("relay_sdk.image.size", input.size.as_str());
        this.span
            .set_attribute("relay_sdk.image.count", i64::from(input.n));
        this
    }

    fn for_list_models(provider: &str) -> Self {
        Self::new(
            info_span!("relay_sdk.list_models"),
            provider,
            "list_models",
            None,
        )
    }

    async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        future.instrument(self.span.clone()).await
    }

    fn on_response(&mut self, response: &ModelResponse) {
        if let Some(usage) = &response.usage {
            self.usage = Some(usage.clone());
        }
    }

    fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        tracing::warn!(parent: &self.span, error = %error, "upstream call failed");
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    fn on_end(&mut self) {
        if let Some(usage) = &self.usage {
            self.span
                .set_attribute("gen_ai.usage.input_tokens", i64::from(usage.input_tokens));
            self.span
                .set_attribute("gen_ai.usage.output_tokens", i64::from(usage.output_tokens));
        }
        self.span.set_attribute(
            "relay_sdk.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }

    async fn run<T, Fut>(mut self, future: Fut) -> LanguageModelResult<T>
    where
        Fut: Future<Output = LanguageModelResult<T>>,
    {
        let result = self.instrument_future(future).await;
        if let Err(error) = &result {
            self.on_error(error);
        }
        self.on_end();
        result
    }
}

pub async fn trace_generate<F, Fut>(
    provider: &str,
    input: LanguageModelInput,
    f: F,
) -> LanguageModelResult<ModelResponse>
where
    F: FnOnce(LanguageModelInput) -> Fut,
    Fut: Future<Output = LanguageModelResult<ModelResponse>>,
{
    let mut span = LmSpan::for_generate(provider, &input);
    let result = span.instrument_future(f(input)).await;

    match &result {
        Ok(response) => span.on_response(response),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}

pub async fn trace_generate_image<F, Fut>(
    provider: &str,
    input: ImageGenerationInput,
    f: F,
) -> LanguageModelResult<ImageResponse>
where
    F: FnOnce(ImageGenerationInput) -> Fut,
    Fut: Future<Output = LanguageModelResult<ImageResponse>>,
{
    LmSpan::for_generate_image(provider, &input)
        .run(f(input))
        .await
}

pub async fn trace_list_models<Fut>(provider: &str, future: Fut) -> LanguageModelResult<Vec<ModelInfo>>
where
    Fut: Future<Output = LanguageModelResult<Vec<ModelInfo>>>,
{
    LmSpan::for_list_models(provider).run(future).await
}
