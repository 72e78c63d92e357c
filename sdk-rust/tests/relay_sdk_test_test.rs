use relay_sdk::{
    relay_sdk_test::{MockModelProvider, MockResult},
    GeneratedImage, ImageGenerationInput, ImageResponse, ImageSize, LanguageModelError,
    LanguageModelInput, Message, ModelInfo, ModelProvider, ModelResponse,
};

fn user_input(text: &str) -> LanguageModelInput {
    LanguageModelInput {
        model: "mock-model".to_string(),
        messages: vec![Message::user(text)],
        ..LanguageModelInput::default()
    }
}

#[tokio::test]
async fn mock_provider_tracks_generate_inputs_and_returns_results() {
    let provider = MockModelProvider::new();

    let response1 = ModelResponse {
        text: "Hello, world!".to_string(),
        ..ModelResponse::default()
    };

    provider
        .enqueue_generate(response1.clone())
        .enqueue_generate(MockResult::error(LanguageModelError::InvalidInput(
            "generate error".to_string(),
        )));

    let res1 = provider
        .generate(user_input("Hi"))
        .await
        .expect("first generate should succeed");
    assert_eq!(res1, response1);

    let err = provider
        .generate(user_input("Error"))
        .await
        .expect_err("second generate should error");
    match err {
        LanguageModelError::InvalidInput(msg) => assert_eq!(msg, "generate error"),
        other => panic!("unexpected error variant: {other:?}"),
    }

    let tracked = provider.tracked_generate_inputs();
    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[0].messages, vec![Message::user("Hi")]);
    assert_eq!(tracked[1].messages, vec![Message::user("Error")]);

    let err = provider
        .generate(user_input("Nothing queued"))
        .await
        .expect_err("empty queue should error");
    assert!(matches!(err, LanguageModelError::Invariant("mock", _)));
}

#[tokio::test]
async fn mock_provider_counts_calls_across_methods() {
    let provider = MockModelProvider::new();
    provider
        .enqueue_list_models(vec![ModelInfo {
            id: "mock-model".to_string(),
            owned_by: None,
        }])
        .enqueue_generate_image(ImageResponse {
            images: vec![GeneratedImage {
                url: "https://example.com/a.png".to_string(),
                revised_prompt: None,
            }],
        });

    provider.list_models().await.expect("list_models succeeds");
    provider
        .generate_image(ImageGenerationInput::new("a cat", ImageSize::Square256))
        .await
        .expect("generate_image succeeds");

    assert_eq!(provider.list_models_calls(), 1);
    assert_eq!(provider.tracked_image_inputs()[0].prompt, "a cat");
    assert_eq!(provider.total_calls(), 2);

    provider.reset();
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn mock_provider_restore_clears_queued_results() {
    let provider = MockModelProvider::new();
    provider.enqueue_generate(ModelResponse::default());
    provider.restore();

    assert!(provider.generate(user_input("Hi")).await.is_err());
}
