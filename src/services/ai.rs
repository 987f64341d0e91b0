use anyhow::{anyhow, Result};
use async_openai::types::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs, Role,
};
use async_openai::{config::OpenAIConfig, Client};
use tokio::time::{sleep, Duration};

const SYSTEM_PROMPT: &str = "You are a compassionate and empathetic AI therapist. \
Your goal is to provide supportive, thoughtful responses and help users feel heard. \
Please be mindful that you are not a substitute for professional mental health advice.";

const MAX_RETRIES: u64 = 3;

/// One past user/assistant exchange carried as short-term context.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user_message: String,
    pub ai_response: String,
}

/// Proxy to an OpenAI-compatible chat-completions endpoint.
///
/// `OPENAI_API_BASE` may point the client at an alternative gateway
/// (e.g. OpenRouter); `CHAT_MODEL` selects the model.
pub struct TherapistAi {
    client: Client<OpenAIConfig>,
    model: String,
}

impl TherapistAi {
    pub fn new(api_key: String) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config = config.with_api_base(base);
        }
        let model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// Send the user's message with recent exchanges as context and return
    /// the model's reply. Transient failures are retried with backoff.
    pub async fn respond(&self, message: &str, context: &[ChatTurn]) -> Result<String> {
        let mut retries = 0;

        loop {
            let mut messages = vec![ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    role: Role::System,
                    content: SYSTEM_PROMPT.to_string(),
                    name: None,
                },
            )];
            for turn in context {
                messages.push(ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage {
                        role: Role::User,
                        content: ChatCompletionRequestUserMessageContent::Text(
                            turn.user_message.clone(),
                        ),
                        name: None,
                    },
                ));
                messages.push(ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessage {
                        role: Role::Assistant,
                        content: Some(turn.ai_response.clone()),
                        ..Default::default()
                    },
                ));
            }
            messages.push(ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    role: Role::User,
                    content: ChatCompletionRequestUserMessageContent::Text(
                        message.to_string(),
                    ),
                    name: None,
                },
            ));

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages)
                .build()?;

            match self.client.chat().create(request).await {
                Ok(resp) => {
                    let content = resp
                        .choices
                        .first()
                        .and_then(|c| c.message.content.clone())
                        .ok_or_else(|| anyhow!("model returned an empty completion"))?;
                    return Ok(content);
                }
                Err(err) => {
                    retries += 1;
                    if retries > MAX_RETRIES {
                        return Err(anyhow!("chat completion failed: {err}"));
                    }
                    tracing::warn!("Chat completion attempt {} failed: {}", retries, err);
                    sleep(Duration::from_millis(500 * retries)).await;
                }
            }
        }
    }
}
