//! Remote completion collaborator used to enrich or replace local answers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OraculumError, Result};

pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.0-flash:generateContent";

/// Output budget when local records are passed as context
pub const ENRICHED_MAX_TOKENS: u32 = 250;
/// Output budget for a bare question
pub const BARE_MAX_TOKENS: u32 = 180;

const SYSTEM_PROMPT: &str = "Você é um guia turístico especialista em Belém do Pará e na COP 30 (Conferência das Nações Unidas sobre Mudanças Climáticas). Suas respostas devem ser:

1. FOCADAS apenas em Belém do Pará, COP 30, turismo sustentável na região e cultura paraense
2. CONCISAS (máximo 150 tokens por resposta)
3. ÚTEIS para turistas visitando a cidade
4. Em PORTUGUÊS BRASILEIRO
5. Se perguntarem sobre outros assuntos não relacionados a Belém/COP 30, responda educadamente que você é especialista apenas nesses temas

Temas que você pode abordar:
- Pontos turísticos de Belém
- Culinária paraense (açaí, tacacá, maniçoba, etc.)
- Historia de Belém
- COP 30 e sustentabilidade
- Transporte na cidade
- Hotéis e hospedagem
- Cultura amazônica
- Dicas de segurança para turistas
- Eventos culturais";

const CONTEXT_GUIDANCE: &str = "IMPORTANTE: Use essas informações para dar uma resposta COMPLETA e DETALHADA. SEMPRE inclua:
- Links dos locais (Google Maps quando disponível)
- Preços específicos
- Horários de funcionamento
- Dicas úteis
- Múltiplas opções quando possível
- Informações de contato quando relevantes
- Endereços completos
Seja informativo mas amigável, como um guia turístico local experiente.";

/// Prompt and sampling settings for one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl CompletionRequest {
    /// Build the guide prompt for `query`, with the formatted local answer as
    /// context when there is one.
    pub fn for_query(query: &str, context: Option<&str>) -> Self {
        let mut prompt = String::from(SYSTEM_PROMPT);
        if let Some(local) = context {
            prompt.push_str("\n\nDADOS LOCAIS DETALHADOS:\n");
            prompt.push_str(local);
            prompt.push_str("\n\n");
            prompt.push_str(CONTEXT_GUIDANCE);
        }
        prompt.push_str("\n\nPergunta do usuário: ");
        prompt.push_str(query);

        Self {
            prompt,
            max_output_tokens: if context.is_some() {
                ENRICHED_MAX_TOKENS
            } else {
                BARE_MAX_TOKENS
            },
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_GEMINI_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [GenerateContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerateContent<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = GenerateRequest {
            contents: [GenerateContent {
                parts: [TextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
                temperature: request.temperature,
                top_p: request.top_p,
                top_k: request.top_k,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(OraculumError::remote)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OraculumError::RemoteEnrichFailed(format!("HTTP status {}", status)));
        }

        let parsed: GenerateResponse = response.json().await.map_err(OraculumError::remote)?;
        let text = parsed
            .into_text()
            .ok_or_else(|| OraculumError::remote("response has no candidate text"))?;
        debug!(chars = text.len(), "Completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_raises_token_budget_and_embeds_local_data() {
        let request = CompletionRequest::for_query("onde comer?", Some("📍 Point do Açaí"));
        assert_eq!(request.max_output_tokens, ENRICHED_MAX_TOKENS);
        assert!(request.prompt.contains("DADOS LOCAIS DETALHADOS:\n📍 Point do Açaí\n\nIMPORTANTE"));
        assert!(request.prompt.ends_with("\n\nPergunta do usuário: onde comer?"));
    }

    #[test]
    fn bare_question_uses_small_budget() {
        let request = CompletionRequest::for_query("o que é a cop 30?", None);
        assert_eq!(request.max_output_tokens, BARE_MAX_TOKENS);
        assert!(!request.prompt.contains("DADOS LOCAIS"));
        assert!(request.prompt.starts_with(SYSTEM_PROMPT));
    }

    #[test]
    fn response_text_is_first_part_of_first_candidate() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Olá"},{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Olá"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.into_text(), None);
    }
}
