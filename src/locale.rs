use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kiosk language. Portuguese is the default and the language of the
/// knowledge base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pt,
    En,
    Es,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Pt => "pt",
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    pub fn is_default(self) -> bool {
        self == Locale::Pt
    }

    /// Shown when a query arrives inside the cooldown window
    pub fn rate_limit_notice(self) -> &'static str {
        match self {
            Locale::Pt => "⏳ Aguarde um momento antes de enviar outra mensagem...",
            Locale::En => "⏳ Please wait a moment before sending another message...",
            Locale::Es => "⏳ Espera un momento antes de enviar otro mensaje...",
        }
    }

    /// Generic apology for a failed pipeline
    pub fn unavailable_message(self) -> &'static str {
        match self {
            Locale::Pt => "🤖 **Sistema Temporariamente Indisponível**\n\n😔 Ocorreu um problema técnico, mas você pode tentar:\n\n• Reformular sua pergunta\n• Perguntar sobre pontos turísticos de Belém\n• Solicitar informações sobre restaurantes\n• Questionar sobre a COP 30\n\n💡 *O sistema será restabelecido automaticamente.*",
            Locale::En => "🤖 **System Temporarily Unavailable**\n\n😔 A technical problem occurred, but you can try:\n\n• Rephrasing your question\n• Asking about tourist attractions in Belém\n• Requesting restaurant information\n• Asking about COP 30\n\n💡 *The system will recover automatically.*",
            Locale::Es => "🤖 **Sistema Temporalmente No Disponible**\n\n😔 Ocurrió un problema técnico, pero puedes intentar:\n\n• Reformular tu pregunta\n• Preguntar sobre atracciones turísticas de Belém\n• Solicitar información sobre restaurantes\n• Preguntar sobre la COP 30\n\n💡 *El sistema se restablecerá automáticamente.*",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "pt-br" => Ok(Locale::Pt),
            "en" | "en-us" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(format!("unsupported locale '{}' (expected pt, en or es)", other)),
        }
    }
}
