#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};

use oraculum_rs::completion::{CompletionRequest, CompletionService};
use oraculum_rs::error::{OraculumError, Result};
use oraculum_rs::source::{KnowledgeSource, StaticKnowledgeSource};
use oraculum_rs::{EngineConfig, KnowledgeBase, TieredAnswerEngine};

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn belem_json() -> Value {
    json!({
        "pontos_turisticos": [
            {
                "nome": "Mercado Ver-o-Peso",
                "descricao": "Maior feira ao ar livre da América Latina",
                "endereco": "Av. Boulevard Castilhos França",
                "google_maps_link": "https://maps.app.goo.gl/veropeso",
                "preco": "Gratuito",
                "horario": "05h às 18h",
                "tags": ["feira", "mercado", "história"]
            },
            {
                "nome": "Theatro da Paz",
                "descricao": "Teatro histórico de 1878",
                "preco": "R$ 10-40",
                "tags": ["teatro", "cultura"]
            },
            {"nome": "Mangal das Garças", "descricao": "Parque natural urbano com borboletário"}
        ],
        "restaurantes": [
            {
                "nome": "Remanso do Bosque",
                "categoria": "Alta gastronomia",
                "especialidade": "Cozinha paraense contemporânea",
                "preco_medio": "R$ 150"
            },
            {
                "nome": "Point do Açaí",
                "categoria": "Regional",
                "especialidade": "Açaí com peixe frito",
                "preco_medio": "R$ 40",
                "pratos_famosos": ["Açaí tradicional", "Tacacá"],
                "tags": ["açaí", "tacacá"]
            },
            {"nome": "Lá em Casa", "especialidade": "Pato no tucupi"}
        ],
        "hoteis": [
            {"nome": "Atrium Quinta de Pedras", "categoria": "4_estrelas", "preco_diaria": "R$ 350"},
            {"nome": "Ibis Styles Belém", "categoria": "3_estrelas", "preco_diaria": "R$ 220"}
        ],
        "transporte": [
            {"tipo": "BRT Belém", "descricao": "Sistema de ônibus rápido", "preco": "R$ 4,30"}
        ],
        "cop30": {
            "nome": "COP 30",
            "data": "10 a 21 de novembro de 2025",
            "local_principal": "Parque da Cidade",
            "descricao": "30ª Conferência das Nações Unidas sobre Mudanças Climáticas"
        },
        "seguranca": [
            {"nome": "Dicas de segurança", "descricao": "Evite exibir objetos de valor"}
        ]
    })
}

pub fn belem_kb() -> KnowledgeBase {
    KnowledgeBase::from_json(belem_json()).unwrap()
}

pub fn config(cooldown: Duration) -> EngineConfig {
    EngineConfig {
        cooldown,
        ..EngineConfig::default()
    }
}

pub fn local_engine(cooldown: Duration) -> TieredAnswerEngine {
    TieredAnswerEngine::new(
        config(cooldown),
        Arc::new(StaticKnowledgeSource::new(belem_kb())),
        None,
        None,
    )
}

/// Completion service returning a fixed reply and recording requests
pub struct ScriptedCompletion {
    reply: Result<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(OraculumError::RemoteEnrichFailed("HTTP status 503".to_string())),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(err) => Err(OraculumError::RemoteEnrichFailed(err.to_string())),
        }
    }
}

/// Source that counts fetches, sleeps, and fails the first `failures` calls
pub struct CountingSource {
    pub fetches: AtomicUsize,
    failures: usize,
    delay: Duration,
}

impl CountingSource {
    pub fn new(failures: usize, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fetches: AtomicUsize::new(0),
            failures,
            delay,
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeSource for CountingSource {
    async fn fetch(&self) -> Result<KnowledgeBase> {
        let call = self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if call < self.failures {
            return Err(OraculumError::SourceUnavailable("connection refused".to_string()));
        }
        Ok(belem_kb())
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}

/// Completion service that panics mid-call
pub struct PanickingCompletion;

#[async_trait]
impl CompletionService for PanickingCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        panic!("completion backend crashed");
    }
}
