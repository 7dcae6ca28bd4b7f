use std::sync::Arc;

use clap::Parser;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::{
        stdio,
        streamable_http_server::{
            StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
        },
    },
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use oraculum_rs::config::Args;
use oraculum_rs::engine::{validate_query, TieredAnswerEngine};
use oraculum_rs::http;
use oraculum_rs::logging::{init_logging, TransportMode};
use oraculum_rs::translate::Translator;
use oraculum_rs::{Category, Locale};

#[derive(Clone)]
struct OraculumServer {
    engine: Arc<TieredAnswerEngine>,
    tool_router: ToolRouter<Self>,
}

impl OraculumServer {
    fn new(engine: Arc<TieredAnswerEngine>) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    fn server_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "oraculum-rs".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Oraculum AI".to_string()),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Tourist guide for Belém do Pará and COP 30. Use `ask` for kiosk answers; \
                 `search_knowledge` and `list_category` expose the raw knowledge base."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl OraculumServer {
    /// Answer a visitor question
    #[tool(
        name = "ask",
        description = "Answer a visitor question about Belém or COP 30. Falls back from local knowledge to the remote model to canned answers, and enforces the kiosk cooldown."
    )]
    async fn ask(&self, Parameters(args): Parameters<AskArgs>) -> Result<CallToolResult, McpError> {
        validate_query(&args.query).map_err(|reason| McpError::invalid_params(reason, None))?;

        let Some(reply) = self.engine.ask(&args.query).await else {
            return Ok(CallToolResult::success(vec![Content::text(
                "Empty query ignored",
            )]));
        };

        Ok(CallToolResult {
            content: vec![Content::text(&reply.text)],
            structured_content: Some(json!(reply)),
            is_error: Some(false),
            meta: None,
        })
    }

    #[tool(
        name = "search_knowledge",
        description = "Score a query against the knowledge categories and return the selected records without formatting. Not rate limited and not recorded in history."
    )]
    async fn search_knowledge(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .engine
            .search(&args.query)
            .await
            .ok_or_else(|| McpError::internal_error("Knowledge base unavailable", None))?;

        let summary = format!(
            "{} categories scored, {} records selected",
            result.scores.len(),
            result.hits.len()
        );

        Ok(CallToolResult {
            content: vec![Content::text(&summary)],
            structured_content: Some(json!(result)),
            is_error: Some(false),
            meta: None,
        })
    }

    #[tool(
        name = "list_category",
        description = "List every record of one knowledge category"
    )]
    async fn list_category(
        &self,
        Parameters(args): Parameters<ListCategoryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let kb = self
            .engine
            .knowledge()
            .await
            .ok_or_else(|| McpError::internal_error("Knowledge base unavailable", None))?;
        let records = kb.records(args.category).ok_or_else(|| {
            McpError::invalid_params(
                "Category not present in the knowledge base",
                Some(json!({ "category": args.category })),
            )
        })?;

        let summary = format!("{} records in {}", records.len(), args.category);

        Ok(CallToolResult {
            content: vec![Content::text(&summary)],
            structured_content: Some(json!(records)),
            is_error: Some(false),
            meta: None,
        })
    }

    #[tool(
        name = "history",
        description = "Recent exchanges of the current session, oldest first"
    )]
    async fn history(&self) -> Result<CallToolResult, McpError> {
        let history = self.engine.history();
        let summary = format!("{} exchanges in history", history.len());

        Ok(CallToolResult {
            content: vec![Content::text(&summary)],
            structured_content: Some(json!(history)),
            is_error: Some(false),
            meta: None,
        })
    }

    #[tool(
        name = "reset_session",
        description = "Start a new visitor session: clears history, the cooldown and cached translations"
    )]
    async fn reset_session(&self) -> Result<CallToolResult, McpError> {
        self.engine.reset_session();
        Ok(CallToolResult::success(vec![Content::text("Session reset")]))
    }

    #[tool(
        name = "set_locale",
        description = "Switch the language of canned answers and notices (pt, en, es)"
    )]
    async fn set_locale(
        &self,
        Parameters(args): Parameters<SetLocaleArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.engine.set_locale(args.locale);
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Locale set to {}",
            args.locale
        ))]))
    }

    #[tool(
        name = "translate",
        description = "Translate Portuguese text into the given locale. Text naming protected places is returned unchanged."
    )]
    async fn translate(
        &self,
        Parameters(args): Parameters<TranslateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let locale = args.locale.unwrap_or_else(|| self.engine.locale());
        let translated = self.engine.translate(&args.text, locale).await;
        Ok(CallToolResult::success(vec![Content::text(translated)]))
    }
}

#[tool_handler]
impl ServerHandler for OraculumServer {
    fn get_info(&self) -> ServerInfo {
        self.server_info()
    }
}

// Tool argument schemas

#[derive(Debug, Deserialize, JsonSchema)]
struct AskArgs {
    /// Visitor question, at most 200 characters
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListCategoryArgs {
    category: Category,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SetLocaleArgs {
    locale: Locale,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TranslateArgs {
    text: String,
    /// Defaults to the session locale
    locale: Option<Locale>,
}

async fn serve_stdio(engine: Arc<TieredAnswerEngine>) -> anyhow::Result<()> {
    let svc = OraculumServer::new(engine).serve(stdio()).await?;
    svc.waiting().await?;
    Ok(())
}

async fn serve_stream(engine: Arc<TieredAnswerEngine>, bind: &str, port: u16) -> anyhow::Result<()> {
    let mcp = StreamableHttpService::new(
        {
            let engine = engine.clone();
            move || Ok(OraculumServer::new(engine.clone()))
        },
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );
    let app = http::router(engine).nest_service("/mcp", mcp);

    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    let addr = listener.local_addr()?;
    info!("MCP endpoint: http://{}/mcp", addr);
    info!("Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mode = args.transport_mode();

    // stdio: nothing may reach stderr before the MCP handshake
    init_logging(mode, args.log.as_deref())?;

    let translator = (!args.no_translate).then(Translator::default);
    let completion = args.completion_service();
    if completion.is_none() {
        info!("GEMINI_API_KEY not set, remote enrichment disabled");
    }

    let engine = Arc::new(TieredAnswerEngine::new(
        args.engine_config(),
        args.knowledge_source(),
        completion,
        translator,
    ));
    if !engine.init().await {
        warn!("Knowledge base not loaded, retrying on the next query");
    }

    match mode {
        TransportMode::Stdio => serve_stdio(engine).await,
        TransportMode::Stream => serve_stream(engine, &args.bind, args.port).await,
    }
}
