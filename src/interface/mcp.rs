//! MCP Server for bookshelf-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryStore
//!
//! 6 tools: add_book, remove_book, search_books, list_books, statistics, save_library
//! セッション終了時（stdin close）に蔵書全体を保存する。

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::render::{
    format_record, format_records, format_remove, format_search, format_statistics,
};
use crate::application::store::{describe_unmatched, LibraryStore, SearchOutcome};
use crate::domain::model::library::SearchField;
use crate::domain::model::record::NewBookRequest;
use crate::domain::summary::SummaryService;
use crate::infra::json_store::JsonLibraryRepository;

type SharedStore = Arc<Mutex<LibraryStore<JsonLibraryRepository>>>;
type SharedSummary = Arc<dyn SummaryService + Send + Sync>;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。セッション終了後に `finish` で蔵書を保存する。
pub async fn run(library_path: PathBuf, summary: SharedSummary) -> anyhow::Result<()> {
    tracing::info!(path = %library_path.display(), "opening library");
    let store: SharedStore = Arc::new(Mutex::new(LibraryStore::open(
        JsonLibraryRepository::new(library_path),
    )));

    let server = BookshelfMcpServer::new(Arc::clone(&store), summary);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    finish(&store)
}

/// exit: 変更の有無にかかわらず保存する。復旧した破損ファイルや旧形式のファイルもここで正規形式に書き直される。
fn finish(store: &Mutex<LibraryStore<JsonLibraryRepository>>) -> anyhow::Result<()> {
    let mut guard = store
        .lock()
        .map_err(|_| anyhow::anyhow!("library lock poisoned"))?;
    guard.save()?;
    tracing::info!(books = guard.len(), "saved library on exit");
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct BookshelfMcpServer {
    store: SharedStore,
    summary: SharedSummary,
    tool_router: ToolRouter<Self>,
}

impl BookshelfMcpServer {
    fn new(store: SharedStore, summary: SharedSummary) -> Self {
        Self {
            store,
            summary,
            tool_router: Self::tool_router(),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, LibraryStore<JsonLibraryRepository>>, McpError> {
        self.store.lock().map_err(|_| lock_poisoned())
    }

    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::Validation(_) => McpError::invalid_params(format!("{e}"), None),
            AppError::Persistence(_) => McpError::internal_error(format!("{e}"), None),
        }
    }
}

fn lock_poisoned() -> McpError {
    McpError::internal_error("Lock poisoned", None)
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for BookshelfMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bookshelf-mcp".to_string(),
                title: Some("Bookshelf MCP — Personal Library".to_string()),
                description: Some(
                    "Personal book library: add, remove, search and list books, \
                     with reading statistics."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal reading list.\n\
                 \n\
                 Tools: `add_book`, `remove_book`, `search_books`, `list_books`, `statistics`. \
                 Changes are kept in memory; call `save_library` to persist them. \
                 The whole library is also saved when the session ends.\n\
                 \n\
                 When `search_books` finds nothing, an AI-generated summary of the query \
                 is returned instead."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

fn parse_search_field(s: &str) -> Result<SearchField, McpError> {
    match s {
        "title" => Ok(SearchField::Title),
        "author" => Ok(SearchField::Author),
        other => Err(McpError::invalid_params(
            format!("Unknown search field: '{other}'. Use: title, author"),
            None,
        )),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title (required, must not be blank)")]
    pub title: String,
    #[schemars(description = "Author name")]
    #[serde(default)]
    pub author: String,
    #[schemars(description = "Publication year (0-2100)")]
    pub year: i32,
    #[schemars(description = "Genre")]
    #[serde(default)]
    pub genre: String,
    #[schemars(description = "Whether the book has been read (default: false)")]
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRemoveBookRequest {
    #[schemars(description = "Title of the book to remove (case-insensitive, removes all matches)")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchRequest {
    #[schemars(description = "Field to search: 'title' (default) or 'author'")]
    pub field: Option<String>,
    #[schemars(description = "Case-insensitive substring to look for. Empty matches every book.")]
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpEmptyRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl BookshelfMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a book to the end of the library. Title must not be blank and year must be within 0-2100. Not saved until `save_library` or session end.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut store = self.store()?;
        let record = store
            .add(NewBookRequest {
                title: req.title,
                author: req.author,
                year: req.year,
                genre: req.genre,
                read: req.read,
            })
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Added: {}",
            format_record(record)
        ))]))
    }

    #[tool(
        name = "remove_book",
        description = "Remove every book whose title matches (case-insensitive). Reports how many were removed.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_book(
        &self,
        Parameters(req): Parameters<McpRemoveBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut store = self.store()?;
        let outcome = store.remove(&req.title);
        Ok(CallToolResult::success(vec![Content::text(format_remove(
            req.title.trim(),
            outcome,
        ))]))
    }

    #[tool(
        name = "search_books",
        description = "Search books by title or author (case-insensitive substring). If nothing matches, returns an AI-generated summary and cover description for the query.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = true
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field = parse_search_field(req.field.as_deref().unwrap_or("title"))?;
        let matches = self.store()?.search(field, &req.query);

        let outcome = if matches.is_empty() {
            // ロックは解放済み。外部サービス呼び出しはブロッキングなので専用スレッドで行う
            let summary = Arc::clone(&self.summary);
            tokio::task::spawn_blocking(move || describe_unmatched(&req.query, &*summary))
                .await
                .map_err(|e| McpError::internal_error(format!("Search task failed: {e}"), None))?
        } else {
            SearchOutcome::Matches(matches)
        };

        Ok(CallToolResult::success(vec![Content::text(format_search(
            &outcome,
        ))]))
    }

    #[tool(
        name = "list_books",
        description = "List all books in insertion order.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let books = self.store()?.list();
        let output = if books.is_empty() {
            format_records(&books)
        } else {
            format!("# Library ({} books)\n\n{}", books.len(), format_records(&books))
        };
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "statistics",
        description = "Show total books, books read, and percentage read.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn statistics(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let stats = self.store()?.statistics();
        Ok(CallToolResult::success(vec![Content::text(
            format_statistics(&stats),
        )]))
    }

    #[tool(
        name = "save_library",
        description = "Write the whole library to the library file, replacing its previous contents.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn save_library(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut store = self.store()?;
        store.save().map_err(Self::to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Saved {} books.",
            store.len()
        ))]))
    }
}

// =============================================================================
// Tests
// =============================================================================
