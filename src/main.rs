//! CLI entry point for the agent platform console.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::Colorize;
use dotenvy::dotenv;
use futures_util::StreamExt;
use serde::Serialize;

use agentctl::client::{PlatformClient, Session};
use agentctl::config::Config;
use agentctl::events::ChatEvent;
use agentctl::forms::agent::AgentForm;
use agentctl::forms::mcp::McpServerForm;
use agentctl::forms::model::ModelForm;
use agentctl::forms::provider::ProviderForm;
use agentctl::forms::source::SourceForm;
use agentctl::forms::{self, FieldErrors, FormError};
use agentctl::modules::chat::SendMessageOptions;
use agentctl::modules::tasks::TaskListOptions;
use agentctl::modules::{agents, chat, mcp, models as model_api, providers, sources, tasks};
use agentctl::poller::{self, PollSettings, PollUpdate};
use agentctl::render::render_event;
use agentctl::transcript::{self, Transcript};
use agentctl::{commands, logging, palette, ui, upload, utils};

#[derive(Parser, Debug)]
#[command(
    name = "agentctl",
    author,
    version,
    about = "Console for the agent platform API",
    long_about = "agentctl - command-line console for the agent platform\n\n\
    Manage agents, tasks, LLM providers, models, MCP servers, and data\n\
    sources, and chat with agents from the terminal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Config profile name
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Workspace identifier (overrides config)
    #[arg(short, long, global = true)]
    workspace: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with an agent
    Chat(ChatCommand),
    /// Manage agents
    Agents(AgentsCommand),
    /// Inspect and control tasks
    Tasks(TasksCommand),
    /// Manage LLM provider configurations
    Providers(ProvidersCommand),
    /// Manage model instances
    Models(ModelsCommand),
    /// Manage MCP servers
    Mcp(McpCommand),
    /// Manage data sources
    Sources(SourcesCommand),
    /// Run configuration and connectivity diagnostics
    Doctor,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ChatCommand {
    #[command(subcommand)]
    command: ChatSubcommand,
}

#[derive(Subcommand, Debug)]
enum ChatSubcommand {
    /// Send a message and wait for the agent's reply
    Send {
        /// Message text
        message: String,
        /// Agent to target (falls back to default_agent from config)
        #[arg(short, long)]
        agent: Option<String>,
        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<String>,
    },
    /// Send a message and stream events as they arrive
    Stream {
        /// Message text
        message: String,
        /// Agent to target (falls back to default_agent from config)
        #[arg(short, long)]
        agent: Option<String>,
    },
    /// List stored conversations
    Conversations,
}

#[derive(Args, Debug)]
struct AgentsCommand {
    #[command(subcommand)]
    command: AgentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AgentsSubcommand {
    /// List agents
    List,
    /// Show one agent
    Get { agent_id: String },
    /// Create an agent
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Model instance backing the agent
        #[arg(long = "model")]
        model_instance_id: String,
        /// MCP servers to attach (repeatable)
        #[arg(long = "mcp")]
        mcp_server_ids: Vec<String>,
    },
    /// Delete an agent
    Delete { agent_id: String },
}

#[derive(Args, Debug)]
struct TasksCommand {
    #[command(subcommand)]
    command: TasksSubcommand,
}

#[derive(Subcommand, Debug)]
enum TasksSubcommand {
    /// List tasks
    List {
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Fetch one task status
    Status { task_id: String },
    /// Poll a task until it resolves, fails, or times out
    Watch { task_id: String },
    /// Cancel a task
    Cancel { task_id: String },
    /// Pause a task
    Pause { task_id: String },
    /// Resume a paused task
    Resume { task_id: String },
    /// Show a task's event log
    Events { task_id: String },
}

#[derive(Args, Debug)]
struct ProvidersCommand {
    #[command(subcommand)]
    command: ProvidersSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProvidersSubcommand {
    /// List provider type capabilities
    Specs,
    /// List configured providers
    List,
    /// Create a provider configuration
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        provider_type: String,
        #[arg(long, default_value = "")]
        base_url: String,
        #[arg(long)]
        api_key: String,
    },
    /// Delete a provider configuration
    Delete { provider_id: String },
}

#[derive(Args, Debug)]
struct ModelsCommand {
    #[command(subcommand)]
    command: ModelsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ModelsSubcommand {
    /// List model specs, optionally for one provider type
    Specs {
        #[arg(long = "type")]
        provider_type: Option<String>,
    },
    /// List model instances
    List,
    /// Create a model instance
    Create {
        /// Parent provider configuration
        #[arg(long)]
        provider: String,
        /// Model name within the provider's domain
        #[arg(long = "model")]
        model_name: String,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Delete a model instance
    Delete { model_id: String },
}

#[derive(Args, Debug)]
struct McpCommand {
    #[command(subcommand)]
    command: McpSubcommand,
}

#[derive(Subcommand, Debug)]
enum McpSubcommand {
    /// List MCP servers
    List,
    /// Show one MCP server
    Get { server_id: String },
    /// Register an MCP server
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        transport: String,
    },
    /// Delete an MCP server
    Delete { server_id: String },
    /// Start a server instance
    Start { server_id: String },
    /// Stop a server instance
    Stop { server_id: String },
    /// Deploy a server
    Deploy { server_id: String },
    /// Probe a server's health
    Health { server_id: String },
}

#[derive(Args, Debug)]
struct SourcesCommand {
    #[command(subcommand)]
    command: SourcesSubcommand,
}

#[derive(Subcommand, Debug)]
enum SourcesSubcommand {
    /// List data sources
    List,
    /// Show one source
    Get { source_id: String },
    /// Create a source record
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        source_type: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a source
    Delete { source_id: String },
    /// Upload one or more files as sources
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    logging::set_verbose(cli.verbose);

    if let Err(err) = run(cli).await {
        logging::error(format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut command = Cli::command();
        generate(*shell, &mut command, "agentctl", &mut io::stdout());
        return Ok(());
    }

    let mut config = Config::load(cli.config.clone(), cli.profile.as_deref())?;
    if let Some(workspace) = cli.workspace.clone() {
        config.workspace = Some(workspace);
    }

    if let Commands::Doctor = &cli.command {
        commands::doctor::doctor(&config).await;
        return Ok(());
    }

    let session = Session::from_config(&config)?;
    let client = PlatformClient::new(session)?;
    let json = cli.json;

    match cli.command {
        Commands::Chat(command) => run_chat(&client, &config, command).await,
        Commands::Agents(command) => run_agents(&client, command, json).await,
        Commands::Tasks(command) => run_tasks(&client, command, json).await,
        Commands::Providers(command) => run_providers(&client, command, json).await,
        Commands::Models(command) => run_models(&client, command, json).await,
        Commands::Mcp(command) => run_mcp(&client, command, json).await,
        Commands::Sources(command) => run_sources(&client, command, json).await,
        Commands::Doctor | Commands::Completions { .. } => unreachable!("handled above"),
    }
}

// === Chat ===

async fn run_chat(client: &PlatformClient, config: &Config, command: ChatCommand) -> Result<()> {
    match command.command {
        ChatSubcommand::Send {
            message,
            agent,
            conversation,
        } => {
            let agent_id = resolve_agent(config, agent)?;
            chat_send(client, agent_id, message, conversation).await
        }
        ChatSubcommand::Stream { message, agent } => {
            let agent_id = resolve_agent(config, agent)?;
            chat_stream(client, agent_id, message).await
        }
        ChatSubcommand::Conversations => {
            let conversations = chat::conversations(client).await?;
            for conversation in conversations {
                println!(
                    "{}  {}",
                    conversation.id.dimmed(),
                    conversation.title.as_deref().unwrap_or("(untitled)")
                );
            }
            Ok(())
        }
    }
}

fn resolve_agent(config: &Config, agent: Option<String>) -> Result<String> {
    agent
        .or_else(|| config.default_agent.clone())
        .context("No agent given. Pass --agent or set default_agent in config.toml.")
}

/// Send a message, then poll the resulting task until it resolves. Ctrl-C
/// cancels the poll chain without cancelling the task server-side.
async fn chat_send(
    client: &PlatformClient,
    agent_id: String,
    message: String,
    conversation_id: Option<String>,
) -> Result<()> {
    let mut transcript = Transcript::new();
    transcript.push_user(message.as_str());

    let created = chat::send(
        client,
        SendMessageOptions {
            agent_id,
            message,
            conversation_id,
        },
    )
    .await?;
    transcript.push_placeholder(&created.task_id);
    println!("{}", transcript::THINKING_PLACEHOLDER.dimmed());

    let spinner = ui::spinner("Waiting for the agent...");
    let (handle, mut updates) = poller::spawn(
        client.clone(),
        created.task_id.clone(),
        PollSettings::default(),
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
                spinner.finish_and_clear();
                println!("Cancelled; the task keeps running server-side.");
                return Ok(());
            }
            update = updates.recv() => match update {
                Some(PollUpdate::Running { .. }) => {}
                Some(PollUpdate::Completed { content }) => {
                    spinner.finish_and_clear();
                    transcript.resolve(&created.task_id, &content);
                    let (r, g, b) = palette::MAGENTA_RGB;
                    println!("{} {content}", "agent".truecolor(r, g, b).bold());
                    return Ok(());
                }
                Some(PollUpdate::Failed { message }) => {
                    spinner.finish_and_clear();
                    transcript.resolve(&created.task_id, &message);
                    logging::error(&message);
                    return Ok(());
                }
                Some(PollUpdate::TimedOut) => {
                    spinner.finish_and_clear();
                    transcript.resolve(&created.task_id, poller::TIMEOUT_MESSAGE);
                    logging::error(poller::TIMEOUT_MESSAGE);
                    return Ok(());
                }
                None => {
                    spinner.finish_and_clear();
                    return Ok(());
                }
            }
        }
    }
}

async fn chat_stream(client: &PlatformClient, agent_id: String, message: String) -> Result<()> {
    let stream = chat::stream(
        client,
        SendMessageOptions {
            agent_id,
            message,
            conversation_id: None,
        },
    )
    .await?;
    tokio::pin!(stream);

    let mut transcript = Transcript::new();
    let turn_id = "stream";
    while let Some(event) = stream.next().await {
        match event {
            ChatEvent::Chunk {
                chunk,
                chunk_index,
                is_final,
            } => {
                let assembled = transcript.apply_chunk(turn_id, &chunk, chunk_index, is_final);
                if is_final {
                    let (r, g, b) = palette::MAGENTA_RGB;
                    println!("{} {assembled}", "agent".truecolor(r, g, b).bold());
                }
            }
            other => {
                for line in render_event(&other) {
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}

// === Agents ===

async fn run_agents(client: &PlatformClient, command: AgentsCommand, json: bool) -> Result<()> {
    match command.command {
        AgentsSubcommand::List => {
            let items = agents::list(client).await?;
            if json {
                return print_json(&items);
            }
            for agent in items {
                println!(
                    "{}  {}  {}",
                    agent.id.dimmed(),
                    agent.name.bold(),
                    agent.description.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        AgentsSubcommand::Get { agent_id } => {
            let agent = agents::get(client, &agent_id).await?;
            if json {
                return print_json(&agent);
            }
            println!("{}  {}", agent.id.dimmed(), agent.name.bold());
            if let Some(description) = agent.description {
                println!("{description}");
            }
            Ok(())
        }
        AgentsSubcommand::Create {
            name,
            description,
            model_instance_id,
            mcp_server_ids,
        } => {
            let mut form = AgentForm::new(name, description, model_instance_id, mcp_server_ids);
            report_submission(form.submit(client).await, "agent")
        }
        AgentsSubcommand::Delete { agent_id } => {
            agents::delete(client, &agent_id).await?;
            println!("Deleted agent {agent_id}");
            Ok(())
        }
    }
}

// === Tasks ===

async fn run_tasks(client: &PlatformClient, command: TasksCommand, json: bool) -> Result<()> {
    match command.command {
        TasksSubcommand::List { agent, status } => {
            let items = tasks::list(
                client,
                TaskListOptions {
                    agent_id: agent,
                    status,
                },
            )
            .await?;
            if json {
                return print_json(&items);
            }
            for task in items {
                println!(
                    "{}  {}  {}",
                    task.task_id.dimmed(),
                    task.status,
                    task.agent_id.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        TasksSubcommand::Status { task_id } => {
            let status = tasks::status(client, &task_id).await?;
            if json {
                return print_json(&status);
            }
            println!("{}  {}", status.task_id.dimmed(), status.status);
            if let Some(content) = status.final_content() {
                println!("{content}");
            }
            if let Some(usage) = status.usage_metadata {
                println!(
                    "{}",
                    format!(
                        "tokens: {}  cost: {}",
                        usage.total_tokens.unwrap_or(0),
                        utils::fmt_cost(usage.cost)
                    )
                    .dimmed()
                );
            }
            if let Some(error) = status.error {
                logging::error(error);
            }
            Ok(())
        }
        TasksSubcommand::Watch { task_id } => watch_task(client, task_id).await,
        TasksSubcommand::Cancel { task_id } => {
            let status = tasks::cancel(client, &task_id).await?;
            println!("Task {} is now {}", status.task_id, status.status);
            Ok(())
        }
        TasksSubcommand::Pause { task_id } => {
            let status = tasks::pause(client, &task_id).await?;
            println!("Task {} is now {}", status.task_id, status.status);
            Ok(())
        }
        TasksSubcommand::Resume { task_id } => {
            let status = tasks::resume(client, &task_id).await?;
            println!("Task {} is now {}", status.task_id, status.status);
            Ok(())
        }
        TasksSubcommand::Events { task_id } => {
            let events = tasks::events(client, &task_id).await?;
            for event in &events {
                for line in render_event(event) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

async fn watch_task(client: &PlatformClient, task_id: String) -> Result<()> {
    let spinner = ui::spinner(&format!("Watching task {task_id}..."));
    let (handle, mut updates) =
        poller::spawn(client.clone(), task_id.clone(), PollSettings::default());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
                spinner.finish_and_clear();
                println!("Stopped watching {task_id}.");
                return Ok(());
            }
            update = updates.recv() => match update {
                Some(PollUpdate::Running { attempt }) => {
                    spinner.set_message(format!("Watching task {task_id} (poll {attempt})..."));
                }
                Some(PollUpdate::Completed { content }) => {
                    spinner.finish_and_clear();
                    println!("{content}");
                    return Ok(());
                }
                Some(PollUpdate::Failed { message }) => {
                    spinner.finish_and_clear();
                    logging::error(&message);
                    return Ok(());
                }
                Some(PollUpdate::TimedOut) => {
                    spinner.finish_and_clear();
                    logging::error(poller::TIMEOUT_MESSAGE);
                    return Ok(());
                }
                None => {
                    spinner.finish_and_clear();
                    return Ok(());
                }
            }
        }
    }
}

// === Providers ===

async fn run_providers(
    client: &PlatformClient,
    command: ProvidersCommand,
    json: bool,
) -> Result<()> {
    match command.command {
        ProvidersSubcommand::Specs => {
            let specs = providers::specs(client).await?;
            if json {
                return print_json(&specs);
            }
            for spec in specs {
                println!(
                    "{}  {}  ({} models)",
                    spec.provider_type.bold(),
                    spec.display_name.as_deref().unwrap_or(""),
                    spec.models.len()
                );
            }
            Ok(())
        }
        ProvidersSubcommand::List => {
            let items = providers::list(client).await?;
            if json {
                return print_json(&items);
            }
            for provider in items {
                println!(
                    "{}  {}  [{}]",
                    provider.id.dimmed(),
                    provider.name.bold(),
                    provider.provider_type
                );
            }
            Ok(())
        }
        ProvidersSubcommand::Create {
            name,
            provider_type,
            base_url,
            api_key,
        } => {
            let mut form = ProviderForm::new(name, provider_type, base_url, api_key);
            report_submission(form.submit(client).await, "provider")
        }
        ProvidersSubcommand::Delete { provider_id } => {
            providers::delete(client, &provider_id).await?;
            println!("Deleted provider {provider_id}");
            Ok(())
        }
    }
}

// === Models ===

async fn run_models(client: &PlatformClient, command: ModelsCommand, json: bool) -> Result<()> {
    match command.command {
        ModelsSubcommand::Specs { provider_type } => {
            let specs = model_api::specs(client, provider_type.as_deref()).await?;
            if json {
                return print_json(&specs);
            }
            for spec in specs {
                println!("{}  [{}]", spec.name.bold(), spec.provider_type);
            }
            Ok(())
        }
        ModelsSubcommand::List => {
            let items = model_api::list(client).await?;
            if json {
                return print_json(&items);
            }
            for model in items {
                println!(
                    "{}  {}  ({})",
                    model.id.dimmed(),
                    model.name.bold(),
                    model.model_name
                );
            }
            Ok(())
        }
        ModelsSubcommand::Create {
            provider,
            model_name,
            name,
        } => {
            let mut form = ModelForm::default();
            form.set_provider(provider);
            form.model_name = model_name;
            form.display_name = name;
            report_submission(form.submit(client).await, "model")
        }
        ModelsSubcommand::Delete { model_id } => {
            model_api::delete(client, &model_id).await?;
            println!("Deleted model {model_id}");
            Ok(())
        }
    }
}

// === MCP ===

async fn run_mcp(client: &PlatformClient, command: McpCommand, json: bool) -> Result<()> {
    match command.command {
        McpSubcommand::List => {
            let items = mcp::list(client).await?;
            if json {
                return print_json(&items);
            }
            for server in items {
                println!(
                    "{}  {}  {}",
                    server.id.dimmed(),
                    server.name.bold(),
                    server.status.as_deref().unwrap_or("unknown")
                );
            }
            Ok(())
        }
        McpSubcommand::Get { server_id } => {
            let server = mcp::get(client, &server_id).await?;
            if json {
                return print_json(&server);
            }
            println!("{}  {}", server.id.dimmed(), server.name.bold());
            if let Some(url) = server.url {
                println!("{url}");
            }
            Ok(())
        }
        McpSubcommand::Create {
            name,
            url,
            transport,
        } => {
            let mut form = McpServerForm::new(name, url, transport);
            report_submission(form.submit(client).await, "MCP server")
        }
        McpSubcommand::Delete { server_id } => {
            mcp::delete(client, &server_id).await?;
            println!("Deleted MCP server {server_id}");
            Ok(())
        }
        McpSubcommand::Start { server_id } => {
            let server = mcp::start(client, &server_id).await?;
            println!(
                "Started {} ({})",
                server.name,
                server.status.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
        McpSubcommand::Stop { server_id } => {
            let server = mcp::stop(client, &server_id).await?;
            println!(
                "Stopped {} ({})",
                server.name,
                server.status.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
        McpSubcommand::Deploy { server_id } => {
            let server = mcp::deploy(client, &server_id).await?;
            println!(
                "Deployed {} ({})",
                server.name,
                server.status.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
        McpSubcommand::Health { server_id } => {
            let health = mcp::health(client, &server_id).await?;
            println!("{}", utils::pretty_json(&health));
            Ok(())
        }
    }
}

// === Sources ===

async fn run_sources(client: &PlatformClient, command: SourcesCommand, json: bool) -> Result<()> {
    match command.command {
        SourcesSubcommand::List => {
            let items = sources::list(client).await?;
            if json {
                return print_json(&items);
            }
            for source in items {
                println!(
                    "{}  {}  {}",
                    source.id.dimmed(),
                    source.name.bold(),
                    source.status.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        SourcesSubcommand::Get { source_id } => {
            let source = sources::get(client, &source_id).await?;
            if json {
                return print_json(&source);
            }
            println!("{}  {}", source.id.dimmed(), source.name.bold());
            Ok(())
        }
        SourcesSubcommand::Create {
            name,
            source_type,
            description,
        } => {
            let mut form = SourceForm::new(name, source_type, description);
            report_submission(form.submit(client).await, "source")
        }
        SourcesSubcommand::Delete { source_id } => {
            sources::delete(client, &source_id).await?;
            println!("Deleted source {source_id}");
            Ok(())
        }
        SourcesSubcommand::Upload { files } => {
            let outcomes = upload::upload_batch(client, &files).await?;
            for outcome in outcomes {
                println!("Uploaded {} as source {}", outcome.file_name, outcome.source_id);
            }
            Ok(())
        }
    }
}

// === Output Helpers ===

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        let (r, g, b) = palette::RED_RGB;
        eprintln!("  {} {message}", format!("{field}:").truecolor(r, g, b));
    }
}

fn report_submission(
    result: Result<forms::Submitted, FormError>,
    entity: &str,
) -> Result<()> {
    match result {
        Ok(submitted) => {
            match submitted.id {
                Some(id) => println!("Created {entity} {id}"),
                None => println!("Created {entity}"),
            }
            Ok(())
        }
        Err(FormError::Invalid(errors)) => {
            print_field_errors(&errors);
            anyhow::bail!("{entity} validation failed")
        }
        Err(FormError::Api(message)) => {
            anyhow::bail!("Failed to create {entity}: {message}")
        }
    }
}
