use clap::{Parser, Subcommand};
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use hello_agent::agents::{register_default_agents, AgentRegistry};
use hello_agent::gateway::{RunCreateRequest, RunMode, RunResponse, EVENT_FRAGMENT};
use hello_agent::message::{Message, OutboundFragment};

#[derive(Parser)]
#[command(name = "hello-agent")]
#[command(about = "Hello-world echo agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: HELLO_AGENT_CONFIG_PATH or ~/.hello-agent/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Register the echo agent and serve it over HTTP until Ctrl+C.
    Serve {
        /// Config file path (default: HELLO_AGENT_CONFIG_PATH or ~/.hello-agent/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from PORT, config, or 8000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send one run to a running server and print the agent's output.
    Run {
        /// Config file path (default: HELLO_AGENT_CONFIG_PATH or ~/.hello-agent/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Agent to invoke (default: the configured agent name)
        #[arg(long, short)]
        agent: Option<String>,

        /// Stream fragments as the agent produces them.
        #[arg(long)]
        stream: bool,

        /// One input message per argument.
        #[arg(value_name = "MESSAGE")]
        messages: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("hello-agent {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("serve failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Run {
            config,
            agent,
            stream,
            messages,
        }) => {
            if let Err(e) = run_client(config, agent, stream, messages).await {
                log::error!("run failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(hello_agent::config::default_config_path);
    let dir = hello_agent::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _path) = hello_agent::config::load_config(config_path)?;
    if let Some(p) = port {
        config.server.port = p;
    }
    let registry = AgentRegistry::new();
    register_default_agents(&registry, &config.agent).await;
    log::info!("starting server on {}:{}", config.server.bind, config.server.port);
    hello_agent::gateway::run_gateway(config, registry).await
}

fn print_fragment(fragment: &OutboundFragment) {
    println!("< {}", fragment.text().unwrap_or_default());
}

async fn run_client(
    config_path: Option<std::path::PathBuf>,
    agent: Option<String>,
    stream: bool,
    messages: Vec<String>,
) -> anyhow::Result<()> {
    let (config, _) = hello_agent::config::load_config(config_path)?;
    let url = format!("{}/runs", config.server.base_url());
    let request = RunCreateRequest {
        agent_name: agent.unwrap_or_else(|| config.agent.name.clone()),
        input: messages.into_iter().map(Message::user).collect(),
        mode: if stream { RunMode::Stream } else { RunMode::Sync },
    };

    let resp = reqwest::Client::new().post(&url).json(&request).send().await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("{} returned {}: {}", url, status, body);
    }

    if !stream {
        let run: RunResponse = resp.json().await?;
        log::debug!("run {} {:?}", run.run_id, run.status);
        for fragment in &run.output {
            print_fragment(fragment);
        }
        return Ok(());
    }

    let mut events = resp.bytes_stream().eventsource();
    while let Some(event) = events.next().await {
        let event = event.map_err(|e| anyhow::anyhow!("event stream: {}", e))?;
        if event.event == EVENT_FRAGMENT {
            let fragment: OutboundFragment = serde_json::from_str(&event.data)?;
            print_fragment(&fragment);
        } else {
            log::debug!("{}: {}", event.event, event.data);
        }
    }
    Ok(())
}
