use crate::api::ApiClient;
use crate::cli::{Args, Command};
use crate::config::{Config, Endpoints};
use crate::error::{Error, Result};

pub async fn run_cli(args: Args) -> Result<()> {
    if matches!(args.command, Some(Command::Version)) {
        println!("repolens v{}", crate::VERSION);
        return Ok(());
    }

    let config = Config::resolve(args.base_url, args.config).await?;

    match args.command {
        Some(Command::Ingest { url }) => {
            let api = client(&config)?;
            handle_ingest(&api, &url).await
        }
        Some(Command::Tree) => {
            let api = client(&config)?;
            for path in api.tree_structure().await? {
                println!("{path}");
            }
            Ok(())
        }
        Some(Command::Source) => {
            let api = client(&config)?;
            println!("{}", api.source().await?);
            Ok(())
        }
        Some(Command::Files) => {
            let api = client(&config)?;
            for entry in api.list_files().await? {
                println!("{}\t{}", entry.name, entry.path);
            }
            Ok(())
        }
        Some(Command::Show { name }) => {
            let api = client(&config)?;
            handle_show(&api, &name).await
        }
        Some(Command::Ask { question }) => {
            let api = client(&config)?;
            handle_ask(&api, &question).await
        }
        Some(Command::Reset) => {
            let api = client(&config)?;
            let body = api.reset_memory().await?;
            tracing::debug!(response = %body, "reset_memory settled");
            println!("Memory has been reset");
            Ok(())
        }
        Some(Command::Version) => Ok(()),
        None => {
            // Launch TUI
            let mut app = crate::ui::App::new(config)?;
            app.run().await
        }
    }
}

fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(Endpoints::new(config), config.request_timeout)
}

async fn handle_ingest(api: &ApiClient, url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::invalid_input("repository URL must not be empty"));
    }

    let body = api.clone_repo(url).await?;
    tracing::debug!(response = %body, "clone_repos settled");
    println!("Repository ingested: {url}");
    Ok(())
}

async fn handle_show(api: &ApiClient, name: &str) -> Result<()> {
    // Same contract as the viewer: an unmatched display name is forwarded
    // to the backend as a null path, not rejected here.
    let files = api.list_files().await?;
    let dir = files
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.path.as_str());
    if dir.is_none() {
        tracing::warn!(%name, "display name not in listing; sending null path");
    }

    let text = api.show_code(dir).await?;
    println!("{text}");
    Ok(())
}

async fn handle_ask(api: &ApiClient, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::invalid_input("question must not be empty"));
    }

    let reply = api.chat(question).await?;
    println!("{}", reply.answer);
    if !reply.source.is_empty() {
        println!("source: {}", reply.source);
    }
    Ok(())
}
