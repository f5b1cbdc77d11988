#![forbid(unsafe_code)]

//! Terminal client for a KageMarks server.

mod commands;
mod output;
mod watch;

use std::sync::Arc;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use client::{
    views::{AddBookmarkForm, BookmarkList, Navbar},
    HttpSessionClient, SessionClient,
};
use dotenvy::dotenv;
use entities::User;
use url::Url;

#[derive(Parser)]
#[command(name = "kagemarks-cli")]
#[command(about = "Manage and watch your KageMarks bookmarks from a terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the KageMarks server
    #[arg(long, env = "KAGEMARKS_SERVER", default_value = "http://localhost:8080", global = true)]
    server: Url,

    /// Session token printed by `login`
    #[arg(long, env = "KAGEMARKS_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[arg(long, env = "KAGEMARKS_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, env = "KAGEMARKS_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print a session token
    Login,
    /// Show who the session belongs to
    Whoami,
    /// Print your bookmarks, newest first
    List,
    /// Add a bookmark
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        url: String,
    },
    /// Delete a bookmark by id
    Delete { id: String },
    /// Keep the list on screen and follow changes live
    Watch,
    /// End the session on the server
    SignOut,
}

async fn connect(cli: &Cli) -> anyhow::Result<HttpSessionClient> {
    if let Some(token) = &cli.token {
        return Ok(HttpSessionClient::new(cli.server.clone(), token.clone()));
    }

    match (&cli.username, &cli.password) {
        (Some(username), Some(password)) => {
            log::debug!("Signing in to {} as {}", cli.server, username);
            HttpSessionClient::sign_in(cli.server.clone(), username, password).await
        }
        _ => bail!("pass --token, or --username and --password"),
    }
}

async fn signed_in_user(client: &HttpSessionClient) -> anyhow::Result<User> {
    client
        .current_user()
        .await?
        .ok_or_else(|| anyhow!("session is no longer valid, sign in again"))
}

async fn mounted_list(
    client: &Arc<HttpSessionClient>,
) -> anyhow::Result<BookmarkList<HttpSessionClient>> {
    let user = signed_in_user(client).await?;
    let mut list = BookmarkList::new(Arc::clone(client), &user);
    list.mount().await?;
    Ok(list)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let client = Arc::new(connect(&cli).await?);

    match cli.command {
        Commands::Login => println!("{}", client.token()),
        Commands::Whoami => {
            let navbar = Navbar::load(client.as_ref()).await?;
            print!("{}", output::identity(&navbar));
        }
        Commands::List => {
            let mut list = mounted_list(&client).await?;
            print!("{}", output::render_list(list.bookmarks()));
            list.teardown();
        }
        Commands::Add { title, url } => {
            let mut form = AddBookmarkForm::default();
            form.title = title;
            form.url = url;
            match form.submit(client.as_ref()).await {
                Some(bookmark) => println!("Added {}", output::bookmark_line(&bookmark)),
                None => bail!("{}", form.error().unwrap_or("Failed to save bookmark")),
            }
        }
        Commands::Delete { id } => {
            let mut list = mounted_list(&client).await?;
            list.delete(&id).await?;
            list.teardown();
            println!("Deleted {id}");
        }
        Commands::Watch => {
            let mut list = mounted_list(&client).await?;
            watch::run(
                &mut list,
                client.as_ref(),
                watch::stdin_lines(),
                &mut std::io::stdout(),
            )
            .await?;
        }
        Commands::SignOut => {
            let mut navbar = Navbar::load(client.as_ref()).await?;
            navbar.sign_out(client.as_ref()).await?;
            println!("Signed out");
        }
    }

    Ok(())
}
