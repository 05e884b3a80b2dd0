use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use chirp::{ChirpError, Client, RefreshRotation, TokenKind, TokenSet};

#[derive(Parser)]
#[command(name = "chirp", version, about = "Log in to and post on the X v2 API over OAuth2")]
struct Cli {
    /// Path to a credentials JSON file (default: ./credentials.json, then
    /// ~/.chirp/credentials.json)
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize in the browser and print the issued tokens
    Login {
        /// Local port the provider redirects back to
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// How long to wait for the browser callback, in milliseconds
        #[arg(long, env = "CHIRP_OAUTH_TIMEOUT_MS", default_value_t = 120_000)]
        timeout: u64,

        /// Scopes to request (comma separated; overrides the credentials file)
        #[arg(long, value_delimiter = ',')]
        scopes: Option<Vec<String>>,
    },

    /// Post a status update
    Post {
        /// The status text
        text: String,

        /// Access token from a previous login
        #[arg(long, env = "CHIRP_ACCESS_TOKEN")]
        access_token: String,

        /// Restrict the post to super followers
        #[arg(long)]
        super_followers: bool,

        /// Tag a place by its id
        #[arg(long)]
        place: Option<String>,

        /// Attach a poll with this duration in minutes (requires --poll-options)
        #[arg(long, requires = "poll_options")]
        poll_duration: Option<u32>,

        /// Poll choices, comma separated
        #[arg(long, value_delimiter = ',', requires = "poll_duration")]
        poll_options: Option<Vec<String>>,

        /// Quote another post by id
        #[arg(long)]
        quote: Option<String>,

        /// Reply to a post by id
        #[arg(long)]
        reply_to: Option<String>,

        /// Who may reply: everyone, following, or mentionedUsers
        #[arg(long)]
        reply_settings: Option<String>,
    },

    /// Exchange a refresh token for a new access token
    Refresh {
        /// Refresh token from a previous login
        #[arg(long, env = "CHIRP_REFRESH_TOKEN")]
        refresh_token: String,

        /// Ignore a rotated refresh token in the response
        #[arg(long)]
        keep_refresh_token: bool,
    },

    /// Revoke tokens (revoking one also revokes the other when both are given)
    Revoke {
        #[arg(long, env = "CHIRP_ACCESS_TOKEN")]
        access_token: Option<String>,

        #[arg(long, env = "CHIRP_REFRESH_TOKEN")]
        refresh_token: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CHIRP_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ChirpError> {
    let file = chirp::load_credentials(cli.credentials.as_deref())?;
    let mut client = Client::new(file.credentials());
    if let Some(scopes) = file.scopes.clone() {
        client = client.scopes(scopes);
    }
    if let Some(uri) = file.redirect_uri.clone() {
        client = client.redirect_uri(uri);
    }

    match cli.command {
        Commands::Login {
            port,
            timeout,
            scopes,
        } => {
            if let Some(scopes) = scopes {
                client = client.scopes(scopes);
            }
            let response =
                chirp::run_login_flow(&mut client, port, Duration::from_millis(timeout)).await?;
            println!("Access token:  {}", response.access_token);
            match &client.tokens().refresh_token {
                Some(refresh) => println!("Refresh token: {refresh}"),
                None => println!(
                    "No refresh token granted (request the \"offline.access\" scope to get one)"
                ),
            }
            if let Some(expires) = client.tokens().expires_at {
                println!("Expires:       {expires}");
            }
            Ok(())
        }
        Commands::Post {
            text,
            access_token,
            super_followers,
            place,
            poll_duration,
            poll_options,
            quote,
            reply_to,
            reply_settings,
        } => {
            client.set_tokens(TokenSet {
                access_token: Some(access_token),
                ..TokenSet::default()
            });

            let mut post = client.post().text(&text);
            if super_followers {
                post = post.for_super_followers(true);
            }
            if let Some(place_id) = place {
                post = post.place(place_id);
            }
            if let (Some(duration), Some(options)) = (poll_duration, poll_options) {
                post = post.poll(duration, options);
            }
            if let Some(post_id) = quote {
                post = post.quote(post_id);
            }
            if let Some(post_id) = reply_to {
                post = post.in_reply_to(post_id);
            }
            if let Some(settings) = reply_settings {
                post = post.reply_settings(settings);
            }

            let response = post.send().await?;
            println!("Posted: https://x.com/i/status/{}", response.data.id);
            Ok(())
        }
        Commands::Refresh {
            refresh_token,
            keep_refresh_token,
        } => {
            if keep_refresh_token {
                client = client.refresh_rotation(RefreshRotation::Keep);
            }
            client.set_tokens(TokenSet {
                refresh_token: Some(refresh_token),
                ..TokenSet::default()
            });

            let response = client.refresh().await?;
            println!("Access token:  {}", response.access_token);
            if let Some(refresh) = &client.tokens().refresh_token {
                println!("Refresh token: {refresh}");
            }
            Ok(())
        }
        Commands::Revoke {
            access_token,
            refresh_token,
        } => {
            let kind = if access_token.is_some() {
                TokenKind::Access
            } else if refresh_token.is_some() {
                TokenKind::Refresh
            } else {
                return Err(ChirpError::NotAuthenticated);
            };
            client.set_tokens(TokenSet {
                access_token,
                refresh_token,
                expires_at: None,
            });

            client.revoke(kind).await?;
            println!("Revoked.");
            Ok(())
        }
    }
}
