use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use posts_client::{NewPost, Post, PostStatus, PostType, PostUpdate, PostsClient};

#[derive(Parser, Debug)]
#[command(about = "Command line client for the posts API")]
struct Cli {
    /// Base URL of the API server.
    #[arg(short, long, env = "POSTS_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Where `signin` stores the access token.
    #[arg(long, env = "POSTS_TOKEN_FILE", default_value = ".posts_token")]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token.
    Signout,
    Me,
    /// Public active posts; with `--all`, every post (needs a token).
    List {
        #[arg(long)]
        all: bool,
    },
    Search {
        title: String,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        author_id: i64,
        #[arg(long, value_enum, default_value_t = Kind::Public)]
        kind: Kind,
        #[arg(long, value_enum, default_value_t = Lifecycle::Active)]
        status: Lifecycle,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_enum)]
        kind: Option<Kind>,
        #[arg(long, value_enum)]
        status: Option<Lifecycle>,
    },
    Delete {
        id: i64,
    },
    Health,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Public,
    Private,
}

impl From<Kind> for PostType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Public => PostType::Public,
            Kind::Private => PostType::Private,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Lifecycle {
    Active,
    Inactive,
}

impl From<Lifecycle> for PostStatus {
    fn from(status: Lifecycle) -> Self {
        match status {
            Lifecycle::Active => PostStatus::Active,
            Lifecycle::Inactive => PostStatus::Inactive,
        }
    }
}

fn print_posts(posts: &[Post]) {
    println!("Posts ({})", posts.len());
    for post in posts {
        println!(
            "- [{}] {} (by {}, {:?}/{:?})",
            post.id, post.title, post.author_id, post.post_type, post.status
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut client = PostsClient::new(&args.server)?;
    if let Ok(token) = fs::read_to_string(&args.token_file) {
        client.set_token(Some(token.trim().to_string()));
    }

    match args.command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            let user = client.signup(&name, &email, &password).await?;
            println!("Registered user {} ({})", user.id, user.email);
        }
        Command::Signin { email, password } => {
            let token = client.signin(&email, &password).await?;
            fs::write(&args.token_file, token)
                .with_context(|| format!("writing {}", args.token_file.display()))?;
            println!("Signed in; token saved to {}", args.token_file.display());
        }
        Command::Signout => {
            if args.token_file.exists() {
                fs::remove_file(&args.token_file)?;
            }
            println!("Signed out");
        }
        Command::Me => print_json(&client.me().await?)?,
        Command::List { all } => {
            let posts = if all {
                client.list_all().await?
            } else {
                client.list_public().await?
            };
            print_posts(&posts);
        }
        Command::Search { title } => print_posts(&client.search(&title).await?),
        Command::Get { id } => print_json(&client.get_post(id).await?)?,
        Command::Create {
            title,
            content,
            author_id,
            kind,
            status,
        } => {
            let post = client
                .create_post(&NewPost {
                    title,
                    content,
                    author_id,
                    post_type: kind.into(),
                    status: status.into(),
                })
                .await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Update {
            id,
            title,
            content,
            kind,
            status,
        } => {
            let update = PostUpdate {
                title,
                content,
                post_type: kind.map(Into::into),
                status: status.map(Into::into),
            };
            print_json(&client.update_post(id, &update).await?)?;
        }
        Command::Delete { id } => println!("{}", client.delete_post(id).await?),
        Command::Health => print_json(&client.health().await?)?,
    }

    Ok(())
}
