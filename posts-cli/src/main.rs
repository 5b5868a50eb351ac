use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use posts_client::{Attachment, BulkPost, PostForm, PostsClient};

#[derive(Parser, Debug)]
#[command(about = "Command line client for the posts backend")]
struct Cli {
    #[clap(short, long, env = "POSTS_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct MediaArgs {
    #[clap(long)]
    image_url: Option<String>,
    #[clap(long)]
    video_url: Option<String>,
    /// Uploaded instead of --image-url when both are given
    #[clap(long)]
    image_file: Option<PathBuf>,
    /// Uploaded instead of --video-url when both are given
    #[clap(long)]
    video_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Get {
        id: i64,
    },
    Create {
        #[clap(long)]
        content: String,
        #[clap(flatten)]
        media: MediaArgs,
    },
    /// Creates every post of a JSON array file in one call
    Bulk {
        file: PathBuf,
    },
    Update {
        id: i64,
        #[clap(long)]
        content: String,
        #[clap(flatten)]
        media: MediaArgs,
    },
    Delete {
        id: i64,
    },
    Like {
        id: i64,
    },
}

async fn build_form(content: String, media: MediaArgs) -> anyhow::Result<PostForm> {
    let mut form = PostForm::new(content);
    form.image_url = media.image_url;
    form.video_url = media.video_url;
    if let Some(path) = media.image_file {
        form.image_file = Some(Attachment::from_path(&path).await?);
    }
    if let Some(path) = media.video_file {
        form.video_file = Some(Attachment::from_path(&path).await?);
    }
    Ok(form)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let client = PostsClient::connect(&args.server)?;

    match args.command {
        Command::List => {
            let posts = client.list_posts().await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!("- {}", post);
            }
        }
        Command::Get { id } => {
            let post = client.get_post(id).await?;
            println!("{}", post);
        }
        Command::Create { content, media } => {
            let post = client.create_post(build_form(content, media).await?).await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Bulk { file } => {
            let raw = tokio::fs::read(&file)
                .await
                .with_context(|| format!("could not read {}", file.display()))?;
            let items: Vec<BulkPost> =
                serde_json::from_slice(&raw).context("bulk file must be a JSON array of posts")?;
            let posts = client.create_posts_bulk(&items).await?;
            println!("Created {} posts", posts.len());
            for post in posts {
                println!("- {}", post);
            }
        }
        Command::Update { id, content, media } => {
            let post = client
                .update_post(id, build_form(content, media).await?)
                .await?;
            println!("Post updated: {}", post);
        }
        Command::Delete { id } => {
            let message = client.delete_post(id).await?;
            println!("{}", message);
        }
        Command::Like { id } => {
            let post = client.like_post(id).await?;
            println!("Post {} now has {} likes", post.id, post.likes);
        }
    }

    Ok(())
}
