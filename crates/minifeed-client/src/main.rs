mod cli;

use std::error::Error;
use std::sync::Arc;

use cli::{Command, Config};
use log::{debug, info};
use minifeed_client::auth::{LOGIN_FAILED, REGISTRATION_FAILED};
use minifeed_client::{
    ApiClient, AuthService, Credentials, Feed, FileStore, PostsApi, StoredAuth,
};
use minifeed_core::{compress_image, format_file_size, CompressOptions, Post, SelectedImage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();

    let store = FileStore::open(config.session())?;
    let credentials = Credentials::new(Arc::new(store));
    let api = Arc::new(ApiClient::new(config.client(), credentials.clone())?);
    let auth = AuthService::new(api.clone(), credentials);

    match config.command {
        Command::Register { mobile, name } => {
            auth.register(&mobile, &name)
                .await
                .map_err(|e| e.user_message(REGISTRATION_FAILED))?;
            println!("Registration successful. Log in with the OTP you received.");
        }
        Command::Login { mobile, otp } => {
            let session = auth
                .login(&mobile, &otp)
                .await
                .map_err(|e| e.user_message(LOGIN_FAILED))?;
            println!("Welcome, {}!", session.user.name);
        }
        Command::Logout => {
            auth.logout(None)?;
            println!("Logged out.");
        }
        Command::Whoami => match auth.current() {
            StoredAuth {
                user: Some(user),
                is_authenticated: true,
                ..
            } => println!("{} ({})", user.name, user.mobile),
            _ => println!("Not logged in."),
        },
        Command::Feed { all } => {
            let posts = if all {
                api.all_posts().await?
            } else {
                let feed = Feed::new(api.clone());
                if let Err(err) = feed.fetch_mine().await {
                    debug!("fetch failed: {:?}", err);
                }
                let state = feed.snapshot();
                if let Some(message) = state.error {
                    return Err(message.into());
                }
                state.posts
            };
            print_posts(&posts);
        }
        Command::Post { description, image } => {
            let image = SelectedImage::from_path(&image)?;
            info!("{}", image.selection_notice());

            let feed = Feed::new(api.clone());
            let post = feed
                .create(&description, Some(&image))
                .await
                .map_err(|e| e.user_message())?;
            println!("Post created successfully!");
            print_posts(&[post]);
        }
        Command::Compress {
            path,
            max_width,
            quality,
            output,
        } => {
            let image = SelectedImage::from_path(&path)?;
            let options = CompressOptions::new(max_width, quality);
            let compressed = compress_image(image.bytes(), &options)?;
            println!(
                "{}x{}  {} -> {}",
                compressed.width(),
                compressed.height(),
                format_file_size(image.size()),
                format_file_size(compressed.decoded_size() as u64)
            );
            if let Some(output) = output {
                std::fs::write(&output, compressed.jpeg_bytes()?)?;
                info!("Wrote {}", output.display());
            }
        }
    }

    Ok(())
}

fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts yet.");
    }
    for post in posts {
        println!(
            "#{}  {}  {}",
            post.short_id(),
            post.display_date(),
            post.description
        );
    }
}
