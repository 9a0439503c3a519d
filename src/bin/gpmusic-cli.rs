use clap::{Parser, Subcommand, ValueEnum};
use gpmusic::{Client, ErrorBehaviour, SearchTypes, StreamQuality};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gpmusic-cli")]
#[command(about = "CLI for gpmusic - Google Play Music client", long_about = None)]
struct Cli {
    /// Auth token (can also be set via GPM_TOKEN env var)
    #[arg(long, env = "GPM_TOKEN")]
    token: String,

    /// Locale sent with every request
    #[arg(short, long, default_value = gpmusic::DEFAULT_LOCALE)]
    locale: String,

    /// Android device ID; defaults to the first Android device of the account
    #[arg(long, env = "GPM_ANDROID_ID")]
    android_id: Option<String>,

    /// Only log error responses instead of failing on them
    #[arg(long)]
    log_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Quality {
    Hi,
    Med,
    Low,
}

impl From<Quality> for StreamQuality {
    fn from(q: Quality) -> Self {
        match q {
            Quality::Hi => StreamQuality::High,
            Quality::Med => StreamQuality::Medium,
            Quality::Low => StreamQuality::Low,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Search query
        query: String,

        /// Only return tracks
        #[arg(long)]
        tracks: bool,

        /// Limit results
        #[arg(short = 'n', long, default_value_t = gpmusic::DEFAULT_MAX_RESULTS)]
        limit: u32,
    },
    /// List devices registered to the account
    Devices,
    /// Print a short-lived stream URL for the first track matching a query
    TrackUrl {
        /// Search query
        query: String,

        /// Stream quality
        #[arg(short, long, value_enum, default_value_t = Quality::Hi)]
        quality: Quality,
    },
    /// Print the account configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut builder = Client::builder().auth_token(cli.token).locale(cli.locale);
    if let Some(android_id) = cli.android_id {
        builder = builder.android_id(android_id);
    }
    if cli.log_errors {
        builder = builder.error_behaviour(ErrorBehaviour::Log);
    }
    let client = builder.build().await?;

    match cli.command {
        Commands::Search {
            query,
            tracks,
            limit,
        } => {
            println!("Searching for '{}'...", query);
            if tracks {
                let results = client.search_tracks(&query, Some(limit)).await?;
                for (i, track) in results.iter().enumerate() {
                    println!(
                        "{}. {} - {} [{}] (ID: {})",
                        i + 1,
                        track.artist,
                        track.title,
                        track.duration_formatted(),
                        track.store_id.as_deref().unwrap_or("?")
                    );
                }
            } else {
                let Some(response) = client.search(&query, limit, &SearchTypes::all()).await? else {
                    println!("Search failed, see log");
                    return Ok(());
                };
                for track in response.tracks() {
                    println!("track   {} - {}", track.artist, track.title);
                }
                for album in response.albums() {
                    println!("album   {} - {}", album.album_artist, album.name);
                }
                for artist in response.artists() {
                    println!("artist  {}", artist.name);
                }
            }
        }
        Commands::Devices => {
            let Some(devices) = client.get_registered_devices().await? else {
                println!("Device list unavailable, see log");
                return Ok(());
            };
            for device in devices.devices() {
                println!(
                    "{:?}\t{}\t{}",
                    device.device_type, device.id, device.friendly_name
                );
            }
        }
        Commands::TrackUrl { query, quality } => {
            let tracks = client.search_tracks(&query, Some(1)).await?;
            match tracks.first() {
                Some(track) => {
                    println!("{} - {}", track.artist, track.title);
                    match client.get_track_url(track, quality.into()).await? {
                        Some(url) => println!("{}", url),
                        None => println!("No stream URL, see log"),
                    }
                }
                None => println!("No track found for '{}'", query),
            }
        }
        Commands::Config => {
            let config = client.config();
            println!("locale:       {}", config.locale());
            println!("android ID:   {}", config.android_id());
            println!("subscription: {}", config.subscription());
            for (key, value) in config.entries() {
                println!("{} = {}", key, value);
            }
        }
    }

    Ok(())
}
