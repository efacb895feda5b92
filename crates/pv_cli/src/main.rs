use std::path::PathBuf;
use clap::{ArgGroup, Parser};
use tracing::info;

mod config;
mod explore;
mod logging;
mod map;
mod state;
mod views;

use config::{Config, GlobalArgs};
use map::PixelPoint;
use state::{AppState, RATING_DISLIKE, RATING_LIKE};
use views::ListMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explore, search and rate articles of a pubvis backend", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Keyword search on titles and authors
    Search {
        query: String,
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Show an article with its similar articles and add it to the history
    Item { id: String },
    /// Articles similar to the given one
    Similar {
        id: String,
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Articles similar to a free text, e.g. an abstract
    Compare {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Personal recommendations based on your ratings
    Recommended {
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// A random selection of articles
    Random {
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Rate an article
    #[command(group(ArgGroup::new("rating").required(true).args(["like", "dislike"])))]
    Rate {
        id: String,
        #[arg(long)]
        like: bool,
        #[arg(long)]
        dislike: bool,
    },
    /// Recently viewed articles
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Print the anonymous user id used for ratings
    Whoami,
    /// Check that the backend is reachable
    Health,
    /// Render the corpus scatterplot
    Map {
        /// SVG output path, `-` for stdout
        #[arg(short, long, default_value = "map.svg")]
        output: PathBuf,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Open the article under pixel X,Y instead of writing the SVG
        #[arg(long)]
        pick: Option<PixelPoint>,
        /// Read item_info.json and xyc.json from this directory instead of the backend
        #[arg(long)]
        from_dir: Option<PathBuf>,
    },
    /// Interactive search-as-you-type explorer
    Explore,
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let mut state = AppState::new(&config).await?;

    match cli.command {
        Commands::Search { query, n } => {
            if let Some(results) = state.search(&query, n).await? {
                print!("{}", results);
            }
        }
        Commands::Item { id } => print!("{}", state.load_article(&id, ListMode::Similar).await?),
        Commands::Similar { id, n } => print!("{}", state.similar(&id, n).await?),
        Commands::Compare { text, n } => print!("{}", state.compare(&text.join(" "), n).await?),
        Commands::Recommended { n } => print!("{}", state.recommended(n).await?),
        Commands::Random { n } => print!("{}", state.random(n).await?),
        Commands::Rate { id, like, dislike } => {
            let rating = if like && !dislike { RATING_LIKE } else { RATING_DISLIKE };
            if state.rate(&id, rating).await {
                println!("Rated {} with {}", id, rating);
            }
        }
        Commands::History { clear } => {
            if clear {
                state.clear_history().await?;
            } else {
                print!("{}", state.history().await);
            }
        }
        Commands::Whoami => println!("{}", state.user_id().await?),
        Commands::Health => {
            let status = state.api.health().await?;
            println!("{} is up: {}", state.hostname, status);
        }
        Commands::Map { output, width, height, pick, from_dir } => {
            let plot = match from_dir {
                Some(dir) => map::build_plot(pv_vis::FileSource::new(dir), width, height).await?,
                None => map::build_plot(state.api.as_ref().clone(), width, height).await?,
            };
            match pick {
                Some(point) => match plot.pick(point.x, point.y) {
                    Some(id) => {
                        let id = id.to_string();
                        print!("{}", state.load_article(&id, ListMode::Similar).await?);
                    }
                    None => println!("No article at {},{}", point.x, point.y),
                },
                None => {
                    map::write_svg(&plot.render_svg(&state.item_link_base()), &output).await?;
                    info!("🗺️ Map written to {}", output.display());
                }
            }
        }
        Commands::Explore => explore::run(state).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose);

    let config = Config::from_args(&cli.global)?;
    info!("🔌 Using backend {} (data in {})", config.hostname, config.data_dir.display());
    run(cli, config).await
}
