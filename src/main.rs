use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::PathBuf;
use wg_allowed_ips::config::{self, Settings};
use wg_allowed_ips::get_allowed_cidrs;
use wg_allowed_ips::output::{print_cidr_table, render_allowed_ips, splice_allowed_ips_file};

/// Compute the WireGuard AllowedIPs list for a peer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CIDR to route through the tunnel (repeatable)
    #[arg(long, value_name = "CIDR")]
    allow: Vec<String>,

    /// CIDR to route around the tunnel (repeatable)
    #[arg(long, value_name = "CIDR")]
    block: Vec<String>,

    /// JSON file with named subnet definitions
    #[arg(long, env = config::ENV_CATALOG)]
    catalog: Option<PathBuf>,

    /// JSON file with per-user subnet preferences
    #[arg(long, env = config::ENV_PREFERENCES)]
    preferences: Option<PathBuf>,

    /// User whose preferences select the subnets
    #[arg(long, env = config::ENV_USER)]
    user: Option<i64>,

    /// WireGuard config file whose AllowedIPs line is replaced in place
    #[arg(long, value_name = "PATH")]
    wg_config: Option<PathBuf>,

    /// Print a table instead of a comma separated list
    #[arg(long)]
    table: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    init_logging()?;
    let args = Args::parse();
    log::info!("#Start main()");

    let settings = Settings {
        catalog: args.catalog,
        preferences: args.preferences,
        user: args.user,
        allow: args.allow,
        block: args.block,
    };
    let cidrs = get_allowed_cidrs(&settings).await?;
    let cidr_strings: Vec<String> = cidrs.iter().map(|c| c.to_string()).collect();

    if let Some(path) = &args.wg_config {
        let spliced = splice_allowed_ips_file(path, &cidr_strings)?;
        print!("{spliced}");
    } else if args.table {
        print_cidr_table(&cidrs);
    } else {
        println!("{}", render_allowed_ips(&cidr_strings));
    }

    Ok(())
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    if log4rs::init_file(config::LOG_CONFIG_FILE, Default::default()).is_ok() {
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l:5})} - {m}{n}")))
        .build();
    let log_config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?;
    log4rs::init_config(log_config)?;
    Ok(())
}
