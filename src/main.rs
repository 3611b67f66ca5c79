use clap::Parser;
use tracing_subscriber::EnvFilter;

use repoanalyzer::{AnalysisConfig, Config, DateWindow, Orchestrator};

#[derive(Parser, Debug)]
#[command(name = "repoanalyzer")]
#[command(version = "0.1.0")]
#[command(about = "Report the most active contributors and pull request / issue counts of a GitHub repository")]
struct Args {
    /// URL of public repository
    url: String,

    /// Repository branch. Default is master
    #[arg(long)]
    branch: Option<String>,

    /// Analysis start date, YYYY-MM-DD or dd.mm.yyyy
    #[arg(long = "start_date", alias = "start-date")]
    start_date: Option<String>,

    /// Analysis end date, YYYY-MM-DD or dd.mm.yyyy
    #[arg(long = "end_date", alias = "end-date")]
    end_date: Option<String>,

    /// Personal access token. Falls back to GITHUB_TOKEN
    #[arg(long)]
    pat: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, the report to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("repoanalyzer=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let window = match DateWindow::parse(args.start_date.as_deref(), args.end_date.as_deref()) {
        Ok(window) => window,
        Err(e) => fail(e),
    };

    let analysis = AnalysisConfig {
        url: args.url,
        branch: args.branch,
        window,
        personal_access_token: args.pat,
    };

    let mut orchestrator = match Orchestrator::connect(&config, &analysis).await {
        Ok(orchestrator) => orchestrator,
        Err(e) if e.is_validation() => fail(e),
        Err(e) => return Err(e.into()),
    };

    println!("Processing ... ");
    orchestrator.run().await;
    orchestrator.display();

    Ok(())
}

/// Validation failures end the process before any report is produced.
fn fail(error: repoanalyzer::Error) -> ! {
    eprintln!("{}", error);
    std::process::exit(1);
}
