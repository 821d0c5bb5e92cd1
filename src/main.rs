use candidate_grading::infrastructure::TokioClock;
use candidate_grading::mocks::{NotificationMock, PaymentMock, QueryParams};
use candidate_grading::utils::logging;
use candidate_grading::{
    AppResult, Config, FeedbackAugmentor, FeedbackRun, GradingRun, LlmService, RenderMode,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "candidate-grading")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Grade candidate submissions and append AI feedback", long_about = None)]
struct Cli {
    /// Directory containing the candidate folders
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(long, global = true, env = "GRADING_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every candidate folder, rank the scores and write the summary
    Summarize {
        /// Which summary document to write
        #[arg(long, value_enum, default_value_t = RenderMode::Standalone)]
        mode: RenderMode,
    },

    /// Append AI feedback to candidate reports that do not have it yet
    Feedback {
        /// Process only this candidate folder
        #[arg(long)]
        candidate: Option<String>,
    },

    /// Invoke one of the simulated collaborator endpoints
    Mock {
        #[command(subcommand)]
        endpoint: MockEndpoint,
    },
}

#[derive(Subcommand)]
enum MockEndpoint {
    /// Order status notification (4-8 s delay)
    Notification {
        #[arg(long)]
        status: Option<String>,
    },
    /// Payment processing (1 s delay, 30% failure)
    Payment {
        #[arg(long)]
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("❌ {}", e);
            eprintln!("\nERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<ExitCode> {
    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root_dir = root;
    }

    match cli.command {
        Commands::Summarize { mode } => {
            logging::log_startup("成绩汇总", &config.root_dir);
            GradingRun::new(config, mode).run().await?;
        }
        Commands::Feedback { candidate } => {
            logging::log_startup("反馈生成", &config.root_dir);
            let augmentor = FeedbackAugmentor::new(&config, Box::new(LlmService::new(&config)));
            let feedback = FeedbackRun::new(&config, augmentor, Box::new(TokioClock));

            match candidate {
                Some(name) => {
                    feedback.run_single(&name).await?;
                }
                None => {
                    let stats = feedback.run_batch().await?;
                    logging::print_feedback_summary(
                        stats.processed,
                        stats.skipped,
                        stats.missing,
                        stats.failed,
                    );
                }
            }
        }
        Commands::Mock { endpoint } => {
            let response = match endpoint {
                MockEndpoint::Notification { status } => {
                    NotificationMock::default().handle(&query("status", status)).await
                }
                MockEndpoint::Payment { value } => {
                    PaymentMock::default().handle(&query("value", value)).await
                }
            };
            println!("{} {}", response.status_code, response.body);
            if !response.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn query(key: &str, value: Option<String>) -> QueryParams {
    value.map(|v| (key.to_string(), v)).into_iter().collect()
}
