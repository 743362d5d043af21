//! panchayat-report - runs the civic-records analytical queries.

use panchayat_report::app;
use panchayat_report::cli::Cli;
use panchayat_report::logging;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init_stderr_logging();

    // A missing .env is normal; PG* variables may come from the shell
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    let stdout = std::io::stdout();

    if let Err(e) = app::run(&cli, stdout.lock()).await {
        error!(category = e.category(), "{e}");
        std::process::exit(1);
    }
}
