mod cli;
mod infra;
mod report;
mod routes;
mod server;

use school_ratings::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
