mod cli;
mod console;
mod recommender;

#[tokio::main]
async fn main() {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(err) = cli::run().await {
        eprintln!("\n{err}");
        std::process::exit(1);
    }
}
