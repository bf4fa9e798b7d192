#[tokio::main]
async fn main() {
    std::process::exit(remote_store_cli::run().await);
}
