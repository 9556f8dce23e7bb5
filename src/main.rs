#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = unitrack::run().await {
        eprintln!("unitrack fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
