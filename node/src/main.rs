mod adapters;
mod host;
mod peripherals;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    host::run().await
}
