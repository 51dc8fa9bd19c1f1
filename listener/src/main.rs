mod host;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    host::run().await
}
