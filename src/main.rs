#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mintgate::server::run().await
}
