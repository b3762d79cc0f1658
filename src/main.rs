#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pedidobot::run().await
}
