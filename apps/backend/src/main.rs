#[tokio::main]
async fn main() -> anyhow::Result<()> {
    readcards_backend::run().await
}
