#[tokio::main]
async fn main() -> anyhow::Result<()> {
    image_captioner_lib::run().await
}
