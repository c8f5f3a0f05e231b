#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agent_gateway_lib::run().await
}
