use schemadiff::client::tui::SchemaDiffUI;
use schemadiff::models::connections::ProfileStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let profile_store = ProfileStore::from_env();
    let mut tui = SchemaDiffUI::new(profile_store);
    tui.run().await?;

    Ok(())
}
