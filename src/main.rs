use anyhow::anyhow;
use hotel_admin::configuration::get_configuration;
use hotel_admin::email::SesEmailClient;
use hotel_admin::startup::Application;
use hotel_admin::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("hotel_admin".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = get_configuration()?;
    let email_client = SesEmailClient::from_settings(&configuration.email_client).await?;
    let application = Application::build(&configuration, Arc::new(email_client))
        .await
        .map_err(|e| anyhow!("Failed to build the application: {}", e))?;
    application
        .server
        .launch()
        .await
        .map_err(|e| anyhow!("Server failed: {}", e))?;
    Ok(())
}
