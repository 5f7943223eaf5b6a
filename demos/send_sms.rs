use std::io;

use notify_client::{Credential, NotifyClient, Personalisation, Reference};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notify_client=info")),
        )
        .init();

    let api_key = required_env("NOTIFY_API_KEY")?;
    let template_id = required_env("NOTIFY_SMS_TEMPLATE_ID")?;
    let phone_number = required_env("NOTIFY_PHONE")?;
    let name = std::env::var("NOTIFY_NAME").unwrap_or_else(|_| "John".to_owned());

    let mut builder = NotifyClient::builder(Credential::parse(&api_key)?);
    if let Ok(base_url) = std::env::var("NOTIFY_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    let client = builder.build()?;

    let personalisation = Personalisation::new()
        .with("name", name)
        .with("day", "Friday");
    let sent = client
        .send_sms(
            &template_id,
            &phone_number,
            &[&personalisation, &Reference::new("send_sms demo")],
        )
        .await?;

    println!("id: {}, uri: {}, body: {:?}", sent.id, sent.uri, sent.content.body);
    Ok(())
}

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}
