use std::io;

use notify_client::{Credential, EmailReplyToId, NotifyClient, Personalisation, Reference};
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
    let template_id = required_env("NOTIFY_EMAIL_TEMPLATE_ID")?;
    let email_address = required_env("NOTIFY_EMAIL")?;

    let mut builder = NotifyClient::builder(Credential::parse(&api_key)?);
    if let Ok(base_url) = std::env::var("NOTIFY_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    let client = builder.build()?;

    let personalisation = Personalisation::new()
        .with("name", "John")
        .with("colour", "pink");
    let reference = Reference::new("send_email demo");
    let reply_to = std::env::var("NOTIFY_REPLY_TO_ID").ok().map(EmailReplyToId::new);

    let sent = match reply_to.as_ref() {
        Some(reply_to) => {
            client
                .send_email(
                    &template_id,
                    &email_address,
                    &[&personalisation, &reference, reply_to],
                )
                .await?
        }
        None => {
            client
                .send_email(&template_id, &email_address, &[&personalisation, &reference])
                .await?
        }
    };

    println!(
        "id: {}, subject: {:?}, body: {:?}",
        sent.id, sent.content.subject, sent.content.body
    );
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
