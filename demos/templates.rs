use std::io;

use notify_client::{Credential, NotifyClient, Personalisation, TemplateType};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notify_client=info")),
        )
        .init();

    let api_key = std::env::var("NOTIFY_API_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "NOTIFY_API_KEY environment variable is required",
        )
    })?;
    let template_type = match std::env::var("NOTIFY_TEMPLATE_TYPE").ok().as_deref() {
        Some("sms") => Some(TemplateType::Sms),
        Some("email") => Some(TemplateType::Email),
        _ => None,
    };

    let mut builder = NotifyClient::builder(Credential::parse(&api_key)?);
    if let Ok(base_url) = std::env::var("NOTIFY_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    let client = builder.build()?;

    let templates = client.templates(template_type).await?;
    for template in &templates {
        println!(
            "{} v{} [{}] {}",
            template.id, template.version, template.template_type, template.name
        );
    }

    if let Some(first) = templates.first() {
        let personalisation = Personalisation::new().with("name", "KD");
        let preview = client.template_preview(&first.id, &[&personalisation]).await?;
        println!("preview of {}: {:?}", first.id, preview.body);
    }

    Ok(())
}
