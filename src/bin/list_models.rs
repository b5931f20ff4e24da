use nutriapp_backend::gemini_client::GeminiClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("❌ GEMINI_API_KEY not set");
            std::process::exit(1);
        }
    };
    println!("Key: {}...", api_key.chars().take(10).collect::<String>());

    let mut client = GeminiClient::new(api_key, String::new());
    if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
        client = client.with_base_url(base_url);
    }
    println!("\nAvailable models:");
    for model in client.list_models().await? {
        match model.display_name {
            Some(display_name) => println!(" -> {} ({})", model.name, display_name),
            None => println!(" -> {}", model.name),
        }
    }

    Ok(())
}
