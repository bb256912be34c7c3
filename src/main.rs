use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;

use vet_assist::chat::{ChatController, ChatEvent, HttpChatTransport};
use vet_assist::config::AssistConfig;
use vet_assist::profile::{DogProfile, DogProfileFlow, HttpProfileSink, ProfileSink};
use vet_assist::wizard::{Advance, WizardEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AssistConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export VET_ASSIST_TOKEN=<bearer token>");
        std::process::exit(1);
    });

    eprintln!("🐾 Vet Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Chat: {}", config.chat_url);
    eprintln!("   Type a message and press Enter. /profile to capture a dog, /quit to exit.\n");

    let transport = HttpChatTransport::new(config.chat_url.clone(), config.auth_token.clone());
    let mut controller = ChatController::with_greeting(config.greeting.clone());
    println!("{}\n", config.greeting);

    // Render log mutations as they are pushed.
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ChatEvent::CoachUpdate { delta, first, .. } => {
                    if first {
                        println!();
                    }
                    print!("{delta}");
                    let _ = std::io::stdout().flush();
                }
                ChatEvent::Completed { .. } => {
                    println!("\n");
                }
                ChatEvent::Failed { partial } => {
                    if partial {
                        println!("\n[connection lost — partial reply shown]");
                    } else {
                        println!("[something went wrong, please try again]");
                    }
                }
                ChatEvent::UserMessage { .. } => {}
            }
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        eprint!("> ");
        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match line.as_str() {
            "/quit" | "/exit" => break,
            "/profile" => {
                if let Err(e) = capture_profile(&config, &mut lines).await {
                    eprintln!("Profile capture failed: {e}");
                }
            }
            _ => {
                let cancel = CancellationToken::new();
                // Failures are already rendered by the event printer.
                let _ = controller.send_message(&line, &transport, &cancel).await;
            }
        }
    }

    Ok(())
}

/// Run the dog-profile wizard over stdin and save the result once.
async fn capture_profile(
    config: &AssistConfig,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    let mut engine = WizardEngine::new(DogProfileFlow::new())?;
    eprintln!("Capturing a dog profile. /back goes to the previous step.");

    loop {
        let step = engine.state().current_step();
        let prompt = match step {
            1 => "Dog's name and sex (e.g. \"Rex male\"):",
            2 => "Birth date (YYYY-MM-DD):",
            _ => "Breed:",
        };
        eprintln!(
            "[step {}/{}] {}",
            step,
            engine.state().total_steps(),
            prompt
        );
        eprint!("> ");

        let Some(line) = lines.next_line().await? else {
            anyhow::bail!("input closed mid-capture");
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/back" {
            if let Err(e) = engine.retreat() {
                eprintln!("{e}");
            }
            continue;
        }

        let output = match step {
            1 => {
                let (name, sex) = line.rsplit_once(' ').unwrap_or((line, ""));
                serde_json::json!({ "name": name.trim(), "sex": sex.trim() })
            }
            2 => serde_json::json!({ "birth_date": line }),
            _ => serde_json::json!({ "breed": line }),
        };

        match engine.advance(output) {
            Ok(Advance::Moved(_)) => {}
            Ok(Advance::Submitted) => break,
            Err(e) => eprintln!("{e}"),
        }
    }

    let profile = DogProfile::from_collected(engine.state().collected())?;
    let sink = HttpProfileSink::new(config.save_dog_url.clone(), config.auth_token.clone());
    sink.save(&profile).await?;
    eprintln!("Saved {} ({}, {}).", profile.name, profile.sex, profile.breed);
    Ok(())
}
