use dotenv::dotenv;
use ledgerpay::transport::Transport;
use ledgerpay::{
    Client, Config, Credentials, Dispatch, Event, MemoryStore,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== LedgerPay Client Example ===\n");

    let config = Config {
        base_url: env::var("API_URL")
            .unwrap_or_else(|_| "https://api.ledgerpay.test".to_string()),
        ..Config::default()
    };

    println!("Configuration:");
    println!("  API URL: {}\n", config.base_url);

    let email = env::var("EMAIL").expect("EMAIL must be set in .env");
    let password = env::var("PASSWORD").expect("PASSWORD must be set in .env");

    let mut client = Client::new(config, MemoryStore::new());
    let transport = Transport::new();

    // Step 1: Login
    println!("=== Step 1: Login ===");
    let action = client.login(&Credentials { email, password });
    let (status, body) = transport.execute(&action).await?;
    for event in client.handle_response(status, &body) {
        match event {
            Event::LoginSucceeded { username } => {
                println!("✓ Logged in as {}\n", username);
            }
            Event::LoginFailed { reason } => {
                eprintln!("✗ Login failed: {}\n", reason);
                return Err(reason.into());
            }
            other => println!("Event: {:?}", other),
        }
    }

    // Step 2: Dashboard
    println!("=== Step 2: Dashboard ===");
    match client.fetch_dashboard()? {
        Dispatch::RedirectToLogin => {
            eprintln!("✗ No session; would navigate to the login screen");
        }
        Dispatch::Send(action) => {
            let (status, body) = transport.execute(&action).await?;
            for event in client.handle_response(status, &body) {
                match event {
                    Event::DashboardLoaded { payload } => {
                        println!(
                            "✓ {} {} — balance {} ({})",
                            payload.profile.first_name,
                            payload.profile.last_name,
                            payload.account.balance,
                            payload.account.account_type
                        );
                        println!("Recent transactions (newest first):");
                        for tx in &payload.transactions {
                            println!(
                                "  #{:<6} {:?} {:>12}  {}",
                                tx.id, tx.kind, tx.amount, tx.timestamp
                            );
                        }
                    }
                    Event::DashboardFailed { reason } => {
                        eprintln!("✗ Dashboard fetch failed: {}", reason);
                    }
                    Event::AuthenticationRequired => {
                        eprintln!("✗ Session rejected; would navigate to login");
                    }
                    other => println!("Event: {:?}", other),
                }
            }
        }
    }

    // Step 3: Optional deposit
    if let Ok(amount) = env::var("DEPOSIT_AMOUNT") {
        println!("\n=== Step 3: Deposit {} ===", amount);
        match client.deposit(&amount)? {
            Dispatch::RedirectToLogin => {
                eprintln!("✗ No session; would navigate to the login screen");
            }
            Dispatch::Send(action) => {
                let (status, body) = transport.execute(&action).await?;
                for event in client.handle_response(status, &body) {
                    match event {
                        Event::DepositAccepted => println!("✓ Deposit accepted"),
                        Event::DepositFailed { reason } => {
                            eprintln!("✗ Deposit failed: {}", reason)
                        }
                        other => println!("Event: {:?}", other),
                    }
                }
            }
        }
    }

    Ok(())
}
