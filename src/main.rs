//! Condo Admin
//!
//! Administrative dashboard for residential condominium management.
//!
//! This is the main entry point for the Dioxus Desktop application.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .pretty()
        .init();

    // Print startup banner
    println!();
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║                                                           ║");
    println!("║   🏢 Condo Admin v{:<40}║", condo_ui::VERSION);
    println!("║   Panel de Administración del Condominio                  ║");
    println!("║                                                           ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    // Launch the Dioxus desktop application
    if let Err(e) = condo_ui::launch() {
        tracing::error!("Failed to start: {:#}", e);
        std::process::exit(1);
    }
}
