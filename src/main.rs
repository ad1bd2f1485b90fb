use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use secure_qr::consumer::{self, AuthOutcome, Authenticator, CheckIn, DeviceIdentity};
use secure_qr::{DynamicCodeGenerator, Frame, GeneratorConfig, Ticker, render, scan};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = env::args().collect::<Vec<_>>();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "code" => {
            let (generator, _) = load_generator(None)?;
            println!(
                "🔑 Code: {} | Expires in: {}s",
                generator.current_code(),
                generator.seconds_until_next_code()
            );
        }
        "show" => {
            let (generator, session_id) = load_generator(args.get(2))?;
            let frame = generator.frame(session_id);
            println!("{}", render::to_terminal(&frame.qr_data)?);
            print_frame(&frame);
        }
        "loop" => {
            let (generator, session_id) = load_generator(args.get(2))?;

            println!("🔄 Live QR Mode (Press Ctrl+C to stop)");
            println!("=======================================");

            let generator = Arc::new(generator);
            let every = Duration::from_secs(1);
            let mut last_code = String::new();
            let handle = Ticker::spawn(generator, session_id, every, move |frame| {
                // Clear screen
                print!("\x1B[2J\x1B[1;1H");
                println!("🔄 Live QR Payload - {}", chrono::Local::now().format("%H:%M:%S"));
                println!("======================================");

                match render::to_terminal(&frame.qr_data) {
                    Ok(qr) => println!("{qr}"),
                    Err(e) => eprintln!("❌ Failed to render QR code: {e}"),
                }

                let status = if frame.payload.totp != last_code { "🆕" } else { "  " };
                print!("{status} ");
                print_frame(&frame);
                println!("\nPress Ctrl+C to exit live mode");
                let _ = io::stdout().flush();

                last_code = frame.payload.totp;
            });

            tokio::signal::ctrl_c().await?;
            handle.cancel().await;
            println!("\n👋 Stopped");
        }
        "png" => {
            if args.len() < 3 {
                eprintln!("❌ Usage: secure-qr png <out.png> [session_id]");
                return Ok(());
            }
            let out = &args[2];
            let (generator, session_id) = load_generator(args.get(3))?;
            let frame = generator.frame(session_id);

            std::fs::write(out, render::to_png(&frame.qr_data, None)?)?;
            println!("✅ Wrote {} (valid for {}s)", out, frame.seconds_remaining);
        }
        "scan" => {
            if args.len() != 3 {
                eprintln!("❌ Usage: secure-qr scan <image_path>");
                return Ok(());
            }
            let parsed = match scan::read_payload_from_file(&args[2]) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("❌ Error reading QR code: {e}");
                    return Ok(());
                }
            };

            match consumer::check_in_parsed(parsed, &ConsolePrompt, &EnvDevice) {
                CheckIn::Verified { payload, device_id } => {
                    println!(
                        "✅ Verified session {} with code {}",
                        payload.session_id, payload.totp
                    );
                    println!("   Device ID: {device_id}");
                }
                CheckIn::Rejected { payload, outcome: AuthOutcome::Canceled } => {
                    eprintln!("⚠️  Canceled by user (session {})", payload.session_id);
                }
                CheckIn::Rejected { outcome: AuthOutcome::Error(message), .. } => {
                    eprintln!("❌ Error: {message}");
                }
                CheckIn::Rejected { .. } => {
                    eprintln!("❌ Identity confirmation not available");
                }
                CheckIn::Unreadable { raw, reason } => {
                    eprintln!("⚠️  Not a session payload ({reason}):");
                    println!("{raw}");
                }
            }
        }
        _ => {
            eprintln!("❌ Unknown command: {}", args[1]);
            print_usage();
        }
    }

    Ok(())
}

fn load_generator(session_arg: Option<&String>) -> anyhow::Result<(DynamicCodeGenerator, i64)> {
    let config = GeneratorConfig::load()?;
    let session_id = match session_arg {
        Some(arg) => arg
            .parse()
            .map_err(|_| anyhow::anyhow!("session id must be an integer, got {arg:?}"))?,
        None => config.session_id,
    };
    Ok((DynamicCodeGenerator::from_config(&config)?, session_id))
}

fn print_frame(frame: &Frame) {
    let remaining = if env::var("NO_COLOR").is_ok() || frame.seconds_remaining > 5 {
        format!("{}s", frame.seconds_remaining)
    } else {
        format!("\x1b[31m{}s\x1b[0m", frame.seconds_remaining) // Red color for low time
    };
    println!(
        "📋 Session: {} | Code: {} | New QR in: {}",
        frame.payload.session_id, frame.payload.totp, remaining
    );
    println!("   Payload: {}", frame.qr_data);
}

/// Asks on the terminal instead of a biometric sensor.
struct ConsolePrompt;

impl Authenticator for ConsolePrompt {
    fn authenticate(&self, title: &str, subtitle: &str) -> AuthOutcome {
        print!("🔐 {title}: {subtitle} [y/N] ");
        if let Err(e) = io::stdout().flush() {
            return AuthOutcome::Error(e.to_string());
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) => AuthOutcome::NotAvailable,
            Ok(_) if answer.trim().eq_ignore_ascii_case("y") => AuthOutcome::Success,
            Ok(_) => AuthOutcome::Canceled,
            Err(e) => AuthOutcome::Error(e.to_string()),
        }
    }
}

struct EnvDevice;

impl DeviceIdentity for EnvDevice {
    fn device_id(&self) -> String {
        ["SECUREQR_DEVICE_ID", "HOSTNAME", "COMPUTERNAME"]
            .iter()
            .find_map(|key| env::var(key).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| "unknown-device".to_string())
    }
}

fn print_usage() {
    println!("🔐 Secure QR Session Generator");
    println!("Usage: secure-qr <command> [args]");
    println!();
    println!("Commands:");
    println!("  code                             Print the current code");
    println!("  show [session_id]                Print the current payload as a QR code");
    println!("  loop [session_id]                Continuous refresh mode");
    println!("  png <out.png> [session_id]       Write the current payload QR code to a PNG");
    println!("  scan <image_path>                Read a payload QR code and check in");
    println!();
    println!("Configuration:");
    println!("  Create a `secureqr.json` file with the following structure:");
    println!("  {{");
    println!("    \"secret\": \"JBSWY3DPEHPK3PXP\",");
    println!("    \"period\": 30,");
    println!("    \"sessionId\": 12345");
    println!("  }}");
    println!();
    println!("Environment Variables (used when secureqr.json is absent):");
    println!("  SECUREQR_SECRET                  Base32 session secret (required)");
    println!("  SECUREQR_PERIOD                  Seconds each code stays valid (default 30)");
    println!("  SECUREQR_SESSION_ID              Session id embedded in the payload (default 0)");
    println!("  SECUREQR_DEVICE_ID               Device id reported by `scan`");
    println!("  RUST_LOG                         Log filter (default warn)");
    println!();
    println!("Examples:");
    println!("  secure-qr show 12345");
    println!("  secure-qr loop");
    println!("  secure-qr png session.png 12345");
    println!("  secure-qr scan session.png");
}
