//! Handlers behind each `givre` subcommand.
//!
//! Typed failures bubble up as `anyhow` errors; `main` turns them into an
//! error line on stderr and exit code 1.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};

use givre_flake::{to_data_url, to_data_url_base64, to_svg};
use givre_share::{
    build_share_url, display_id, mint_signature, parse_share_url, remove_share_param,
};
use givre_shared::crypto::{decrypt, encrypt};
use givre_shared::Essence;
use givre_store::RecordStore;

use crate::{Cli, Command, RenderFormat};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Crystallize {
            message,
            essence,
            password,
            ttl,
        } => crystallize(&open_store(cli.store_path), &message, essence, password, ttl).await,
        Command::Gallery => gallery(&open_store(cli.store_path)),
        Command::Peek { id, password } => peek(&open_store(cli.store_path), &id, password).await,
        Command::Melt { id } => melt(&open_store(cli.store_path), &id),
        Command::Clear => clear(&open_store(cli.store_path)),
        Command::Presets => presets(&open_store(cli.store_path)),
        Command::Render {
            text,
            size,
            signature,
            out,
            format,
        } => render(&text, size, signature.as_deref().unwrap_or(""), out, format),
        Command::Share {
            message,
            base_url,
            signature,
        } => share(&message, &base_url, signature).await,
        Command::Open { url } => open(&url).await,
    }
}

/// Resolve the store: explicit flag, then `GIVRE_STORE_PATH`, then the
/// platform data directory.
fn open_store(path_override: Option<PathBuf>) -> RecordStore {
    let path =
        path_override.or_else(|| std::env::var_os("GIVRE_STORE_PATH").map(PathBuf::from));
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using explicit store path");
            RecordStore::open_at(path)
        }
        None => RecordStore::open(),
    }
}

async fn crystallize(
    store: &RecordStore,
    message: &str,
    essence: Essence,
    password: Option<String>,
    ttl: i64,
) -> anyhow::Result<()> {
    if ttl < -1 {
        anyhow::bail!("--ttl must be -1 (forever) or a number of seconds");
    }
    if message.trim().is_empty() {
        anyhow::bail!("nothing to crystallize: the message is empty");
    }

    let record = match password {
        Some(password) => {
            let ciphertext = encrypt(message.trim(), &password).await?;
            store.save(message, essence, Some(ciphertext), true)
        }
        None => store.save(message, essence, None, false),
    }
    .context("the whisper was rejected by the store")?;

    println!("{:<11}{}", "id:", record.id);
    println!("{:<11}{}", "essence:", record.essence);
    println!("{:<11}{}", "protected:", if record.has_password { "yes" } else { "no" });
    match ttl {
        -1 => println!("{:<11}never (melt it with `givre melt {}`)", "melts:", record.id),
        secs => println!(
            "{:<11}in {secs}s (a viewing courtesy; the record stays until melted)",
            "melts:"
        ),
    }
    Ok(())
}

fn gallery(store: &RecordStore) -> anyhow::Result<()> {
    let records = store.list();
    for record in &records {
        println!(
            "{}  {:<8}  {:<28}  {}",
            format_timestamp(record.timestamp),
            record.essence.as_str(),
            record.id,
            record.message
        );
    }
    println!("{} whisper(s)", records.len());
    Ok(())
}

async fn peek(store: &RecordStore, id: &str, password: Option<String>) -> anyhow::Result<()> {
    let records = store.list();
    let record = records
        .iter()
        .find(|r| r.id == id)
        .with_context(|| format!("no whisper with id {id}"))?;

    if record.has_password {
        let password = password.context("this whisper is protected; pass --password")?;
        let ciphertext = record
            .encrypted_message
            .as_deref()
            .context("protected whisper carries no ciphertext")?;
        let message = decrypt(ciphertext, &password).await?;
        println!("{message}");
    } else {
        println!("{}", record.message);
    }
    Ok(())
}

fn melt(store: &RecordStore, id: &str) -> anyhow::Result<()> {
    if !store.list().iter().any(|r| r.id == id) {
        anyhow::bail!("no whisper with id {id}");
    }
    store.delete(id);
    println!("melted {id}");
    Ok(())
}

fn clear(store: &RecordStore) -> anyhow::Result<()> {
    store.clear();
    println!("gallery cleared");
    Ok(())
}

fn presets(store: &RecordStore) -> anyhow::Result<()> {
    store.force_load_presets();
    println!("{} whisper(s) in the gallery", store.count());
    Ok(())
}

fn render(
    text: &str,
    size: u32,
    signature: &str,
    out: Option<PathBuf>,
    format: RenderFormat,
) -> anyhow::Result<()> {
    let output = match format {
        RenderFormat::Svg => to_svg(text, size, signature),
        RenderFormat::DataUrl => to_data_url(text, size, signature),
        RenderFormat::DataUrlBase64 => to_data_url_base64(text, size, signature),
    };
    match out {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => println!("{output}"),
    }
    Ok(())
}

async fn share(message: &str, base_url: &str, signature: Option<String>) -> anyhow::Result<()> {
    let signature = signature.unwrap_or_else(mint_signature);
    let timestamp = Utc::now().timestamp_millis();
    let url = build_share_url(message, &signature, timestamp, base_url).await?;

    println!("{url}");
    println!();
    println!("{:<11}{signature}", "signature:");
    println!("{:<11}{}", "id:", display_id(&signature));
    Ok(())
}

async fn open(url: &str) -> anyhow::Result<()> {
    let parsed = parse_share_url(url)
        .await
        .context("not a valid share link (malformed, tampered, or missing its key)")?;

    println!("{:<11}{}", "id:", parsed.snowflake_id);
    println!("{:<11}{}", "signature:", parsed.signature);
    println!("{:<11}{}", "sent:", format_timestamp(parsed.timestamp));
    println!("{:<11}{}", "message:", parsed.message);
    println!("{:<11}{}", "clean url:", remove_share_param(url));
    Ok(())
}

fn format_timestamp(ts_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}
