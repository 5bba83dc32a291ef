//! # givre
//!
//! Command-line companion for the Givre core: crystallize whispers into the
//! local gallery, render their snowflakes, and build or open share links.
//!
//! The store location follows `--store-path`, then the `GIVRE_STORE_PATH`
//! environment variable, then the platform data directory. Logging respects
//! `RUST_LOG`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use givre_shared::Essence;

#[derive(Parser, Debug)]
#[command(name = "givre", version, about = "Ephemeral whispers, crystallized into snowflakes")]
struct Cli {
    /// Path of the whisper store file (overrides GIVRE_STORE_PATH and the
    /// platform default).
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crystallize a whisper into the local gallery.
    Crystallize {
        /// The whisper text.
        message: String,

        /// Cosmetic essence tag (aurora or stardust).
        #[arg(long, default_value_t = Essence::Aurora)]
        essence: Essence,

        /// Encrypt the whisper with this password before storing it.
        #[arg(long)]
        password: Option<String>,

        /// Seconds until the whisper melts from view; -1 keeps it forever.
        /// Display-level only: the stored record stays until `melt`.
        #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
        ttl: i64,
    },

    /// List the gallery, newest first.
    Gallery,

    /// Print one whisper's message, decrypting protected ones.
    Peek {
        /// Record id, as shown by `gallery`.
        id: String,

        /// Password for protected whispers.
        #[arg(long)]
        password: Option<String>,
    },

    /// Delete one whisper from the gallery.
    Melt {
        /// Record id, as shown by `gallery`.
        id: String,
    },

    /// Delete the whole gallery. The preset whispers reappear on next read.
    Clear,

    /// Restore the preset whispers (no-op while any preset is still present).
    Presets,

    /// Render a snowflake for a piece of text.
    Render {
        /// Seed text. Blank input falls back to the fixed seed.
        text: String,

        /// Image width and height in pixels.
        #[arg(long, default_value_t = 400)]
        size: u32,

        /// Whisper signature; when set it overrides the text as the seed.
        #[arg(long)]
        signature: Option<String>,

        /// Write the output to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output encoding.
        #[arg(long, value_enum, default_value_t = RenderFormat::Svg)]
        format: RenderFormat,
    },

    /// Build an encrypted share link for a message.
    Share {
        /// The message to share (at most 500 UTF-16 code units).
        message: String,

        /// URL the link is built on; its query and fragment are replaced.
        #[arg(long, default_value = "https://givre.app/whisper")]
        base_url: String,

        /// Whisper signature; freshly minted when omitted.
        #[arg(long)]
        signature: Option<String>,
    },

    /// Parse a share link and print the whisper it carries.
    Open {
        /// The full share URL, including its `#k=` fragment.
        url: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RenderFormat {
    /// Raw SVG document.
    Svg,
    /// Percent-encoded `data:image/svg+xml` URL.
    DataUrl,
    /// Base64 `data:image/svg+xml` URL.
    DataUrlBase64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    commands::run(cli).await
}
