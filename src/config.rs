use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "certverify-server")]
#[command(about = "Rule-based birth certificate verification server")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "CERTVERIFY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CERTVERIFY_PORT", default_value = "9393")]
    pub port: u16,

    /// OCR engine to use (e.g., "ocrs", "leptess"); defaults to the first compiled-in engine
    #[arg(long, env = "CERTVERIFY_ENGINE")]
    pub engine: Option<String>,

    /// Language for OCR (e.g., "eng")
    #[arg(long, env = "CERTVERIFY_DEFAULT_LANGUAGE", default_value = "eng")]
    pub default_language: String,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "CERTVERIFY_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Path to tessdata directory (downloaded to the cache directory if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub engine: Option<String>,
    pub default_language: String,
    pub max_file_size: usize,
    pub tessdata_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9393,
            engine: None,
            default_language: "eng".to_string(),
            max_file_size: 20 * 1024 * 1024,
            tessdata_path: None,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            engine: args.engine,
            default_language: args.default_language,
            max_file_size: args.max_file_size,
            tessdata_path: args.tessdata_path,
        }
    }
}
