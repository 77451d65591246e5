// src/config.rs
use crate::constants::{
    DEFAULT_API_ATTEMPTS, DEFAULT_MAX_TREE_DEPTH, DEFAULT_MEDIA_HOSTS, DEFAULT_OUTPUT_DIR,
    DEFAULT_REQUEST_TIMEOUT_SECS, NOTION_MAX_TREE_DEPTH, TOKEN_ENV_VARS,
};
use crate::error::AppError;
use crate::types::{ApiKey, MediaHost, NotionId};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Directory the page tree is mirrored into
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Export only this page and its descendants (URL or ID). Defaults to every page the integration can see
    #[arg(short, long)]
    pub root_page: Option<String>,

    /// Maximum page nesting depth to descend into
    #[arg(long, default_value_t = DEFAULT_MAX_TREE_DEPTH)]
    pub max_depth: usize,

    /// Seconds before a single API call or image download is abandoned
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Attempts per API call when Notion reports a transient failure
    #[arg(long, default_value_t = DEFAULT_API_ATTEMPTS)]
    pub retries: u32,

    /// Host whose images are downloaded locally (repeatable; replaces the defaults)
    #[arg(long = "media-host")]
    pub media_hosts: Vec<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Resolved export configuration: validated and ready to drive a run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub api_key: ApiKey,
    pub output_dir: PathBuf,
    pub root_page: Option<NotionId>,
    pub max_depth: usize,
    pub request_timeout: Duration,
    pub api_attempts: u32,
    pub media_hosts: Vec<MediaHost>,
    pub api_base_url: String,
}

impl ExportConfig {
    /// Resolves a complete export configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let token = TOKEN_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "{} environment variable not set",
                    TOKEN_ENV_VARS.join(" or ")
                ))
            })?;

        Self::from_parts(cli, &token)
    }

    /// Builds the configuration from CLI input and an explicit token.
    pub fn from_parts(cli: CommandLineInput, token: &str) -> Result<Self, AppError> {
        let api_key = ApiKey::new(token)?;
        let root_page = cli.root_page.as_deref().map(NotionId::parse).transpose()?;

        let max_depth = cli.max_depth.min(NOTION_MAX_TREE_DEPTH);
        if cli.max_depth > max_depth {
            log::warn!(
                "Requested depth {} exceeds the hard ceiling {}. Clamping.",
                cli.max_depth,
                max_depth
            );
        }

        let media_hosts = if cli.media_hosts.is_empty() {
            default_media_hosts()
        } else {
            cli.media_hosts
                .into_iter()
                .map(MediaHost::new)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(ExportConfig {
            api_key,
            output_dir: cli.output_dir,
            root_page,
            max_depth,
            request_timeout: Duration::from_secs(cli.timeout.max(1)),
            api_attempts: cli.retries.max(1),
            media_hosts,
            api_base_url: crate::constants::NOTION_API_BASE_URL.to_string(),
        })
    }
}

/// The hosts mirrored when none are configured.
pub fn default_media_hosts() -> Vec<MediaHost> {
    DEFAULT_MEDIA_HOSTS
        .iter()
        .filter_map(|host| MediaHost::new(*host).ok())
        .collect()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::new("secret_default_key_for_testing_only")
                .expect("Default API key should be valid"),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            root_page: None,
            max_depth: DEFAULT_MAX_TREE_DEPTH,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            api_attempts: DEFAULT_API_ATTEMPTS,
            media_hosts: default_media_hosts(),
            api_base_url: crate::constants::NOTION_API_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "ntn_1234567890abcdefghij";

    fn parse(args: &[&str]) -> CommandLineInput {
        CommandLineInput::parse_from(std::iter::once("notion2markdown").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = ExportConfig::from_parts(parse(&[]), TOKEN).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("notion-export"));
        assert!(config.root_page.is_none());
        assert_eq!(config.max_depth, DEFAULT_MAX_TREE_DEPTH);
        assert_eq!(config.media_hosts.len(), DEFAULT_MEDIA_HOSTS.len());
    }

    #[test]
    fn test_root_page_accepts_urls() {
        let config = ExportConfig::from_parts(
            parse(&[
                "--root-page",
                "https://www.notion.so/My-Notes-550e8400e29b41d4a716446655440000",
                "-o",
                "out",
            ]),
            TOKEN,
        )
        .unwrap();
        assert_eq!(
            config.root_page.unwrap().as_str(),
            "550e8400e29b41d4a716446655440000"
        );
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let result = ExportConfig::from_parts(parse(&[]), "not-a-token");
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_depth_is_clamped_and_hosts_override_defaults() {
        let config = ExportConfig::from_parts(
            parse(&["--max-depth", "100000", "--media-host", "cdn.example.com"]),
            TOKEN,
        )
        .unwrap();
        assert_eq!(config.max_depth, NOTION_MAX_TREE_DEPTH);
        assert_eq!(config.media_hosts.len(), 1);
        assert_eq!(config.media_hosts[0].as_str(), "cdn.example.com");
    }
}
