use anyhow::{Context, Result};

use crate::resume::parser::DEFAULT_LINKED_META_FIELDS;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub resume_path: String,
    /// When set, the document is fetched over HTTP instead of read from `resume_path`.
    pub resume_url: Option<String>,
    pub template_path: String,
    pub linked_meta_fields: Vec<String>,
    pub page_title: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            resume_path: env_or("RESUME_PATH", "resume.yaml"),
            resume_url: optional_env("RESUME_URL"),
            template_path: env_or("TEMPLATE_PATH", "template.yaml"),
            linked_meta_fields: match optional_env("LINKED_META_FIELDS") {
                Some(list) => parse_field_list(&list),
                None => DEFAULT_LINKED_META_FIELDS
                    .iter()
                    .map(|f| f.to_string())
                    .collect(),
            },
            page_title: env_or("PAGE_TITLE", "Resume"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Splits a comma list, dropping blanks.
fn parse_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}
