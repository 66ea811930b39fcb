use std::{collections::HashMap, fs};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub page_size: u32,
    pub auth_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            page_size: 12,
            auth_token: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("browse.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings);

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
        if let Some(v) = file_cfg.get("auth_token") {
            settings.auth_token = Some(v.clone());
        }
        if let Some(v) = file_cfg.get("page_size") {
            if let Ok(parsed) = v.parse::<u32>() {
                if parsed > 0 {
                    settings.page_size = parsed;
                }
            }
        }
    }
}

fn apply_env(settings: &mut Settings) {
    if let Ok(v) = std::env::var("BROWSE__SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("BROWSE__AUTH_TOKEN") {
        settings.auth_token = Some(v);
    }
    if let Ok(v) = std::env::var("BROWSE__PAGE_SIZE") {
        if let Ok(parsed) = v.parse::<u32>() {
            if parsed > 0 {
                settings.page_size = parsed;
            }
        }
    }
}
