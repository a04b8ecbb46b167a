use std::env;
use std::fmt;

pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

pub const CHAT_MODEL: &str = "llama3-70b-8192";
pub const SUMMARY_MODEL: &str = "gpt-3.5-turbo";
pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const INDEX_NAME: &str = "jellyfish-vector-db";
pub const GREETING: &str = "Hi, welcome!";

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const SMTP_HOST: &str = "smtp.gmail.com";
const BIND_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Credentials for the outbound mail relay. All three values must be present
/// for `/sendMail` to be usable.
#[derive(Clone)]
pub struct MailSettings {
    pub smtp_host: String,
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("smtp_host", &self.smtp_host)
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

/// Process configuration, sourced from `.env` and the environment.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub pinecone_api_key: String,
    pub pinecone_index_name: String,
    pub pinecone_index_host: Option<String>,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub embedding_model: String,
    pub groq_api_key: String,
    pub groq_api_base: String,
    pub chat_model: String,
    pub redis_url: String,
    pub history_ttl_seconds: Option<i64>,
    pub mail: Option<MailSettings>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_address", &self.bind_address)
            .field("pinecone_index_name", &self.pinecone_index_name)
            .field("pinecone_index_host", &self.pinecone_index_host)
            .field("openai_api_base", &self.openai_api_base)
            .field("embedding_model", &self.embedding_model)
            .field("groq_api_base", &self.groq_api_base)
            .field("chat_model", &self.chat_model)
            .field("history_ttl_seconds", &self.history_ttl_seconds)
            .field("mail", &self.mail)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let history_ttl_seconds = match get("HISTORY_TTL_SECONDS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(seconds) if seconds > 0 => Some(seconds),
                Ok(seconds) => {
                    return Err(ConfigError::Invalid {
                        name: "HISTORY_TTL_SECONDS",
                        reason: format!("must be positive, got {}", seconds),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid { name: "HISTORY_TTL_SECONDS", reason: e.to_string() })
                }
            },
            None => None,
        };

        // The original deployment spells it RECIPENT; accept both.
        let recipient = get("RECIPENT").or_else(|| get("RECIPIENT"));
        let mail = match (get("SENDER"), get("PASSWORD"), recipient) {
            (Some(sender), Some(password), Some(recipient)) => Some(MailSettings {
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| SMTP_HOST.to_string()),
                sender,
                password,
                recipient,
            }),
            _ => None,
        };

        Ok(AppConfig {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| BIND_ADDRESS.to_string()),
            pinecone_api_key: require("PINECONE_API_KEY")?,
            pinecone_index_name: get("PINECONE_INDEX_NAME").unwrap_or_else(|| INDEX_NAME.to_string()),
            pinecone_index_host: get("PINECONE_INDEX_HOST"),
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_api_base: get("OPENAI_API_BASE").unwrap_or_else(|| OPENAI_API_BASE.to_string()),
            embedding_model: get("EMBEDDING_MODEL").unwrap_or_else(|| EMBEDDING_MODEL.to_string()),
            groq_api_key: require("GROQ_API_KEY")?,
            groq_api_base: get("GROQ_API_BASE").unwrap_or_else(|| GROQ_API_BASE.to_string()),
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| CHAT_MODEL.to_string()),
            redis_url: require("REDIS_URL")?,
            history_ttl_seconds,
            mail,
        })
    }
}
