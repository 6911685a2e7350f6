use anyhow::{bail, Context};

/// Which classifier chain the scorer uses, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringStrategy {
    /// Ternary financial model first, binary model on failure.
    Enhanced,
    /// Binary model only.
    Basic,
}

impl std::str::FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enhanced" => Ok(ScoringStrategy::Enhanced),
            "basic" => Ok(ScoringStrategy::Basic),
            other => Err(format!(
                "Invalid SCORING_STRATEGY: {}. Must be 'enhanced' or 'basic'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentProviderKind {
    HuggingFace,
    Lexicon,
}

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_token: Option<String>,
    pub base_url: String,
    pub primary_model: String,
    pub fallback_model: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// (username, password) pairs accepted by the login endpoint.
    pub users: Vec<(String, String)>,
    pub token_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub news_csv_path: String,
    pub sentiment_provider: SentimentProviderKind,
    pub huggingface: HuggingFaceConfig,
    pub scoring_strategy: ScoringStrategy,
    pub similar_headlines_limit: usize,
    pub history_limit: usize,
    pub cors_allow_origin: Option<String>,
    pub auth: AuthConfig,
}

const DEFAULT_USERS: &str = "admin:1234,user:password,guest:guest123";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_token = std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty());

        let sentiment_provider = match std::env::var("SENTIMENT_PROVIDER") {
            Ok(name) => parse_provider(&name)?,
            Err(_) if api_token.is_some() => SentimentProviderKind::HuggingFace,
            Err(_) => SentimentProviderKind::Lexicon,
        };

        let scoring_strategy = std::env::var("SCORING_STRATEGY")
            .unwrap_or_else(|_| "enhanced".to_string())
            .parse::<ScoringStrategy>()
            .map_err(anyhow::Error::msg)?;

        let users = parse_users(
            &std::env::var("AUTH_USERS").unwrap_or_else(|_| DEFAULT_USERS.to_string()),
        )?;

        let token_secret = match std::env::var("AUTH_TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("AUTH_TOKEN_SECRET not set, generating an ephemeral secret");
                uuid::Uuid::new_v4().to_string()
            }
        };

        Ok(Self {
            port: env_parse("PORT", 3000)?,
            news_csv_path: std::env::var("NEWS_CSV_PATH").unwrap_or_else(|_| "news.csv".to_string()),
            sentiment_provider,
            huggingface: HuggingFaceConfig {
                api_token,
                base_url: std::env::var("HF_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api-inference.huggingface.co".to_string()),
                primary_model: std::env::var("HF_PRIMARY_MODEL")
                    .unwrap_or_else(|_| "ProsusAI/finbert".to_string()),
                fallback_model: std::env::var("HF_FALLBACK_MODEL").unwrap_or_else(|_| {
                    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
                }),
            },
            scoring_strategy,
            similar_headlines_limit: env_parse("SIMILAR_HEADLINES_LIMIT", 10)?,
            history_limit: env_parse("HISTORY_LIMIT", 50)?,
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
            auth: AuthConfig {
                users,
                token_secret,
                token_ttl_hours: env_parse("AUTH_TOKEN_TTL_HOURS", 8)?,
            },
        })
    }
}

fn parse_provider(name: &str) -> anyhow::Result<SentimentProviderKind> {
    match name.trim().to_lowercase().as_str() {
        "huggingface" | "hf" => Ok(SentimentProviderKind::HuggingFace),
        "lexicon" => Ok(SentimentProviderKind::Lexicon),
        other => bail!(
            "Invalid SENTIMENT_PROVIDER: {}. Must be 'huggingface' or 'lexicon'",
            other
        ),
    }
}

/// Parses `name:password` pairs separated by commas.
pub fn parse_users(raw: &str) -> anyhow::Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, password) = pair
                .split_once(':')
                .with_context(|| format!("AUTH_USERS entry '{}' is not name:password", pair))?;
            if name.is_empty() {
                bail!("AUTH_USERS entry '{}' has an empty username", pair);
            }
            Ok((name.to_string(), password.to_string()))
        })
        .collect()
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_users() {
        let users = parse_users(DEFAULT_USERS).unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0], ("admin".to_string(), "1234".to_string()));
        assert_eq!(users[2], ("guest".to_string(), "guest123".to_string()));
    }

    #[test]
    fn test_parse_users_rejects_malformed_entry() {
        assert!(parse_users("admin").is_err());
        assert!(parse_users(":secret").is_err());
    }

    #[test]
    fn test_scoring_strategy_from_str() {
        assert_eq!("Enhanced".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Enhanced));
        assert_eq!(" basic ".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Basic));
        assert!("fancy".parse::<ScoringStrategy>().is_err());
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("HF").unwrap(), SentimentProviderKind::HuggingFace);
        assert_eq!(parse_provider("lexicon").unwrap(), SentimentProviderKind::Lexicon);
        assert!(parse_provider("openai").is_err());
    }
}
