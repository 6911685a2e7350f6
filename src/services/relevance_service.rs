use crate::models::RelevanceAssessment;

/// Terms that indicate a market-moving story
const FINANCIAL_KEYWORDS: &[&str] = &[
    "stock", "shares", "market", "trading", "earnings", "revenue", "profit", "loss", "sec",
    "fda", "investor", "dividend", "buyback", "merger", "acquisition", "ipo", "quarter",
    "quarterly", "annual", "forecast", "guidance", "analyst", "rating", "upgrade", "downgrade",
    "price target", "recall", "lawsuit", "investigation", "regulatory", "compliance", "ceo",
    "executive", "board", "shareholder", "sales", "growth", "decline", "bankruptcy", "debt",
    "credit", "bond", "valuation",
];

const INDUSTRY_KEYWORDS: &[&str] = &[
    "tech", "technology", "automotive", "electric vehicle", "ev", "software", "hardware",
];

/// Entertainment, sports and weather terms
const IRRELEVANT_KEYWORDS: &[&str] = &[
    "concert", "tour", "album", "movie", "film", "actor", "actress", "sports", "game", "match",
    "weather", "forecast", "restaurant", "recipe", "fashion", "celebrity", "gossip",
];

const TICKER_COMPANIES: &[(&str, &str)] = &[
    ("aapl", "apple"),
    ("tsla", "tesla"),
    ("msft", "microsoft"),
    ("googl", "google"),
    ("goog", "google"),
    ("amzn", "amazon"),
    ("meta", "meta"),
    ("fb", "facebook"),
    ("nflx", "netflix"),
    ("nvda", "nvidia"),
    ("amd", "amd"),
    ("intc", "intel"),
];

// Weights in tenths so the 0.4 / 0.7 thresholds compare exactly
const TICKER_WEIGHT: i32 = 6;
const KEYWORD_WEIGHT: i32 = 1;
const KEYWORD_CAP: i32 = 3;
const INDUSTRY_WEIGHT: i32 = 1;
const IRRELEVANT_PENALTY: i32 = 3;
const RELEVANT_THRESHOLD: i32 = 4;

/// Company name a ticker is commonly written as; unknown tickers map to themselves.
pub fn company_name(ticker_lower: &str) -> &str {
    TICKER_COMPANIES
        .iter()
        .find(|(t, _)| *t == ticker_lower)
        .map(|(_, name)| *name)
        .unwrap_or(ticker_lower)
}

/// Lexical estimate of whether `headline` concerns `ticker`.
pub fn check_relevance(headline: &str, ticker: &str) -> RelevanceAssessment {
    let headline_lower = headline.to_lowercase();
    let ticker_lower = ticker.trim().to_lowercase();
    let company = company_name(&ticker_lower);

    let ticker_mentioned = !ticker_lower.is_empty()
        && (headline_lower.contains(&ticker_lower) || headline_lower.contains(company));

    let financial_count = count_present(&headline_lower, FINANCIAL_KEYWORDS);
    let industry_mentioned = count_present(&headline_lower, INDUSTRY_KEYWORDS) > 0;
    let irrelevant_mentioned = count_present(&headline_lower, IRRELEVANT_KEYWORDS) > 0;

    let mut tenths = 0;
    let mut reasons = Vec::new();

    if ticker_mentioned {
        tenths += TICKER_WEIGHT;
        reasons.push("Ticker/company mentioned".to_string());
    }

    if financial_count > 0 {
        tenths += (financial_count as i32 * KEYWORD_WEIGHT).min(KEYWORD_CAP);
        reasons.push(format!("{} financial keywords found", financial_count));
    }

    if industry_mentioned && ticker_mentioned {
        tenths += INDUSTRY_WEIGHT;
        reasons.push("Industry context present".to_string());
    }

    if irrelevant_mentioned {
        tenths -= IRRELEVANT_PENALTY;
        reasons.push("Irrelevant keywords detected".to_string());
    }

    let tenths = tenths.clamp(0, 10);

    let reason = if reasons.is_empty() {
        "No clear relevance indicators".to_string()
    } else {
        reasons.join("; ")
    };

    RelevanceAssessment {
        is_relevant: tenths >= RELEVANT_THRESHOLD,
        score: tenths as f64 / 10.0,
        reason,
    }
}

fn count_present(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| haystack.contains(*k)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_name_mapping() {
        assert_eq!(company_name("tsla"), "tesla");
        assert_eq!(company_name("goog"), "google");
        assert_eq!(company_name("xyz"), "xyz");
    }

    #[test]
    fn test_company_mention_with_industry_context() {
        let r = check_relevance(
            "Tesla announces breakthrough in battery technology, promising 50% cost reduction",
            "TSLA",
        );
        assert!(r.is_relevant);
        assert_eq!(r.score, 0.7);
        assert!(r.reason.contains("Ticker/company mentioned"));
        assert!(r.reason.contains("Industry context present"));
    }

    #[test]
    fn test_unrelated_headline_is_not_relevant() {
        let r = check_relevance("Local bakery wins pastry award", "TSLA");
        assert!(!r.is_relevant);
        assert_eq!(r.score, 0.0);
        assert_eq!(r.reason, "No clear relevance indicators");
    }

    #[test]
    fn test_ticker_symbol_match_is_case_insensitive() {
        let r = check_relevance("Why AAPL could surprise us all", "aapl");
        assert!(r.is_relevant);
        assert_eq!(r.score, 0.6);
    }

    #[test]
    fn test_keyword_bonus_is_capped() {
        // stock, shares, earnings, revenue, analyst
        let r = check_relevance(
            "Stock and shares move on earnings, revenue beat says analyst",
            "XYZ",
        );
        assert_eq!(r.score, 0.3);
        assert!(!r.is_relevant);
        assert!(r.reason.contains("5 financial keywords found"));
    }

    #[test]
    fn test_irrelevant_keywords_penalise_and_clamp() {
        let r = check_relevance("Celebrity gossip from the movie premiere", "NFLX");
        assert_eq!(r.score, 0.0);
        assert!(r.reason.contains("Irrelevant keywords detected"));

        let r = check_relevance("Netflix film slate lifts subscriber outlook", "NFLX");
        assert_eq!(r.score, 0.3);
        assert!(!r.is_relevant);
    }

    #[test]
    fn test_industry_bonus_requires_ticker_mention() {
        let r = check_relevance("Software spending slows", "MSFT");
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let r = check_relevance(
            "Tesla stock, shares, earnings and revenue lift EV technology sector",
            "TSLA",
        );
        assert_eq!(r.score, 1.0);
        assert!(r.is_relevant);
    }
}
