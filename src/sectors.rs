/// Tickers covered by the briefing when TICKERS is unset.
pub const DEFAULT_TICKERS: [&str; 8] = [
    "NVDA", "SMCI", "PLTR", "LMT", "MRK", "BTC", "ETH", "EUR/USD",
];

/// Static sector lookup. Unknown tickers never fail, they resolve to "Unknown".
pub fn resolve(ticker: &str) -> &'static str {
    match ticker {
        "NVDA" | "SMCI" | "PLTR" => "Technology",
        "LMT" => "Defense",
        "MRK" => "Healthcare",
        "BTC" | "ETH" => "Crypto",
        "EUR/USD" => "Forex",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sectors() {
        assert_eq!(resolve("NVDA"), "Technology");
        assert_eq!(resolve("SMCI"), "Technology");
        assert_eq!(resolve("PLTR"), "Technology");
        assert_eq!(resolve("LMT"), "Defense");
        assert_eq!(resolve("MRK"), "Healthcare");
        assert_eq!(resolve("BTC"), "Crypto");
        assert_eq!(resolve("ETH"), "Crypto");
        assert_eq!(resolve("EUR/USD"), "Forex");
    }

    #[test]
    fn test_unknown_ticker_resolves_to_unknown() {
        assert_eq!(resolve("ZZZZ"), "Unknown");
        assert_eq!(resolve(""), "Unknown");
        assert_eq!(resolve("nvda"), "Unknown"); // lookup is case-sensitive
    }

    #[test]
    fn test_every_default_ticker_has_a_sector() {
        for ticker in DEFAULT_TICKERS {
            assert_ne!(resolve(ticker), "Unknown", "no sector for {}", ticker);
        }
    }
}
