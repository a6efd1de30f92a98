//! Trading pair identifiers

use std::fmt::Display;

use super::error::ValidationError;

/// A base asset quoted in a quote asset, e.g. `LTC/USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Symbol {
    base: String,
    quote: String,
}

impl Symbol {
    /// Builds a symbol from user input, trimming and uppercasing both assets.
    pub fn new(base: &str, quote: &str) -> Self {
        Symbol {
            base: base.trim().to_uppercase(),
            quote: quote.trim().to_uppercase(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// The exchange-native pair name without separator (`LTCUSDT`).
    pub fn pair(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Parses a comma-separated list of base assets into symbols quoted in `quote`.
///
/// Entry order is preserved and repeated assets are kept once, at their first
/// position. Blank entries (`"LTC,,BTC"`) are skipped; a list with no
/// usable entry is rejected.
pub fn parse_symbol_list(input: &str, quote: &str) -> Result<Vec<Symbol>, ValidationError> {
    let mut symbols: Vec<Symbol> = Vec::new();
    for base in input.split(',') {
        if base.trim().is_empty() {
            continue;
        }
        let symbol = Symbol::new(base, quote);
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(ValidationError::EmptySymbolList);
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalizes_input() {
        let symbol = Symbol::new("  ltc ", "usdt");
        assert_eq!(symbol.base(), "LTC");
        assert_eq!(symbol.quote(), "USDT");
        assert_eq!(symbol.to_string(), "LTC/USDT");
        assert_eq!(symbol.pair(), "LTCUSDT");
    }

    #[test]
    fn test_parse_symbol_list_keeps_entry_order() {
        let symbols = parse_symbol_list("ltc, btc,SOL", "USDT").unwrap();
        let names: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["LTC/USDT", "BTC/USDT", "SOL/USDT"]);
    }

    #[test]
    fn test_parse_symbol_list_drops_duplicates_and_blanks() {
        let symbols = parse_symbol_list("btc,,LTC, BTC ,", "USDT").unwrap();
        assert_eq!(
            symbols,
            vec![Symbol::new("BTC", "USDT"), Symbol::new("LTC", "USDT")]
        );
    }

    #[test]
    fn test_parse_symbol_list_rejects_empty_input() {
        assert_eq!(
            parse_symbol_list("", "USDT"),
            Err(ValidationError::EmptySymbolList)
        );
        assert_eq!(
            parse_symbol_list(" , ,", "USDT"),
            Err(ValidationError::EmptySymbolList)
        );
    }
}
