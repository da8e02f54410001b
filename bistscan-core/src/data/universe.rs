//! Symbol universe: the static BIST list, TOML overrides, ticker suffixes.
//!
//! Symbols are stored in display form (`THYAO`). The chart API wants the
//! exchange suffix (`THYAO.IS`), added by [`yahoo_ticker`] at fetch time.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const EXCHANGE_SUFFIX: &str = ".IS";

/// Used when no universe file is configured.
pub const FALLBACK_SYMBOLS: &[&str] = &[
    "ADESE", "ADEL", "AEFES", "AGHOL", "AGLYO", "AHGAZ", "AHSKY", "AKBNK", "AKENR", "AKGRT",
    "AKSA", "AKSEN", "ALARK", "ALCTL", "ALFAS", "ALGN", "ALKIM", "ALMAD", "ANELE", "ARDYZ",
    "ARMDA", "ARTI", "ASELS", "ASUZU", "ATEKS", "ATPET", "ATLAS", "ATSYH", "ATTP", "AVGYO",
    "AVHOL", "AVOD", "AYCES", "AYDEM", "AYEN", "BALSU", "BERA", "BIMAS", "BLCYT", "BOBET",
    "BRKSN", "BRYAT", "BSRN", "BTCIM", "BURCE", "CANTE", "CCOLA", "CEMAS", "CEMTS", "CGLYO",
    "CMENT", "CIMSA", "CLEBI", "COMDO", "CUSAN", "DAGHL", "DENGE", "DERIM", "DESA", "DEVA",
    "DGNMO", "DIRIT", "DITAS", "DZGYO", "EGEEN", "EGGUB", "EGPRO", "EKGYO", "EMKEL",
    "ENKAI", "ENJSA", "ERCB", "EREGL", "ERSU", "EUREN", "FROTO", "FFKRL", "FMIZP", "FONET",
    "GARAN", "GEDZA", "GENIL", "GEREL", "GLBMD", "GLRYH", "GOZDE", "GRSAN", "GUBRF",
    "GZNMI", "HALKB", "HEKTS", "HRKLB", "IHLGM", "IHGZT", "INDES", "INVEO", "ISATR",
    "ISBTR", "ISCTR", "ISFIN", "ISGYO", "ISKPL", "ISMEN", "ITTFH", "IZMDC", "JANTS",
    "KAPLM", "KARMA", "KARSN", "KATMR", "KENT", "KERVT", "KIMMR", "KLGYO", "KLMSN", "KNFRT",
    "KONTR", "KONYA", "KORDS", "KOTON", "KOZAA", "KOZAL", "KRDMA", "KRDMB", "KRDMD",
    "KRGYO", "KRONT", "LIDER", "LINK", "LOGO", "LPCIP", "LUKSK", "MAGEN", "MAKIM", "MAVI",
    "MAALT", "MARTI", "MEPET", "MGROS", "MIATK", "MPARK", "MTRKS", "NETAS", "NIBAS", "ODAS",
    "OYAYO", "OTKAR", "OYLUM", "OZBAL", "PAMEL", "PANEL", "PARSN", "PEGAS", "PEKGY",
    "PETKM", "PETUN", "PGSUS", "PKART", "PKENT", "POLTK", "PRKAB", "PRZMA", "PSDTC",
    "QNBFL", "QUAGR", "RAYSG", "RODRG", "RTALB", "RYGYO", "SAFKR", "SANEL", "SASA", "SARKY",
    "SAHOL", "SDTTR", "SEKUR", "SELVA", "SEGYO", "SELEC", "SISE", "SILVR", "SKBNK", "SMART",
    "SMBYO", "SNICA", "SOKE", "SOKM", "SOMA", "SUNTK", "SUWEN", "SYHGYO", "TATGD", "TAVHL",
    "TCELL", "TDGYO", "TEHOL", "TEPLO", "THYAO", "TKFEN", "TKNSA", "TLMAN", "TMSN", "TMTAS",
    "TOASO", "TRCAS", "TRGYO", "TRILC", "TSGBD", "TSGYO", "TSKB", "TSPOR", "TTRAK", "TUKAS",
    "TUPRS", "TUREX", "ULAS", "ULKER", "UNLU", "USAK", "UZERB", "VAKBN", "VBTYZ", "VERUS",
    "VKING", "VESBE", "VESPA", "VESTL", "YEOTK", "YGGYO", "YKBNK", "YONGA", "YUNSA",
    "YYAPI", "ZEDUR", "ZOREN",
];

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("read universe file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("universe has no symbols")]
    Empty,
}

/// Ordered symbol list scanned each cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub symbols: Vec<String>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse `symbols = [...]`. Entries are normalized to display form and
    /// deduplicated, keeping first-seen order.
    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        let raw: Universe = toml::from_str(content)?;
        let universe = Self::from_symbols(raw.symbols);
        if universe.symbols.is_empty() {
            return Err(UniverseError::Empty);
        }
        Ok(universe)
    }

    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for s in symbols {
            let symbol = display_symbol(s.as_ref().trim());
            if !symbol.is_empty() && !out.contains(&symbol) {
                out.push(symbol);
            }
        }
        Self { symbols: out }
    }

    pub fn fallback() -> Self {
        Self::from_symbols(FALLBACK_SYMBOLS)
    }

    /// Load `path` if given, else the fallback list.
    pub fn load_or_fallback(path: Option<&Path>) -> Result<Self, UniverseError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::fallback()),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// `THYAO` / `thyao.is` → `THYAO.IS`.
pub fn yahoo_ticker(symbol: &str) -> String {
    format!("{}{EXCHANGE_SUFFIX}", display_symbol(symbol))
}

/// `THYAO.IS` → `THYAO`.
pub fn display_symbol(symbol: &str) -> String {
    let upper = symbol.to_ascii_uppercase();
    match upper.strip_suffix(EXCHANGE_SUFFIX) {
        Some(base) => base.to_string(),
        None => upper,
    }
}
