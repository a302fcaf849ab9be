//! Static tables of GS1 application identifiers.
//!
//! All tables are sorted so lookups can use binary search.

/// Symbolic names of application identifiers.
const NAMES: [(&str, &str); 53] = [
    ("ADDITIONAL_ID", "240"),
    ("AREA_M2", "314"),
    ("AREA_M2_LOG", "334"),
    ("BATCH/LOT", "10"),
    ("BEST_BEFORE", "15"),
    ("CONTENT", "02"),
    ("COUNT", "37"),
    ("CPV", "22"),
    ("CUST_PART_NO", "241"),
    ("DUE_DATE", "12"),
    ("GCN", "255"),
    ("GDTI", "253"),
    ("GLN_EXTENSION", "254"),
    ("GROSS_WEIGHT_KG", "330"),
    ("GROSS_WEIGHT_LB", "340"),
    ("GTIN", "01"),
    ("HEIGHT_F", "328"),
    ("HEIGHT_I", "327"),
    ("HEIGHT_M", "313"),
    ("HEIGHT_M_LOG", "333"),
    ("HEIGHT_Y", "329"),
    ("KG_PER_M2", "337"),
    ("LENGTH_F", "322"),
    ("LENGTH_F_LOG", "342"),
    ("LENGTH_I", "321"),
    ("LENGTH_I_LOG", "341"),
    ("LENGTH_M", "311"),
    ("LENGTH_M_LOG", "331"),
    ("LENGTH_Y", "323"),
    ("MTO_VARIANT", "242"),
    ("NET_VOLUME_L", "315"),
    ("NET_VOLUME_M3", "316"),
    ("NET_WEIGHT_KG", "310"),
    ("NET_WEIGHT_LB", "320"),
    ("PACK_DATE", "13"),
    ("PCN", "243"),
    ("PROD_DATE", "11"),
    ("REF_TO_SOURCE", "251"),
    ("SECONDARY_SERIAL", "250"),
    ("SELL_BY", "16"),
    ("SERIAL", "21"),
    ("SSCC", "00"),
    ("TPX", "235"),
    ("USE_BY_OR_EXPIRY", "17"),
    ("VARIANT", "20"),
    ("VAR_COUNT", "30"),
    ("VOLUME_L_LOG", "335"),
    ("VOLUME_M3_LOG", "336"),
    ("WIDTH_F", "325"),
    ("WIDTH_I", "324"),
    ("WIDTH_M", "312"),
    ("WIDTH_M_LOG", "332"),
    ("WIDTH_Y", "326"),
];

/// Further spellings accepted for compatibility with older input.
const ALIASES: [(&str, &str); 7] = [
    ("BEST_BEFORE:", "15"),
    ("GLM_EXTENSION", "254"),
    ("GTDI", "253"),
    ("LENGHT_F_LOG", "342"),
    ("LENGHT_I_LOG", "341"),
    ("LENGTH_m", "311"),
    ("NET_WEIGHT_M", "310"),
];

/// AIs whose value has exactly this many characters.
const FIXED_LENGTH: [(&str, usize); 10] = [
    ("00", 18),
    ("01", 14),
    ("02", 14),
    ("11", 6),
    ("12", 6),
    ("13", 6),
    ("15", 6),
    ("16", 6),
    ("17", 6),
    ("20", 2),
];

/// Date AIs in the `YYMMDD` format.
const DATES: [&str; 6] = ["11", "12", "13", "15", "16", "17"];

/// Three digit prefixes of measure AIs. The fourth digit counts decimals.
/// The imperial logistic measures `340` to `342` belong to the family too.
const DECIMAL: [&str; 28] = [
    "310", "311", "312", "313", "314", "315", "316", "320", "321", "322", "323", "324", "325",
    "326", "327", "328", "329", "330", "331", "332", "333", "334", "335", "336", "337", "340",
    "341", "342",
];

/// Variable length AIs, they need a separator unless written last.
const VARIABLE: [&str; 107] = [
    "10", "21", "22", "235", "240", "241", "242", "243", "250", "251", "253", "254", "255", "30",
    "37", "390", "391", "392", "393", "394", "395", "400", "401", "402", "403", "420", "421",
    "422", "423", "424", "425", "426", "427", "4300", "4301", "4302", "4303", "4304", "4305",
    "4306", "4307", "4308", "4309", "4330", "4331", "4332", "4333", "7001", "7002", "7003",
    "7004", "7005", "7006", "7007", "7008", "7009", "7010", "7011", "7020", "7021", "7022",
    "7023", "703", "7040", "710", "711", "712", "713", "714", "715", "723", "7240", "7241",
    "7242", "8001", "8002", "8003", "8004", "8005", "8006", "8007", "8008", "8009", "8010",
    "8011", "8012", "8013", "8017", "8018", "8019", "8020", "8026", "8030", "8110", "8111",
    "8112", "8200", "90", "91", "92", "93", "94", "95", "96", "97", "98", "99",
];

/// Variable length AIs which carry an extra digit, e.g. `3922`.
const VARIABLE_WITH_DIGIT: [&str; 7] = ["390", "391", "392", "393", "394", "395", "703"];

fn lookup(table: &[(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .binary_search_by_key(&name, |&(name, _)| name)
        .ok()
        .map(|i| table[i].1)
}

/// Resolve a symbolic AI name like `"GTIN"` to its code.
pub fn resolve_name(name: &str) -> Option<&'static str> {
    lookup(&NAMES, name).or_else(|| lookup(&ALIASES, name))
}

/// What is known about an application identifier.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AiInfo {
    /// Symbolic name, if there is one.
    pub name: Option<&'static str>,
    /// Required length of the value.
    pub fixed_length: Option<usize>,
    /// Whether the value is a six digit number with implied decimals.
    pub decimal: bool,
    /// Whether a separator must follow the value unless it is last.
    pub separator: bool,
}

impl AiInfo {
    /// Look up an AI code such as `"01"` or `"3103"`.
    pub fn of(code: &str) -> Self {
        let prefix = code.get(..3);
        let name = NAMES
            .iter()
            .find(|(_, c)| {
                *c == code || (code.len() == 4 && is_decimal_prefix(c) && Some(*c) == prefix)
            })
            .map(|(name, _)| *name);
        let fixed_length = FIXED_LENGTH
            .binary_search_by_key(&code, |&(code, _)| code)
            .ok()
            .map(|i| FIXED_LENGTH[i].1);
        let decimal = matches!(code.len(), 3 | 4) && prefix.is_some_and(is_decimal_prefix);
        let separator = VARIABLE.binary_search(&code).is_ok()
            || (code.len() == 4 && prefix.is_some_and(|p| VARIABLE_WITH_DIGIT.contains(&p)));
        Self {
            name,
            fixed_length,
            decimal,
            separator,
        }
    }
}

pub(crate) fn is_decimal_prefix(prefix: &str) -> bool {
    DECIMAL.binary_search(&prefix).is_ok()
}

pub(crate) fn is_date(code: &str) -> bool {
    DATES.contains(&code)
}

#[cfg(test)]
fn is_sorted<T: PartialOrd>(items: impl Iterator<Item = T>) -> bool {
    let items: crate::std::vec::Vec<T> = items.collect();
    items.windows(2).all(|w| w[0] < w[1])
}

#[test]
fn test_tables_sorted() {
    assert!(is_sorted(NAMES.iter().map(|(n, _)| *n)));
    assert!(is_sorted(ALIASES.iter().map(|(n, _)| *n)));
    assert!(is_sorted(FIXED_LENGTH.iter().map(|(c, _)| *c)));
    assert!(is_sorted(DECIMAL.iter()));
    assert!(is_sorted(VARIABLE.iter()));
}

#[test]
fn test_resolve_name() {
    assert_eq!(resolve_name("GTIN"), Some("01"));
    assert_eq!(resolve_name("BATCH/LOT"), Some("10"));
    assert_eq!(resolve_name("NET_WEIGHT_KG"), Some("310"));
    assert_eq!(resolve_name("LENGTH_I"), Some("321"));
    assert_eq!(resolve_name("NET_WEIGHT_M"), Some("310"));
    assert_eq!(resolve_name("LENGTH_m"), Some("311"));
    assert_eq!(resolve_name("GTDI"), Some("253"));
    assert_eq!(resolve_name("GLM_EXTENSION"), Some("254"));
    assert_eq!(resolve_name("BEST_BEFORE:"), Some("15"));
    assert_eq!(resolve_name("LENGHT_I_LOG"), Some("341"));
    assert_eq!(resolve_name("LENGHT_F_LOG"), Some("342"));
    assert_eq!(resolve_name("01"), None);
    assert_eq!(resolve_name("gtin"), None);
}

#[test]
fn test_ai_info() {
    assert_eq!(
        AiInfo::of("01"),
        AiInfo {
            name: Some("GTIN"),
            fixed_length: Some(14),
            decimal: false,
            separator: false,
        }
    );
    assert_eq!(
        AiInfo::of("10"),
        AiInfo {
            name: Some("BATCH/LOT"),
            fixed_length: None,
            decimal: false,
            separator: true,
        }
    );
    let weight = AiInfo::of("3103");
    assert!(weight.decimal);
    assert!(!weight.separator);
    assert_eq!(weight.name, Some("NET_WEIGHT_KG"));
    assert!(AiInfo::of("310").decimal);
    assert!(!AiInfo::of("31030").decimal);
    assert!(AiInfo::of("3922").separator);
    assert!(AiInfo::of("4300").separator);
    assert!(!AiInfo::of("4210").separator);
    assert_eq!(AiInfo::of("9999").name, None);
    // aliases never replace the regular name
    assert_eq!(AiInfo::of("254").name, Some("GLN_EXTENSION"));
}
