use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Club aliases keyed by folded name. Aligns the naming used by the various
/// upstream sources (CBF dumps, football-data exports) on one canonical id.
static TEAM_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("flamengo rj", "flamengo"),
        ("botafogo rj", "botafogo"),
        ("santos fc", "santos"),
        ("atletico mg", "atletico mineiro"),
        ("atletico pr", "athletico paranaense"),
        ("athletico pr", "athletico paranaense"),
        ("coritiba fc", "coritiba"),
        ("avai fc", "avai"),
        ("figueirense fc", "figueirense"),
        ("criciuma ec", "criciuma"),
        ("chapecoense sc", "chapecoense"),
        ("cuiaba mt", "cuiaba"),
        ("ec bahia", "bahia"),
        ("ec vitoria", "vitoria"),
        ("ceara sc", "ceara"),
        ("sport recife", "sport"),
        ("rb bragantino", "bragantino"),
        ("vasco da gama", "vasco"),
        ("joinville sc", "joinville"),
        ("goias ec", "goias"),
    ])
});

/// Canonical club identifier for a raw team-name string: lowercase, fold
/// accents, collapse separators, then apply the alias table with identity
/// fallback for unknown names.
pub fn canon_team(raw: &str) -> String {
    let folded = fold_name(raw);
    match TEAM_ALIASES.get(folded.as_str()) {
        Some(canon) => (*canon).to_string(),
        None => folded,
    }
}

fn fold_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().to_lowercase().chars() {
        out.push(match ch {
            'á' | 'à' | 'ã' | 'â' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            '-' => ' ',
            _ => ch,
        });
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
