//! Static data served when the store is unreachable or unconfigured.

use tavola_shared::Country;
use uuid::Uuid;

/// (name, ISO code, flag), already ordered by name.
const COUNTRIES: [(&str, &str, &str); 12] = [
    ("Argentina", "AR", "🇦🇷"),
    ("China", "CN", "🇨🇳"),
    ("France", "FR", "🇫🇷"),
    ("India", "IN", "🇮🇳"),
    ("Italy", "IT", "🇮🇹"),
    ("Japan", "JP", "🇯🇵"),
    ("Lebanon", "LB", "🇱🇧"),
    ("Mexico", "MX", "🇲🇽"),
    ("Morocco", "MA", "🇲🇦"),
    ("Peru", "PE", "🇵🇪"),
    ("Spain", "ES", "🇪🇸"),
    ("Thailand", "TH", "🇹🇭"),
];

pub fn countries() -> Vec<Country> {
    COUNTRIES
        .iter()
        .zip(1u128..)
        .map(|((name, code, flag), n)| Country {
            id: Uuid::from_u128(n),
            name: (*name).to_string(),
            code: (*code).to_string(),
            flag_emoji: Some((*flag).to_string()),
            active: true,
        })
        .collect()
}
