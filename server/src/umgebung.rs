//! Pruefung der Umgebungsvariablen beim Start
//!
//! Der Connector authentifiziert sich mit `DISCORD_TOKEN` und `CLIENT_ID`.
//! Fehlen sie, bricht der Start mit einer Fehlermeldung ab, die alle
//! fehlenden Variablen nennt.

use thiserror::Error;

pub const ENV_TOKEN: &str = "DISCORD_TOKEN";
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";

/// Erforderliche Umgebungsvariablen
const ERFORDERLICH: [&str; 2] = [ENV_TOKEN, ENV_CLIENT_ID];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UmgebungsFehler {
    #[error("Fehlende Umgebungsvariablen: {}", .0.join(", "))]
    Fehlend(Vec<&'static str>),

    #[error("DISCORD_TOKEN enthaelt unzulaessige Zeichen")]
    UngueltigesToken,
}

/// Gepruefte Zugangsdaten
///
/// Das Token verwendet nur der Connector; der Bot prueft es lediglich.
#[derive(Debug, Clone)]
pub struct Zugangsdaten {
    pub client_id: String,
}

/// Prueft die Umgebung ueber die Lesefunktion `lesen`
///
/// Leere Werte gelten als fehlend.
pub fn pruefen(lesen: impl Fn(&str) -> Option<String>) -> Result<Zugangsdaten, UmgebungsFehler> {
    let wert = |name: &str| lesen(name).filter(|w| !w.trim().is_empty());

    let fehlend: Vec<&'static str> = ERFORDERLICH
        .iter()
        .copied()
        .filter(|name| wert(name).is_none())
        .collect();
    if !fehlend.is_empty() {
        return Err(UmgebungsFehler::Fehlend(fehlend));
    }

    if !wert(ENV_TOKEN).is_some_and(|token| token_gueltig(&token)) {
        return Err(UmgebungsFehler::UngueltigesToken);
    }

    Ok(Zugangsdaten {
        client_id: wert(ENV_CLIENT_ID).unwrap_or_default(),
    })
}

/// Prueft die Prozess-Umgebung
pub fn pruefen_aus_env() -> Result<Zugangsdaten, UmgebungsFehler> {
    pruefen(|name| std::env::var(name).ok())
}

fn token_gueltig(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn umgebung(paare: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = paare
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn vollstaendige_umgebung() {
        let z = pruefen(umgebung(&[
            ("DISCORD_TOKEN", "abc.DEF-123_x"),
            ("CLIENT_ID", "42"),
        ]))
        .unwrap();
        assert_eq!(z.client_id, "42");
    }

    #[test]
    fn alle_fehlenden_werden_genannt() {
        let e = pruefen(umgebung(&[])).unwrap_err();
        assert_eq!(e, UmgebungsFehler::Fehlend(vec!["DISCORD_TOKEN", "CLIENT_ID"]));
        assert_eq!(
            e.to_string(),
            "Fehlende Umgebungsvariablen: DISCORD_TOKEN, CLIENT_ID"
        );
    }

    #[test]
    fn leerer_wert_gilt_als_fehlend() {
        let e = pruefen(umgebung(&[("DISCORD_TOKEN", "abc"), ("CLIENT_ID", "  ")])).unwrap_err();
        assert_eq!(e, UmgebungsFehler::Fehlend(vec!["CLIENT_ID"]));
    }

    #[test]
    fn token_mit_sonderzeichen_abgelehnt() {
        let e = pruefen(umgebung(&[("DISCORD_TOKEN", "abc def"), ("CLIENT_ID", "1")])).unwrap_err();
        assert_eq!(e, UmgebungsFehler::UngueltigesToken);
    }

    #[test]
    fn debug_enthaelt_kein_token() {
        let z = pruefen(umgebung(&[("DISCORD_TOKEN", "geheim"), ("CLIENT_ID", "1")])).unwrap();
        assert!(!format!("{z:?}").contains("geheim"));
    }
}
