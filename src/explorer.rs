//! Block explorer links for broadcast transactions

/// Explorer templates keyed by network id prefix; `{tx}` is replaced by the hash
const EXPLORERS: &[(&str, &str)] = &[
    ("cosmos:cosmoshub", "https://www.mintscan.io/cosmos/tx/{tx}"),
    ("cosmos:osmosis", "https://www.mintscan.io/osmosis/tx/{tx}"),
    ("cosmos:thorchain", "https://viewblock.io/thorchain/tx/{tx}"),
    ("cosmos:mayachain", "https://www.mintscan.io/mayachain/tx/{tx}"),
];

const COSMOS_NAMESPACE: &str = "cosmos:";

/// URL to view `tx_hash` on `network_id`, or `None` when no explorer is known
///
/// Any other `cosmos:<chain>` network falls back to mintscan using the chain
/// reference as slug. Never panics.
pub fn resolve_explorer_url(network_id: &str, tx_hash: &str) -> Option<String> {
    let network_id = network_id.trim();

    if let Some((_, template)) = EXPLORERS
        .iter()
        .find(|(prefix, _)| network_id.starts_with(prefix))
    {
        return Some(template.replace("{tx}", tx_hash));
    }

    let chain = network_id.strip_prefix(COSMOS_NAMESPACE)?;
    let slug = chain.split('/').next().unwrap_or_default();
    if slug.is_empty() {
        return None;
    }
    Some(format!("https://www.mintscan.io/{slug}/tx/{tx_hash}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_networks() {
        let url = resolve_explorer_url("cosmos:cosmoshub-4", "deadbeef").unwrap();
        assert!(url.contains("mintscan.io/cosmos/tx/deadbeef"));

        assert_eq!(
            resolve_explorer_url("cosmos:osmosis-1", "aa").as_deref(),
            Some("https://www.mintscan.io/osmosis/tx/aa")
        );
        assert_eq!(
            resolve_explorer_url("cosmos:thorchain-mainnet-v1", "bb").as_deref(),
            Some("https://viewblock.io/thorchain/tx/bb")
        );
        assert_eq!(
            resolve_explorer_url("cosmos:mayachain-mainnet-v1", "cc").as_deref(),
            Some("https://www.mintscan.io/mayachain/tx/cc")
        );
    }

    #[test]
    fn test_generic_cosmos_fallback() {
        assert_eq!(
            resolve_explorer_url("cosmos:kaiyo-1", "dd").as_deref(),
            Some("https://www.mintscan.io/kaiyo-1/tx/dd")
        );
        assert_eq!(
            resolve_explorer_url("cosmos:kaiyo-1/slip44:118", "dd").as_deref(),
            Some("https://www.mintscan.io/kaiyo-1/tx/dd")
        );
    }

    #[test]
    fn test_unknown_networks() {
        assert_eq!(resolve_explorer_url("unknown:chain", "x"), None);
        assert_eq!(resolve_explorer_url("bip122:unknown", "x"), None);
        assert_eq!(resolve_explorer_url("cosmos:", "x"), None);
        assert_eq!(resolve_explorer_url("", ""), None);
        assert_eq!(resolve_explorer_url(":::/", "\u{0}"), None);
    }
}
