// Plain-text rendering of server responses

use serde_json::Value;

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Lines describing a passport, one block per credential.
pub fn passport_lines(passport: &Value) -> Vec<String> {
    let mut lines = vec![format!(
        "Skill Passport of {} (user {})",
        text(passport, "username"),
        passport["userId"]
    )];

    let entries = passport["credentials"].as_array().cloned().unwrap_or_default();
    if entries.is_empty() {
        lines.push("No credentials yet.".to_string());
        return lines;
    }

    for entry in &entries {
        lines.push(String::new());
        lines.push(format!(
            "#{} {}: {}",
            entry["id"],
            text(entry, "kindLabel"),
            text(entry, "itemName")
        ));
        lines.push(format!("  issued:  {}", text(entry, "issuedOn")));
        lines.push(format!("  tx hash: {}", text(entry, "blockchainTxhash")));
        let verify = text(entry, "verifyUrl");
        if !verify.is_empty() {
            lines.push(format!("  verify:  {}", verify));
        }
        if entry["hasNft"].as_bool().unwrap_or(false) {
            lines.push(format!(
                "  nft:     {} ({})",
                text(entry, "nftTokenId"),
                text(entry, "nftViewPath")
            ));
        } else {
            lines.push(format!("  nft:     not minted ({})", text(entry, "mintPath")));
        }
    }
    lines
}

/// Lines describing an NFT record.
pub fn nft_lines(nft: &Value) -> Vec<String> {
    let mut lines = vec![
        format!("NFT #{} for credential #{}", nft["id"], nft["credentialId"]),
        format!("Token ID: {}", text(nft, "tokenId")),
        format!("Contract: {}", text(nft, "contractAddress")),
        "Metadata:".to_string(),
    ];
    lines.extend(text(nft, "metadataPretty").lines().map(str::to_string));
    lines
}
