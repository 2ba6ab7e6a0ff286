//! UTxO records, `query utxo` JSON parsing and filtering helpers.

use serde_json::Value as JsonValue;

use crate::{
    consts::DEFAULT_COIN,
    error::{Error, Result},
    records::CoinAmount,
};

/// One (coin, amount) row of an unspent transaction output.
///
/// A UTxO holding multiple coins yields one record per coin, all sharing the
/// same `utxo_hash`/`utxo_ix`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UtxoData {
    /// Transaction id the output was created by.
    pub utxo_hash: String,
    /// Output index within that transaction.
    pub utxo_ix: u32,
    /// Amount of `coin` held by the output.
    pub amount: i64,
    /// Address owning the output.
    pub address: String,
    /// Coin identifier, `lovelace` by default.
    pub coin: String,
    /// Human-readable coin name (`policyid.assetname` with the name decoded).
    pub decoded_coin: String,
    /// Datum hash attached to the output.
    pub datum_hash: String,
    /// Hash of the inline datum, if present.
    pub inline_datum_hash: String,
    /// The inline datum itself, as JSON.
    pub inline_datum: Option<JsonValue>,
    /// Reference script attached to the output, as JSON.
    pub reference_script: Option<JsonValue>,
}

impl UtxoData {
    /// A plain lovelace UTxO row.
    pub fn new(
        utxo_hash: impl Into<String>,
        utxo_ix: u32,
        amount: i64,
        address: impl Into<String>,
    ) -> Self {
        UtxoData {
            utxo_hash: utxo_hash.into(),
            utxo_ix,
            amount,
            address: address.into(),
            ..Default::default()
        }
    }

    /// The UTxO identifier in `hash#ix` form.
    pub fn id(&self) -> String {
        format!("{}#{}", self.utxo_hash, self.utxo_ix)
    }
}

impl Default for UtxoData {
    fn default() -> Self {
        UtxoData {
            utxo_hash: String::new(),
            utxo_ix: 0,
            amount: 0,
            address: String::new(),
            coin: DEFAULT_COIN.to_string(),
            decoded_coin: String::new(),
            datum_hash: String::new(),
            inline_datum_hash: String::new(),
            inline_datum: None,
            reference_script: None,
        }
    }
}

impl CoinAmount for UtxoData {
    fn coin(&self) -> &str {
        &self.coin
    }

    fn amount(&self) -> i64 {
        self.amount
    }
}

/// Filtering criteria for [`filter_utxos`]; unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UtxoFilter {
    /// Match on the transaction id.
    pub utxo_hash: Option<String>,
    /// Match on the output index.
    pub utxo_ix: Option<u32>,
    /// Match on the amount.
    pub amount: Option<i64>,
    /// Match on the owning address.
    pub address: Option<String>,
    /// Match on the coin id.
    pub coin: Option<String>,
    /// Match on the datum hash.
    pub datum_hash: Option<String>,
    /// Match on the inline datum hash.
    pub inline_datum_hash: Option<String>,
}

fn decode_asset_name(policyid: &str, asset_name: &str) -> String {
    if asset_name.is_empty() {
        return policyid.to_string();
    }
    hex::decode(asset_name)
        .ok()
        .and_then(|raw| String::from_utf8(raw).ok())
        .map(|name| format!("{policyid}.{name}"))
        .unwrap_or_default()
}

fn str_field(data: &JsonValue, key: &str) -> String {
    data.get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse the JSON output of `query utxo` into UTxO records.
///
/// `address` overrides the owning address of every record when non-empty;
/// `coins` filters the result to the given coin ids when non-empty.
pub fn parse_query_utxo(
    utxo_json: &JsonValue,
    address: &str,
    coins: &[String],
) -> Result<Vec<UtxoData>> {
    let utxo_map = utxo_json
        .as_object()
        .ok_or_else(|| Error::Parse("`query utxo` output is not a JSON object".to_string()))?;

    let mut utxos = Vec::new();
    for (utxo_rec, utxo_data) in utxo_map {
        let (utxo_hash, utxo_ix) = utxo_rec
            .split_once('#')
            .ok_or_else(|| Error::Parse(format!("malformed UTxO id `{utxo_rec}`")))?;
        let utxo_ix: u32 = utxo_ix
            .parse()
            .map_err(|_| Error::Parse(format!("malformed UTxO index in `{utxo_rec}`")))?;

        let utxo_address = str_field(utxo_data, "address");
        let record_address = if address.is_empty() {
            utxo_address
        } else {
            address.to_string()
        };
        // Old node versions report the datum hash under "data".
        let datum_hash = {
            let hash = str_field(utxo_data, "data");
            if hash.is_empty() {
                str_field(utxo_data, "datumhash")
            } else {
                hash
            }
        };
        let inline_datum_hash = str_field(utxo_data, "inlineDatumhash");
        let inline_datum = utxo_data.get("inlineDatum").filter(|v| !v.is_null()).cloned();
        let reference_script = utxo_data
            .get("referenceScript")
            .filter(|v| !v.is_null())
            .cloned();

        let value_map = utxo_data
            .get("value")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::Parse(format!("missing value map for `{utxo_rec}`")))?;

        for (policyid, coin_data) in value_map {
            let base = UtxoData {
                utxo_hash: utxo_hash.to_string(),
                utxo_ix,
                amount: 0,
                address: record_address.clone(),
                coin: DEFAULT_COIN.to_string(),
                decoded_coin: String::new(),
                datum_hash: datum_hash.clone(),
                inline_datum_hash: inline_datum_hash.clone(),
                inline_datum: inline_datum.clone(),
                reference_script: reference_script.clone(),
            };

            if policyid == DEFAULT_COIN {
                let amount = coin_data.as_i64().ok_or_else(|| {
                    Error::Parse(format!("non-numeric lovelace amount for `{utxo_rec}`"))
                })?;
                utxos.push(UtxoData { amount, ..base });
                continue;
            }

            // Per-policy coin data used to be a map, newer versions emit a
            // list of (asset name, amount) pairs.
            let mut assets: Vec<(String, i64)> = Vec::new();
            match coin_data {
                JsonValue::Object(map) => {
                    for (asset_name, amount) in map {
                        assets.push((asset_name.clone(), amount.as_i64().unwrap_or(0)));
                    }
                }
                JsonValue::Array(items) => {
                    for item in items {
                        let pair = item.as_array();
                        if let Some([name, amount]) = pair.map(Vec::as_slice) {
                            assets.push((
                                name.as_str().unwrap_or_default().to_string(),
                                amount.as_i64().unwrap_or(0),
                            ));
                        }
                    }
                }
                other => {
                    return Err(Error::Parse(format!(
                        "unexpected coin data `{other}` for `{utxo_rec}`"
                    )));
                }
            }

            for (asset_name, amount) in assets {
                let coin = if asset_name.is_empty() {
                    policyid.clone()
                } else {
                    format!("{policyid}.{asset_name}")
                };
                utxos.push(UtxoData {
                    amount,
                    coin,
                    decoded_coin: decode_asset_name(policyid, &asset_name),
                    ..base.clone()
                });
            }
        }
    }

    if !coins.is_empty() {
        utxos.retain(|u| coins.iter().any(|c| c == &u.coin));
    }

    Ok(utxos)
}

/// Sum of the balances of the given records for one coin.
pub fn calculate_utxos_balance<T: CoinAmount>(utxos: &[T], coin: &str) -> i64 {
    utxos
        .iter()
        .filter(|u| u.coin() == coin)
        .map(CoinAmount::amount)
        .sum()
}

/// The record with the highest amount of the given coin, if any.
pub fn filter_utxo_with_highest_amount(utxos: &[UtxoData], coin: &str) -> Option<UtxoData> {
    utxos
        .iter()
        .filter(|u| u.coin == coin)
        .max_by_key(|u| u.amount)
        .cloned()
}

/// UTxO records matching all criteria set in the filter.
pub fn filter_utxos(utxos: &[UtxoData], filter: &UtxoFilter) -> Vec<UtxoData> {
    utxos
        .iter()
        .filter(|u| {
            filter.utxo_hash.as_ref().is_none_or(|v| v == &u.utxo_hash)
                && filter.utxo_ix.is_none_or(|v| v == u.utxo_ix)
                && filter.amount.is_none_or(|v| v == u.amount)
                && filter.address.as_ref().is_none_or(|v| v == &u.address)
                && filter.coin.as_ref().is_none_or(|v| v == &u.coin)
                && filter.datum_hash.as_ref().is_none_or(|v| v == &u.datum_hash)
                && filter
                    .inline_datum_hash
                    .as_ref()
                    .is_none_or(|v| v == &u.inline_datum_hash)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_utxo_json() -> JsonValue {
        json!({
            "aa6f1e4d#0": {
                "address": "addr_test1vq0nckg3ekgzuqg7w5p9mvgnd9ym28qh5grlph8xd2z92su7t0pcs",
                "value": { "lovelace": 2_000_000 },
                "datumhash": "abc123"
            },
            "aa6f1e4d#1": {
                "address": "addr_test1vq0nckg3ekgzuqg7w5p9mvgnd9ym28qh5grlph8xd2z92su7t0pcs",
                "value": {
                    "lovelace": 1_500_000,
                    "2c1e0bb1a8f6a9c7b5000c1b0d34d3a07bdf5f908ae1c4ff1f1a1a9b": {
                        "74657374636f696e": 10
                    }
                },
                "inlineDatumhash": "def456",
                "inlineDatum": { "int": 42 }
            }
        })
    }

    #[test]
    fn parses_lovelace_and_assets() {
        let utxos = parse_query_utxo(&sample_utxo_json(), "", &[]).unwrap();
        assert_eq!(utxos.len(), 3);

        let plain = filter_utxos(
            &utxos,
            &UtxoFilter {
                utxo_ix: Some(0),
                ..Default::default()
            },
        );
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].amount, 2_000_000);
        assert_eq!(plain[0].datum_hash, "abc123");
        assert_eq!(plain[0].coin, DEFAULT_COIN);

        let asset = utxos
            .iter()
            .find(|u| u.coin.ends_with(".74657374636f696e"))
            .unwrap();
        assert_eq!(asset.amount, 10);
        assert!(asset.decoded_coin.ends_with(".testcoin"));
        assert_eq!(asset.inline_datum_hash, "def456");
        assert_eq!(asset.inline_datum, Some(json!({ "int": 42 })));
    }

    #[test]
    fn parses_asset_list_shape() {
        let data = json!({
            "bb#0": {
                "address": "addr_test1xyz",
                "value": {
                    "lovelace": 100,
                    "policy0": [["616263", 7]]
                }
            }
        });
        let utxos = parse_query_utxo(&data, "", &[]).unwrap();
        let asset = utxos.iter().find(|u| u.coin == "policy0.616263").unwrap();
        assert_eq!(asset.amount, 7);
        assert_eq!(asset.decoded_coin, "policy0.abc");
    }

    #[test]
    fn address_override_and_coin_filter() {
        let coins = vec![DEFAULT_COIN.to_string()];
        let utxos = parse_query_utxo(&sample_utxo_json(), "addr_override", &coins).unwrap();
        assert_eq!(utxos.len(), 2);
        assert!(utxos.iter().all(|u| u.address == "addr_override"));
        assert!(utxos.iter().all(|u| u.coin == DEFAULT_COIN));
    }

    #[test]
    fn balance_and_highest_amount() {
        let utxos = vec![
            UtxoData::new("a", 0, 10, "addr1"),
            UtxoData::new("b", 1, 30, "addr1"),
            UtxoData::new("c", 2, 20, "addr1"),
        ];
        assert_eq!(calculate_utxos_balance(&utxos, DEFAULT_COIN), 60);
        assert_eq!(
            filter_utxo_with_highest_amount(&utxos, DEFAULT_COIN)
                .unwrap()
                .utxo_hash,
            "b"
        );
        assert!(filter_utxo_with_highest_amount(&utxos, "unknown").is_none());
    }

    #[test]
    fn malformed_id_is_rejected() {
        let data = json!({ "not-an-id": { "value": { "lovelace": 1 } } });
        assert!(parse_query_utxo(&data, "", &[]).is_err());
    }
}
