//! Tools for constructing transactions: UTxO selection, balancing and
//! argument assembly shared by the raw and non-raw build paths.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::Value as JsonValue;
use tracing::error;

use crate::{
    cluster::ClusterLib,
    consts::{Era, ScriptType, DEFAULT_COIN},
    error::{Error, Result},
    files,
    records::{
        ComplexCert, ComplexProposal, DataForBuild, Mint, ScriptTxIn, ScriptVote,
        ScriptWithdrawal, TxFiles, TxOut,
    },
    transaction::TxParams,
    utxo::UtxoData,
};

/// Organize transaction outputs by coin.
fn organize_txouts_by_coin(txouts: &[TxOut]) -> HashMap<String, Vec<TxOut>> {
    let mut db: HashMap<String, Vec<TxOut>> = HashMap::new();
    for rec in txouts {
        db.entry(rec.coin.clone()).or_default().push(rec.clone());
    }
    db
}

/// Organize UTxO rows by coin.
fn organize_utxos_by_coin(utxos: &[UtxoData]) -> HashMap<String, Vec<UtxoData>> {
    let mut db: HashMap<String, Vec<UtxoData>> = HashMap::new();
    for rec in utxos {
        db.entry(rec.coin.clone()).or_default().push(rec.clone());
    }
    db
}

/// Organize UTxO rows by id (`hash#ix`), preserving first-seen order.
fn organize_utxos_by_id(utxos: &[UtxoData]) -> Vec<(String, Vec<UtxoData>)> {
    let mut order: Vec<String> = Vec::new();
    let mut db: HashMap<String, Vec<UtxoData>> = HashMap::new();
    for rec in utxos {
        let utxo_id = rec.id();
        if !db.contains_key(&utxo_id) {
            order.push(utxo_id.clone());
        }
        db.entry(utxo_id).or_default().push(rec.clone());
    }
    order
        .into_iter()
        .map(|id| {
            let recs = db.remove(&id).unwrap_or_default();
            (id, recs)
        })
        .collect()
}

/// All UTxOs without a datum that hold any of the required coins.
fn get_usable_utxos(address_utxos: &[UtxoData], coins: &HashSet<String>) -> Result<Vec<UtxoData>> {
    let txins_by_id: HashMap<String, Vec<UtxoData>> = organize_utxos_by_id(address_utxos)
        .into_iter()
        .collect();

    let mut txins = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut matching_with_datum = false;
    for rec in address_utxos {
        let utxo_id = rec.id();
        if coins.contains(&rec.coin) && !seen_ids.contains(&utxo_id) {
            // Don't select UTxOs with a datum.
            if !rec.datum_hash.is_empty() || !rec.inline_datum_hash.is_empty() {
                matching_with_datum = true;
                continue;
            }
            seen_ids.insert(utxo_id.clone());
            txins.extend(txins_by_id.get(&utxo_id).cloned().unwrap_or_default());
        }
    }

    if txins.is_empty() && matching_with_datum {
        return Err(Error::InvalidArguments(
            "the only matching UTxOs have datum".to_string(),
        ));
    }

    Ok(txins)
}

/// Collect UTxOs until their total covers `amount`.
fn collect_utxos_amount(utxos: &[UtxoData], amount: i64, min_change_value: i64) -> Vec<UtxoData> {
    let mut collected_utxos = Vec::new();
    let mut collected_amount = 0;
    // The min change value applies only to the native coin.
    let amount_plus_change = match utxos.first() {
        Some(first) if first.coin == DEFAULT_COIN => amount + min_change_value,
        _ => amount,
    };
    for utxo in utxos {
        // If we collected the exact amount, no change is needed.
        if collected_amount == amount {
            break;
        }
        // Make sure the change is higher than the min change value.
        if collected_amount >= amount_plus_change {
            break;
        }
        collected_utxos.push(utxo.clone());
        collected_amount += utxo.amount;
    }
    collected_utxos
}

fn all_coins(
    txins_db: &HashMap<String, Vec<UtxoData>>,
    txouts_passed_db: &HashMap<String, Vec<TxOut>>,
    txouts_mint_db: &HashMap<String, Vec<TxOut>>,
) -> BTreeSet<String> {
    txins_db
        .keys()
        .chain(txouts_passed_db.keys())
        .chain(txouts_mint_db.keys())
        .cloned()
        .collect()
}

/// Select UTxOs that can satisfy all outputs, deposits and the fee.
///
/// Returns the ids of the selected UTxOs.
#[allow(clippy::too_many_arguments)]
fn select_utxos(
    txins_db: &HashMap<String, Vec<UtxoData>>,
    txouts_passed_db: &HashMap<String, Vec<TxOut>>,
    txouts_mint_db: &HashMap<String, Vec<TxOut>>,
    fee: i64,
    withdrawals: &[TxOut],
    min_change_value: i64,
    deposit: i64,
    treasury_donation: i64,
) -> BTreeSet<String> {
    let mut utxo_ids = BTreeSet::new();

    for coin in all_coins(txins_db, txouts_passed_db, txouts_mint_db) {
        let coin_txins = txins_db.get(&coin).cloned().unwrap_or_default();
        let coin_txouts = txouts_passed_db.get(&coin).cloned().unwrap_or_default();

        let total_output_amount: i64 = coin_txouts.iter().map(|o| o.amount).sum();

        let input_funds_needed = if coin == DEFAULT_COIN {
            // An amount of -1 means all available funds.
            if coin_txouts.iter().any(|o| o.amount == -1) {
                utxo_ids.extend(coin_txins.iter().map(UtxoData::id));
                continue;
            }
            let tx_fee = fee.max(1);
            let funds_needed = total_output_amount + tx_fee + deposit + treasury_donation;
            let total_withdrawals_amount: i64 = withdrawals.iter().map(|w| w.amount).sum();
            // The fee needs an input even when withdrawals cover everything.
            (funds_needed - total_withdrawals_amount).max(tx_fee)
        } else {
            let coin_txouts_minted = txouts_mint_db.get(&coin).cloned().unwrap_or_default();
            let total_minted_amount: i64 = coin_txouts_minted.iter().map(|o| o.amount).sum();
            // When burning, the minted amount is negative. Collect enough to
            // cover both the burn and the transfers, overlap included.
            total_output_amount - total_minted_amount
        };

        let filtered_coin_utxos =
            collect_utxos_amount(&coin_txins, input_funds_needed, min_change_value);
        utxo_ids.extend(filtered_coin_utxos.iter().map(UtxoData::id));
    }

    utxo_ids
}

/// Balance the transaction by adding a change output for each coin.
#[allow(clippy::too_many_arguments)]
fn balance_txouts(
    change_address: &str,
    txouts: &[TxOut],
    txins_db: &HashMap<String, Vec<UtxoData>>,
    txouts_passed_db: &HashMap<String, Vec<TxOut>>,
    txouts_mint_db: &HashMap<String, Vec<TxOut>>,
    fee: i64,
    withdrawals: &[TxOut],
    deposit: i64,
    treasury_donation: i64,
    lovelace_balanced: bool,
    skip_asset_balancing: bool,
) -> Result<Vec<TxOut>> {
    // Records burning tokens belong into the mint data, not into txouts.
    let burning_txouts: Vec<&TxOut> = txouts
        .iter()
        .filter(|r| r.amount < 0 && r.coin != DEFAULT_COIN)
        .collect();
    if !burning_txouts.is_empty() {
        return Err(Error::InvalidArguments(format!(
            "token burning is not allowed in txouts: {burning_txouts:?}"
        )));
    }

    let mut txouts_result: Vec<TxOut> = txouts.to_vec();

    for coin in all_coins(txins_db, txouts_passed_db, txouts_mint_db) {
        let mut max_address = None;
        let mut change = 0;

        let coin_txins = txins_db.get(&coin).cloned().unwrap_or_default();
        let mut coin_txouts = txouts_passed_db.get(&coin).cloned().unwrap_or_default();

        if coin == DEFAULT_COIN {
            // An amount of -1 means all available funds.
            let max_indexes: Vec<usize> = coin_txouts
                .iter()
                .enumerate()
                .filter(|(_, o)| o.amount == -1)
                .map(|(idx, _)| idx)
                .collect();
            if max_indexes.len() > 1 {
                return Err(Error::InvalidArguments(
                    "cannot send all remaining funds to more than one address".to_string(),
                ));
            }
            if let Some(&idx) = max_indexes.first() {
                max_address = Some(coin_txouts.remove(idx).address);
            }
        }

        let total_input_amount: i64 = coin_txins.iter().map(|i| i.amount).sum();
        let total_output_amount: i64 = coin_txouts.iter().map(|o| o.amount).sum();

        if skip_asset_balancing || (coin == DEFAULT_COIN && lovelace_balanced) {
            // Balancing is done by the `transaction build` command.
        } else if coin == DEFAULT_COIN {
            let tx_fee = fee.max(0);
            let total_withdrawals_amount: i64 = withdrawals.iter().map(|w| w.amount).sum();
            let funds_available = total_input_amount + total_withdrawals_amount;
            let funds_needed = total_output_amount + tx_fee + deposit + treasury_donation;
            change = funds_available - funds_needed;
            if change < 0 {
                error!(
                    "not enough funds to make the transaction - available: {funds_available}; \
                     needed: {funds_needed}"
                );
            }
        } else {
            let coin_txouts_minted = txouts_mint_db.get(&coin).cloned().unwrap_or_default();
            let total_minted_amount: i64 = coin_txouts_minted.iter().map(|o| o.amount).sum();
            let funds_available = total_input_amount + total_minted_amount;
            change = funds_available - total_output_amount;
            if change < 0 {
                error!(
                    "amount of coin `{coin}` is not sufficient - available: {funds_available}; \
                     needed: {total_output_amount}"
                );
            }
        }

        if change > 0 {
            txouts_result.push(TxOut {
                address: max_address.unwrap_or_else(|| change_address.to_string()),
                amount: change,
                coin: coin.clone(),
                ..Default::default()
            });
        }
    }

    // Filter out negative amounts (the -1 "max" records).
    txouts_result.retain(|r| r.amount > 0);

    Ok(txouts_result)
}

/// Resolve reward withdrawals; an amount of `-1` means the whole balance.
async fn resolve_withdrawals(cluster: &ClusterLib, withdrawals: &[TxOut]) -> Result<Vec<TxOut>> {
    let mut resolved = Vec::with_capacity(withdrawals.len());
    for rec in withdrawals {
        if rec.amount == -1 {
            let balance = cluster
                .query()
                .get_stake_addr_info(&rec.address)
                .await?
                .reward_account_balance;
            resolved.push(TxOut::new(rec.address.clone(), balance));
        } else {
            resolved.push(rec.clone());
        }
    }
    Ok(resolved)
}

/// Resolve plain and script withdrawals and combine them into Tx outputs.
pub(crate) async fn get_withdrawals(
    cluster: &ClusterLib,
    withdrawals: &[TxOut],
    script_withdrawals: &[ScriptWithdrawal],
) -> Result<(Vec<TxOut>, Vec<ScriptWithdrawal>, Vec<TxOut>)> {
    let withdrawals = resolve_withdrawals(cluster, withdrawals).await?;
    let mut resolved_script_withdrawals = Vec::with_capacity(script_withdrawals.len());
    for rec in script_withdrawals {
        let resolved_txout = resolve_withdrawals(cluster, std::slice::from_ref(&rec.txout))
            .await?
            .into_iter()
            .next()
            .unwrap_or_else(|| rec.txout.clone());
        resolved_script_withdrawals.push(ScriptWithdrawal {
            txout: resolved_txout,
            ..rec.clone()
        });
    }
    let mut withdrawals_txouts = withdrawals.clone();
    withdrawals_txouts.extend(resolved_script_withdrawals.iter().map(|s| s.txout.clone()));
    Ok((withdrawals, resolved_script_withdrawals, withdrawals_txouts))
}

/// All reference inputs: read-only ones plus script-carrying ones.
pub(crate) fn get_reference_txins(
    readonly_reference_txins: &[UtxoData],
    script_txins: &[ScriptTxIn],
    mint: &[Mint],
    complex_certs: &[ComplexCert],
    script_withdrawals: &[ScriptWithdrawal],
) -> Vec<UtxoData> {
    let mut reference_txins: Vec<UtxoData> = readonly_reference_txins.to_vec();
    reference_txins.extend(script_txins.iter().filter_map(|r| r.reference_txin.clone()));
    reference_txins.extend(mint.iter().filter_map(|r| r.reference_txin.clone()));
    reference_txins.extend(complex_certs.iter().filter_map(|r| r.reference_txin.clone()));
    reference_txins.extend(
        script_withdrawals
            .iter()
            .filter_map(|r| r.reference_txin.clone()),
    );
    reference_txins
}

/// Txin strings for the normal (non-script) inputs.
pub(crate) fn get_txin_strings(
    txins: &[UtxoData],
    script_txins: &[ScriptTxIn],
) -> BTreeSet<String> {
    let txins_utxos: BTreeSet<String> = txins.iter().map(UtxoData::id).collect();
    // All txin records of one script input belong to the same UTxO.
    let plutus_txins_utxos: BTreeSet<String> = script_txins
        .iter()
        .filter_map(|x| x.txins.first())
        .map(UtxoData::id)
        .collect();
    txins_utxos
        .difference(&plutus_txins_utxos)
        .cloned()
        .collect()
}

fn push_path_arg(args: &mut Vec<String>, flag: &str, file: &std::path::Path) {
    args.push(flag.to_string());
    args.push(files::path_str(file));
}

/// Datum and reference-script arguments of one transaction output.
fn get_txout_plutus_args(txout: &TxOut) -> Vec<String> {
    let mut txout_args = Vec::new();

    if !txout.datum_hash.is_empty() {
        txout_args.extend(["--tx-out-datum-hash".to_string(), txout.datum_hash.clone()]);
    } else if let Some(file) = &txout.datum_hash_file {
        push_path_arg(&mut txout_args, "--tx-out-datum-hash-file", file);
    } else if let Some(file) = &txout.datum_hash_cbor_file {
        push_path_arg(&mut txout_args, "--tx-out-datum-hash-cbor-file", file);
    } else if !txout.datum_hash_value.is_empty() {
        txout_args.extend([
            "--tx-out-datum-hash-value".to_string(),
            txout.datum_hash_value.clone(),
        ]);
    } else if let Some(file) = &txout.datum_embed_file {
        push_path_arg(&mut txout_args, "--tx-out-datum-embed-file", file);
    } else if let Some(file) = &txout.datum_embed_cbor_file {
        push_path_arg(&mut txout_args, "--tx-out-datum-embed-cbor-file", file);
    } else if !txout.datum_embed_value.is_empty() {
        txout_args.extend([
            "--tx-out-datum-embed-value".to_string(),
            txout.datum_embed_value.clone(),
        ]);
    } else if let Some(file) = &txout.inline_datum_file {
        push_path_arg(&mut txout_args, "--tx-out-inline-datum-file", file);
    } else if let Some(file) = &txout.inline_datum_cbor_file {
        push_path_arg(&mut txout_args, "--tx-out-inline-datum-cbor-file", file);
    } else if !txout.inline_datum_value.is_empty() {
        txout_args.extend([
            "--tx-out-inline-datum-value".to_string(),
            txout.inline_datum_value.clone(),
        ]);
    }

    if let Some(file) = &txout.reference_script_file {
        push_path_arg(&mut txout_args, "--tx-out-reference-script-file", file);
    }

    txout_args
}

fn datum_group_key(rec: &TxOut) -> String {
    let path_or = |file: &Option<std::path::PathBuf>| {
        file.as_ref().map(|f| files::path_str(f)).unwrap_or_default()
    };
    let datum_src = [
        rec.datum_hash.clone(),
        path_or(&rec.datum_hash_file),
        path_or(&rec.datum_hash_cbor_file),
        rec.datum_hash_value.clone(),
        path_or(&rec.datum_embed_file),
        path_or(&rec.datum_embed_cbor_file),
        rec.datum_embed_value.clone(),
    ]
    .into_iter()
    .find(|s| !s.is_empty())
    .unwrap_or_default();

    let inline_datum_src = [
        path_or(&rec.inline_datum_file),
        path_or(&rec.inline_datum_cbor_file),
        rec.inline_datum_value.clone(),
    ]
    .into_iter()
    .find(|s| !s.is_empty())
    .unwrap_or_default();

    format!(
        "{}::{}::{}::{}",
        rec.address,
        datum_src,
        inline_datum_src,
        path_or(&rec.reference_script_file)
    )
}

/// Group transaction outputs by address, datum and reference script, summing
/// the amounts per coin within each group.
pub fn get_joined_txouts(txouts: &[TxOut]) -> Vec<Vec<TxOut>> {
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<TxOut>> = HashMap::new();

    for rec in txouts {
        let key = datum_group_key(rec);
        if !groups.contains_key(&key) {
            group_order.push(key.clone());
        }
        groups.entry(key).or_default().push(rec.clone());
    }

    let mut joined_txouts = Vec::with_capacity(group_order.len());
    for key in group_order {
        let group = groups.remove(&key).unwrap_or_default();
        // One record per coin, amount summed over the group.
        let mut coin_order: Vec<String> = Vec::new();
        let mut by_coin: HashMap<String, TxOut> = HashMap::new();
        for rec in group {
            match by_coin.get_mut(&rec.coin) {
                Some(joined) => joined.amount += rec.amount,
                None => {
                    coin_order.push(rec.coin.clone());
                    by_coin.insert(rec.coin.clone(), rec);
                }
            }
        }
        joined_txouts.push(
            coin_order
                .into_iter()
                .filter_map(|coin| by_coin.remove(&coin))
                .collect(),
        );
    }

    joined_txouts
}

fn format_amount(amount: i64, coin: &str) -> String {
    if coin == DEFAULT_COIN {
        amount.to_string()
    } else {
        format!("{amount} {coin}")
    }
}

fn join_txouts(txouts: &[TxOut]) -> (Vec<String>, Vec<TxOut>, usize) {
    let mut txout_args: Vec<String> = Vec::new();
    let joined_txouts = get_joined_txouts(txouts);
    for joined_recs in &joined_txouts {
        let Some(first) = joined_recs.first() else {
            continue;
        };
        let amounts: Vec<String> = joined_recs
            .iter()
            .map(|r| format_amount(r.amount, &r.coin))
            .collect();
        txout_args.push("--tx-out".to_string());
        txout_args.push(format!("{}+{}", first.address, amounts.join("+")));
        txout_args.extend(get_txout_plutus_args(first));
    }

    let txouts_count = joined_txouts.len();
    let joined_flat: Vec<TxOut> = joined_txouts.into_iter().flatten().collect();
    (txout_args, joined_flat, txouts_count)
}

fn list_txouts(txouts: &[TxOut]) -> Vec<String> {
    let mut txout_args: Vec<String> = Vec::new();
    for rec in txouts {
        txout_args.push("--tx-out".to_string());
        txout_args.push(format!(
            "{}+{}",
            rec.address,
            format_amount(rec.amount, &rec.coin)
        ));
        txout_args.extend(get_txout_plutus_args(rec));
    }
    txout_args
}

/// Assemble `--tx-out` arguments, joined by address or listed verbatim.
pub(crate) fn process_txouts(
    txouts: &[TxOut],
    join: bool,
) -> (Vec<String>, Vec<TxOut>, usize) {
    if join {
        join_txouts(txouts)
    } else {
        (list_txouts(txouts), txouts.to_vec(), txouts.len())
    }
}

/// The `--tx-out-return-collateral` argument; all outputs must share one
/// address.
pub(crate) fn return_collateral_txout_args(txouts: &[TxOut]) -> Result<Vec<String>> {
    let Some(first) = txouts.first() else {
        return Ok(Vec::new());
    };

    let addresses: HashSet<&str> = txouts.iter().map(|t| t.address.as_str()).collect();
    if addresses.len() > 1 {
        return Err(Error::InvalidArguments(
            "return collateral accepts txouts for a single address only".to_string(),
        ));
    }

    let txout_records: Vec<String> = txouts
        .iter()
        .map(|t| format_amount(t.amount, &t.coin))
        .collect();
    Ok(vec![
        "--tx-out-return-collateral".to_string(),
        format!("{}+{}", first.address, txout_records.join("+")),
    ])
}

fn execution_units_args(
    args: &mut Vec<String>,
    flag: &str,
    execution_units: Option<(u64, u64)>,
    for_build: bool,
) {
    if for_build {
        return;
    }
    if let Some((steps, memory)) = execution_units {
        args.push(flag.to_string());
        args.push(format!("({steps},{memory})"));
    }
}

fn redeemer_args(
    args: &mut Vec<String>,
    prefix: &str,
    redeemer_file: &Option<std::path::PathBuf>,
    redeemer_cbor_file: &Option<std::path::PathBuf>,
    redeemer_value: &str,
) {
    if let Some(file) = redeemer_file {
        push_path_arg(args, &format!("{prefix}-redeemer-file"), file);
    }
    if let Some(file) = redeemer_cbor_file {
        push_path_arg(args, &format!("{prefix}-redeemer-cbor-file"), file);
    }
    if !redeemer_value.is_empty() {
        args.push(format!("{prefix}-redeemer-value"));
        args.push(redeemer_value.to_string());
    }
}

/// Arguments for script-coupled inputs, minting, certificates, proposals,
/// withdrawals and votes, collaterals deduplicated across all of them.
#[allow(clippy::too_many_arguments)]
pub(crate) fn get_script_args(
    script_txins: &[ScriptTxIn],
    mint: &[Mint],
    complex_certs: &[ComplexCert],
    complex_proposals: &[ComplexProposal],
    script_withdrawals: &[ScriptWithdrawal],
    script_votes: &[ScriptVote],
    for_build: bool,
) -> Vec<String> {
    let mut grouped_args: Vec<String> = Vec::new();
    let mut collaterals_all: BTreeSet<String> = BTreeSet::new();

    // Spending
    for tin in script_txins {
        if let Some(first) = tin.txins.first() {
            // All txin records belong to the same UTxO.
            grouped_args.extend(["--tx-in".to_string(), first.id()]);
        }
        collaterals_all.extend(tin.collaterals.iter().map(UtxoData::id));

        if let Some(script_file) = &tin.script_file {
            push_path_arg(&mut grouped_args, "--tx-in-script-file", script_file);

            execution_units_args(
                &mut grouped_args,
                "--tx-in-execution-units",
                tin.execution_units,
                for_build,
            );

            if let Some(file) = &tin.datum_file {
                push_path_arg(&mut grouped_args, "--tx-in-datum-file", file);
            }
            if let Some(file) = &tin.datum_cbor_file {
                push_path_arg(&mut grouped_args, "--tx-in-datum-cbor-file", file);
            }
            if !tin.datum_value.is_empty() {
                grouped_args.extend(["--tx-in-datum-value".to_string(), tin.datum_value.clone()]);
            }
            if tin.inline_datum_present {
                grouped_args.push("--tx-in-inline-datum-present".to_string());
            }
            redeemer_args(
                &mut grouped_args,
                "--tx-in",
                &tin.redeemer_file,
                &tin.redeemer_cbor_file,
                &tin.redeemer_value,
            );
        }

        if let Some(reference_txin) = &tin.reference_txin {
            let reference_txin_id = reference_txin.id();
            let reference_type = tin.reference_type.unwrap_or(ScriptType::PlutusV2);

            if reference_type.is_simple() {
                grouped_args.extend([
                    "--simple-script-tx-in-reference".to_string(),
                    reference_txin_id,
                ]);
            } else {
                grouped_args.extend(["--spending-tx-in-reference".to_string(), reference_txin_id]);
            }

            match tin.reference_type {
                Some(ScriptType::PlutusV2) => {
                    grouped_args.push("--spending-plutus-script-v2".to_string());
                }
                Some(ScriptType::PlutusV3) => {
                    grouped_args.push("--spending-plutus-script-v3".to_string());
                }
                _ => {}
            }

            execution_units_args(
                &mut grouped_args,
                "--spending-reference-tx-in-execution-units",
                tin.execution_units,
                for_build,
            );

            if let Some(file) = &tin.datum_file {
                push_path_arg(&mut grouped_args, "--spending-reference-tx-in-datum-file", file);
            }
            if let Some(file) = &tin.datum_cbor_file {
                push_path_arg(
                    &mut grouped_args,
                    "--spending-reference-tx-in-datum-cbor-file",
                    file,
                );
            }
            if !tin.datum_value.is_empty() {
                grouped_args.extend([
                    "--spending-reference-tx-in-datum-value".to_string(),
                    tin.datum_value.clone(),
                ]);
            }
            if tin.inline_datum_present {
                grouped_args.push("--spending-reference-tx-in-inline-datum-present".to_string());
            }
            redeemer_args(
                &mut grouped_args,
                "--spending-reference-tx-in",
                &tin.redeemer_file,
                &tin.redeemer_cbor_file,
                &tin.redeemer_value,
            );
        }
    }

    // Minting
    for mrec in mint {
        collaterals_all.extend(mrec.collaterals.iter().map(UtxoData::id));

        if let Some(script_file) = &mrec.script_file {
            push_path_arg(&mut grouped_args, "--mint-script-file", script_file);

            execution_units_args(
                &mut grouped_args,
                "--mint-execution-units",
                mrec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--mint",
                &mrec.redeemer_file,
                &mrec.redeemer_cbor_file,
                &mrec.redeemer_value,
            );
        }

        if let Some(reference_txin) = &mrec.reference_txin {
            let reference_txin_id = reference_txin.id();
            let reference_type = mrec.reference_type.unwrap_or(ScriptType::PlutusV2);

            if reference_type.is_simple() {
                grouped_args.extend([
                    "--simple-minting-script-tx-in-reference".to_string(),
                    reference_txin_id,
                ]);
            } else {
                grouped_args.extend(["--mint-tx-in-reference".to_string(), reference_txin_id]);
            }
            match mrec.reference_type {
                Some(ScriptType::PlutusV2) => {
                    grouped_args.push("--mint-plutus-script-v2".to_string());
                }
                Some(ScriptType::PlutusV3) => {
                    grouped_args.push("--mint-plutus-script-v3".to_string());
                }
                _ => {}
            }

            execution_units_args(
                &mut grouped_args,
                "--mint-reference-tx-in-execution-units",
                mrec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--mint-reference-tx-in",
                &mrec.redeemer_file,
                &mrec.redeemer_cbor_file,
                &mrec.redeemer_value,
            );
            if !mrec.policyid.is_empty() {
                grouped_args.extend(["--policy-id".to_string(), mrec.policyid.clone()]);
            }
        }
    }

    // Certificates
    for crec in complex_certs {
        collaterals_all.extend(crec.collaterals.iter().map(UtxoData::id));
        push_path_arg(&mut grouped_args, "--certificate-file", &crec.certificate_file);

        if let Some(script_file) = &crec.script_file {
            push_path_arg(&mut grouped_args, "--certificate-script-file", script_file);

            execution_units_args(
                &mut grouped_args,
                "--certificate-execution-units",
                crec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--certificate",
                &crec.redeemer_file,
                &crec.redeemer_cbor_file,
                &crec.redeemer_value,
            );
        }

        if let Some(reference_txin) = &crec.reference_txin {
            grouped_args.extend([
                "--certificate-tx-in-reference".to_string(),
                reference_txin.id(),
            ]);

            match crec.reference_type.unwrap_or(ScriptType::PlutusV2) {
                ScriptType::PlutusV2 => {
                    grouped_args.push("--certificate-plutus-script-v2".to_string());
                }
                ScriptType::PlutusV3 => {
                    grouped_args.push("--certificate-plutus-script-v3".to_string());
                }
                _ => {}
            }

            execution_units_args(
                &mut grouped_args,
                "--certificate-reference-tx-in-execution-units",
                crec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--certificate-reference-tx-in",
                &crec.redeemer_file,
                &crec.redeemer_cbor_file,
                &crec.redeemer_value,
            );
        }
    }

    // Proposals
    for prec in complex_proposals {
        collaterals_all.extend(prec.collaterals.iter().map(UtxoData::id));
        push_path_arg(&mut grouped_args, "--proposal-file", &prec.proposal_file);

        if let Some(script_file) = &prec.script_file {
            push_path_arg(&mut grouped_args, "--proposal-script-file", script_file);

            execution_units_args(
                &mut grouped_args,
                "--proposal-execution-units",
                prec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--proposal",
                &prec.redeemer_file,
                &prec.redeemer_cbor_file,
                &prec.redeemer_value,
            );
        }
    }

    // Withdrawals
    for wrec in script_withdrawals {
        collaterals_all.extend(wrec.collaterals.iter().map(UtxoData::id));
        grouped_args.extend([
            "--withdrawal".to_string(),
            format!("{}+{}", wrec.txout.address, wrec.txout.amount),
        ]);

        if let Some(script_file) = &wrec.script_file {
            push_path_arg(&mut grouped_args, "--withdrawal-script-file", script_file);

            execution_units_args(
                &mut grouped_args,
                "--withdrawal-execution-units",
                wrec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--withdrawal",
                &wrec.redeemer_file,
                &wrec.redeemer_cbor_file,
                &wrec.redeemer_value,
            );
        }

        if let Some(reference_txin) = &wrec.reference_txin {
            grouped_args.extend([
                "--withdrawal-tx-in-reference".to_string(),
                reference_txin.id(),
            ]);

            match wrec.reference_type.unwrap_or(ScriptType::PlutusV2) {
                ScriptType::PlutusV2 => {
                    grouped_args.push("--withdrawal-plutus-script-v2".to_string());
                }
                ScriptType::PlutusV3 => {
                    grouped_args.push("--withdrawal-plutus-script-v3".to_string());
                }
                _ => {}
            }

            execution_units_args(
                &mut grouped_args,
                "--withdrawal-reference-tx-in-execution-units",
                wrec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--withdrawal-reference-tx-in",
                &wrec.redeemer_file,
                &wrec.redeemer_cbor_file,
                &wrec.redeemer_value,
            );
        }
    }

    // Votes
    for vrec in script_votes {
        collaterals_all.extend(vrec.collaterals.iter().map(UtxoData::id));
        if let Some(vote_file) = &vrec.vote_file {
            push_path_arg(&mut grouped_args, "--vote-file", vote_file);
        }

        if let Some(script_file) = &vrec.script_file {
            push_path_arg(&mut grouped_args, "--vote-script-file", script_file);

            execution_units_args(
                &mut grouped_args,
                "--vote-execution-units",
                vrec.execution_units,
                for_build,
            );

            redeemer_args(
                &mut grouped_args,
                "--vote",
                &vrec.redeemer_file,
                &vrec.redeemer_cbor_file,
                &vrec.redeemer_value,
            );
        }
    }

    // Unique collaterals
    grouped_args.extend(files::prepend_flag("--tx-in-collateral", &collaterals_all));

    grouped_args
}

/// The proposal-file argument name for the given era.
pub(crate) fn proposal_file_argname(era: Era) -> &'static str {
    if era >= Era::Conway {
        "--proposal-file"
    } else {
        "--update-proposal-file"
    }
}

/// Deposit amount for a transaction, derived from its certificates.
pub(crate) async fn get_tx_deposit(cluster: &ClusterLib, tx_files: &TxFiles) -> Result<i64> {
    if tx_files.certificate_files.is_empty() {
        return Ok(0);
    }

    let pparams = cluster.query().get_protocol_params().await?;
    let key_deposit = pparams
        .get("stakeAddressDeposit")
        .and_then(JsonValue::as_i64)
        .unwrap_or(0);
    let pool_deposit = pparams
        .get("stakePoolDeposit")
        .and_then(JsonValue::as_i64)
        .unwrap_or(0);

    let mut deposit = 0;
    for cert in &tx_files.certificate_files {
        let content: JsonValue = serde_json::from_str(&std::fs::read_to_string(cert)?)?;
        let description = content
            .get("description")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        if description.contains("Stake Address Registration") {
            deposit += key_deposit;
        } else if description.contains("Stake Pool Registration") {
            deposit += pool_deposit;
        } else if description.contains("Stake Address Deregistration") {
            deposit -= key_deposit;
        }
    }

    Ok(deposit)
}

/// Return the transaction's balanced inputs and outputs.
#[allow(clippy::too_many_arguments)]
async fn get_tx_ins_outs(
    cluster: &ClusterLib,
    src_address: &str,
    tx_files: &TxFiles,
    txins: &[UtxoData],
    txouts: &[TxOut],
    fee: i64,
    deposit: Option<i64>,
    treasury_donation: Option<i64>,
    withdrawals: &[TxOut],
    mint_txouts: &[TxOut],
    lovelace_balanced: bool,
    skip_asset_balancing: bool,
) -> Result<(Vec<UtxoData>, Vec<TxOut>)> {
    let txouts_passed_db = organize_txouts_by_coin(txouts);
    let txouts_mint_db = organize_txouts_by_coin(mint_txouts);

    let mut outcoins_all: HashSet<String> = HashSet::from([DEFAULT_COIN.to_string()]);
    outcoins_all.extend(txouts_mint_db.keys().cloned());
    outcoins_all.extend(txouts_passed_db.keys().cloned());

    let mut outcoins_passed: HashSet<String> = HashSet::from([DEFAULT_COIN.to_string()]);
    outcoins_passed.extend(txouts_passed_db.keys().cloned());

    let mut txins_all: Vec<UtxoData> = txins.to_vec();
    if txins_all.is_empty() {
        // No txins were provided, select them from the source address.
        let address_utxos = cluster
            .query()
            .get_utxo(crate::query::UtxoSource::Address(src_address), &[])
            .await?;
        if address_utxos.is_empty() {
            return Err(Error::InvalidArguments(format!(
                "no UTxO returned for `{src_address}`"
            )));
        }
        txins_all = get_usable_utxos(&address_utxos, &outcoins_all)?;
    }

    if txins_all.is_empty() {
        return Err(Error::InvalidArguments("no input UTxO".to_string()));
    }

    let txins_db_all = organize_utxos_by_coin(&txins_all);

    // All output coins not minted by this transaction need to be present in
    // the inputs.
    let missing_coin = outcoins_passed
        .iter()
        .any(|coin| !txouts_mint_db.contains_key(coin) && !txins_db_all.contains_key(coin));
    if missing_coin {
        return Err(Error::InvalidArguments(
            "not all output coins are present in input UTxOs".to_string(),
        ));
    }

    let tx_deposit = match deposit {
        Some(deposit) => deposit,
        None => get_tx_deposit(cluster, tx_files).await?,
    };
    let tx_treasury_donation = treasury_donation.unwrap_or(0);

    let (txins_filtered, txins_db_filtered) = if !txins.is_empty() {
        // Don't touch txins that were passed in.
        (txins_all.clone(), txins_db_all.clone())
    } else {
        // Select only the UTxOs needed to satisfy outputs, deposit and fee.
        let selected_utxo_ids = select_utxos(
            &txins_db_all,
            &txouts_passed_db,
            &txouts_mint_db,
            fee,
            withdrawals,
            cluster.min_change_value(),
            tx_deposit,
            tx_treasury_donation,
        );
        let txins_filtered: Vec<UtxoData> = organize_utxos_by_id(&txins_all)
            .into_iter()
            .filter(|(uid, _)| selected_utxo_ids.contains(uid))
            .flat_map(|(_, utxos)| utxos)
            .collect();
        let txins_db_filtered = organize_utxos_by_coin(&txins_filtered);
        (txins_filtered, txins_db_filtered)
    };

    if txins_filtered.is_empty() {
        return Err(Error::InvalidArguments(
            "cannot build transaction, empty `txins`".to_string(),
        ));
    }

    // Change is returned to `src_address`. With `transaction build`, lovelace
    // change goes to the change address automatically and only token change
    // is returned here.
    let txouts_balanced = balance_txouts(
        src_address,
        txouts,
        &txins_db_filtered,
        &txouts_passed_db,
        &txouts_mint_db,
        fee,
        withdrawals,
        tx_deposit,
        tx_treasury_donation,
        lovelace_balanced,
        skip_asset_balancing,
    )?;

    Ok((txins_filtered, txouts_balanced))
}

/// Collect the data (txins, txouts, withdrawals) needed to build a
/// transaction from `src_address`.
pub async fn collect_data_for_build(
    cluster: &ClusterLib,
    src_address: &str,
    params: &TxParams,
    fee: i64,
    lovelace_balanced: bool,
    skip_asset_balancing: bool,
) -> Result<DataForBuild> {
    let (withdrawals, script_withdrawals, withdrawals_txouts) = get_withdrawals(
        cluster,
        &params.withdrawals,
        &params.script_withdrawals,
    )
    .await?;

    let script_txins_records: Vec<UtxoData> = params
        .script_txins
        .iter()
        .flat_map(|r| r.txins.clone())
        .collect();

    if script_txins_records
        .iter()
        .any(|r| r.address == src_address)
    {
        return Err(Error::InvalidArguments(
            "source address cannot be a script address".to_string(),
        ));
    }

    // Combine txins and make sure there are enough funds for all txouts.
    let mut combined_txins: Vec<UtxoData> = params.txins.clone();
    combined_txins.extend(script_txins_records.iter().cloned());

    let mint_txouts: Vec<TxOut> = params.mint.iter().flat_map(|m| m.txouts.clone()).collect();

    let mut combined_tx_files = params.tx_files.clone();
    combined_tx_files.certificate_files.extend(
        params
            .complex_certs
            .iter()
            .map(|c| c.certificate_file.clone()),
    );
    combined_tx_files.proposal_files.extend(
        params
            .complex_proposals
            .iter()
            .map(|p| p.proposal_file.clone()),
    );

    let (txins_copy, txouts_copy) = get_tx_ins_outs(
        cluster,
        src_address,
        &combined_tx_files,
        &combined_txins,
        &params.txouts,
        fee,
        params.deposit,
        params.treasury_donation,
        &withdrawals_txouts,
        &mint_txouts,
        lovelace_balanced,
        skip_asset_balancing,
    )
    .await?;

    let payment_txins = if !script_txins_records.is_empty() {
        // Script txins are not payment txins.
        params.txins.clone()
    } else if !params.txins.is_empty() {
        params.txins.clone()
    } else {
        txins_copy
    };

    Ok(DataForBuild {
        txins: payment_txins,
        txouts: txouts_copy,
        withdrawals,
        script_withdrawals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(hash: &str, ix: u32, amount: i64, coin: &str) -> UtxoData {
        UtxoData {
            coin: coin.to_string(),
            ..UtxoData::new(hash, ix, amount, "addr_src")
        }
    }

    #[test]
    fn joins_txouts_by_address_and_datum() {
        let txouts = vec![
            TxOut::new("addr1", 10),
            TxOut::new("addr1", 20),
            TxOut::new("addr1", 5).with_coin("policy0.coin"),
            TxOut::new("addr2", 7),
            TxOut::new("addr1", 3).with_datum_hash("dh"),
        ];
        let joined = get_joined_txouts(&txouts);
        assert_eq!(joined.len(), 3);
        assert_eq!(joined[0].len(), 2);
        assert_eq!(joined[0][0].amount, 30);
        assert_eq!(joined[0][1].coin, "policy0.coin");
        assert_eq!(joined[1][0].address, "addr2");
        assert_eq!(joined[2][0].datum_hash, "dh");
    }

    #[test]
    fn join_txouts_builds_combined_args() {
        let txouts = vec![
            TxOut::new("addr1", 10),
            TxOut::new("addr1", 5).with_coin("policy0.abc"),
        ];
        let (args, flat, count) = join_txouts(&txouts);
        assert_eq!(count, 1);
        assert_eq!(flat.len(), 2);
        assert_eq!(args, vec!["--tx-out", "addr1+10+5 policy0.abc"]);
    }

    #[test]
    fn listed_txouts_stay_separate() {
        let txouts = vec![TxOut::new("addr1", 10), TxOut::new("addr1", 20)];
        let (args, _, count) = process_txouts(&txouts, false);
        assert_eq!(count, 2);
        assert_eq!(
            args,
            vec!["--tx-out", "addr1+10", "--tx-out", "addr1+20"]
        );
    }

    #[test]
    fn txout_datum_args_pick_single_source() {
        let txout = TxOut::new("addr1", 1)
            .with_datum_hash("dh")
            .with_reference_script_file("script.plutus");
        let args = get_txout_plutus_args(&txout);
        assert_eq!(
            args,
            vec![
                "--tx-out-datum-hash",
                "dh",
                "--tx-out-reference-script-file",
                "script.plutus"
            ]
        );
    }

    #[test]
    fn balances_lovelace_with_change() {
        let txins = vec![utxo("aa", 0, 5_000_000, DEFAULT_COIN)];
        let txouts = vec![TxOut::new("addr_dst", 1_000_000)];
        let txins_db = organize_utxos_by_coin(&txins);
        let txouts_db = organize_txouts_by_coin(&txouts);
        let balanced = balance_txouts(
            "addr_change",
            &txouts,
            &txins_db,
            &txouts_db,
            &HashMap::new(),
            200_000,
            &[],
            0,
            0,
            false,
            false,
        )
        .unwrap();
        assert_eq!(balanced.len(), 2);
        let change = balanced.iter().find(|o| o.address == "addr_change").unwrap();
        assert_eq!(change.amount, 3_800_000);
    }

    #[test]
    fn max_amount_goes_to_single_address() {
        let txins = vec![utxo("aa", 0, 5_000_000, DEFAULT_COIN)];
        let txouts = vec![TxOut::new("addr_max", -1)];
        let txins_db = organize_utxos_by_coin(&txins);
        let txouts_db = organize_txouts_by_coin(&txouts);
        let balanced = balance_txouts(
            "addr_change",
            &txouts,
            &txins_db,
            &txouts_db,
            &HashMap::new(),
            100_000,
            &[],
            0,
            0,
            false,
            false,
        )
        .unwrap();
        // The -1 record is dropped, all remaining funds go to its address.
        assert_eq!(balanced.len(), 1);
        assert_eq!(balanced[0].address, "addr_max");
        assert_eq!(balanced[0].amount, 4_900_000);
    }

    #[test]
    fn multiple_max_amounts_are_rejected() {
        let txouts = vec![TxOut::new("addr1", -1), TxOut::new("addr2", -1)];
        let txouts_db = organize_txouts_by_coin(&txouts);
        let result = balance_txouts(
            "addr_change",
            &txouts,
            &HashMap::new(),
            &txouts_db,
            &HashMap::new(),
            0,
            &[],
            0,
            0,
            false,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn burning_in_txouts_is_rejected() {
        let txouts = vec![TxOut::new("addr1", -10).with_coin("policy0.token")];
        let txouts_db = organize_txouts_by_coin(&txouts);
        assert!(balance_txouts(
            "addr_change",
            &txouts,
            &HashMap::new(),
            &txouts_db,
            &HashMap::new(),
            0,
            &[],
            0,
            0,
            false,
            false,
        )
        .is_err());
    }

    #[test]
    fn token_change_is_returned_separately() {
        let txins = vec![
            utxo("aa", 0, 3_000_000, DEFAULT_COIN),
            utxo("aa", 0, 100, "policy0.token"),
        ];
        let txouts = vec![
            TxOut::new("addr_dst", 1_000_000),
            TxOut::new("addr_dst", 30).with_coin("policy0.token"),
        ];
        let txins_db = organize_utxos_by_coin(&txins);
        let txouts_db = organize_txouts_by_coin(&txouts);
        let balanced = balance_txouts(
            "addr_change",
            &txouts,
            &txins_db,
            &txouts_db,
            &HashMap::new(),
            0,
            &[],
            0,
            0,
            false,
            false,
        )
        .unwrap();
        let token_change = balanced
            .iter()
            .find(|o| o.coin == "policy0.token" && o.address == "addr_change")
            .unwrap();
        assert_eq!(token_change.amount, 70);
    }

    #[test]
    fn selects_utxos_covering_outputs_and_fee() {
        let txins_db = organize_utxos_by_coin(&[
            utxo("aa", 0, 2_000_000, DEFAULT_COIN),
            utxo("bb", 0, 2_000_000, DEFAULT_COIN),
            utxo("cc", 0, 2_000_000, DEFAULT_COIN),
        ]);
        let txouts_db = organize_txouts_by_coin(&[TxOut::new("addr_dst", 1_500_000)]);
        let selected = select_utxos(
            &txins_db,
            &txouts_db,
            &HashMap::new(),
            200_000,
            &[],
            1_800_000,
            0,
            0,
        );
        // 1.5M out + 0.2M fee + 1.8M min change = 3.5M -> two UTxOs.
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn max_amount_selects_all_utxos() {
        let txins_db = organize_utxos_by_coin(&[
            utxo("aa", 0, 1_000, DEFAULT_COIN),
            utxo("bb", 0, 1_000, DEFAULT_COIN),
        ]);
        let txouts_db = organize_txouts_by_coin(&[TxOut::new("addr_dst", -1)]);
        let selected = select_utxos(
            &txins_db,
            &txouts_db,
            &HashMap::new(),
            0,
            &[],
            1_800_000,
            0,
            0,
        );
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn withdrawals_reduce_needed_inputs_but_fee_still_needs_one() {
        let txins_db = organize_utxos_by_coin(&[
            utxo("aa", 0, 500_000, DEFAULT_COIN),
            utxo("bb", 0, 10_000_000, DEFAULT_COIN),
        ]);
        let txouts_db = organize_txouts_by_coin(&[TxOut::new("addr_dst", 1_000_000)]);
        let withdrawals = vec![TxOut::new("stake_addr", 50_000_000)];
        let selected = select_utxos(
            &txins_db,
            &txouts_db,
            &HashMap::new(),
            200_000,
            &withdrawals,
            1_800_000,
            0,
            0,
        );
        // Withdrawals cover the outputs, but the fee still needs an input.
        assert!(!selected.is_empty());
    }

    #[test]
    fn usable_utxos_skip_datum_rows() {
        let mut datum_utxo = utxo("aa", 0, 1_000, DEFAULT_COIN);
        datum_utxo.datum_hash = "dh".to_string();
        let plain = utxo("bb", 0, 2_000, DEFAULT_COIN);
        let coins = HashSet::from([DEFAULT_COIN.to_string()]);

        let usable = get_usable_utxos(&[datum_utxo.clone(), plain.clone()], &coins).unwrap();
        assert_eq!(usable, vec![plain]);

        // Only datum-bearing rows match: an error.
        assert!(get_usable_utxos(&[datum_utxo], &coins).is_err());
    }

    #[test]
    fn usable_utxos_keep_sibling_rows_of_selected_id() {
        // A UTxO holding a token as well: both rows must be consumed.
        let lovelace = utxo("aa", 0, 1_000, DEFAULT_COIN);
        let token = utxo("aa", 0, 5, "policy0.token");
        let coins = HashSet::from([DEFAULT_COIN.to_string()]);
        let usable = get_usable_utxos(&[lovelace, token], &coins).unwrap();
        assert_eq!(usable.len(), 2);
    }

    #[test]
    fn txin_strings_exclude_script_txins() {
        let txins = vec![
            utxo("aa", 0, 1_000, DEFAULT_COIN),
            utxo("bb", 1, 2_000, DEFAULT_COIN),
        ];
        let script_txins = vec![ScriptTxIn {
            txins: vec![utxo("bb", 1, 2_000, DEFAULT_COIN)],
            ..Default::default()
        }];
        let strings = get_txin_strings(&txins, &script_txins);
        assert_eq!(strings, BTreeSet::from(["aa#0".to_string()]));
    }

    #[test]
    fn script_args_for_plutus_txin() {
        let script_txins = vec![ScriptTxIn {
            txins: vec![utxo("aa", 0, 1_000, DEFAULT_COIN)],
            script_file: Some("script.plutus".into()),
            collaterals: vec![utxo("cc", 0, 5_000_000, DEFAULT_COIN)],
            execution_units: Some((1000, 2000)),
            datum_value: "42".to_string(),
            redeemer_value: "17".to_string(),
            ..Default::default()
        }];
        let args = get_script_args(&script_txins, &[], &[], &[], &[], &[], false);
        let joined = args.join(" ");
        assert!(joined.contains("--tx-in aa#0"));
        assert!(joined.contains("--tx-in-script-file script.plutus"));
        assert!(joined.contains("--tx-in-execution-units (1000,2000)"));
        assert!(joined.contains("--tx-in-datum-value 42"));
        assert!(joined.contains("--tx-in-redeemer-value 17"));
        assert!(joined.contains("--tx-in-collateral cc#0"));

        // Execution units are left to `transaction build` to figure out.
        let build_args = get_script_args(&script_txins, &[], &[], &[], &[], &[], true);
        assert!(!build_args.join(" ").contains("execution-units"));
    }

    #[test]
    fn script_args_for_reference_script() {
        let script_txins = vec![ScriptTxIn {
            txins: vec![utxo("aa", 0, 1_000, DEFAULT_COIN)],
            reference_txin: Some(utxo("ref", 3, 1, DEFAULT_COIN)),
            reference_type: Some(ScriptType::PlutusV3),
            inline_datum_present: true,
            redeemer_value: "17".to_string(),
            ..Default::default()
        }];
        let args = get_script_args(&script_txins, &[], &[], &[], &[], &[], false).join(" ");
        assert!(args.contains("--spending-tx-in-reference ref#3"));
        assert!(args.contains("--spending-plutus-script-v3"));
        assert!(args.contains("--spending-reference-tx-in-inline-datum-present"));
        assert!(args.contains("--spending-reference-tx-in-redeemer-value 17"));
    }

    #[test]
    fn collaterals_are_deduplicated() {
        let collateral = utxo("cc", 0, 5_000_000, DEFAULT_COIN);
        let script_txins = vec![ScriptTxIn {
            txins: vec![utxo("aa", 0, 1_000, DEFAULT_COIN)],
            script_file: Some("script.plutus".into()),
            collaterals: vec![collateral.clone()],
            ..Default::default()
        }];
        let mint = vec![Mint {
            script_file: Some("policy.plutus".into()),
            collaterals: vec![collateral],
            ..Default::default()
        }];
        let args = get_script_args(&script_txins, &mint, &[], &[], &[], &[], true);
        let count = args.iter().filter(|a| *a == "--tx-in-collateral").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn return_collateral_requires_single_address() {
        let ok = return_collateral_txout_args(&[
            TxOut::new("addr1", 10),
            TxOut::new("addr1", 5).with_coin("policy0.t"),
        ])
        .unwrap();
        assert_eq!(ok, vec!["--tx-out-return-collateral", "addr1+10+5 policy0.t"]);

        assert!(return_collateral_txout_args(&[
            TxOut::new("addr1", 10),
            TxOut::new("addr2", 5),
        ])
        .is_err());

        assert!(return_collateral_txout_args(&[]).unwrap().is_empty());
    }

    #[test]
    fn proposal_argname_depends_on_era() {
        assert_eq!(proposal_file_argname(Era::Conway), "--proposal-file");
        assert_eq!(proposal_file_argname(Era::Babbage), "--update-proposal-file");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Selected UTxOs always cover outputs + fee + deposit unless the
            // whole input set is insufficient.
            #[test]
            fn selection_covers_needed_funds(
                amounts in proptest::collection::vec(1_000_000i64..10_000_000, 1..8),
                out_amount in 1i64..5_000_000,
                fee in 0i64..500_000,
            ) {
                let utxos: Vec<UtxoData> = amounts
                    .iter()
                    .enumerate()
                    .map(|(ix, amount)| utxo("hash", ix as u32, *amount, DEFAULT_COIN))
                    .collect();
                let txins_db = organize_utxos_by_coin(&utxos);
                let txouts_db = organize_txouts_by_coin(&[TxOut::new("addr_dst", out_amount)]);
                let selected = select_utxos(
                    &txins_db, &txouts_db, &HashMap::new(), fee, &[], 1_800_000, 0, 0,
                );
                let selected_total: i64 = utxos
                    .iter()
                    .filter(|u| selected.contains(&u.id()))
                    .map(|u| u.amount)
                    .sum();
                let available: i64 = amounts.iter().sum();
                let needed = out_amount + fee.max(1);
                prop_assert!(selected_total >= needed.min(available));
            }
        }
    }
}
