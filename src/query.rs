//! Chain and ledger queries (`cardano-cli query`).

use std::{collections::HashMap, path::{Path, PathBuf}};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::{
    cluster::ClusterLib,
    consts::{DEFAULT_COIN, SUBCOMMAND_MARK},
    error::{Error, Result},
    files,
    records::{DrepCredential, LeadershipSchedule, PoolKey, PoolParamsTop, StakeAddrInfo},
    utxo::{self, UtxoData},
};

/// The chain tip: last block successfully applied to the ledger.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    /// Block number.
    pub block: i64,
    /// Epoch number.
    pub epoch: i64,
    /// Ledger era name.
    pub era: String,
    /// Block hash.
    #[serde(default)]
    pub hash: String,
    /// Absolute slot number.
    pub slot: i64,
    /// Slot number within the current epoch.
    #[serde(default)]
    pub slot_in_epoch: Option<i64>,
    /// Slots remaining until the epoch ends.
    #[serde(default)]
    pub slots_to_epoch_end: Option<i64>,
    /// Sync progress percentage, reported as a string.
    #[serde(default)]
    pub sync_progress: Option<String>,
}

impl Tip {
    /// Sync progress parsed to a float, when present and well-formed.
    pub fn sync_progress_pct(&self) -> Option<f64> {
        self.sync_progress.as_ref()?.parse().ok()
    }
}

/// Parsed output of `query kes-period-info`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KesPeriodInfo {
    /// Diagnostic messages printed before the metrics block.
    pub messages: Vec<String>,
    /// The JSON metrics block.
    pub metrics: JsonValue,
    /// Whether the operational certificate counters are valid.
    pub valid_counters: bool,
    /// Whether the operational certificate is within its KES interval.
    pub valid_kes_period: bool,
}

/// What to query UTxOs by.
#[derive(Clone, Debug)]
pub enum UtxoSource<'a> {
    /// All UTxOs at one payment address.
    Address(&'a str),
    /// All UTxOs at several payment addresses.
    Addresses(&'a [String]),
    /// Specific transaction inputs in `hash#ix` form.
    TxIns(&'a [String]),
    /// Specific UTxO records.
    Utxos(&'a [UtxoData]),
    /// The outputs expected to be produced by a built transaction.
    TxRawOutput(&'a crate::records::TxRawOutput),
}

/// Chain and ledger queries.
#[derive(Clone, Copy, Debug)]
pub struct QueryGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl QueryGroup<'_> {
    /// Run a `cardano-cli query` command and return its stdout.
    pub async fn query_cli(&self, cli_args: Vec<String>) -> Result<String> {
        self.query_cli_sub(cli_args, Vec::new()).await
    }

    /// Like [`QueryGroup::query_cli`], with trailing subcommand arguments.
    pub async fn query_cli_sub(
        &self,
        cli_args: Vec<String>,
        cli_sub_args: Vec<String>,
    ) -> Result<String> {
        let mut args = vec!["query".to_string()];
        args.extend(cli_args);
        args.extend(self.cluster.magic_args.clone());
        args.extend(self.cluster.socket_args.clone());
        args.extend(cli_sub_args);
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_str())
    }

    /// Return UTxO records for the given source, optionally limited to coins.
    pub async fn get_utxo(
        &self,
        source: UtxoSource<'_>,
        coins: &[String],
    ) -> Result<Vec<UtxoData>> {
        let mut cli_args = vec!["utxo".to_string(), "--output-json".to_string()];
        let mut address_single = "";
        let mut sort_results = false;

        match source {
            UtxoSource::Address(address) => {
                address_single = address;
                cli_args.extend(files::prepend_flag("--address", [address]));
            }
            UtxoSource::Addresses(addresses) => {
                cli_args.extend(files::prepend_flag("--address", addresses));
            }
            UtxoSource::TxIns(txins) => {
                cli_args.extend(files::prepend_flag("--tx-in", txins));
            }
            UtxoSource::Utxos(utxos) => {
                let formatted: Vec<String> = utxos.iter().map(UtxoData::id).collect();
                cli_args.extend(files::prepend_flag("--tx-in", &formatted));
            }
            UtxoSource::TxRawOutput(tx_raw_output) => {
                sort_results = true;
                let change_txout_num = usize::from(!tx_raw_output.change_address.is_empty());
                let return_collateral_txout_num = usize::from(!tx_raw_output.script_txins.is_empty());
                let num_of_txouts =
                    tx_raw_output.txouts_count + change_txout_num + return_collateral_txout_num;
                let utxo_hash = self
                    .cluster
                    .transaction()
                    .get_txid(&crate::records::TxSource::BodyFile(
                        tx_raw_output.out_file.clone(),
                    ))
                    .await?;
                let formatted: Vec<String> = (0..num_of_txouts)
                    .map(|ix| format!("{utxo_hash}#{ix}"))
                    .collect();
                cli_args.extend(files::prepend_flag("--tx-in", &formatted));
            }
        }

        let stdout = self.query_cli(cli_args).await?;
        let utxo_json: JsonValue = serde_json::from_str(&stdout)?;
        let mut utxos = utxo::parse_query_utxo(&utxo_json, address_single, coins)?;
        if sort_results {
            utxos.sort_by_key(|u| u.utxo_ix);
        }
        Ok(utxos)
    }

    /// Return the current tip.
    pub async fn get_tip(&self) -> Result<Tip> {
        let stdout = self.query_cli(vec!["tip".to_string()]).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Return the current ledger state.
    pub async fn get_ledger_state(&self) -> Result<JsonValue> {
        let stdout = self.query_cli(vec!["ledger-state".to_string()]).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Save the current ledger state to `<state_name>_ledger_state.json`.
    pub async fn save_ledger_state(
        &self,
        state_name: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let json_file = destination_dir.join(format!("{state_name}_ledger_state.json"));
        let ledger_state = self.get_ledger_state().await?;
        tokio::fs::write(&json_file, serde_json::to_string_pretty(&ledger_state)?).await?;
        Ok(json_file)
    }

    /// Return the current protocol state.
    pub async fn get_protocol_state(&self) -> Result<JsonValue> {
        let stdout = self.query_cli(vec!["protocol-state".to_string()]).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Return the current protocol parameters.
    pub async fn get_protocol_params(&self) -> Result<JsonValue> {
        self.cluster.refresh_pparams_file().await?;
        let contents = tokio::fs::read_to_string(self.cluster.pparams_file()).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Ledger state of the registered stake pools.
    pub async fn get_registered_stake_pools_ledger_state(&self) -> Result<JsonValue> {
        let ledger_state = self.get_ledger_state().await?;
        ledger_state
            .pointer("/stateBefore/esLState/delegationState/pstate/pParams pState")
            .cloned()
            .ok_or_else(|| {
                Error::Parse("ledger state is missing registered pool parameters".to_string())
            })
    }

    /// Return the stake snapshots, plus the total active stake.
    pub async fn get_stake_snapshot(
        &self,
        stake_pool_ids: &[String],
        all_stake_pools: bool,
    ) -> Result<JsonValue> {
        let mut query_args = vec!["stake-snapshot".to_string()];
        if all_stake_pools {
            query_args.push("--all-stake-pools".to_string());
        } else {
            query_args.extend(files::prepend_flag("--stake-pool-id", stake_pool_ids));
        }
        let stdout = self.query_cli(query_args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    fn pool_params_from_json(pool_state: JsonValue) -> PoolParamsTop {
        // The information is nested under the hex-encoded stake pool id.
        let pool_state = match &pool_state {
            JsonValue::Object(map) if !map.contains_key("poolParams") => map
                .values()
                .next()
                .cloned()
                .unwrap_or(JsonValue::Object(Default::default())),
            _ => pool_state,
        };
        let retiring = pool_state.get("retiring").and_then(JsonValue::as_i64);
        PoolParamsTop {
            pool_params: pool_state
                .get("poolParams")
                .cloned()
                .unwrap_or(JsonValue::Object(Default::default())),
            future_pool_params: pool_state
                .get("futurePoolParams")
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or(JsonValue::Object(Default::default())),
            retiring,
        }
    }

    /// Return pool parameters via the deprecated `pool-params` query.
    pub async fn get_pool_params(&self, stake_pool_id: &str) -> Result<PoolParamsTop> {
        warn!("`pool-params` deprecated by `pool-state` for node 1.35.4+");
        let stdout = self
            .query_cli(vec![
                "pool-params".to_string(),
                "--stake-pool-id".to_string(),
                stake_pool_id.to_string(),
            ])
            .await?;
        Ok(Self::pool_params_from_json(serde_json::from_str(&stdout)?))
    }

    /// Return a pool's state.
    pub async fn get_pool_state(&self, stake_pool_id: &str) -> Result<PoolParamsTop> {
        let stdout = self
            .query_cli(vec![
                "pool-state".to_string(),
                "--stake-pool-id".to_string(),
                stake_pool_id.to_string(),
            ])
            .await?;
        Ok(Self::pool_params_from_json(serde_json::from_str(&stdout)?))
    }

    /// Delegation and reward state of a stake address.
    ///
    /// Returns an empty record (see [`StakeAddrInfo::is_registered`]) when the
    /// address is not registered.
    pub async fn get_stake_addr_info(&self, stake_addr: &str) -> Result<StakeAddrInfo> {
        let stdout = self
            .query_cli(vec![
                "stake-address-info".to_string(),
                "--address".to_string(),
                stake_addr.to_string(),
            ])
            .await?;
        let output_json: JsonValue = serde_json::from_str(&stdout)?;
        let Some(address_rec) = output_json.as_array().and_then(|recs| recs.first()) else {
            return Ok(StakeAddrInfo {
                registration_deposit: -1,
                ..Default::default()
            });
        };

        let str_of = |key: &str| {
            address_rec
                .get(key)
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let delegation = {
            let delegation = str_of("delegation");
            if delegation.is_empty() {
                str_of("stakeDelegation")
            } else {
                delegation
            }
        };
        let registration_deposit = address_rec
            .get("stakeRegistrationDeposit")
            .or_else(|| address_rec.get("delegationDeposit"))
            .and_then(JsonValue::as_i64)
            .unwrap_or(-1);

        Ok(StakeAddrInfo {
            address: str_of("address"),
            delegation,
            reward_account_balance: address_rec
                .get("rewardAccountBalance")
                .and_then(JsonValue::as_i64)
                .unwrap_or(0),
            registration_deposit,
            vote_delegation: str_of("voteDelegation"),
        })
    }

    async fn pparams_or(&self, pparams: Option<&JsonValue>) -> Result<JsonValue> {
        match pparams {
            Some(pparams) => Ok(pparams.clone()),
            None => self.get_protocol_params().await,
        }
    }

    /// Stake address deposit amount.
    pub async fn get_address_deposit(&self, pparams: Option<&JsonValue>) -> Result<i64> {
        let pparams = self.pparams_or(pparams).await?;
        Ok(pparams
            .get("stakeAddressDeposit")
            .and_then(JsonValue::as_i64)
            .unwrap_or(0))
    }

    /// Stake pool deposit amount.
    pub async fn get_pool_deposit(&self, pparams: Option<&JsonValue>) -> Result<i64> {
        let pparams = self.pparams_or(pparams).await?;
        Ok(pparams
            .get("stakePoolDeposit")
            .and_then(JsonValue::as_i64)
            .unwrap_or(0))
    }

    /// DRep deposit amount.
    pub async fn get_drep_deposit(&self, pparams: Option<&JsonValue>) -> Result<i64> {
        let pparams = self.pparams_or(pparams).await?;
        Ok(pparams
            .get("dRepDeposit")
            .and_then(JsonValue::as_i64)
            .unwrap_or(0))
    }

    /// Governance action deposit amount.
    pub async fn get_gov_action_deposit(&self, pparams: Option<&JsonValue>) -> Result<i64> {
        let pparams = self.pparams_or(pparams).await?;
        Ok(pparams
            .get("govActionDeposit")
            .and_then(JsonValue::as_i64)
            .unwrap_or(0))
    }

    /// Aggregated stake distribution per stake pool.
    pub async fn get_stake_distribution(&self) -> Result<HashMap<String, f64>> {
        let stdout = self
            .query_cli(vec![
                "stake-distribution".to_string(),
                "--output-text".to_string(),
            ])
            .await?;
        // Pool values start on line 3 of the command output.
        let mut stake_distribution = HashMap::new();
        for pool in stdout.lines().skip(2) {
            let mut fields = pool.split_whitespace();
            let (Some(pool_id), Some(stake)) = (fields.next(), fields.next()) else {
                continue;
            };
            let stake: f64 = stake
                .parse()
                .map_err(|_| Error::Parse(format!("malformed stake fraction `{stake}`")))?;
            stake_distribution.insert(pool_id.to_string(), stake);
        }
        Ok(stake_distribution)
    }

    /// The node's current set of stake pool ids.
    pub async fn get_stake_pools(&self) -> Result<Vec<String>> {
        let stdout = self
            .query_cli(vec![
                "stake-pools".to_string(),
                "--output-text".to_string(),
            ])
            .await?;
        Ok(stdout.lines().map(str::to_string).collect())
    }

    /// The slots the queried pool is expected to mint blocks in.
    pub async fn get_leadership_schedule(
        &self,
        vrf_skey_file: &Path,
        pool_key: &PoolKey,
        for_next: bool,
    ) -> Result<Vec<LeadershipSchedule>> {
        let mut args = vec![
            "leadership-schedule".to_string(),
            "--output-text".to_string(),
            "--genesis".to_string(),
            files::path_str(self.cluster.genesis_json()),
            "--vrf-signing-key-file".to_string(),
            files::path_str(vrf_skey_file),
        ];
        args.extend(pool_key.to_args());
        args.push(if for_next { "--next" } else { "--current" }.to_string());

        let stdout = self.query_cli(args).await?;

        // Schedule values start on line 3 of the command output.
        let mut schedule = Vec::new();
        for rec in stdout.lines().skip(2) {
            let mut fields = rec.split_whitespace();
            let (Some(slot_no), Some(date_str), Some(time_str)) =
                (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            let slot_no: i64 = slot_no
                .parse()
                .map_err(|_| Error::Parse(format!("malformed slot number `{slot_no}`")))?;
            // Add the milliseconds component when it is missing.
            let time_str = if time_str.contains('.') {
                time_str.to_string()
            } else {
                format!("{time_str}.0")
            };
            let naive =
                NaiveDateTime::parse_from_str(&format!("{date_str} {time_str}"), "%Y-%m-%d %H:%M:%S%.f")
                    .map_err(|e| {
                        Error::Parse(format!("malformed schedule time `{date_str} {time_str}`: {e}"))
                    })?;
            schedule.push(LeadershipSchedule {
                slot_no,
                utc_time: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
            });
        }
        Ok(schedule)
    }

    /// Slot number of the current tip.
    pub async fn get_slot_no(&self) -> Result<i64> {
        Ok(self.get_tip().await?.slot)
    }

    /// Block number of the current tip.
    pub async fn get_block_no(&self) -> Result<i64> {
        Ok(self.get_tip().await?.block)
    }

    /// Epoch of the current tip.
    pub async fn get_epoch(&self) -> Result<i64> {
        Ok(self.get_tip().await?.epoch)
    }

    /// Slot number within the current epoch.
    pub async fn get_epoch_slot_no(&self) -> Result<i64> {
        self.get_tip()
            .await?
            .slot_in_epoch
            .ok_or_else(|| Error::Parse("tip is missing `slotInEpoch`".to_string()))
    }

    /// Number of slots left until the epoch end.
    pub async fn get_slots_to_epoch_end(&self) -> Result<i64> {
        self.get_tip()
            .await?
            .slots_to_epoch_end
            .ok_or_else(|| Error::Parse("tip is missing `slotsToEpochEnd`".to_string()))
    }

    /// Network era of the current tip.
    pub async fn get_era(&self) -> Result<String> {
        Ok(self.get_tip().await?.era)
    }

    /// Total balance of an address for one coin.
    pub async fn get_address_balance(&self, address: &str, coin: &str) -> Result<i64> {
        let utxos = self
            .get_utxo(UtxoSource::Address(address), &[coin.to_string()])
            .await?;
        Ok(utxo::calculate_utxos_balance(&utxos, coin))
    }

    /// The UTxO with the highest amount of one coin at an address.
    pub async fn get_utxo_with_highest_amount(
        &self,
        address: &str,
        coin: &str,
    ) -> Result<UtxoData> {
        let utxos = self
            .get_utxo(UtxoSource::Address(address), &[coin.to_string()])
            .await?;
        utxo::filter_utxo_with_highest_amount(&utxos, coin)
            .ok_or_else(|| Error::Parse(format!("no UTxO with coin `{coin}` at `{address}`")))
    }

    /// The KES period of the last block.
    pub async fn get_kes_period(&self) -> Result<i64> {
        Ok(self.get_slot_no().await? / self.cluster.slots_per_kes_period())
    }

    /// KES period information for an operational certificate.
    pub async fn get_kes_period_info(&self, opcert_file: &Path) -> Result<KesPeriodInfo> {
        let stdout = self
            .query_cli(vec![
                "kes-period-info".to_string(),
                "--op-cert-file".to_string(),
                files::path_str(opcert_file),
            ])
            .await?;
        parse_kes_period_info(&stdout)
    }

    /// Info about the mempool's capacity and sizes.
    pub async fn get_mempool_info(&self) -> Result<JsonValue> {
        let stdout = self
            .query_cli_sub(
                vec!["tx-mempool".to_string()],
                vec![SUBCOMMAND_MARK.to_string(), "info".to_string()],
            )
            .await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Info about the next transaction in the mempool.
    pub async fn get_mempool_next_tx(&self) -> Result<JsonValue> {
        let stdout = self
            .query_cli_sub(
                vec!["tx-mempool".to_string()],
                vec![SUBCOMMAND_MARK.to_string(), "next-tx".to_string()],
            )
            .await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Whether a transaction exists in the mempool.
    pub async fn get_mempool_tx_exists(&self, txid: &str) -> Result<JsonValue> {
        let stdout = self
            .query_cli_sub(
                vec!["tx-mempool".to_string()],
                vec![
                    SUBCOMMAND_MARK.to_string(),
                    "tx-exists".to_string(),
                    txid.to_string(),
                ],
            )
            .await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Slot number corresponding to a UTC timestamp.
    pub async fn get_slot_number(&self, timestamp: DateTime<Utc>) -> Result<i64> {
        let timestamp_str = timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let stdout = self
            .query_cli(vec!["slot-number".to_string(), timestamp_str])
            .await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// The constitution.
    pub async fn get_constitution(&self) -> Result<JsonValue> {
        let stdout = self.query_cli(vec!["constitution".to_string()]).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// The governance state.
    pub async fn get_gov_state(&self) -> Result<JsonValue> {
        let stdout = self.query_cli(vec!["gov-state".to_string()]).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    fn drep_cred_args(drep: Option<&DrepCredential>) -> Result<Vec<String>> {
        match drep {
            None => Ok(vec!["--all-dreps".to_string()]),
            Some(cred) if cred.is_concrete() => Ok(cred.to_args()),
            Some(_) => Err(Error::InvalidArguments(
                "predefined voting stances cannot be queried".to_string(),
            )),
        }
    }

    /// The DRep state; all DReps when no credential is given.
    pub async fn get_drep_state(&self, drep: Option<&DrepCredential>) -> Result<JsonValue> {
        let mut args = vec!["drep-state".to_string()];
        args.extend(Self::drep_cred_args(drep)?);
        let stdout = self.query_cli(args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// The DRep stake distribution; all DReps when no credential is given.
    pub async fn get_drep_stake_distribution(
        &self,
        drep: Option<&DrepCredential>,
    ) -> Result<HashMap<String, JsonValue>> {
        let mut args = vec!["drep-stake-distribution".to_string()];
        args.extend(Self::drep_cred_args(drep)?);
        let stdout = self.query_cli(args).await?;
        let out: JsonValue = serde_json::from_str(&stdout)?;

        // Old node versions report a list of (drep, stake) pairs.
        let mut recs = HashMap::new();
        match out {
            JsonValue::Array(items) => {
                for item in items {
                    if let Some([drep_id, stake]) = item.as_array().map(Vec::as_slice) {
                        recs.insert(
                            drep_id.as_str().unwrap_or_default().to_string(),
                            stake.clone(),
                        );
                    }
                }
            }
            JsonValue::Object(map) => {
                recs.extend(map);
            }
            other => {
                return Err(Error::Parse(format!(
                    "unexpected drep stake distribution `{other}`"
                )));
            }
        }
        Ok(recs)
    }

    /// The committee state.
    pub async fn get_committee_state(&self) -> Result<JsonValue> {
        let stdout = self.query_cli(vec!["committee-state".to_string()]).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// The treasury value.
    pub async fn get_treasury(&self) -> Result<i64> {
        let stdout = self.query_cli(vec!["treasury".to_string()]).await?;
        stdout
            .trim()
            .parse()
            .map_err(|_| Error::Parse(format!("malformed treasury value `{}`", stdout.trim())))
    }

    /// Total lovelace balance of an address.
    pub async fn get_address_lovelace(&self, address: &str) -> Result<i64> {
        self.get_address_balance(address, DEFAULT_COIN).await
    }
}

/// Parse the output of the `kes-period-info` command.
pub(crate) fn parse_kes_period_info(kes_info: &str) -> Result<KesPeriodInfo> {
    let messages_str = kes_info.split('{').next().unwrap_or_default();
    let mut messages: Vec<String> = Vec::new();

    let mut valid_counters = false;
    let mut valid_kes_period = false;

    if !messages_str.trim().is_empty() {
        let mut message_entry: Vec<&str> = Vec::new();
        for line in messages_str.lines() {
            let line_s = line.trim();
            if line_s.is_empty() {
                continue;
            }
            // Lines led by a symbol start a new message, alphabetic lines
            // continue the current one.
            let starts_alpha = line_s.chars().next().is_some_and(|c| c.is_alphabetic());
            if message_entry.is_empty() || starts_alpha {
                message_entry.push(line_s);
            } else {
                messages.push(message_entry.join(" "));
                message_entry = vec![line_s];
            }
        }
        if !message_entry.is_empty() {
            messages.push(message_entry.join(" "));
        }

        for out_message in &messages {
            if out_message.contains("counter agrees with")
                || out_message.contains("counter ahead of the node protocol state counter by 1")
            {
                valid_counters = true;
            } else if out_message.contains("correct KES period interval") {
                valid_kes_period = true;
            }
        }
    }

    let metrics_str = kes_info.split('{').next_back().unwrap_or_default();
    let metrics = if !metrics_str.is_empty() && metrics_str.trim_end().ends_with('}') {
        serde_json::from_str(&format!("{{{metrics_str}"))?
    } else {
        JsonValue::Object(Default::default())
    };

    Ok(KesPeriodInfo {
        messages,
        metrics,
        valid_counters,
        valid_kes_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KES_INFO: &str = "\
\u{2714} The operational certificate counter agrees with the node protocol state counter
\u{2714} Operational certificate's kes period is within the correct KES period interval
{
    \"qKesCurrentKesPeriod\": 404,
    \"qKesEndKesInterval\": 434,
    \"qKesKesKeyExpiry\": \"2022-03-20T21:44:51Z\",
    \"qKesMaxKESEvolutions\": 62,
    \"qKesNodeStateOperationalCertificateNumber\": 6,
    \"qKesOnDiskOperationalCertificateNumber\": 6,
    \"qKesRemainingSlotsInKesPeriod\": 3760228,
    \"qKesSlotsPerKesPeriod\": 129600,
    \"qKesStartKesInterval\": 384
}";

    #[test]
    fn parses_kes_period_info() {
        let info = parse_kes_period_info(KES_INFO).unwrap();
        assert!(info.valid_counters);
        assert!(info.valid_kes_period);
        assert_eq!(info.messages.len(), 2);
        assert_eq!(info.metrics["qKesCurrentKesPeriod"], 404);
        assert_eq!(info.metrics["qKesOnDiskOperationalCertificateNumber"], 6);
    }

    #[test]
    fn kes_info_with_mismatched_counters() {
        let text = "\
\u{2718} The operational certificate counter is way ahead
{ \"qKesCurrentKesPeriod\": 1 }";
        let info = parse_kes_period_info(text).unwrap();
        assert!(!info.valid_counters);
        assert!(!info.valid_kes_period);
        assert_eq!(info.metrics["qKesCurrentKesPeriod"], 1);
    }

    #[test]
    fn kes_info_without_metrics() {
        let info = parse_kes_period_info("some message\n").unwrap();
        assert_eq!(info.messages, vec!["some message".to_string()]);
        assert_eq!(info.metrics, JsonValue::Object(Default::default()));
    }

    #[test]
    fn tip_sync_progress_parses_to_float() {
        let tip: Tip = serde_json::from_str(
            r#"{"block": 10, "epoch": 1, "era": "Conway", "hash": "aa",
                "slot": 100, "slotInEpoch": 10, "slotsToEpochEnd": 400,
                "syncProgress": "100.00"}"#,
        )
        .unwrap();
        assert_eq!(tip.sync_progress_pct(), Some(100.0));
        assert_eq!(tip.slots_to_epoch_end, Some(400));
    }
}
