//! Transaction building, signing and submission (`cardano-cli transaction`).

use std::path::{Path, PathBuf};

use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use crate::{
    cluster::ClusterLib,
    consts::{Era, MultiSigType, MultiSlotType, DEFAULT_COIN},
    error::{Error, Result},
    files,
    query::UtxoSource,
    records::{
        ComplexCert, ComplexProposal, Mint, PaymentCredential, ScriptDataSource, ScriptTxIn,
        ScriptVote, ScriptWithdrawal, TxFiles, TxOut, TxRawOutput, TxSource, Value,
    },
    txtools,
    utxo::UtxoData,
};

/// Inputs to a transaction build: everything except the source address, the
/// transaction name and the fee.
///
/// All fields are optional; `..Default::default()` fills the rest.
#[derive(Clone, Debug)]
pub struct TxParams {
    /// Input UTxOs; selected from the source address when empty.
    pub txins: Vec<UtxoData>,
    /// Transaction outputs.
    pub txouts: Vec<TxOut>,
    /// Read-only reference inputs.
    pub readonly_reference_txins: Vec<UtxoData>,
    /// Script-locked inputs.
    pub script_txins: Vec<ScriptTxIn>,
    /// Outputs returning excess collateral.
    pub return_collateral_txouts: Vec<TxOut>,
    /// Total collateral amount.
    pub total_collateral_amount: Option<i64>,
    /// Minting data.
    pub mint: Vec<Mint>,
    /// Files needed by the transaction.
    pub tx_files: TxFiles,
    /// Script-coupled certificates.
    pub complex_certs: Vec<ComplexCert>,
    /// Script-coupled proposals.
    pub complex_proposals: Vec<ComplexProposal>,
    /// Reward withdrawals; an amount of `-1` withdraws everything.
    pub withdrawals: Vec<TxOut>,
    /// Script-guarded withdrawals.
    pub script_withdrawals: Vec<ScriptWithdrawal>,
    /// Script-guarded votes.
    pub script_votes: Vec<ScriptVote>,
    /// Extra required signer key files.
    pub required_signers: Vec<PathBuf>,
    /// Extra required signer key hashes.
    pub required_signer_hashes: Vec<String>,
    /// Deposit amount; derived from the certificates when unset.
    pub deposit: Option<i64>,
    /// Donation to the treasury.
    pub treasury_donation: Option<i64>,
    /// Declared current treasury value.
    pub current_treasury_value: Option<i64>,
    /// Validity interval upper bound.
    pub invalid_hereafter: Option<i64>,
    /// Validity interval lower bound.
    pub invalid_before: Option<i64>,
    /// Mark the Plutus scripts as valid (on by default).
    pub script_valid: bool,
    /// Aggregate outputs by payment address (on by default).
    pub join_txouts: bool,
    /// Change address for `build`; the source address when unset.
    pub change_address: Option<String>,
    /// Fee buffer for `build`.
    pub fee_buffer: Option<i64>,
    /// Witness count override for `build`.
    pub witness_override: Option<i64>,
    /// Extra witnesses to assume during fee calculation.
    pub witness_count_add: usize,
    /// Destination addresses used by fee calculation when `txouts` is empty.
    pub dst_addresses: Vec<String>,
    /// Write Plutus script cost information to this file instead of building.
    pub calc_script_cost_file: Option<PathBuf>,
}

impl Default for TxParams {
    fn default() -> Self {
        TxParams {
            txins: Vec::new(),
            txouts: Vec::new(),
            readonly_reference_txins: Vec::new(),
            script_txins: Vec::new(),
            return_collateral_txouts: Vec::new(),
            total_collateral_amount: None,
            mint: Vec::new(),
            tx_files: TxFiles::default(),
            complex_certs: Vec::new(),
            complex_proposals: Vec::new(),
            withdrawals: Vec::new(),
            script_withdrawals: Vec::new(),
            script_votes: Vec::new(),
            required_signers: Vec::new(),
            required_signer_hashes: Vec::new(),
            deposit: None,
            treasury_donation: None,
            current_treasury_value: None,
            invalid_hereafter: None,
            invalid_before: None,
            script_valid: true,
            join_txouts: true,
            change_address: None,
            fee_buffer: None,
            witness_override: None,
            witness_count_add: 0,
            dst_addresses: Vec::new(),
            calc_script_cost_file: None,
        }
    }
}

/// Transaction building, signing and submission.
#[derive(Clone, Copy, Debug)]
pub struct TransactionGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl TransactionGroup<'_> {
    /// Default TTL for a transaction: current slot plus the TTL window.
    pub async fn calculate_tx_ttl(&self) -> Result<i64> {
        Ok(self.cluster.query().get_slot_no().await? + self.cluster.ttl_length())
    }

    /// Return the transaction identifier.
    pub async fn get_txid(&self, tx: &TxSource) -> Result<String> {
        let mut args = vec!["transaction".to_string(), "txid".to_string()];
        args.extend(tx.to_args());
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Render a transaction in human-readable form.
    pub async fn view_tx(&self, tx: &TxSource) -> Result<String> {
        let mut args = vec!["transaction".to_string(), "view".to_string()];
        args.extend(tx.to_args());
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Return the hash of script data (datum or redeemer).
    pub async fn get_hash_script_data(&self, script_data: &ScriptDataSource) -> Result<String> {
        let mut args = vec!["transaction".to_string(), "hash-script-data".to_string()];
        args.extend(script_data.to_args());
        let out = self.cluster.cli(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Deposit amount for a transaction, based on its certificates.
    pub async fn get_tx_deposit(&self, tx_files: &TxFiles) -> Result<i64> {
        txtools::get_tx_deposit(self.cluster, tx_files).await
    }

    /// Build a raw transaction from already balanced inputs and outputs.
    pub async fn build_raw_tx_bare(
        &self,
        out_file: &Path,
        fee: i64,
        params: &TxParams,
    ) -> Result<TxRawOutput> {
        if !params.tx_files.certificate_files.is_empty() && !params.complex_certs.is_empty() {
            warn!(
                "mixing `tx_files.certificate_files` and `complex_certs`, \
                 certs may come in unexpected order"
            );
        }

        let (withdrawals, script_withdrawals, _) = txtools::get_withdrawals(
            self.cluster,
            &params.withdrawals,
            &params.script_withdrawals,
        )
        .await?;

        let (txout_args, processed_txouts, txouts_count) =
            txtools::process_txouts(&params.txouts, params.join_txouts);

        let txin_strings = txtools::get_txin_strings(&params.txins, &params.script_txins);

        let withdrawal_strings: Vec<String> = withdrawals
            .iter()
            .map(|x| format!("{}+{}", x.address, x.amount))
            .collect();

        let mint_txouts: Vec<TxOut> = params.mint.iter().flat_map(|m| m.txouts.clone()).collect();

        let mut misc_args: Vec<String> = Vec::new();

        if let Some(invalid_before) = params.invalid_before {
            misc_args.extend(["--invalid-before".to_string(), invalid_before.to_string()]);
        }
        if let Some(invalid_hereafter) = params.invalid_hereafter {
            misc_args.extend([
                "--invalid-hereafter".to_string(),
                invalid_hereafter.to_string(),
            ]);
        }

        if !params.script_valid {
            misc_args.push("--script-invalid".to_string());
        }

        // Only a single `--mint` argument is allowed, aggregate the outputs.
        let mint_records: Vec<String> = mint_txouts
            .iter()
            .map(|m| format!("{} {}", m.amount, m.coin))
            .collect();
        if !mint_records.is_empty() {
            misc_args.extend(["--mint".to_string(), mint_records.join("+")]);
        }

        for txin in &params.readonly_reference_txins {
            misc_args.extend(["--read-only-tx-in-reference".to_string(), txin.id()]);
        }

        let mut grouped_args = txtools::get_script_args(
            &params.script_txins,
            &params.mint,
            &params.complex_certs,
            &params.complex_proposals,
            &script_withdrawals,
            &params.script_votes,
            false,
        );

        let grouped_args_str = grouped_args.join(" ");
        let pparams_for_txins = !grouped_args.is_empty()
            && (grouped_args_str.contains("-datum-") || grouped_args_str.contains("-redeemer-"));
        let pparams_for_txouts = txout_args.join(" ").contains("datum-embed-");
        if pparams_for_txins || pparams_for_txouts {
            self.cluster.create_pparams_file().await?;
            grouped_args.extend([
                "--protocol-params-file".to_string(),
                files::path_str(self.cluster.pparams_file()),
            ]);
        }

        if let Some(total_collateral_amount) = params.total_collateral_amount {
            misc_args.extend([
                "--tx-total-collateral".to_string(),
                total_collateral_amount.to_string(),
            ]);
        }

        if let Some(current_treasury_value) = params.current_treasury_value {
            misc_args.extend([
                "--current-treasury-value".to_string(),
                current_treasury_value.to_string(),
            ]);
        }
        if let Some(treasury_donation) = params.treasury_donation {
            misc_args.extend([
                "--treasury-donation".to_string(),
                treasury_donation.to_string(),
            ]);
        }

        let proposal_argname = txtools::proposal_file_argname(self.cluster.era_in_use());

        let mut cli_args = vec![
            "transaction".to_string(),
            "build-raw".to_string(),
            "--fee".to_string(),
            fee.to_string(),
            "--out-file".to_string(),
            files::path_str(out_file),
        ];
        cli_args.extend(grouped_args);
        cli_args.extend(files::prepend_flag("--tx-in", &txin_strings));
        cli_args.extend(txout_args);
        cli_args.extend(files::prepend_flag_paths(
            "--required-signer",
            &params.required_signers,
        ));
        cli_args.extend(files::prepend_flag(
            "--required-signer-hash",
            &params.required_signer_hashes,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--certificate-file",
            &params.tx_files.certificate_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            proposal_argname,
            &params.tx_files.proposal_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--auxiliary-script-file",
            &params.tx_files.auxiliary_script_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--metadata-json-file",
            &params.tx_files.metadata_json_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--metadata-cbor-file",
            &params.tx_files.metadata_cbor_files,
        ));
        if params.tx_files.metadata_json_detailed_schema {
            cli_args.push("--json-metadata-detailed-schema".to_string());
        }
        cli_args.extend(files::prepend_flag_paths(
            "--vote-file",
            &params.tx_files.vote_files,
        ));
        cli_args.extend(files::prepend_flag("--withdrawal", &withdrawal_strings));
        cli_args.extend(txtools::return_collateral_txout_args(
            &params.return_collateral_txouts,
        )?);
        cli_args.extend(misc_args);

        self.cluster.cli(cli_args.clone()).await?;

        let combined_reference_txins = txtools::get_reference_txins(
            &params.readonly_reference_txins,
            &params.script_txins,
            &params.mint,
            &params.complex_certs,
            &script_withdrawals,
        );

        Ok(TxRawOutput {
            txins: params.txins.clone(),
            txouts: processed_txouts,
            txouts_count,
            tx_files: params.tx_files.clone(),
            out_file: out_file.to_path_buf(),
            fee,
            build_args: cli_args,
            era: self.cluster.era_in_use().name().to_string(),
            script_txins: params.script_txins.clone(),
            script_withdrawals,
            script_votes: params.script_votes.clone(),
            complex_certs: params.complex_certs.clone(),
            complex_proposals: params.complex_proposals.clone(),
            mint: params.mint.clone(),
            invalid_hereafter: params.invalid_hereafter,
            invalid_before: params.invalid_before,
            current_treasury_value: params.current_treasury_value,
            treasury_donation: params.treasury_donation,
            withdrawals,
            change_address: String::new(),
            return_collateral_txouts: params.return_collateral_txouts.clone(),
            total_collateral_amount: params.total_collateral_amount,
            readonly_reference_txins: params.readonly_reference_txins.clone(),
            script_valid: params.script_valid,
            required_signers: params.required_signers.clone(),
            required_signer_hashes: params.required_signer_hashes.clone(),
            combined_reference_txins,
        })
    }

    /// Balance inputs and outputs and build a raw transaction.
    pub async fn build_raw_tx(
        &self,
        src_address: &str,
        tx_name: &str,
        fee: i64,
        params: &TxParams,
        destination_dir: &Path,
    ) -> Result<TxRawOutput> {
        let out_file = destination_dir.join(format!("{tx_name}_tx.body"));
        self.cluster.check_dest_files(&[&out_file])?;

        let collected_data =
            txtools::collect_data_for_build(self.cluster, src_address, params, fee, false, false)
                .await?;

        let mut invalid_hereafter = params.invalid_hereafter;
        if invalid_hereafter.is_none() && self.cluster.era_in_use() == Era::Shelley {
            invalid_hereafter = Some(self.calculate_tx_ttl().await?);
        }

        let bare_params = TxParams {
            txins: collected_data.txins,
            txouts: collected_data.txouts,
            withdrawals: collected_data.withdrawals,
            script_withdrawals: collected_data.script_withdrawals,
            invalid_hereafter,
            ..params.clone()
        };

        let tx_raw_output = self.build_raw_tx_bare(&out_file, fee, &bare_params).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(tx_raw_output)
    }

    /// Estimate the minimum fee of a transaction.
    pub async fn estimate_fee(
        &self,
        txbody_file: &Path,
        txin_count: usize,
        txout_count: usize,
        witness_count: usize,
        byron_witness_count: usize,
    ) -> Result<i64> {
        self.cluster.create_pparams_file().await?;
        let mut args = vec![
            "transaction".to_string(),
            "calculate-min-fee".to_string(),
        ];
        args.extend(self.cluster.magic_args().to_vec());
        args.extend([
            "--protocol-params-file".to_string(),
            files::path_str(self.cluster.pparams_file()),
            "--tx-in-count".to_string(),
            txin_count.to_string(),
            "--tx-out-count".to_string(),
            txout_count.to_string(),
            "--byron-witness-count".to_string(),
            byron_witness_count.to_string(),
            "--witness-count".to_string(),
            witness_count.to_string(),
            "--tx-body-file".to_string(),
            files::path_str(txbody_file),
        ]);
        let out = self.cluster.cli(args).await?;
        let stdout = out.stdout_str();
        let fee = stdout
            .split_whitespace()
            .next()
            .ok_or_else(|| Error::Parse(format!("unexpected fee output `{stdout}`")))?;
        fee.parse()
            .map_err(|_| Error::Parse(format!("malformed fee `{fee}`")))
    }

    /// Build a dummy transaction and estimate its fee.
    pub async fn calculate_tx_fee(
        &self,
        src_address: &str,
        tx_name: &str,
        params: &TxParams,
        destination_dir: &Path,
    ) -> Result<i64> {
        let tx_name = format!("{tx_name}_estimate");

        if !params.dst_addresses.is_empty() && !params.txouts.is_empty() {
            warn!("the value of `dst_addresses` is ignored when `txouts` is available");
        }

        let txouts_filled = if params.txouts.is_empty() {
            params
                .dst_addresses
                .iter()
                .map(|addr| TxOut::new(addr.clone(), 1))
                .collect()
        } else {
            params.txouts.clone()
        };

        let estimate_params = TxParams {
            txouts: txouts_filled,
            deposit: Some(0),
            ..params.clone()
        };

        let tx_raw_output = self
            .build_raw_tx(src_address, &tx_name, 0, &estimate_params, destination_dir)
            .await?;

        self.estimate_fee(
            &tx_raw_output.out_file,
            // One more input may be needed once the fee is accounted for.
            tx_raw_output.txins.len() + 1,
            tx_raw_output.txouts.len(),
            params.tx_files.signing_key_files.len() + params.witness_count_add,
            0,
        )
        .await
    }

    /// Calculate the minimum required UTxO value of a single transaction
    /// output.
    ///
    /// All `txouts` records must describe the same output (same address,
    /// datum and reference script).
    pub async fn calculate_min_req_utxo(&self, txouts: &[TxOut]) -> Result<Value> {
        if txouts.is_empty() {
            return Err(Error::InvalidArguments("no txout was specified".to_string()));
        }

        let (txout_args, _, txouts_count) = txtools::process_txouts(txouts, true);
        if txouts_count > 1 {
            return Err(Error::InvalidArguments(
                "accepts txouts only for a single transaction output (same address, datum, script)"
                    .to_string(),
            ));
        }

        let era = self.cluster.query().get_era().await?;
        let era_arg = format!("--{}-era", era.to_lowercase());

        self.cluster.create_pparams_file().await?;
        let mut args = vec![
            "transaction".to_string(),
            "calculate-min-required-utxo".to_string(),
            "--protocol-params-file".to_string(),
            files::path_str(self.cluster.pparams_file()),
            era_arg,
        ];
        args.extend(txout_args);
        let out = self.cluster.cli(args).await?;
        let stdout = out.stdout_str();
        let mut fields = stdout.split_whitespace();
        let (Some(coin), Some(value)) = (fields.next(), fields.next()) else {
            return Err(Error::Parse(format!("unexpected min-UTxO output `{stdout}`")));
        };
        Ok(Value {
            value: value
                .parse()
                .map_err(|_| Error::Parse(format!("malformed min-UTxO value `{value}`")))?,
            coin: coin.to_string(),
        })
    }

    /// Build a balanced transaction with `transaction build`.
    pub async fn build_tx(
        &self,
        src_address: &str,
        tx_name: &str,
        params: &TxParams,
        destination_dir: &Path,
    ) -> Result<TxRawOutput> {
        let max_txout = params
            .txouts
            .iter()
            .find(|o| o.amount == -1 && (o.coin.is_empty() || o.coin == DEFAULT_COIN));
        let change_address = match max_txout {
            Some(max_txout) => {
                if params.change_address.is_some() {
                    return Err(Error::InvalidArguments(
                        "cannot use a '-1' amount and a change address at the same time"
                            .to_string(),
                    ));
                }
                max_txout.address.clone()
            }
            None => params
                .change_address
                .clone()
                .unwrap_or_else(|| src_address.to_string()),
        };

        if !params.tx_files.certificate_files.is_empty() && !params.complex_certs.is_empty() {
            warn!(
                "mixing `tx_files.certificate_files` and `complex_certs`, \
                 certs may come in unexpected order"
            );
        }

        let mut out_file = destination_dir.join(format!("{tx_name}_tx.body"));
        self.cluster.check_dest_files(&[&out_file])?;

        let collected_data = txtools::collect_data_for_build(
            self.cluster,
            src_address,
            params,
            params.fee_buffer.unwrap_or(0),
            true,
            false,
        )
        .await?;

        let (txout_args, processed_txouts, txouts_count) =
            txtools::process_txouts(&collected_data.txouts, params.join_txouts);

        let txin_strings = txtools::get_txin_strings(&collected_data.txins, &params.script_txins);

        let withdrawal_strings: Vec<String> = collected_data
            .withdrawals
            .iter()
            .map(|x| format!("{}+{}", x.address, x.amount))
            .collect();

        let mint_txouts: Vec<TxOut> = params.mint.iter().flat_map(|m| m.txouts.clone()).collect();

        let mut misc_args: Vec<String> = Vec::new();

        if let Some(invalid_before) = params.invalid_before {
            misc_args.extend(["--invalid-before".to_string(), invalid_before.to_string()]);
        }
        if let Some(invalid_hereafter) = params.invalid_hereafter {
            misc_args.extend([
                "--invalid-hereafter".to_string(),
                invalid_hereafter.to_string(),
            ]);
        }

        if !params.script_valid {
            misc_args.push("--script-invalid".to_string());
        }

        // Only a single `--mint` argument is allowed, aggregate the outputs.
        let mint_records: Vec<String> = mint_txouts
            .iter()
            .map(|m| format!("{} {}", m.amount, m.coin))
            .collect();
        if !mint_records.is_empty() {
            misc_args.extend(["--mint".to_string(), mint_records.join("+")]);
        }

        for txin in &params.readonly_reference_txins {
            misc_args.extend(["--read-only-tx-in-reference".to_string(), txin.id()]);
        }

        let mut grouped_args = txtools::get_script_args(
            &params.script_txins,
            &params.mint,
            &params.complex_certs,
            &params.complex_proposals,
            &collected_data.script_withdrawals,
            &params.script_votes,
            true,
        );

        let grouped_args_str = grouped_args.join(" ");
        let pparams_for_txins = !grouped_args.is_empty()
            && (grouped_args_str.contains("-datum-") || grouped_args_str.contains("-redeemer-"));
        let pparams_for_txouts = txout_args.join(" ").contains("-embed-");
        if pparams_for_txins || pparams_for_txouts {
            grouped_args.extend([
                "--protocol-params-file".to_string(),
                files::path_str(self.cluster.pparams_file()),
            ]);
        }

        misc_args.extend(["--change-address".to_string(), change_address.clone()]);

        if let Some(witness_override) = params.witness_override {
            misc_args.extend([
                "--witness-override".to_string(),
                witness_override.to_string(),
            ]);
        }

        if let Some(total_collateral_amount) = params.total_collateral_amount {
            misc_args.extend([
                "--tx-total-collateral".to_string(),
                total_collateral_amount.to_string(),
            ]);
        }

        if let Some(calc_script_cost_file) = &params.calc_script_cost_file {
            misc_args.extend([
                "--calculate-plutus-script-cost".to_string(),
                files::path_str(calc_script_cost_file),
            ]);
            out_file = calc_script_cost_file.clone();
        } else {
            misc_args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        }

        let proposal_argname = txtools::proposal_file_argname(self.cluster.era_in_use());

        let mut cli_args = vec!["transaction".to_string(), "build".to_string()];
        cli_args.extend(grouped_args);
        cli_args.extend(files::prepend_flag("--tx-in", &txin_strings));
        cli_args.extend(txout_args);
        cli_args.extend(files::prepend_flag_paths(
            "--required-signer",
            &params.required_signers,
        ));
        cli_args.extend(files::prepend_flag(
            "--required-signer-hash",
            &params.required_signer_hashes,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--certificate-file",
            &params.tx_files.certificate_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            proposal_argname,
            &params.tx_files.proposal_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--auxiliary-script-file",
            &params.tx_files.auxiliary_script_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--metadata-json-file",
            &params.tx_files.metadata_json_files,
        ));
        cli_args.extend(files::prepend_flag_paths(
            "--metadata-cbor-file",
            &params.tx_files.metadata_cbor_files,
        ));
        if params.tx_files.metadata_json_detailed_schema {
            cli_args.push("--json-metadata-detailed-schema".to_string());
        }
        cli_args.extend(files::prepend_flag_paths(
            "--vote-file",
            &params.tx_files.vote_files,
        ));
        cli_args.extend(files::prepend_flag("--withdrawal", &withdrawal_strings));
        cli_args.extend(txtools::return_collateral_txout_args(
            &params.return_collateral_txouts,
        )?);
        cli_args.extend(misc_args);
        cli_args.extend(self.cluster.magic_args().to_vec());

        let out = self.cluster.cli(cli_args.clone()).await?;
        let stdout_dec = out.stdout_str();

        // Keep compatibility with `build` versions that don't print the fee.
        let estimated_fee = if stdout_dec.contains("transaction fee") {
            stdout_dec
                .split_whitespace()
                .next_back()
                .and_then(|fee| fee.parse().ok())
                .unwrap_or(-1)
        } else {
            -1
        };

        let combined_reference_txins = txtools::get_reference_txins(
            &params.readonly_reference_txins,
            &params.script_txins,
            &params.mint,
            &params.complex_certs,
            &collected_data.script_withdrawals,
        );

        Ok(TxRawOutput {
            txins: collected_data.txins,
            txouts: processed_txouts,
            txouts_count,
            tx_files: params.tx_files.clone(),
            out_file,
            fee: estimated_fee,
            build_args: cli_args,
            era: self.cluster.era_in_use().name().to_string(),
            script_txins: params.script_txins.clone(),
            script_withdrawals: collected_data.script_withdrawals,
            script_votes: params.script_votes.clone(),
            complex_certs: params.complex_certs.clone(),
            complex_proposals: params.complex_proposals.clone(),
            mint: params.mint.clone(),
            invalid_hereafter: params.invalid_hereafter,
            invalid_before: params.invalid_before,
            current_treasury_value: params.current_treasury_value,
            treasury_donation: params.treasury_donation,
            withdrawals: collected_data.withdrawals,
            change_address,
            return_collateral_txouts: params.return_collateral_txouts.clone(),
            total_collateral_amount: params.total_collateral_amount,
            readonly_reference_txins: params.readonly_reference_txins.clone(),
            script_valid: params.script_valid,
            required_signers: params.required_signers.clone(),
            required_signer_hashes: params.required_signer_hashes.clone(),
            combined_reference_txins,
        })
    }

    /// Sign a transaction.
    pub async fn sign_tx(
        &self,
        signing_key_files: &[PathBuf],
        tx_name: &str,
        tx: &TxSource,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{tx_name}_tx.signed"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec!["transaction".to_string(), "sign".to_string()];
        args.extend(tx.to_args());
        args.extend(self.cluster.magic_args().to_vec());
        args.extend(files::prepend_flag_paths(
            "--signing-key-file",
            signing_key_files,
        ));
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Create a transaction witness.
    pub async fn witness_tx(
        &self,
        tx_body_file: &Path,
        witness_name: &str,
        signing_key_files: &[PathBuf],
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{witness_name}_tx.witness"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec![
            "transaction".to_string(),
            "witness".to_string(),
            "--tx-body-file".to_string(),
            files::path_str(tx_body_file),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ];
        args.extend(self.cluster.magic_args().to_vec());
        args.extend(files::prepend_flag_paths(
            "--signing-key-file",
            signing_key_files,
        ));
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Assemble a transaction body and witnesses into a signed transaction.
    pub async fn assemble_tx(
        &self,
        tx_body_file: &Path,
        witness_files: &[PathBuf],
        tx_name: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{tx_name}_tx.witnessed"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec![
            "transaction".to_string(),
            "assemble".to_string(),
            "--tx-body-file".to_string(),
            files::path_str(tx_body_file),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ];
        args.extend(files::prepend_flag_paths("--witness-file", witness_files));
        self.cluster.cli(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Submit a transaction without verifying that it made it to the chain.
    pub async fn submit_tx_bare(&self, tx_file: &Path) -> Result<()> {
        let mut args = vec!["transaction".to_string(), "submit".to_string()];
        args.extend(self.cluster.magic_args().to_vec());
        args.extend(["--tx-file".to_string(), files::path_str(tx_file)]);
        self.cluster.cli(args).await?;
        Ok(())
    }

    /// Submit a transaction, resubmitting when it didn't make it to the
    /// chain.
    ///
    /// Success is verified by watching one of the input UTxOs disappear from
    /// the UTxO set.
    pub async fn submit_tx(
        &self,
        tx_file: &Path,
        txins: &[UtxoData],
        wait_blocks: i64,
    ) -> Result<()> {
        let check_txin = txins.first().ok_or_else(|| {
            Error::InvalidArguments("at least one input UTxO is needed".to_string())
        })?;

        let mut txid = String::new();
        let mut resubmit_err: Option<Error> = None;

        for attempt in 0..3 {
            if attempt == 0 {
                self.submit_tx_bare(tx_file).await?;
            } else {
                if txid.is_empty() {
                    txid = self
                        .get_txid(&TxSource::File(tx_file.to_path_buf()))
                        .await?;
                }
                info!(
                    "resubmitting transaction '{txid}' (from '{}')",
                    tx_file.display()
                );
                match self.submit_tx_bare(tx_file).await {
                    Ok(()) => {}
                    Err(err) => {
                        // Resubmission may fail because an input was already
                        // spent by the first submission.
                        let spent_input = matches!(
                            &err,
                            Error::Cli { stderr, .. } if stderr.contains("(BadInputsUTxO")
                        );
                        if !spent_input {
                            return Err(err);
                        }
                        resubmit_err = Some(err);
                    }
                }
            }

            // Wait for new blocks even on error so `query utxo` is current.
            self.cluster.wait_for_new_block(wait_blocks).await?;

            // An input is spent once its hash#ix no longer shows up in the
            // UTxO set.
            let utxo_data = self
                .cluster
                .query()
                .get_utxo(UtxoSource::Utxos(std::slice::from_ref(check_txin)), &[])
                .await?;
            if utxo_data.is_empty() {
                return Ok(());
            }

            if let Some(err) = resubmit_err.take() {
                // Submission claimed the input was spent, yet it still is not.
                return Err(err);
            }
        }

        Err(Error::Cli {
            command: format!("transaction submit --tx-file {}", tx_file.display()),
            stderr: format!("transaction '{txid}' didn't make it to the chain"),
        })
    }

    /// Build, sign and submit a transaction.
    ///
    /// Uses `transaction build-raw`; for complex Plutus transactions prefer
    /// [`TransactionGroup::build_tx`], which handles execution units and
    /// collateral return automatically.
    pub async fn send_tx(
        &self,
        src_address: &str,
        tx_name: &str,
        fee: Option<i64>,
        params: &TxParams,
        verify_tx: bool,
        destination_dir: &Path,
    ) -> Result<TxRawOutput> {
        // Resolve withdrawal amounts once so the resolved values are reused
        // by the fee calculation and the final build.
        let (withdrawals, script_withdrawals, _) = txtools::get_withdrawals(
            self.cluster,
            &params.withdrawals,
            &params.script_withdrawals,
        )
        .await?;
        let params = TxParams {
            withdrawals,
            script_withdrawals,
            ..params.clone()
        };

        let fee = match fee {
            Some(fee) => fee,
            None => {
                let estimated = self
                    .calculate_tx_fee(src_address, tx_name, &params, destination_dir)
                    .await?;
                // Add 10%: the estimate is not precise enough and one more
                // txin may be needed once the fee joins the needed amount.
                (estimated as f64 * 1.1) as i64
            }
        };

        let tx_raw_output = self
            .build_raw_tx(src_address, tx_name, fee, &params, destination_dir)
            .await?;

        let tx_signed_file = self
            .sign_tx(
                &params.tx_files.signing_key_files,
                tx_name,
                &TxSource::BodyFile(tx_raw_output.out_file.clone()),
                destination_dir,
            )
            .await?;

        if verify_tx {
            let check_txins: Vec<UtxoData> = if tx_raw_output.txins.is_empty() {
                tx_raw_output
                    .script_txins
                    .iter()
                    .filter_map(|t| t.txins.first().cloned())
                    .collect()
            } else {
                tx_raw_output.txins.clone()
            };
            self.submit_tx(&tx_signed_file, &check_txins, 2).await?;
        } else {
            self.submit_tx_bare(&tx_signed_file).await?;
        }

        Ok(tx_raw_output)
    }

    /// Send funds: a convenience wrapper around [`TransactionGroup::send_tx`].
    pub async fn send_funds(
        &self,
        src_address: &str,
        destinations: &[TxOut],
        tx_name: &str,
        tx_files: &TxFiles,
        fee: Option<i64>,
        verify_tx: bool,
        destination_dir: &Path,
    ) -> Result<TxRawOutput> {
        let params = TxParams {
            txouts: destinations.to_vec(),
            tx_files: tx_files.clone(),
            ..Default::default()
        };
        self.send_tx(src_address, tx_name, fee, &params, verify_tx, destination_dir)
            .await
    }

    /// Build a multi-signature script file.
    #[allow(clippy::too_many_arguments)]
    pub async fn build_multisig_script(
        &self,
        script_name: &str,
        script_type: MultiSigType,
        payment_vkey_files: &[PathBuf],
        required: usize,
        slot: Option<i64>,
        slot_type: Option<MultiSlotType>,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{script_name}_multisig.script"));

        let mut scripts: Vec<JsonValue> = Vec::with_capacity(payment_vkey_files.len());
        for vkey_file in payment_vkey_files {
            let key_hash = self
                .cluster
                .address()
                .get_payment_vkey_hash(&PaymentCredential::VkeyFile(vkey_file.clone()))
                .await?;
            scripts.push(json!({ "keyHash": key_hash, "type": "sig" }));
        }
        if let (Some(slot), Some(slot_type)) = (slot, slot_type) {
            scripts.push(json!({ "slot": slot, "type": slot_type.as_str() }));
        }

        let mut script = json!({
            "scripts": scripts,
            "type": script_type.as_str(),
        });
        if script_type == MultiSigType::AtLeast {
            script["required"] = json!(required);
        }

        tokio::fs::write(&out_file, serde_json::to_string_pretty(&script)?).await?;
        Ok(out_file)
    }

    /// Calculate the policy id of a monetary policy script.
    pub async fn get_policyid(&self, script_file: &Path) -> Result<String> {
        let out = self
            .cluster
            .cli(vec![
                "transaction".to_string(),
                "policyid".to_string(),
                "--script-file".to_string(),
                files::path_str(script_file),
            ])
            .await?;
        Ok(out.stdout_trimmed())
    }

    /// Calculate the cost of the Plutus scripts of a transaction.
    ///
    /// Accepts the same parameters as [`TransactionGroup::build_tx`].
    pub async fn calculate_plutus_script_cost(
        &self,
        src_address: &str,
        tx_name: &str,
        params: &TxParams,
        destination_dir: &Path,
    ) -> Result<JsonValue> {
        let out_file = destination_dir.join(format!("{tx_name}_plutus.cost"));
        let cost_params = TxParams {
            calc_script_cost_file: Some(out_file.clone()),
            ..params.clone()
        };
        self.build_tx(src_address, tx_name, &cost_params, destination_dir)
            .await?;
        let contents = tokio::fs::read_to_string(&out_file).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}
