//! Legacy governance commands (`cardano-cli legacy governance`): update
//! proposals and MIR certificates.

use std::path::{Path, PathBuf};

use crate::{
    cluster::ClusterLib,
    error::Result,
    files,
    records::{TxFiles, TxRawOutput},
    transaction::TxParams,
};

/// Legacy governance commands.
#[derive(Clone, Copy, Debug)]
pub struct GovernanceGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl GovernanceGroup<'_> {
    fn group_args(&self) -> Vec<String> {
        vec![
            "cardano-cli".to_string(),
            "legacy".to_string(),
            "governance".to_string(),
        ]
    }

    /// Create an update proposal taking effect in the given epoch.
    ///
    /// `cli_args` carry the proposed protocol parameter changes, e.g.
    /// `--decentralization-parameter 0.5`.
    pub async fn gen_update_proposal(
        &self,
        cli_args: &[String],
        epoch: i64,
        tx_name: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{tx_name}_update.proposal"));
        self.cluster.check_dest_files(&[&out_file])?;

        let genesis_vkeys = self
            .cluster
            .genesis_group()
            .genesis_keys()?
            .genesis_vkeys
            .clone();

        let mut args = self.group_args();
        args.push("create-update-proposal".to_string());
        args.extend(cli_args.to_vec());
        args.extend([
            "--out-file".to_string(),
            files::path_str(&out_file),
            "--epoch".to_string(),
            epoch.to_string(),
        ]);
        args.extend(files::prepend_flag_paths(
            "--genesis-verification-key-file",
            &genesis_vkeys,
        ));
        self.cluster.cli_raw(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Create an MIR certificate moving funds from the reserves pot to the
    /// treasury pot.
    pub async fn gen_mir_cert_to_treasury(
        &self,
        transfer: i64,
        tx_name: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{tx_name}_mir_to_treasury.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.extend([
            "create-mir-certificate".to_string(),
            "transfer-to-treasury".to_string(),
            "--transfer".to_string(),
            transfer.to_string(),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ]);
        self.cluster.cli_raw(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Create an MIR certificate moving funds from the treasury pot to the
    /// reserves pot.
    pub async fn gen_mir_cert_to_rewards(
        &self,
        transfer: i64,
        tx_name: &str,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let out_file = destination_dir.join(format!("{tx_name}_mir_to_rewards.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.extend([
            "create-mir-certificate".to_string(),
            "transfer-to-rewards".to_string(),
            "--transfer".to_string(),
            transfer.to_string(),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ]);
        self.cluster.cli_raw(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Create an MIR certificate paying a stake address from the reserves or
    /// the treasury pot.
    pub async fn gen_mir_cert_stake_addr(
        &self,
        stake_addr: &str,
        reward: i64,
        tx_name: &str,
        use_treasury: bool,
        destination_dir: &Path,
    ) -> Result<PathBuf> {
        let funds_src = if use_treasury { "treasury" } else { "reserves" };
        let out_file = destination_dir.join(format!("{tx_name}_{funds_src}_mir_stake.cert"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.extend([
            "create-mir-certificate".to_string(),
            "stake-addresses".to_string(),
            format!("--{funds_src}"),
            "--stake-address".to_string(),
            stake_addr.to_string(),
            "--reward".to_string(),
            reward.to_string(),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ]);
        self.cluster.cli_raw(args).await?;

        files::check_outfiles(&[&out_file])?;
        Ok(out_file)
    }

    /// Create an update proposal and submit it signed by the delegate keys.
    ///
    /// Assumes the proposal is submitted near the beginning of an epoch; the
    /// current epoch is used when none is given.
    pub async fn submit_update_proposal(
        &self,
        cli_args: &[String],
        src_address: &str,
        src_skey_file: &Path,
        tx_name: &str,
        epoch: Option<i64>,
        destination_dir: &Path,
    ) -> Result<TxRawOutput> {
        let epoch = match epoch {
            Some(epoch) => epoch,
            None => self.cluster.query().get_epoch().await?,
        };

        let out_file = self
            .gen_update_proposal(cli_args, epoch, tx_name, destination_dir)
            .await?;

        let mut signing_key_files = self
            .cluster
            .genesis_group()
            .genesis_keys()?
            .delegate_skeys
            .clone();
        signing_key_files.push(src_skey_file.to_path_buf());

        let params = TxParams {
            tx_files: TxFiles {
                proposal_files: vec![out_file],
                signing_key_files,
                ..Default::default()
            },
            ..Default::default()
        };

        self.cluster
            .transaction()
            .send_tx(
                src_address,
                &format!("{tx_name}_submit_proposal"),
                None,
                &params,
                true,
                destination_dir,
            )
            .await
    }
}
