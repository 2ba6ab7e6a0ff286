//! Conway governance action commands (`governance action`).

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::{
    cluster::ClusterLib,
    consts::MAINNET_MAGIC,
    error::Result,
    files,
};

use super::records::{
    ActionConstitution, ActionHardfork, ActionInfo, ActionNoConfidence, ActionPParamsUpdate,
    ActionTreasuryWithdrawal, ActionUpdateCommittee, Anchor, CcMember, DepositReturnKey,
    FundsReceivingKey, PrevActionId,
};

/// Governance action commands.
#[derive(Clone, Copy, Debug)]
pub struct GovActionGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl<'a> GovActionGroup<'a> {
    pub(crate) fn new(cluster: &'a ClusterLib) -> Self {
        GovActionGroup { cluster }
    }

    fn group_args(&self) -> Vec<String> {
        vec!["governance".to_string(), "action".to_string()]
    }

    // Action commands take a plain network flag instead of the magic number.
    fn magic_args(&self) -> Vec<String> {
        if self.cluster.network_magic() == MAINNET_MAGIC {
            vec!["--mainnet".to_string()]
        } else {
            vec!["--testnet".to_string()]
        }
    }

    fn prev_action_args(prev_action: Option<&PrevActionId>) -> Vec<String> {
        prev_action.map(PrevActionId::to_args).unwrap_or_default()
    }

    /// Create a new-constitution proposal.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_constitution(
        &self,
        action_name: &str,
        deposit_amt: i64,
        anchor: &Anchor,
        constitution_url: &str,
        constitution_hash: &str,
        constitution_script_hash: Option<&str>,
        deposit_return: &DepositReturnKey,
        prev_action: Option<&PrevActionId>,
        destination_dir: &Path,
    ) -> Result<ActionConstitution> {
        let out_file = destination_dir.join(format!("{action_name}_constitution.action"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create-constitution".to_string());
        args.extend(self.magic_args());
        args.extend([
            "--governance-action-deposit".to_string(),
            deposit_amt.to_string(),
        ]);
        args.extend(deposit_return.to_args());
        args.extend(Self::prev_action_args(prev_action));
        args.extend(anchor.to_args());
        args.extend([
            "--constitution-url".to_string(),
            constitution_url.to_string(),
            "--constitution-hash".to_string(),
            constitution_hash.to_string(),
        ]);
        if let Some(script_hash) = constitution_script_hash {
            args.extend([
                "--constitution-script-hash".to_string(),
                script_hash.to_string(),
            ]);
        }
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(ActionConstitution {
            action_file: out_file,
            deposit_amt,
            anchor: anchor.clone(),
            constitution_url: constitution_url.to_string(),
            constitution_hash: constitution_hash.to_string(),
            deposit_return: deposit_return.clone(),
            prev_action: prev_action.cloned(),
        })
    }

    /// Create an info action.
    pub async fn create_info(
        &self,
        action_name: &str,
        deposit_amt: i64,
        anchor: &Anchor,
        deposit_return: &DepositReturnKey,
        destination_dir: &Path,
    ) -> Result<ActionInfo> {
        let out_file = destination_dir.join(format!("{action_name}_info.action"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create-info".to_string());
        args.extend(self.magic_args());
        args.extend([
            "--governance-action-deposit".to_string(),
            deposit_amt.to_string(),
        ]);
        args.extend(deposit_return.to_args());
        args.extend(anchor.to_args());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(ActionInfo {
            action_file: out_file,
            deposit_amt,
            anchor: anchor.clone(),
            deposit_return: deposit_return.clone(),
        })
    }

    /// Create a no-confidence proposal.
    pub async fn create_no_confidence(
        &self,
        action_name: &str,
        deposit_amt: i64,
        anchor: &Anchor,
        prev_action: &PrevActionId,
        deposit_return: &DepositReturnKey,
        destination_dir: &Path,
    ) -> Result<ActionNoConfidence> {
        let out_file = destination_dir.join(format!("{action_name}_confidence.action"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create-no-confidence".to_string());
        args.extend(self.magic_args());
        args.extend([
            "--governance-action-deposit".to_string(),
            deposit_amt.to_string(),
        ]);
        args.extend(deposit_return.to_args());
        args.extend(prev_action.to_args());
        args.extend(anchor.to_args());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(ActionNoConfidence {
            action_file: out_file,
            deposit_amt,
            anchor: anchor.clone(),
            prev_action: prev_action.clone(),
            deposit_return: deposit_return.clone(),
        })
    }

    /// Create an update-committee proposal.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_committee(
        &self,
        action_name: &str,
        deposit_amt: i64,
        anchor: &Anchor,
        threshold: &str,
        add_cc_members: &[CcMember],
        rem_cc_members: &[CcMember],
        prev_action: Option<&PrevActionId>,
        deposit_return: &DepositReturnKey,
        destination_dir: &Path,
    ) -> Result<ActionUpdateCommittee> {
        let out_file = destination_dir.join(format!("{action_name}_update_committee.action"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("update-committee".to_string());
        args.extend(self.magic_args());
        args.extend([
            "--governance-action-deposit".to_string(),
            deposit_amt.to_string(),
        ]);
        args.extend(deposit_return.to_args());
        args.extend(Self::prev_action_args(prev_action));
        args.extend(anchor.to_args());
        for member in rem_cc_members {
            args.extend(member.to_args(true));
        }
        for member in add_cc_members {
            args.extend(member.to_args(false));
        }
        args.extend(["--threshold".to_string(), threshold.to_string()]);
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(ActionUpdateCommittee {
            action_file: out_file,
            deposit_amt,
            anchor: anchor.clone(),
            threshold: threshold.to_string(),
            add_cc_members: add_cc_members.to_vec(),
            rem_cc_members: rem_cc_members.to_vec(),
            prev_action: prev_action.cloned(),
            deposit_return: deposit_return.clone(),
        })
    }

    /// Create a protocol-parameters-update proposal.
    ///
    /// `cli_args` carry the raw parameter changes, e.g.
    /// `--key-reg-deposit-amt 2000000`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pparams_update(
        &self,
        action_name: &str,
        deposit_amt: i64,
        anchor: &Anchor,
        cli_args: &[String],
        prev_action: Option<&PrevActionId>,
        deposit_return: &DepositReturnKey,
        destination_dir: &Path,
    ) -> Result<ActionPParamsUpdate> {
        let out_file = destination_dir.join(format!("{action_name}_pparams_update.action"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create-protocol-parameters-update".to_string());
        args.extend(self.magic_args());
        args.extend([
            "--governance-action-deposit".to_string(),
            deposit_amt.to_string(),
        ]);
        args.extend(deposit_return.to_args());
        args.extend(Self::prev_action_args(prev_action));
        args.extend(anchor.to_args());
        args.extend(cli_args.to_vec());
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(ActionPParamsUpdate {
            action_file: out_file,
            deposit_amt,
            anchor: anchor.clone(),
            cli_args: cli_args.to_vec(),
            prev_action: prev_action.cloned(),
            deposit_return: deposit_return.clone(),
        })
    }

    /// Create a treasury-withdrawal proposal.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_treasury_withdrawal(
        &self,
        action_name: &str,
        transfer_amt: i64,
        deposit_amt: i64,
        anchor: &Anchor,
        funds_receiving: &FundsReceivingKey,
        deposit_return: &DepositReturnKey,
        destination_dir: &Path,
    ) -> Result<ActionTreasuryWithdrawal> {
        let out_file = destination_dir.join(format!("{action_name}_info.action"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create-treasury-withdrawal".to_string());
        args.extend(self.magic_args());
        args.extend([
            "--governance-action-deposit".to_string(),
            deposit_amt.to_string(),
        ]);
        args.extend(deposit_return.to_args());
        args.extend(anchor.to_args());
        args.extend(funds_receiving.to_args());
        args.extend(["--transfer".to_string(), transfer_amt.to_string()]);
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(ActionTreasuryWithdrawal {
            action_file: out_file,
            transfer_amt,
            deposit_amt,
            anchor: anchor.clone(),
            funds_receiving: funds_receiving.clone(),
            deposit_return: deposit_return.clone(),
        })
    }

    /// Create a hardfork-initiation proposal.
    ///
    /// Always invoked with the explicit `conway` era keyword.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_hardfork(
        &self,
        action_name: &str,
        deposit_amt: i64,
        anchor: &Anchor,
        protocol_major_version: i64,
        protocol_minor_version: i64,
        prev_action: Option<&PrevActionId>,
        deposit_return: &DepositReturnKey,
        destination_dir: &Path,
    ) -> Result<ActionHardfork> {
        let out_file = destination_dir.join(format!("{action_name}_hardfork.action"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = vec!["cardano-cli".to_string(), "conway".to_string()];
        args.extend(self.group_args());
        args.push("create-hardfork".to_string());
        args.extend(self.magic_args());
        args.extend([
            "--governance-action-deposit".to_string(),
            deposit_amt.to_string(),
        ]);
        args.extend(deposit_return.to_args());
        args.extend(Self::prev_action_args(prev_action));
        args.extend(anchor.to_args());
        args.extend([
            "--protocol-major-version".to_string(),
            protocol_major_version.to_string(),
            "--protocol-minor-version".to_string(),
            protocol_minor_version.to_string(),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ]);
        self.cluster.cli_raw(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(ActionHardfork {
            action_file: out_file,
            deposit_amt,
            anchor: anchor.clone(),
            protocol_major_version,
            protocol_minor_version,
            prev_action: prev_action.cloned(),
            deposit_return: deposit_return.clone(),
        })
    }

    /// Render a governance action file as JSON.
    pub async fn view(&self, action_file: &Path) -> Result<JsonValue> {
        if !action_file.exists() {
            return Err(crate::error::Error::MissingFile(action_file.to_path_buf()));
        }
        let mut args = self.group_args();
        args.extend([
            "view".to_string(),
            "--action-file".to_string(),
            files::path_str(action_file),
        ]);
        let out = self.cluster.cli(args).await?;
        Ok(serde_json::from_str(&out.stdout_trimmed())?)
    }
}
