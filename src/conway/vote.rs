//! Conway governance vote commands (`governance vote`).

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::{
    cluster::ClusterLib,
    consts::Vote,
    error::{Error, Result},
    files,
    records::{DrepCredential, PoolKey},
};

use super::records::{Anchor, CcHotCredential, VoteCc, VoteDrep, VoteSpo};

/// Vote commands.
#[derive(Clone, Copy, Debug)]
pub struct GovVoteGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl GovVoteGroup<'_> {
    fn group_args(&self) -> Vec<String> {
        vec!["governance".to_string(), "vote".to_string()]
    }

    fn gov_action_args(action_txid: &str, action_ix: i64) -> Vec<String> {
        vec![
            "--governance-action-tx-id".to_string(),
            action_txid.to_string(),
            "--governance-action-index".to_string(),
            action_ix.to_string(),
        ]
    }

    fn anchor_args(anchor: Option<&Anchor>) -> Vec<String> {
        anchor.map(Anchor::to_args).unwrap_or_default()
    }

    /// Create a governance action vote for a Constitutional Committee member.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_committee(
        &self,
        vote_name: &str,
        action_txid: &str,
        action_ix: i64,
        vote: Vote,
        credential: &CcHotCredential,
        anchor: Option<&Anchor>,
        destination_dir: &Path,
    ) -> Result<VoteCc> {
        let out_file = destination_dir.join(format!("{vote_name}_cc.vote"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create".to_string());
        args.push(vote.arg().to_string());
        args.extend(Self::gov_action_args(action_txid, action_ix));
        args.extend(credential.to_vote_args());
        args.extend(Self::anchor_args(anchor));
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(VoteCc {
            action_txid: action_txid.to_string(),
            action_ix,
            vote,
            vote_file: out_file,
            credential: credential.clone(),
            anchor: anchor.cloned(),
        })
    }

    /// Create a governance action vote for a DRep.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_drep(
        &self,
        vote_name: &str,
        action_txid: &str,
        action_ix: i64,
        vote: Vote,
        drep: &DrepCredential,
        anchor: Option<&Anchor>,
        destination_dir: &Path,
    ) -> Result<VoteDrep> {
        if !drep.is_concrete() {
            return Err(Error::InvalidArguments(
                "a concrete DRep key or script hash is needed".to_string(),
            ));
        }

        let out_file = destination_dir.join(format!("{vote_name}_drep.vote"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create".to_string());
        args.push(vote.arg().to_string());
        args.extend(Self::gov_action_args(action_txid, action_ix));
        args.extend(drep.to_args());
        args.extend(Self::anchor_args(anchor));
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(VoteDrep {
            action_txid: action_txid.to_string(),
            action_ix,
            vote,
            vote_file: out_file,
            credential: drep.clone(),
            anchor: anchor.cloned(),
        })
    }

    /// Create a governance action vote for a stake pool operator.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_spo(
        &self,
        vote_name: &str,
        action_txid: &str,
        action_ix: i64,
        vote: Vote,
        pool_key: &PoolKey,
        anchor: Option<&Anchor>,
        destination_dir: &Path,
    ) -> Result<VoteSpo> {
        let out_file = destination_dir.join(format!("{vote_name}_spo.vote"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("create".to_string());
        args.push(vote.arg().to_string());
        args.extend(Self::gov_action_args(action_txid, action_ix));
        args.extend(pool_key.to_args());
        args.extend(Self::anchor_args(anchor));
        args.extend(["--out-file".to_string(), files::path_str(&out_file)]);
        self.cluster.cli(args).await?;
        files::check_outfiles(&[&out_file])?;

        Ok(VoteSpo {
            action_txid: action_txid.to_string(),
            action_ix,
            vote,
            vote_file: out_file,
            pool_key: pool_key.clone(),
            anchor: anchor.cloned(),
        })
    }

    /// Render a governance vote file as JSON.
    pub async fn view(&self, vote_file: &Path) -> Result<JsonValue> {
        if !vote_file.exists() {
            return Err(Error::MissingFile(vote_file.to_path_buf()));
        }
        let mut args = self.group_args();
        args.extend([
            "view".to_string(),
            "--vote-file".to_string(),
            files::path_str(vote_file),
        ]);
        let out = self.cluster.cli(args).await?;
        Ok(serde_json::from_str(&out.stdout_trimmed())?)
    }
}
