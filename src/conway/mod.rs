//! Conway-era governance commands (`cardano-cli conway governance`).

use std::path::Path;

use crate::{cluster::ClusterLib, error::Result, files};

mod action;
mod committee;
mod drep;
mod records;
mod vote;

pub use action::GovActionGroup;
pub use committee::GovCommitteeGroup;
pub use drep::GovDrepGroup;
pub use records::{
    ActionConstitution, ActionHardfork, ActionInfo, ActionNoConfidence, ActionPParamsUpdate,
    ActionTreasuryWithdrawal, ActionUpdateCommittee, Anchor, CcColdCredential, CcHotCredential,
    CcMember, CcMemberCredential, DepositReturnKey, FundsReceivingKey, PrevActionId, VoteCc,
    VoteDrep, VoteSpo,
};
pub use vote::GovVoteGroup;

/// Content to compute an anchor-data hash over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnchorContent {
    /// Hash a text as UTF-8.
    Text(String),
    /// Hash a binary file.
    FileBinary(std::path::PathBuf),
    /// Hash a text file.
    FileText(std::path::PathBuf),
}

/// Conway-era governance command groups.
#[derive(Clone, Copy, Debug)]
pub struct ConwayGovGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl<'a> ConwayGovGroup<'a> {
    pub(crate) fn new(cluster: &'a ClusterLib) -> Self {
        ConwayGovGroup { cluster }
    }

    /// Governance action commands.
    pub fn action(&self) -> GovActionGroup<'a> {
        GovActionGroup::new(self.cluster)
    }

    /// Constitutional Committee commands.
    pub fn committee(&self) -> GovCommitteeGroup<'a> {
        GovCommitteeGroup {
            cluster: self.cluster,
        }
    }

    /// DRep commands.
    pub fn drep(&self) -> GovDrepGroup<'a> {
        GovDrepGroup {
            cluster: self.cluster,
        }
    }

    /// Vote commands.
    pub fn vote(&self) -> GovVoteGroup<'a> {
        GovVoteGroup {
            cluster: self.cluster,
        }
    }

    /// Compute the hash of anchor data.
    pub async fn get_anchor_data_hash(&self, content: &AnchorContent) -> Result<String> {
        let content_args = match content {
            AnchorContent::Text(text) => vec!["--text".to_string(), text.clone()],
            AnchorContent::FileBinary(file) => {
                vec!["--file-binary".to_string(), files::path_str(file)]
            }
            AnchorContent::FileText(file) => {
                vec!["--file-text".to_string(), files::path_str(file)]
            }
        };

        let mut args = vec![
            "cardano-cli".to_string(),
            "hash".to_string(),
            "anchor-data".to_string(),
        ];
        args.extend(content_args);
        let out = self.cluster.cli_raw(args).await?;
        Ok(out.stdout_trimmed())
    }

    /// Compute the hash of a script.
    pub async fn get_script_hash(&self, script_file: &Path) -> Result<String> {
        let out = self
            .cluster
            .cli_raw(vec![
                "cardano-cli".to_string(),
                "hash".to_string(),
                "script".to_string(),
                "--script-file".to_string(),
                files::path_str(script_file),
            ])
            .await?;
        Ok(out.stdout_trimmed())
    }
}
