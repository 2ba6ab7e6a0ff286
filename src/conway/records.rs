//! Value records and credential selectors for Conway-era governance.

use std::path::PathBuf;

use crate::consts::Vote;

/// An anchor: URL of off-chain data plus the hash of that data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Anchor {
    /// URL of the anchor data.
    pub url: String,
    /// Hash of the anchor data.
    pub data_hash: String,
}

impl Anchor {
    /// Bundle an anchor URL with its data hash.
    pub fn new(url: impl Into<String>, data_hash: impl Into<String>) -> Self {
        Anchor {
            url: url.into(),
            data_hash: data_hash.into(),
        }
    }

    pub(crate) fn to_args(&self) -> Vec<String> {
        vec![
            "--anchor-url".to_string(),
            self.url.clone(),
            "--anchor-data-hash".to_string(),
            self.data_hash.clone(),
        ]
    }
}

/// Reference to the governance action a proposal supersedes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrevActionId {
    /// Transaction id of the previous action.
    pub txid: String,
    /// Index of the previous action within that transaction.
    pub ix: i64,
}

impl PrevActionId {
    /// Reference a previous governance action.
    pub fn new(txid: impl Into<String>, ix: i64) -> Self {
        PrevActionId {
            txid: txid.into(),
            ix,
        }
    }

    pub(crate) fn to_args(&self) -> Vec<String> {
        vec![
            "--prev-governance-action-tx-id".to_string(),
            self.txid.clone(),
            "--prev-governance-action-index".to_string(),
            self.ix.to_string(),
        ]
    }
}

/// Stake credential the action deposit is returned to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepositReturnKey {
    /// Inline stake verification key.
    StakeVkey(String),
    /// Stake verification key file.
    StakeVkeyFile(PathBuf),
    /// Stake verification key hash.
    StakeKeyHash(String),
}

impl DepositReturnKey {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            DepositReturnKey::StakeVkey(key) => vec![
                "--deposit-return-stake-verification-key".to_string(),
                key.clone(),
            ],
            DepositReturnKey::StakeVkeyFile(file) => vec![
                "--deposit-return-stake-verification-key-file".to_string(),
                file.to_string_lossy().into_owned(),
            ],
            DepositReturnKey::StakeKeyHash(hash) => vec![
                "--deposit-return-stake-key-hash".to_string(),
                hash.clone(),
            ],
        }
    }
}

/// Stake credential that receives a treasury withdrawal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FundsReceivingKey {
    /// Inline stake verification key.
    StakeVkey(String),
    /// Stake verification key file.
    StakeVkeyFile(PathBuf),
    /// Stake verification key hash.
    StakeKeyHash(String),
}

impl FundsReceivingKey {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            FundsReceivingKey::StakeVkey(key) => vec![
                "--funds-receiving-stake-verification-key".to_string(),
                key.clone(),
            ],
            FundsReceivingKey::StakeVkeyFile(file) => vec![
                "--funds-receiving-stake-verification-key-file".to_string(),
                file.to_string_lossy().into_owned(),
            ],
            FundsReceivingKey::StakeKeyHash(hash) => vec![
                "--funds-receiving-stake-key-hash".to_string(),
                hash.clone(),
            ],
        }
    }
}

/// Cold credential of a Constitutional Committee member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CcColdCredential {
    /// Inline cold verification key.
    Vkey(String),
    /// Cold verification key file.
    VkeyFile(PathBuf),
    /// Cold verification key hash.
    KeyHash(String),
}

impl CcColdCredential {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            CcColdCredential::Vkey(key) => {
                vec!["--cold-verification-key".to_string(), key.clone()]
            }
            CcColdCredential::VkeyFile(file) => vec![
                "--cold-verification-key-file".to_string(),
                file.to_string_lossy().into_owned(),
            ],
            CcColdCredential::KeyHash(hash) => {
                vec!["--cold-key-hash".to_string(), hash.clone()]
            }
        }
    }
}

/// Hot credential of a Constitutional Committee member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CcHotCredential {
    /// Inline hot verification key.
    Vkey(String),
    /// Hot verification key file.
    VkeyFile(PathBuf),
    /// Hot verification key hash.
    KeyHash(String),
    /// Hot script hash.
    ScriptHash(String),
}

impl CcHotCredential {
    pub(crate) fn to_vote_args(&self) -> Vec<String> {
        match self {
            CcHotCredential::Vkey(key) => {
                vec!["--cc-hot-verification-key".to_string(), key.clone()]
            }
            CcHotCredential::VkeyFile(file) => vec![
                "--cc-hot-verification-key-file".to_string(),
                file.to_string_lossy().into_owned(),
            ],
            CcHotCredential::KeyHash(hash) => {
                vec!["--cc-hot-key-hash".to_string(), hash.clone()]
            }
            CcHotCredential::ScriptHash(hash) => {
                vec!["--cc-hot-script-hash".to_string(), hash.clone()]
            }
        }
    }

    pub(crate) fn to_auth_args(&self) -> Vec<String> {
        match self {
            CcHotCredential::Vkey(key) => {
                vec!["--hot-verification-key".to_string(), key.clone()]
            }
            CcHotCredential::VkeyFile(file) => vec![
                "--hot-verification-key-file".to_string(),
                file.to_string_lossy().into_owned(),
            ],
            CcHotCredential::KeyHash(hash) => {
                vec!["--hot-verification-key-hash".to_string(), hash.clone()]
            }
            CcHotCredential::ScriptHash(hash) => {
                vec!["--hot-script-hash".to_string(), hash.clone()]
            }
        }
    }
}

/// Cold credential of a committee member added to or removed from the
/// committee by an update-committee action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CcMemberCredential {
    /// Inline cold verification key.
    Vkey(String),
    /// Cold verification key file.
    VkeyFile(PathBuf),
    /// Cold verification key hash.
    VkeyHash(String),
    /// Cold script hash.
    ScriptHash(String),
}

/// A Constitutional Committee member in an update-committee action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CcMember {
    /// Last epoch of the member's term (ignored on removal).
    pub epoch: i64,
    /// The member's cold credential.
    pub credential: CcMemberCredential,
}

impl CcMember {
    pub(crate) fn to_args(&self, remove: bool) -> Vec<String> {
        let arg_action = if remove { "remove" } else { "add" };
        let mut args = match &self.credential {
            CcMemberCredential::Vkey(key) => vec![
                format!("--{arg_action}-cc-cold-verification-key"),
                key.clone(),
            ],
            CcMemberCredential::VkeyFile(file) => vec![
                format!("--{arg_action}-cc-cold-verification-key-file"),
                file.to_string_lossy().into_owned(),
            ],
            CcMemberCredential::VkeyHash(hash) => vec![
                format!("--{arg_action}-cc-cold-verification-key-hash"),
                hash.clone(),
            ],
            CcMemberCredential::ScriptHash(hash) => vec![
                format!("--{arg_action}-cc-cold-script-hash"),
                hash.clone(),
            ],
        };
        if !remove {
            args.extend(["--epoch".to_string(), self.epoch.to_string()]);
        }
        args
    }
}

/// A governance action vote cast by a Constitutional Committee member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteCc {
    /// Transaction id of the voted-on action.
    pub action_txid: String,
    /// Index of the voted-on action.
    pub action_ix: i64,
    /// The vote.
    pub vote: Vote,
    /// Path of the generated vote file.
    pub vote_file: PathBuf,
    /// Credential the vote was cast with.
    pub credential: CcHotCredential,
    /// Vote anchor, if any.
    pub anchor: Option<Anchor>,
}

/// A governance action vote cast by a DRep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteDrep {
    /// Transaction id of the voted-on action.
    pub action_txid: String,
    /// Index of the voted-on action.
    pub action_ix: i64,
    /// The vote.
    pub vote: Vote,
    /// Path of the generated vote file.
    pub vote_file: PathBuf,
    /// Credential the vote was cast with.
    pub credential: crate::records::DrepCredential,
    /// Vote anchor, if any.
    pub anchor: Option<Anchor>,
}

/// A governance action vote cast by a stake pool operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteSpo {
    /// Transaction id of the voted-on action.
    pub action_txid: String,
    /// Index of the voted-on action.
    pub action_ix: i64,
    /// The vote.
    pub vote: Vote,
    /// Path of the generated vote file.
    pub vote_file: PathBuf,
    /// Pool key the vote was cast with.
    pub pool_key: crate::records::PoolKey,
    /// Vote anchor, if any.
    pub anchor: Option<Anchor>,
}

/// A created new-constitution action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionConstitution {
    /// Path of the generated action file.
    pub action_file: PathBuf,
    /// Action deposit.
    pub deposit_amt: i64,
    /// Action anchor.
    pub anchor: Anchor,
    /// URL of the constitution text.
    pub constitution_url: String,
    /// Hash of the constitution text.
    pub constitution_hash: String,
    /// Credential the deposit is returned to.
    pub deposit_return: DepositReturnKey,
    /// Previous action, if any.
    pub prev_action: Option<PrevActionId>,
}

/// A created info action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionInfo {
    /// Path of the generated action file.
    pub action_file: PathBuf,
    /// Action deposit.
    pub deposit_amt: i64,
    /// Action anchor.
    pub anchor: Anchor,
    /// Credential the deposit is returned to.
    pub deposit_return: DepositReturnKey,
}

/// A created no-confidence action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionNoConfidence {
    /// Path of the generated action file.
    pub action_file: PathBuf,
    /// Action deposit.
    pub deposit_amt: i64,
    /// Action anchor.
    pub anchor: Anchor,
    /// The previous committee-related action.
    pub prev_action: PrevActionId,
    /// Credential the deposit is returned to.
    pub deposit_return: DepositReturnKey,
}

/// A created update-committee action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionUpdateCommittee {
    /// Path of the generated action file.
    pub action_file: PathBuf,
    /// Action deposit.
    pub deposit_amt: i64,
    /// Action anchor.
    pub anchor: Anchor,
    /// New committee threshold.
    pub threshold: String,
    /// Members added by the action.
    pub add_cc_members: Vec<CcMember>,
    /// Members removed by the action.
    pub rem_cc_members: Vec<CcMember>,
    /// Previous action, if any.
    pub prev_action: Option<PrevActionId>,
    /// Credential the deposit is returned to.
    pub deposit_return: DepositReturnKey,
}

/// A created protocol-parameters-update action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionPParamsUpdate {
    /// Path of the generated action file.
    pub action_file: PathBuf,
    /// Action deposit.
    pub deposit_amt: i64,
    /// Action anchor.
    pub anchor: Anchor,
    /// The raw parameter-change arguments passed to the CLI.
    pub cli_args: Vec<String>,
    /// Previous action, if any.
    pub prev_action: Option<PrevActionId>,
    /// Credential the deposit is returned to.
    pub deposit_return: DepositReturnKey,
}

/// A created treasury-withdrawal action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionTreasuryWithdrawal {
    /// Path of the generated action file.
    pub action_file: PathBuf,
    /// Withdrawn amount.
    pub transfer_amt: i64,
    /// Action deposit.
    pub deposit_amt: i64,
    /// Action anchor.
    pub anchor: Anchor,
    /// Credential that receives the funds.
    pub funds_receiving: FundsReceivingKey,
    /// Credential the deposit is returned to.
    pub deposit_return: DepositReturnKey,
}

/// A created hardfork-initiation action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionHardfork {
    /// Path of the generated action file.
    pub action_file: PathBuf,
    /// Action deposit.
    pub deposit_amt: i64,
    /// Action anchor.
    pub anchor: Anchor,
    /// Target protocol major version.
    pub protocol_major_version: i64,
    /// Target protocol minor version.
    pub protocol_minor_version: i64,
    /// Previous action, if any.
    pub prev_action: Option<PrevActionId>,
    /// Credential the deposit is returned to.
    pub deposit_return: DepositReturnKey,
}
