//! Value records passed into and returned from the command groups.
//!
//! All of these are plain data holders: constructed by the caller (or by a
//! group method), never mutated internally, dropped when the caller is done.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    consts::{ScriptType, DEFAULT_COIN},
    utxo::UtxoData,
};

/// Something that carries an amount of one coin.
///
/// Lets balance arithmetic work over both UTxO rows and transaction outputs.
pub trait CoinAmount {
    /// Coin identifier (`lovelace` or `policyid.assetname`).
    fn coin(&self) -> &str;
    /// Amount of the coin.
    fn amount(&self) -> i64;
}

/// A verification/signing key file pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyPair {
    /// Path to the verification key file.
    pub vkey_file: PathBuf,
    /// Path to the signing key file.
    pub skey_file: PathBuf,
}

impl KeyPair {
    /// Bundle two key file paths.
    pub fn new(vkey_file: impl Into<PathBuf>, skey_file: impl Into<PathBuf>) -> Self {
        KeyPair {
            vkey_file: vkey_file.into(),
            skey_file: skey_file.into(),
        }
    }
}

/// An operator's offline key pair plus its certificate issue counter.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColdKeyPair {
    /// Path to the cold verification key file.
    pub vkey_file: PathBuf,
    /// Path to the cold signing key file.
    pub skey_file: PathBuf,
    /// Path to the operational certificate issue counter file.
    pub counter_file: PathBuf,
}

/// A generated address together with the key files that control it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AddressRecord {
    /// The bech32 address.
    pub address: String,
    /// Path to the verification key file.
    pub vkey_file: PathBuf,
    /// Path to the signing key file.
    pub skey_file: PathBuf,
}

/// Registration and delegation state of a stake address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StakeAddrInfo {
    /// The stake address, empty when not registered.
    pub address: String,
    /// Stake pool the address delegates to, if any.
    pub delegation: String,
    /// Balance of the reward account.
    pub reward_account_balance: i64,
    /// Deposit paid at registration, `-1` when the node reports none.
    pub registration_deposit: i64,
    /// DRep the address delegates its vote to, if any.
    pub vote_delegation: String,
}

impl StakeAddrInfo {
    /// Whether the stake address is registered on chain.
    pub fn is_registered(&self) -> bool {
        !self.address.is_empty()
    }
}

/// A transaction output: destination, amount and optional datum attachments.
///
/// An `amount` of `-1` for the default coin means "all available funds".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    /// Destination address.
    pub address: String,
    /// Amount of `coin` to send, `-1` meaning all available funds.
    pub amount: i64,
    /// Coin identifier, `lovelace` by default.
    pub coin: String,
    /// Datum hash attached to the output.
    pub datum_hash: String,
    /// File with the datum whose hash is attached.
    pub datum_hash_file: Option<PathBuf>,
    /// CBOR file with the datum whose hash is attached.
    pub datum_hash_cbor_file: Option<PathBuf>,
    /// Inline JSON value of the datum whose hash is attached.
    pub datum_hash_value: String,
    /// File with a datum to embed in the transaction.
    pub datum_embed_file: Option<PathBuf>,
    /// CBOR file with a datum to embed in the transaction.
    pub datum_embed_cbor_file: Option<PathBuf>,
    /// Inline JSON value of a datum to embed in the transaction.
    pub datum_embed_value: String,
    /// File with an inline datum.
    pub inline_datum_file: Option<PathBuf>,
    /// CBOR file with an inline datum.
    pub inline_datum_cbor_file: Option<PathBuf>,
    /// Inline JSON value of an inline datum.
    pub inline_datum_value: String,
    /// Reference script file attached to the output.
    pub reference_script_file: Option<PathBuf>,
}

impl TxOut {
    /// A plain lovelace output.
    pub fn new(address: impl Into<String>, amount: i64) -> Self {
        TxOut {
            address: address.into(),
            amount,
            ..Default::default()
        }
    }

    /// Same output with a different coin.
    pub fn with_coin(mut self, coin: impl Into<String>) -> Self {
        self.coin = coin.into();
        self
    }

    /// Same output with a datum hash attached.
    pub fn with_datum_hash(mut self, datum_hash: impl Into<String>) -> Self {
        self.datum_hash = datum_hash.into();
        self
    }

    /// Same output with an inline datum file attached.
    pub fn with_inline_datum_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.inline_datum_file = Some(file.into());
        self
    }

    /// Same output with a reference script attached.
    pub fn with_reference_script_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.reference_script_file = Some(file.into());
        self
    }
}

impl Default for TxOut {
    fn default() -> Self {
        TxOut {
            address: String::new(),
            amount: 0,
            coin: DEFAULT_COIN.to_string(),
            datum_hash: String::new(),
            datum_hash_file: None,
            datum_hash_cbor_file: None,
            datum_hash_value: String::new(),
            datum_embed_file: None,
            datum_embed_cbor_file: None,
            datum_embed_value: String::new(),
            inline_datum_file: None,
            inline_datum_cbor_file: None,
            inline_datum_value: String::new(),
            reference_script_file: None,
        }
    }
}

impl CoinAmount for TxOut {
    fn coin(&self) -> &str {
        &self.coin
    }

    fn amount(&self) -> i64 {
        self.amount
    }
}

/// File bundles needed for building a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxFiles {
    /// Certificate files, in submission order.
    pub certificate_files: Vec<PathBuf>,
    /// Update/governance proposal files.
    pub proposal_files: Vec<PathBuf>,
    /// Metadata files in JSON form.
    pub metadata_json_files: Vec<PathBuf>,
    /// Metadata files in CBOR form.
    pub metadata_cbor_files: Vec<PathBuf>,
    /// Signing key files, in signing order.
    pub signing_key_files: Vec<PathBuf>,
    /// Auxiliary script files.
    pub auxiliary_script_files: Vec<PathBuf>,
    /// Governance vote files.
    pub vote_files: Vec<PathBuf>,
    /// Use the detailed schema when interpreting JSON metadata.
    pub metadata_json_detailed_schema: bool,
}

impl TxFiles {
    /// A bundle containing only signing keys.
    pub fn with_signing_keys<I, P>(signing_key_files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        TxFiles {
            signing_key_files: signing_key_files.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Execution budget of a Plutus script: (steps, memory).
pub type ExecutionUnits = (u64, u64);

/// A transaction input locked by a simple or Plutus script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptTxIn {
    /// Source UTxO rows, all belonging to the same UTxO.
    pub txins: Vec<UtxoData>,
    /// The locking script file.
    pub script_file: Option<PathBuf>,
    /// Reference input carrying the script instead of `script_file`.
    pub reference_txin: Option<UtxoData>,
    /// Script language of the reference script, Plutus V2 when unset.
    pub reference_type: Option<ScriptType>,
    /// Collateral UTxOs (Plutus only).
    pub collaterals: Vec<UtxoData>,
    /// Execution budget (Plutus only, raw builds only).
    pub execution_units: Option<ExecutionUnits>,
    /// Datum file.
    pub datum_file: Option<PathBuf>,
    /// Datum CBOR file.
    pub datum_cbor_file: Option<PathBuf>,
    /// Inline JSON datum value.
    pub datum_value: String,
    /// The spent output carries an inline datum.
    pub inline_datum_present: bool,
    /// Redeemer file.
    pub redeemer_file: Option<PathBuf>,
    /// Redeemer CBOR file.
    pub redeemer_cbor_file: Option<PathBuf>,
    /// Inline JSON redeemer value.
    pub redeemer_value: String,
}

/// A reward withdrawal guarded by a script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptWithdrawal {
    /// The withdrawal itself: stake address and amount.
    pub txout: TxOut,
    /// The guarding script file.
    pub script_file: Option<PathBuf>,
    /// Reference input carrying the script instead of `script_file`.
    pub reference_txin: Option<UtxoData>,
    /// Script language of the reference script, Plutus V2 when unset.
    pub reference_type: Option<ScriptType>,
    /// Collateral UTxOs.
    pub collaterals: Vec<UtxoData>,
    /// Execution budget (raw builds only).
    pub execution_units: Option<ExecutionUnits>,
    /// Redeemer file.
    pub redeemer_file: Option<PathBuf>,
    /// Redeemer CBOR file.
    pub redeemer_cbor_file: Option<PathBuf>,
    /// Inline JSON redeemer value.
    pub redeemer_value: String,
}

/// A certificate with optional script data.
///
/// When one certificate of a transaction uses this form, all of them have to
/// (instead of `TxFiles::certificate_files`), otherwise the certificate order
/// cannot be guaranteed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplexCert {
    /// The certificate file.
    pub certificate_file: PathBuf,
    /// The guarding script file.
    pub script_file: Option<PathBuf>,
    /// Reference input carrying the script instead of `script_file`.
    pub reference_txin: Option<UtxoData>,
    /// Script language of the reference script, Plutus V2 when unset.
    pub reference_type: Option<ScriptType>,
    /// Collateral UTxOs.
    pub collaterals: Vec<UtxoData>,
    /// Execution budget (raw builds only).
    pub execution_units: Option<ExecutionUnits>,
    /// Redeemer file.
    pub redeemer_file: Option<PathBuf>,
    /// Redeemer CBOR file.
    pub redeemer_cbor_file: Option<PathBuf>,
    /// Inline JSON redeemer value.
    pub redeemer_value: String,
}

impl ComplexCert {
    /// A certificate with no script data.
    pub fn new(certificate_file: impl Into<PathBuf>) -> Self {
        ComplexCert {
            certificate_file: certificate_file.into(),
            ..Default::default()
        }
    }
}

/// A governance proposal with optional script data.
///
/// The same ordering caveat as for [`ComplexCert`] applies with respect to
/// `TxFiles::proposal_files`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplexProposal {
    /// The proposal file.
    pub proposal_file: PathBuf,
    /// The guarding script file.
    pub script_file: Option<PathBuf>,
    /// Collateral UTxOs.
    pub collaterals: Vec<UtxoData>,
    /// Execution budget (raw builds only).
    pub execution_units: Option<ExecutionUnits>,
    /// Redeemer file.
    pub redeemer_file: Option<PathBuf>,
    /// Redeemer CBOR file.
    pub redeemer_cbor_file: Option<PathBuf>,
    /// Inline JSON redeemer value.
    pub redeemer_value: String,
}

impl ComplexProposal {
    /// A proposal with no script data.
    pub fn new(proposal_file: impl Into<PathBuf>) -> Self {
        ComplexProposal {
            proposal_file: proposal_file.into(),
            ..Default::default()
        }
    }
}

/// A governance vote guarded by a script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptVote {
    /// The vote file.
    pub vote_file: Option<PathBuf>,
    /// The guarding script file.
    pub script_file: Option<PathBuf>,
    /// Collateral UTxOs.
    pub collaterals: Vec<UtxoData>,
    /// Execution budget (raw builds only).
    pub execution_units: Option<ExecutionUnits>,
    /// Redeemer file.
    pub redeemer_file: Option<PathBuf>,
    /// Redeemer CBOR file.
    pub redeemer_cbor_file: Option<PathBuf>,
    /// Inline JSON redeemer value.
    pub redeemer_value: String,
}

/// Minting or burning of tokens under a policy script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mint {
    /// Minted outputs; negative amounts burn.
    pub txouts: Vec<TxOut>,
    /// The policy script file.
    pub script_file: Option<PathBuf>,
    /// Reference input carrying the script instead of `script_file`.
    pub reference_txin: Option<UtxoData>,
    /// Script language of the reference script, Plutus V2 when unset.
    pub reference_type: Option<ScriptType>,
    /// Policy id, needed with reference scripts.
    pub policyid: String,
    /// Collateral UTxOs.
    pub collaterals: Vec<UtxoData>,
    /// Execution budget (raw builds only).
    pub execution_units: Option<ExecutionUnits>,
    /// Redeemer file.
    pub redeemer_file: Option<PathBuf>,
    /// Redeemer CBOR file.
    pub redeemer_cbor_file: Option<PathBuf>,
    /// Inline JSON redeemer value.
    pub redeemer_value: String,
}

/// Everything that went into one `transaction build*` invocation.
#[derive(Clone, Debug, Default)]
pub struct TxRawOutput {
    /// UTxOs used as inputs.
    pub txins: Vec<UtxoData>,
    /// Transaction outputs, after balancing and joining.
    pub txouts: Vec<TxOut>,
    /// Final number of tx outputs after joining.
    pub txouts_count: usize,
    /// Files that went into the build.
    pub tx_files: TxFiles,
    /// Path of the produced transaction body file.
    pub out_file: PathBuf,
    /// Fee of the transaction, `-1` when unknown.
    pub fee: i64,
    /// The full argument vector passed to `cardano-cli transaction build*`.
    pub build_args: Vec<String>,
    /// Era the transaction was built in.
    pub era: String,
    /// Script-locked inputs.
    pub script_txins: Vec<ScriptTxIn>,
    /// Script-guarded withdrawals.
    pub script_withdrawals: Vec<ScriptWithdrawal>,
    /// Script-guarded votes.
    pub script_votes: Vec<ScriptVote>,
    /// Script-coupled certificates.
    pub complex_certs: Vec<ComplexCert>,
    /// Script-coupled proposals.
    pub complex_proposals: Vec<ComplexProposal>,
    /// Minting data.
    pub mint: Vec<Mint>,
    /// Validity interval upper bound.
    pub invalid_hereafter: Option<i64>,
    /// Validity interval lower bound.
    pub invalid_before: Option<i64>,
    /// Declared current treasury value.
    pub current_treasury_value: Option<i64>,
    /// Donation to the treasury.
    pub treasury_donation: Option<i64>,
    /// All withdrawals, including script-guarded ones.
    pub withdrawals: Vec<TxOut>,
    /// Address change was sent to.
    pub change_address: String,
    /// Outputs returning excess collateral.
    pub return_collateral_txouts: Vec<TxOut>,
    /// Total collateral amount.
    pub total_collateral_amount: Option<i64>,
    /// Read-only reference inputs.
    pub readonly_reference_txins: Vec<UtxoData>,
    /// Whether the Plutus scripts were marked valid.
    pub script_valid: bool,
    /// Extra required signing key files.
    pub required_signers: Vec<PathBuf>,
    /// Extra required signing key hashes.
    pub required_signer_hashes: Vec<String>,
    /// All reference inputs, read-only and script-carrying.
    pub combined_reference_txins: Vec<UtxoData>,
}

/// Static registration data of a stake pool.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolData {
    /// Name used for artifact files.
    pub pool_name: String,
    /// Pledge in lovelace.
    pub pool_pledge: i64,
    /// Fixed cost per epoch in lovelace.
    pub pool_cost: i64,
    /// Margin as a fraction.
    pub pool_margin: f64,
    /// Metadata URL, empty when the pool has no metadata.
    pub pool_metadata_url: String,
    /// Hash of the metadata file.
    pub pool_metadata_hash: String,
    /// DNS name of a single-host relay.
    pub pool_relay_dns: String,
    /// IPv4 address of a relay.
    pub pool_relay_ipv4: String,
    /// Relay port, `0` when unset.
    pub pool_relay_port: u16,
}

impl PoolData {
    /// Pool data without metadata or relays.
    pub fn new(pool_name: impl Into<String>, pool_pledge: i64, pool_cost: i64, pool_margin: f64) -> Self {
        PoolData {
            pool_name: pool_name.into(),
            pool_pledge,
            pool_cost,
            pool_margin,
            pool_metadata_url: String::new(),
            pool_metadata_hash: String::new(),
            pool_relay_dns: String::new(),
            pool_relay_ipv4: String::new(),
            pool_relay_port: 0,
        }
    }
}

/// A pool user: payment address plus stake address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolUser {
    /// Payment address record.
    pub payment: AddressRecord,
    /// Stake address record.
    pub stake: AddressRecord,
}

/// Result of creating and registering a stake pool.
#[derive(Clone, Debug)]
pub struct PoolCreationOutput {
    /// The registered pool's id.
    pub stake_pool_id: String,
    /// VRF key pair of the pool.
    pub vrf_key_pair: KeyPair,
    /// Cold key pair and issue counter of the pool.
    pub cold_key_pair: ColdKeyPair,
    /// Path of the registration certificate.
    pub pool_reg_cert_file: PathBuf,
    /// Registration data of the pool.
    pub pool_data: PoolData,
    /// Owners of the pool.
    pub pool_owners: Vec<PoolUser>,
    /// The registration transaction.
    pub tx_raw_output: TxRawOutput,
    /// KES key pair of the pool, when one was generated.
    pub kes_key_pair: Option<KeyPair>,
}

/// Genesis-related key files discovered in the cluster state directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisKeys {
    /// Verification key of the genesis initial UTxO.
    pub genesis_utxo_vkey: PathBuf,
    /// Signing key of the genesis initial UTxO.
    pub genesis_utxo_skey: PathBuf,
    /// Genesis verification keys.
    pub genesis_vkeys: Vec<PathBuf>,
    /// Genesis delegate signing keys.
    pub delegate_skeys: Vec<PathBuf>,
}

/// Pool parameters as reported by `query pool-state`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolParamsTop {
    /// Currently active pool parameters.
    pub pool_params: serde_json::Value,
    /// Parameters that take effect next epoch, if any.
    pub future_pool_params: serde_json::Value,
    /// Epoch the pool retires in, if it is retiring.
    pub retiring: Option<i64>,
}

/// Output of `address info`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AddressInfo {
    /// The address itself.
    pub address: String,
    /// Era of the address format.
    pub era: String,
    /// Encoding of the address.
    pub encoding: String,
    /// Address type.
    #[serde(rename = "type")]
    pub address_type: String,
    /// Raw address bytes, base16.
    pub base16: String,
}

/// An amount of one coin, as reported by fee and min-UTxO calculations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    /// The amount.
    pub value: i64,
    /// The coin the amount is denominated in.
    pub coin: String,
}

/// One slot the queried pool is scheduled to mint a block in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadershipSchedule {
    /// The scheduled slot.
    pub slot_no: i64,
    /// Wall-clock time of the slot.
    pub utc_time: chrono::DateTime<chrono::Utc>,
}

/// Balanced inputs and outputs ready for a `transaction build*` call.
#[derive(Clone, Debug, Default)]
pub struct DataForBuild {
    /// Selected payment inputs.
    pub txins: Vec<UtxoData>,
    /// Balanced outputs.
    pub txouts: Vec<TxOut>,
    /// Resolved plain withdrawals.
    pub withdrawals: Vec<TxOut>,
    /// Resolved script-guarded withdrawals.
    pub script_withdrawals: Vec<ScriptWithdrawal>,
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// A verification key given either inline or as a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VkeySource {
    /// The key itself, bech32 or hex-encoded.
    Key(String),
    /// Path to the key file.
    File(PathBuf),
}

impl VkeySource {
    pub(crate) fn to_args(&self, prefix: &str) -> Vec<String> {
        match self {
            VkeySource::Key(key) => vec![format!("--{prefix}-verification-key"), key.clone()],
            VkeySource::File(file) => {
                vec![format!("--{prefix}-verification-key-file"), path_str(file)]
            }
        }
    }
}

/// Credential identifying the payment part of an address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentCredential {
    /// Inline verification key, bech32.
    Vkey(String),
    /// Verification key file.
    VkeyFile(PathBuf),
    /// Payment script file.
    ScriptFile(PathBuf),
}

impl PaymentCredential {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            PaymentCredential::Vkey(key) => {
                vec!["--payment-verification-key".to_string(), key.clone()]
            }
            PaymentCredential::VkeyFile(file) => {
                vec!["--payment-verification-key-file".to_string(), path_str(file)]
            }
            PaymentCredential::ScriptFile(file) => {
                vec!["--payment-script-file".to_string(), path_str(file)]
            }
        }
    }
}

/// Credential identifying a stake address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StakeCredential {
    /// Inline verification key, bech32.
    Vkey(String),
    /// Verification key file.
    VkeyFile(PathBuf),
    /// Stake script file.
    ScriptFile(PathBuf),
    /// The stake address itself, bech32 or hex-encoded.
    Address(String),
}

impl StakeCredential {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            StakeCredential::Vkey(key) => {
                vec!["--stake-verification-key".to_string(), key.clone()]
            }
            StakeCredential::VkeyFile(file) => {
                vec!["--stake-verification-key-file".to_string(), path_str(file)]
            }
            StakeCredential::ScriptFile(file) => {
                vec!["--stake-script-file".to_string(), path_str(file)]
            }
            StakeCredential::Address(addr) => {
                vec!["--stake-address".to_string(), addr.clone()]
            }
        }
    }
}

/// Credential identifying a DRep, or one of the predefined voting stances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrepCredential {
    /// DRep script hash, hex-encoded.
    ScriptHash(String),
    /// Inline verification key, bech32 or hex-encoded.
    Vkey(String),
    /// Verification key file.
    VkeyFile(PathBuf),
    /// Verification key hash, bech32 or hex-encoded.
    KeyHash(String),
    /// Delegate to the always-abstain DRep.
    AlwaysAbstain,
    /// Delegate to the always-vote-no-confidence DRep.
    AlwaysNoConfidence,
}

impl DrepCredential {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            DrepCredential::ScriptHash(hash) => {
                vec!["--drep-script-hash".to_string(), hash.clone()]
            }
            DrepCredential::Vkey(key) => {
                vec!["--drep-verification-key".to_string(), key.clone()]
            }
            DrepCredential::VkeyFile(file) => {
                vec!["--drep-verification-key-file".to_string(), path_str(file)]
            }
            DrepCredential::KeyHash(hash) => {
                vec!["--drep-key-hash".to_string(), hash.clone()]
            }
            DrepCredential::AlwaysAbstain => vec!["--always-abstain".to_string()],
            DrepCredential::AlwaysNoConfidence => vec!["--always-no-confidence".to_string()],
        }
    }

    /// Whether this is a concrete DRep key or script, not a predefined stance.
    pub fn is_concrete(&self) -> bool {
        !matches!(
            self,
            DrepCredential::AlwaysAbstain | DrepCredential::AlwaysNoConfidence
        )
    }
}

/// Key identifying a stake pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolKey {
    /// Inline cold verification key, bech32 or hex-encoded.
    Vkey(String),
    /// Cold verification key file.
    ColdVkeyFile(PathBuf),
    /// The pool id, bech32 or hex-encoded.
    PoolId(String),
}

impl PoolKey {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            PoolKey::Vkey(key) => {
                vec!["--stake-pool-verification-key".to_string(), key.clone()]
            }
            PoolKey::ColdVkeyFile(file) => {
                vec!["--cold-verification-key-file".to_string(), path_str(file)]
            }
            PoolKey::PoolId(id) => vec!["--stake-pool-id".to_string(), id.clone()],
        }
    }
}

/// A transaction given either as a body file or as a signed transaction file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxSource {
    /// Path to a transaction body file.
    BodyFile(PathBuf),
    /// Path to a (possibly signed) transaction file.
    File(PathBuf),
}

impl TxSource {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            TxSource::BodyFile(file) => vec!["--tx-body-file".to_string(), path_str(file)],
            TxSource::File(file) => vec!["--tx-file".to_string(), path_str(file)],
        }
    }
}

/// Script data (datum or redeemer) given as a file, CBOR file or inline value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptDataSource {
    /// JSON file with the script data.
    File(PathBuf),
    /// CBOR file with the script data.
    CborFile(PathBuf),
    /// The script data in JSON syntax.
    Value(String),
}

impl ScriptDataSource {
    pub(crate) fn to_args(&self) -> Vec<String> {
        match self {
            ScriptDataSource::File(file) => {
                vec!["--script-data-file".to_string(), path_str(file)]
            }
            ScriptDataSource::CborFile(file) => {
                vec!["--script-data-cbor-file".to_string(), path_str(file)]
            }
            ScriptDataSource::Value(value) => {
                vec!["--script-data-value".to_string(), value.clone()]
            }
        }
    }
}
