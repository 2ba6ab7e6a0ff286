//! The `ClusterLib` facade: cluster state, CLI invocation and chain waiting.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use once_cell::sync::OnceCell;
use serde_json::Value as JsonValue;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::{
    address::AddressGroup,
    consts::{CommandEra, Era, MAINNET_MAGIC, SUBCOMMAND_MARK},
    conway::ConwayGovGroup,
    coverage::CliCoverage,
    error::{Error, Result},
    files,
    genesis::{self, GenesisGroup, ShelleyGenesis},
    governance::GovernanceGroup,
    key::KeyGroup,
    node::NodeGroup,
    query::{QueryGroup, Tip},
    records::GenesisKeys,
    runner::{format_cli_args, CardanoCliRunner, CliOut, CliRunner},
    slots::{self, EpochInfo},
    stake_address::StakeAddressGroup,
    stake_pool::StakePoolGroup,
    transaction::TransactionGroup,
};

const TTL_LENGTH: i64 = 1000;
// TODO: derive from `utxoCostPerByte` instead of hardcoding.
const MIN_CHANGE_VALUE: i64 = 1_800_000;

/// Builder for [`ClusterLib`].
pub struct ClusterLibBuilder {
    state_dir: PathBuf,
    command_era: CommandEra,
    slots_offset: Option<i64>,
    socket_path: Option<PathBuf>,
    cli_log: Option<PathBuf>,
    overwrite_outfiles: bool,
    runner: Box<dyn CliRunner>,
}

impl ClusterLibBuilder {
    fn new(state_dir: impl Into<PathBuf>) -> Self {
        ClusterLibBuilder {
            state_dir: state_dir.into(),
            command_era: CommandEra::default(),
            slots_offset: None,
            socket_path: None,
            cli_log: None,
            overwrite_outfiles: true,
            runner: Box::new(CardanoCliRunner),
        }
    }

    /// Era keyword used for CLI commands.
    pub fn command_era(mut self, command_era: CommandEra) -> Self {
        self.command_era = command_era;
        self
    }

    /// Fixed slot offset between the cluster's start era and the Shelley era.
    ///
    /// Computed from the tip on first use when not given.
    pub fn slots_offset(mut self, slots_offset: i64) -> Self {
        self.slots_offset = Some(slots_offset);
        self
    }

    /// Node socket path, overriding the `CARDANO_NODE_SOCKET_PATH`
    /// environment variable.
    pub fn socket_path(mut self, socket_path: impl Into<PathBuf>) -> Self {
        self.socket_path = Some(socket_path.into());
        self
    }

    /// Append every executed command to this log file.
    pub fn cli_log(mut self, cli_log: impl Into<PathBuf>) -> Self {
        self.cli_log = Some(cli_log.into());
        self
    }

    /// Whether generated artifact files may overwrite existing ones.
    pub fn overwrite_outfiles(mut self, overwrite: bool) -> Self {
        self.overwrite_outfiles = overwrite;
        self
    }

    /// Substitute the subprocess runner, e.g. with a fake for tests.
    pub fn runner(mut self, runner: Box<dyn CliRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Validate the configuration and construct the facade.
    pub fn build(self) -> Result<ClusterLib> {
        let state_dir = self.state_dir.canonicalize().map_err(|_| {
            Error::Config(format!(
                "the state dir `{}` doesn't exist",
                self.state_dir.display()
            ))
        })?;

        let era_in_use = self.command_era.era();
        let rand_str = files::get_rand_str(4);

        let genesis_json = genesis::find_genesis_json(&state_dir)?;
        let genesis: ShelleyGenesis =
            serde_json::from_str(&std::fs::read_to_string(&genesis_json)?)?;

        let magic_args = if genesis.network_magic == MAINNET_MAGIC {
            vec!["--mainnet".to_string()]
        } else {
            vec![
                "--testnet-magic".to_string(),
                genesis.network_magic.to_string(),
            ]
        };

        let (conway_genesis_json, conway_genesis) = if era_in_use >= Era::Conway {
            let path = genesis::find_conway_genesis_json(&state_dir)?;
            let parsed: JsonValue = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            (Some(path), Some(parsed))
        } else {
            (None, None)
        };

        let pparams_file = state_dir.join(format!("pparams-{rand_str}.json"));

        let slots_offset_cell = OnceCell::new();
        if let Some(offset) = self.slots_offset {
            let _ = slots_offset_cell.set(offset);
        }

        let mut cluster = ClusterLib {
            runner: self.runner,
            command_era: self.command_era,
            era_in_use,
            state_dir,
            socket_path: None,
            socket_args: Vec::new(),
            magic_args,
            genesis_json,
            genesis,
            conway_genesis_json,
            conway_genesis,
            pparams_file,
            rand_str,
            cli_log: self.cli_log,
            overwrite_outfiles: self.overwrite_outfiles,
            slots_offset: slots_offset_cell,
            cli_version: OnceCell::new(),
            genesis_keys: OnceCell::new(),
            genesis_utxo_addr: OnceCell::new(),
            drep_has_output_hex: OnceCell::new(),
            coverage: Mutex::new(CliCoverage::new()),
        };
        if let Some(socket_path) = self.socket_path {
            cluster.set_socket_path(Some(socket_path))?;
        }
        Ok(cluster)
    }
}

/// Facade for working with a Cardano cluster through `cardano-cli`.
///
/// Holds the cluster state (genesis parameters, socket and network magic
/// arguments) and delegates the individual CLI subcommand families to the
/// group accessors ([`ClusterLib::address`], [`ClusterLib::transaction`],
/// [`ClusterLib::query`], ...).
pub struct ClusterLib {
    pub(crate) runner: Box<dyn CliRunner>,
    pub(crate) command_era: CommandEra,
    pub(crate) era_in_use: Era,
    pub(crate) state_dir: PathBuf,
    pub(crate) socket_path: Option<PathBuf>,
    pub(crate) socket_args: Vec<String>,
    pub(crate) magic_args: Vec<String>,
    pub(crate) genesis_json: PathBuf,
    pub(crate) genesis: ShelleyGenesis,
    pub(crate) conway_genesis_json: Option<PathBuf>,
    pub(crate) conway_genesis: Option<JsonValue>,
    pub(crate) pparams_file: PathBuf,
    pub(crate) rand_str: String,
    pub(crate) cli_log: Option<PathBuf>,
    pub(crate) overwrite_outfiles: bool,
    pub(crate) slots_offset: OnceCell<i64>,
    pub(crate) cli_version: OnceCell<semver::Version>,
    pub(crate) genesis_keys: OnceCell<GenesisKeys>,
    pub(crate) genesis_utxo_addr: OnceCell<String>,
    pub(crate) drep_has_output_hex: OnceCell<bool>,
    pub(crate) coverage: Mutex<CliCoverage>,
}

impl ClusterLib {
    /// Construct a facade for the cluster in `state_dir` with defaults.
    pub fn new(state_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(state_dir).build()
    }

    /// Start building a facade for the cluster in `state_dir`.
    pub fn builder(state_dir: impl Into<PathBuf>) -> ClusterLibBuilder {
        ClusterLibBuilder::new(state_dir)
    }

    /// Directory with cluster state files (keys, configs, logs).
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Era keyword used for CLI commands.
    pub fn command_era(&self) -> CommandEra {
        self.command_era
    }

    /// The ledger era the command era resolves to.
    pub fn era_in_use(&self) -> Era {
        self.era_in_use
    }

    /// Parsed Shelley genesis.
    pub fn genesis(&self) -> &ShelleyGenesis {
        &self.genesis
    }

    /// Path of the Shelley genesis JSON file.
    pub fn genesis_json(&self) -> &Path {
        &self.genesis_json
    }

    /// Parsed Conway genesis, present for command eras >= Conway.
    pub fn conway_genesis(&self) -> Option<&JsonValue> {
        self.conway_genesis.as_ref()
    }

    /// Network magic of the cluster.
    pub fn network_magic(&self) -> u64 {
        self.genesis.network_magic
    }

    /// `--mainnet` or `--testnet-magic <magic>`.
    pub fn magic_args(&self) -> &[String] {
        &self.magic_args
    }

    /// `--socket-path <path>` when a socket path was configured.
    pub fn socket_args(&self) -> &[String] {
        &self.socket_args
    }

    /// Slot duration in seconds.
    pub fn slot_length(&self) -> f64 {
        self.genesis.slot_length
    }

    /// Number of slots per epoch.
    pub fn epoch_length(&self) -> i64 {
        self.genesis.epoch_length
    }

    /// Epoch duration in seconds.
    pub fn epoch_length_sec(&self) -> f64 {
        self.genesis.epoch_length as f64 * self.genesis.slot_length
    }

    /// Number of slots per KES period.
    pub fn slots_per_kes_period(&self) -> i64 {
        self.genesis.slots_per_kes_period
    }

    /// Maximum number of KES key evolutions.
    pub fn max_kes_evolutions(&self) -> i64 {
        self.genesis.max_kes_evolutions
    }

    /// Default transaction validity window, in slots.
    pub fn ttl_length(&self) -> i64 {
        TTL_LENGTH
    }

    /// Minimum change value collected when selecting UTxOs.
    pub fn min_change_value(&self) -> i64 {
        MIN_CHANGE_VALUE
    }

    /// Path of the cached protocol parameters file.
    pub fn pparams_file(&self) -> &Path {
        &self.pparams_file
    }

    /// Set or clear the node socket path used for queries.
    pub fn set_socket_path(&mut self, socket_path: Option<PathBuf>) -> Result<()> {
        let Some(socket_path) = socket_path else {
            self.socket_path = None;
            self.socket_args = Vec::new();
            return Ok(());
        };
        let socket_path = socket_path.canonicalize().map_err(|_| {
            Error::Config(format!(
                "the socket `{}` doesn't exist",
                socket_path.display()
            ))
        })?;
        self.socket_args = vec![
            "--socket-path".to_string(),
            files::path_str(&socket_path),
        ];
        self.socket_path = Some(socket_path);
        Ok(())
    }

    /// Payment address commands.
    pub fn address(&self) -> AddressGroup<'_> {
        AddressGroup { cluster: self }
    }

    /// Generic key commands.
    pub fn key(&self) -> KeyGroup<'_> {
        KeyGroup { cluster: self }
    }

    /// Node operational key and certificate commands.
    pub fn node(&self) -> NodeGroup<'_> {
        NodeGroup { cluster: self }
    }

    /// Genesis block commands.
    pub fn genesis_group(&self) -> GenesisGroup<'_> {
        GenesisGroup { cluster: self }
    }

    /// Chain and ledger queries.
    pub fn query(&self) -> QueryGroup<'_> {
        QueryGroup { cluster: self }
    }

    /// Stake address commands.
    pub fn stake_address(&self) -> StakeAddressGroup<'_> {
        StakeAddressGroup { cluster: self }
    }

    /// Stake pool commands.
    pub fn stake_pool(&self) -> StakePoolGroup<'_> {
        StakePoolGroup { cluster: self }
    }

    /// Transaction building, signing and submission.
    pub fn transaction(&self) -> TransactionGroup<'_> {
        TransactionGroup { cluster: self }
    }

    /// Legacy governance commands (update proposals, MIR certificates).
    pub fn governance(&self) -> GovernanceGroup<'_> {
        GovernanceGroup { cluster: self }
    }

    /// Conway-era governance commands.
    ///
    /// Available only when the command era is Conway or newer.
    pub fn conway_governance(&self) -> Result<ConwayGovGroup<'_>> {
        if self.conway_genesis.is_none() {
            return Err(Error::Config(
                "conway governance can be used only with command era >= conway".to_string(),
            ));
        }
        Ok(ConwayGovGroup::new(self))
    }

    /// Refuse to clobber existing out-files unless overwriting is enabled.
    pub(crate) fn check_dest_files(&self, out_files: &[&Path]) -> Result<()> {
        if self.overwrite_outfiles {
            return Ok(());
        }
        for out_file in out_files {
            if out_file.exists() {
                return Err(Error::OutFileExists(out_file.to_path_buf()));
            }
        }
        Ok(())
    }

    async fn write_cli_log(&self, command: &str) -> Result<()> {
        let Some(cli_log) = &self.cli_log else {
            return Ok(());
        };
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(cli_log)
            .await?;
        let line = format!("{}: {command}\n", chrono::Utc::now());
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn run_cli(
        &self,
        cli_args: Vec<String>,
        add_default_args: bool,
        timeout: Option<Duration>,
    ) -> Result<CliOut> {
        let mut all_args: Vec<String> = Vec::with_capacity(cli_args.len() + 2);
        if add_default_args {
            all_args.push("cardano-cli".to_string());
            all_args.push(self.command_era.as_str().to_string());
        }
        all_args.extend(cli_args);

        let run_args: Vec<String> = all_args
            .iter()
            .filter(|arg| *arg != SUBCOMMAND_MARK)
            .cloned()
            .collect();

        let cmd_str = format_cli_args(&run_args);
        self.write_cli_log(&cmd_str).await?;
        debug!("running `{cmd_str}`");

        if let Ok(mut coverage) = self.coverage.lock() {
            coverage.record(&all_args);
        }

        // Transient node socket failures get a bounded retry.
        let mut last_err = None;
        for _ in 0..3 {
            let out = self.runner.run(&run_args, timeout).await?;
            if out.success {
                return Ok(CliOut {
                    stdout: out.stdout,
                    stderr: out.stderr,
                });
            }

            let stderr_dec = String::from_utf8_lossy(&out.stderr).into_owned();
            let transient = stderr_dec.contains("resource exhausted")
                || stderr_dec.contains("resource vanished");
            let err = Error::Cli {
                command: cmd_str.clone(),
                stderr: stderr_dec,
            };
            if !transient {
                return Err(err);
            }
            error!("transient failure running `{cmd_str}`, retrying");
            last_err = Some(err);
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        Err(last_err.unwrap_or(Error::Cli {
            command: cmd_str,
            stderr: "retries exhausted".to_string(),
        }))
    }

    /// Run a `cardano-cli` command, era keyword included.
    pub async fn cli(&self, cli_args: Vec<String>) -> Result<CliOut> {
        self.run_cli(cli_args, true, None).await
    }

    /// Run a command verbatim, without the `cardano-cli <era>` prefix.
    pub async fn cli_raw(&self, cli_args: Vec<String>) -> Result<CliOut> {
        self.run_cli(cli_args, false, None).await
    }

    /// Run a `cardano-cli` command with a timeout.
    pub async fn cli_with_timeout(
        &self,
        cli_args: Vec<String>,
        timeout: Duration,
    ) -> Result<CliOut> {
        self.run_cli(cli_args, true, Some(timeout)).await
    }

    /// Version of the `cardano-cli` binary, queried once and cached.
    pub async fn cli_version(&self) -> Result<semver::Version> {
        if let Some(version) = self.cli_version.get() {
            return Ok(version.clone());
        }
        let out = self
            .cli_raw(vec!["cardano-cli".to_string(), "--version".to_string()])
            .await?;
        let stdout = out.stdout_str();
        let version_str = stdout
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| Error::Parse(format!("unexpected version output `{stdout}`")))?;
        let version = semver::Version::parse(version_str)
            .map_err(|e| Error::Parse(format!("cannot parse version `{version_str}`: {e}")))?;
        Ok(self.cli_version.get_or_init(|| version).clone())
    }

    /// Offset of slots of the cluster's start era vs the Shelley era.
    ///
    /// Derived from the current tip on first use unless it was supplied to
    /// the builder.
    pub async fn slots_offset(&self) -> Result<i64> {
        if let Some(offset) = self.slots_offset.get() {
            return Ok(*offset);
        }
        let tip = self.query().get_tip().await?;
        let slots_to_epoch_end = tip.slots_to_epoch_end.ok_or_else(|| {
            Error::Parse("tip is missing `slotsToEpochEnd`".to_string())
        })?;
        let offset = slots::offset_from_tip(
            self.genesis.epoch_length,
            tip.epoch,
            tip.slot,
            slots_to_epoch_end,
        );
        Ok(*self.slots_offset.get_or_init(|| offset))
    }

    /// Refresh the cached protocol parameters file.
    pub async fn refresh_pparams_file(&self) -> Result<()> {
        self.query()
            .query_cli(vec![
                "protocol-parameters".to_string(),
                "--out-file".to_string(),
                files::path_str(&self.pparams_file),
            ])
            .await?;
        Ok(())
    }

    /// Create the protocol parameters file if it doesn't exist yet.
    pub async fn create_pparams_file(&self) -> Result<()> {
        if self.pparams_file.exists() {
            return Ok(());
        }
        self.refresh_pparams_file().await
    }

    /// Wait for the given number of new blocks; returns the new block number.
    pub async fn wait_for_new_block(&self, new_blocks: i64) -> Result<i64> {
        let tip = self.query().get_tip().await?;
        let initial_block = tip.block;
        if new_blocks < 1 {
            return Ok(initial_block);
        }
        self.wait_for_block_from(&tip, initial_block + new_blocks)
            .await
    }

    /// Wait until the chain reaches the given block number.
    pub async fn wait_for_block(&self, block: i64) -> Result<i64> {
        let tip = self.query().get_tip().await?;
        self.wait_for_block_from(&tip, block).await
    }

    async fn wait_for_block_from(&self, tip: &Tip, block_no: i64) -> Result<i64> {
        let initial_block = tip.block;
        let initial_slot = tip.slot;

        if initial_block >= block_no {
            return Ok(initial_block);
        }

        let next_block_timeout = 300; // in slots
        let max_tip_throttle = 5.0 * self.genesis.slot_length;
        let new_blocks = block_no - initial_block;

        debug!("waiting for {new_blocks} new block(s), initial block no: {initial_block}");

        let mut this_slot = initial_slot;
        let mut this_block = initial_block;
        let mut timeout_slot = initial_slot + next_block_timeout;
        let mut blocks_to_go = new_blocks;
        // Limit calls to `query tip`.
        let mut tip_throttle = 0.0;

        while this_slot < timeout_slot {
            let prev_block = this_block;
            tokio::time::sleep(Duration::from_secs_f64(
                self.genesis.slot_length * blocks_to_go as f64 + tip_throttle,
            ))
            .await;

            let this_tip = self.query().get_tip().await?;
            this_slot = this_tip.slot;
            this_block = this_tip.block;

            if this_block >= block_no {
                debug!("new block(s) were created; block number: {this_block}");
                return Ok(this_block);
            }
            if this_block > prev_block {
                // A new block was created, reset the timeout.
                timeout_slot = this_slot + next_block_timeout;
            }

            blocks_to_go = block_no - this_block;
            tip_throttle = (tip_throttle + self.genesis.slot_length).min(max_tip_throttle);
        }

        let waited_sec = (this_slot - initial_slot) as f64 * self.genesis.slot_length;
        Err(Error::WaitTimeout(format!(
            "timeout waiting {waited_sec:.2} sec for {new_blocks} block(s)"
        )))
    }

    /// Wait until the chain reaches the given slot; returns the tip slot.
    pub async fn wait_for_slot(&self, slot: i64) -> Result<i64> {
        let min_sleep = 1.5;
        let long_sleep = 15.0;
        let next_block_timeout = 300; // in slots
        let mut no_block_time = 0; // in slots
        let mut last_slot = -1;
        let mut printed = false;

        for _ in 0..100 {
            let this_slot = self.query().get_slot_no().await?;

            let slots_diff = slot - this_slot;
            if slots_diff <= 0 {
                return Ok(this_slot);
            }

            if this_slot == last_slot {
                if no_block_time >= next_block_timeout {
                    return Err(Error::WaitTimeout(format!(
                        "failed to wait for slot number {slot}, no new blocks are being created"
                    )));
                }
            } else {
                no_block_time = 0;
            }

            let sleep_time = (slots_diff as f64 * self.genesis.slot_length).max(min_sleep);
            if !printed && sleep_time > long_sleep {
                info!("waiting for {sleep_time:.2} sec for slot no {slot}");
                printed = true;
            }

            last_slot = this_slot;
            no_block_time += slots_diff;
            tokio::time::sleep(Duration::from_secs_f64(sleep_time)).await;
        }

        Err(Error::WaitTimeout(format!(
            "failed to wait for slot number {slot}"
        )))
    }

    /// Wait for the given number of new epochs; returns the current epoch.
    pub async fn wait_for_new_epoch(&self, new_epochs: i64, padding_seconds: i64) -> Result<i64> {
        let tip = self.query().get_tip().await?;
        let start_epoch = tip.epoch;
        if new_epochs < 1 {
            return Ok(start_epoch);
        }
        self.wait_for_epoch_from(&tip, start_epoch + new_epochs, padding_seconds, true)
            .await
    }

    /// Wait until the beginning of the given epoch.
    ///
    /// With `future_is_ok`, an epoch that already passed returns the current
    /// epoch instead of an error.
    pub async fn wait_for_epoch(
        &self,
        epoch_no: i64,
        padding_seconds: i64,
        future_is_ok: bool,
    ) -> Result<i64> {
        let tip = self.query().get_tip().await?;
        self.wait_for_epoch_from(&tip, epoch_no, padding_seconds, future_is_ok)
            .await
    }

    async fn wait_for_epoch_from(
        &self,
        tip: &Tip,
        epoch_no: i64,
        padding_seconds: i64,
        future_is_ok: bool,
    ) -> Result<i64> {
        let start_epoch = tip.epoch;

        if epoch_no < start_epoch {
            if !future_is_ok {
                return Err(Error::WaitTimeout(format!(
                    "current epoch is {start_epoch}, the requested epoch {epoch_no} is in the past"
                )));
            }
            return Ok(start_epoch);
        }

        debug!("current epoch: {start_epoch}; waiting for the beginning of epoch {epoch_no}");

        let new_epochs = epoch_no - start_epoch;

        // Calculate and wait for the expected boundary slot.
        let boundary_slot =
            (start_epoch + new_epochs) * self.genesis.epoch_length - self.slots_offset().await?;
        let padding_slots = if padding_seconds > 0 {
            (padding_seconds as f64 / self.genesis.slot_length) as i64
        } else {
            5
        };
        self.wait_for_slot(boundary_slot + padding_slots).await?;

        let mut this_epoch = self.query().get_epoch().await?;
        if this_epoch != epoch_no {
            error!(
                "waited for epoch number {epoch_no} and current epoch is number {this_epoch}, \
                 wrong `slots_offset`?"
            );
            // The boundary estimate missed, fall back to polling.
            self.poll_new_epoch(epoch_no, padding_seconds).await?;
        }

        this_epoch = self.query().get_epoch().await?;
        if this_epoch != epoch_no {
            return Err(Error::WaitTimeout(format!(
                "waited for epoch number {epoch_no} and current epoch is number {this_epoch}"
            )));
        }

        debug!("expected epoch started; epoch number: {this_epoch}");
        Ok(this_epoch)
    }

    /// Wait for an epoch by polling the current epoch every 3 seconds.
    async fn poll_new_epoch(&self, exp_epoch: i64, padding_seconds: i64) -> Result<()> {
        for check_no in 0..1000 {
            let wakeup_epoch = self.query().get_epoch().await?;
            if wakeup_epoch != exp_epoch {
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
            // Already in the expected epoch from the start, skip the padding.
            if check_no == 0 {
                break;
            }
            if padding_seconds > 0 {
                tokio::time::sleep(Duration::from_secs(padding_seconds as u64)).await;
            }
            break;
        }
        Ok(())
    }

    /// Seconds until the start of the next epoch.
    pub async fn time_to_epoch_end(&self, tip: Option<&Tip>) -> Result<f64> {
        let tip_owned;
        let tip = match tip {
            Some(tip) => tip,
            None => {
                tip_owned = self.query().get_tip().await?;
                &tip_owned
            }
        };
        let slots_to_go = (tip.epoch + 1) * self.genesis.epoch_length
            - (tip.slot + self.slots_offset().await? - 1);
        Ok(slots_to_go as f64 * self.genesis.slot_length)
    }

    /// Seconds passed since the start of the current epoch.
    pub async fn time_from_epoch_start(&self, tip: Option<&Tip>) -> Result<f64> {
        let to_epoch_end = self.time_to_epoch_end(tip).await?;
        Ok(self.epoch_length_sec() - to_epoch_end)
    }

    /// Epoch and epoch boundary slots corresponding to an absolute slot.
    ///
    /// Needs the Byron genesis file in the state dir to derive the Byron
    /// epoch length.
    pub async fn epoch_for_slot(&self, slot_no: i64) -> Result<EpochInfo> {
        let genesis_byron = self.state_dir.join("byron").join("genesis.json");
        if !genesis_byron.exists() {
            return Err(Error::MissingFile(genesis_byron));
        }
        let byron: JsonValue = serde_json::from_str(&std::fs::read_to_string(&genesis_byron)?)?;
        let byron_k = byron
            .pointer("/protocolConsts/k")
            .and_then(|k| {
                k.as_i64()
                    .or_else(|| k.as_str().and_then(|s| s.parse().ok()))
            })
            .ok_or_else(|| {
                Error::Parse("byron genesis is missing `protocolConsts.k`".to_string())
            })?;
        let offset = self.slots_offset().await?;
        Ok(slots::epoch_for_slot(
            slot_no,
            self.genesis.epoch_length,
            offset,
            byron_k,
        ))
    }

    /// The recorded CLI coverage as JSON.
    pub fn cli_coverage(&self) -> JsonValue {
        self.coverage
            .lock()
            .map(|coverage| coverage.to_json())
            .unwrap_or(JsonValue::Null)
    }
}

impl std::fmt::Debug for ClusterLib {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterLib")
            .field("command_era", &self.command_era)
            .field("state_dir", &self.state_dir)
            .field("network_magic", &self.genesis.network_magic)
            .finish_non_exhaustive()
    }
}
