//! Genesis file discovery, the parsed genesis model and the genesis
//! command group (`cardano-cli legacy genesis`).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::{
    cluster::ClusterLib,
    error::{Error, Result},
    files,
    records::GenesisKeys,
};

/// The subset of the Shelley genesis the wrapper needs.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShelleyGenesis {
    /// Slot duration in seconds.
    pub slot_length: f64,
    /// Number of slots per epoch.
    pub epoch_length: i64,
    /// Number of slots per KES period.
    #[serde(rename = "slotsPerKESPeriod")]
    pub slots_per_kes_period: i64,
    /// Maximum number of KES key evolutions.
    #[serde(rename = "maxKESEvolutions")]
    pub max_kes_evolutions: i64,
    /// Network magic.
    pub network_magic: u64,
}

fn find_named_genesis(state_dir: &Path, default: &Path, era: &str) -> Result<PathBuf> {
    if default.exists() {
        return Ok(default.to_path_buf());
    }

    // Fall back to any "<era> genesis" JSON file directly in the state dir.
    let mut potential: Vec<PathBuf> = std::fs::read_dir(state_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            name.ends_with(".json") && name.contains(era) && name.contains("genesis")
        })
        .collect();
    potential.sort();

    let genesis_json = potential.into_iter().next().ok_or_else(|| {
        Error::Config(format!(
            "{era} genesis JSON file not found in `{}`",
            state_dir.display()
        ))
    })?;
    debug!("using {era} genesis JSON file `{}`", genesis_json.display());
    Ok(genesis_json)
}

/// Find the Shelley genesis JSON file in the cluster state dir.
pub(crate) fn find_genesis_json(state_dir: &Path) -> Result<PathBuf> {
    let default = state_dir.join("shelley").join("genesis.json");
    find_named_genesis(state_dir, &default, "shelley")
}

/// Find the Conway genesis JSON file in the cluster state dir.
pub(crate) fn find_conway_genesis_json(state_dir: &Path) -> Result<PathBuf> {
    let default = state_dir.join("shelley").join("genesis.conway.json");
    find_named_genesis(state_dir, &default, "conway")
}

fn list_key_files(dir: &Path, prefix: &str, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            name.starts_with(prefix) && name.ends_with(extension)
        })
        .collect();
    files.sort();
    files
}

/// Commands related to the genesis block (`cardano-cli legacy genesis`).
#[derive(Clone, Copy, Debug)]
pub struct GenesisGroup<'a> {
    pub(crate) cluster: &'a ClusterLib,
}

impl GenesisGroup<'_> {
    fn group_args(&self) -> Vec<String> {
        vec![
            "cardano-cli".to_string(),
            "legacy".to_string(),
            "genesis".to_string(),
        ]
    }

    /// The genesis-related key files of the cluster, discovered once and
    /// cached on the facade.
    pub fn genesis_keys(&self) -> Result<&GenesisKeys> {
        self.cluster.genesis_keys.get_or_try_init(|| {
            let state_dir = &self.cluster.state_dir;
            let shelley_dir = state_dir.join("shelley");
            let genesis_utxo_vkey = shelley_dir.join("genesis-utxo.vkey");
            let genesis_utxo_skey = shelley_dir.join("genesis-utxo.skey");
            let genesis_vkeys =
                list_key_files(&shelley_dir.join("genesis-keys"), "genesis", ".vkey");
            let delegate_skeys =
                list_key_files(&shelley_dir.join("delegate-keys"), "delegate", ".skey");

            if genesis_vkeys.is_empty() {
                return Err(Error::Config(
                    "the genesis verification keys don't exist".to_string(),
                ));
            }
            if delegate_skeys.is_empty() {
                return Err(Error::Config(
                    "the delegation signing keys don't exist".to_string(),
                ));
            }
            for file in [&genesis_utxo_vkey, &genesis_utxo_skey] {
                if !file.exists() {
                    return Err(Error::MissingFile(file.clone()));
                }
            }

            Ok(GenesisKeys {
                genesis_utxo_vkey,
                genesis_utxo_skey,
                genesis_vkeys,
                delegate_skeys,
            })
        })
    }

    /// The address of the genesis initial UTxO, generated once and cached.
    pub async fn genesis_utxo_addr(&self) -> Result<String> {
        if let Some(addr) = self.cluster.genesis_utxo_addr.get() {
            return Ok(addr.clone());
        }
        let vkey_file = self.genesis_keys()?.genesis_utxo_vkey.clone();
        let addr = self
            .gen_genesis_addr(
                &format!("genesis-{}", self.cluster.rand_str),
                &vkey_file,
                &self.cluster.state_dir.clone(),
            )
            .await?;
        Ok(self
            .cluster
            .genesis_utxo_addr
            .get_or_init(|| addr)
            .clone())
    }

    /// Generate the address for an initial UTxO based on the verification key.
    pub async fn gen_genesis_addr(
        &self,
        addr_name: &str,
        vkey_file: &Path,
        destination_dir: &Path,
    ) -> Result<String> {
        let out_file = destination_dir.join(format!("{addr_name}_genesis.addr"));
        self.cluster.check_dest_files(&[&out_file])?;

        let mut args = self.group_args();
        args.push("initial-addr".to_string());
        args.extend(self.cluster.magic_args.clone());
        args.extend([
            "--verification-key-file".to_string(),
            files::path_str(vkey_file),
            "--out-file".to_string(),
            files::path_str(&out_file),
        ]);
        self.cluster.cli_raw(args).await?;

        files::check_outfiles(&[&out_file])?;
        files::read_address_from_file(&out_file)
    }

    /// Return the hash of a genesis public key.
    pub async fn get_genesis_vkey_hash(&self, vkey_file: &Path) -> Result<String> {
        let mut args = self.group_args();
        args.extend([
            "key-hash".to_string(),
            "--verification-key-file".to_string(),
            files::path_str(vkey_file),
        ]);
        let out = self.cluster.cli_raw(args).await?;
        Ok(out.stdout_trimmed())
    }
}
